fn main() {
    // ESP-IDF link arguments are only needed for the demo binary
    #[cfg(feature = "esp32")]
    embuild::espidf::sysenv::output();
}
