//! Default wiring of the panel to the ESP32-S3 board
//!
//! The driver itself takes any `embedded-hal` pins; these numbers are only
//! used by the demo binary.

/// GPIO assignments of the panel connector
pub struct Pins;

impl Pins {
    /// Chip Select (low while a byte is exchanged)
    pub const CS: u8 = 45;
    /// Data/Command control pin (High for data, Low for command)
    pub const DC: u8 = 46;
    /// Reset pin for display (active low)
    pub const RST: u8 = 47;
    /// Busy status pin (Low while the controller is busy)
    pub const BUSY: u8 = 48;
    /// SPI Clock pin
    pub const SCK: u8 = 12;
    /// SPI Master Out Slave In
    pub const MOSI: u8 = 11;
    /// Panel power switch
    pub const POWER: u8 = 7;
}
