//! Fixed data bytes
/// Data bytes with a fixed meaning in the protocol.
pub struct Flag;

#[allow(missing_docs)]
impl Flag {
    // Partial Display Refresh (0x16)
    pub const PARTIAL_REFRESH_DISABLE: u8 = 0x00;
    pub const PARTIAL_REFRESH_ENABLE: u8 = 0x01;

    // Deep Sleep (0x07) check code, any other value is ignored by the controller
    pub const DEEP_SLEEP_CHECK: u8 = 0xA5;

    // Pixel data, 1 bit per pixel
    pub const FILL_WHITE: u8 = 0xFF;
    pub const FILL_BLACK: u8 = 0x00;
    pub const BIT_WHITE: u8 = 0x01;
    pub const BIT_BLACK: u8 = 0x00;
}
