//! Controller opcodes
/// Opcodes understood by the panel controller.
///
/// Source: <https://www.waveshare.com/w/upload/2/2d/2.7inch-e-paper-Specification.pdf>
pub struct Cmd;

#[allow(missing_docs)]
impl Cmd {
    // Init
    pub const PANEL_SETTING: u8 = 0x00;
    pub const POWER_SETTING: u8 = 0x01;
    pub const BOOSTER_SOFT_START: u8 = 0x06;
    pub const PARTIAL_DISPLAY_REFRESH: u8 = 0x16;
    pub const PLL_CONTROL: u8 = 0x30;
    pub const VCM_DC_SETTING: u8 = 0x82;
    /// Vendor extension, absent from the datasheet
    pub const POWER_OPTIMIZATION: u8 = 0xF8;

    // Waveform lookup tables
    pub const LUT_FOR_VCOM: u8 = 0x20;
    pub const LUT_WHITE_TO_WHITE: u8 = 0x21;
    pub const LUT_BLACK_TO_WHITE: u8 = 0x22;
    pub const LUT_WHITE_TO_BLACK: u8 = 0x23;
    pub const LUT_BLACK_TO_BLACK: u8 = 0x24;

    // Power
    pub const POWER_OFF: u8 = 0x02;
    pub const POWER_ON: u8 = 0x04;
    pub const DEEP_SLEEP: u8 = 0x07;

    // Update
    pub const DATA_START_TRANSMISSION_1: u8 = 0x10;
    pub const DISPLAY_REFRESH: u8 = 0x12;
    pub const DATA_START_TRANSMISSION_2: u8 = 0x13;
}

/*
Full command set of the controller, for reference:
0x00 - Panel Setting
0x01 - Power Setting
0x02 - Power Off
0x03 - Power Off Sequence Setting
0x04 - Power On
0x05 - Power On Measure
0x06 - Booster Soft Start
0x07 - Deep Sleep
0x10 - Data Start Transmission 1
0x11 - Data Stop
0x12 - Display Refresh
0x13 - Data Start Transmission 2
0x16 - Partial Display Refresh
0x20..0x24 - LUT for VCOM / WW / BW / WB / BB
0x30 - PLL Control
0x40 - Temperature Sensor Command
0x41 - Temperature Calibration
0x50 - VCOM and Data Interval Setting
0x60 - TCON Setting
0x61 - TCON Resolution
0x71 - Get Status
0x82 - VCM DC Setting
*/
