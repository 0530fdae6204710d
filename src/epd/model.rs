//! Panel descriptors and their command tables
//!
//! Everything that differs between panel generations lives here as data: the
//! geometry, the opcode that starts a frame transfer, the busy line polarity
//! and the vendor calibration bytes sent during initialisation. The protocol
//! logic in [`crate::epd::driver`] only walks these tables.

use std::borrow::Cow;

use crate::epd::{cmd::Cmd, flag::Flag};
use crate::error::Error;

/// One command and the data bytes that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Command byte, sent with the data/command line low
    pub opcode: u8,
    /// Data bytes, sent with the data/command line high
    pub payload: Cow<'static, [u8]>,
}

impl Step {
    /// Step with a payload known at compile time
    pub const fn new(opcode: u8, payload: &'static [u8]) -> Self {
        Step {
            opcode,
            payload: Cow::Borrowed(payload),
        }
    }

    /// Step without data bytes
    pub const fn bare(opcode: u8) -> Self {
        Self::new(opcode, &[])
    }

    /// Step with a payload built at runtime
    pub fn owned(opcode: u8, payload: Vec<u8>) -> Self {
        Step {
            opcode,
            payload: Cow::Owned(payload),
        }
    }
}

/// Level the busy line reports while the controller is working
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyPolarity {
    /// Low while busy, high when idle
    #[default]
    ActiveLow,
    /// High while busy, low when idle
    ActiveHigh,
}

impl BusyPolarity {
    /// Whether a busy line reading `high` means the controller is idle
    pub fn is_idle(self, high: bool) -> bool {
        match self {
            BusyPolarity::ActiveLow => high,
            BusyPolarity::ActiveHigh => !high,
        }
    }
}

/// Waveform lookup tables loaded at the end of initialisation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Luts {
    /// Common electrode waveform
    pub vcom: Step,
    /// Pixel stays white
    pub white_to_white: Step,
    /// Pixel turns from black to white
    pub black_to_white: Step,
    /// Pixel turns from white to black
    pub white_to_black: Step,
    /// Pixel stays black
    pub black_to_black: Step,
}

impl Luts {
    /// Tables in transmission order
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        [
            &self.vcom,
            &self.white_to_white,
            &self.black_to_white,
            &self.white_to_black,
            &self.black_to_black,
        ]
        .into_iter()
    }
}

/// Every command the driver sends, keyed by protocol step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    /// First step of `init`, right after the reset pulse
    pub power_setting: Step,
    /// Charge pump ramp
    pub booster_soft_start: Step,
    /// Vendor tuning tuples, sent in order
    pub power_optimization: Cow<'static, [Step]>,
    /// Always full refresh
    pub partial_refresh_disable: Step,
    /// Followed by a busy wait
    pub power_on: Step,
    /// Resolution and scan direction
    pub panel_setting: Step,
    /// Frame rate
    pub pll_control: Step,
    /// Common electrode voltage
    pub vcm_dc_setting: Step,
    /// Waveforms, loaded last
    pub luts: Luts,
    /// Starts the refresh of transferred frame data
    pub display_refresh: Step,
    /// First half of `sleep`
    pub power_off: Step,
    /// Second half of `sleep`, carries the check code
    pub deep_sleep: Step,
}

/// Immutable description of one panel model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelModel {
    name: &'static str,
    width: u32,
    height: u32,
    start_transmission: u8,
    busy: BusyPolarity,
    commands: CommandTable,
}

impl PanelModel {
    /// Waveshare 2.7" black/white panel, 176x264
    pub const EPD_2IN7: PanelModel = PanelModel {
        name: "2.7in b/w",
        width: 176,
        height: 264,
        start_transmission: Cmd::DATA_START_TRANSMISSION_2,
        busy: BusyPolarity::ActiveLow,
        commands: EPD_2IN7_COMMANDS,
    };

    /// Describe a panel, rejecting empty geometry
    pub fn new(
        name: &'static str,
        width: u32,
        height: u32,
        start_transmission: u8,
        busy: BusyPolarity,
        commands: CommandTable,
    ) -> Result<Self, Error> {
        if width == 0 {
            return Err(Error::InvalidModel("width must be greater than zero"));
        }
        if height == 0 {
            return Err(Error::InvalidModel("height must be greater than zero"));
        }
        Ok(PanelModel {
            name,
            width,
            height,
            start_transmission,
            busy,
            commands,
        })
    }

    /// Same calibration, different geometry or transfer opcode
    pub fn with_geometry(
        &self,
        width: u32,
        height: u32,
        start_transmission: u8,
    ) -> Result<Self, Error> {
        Self::new(
            self.name,
            width,
            height,
            start_transmission,
            self.busy,
            self.commands.clone(),
        )
    }

    /// Human readable model name, used in log lines
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Pixels per row
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Rows
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per packed row, `ceil(width / 8)`
    pub fn line_width(&self) -> usize {
        line_width(self.width)
    }

    /// Size of a full packed frame
    pub fn buffer_len(&self) -> usize {
        self.line_width() * self.height as usize
    }

    /// Opcode that precedes frame data
    pub fn start_transmission(&self) -> u8 {
        self.start_transmission
    }

    /// Busy line level meaning while the controller works
    pub fn busy_polarity(&self) -> BusyPolarity {
        self.busy
    }

    /// Calibration and command bytes of this model
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }
}

/// Bytes needed for `width` pixels at one bit each
pub const fn line_width(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

// Calibration below follows the vendor reference code for the 2.7" panel.

// Struct literals keep the table promotable to 'static
const EPD_2IN7_POWER_OPTIMIZATION: [Step; 7] = [
    Step {
        opcode: Cmd::POWER_OPTIMIZATION,
        payload: Cow::Borrowed(&[0x60, 0xA5]),
    },
    Step {
        opcode: Cmd::POWER_OPTIMIZATION,
        payload: Cow::Borrowed(&[0x89, 0xA5]),
    },
    Step {
        opcode: Cmd::POWER_OPTIMIZATION,
        payload: Cow::Borrowed(&[0x90, 0x00]),
    },
    Step {
        opcode: Cmd::POWER_OPTIMIZATION,
        payload: Cow::Borrowed(&[0x93, 0x2A]),
    },
    Step {
        opcode: Cmd::POWER_OPTIMIZATION,
        payload: Cow::Borrowed(&[0xA0, 0xA5]),
    },
    Step {
        opcode: Cmd::POWER_OPTIMIZATION,
        payload: Cow::Borrowed(&[0xA1, 0x00]),
    },
    Step {
        opcode: Cmd::POWER_OPTIMIZATION,
        payload: Cow::Borrowed(&[0x73, 0x41]),
    },
];

const EPD_2IN7_LUT_VCOM_DC: [u8; 44] = [
    0x00, 0x00, //
    0x00, 0x08, 0x00, 0x00, 0x00, 0x02, //
    0x60, 0x28, 0x28, 0x00, 0x00, 0x01, //
    0x00, 0x14, 0x00, 0x00, 0x00, 0x01, //
    0x00, 0x12, 0x12, 0x00, 0x00, 0x01, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

const EPD_2IN7_LUT_WW: [u8; 42] = [
    0x40, 0x08, 0x00, 0x00, 0x00, 0x02, //
    0x90, 0x28, 0x28, 0x00, 0x00, 0x01, //
    0x40, 0x14, 0x00, 0x00, 0x00, 0x01, //
    0xA0, 0x12, 0x12, 0x00, 0x00, 0x01, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

const EPD_2IN7_LUT_BW: [u8; 42] = [
    0x40, 0x08, 0x00, 0x00, 0x00, 0x02, //
    0x90, 0x28, 0x28, 0x00, 0x00, 0x01, //
    0x40, 0x14, 0x00, 0x00, 0x00, 0x01, //
    0xA0, 0x12, 0x12, 0x00, 0x00, 0x01, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

const EPD_2IN7_LUT_WB: [u8; 42] = [
    0x80, 0x08, 0x00, 0x00, 0x00, 0x02, //
    0x90, 0x28, 0x28, 0x00, 0x00, 0x01, //
    0x80, 0x14, 0x00, 0x00, 0x00, 0x01, //
    0x50, 0x12, 0x12, 0x00, 0x00, 0x01, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

const EPD_2IN7_LUT_BB: [u8; 42] = [
    0x80, 0x08, 0x00, 0x00, 0x00, 0x02, //
    0x90, 0x28, 0x28, 0x00, 0x00, 0x01, //
    0x80, 0x14, 0x00, 0x00, 0x00, 0x01, //
    0x50, 0x12, 0x12, 0x00, 0x00, 0x01, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

const EPD_2IN7_COMMANDS: CommandTable = CommandTable {
    power_setting: Step::new(Cmd::POWER_SETTING, &[0x03, 0x00, 0x2B, 0x2B, 0x09]),
    booster_soft_start: Step::new(Cmd::BOOSTER_SOFT_START, &[0x07, 0x07, 0x17]),
    power_optimization: Cow::Borrowed(&EPD_2IN7_POWER_OPTIMIZATION),
    partial_refresh_disable: Step::new(
        Cmd::PARTIAL_DISPLAY_REFRESH,
        &[Flag::PARTIAL_REFRESH_DISABLE],
    ),
    power_on: Step::bare(Cmd::POWER_ON),
    panel_setting: Step::new(Cmd::PANEL_SETTING, &[0xAF]),
    // 3A 100Hz, 29 150Hz, 39 200Hz, 31 171Hz
    pll_control: Step::new(Cmd::PLL_CONTROL, &[0x3A]),
    vcm_dc_setting: Step::new(Cmd::VCM_DC_SETTING, &[0x12]),
    luts: Luts {
        vcom: Step::new(Cmd::LUT_FOR_VCOM, &EPD_2IN7_LUT_VCOM_DC),
        white_to_white: Step::new(Cmd::LUT_WHITE_TO_WHITE, &EPD_2IN7_LUT_WW),
        black_to_white: Step::new(Cmd::LUT_BLACK_TO_WHITE, &EPD_2IN7_LUT_BW),
        white_to_black: Step::new(Cmd::LUT_WHITE_TO_BLACK, &EPD_2IN7_LUT_WB),
        black_to_black: Step::new(Cmd::LUT_BLACK_TO_BLACK, &EPD_2IN7_LUT_BB),
    },
    display_refresh: Step::bare(Cmd::DISPLAY_REFRESH),
    power_off: Step::bare(Cmd::POWER_OFF),
    deep_sleep: Step::new(Cmd::DEEP_SLEEP, &[Flag::DEEP_SLEEP_CHECK]),
};
