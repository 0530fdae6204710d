//! Errors reported by the driver

use core::fmt;

pub use display_interface::DisplayError;

use crate::epd::driver::ProtocolState;

/// Control lines of the panel connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Data/Command select (high for data, low for command)
    DataCommand,
    /// Chip select, active low
    ChipSelect,
    /// Reset, active low
    Reset,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::DataCommand => write!(f, "DC"),
            Line::ChipSelect => write!(f, "CS"),
            Line::Reset => write!(f, "RST"),
        }
    }
}

/// Everything that can go wrong while talking to the panel
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Panel descriptor with impossible geometry
    #[error("invalid panel model: {0}")]
    InvalidModel(&'static str),

    /// A control line could not be put in its initial state
    #[error("could not configure the {line} line: {cause:?}")]
    Configuration {
        /// Line that refused its initial level
        line: Line,
        /// Pin error mapped by the transport
        cause: DisplayError,
    },

    /// A control line failed outside of a command transfer
    #[error("{line} line failure: {cause:?}")]
    Line {
        /// Line that failed
        line: Line,
        /// Pin error mapped by the transport
        cause: DisplayError,
    },

    /// The busy input could not be read
    #[error("could not read the BUSY line")]
    BusyRead,

    /// A command or one of its data bytes could not be transmitted
    #[error("transport failure while sending command 0x{command:02X}: {cause:?}")]
    Transport {
        /// Opcode of the step that was being sent
        command: u8,
        /// Bus or pin error of the failed byte
        cause: DisplayError,
    },

    /// The busy line never reported idle within the configured timeout
    #[error("device unresponsive: still busy after {waited_ms} ms")]
    Unresponsive {
        /// Time spent polling before giving up
        waited_ms: u32,
    },

    /// Operation issued in the wrong protocol state
    #[error("{operation} requires an initialized display, current state is {state}")]
    NotReady {
        /// Refused operation
        operation: &'static str,
        /// State the session was in
        state: ProtocolState,
    },

    /// Frame buffer does not match the panel geometry
    #[error("frame buffer holds {actual} bytes, panel expects {expected}")]
    BufferSize {
        /// `line_width * height` of the panel
        expected: usize,
        /// Length of the buffer passed in
        actual: usize,
    },
}
