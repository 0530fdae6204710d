//! Timing and bus settings shared by every panel model

use embedded_hal::spi::{Mode, MODE_0};

/// SPI clock the panel is driven at. The controller tolerates up to ~5 MHz,
/// the vendor reference code stays at 4 MHz.
pub const SPI_FREQUENCY_HZ: u32 = 4_000_000;

/// SPI mode required by the controller, 8-bit words
pub const SPI_MODE: Mode = MODE_0;

const RESET_SETTLE_MS: u32 = 200;
const REFRESH_SETTLE_MS: u32 = 100;
const BUSY_POLL_MS: u32 = 100;
const BUSY_TIMEOUT_MS: u32 = 30_000; // a full refresh takes a few seconds

/// Delays used while sequencing the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Hold time of each reset half-cycle
    pub reset_settle_ms: u32,
    /// Pause between the refresh command and the first busy poll
    pub refresh_settle_ms: u32,
    /// Interval between two busy line reads
    pub busy_poll_ms: u32,
    /// Give up waiting for the busy line after this long.
    /// `None` waits forever.
    pub busy_timeout_ms: Option<u32>,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            reset_settle_ms: RESET_SETTLE_MS,
            refresh_settle_ms: REFRESH_SETTLE_MS,
            busy_poll_ms: BUSY_POLL_MS,
            busy_timeout_ms: Some(BUSY_TIMEOUT_MS),
        }
    }
}

impl Timing {
    /// Same delays, different busy timeout
    pub fn with_busy_timeout(mut self, timeout_ms: Option<u32>) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }
}
