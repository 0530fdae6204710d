//! Display interface using SPI with a manually driven chip select
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::epd::config::Timing;
use crate::epd::model::{BusyPolarity, Step};
use crate::error::{Error, Line};

/// The connection to the panel controller
///
/// Every byte travels in its own chip select bracket, the data/command line
/// decides how the controller interprets it.
pub struct DisplayInterface<SPI, CS, DC, RST, BSY, DELAY> {
    /// SPI bus, exclusively owned while the session is open
    spi: SPI,
    /// Chip select, low while a byte is exchanged
    cs: CS,
    /// Data/command select, high while data bytes are exchanged
    dc: DC,
    /// Reset, active low
    rst: RST,
    /// Handshake input, level per [`BusyPolarity`]
    busy: BSY,
    delay: DELAY,
    busy_polarity: BusyPolarity,
    timing: Timing,
}

impl<SPI, CS, DC, RST, BSY, DELAY> DisplayInterface<SPI, CS, DC, RST, BSY, DELAY> {
    /// Bundle the transport, nothing is sent yet
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spi: SPI,
        cs: CS,
        dc: DC,
        rst: RST,
        busy: BSY,
        delay: DELAY,
        busy_polarity: BusyPolarity,
        timing: Timing,
    ) -> Self {
        DisplayInterface {
            spi,
            cs,
            dc,
            rst,
            busy,
            delay,
            busy_polarity,
            timing,
        }
    }

    /// Delays used for reset, refresh and busy polling
    pub fn timing(&self) -> Timing {
        self.timing
    }
}

impl<SPI, CS, DC, RST, BSY, DELAY> DisplayInterface<SPI, CS, DC, RST, BSY, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Drive every output line to its idle level
    pub(crate) fn configure(&mut self) -> Result<(), Error> {
        self.dc.set_low().map_err(|_| Error::Configuration {
            line: Line::DataCommand,
            cause: DisplayError::DCError,
        })?;
        self.cs.set_low().map_err(|_| Error::Configuration {
            line: Line::ChipSelect,
            cause: DisplayError::CSError,
        })?;
        self.rst.set_low().map_err(|_| Error::Configuration {
            line: Line::Reset,
            cause: DisplayError::RSError,
        })?;
        log::debug!("Control lines configured");
        Ok(())
    }

    /// One command byte
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.exchange(command)
    }

    /// Data bytes, each in its own bracket
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        for &byte in data {
            // high for data
            self.dc.set_high().map_err(|_| DisplayError::DCError)?;
            self.exchange(byte)?;
        }
        Ok(())
    }

    /// `val` repeated, used to fill a whole frame with one color
    pub(crate) fn data_x_times(
        &mut self,
        val: u8,
        repetitions: usize,
    ) -> Result<(), DisplayError> {
        for _ in 0..repetitions {
            self.dc.set_high().map_err(|_| DisplayError::DCError)?;
            self.exchange(val)?;
        }
        Ok(())
    }

    /// Send a command step with its payload
    pub(crate) fn send(&mut self, step: &Step) -> Result<(), Error> {
        self.transmit(step.opcode, &step.payload)
    }

    /// Command byte followed by its data bytes
    pub(crate) fn transmit(&mut self, command: u8, payload: &[u8]) -> Result<(), Error> {
        log::debug!("Command 0x{:02X}, {} data bytes", command, payload.len());
        self.cmd(command)
            .and_then(|()| self.data(payload))
            .map_err(|cause| transport_error(command, cause))
    }

    /// Command byte followed by `repetitions` copies of `val`
    pub(crate) fn transmit_fill(
        &mut self,
        command: u8,
        val: u8,
        repetitions: usize,
    ) -> Result<(), Error> {
        log::debug!(
            "Command 0x{:02X}, {} x 0x{:02X}",
            command,
            repetitions,
            val
        );
        self.cmd(command)
            .and_then(|()| self.data_x_times(val, repetitions))
            .map_err(|cause| transport_error(command, cause))
    }

    /// One byte inside its own chip select bracket
    fn exchange(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::CSError)?;
        match self.spi.write(&[byte]).and_then(|()| self.spi.flush()) {
            Ok(()) => {}
            Err(e) => {
                log::error!("SPI write error for byte 0x{:02X}: {:?}", byte, e);
                return Err(DisplayError::BusWriteError);
            }
        }
        self.cs.set_high().map_err(|_| DisplayError::CSError)
    }

    /// Resets the device: high, low, high, each held for the reset settle time
    pub(crate) fn reset(&mut self) -> Result<(), DisplayError> {
        let settle = self.timing.reset_settle_ms;
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(settle);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(settle);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(settle);
        Ok(())
    }

    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Whether the controller currently reports busy
    pub(crate) fn is_busy(&mut self) -> Result<bool, Error> {
        let high = self.busy.is_high().map_err(|_| Error::BusyRead)?;
        Ok(!self.busy_polarity.is_idle(high))
    }

    /// Poll the busy line until the controller is idle
    ///
    /// Fails with [`Error::Unresponsive`] once the configured timeout has
    /// been spent polling.
    pub(crate) fn wait_until_idle(&mut self) -> Result<(), Error> {
        let poll_ms = self.timing.busy_poll_ms;
        let mut waited_ms: u32 = 0;
        let mut polls: u32 = 0;

        while self.is_busy()? {
            if let Some(timeout_ms) = self.timing.busy_timeout_ms {
                if waited_ms >= timeout_ms {
                    log::error!(
                        "TIMEOUT waiting for BUSY line after {} ms ({} polls)",
                        waited_ms,
                        polls
                    );
                    return Err(Error::Unresponsive { waited_ms });
                }
            }
            self.delay.delay_ms(poll_ms);
            // a zero interval still has to make progress towards the timeout
            waited_ms = waited_ms.saturating_add(poll_ms.max(1));
            polls = polls.saturating_add(1);
        }

        log::debug!("Device idle after {} polls", polls);
        Ok(())
    }
}

fn transport_error(command: u8, cause: DisplayError) -> Error {
    log::error!("Transfer of command 0x{:02X} failed: {:?}", command, cause);
    Error::Transport { command, cause }
}
