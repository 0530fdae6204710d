//! Panel session: protocol sequencing and the owned frame canvas
//!
//! ## Lifecycle
//!
//! ```text
//! new() ──> Uninitialized ──init()──> Ready ──sleep()──> Sleeping
//!               ^    ^                 |  ^                  |
//!               |    └──── reset() ────┘  └── clear_screen() |
//!               |                             display()      |
//!               └─────────────── reset() ────────────────────┘
//! ```
//!
//! `init()` is accepted from any state and always starts with a hardware
//! reset. Frame operations and `sleep()` need `Ready`, anything else is
//! reported as [`Error::NotReady`] before a single byte is sent.
//!
//! When a transfer or the busy wait fails halfway through an operation the
//! controller is in an unknown state, so the session falls back to
//! `Uninitialized` and has to be initialized again.

use core::fmt;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::epd::config::Timing;
use crate::epd::flag::Flag;
use crate::epd::interface::DisplayInterface;
use crate::epd::model::PanelModel;
use crate::error::{Error, Line};
use crate::graphics::{pack, rotate, Bitmap, FrameCanvas, PixelSource};
use crate::text;

/// Where the controller is in its power/initialization cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolState {
    /// Powered, but not (or no longer known to be) initialized
    #[default]
    Uninitialized,
    /// Initialized, accepts frame data
    Ready,
    /// Deep sleep, needs `init()` to wake up
    Sleeping,
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolState::Uninitialized => write!(f, "uninitialized"),
            ProtocolState::Ready => write!(f, "ready"),
            ProtocolState::Sleeping => write!(f, "sleeping"),
        }
    }
}

/// E-paper panel session
///
/// Owns the transport, the panel description and a panel-sized
/// [`FrameCanvas`] that layers are composited onto before
/// [`print_display`](Epd::print_display) sends it.
///
/// ## Type Parameters
///
/// - `SPI` - SPI bus, exclusively owned
/// - `CS` - chip select output (active low)
/// - `DC` - data/command output (high for data)
/// - `RST` - reset output (active low)
/// - `BSY` - busy input
/// - `DELAY` - delay provider for settle times and busy polling
pub struct Epd<SPI, CS, DC, RST, BSY, DELAY> {
    interface: DisplayInterface<SPI, CS, DC, RST, BSY, DELAY>,
    model: PanelModel,
    canvas: FrameCanvas,
    state: ProtocolState,
}

impl<SPI, CS, DC, RST, BSY, DELAY> Epd<SPI, CS, DC, RST, BSY, DELAY> {
    /// Where the session is in its lifecycle
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Panel this session drives
    pub fn model(&self) -> &PanelModel {
        &self.model
    }

    /// Delays in use by the session
    pub fn timing(&self) -> Timing {
        self.interface.timing()
    }

    /// The in-memory frame sent by [`print_display`](Epd::print_display)
    pub fn canvas(&self) -> &FrameCanvas {
        &self.canvas
    }

    /// Mutable canvas, e.g. to draw `embedded-graphics` primitives on it
    pub fn canvas_mut(&mut self) -> &mut FrameCanvas {
        &mut self.canvas
    }

    /// Composite `source` onto the canvas with its top-left corner at `(x, y)`
    ///
    /// With `transparent` set, pure white source pixels leave the canvas
    /// untouched. Returns the canvas area that was written.
    pub fn add_layer<S>(
        &mut self,
        source: &S,
        x: i32,
        y: i32,
        transparent: bool,
    ) -> Option<Rectangle>
    where
        S: PixelSource + ?Sized,
    {
        let area = self
            .canvas
            .add_layer(source, Point::new(x, y), transparent);
        if area.is_none() {
            log::warn!("Layer at ({}, {}) is outside the canvas", x, y);
        }
        area
    }

    /// Reset the in-memory canvas to white, the panel is not touched
    pub fn clear_canvas(&mut self) {
        self.canvas.clear();
    }

    /// Render `text` as wide as the panel
    pub fn write(&self, text: &str, font: &MonoFont<'_>) -> Bitmap {
        text::render(text, font, self.model.width())
    }

    /// Render `text` along the panel's long side, rotated to fit it
    pub fn write_rotated(&self, text: &str, font: &MonoFont<'_>) -> Bitmap {
        rotate(&text::render(text, font, self.model.height()))
    }
}

impl<SPI, CS, DC, RST, BSY, DELAY> Epd<SPI, CS, DC, RST, BSY, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Take over the transport and drive the control lines to their idle
    /// levels. The panel itself is not touched until [`init`](Epd::init).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spi: SPI,
        cs: CS,
        dc: DC,
        rst: RST,
        busy: BSY,
        delay: DELAY,
        model: PanelModel,
        timing: Timing,
    ) -> Result<Self, Error> {
        let mut interface = DisplayInterface::new(
            spi,
            cs,
            dc,
            rst,
            busy,
            delay,
            model.busy_polarity(),
            timing,
        );
        interface.configure()?;

        log::info!(
            "{} session opened ({}x{})",
            model.name(),
            model.width(),
            model.height()
        );
        Ok(Epd {
            canvas: FrameCanvas::new(model.width(), model.height()),
            interface,
            model,
            state: ProtocolState::Uninitialized,
        })
    }

    /// Hardware reset, also wakes the controller from deep sleep
    pub fn reset(&mut self) -> Result<(), Error> {
        self.state = ProtocolState::Uninitialized;
        self.interface.reset().map_err(|cause| {
            log::error!("Reset failed: {:?}", cause);
            Error::Line {
                line: Line::Reset,
                cause,
            }
        })
    }

    /// Reset and load the power, booster and waveform configuration
    pub fn init(&mut self) -> Result<(), Error> {
        log::info!("Initializing {}", self.model.name());
        self.reset()?;

        self.guarded(|epd| {
            let commands = epd.model.commands();
            let interface = &mut epd.interface;

            interface.send(&commands.power_setting)?;
            interface.send(&commands.booster_soft_start)?;
            for step in commands.power_optimization.iter() {
                interface.send(step)?;
            }
            interface.send(&commands.partial_refresh_disable)?;

            interface.send(&commands.power_on)?;
            interface.wait_until_idle()?;

            interface.send(&commands.panel_setting)?;
            interface.send(&commands.pll_control)?;
            interface.send(&commands.vcm_dc_setting)?;
            for lut in commands.luts.iter() {
                interface.send(lut)?;
            }
            Ok(())
        })?;

        self.state = ProtocolState::Ready;
        log::info!("{} ready", self.model.name());
        Ok(())
    }

    /// Blank the physical panel
    ///
    /// The canvas keeps its contents, use [`clear_canvas`](Epd::clear_canvas)
    /// to reset it as well.
    pub fn clear_screen(&mut self) -> Result<(), Error> {
        self.require_ready("clear_screen")?;
        log::info!("Clearing screen");

        self.guarded(|epd| {
            let command = epd.model.start_transmission();
            let len = epd.model.buffer_len();
            epd.interface.transmit_fill(command, Flag::FILL_WHITE, len)?;
            epd.turn_on_display()
        })
    }

    /// Send a packed frame and refresh the panel
    ///
    /// `buffer` must hold exactly `line_width * height` bytes.
    pub fn display(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.require_ready("display")?;
        let expected = self.model.buffer_len();
        if buffer.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        log::info!("Displaying {} byte frame", buffer.len());

        self.guarded(|epd| {
            let command = epd.model.start_transmission();
            epd.interface.transmit(command, buffer)?;
            epd.turn_on_display()
        })
    }

    /// Pack the canvas and [`display`](Epd::display) it
    pub fn print_display(&mut self) -> Result<(), Error> {
        let buffer = pack(&self.canvas);
        self.display(&buffer)
    }

    /// Power off and enter deep sleep
    pub fn sleep(&mut self) -> Result<(), Error> {
        self.require_ready("sleep")?;
        log::info!("Entering deep sleep");

        self.guarded(|epd| {
            let commands = epd.model.commands();
            epd.interface.send(&commands.power_off)?;
            epd.interface.wait_until_idle()?;
            epd.interface.send(&commands.deep_sleep)
        })?;

        self.state = ProtocolState::Sleeping;
        Ok(())
    }

    fn turn_on_display(&mut self) -> Result<(), Error> {
        let settle = self.interface.timing().refresh_settle_ms;
        self.interface.send(&self.model.commands().display_refresh)?;
        self.interface.delay_ms(settle);
        self.interface.wait_until_idle()
    }

    fn require_ready(&self, operation: &'static str) -> Result<(), Error> {
        match self.state {
            ProtocolState::Ready => Ok(()),
            state => {
                log::warn!("{} refused while {}", operation, state);
                Err(Error::NotReady { operation, state })
            }
        }
    }

    /// Run a bus sequence, a failure leaves the controller uninitialized
    fn guarded<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let result = op(self);
        if result.is_err() {
            self.state = ProtocolState::Uninitialized;
        }
        result
    }
}
