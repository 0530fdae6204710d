//! E-paper panel driver
//!
//! Drives the IL91874 controller of the Waveshare 2.7" module and panels
//! speaking the same protocol: 1 bit per pixel, commands and data on a write-only
//! SPI bus, a data/command select line and a busy handshake line.
//!
//! ### Usage
//! The session owns a white [`FrameCanvas`](crate::graphics::FrameCanvas) of
//! the panel's size. To show something you:
//!
//! 1. open a session with [`Epd::new`] and call [`Epd::init`]
//! 1. composite layers onto the canvas with [`Epd::add_layer`], or draw on
//!    [`Epd::canvas_mut`] with [`embedded_graphics`]
//! 1. send it with [`Epd::print_display`]
//! 1. put the panel to sleep with [`Epd::sleep`], [`Epd::init`] wakes it up
//!
//! Panels with the same controller but a different geometry or calibration
//! are described by a [`PanelModel`] value, no code changes needed.

pub mod cmd;
pub mod config;
pub mod driver;
pub mod flag;
pub mod interface;
pub mod model;
pub mod pins;

pub use config::{Timing, SPI_FREQUENCY_HZ, SPI_MODE};
pub use driver::{Epd, ProtocolState};
pub use model::{BusyPolarity, CommandTable, Luts, PanelModel, Step};
pub use pins::Pins;
