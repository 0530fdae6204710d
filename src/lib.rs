//! Monochrome e-paper driver and frame composer
//!
//! [`epd`] sequences the controller protocol over `embedded-hal` 1.0
//! transports. [`graphics`] turns arbitrary rasters into the packed frame the
//! controller expects: layers with optional white chroma-key, quarter-turn
//! rotation and 1 bit per pixel row packing. [`text`] renders strings into
//! layers with `embedded-graphics` mono fonts.
#![deny(missing_docs)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]

pub mod epd;
pub mod error;
pub mod graphics;
pub mod text;

pub use epd::{Epd, PanelModel, ProtocolState, Timing};
pub use error::{DisplayError, Error, Line};
pub use graphics::{pack, rotate, Bitmap, FrameCanvas, Layer, PixelSource};
