//! Frame composition
//!
//! Anything that can answer "how big are you" and "what color is this pixel"
//! is a [`PixelSource`]. Sources are placed onto the panel-sized
//! [`FrameCanvas`] as layers, optionally rotated first, and the canvas is then
//! packed into the 1 bit per pixel buffer the controller expects.
//!
//! Colors follow the `embedded-graphics` convention used by the panel
//! buffers: [`BinaryColor::On`] is black ink, [`BinaryColor::Off`] is white.

use embedded_graphics::pixelcolor::{BinaryColor, Rgb888, RgbColor};
use embedded_graphics::prelude::*;

pub mod canvas;
pub mod compose;
#[cfg(feature = "image")]
mod images;
pub mod pack;
pub mod rotate;

pub use canvas::FrameCanvas;
pub use compose::Layer;
pub use pack::pack;
pub use rotate::rotate;

/// A 2-D raster the compositor can read from
pub trait PixelSource {
    /// Bounds of the raster, pixels outside are never requested
    fn size(&self) -> Size;

    /// Color of the pixel at `(x, y)`, with `x < width` and `y < height`
    fn color_at(&self, x: u32, y: u32) -> Rgb888;
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn color_at(&self, x: u32, y: u32) -> Rgb888 {
        (**self).color_at(x, y)
    }
}

/// Nearest entry of the {black, white} palette, ties go to black
pub fn quantize(color: Rgb888) -> BinaryColor {
    let distance = |target: u8| -> u32 {
        [color.r(), color.g(), color.b()]
            .iter()
            .map(|&c| {
                let d = u32::from(c.abs_diff(target));
                d * d
            })
            .sum()
    };

    if distance(u8::MAX) < distance(0) {
        BinaryColor::Off
    } else {
        BinaryColor::On
    }
}

/// Only pure white is see-through in a transparent layer
pub fn is_chroma_key(color: Rgb888) -> bool {
    color == Rgb888::WHITE
}

/// Ink color to the canonical RGB value
pub fn to_rgb(color: BinaryColor) -> Rgb888 {
    match color {
        BinaryColor::On => Rgb888::BLACK,
        BinaryColor::Off => Rgb888::WHITE,
    }
}

/// Owned RGB raster
///
/// The output of [`rotate`] and of the text renderer, and a convenient
/// `embedded-graphics` draw target for building layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl Bitmap {
    /// Raster of `size` filled with `fill`
    pub fn new(size: Size, fill: Rgb888) -> Self {
        let len = size.width as usize * size.height as usize;
        Bitmap {
            size,
            pixels: vec![fill; len],
        }
    }

    /// Raster whose pixels are computed from their coordinates
    pub fn from_fn(size: Size, mut f: impl FnMut(u32, u32) -> Rgb888) -> Self {
        let mut pixels = Vec::with_capacity(size.width as usize * size.height as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                pixels.push(f(x, y));
            }
        }
        Bitmap { size, pixels }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.size.width && y < self.size.height {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Color at `(x, y)`, `None` outside the bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Paint one pixel, ignored outside the bounds
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb888) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }
}

impl PixelSource for Bitmap {
    fn size(&self) -> Size {
        self.size
    }

    fn color_at(&self, x: u32, y: u32) -> Rgb888 {
        self.pixel(x, y).unwrap_or(Rgb888::WHITE)
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Bitmap {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}
