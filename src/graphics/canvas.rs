//! Panel-sized monochrome frame
use embedded_graphics::pixelcolor::{BinaryColor, Rgb888};
use embedded_graphics::prelude::*;

use super::{to_rgb, PixelSource};

/// In-memory black/white frame with the panel's dimensions
///
/// Starts white. Implements [`DrawTarget`] so any `embedded-graphics`
/// primitive or text can be drawn straight onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCanvas {
    size: Size,
    pixels: Vec<BinaryColor>,
}

impl FrameCanvas {
    /// White canvas of `width` x `height`
    pub fn new(width: u32, height: u32) -> Self {
        FrameCanvas {
            size: Size::new(width, height),
            pixels: vec![BinaryColor::Off; width as usize * height as usize],
        }
    }

    /// Pixels per row
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Rows
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Reset every pixel to white
    pub fn clear(&mut self) {
        self.pixels.fill(BinaryColor::Off);
    }

    /// Ink at `(x, y)`, `None` outside the bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Paint one pixel, ignored outside the bounds
    pub fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Rows top to bottom, each left to right
    pub fn rows(&self) -> impl Iterator<Item = &[BinaryColor]> {
        // a zero-width canvas has no pixels, chunks() would panic on 0
        self.pixels.chunks(self.size.width.max(1) as usize)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.size.width && y < self.size.height {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl OriginDimensions for FrameCanvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameCanvas {
    type Color = BinaryColor;
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

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl PixelSource for FrameCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn color_at(&self, x: u32, y: u32) -> Rgb888 {
        to_rgb(self.pixel(x, y).unwrap_or(BinaryColor::Off))
    }
}
