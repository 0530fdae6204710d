//! Raster sources backed by the `image` crate
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Size;
use image::{DynamicImage, GenericImageView, GrayImage, Rgba, RgbaImage};

use super::PixelSource;

// Alpha is premultiplied, a fully transparent pixel reads as black
fn premultiply(Rgba([r, g, b, a]): Rgba<u8>) -> Rgb888 {
    let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    Rgb888::new(scale(r), scale(g), scale(b))
}

impl PixelSource for DynamicImage {
    fn size(&self) -> Size {
        let (width, height) = self.dimensions();
        Size::new(width, height)
    }

    fn color_at(&self, x: u32, y: u32) -> Rgb888 {
        premultiply(self.get_pixel(x, y))
    }
}

impl PixelSource for RgbaImage {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    fn color_at(&self, x: u32, y: u32) -> Rgb888 {
        premultiply(*self.get_pixel(x, y))
    }
}

impl PixelSource for GrayImage {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    fn color_at(&self, x: u32, y: u32) -> Rgb888 {
        let [luma] = self.get_pixel(x, y).0;
        Rgb888::new(luma, luma, luma)
    }
}
