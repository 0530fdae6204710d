//! Quarter-turn rotation of layers
use embedded_graphics::prelude::*;

use super::{Bitmap, PixelSource};

/// Rotate `source` a quarter turn clockwise
///
/// A `w` x `h` source yields an `h` x `w` bitmap, nothing is cropped.
pub fn rotate<S: PixelSource + ?Sized>(source: &S) -> Bitmap {
    let Size { width, height } = source.size();
    Bitmap::from_fn(Size::new(height, width), |x, y| {
        source.color_at(y, height - 1 - x)
    })
}
