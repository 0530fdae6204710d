//! 1 bit per pixel packing in the controller's scan order
//!
//! Rows are packed independently, leftmost pixel in the most significant
//! bit, `1` for white. Each row occupies [`line_width`] bytes. Only
//! complete groups of 8 pixels are stored: the trailing byte of a row
//! whose width is not a multiple of 8 keeps its white fill.
use embedded_graphics::pixelcolor::BinaryColor;

use super::FrameCanvas;
use crate::epd::flag::Flag;
use crate::epd::model::line_width;

/// Pack the canvas into `line_width(width) * height` bytes
pub fn pack(canvas: &FrameCanvas) -> Vec<u8> {
    let lw = line_width(canvas.width());
    let mut buffer = vec![Flag::FILL_WHITE; lw * canvas.height() as usize];
    if lw == 0 {
        return buffer;
    }

    for (row, pixels) in buffer.chunks_mut(lw).zip(canvas.rows()) {
        for (byte, chunk) in row.iter_mut().zip(pixels.chunks_exact(8)) {
            *byte = chunk.iter().fold(0, |acc, &pixel| (acc << 1) | bit(pixel));
        }
    }

    buffer
}

fn bit(pixel: BinaryColor) -> u8 {
    match pixel {
        BinaryColor::On => Flag::BIT_BLACK,
        BinaryColor::Off => Flag::BIT_WHITE,
    }
}
