//! Text layers
//!
//! Renders a string into a black on white [`Bitmap`] that can be composited
//! like any other layer. Lines wrap on character boundaries when they would
//! overflow `width`, and on explicit newlines.
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::graphics::Bitmap;

/// Split `text` into lines of at most `columns` characters
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let chars: Vec<char> = paragraph.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(chars.chunks(columns).map(|c| c.iter().collect()));
    }
    lines
}

/// Rasterize `text` with `font` into a bitmap `width` pixels wide
///
/// The height is whatever the wrapped lines need.
pub fn render(text: &str, font: &MonoFont<'_>, width: u32) -> Bitmap {
    let advance = font.character_size.width + font.character_spacing;
    let columns = (width / advance.max(1)).max(1) as usize;
    let lines = wrap(text, columns);

    let line_height = font.character_size.height;
    let mut bitmap = Bitmap::new(
        Size::new(width, line_height * lines.len() as u32),
        Rgb888::WHITE,
    );

    let style = MonoTextStyleBuilder::new()
        .font(font)
        .text_color(Rgb888::BLACK)
        .build();

    for (i, line) in lines.iter().enumerate() {
        let origin = Point::new(0, (i as u32 * line_height) as i32);
        let label = Text::with_baseline(line, origin, style, Baseline::Top);
        if let Err(never) = label.draw(&mut bitmap) {
            match never {}
        }
    }

    log::debug!(
        "Rendered {} text lines into {}x{}",
        lines.len(),
        width,
        line_height * lines.len() as u32
    );
    bitmap
}
