//! Layer compositing onto the frame canvas
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{is_chroma_key, quantize, FrameCanvas, PixelSource};

/// Write `source` onto `canvas` with its top-left corner at `offset`
///
/// Only the intersection of the canvas and the placed source is touched.
/// Opaque layers overwrite every covered pixel with the quantized source
/// color. Transparent layers skip pure white source pixels.
///
/// Returns the canvas area that was covered, `None` if the layer lies
/// entirely outside the canvas.
pub fn add_layer<S>(
    canvas: &mut FrameCanvas,
    source: &S,
    offset: Point,
    transparent: bool,
) -> Option<Rectangle>
where
    S: PixelSource + ?Sized,
{
    let placed = Rectangle::new(offset, source.size());
    let area = canvas.bounding_box().intersection(&placed);
    if area.is_zero_sized() {
        log::debug!("Layer at {:?} misses the canvas", offset);
        return None;
    }

    for point in area.points() {
        let (Ok(sx), Ok(sy)) = (
            u32::try_from(point.x - offset.x),
            u32::try_from(point.y - offset.y),
        ) else {
            continue;
        };
        let color = source.color_at(sx, sy);
        if transparent && is_chroma_key(color) {
            continue;
        }
        // the intersection is inside the canvas, so both are non-negative
        canvas.set_pixel(point.x as u32, point.y as u32, quantize(color));
    }

    Some(area)
}

impl FrameCanvas {
    /// Composite `source` at `offset`, see [`add_layer`]
    pub fn add_layer<S>(
        &mut self,
        source: &S,
        offset: Point,
        transparent: bool,
    ) -> Option<Rectangle>
    where
        S: PixelSource + ?Sized,
    {
        add_layer(self, source, offset, transparent)
    }
}

/// A source with its placement on the canvas
#[derive(Debug, Clone)]
pub struct Layer<S> {
    source: S,
    offset: Point,
    transparent: bool,
}

impl<S: PixelSource> Layer<S> {
    /// Opaque layer at the canvas origin
    pub fn new(source: S) -> Self {
        Layer {
            source,
            offset: Point::zero(),
            transparent: false,
        }
    }

    /// Move the layer's top-left corner to `offset` on the canvas
    pub fn at(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Let pure white show the canvas underneath
    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    /// Wrapped raster
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Composite onto `canvas`, returning the touched area
    pub fn draw_onto(&self, canvas: &mut FrameCanvas) -> Option<Rectangle> {
        add_layer(canvas, &self.source, self.offset, self.transparent)
    }
}
