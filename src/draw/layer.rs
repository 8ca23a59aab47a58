//! Raster layer backed by a Cairo image surface.
//!
//! Both the persistent canvas and the per-frame preview overlay are [`Layer`]s.
//! All committed strokes become immutable pixels here; there is no retained
//! vector model. Contexts are created per operation so the underlying pixel
//! buffer stays exclusively borrowable for snapshots and pixel queries.

use crate::error::{BoardError, Result};
use crate::util::{Point, Rect};

use super::color::Color;

/// An ARGB32 raster layer with stroke, fill, and region operations.
#[derive(Debug)]
pub struct Layer {
    surface: cairo::ImageSurface,
    width: i32,
    height: i32,
}

impl Layer {
    /// Creates a fully transparent layer of the given pixel dimensions.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
        Ok(Self {
            surface,
            width,
            height,
        })
    }

    /// Wraps an existing image surface (e.g. a decoded paste bitmap).
    pub fn from_surface(surface: cairo::ImageSurface) -> Self {
        let width = surface.width();
        let height = surface.height();
        Self {
            surface,
            width,
            height,
        }
    }

    /// Builds a layer from pre-decoded ARGB32 pixel rows (tightly packed).
    ///
    /// This is the entry point for externally decoded bitmaps: the core never
    /// does file I/O or image decoding itself.
    pub fn from_argb_bytes(data: Vec<u8>, width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        let stride = cairo::Format::ARgb32.stride_for_width(width as u32)?;
        let mut rows = vec![0u8; (stride * height) as usize];
        let src_stride = (width * 4) as usize;
        if data.len() < src_stride * height as usize {
            return Err(BoardError::SnapshotMismatch {
                snapshot: data.len(),
                surface: src_stride * height as usize,
            });
        }
        for y in 0..height as usize {
            let dst = y * stride as usize;
            let src = y * src_stride;
            rows[dst..dst + src_stride].copy_from_slice(&data[src..src + src_stride]);
        }
        let surface =
            cairo::ImageSurface::create_for_data(rows, cairo::Format::ARgb32, width, height, stride)?;
        Ok(Self::from_surface(surface))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Borrows the underlying surface, e.g. for PNG encoding.
    pub fn surface(&self) -> &cairo::ImageSurface {
        &self.surface
    }

    pub(crate) fn context(&self) -> Result<cairo::Context> {
        let ctx = cairo::Context::new(&self.surface)?;
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
        Ok(ctx)
    }

    /// Clears the whole layer back to full transparency.
    pub fn clear(&mut self) -> Result<()> {
        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.paint()?;
        Ok(())
    }

    /// Clears the pixels inside an axis-aligned rectangle.
    pub fn clear_rect(&mut self, rect: Rect) -> Result<()> {
        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
        ctx.fill()?;
        Ok(())
    }

    /// Clears the pixels inside `rect` that are also inside the polygon.
    ///
    /// The clip is rasterized without antialiasing so the cleared region is
    /// the exact pixel complement of what [`Layer::extract_polygon`] copies.
    pub fn clear_polygon(&mut self, polygon: &[Point], rect: Rect) -> Result<()> {
        let ctx = self.context()?;
        ctx.set_antialias(cairo::Antialias::None);
        trace_polygon(&ctx, polygon, 0.0, 0.0);
        ctx.clip();
        ctx.set_operator(cairo::Operator::Clear);
        ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
        ctx.fill()?;
        Ok(())
    }

    /// Draws one stroke segment from `a` to `b` with round caps.
    ///
    /// `erase` switches to destination-removal compositing: instead of
    /// painting color the stroke punches transparency into the layer.
    pub fn stroke_segment(&mut self, a: Point, b: Point, color: Color, width: f64, erase: bool) -> Result<()> {
        let ctx = self.context()?;
        if erase {
            ctx.set_operator(cairo::Operator::Clear);
        } else {
            ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        }
        ctx.set_line_width(width);
        ctx.move_to(a.x, a.y);
        ctx.line_to(b.x, b.y);
        ctx.stroke()?;
        Ok(())
    }

    /// Fills a solid dot, used by the point pen mode for anchor markers.
    pub fn fill_dot(&mut self, center: Point, radius: f64, color: Color) -> Result<()> {
        let ctx = self.context()?;
        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
        ctx.fill()?;
        Ok(())
    }

    /// Strokes a full circle outline.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, width: f64) -> Result<()> {
        if radius <= 0.0 {
            return Ok(());
        }
        let ctx = self.context()?;
        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        ctx.set_line_width(width);
        ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
        ctx.stroke()?;
        Ok(())
    }

    /// Strokes a circular arc between two angles.
    ///
    /// `counter_clockwise` selects the sweep direction, matching the sign of
    /// the cross product computed by the compass tool.
    pub fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
        color: Color,
        width: f64,
    ) -> Result<()> {
        if radius <= 0.0 {
            return Ok(());
        }
        let ctx = self.context()?;
        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        ctx.set_line_width(width);
        if counter_clockwise {
            ctx.arc_negative(center.x, center.y, radius, start_angle, end_angle);
        } else {
            ctx.arc(center.x, center.y, radius, start_angle, end_angle);
        }
        ctx.stroke()?;
        Ok(())
    }

    /// Paints another layer onto this one at `(x, y)`, uniformly scaled.
    pub fn paint_layer(&mut self, src: &Layer, x: f64, y: f64, scale: f64) -> Result<()> {
        if scale <= 0.0 {
            return Ok(());
        }
        let ctx = self.context()?;
        ctx.save()?;
        ctx.translate(x, y);
        ctx.scale(scale, scale);
        ctx.set_source_surface(src.surface(), 0.0, 0.0)?;
        ctx.paint()?;
        ctx.restore()?;
        Ok(())
    }

    /// Extracts the pixels inside `rect`, clipped to `polygon`, into a new
    /// detached layer of the rectangle's size.
    ///
    /// Pixels inside the rectangle but outside the polygon are left
    /// transparent in the result, so the extracted bitmap matches exactly the
    /// hole [`Layer::clear_polygon`] leaves behind.
    pub fn extract_polygon(&self, polygon: &[Point], rect: Rect) -> Result<Layer> {
        let cut = Layer::new(rect.width.ceil() as i32, rect.height.ceil() as i32)?;
        let ctx = cut.context()?;
        ctx.set_antialias(cairo::Antialias::None);
        trace_polygon(&ctx, polygon, -rect.x, -rect.y);
        ctx.clip();
        ctx.set_source_surface(self.surface(), -rect.x, -rect.y)?;
        ctx.paint()?;
        Ok(cut)
    }

    /// Encodes the layer as PNG bytes for session persistence.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.surface.write_to_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Decodes PNG bytes back into a layer.
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let surface = cairo::ImageSurface::create_from_png(&mut reader)?;
        Ok(Self::from_surface(surface))
    }

    /// Copies the full pixel buffer out for an undo snapshot.
    pub fn snapshot_pixels(&mut self) -> Result<Vec<u8>> {
        self.surface.flush();
        let data = self.surface.data()?;
        Ok(data.to_vec())
    }

    /// Overwrites the pixel buffer from a previously taken snapshot.
    pub fn restore_pixels(&mut self, snapshot: &[u8]) -> Result<()> {
        self.surface.flush();
        let mut data = self.surface.data()?;
        if data.len() != snapshot.len() {
            return Err(BoardError::SnapshotMismatch {
                snapshot: snapshot.len(),
                surface: data.len(),
            });
        }
        data.copy_from_slice(snapshot);
        drop(data);
        self.surface.mark_dirty();
        Ok(())
    }

    /// Reads one pixel as a packed native-endian ARGB word.
    ///
    /// Intended for tests and hit feedback; returns 0 for out-of-bounds reads.
    pub fn pixel(&mut self, x: i32, y: i32) -> Result<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return Ok(0);
        }
        self.surface.flush();
        let stride = self.surface.stride() as usize;
        let data = self.surface.data()?;
        let offset = y as usize * stride + x as usize * 4;
        let bytes: [u8; 4] = data[offset..offset + 4]
            .try_into()
            .unwrap_or([0, 0, 0, 0]);
        Ok(u32::from_ne_bytes(bytes))
    }
}

/// Appends a closed polygon path to the context, offset by `(dx, dy)`.
fn trace_polygon(ctx: &cairo::Context, polygon: &[Point], dx: f64, dy: f64) {
    let mut iter = polygon.iter();
    if let Some(first) = iter.next() {
        ctx.move_to(first.x + dx, first.y + dy);
        for p in iter {
            ctx.line_to(p.x + dx, p.y + dy);
        }
        ctx.close_path();
    }
}
