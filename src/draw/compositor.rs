//! Layer compositor: persistent canvas + preview overlay + background.
//!
//! The visible output is always `background ∘ main ∘ preview`. The main
//! layer holds committed pixels; the preview holds the current gesture's
//! guides and floats and is cleared between frames by the state machine.

use crate::error::Result;

use super::color::Color;
use super::layer::Layer;

/// Owns the raster layers and merges them into a displayable surface.
#[derive(Debug)]
pub struct Compositor {
    background: Color,
    main: Layer,
    preview: Layer,
    width: i32,
    height: i32,
}

impl Compositor {
    /// Creates transparent main/preview layers over a solid background.
    pub fn new(width: i32, height: i32, background: Color) -> Result<Self> {
        Ok(Self {
            background,
            main: Layer::new(width, height)?,
            preview: Layer::new(width, height)?,
            width,
            height,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// The persistent layer all tools commit into.
    pub fn main(&self) -> &Layer {
        &self.main
    }

    pub fn main_mut(&mut self) -> &mut Layer {
        &mut self.main
    }

    /// The transient overlay previews are drawn onto.
    pub fn preview(&self) -> &Layer {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut Layer {
        &mut self.preview
    }

    /// Wipes the preview overlay. Called at every gesture boundary and at the
    /// start of every preview frame.
    pub fn clear_preview(&mut self) -> Result<()> {
        self.preview.clear()
    }

    /// Flattens background, main, and preview into a new opaque layer.
    ///
    /// The result is what a display backend would present; it is also the
    /// input to PNG export.
    pub fn flatten(&self) -> Result<Layer> {
        let out = Layer::new(self.width, self.height)?;
        let ctx = out.context()?;
        let bg = self.background;
        ctx.set_source_rgba(bg.r, bg.g, bg.b, bg.a);
        ctx.paint()?;
        ctx.set_source_surface(self.main.surface(), 0.0, 0.0)?;
        ctx.paint()?;
        ctx.set_source_surface(self.preview.surface(), 0.0, 0.0)?;
        ctx.paint()?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, WHITE};
    use crate::util::Point;

    #[test]
    fn flatten_merges_layers_over_background() {
        let mut comp = Compositor::new(32, 32, WHITE).unwrap();
        comp.main_mut()
            .fill_dot(Point::new(8.0, 8.0), 3.0, BLACK)
            .unwrap();
        comp.preview_mut()
            .fill_dot(Point::new(24.0, 24.0), 3.0, BLACK)
            .unwrap();

        let mut flat = comp.flatten().unwrap();
        // Committed pixel, preview pixel, and background all present.
        assert_eq!(flat.pixel(8, 8).unwrap() & 0x00ff_ffff, 0);
        assert_eq!(flat.pixel(24, 24).unwrap() & 0x00ff_ffff, 0);
        assert_eq!(flat.pixel(16, 16).unwrap(), 0xffff_ffff);
    }

    #[test]
    fn clear_preview_leaves_main_untouched() {
        let mut comp = Compositor::new(32, 32, WHITE).unwrap();
        comp.main_mut()
            .fill_dot(Point::new(8.0, 8.0), 3.0, BLACK)
            .unwrap();
        comp.preview_mut()
            .fill_dot(Point::new(8.0, 8.0), 3.0, BLACK)
            .unwrap();

        comp.clear_preview().unwrap();
        assert_eq!(comp.preview_mut().pixel(8, 8).unwrap(), 0);
        assert_ne!(comp.main_mut().pixel(8, 8).unwrap(), 0);
    }
}
