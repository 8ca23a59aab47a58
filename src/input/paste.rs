//! Paste placement: a two-press lifecycle for externally decoded bitmaps.

use crate::draw::Layer;
use crate::util::Point;

/// Which press the paste session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PasteStage {
    /// The translucent preview follows the pointer.
    Positioning,
    /// The first press fixed the center; the size channel now resizes the
    /// preview in place until the second press commits it.
    Resizing { center: Point },
}

/// An undropped paste bitmap and its placement state.
///
/// The bitmap arrives pre-decoded as a [`Layer`]; image decoding and
/// clipboard access live outside the core. The scale is not stored here: it
/// is always read live from the shared size channel so the toolbar slider
/// resizes the preview with no extra plumbing.
#[derive(Debug)]
pub struct PasteSession {
    image: Layer,
    stage: PasteStage,
    cursor: Option<Point>,
}

impl PasteSession {
    pub fn new(image: Layer) -> Self {
        Self {
            image,
            stage: PasteStage::Positioning,
            cursor: None,
        }
    }

    pub fn image(&self) -> &Layer {
        &self.image
    }

    pub fn stage(&self) -> PasteStage {
        self.stage
    }

    /// Records the hover position while positioning.
    pub fn set_cursor(&mut self, p: Point) {
        self.cursor = Some(p);
    }

    /// Fixes the placement center and moves on to the resize stage.
    pub fn begin_resize(&mut self, center: Point) {
        self.stage = PasteStage::Resizing { center };
    }

    /// Where the preview is currently centered, if the pointer has been seen.
    pub fn preview_center(&self) -> Option<Point> {
        match self.stage {
            PasteStage::Resizing { center } => Some(center),
            PasteStage::Positioning => self.cursor,
        }
    }

    /// Consumes the session, yielding the bitmap for the final commit.
    pub fn into_image(self) -> Layer {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_center_tracks_stage() {
        let mut session = PasteSession::new(Layer::new(16, 16).unwrap());
        assert_eq!(session.preview_center(), None);

        session.set_cursor(Point::new(40.0, 50.0));
        assert_eq!(session.preview_center(), Some(Point::new(40.0, 50.0)));

        session.begin_resize(Point::new(100.0, 100.0));
        session.set_cursor(Point::new(5.0, 5.0));
        // Once fixed, the center ignores further pointer motion.
        assert_eq!(session.preview_center(), Some(Point::new(100.0, 100.0)));
    }
}
