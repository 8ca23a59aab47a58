//! Lasso engine: path capture, pixel cut, floating transform, and commit.
//!
//! The lasso lifts a polygon-clipped region of the persistent layer into a
//! detached floating bitmap, lets the user drag and rescale it across any
//! number of gestures, and finally merges it back. Anchor points inside the
//! cut polygon are carried along under the same affine transform so snapping
//! keeps working on the moved geometry.

use crate::draw::Layer;
use crate::error::Result;
use crate::util::{Point, Rect, point_in_polygon};
use log::{debug, info};

/// A cut region hovering above the canvas, not yet merged back.
#[derive(Debug)]
pub struct FloatingSelection {
    /// The polygon-clipped pixels lifted off the persistent layer.
    image: Layer,
    /// Original selection polygon, kept in surface coordinates for the
    /// anchor-point migration at commit time.
    path: Vec<Point>,
    /// Top-left of the cut bounding box in surface coordinates.
    origin: Point,
    /// Cumulative drag delta.
    offset: Point,
    /// Uniform scale applied around the origin.
    scale: f64,
}

impl FloatingSelection {
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn image(&self) -> &Layer {
        &self.image
    }

    /// Current on-surface position of the floating bitmap's top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.origin.x + self.offset.x, self.origin.y + self.offset.y)
    }

    /// The transformed rectangle the floating bitmap currently covers.
    ///
    /// Pointer presses inside this rectangle start a drag; presses outside
    /// commit the selection.
    pub fn bounds(&self) -> Rect {
        let pos = self.position();
        Rect {
            x: pos.x,
            y: pos.y,
            width: self.image.width() as f64 * self.scale,
            height: self.image.height() as f64 * self.scale,
        }
    }
}

/// Lasso sub-state; see the state machine in the module docs.
#[derive(Debug, Default)]
pub enum LassoState {
    #[default]
    Idle,
    /// Capturing the free-form selection polyline while the pointer is down.
    Selecting { path: Vec<Point> },
    /// A cut region is floating and movable/resizable.
    Floating(FloatingSelection),
}

/// Drives the lasso lifecycle: select, cut, float, commit.
#[derive(Debug, Default)]
pub struct LassoEngine {
    state: LassoState,
}

impl LassoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LassoState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, LassoState::Idle)
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, LassoState::Selecting { .. })
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.state, LassoState::Floating(_))
    }

    pub fn floating(&self) -> Option<&FloatingSelection> {
        match &self.state {
            LassoState::Floating(float) => Some(float),
            _ => None,
        }
    }

    /// Starts capturing a new selection polyline at the press point.
    pub fn begin(&mut self, p: Point) {
        self.state = LassoState::Selecting { path: vec![p] };
    }

    /// Appends a move sample to the selection polyline.
    pub fn extend(&mut self, p: Point) {
        if let LassoState::Selecting { path } = &mut self.state {
            path.push(p);
        }
    }

    /// The selection polyline captured so far, if selecting.
    pub fn selection_path(&self) -> Option<&[Point]> {
        match &self.state {
            LassoState::Selecting { path } => Some(path),
            _ => None,
        }
    }

    /// Number of captured samples; selections below 3 are discarded.
    pub fn selection_len(&self) -> usize {
        self.selection_path().map_or(0, |p| p.len())
    }

    /// Completes the selection: extracts the polygon-clipped pixels from
    /// `layer` into a floating bitmap and clears the source region.
    ///
    /// Returns `true` when a floating selection was produced. Degenerate
    /// selections (zero-area bounding box) silently return to idle. The
    /// caller is responsible for recording a history snapshot beforehand;
    /// the cut is the single undoable step of the whole lasso lifecycle.
    pub fn cut(&mut self, layer: &mut Layer) -> Result<bool> {
        let path = match std::mem::take(&mut self.state) {
            LassoState::Selecting { path } => path,
            other => {
                self.state = other;
                return Ok(false);
            }
        };

        let mut min = path[0];
        let mut max = path[0];
        for p in &path[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let rect = Rect {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        };
        if !rect.is_valid() {
            debug!("lasso selection has a degenerate bounding box, discarding");
            return Ok(false);
        }

        let image = layer.extract_polygon(&path, rect)?;
        layer.clear_polygon(&path, rect)?;
        info!(
            "lasso cut {}x{} at ({:.0}, {:.0})",
            image.width(),
            image.height(),
            rect.x,
            rect.y
        );

        self.state = LassoState::Floating(FloatingSelection {
            image,
            path,
            origin: Point::new(rect.x, rect.y),
            offset: Point::new(0.0, 0.0),
            scale: 1.0,
        });
        Ok(true)
    }

    /// Accumulates a drag delta into the floating offset.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        if let LassoState::Floating(float) = &mut self.state {
            float.offset.x += dx;
            float.offset.y += dy;
        }
    }

    /// Applies a new uniform scale from the shared size channel.
    ///
    /// Resizing a float is not an undoable step by itself; only the cut and
    /// the final commit bracket the history entry.
    pub fn set_scale(&mut self, scale: f64) {
        if let LassoState::Floating(float) = &mut self.state {
            float.scale = scale;
        }
    }

    /// Merges the floating bitmap back into `layer` at its current transform
    /// and migrates the anchor points that were inside the cut polygon.
    ///
    /// Each such anchor moves to `position + (anchor - origin) * scale`, the
    /// same affine transform applied to the pixels. Anchors outside the
    /// polygon are untouched even when inside the bounding box. No history
    /// snapshot is taken here: cut + drags + commit collapse into the single
    /// undo step recorded at cut time.
    pub fn commit(&mut self, layer: &mut Layer, anchors: &mut [Point]) -> Result<bool> {
        let float = match std::mem::take(&mut self.state) {
            LassoState::Floating(float) => float,
            other => {
                self.state = other;
                return Ok(false);
            }
        };

        let pos = float.position();
        layer.paint_layer(&float.image, pos.x, pos.y, float.scale)?;

        let mut migrated = 0usize;
        for anchor in anchors.iter_mut() {
            if point_in_polygon(*anchor, &float.path) {
                anchor.x = pos.x + (anchor.x - float.origin.x) * float.scale;
                anchor.y = pos.y + (anchor.y - float.origin.y) * float.scale;
                migrated += 1;
            }
        }
        info!(
            "lasso committed at ({:.0}, {:.0}) scale {:.2}, {} anchor(s) migrated",
            pos.x, pos.y, float.scale, migrated
        );
        Ok(true)
    }

    /// Drops any in-progress selection or floating bitmap.
    pub fn reset(&mut self) {
        self.state = LassoState::Idle;
    }
}
