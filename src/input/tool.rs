//! Tool selection and shared tool settings.

use crate::draw::Color;

/// Active drawing tool.
///
/// Exactly one tool owns the pointer stream at a time; the state machine in
/// [`crate::input::InputState`] demultiplexes events based on this selection
/// and the tool's own sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Freehand strokes or discrete anchor points (see [`PenMode`])
    Pen,
    /// Straight snapped segments with a dashed preview
    Ruler,
    /// Circles and arcs around a staged center (see [`CompassMode`])
    Compass,
    /// Freehand destination-removal strokes
    Eraser,
    /// Rectangular drag-to-clear
    SelectErase,
    /// Free-form cut, float, and re-commit
    Lasso,
    /// Two-stage placement of an externally decoded bitmap
    Paste,
}

/// Sub-mode of the pen tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenMode {
    /// Continuous stroke following the pointer
    #[default]
    Freehand,
    /// Single-click anchor dots that feed the snap index
    Point,
}

/// Sub-mode of the compass tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompassMode {
    /// Two clicks: stage the center, then sweep an arc
    #[default]
    Arc,
    /// One drag: press the center, release at the radius
    Circle,
}

/// Divisor mapping the shared size channel to a bitmap scale factor.
///
/// The toolbar exposes a single numeric size control. The pen reads it as a
/// stroke width; paste and lasso read it through [`ToolSettings::bitmap_scale`]
/// so that a control value of 20 means unscaled (1.0).
pub const SIZE_SCALE_DIVISOR: f64 = 20.0;

/// Process-wide drawing parameters, mutated by the toolbar and read by every
/// drawing operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    /// The shared size channel (stroke width in surface units).
    pub line_width: f64,
    /// Current stroke/fill color.
    pub line_color: Color,
}

impl ToolSettings {
    pub fn new(line_width: f64, line_color: Color) -> Self {
        Self {
            line_width,
            line_color,
        }
    }

    /// Interpretation of the size channel for stroke-based tools.
    pub fn stroke_width(&self) -> f64 {
        self.line_width
    }

    /// Interpretation of the size channel for paste/lasso resizing.
    pub fn bitmap_scale(&self) -> f64 {
        self.line_width / SIZE_SCALE_DIVISOR
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            line_width: 5.0,
            line_color: crate::draw::color::BLACK,
        }
    }
}
