//! Compass tool sub-state: staged centers, sweep tracking, and the radius lock.

use crate::error::{BoardError, Result};
use crate::util::Point;
use log::debug;

use super::tool::CompassMode;

/// Where the compass is in its multi-click lifecycle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum CompassState {
    #[default]
    Idle,
    /// Arc mode: the center is placed, waiting for the second press.
    CenterSet { center: Point },
    /// Circle mode: dragging from the center toward the rim.
    DrawingCircle { center: Point, radius: f64 },
    /// Arc mode: sweeping from the start point, radius already fixed.
    DrawingArc {
        center: Point,
        radius: f64,
        start_angle: f64,
        start: Point,
    },
}

/// Compass mode, lifecycle state, and the sticky radius memory.
///
/// The lock survives tool switches and aborted shapes on purpose: a drafter
/// locks a radius once and then strikes several congruent circles from
/// different centers.
#[derive(Debug, Default)]
pub struct Compass {
    pub(crate) state: CompassState,
    mode: CompassMode,
    locked_radius: Option<f64>,
    last_radius: f64,
}

impl Compass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CompassState {
        &self.state
    }

    pub fn mode(&self) -> CompassMode {
        self.mode
    }

    /// Switches between arc and circle mode, dropping any staged center.
    pub fn set_mode(&mut self, mode: CompassMode) {
        self.mode = mode;
        self.state = CompassState::Idle;
    }

    /// True while a center is staged or a shape is being dragged.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, CompassState::Idle)
    }

    pub fn locked_radius(&self) -> Option<f64> {
        self.locked_radius
    }

    pub fn is_locked(&self) -> bool {
        self.locked_radius.is_some()
    }

    /// Radius of the most recently completed circle or arc.
    pub fn last_radius(&self) -> f64 {
        self.last_radius
    }

    /// Remembers a completed radius so a later lock can reuse it.
    pub fn note_radius(&mut self, radius: f64) {
        if radius > 0.0 {
            self.last_radius = radius;
        }
    }

    /// Engages or releases the radius lock.
    ///
    /// Locking captures the last completed radius; there is nothing to
    /// capture before the first circle or arc, so that case is an error the
    /// toolbar surfaces to the user. Returns the new lock state.
    pub fn toggle_lock(&mut self) -> Result<bool> {
        if self.locked_radius.take().is_some() {
            debug!("compass radius unlocked");
            return Ok(false);
        }
        if self.last_radius <= 0.0 {
            return Err(BoardError::RadiusUnset);
        }
        debug!("compass radius locked at {:.1}", self.last_radius);
        self.locked_radius = Some(self.last_radius);
        Ok(true)
    }

    /// The locked radius if engaged, otherwise `fallback`.
    pub fn effective_radius(&self, fallback: f64) -> f64 {
        self.locked_radius.unwrap_or(fallback)
    }

    /// Aborts any staged center or in-progress shape. The lock is kept.
    pub fn reset(&mut self) {
        self.state = CompassState::Idle;
    }
}
