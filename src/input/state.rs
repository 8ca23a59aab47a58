//! The pointer-driven tool state machine.
//!
//! [`InputState`] owns the compositor, the anchor index, the history stacks,
//! and every tool's transient sub-state, and demultiplexes the raw pointer
//! stream (down, move, up, leave) to whichever tool is selected. All history
//! snapshots are recorded here, immediately before the mutation they protect,
//! so the undo granularity is exactly one gesture.

use crate::config::Config;
use crate::draw::{Compositor, Layer, color, preview};
use crate::error::Result;
use crate::history::{History, Snapshot};
use crate::lasso::LassoEngine;
use crate::snap::{SNAP_DISTANCE, SnapIndex};
use crate::util::{Point, Rect, cross_from_center};
use log::{debug, info};

use super::compass::{Compass, CompassState};
use super::paste::{PasteSession, PasteStage};
use super::tool::{CompassMode, PenMode, SIZE_SCALE_DIVISOR, Tool, ToolSettings};

/// Radius of the dots placed by the point pen mode.
pub const POINT_RADIUS: f64 = 6.0;

/// The drag currently in flight, if any.
///
/// Compass drags are not tracked here; the compass keeps its own richer
/// state because its lifecycle spans multiple press/release pairs.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Gesture {
    #[default]
    Idle,
    /// Freehand pen or eraser stroke; `last` is the previous sample.
    Stroke { last: Point },
    /// Ruler drag from the snapped start point.
    Ruler { start: Point },
    /// Select-erase drag; `current` is the last move sample, which is also
    /// the corner used at commit time.
    SelectErase { start: Point, current: Point },
    /// Capturing the lasso selection polyline.
    LassoSelect,
    /// Dragging a floating lasso selection.
    LassoDrag { last: Point },
}

/// Central interaction state for one drawing surface.
pub struct InputState {
    compositor: Compositor,
    snap: SnapIndex,
    history: History,
    settings: ToolSettings,
    tool: Option<Tool>,
    pen_mode: PenMode,
    compass: Compass,
    lasso: LassoEngine,
    paste: Option<PasteSession>,
    gesture: Gesture,
    needs_redraw: bool,
}

impl InputState {
    /// Creates a surface with default settings (black pen, white background).
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Self::build(width, height, color::WHITE, ToolSettings::default(), None)
    }

    /// Creates a surface configured from a loaded [`Config`].
    pub fn with_config(width: i32, height: i32, config: &Config) -> Result<Self> {
        let settings = ToolSettings::new(
            config.drawing.default_line_width,
            config.drawing.color(),
        );
        Self::build(
            width,
            height,
            config.board.background_color(),
            settings,
            Some(config.history.max_depth),
        )
    }

    fn build(
        width: i32,
        height: i32,
        background: color::Color,
        settings: ToolSettings,
        history_depth: Option<usize>,
    ) -> Result<Self> {
        Ok(Self {
            compositor: Compositor::new(width, height, background)?,
            snap: SnapIndex::new(),
            history: history_depth.map_or_else(History::default, History::new),
            settings,
            tool: None,
            pen_mode: PenMode::default(),
            compass: Compass::new(),
            lasso: LassoEngine::new(),
            paste: None,
            gesture: Gesture::Idle,
            needs_redraw: true,
        })
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    pub fn snap(&self) -> &SnapIndex {
        &self.snap
    }

    pub fn settings(&self) -> ToolSettings {
        self.settings
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn pen_mode(&self) -> PenMode {
        self.pen_mode
    }

    pub fn compass_mode(&self) -> CompassMode {
        self.compass.mode()
    }

    pub fn is_radius_locked(&self) -> bool {
        self.compass.is_locked()
    }

    pub fn lasso(&self) -> &LassoEngine {
        &self.lasso
    }

    pub fn is_pasting(&self) -> bool {
        self.paste.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// True when the visible output changed since the last
    /// [`InputState::clear_redraw_request`].
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn clear_redraw_request(&mut self) {
        self.needs_redraw = false;
    }

    /// Selects a tool (or deselects with `None`), committing or aborting any
    /// transient state the outgoing tool left behind.
    ///
    /// A floating lasso selection is committed in place; a staged compass
    /// center and an unplaced paste bitmap are discarded. Pen, ruler, and
    /// compass apply their preset widths to the shared size channel, matching
    /// the toolbar behavior.
    pub fn select_tool(&mut self, tool: Option<Tool>) -> Result<()> {
        if tool != Some(Tool::Compass) && self.compass.is_active() {
            self.compass.reset();
            self.compositor.clear_preview()?;
        }
        if tool != Some(Tool::Paste) && self.paste.take().is_some() {
            self.compositor.clear_preview()?;
        }
        if self.tool == Some(Tool::Lasso) && tool != Some(Tool::Lasso) {
            if self.lasso.is_floating() {
                self.commit_lasso()?;
            }
            self.lasso.reset();
        }
        self.gesture = Gesture::Idle;
        self.tool = tool;

        match tool {
            Some(Tool::Pen) => self.settings.line_width = pen_preset(self.pen_mode),
            Some(Tool::Ruler) | Some(Tool::Compass) => self.settings.line_width = 2.0,
            _ => {}
        }
        debug!("tool selected: {:?}", tool);
        self.needs_redraw = true;
        Ok(())
    }

    /// Switches the pen sub-mode, re-applying the width preset when the pen
    /// is the active tool.
    pub fn set_pen_mode(&mut self, mode: PenMode) {
        self.pen_mode = mode;
        if self.tool == Some(Tool::Pen) {
            self.settings.line_width = pen_preset(mode);
        }
    }

    /// Switches the compass sub-mode, aborting any staged center.
    pub fn set_compass_mode(&mut self, mode: CompassMode) -> Result<()> {
        if self.compass.mode() != mode {
            self.compass.set_mode(mode);
            self.compositor.clear_preview()?;
            self.needs_redraw = true;
        }
        Ok(())
    }

    /// Engages or releases the compass radius lock; see [`Compass::toggle_lock`].
    pub fn toggle_radius_lock(&mut self) -> Result<bool> {
        self.compass.toggle_lock()
    }

    /// Sets the shared size channel.
    ///
    /// A floating lasso selection and an active paste preview are rescaled
    /// live; neither rescale is an undoable step on its own.
    pub fn set_line_width(&mut self, width: f64) -> Result<()> {
        self.settings.line_width = width;
        if self.lasso.is_floating() {
            self.lasso.set_scale(self.settings.bitmap_scale());
            self.render_floating_preview()?;
        }
        if self.paste.is_some() {
            self.render_paste_preview()?;
        }
        Ok(())
    }

    pub fn set_line_color(&mut self, line_color: color::Color) {
        self.settings.line_color = line_color;
    }

    /// Starts placing an externally decoded bitmap.
    ///
    /// The preview picks up whatever the size channel currently holds, so
    /// the host's slider value carries straight into the paste scale; the
    /// caller feeds pointer events as usual and the second press commits.
    pub fn begin_paste(&mut self, image: Layer) -> Result<()> {
        self.select_tool(Some(Tool::Paste))?;
        self.paste = Some(PasteSession::new(image));
        info!("paste session started");
        Ok(())
    }

    /// Handles a pointer press.
    pub fn on_pointer_down(&mut self, pos: Point) -> Result<()> {
        let Some(tool) = self.tool else {
            return Ok(());
        };
        match tool {
            Tool::Paste => self.paste_down(pos)?,
            Tool::Lasso => self.lasso_down(pos)?,
            Tool::Pen if self.pen_mode == PenMode::Point => {
                self.record_history()?;
                let p = self.snap.query(pos);
                self.compositor
                    .main_mut()
                    .fill_dot(p, POINT_RADIUS, self.settings.line_color)?;
                self.snap.push(p);
            }
            Tool::Pen | Tool::Eraser => {
                self.record_history()?;
                self.gesture = Gesture::Stroke { last: pos };
            }
            Tool::Ruler => {
                self.record_history()?;
                let start = self.snap.query(pos);
                self.gesture = Gesture::Ruler { start };
            }
            Tool::Compass => self.compass_down(pos)?,
            Tool::SelectErase => {
                self.record_history()?;
                self.gesture = Gesture::SelectErase {
                    start: pos,
                    current: pos,
                };
            }
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Handles a pointer move.
    pub fn on_pointer_move(&mut self, pos: Point) -> Result<()> {
        let Some(tool) = self.tool else {
            return Ok(());
        };
        match tool {
            Tool::Paste => {
                if let Some(session) = self.paste.as_mut() {
                    if session.stage() == PasteStage::Positioning {
                        session.set_cursor(pos);
                    }
                    self.render_paste_preview()?;
                }
            }
            Tool::Lasso => match self.gesture {
                Gesture::LassoSelect => {
                    self.lasso.extend(pos);
                    self.compositor.clear_preview()?;
                    if let Some(path) = self.lasso.selection_path() {
                        preview::render_lasso_path(self.compositor.preview(), path)?;
                    }
                }
                Gesture::LassoDrag { last } => {
                    self.lasso.move_by(pos.x - last.x, pos.y - last.y);
                    self.gesture = Gesture::LassoDrag { last: pos };
                    self.render_floating_preview()?;
                }
                _ => return Ok(()),
            },
            Tool::Pen | Tool::Eraser => {
                let Gesture::Stroke { last } = self.gesture else {
                    return Ok(());
                };
                self.compositor.main_mut().stroke_segment(
                    last,
                    pos,
                    self.settings.line_color,
                    self.settings.stroke_width(),
                    tool == Tool::Eraser,
                )?;
                self.gesture = Gesture::Stroke { last: pos };
            }
            Tool::Ruler => {
                let snapped = self.snap.query(pos);
                self.compositor.clear_preview()?;
                if let Gesture::Ruler { start } = self.gesture {
                    preview::render_dashed_segment(
                        self.compositor.preview(),
                        start,
                        snapped,
                        self.settings.line_color,
                        self.settings.stroke_width(),
                    )?;
                }
                if snapped != pos {
                    preview::render_snap_indicator(
                        self.compositor.preview(),
                        snapped,
                        SNAP_DISTANCE,
                    )?;
                }
            }
            Tool::Compass => self.compass_move(pos)?,
            Tool::SelectErase => {
                let Gesture::SelectErase { start, .. } = self.gesture else {
                    return Ok(());
                };
                self.gesture = Gesture::SelectErase {
                    start,
                    current: pos,
                };
                self.compositor.clear_preview()?;
                preview::render_selection_rect(
                    self.compositor.preview(),
                    Rect::from_points(start, pos),
                )?;
            }
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Handles a pointer release.
    pub fn on_pointer_up(&mut self, pos: Point) -> Result<()> {
        let Some(tool) = self.tool else {
            return Ok(());
        };
        match tool {
            // Paste commits on its second press; the pen's point mode
            // commits on the press as well. Neither has release work.
            Tool::Paste => return Ok(()),
            Tool::Pen | Tool::Eraser => {
                self.gesture = Gesture::Idle;
            }
            Tool::Lasso => self.lasso_up()?,
            Tool::Ruler => {
                let Gesture::Ruler { start } = self.gesture else {
                    return Ok(());
                };
                // The release position snaps independently of the start, so
                // both endpoints can magnetize to different anchors.
                let end = self.snap.query(pos);
                self.compositor.main_mut().stroke_segment(
                    start,
                    end,
                    self.settings.line_color,
                    self.settings.stroke_width(),
                    false,
                )?;
                self.gesture = Gesture::Idle;
                self.compositor.clear_preview()?;
            }
            Tool::Compass => self.compass_up(pos)?,
            Tool::SelectErase => {
                let Gesture::SelectErase { start, current } = self.gesture else {
                    return Ok(());
                };
                // The rectangle ends at the last move sample, not the release
                // position, so a release that jumps far away cannot erase
                // more than the user saw in the preview.
                let rect = Rect::from_points(start, current);
                if rect.is_valid() {
                    self.compositor.main_mut().clear_rect(rect)?;
                }
                self.gesture = Gesture::Idle;
                self.compositor.clear_preview()?;
            }
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Handles the pointer leaving the surface.
    ///
    /// An in-progress compass shape is aborted outright; every other gesture
    /// is finished as if the pointer had been released at the exit position.
    pub fn on_pointer_leave(&mut self, pos: Point) -> Result<()> {
        if self.tool == Some(Tool::Compass) && self.compass.is_active() {
            self.compass.reset();
            self.gesture = Gesture::Idle;
            self.compositor.clear_preview()?;
            self.needs_redraw = true;
            return Ok(());
        }
        self.on_pointer_up(pos)
    }

    /// Restores the most recent undo snapshot. Returns false when the undo
    /// stack is empty.
    pub fn undo(&mut self) -> Result<bool> {
        if !self.history.can_undo() {
            return Ok(false);
        }
        let current = self.current_snapshot()?;
        match self.history.undo(current) {
            Some(snapshot) => {
                self.apply_snapshot(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-applies the most recently undone snapshot. Returns false when the
    /// redo stack is empty.
    pub fn redo(&mut self) -> Result<bool> {
        if !self.history.can_redo() {
            return Ok(false);
        }
        let current = self.current_snapshot()?;
        match self.history.redo(current) {
            Some(snapshot) => {
                self.apply_snapshot(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wipes the persistent layer and the anchor index as one undoable step.
    pub fn clear_all(&mut self) -> Result<()> {
        self.record_history()?;
        self.compositor.main_mut().clear()?;
        self.snap.clear();
        self.compositor.clear_preview()?;
        self.lasso.reset();
        self.compass.reset();
        self.gesture = Gesture::Idle;
        info!("board cleared");
        self.needs_redraw = true;
        Ok(())
    }

    /// Replaces the board contents from a persisted session.
    ///
    /// History is reset: restored state is a new baseline, not an undoable
    /// continuation of whatever was on the board before the load.
    pub fn load_board(&mut self, pixels: &[u8], anchors: Vec<Point>) -> Result<()> {
        self.compositor.main_mut().restore_pixels(pixels)?;
        self.snap.replace(anchors);
        self.history.reset();
        self.lasso.reset();
        self.compass.reset();
        self.paste = None;
        self.gesture = Gesture::Idle;
        self.compositor.clear_preview()?;
        self.needs_redraw = true;
        Ok(())
    }

    /// Replaces the board contents from a decoded layer, e.g. a restored
    /// session raster whose dimensions may differ from the live surface.
    ///
    /// The image is painted at the origin with no scaling; oversized content
    /// is cropped and undersized content leaves the remainder transparent.
    pub fn load_layer(&mut self, image: &Layer, anchors: Vec<Point>) -> Result<()> {
        let main = self.compositor.main_mut();
        main.clear()?;
        main.paint_layer(image, 0.0, 0.0, 1.0)?;
        self.snap.replace(anchors);
        self.history.reset();
        self.lasso.reset();
        self.compass.reset();
        self.paste = None;
        self.gesture = Gesture::Idle;
        self.compositor.clear_preview()?;
        self.needs_redraw = true;
        Ok(())
    }

    /// Flattens the current board for display or export.
    pub fn flatten(&self) -> Result<Layer> {
        self.compositor.flatten()
    }

    fn record_history(&mut self) -> Result<()> {
        let snapshot = self.current_snapshot()?;
        self.history.record(snapshot);
        Ok(())
    }

    fn current_snapshot(&mut self) -> Result<Snapshot> {
        Ok(Snapshot {
            pixels: self.compositor.main_mut().snapshot_pixels()?,
            anchors: self.snap.to_vec(),
        })
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        self.compositor.main_mut().restore_pixels(&snapshot.pixels)?;
        self.snap.replace(snapshot.anchors);
        self.compositor.clear_preview()?;
        self.needs_redraw = true;
        Ok(())
    }

    fn paste_down(&mut self, pos: Point) -> Result<()> {
        let Some(session) = self.paste.as_mut() else {
            return Ok(());
        };
        match session.stage() {
            PasteStage::Positioning => {
                session.begin_resize(pos);
                self.render_paste_preview()?;
            }
            PasteStage::Resizing { center } => {
                self.record_history()?;
                if let Some(session) = self.paste.take() {
                    let image = session.into_image();
                    let scale = self.settings.bitmap_scale();
                    let x = center.x - image.width() as f64 * scale / 2.0;
                    let y = center.y - image.height() as f64 * scale / 2.0;
                    self.compositor.main_mut().paint_layer(&image, x, y, scale)?;
                    self.compositor.clear_preview()?;
                    self.tool = None;
                    info!(
                        "paste committed at ({:.0}, {:.0}) scale {:.2}",
                        center.x, center.y, scale
                    );
                }
            }
        }
        Ok(())
    }

    fn lasso_down(&mut self, pos: Point) -> Result<()> {
        if let Some(float) = self.lasso.floating() {
            if float.bounds().contains(pos) {
                self.gesture = Gesture::LassoDrag { last: pos };
            } else {
                self.commit_lasso()?;
            }
            return Ok(());
        }
        self.lasso.begin(pos);
        self.gesture = Gesture::LassoSelect;
        self.compositor.clear_preview()
    }

    fn lasso_up(&mut self) -> Result<()> {
        match self.gesture {
            Gesture::LassoSelect => {
                self.gesture = Gesture::Idle;
                if self.lasso.selection_len() < 3 {
                    self.lasso.reset();
                    return self.compositor.clear_preview();
                }
                self.record_history()?;
                if self.lasso.cut(self.compositor.main_mut())? {
                    // The cut bitmap starts unscaled; pinning the size
                    // channel to the divisor keeps the slider and the float
                    // in agreement.
                    self.settings.line_width = SIZE_SCALE_DIVISOR;
                    self.render_floating_preview()?;
                } else {
                    self.compositor.clear_preview()?;
                }
            }
            Gesture::LassoDrag { .. } => {
                self.gesture = Gesture::Idle;
            }
            _ => {}
        }
        Ok(())
    }

    fn commit_lasso(&mut self) -> Result<()> {
        if self
            .lasso
            .commit(self.compositor.main_mut(), self.snap.anchors_mut())?
        {
            self.compositor.clear_preview()?;
            self.needs_redraw = true;
        }
        Ok(())
    }

    fn compass_down(&mut self, pos: Point) -> Result<()> {
        match (self.compass.mode(), self.compass.state) {
            (CompassMode::Circle, CompassState::Idle) => {
                self.record_history()?;
                let center = self.snap.query(pos);
                let radius = self.compass.effective_radius(0.0);
                self.compass.state = CompassState::DrawingCircle { center, radius };
                self.compositor.clear_preview()?;
                preview::render_cross(self.compositor.preview(), center)?;
                if radius > 0.0 {
                    preview::render_dashed_circle(self.compositor.preview(), center, radius)?;
                }
            }
            (CompassMode::Arc, CompassState::Idle) => {
                // First press only stages the center; nothing mutates yet, so
                // no history entry until the sweep actually starts.
                let center = self.snap.query(pos);
                self.compass.state = CompassState::CenterSet { center };
                self.compositor.clear_preview()?;
                preview::render_cross(self.compositor.preview(), center)?;
            }
            (CompassMode::Arc, CompassState::CenterSet { center }) => {
                self.record_history()?;
                let start = self.snap.query(pos);
                let radius = self.compass.effective_radius(center.distance_to(start));
                if !self.compass.is_locked() {
                    self.compass.note_radius(radius);
                }
                self.compass.state = CompassState::DrawingArc {
                    center,
                    radius,
                    start_angle: center.angle_to(start),
                    start,
                };
            }
            _ => {}
        }
        Ok(())
    }

    fn compass_move(&mut self, pos: Point) -> Result<()> {
        let snapped = self.snap.query(pos);
        let mut indicate_snap = snapped != pos;
        self.compositor.clear_preview()?;
        match self.compass.state {
            CompassState::Idle => {
                preview::render_cross(self.compositor.preview(), snapped)?;
            }
            CompassState::CenterSet { center } => {
                let radius = self.compass.effective_radius(center.distance_to(snapped));
                preview::render_cross(self.compositor.preview(), center)?;
                preview::render_radius_guide(self.compositor.preview(), center, snapped)?;
                preview::render_dashed_circle(self.compositor.preview(), center, radius)?;
            }
            CompassState::DrawingCircle { center, .. } => {
                let (probe, radius) = if let Some(locked) = self.compass.locked_radius() {
                    // A locked radius ignores the pointer, so no snap ring.
                    indicate_snap = false;
                    (pos, locked)
                } else {
                    (snapped, center.distance_to(snapped))
                };
                self.compass.state = CompassState::DrawingCircle { center, radius };
                preview::render_cross(self.compositor.preview(), center)?;
                preview::render_radius_guide(self.compositor.preview(), center, probe)?;
                preview::render_dashed_circle(self.compositor.preview(), center, radius)?;
            }
            CompassState::DrawingArc {
                center,
                radius,
                start_angle,
                start,
            } => {
                let end_angle = center.angle_to(snapped);
                let counter_clockwise = cross_from_center(center, start, snapped) < 0.0;
                preview::render_cross(self.compositor.preview(), center)?;
                preview::render_dashed_circle(self.compositor.preview(), center, radius)?;
                // The guide stays on the sweep start; the solid arc already
                // tracks the pointer.
                preview::render_radius_guide(self.compositor.preview(), center, start)?;
                preview::render_arc_preview(
                    self.compositor.preview(),
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    counter_clockwise,
                    self.settings.line_color,
                    self.settings.stroke_width(),
                )?;
            }
        }
        if indicate_snap {
            preview::render_snap_indicator(self.compositor.preview(), snapped, SNAP_DISTANCE)?;
        }
        Ok(())
    }

    fn compass_up(&mut self, pos: Point) -> Result<()> {
        match self.compass.state {
            CompassState::DrawingCircle { center, .. } => {
                let radius = if let Some(locked) = self.compass.locked_radius() {
                    locked
                } else {
                    let rim = self.snap.query(pos);
                    center.distance_to(rim)
                };
                self.compositor.main_mut().stroke_circle(
                    center,
                    radius,
                    self.settings.line_color,
                    self.settings.stroke_width(),
                )?;
                if !self.compass.is_locked() {
                    self.compass.note_radius(radius);
                }
                self.compass.state = CompassState::Idle;
                self.compositor.clear_preview()?;
            }
            CompassState::DrawingArc {
                center,
                radius,
                start_angle,
                start,
            } => {
                let end = self.snap.query(pos);
                let end_angle = center.angle_to(end);
                let counter_clockwise = cross_from_center(center, start, end) < 0.0;
                self.compositor.main_mut().stroke_arc(
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    counter_clockwise,
                    self.settings.line_color,
                    self.settings.stroke_width(),
                )?;
                self.compass.state = CompassState::Idle;
                self.compositor.clear_preview()?;
            }
            // A release between the two arc presses keeps the staged center.
            CompassState::CenterSet { .. } | CompassState::Idle => {}
        }
        Ok(())
    }

    fn render_floating_preview(&mut self) -> Result<()> {
        self.compositor.clear_preview()?;
        if let Some(float) = self.lasso.floating() {
            let pos = float.position();
            preview::render_floating_selection(
                self.compositor.preview(),
                float.image(),
                pos.x,
                pos.y,
                float.scale(),
            )?;
        }
        self.needs_redraw = true;
        Ok(())
    }

    fn render_paste_preview(&mut self) -> Result<()> {
        self.compositor.clear_preview()?;
        if let Some(session) = &self.paste {
            if let Some(center) = session.preview_center() {
                preview::render_paste_preview(
                    self.compositor.preview(),
                    session.image(),
                    center,
                    self.settings.bitmap_scale(),
                )?;
            }
        }
        self.needs_redraw = true;
        Ok(())
    }
}

fn pen_preset(mode: PenMode) -> f64 {
    match mode {
        PenMode::Point => 10.0,
        PenMode::Freehand => 5.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;

    fn board() -> InputState {
        InputState::new(400, 400).unwrap()
    }

    fn place_anchor(state: &mut InputState, x: f64, y: f64) {
        state.select_tool(Some(Tool::Pen)).unwrap();
        state.set_pen_mode(PenMode::Point);
        state.on_pointer_down(Point::new(x, y)).unwrap();
        state.on_pointer_up(Point::new(x, y)).unwrap();
    }

    #[test]
    fn point_pen_places_dot_and_anchor() {
        let mut state = board();
        place_anchor(&mut state, 100.0, 100.0);

        assert_eq!(state.snap().len(), 1);
        assert_ne!(state.compositor_mut().main_mut().pixel(100, 100).unwrap(), 0);
        assert!(state.can_undo());
    }

    #[test]
    fn width_presets_follow_tool_selection() {
        let mut state = board();
        state.select_tool(Some(Tool::Ruler)).unwrap();
        assert_eq!(state.settings().line_width, 2.0);

        state.select_tool(Some(Tool::Pen)).unwrap();
        assert_eq!(state.settings().line_width, 5.0);

        state.set_pen_mode(PenMode::Point);
        assert_eq!(state.settings().line_width, 10.0);

        state.select_tool(Some(Tool::Compass)).unwrap();
        assert_eq!(state.settings().line_width, 2.0);
    }

    #[test]
    fn ruler_start_snaps_to_nearby_anchor() {
        let mut state = board();
        place_anchor(&mut state, 100.0, 100.0);

        state.select_tool(Some(Tool::Ruler)).unwrap();
        state.on_pointer_down(Point::new(105.0, 95.0)).unwrap();
        state.on_pointer_move(Point::new(200.0, 100.0)).unwrap();
        state.on_pointer_up(Point::new(200.0, 100.0)).unwrap();

        // The committed segment runs along y = 100 from the snapped anchor.
        assert_ne!(state.compositor_mut().main_mut().pixel(150, 100).unwrap(), 0);
        // Preview cleared after commit.
        assert_eq!(state.compositor_mut().preview_mut().pixel(150, 100).unwrap(), 0);
    }

    #[test]
    fn select_erase_commits_the_last_previewed_rectangle() {
        let mut state = board();
        place_anchor(&mut state, 60.0, 60.0);
        place_anchor(&mut state, 200.0, 200.0);

        state.select_tool(Some(Tool::SelectErase)).unwrap();
        state.on_pointer_down(Point::new(10.0, 10.0)).unwrap();
        state.on_pointer_move(Point::new(80.0, 80.0)).unwrap();
        // Release far outside the previewed rectangle.
        state.on_pointer_up(Point::new(350.0, 350.0)).unwrap();

        assert_eq!(state.compositor_mut().main_mut().pixel(60, 60).unwrap(), 0);
        assert_ne!(state.compositor_mut().main_mut().pixel(200, 200).unwrap(), 0);
    }

    #[test]
    fn undo_and_redo_restore_pixels_and_anchors() {
        let mut state = board();
        place_anchor(&mut state, 50.0, 50.0);
        assert_eq!(state.snap().len(), 1);

        assert!(state.undo().unwrap());
        assert_eq!(state.snap().len(), 0);
        assert_eq!(state.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);
        assert!(state.can_redo());

        assert!(state.redo().unwrap());
        assert_eq!(state.snap().len(), 1);
        assert_ne!(state.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);
    }

    #[test]
    fn empty_history_undo_is_a_no_op() {
        let mut state = board();
        assert!(!state.undo().unwrap());
        assert!(!state.redo().unwrap());
    }

    #[test]
    fn compass_circle_commits_on_release() {
        let mut state = board();
        state.select_tool(Some(Tool::Compass)).unwrap();
        state.set_compass_mode(CompassMode::Circle).unwrap();

        state.on_pointer_down(Point::new(200.0, 200.0)).unwrap();
        state.on_pointer_move(Point::new(240.0, 200.0)).unwrap();
        state.on_pointer_up(Point::new(240.0, 200.0)).unwrap();

        // Rim pixel at radius 40.
        assert_ne!(state.compositor_mut().main_mut().pixel(240, 200).unwrap(), 0);
        // Center stays empty.
        assert_eq!(state.compositor_mut().main_mut().pixel(200, 200).unwrap(), 0);
        // The radius is now lockable.
        assert!(state.toggle_radius_lock().unwrap());
    }

    #[test]
    fn radius_lock_before_any_shape_is_an_error() {
        let mut state = board();
        assert!(matches!(
            state.toggle_radius_lock(),
            Err(BoardError::RadiusUnset)
        ));
    }

    #[test]
    fn arc_sweeps_on_the_pointer_side() {
        let mut state = board();
        state.select_tool(Some(Tool::Compass)).unwrap();

        // First click stages the center, second starts the sweep.
        state.on_pointer_down(Point::new(100.0, 100.0)).unwrap();
        state.on_pointer_up(Point::new(100.0, 100.0)).unwrap();
        state.on_pointer_down(Point::new(150.0, 100.0)).unwrap();
        state.on_pointer_move(Point::new(100.0, 150.0)).unwrap();
        state.on_pointer_up(Point::new(100.0, 150.0)).unwrap();

        // Positive cross product: the quarter arc passes below the start
        // radius, through roughly 45 degrees.
        assert_ne!(state.compositor_mut().main_mut().pixel(135, 135).unwrap(), 0);
        // The opposite sweep stays empty.
        assert_eq!(state.compositor_mut().main_mut().pixel(135, 65).unwrap(), 0);
    }

    #[test]
    fn pointer_leave_aborts_a_compass_shape() {
        let mut state = board();
        state.select_tool(Some(Tool::Compass)).unwrap();
        state.set_compass_mode(CompassMode::Circle).unwrap();

        state.on_pointer_down(Point::new(200.0, 200.0)).unwrap();
        state.on_pointer_move(Point::new(260.0, 200.0)).unwrap();
        state.on_pointer_leave(Point::new(260.0, 200.0)).unwrap();

        assert!(!state.compass.is_active());
        assert_eq!(state.compositor_mut().main_mut().pixel(260, 200).unwrap(), 0);
        assert_eq!(state.compositor_mut().preview_mut().pixel(200, 200).unwrap(), 0);
    }

    #[test]
    fn pointer_leave_finishes_a_freehand_stroke() {
        let mut state = board();
        state.select_tool(Some(Tool::Pen)).unwrap();
        state.on_pointer_down(Point::new(10.0, 10.0)).unwrap();
        state.on_pointer_move(Point::new(60.0, 60.0)).unwrap();
        state.on_pointer_leave(Point::new(60.0, 60.0)).unwrap();

        assert_ne!(state.compositor_mut().main_mut().pixel(35, 35).unwrap(), 0);
        // Further moves no longer draw.
        state.on_pointer_move(Point::new(120.0, 120.0)).unwrap();
        assert_eq!(state.compositor_mut().main_mut().pixel(90, 90).unwrap(), 0);
    }

    fn lasso_square(state: &mut InputState, x: f64, y: f64, size: f64) {
        state.on_pointer_down(Point::new(x, y)).unwrap();
        state.on_pointer_move(Point::new(x + size, y)).unwrap();
        state.on_pointer_move(Point::new(x + size, y + size)).unwrap();
        state.on_pointer_move(Point::new(x, y + size)).unwrap();
        state.on_pointer_up(Point::new(x, y + size)).unwrap();
    }

    #[test]
    fn tool_switch_commits_a_floating_selection() {
        let mut state = board();
        place_anchor(&mut state, 50.0, 50.0);

        state.select_tool(Some(Tool::Lasso)).unwrap();
        lasso_square(&mut state, 20.0, 20.0, 60.0);
        assert!(state.lasso().is_floating());
        // The cut lifted the dot off the main layer.
        assert_eq!(state.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);

        state.select_tool(Some(Tool::Pen)).unwrap();
        assert!(state.lasso().is_idle());
        // Committed in place: the dot is back where it was.
        assert_ne!(state.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);
    }

    #[test]
    fn lasso_drag_moves_pixels_and_anchors() {
        let mut state = board();
        place_anchor(&mut state, 50.0, 50.0);

        state.select_tool(Some(Tool::Lasso)).unwrap();
        lasso_square(&mut state, 20.0, 20.0, 60.0);

        // Drag the float by (100, 0), then click outside to commit.
        state.on_pointer_down(Point::new(50.0, 50.0)).unwrap();
        state.on_pointer_move(Point::new(150.0, 50.0)).unwrap();
        state.on_pointer_up(Point::new(150.0, 50.0)).unwrap();
        state.on_pointer_down(Point::new(350.0, 350.0)).unwrap();

        assert!(state.lasso().is_idle());
        assert_ne!(state.compositor_mut().main_mut().pixel(150, 50).unwrap(), 0);
        assert_eq!(state.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);
        assert_eq!(state.snap().anchors()[0], Point::new(150.0, 50.0));

        // Cut + drag + commit collapse into a single undo step.
        assert!(state.undo().unwrap());
        assert_ne!(state.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);
        assert_eq!(state.snap().anchors()[0], Point::new(50.0, 50.0));
    }

    #[test]
    fn short_lasso_selection_is_discarded() {
        let mut state = board();
        state.select_tool(Some(Tool::Lasso)).unwrap();
        state.on_pointer_down(Point::new(10.0, 10.0)).unwrap();
        state.on_pointer_move(Point::new(12.0, 10.0)).unwrap();
        state.on_pointer_up(Point::new(12.0, 10.0)).unwrap();

        assert!(state.lasso().is_idle());
        assert!(!state.can_undo());
    }

    #[test]
    fn paste_commits_on_the_second_press() {
        let mut state = board();
        let mut image = Layer::new(40, 40).unwrap();
        image
            .fill_dot(Point::new(20.0, 20.0), 10.0, color::BLACK)
            .unwrap();

        state.set_line_width(SIZE_SCALE_DIVISOR).unwrap();
        state.begin_paste(image).unwrap();
        assert!(state.is_pasting());
        assert_eq!(state.settings().bitmap_scale(), 1.0);

        state.on_pointer_move(Point::new(100.0, 100.0)).unwrap();
        state.on_pointer_down(Point::new(100.0, 100.0)).unwrap();
        state.on_pointer_down(Point::new(100.0, 100.0)).unwrap();

        assert!(!state.is_pasting());
        assert_eq!(state.tool(), None);
        // Centered commit puts the dot center at the fixed point.
        assert_ne!(state.compositor_mut().main_mut().pixel(100, 100).unwrap(), 0);
        assert!(state.can_undo());
    }

    #[test]
    fn paste_inherits_the_current_size_channel() {
        let mut state = board();
        let mut image = Layer::new(40, 40).unwrap();
        image
            .fill_dot(Point::new(20.0, 20.0), 18.0, color::BLACK)
            .unwrap();

        state.set_line_width(10.0).unwrap();
        state.begin_paste(image).unwrap();
        // The slider value survives and the preview starts at half size.
        assert_eq!(state.settings().line_width, 10.0);
        assert_eq!(state.settings().bitmap_scale(), 0.5);

        state.on_pointer_move(Point::new(200.0, 200.0)).unwrap();
        state.on_pointer_down(Point::new(200.0, 200.0)).unwrap();
        state.on_pointer_down(Point::new(200.0, 200.0)).unwrap();

        // A 20x20 commit centered at (200, 200).
        assert_ne!(state.compositor_mut().main_mut().pixel(200, 200).unwrap(), 0);
        assert_eq!(state.compositor_mut().main_mut().pixel(185, 200).unwrap(), 0);
    }

    #[test]
    fn locked_circle_drag_shows_no_snap_ring() {
        let mut state = board();
        place_anchor(&mut state, 100.0, 100.0);

        state.select_tool(Some(Tool::Compass)).unwrap();
        state.set_compass_mode(CompassMode::Circle).unwrap();
        state.on_pointer_down(Point::new(200.0, 200.0)).unwrap();
        state.on_pointer_move(Point::new(250.0, 200.0)).unwrap();
        state.on_pointer_up(Point::new(250.0, 200.0)).unwrap();
        assert!(state.toggle_radius_lock().unwrap());

        state.on_pointer_down(Point::new(200.0, 200.0)).unwrap();
        state.on_pointer_move(Point::new(104.0, 104.0)).unwrap();

        // The pointer is within magnetizing range of the anchor, but the
        // locked radius ignores it, so no snap ring appears around it.
        for (x, y) in [(85, 100), (115, 100), (100, 85), (100, 115)] {
            assert_eq!(state.compositor_mut().preview_mut().pixel(x, y).unwrap(), 0);
        }
    }

    #[test]
    fn arc_radius_guide_stays_on_the_sweep_start() {
        let mut state = board();
        state.select_tool(Some(Tool::Compass)).unwrap();

        state.on_pointer_down(Point::new(100.0, 100.0)).unwrap();
        state.on_pointer_up(Point::new(100.0, 100.0)).unwrap();
        state.on_pointer_down(Point::new(150.0, 100.0)).unwrap();
        state.on_pointer_move(Point::new(100.0, 150.0)).unwrap();

        // The dashed guide runs from the center to the sweep start, so at
        // least one dash lands on that horizontal segment.
        let hit = (107..145)
            .any(|x| state.compositor_mut().preview_mut().pixel(x, 100).unwrap() != 0);
        assert!(hit);
        // The leg toward the pointer carries no guide.
        for y in [110, 120, 130, 140] {
            assert_eq!(state.compositor_mut().preview_mut().pixel(100, y).unwrap(), 0);
        }
    }

    #[test]
    fn clear_all_is_undoable() {
        let mut state = board();
        place_anchor(&mut state, 50.0, 50.0);

        state.clear_all().unwrap();
        assert_eq!(state.snap().len(), 0);
        assert_eq!(state.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);

        assert!(state.undo().unwrap());
        assert_eq!(state.snap().len(), 1);
        assert_ne!(state.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);
    }

    #[test]
    fn load_board_resets_history() {
        let mut state = board();
        place_anchor(&mut state, 50.0, 50.0);
        let pixels = state.compositor_mut().main_mut().snapshot_pixels().unwrap();

        let mut fresh = board();
        fresh
            .load_board(&pixels, vec![Point::new(50.0, 50.0)])
            .unwrap();
        assert!(!fresh.can_undo());
        assert_eq!(fresh.snap().len(), 1);
        assert_ne!(fresh.compositor_mut().main_mut().pixel(50, 50).unwrap(), 0);
    }
}
