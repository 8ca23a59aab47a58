//! Preview overlay rendering.
//!
//! Every interactive tool redraws its guide geometry here on each pointer
//! move. The overlay is always cleared and rebuilt from scratch per frame;
//! previews are cheap relative to the persistent layer and a full redraw is
//! the only way to guarantee no stale dashed artifacts survive a gesture.

use crate::util::{Point, Rect};

use super::color::Color;
use super::layer::Layer;
use crate::error::Result;

/// Guide red used for compass radius lines and preview circles.
const GUIDE: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Accent blue used for selection rectangles and floating borders.
const ACCENT: Color = Color {
    r: 0.0,
    g: 0.48,
    b: 1.0,
    a: 1.0,
};

/// Translucent blue for the snap indicator ring.
const SNAP_RING: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 1.0,
    a: 0.5,
};

/// Neutral gray for the in-progress lasso polyline.
const LASSO_GRAY: Color = Color {
    r: 0.33,
    g: 0.33,
    b: 0.33,
    a: 1.0,
};

const CROSS_SIZE: f64 = 5.0;

fn dashed_stroke(ctx: &cairo::Context, color: Color, width: f64, dash: &[f64]) -> Result<()> {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(width);
    ctx.set_dash(dash, 0.0);
    ctx.stroke()?;
    ctx.set_dash(&[], 0.0);
    Ok(())
}

/// Dashed segment between two points, used by the ruler while dragging.
pub fn render_dashed_segment(layer: &Layer, a: Point, b: Point, color: Color, width: f64) -> Result<()> {
    let ctx = layer.context()?;
    ctx.move_to(a.x, a.y);
    ctx.line_to(b.x, b.y);
    dashed_stroke(&ctx, color, width, &[5.0, 5.0])
}

/// Dashed selection rectangle for select-erase.
pub fn render_selection_rect(layer: &Layer, rect: Rect) -> Result<()> {
    let ctx = layer.context()?;
    ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
    dashed_stroke(&ctx, ACCENT, 1.0, &[4.0, 2.0])
}

/// Dashed preview circle for the compass.
pub fn render_dashed_circle(layer: &Layer, center: Point, radius: f64) -> Result<()> {
    if radius <= 0.0 {
        return Ok(());
    }
    let ctx = layer.context()?;
    ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
    dashed_stroke(&ctx, GUIDE, 1.0, &[5.0, 5.0])
}

/// Solid arc preview while the compass sweep is in progress.
pub fn render_arc_preview(
    layer: &Layer,
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
    let ctx = layer.context()?;
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

/// Small cross marking the compass center.
pub fn render_cross(layer: &Layer, p: Point) -> Result<()> {
    let ctx = layer.context()?;
    ctx.set_source_rgba(0.0, 0.0, 0.0, 1.0);
    ctx.set_line_width(1.0);
    ctx.move_to(p.x - CROSS_SIZE, p.y);
    ctx.line_to(p.x + CROSS_SIZE, p.y);
    ctx.move_to(p.x, p.y - CROSS_SIZE);
    ctx.line_to(p.x, p.y + CROSS_SIZE);
    ctx.stroke()?;
    Ok(())
}

/// Dashed line from the compass center to the pointer (the radius guide).
pub fn render_radius_guide(layer: &Layer, center: Point, p: Point) -> Result<()> {
    let ctx = layer.context()?;
    ctx.move_to(center.x, center.y);
    ctx.line_to(p.x, p.y);
    dashed_stroke(&ctx, GUIDE, 1.0, &[3.0, 3.0])
}

/// Dashed ring showing that the pointer is magnetized to an anchor point.
pub fn render_snap_indicator(layer: &Layer, p: Point, radius: f64) -> Result<()> {
    let ctx = layer.context()?;
    ctx.arc(p.x, p.y, radius, 0.0, std::f64::consts::TAU);
    dashed_stroke(&ctx, SNAP_RING, 1.0, &[2.0, 2.0])
}

/// Dashed polyline of the in-progress lasso selection.
pub fn render_lasso_path(layer: &Layer, path: &[Point]) -> Result<()> {
    if path.len() < 2 {
        return Ok(());
    }
    let ctx = layer.context()?;
    ctx.move_to(path[0].x, path[0].y);
    for p in &path[1..] {
        ctx.line_to(p.x, p.y);
    }
    dashed_stroke(&ctx, LASSO_GRAY, 1.0, &[5.0, 5.0])
}

/// A floating lasso selection: the cut bitmap plus a dashed bounding border.
pub fn render_floating_selection(layer: &Layer, image: &Layer, x: f64, y: f64, scale: f64) -> Result<()> {
    let ctx = layer.context()?;
    ctx.save()?;
    ctx.translate(x, y);
    ctx.scale(scale, scale);
    ctx.set_source_surface(image.surface(), 0.0, 0.0)?;
    ctx.paint()?;
    ctx.restore()?;

    let w = image.width() as f64 * scale;
    let h = image.height() as f64 * scale;
    ctx.rectangle(x, y, w, h);
    dashed_stroke(&ctx, ACCENT, 1.0, &[5.0, 5.0])
}

/// Translucent paste preview centered on `center`, with a dashed border.
pub fn render_paste_preview(layer: &Layer, image: &Layer, center: Point, scale: f64) -> Result<()> {
    let w = image.width() as f64 * scale;
    let h = image.height() as f64 * scale;
    let x = center.x - w / 2.0;
    let y = center.y - h / 2.0;

    let ctx = layer.context()?;
    ctx.save()?;
    ctx.translate(x, y);
    ctx.scale(scale, scale);
    ctx.set_source_surface(image.surface(), 0.0, 0.0)?;
    ctx.paint_with_alpha(0.5)?;
    ctx.restore()?;

    ctx.rectangle(x, y, w, h);
    dashed_stroke(&ctx, ACCENT, 1.0, &[5.0, 5.0])
}
