//! Vector shape geometry and painting.

use designer_core::{Rgba, ShapeStyle, ShapeType};
use tiny_skia::{Path, PathBuilder, Rect};

use crate::scope::PaintScope;

/// Cubic control-point factor for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Build the scene-space outline of a shape inside `bounds`.
///
/// Returns `None` for degenerate geometry (zero or negative size).
#[must_use]
pub fn shape_path(shape_type: ShapeType, bounds: Rect, border_radius: f32) -> Option<Path> {
    match shape_type {
        ShapeType::Circle => {
            let radius = bounds.width().min(bounds.height()) / 2.0;
            if radius <= 0.0 {
                return None;
            }
            let cx = bounds.x() + bounds.width() / 2.0;
            let cy = bounds.y() + bounds.height() / 2.0;
            PathBuilder::from_circle(cx, cy, radius)
        }
        ShapeType::Rectangle => {
            if border_radius > 0.0 {
                rounded_rect(bounds, border_radius)
            } else {
                Some(PathBuilder::from_rect(bounds))
            }
        }
        ShapeType::Triangle => {
            let mut pb = PathBuilder::new();
            pb.move_to(bounds.x() + bounds.width() / 2.0, bounds.y());
            pb.line_to(bounds.right(), bounds.bottom());
            pb.line_to(bounds.x(), bounds.bottom());
            pb.close();
            pb.finish()
        }
    }
}

/// Rounded rectangle; the radius is limited to half the shorter side.
fn rounded_rect(bounds: Rect, radius: f32) -> Option<Path> {
    let r = radius.min(bounds.width() / 2.0).min(bounds.height() / 2.0);
    let (l, t, rt, b) = (bounds.x(), bounds.y(), bounds.right(), bounds.bottom());
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    pb.line_to(rt, b - r);
    pb.cubic_to(rt, b - r + k, rt - r + k, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l + r - k, b, l, b - r + k, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    pb.close();
    pb.finish()
}

/// Fill and stroke a shape element into its scope.
pub fn paint_shape(scope: &mut PaintScope, bounds: Rect, style: &ShapeStyle) {
    let Some(path) = shape_path(style.shape_type, bounds, style.border_radius) else {
        tracing::trace!("Skipping degenerate {:?}", style.shape_type);
        return;
    };

    if let Some(fill) = Rgba::parse_or_none(&style.fill) {
        scope.fill_path(&path, fill);
    }
    if style.stroke_width > 0.0 {
        if let Some(stroke) = Rgba::parse_or_none(&style.stroke) {
            scope.stroke_path(&path, stroke, style.stroke_width);
        }
    }
}
