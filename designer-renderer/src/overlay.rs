//! Canvas chrome: background, grid and the selection outline with handles.

use designer_core::{Element, Rgba};
use tiny_skia::{FillRule, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::scope::{element_transform, paint_for};
use crate::RendererConfig;

/// Fill the logical canvas area with the background color.
pub fn draw_background(surface: &mut Pixmap, color: Option<Rgba>, width: f32, height: f32, scale: f32) {
    let Some(color) = color else {
        return;
    };
    if let Some(rect) = Rect::from_xywh(0.0, 0.0, width, height) {
        surface.fill_rect(rect, &paint_for(color), Transform::from_scale(scale, scale), None);
    }
}

/// Draw the orthogonal grid over the whole logical canvas.
pub fn draw_grid(surface: &mut Pixmap, config: &RendererConfig, width: f32, height: f32, scale: f32) {
    let pitch = config.grid_pitch;
    if !(pitch > 0.0 && pitch.is_finite()) || width <= 0.0 || height <= 0.0 {
        return;
    }
    let Some(color) = Rgba::parse_or_none(&config.grid_color) else {
        return;
    };

    let mut pb = PathBuilder::new();
    let mut x = 0.0;
    while x <= width {
        pb.move_to(x, 0.0);
        pb.line_to(x, height);
        x += pitch;
    }
    let mut y = 0.0;
    while y <= height {
        pb.move_to(0.0, y);
        pb.line_to(width, y);
        y += pitch;
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width: config.grid_line_width,
        ..Stroke::default()
    };
    surface.stroke_path(
        &path,
        &paint_for(color),
        &stroke,
        Transform::from_scale(scale, scale),
        None,
    );
}

/// Draw the selection outline around `element`, outset by the configured
/// margin, with eight square handles at its corners and edge midpoints.
///
/// Painted at full opacity under the element's rotation.
pub fn draw_selection(surface: &mut Pixmap, element: &Element, config: &RendererConfig, scale: f32) {
    let Some(accent) = Rgba::parse_or_none(&config.selection_color) else {
        return;
    };
    let transform = element_transform(element, scale);
    let outline = element.bounds().outset(config.selection_margin);

    let stroke = Stroke {
        width: config.selection_width,
        ..Stroke::default()
    };
    if let Some(rect) = Rect::from_xywh(outline.x, outline.y, outline.width, outline.height) {
        let path = PathBuilder::from_rect(rect);
        surface.stroke_path(&path, &paint_for(accent), &stroke, transform, None);
    }

    let size = config.handle_size;
    let handle_fill = Rgba::parse_or_none(&config.handle_fill);
    let handle_stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };
    for (_, anchor) in outline.handle_points() {
        let Some(rect) = Rect::from_xywh(anchor.x - size / 2.0, anchor.y - size / 2.0, size, size)
        else {
            continue;
        };
        let path = PathBuilder::from_rect(rect);
        match handle_fill {
            Some(fill) => {
                surface.fill_path(&path, &paint_for(fill), FillRule::Winding, transform, None);
                surface.stroke_path(&path, &paint_for(accent), &handle_stroke, transform, None);
            }
            None => {
                surface.fill_path(&path, &paint_for(accent), FillRule::Winding, transform, None);
            }
        }
    }
}
