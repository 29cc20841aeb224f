//! Per-element paint scope.
//!
//! Each element paints into its own transparent layer the size of the
//! surface. Closing the scope runs the element's filters, lays its drop
//! shadow underneath, and composites the result onto the surface at the
//! element's opacity. The layer is dropped afterwards, so alpha, shadow and
//! filter state cannot reach the next element.

use designer_core::{Element, Rgba};
use tiny_skia::{
    FillRule, FilterQuality, Paint, Path, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::error::{RenderError, RenderResult};
use crate::filters::{apply_filters, drop_shadow};

/// Convert a parsed color into a tiny-skia paint.
pub(crate) fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Surface transform for an element: the zoom scale, then rotation about
/// the element's center in scene units.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn element_transform(element: &Element, scale: f32) -> Transform {
    let root = Transform::from_scale(scale, scale);
    if element.rotation == 0.0 || !element.rotation.is_finite() {
        return root;
    }
    let center = element.bounds().center();
    root.pre_concat(Transform::from_rotate_at(
        element.rotation,
        center.x,
        center.y,
    ))
}

/// An open paint scope for one element.
#[derive(Debug)]
pub struct PaintScope {
    layer: Pixmap,
    transform: Transform,
    scale: f32,
}

impl PaintScope {
    /// Open a scope for `element` on a surface of the given pixel size.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer cannot be allocated.
    pub fn begin(width: u32, height: u32, scale: f32, element: &Element) -> RenderResult<Self> {
        let layer = Pixmap::new(width, height)
            .ok_or_else(|| RenderError::Surface(format!("layer {width}x{height}")))?;
        Ok(Self {
            layer,
            transform: element_transform(element, scale),
            scale,
        })
    }

    /// Scene-to-layer transform, including rotation.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Scene units to surface pixels.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The layer being painted.
    pub fn layer_mut(&mut self) -> &mut Pixmap {
        &mut self.layer
    }

    /// Fill a scene-space path.
    pub fn fill_path(&mut self, path: &Path, color: Rgba) {
        self.layer.fill_path(
            path,
            &paint_for(color),
            FillRule::Winding,
            self.transform,
            None,
        );
    }

    /// Stroke a scene-space path; `width` is in scene units.
    pub fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.layer
            .stroke_path(path, &paint_for(color), &stroke, self.transform, None);
    }

    /// Draw a pixmap stretched over a scene-space rectangle.
    pub fn draw_image(&mut self, image: &Pixmap, bounds: Rect) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let fit = Transform::from_row(
            bounds.width() / image.width() as f32,
            0.0,
            0.0,
            bounds.height() / image.height() as f32,
            bounds.x(),
            bounds.y(),
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.layer
            .draw_pixmap(0, 0, image.as_ref(), &paint, self.transform.pre_concat(fit), None);
    }

    /// Close the scope: filter, shadow, then composite at the element's
    /// opacity.
    pub fn finish(mut self, surface: &mut Pixmap, element: &Element) {
        apply_filters(&mut self.layer, &element.filters, self.scale);

        let opacity = (element.opacity / 100.0).clamp(0.0, 1.0);
        let paint = PixmapPaint {
            opacity,
            ..PixmapPaint::default()
        };

        if let Some(shadow) = element.shadow().filter(|s| s.enabled) {
            if let Some(color) = Rgba::parse_or_none(&shadow.color) {
                let shadow_layer = drop_shadow(
                    &self.layer,
                    color,
                    shadow.offset_x * self.scale,
                    shadow.offset_y * self.scale,
                    shadow.blur.max(0.0) / 2.0 * self.scale,
                );
                if let Some(shadow_layer) = shadow_layer {
                    surface.draw_pixmap(
                        0,
                        0,
                        shadow_layer.as_ref(),
                        &paint,
                        Transform::identity(),
                        None,
                    );
                }
            }
        }

        surface.draw_pixmap(
            0,
            0,
            self.layer.as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designer_core::ShapeType;
    use tiny_skia::PathBuilder;

    fn square() -> Path {
        PathBuilder::from_rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap())
    }

    #[test]
    fn test_opacity_scales_composited_alpha() {
        let element = Element::shape(ShapeType::Rectangle)
            .with_bounds(0.0, 0.0, 10.0, 10.0)
            .with_opacity(50.0);
        let mut surface = Pixmap::new(10, 10).unwrap();
        let mut scope = PaintScope::begin(10, 10, 1.0, &element).unwrap();
        scope.fill_path(&square(), Rgba::new(255, 0, 0, 255));
        scope.finish(&mut surface, &element);
        let alpha = surface.pixel(5, 5).unwrap().alpha();
        assert!((i32::from(alpha) - 128).abs() <= 1);
    }

    #[test]
    fn test_scope_does_not_leak_into_next_element() {
        let faded = Element::shape(ShapeType::Rectangle).with_opacity(10.0);
        let solid = Element::shape(ShapeType::Rectangle);
        let mut surface = Pixmap::new(10, 10).unwrap();

        let mut scope = PaintScope::begin(10, 10, 1.0, &faded).unwrap();
        scope.fill_path(&square(), Rgba::new(0, 255, 0, 255));
        scope.finish(&mut surface, &faded);

        let mut scope = PaintScope::begin(10, 10, 1.0, &solid).unwrap();
        scope.fill_path(&square(), Rgba::new(0, 0, 255, 255));
        scope.finish(&mut surface, &solid);

        let p = surface.pixel(5, 5).unwrap();
        assert_eq!((p.red(), p.green(), p.blue(), p.alpha()), (0, 0, 255, 255));
    }

    #[test]
    fn test_rotation_about_center() {
        let element = Element::shape(ShapeType::Rectangle)
            .with_bounds(0.0, 0.0, 10.0, 10.0)
            .with_rotation(90.0);
        let t = element_transform(&element, 2.0);
        let mut p = tiny_skia::Point::from_xy(0.0, 0.0);
        t.map_points(std::slice::from_mut(&mut p));
        // (0,0) rotates 90° about (5,5) to (10,0), then scales by 2.
        assert!((p.x - 20.0).abs() < 1e-3);
        assert!(p.y.abs() < 1e-3);
    }
}
