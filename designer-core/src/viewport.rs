//! Screen/scene coordinate transform.
//!
//! Scene coordinates are what element geometry is written in. The host
//! shows the rendered surface at `origin` on screen, scaled by
//! `zoom / 100` and shifted by the pan offset (in scene units):
//!
//! ```text
//! scene  = (screen - origin) / scale - pan
//! screen = (scene + pan) * scale + origin
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Smallest zoom percentage accepted by [`Viewport::set_zoom`].
pub const MIN_ZOOM: f32 = 10.0;

/// Largest zoom percentage accepted by [`Viewport::set_zoom`].
pub const MAX_ZOOM: f32 = 400.0;

/// Current zoom/pan state and where the canvas sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Zoom percentage (100 = 1:1).
    pub zoom: f32,
    /// Horizontal pan offset in scene units.
    pub pan_x: f32,
    /// Vertical pan offset in scene units.
    pub pan_y: f32,
    /// Screen X of the canvas surface's top-left corner.
    pub origin_x: f32,
    /// Screen Y of the canvas surface's top-left corner.
    pub origin_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 100.0,
            pan_x: 0.0,
            pan_y: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

impl Viewport {
    /// Viewport at the given zoom with no pan and origin at (0, 0).
    #[must_use]
    pub fn with_zoom(zoom: f32) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }

    /// Multiplier from scene units to screen pixels.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.zoom / 100.0
    }

    /// Convert a screen point to scene space.
    #[must_use]
    pub fn screen_to_scene(&self, screen: Point) -> Point {
        let scale = self.scale();
        Point::new(
            (screen.x - self.origin_x) / scale - self.pan_x,
            (screen.y - self.origin_y) / scale - self.pan_y,
        )
    }

    /// Convert a scene point to screen space.
    #[must_use]
    pub fn scene_to_screen(&self, scene: Point) -> Point {
        let scale = self.scale();
        Point::new(
            (scene.x + self.pan_x) * scale + self.origin_x,
            (scene.y + self.pan_y) * scale + self.origin_y,
        )
    }

    /// Shift the pan offset by a scene-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the zoom percentage, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    /// Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        } else {
            tracing::warn!("Ignoring non-finite zoom {zoom}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_identity_at_100_percent() {
        let vp = Viewport::default();
        assert!(approx(vp.screen_to_scene(Point::new(12.0, 34.0)), Point::new(12.0, 34.0)));
    }

    #[test]
    fn test_screen_to_scene_formula() {
        let vp = Viewport {
            zoom: 200.0,
            pan_x: 10.0,
            pan_y: -5.0,
            origin_x: 100.0,
            origin_y: 50.0,
        };
        // (300 - 100) / 2 - 10 = 90 ; (150 - 50) / 2 + 5 = 55
        assert!(approx(vp.screen_to_scene(Point::new(300.0, 150.0)), Point::new(90.0, 55.0)));
    }

    #[test]
    fn test_scene_to_screen_is_inverse() {
        let vp = Viewport {
            zoom: 75.0,
            pan_x: -33.0,
            pan_y: 12.5,
            origin_x: 8.0,
            origin_y: 16.0,
        };
        let p = Point::new(123.0, -45.0);
        assert!(approx(vp.screen_to_scene(vp.scene_to_screen(p)), p));
    }

    #[test]
    fn test_set_zoom_clamps() {
        let mut vp = Viewport::default();
        vp.set_zoom(1000.0);
        assert!((vp.zoom - MAX_ZOOM).abs() < f32::EPSILON);
        vp.set_zoom(1.0);
        assert!((vp.zoom - MIN_ZOOM).abs() < f32::EPSILON);
        vp.set_zoom(f32::NAN);
        assert!((vp.zoom - MIN_ZOOM).abs() < f32::EPSILON);
    }
}
