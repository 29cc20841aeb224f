//! Scene-space geometry primitives.

use serde::{Deserialize, Serialize};

/// A point in scene or screen space, depending on context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width (may be zero).
    pub width: f32,
    /// Height (may be zero).
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test. A zero-sized rectangle contains exactly
    /// its own origin.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow the rectangle by `amount` on every side.
    #[must_use]
    pub fn outset(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// The eight selection handle anchors: corners and edge midpoints,
    /// clockwise from top-left.
    #[must_use]
    pub fn handle_points(&self) -> [(Handle, Point); 8] {
        let (l, t, r, b) = (self.x, self.y, self.right(), self.bottom());
        let (cx, cy) = (self.x + self.width / 2.0, self.y + self.height / 2.0);
        [
            (Handle::TopLeft, Point::new(l, t)),
            (Handle::Top, Point::new(cx, t)),
            (Handle::TopRight, Point::new(r, t)),
            (Handle::Right, Point::new(r, cy)),
            (Handle::BottomRight, Point::new(r, b)),
            (Handle::Bottom, Point::new(cx, b)),
            (Handle::BottomLeft, Point::new(l, b)),
            (Handle::Left, Point::new(l, cy)),
        ]
    }
}

/// Position of a selection handle on the selection outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    /// Top-left corner.
    TopLeft,
    /// Top edge midpoint.
    Top,
    /// Top-right corner.
    TopRight,
    /// Right edge midpoint.
    Right,
    /// Bottom-right corner.
    BottomRight,
    /// Bottom edge midpoint.
    Bottom,
    /// Bottom-left corner.
    BottomLeft,
    /// Left edge midpoint.
    Left,
}
