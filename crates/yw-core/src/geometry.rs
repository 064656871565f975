use std::fmt;

use serde::{Deserialize, Serialize};

/// A point (or displacement) in world coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downwards as in diagram space.
    pub y: f64,
}

impl Point {
    /// Create a point from its two coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    pub fn offset(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// Euclidean length when the point is read as a vector.
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Rotate the vector counter-clockwise by `degrees`.
    pub fn rotated(self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Multiply both components by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Axis-aligned rectangle. Every scene object is one.
///
/// `x`/`y` is the top-left corner; the rectangle spans
/// `[x, x + width] × [y, y + height]`, edges included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Geometric center.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// `(x1, y1, x2, y2)` corner coordinates.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Inclusive containment test: points on an edge count as inside.
    pub fn contains_point(&self, point: Point) -> bool {
        let (x1, y1, x2, y2) = self.bbox();
        point.x >= x1 && point.x <= x2 && point.y >= y1 && point.y <= y2
    }

    /// `true` when the center of `other` lies inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        self.contains_point(other.center())
    }

    /// Move the top-left corner to `origin`, keeping the size.
    pub fn move_to(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    /// Shift the rectangle by a displacement.
    pub fn translate(&mut self, by: Point) {
        self.x += by.x;
        self.y += by.y;
    }

    /// The same rectangle expressed in a frame whose origin sits at `frame`.
    pub fn relative_to(&self, frame: Point) -> Rect {
        Rect::new(self.x + frame.x, self.y + frame.y, self.width, self.height)
    }
}
