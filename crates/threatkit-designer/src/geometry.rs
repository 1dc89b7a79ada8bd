//! Canvas geometry primitives.
//!
//! All values are in canvas units. Screen coordinates must be projected
//! through the [`Viewport`](crate::viewport::Viewport) before they reach
//! anything in this module.

use serde::{Deserialize, Serialize};

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether this point lies within `tolerance` of the segment `a`-`b`.
    ///
    /// Projects onto the segment with the parameter clamped to `[0, 1]`, so
    /// points beyond the endpoints are measured against the nearest endpoint.
    pub fn is_near_segment(&self, a: Point, b: Point, tolerance: f64) -> bool {
        let l2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
        if l2 == 0.0 {
            return (self.x - a.x).powi(2) + (self.y - a.y).powi(2) <= tolerance * tolerance;
        }
        let t = ((self.x - a.x) * (b.x - a.x) + (self.y - a.y) * (b.y - a.y)) / l2;
        let t = t.clamp(0.0, 1.0);
        let proj_x = a.x + t * (b.x - a.x);
        let proj_y = a.y + t * (b.y - a.y);
        let dist_sq = (self.x - proj_x).powi(2) + (self.y - proj_y).powi(2);
        dist_sq <= tolerance * tolerance
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    /// Box with its top-left corner at `origin`.
    pub fn from_origin(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    /// Smallest box containing both segment endpoints.
    pub fn from_segment(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Grows the box by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}
