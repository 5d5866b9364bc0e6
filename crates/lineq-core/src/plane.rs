use serde::{Deserialize, Serialize};
use std::fmt;

/// Visible range of the coordinate plane, both axes.
pub const PLANE_MIN: i32 = -6;
pub const PLANE_MAX: i32 = 6;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// An integer grid intersection on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snap a continuous plane position to the nearest grid intersection.
    ///
    /// This is the only place rounding happens; `SurfaceMap` itself stays
    /// continuous.
    pub fn nearest(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }

    pub fn in_plane(&self) -> bool {
        (PLANE_MIN..=PLANE_MAX).contains(&self.x) && (PLANE_MIN..=PLANE_MAX).contains(&self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// SurfaceMap
// ---------------------------------------------------------------------------

/// Bidirectional transform between plane coordinates and a drawing surface.
///
/// The surface's y axis grows downward, so the plane's y is negated on the
/// way through. Scales are per axis: terminal cells are taller than wide,
/// and a square-looking grid needs roughly twice as many columns per unit
/// as rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMap {
    scale_x: f64,
    scale_y: f64,
    origin_x: f64,
    origin_y: f64,
}

impl SurfaceMap {
    /// `scale_*` is surface units per plane unit; `origin_*` is the surface
    /// position of the plane origin.
    pub fn new(scale_x: f64, scale_y: f64, origin_x: f64, origin_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            origin_x,
            origin_y,
        }
    }

    /// Uniform grid spacing on both axes.
    pub fn square(grid: f64, origin_x: f64, origin_y: f64) -> Self {
        Self::new(grid, grid, origin_x, origin_y)
    }

    pub fn to_plane(&self, px: f64, py: f64) -> (f64, f64) {
        (
            (px - self.origin_x) / self.scale_x,
            -((py - self.origin_y) / self.scale_y),
        )
    }

    pub fn to_surface(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale_x + self.origin_x,
            -y * self.scale_y + self.origin_y,
        )
    }
}

// ---------------------------------------------------------------------------
// PointBuffer
// ---------------------------------------------------------------------------

/// The student's placed points, at most two.
///
/// A third placement does not evict the oldest point; it replaces the whole
/// pair with the single new point, so the student restarts the line rather
/// than sliding it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointBuffer {
    points: Vec<Point>,
}

impl PointBuffer {
    pub fn push(&mut self, point: Point) {
        if self.points.len() >= 2 {
            self.points.clear();
        }
        self.points.push(point);
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn pair(&self) -> Option<(Point, Point)> {
        match self.points.as_slice() {
            [p1, p2] => Some((*p1, *p2)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
