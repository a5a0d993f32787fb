//! Geometric types and primitives for image-space coordinates
//!
//! All values are `f64` image pixels unless stated otherwise. Missing inputs
//! are modelled as `None` and propagate as `None`; nothing here panics.

use serde::{Deserialize, Serialize};

/// A 2D point (image space or screen space, depending on context)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Reflect across the vertical line `x = axis_x`
    pub fn mirrored(&self, axis_x: f64) -> Point {
        Point::new(2.0 * axis_x - self.x, self.y)
    }
}

/// Axis-aligned rectangle in image space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RoiRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a normalized rectangle from two arbitrary corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        let (x, y, max_x, max_y) = normalize_rect(a.x, a.y, b.x, b.y);
        Self::new(x, y, max_x - x, max_y - y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check whether both sides reach `min_side`
    pub fn meets_minimum(&self, min_side: f64) -> bool {
        self.width >= min_side && self.height >= min_side
    }
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64, f64, f64) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

/// Euclidean distance, `None` if either point is absent
pub fn distance(a: Option<Point>, b: Option<Point>) -> Option<f64> {
    Some(a?.distance_to(b?))
}

/// Unsigned angle in degrees at `vertex` between the rays to `p1` and `p2`
///
/// Computed as `|atan2(cross, dot)|`, so the result lies in `[0, 180]`.
pub fn angle_at_vertex(p1: Option<Point>, vertex: Option<Point>, p2: Option<Point>) -> Option<f64> {
    let (p1, vertex, p2) = (p1?, vertex?, p2?);
    let (v1x, v1y) = (p1.x - vertex.x, p1.y - vertex.y);
    let (v2x, v2y) = (p2.x - vertex.x, p2.y - vertex.y);
    let dot = v1x * v2x + v1y * v2y;
    let cross = v1x * v2y - v1y * v2x;
    Some(cross.atan2(dot).abs().to_degrees())
}

/// Reflect `point` across the vertical axis `x = axis_x`
pub fn mirror_across_vertical(point: Option<Point>, axis_x: Option<f64>) -> Option<Point> {
    Some(point?.mirrored(axis_x?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_distance_requires_both_points() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(distance(Some(a), Some(b)), Some(5.0));
        assert_eq!(distance(Some(a), None), None);
        assert_eq!(distance(None, Some(b)), None);
    }

    #[test]
    fn test_right_angle_at_vertex() {
        let angle = angle_at_vertex(
            Some(Point::new(0.0, 0.0)),
            Some(Point::new(0.0, 10.0)),
            Some(Point::new(10.0, 10.0)),
        )
        .unwrap();
        assert!(close(angle, 90.0));
    }

    #[test]
    fn test_angle_is_unsigned_and_bounded() {
        let vertex = Some(Point::new(0.0, 0.0));
        let a = angle_at_vertex(Some(Point::new(1.0, 0.0)), vertex, Some(Point::new(-1.0, -1e-12)));
        let b = angle_at_vertex(Some(Point::new(1.0, 0.0)), vertex, Some(Point::new(0.0, -1.0)));
        assert!(a.unwrap() <= 180.0);
        assert!(close(b.unwrap(), 90.0));
        assert_eq!(angle_at_vertex(None, vertex, Some(Point::new(1.0, 1.0))), None);
    }

    #[test]
    fn test_mirroring_twice_is_identity() {
        let p = Point::new(12.5, -3.0);
        let once = mirror_across_vertical(Some(p), Some(7.0)).unwrap();
        assert_eq!(once, Point::new(1.5, -3.0));
        let twice = mirror_across_vertical(Some(once), Some(7.0)).unwrap();
        assert!(close(twice.x, p.x) && close(twice.y, p.y));
    }

    #[test]
    fn test_mirroring_without_axis_is_absent() {
        assert_eq!(mirror_across_vertical(Some(Point::new(1.0, 1.0)), None), None);
    }

    #[test]
    fn test_rect_from_corners_normalizes() {
        let r = RoiRect::from_corners(Point::new(30.0, 40.0), Point::new(10.0, 5.0));
        assert_eq!(r, RoiRect::new(10.0, 5.0, 20.0, 35.0));
        assert_eq!(r.center(), Point::new(20.0, 22.5));
        assert!(r.meets_minimum(20.0));
        assert!(!r.meets_minimum(21.0));
    }
}
