//! Annotation data placed by the user
//!
//! All positions are stored in image space.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Reference segment of known real-world length
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleBar {
    /// Anchor (left end) in image space
    pub x: f64,
    pub y: f64,
    /// Horizontal length in image pixels
    pub length: f64,
    /// Real-world distance represented by `length`
    pub real_value: f64,
    pub unit: String,
}

impl Default for ScaleBar {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            length: 100.0,
            real_value: 1.0,
            unit: "cm".to_string(),
        }
    }
}

impl ScaleBar {
    pub fn start(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x + self.length, self.y)
    }

    /// Image pixels per real-world unit, `None` unless both length and value are positive
    pub fn pixels_per_unit(&self) -> Option<f64> {
        (self.length > 0.0 && self.real_value > 0.0).then(|| self.length / self.real_value)
    }

    /// Set the length from a pointer x, never below `min_length`
    pub fn resize_to(&mut self, pointer_x: f64, min_length: f64) {
        self.length = (pointer_x - self.x).max(min_length);
    }
}

/// Joint id -> image-space position; an absent id means "not placed yet"
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointSet(BTreeMap<String, Point>);

impl JointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.0.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, p: Point) {
        self.0.insert(id.into(), p);
    }

    pub fn remove(&mut self, id: &str) -> Option<Point> {
        self.0.remove(id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.0.iter().map(|(id, p)| (id.as_str(), *p))
    }
}

impl<S: Into<String>> FromIterator<(S, Point)> for JointSet {
    fn from_iter<I: IntoIterator<Item = (S, Point)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, p)| (id.into(), p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_per_unit_needs_positive_inputs() {
        let mut bar = ScaleBar::default();
        assert_eq!(bar.pixels_per_unit(), Some(100.0));
        bar.real_value = 0.0;
        assert_eq!(bar.pixels_per_unit(), None);
    }

    #[test]
    fn test_resize_clamps_to_floor() {
        let mut bar = ScaleBar::default();
        bar.resize_to(55.0, 20.0);
        assert_eq!(bar.length, 20.0);
        bar.resize_to(10.0, 20.0);
        assert_eq!(bar.length, 20.0);
        bar.resize_to(250.0, 20.0);
        assert_eq!(bar.length, 200.0);
        assert_eq!(bar.start(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_joint_set_is_one_point_per_id() {
        let mut joints = JointSet::new();
        joints.insert("head", Point::new(1.0, 2.0));
        joints.insert("head", Point::new(3.0, 4.0));
        assert_eq!(joints.len(), 1);
        assert_eq!(joints.get("head"), Some(Point::new(3.0, 4.0)));
        assert_eq!(joints.get("neck"), None);
    }
}
