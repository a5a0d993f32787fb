//! Shared geometry for annotation overlays
//!
//! Sizes are in logical pixels at annotation scale 1.0 and are multiplied by
//! the session's annotation scale when drawn.

use crate::domain::{Point, RoiRect};

/// Dashed midline
pub mod midline {
    pub const THICKNESS: f32 = 2.0;
    /// Dash and gap lengths
    pub const DASH: [f32; 2] = [10.0, 5.0];
}

/// Scale bar with perpendicular end caps
pub mod scale_bar {
    pub const THICKNESS: f32 = 3.0;
    /// Half-height of each end cap
    pub const CAP_HALF_HEIGHT: f32 = 12.0;
}

/// Bone segments
pub mod bone {
    pub const THICKNESS: f32 = 3.0;
}

/// Joint markers
pub mod joint {
    /// Outer ring radius
    pub const RADIUS: f32 = 10.0;
    pub const RING_THICKNESS: f32 = 2.0;
}

/// Map an image-space point into coordinates local to a crop starting at `origin`
#[inline]
pub fn crop_local(p: Point, origin: Point) -> (f32, f32) {
    ((p.x - origin.x) as f32, (p.y - origin.y) as f32)
}

/// Whole-pixel crop bounds `(x, y, width, height)` of `roi` inside an image
///
/// Returns `None` when the ROI lies entirely outside the image.
pub fn crop_bounds(roi: &RoiRect, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = roi.x.max(0.0).floor();
    let y0 = roi.y.max(0.0).floor();
    let x1 = roi.right().min(f64::from(image_width)).ceil();
    let y1 = roi.bottom().min(f64::from(image_height)).ceil();
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_bounds_clip_to_image() {
        let roi = RoiRect::new(-10.0, 5.5, 50.0, 500.0);
        assert_eq!(crop_bounds(&roi, 100, 100), Some((0, 5, 40, 95)));
        let outside = RoiRect::new(200.0, 0.0, 30.0, 30.0);
        assert_eq!(crop_bounds(&outside, 100, 100), None);
    }

    #[test]
    fn test_crop_local() {
        let origin = Point::new(10.0, 20.0);
        assert_eq!(crop_local(Point::new(15.0, 30.0), origin), (5.0, 10.0));
    }
}
