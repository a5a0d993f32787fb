//! Screen <-> image coordinate mapping
//!
//! `screen = rotate(image) * scale + offset`, where the optional rotation
//! turns image points about a pivot before the affine map is applied.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, RoiRect};

/// Smallest zoom factor reachable through [`ViewTransform::zoom_at_point`]
pub const MIN_SCALE: f64 = 0.1;
/// Largest zoom factor reachable through [`ViewTransform::zoom_at_point`]
pub const MAX_SCALE: f64 = 5.0;

/// View rotation about an image-space pivot
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Angle in degrees, positive is clockwise on a y-down screen
    pub degrees: f64,
    /// Pivot in image space
    pub pivot: Point,
}

impl Rotation {
    fn apply(&self, p: Point, sign: f64) -> Point {
        let (sin, cos) = (sign * self.degrees.to_radians()).sin_cos();
        let (dx, dy) = (p.x - self.pivot.x, p.y - self.pivot.y);
        Point::new(
            self.pivot.x + dx * cos - dy * sin,
            self.pivot.y + dx * sin + dy * cos,
        )
    }
}

/// Current pan/zoom/rotation state of the viewport
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    #[serde(default)]
    pub rotation: Option<Rotation>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: None,
        }
    }
}

impl ViewTransform {
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
            rotation: None,
        }
    }

    pub fn with_rotation(mut self, degrees: f64, pivot: Point) -> Self {
        self.rotation = Some(Rotation { degrees, pivot });
        self
    }

    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.map_or(0.0, |r| r.degrees)
    }

    /// Map an image-space point to screen pixels
    pub fn image_to_screen(&self, p: Point) -> Point {
        let rotated = match &self.rotation {
            Some(rotation) => rotation.apply(p, 1.0),
            None => p,
        };
        Point::new(
            rotated.x * self.scale + self.offset_x,
            rotated.y * self.scale + self.offset_y,
        )
    }

    /// Map a screen pixel back to image space (exact inverse of [`Self::image_to_screen`])
    pub fn screen_to_image(&self, p: Point) -> Point {
        let unscaled = Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        );
        match &self.rotation {
            Some(rotation) => rotation.apply(unscaled, -1.0),
            None => unscaled,
        }
    }

    /// Transform that centres `rect` in the viewport with padding on every side
    ///
    /// Any rotation is carried over unchanged.
    pub fn fit_to_region(
        &self,
        rect: &RoiRect,
        viewport_width: f64,
        viewport_height: f64,
        padding: f64,
        max_scale: f64,
    ) -> Self {
        let padded = 1.0 + 2.0 * padding;
        let scale = (viewport_width / (rect.width * padded))
            .min(viewport_height / (rect.height * padded))
            .min(max_scale);
        let center = rect.center();
        Self {
            scale,
            offset_x: viewport_width / 2.0 - center.x * scale,
            offset_y: viewport_height / 2.0 - center.y * scale,
            rotation: self.rotation,
        }
    }

    /// Transform that shows a whole `width` x `height` image with `margin` pixels to spare
    ///
    /// Never magnifies beyond `max_scale` and never shrinks below [`MIN_SCALE`].
    pub fn fit_image(
        width: f64,
        height: f64,
        viewport_width: f64,
        viewport_height: f64,
        margin: f64,
        max_scale: f64,
    ) -> Self {
        let scale = ((viewport_width - margin) / width)
            .min((viewport_height - margin) / height)
            .min(max_scale)
            .max(MIN_SCALE);
        Self::new(
            scale,
            (viewport_width - width * scale) / 2.0,
            (viewport_height - height * scale) / 2.0,
        )
    }

    /// Multiply the zoom by `factor` while keeping the image point under the pivot in place
    pub fn zoom_at_point(&mut self, factor: f64, pivot_x: f64, pivot_y: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;
        self.offset_x = pivot_x - (pivot_x - self.offset_x) * ratio;
        self.offset_y = pivot_y - (pivot_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Translate so the offset becomes `base + (current - start)`
    pub fn pan_from(&mut self, base: Point, start: Point, current: Point) {
        self.offset_x = base.x + (current.x - start.x);
        self.offset_y = base.y + (current.y - start.y);
    }

    /// Move the rotation pivot without moving anything on screen
    pub fn repivot(&mut self, pivot: Point) {
        let Some(rotation) = self.rotation else {
            return;
        };
        let before = self.image_to_screen(pivot);
        self.rotation = Some(Rotation { pivot, ..rotation });
        let after = self.image_to_screen(pivot);
        self.offset_x += before.x - after.x;
        self.offset_y += before.y - after.y;
    }

    /// Set rotation angle; `pivot` replaces the stored one
    pub fn set_rotation(&mut self, degrees: f64, pivot: Point) {
        self.rotation = if degrees == 0.0 {
            None
        } else {
            Some(Rotation { degrees, pivot })
        };
    }
}
