//! Coordinate helpers for canvas space.
//!
//! Canvas space is y-down, so a positive angle turns clockwise on screen.
//! Rotations are stored in degrees everywhere in the scene model; the
//! conversion to radians happens only at the edge of these helpers.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width or height any element may have (in canvas units).
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Rotate `point` about `center` by `angle_deg` degrees (clockwise in canvas space).
pub fn rotate_point(point: Point, center: Point, angle_deg: f64) -> Point {
    center + rotate_vec(point - center, angle_deg)
}

/// Rotate a vector by `angle_deg` degrees.
pub fn rotate_vec(v: Vec2, angle_deg: f64) -> Vec2 {
    let (sin_r, cos_r) = angle_deg.to_radians().sin_cos();
    Vec2::new(v.x * cos_r - v.y * sin_r, v.x * sin_r + v.y * cos_r)
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle_deg: f64) -> f64 {
    if !angle_deg.is_finite() {
        return 0.0;
    }
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid can land exactly on 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Map a world point into the element's unrotated local frame.
///
/// The result is relative to the element center, so the element occupies
/// `[-w/2, w/2] x [-h/2, h/2]` in local space regardless of its rotation.
pub fn to_local(point: Point, frame: &Frame) -> Point {
    let center = frame.center();
    let v = rotate_vec(point - center, -frame.rotation);
    Point::new(v.x, v.y)
}

/// Inverse of [`to_local`].
pub fn to_world(local: Point, frame: &Frame) -> Point {
    frame.center() + rotate_vec(local.to_vec2(), frame.rotation)
}

/// Position, size and rotation of a placed element.
///
/// `(x, y)` is the top-left corner before rotation; the box turns about its
/// center by `rotation` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, clockwise, in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
}

impl Frame {
    /// Create an unrotated frame.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Set the rotation (normalized into `[0, 360)`).
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = normalize_degrees(rotation);
        self
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The unrotated box in world coordinates.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// The unrotated box in local coordinates (centered on the origin).
    pub fn local_rect(&self) -> Rect {
        Rect::new(
            -self.width / 2.0,
            -self.height / 2.0,
            self.width / 2.0,
            self.height / 2.0,
        )
    }

    /// Transform from local coordinates (center-relative) to world coordinates.
    pub fn local_to_world(&self) -> Affine {
        Affine::translate(self.center().to_vec2()) * Affine::rotate(self.rotation.to_radians())
    }

    /// Rotated corners in world space: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let r = self.local_rect();
        [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ]
        .map(|p| to_world(p, self))
    }

    /// Axis-aligned bounding box of the rotated frame.
    pub fn world_bounds(&self) -> Rect {
        if self.rotation.abs() < 1e-9 {
            return self.as_rect();
        }
        let corners = self.corners();
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Containment test against the unrotated box.
    pub fn contains_unrotated(&self, point: Point) -> bool {
        self.as_rect().contains(point)
    }

    /// Containment test against the rotated box.
    pub fn contains(&self, point: Point) -> bool {
        let local = to_local(point, self);
        let r = self.local_rect();
        local.x >= r.x0 && local.x <= r.x1 && local.y >= r.y0 && local.y <= r.y1
    }

    /// Translate the frame so its top-left lands on `origin`.
    pub fn moved_to(mut self, origin: Point) -> Self {
        self.x = origin.x;
        self.y = origin.y;
        self
    }

    /// Clamp the size to the minimum element size.
    pub fn clamped(mut self) -> Self {
        self.width = self.width.max(MIN_ELEMENT_SIZE);
        self.height = self.height.max(MIN_ELEMENT_SIZE);
        self
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(0.0, 0.0, MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE)
    }
}
