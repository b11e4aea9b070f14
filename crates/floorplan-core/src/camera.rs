//! Pan/zoom view over the floor plan.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom.
pub const MIN_ZOOM: f64 = 0.25;
/// Largest allowed zoom.
pub const MAX_ZOOM: f64 = 3.0;
/// Zoom change per scroll notch.
pub const ZOOM_STEP: f64 = 0.1;

/// View transform: `screen = canvas * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    /// Pan offset in screen pixels.
    pub offset: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera with custom zoom limits (swapped if given in the wrong order).
    pub fn with_limits(min_zoom: f64, max_zoom: f64) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        Self {
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Canvas to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to canvas.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// `(screen - offset) / zoom`.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        ((screen_point - self.offset).to_vec2() / self.zoom).to_point()
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        (world_point.to_vec2() * self.zoom + self.offset).to_point()
    }

    /// Convert a screen-space length (handle sizes, tolerances) to canvas units.
    pub fn screen_dist_to_world(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom (clamped), keeping the canvas point under `screen_point` fixed.
    ///
    /// Returns whether the zoom changed.
    pub fn zoom_to(&mut self, screen_point: Point, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let anchor = self.screen_to_world(screen_point);
        self.zoom = new_zoom;
        self.offset = screen_point.to_vec2() - anchor.to_vec2() * new_zoom;
        true
    }

    /// Zoom by `steps` scroll notches (positive zooms in) around `screen_point`.
    pub fn zoom_step_at(&mut self, screen_point: Point, steps: f64, step: f64) -> bool {
        self.zoom_to(screen_point, self.zoom + steps * step)
    }

    /// Reset pan and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
    }

    /// Fit the camera to show `bounds` inside `viewport`.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let available = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = available.width / bounds.width();
        let scale_y = available.height / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let viewport_center = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);
        self.offset = viewport_center - bounds.center().to_vec2() * self.zoom;
    }

    /// Canvas-space rectangle currently visible in a viewport of `size`.
    pub fn visible_rect(&self, size: Size) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(size.width, size.height)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        assert!((camera.min_zoom - MIN_ZOOM).abs() < f64::EPSILON);
        assert!((camera.max_zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_offset() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        let world = camera.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_zoom_and_offset() {
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        camera.offset = Vec2::new(20.0, -40.0);
        let world = camera.screen_to_world(Point::new(120.0, 160.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;

        let original = Point::new(123.0, 456.0);
        let back = camera.world_to_screen(camera.screen_to_world(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);

        let via_affine = camera.inverse_transform() * original;
        let direct = camera.screen_to_world(original);
        assert!((via_affine.x - direct.x).abs() < 1e-10);
        assert!((via_affine.y - direct.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_to(Point::ZERO, 0.001);
        assert!((camera.zoom - MIN_ZOOM).abs() < f64::EPSILON);

        camera.zoom_to(Point::ZERO, 1000.0);
        assert!((camera.zoom - MAX_ZOOM).abs() < f64::EPSILON);

        assert!(!camera.zoom_to(Point::ZERO, 1000.0));
        assert!(!camera.zoom_to(Point::ZERO, f64::NAN));
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(15.0, 25.0);
        let cursor = Point::new(300.0, 200.0);
        let before = camera.screen_to_world(cursor);

        assert!(camera.zoom_step_at(cursor, 3.0, ZOOM_STEP));
        assert!((camera.zoom - 1.3).abs() < 1e-9);
        let after = camera.screen_to_world(cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_pan() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((camera.offset.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_dist_scales_with_zoom() {
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        assert!((camera.screen_dist_to_world(8.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_bounds_centers_content() {
        let mut camera = Camera::new();
        let bounds = Rect::new(0.0, 0.0, 400.0, 200.0);
        let viewport = Size::new(800.0, 600.0);
        camera.fit_to_bounds(bounds, viewport, 0.0);
        assert!((camera.zoom - 2.0).abs() < f64::EPSILON);
        let center = camera.world_to_screen(bounds.center());
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_limits_orders_bounds() {
        let camera = Camera::with_limits(2.0, 0.5);
        assert!((camera.min_zoom - 0.5).abs() < f64::EPSILON);
        assert!((camera.max_zoom - 2.0).abs() < f64::EPSILON);
    }
}
