//! The active pointer gesture and the frame math for each kind.
//!
//! Every update is computed from the snapshot taken when the gesture began,
//! never incrementally from the previous move, so snapping does not drift.

use kurbo::{Point, Vec2};

use crate::elements::ElementRef;
use crate::geometry::{Frame, MIN_ELEMENT_SIZE, rotate_vec, to_world};
use crate::hit::ResizeHandle;
use crate::snap::{ANGLE_SNAP_INCREMENT, snap, snap_angle};

/// The single gesture in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging an element body.
    Moving {
        target: ElementRef,
        /// Pointer minus element origin at grab time (canvas units).
        grab_offset: Vec2,
    },
    /// Dragging a resize handle.
    Resizing {
        target: ElementRef,
        handle: ResizeHandle,
        /// Canvas point where the drag began.
        start_point: Point,
        /// Frame before the drag.
        origin: Frame,
    },
    /// Dragging the rotate handle.
    Rotating {
        target: ElementRef,
        center: Point,
        /// Pointer angle about `center` at grab time, radians.
        start_angle: f64,
        /// Element rotation at grab time, degrees.
        start_rotation: f64,
    },
    /// Dragging the view.
    Panning {
        start_screen: Point,
        start_offset: Vec2,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Element being manipulated, if any.
    pub fn target(&self) -> Option<ElementRef> {
        match self {
            Gesture::Moving { target, .. }
            | Gesture::Resizing { target, .. }
            | Gesture::Rotating { target, .. } => Some(*target),
            Gesture::Idle | Gesture::Panning { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Moving { .. } => "move",
            Gesture::Resizing { .. } => "resize",
            Gesture::Rotating { .. } => "rotate",
            Gesture::Panning { .. } => "pan",
        }
    }
}

/// Frame after dragging the body to `pointer`.
pub fn moved_frame(frame: &Frame, pointer: Point, grab_offset: Vec2, grid_size: f64) -> Frame {
    let origin = pointer - grab_offset;
    Frame {
        x: snap(origin.x, grid_size),
        y: snap(origin.y, grid_size),
        ..*frame
    }
}

/// Frame after dragging `handle` from `start_point` to `pointer`.
///
/// The drag delta is taken into the element's local frame and snapped per
/// axis. Sizes never drop below [`MIN_ELEMENT_SIZE`]. The edge or corner
/// opposite `handle` keeps its world position at any rotation.
pub fn resized_frame(
    origin: &Frame,
    handle: ResizeHandle,
    start_point: Point,
    pointer: Point,
    grid_size: f64,
) -> Frame {
    let local = rotate_vec(pointer - start_point, -origin.rotation);
    let (x0, x1) = resized_span(origin.width, handle.x_sign(), local.x, grid_size);
    let (y0, y1) = resized_span(origin.height, handle.y_sign(), local.y, grid_size);

    // New box in the old local frame, re-centered in world space
    let center = to_world(Point::new((x0 + x1) / 2.0, (y0 + y1) / 2.0), origin);
    let width = x1 - x0;
    let height = y1 - y0;
    Frame {
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
        rotation: origin.rotation,
    }
}

/// Local extent `(start, end)` of one axis after dragging its handle by `delta`.
///
/// Extents are center-relative; the side opposite `sign` never moves.
fn resized_span(size: f64, sign: f64, delta: f64, grid_size: f64) -> (f64, f64) {
    let half = size / 2.0;
    if sign > 0.0 {
        let size = (size + snap(delta, grid_size)).max(MIN_ELEMENT_SIZE);
        (-half, -half + size)
    } else if sign < 0.0 {
        let size = (size - snap(delta, grid_size)).max(MIN_ELEMENT_SIZE);
        (half - size, half)
    } else {
        (-half, half)
    }
}

/// Angle of `point` about `center`, radians.
pub fn pointer_angle(center: Point, point: Point) -> f64 {
    let v = point - center;
    v.y.atan2(v.x)
}

/// Rotation after turning the pointer from `start_angle` to `current_angle`.
///
/// Snapped to 15 degree steps and normalized into `[0, 360)`.
pub fn rotated_degrees(start_rotation: f64, start_angle: f64, current_angle: f64) -> f64 {
    let delta = (current_angle - start_angle).to_degrees();
    snap_angle(start_rotation + delta, ANGLE_SNAP_INCREMENT)
}

/// Pan offset after dragging from `start_screen` to `screen` (raw pixels, no snapping).
pub fn panned_offset(start_offset: Vec2, start_screen: Point, screen: Point) -> Vec2 {
    start_offset + (screen - start_screen)
}
