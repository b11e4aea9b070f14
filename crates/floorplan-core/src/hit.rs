//! Hit-testing against elements and their selection handles.
//!
//! Handle sizes are in screen pixels and get divided by the camera zoom, so
//! handles keep a constant on-screen size at every zoom level.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::elements::{Element, ElementRef};
use crate::geometry::{Frame, normalize_degrees, to_local, to_world};
use crate::scene::Scene;

/// Resize handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Resize handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Distance of the rotate handle above the top edge, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 28.0;
/// Rotate handle hit radius in screen pixels.
pub const ROTATE_HANDLE_RADIUS: f64 = 10.0;

/// Resize handle, named by compass direction in the element's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// Clockwise from north.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
        ResizeHandle::Nw,
    ];

    /// -1 for west handles, 1 for east handles, 0 otherwise.
    pub fn x_sign(self) -> f64 {
        match self {
            ResizeHandle::Ne | ResizeHandle::E | ResizeHandle::Se => 1.0,
            ResizeHandle::Nw | ResizeHandle::W | ResizeHandle::Sw => -1.0,
            ResizeHandle::N | ResizeHandle::S => 0.0,
        }
    }

    /// -1 for north handles, 1 for south handles, 0 otherwise.
    pub fn y_sign(self) -> f64 {
        match self {
            ResizeHandle::Se | ResizeHandle::S | ResizeHandle::Sw => 1.0,
            ResizeHandle::Ne | ResizeHandle::N | ResizeHandle::Nw => -1.0,
            ResizeHandle::E | ResizeHandle::W => 0.0,
        }
    }

    /// Handle position in the local frame (center-relative).
    pub fn local_position(self, frame: &Frame) -> Point {
        Point::new(
            self.x_sign() * frame.width / 2.0,
            self.y_sign() * frame.height / 2.0,
        )
    }

    /// Handle position in world space.
    pub fn world_position(self, frame: &Frame) -> Point {
        to_world(self.local_position(frame), frame)
    }

    /// Compass bearing of the handle, clockwise from north.
    fn bearing(self) -> f64 {
        match self {
            ResizeHandle::N => 0.0,
            ResizeHandle::Ne => 45.0,
            ResizeHandle::E => 90.0,
            ResizeHandle::Se => 135.0,
            ResizeHandle::S => 180.0,
            ResizeHandle::Sw => 225.0,
            ResizeHandle::W => 270.0,
            ResizeHandle::Nw => 315.0,
        }
    }

    /// Directional cursor for this handle on an element rotated by `rotation` degrees.
    pub fn cursor(self, rotation: f64) -> CursorKind {
        let bearing = normalize_degrees(self.bearing() + rotation);
        let sector = ((bearing / 45.0).round() as i64).rem_euclid(8);
        match sector % 4 {
            0 => CursorKind::ResizeNs,
            1 => CursorKind::ResizeNeSw,
            2 => CursorKind::ResizeEw,
            _ => CursorKind::ResizeNwSe,
        }
    }
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CursorKind {
    #[default]
    Default,
    Move,
    Grab,
    Grabbing,
    Rotate,
    Crosshair,
    NotAllowed,
    ResizeNs,
    ResizeEw,
    ResizeNeSw,
    ResizeNwSe,
}

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitPart {
    Body,
    Resize(ResizeHandle),
    Rotate,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hit {
    pub target: ElementRef,
    pub part: HitPart,
}

/// How element bodies are tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionHitMode {
    /// Axis-aligned test against the unrotated box.
    #[default]
    Bounds,
    /// Test against the rotated box.
    Rotated,
}

impl SelectionHitMode {
    pub fn contains(self, frame: &Frame, point: Point) -> bool {
        match self {
            SelectionHitMode::Bounds => frame.contains_unrotated(point),
            SelectionHitMode::Rotated => frame.contains(point),
        }
    }
}

fn safe_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 }
}

/// Rotate handle position in the local frame.
pub fn rotate_handle_local(frame: &Frame, zoom: f64) -> Point {
    Point::new(0.0, -frame.height / 2.0 - ROTATE_HANDLE_OFFSET / safe_zoom(zoom))
}

/// Rotate handle position in world space.
pub fn rotate_handle_position(frame: &Frame, zoom: f64) -> Point {
    to_world(rotate_handle_local(frame, zoom), frame)
}

/// Find the resize handle under `point`, nearest first.
pub fn hit_test_handles(frame: &Frame, point: Point, zoom: f64) -> Option<ResizeHandle> {
    let local = to_local(point, frame);
    let tolerance = HANDLE_HIT_TOLERANCE / safe_zoom(zoom);
    ResizeHandle::ALL
        .iter()
        .map(|&handle| (handle, handle.local_position(frame).distance(local)))
        .filter(|&(_, dist)| dist <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(handle, _)| handle)
}

/// Whether `point` is on the rotate handle.
pub fn hit_test_rotate_handle(frame: &Frame, point: Point, zoom: f64) -> bool {
    let local = to_local(point, frame);
    local.distance(rotate_handle_local(frame, zoom)) <= ROTATE_HANDLE_RADIUS / safe_zoom(zoom)
}

fn topmost<'a, T: Element + 'a>(
    ordered: Vec<&'a T>,
    point: Point,
    mode: SelectionHitMode,
) -> Option<ElementRef> {
    ordered
        .into_iter()
        .rev()
        .find(|e| mode.contains(e.frame(), point))
        .map(|e| e.element_ref())
}

/// Topmost element body under `point`: tables, then obstacles, then zones.
pub fn hit_test(scene: &Scene, point: Point, mode: SelectionHitMode) -> Option<ElementRef> {
    topmost(scene.tables_ordered(), point, mode)
        .or_else(|| topmost(scene.obstacles_ordered(), point, mode))
        .or_else(|| topmost(scene.zones_ordered(), point, mode))
}

/// Full pointer-down hit test: handles of the selected element first, then bodies.
///
/// Locked elements expose no handles.
pub fn hit_test_selection(
    scene: &Scene,
    selected: Option<ElementRef>,
    point: Point,
    zoom: f64,
    mode: SelectionHitMode,
) -> Option<Hit> {
    let handles_of = selected.and_then(|target| {
        scene
            .get(target)
            .filter(|element| !element.is_locked())
            .map(|element| (target, *element.frame()))
    });
    if let Some((target, frame)) = handles_of {
        if hit_test_rotate_handle(&frame, point, zoom) {
            return Some(Hit {
                target,
                part: HitPart::Rotate,
            });
        }
        if let Some(handle) = hit_test_handles(&frame, point, zoom) {
            return Some(Hit {
                target,
                part: HitPart::Resize(handle),
            });
        }
    }

    hit_test(scene, point, mode).map(|target| Hit {
        target,
        part: HitPart::Body,
    })
}
