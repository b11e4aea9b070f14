//! Floor-plan core library
//!
//! Geometry, scene model and interaction engine for laying out a restaurant
//! floor: zones, tables with generated chairs, and fixed obstacles.
//! Platform-agnostic; hosts feed pointer and key events into [`Editor`] and
//! render the [`Scene`] however they like.

pub mod camera;
pub mod chairs;
pub mod editor;
pub mod elements;
pub mod geometry;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod layout;
pub mod scene;
pub mod snap;
pub mod tools;

pub use camera::Camera;
pub use chairs::{ChairPlacement, generate_chair_positions};
pub use editor::{Editor, EditorAction, EditorConfig};
pub use elements::{
    Element, ElementId, ElementKind, ElementRef, Obstacle, ObstacleKind, SceneElement,
    SerializableColor, Table, TableShape, Zone,
};
pub use geometry::{Frame, MIN_ELEMENT_SIZE};
pub use gesture::Gesture;
pub use hit::{CursorKind, Hit, HitPart, ResizeHandle, SelectionHitMode};
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use layout::{LayoutDocument, LayoutError};
pub use scene::Scene;
pub use snap::{ANGLE_SNAP_INCREMENT, GRID_SIZE, snap, snap_angle, snap_point};
pub use tools::{ToolDefaults, ToolKind};
