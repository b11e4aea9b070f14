//! Editor state: scene, camera, tool, selection and the active gesture.
//!
//! Handlers never fail. Each one returns the [`EditorAction`]s it caused so
//! the host can refresh panels or schedule a redraw without diffing.

mod commands;
mod pointer;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::elements::ElementRef;
use crate::gesture::Gesture;
use crate::hit::SelectionHitMode;
use crate::layout::LayoutDocument;
use crate::scene::Scene;
use crate::snap::GRID_SIZE;
use crate::tools::{ToolDefaults, ToolKind};

/// Editor settings a host may load from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Grid size for new scenes.
    pub grid_size: f64,
    /// Grid visibility at startup.
    pub show_grid: bool,
    pub hit_mode: SelectionHitMode,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change per scroll notch.
    pub zoom_step: f64,
    pub defaults: ToolDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            show_grid: true,
            hit_mode: SelectionHitMode::default(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            defaults: ToolDefaults::default(),
        }
    }
}

/// Something the host may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    SelectionChanged(Option<ElementRef>),
    ElementCreated(ElementRef),
    ElementUpdated(ElementRef),
    ElementDeleted(ElementRef),
    /// Pan or zoom changed.
    ViewChanged,
    GridToggled(bool),
    ToolChanged(ToolKind),
    /// The user asked to save (Ctrl/Cmd+S); persisting is up to the host.
    SaveRequested,
    RenderNeeded,
}

/// Interactive floor-plan editor.
#[derive(Debug, Clone)]
pub struct Editor {
    pub scene: Scene,
    pub camera: Camera,
    pub config: EditorConfig,
    tool: ToolKind,
    gesture: Gesture,
    selection: Option<ElementRef>,
    hovered: Option<ElementRef>,
    show_grid: bool,
    dirty: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Editor over an empty scene.
    pub fn new(config: EditorConfig) -> Self {
        let mut scene = Scene::default();
        scene.grid_size = config.grid_size;
        Self::with_scene(scene, config)
    }

    pub fn with_scene(scene: Scene, config: EditorConfig) -> Self {
        Self {
            scene,
            camera: Camera::with_limits(config.min_zoom, config.max_zoom),
            show_grid: config.show_grid,
            config,
            tool: ToolKind::default(),
            gesture: Gesture::Idle,
            selection: None,
            hovered: None,
            dirty: false,
        }
    }

    /// Editor over a loaded layout.
    pub fn from_layout(doc: LayoutDocument, config: EditorConfig) -> Self {
        Self::with_scene(Scene::from_layout(doc), config)
    }

    /// Replace the scene with a loaded layout, dropping selection and gesture.
    pub fn load_layout(&mut self, doc: LayoutDocument) {
        self.scene = Scene::from_layout(doc);
        self.gesture = Gesture::Idle;
        self.selection = None;
        self.hovered = None;
        self.dirty = false;
    }

    /// Snapshot for saving.
    pub fn to_layout(&self) -> LayoutDocument {
        self.scene.to_layout()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) -> Vec<EditorAction> {
        if self.tool == tool {
            return Vec::new();
        }
        self.tool = tool;
        vec![EditorAction::ToolChanged(tool)]
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn selection(&self) -> Option<ElementRef> {
        self.selection
    }

    pub fn hovered(&self) -> Option<ElementRef> {
        self.hovered
    }

    /// Change the selection; stale references select nothing.
    pub fn select(&mut self, target: Option<ElementRef>) -> Vec<EditorAction> {
        let target = target.filter(|t| self.scene.contains(*t));
        if self.selection == target {
            return Vec::new();
        }
        self.selection = target;
        vec![
            EditorAction::SelectionChanged(target),
            EditorAction::RenderNeeded,
        ]
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn toggle_grid(&mut self) -> Vec<EditorAction> {
        self.show_grid = !self.show_grid;
        vec![
            EditorAction::GridToggled(self.show_grid),
            EditorAction::RenderNeeded,
        ]
    }

    /// Whether the scene changed since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn end_gesture(&mut self) -> bool {
        if self.gesture.is_idle() {
            return false;
        }
        log::debug!("{} gesture ended", self.gesture.name());
        self.gesture = Gesture::Idle;
        true
    }

    fn forget(&mut self, target: ElementRef) {
        if self.selection == Some(target) {
            self.selection = None;
        }
        if self.hovered == Some(target) {
            self.hovered = None;
        }
        if self.gesture.target() == Some(target) {
            self.gesture = Gesture::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EditorConfig::default();
        assert!(config.show_grid);
        assert_eq!(config.hit_mode, SelectionHitMode::Bounds);
        assert!((config.min_zoom - 0.25).abs() < f64::EPSILON);
        assert!((config.max_zoom - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"hitMode":"rotated","showGrid":false}"#).unwrap();
        assert_eq!(config.hit_mode, SelectionHitMode::Rotated);
        assert!(!config.show_grid);
        assert!((config.grid_size - GRID_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_editor_uses_config() {
        let config = EditorConfig {
            grid_size: 10.0,
            show_grid: false,
            ..Default::default()
        };
        let editor = Editor::new(config);
        assert!((editor.scene.grid_size - 10.0).abs() < f64::EPSILON);
        assert!(!editor.show_grid());
        assert_eq!(editor.tool(), ToolKind::Select);
        assert!(editor.gesture().is_idle());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_select_ignores_stale_refs() {
        let mut editor = Editor::default();
        let stale = ElementRef::table(uuid::Uuid::new_v4());
        assert!(editor.select(Some(stale)).is_empty());
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_set_tool_reports_change_once() {
        let mut editor = Editor::default();
        assert_eq!(
            editor.set_tool(ToolKind::AddZone),
            vec![EditorAction::ToolChanged(ToolKind::AddZone)]
        );
        assert!(editor.set_tool(ToolKind::AddZone).is_empty());
    }

    #[test]
    fn test_layout_roundtrip_through_editor() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::AddTable);
        editor.on_pointer_down(
            kurbo::Point::new(100.0, 100.0),
            crate::input::MouseButton::Left,
            crate::input::Modifiers::NONE,
        );
        assert!(editor.is_dirty());

        let doc = editor.to_layout();
        let mut other = Editor::default();
        other.load_layout(doc);
        assert_eq!(other.scene, editor.scene);
        assert!(!other.is_dirty());
        assert_eq!(other.selection(), None);
    }
}
