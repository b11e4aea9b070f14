//! Renderer trait and per-frame context.

use floorplan_core::{Camera, Editor, ElementRef, Scene};
use kurbo::{Affine, Size};
use peniko::Color;
use thiserror::Error;

use crate::palette;

/// Errors a drawing backend may report.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    None,
    #[default]
    Lines,
    /// Dots at grid intersections.
    Dots,
}

impl GridStyle {
    /// Cycle to the next style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Everything a renderer needs for one frame.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    pub background_color: Color,
    pub grid_style: GridStyle,
    pub selection_color: Color,
    pub hover_color: Color,
    pub selected: Option<ElementRef>,
    pub hovered: Option<ElementRef>,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene, camera: &'a Camera, viewport_size: Size) -> Self {
        Self {
            scene,
            camera,
            viewport_size,
            scale_factor: 1.0,
            background_color: palette::BACKGROUND,
            grid_style: GridStyle::Lines,
            selection_color: palette::SELECTION,
            hover_color: palette::HOVER,
            selected: None,
            hovered: None,
        }
    }

    /// Context mirroring the editor's scene, view, grid toggle, selection and hover.
    pub fn from_editor(editor: &'a Editor, viewport_size: Size) -> Self {
        let grid_style = if editor.show_grid() {
            GridStyle::Lines
        } else {
            GridStyle::None
        };
        Self::new(&editor.scene, &editor.camera, viewport_size)
            .with_grid(grid_style)
            .with_selection(editor.selection())
            .with_hover(editor.hovered())
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn with_selection(mut self, selected: Option<ElementRef>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_hover(mut self, hovered: Option<ElementRef>) -> Self {
        self.hovered = hovered;
        self
    }

    /// Canvas-to-device transform.
    pub fn view_transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.camera.transform()
    }
}

/// A drawing backend.
pub trait Renderer: Send + Sync {
    /// Build the draw commands for one frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Clear color.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::EditorConfig;

    #[test]
    fn test_grid_style_cycle() {
        let mut style = GridStyle::default();
        assert_eq!(style, GridStyle::Lines);
        for _ in 0..3 {
            style = style.next();
        }
        assert_eq!(style, GridStyle::Lines);
        assert_eq!(GridStyle::Dots.name(), "Dots");
    }

    #[test]
    fn test_context_from_editor_hidden_grid() {
        let editor = Editor::new(EditorConfig {
            show_grid: false,
            ..Default::default()
        });
        let ctx = RenderContext::from_editor(&editor, Size::new(800.0, 600.0));
        assert_eq!(ctx.grid_style, GridStyle::None);
        assert_eq!(ctx.selected, None);
    }

    #[test]
    fn test_view_transform_applies_scale_factor() {
        let scene = Scene::default();
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        let ctx = RenderContext::new(&scene, &camera, Size::new(100.0, 100.0)).with_scale_factor(1.5);
        let p = ctx.view_transform() * kurbo::Point::new(10.0, 0.0);
        assert!((p.x - 30.0).abs() < 1e-9);
    }
}
