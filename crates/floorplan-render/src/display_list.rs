//! Backend-agnostic renderer that records draw commands.
//!
//! Paths are in local coordinates and every command carries the full
//! transform to device space, so a backend only has to replay the list.
//! Draw order: background, grid, canvas border, zones, obstacles, each
//! table's chairs then the table, hover outline, selection overlay. Labels
//! follow the element they name.

use floorplan_core::elements::{Chair, ElementKind, SeatType, Table, TableStatus};
use floorplan_core::hit::{HANDLE_SIZE, ResizeHandle, rotate_handle_local};
use floorplan_core::{Frame, Scene};
use kurbo::{Affine, BezPath, Circle, Ellipse, Point, Rect, RoundedRect, Shape, Stroke};
use peniko::Color;

use crate::palette;
use crate::renderer::{GridStyle, RenderContext, Renderer};

/// Grids denser than this many device pixels per cell are skipped.
const MIN_GRID_SPACING: f64 = 4.0;
const LABEL_SIZE: f64 = 13.0;
const SMALL_LABEL_SIZE: f64 = 10.0;

/// What a command belongs to, so hosts and tests can filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Grid,
    Canvas,
    Zones,
    Obstacles,
    Chairs,
    Tables,
    Labels,
    Hover,
    Selection,
    Handles,
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    Fill {
        path: BezPath,
        transform: Affine,
        color: Color,
    },
    Stroke {
        path: BezPath,
        transform: Affine,
        color: Color,
        stroke: Stroke,
    },
    /// Centered text. `size` is in canvas units.
    Text {
        text: String,
        position: Point,
        transform: Affine,
        color: Color,
        size: f64,
    },
}

#[derive(Debug, Clone)]
pub struct DrawItem {
    pub layer: Layer,
    pub command: DrawCommand,
}

/// Recorded commands for one frame.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    items: Vec<DrawItem>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items on one layer, in draw order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.items
            .iter()
            .filter(move |item| item.layer == layer)
            .map(|item| &item.command)
    }

    pub fn fill(&mut self, layer: Layer, path: BezPath, transform: Affine, color: Color) {
        self.push(layer, DrawCommand::Fill {
            path,
            transform,
            color,
        });
    }

    pub fn stroke(
        &mut self,
        layer: Layer,
        path: BezPath,
        transform: Affine,
        color: Color,
        stroke: Stroke,
    ) {
        self.push(layer, DrawCommand::Stroke {
            path,
            transform,
            color,
            stroke,
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        position: Point,
        transform: Affine,
        color: Color,
        size: f64,
    ) {
        self.push(Layer::Labels, DrawCommand::Text {
            text: text.into(),
            position,
            transform,
            color,
            size,
        });
    }

    fn push(&mut self, layer: Layer, command: DrawCommand) {
        self.items.push(DrawItem { layer, command });
    }
}

/// [`Renderer`] that records a [`DisplayList`].
#[derive(Debug)]
pub struct DisplayListRenderer {
    list: DisplayList,
    zoom: f64,
}

impl Default for DisplayListRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self {
            list: DisplayList::new(),
            zoom: 1.0,
        }
    }

    /// Commands from the last [`Renderer::build_scene`].
    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    pub fn take_display_list(&mut self) -> DisplayList {
        std::mem::take(&mut self.list)
    }

    /// Stroke whose device width stays constant across zoom levels.
    fn hairline(&self, width: f64) -> Stroke {
        Stroke::new(width / self.zoom)
    }

    fn dashed(&self, width: f64) -> Stroke {
        let dash = 4.0 / self.zoom;
        self.hairline(width).with_dashes(0.0, [dash, dash])
    }

    fn render_background(&mut self, ctx: &RenderContext, view: Affine) {
        let viewport = ctx.camera.visible_rect(ctx.viewport_size);
        self.list
            .fill(Layer::Background, viewport.to_path(0.1), view, palette::OUTSIDE);
        let canvas = Rect::from_origin_size(Point::ZERO, ctx.scene.size);
        self.list
            .fill(Layer::Background, canvas.to_path(0.1), view, ctx.background_color);
    }

    fn render_grid(&mut self, ctx: &RenderContext, view: Affine) {
        let grid_size = ctx.scene.grid_size;
        if ctx.grid_style == GridStyle::None || !(grid_size > 0.0) {
            return;
        }
        if grid_size * self.zoom * ctx.scale_factor < MIN_GRID_SPACING {
            log::trace!("grid skipped at zoom {}", self.zoom);
            return;
        }

        let canvas = Rect::from_origin_size(Point::ZERO, ctx.scene.size);
        let area = canvas.intersect(ctx.camera.visible_rect(ctx.viewport_size));
        if area.width() <= 0.0 || area.height() <= 0.0 {
            return;
        }
        let start_x = (area.x0 / grid_size).ceil() * grid_size;
        let start_y = (area.y0 / grid_size).ceil() * grid_size;

        // One batched path per frame
        let mut path = BezPath::new();
        match ctx.grid_style {
            GridStyle::Lines => {
                let mut x = start_x;
                while x <= area.x1 {
                    path.move_to(Point::new(x, area.y0));
                    path.line_to(Point::new(x, area.y1));
                    x += grid_size;
                }
                let mut y = start_y;
                while y <= area.y1 {
                    path.move_to(Point::new(area.x0, y));
                    path.line_to(Point::new(area.x1, y));
                    y += grid_size;
                }
                let stroke = self.hairline(0.5);
                self.list
                    .stroke(Layer::Grid, path, view, palette::GRID_LINE, stroke);
            }
            GridStyle::Dots => {
                let r = 1.5 / self.zoom;
                let mut x = start_x;
                while x <= area.x1 {
                    let mut y = start_y;
                    while y <= area.y1 {
                        let dot = Rect::new(x - r, y - r, x + r, y + r);
                        path.extend(dot.path_elements(0.1));
                        y += grid_size;
                    }
                    x += grid_size;
                }
                self.list.fill(Layer::Grid, path, view, palette::GRID_DOT);
            }
            GridStyle::None => {}
        }
    }

    fn render_canvas_border(&mut self, scene: &Scene, view: Affine) {
        let canvas = Rect::from_origin_size(Point::ZERO, scene.size);
        let stroke = self.hairline(1.0);
        self.list.stroke(
            Layer::Canvas,
            canvas.to_path(0.1),
            view,
            palette::CANVAS_BORDER,
            stroke,
        );
    }

    fn render_zones(&mut self, scene: &Scene, view: Affine) {
        for zone in scene.zones_ordered() {
            let transform = view * zone.frame.local_to_world();
            let rect = zone.frame.local_rect();
            let path = RoundedRect::from_rect(rect, 6.0).to_path(0.1);
            self.list
                .fill(Layer::Zones, path.clone(), transform, palette::zone_fill(zone));
            let stroke = self.dashed(1.5);
            self.list
                .stroke(Layer::Zones, path, transform, palette::zone_border(zone), stroke);
            // Name sits just inside the top edge
            let position = Point::new(0.0, rect.y0 + LABEL_SIZE);
            self.list
                .text(zone.name.clone(), position, transform, palette::LABEL, LABEL_SIZE);
        }
    }

    fn render_obstacles(&mut self, scene: &Scene, view: Affine) {
        for obstacle in scene.obstacles_ordered() {
            let transform = view * obstacle.frame.local_to_world();
            let path = obstacle.frame.local_rect().to_path(0.1);
            self.list.fill(
                Layer::Obstacles,
                path.clone(),
                transform,
                palette::obstacle_fill(obstacle),
            );
            let stroke = self.hairline(1.0);
            self.list
                .stroke(Layer::Obstacles, path, transform, palette::OUTLINE, stroke);

            let label = if obstacle.label.is_empty() {
                obstacle.kind.display_name()
            } else {
                obstacle.label.as_str()
            };
            // Text never rotates; anchor it at the world center
            self.list.text(
                label,
                obstacle.frame.center(),
                view,
                palette::LABEL,
                SMALL_LABEL_SIZE,
            );
        }
    }

    fn render_tables(&mut self, scene: &Scene, view: Affine) {
        for table in scene.tables_ordered() {
            let transform = view * table.frame.local_to_world();
            for chair in &table.chairs {
                self.render_chair(chair, transform);
            }
            self.render_table(table, view, transform);
        }
    }

    fn render_chair(&mut self, chair: &Chair, table_transform: Affine) {
        let transform = table_transform
            * Affine::translate(chair.offset().to_vec2())
            * Affine::rotate(chair.rotation.to_radians());
        let half = floorplan_core::chairs::CHAIR_SIZE / 2.0;
        let path = match chair.seat_type {
            SeatType::Stool => Circle::new(Point::ZERO, half * 0.8).to_path(0.1),
            SeatType::Bench => {
                RoundedRect::new(-half * 1.6, -half * 0.7, half * 1.6, half * 0.7, 2.0).to_path(0.1)
            }
            SeatType::Armchair => {
                RoundedRect::new(-half * 1.2, -half * 1.2, half * 1.2, half * 1.2, half * 0.5)
                    .to_path(0.1)
            }
            SeatType::Chair => RoundedRect::new(-half, -half, half, half, 3.0).to_path(0.1),
        };
        self.list
            .fill(Layer::Chairs, path.clone(), transform, palette::CHAIR_FILL);
        let stroke = self.hairline(1.0);
        self.list
            .stroke(Layer::Chairs, path, transform, palette::CHAIR_OUTLINE, stroke);
    }

    fn render_table(&mut self, table: &Table, view: Affine, transform: Affine) {
        let rect = table.frame.local_rect();
        let path = if table.shape.is_elliptical() {
            Ellipse::from_rect(rect).to_path(0.1)
        } else {
            RoundedRect::from_rect(rect, 4.0).to_path(0.1)
        };
        self.list
            .fill(Layer::Tables, path.clone(), transform, palette::table_fill(table));
        let stroke = match table.status {
            TableStatus::Active => self.hairline(1.5),
            TableStatus::Disabled | TableStatus::Seasonal => self.dashed(1.5),
        };
        self.list
            .stroke(Layer::Tables, path, transform, palette::OUTLINE, stroke);

        let center = table.frame.center();
        self.list.text(
            table.label.clone(),
            center - kurbo::Vec2::new(0.0, SMALL_LABEL_SIZE / 2.0),
            view,
            palette::LABEL,
            LABEL_SIZE,
        );
        self.list.text(
            format!("{}/{}", table.chairs.len(), table.capacity),
            center + kurbo::Vec2::new(0.0, LABEL_SIZE / 2.0 + 1.0),
            view,
            palette::LABEL,
            SMALL_LABEL_SIZE,
        );
    }

    fn outline_path(kind: ElementKind, frame: &Frame, elliptical: bool) -> BezPath {
        let rect = frame.local_rect();
        if kind == ElementKind::Table && elliptical {
            Ellipse::from_rect(rect).to_path(0.1)
        } else {
            rect.to_path(0.1)
        }
    }

    fn render_hover(&mut self, ctx: &RenderContext, view: Affine) {
        let Some(target) = ctx.hovered.filter(|h| Some(*h) != ctx.selected) else {
            return;
        };
        let Some(element) = ctx.scene.get(target) else {
            return;
        };
        let frame = *element.frame();
        let elliptical = ctx
            .scene
            .table(target.id)
            .is_some_and(|t| t.shape.is_elliptical());
        let path = Self::outline_path(target.kind, &frame, elliptical);
        let stroke = self.hairline(2.0);
        self.list.stroke(
            Layer::Hover,
            path,
            view * frame.local_to_world(),
            ctx.hover_color,
            stroke,
        );
    }

    fn render_selection(&mut self, ctx: &RenderContext, view: Affine) {
        let Some(target) = ctx.selected else {
            return;
        };
        let Some(element) = ctx.scene.get(target) else {
            return;
        };
        let frame = *element.frame();
        let locked = element.is_locked();
        let transform = view * frame.local_to_world();

        let outline = frame.local_rect().to_path(0.1);
        if locked {
            let stroke = self.dashed(1.5);
            self.list
                .stroke(Layer::Selection, outline, transform, ctx.selection_color, stroke);
            return;
        }
        let stroke = self.hairline(1.5);
        self.list
            .stroke(Layer::Selection, outline, transform, ctx.selection_color, stroke);

        // Stem from the top edge to the rotate knob
        let top = Point::new(0.0, -frame.height / 2.0);
        let knob = rotate_handle_local(&frame, self.zoom);
        let mut stem = BezPath::new();
        stem.move_to(top);
        stem.line_to(knob);
        let stroke = self.hairline(1.0);
        self.list
            .stroke(Layer::Handles, stem, transform, ctx.selection_color, stroke);
        let knob = Circle::new(knob, HANDLE_SIZE / 2.0 / self.zoom).to_path(0.1);
        self.render_handle(knob, transform, ctx.selection_color);

        let half = HANDLE_SIZE / 2.0 / self.zoom;
        for handle in ResizeHandle::ALL {
            let p = handle.local_position(&frame);
            let square = Rect::new(p.x - half, p.y - half, p.x + half, p.y + half).to_path(0.1);
            self.render_handle(square, transform, ctx.selection_color);
        }
    }

    fn render_handle(&mut self, path: BezPath, transform: Affine, color: Color) {
        self.list
            .fill(Layer::Handles, path.clone(), transform, palette::HANDLE_FILL);
        let stroke = self.hairline(1.5);
        self.list
            .stroke(Layer::Handles, path, transform, color, stroke);
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.list.clear();
        self.zoom = if ctx.camera.zoom > 0.0 {
            ctx.camera.zoom
        } else {
            1.0
        };
        let view = ctx.view_transform();

        self.render_background(ctx, view);
        self.render_grid(ctx, view);
        self.render_canvas_border(ctx.scene, view);
        self.render_zones(ctx.scene, view);
        self.render_obstacles(ctx.scene, view);
        self.render_tables(ctx.scene, view);
        self.render_hover(ctx, view);
        self.render_selection(ctx, view);
    }
}
