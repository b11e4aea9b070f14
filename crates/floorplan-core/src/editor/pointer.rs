//! Pointer and scroll handling.

use kurbo::{Point, Vec2};

use super::{Editor, EditorAction};
use crate::elements::ElementRef;
use crate::geometry::Frame;
use crate::gesture::{
    Gesture, moved_frame, panned_offset, pointer_angle, resized_frame, rotated_degrees,
};
use crate::hit::{CursorKind, HitPart, hit_test, hit_test_selection};
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::snap::snap_point;
use crate::tools::ToolKind;

impl Editor {
    /// Dispatch a host pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Vec<EditorAction> {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.on_pointer_down(position, button, modifiers),
            PointerEvent::Up { position, button } => self.on_pointer_up(position, button),
            PointerEvent::Move { position } => self.on_pointer_move(position),
            PointerEvent::Leave => self.on_pointer_leave(),
            PointerEvent::Scroll { position, delta } => self.on_scroll(position, delta),
        }
    }

    /// Pointer pressed at `screen`.
    pub fn on_pointer_down(
        &mut self,
        screen: Point,
        button: MouseButton,
        _modifiers: Modifiers,
    ) -> Vec<EditorAction> {
        // A missed pointer-up must not leave a stale gesture behind
        self.end_gesture();

        match button {
            MouseButton::Middle => {
                self.begin_pan(screen);
                return Vec::new();
            }
            MouseButton::Right => return Vec::new(),
            MouseButton::Left => {}
        }

        let world = self.camera.screen_to_world(screen);
        match self.tool {
            ToolKind::Pan => {
                self.begin_pan(screen);
                Vec::new()
            }
            ToolKind::AddTable | ToolKind::AddZone | ToolKind::AddObstacle => {
                self.create_at(world)
            }
            ToolKind::Select => self.select_at(world),
        }
    }

    fn begin_pan(&mut self, screen: Point) {
        self.gesture = Gesture::Panning {
            start_screen: screen,
            start_offset: self.camera.offset,
        };
        log::debug!("pan gesture started");
    }

    fn create_at(&mut self, world: Point) -> Vec<EditorAction> {
        let origin = snap_point(world, self.scene.grid_size);
        let Some(element) = self.config.defaults.create(self.tool, origin, &self.scene) else {
            return Vec::new();
        };
        let target = self.scene.add(element);
        log::debug!("created {target} at ({}, {})", origin.x, origin.y);

        self.selection = Some(target);
        self.tool = ToolKind::Select;
        self.dirty = true;
        vec![
            EditorAction::ElementCreated(target),
            EditorAction::SelectionChanged(Some(target)),
            EditorAction::ToolChanged(ToolKind::Select),
            EditorAction::RenderNeeded,
        ]
    }

    fn select_at(&mut self, world: Point) -> Vec<EditorAction> {
        let hit = hit_test_selection(
            &self.scene,
            self.selection,
            world,
            self.camera.zoom,
            self.config.hit_mode,
        );
        let Some(hit) = hit else {
            return self.select(None);
        };
        let Some(element) = self.scene.get(hit.target) else {
            return Vec::new();
        };
        let frame = *element.frame();
        let locked = element.is_locked();

        let mut actions = self.select(Some(hit.target));
        if locked {
            return actions;
        }

        self.gesture = match hit.part {
            HitPart::Rotate => {
                let center = frame.center();
                Gesture::Rotating {
                    target: hit.target,
                    center,
                    start_angle: pointer_angle(center, world),
                    start_rotation: frame.rotation,
                }
            }
            HitPart::Resize(handle) => Gesture::Resizing {
                target: hit.target,
                handle,
                start_point: world,
                origin: frame,
            },
            HitPart::Body => Gesture::Moving {
                target: hit.target,
                grab_offset: world - frame.origin(),
            },
        };
        log::debug!("{} gesture started on {}", self.gesture.name(), hit.target);
        if actions.is_empty() {
            actions.push(EditorAction::RenderNeeded);
        }
        actions
    }

    /// Pointer moved to `screen`.
    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<EditorAction> {
        let world = self.camera.screen_to_world(screen);
        let grid = self.scene.grid_size;

        match self.gesture {
            Gesture::Idle => self.update_hover(world),
            Gesture::Panning {
                start_screen,
                start_offset,
            } => {
                let offset = panned_offset(start_offset, start_screen, screen);
                if offset == self.camera.offset {
                    return Vec::new();
                }
                self.camera.offset = offset;
                vec![EditorAction::ViewChanged, EditorAction::RenderNeeded]
            }
            Gesture::Moving {
                target,
                grab_offset,
            } => self.update_frame(target, |frame| moved_frame(frame, world, grab_offset, grid)),
            Gesture::Resizing {
                target,
                handle,
                start_point,
                origin,
            } => self.update_frame(target, |_| {
                resized_frame(&origin, handle, start_point, world, grid)
            }),
            Gesture::Rotating {
                target,
                center,
                start_angle,
                start_rotation,
            } => self.update_frame(target, |frame| Frame {
                rotation: rotated_degrees(start_rotation, start_angle, pointer_angle(center, world)),
                ..*frame
            }),
        }
    }

    fn update_hover(&mut self, world: Point) -> Vec<EditorAction> {
        let hovered = hit_test(&self.scene, world, self.config.hit_mode);
        if hovered == self.hovered {
            return Vec::new();
        }
        self.hovered = hovered;
        vec![EditorAction::RenderNeeded]
    }

    /// Apply a frame computed from the gesture snapshot.
    ///
    /// Ends the gesture quietly when the target no longer exists.
    fn update_frame(
        &mut self,
        target: ElementRef,
        next: impl FnOnce(&Frame) -> Frame,
    ) -> Vec<EditorAction> {
        let Some(element) = self.scene.get_mut(target) else {
            log::debug!("{target} vanished mid-gesture");
            self.gesture = Gesture::Idle;
            return Vec::new();
        };
        let frame = next(element.frame());
        if frame == *element.frame() {
            return Vec::new();
        }
        element.apply_frame(frame);
        self.dirty = true;
        vec![
            EditorAction::ElementUpdated(target),
            EditorAction::RenderNeeded,
        ]
    }

    /// Pointer released; always ends the gesture.
    pub fn on_pointer_up(&mut self, _screen: Point, _button: MouseButton) -> Vec<EditorAction> {
        if self.end_gesture() {
            vec![EditorAction::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Pointer left the canvas; ends the gesture and clears hover.
    pub fn on_pointer_leave(&mut self) -> Vec<EditorAction> {
        let ended = self.end_gesture();
        let unhovered = self.hovered.take().is_some();
        if ended || unhovered {
            vec![EditorAction::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Wheel scroll: one zoom step per notch around the cursor.
    pub fn on_scroll(&mut self, screen: Point, delta: Vec2) -> Vec<EditorAction> {
        if delta.y == 0.0 || !delta.y.is_finite() {
            return Vec::new();
        }
        let steps = -delta.y.signum();
        if self.camera.zoom_step_at(screen, steps, self.config.zoom_step) {
            vec![EditorAction::ViewChanged, EditorAction::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Cursor to show with the pointer at `screen`.
    pub fn cursor_at(&self, screen: Point) -> CursorKind {
        match self.gesture {
            Gesture::Moving { .. } => return CursorKind::Move,
            Gesture::Rotating { .. } => return CursorKind::Rotate,
            Gesture::Panning { .. } => return CursorKind::Grabbing,
            Gesture::Resizing { target, handle, .. } => {
                let rotation = self.scene.get(target).map_or(0.0, |e| e.frame().rotation);
                return handle.cursor(rotation);
            }
            Gesture::Idle => {}
        }

        match self.tool {
            ToolKind::Pan => CursorKind::Grab,
            ToolKind::AddTable | ToolKind::AddZone | ToolKind::AddObstacle => CursorKind::Crosshair,
            ToolKind::Select => {
                let world = self.camera.screen_to_world(screen);
                let hit = hit_test_selection(
                    &self.scene,
                    self.selection,
                    world,
                    self.camera.zoom,
                    self.config.hit_mode,
                );
                let Some(hit) = hit else {
                    return CursorKind::Default;
                };
                let Some(element) = self.scene.get(hit.target) else {
                    return CursorKind::Default;
                };
                match hit.part {
                    HitPart::Rotate => CursorKind::Rotate,
                    HitPart::Resize(handle) => handle.cursor(element.frame().rotation),
                    HitPart::Body if element.is_locked() => CursorKind::Default,
                    HitPart::Body => CursorKind::Move,
                }
            }
        }
    }
}
