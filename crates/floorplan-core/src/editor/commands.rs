//! Keyboard shortcuts and direct edits from property panels.

use kurbo::Vec2;

use super::{Editor, EditorAction};
use crate::elements::{
    ElementId, ElementRef, ObstacleUpdate, SceneElement, TableUpdate, ZoneUpdate,
};
use crate::geometry::Frame;
use crate::gesture::Gesture;
use crate::input::{Key, Modifiers};
use crate::snap::{ANGLE_SNAP_INCREMENT, GRID_SIZE, snap_angle};
use crate::tools::ToolKind;

fn updated(target: ElementRef) -> Vec<EditorAction> {
    vec![
        EditorAction::ElementUpdated(target),
        EditorAction::RenderNeeded,
    ]
}

impl Editor {
    /// Handle a key press.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<EditorAction> {
        match key {
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::Escape => self.cancel(),
            Key::Character(c) if modifiers.command() => match c.to_ascii_lowercase() {
                's' => vec![EditorAction::SaveRequested],
                'd' => self.duplicate_selected(),
                _ => Vec::new(),
            },
            Key::Character(c) => match c.to_ascii_lowercase() {
                'g' => self.toggle_grid(),
                'r' => self.rotate_selected_by(ANGLE_SNAP_INCREMENT),
                _ => Vec::new(),
            },
            Key::Enter => Vec::new(),
        }
    }

    /// Drop the gesture and selection and go back to the select tool.
    pub fn cancel(&mut self) -> Vec<EditorAction> {
        let mut actions = Vec::new();
        if self.end_gesture() {
            actions.push(EditorAction::RenderNeeded);
        }
        actions.extend(self.set_tool(ToolKind::Select));
        actions.extend(self.select(None));
        actions
    }

    /// Remove the selected element.
    pub fn delete_selected(&mut self) -> Vec<EditorAction> {
        let Some(target) = self.selection else {
            return Vec::new();
        };
        self.forget(target);
        if self.scene.remove(target).is_none() {
            return vec![EditorAction::SelectionChanged(None)];
        }
        log::debug!("deleted {target}");
        self.dirty = true;
        vec![
            EditorAction::ElementDeleted(target),
            EditorAction::SelectionChanged(None),
            EditorAction::RenderNeeded,
        ]
    }

    /// Copy the selected element one grid step down and right, and select the copy.
    pub fn duplicate_selected(&mut self) -> Vec<EditorAction> {
        let Some(mut copy) = self.selection.and_then(|t| self.scene.cloned(t)) else {
            return Vec::new();
        };
        copy.regenerate_ids();

        let step = if self.scene.grid_size > 0.0 {
            self.scene.grid_size
        } else {
            GRID_SIZE
        };
        let shift = Vec2::new(step, step);
        match &mut copy {
            SceneElement::Table(table) => {
                table.label = self.scene.next_table_label();
                table.frame = table.frame.moved_to(table.frame.origin() + shift);
            }
            SceneElement::Zone(zone) => {
                zone.frame = zone.frame.moved_to(zone.frame.origin() + shift);
            }
            SceneElement::Obstacle(obstacle) => {
                obstacle.frame = obstacle.frame.moved_to(obstacle.frame.origin() + shift);
            }
        }

        let target = self.scene.add(copy);
        log::debug!("duplicated into {target}");
        self.selection = Some(target);
        self.dirty = true;
        vec![
            EditorAction::ElementCreated(target),
            EditorAction::SelectionChanged(Some(target)),
            EditorAction::RenderNeeded,
        ]
    }

    /// Patch a table. An unknown `zone_id` is ignored.
    pub fn update_table(&mut self, id: ElementId, mut update: TableUpdate) -> Vec<EditorAction> {
        if let Some(Some(zone_id)) = update.zone_id {
            if self.scene.zone(zone_id).is_none() {
                log::warn!("table {id}: zone {zone_id} does not exist, ignored");
                update.zone_id = None;
            }
        }
        let Some(table) = self.scene.table_mut(id) else {
            return Vec::new();
        };
        if !update.apply(table) {
            return Vec::new();
        }
        self.dirty = true;
        updated(ElementRef::table(id))
    }

    pub fn update_zone(&mut self, id: ElementId, update: ZoneUpdate) -> Vec<EditorAction> {
        let Some(zone) = self.scene.zone_mut(id) else {
            return Vec::new();
        };
        if !update.apply(zone) {
            return Vec::new();
        }
        self.dirty = true;
        updated(ElementRef::zone(id))
    }

    pub fn update_obstacle(&mut self, id: ElementId, update: ObstacleUpdate) -> Vec<EditorAction> {
        let Some(obstacle) = self.scene.obstacle_mut(id) else {
            return Vec::new();
        };
        if !update.apply(obstacle) {
            return Vec::new();
        }
        self.dirty = true;
        updated(ElementRef::obstacle(id))
    }

    /// Set an element's frame from a property panel (sizes floored, rotation normalized).
    pub fn set_frame(&mut self, target: ElementRef, frame: Frame) -> Vec<EditorAction> {
        let frame = frame.clamped().with_rotation(frame.rotation);
        let Some(element) = self.scene.get_mut(target) else {
            return Vec::new();
        };
        if *element.frame() == frame {
            return Vec::new();
        }
        element.apply_frame(frame);
        self.dirty = true;
        updated(target)
    }

    /// Seat `count` chairs at a table (clamped to capacity).
    pub fn set_chair_count(&mut self, id: ElementId, count: usize) -> Vec<EditorAction> {
        let Some(table) = self.scene.table_mut(id) else {
            return Vec::new();
        };
        let before = table.chairs.clone();
        table.regenerate_chairs(count);
        if table.chairs == before {
            return Vec::new();
        }
        self.dirty = true;
        updated(ElementRef::table(id))
    }

    /// Re-run the chair layout for a table.
    pub fn rearrange_chairs(&mut self, id: ElementId) -> Vec<EditorAction> {
        let Some(table) = self.scene.table_mut(id) else {
            return Vec::new();
        };
        let before = table.chairs.clone();
        table.rearrange_chairs();
        if table.chairs == before {
            return Vec::new();
        }
        self.dirty = true;
        updated(ElementRef::table(id))
    }

    pub fn bring_to_front(&mut self, target: ElementRef) -> Vec<EditorAction> {
        if !self.scene.bring_to_front(target) {
            return Vec::new();
        }
        self.dirty = true;
        updated(target)
    }

    pub fn send_to_back(&mut self, target: ElementRef) -> Vec<EditorAction> {
        if !self.scene.send_to_back(target) {
            return Vec::new();
        }
        self.dirty = true;
        updated(target)
    }

    /// Straighten the selected element.
    pub fn reset_rotation(&mut self) -> Vec<EditorAction> {
        self.rotate_selected_to(|_| 0.0)
    }

    /// Turn the selected element by `degrees`, landing on a 15 degree step.
    pub fn rotate_selected_by(&mut self, degrees: f64) -> Vec<EditorAction> {
        self.rotate_selected_to(|current| snap_angle(current + degrees, ANGLE_SNAP_INCREMENT))
    }

    fn rotate_selected_to(&mut self, rotation: impl FnOnce(f64) -> f64) -> Vec<EditorAction> {
        let Some(target) = self.selection else {
            return Vec::new();
        };
        if !matches!(self.gesture, Gesture::Idle) {
            return Vec::new();
        }
        let Some(element) = self.scene.get_mut(target) else {
            return Vec::new();
        };
        if element.is_locked() {
            return Vec::new();
        }
        let frame = element.frame().with_rotation(rotation(element.frame().rotation));
        if frame == *element.frame() {
            return Vec::new();
        }
        element.apply_frame(frame);
        self.dirty = true;
        updated(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Obstacle, ObstacleKind, Table, TableShape, Zone};
    use kurbo::Point;

    fn editor_with_table() -> (Editor, ElementRef) {
        let mut editor = Editor::default();
        let target = editor.scene.add(SceneElement::Table(Table::new(
            "T1",
            TableShape::Rectangle,
            Frame::new(100.0, 100.0, 120.0, 80.0),
            6,
        )));
        editor.select(Some(target));
        (editor, target)
    }

    #[test]
    fn test_delete_selected() {
        let (mut editor, target) = editor_with_table();
        let actions = editor.on_key_down(Key::Delete, Modifiers::NONE);
        assert!(actions.contains(&EditorAction::ElementDeleted(target)));
        assert!(editor.scene.is_empty());
        assert_eq!(editor.selection(), None);
        assert!(editor.is_dirty());

        assert!(editor.on_key_down(Key::Backspace, Modifiers::NONE).is_empty());
    }

    #[test]
    fn test_escape_resets_tool_and_selection() {
        let (mut editor, _) = editor_with_table();
        editor.set_tool(ToolKind::AddZone);
        let actions = editor.on_key_down(Key::Escape, Modifiers::NONE);
        assert_eq!(editor.tool(), ToolKind::Select);
        assert_eq!(editor.selection(), None);
        assert!(actions.contains(&EditorAction::ToolChanged(ToolKind::Select)));
    }

    #[test]
    fn test_grid_toggle() {
        let mut editor = Editor::default();
        assert!(editor.show_grid());
        let actions = editor.on_key_down(Key::Character('g'), Modifiers::NONE);
        assert_eq!(actions[0], EditorAction::GridToggled(false));
        assert!(!editor.show_grid());
        editor.on_key_down(Key::Character('G'), Modifiers::NONE);
        assert!(editor.show_grid());
    }

    #[test]
    fn test_save_shortcut() {
        let mut editor = Editor::default();
        assert_eq!(
            editor.on_key_down(Key::Character('s'), Modifiers::CTRL),
            vec![EditorAction::SaveRequested]
        );
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            editor.on_key_down(Key::Character('s'), cmd),
            vec![EditorAction::SaveRequested]
        );
        // Plain `s` does nothing
        assert!(editor.on_key_down(Key::Character('s'), Modifiers::NONE).is_empty());
    }

    #[test]
    fn test_duplicate_shortcut() {
        let (mut editor, original) = editor_with_table();
        editor.on_key_down(Key::Character('d'), Modifiers::CTRL);
        assert_eq!(editor.scene.tables.len(), 2);

        let copy_ref = editor.selection().unwrap();
        assert_ne!(copy_ref, original);
        let source = editor.scene.table(original.id).unwrap();
        let copy = editor.scene.table(copy_ref.id).unwrap();
        assert_eq!(copy.frame.origin(), Point::new(120.0, 120.0));
        assert_eq!(copy.label, "T2");
        assert_eq!(copy.chairs.len(), source.chairs.len());
        assert!(copy.chairs.iter().all(|c| source.chairs.iter().all(|s| s.id != c.id)));
        assert!(copy.z_index > source.z_index);
    }

    #[test]
    fn test_rotate_shortcut() {
        let (mut editor, target) = editor_with_table();
        editor.on_key_down(Key::Character('r'), Modifiers::NONE);
        editor.on_key_down(Key::Character('r'), Modifiers::NONE);
        let rotation = editor.scene.table(target.id).unwrap().frame.rotation;
        assert!((rotation - 30.0).abs() < 1e-9);

        editor.reset_rotation();
        assert!(editor.scene.table(target.id).unwrap().frame.rotation.abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_wraps_around() {
        let (mut editor, target) = editor_with_table();
        editor.scene.table_mut(target.id).unwrap().frame.rotation = 345.0;
        editor.rotate_selected_by(15.0);
        assert!(editor.scene.table(target.id).unwrap().frame.rotation.abs() < f64::EPSILON);
    }

    #[test]
    fn test_locked_element_does_not_rotate() {
        let (mut editor, target) = editor_with_table();
        editor.scene.table_mut(target.id).unwrap().locked = true;
        assert!(editor.rotate_selected_by(15.0).is_empty());
    }

    #[test]
    fn test_update_table_capacity_trims_chairs() {
        let (mut editor, target) = editor_with_table();
        let actions = editor.update_table(
            target.id,
            TableUpdate {
                capacity: Some(2),
                ..Default::default()
            },
        );
        assert!(actions.contains(&EditorAction::ElementUpdated(target)));
        assert_eq!(editor.scene.table(target.id).unwrap().chairs.len(), 2);
    }

    #[test]
    fn test_update_table_rejects_unknown_zone() {
        let (mut editor, target) = editor_with_table();
        let zone = Zone::new("Bar", Frame::new(0.0, 0.0, 100.0, 100.0));
        let zone_id = zone.id;
        editor.scene.add(SceneElement::Zone(zone));

        editor.update_table(
            target.id,
            TableUpdate {
                zone_id: Some(Some(uuid::Uuid::new_v4())),
                ..Default::default()
            },
        );
        assert_eq!(editor.scene.table(target.id).unwrap().zone_id, None);

        editor.update_table(
            target.id,
            TableUpdate {
                zone_id: Some(Some(zone_id)),
                ..Default::default()
            },
        );
        assert_eq!(editor.scene.table(target.id).unwrap().zone_id, Some(zone_id));
    }

    #[test]
    fn test_update_zone_and_obstacle() {
        let mut editor = Editor::default();
        let zone = editor
            .scene
            .add(SceneElement::Zone(Zone::new("A", Frame::new(0.0, 0.0, 100.0, 100.0))));
        let obstacle = editor.scene.add(SceneElement::Obstacle(Obstacle::new(
            ObstacleKind::Door,
            Frame::new(0.0, 0.0, 80.0, 20.0),
        )));

        let actions = editor.update_zone(
            zone.id,
            ZoneUpdate {
                name: Some("Patio".into()),
                ..Default::default()
            },
        );
        assert_eq!(actions[0], EditorAction::ElementUpdated(zone));
        assert_eq!(editor.scene.zone(zone.id).unwrap().name, "Patio");

        editor.update_obstacle(
            obstacle.id,
            ObstacleUpdate {
                locked: Some(true),
                ..Default::default()
            },
        );
        assert!(editor.scene.obstacle(obstacle.id).unwrap().locked);
        assert!(editor.update_zone(uuid::Uuid::new_v4(), ZoneUpdate::default()).is_empty());
    }

    #[test]
    fn test_set_chair_count_clamps() {
        let (mut editor, target) = editor_with_table();
        editor.set_chair_count(target.id, 2);
        assert_eq!(editor.scene.table(target.id).unwrap().chairs.len(), 2);
        editor.set_chair_count(target.id, 40);
        assert_eq!(editor.scene.table(target.id).unwrap().chairs.len(), 6);
        editor.set_chair_count(target.id, usize::MAX);
        assert_eq!(editor.scene.table(target.id).unwrap().chairs.len(), 6);
    }

    #[test]
    fn test_rearrange_chairs_after_manual_edit() {
        let (mut editor, target) = editor_with_table();
        editor.scene.table_mut(target.id).unwrap().chairs[0].offset_x = 999.0;
        assert!(!editor.rearrange_chairs(target.id).is_empty());
        assert!(editor.scene.table(target.id).unwrap().chairs[0].offset_x < 999.0);
        assert!(editor.rearrange_chairs(target.id).is_empty());
    }

    #[test]
    fn test_set_frame_clamps() {
        let (mut editor, target) = editor_with_table();
        editor.set_frame(target, Frame::new(10.0, 10.0, 5.0, 300.0).with_rotation(-90.0));
        let frame = editor.scene.table(target.id).unwrap().frame;
        assert_eq!(frame.width, crate::geometry::MIN_ELEMENT_SIZE);
        assert_eq!(frame.height, 300.0);
        assert!((frame.rotation - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_stacking_commands() {
        let (mut editor, first) = editor_with_table();
        let second = editor.scene.add(SceneElement::Table(Table::new(
            "T2",
            TableShape::Round,
            Frame::new(100.0, 100.0, 80.0, 80.0),
            4,
        )));
        assert!(!editor.bring_to_front(first).is_empty());
        assert_eq!(editor.scene.tables_ordered().last().unwrap().id, first.id);
        assert!(!editor.send_to_back(first).is_empty());
        assert_eq!(editor.scene.tables_ordered().last().unwrap().id, second.id);
    }

    #[test]
    fn test_mark_saved_clears_dirty() {
        let (mut editor, _) = editor_with_table();
        editor.on_key_down(Key::Character('r'), Modifiers::NONE);
        assert!(editor.is_dirty());
        editor.mark_saved();
        assert!(!editor.is_dirty());
    }
}
