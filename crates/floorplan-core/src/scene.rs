//! The floor-plan scene: every zone, table and obstacle of one layout.

use kurbo::{Rect, Size};
use uuid::Uuid;

use crate::elements::{
    Element, ElementId, ElementKind, ElementRef, Obstacle, SceneElement, Table, Zone,
};
use crate::snap::GRID_SIZE;

/// Default canvas size for new layouts.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(1200.0, 800.0);

/// A layout held in memory while it is edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Layout identifier.
    pub id: Uuid,
    pub name: String,
    /// Logical canvas extent.
    pub size: Size,
    /// Snap grid size; `<= 0` disables snapping.
    pub grid_size: f64,
    pub zones: Vec<Zone>,
    pub tables: Vec<Table>,
    pub obstacles: Vec<Obstacle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Sort by `z_index`, keeping insertion order on ties (back to front).
fn sorted_by_z<T: Element>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|e| e.z_index());
    sorted
}

fn next_z<T: Element>(items: &[T]) -> i32 {
    items.iter().map(Element::z_index).max().map_or(0, |z| z.saturating_add(1))
}

fn min_z<T: Element>(items: &[T]) -> i32 {
    items.iter().map(Element::z_index).min().unwrap_or(0)
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size: DEFAULT_CANVAS_SIZE,
            grid_size: GRID_SIZE,
            zones: Vec::new(),
            tables: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    pub fn zone(&self, id: ElementId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn zone_mut(&mut self, id: ElementId) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.id == id)
    }

    pub fn table(&self, id: ElementId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn table_mut(&mut self, id: ElementId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == id)
    }

    pub fn obstacle(&self, id: ElementId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn obstacle_mut(&mut self, id: ElementId) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }

    /// Look up any element.
    pub fn get(&self, target: ElementRef) -> Option<&dyn Element> {
        match target.kind {
            ElementKind::Zone => self.zone(target.id).map(|z| z as &dyn Element),
            ElementKind::Table => self.table(target.id).map(|t| t as &dyn Element),
            ElementKind::Obstacle => self.obstacle(target.id).map(|o| o as &dyn Element),
        }
    }

    pub fn get_mut(&mut self, target: ElementRef) -> Option<&mut dyn Element> {
        match target.kind {
            ElementKind::Zone => self.zone_mut(target.id).map(|z| z as &mut dyn Element),
            ElementKind::Table => self.table_mut(target.id).map(|t| t as &mut dyn Element),
            ElementKind::Obstacle => self.obstacle_mut(target.id).map(|o| o as &mut dyn Element),
        }
    }

    pub fn contains(&self, target: ElementRef) -> bool {
        self.get(target).is_some()
    }

    /// Clone an element out of the scene.
    pub fn cloned(&self, target: ElementRef) -> Option<SceneElement> {
        match target.kind {
            ElementKind::Zone => self.zone(target.id).cloned().map(SceneElement::Zone),
            ElementKind::Table => self.table(target.id).cloned().map(SceneElement::Table),
            ElementKind::Obstacle => self.obstacle(target.id).cloned().map(SceneElement::Obstacle),
        }
    }

    /// Add an element on top of its group.
    pub fn add(&mut self, element: SceneElement) -> ElementRef {
        let target = element.element_ref();
        match element {
            SceneElement::Zone(mut zone) => {
                zone.z_index = next_z(&self.zones);
                self.zones.push(zone);
            }
            SceneElement::Table(mut table) => {
                table.z_index = next_z(&self.tables);
                self.tables.push(table);
            }
            SceneElement::Obstacle(mut obstacle) => {
                obstacle.z_index = next_z(&self.obstacles);
                self.obstacles.push(obstacle);
            }
        }
        target
    }

    /// Remove an element. Removing a zone detaches the tables that pointed at it.
    pub fn remove(&mut self, target: ElementRef) -> Option<SceneElement> {
        match target.kind {
            ElementKind::Zone => {
                let index = self.zones.iter().position(|z| z.id == target.id)?;
                let zone = self.zones.remove(index);
                for table in &mut self.tables {
                    if table.zone_id == Some(zone.id) {
                        table.zone_id = None;
                    }
                }
                Some(SceneElement::Zone(zone))
            }
            ElementKind::Table => {
                let index = self.tables.iter().position(|t| t.id == target.id)?;
                Some(SceneElement::Table(self.tables.remove(index)))
            }
            ElementKind::Obstacle => {
                let index = self.obstacles.iter().position(|o| o.id == target.id)?;
                Some(SceneElement::Obstacle(self.obstacles.remove(index)))
            }
        }
    }

    /// All elements, zones first, then obstacles, then tables.
    pub fn elements(&self) -> impl Iterator<Item = &dyn Element> {
        self.zones
            .iter()
            .map(|z| z as &dyn Element)
            .chain(self.obstacles.iter().map(|o| o as &dyn Element))
            .chain(self.tables.iter().map(|t| t as &dyn Element))
    }

    /// Zones back to front.
    pub fn zones_ordered(&self) -> Vec<&Zone> {
        sorted_by_z(&self.zones)
    }

    /// Tables back to front.
    pub fn tables_ordered(&self) -> Vec<&Table> {
        sorted_by_z(&self.tables)
    }

    /// Obstacles back to front.
    pub fn obstacles_ordered(&self) -> Vec<&Obstacle> {
        sorted_by_z(&self.obstacles)
    }

    /// Raise an element above the rest of its group.
    pub fn bring_to_front(&mut self, target: ElementRef) -> bool {
        let z = match target.kind {
            ElementKind::Zone => next_z(&self.zones),
            ElementKind::Table => next_z(&self.tables),
            ElementKind::Obstacle => next_z(&self.obstacles),
        };
        self.restack(target, z, true)
    }

    /// Lower an element below the rest of its group.
    pub fn send_to_back(&mut self, target: ElementRef) -> bool {
        let z = match target.kind {
            ElementKind::Zone => min_z(&self.zones),
            ElementKind::Table => min_z(&self.tables),
            ElementKind::Obstacle => min_z(&self.obstacles),
        }
        .saturating_sub(1);
        self.restack(target, z, false)
    }

    fn restack(&mut self, target: ElementRef, z: i32, to_front: bool) -> bool {
        let Some(element) = self.get(target) else {
            return false;
        };
        let current = element.z_index();
        let peers: Vec<i32> = self
            .elements()
            .filter(|e| e.kind() == target.kind && e.id() != target.id)
            .map(|e| e.z_index())
            .collect();
        let already = if to_front {
            peers.iter().all(|&p| p < current)
        } else {
            peers.iter().all(|&p| p > current)
        };
        if already {
            return false;
        }
        if let Some(element) = self.get_mut(target) {
            element.set_z_index(z);
        }
        true
    }

    /// Tables assigned to a zone.
    pub fn tables_in_zone(&self, zone_id: ElementId) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(move |t| t.zone_id == Some(zone_id))
    }

    /// Total number of seats placed in the scene.
    pub fn seat_count(&self) -> usize {
        self.tables.iter().map(|t| t.chairs.len()).sum()
    }

    /// Bounding box of every element (rotation included).
    pub fn bounds(&self) -> Option<Rect> {
        self.elements()
            .map(|e| e.frame().world_bounds())
            .reduce(|acc, r| acc.union(r))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements (chairs not counted).
    pub fn len(&self) -> usize {
        self.zones.len() + self.tables.len() + self.obstacles.len()
    }

    /// Next free `T{n}` table label.
    pub fn next_table_label(&self) -> String {
        let mut n = self.tables.len() + 1;
        loop {
            let label = format!("T{n}");
            if !self.tables.iter().any(|t| t.label == label) {
                return label;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ObstacleKind, TableShape};
    use crate::geometry::Frame;

    fn table_at(x: f64, y: f64) -> Table {
        Table::new("T", TableShape::Rectangle, Frame::new(x, y, 100.0, 60.0), 4)
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new("Main floor");
        assert!(scene.is_empty());
        assert_eq!(scene.grid_size, GRID_SIZE);
    }

    #[test]
    fn test_add_and_get() {
        let mut scene = Scene::default();
        let target = scene.add(SceneElement::Table(table_at(0.0, 0.0)));
        assert_eq!(scene.len(), 1);
        assert_eq!(target.kind, ElementKind::Table);
        assert!(scene.get(target).is_some());
        assert!(scene.get(ElementRef::zone(target.id)).is_none());
    }

    #[test]
    fn test_add_stacks_on_top() {
        let mut scene = Scene::default();
        let a = scene.add(SceneElement::Table(table_at(0.0, 0.0)));
        let b = scene.add(SceneElement::Table(table_at(10.0, 0.0)));
        assert!(scene.get(b).unwrap().z_index() > scene.get(a).unwrap().z_index());
    }

    #[test]
    fn test_remove() {
        let mut scene = Scene::default();
        let target = scene.add(SceneElement::Obstacle(Obstacle::new(
            ObstacleKind::Pillar,
            Frame::new(0.0, 0.0, 40.0, 40.0),
        )));
        let removed = scene.remove(target);
        assert!(matches!(removed, Some(SceneElement::Obstacle(_))));
        assert!(scene.is_empty());
        assert!(scene.remove(target).is_none());
    }

    #[test]
    fn test_removing_zone_clears_table_zone_ids() {
        let mut scene = Scene::default();
        let zone = Zone::new("Patio", Frame::new(0.0, 0.0, 400.0, 400.0));
        let zone_id = zone.id;
        let zone_ref = scene.add(SceneElement::Zone(zone));

        let mut inside = table_at(10.0, 10.0);
        inside.zone_id = Some(zone_id);
        let inside_ref = scene.add(SceneElement::Table(inside));
        let mut other = table_at(500.0, 10.0);
        let unrelated = Uuid::new_v4();
        other.zone_id = Some(unrelated);
        let other_ref = scene.add(SceneElement::Table(other));

        assert_eq!(scene.tables_in_zone(zone_id).count(), 1);
        scene.remove(zone_ref);

        assert_eq!(scene.table(inside_ref.id).unwrap().zone_id, None);
        assert_eq!(scene.table(other_ref.id).unwrap().zone_id, Some(unrelated));
    }

    #[test]
    fn test_z_order() {
        let mut scene = Scene::default();
        let a = scene.add(SceneElement::Table(table_at(0.0, 0.0)));
        let b = scene.add(SceneElement::Table(table_at(0.0, 0.0)));

        let ids: Vec<_> = scene.tables_ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        assert!(scene.bring_to_front(a));
        let ids: Vec<_> = scene.tables_ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        assert!(!scene.bring_to_front(a));

        assert!(scene.send_to_back(a));
        let ids: Vec<_> = scene.tables_ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_ordered_keeps_insertion_on_ties() {
        let mut scene = Scene::default();
        let first = table_at(0.0, 0.0);
        let second = table_at(0.0, 0.0);
        let (id1, id2) = (first.id, second.id);
        scene.tables.push(first);
        scene.tables.push(second);
        let ids: Vec<_> = scene.tables_ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![id1, id2]);
    }

    #[test]
    fn test_bounds_include_rotation() {
        let mut scene = Scene::default();
        assert!(scene.bounds().is_none());
        let mut table = table_at(0.0, 0.0);
        table.frame.rotation = 90.0;
        scene.add(SceneElement::Table(table));
        let bounds = scene.bounds().unwrap();
        assert!((bounds.width() - 60.0).abs() < 1e-9);
        assert!((bounds.height() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_next_table_label_skips_taken() {
        let mut scene = Scene::default();
        assert_eq!(scene.next_table_label(), "T1");
        let mut t = table_at(0.0, 0.0);
        t.label = "T2".into();
        scene.add(SceneElement::Table(t));
        assert_eq!(scene.next_table_label(), "T3");
    }
}
