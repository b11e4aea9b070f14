//! Editor tools and the defaults used when placing new elements.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

use crate::elements::{
    Obstacle, ObstacleKind, SceneElement, SerializableColor, Table, TableCategory, TableShape, Zone,
};
use crate::geometry::{Frame, MIN_ELEMENT_SIZE};
use crate::scene::Scene;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    AddTable,
    AddZone,
    AddObstacle,
}

impl ToolKind {
    /// Whether a pointer-down with this tool creates an element.
    pub fn creates_element(self) -> bool {
        matches!(self, ToolKind::AddTable | ToolKind::AddZone | ToolKind::AddObstacle)
    }
}

/// Properties given to elements created with the add tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolDefaults {
    pub table_shape: TableShape,
    pub table_size: Size,
    pub table_capacity: u32,
    pub table_category: TableCategory,
    pub zone_name: String,
    pub zone_size: Size,
    pub zone_color: SerializableColor,
    pub obstacle_kind: ObstacleKind,
    /// Overrides the kind's own default footprint.
    pub obstacle_size: Option<Size>,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            table_shape: TableShape::Rectangle,
            table_size: Size::new(120.0, 80.0),
            table_capacity: 4,
            table_category: TableCategory::Standard,
            zone_name: "Zone".to_string(),
            zone_size: Size::new(320.0, 240.0),
            zone_color: Zone::default_color(),
            obstacle_kind: ObstacleKind::Other,
            obstacle_size: None,
        }
    }
}

fn frame_at(origin: Point, size: Size) -> Frame {
    Frame::new(
        origin.x,
        origin.y,
        size.width.max(MIN_ELEMENT_SIZE),
        size.height.max(MIN_ELEMENT_SIZE),
    )
}

impl ToolDefaults {
    /// Build the element `tool` places with its top-left at `origin`.
    ///
    /// Returns `None` for tools that do not create elements.
    pub fn create(&self, tool: ToolKind, origin: Point, scene: &Scene) -> Option<SceneElement> {
        match tool {
            ToolKind::AddTable => {
                let table = Table::new(
                    scene.next_table_label(),
                    self.table_shape,
                    frame_at(origin, self.table_size),
                    self.table_capacity,
                )
                .with_category(self.table_category);
                Some(SceneElement::Table(table))
            }
            ToolKind::AddZone => {
                let zone = Zone::new(self.zone_name.clone(), frame_at(origin, self.zone_size))
                    .with_color(self.zone_color);
                Some(SceneElement::Zone(zone))
            }
            ToolKind::AddObstacle => {
                let size = self
                    .obstacle_size
                    .unwrap_or_else(|| self.obstacle_kind.default_size());
                Some(SceneElement::Obstacle(Obstacle::new(
                    self.obstacle_kind,
                    frame_at(origin, size),
                )))
            }
            ToolKind::Select | ToolKind::Pan => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::MAX_CAPACITY;

    #[test]
    fn test_default_tool() {
        assert_eq!(ToolKind::default(), ToolKind::Select);
        assert!(!ToolKind::Pan.creates_element());
        assert!(ToolKind::AddZone.creates_element());
    }

    #[test]
    fn test_create_table_is_seated() {
        let defaults = ToolDefaults::default();
        let scene = Scene::default();
        let Some(SceneElement::Table(table)) =
            defaults.create(ToolKind::AddTable, Point::new(40.0, 60.0), &scene)
        else {
            panic!("expected a table");
        };
        assert_eq!(table.label, "T1");
        assert_eq!(table.frame.origin(), Point::new(40.0, 60.0));
        assert_eq!(table.chairs.len(), defaults.table_capacity as usize);
    }

    #[test]
    fn test_create_obstacle_uses_kind_size() {
        let defaults = ToolDefaults {
            obstacle_kind: ObstacleKind::Pillar,
            ..Default::default()
        };
        let element = defaults
            .create(ToolKind::AddObstacle, Point::ZERO, &Scene::default())
            .unwrap();
        assert_eq!(element.frame().size(), ObstacleKind::Pillar.default_size());
    }

    #[test]
    fn test_create_floors_tiny_sizes() {
        let defaults = ToolDefaults {
            zone_size: Size::new(1.0, -5.0),
            ..Default::default()
        };
        let element = defaults
            .create(ToolKind::AddZone, Point::ZERO, &Scene::default())
            .unwrap();
        assert_eq!(element.frame().width, MIN_ELEMENT_SIZE);
        assert_eq!(element.frame().height, MIN_ELEMENT_SIZE);
    }

    #[test]
    fn test_select_creates_nothing() {
        let defaults = ToolDefaults::default();
        assert!(defaults.create(ToolKind::Select, Point::ZERO, &Scene::default()).is_none());
    }

    #[test]
    fn test_defaults_from_partial_json() {
        let defaults: ToolDefaults =
            serde_json::from_str(r#"{"tableShape":"round","tableCapacity":6}"#).unwrap();
        assert_eq!(defaults.table_shape, TableShape::Round);
        assert_eq!(defaults.table_capacity, 6);
        assert_eq!(defaults.zone_name, "Zone");
    }

    #[test]
    fn test_create_table_caps_capacity() {
        let defaults: ToolDefaults =
            serde_json::from_str(r#"{"tableCapacity":4000000000}"#).unwrap();
        let Some(SceneElement::Table(table)) =
            defaults.create(ToolKind::AddTable, Point::ZERO, &Scene::default())
        else {
            panic!("expected a table");
        };
        assert_eq!(table.capacity, MAX_CAPACITY);
        assert_eq!(table.chairs.len(), MAX_CAPACITY as usize);
    }
}
