//! Obstacle element: fixtures that take up floor space but seat nobody.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Element, ElementId, ElementKind, SerializableColor};
use crate::geometry::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Wall,
    Door,
    Window,
    Pillar,
    BarCounter,
    Kitchen,
    Restroom,
    Stairs,
    Plant,
    #[default]
    Other,
}

impl ObstacleKind {
    pub fn default_color(self) -> SerializableColor {
        match self {
            ObstacleKind::Wall => SerializableColor::rgb(0x42, 0x42, 0x42),
            ObstacleKind::Door => SerializableColor::rgb(0xa1, 0x88, 0x7f),
            ObstacleKind::Window => SerializableColor::rgb(0x81, 0xd4, 0xfa),
            ObstacleKind::Pillar => SerializableColor::rgb(0x75, 0x75, 0x75),
            ObstacleKind::BarCounter => SerializableColor::rgb(0x6d, 0x4c, 0x41),
            ObstacleKind::Kitchen => SerializableColor::rgb(0xff, 0xcc, 0x80),
            ObstacleKind::Restroom => SerializableColor::rgb(0xb0, 0xbe, 0xc5),
            ObstacleKind::Stairs => SerializableColor::rgb(0xbc, 0xaa, 0xa4),
            ObstacleKind::Plant => SerializableColor::rgb(0x66, 0xbb, 0x6a),
            ObstacleKind::Other => SerializableColor::rgb(0x9e, 0x9e, 0x9e),
        }
    }

    /// Footprint used when the obstacle is placed with the add tool.
    pub fn default_size(self) -> Size {
        match self {
            ObstacleKind::Wall => Size::new(200.0, 20.0),
            ObstacleKind::Door => Size::new(80.0, 20.0),
            ObstacleKind::Window => Size::new(120.0, 20.0),
            ObstacleKind::Pillar => Size::new(40.0, 40.0),
            ObstacleKind::BarCounter => Size::new(240.0, 60.0),
            ObstacleKind::Kitchen => Size::new(200.0, 160.0),
            ObstacleKind::Restroom => Size::new(120.0, 100.0),
            ObstacleKind::Stairs => Size::new(100.0, 140.0),
            ObstacleKind::Plant => Size::new(40.0, 40.0),
            ObstacleKind::Other => Size::new(80.0, 80.0),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ObstacleKind::Wall => "Wall",
            ObstacleKind::Door => "Door",
            ObstacleKind::Window => "Window",
            ObstacleKind::Pillar => "Pillar",
            ObstacleKind::BarCounter => "Bar counter",
            ObstacleKind::Kitchen => "Kitchen",
            ObstacleKind::Restroom => "Restroom",
            ObstacleKind::Stairs => "Stairs",
            ObstacleKind::Plant => "Plant",
            ObstacleKind::Other => "Obstacle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    #[serde(default = "Uuid::new_v4")]
    pub id: ElementId,
    #[serde(default)]
    pub kind: ObstacleKind,
    #[serde(default)]
    pub label: String,
    /// Overrides the kind's default color.
    #[serde(default)]
    pub color: Option<SerializableColor>,
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub locked: bool,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, frame: Frame) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: kind.display_name().to_string(),
            color: None,
            frame,
            z_index: 0,
            locked: false,
        }
    }

    pub fn color(&self) -> SerializableColor {
        self.color.unwrap_or_else(|| self.kind.default_color())
    }
}

impl Element for Obstacle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Obstacle
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn set_z_index(&mut self, z: i32) {
        self.z_index = z;
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleUpdate {
    pub kind: Option<ObstacleKind>,
    pub label: Option<String>,
    /// `Some(None)` reverts to the kind's default color.
    pub color: Option<Option<SerializableColor>>,
    pub locked: Option<bool>,
}

impl ObstacleUpdate {
    pub fn apply(self, obstacle: &mut Obstacle) -> bool {
        let before = obstacle.clone();
        if let Some(kind) = self.kind {
            obstacle.kind = kind;
        }
        if let Some(label) = self.label {
            obstacle.label = label;
        }
        if let Some(color) = self.color {
            obstacle.color = color;
        }
        if let Some(locked) = self.locked {
            obstacle.locked = locked;
        }
        *obstacle != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_falls_back_to_kind() {
        let mut pillar = Obstacle::new(ObstacleKind::Pillar, Frame::new(0.0, 0.0, 40.0, 40.0));
        assert_eq!(pillar.color(), ObstacleKind::Pillar.default_color());
        pillar.color = Some(SerializableColor::rgb(1, 2, 3));
        assert_eq!(pillar.color(), SerializableColor::rgb(1, 2, 3));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_value(ObstacleKind::BarCounter).unwrap();
        assert_eq!(json, "bar_counter");
    }

    #[test]
    fn test_update_changes_kind_and_resets_color() {
        let mut wall = Obstacle::new(ObstacleKind::Wall, Frame::new(0.0, 0.0, 200.0, 20.0));
        wall.color = Some(SerializableColor::black());
        let changed = ObstacleUpdate {
            kind: Some(ObstacleKind::Window),
            color: Some(None),
            ..Default::default()
        }
        .apply(&mut wall);
        assert!(changed);
        assert_eq!(wall.kind, ObstacleKind::Window);
        assert_eq!(wall.color(), ObstacleKind::Window.default_color());
    }
}
