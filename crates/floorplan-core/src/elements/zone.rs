//! Zone element: a colored floor area that groups tables.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Element, ElementId, ElementKind, SerializableColor};
use crate::geometry::Frame;

/// A named area of the floor (terrace, main room, bar...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default = "Uuid::new_v4")]
    pub id: ElementId,
    pub name: String,
    #[serde(default = "Zone::default_color")]
    pub color: SerializableColor,
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub locked: bool,
}

impl Zone {
    pub fn new(name: impl Into<String>, frame: Frame) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: Self::default_color(),
            frame,
            z_index: 0,
            locked: false,
        }
    }

    pub fn default_color() -> SerializableColor {
        SerializableColor::new(0x60, 0xa5, 0xfa, 0x33)
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }
}

impl Element for Zone {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Zone
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
        &self.name
    }
}

/// Partial update for a zone; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneUpdate {
    pub name: Option<String>,
    pub color: Option<SerializableColor>,
    pub locked: Option<bool>,
}

impl ZoneUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.locked.is_none()
    }

    /// Apply to `zone`, returning whether anything changed.
    pub fn apply(self, zone: &mut Zone) -> bool {
        let mut changed = false;
        if let Some(name) = self.name {
            changed |= zone.name != name;
            zone.name = name;
        }
        if let Some(color) = self.color {
            changed |= zone.color != color;
            zone.color = color;
        }
        if let Some(locked) = self.locked {
            changed |= zone.locked != locked;
            zone.locked = locked;
        }
        changed
    }
}
