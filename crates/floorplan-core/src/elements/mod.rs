//! Floor-plan element definitions.

mod obstacle;
mod table;
mod zone;

pub use obstacle::{Obstacle, ObstacleKind, ObstacleUpdate};
pub use table::{
    Chair, MAX_CAPACITY, SeatType, Table, TableCategory, TableShape, TableStatus, TableUpdate,
};
pub use zone::{Zone, ZoneUpdate};

use std::fmt;

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::Frame;

/// Unique identifier for elements and chairs.
pub type ElementId = Uuid;

/// Which collection an element lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Zone,
    Table,
    Obstacle,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Zone => write!(f, "zone"),
            ElementKind::Table => write!(f, "table"),
            ElementKind::Obstacle => write!(f, "obstacle"),
        }
    }
}

/// Typed reference to an element in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: ElementId,
}

impl ElementRef {
    pub fn new(kind: ElementKind, id: ElementId) -> Self {
        Self { kind, id }
    }

    pub fn zone(id: ElementId) -> Self {
        Self::new(ElementKind::Zone, id)
    }

    pub fn table(id: ElementId) -> Self {
        Self::new(ElementKind::Table, id)
    }

    pub fn obstacle(id: ElementId) -> Self {
        Self::new(ElementKind::Obstacle, id)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Error returned when a color string is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`: expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

/// Serializable color representation (RGBA8), stored as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| err())
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }

    /// Hex form; alpha is only written when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Common behaviour of all placed elements.
pub trait Element {
    fn id(&self) -> ElementId;

    fn kind(&self) -> ElementKind;

    fn frame(&self) -> &Frame;

    fn frame_mut(&mut self) -> &mut Frame;

    fn z_index(&self) -> i32;

    fn set_z_index(&mut self, z: i32);

    fn is_locked(&self) -> bool;

    /// Human-readable name used for labels.
    fn label(&self) -> &str;

    fn element_ref(&self) -> ElementRef {
        ElementRef::new(self.kind(), self.id())
    }

    /// Replace the frame. Tables override this to keep their chairs in place.
    fn apply_frame(&mut self, frame: Frame) {
        *self.frame_mut() = frame;
    }

    fn center(&self) -> Point {
        self.frame().center()
    }
}

/// Enum wrapper over the three element types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneElement {
    Zone(Zone),
    Table(Table),
    Obstacle(Obstacle),
}

impl SceneElement {
    pub fn as_element(&self) -> &dyn Element {
        match self {
            SceneElement::Zone(z) => z,
            SceneElement::Table(t) => t,
            SceneElement::Obstacle(o) => o,
        }
    }

    pub fn as_element_mut(&mut self) -> &mut dyn Element {
        match self {
            SceneElement::Zone(z) => z,
            SceneElement::Table(t) => t,
            SceneElement::Obstacle(o) => o,
        }
    }

    pub fn id(&self) -> ElementId {
        self.as_element().id()
    }

    pub fn kind(&self) -> ElementKind {
        self.as_element().kind()
    }

    pub fn element_ref(&self) -> ElementRef {
        self.as_element().element_ref()
    }

    pub fn frame(&self) -> &Frame {
        self.as_element().frame()
    }

    /// Give the element (and any chairs) fresh identities.
    /// Used when duplicating so the copy never aliases the original.
    pub fn regenerate_ids(&mut self) {
        match self {
            SceneElement::Zone(z) => z.id = Uuid::new_v4(),
            SceneElement::Table(t) => {
                t.id = Uuid::new_v4();
                for chair in &mut t.chairs {
                    chair.id = Uuid::new_v4();
                }
            }
            SceneElement::Obstacle(o) => o.id = Uuid::new_v4(),
        }
    }
}
