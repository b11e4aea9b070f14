//! Layout document: the JSON shape a floor plan is loaded from and saved to.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::elements::{Element, MAX_CAPACITY, Obstacle, Table, Zone};
use crate::geometry::{Frame, MIN_ELEMENT_SIZE, normalize_degrees};
use crate::scene::{DEFAULT_CANVAS_SIZE, Scene};
use crate::snap::GRID_SIZE;

/// Current document version.
pub const LAYOUT_VERSION: u32 = 1;

/// Errors from decoding a layout document.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported layout version {0}")]
    UnsupportedVersion(u32),
}

fn default_version() -> u32 {
    LAYOUT_VERSION
}

fn default_canvas_width() -> f64 {
    DEFAULT_CANVAS_SIZE.width
}

fn default_canvas_height() -> f64 {
    DEFAULT_CANVAS_SIZE.height
}

fn default_grid_size() -> f64 {
    GRID_SIZE
}

fn default_name() -> String {
    "Untitled".to_string()
}

/// Serialized layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f64,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f64,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl LayoutDocument {
    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let doc: Self = serde_json::from_str(json)?;
        if doc.version > LAYOUT_VERSION {
            return Err(LayoutError::UnsupportedVersion(doc.version));
        }
        Ok(doc)
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&Scene> for LayoutDocument {
    fn from(scene: &Scene) -> Self {
        Self {
            version: LAYOUT_VERSION,
            id: scene.id,
            name: scene.name.clone(),
            canvas_width: scene.size.width,
            canvas_height: scene.size.height,
            grid_size: scene.grid_size,
            zones: scene.zones.clone(),
            tables: scene.tables.clone(),
            obstacles: scene.obstacles.clone(),
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Repair a frame in place; returns whether anything was changed.
fn sanitize_frame(frame: &mut Frame) -> bool {
    let before = *frame;
    frame.x = finite_or(frame.x, 0.0);
    frame.y = finite_or(frame.y, 0.0);
    frame.width = finite_or(frame.width, MIN_ELEMENT_SIZE).max(MIN_ELEMENT_SIZE);
    frame.height = finite_or(frame.height, MIN_ELEMENT_SIZE).max(MIN_ELEMENT_SIZE);
    frame.rotation = normalize_degrees(frame.rotation);
    *frame != before
}

fn sanitize_table(table: &mut Table, zone_exists: impl Fn(Uuid) -> bool) {
    if sanitize_frame(&mut table.frame) {
        log::warn!("table {}: frame repaired on load", table.label);
    }
    if table.capacity > MAX_CAPACITY {
        log::warn!(
            "table {}: capacity {} above {}, clamped",
            table.label,
            table.capacity,
            MAX_CAPACITY
        );
        table.capacity = MAX_CAPACITY;
    }
    if table.min_capacity > table.capacity {
        log::warn!(
            "table {}: min capacity {} above capacity {}, clamped",
            table.label,
            table.min_capacity,
            table.capacity
        );
        table.min_capacity = table.capacity;
    }
    let chairs_broken = table.chairs.iter().any(|c| {
        !(c.offset_x.is_finite() && c.offset_y.is_finite() && c.rotation.is_finite())
    });
    if table.chairs.len() > table.capacity as usize || chairs_broken {
        log::warn!(
            "table {}: {} chairs for capacity {}, regenerating",
            table.label,
            table.chairs.len(),
            table.capacity
        );
        let count = table.chairs.len().min(table.capacity as usize);
        table.regenerate_chairs(count);
    } else {
        for chair in &mut table.chairs {
            chair.rotation = normalize_degrees(chair.rotation);
        }
    }
    if let Some(zone_id) = table.zone_id {
        if !zone_exists(zone_id) {
            log::warn!("table {}: zone {} not found, cleared", table.label, zone_id);
            table.zone_id = None;
        }
    }
}

impl Scene {
    /// Build a scene from a decoded document, repairing anything out of range.
    pub fn from_layout(doc: LayoutDocument) -> Self {
        let grid_size = if doc.grid_size.is_finite() && doc.grid_size > 0.0 {
            doc.grid_size
        } else {
            log::warn!("layout {}: grid size {} replaced by default", doc.id, doc.grid_size);
            GRID_SIZE
        };
        let width = finite_or(doc.canvas_width, DEFAULT_CANVAS_SIZE.width);
        let height = finite_or(doc.canvas_height, DEFAULT_CANVAS_SIZE.height);
        let size = Size::new(
            if width > 0.0 { width } else { DEFAULT_CANVAS_SIZE.width },
            if height > 0.0 { height } else { DEFAULT_CANVAS_SIZE.height },
        );

        let mut zones = doc.zones;
        for zone in &mut zones {
            if sanitize_frame(&mut zone.frame) {
                log::warn!("zone {}: frame repaired on load", zone.name);
            }
        }

        let mut obstacles = doc.obstacles;
        for obstacle in &mut obstacles {
            if sanitize_frame(&mut obstacle.frame) {
                log::warn!("obstacle {}: frame repaired on load", obstacle.id());
            }
        }

        let mut tables = doc.tables;
        for table in &mut tables {
            sanitize_table(table, |id| zones.iter().any(|z| z.id == id));
        }

        log::info!(
            "loaded layout {} ({} zones, {} tables, {} obstacles)",
            doc.id,
            zones.len(),
            tables.len(),
            obstacles.len()
        );

        Self {
            id: doc.id,
            name: doc.name,
            size,
            grid_size,
            zones,
            tables,
            obstacles,
        }
    }

    /// Snapshot the scene as a document.
    pub fn to_layout(&self) -> LayoutDocument {
        LayoutDocument::from(self)
    }
}
