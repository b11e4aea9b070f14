//! Table element and its owned chairs.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Element, ElementId, ElementKind, SerializableColor};
use crate::chairs::{ChairPlacement, generate_chair_positions};
use crate::geometry::{Frame, normalize_degrees, to_world};

/// Table outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableShape {
    #[default]
    Rectangle,
    Square,
    Round,
    Oval,
}

impl TableShape {
    /// Whether the outline is drawn as an ellipse.
    pub fn is_elliptical(self) -> bool {
        matches!(self, TableShape::Round | TableShape::Oval)
    }
}

/// Table category; drives the default fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCategory {
    #[default]
    Standard,
    Booth,
    Bar,
    HighTop,
    Outdoor,
    Private,
}

impl TableCategory {
    pub fn default_color(self) -> SerializableColor {
        match self {
            TableCategory::Standard => SerializableColor::rgb(0xd9, 0xc3, 0xa5),
            TableCategory::Booth => SerializableColor::rgb(0xb4, 0x8e, 0xad),
            TableCategory::Bar => SerializableColor::rgb(0x8d, 0x6e, 0x63),
            TableCategory::HighTop => SerializableColor::rgb(0xa1, 0x88, 0x7f),
            TableCategory::Outdoor => SerializableColor::rgb(0x9c, 0xcc, 0x65),
            TableCategory::Private => SerializableColor::rgb(0x90, 0xa4, 0xae),
        }
    }
}

/// Operational status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Active,
    Disabled,
    Seasonal,
}

/// Seat style (rendering only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    #[default]
    Chair,
    Stool,
    Bench,
    Armchair,
}

/// A seat owned by a table.
///
/// Offsets are relative to the table center in the table's unrotated frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chair {
    #[serde(default = "Uuid::new_v4")]
    pub id: ElementId,
    pub offset_x: f64,
    pub offset_y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub seat_type: SeatType,
}

impl Chair {
    fn from_placement(id: ElementId, seat_type: SeatType, placement: &ChairPlacement) -> Self {
        Self {
            id,
            offset_x: placement.offset_x,
            offset_y: placement.offset_y,
            rotation: placement.rotation,
            seat_type,
        }
    }

    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }
}

/// Most seats a single table can hold; larger capacities are clamped.
pub const MAX_CAPACITY: u32 = 64;

/// A table with its seating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default = "Uuid::new_v4")]
    pub id: ElementId,
    pub label: String,
    #[serde(default)]
    pub shape: TableShape,
    #[serde(flatten)]
    pub frame: Frame,
    pub capacity: u32,
    #[serde(default)]
    pub min_capacity: u32,
    #[serde(default)]
    pub category: TableCategory,
    #[serde(default)]
    pub status: TableStatus,
    #[serde(default)]
    pub zone_id: Option<ElementId>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub chairs: Vec<Chair>,
}

impl Table {
    /// Create a table seated to full capacity.
    pub fn new(label: impl Into<String>, shape: TableShape, frame: Frame, capacity: u32) -> Self {
        let capacity = clamp_capacity(capacity);
        let mut table = Self {
            id: Uuid::new_v4(),
            label: label.into(),
            shape,
            frame,
            capacity,
            min_capacity: 0,
            category: TableCategory::default(),
            status: TableStatus::default(),
            zone_id: None,
            locked: false,
            z_index: 0,
            chairs: Vec::new(),
        };
        table.regenerate_chairs(capacity as usize);
        table
    }

    pub fn with_category(mut self, category: TableCategory) -> Self {
        self.category = category;
        self
    }

    pub fn color(&self) -> SerializableColor {
        self.category.default_color()
    }

    /// Rebuild the chair layout for `count` seats.
    ///
    /// `count` is clamped to `capacity` and [`MAX_CAPACITY`]. Existing chair ids and seat types are
    /// kept positionally; extra slots get fresh ids and surplus chairs are
    /// dropped.
    pub fn regenerate_chairs(&mut self, count: usize) {
        let capacity = self.capacity.min(MAX_CAPACITY) as usize;
        let count = if count > capacity {
            log::warn!(
                "table {}: {} chairs requested, clamped to capacity {}",
                self.label,
                count,
                capacity
            );
            capacity
        } else {
            count
        };

        let placements =
            generate_chair_positions(count, self.shape, self.frame.width, self.frame.height);
        let chairs = placements
            .iter()
            .enumerate()
            .map(|(i, placement)| match self.chairs.get(i) {
                Some(existing) => Chair::from_placement(existing.id, existing.seat_type, placement),
                None => Chair::from_placement(Uuid::new_v4(), SeatType::default(), placement),
            })
            .collect();
        self.chairs = chairs;
    }

    /// Lay the current chairs out again for the current shape and size.
    pub fn rearrange_chairs(&mut self) {
        self.regenerate_chairs(self.chairs.len());
    }

    /// Change capacity, trimming chairs when it drops below the current count.
    pub fn set_capacity(&mut self, capacity: u32) {
        let capacity = clamp_capacity(capacity);
        self.capacity = capacity;
        self.min_capacity = self.min_capacity.min(capacity);
        if self.chairs.len() > capacity as usize {
            self.regenerate_chairs(capacity as usize);
        }
    }

    pub fn set_shape(&mut self, shape: TableShape) {
        if self.shape != shape {
            self.shape = shape;
            self.rearrange_chairs();
        }
    }

    /// Absolute canvas position of a chair (table rotation applied).
    pub fn chair_world_position(&self, chair: &Chair) -> Point {
        to_world(chair.offset(), &self.frame)
    }

    /// Absolute chair rotation in degrees.
    pub fn chair_world_rotation(&self, chair: &Chair) -> f64 {
        normalize_degrees(self.frame.rotation + chair.rotation)
    }
}

impl Element for Table {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Table
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

    fn apply_frame(&mut self, frame: Frame) {
        let resized = frame.width != self.frame.width || frame.height != self.frame.height;
        self.frame = frame;
        if resized {
            self.rearrange_chairs();
        }
    }
}

/// Partial update for a table; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdate {
    pub label: Option<String>,
    pub shape: Option<TableShape>,
    /// Signed so that negative input from a form can be clamped instead of rejected.
    pub capacity: Option<i64>,
    pub min_capacity: Option<i64>,
    pub category: Option<TableCategory>,
    pub status: Option<TableStatus>,
    /// `Some(None)` clears the zone.
    pub zone_id: Option<Option<ElementId>>,
    pub locked: Option<bool>,
}

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, i64::from(MAX_CAPACITY)) as u32
}

/// Cap `capacity` at [`MAX_CAPACITY`], warning when it was above.
fn clamp_capacity(capacity: u32) -> u32 {
    if capacity > MAX_CAPACITY {
        log::warn!("capacity {} clamped to {}", capacity, MAX_CAPACITY);
        MAX_CAPACITY
    } else {
        capacity
    }
}

impl TableUpdate {
    /// Apply to `table`, returning whether anything changed.
    pub fn apply(self, table: &mut Table) -> bool {
        let before = table.clone();

        if let Some(label) = self.label {
            table.label = label;
        }
        if let Some(category) = self.category {
            table.category = category;
        }
        if let Some(status) = self.status {
            table.status = status;
        }
        if let Some(zone_id) = self.zone_id {
            table.zone_id = zone_id;
        }
        if let Some(locked) = self.locked {
            table.locked = locked;
        }
        if let Some(capacity) = self.capacity {
            table.set_capacity(clamp_count(capacity));
        }
        if let Some(min_capacity) = self.min_capacity {
            table.min_capacity = clamp_count(min_capacity).min(table.capacity);
        }
        if let Some(shape) = self.shape {
            table.set_shape(shape);
        }

        *table != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(capacity: u32) -> Table {
        Table::new("T1", TableShape::Rectangle, Frame::new(100.0, 100.0, 120.0, 80.0), capacity)
    }

    #[test]
    fn test_new_table_is_fully_seated() {
        let t = table(6);
        assert_eq!(t.chairs.len(), 6);
        assert_eq!(t.min_capacity, 0);
    }

    #[test]
    fn test_regenerate_clamps_to_capacity() {
        let mut t = table(4);
        t.regenerate_chairs(10);
        assert_eq!(t.chairs.len(), 4);
    }

    #[test]
    fn test_regenerate_reuses_ids_positionally() {
        let mut t = table(8);
        t.regenerate_chairs(4);
        t.chairs[1].seat_type = SeatType::Stool;
        let ids: Vec<_> = t.chairs.iter().map(|c| c.id).collect();

        t.regenerate_chairs(6);
        assert_eq!(t.chairs.len(), 6);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(t.chairs[i].id, *id);
        }
        assert_eq!(t.chairs[1].seat_type, SeatType::Stool);
        assert!(!ids.contains(&t.chairs[4].id));

        t.regenerate_chairs(2);
        assert_eq!(t.chairs.len(), 2);
        assert_eq!(t.chairs[0].id, ids[0]);
    }

    #[test]
    fn test_regenerate_is_idempotent() {
        let mut t = table(6);
        let first = t.chairs.clone();
        t.regenerate_chairs(6);
        assert_eq!(t.chairs, first);
    }

    #[test]
    fn test_lowering_capacity_trims_chairs() {
        let mut t = table(6);
        t.min_capacity = 5;
        t.set_capacity(3);
        assert_eq!(t.chairs.len(), 3);
        assert_eq!(t.min_capacity, 3);

        t.set_capacity(8);
        assert_eq!(t.chairs.len(), 3);
    }

    #[test]
    fn test_shape_change_moves_chairs() {
        let mut t = table(4);
        let before = t.chairs.clone();
        t.set_shape(TableShape::Round);
        assert_eq!(t.chairs.len(), 4);
        assert_ne!(t.chairs[0].offset(), before[0].offset());
        assert_eq!(t.chairs[0].id, before[0].id);
    }

    #[test]
    fn test_apply_frame_only_rearranges_on_resize() {
        let mut t = table(6);
        let chairs = t.chairs.clone();

        let mut moved = t.frame;
        moved.x += 40.0;
        moved.rotation = 90.0;
        t.apply_frame(moved);
        assert_eq!(t.chairs, chairs);

        let mut grown = t.frame;
        grown.width = 240.0;
        t.apply_frame(grown);
        assert_ne!(t.chairs, chairs);
        assert_eq!(t.chairs.len(), 6);
    }

    #[test]
    fn test_chair_world_position_follows_rotation() {
        let mut t = Table::new("T", TableShape::Round, Frame::new(0.0, 0.0, 80.0, 80.0), 4);
        let top = t.chairs[0].clone();
        let p = t.chair_world_position(&top);
        assert!((p.x - 40.0).abs() < 1e-9);
        assert!(p.y < 0.0);

        t.frame.rotation = 90.0;
        let p = t.chair_world_position(&top);
        // Seat 0 swings from the top to the right side
        assert!(p.x > 80.0);
        assert!((p.y - 40.0).abs() < 1e-9);
        assert!((t.chair_world_rotation(&top) - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_clamps_capacity() {
        let mut t = table(6);
        let update = TableUpdate {
            capacity: Some(-3),
            ..Default::default()
        };
        assert!(update.apply(&mut t));
        assert_eq!(t.capacity, 0);
        assert!(t.chairs.is_empty());

        let update = TableUpdate {
            capacity: Some(4),
            min_capacity: Some(9),
            ..Default::default()
        };
        update.apply(&mut t);
        assert_eq!(t.capacity, 4);
        assert_eq!(t.min_capacity, 4);
    }

    #[test]
    fn test_huge_capacity_is_capped() {
        let t = table(4_000_000_000);
        assert_eq!(t.capacity, MAX_CAPACITY);
        assert_eq!(t.chairs.len(), MAX_CAPACITY as usize);

        let mut t = table(4);
        let update = TableUpdate {
            capacity: Some(i64::MAX),
            min_capacity: Some(i64::MAX),
            ..Default::default()
        };
        assert!(update.apply(&mut t));
        assert_eq!(t.capacity, MAX_CAPACITY);
        assert_eq!(t.min_capacity, MAX_CAPACITY);
        assert_eq!(t.chairs.len(), 4);

        t.regenerate_chairs(usize::MAX);
        assert_eq!(t.chairs.len(), MAX_CAPACITY as usize);
    }

    #[test]
    fn test_regenerate_caps_out_of_range_field() {
        let mut t = table(2);
        t.capacity = u32::MAX;
        t.regenerate_chairs(1_000);
        assert_eq!(t.chairs.len(), MAX_CAPACITY as usize);
    }

    #[test]
    fn test_update_zone_id() {
        let mut t = table(2);
        let zone = Uuid::new_v4();
        TableUpdate {
            zone_id: Some(Some(zone)),
            ..Default::default()
        }
        .apply(&mut t);
        assert_eq!(t.zone_id, Some(zone));

        TableUpdate {
            zone_id: Some(None),
            ..Default::default()
        }
        .apply(&mut t);
        assert_eq!(t.zone_id, None);
    }

    #[test]
    fn test_noop_update_reports_unchanged() {
        let mut t = table(2);
        let update = TableUpdate {
            label: Some("T1".into()),
            ..Default::default()
        };
        assert!(!update.apply(&mut t));
    }

    #[test]
    fn test_table_json_is_camel_case() {
        let t = table(2);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["minCapacity"], 0);
        assert_eq!(json["category"], "standard");
        assert_eq!(json["chairs"][0]["seatType"], "chair");
        assert!(json["chairs"][0]["offsetX"].is_number());
        assert!(json["zoneId"].is_null());
    }
}
