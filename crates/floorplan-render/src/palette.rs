//! Editor colors.

use floorplan_core::elements::{Obstacle, Table, TableStatus, Zone};
use peniko::Color;

pub const BACKGROUND: Color = Color::from_rgba8(250, 250, 250, 255);
/// Area outside the logical canvas.
pub const OUTSIDE: Color = Color::from_rgba8(229, 231, 235, 255);
pub const CANVAS_BORDER: Color = Color::from_rgba8(156, 163, 175, 255);
pub const GRID_LINE: Color = Color::from_rgba8(200, 200, 200, 100);
pub const GRID_DOT: Color = Color::from_rgba8(160, 160, 160, 90);
pub const SELECTION: Color = Color::from_rgba8(59, 130, 246, 255);
pub const HOVER: Color = Color::from_rgba8(147, 197, 253, 255);
pub const HANDLE_FILL: Color = Color::WHITE;
pub const OUTLINE: Color = Color::from_rgba8(75, 85, 99, 255);
pub const LABEL: Color = Color::from_rgba8(31, 41, 55, 255);
pub const CHAIR_FILL: Color = Color::from_rgba8(107, 114, 128, 255);
pub const CHAIR_OUTLINE: Color = Color::from_rgba8(55, 65, 81, 255);

/// Table fill; disabled tables fade out.
pub fn table_fill(table: &Table) -> Color {
    let color = Color::from(table.color());
    match table.status {
        TableStatus::Disabled => color.multiply_alpha(0.35),
        TableStatus::Seasonal => color.multiply_alpha(0.7),
        TableStatus::Active => color,
    }
}

pub fn zone_fill(zone: &Zone) -> Color {
    Color::from(zone.color)
}

/// Zone border: the fill color at full opacity.
pub fn zone_border(zone: &Zone) -> Color {
    Color::from(zone.color.with_alpha(255))
}

pub fn obstacle_fill(obstacle: &Obstacle) -> Color {
    Color::from(obstacle.color())
}
