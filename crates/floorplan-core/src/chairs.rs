//! Seat layout around tables.
//!
//! Placements are expressed in the table's unrotated local frame, relative
//! to its center. The table rotation is applied later, when chairs are drawn
//! or hit-tested.

use crate::elements::TableShape;
use crate::geometry::normalize_degrees;

/// Gap between the table edge and a chair center.
pub const CHAIR_PADDING: f64 = 14.0;

/// Rendered chair footprint (square side, canvas units).
pub const CHAIR_SIZE: f64 = 18.0;

/// Where one chair goes relative to the table center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChairPlacement {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Local rotation in degrees, in `[0, 360)`.
    pub rotation: f64,
}

/// Sides of a rectangular table, clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Chair rotation for seats on this side, pointing away from the table
    /// with the chair back toward it.
    pub fn rotation(self) -> f64 {
        match self {
            Side::Top => 0.0,
            Side::Right => 90.0,
            Side::Bottom => 180.0,
            Side::Left => 270.0,
        }
    }
}

/// Compute chair placements for a table.
///
/// Pure and deterministic; `count == 0` yields no chairs.
pub fn generate_chair_positions(
    count: usize,
    shape: TableShape,
    width: f64,
    height: f64,
) -> Vec<ChairPlacement> {
    if count == 0 {
        return Vec::new();
    }
    match shape {
        TableShape::Round | TableShape::Oval => elliptical_positions(count, width, height),
        TableShape::Rectangle | TableShape::Square => rectangular_positions(count, width, height),
    }
}

fn elliptical_positions(count: usize, width: f64, height: f64) -> Vec<ChairPlacement> {
    let rx = width / 2.0 + CHAIR_PADDING;
    let ry = height / 2.0 + CHAIR_PADDING;
    (0..count)
        .map(|i| {
            // Seat 0 sits at the top
            let angle = i as f64 / count as f64 * 360.0 - 90.0;
            let (sin_a, cos_a) = angle.to_radians().sin_cos();
            ChairPlacement {
                offset_x: rx * cos_a,
                offset_y: ry * sin_a,
                rotation: normalize_degrees(angle + 90.0),
            }
        })
        .collect()
}

/// Split `count` seats across the four sides, proportional to side length.
///
/// Returns counts in `Side::ALL` order. Leftover seats after the
/// proportional floor go one each to the longest sides (ties by side order).
pub fn allocate_sides(count: usize, width: f64, height: f64) -> [usize; 4] {
    let lengths = [width, height, width, height].map(|l| if l.is_finite() { l.max(0.0) } else { 0.0 });
    let perimeter: f64 = lengths.iter().sum();
    if perimeter <= 0.0 {
        return [count, 0, 0, 0];
    }

    let mut per_side = lengths.map(|len| (count as f64 * len / perimeter).floor() as usize);

    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|&a, &b| lengths[b].total_cmp(&lengths[a]).then(a.cmp(&b)));

    // Float error can push the floors past `count`; take the excess back from the shortest sides
    let mut assigned: usize = per_side.iter().sum();
    for &k in order.iter().rev() {
        while assigned > count && per_side[k] > 0 {
            per_side[k] -= 1;
            assigned -= 1;
        }
    }

    let mut remaining = count - assigned;
    let mut i = 0;
    while remaining > 0 {
        per_side[order[i % 4]] += 1;
        remaining -= 1;
        i += 1;
    }
    per_side
}

fn rectangular_positions(count: usize, width: f64, height: f64) -> Vec<ChairPlacement> {
    let per_side = allocate_sides(count, width, height);
    let hw = width / 2.0;
    let hh = height / 2.0;

    let mut placements = Vec::with_capacity(count);
    for (side, &n) in Side::ALL.iter().zip(per_side.iter()) {
        for j in 0..n {
            let t = (j as f64 + 0.5) / n as f64;
            let (offset_x, offset_y) = match side {
                Side::Top => (-hw + t * width, -hh - CHAIR_PADDING),
                Side::Right => (hw + CHAIR_PADDING, -hh + t * height),
                Side::Bottom => (hw - t * width, hh + CHAIR_PADDING),
                Side::Left => (-hw - CHAIR_PADDING, hh - t * height),
            };
            placements.push(ChairPlacement {
                offset_x,
                offset_y,
                rotation: side.rotation(),
            });
        }
    }
    placements
}
