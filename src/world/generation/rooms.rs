//! Room placement and carving
//!
//! Square rooms laid out on a lattice between a start and an exit anchor,
//! carved as floor together with L-shaped corridors.

use rand::Rng;

use super::LayoutParams;
use crate::world::{Grid, TileId};

/// A rectangular room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Reserved footprint that is not carved into the grid
    pub is_blank: bool,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            is_blank: false,
        }
    }

    pub fn blank(mut self, is_blank: bool) -> Self {
        self.is_blank = is_blank;
        self
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Whether the footprints share at least one cell
    pub fn intersects(&self, other: &Room) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Squared distance between room centers
    pub fn distance_sq(&self, other: &Room) -> i64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        let dx = bx as i64 - ax as i64;
        let dy = by as i64 - ay as i64;
        dx * dx + dy * dy
    }

    /// Aligned on one axis and within reach on the other
    ///
    /// Reach is measured from this room's size, so the test is not symmetric.
    pub fn is_adjacent(&self, other: &Room, slack: i32) -> bool {
        let dx = (other.x as i64 - self.x as i64).abs();
        let dy = (other.y as i64 - self.y as i64).abs();
        let slack = slack as i64;
        (dx <= self.width as i64 + slack && dy == 0)
            || (dy <= self.height as i64 + slack && dx == 0)
    }
}

/// Smallest `s` with `s * s >= n`
fn ceil_sqrt(n: usize) -> usize {
    let mut s = (n as f64).sqrt() as usize;
    while s.checked_mul(s).map_or(false, |sq| sq < n) {
        s += 1;
    }
    while s > 0 && (s - 1) * (s - 1) >= n {
        s -= 1;
    }
    s
}

/// Number of lattice cells per side for a requested room count
pub fn lattice_side(room_count: usize) -> usize {
    ceil_sqrt(room_count) + 1
}

/// Place the anchor rooms and as many lattice rooms as fit
///
/// Returned order: start anchor, exit anchor, then accepted lattice rooms in
/// row-major order. Expects params that passed `LayoutParams::validate`.
pub fn place_rooms(params: &LayoutParams, rng: &mut impl Rng) -> Vec<Room> {
    let (start_x, start_y) = params.start_cell();
    let anchor = params.anchor_size;
    let cell = params.room_max_size + params.spacing;
    let side = lattice_side(params.room_count);
    let capacity = params.room_count.min(side.saturating_mul(side)) + 2;
    let side = side as i32;

    let start = Room::new(start_x, start_y, anchor, anchor).blank(params.blank_anchors);
    let exit_x = start_x + anchor + params.spacing + side * cell;
    let exit = Room::new(exit_x, start_y, anchor, anchor).blank(params.blank_anchors);

    let mut rooms = Vec::with_capacity(capacity);
    rooms.push(start);
    rooms.push(exit);

    let origin_x = start_x + anchor + params.spacing;
    let origin_y = start_y;
    let mut accepted = 0;
    let mut rejected = 0;

    'lattice: for row in 0..side {
        for col in 0..side {
            if accepted >= params.room_count {
                break 'lattice;
            }

            let size = if params.room_min_size < params.room_max_size {
                rng.gen_range(params.room_min_size..params.room_max_size)
            } else {
                params.room_min_size
            };
            let candidate = Room::new(origin_x + col * cell, origin_y + row * cell, size, size);

            if rooms.iter().any(|r| candidate.intersects(r)) {
                rejected += 1;
                continue;
            }

            rooms.push(candidate);
            accepted += 1;
        }
    }

    if rejected > 0 {
        log::debug!("Rejected {} overlapping room candidates", rejected);
    }
    if accepted < params.room_count {
        log::debug!(
            "Placed {} of {} requested rooms on a {}x{} lattice",
            accepted,
            params.room_count,
            side,
            side
        );
    }

    rooms
}

/// Carve out a room
pub fn carve_room(grid: &mut Grid, room: &Room, floor: TileId) {
    carve_rect(
        grid,
        (room.x, room.y),
        (room.x + room.width - 1, room.y + room.height - 1),
        floor,
    );
}

/// Carve an L-shaped corridor between two room centers
///
/// Horizontal leg on the source row, vertical leg on the target column.
pub fn carve_corridor(grid: &mut Grid, from: &Room, to: &Room, thickness: i32, floor: TileId) {
    let (fx, fy) = from.center();
    let (tx, ty) = to.center();
    carve_h_corridor(grid, fx, tx, fy, thickness, floor);
    carve_v_corridor(grid, fy, ty, tx, thickness, floor);
}

/// Carve a horizontal run, padded by `thickness` rows on each side
fn carve_h_corridor(grid: &mut Grid, x1: i32, x2: i32, y: i32, thickness: i32, floor: TileId) {
    let (start, end) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    carve_rect(grid, (start, y - thickness), (end, y + thickness), floor);
}

/// Carve a vertical run, padded by `thickness` columns on each side
fn carve_v_corridor(grid: &mut Grid, y1: i32, y2: i32, x: i32, thickness: i32, floor: TileId) {
    let (start, end) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    carve_rect(grid, (x - thickness, start), (x + thickness, end), floor);
}

/// Fill the inclusive rectangle between two corners, clipped to the grid
fn carve_rect(grid: &mut Grid, (x0, y0): (i32, i32), (x1, y1): (i32, i32), floor: TileId) {
    for y in y0.max(0)..=y1.min(grid.height() - 1) {
        for x in x0.max(0)..=x1.min(grid.width() - 1) {
            grid.set(x, y, floor);
        }
    }
}
