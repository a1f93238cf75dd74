//! Procedural layout generation
//!
//! Places non-overlapping square rooms between a start and an exit anchor,
//! connects them into a single region and carves the result into a grid.

pub mod connect;
pub mod rooms;

pub use connect::{Corridor, CorridorKind};
pub use rooms::Room;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tile::{TileId, FLOOR_TILE};
use super::Grid;

/// Upper bound on `LayoutParams::room_count`
pub const MAX_ROOM_COUNT: usize = 4096;

/// Rejected generation parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("invalid layout parameters: {0}")]
    InvalidParams(String),
}

/// Inputs of a single generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Lattice rooms to place (anchors come on top)
    pub room_count: usize,
    /// Smallest room edge (inclusive)
    pub room_min_size: i32,
    /// Largest room edge (exclusive unless equal to the minimum)
    pub room_max_size: i32,
    /// Top-left of the start anchor; truncated to a cell
    pub start_pos: (f32, f32),
    /// Gap between lattice cells
    pub spacing: i32,
    /// Corridor padding on each side of the center line
    pub corridor_thickness: i32,
    /// Edge length of the start and exit anchor rooms
    pub anchor_size: i32,
    /// Probability of an extra corridor between adjacent rooms
    pub loop_edge_chance: f64,
    /// Extra reach of the adjacency test beyond a room's own size
    pub adjacency_slack: i32,
    /// Reserve the anchors' footprint without carving it
    pub blank_anchors: bool,
    /// Tile written into rooms and corridors
    pub floor_id: TileId,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            room_count: 35,
            room_min_size: 8,
            room_max_size: 24,
            start_pos: (50.0, 10.0),
            spacing: 5,
            corridor_thickness: 2,
            anchor_size: 20,
            loop_edge_chance: 0.9,
            adjacency_slack: 1,
            blank_anchors: false,
            floor_id: FLOOR_TILE,
        }
    }
}

impl LayoutParams {
    /// Check the preconditions of `generate`
    pub fn validate(&self) -> Result<(), GenerationError> {
        let fail = |msg: String| -> Result<(), GenerationError> {
            Err(GenerationError::InvalidParams(msg))
        };

        if self.room_min_size <= 0 || self.room_max_size <= 0 {
            return fail(format!(
                "room sizes must be positive (min {}, max {})",
                self.room_min_size, self.room_max_size
            ));
        }
        if self.room_min_size > self.room_max_size {
            return fail(format!(
                "room_min_size {} exceeds room_max_size {}",
                self.room_min_size, self.room_max_size
            ));
        }
        if self.corridor_thickness < 1 {
            return fail(format!(
                "corridor_thickness must be at least 1, got {}",
                self.corridor_thickness
            ));
        }
        if self.anchor_size < 1 {
            return fail(format!("anchor_size must be at least 1, got {}", self.anchor_size));
        }
        if self.spacing < 0 {
            return fail(format!("spacing must not be negative, got {}", self.spacing));
        }
        if self.adjacency_slack < 0 {
            return fail(format!(
                "adjacency_slack must not be negative, got {}",
                self.adjacency_slack
            ));
        }
        if !(0.0..=1.0).contains(&self.loop_edge_chance) {
            return fail(format!(
                "loop_edge_chance must be within [0, 1], got {}",
                self.loop_edge_chance
            ));
        }
        if !self.start_pos.0.is_finite() || !self.start_pos.1.is_finite() {
            return fail("start_pos must be finite".to_string());
        }
        if self.room_count > MAX_ROOM_COUNT {
            return fail(format!(
                "room_count must be at most {}, got {}",
                MAX_ROOM_COUNT, self.room_count
            ));
        }
        if self.extent().is_none() {
            return fail("layout does not fit in i32 cell coordinates".to_string());
        }
        Ok(())
    }

    /// Integer cell of the start anchor
    pub fn start_cell(&self) -> (i32, i32) {
        (self.start_pos.0 as i32, self.start_pos.1 as i32)
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` of every cell a run may
    /// touch, corridor padding included; `None` if it overflows `i32`
    pub fn extent(&self) -> Option<(i32, i32, i32, i32)> {
        let (x, y) = self.start_cell();
        let pad = self.corridor_thickness;
        let cell = self.room_max_size.checked_add(self.spacing)?;
        let side = i32::try_from(rooms::lattice_side(self.room_count)).ok()?;
        let span = side.checked_mul(cell)?;

        let origin_x = x.checked_add(self.anchor_size)?.checked_add(self.spacing)?;
        let max_x = origin_x
            .checked_add(span)?
            .checked_add(self.anchor_size)?
            .checked_add(pad)?;
        let max_y = y
            .checked_add(span.max(self.anchor_size))?
            .checked_add(pad)?;

        Some((x.checked_sub(pad)?, y.checked_sub(pad)?, max_x, max_y))
    }
}

/// Result of a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Start anchor, exit anchor, then lattice rooms
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
}

impl Layout {
    pub fn start(&self) -> Option<&Room> {
        self.rooms.first()
    }

    pub fn exit(&self) -> Option<&Room> {
        self.rooms.get(1)
    }

    /// Rooms placed on the lattice (anchors excluded)
    pub fn lattice_rooms(&self) -> &[Room] {
        self.rooms.get(2..).unwrap_or(&[])
    }

    pub fn loop_count(&self) -> usize {
        self.corridors
            .iter()
            .filter(|c| c.kind == CorridorKind::Loop)
            .count()
    }
}

/// Generate a room-and-corridor layout into `grid`
///
/// Only cells covered by rooms and corridors are written; everything else is
/// left as it was. Writes outside the grid are clipped.
pub fn generate(
    grid: &mut Grid,
    params: &LayoutParams,
    rng: &mut impl Rng,
) -> Result<Layout, GenerationError> {
    params.validate()?;

    let rooms = rooms::place_rooms(params, rng);
    let corridors = connect::connect_rooms(
        &rooms,
        params.adjacency_slack,
        params.loop_edge_chance,
        rng,
    );

    for room in rooms.iter().filter(|r| !r.is_blank) {
        rooms::carve_room(grid, room, params.floor_id);
    }
    for corridor in &corridors {
        rooms::carve_corridor(
            grid,
            &rooms[corridor.from],
            &rooms[corridor.to],
            params.corridor_thickness,
            params.floor_id,
        );
    }

    let layout = Layout { rooms, corridors };
    log::info!(
        "Generated layout: {} rooms ({} of {} requested on the lattice), {} corridors ({} loops)",
        layout.rooms.len(),
        layout.lattice_rooms().len(),
        params.room_count,
        layout.corridors.len(),
        layout.loop_count()
    );

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn small_params() -> LayoutParams {
        LayoutParams {
            room_count: 1,
            room_min_size: 4,
            room_max_size: 4,
            start_pos: (0.0, 0.0),
            spacing: 2,
            corridor_thickness: 1,
            ..LayoutParams::default()
        }
    }

    /// Flood fill over floor cells from `start`
    fn reachable(grid: &Grid, floor: TileId, start: (i32, i32)) -> Vec<bool> {
        let w = grid.width();
        let mut seen = vec![false; (grid.width() * grid.height()) as usize];
        let mut queue = VecDeque::new();
        if grid.get(start.0, start.1) == floor {
            seen[(start.1 * w + start.0) as usize] = true;
            queue.push_back(start);
        }
        while let Some((x, y)) = queue.pop_front() {
            for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                if grid.in_bounds(nx, ny) && grid.get(nx, ny) == floor {
                    let idx = (ny * w + nx) as usize;
                    if !seen[idx] {
                        seen[idx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        seen
    }

    #[test]
    fn test_single_room_scenario() {
        let mut grid = Grid::new(60, 30, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let layout = generate(&mut grid, &small_params(), &mut rng).unwrap();

        assert_eq!(layout.rooms.len(), 3);
        assert_eq!(layout.rooms[0], Room::new(0, 0, 20, 20));
        assert_eq!(layout.rooms[1], Room::new(34, 0, 20, 20));
        assert_eq!(layout.rooms[2], Room::new(22, 0, 4, 4));

        assert_eq!(layout.corridors.len(), 2);
        assert!(layout.corridors.iter().all(|c| c.kind == CorridorKind::Tree));
        assert_eq!((layout.corridors[0].from, layout.corridors[0].to), (0, 2));
        assert_eq!((layout.corridors[1].from, layout.corridors[1].to), (2, 1));

        for (i, a) in layout.rooms.iter().enumerate() {
            for b in &layout.rooms[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_all_rooms_reachable_from_start() {
        let mut grid = Grid::new(300, 300, 0).unwrap();
        let params = LayoutParams {
            room_count: 20,
            room_min_size: 4,
            room_max_size: 10,
            start_pos: (5.0, 5.0),
            spacing: 3,
            corridor_thickness: 1,
            ..LayoutParams::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        let layout = generate(&mut grid, &params, &mut rng).unwrap();
        assert_eq!(layout.lattice_rooms().len(), 20);

        let start = layout.start().unwrap().center();
        let seen = reachable(&grid, FLOOR_TILE, start);
        for room in &layout.rooms {
            let (cx, cy) = room.center();
            assert!(seen[(cy * grid.width() + cx) as usize], "room {:?} unreachable", room);
        }
    }

    #[test]
    fn test_blank_anchors_are_not_carved() {
        let mut grid = Grid::new(60, 30, 0).unwrap();
        let params = LayoutParams {
            blank_anchors: true,
            ..small_params()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let layout = generate(&mut grid, &params, &mut rng).unwrap();

        assert!(layout.rooms[0].is_blank && layout.rooms[1].is_blank);
        // corner of the start anchor stays untouched, its center is reached by a corridor
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.get(10, 10), FLOOR_TILE);
        let lattice = layout.rooms[2];
        assert_eq!(grid.get(lattice.x, lattice.y), FLOOR_TILE);
    }

    #[test]
    fn test_same_seed_same_grid() {
        let params = LayoutParams::default();
        let mut a = Grid::new(400, 300, 0).unwrap();
        let mut b = Grid::new(400, 300, 0).unwrap();

        let layout_a = generate(&mut a, &params, &mut StdRng::seed_from_u64(7)).unwrap();
        let layout_b = generate(&mut b, &params, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(layout_a, layout_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rooms_never_overlap() {
        for seed in 0..8 {
            let params = LayoutParams {
                room_count: 12,
                room_min_size: 2,
                room_max_size: 7,
                spacing: 0,
                ..LayoutParams::default()
            };
            let mut grid = Grid::new(200, 200, 0).unwrap();
            let layout = generate(&mut grid, &params, &mut StdRng::seed_from_u64(seed)).unwrap();

            for (i, a) in layout.rooms.iter().enumerate() {
                for b in &layout.rooms[i + 1..] {
                    assert!(!a.intersects(b), "seed {}: {:?} overlaps {:?}", seed, a, b);
                }
            }
        }
    }

    #[test]
    fn test_generation_clips_to_small_grid() {
        let mut grid = Grid::new(16, 16, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let layout = generate(&mut grid, &LayoutParams::default(), &mut rng).unwrap();
        assert!(!layout.rooms.is_empty());
        assert_eq!(grid.width(), 16);
    }

    #[test]
    fn test_invalid_params_fail_fast() {
        let mut grid = Grid::new(10, 10, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let bad = [
            LayoutParams { room_min_size: 9, room_max_size: 4, ..small_params() },
            LayoutParams { room_min_size: 0, ..small_params() },
            LayoutParams { corridor_thickness: 0, ..small_params() },
            LayoutParams { loop_edge_chance: 1.5, ..small_params() },
        ];
        for params in bad {
            assert!(matches!(
                generate(&mut grid, &params, &mut rng),
                Err(GenerationError::InvalidParams(_))
            ));
        }
        assert_eq!(grid.count(0), 100);
    }

    #[test]
    fn test_params_outside_i32_range_are_rejected() {
        let base = LayoutParams {
            room_min_size: 1,
            room_count: 4,
            ..small_params()
        };
        let bad = [
            LayoutParams { room_max_size: i32::MAX, ..base.clone() },
            LayoutParams { room_count: usize::MAX, ..base.clone() },
            LayoutParams { room_count: MAX_ROOM_COUNT + 1, ..base.clone() },
            LayoutParams { spacing: i32::MAX, ..base.clone() },
            LayoutParams { anchor_size: i32::MAX, ..base.clone() },
            LayoutParams { corridor_thickness: i32::MAX, ..base.clone() },
            LayoutParams { start_pos: (-3.0e9, 0.0), ..base.clone() },
        ];

        let mut grid = Grid::new(10, 10, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for params in bad {
            assert!(params.extent().is_none() || params.room_count > MAX_ROOM_COUNT);
            assert!(matches!(
                generate(&mut grid, &params, &mut rng),
                Err(GenerationError::InvalidParams(_))
            ));
        }
        assert_eq!(grid.count(0), 100);

        // large but representable sizes still work and clip to the grid
        let huge_rooms = LayoutParams { room_max_size: 1_000_000, ..base.clone() };
        assert!(generate(&mut grid, &huge_rooms, &mut rng).is_ok());
        let far_start = LayoutParams { start_pos: (2.0e9, 0.0), ..base };
        assert_eq!(generate(&mut grid, &far_start, &mut rng).unwrap().rooms.len(), 6);
    }

    #[test]
    fn test_loop_corridors_are_carved() {
        let params = LayoutParams {
            room_count: 9,
            room_min_size: 4,
            room_max_size: 8,
            start_pos: (2.0, 2.0),
            spacing: 2,
            corridor_thickness: 1,
            // reach a full lattice cell so row and column neighbours are adjacent
            adjacency_slack: 6,
            loop_edge_chance: 1.0,
            ..LayoutParams::default()
        };
        let mut grid = Grid::new(100, 100, 0).unwrap();
        let layout = generate(&mut grid, &params, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(layout.lattice_rooms().len(), 9);
        assert!(layout.loop_count() > 0);

        for c in layout.corridors.iter().filter(|c| c.kind == CorridorKind::Loop) {
            let (a, b) = (&layout.rooms[c.from], &layout.rooms[c.to]);
            assert!(a.is_adjacent(b, 6) || b.is_adjacent(a, 6));

            let ((fx, fy), (tx, ty)) = (a.center(), b.center());
            for x in fx.min(tx)..=fx.max(tx) {
                assert_eq!(grid.get(x, fy), FLOOR_TILE, "({}, {})", x, fy);
            }
            for y in fy.min(ty)..=fy.max(ty) {
                assert_eq!(grid.get(tx, y), FLOOR_TILE, "({}, {})", tx, y);
            }
        }
    }
}
