//! Room connectivity
//!
//! Grows a spanning tree from the start room (nearest adjacent room first,
//! global nearest pair when the frontier runs dry), then sprinkles extra
//! corridors between adjacent rooms to form loops.

use std::collections::{HashSet, VecDeque};

use rand::Rng;

use super::rooms::Room;

/// Why a corridor exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorridorKind {
    /// Part of the spanning tree
    Tree,
    /// Extra edge between already-connected adjacent rooms
    Loop,
}

/// A corridor between two rooms, by index into the room list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Corridor {
    pub from: usize,
    pub to: usize,
    pub kind: CorridorKind,
}

impl Corridor {
    fn key(&self) -> (usize, usize) {
        (self.from.min(self.to), self.from.max(self.to))
    }
}

/// Connect every room to room 0, then add loop edges
pub fn connect_rooms(
    rooms: &[Room],
    adjacency_slack: i32,
    loop_edge_chance: f64,
    rng: &mut impl Rng,
) -> Vec<Corridor> {
    let mut corridors = spanning_tree(rooms, adjacency_slack);
    add_loop_edges(rooms, &mut corridors, adjacency_slack, loop_edge_chance, rng);
    corridors
}

fn spanning_tree(rooms: &[Room], slack: i32) -> Vec<Corridor> {
    let n = rooms.len();
    let mut corridors = Vec::with_capacity(n.saturating_sub(1));
    if n == 0 {
        return corridors;
    }

    let mut connected = vec![false; n];
    let mut connected_count = 1;
    let mut frontier = VecDeque::from([0usize]);
    connected[0] = true;

    while connected_count < n {
        let (from, to) = if let Some(current) = frontier.pop_front() {
            let nearest = (0..n)
                .filter(|&i| !connected[i] && rooms[current].is_adjacent(&rooms[i], slack))
                .min_by_key(|&i| (rooms[current].distance_sq(&rooms[i]), i));

            match nearest {
                // current may have more unconnected neighbours; revisit it later
                Some(next) => {
                    frontier.push_back(current);
                    (current, next)
                }
                None => continue,
            }
        } else {
            match nearest_pair(rooms, &connected) {
                Some(pair) => pair,
                None => break,
            }
        };

        corridors.push(Corridor {
            from,
            to,
            kind: CorridorKind::Tree,
        });
        connected[to] = true;
        connected_count += 1;
        frontier.push_back(to);
    }

    corridors
}

/// Closest (connected, unconnected) pair of rooms
fn nearest_pair(rooms: &[Room], connected: &[bool]) -> Option<(usize, usize)> {
    let mut best: Option<(i64, usize, usize)> = None;

    for (a, room_a) in rooms.iter().enumerate().filter(|(i, _)| connected[*i]) {
        for (b, room_b) in rooms.iter().enumerate().filter(|(i, _)| !connected[*i]) {
            let d = room_a.distance_sq(room_b);
            if best.map_or(true, |(best_d, _, _)| d < best_d) {
                best = Some((d, a, b));
            }
        }
    }

    best.map(|(_, a, b)| (a, b))
}

fn add_loop_edges(
    rooms: &[Room],
    corridors: &mut Vec<Corridor>,
    slack: i32,
    chance: f64,
    rng: &mut impl Rng,
) {
    let mut linked: HashSet<(usize, usize)> = corridors.iter().map(Corridor::key).collect();
    let mut added = 0;

    for a in 0..rooms.len() {
        for b in a + 1..rooms.len() {
            if linked.contains(&(a, b)) {
                continue;
            }
            let adjacent =
                rooms[a].is_adjacent(&rooms[b], slack) || rooms[b].is_adjacent(&rooms[a], slack);
            if adjacent && rng.gen_bool(chance) {
                corridors.push(Corridor {
                    from: a,
                    to: b,
                    kind: CorridorKind::Loop,
                });
                linked.insert((a, b));
                added += 1;
            }
        }
    }

    if added > 0 {
        log::debug!("Added {} loop corridors", added);
    }
}
