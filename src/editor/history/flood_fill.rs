//! 4-connected flood fill that records every cell it overwrites.

use std::collections::{HashSet, VecDeque};

use crate::map::{Layer, TileId};

use super::data_types::TileChange;

/// Replaces the region of equal ids connected to `(start_x, start_y)` with `new_tile`.
///
/// Returns the written cells in visit order. Nothing is written when the start cell is out
/// of range or already holds `new_tile`.
pub fn flood_fill(layer: &mut Layer, start_x: i32, start_y: i32, new_tile: TileId) -> Vec<TileChange> {
    if !layer.is_valid_position(start_x, start_y) {
        return Vec::new();
    }

    let target = layer.tile(start_x, start_y);
    if target == new_tile {
        return Vec::new();
    }

    let mut changes = Vec::new();
    let mut visited: HashSet<(i32, i32)> = HashSet::new();
    let mut frontier = VecDeque::from([(start_x, start_y)]);

    while let Some((x, y)) = frontier.pop_front() {
        if !layer.is_valid_position(x, y) || !visited.insert((x, y)) {
            continue;
        }
        if layer.tile(x, y) != target {
            continue;
        }

        changes.push(TileChange {
            x,
            y,
            old: target,
            new: new_tile,
        });
        layer.set_tile(x, y, new_tile);

        frontier.extend([(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]);
    }

    changes
}
