//! Data carried by commands to reverse their effect.

use crate::map::TileId;

/// One cell write: where, what was there, what was written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileChange {
    pub x: i32,
    pub y: i32,
    pub old: TileId,
    pub new: TileId,
}

impl TileChange {
    /// Change whose `old` value is filled in when the command executes
    pub fn pending(x: i32, y: i32, new: TileId) -> Self {
        Self { x, y, old: new, new }
    }
}

/// Direction of an adjacent swap in the layer stack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards index 0 (drawn earlier)
    Up,
    /// Towards the last index (drawn later)
    Down,
}

impl MoveDirection {
    pub fn opposite(self) -> Self {
        match self {
            MoveDirection::Up => MoveDirection::Down,
            MoveDirection::Down => MoveDirection::Up,
        }
    }
}
