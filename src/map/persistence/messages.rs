//! Message types for map persistence operations.

use bevy::prelude::*;
use std::path::PathBuf;

use crate::config::EditorConfigData;

#[derive(Message)]
pub struct SaveMapRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct LoadMapRequest {
    pub path: PathBuf,
}

/// Replace the current map with a fresh one of the given geometry
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMapRequest {
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
}

impl NewMapRequest {
    pub fn from_config(config: &EditorConfigData) -> Self {
        Self {
            width: config.default_map_width,
            height: config.default_map_height,
            tile_size: config.default_tile_size,
        }
    }
}
