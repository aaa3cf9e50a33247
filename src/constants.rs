//! Centralized constants used across the document model.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

use crate::map::TileId;

/// Tile id stored in a cell with no tile; also returned for out-of-range reads
pub const EMPTY_TILE: TileId = -1;

/// Border tile used by the starter pattern of a new map
pub const WALL_TILE: TileId = 1;

/// Interior tile used by the starter pattern of a new map
pub const FLOOR_TILE: TileId = 0;

/// Default layer/map width in tiles
pub const DEFAULT_MAP_WIDTH: i32 = 25;

/// Default layer/map height in tiles
pub const DEFAULT_MAP_HEIGHT: i32 = 15;

/// Largest cell count a layer may have (4096x4096); bigger declared sizes are rejected
pub const MAX_MAP_CELLS: i64 = 4096 * 4096;

/// Default tile size in pixels
pub const DEFAULT_TILE_SIZE: i32 = 32;

/// Maximum number of commands to keep in history
pub const MAX_HISTORY_SIZE: usize = 100;

/// Format used for every created/modified timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Name given to a freshly constructed layer
pub const DEFAULT_LAYER_NAME: &str = "Nova Camada";

/// Suffix appended to the name of a duplicated layer
pub const DUPLICATE_SUFFIX: &str = " Cópia";

/// Name of the layer produced by flattening the stack
pub const FLATTENED_LAYER_NAME: &str = "Achatado";

/// Name of the layer every new map starts with
pub const BASE_LAYER_NAME: &str = "Base";

/// Name of the map created when loading the legacy flat format
pub const LEGACY_MAP_NAME: &str = "Mapa Carregado";

/// Current wall-clock time formatted with [`TIMESTAMP_FORMAT`]
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
