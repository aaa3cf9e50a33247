//! On-disk JSON shapes.
//!
//! Load-side types default every missing field so partially written files still open;
//! layers are kept as raw JSON values until each one is parsed on its own.

use serde::{Deserialize, Serialize};

use crate::constants::{
    now_timestamp, DEFAULT_LAYER_NAME, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_TILE_SIZE,
    LEGACY_MAP_NAME,
};
use crate::map::{LayerProperties, LayerType, MapMetadata, TileId, TintColor};

fn default_layer_name() -> String {
    DEFAULT_LAYER_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

fn default_width() -> i32 {
    DEFAULT_MAP_WIDTH
}

fn default_height() -> i32 {
    DEFAULT_MAP_HEIGHT
}

fn default_tile_size() -> i32 {
    DEFAULT_TILE_SIZE
}

fn default_active_layer() -> i64 {
    -1
}

fn default_next_layer_id() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayerProperties {
    #[serde(default = "default_layer_name")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub layer_type: LayerType,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub z_order: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tint_color: TintColor,
}

impl Default for SavedLayerProperties {
    fn default() -> Self {
        Self::from(&LayerProperties::default())
    }
}

impl From<&LayerProperties> for SavedLayerProperties {
    fn from(p: &LayerProperties) -> Self {
        Self {
            name: p.name.clone(),
            layer_type: p.layer_type,
            visible: p.visible,
            opacity: p.opacity,
            locked: p.locked,
            z_order: p.z_order,
            description: p.description.clone(),
            tint_color: p.tint_color,
        }
    }
}

impl From<SavedLayerProperties> for LayerProperties {
    fn from(p: SavedLayerProperties) -> Self {
        Self {
            name: p.name,
            layer_type: p.layer_type,
            visible: p.visible,
            opacity: if p.opacity.is_nan() { 1.0 } else { p.opacity.clamp(0.0, 1.0) },
            locked: p.locked,
            tint_color: p.tint_color,
            z_order: p.z_order,
            description: p.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLayer {
    #[serde(default)]
    pub properties: SavedLayerProperties,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    /// Row-major rows; `None` or a mismatching shape loads as a blank grid
    #[serde(default)]
    pub tiles: Option<Vec<Vec<TileId>>>,
    #[serde(default = "now_timestamp")]
    pub created: String,
    #[serde(default = "now_timestamp")]
    pub modified: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayerManager {
    #[serde(default = "default_active_layer")]
    pub active_layer: i64,
    #[serde(default = "default_next_layer_id")]
    pub next_layer_id: u32,
    #[serde(default)]
    pub layers: Vec<serde_json::Value>,
}

/// Metadata block as read from disk
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMetadata {
    #[serde(default = "default_loaded_name")]
    pub name: String,
    #[serde(default = "default_loaded_author")]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_tile_size")]
    pub tile_size: i32,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub modified_date: String,
}

fn default_loaded_name() -> String {
    LEGACY_MAP_NAME.to_string()
}

fn default_loaded_author() -> String {
    "Desconhecido".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for SavedMetadata {
    fn default() -> Self {
        Self {
            name: default_loaded_name(),
            author: default_loaded_author(),
            description: String::new(),
            version: default_version(),
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
            created_date: String::new(),
            modified_date: String::new(),
        }
    }
}

impl From<SavedMetadata> for MapMetadata {
    fn from(m: SavedMetadata) -> Self {
        Self {
            name: m.name,
            author: m.author,
            description: m.description,
            version: m.version,
            width: m.width,
            height: m.height,
            tile_size: m.tile_size,
            created_date: m.created_date,
            modified_date: m.modified_date,
        }
    }
}

/// Canonical map file as written
#[derive(Debug, Clone, Serialize)]
pub struct SavedMap<'a> {
    pub metadata: &'a MapMetadata,
    pub layers: SavedLayerManager,
    /// Base layer rows, kept for readers that only understand a single grid
    pub tiles: Vec<Vec<TileId>>,
}

/// Canonical map file as read. Sections stay raw until validated.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadedMap {
    #[serde(default)]
    pub metadata: Option<SavedMetadata>,
    #[serde(default)]
    pub layers: Option<serde_json::Value>,
    #[serde(default)]
    pub tiles: Option<serde_json::Value>,
}

/// Legacy single-grid format: `{width, height, tiles: [w*h ids]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSimpleMap {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileId>,
}
