use std::collections::BTreeMap;

use bevy::log::{error, info};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::{
    now_timestamp, BASE_LAYER_NAME, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_TILE_SIZE,
    EMPTY_TILE, FLOOR_TILE, WALL_TILE,
};
use crate::error::{DocumentError, DocumentResult};

use super::layer::{validate_dimensions, Layer, LayerProperties, LayerType, TileId};
use super::layer_manager::LayerManager;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMetadata {
    pub name: String,
    pub author: String,
    pub description: String,
    pub version: String,
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
    pub created_date: String,
    pub modified_date: String,
}

impl Default for MapMetadata {
    fn default() -> Self {
        let now = now_timestamp();
        Self {
            name: "Novo Mapa".to_string(),
            author: "Usuário".to_string(),
            description: String::new(),
            version: "1.0".to_string(),
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
            created_date: now.clone(),
            modified_date: now,
        }
    }
}

impl MapMetadata {
    pub(crate) fn validate(&self) -> DocumentResult<()> {
        validate_dimensions(self.width, self.height)?;
        if self.tile_size <= 0 {
            return Err(DocumentError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }
}

/// The document being edited: metadata plus the layer stack.
///
/// `is_modified()` is derived from the map's own structural flag and every layer's flag.
#[derive(Resource, Debug, Clone)]
pub struct Map {
    metadata: MapMetadata,
    layers: LayerManager,
    modified: bool,
}

impl Default for Map {
    fn default() -> Self {
        Self::build(MapMetadata::default())
    }
}

impl Map {
    /// New unmodified map with a single "Base" layer framed by walls
    pub fn new(width: i32, height: i32, tile_size: i32) -> DocumentResult<Self> {
        let metadata = MapMetadata {
            width,
            height,
            tile_size,
            ..Default::default()
        };
        if let Err(e) = metadata.validate() {
            error!("Cannot create map: {}", e);
            return Err(e);
        }
        Ok(Self::build(metadata))
    }

    fn build(metadata: MapMetadata) -> Self {
        let layers = base_layers(metadata.width, metadata.height);
        Self {
            metadata,
            layers,
            modified: false,
        }
    }

    pub(crate) fn from_parts(metadata: MapMetadata, mut layers: LayerManager) -> Self {
        layers.mark_all_layers_saved();
        Self {
            metadata,
            layers,
            modified: false,
        }
    }

    // Metadata

    pub fn metadata(&self) -> &MapMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: MapMetadata) {
        self.metadata = metadata;
        self.set_modified(true);
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata.name = name.into();
        self.set_modified(true);
    }

    pub fn width(&self) -> i32 {
        self.metadata.width
    }

    pub fn height(&self) -> i32 {
        self.metadata.height
    }

    pub fn tile_size(&self) -> i32 {
        self.metadata.tile_size
    }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.metadata.width && y >= 0 && y < self.metadata.height
    }

    // Tile access through the active layer

    pub fn tile(&self, x: i32, y: i32) -> TileId {
        if !self.is_valid_position(x, y) {
            return EMPTY_TILE;
        }
        self.layers.tile(x, y)
    }

    /// Writes into the active layer; ignored when out of range or the layer is locked
    pub fn set_tile(&mut self, x: i32, y: i32, tile_id: TileId) {
        if self.is_valid_position(x, y) {
            self.layers.set_tile(x, y, tile_id);
        }
    }

    pub fn resize(&mut self, new_width: i32, new_height: i32, default_tile: TileId) -> DocumentResult<()> {
        if let Err(e) = validate_dimensions(new_width, new_height) {
            error!("Invalid map dimensions: {}x{}", new_width, new_height);
            return Err(e);
        }

        self.layers.resize_all_layers(new_width, new_height, default_tile)?;
        self.metadata.width = new_width;
        self.metadata.height = new_height;
        self.set_modified(true);
        Ok(())
    }

    pub fn set_size(&mut self, width: i32, height: i32) -> DocumentResult<()> {
        if width == self.metadata.width && height == self.metadata.height {
            return Ok(());
        }
        self.resize(width, height, EMPTY_TILE)
    }

    pub fn clear(&mut self) {
        self.fill(EMPTY_TILE);
    }

    pub fn fill(&mut self, tile_id: TileId) {
        if let Some(layer) = self.layers.active_layer_mut()
            && !layer.is_locked()
        {
            layer.fill(tile_id);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, tile_id: TileId) {
        self.layers.fill_rect(x, y, width, height, tile_id);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn copy_rect(
        &mut self,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
        src_layer: usize,
        dest_layer: usize,
        dest_x: i32,
        dest_y: i32,
    ) {
        self.layers
            .copy_rect(src_x, src_y, width, height, src_layer, dest_layer, dest_x, dest_y);
    }

    pub fn fill_layer(&mut self, layer_index: usize, tile_id: TileId) -> DocumentResult<()> {
        let layer = self
            .layers
            .layer_mut(layer_index)
            .ok_or(DocumentError::InvalidLayerIndex(layer_index))?;
        if layer.is_locked() {
            return Err(DocumentError::LayerLocked(layer.name().to_string()));
        }
        layer.fill(tile_id);
        Ok(())
    }

    /// Clears every unlocked layer
    pub fn clear_all_layers(&mut self) {
        for index in self.layers.unlocked_layers() {
            if let Some(layer) = self.layers.layer_mut(index) {
                layer.clear();
            }
        }
    }

    // Layer management

    /// Adds a layer sized to the map. An empty name becomes "Layer N".
    pub fn create_layer(&mut self, mut properties: LayerProperties) -> DocumentResult<usize> {
        if properties.name.is_empty() {
            properties.name = format!("Layer {}", self.layers.layer_count() + 1);
        }
        let index = self
            .layers
            .create_layer_sized(self.metadata.width, self.metadata.height, properties)?;
        self.set_modified(true);
        Ok(index)
    }

    pub fn remove_layer(&mut self, index: usize) -> DocumentResult<Layer> {
        let removed = self.layers.remove_layer(index)?;
        self.set_modified(true);
        Ok(removed)
    }

    pub fn set_active_layer(&mut self, index: usize) -> DocumentResult<()> {
        self.layers.set_active_layer(index)
    }

    pub fn layer_manager(&self) -> &LayerManager {
        &self.layers
    }

    pub fn layer_manager_mut(&mut self) -> &mut LayerManager {
        &mut self.layers
    }

    // State

    pub fn is_modified(&self) -> bool {
        self.modified || self.layers.has_unsaved_changes()
    }

    /// Setting `false` is the same as [`Map::mark_saved`]
    pub fn set_modified(&mut self, modified: bool) {
        if !modified {
            self.mark_saved();
            return;
        }
        if !self.modified {
            self.modified = true;
            self.metadata.modified_date = now_timestamp();
        }
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
        self.layers.mark_all_layers_saved();
    }

    /// Multi-line description including a tile histogram of the active layer
    pub fn debug_summary(&self) -> String {
        let m = &self.metadata;
        let mut summary = format!(
            "Map '{}' by {} ({}x{}, tile size {})\n  version: {}\n  modified: {}\n  created: {}\n  last modified: {}",
            m.name,
            m.author,
            m.width,
            m.height,
            m.tile_size,
            m.version,
            self.is_modified(),
            m.created_date,
            m.modified_date,
        );

        summary.push_str(&format!(
            "\n  active layer: {}",
            self.layers.active_layer().map(Layer::name).unwrap_or("none")
        ));

        if let Some(layer) = self.layers.active_layer() {
            let mut histogram: BTreeMap<TileId, usize> = BTreeMap::new();
            for &tile in layer.tiles() {
                *histogram.entry(tile).or_default() += 1;
            }
            for (tile, count) in histogram {
                summary.push_str(&format!("\n    tile {}: {}", tile, count));
            }
        }

        summary.push('\n');
        summary.push_str(&self.layers.debug_summary());
        summary
    }

    pub fn log_summary(&self) {
        for line in self.debug_summary().lines() {
            info!("{}", line);
        }
    }
}

/// Single "Base" tile layer with walls on the border and floor inside
pub(crate) fn base_layers(width: i32, height: i32) -> LayerManager {
    let mut manager = LayerManager::new();
    let properties = LayerProperties::named(BASE_LAYER_NAME, LayerType::Tile);
    let Ok(mut base) = Layer::with_properties(width, height, properties) else {
        return manager;
    };

    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            base.set_tile(x, y, if border { WALL_TILE } else { FLOOR_TILE });
        }
    }

    manager.add_layer(base);
    manager.mark_all_layers_saved();
    manager
}
