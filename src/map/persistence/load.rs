//! Map loading: JSON parsing for layers, stacks and maps, plus the load request system.

use bevy::prelude::*;
use std::path::Path;

use crate::config::UpdateLastMapPathRequest;
use crate::constants::{DEFAULT_TILE_SIZE, LEGACY_MAP_NAME};
use crate::editor::CommandHistory;
use crate::error::{DocumentError, DocumentResult};
use crate::map::layer::{grid_matches, validate_dimensions};
use crate::map::map_data::base_layers;
use crate::map::{Layer, LayerManager, Map, MapMetadata, TileId};

use super::messages::LoadMapRequest;
use super::resources::{CurrentMapFile, MapLoadError};
use super::saved::{LoadedMap, SavedLayer, SavedLayerManager, SavedSimpleMap};

impl Layer {
    /// Parses a layer. Missing fields take their defaults; a tile grid that does not match
    /// the declared size loads as a blank grid.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let saved: SavedLayer = serde_json::from_str(json)?;
        layer_from_saved(saved)
    }

    /// Replaces this layer's content, keeping its stack id
    pub fn load_from_json(&mut self, json: &str) -> DocumentResult<()> {
        let mut loaded = Self::from_json(json).inspect_err(|e| {
            error!("Failed to load layer: {}", e);
        })?;
        loaded.set_id(self.id());
        *self = loaded;
        Ok(())
    }
}

impl LayerManager {
    /// Parses a stack. Layers that fail to parse are skipped with a warning.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let saved: SavedLayerManager = serde_json::from_str(json)?;
        Ok(manager_from_saved(saved))
    }

    /// Replaces the whole stack; on error the current stack is kept
    pub fn load_from_json(&mut self, json: &str) -> DocumentResult<()> {
        let loaded = Self::from_json(json).inspect_err(|e| {
            error!("Failed to load layers: {}", e);
        })?;
        info!("Loaded {} layer(s)", loaded.layer_count());
        *self = loaded;
        Ok(())
    }
}

impl Map {
    /// Parses the canonical format, falling back to the legacy single-grid format
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        match parse_canonical(json) {
            Ok(map) => {
                info!("Map loaded: {} ({}x{})", map.name(), map.width(), map.height());
                Ok(map)
            }
            Err(canonical) => match parse_simple(json) {
                Ok(map) => {
                    info!("Map loaded from legacy format ({}x{})", map.width(), map.height());
                    Ok(map)
                }
                Err(simple) => {
                    error!("Failed to load map: {}", canonical);
                    debug!("Legacy format also rejected: {}", simple);
                    Err(canonical)
                }
            },
        }
    }

    /// Replaces this map with the parsed one. A failed load leaves the map untouched.
    pub fn load_from_json(&mut self, json: &str) -> DocumentResult<()> {
        *self = Self::from_json(json)?;
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).inspect_err(|e| {
            error!("Failed to read map file {:?}: {}", path, e);
        })?;
        Self::from_json(&json)
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> DocumentResult<()> {
        *self = Self::from_file(path)?;
        Ok(())
    }
}

pub(super) fn layer_from_saved(saved: SavedLayer) -> DocumentResult<Layer> {
    Layer::from_parts(
        saved.properties.into(),
        saved.width,
        saved.height,
        saved.tiles,
        saved.created,
        saved.modified,
    )
}

pub(super) fn manager_from_saved(saved: SavedLayerManager) -> LayerManager {
    let mut layers = Vec::with_capacity(saved.layers.len());
    for (i, value) in saved.layers.into_iter().enumerate() {
        let layer = serde_json::from_value::<SavedLayer>(value)
            .map_err(DocumentError::from)
            .and_then(layer_from_saved);
        match layer {
            Ok(layer) => layers.push(layer),
            Err(e) => warn!("Skipping layer {}: {}", i, e),
        }
    }
    LayerManager::from_parts(layers, saved.active_layer, saved.next_layer_id)
}

fn parse_canonical(json: &str) -> DocumentResult<Map> {
    let loaded: LoadedMap = serde_json::from_str(json)?;
    let metadata: MapMetadata = loaded.metadata.unwrap_or_default().into();
    metadata.validate()?;

    let (width, height) = (metadata.width, metadata.height);
    let layers = if let Some(value) = loaded.layers {
        match serde_json::from_value::<SavedLayerManager>(value) {
            Ok(saved) => manager_from_saved(saved),
            Err(e) => {
                error!("Failed to load layers, using the default layer: {}", e);
                base_layers(width, height)
            }
        }
    } else if let Some(value) = loaded.tiles {
        let rows: Vec<Vec<TileId>> = serde_json::from_value(value)?;
        if !grid_matches(&rows, width, height) {
            return Err(DocumentError::InvalidFormat(format!(
                "tile grid is not {} rows of {} columns",
                height, width
            )));
        }
        let mut layers = base_layers(width, height);
        if let Some(base) = layers.layer_mut(0) {
            base.set_rect(0, 0, &rows);
        }
        layers
    } else {
        base_layers(width, height)
    };

    Ok(Map::from_parts(metadata, layers))
}

fn parse_simple(json: &str) -> DocumentResult<Map> {
    let simple: SavedSimpleMap = serde_json::from_str(json)?;
    validate_dimensions(simple.width, simple.height)?;

    let expected = simple.width as usize * simple.height as usize;
    if simple.tiles.len() != expected {
        return Err(DocumentError::InvalidFormat(format!(
            "expected {} tiles, found {}",
            expected,
            simple.tiles.len()
        )));
    }

    let mut map = Map::new(simple.width, simple.height, DEFAULT_TILE_SIZE)?;
    map.set_name(LEGACY_MAP_NAME);

    let rows: Vec<Vec<TileId>> = simple
        .tiles
        .chunks(simple.width as usize)
        .map(<[TileId]>::to_vec)
        .collect();
    if let Some(layer) = map.layer_manager_mut().active_layer_mut() {
        layer.set_rect(0, 0, &rows);
    }

    map.mark_saved();
    Ok(map)
}

/// Loads the requested file into the `Map` resource and starts a fresh history
pub fn load_map_system(
    mut events: MessageReader<LoadMapRequest>,
    mut map: ResMut<Map>,
    history: Option<ResMut<CommandHistory>>,
    mut current_map_file: ResMut<CurrentMapFile>,
    mut load_error: ResMut<MapLoadError>,
    mut config_events: MessageWriter<UpdateLastMapPathRequest>,
) {
    let mut loaded_any = false;
    for event in events.read() {
        match Map::from_file(&event.path) {
            Ok(loaded) => {
                *map = loaded;
                load_error.message = None;
                current_map_file.path = Some(event.path.clone());
                config_events.write(UpdateLastMapPathRequest {
                    path: event.path.clone(),
                });
                loaded_any = true;
                info!("Opened map {:?}", event.path);
            }
            Err(e) => {
                let message = format!("Failed to load {:?}: {}", event.path, e);
                error!("{}", message);
                load_error.message = Some(message);
            }
        }
    }

    if loaded_any && let Some(mut history) = history {
        history.clear();
    }
}
