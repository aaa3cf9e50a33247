//! Map saving: JSON serialization for layers, stacks and maps, plus the save request system.

use bevy::prelude::*;
use std::path::Path;

use crate::config::UpdateLastMapPathRequest;
use crate::error::DocumentResult;
use crate::map::{Layer, LayerManager, Map};

use super::messages::SaveMapRequest;
use super::resources::{CurrentMapFile, MapSaveError};
use super::saved::{SavedLayer, SavedLayerManager, SavedMap};

impl Layer {
    pub fn save_to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(&saved_layer(self))?)
    }
}

impl LayerManager {
    pub fn save_to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(&saved_layer_manager(self)?)?)
    }
}

impl Map {
    /// Canonical format: metadata, the full layer stack, and the base layer grid
    pub fn save_to_json(&self) -> DocumentResult<String> {
        let saved = SavedMap {
            metadata: self.metadata(),
            layers: saved_layer_manager(self.layer_manager())?,
            tiles: self
                .layer_manager()
                .layer(0)
                .map(Layer::rows)
                .unwrap_or_default(),
        };
        serde_json::to_string_pretty(&saved).map_err(|e| {
            error!("Failed to serialize map: {}", e);
            e.into()
        })
    }

    /// Writes the map as UTF-8 JSON. Does not change the modified state.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> DocumentResult<()> {
        let path = path.as_ref();
        let json = self.save_to_json()?;
        std::fs::write(path, json.as_bytes()).inspect_err(|e| {
            error!("Failed to write map file {:?}: {}", path, e);
        })?;
        info!("Map saved to {:?}", path);
        Ok(())
    }
}

pub(super) fn saved_layer(layer: &Layer) -> SavedLayer {
    SavedLayer {
        properties: layer.properties().into(),
        width: layer.width(),
        height: layer.height(),
        tiles: Some(layer.rows()),
        created: layer.created_date().to_string(),
        modified: layer.modified_date().to_string(),
    }
}

pub(super) fn saved_layer_manager(manager: &LayerManager) -> DocumentResult<SavedLayerManager> {
    let layers = manager
        .layers()
        .iter()
        .map(|layer| serde_json::to_value(saved_layer(layer)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SavedLayerManager {
        active_layer: manager
            .active_layer_index()
            .map(|i| i as i64)
            .unwrap_or(-1),
        next_layer_id: manager.next_layer_id(),
        layers,
    })
}

/// Writes the `Map` resource to the requested path and marks it saved
pub fn save_map_system(
    mut events: MessageReader<SaveMapRequest>,
    mut map: ResMut<Map>,
    mut current_map_file: ResMut<CurrentMapFile>,
    mut save_error: ResMut<MapSaveError>,
    mut config_events: MessageWriter<UpdateLastMapPathRequest>,
) {
    for event in events.read() {
        match map.save_to_file(&event.path) {
            Ok(()) => {
                map.mark_saved();
                save_error.message = None;
                current_map_file.path = Some(event.path.clone());
                config_events.write(UpdateLastMapPathRequest {
                    path: event.path.clone(),
                });
            }
            Err(e) => {
                let message = format!("Failed to save {:?}: {}", event.path, e);
                error!("{}", message);
                save_error.message = Some(message);
            }
        }
    }
}
