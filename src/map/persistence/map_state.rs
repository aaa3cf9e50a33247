//! Map state management: new map and startup sizing from config.

use bevy::prelude::*;

use crate::config::EditorConfig;
use crate::editor::CommandHistory;
use crate::map::Map;

use super::messages::NewMapRequest;
use super::resources::{CurrentMapFile, MapLoadError, MapSaveError};

pub fn new_map_system(
    mut events: MessageReader<NewMapRequest>,
    mut map: ResMut<Map>,
    history: Option<ResMut<CommandHistory>>,
    mut current_map_file: ResMut<CurrentMapFile>,
    mut load_error: ResMut<MapLoadError>,
    mut save_error: ResMut<MapSaveError>,
) {
    let mut created = false;
    for event in events.read() {
        match Map::new(event.width, event.height, event.tile_size) {
            Ok(new_map) => {
                *map = new_map;
                current_map_file.path = None;
                load_error.message = None;
                save_error.message = None;
                created = true;
                info!(
                    "Created new map ({}x{}, tile size {})",
                    event.width, event.height, event.tile_size
                );
            }
            Err(e) => warn!("Ignoring new map request: {}", e),
        }
    }

    if created && let Some(mut history) = history {
        history.clear();
    }
}

/// Startup system: gives the untouched initial map the configured default geometry
pub fn apply_config_to_map(
    config: Option<Res<EditorConfig>>,
    mut map: ResMut<Map>,
    current_map_file: Res<CurrentMapFile>,
) {
    let Some(config) = config else {
        return;
    };
    if map.is_modified() || current_map_file.path.is_some() {
        return;
    }

    let request = NewMapRequest::from_config(&config.data);
    if (map.width(), map.height(), map.tile_size())
        == (request.width, request.height, request.tile_size)
    {
        return;
    }

    match Map::new(request.width, request.height, request.tile_size) {
        Ok(new_map) => *map = new_map,
        Err(e) => warn!("Configured map size rejected: {}", e),
    }
}
