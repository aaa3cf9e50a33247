mod layer;
mod layer_manager;
mod map_data;
pub mod persistence;

pub use layer::{Layer, LayerId, LayerProperties, LayerType, TileId, TintColor};
pub use layer_manager::LayerManager;
pub use map_data::{Map, MapMetadata};
pub use persistence::{
    CurrentMapFile, LoadMapRequest, MapLoadError, MapSaveError, NewMapRequest, SaveMapRequest,
};

use bevy::prelude::*;

use crate::config::{ConfigLoaded, UpdateLastMapPathRequest};

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Map>()
            .init_resource::<MapLoadError>()
            .init_resource::<MapSaveError>()
            .init_resource::<CurrentMapFile>()
            .add_message::<SaveMapRequest>()
            .add_message::<LoadMapRequest>()
            .add_message::<NewMapRequest>()
            .add_message::<UpdateLastMapPathRequest>()
            .add_systems(
                Startup,
                (
                    persistence::ensure_maps_directory,
                    persistence::apply_config_to_map.after(ConfigLoaded),
                ),
            )
            .add_systems(
                Update,
                (
                    persistence::new_map_system.run_if(on_message::<NewMapRequest>),
                    persistence::load_map_system.run_if(on_message::<LoadMapRequest>),
                    persistence::save_map_system.run_if(on_message::<SaveMapRequest>),
                )
                    .chain(),
            );
    }
}
