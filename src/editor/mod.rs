pub mod history;

pub use history::{CommandHistory, EditorCommand, MoveDirection, TileChange};

use bevy::prelude::*;

use crate::config::{ConfigLoaded, EditorConfig};

/// Sizes the history from the loaded config
fn apply_config_to_history(config: Option<Res<EditorConfig>>, mut history: ResMut<CommandHistory>) {
    let Some(config) = config else {
        return;
    };
    history.set_max_history_size(config.data.max_history_size);
    info!("Undo history capacity: {}", history.max_history_size());
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CommandHistory>()
            .add_systems(Startup, apply_config_to_history.after(ConfigLoaded))
            .add_systems(Update, (history::handle_undo, history::handle_redo).chain());
    }
}
