//! Layered tile map documents with undo/redo, persisted as JSON.
//!
//! The document model ([`Map`], [`LayerManager`], [`Layer`]) is plain Rust and usable on its
//! own. [`TileStackPlugins`] wires it into a Bevy app together with the editor config and the
//! command history.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod map;
pub mod paths;

pub use editor::{CommandHistory, EditorCommand, MoveDirection, TileChange};
pub use error::{DocumentError, DocumentResult};
pub use map::{Layer, LayerId, LayerManager, LayerProperties, LayerType, Map, MapMetadata, TileId};

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

/// Config, map document and editor history plugins
pub struct TileStackPlugins;

impl PluginGroup for TileStackPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(config::ConfigPlugin)
            .add(map::MapPlugin)
            .add(editor::EditorPlugin)
    }
}
