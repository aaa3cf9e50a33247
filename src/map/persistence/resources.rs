//! Resource types for map persistence state tracking.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Resource, Default)]
pub struct MapLoadError {
    pub message: Option<String>,
}

/// Resource tracking save operation errors for display to user.
#[derive(Resource, Default)]
pub struct MapSaveError {
    pub message: Option<String>,
}

/// Resource tracking the file the current map was loaded from or saved to
#[derive(Resource, Default)]
pub struct CurrentMapFile {
    pub path: Option<PathBuf>,
}

impl CurrentMapFile {
    /// File stem for window titles, "Untitled" for a map never saved
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }
}
