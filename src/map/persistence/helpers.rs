//! Helper functions for map persistence.

use bevy::prelude::*;

pub fn ensure_maps_directory() {
    let maps_dir = crate::paths::maps_dir();
    if !maps_dir.exists()
        && let Err(e) = std::fs::create_dir_all(&maps_dir)
    {
        warn!("Failed to create maps directory: {}", e);
    }
}
