//! Map persistence: JSON formats and the systems that load and save the `Map` resource.
//!
//! All I/O is synchronous and runs on the calling thread.
//!
//! ## Module Structure
//!
//! - [`saved`] - On-disk JSON shapes (canonical, layer stack, legacy single grid)
//! - [`load`] - Parsing with lenient per-layer recovery and legacy fallback, load system
//! - [`save`] - Serialization and the save system
//! - [`map_state`] - New map system and startup sizing
//! - [`messages`] - Message types for map operations
//! - [`resources`] - Resource types for file state and errors
//! - [`helpers`] - Directory creation
//!
//! ## Formats
//!
//! - Canonical: `{metadata, layers: {activeLayer, nextLayerId, layers}, tiles}`
//! - Legacy: `{width, height, tiles: [width * height ids]}`, read only

mod helpers;
mod load;
mod map_state;
mod messages;
mod resources;
mod save;
pub mod saved;


// Re-exports - Messages
pub use messages::{LoadMapRequest, NewMapRequest, SaveMapRequest};

// Re-exports - Resources
pub use resources::{CurrentMapFile, MapLoadError, MapSaveError};

// Re-exports - Helpers
pub use helpers::ensure_maps_directory;

// Re-exports - Systems
pub use load::load_map_system;
pub use map_state::{apply_config_to_map, new_map_system};
pub use save::save_map_system;
