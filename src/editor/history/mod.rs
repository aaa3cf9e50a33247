//! Undo/Redo system for map edits.
//!
//! Every reversible edit of the [`Map`](crate::map::Map) is an [`EditorCommand`] executed
//! through the [`CommandHistory`], which keeps a bounded list of applied commands plus the
//! redo tail.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last action
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo the last undone action
//!
//! ## Supported Operations
//!
//! - Tile painting (a drag stroke bracketed by `begin_stroke`/`end_stroke` is one step)
//! - Flood fill
//! - Layer creation, removal, reordering and duplication
//!
//! ## Module Structure
//!
//! - [`commands`] - EditorCommand enum and constructors
//! - [`data_types`] - Tile changes and move directions carried by commands
//! - [`execute`] - Execute/undo/redo for each command
//! - [`flood_fill`] - Recording 4-connected fill
//! - [`command_history`] - CommandHistory resource for tracking state
//! - [`systems`] - Bevy systems for keyboard shortcuts

mod command_history;
mod commands;
mod data_types;
mod execute;
mod flood_fill;
mod systems;

#[cfg(test)]
mod tests;

// Re-exports
pub use command_history::CommandHistory;
pub use commands::EditorCommand;
pub use data_types::{MoveDirection, TileChange};
pub use flood_fill::flood_fill;
pub use systems::{handle_redo, handle_undo};

pub(crate) use crate::constants::MAX_HISTORY_SIZE;
