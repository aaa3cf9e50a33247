//! Error type shared by the layer stack, persistence and command history.

use thiserror::Error;

use crate::map::LayerId;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("invalid tile size: {0}")]
    InvalidTileSize(i32),

    #[error("layer index {0} is out of range")]
    InvalidLayerIndex(usize),

    #[error("layer {0:?} no longer exists")]
    LayerNotFound(LayerId),

    #[error("layer '{0}' is locked")]
    LayerLocked(String),

    #[error("position ({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },

    #[error("command did not change the document")]
    NoChange,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("invalid map format: {0}")]
    InvalidFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
