//! Editor command enum for undo/redo operations.

use crate::error::{DocumentError, DocumentResult};
use crate::map::{Layer, LayerId, LayerProperties, Map, TileId};

use super::data_types::{MoveDirection, TileChange};

/// A reversible edit of a [`Map`].
///
/// Commands address layers by [`LayerId`], so a command stays bound to the same layer
/// while other commands reorder the stack.
#[derive(Clone, Debug)]
pub enum EditorCommand {
    /// Individual cell writes. A drag stroke merges into one of these.
    PaintTiles {
        layer: LayerId,
        changes: Vec<TileChange>,
    },
    /// Flood fill from a start cell
    FillArea {
        layer: LayerId,
        start_x: i32,
        start_y: i32,
        new_tile: TileId,
        /// Cells written by the last execution, in visit order
        filled: Vec<TileChange>,
    },
    /// A layer appended to the stack
    CreateLayer {
        properties: LayerProperties,
        /// Set on first execution
        created: LayerId,
        index: usize,
        /// The layer while the creation is undone
        undone: Option<Layer>,
    },
    /// A layer taken out of the stack
    RemoveLayer {
        layer: LayerId,
        index: usize,
        active_before: Option<usize>,
        /// The layer while the removal is in effect
        removed: Option<Layer>,
    },
    /// Adjacent swap in the stack
    MoveLayer {
        layer: LayerId,
        direction: MoveDirection,
    },
    /// Deep copy inserted right after its source
    DuplicateLayer {
        source: LayerId,
        /// Set on first execution
        copy: LayerId,
        index: usize,
        /// The copy while the duplication is undone
        undone: Option<Layer>,
    },
}

/// Id of the layer currently at `index`
pub(super) fn layer_id_at(map: &Map, index: usize) -> DocumentResult<LayerId> {
    map.layer_manager()
        .layer(index)
        .map(Layer::id)
        .ok_or(DocumentError::InvalidLayerIndex(index))
}

impl EditorCommand {
    /// Paint a single cell of the layer at `layer_index`
    pub fn paint_tile(map: &Map, layer_index: usize, x: i32, y: i32, tile: TileId) -> DocumentResult<Self> {
        Self::paint_tiles(map, layer_index, [(x, y, tile)])
    }

    /// Paint several cells of one layer as a single step
    pub fn paint_tiles(
        map: &Map,
        layer_index: usize,
        cells: impl IntoIterator<Item = (i32, i32, TileId)>,
    ) -> DocumentResult<Self> {
        Ok(EditorCommand::PaintTiles {
            layer: layer_id_at(map, layer_index)?,
            changes: cells
                .into_iter()
                .map(|(x, y, tile)| TileChange::pending(x, y, tile))
                .collect(),
        })
    }

    pub fn fill_area(map: &Map, layer_index: usize, start_x: i32, start_y: i32, new_tile: TileId) -> DocumentResult<Self> {
        Ok(EditorCommand::FillArea {
            layer: layer_id_at(map, layer_index)?,
            start_x,
            start_y,
            new_tile,
            filled: Vec::new(),
        })
    }

    /// New layer sized to the map; an empty name becomes "Layer N"
    pub fn create_layer(properties: LayerProperties) -> Self {
        EditorCommand::CreateLayer {
            properties,
            created: LayerId::UNASSIGNED,
            index: 0,
            undone: None,
        }
    }

    pub fn remove_layer(map: &Map, index: usize) -> DocumentResult<Self> {
        Ok(EditorCommand::RemoveLayer {
            layer: layer_id_at(map, index)?,
            index,
            active_before: None,
            removed: None,
        })
    }

    pub fn move_layer(map: &Map, index: usize, direction: MoveDirection) -> DocumentResult<Self> {
        Ok(EditorCommand::MoveLayer {
            layer: layer_id_at(map, index)?,
            direction,
        })
    }

    pub fn duplicate_layer(map: &Map, index: usize) -> DocumentResult<Self> {
        Ok(EditorCommand::DuplicateLayer {
            source: layer_id_at(map, index)?,
            copy: LayerId::UNASSIGNED,
            index: 0,
            undone: None,
        })
    }

    /// Label for undo/redo menu entries
    pub fn name(&self) -> &'static str {
        match self {
            EditorCommand::PaintTiles { .. } => "Paint Tile",
            EditorCommand::FillArea { .. } => "Fill Area",
            EditorCommand::CreateLayer { .. } => "Create Layer",
            EditorCommand::RemoveLayer { .. } => "Remove Layer",
            EditorCommand::MoveLayer {
                direction: MoveDirection::Up,
                ..
            } => "Move Layer Up",
            EditorCommand::MoveLayer {
                direction: MoveDirection::Down,
                ..
            } => "Move Layer Down",
            EditorCommand::DuplicateLayer { .. } => "Duplicate Layer",
        }
    }

    /// Only paints on the same layer merge
    pub fn can_merge_with(&self, other: &EditorCommand) -> bool {
        matches!(
            (self, other),
            (
                EditorCommand::PaintTiles { layer: a, .. },
                EditorCommand::PaintTiles { layer: b, .. },
            ) if a == b
        )
    }

    /// Appends the cell writes of an already executed paint. Undo then walks every write
    /// backwards, so each cell ends at its value from before the first paint.
    pub fn merge_with(&mut self, other: EditorCommand) -> bool {
        if !self.can_merge_with(&other) {
            return false;
        }
        match (self, other) {
            (
                EditorCommand::PaintTiles { changes, .. },
                EditorCommand::PaintTiles { changes: more, .. },
            ) => {
                changes.extend(more);
                true
            }
            _ => false,
        }
    }
}
