//! Execute, undo and redo for each command variant.

use crate::error::{DocumentError, DocumentResult};
use crate::map::{Layer, LayerId, Map};

use super::commands::{layer_id_at, EditorCommand};
use super::data_types::{MoveDirection, TileChange};
use super::flood_fill::flood_fill;

fn resolve(map: &Map, id: LayerId) -> DocumentResult<usize> {
    map.layer_manager()
        .index_of(id)
        .ok_or(DocumentError::LayerNotFound(id))
}

fn layer_mut(map: &mut Map, id: LayerId) -> DocumentResult<&mut Layer> {
    map.layer_manager_mut()
        .layer_by_id_mut(id)
        .ok_or(DocumentError::LayerNotFound(id))
}

/// Target layer for a forward edit; locked layers reject it
fn editable_layer(map: &mut Map, id: LayerId) -> DocumentResult<&mut Layer> {
    let layer = layer_mut(map, id)?;
    if layer.is_locked() {
        return Err(DocumentError::LayerLocked(layer.name().to_string()));
    }
    Ok(layer)
}

/// Writes every recorded old value back, last write first
fn restore(layer: &mut Layer, changes: &[TileChange]) {
    for change in changes.iter().rev() {
        layer.set_tile(change.x, change.y, change.old);
    }
}

fn apply_move(map: &mut Map, id: LayerId, direction: MoveDirection) -> DocumentResult<()> {
    let index = resolve(map, id)?;
    let layers = map.layer_manager_mut();
    match direction {
        MoveDirection::Up => layers.move_layer_up(index)?,
        MoveDirection::Down => layers.move_layer_down(index)?,
    }
    map.set_modified(true);
    Ok(())
}

impl EditorCommand {
    /// Applies the command. An `Err` means the map was left unchanged.
    pub fn execute(&mut self, map: &mut Map) -> DocumentResult<()> {
        match self {
            EditorCommand::PaintTiles { layer, changes } => {
                let layer = editable_layer(map, *layer)?;
                if let Some(c) = changes.iter().find(|c| !layer.is_valid_position(c.x, c.y)) {
                    return Err(DocumentError::OutOfBounds { x: c.x, y: c.y });
                }

                let mut changed = false;
                for change in changes.iter_mut() {
                    change.old = layer.tile(change.x, change.y);
                    if change.old != change.new {
                        layer.set_tile(change.x, change.y, change.new);
                        changed = true;
                    }
                }
                if changed { Ok(()) } else { Err(DocumentError::NoChange) }
            }
            EditorCommand::FillArea {
                layer,
                start_x,
                start_y,
                new_tile,
                filled,
            } => {
                let layer = editable_layer(map, *layer)?;
                if !layer.is_valid_position(*start_x, *start_y) {
                    return Err(DocumentError::OutOfBounds {
                        x: *start_x,
                        y: *start_y,
                    });
                }

                *filled = flood_fill(layer, *start_x, *start_y, *new_tile);
                if filled.is_empty() {
                    return Err(DocumentError::NoChange);
                }
                Ok(())
            }
            EditorCommand::CreateLayer {
                properties,
                created,
                index,
                undone,
            } => {
                match undone.take() {
                    Some(layer) => {
                        map.layer_manager_mut().insert_layer(*index, layer);
                        map.set_modified(true);
                    }
                    None => {
                        *index = map.create_layer(properties.clone())?;
                        *created = layer_id_at(map, *index)?;
                    }
                }
                Ok(())
            }
            EditorCommand::RemoveLayer {
                layer,
                index,
                active_before,
                removed,
            } => {
                let position = resolve(map, *layer)?;
                let active = map.layer_manager().active_layer_index();
                *removed = Some(map.remove_layer(position)?);
                *index = position;
                *active_before = active;
                Ok(())
            }
            EditorCommand::MoveLayer { layer, direction } => apply_move(map, *layer, *direction),
            EditorCommand::DuplicateLayer {
                source,
                copy,
                index,
                undone,
            } => {
                match undone.take() {
                    Some(layer) => {
                        map.layer_manager_mut().insert_layer(*index, layer);
                    }
                    None => {
                        let position = resolve(map, *source)?;
                        *index = map.layer_manager_mut().duplicate_layer(position)?;
                        *copy = layer_id_at(map, *index)?;
                    }
                }
                map.set_modified(true);
                Ok(())
            }
        }
    }

    /// Reverses the last execution. Tile restores bypass the layer lock.
    pub fn undo(&mut self, map: &mut Map) -> DocumentResult<()> {
        match self {
            EditorCommand::PaintTiles { layer, changes } => {
                restore(layer_mut(map, *layer)?, changes);
                Ok(())
            }
            EditorCommand::FillArea { layer, filled, .. } => {
                restore(layer_mut(map, *layer)?, filled);
                Ok(())
            }
            EditorCommand::CreateLayer { created, undone, .. } => {
                let position = resolve(map, *created)?;
                *undone = Some(map.remove_layer(position)?);
                Ok(())
            }
            EditorCommand::RemoveLayer {
                layer,
                index,
                active_before,
                removed,
            } => {
                let restored = removed.take().ok_or(DocumentError::LayerNotFound(*layer))?;
                let layers = map.layer_manager_mut();
                layers.insert_layer(*index, restored);
                if let Some(active) = *active_before {
                    layers.set_active_layer(active)?;
                }
                map.set_modified(true);
                Ok(())
            }
            EditorCommand::MoveLayer { layer, direction } => {
                apply_move(map, *layer, direction.opposite())
            }
            EditorCommand::DuplicateLayer { copy, undone, .. } => {
                let position = resolve(map, *copy)?;
                *undone = Some(map.remove_layer(position)?);
                Ok(())
            }
        }
    }

    pub fn redo(&mut self, map: &mut Map) -> DocumentResult<()> {
        self.execute(map)
    }
}
