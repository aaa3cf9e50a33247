//! Unit tests for the history module.

use bevy::prelude::*;

use super::command_history::CommandHistory;
use super::commands::EditorCommand;
use super::data_types::MoveDirection;
use super::systems::{handle_redo, handle_undo};
use super::MAX_HISTORY_SIZE;
use crate::error::DocumentError;
use crate::map::{LayerId, LayerProperties, LayerType, Map, TileId};

/// 5x5 map whose single layer is all zeros
fn zero_map() -> Map {
    let mut map = Map::new(5, 5, 32).unwrap();
    map.layer_manager_mut().layer_mut(0).unwrap().fill(0);
    map.mark_saved();
    map
}

/// Map with layers "a", "b", "c" (3x3 each) and "b" active
fn three_layer_map() -> Map {
    let mut map = Map::new(3, 3, 32).unwrap();
    map.layer_manager_mut().clear_layers();
    for (i, name) in ["a", "b", "c"].iter().enumerate() {
        let index = map
            .create_layer(LayerProperties::named(*name, LayerType::Tile))
            .unwrap();
        map.layer_manager_mut()
            .layer_mut(index)
            .unwrap()
            .fill(i as TileId);
    }
    map.set_active_layer(1).unwrap();
    map.mark_saved();
    map
}

#[derive(Debug, PartialEq)]
struct Snapshot {
    layers: Vec<(LayerId, String, i32, Vec<TileId>)>,
    active: Option<usize>,
}

fn snapshot(map: &Map) -> Snapshot {
    let manager = map.layer_manager();
    Snapshot {
        layers: manager
            .layers()
            .iter()
            .map(|l| (l.id(), l.name().to_string(), l.z_order(), l.tiles().to_vec()))
            .collect(),
        active: manager.active_layer_index(),
    }
}

fn assert_history_invariants(history: &CommandHistory) {
    assert_eq!(history.can_undo(), history.current_index() > 0);
    assert_eq!(history.can_redo(), history.current_index() < history.len());
    assert!(history.len() <= history.max_history_size());
}

#[test]
fn test_fill_then_undo_restores_grid() {
    let mut map = zero_map();
    let before = snapshot(&map);
    let mut history = CommandHistory::default();

    let fill = EditorCommand::fill_area(&map, 0, 2, 2, 9).unwrap();
    history.execute(fill, &mut map).unwrap();
    assert!(map.layer_manager().layer(0).unwrap().tiles().iter().all(|&t| t == 9));

    history.undo(&mut map).unwrap();
    assert_eq!(snapshot(&map), before);
}

#[test]
fn test_paint_then_undo_restores_single_cell() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();

    let paint = EditorCommand::paint_tile(&map, 0, 1, 1, 7).unwrap();
    history.execute(paint, &mut map).unwrap();
    assert_eq!(map.tile(1, 1), 7);
    assert_eq!(map.tile(1, 2), 0);
    assert!(map.is_modified());

    history.undo(&mut map).unwrap();
    assert!(map.layer_manager().layer(0).unwrap().tiles().iter().all(|&t| t == 0));
}

#[test]
fn test_fill_only_touches_connected_region() {
    let mut map = Map::new(5, 5, 32).unwrap();
    let mut history = CommandHistory::default();
    let before = snapshot(&map);

    // Interior floor is enclosed by walls
    let fill = EditorCommand::fill_area(&map, 0, 2, 2, 4).unwrap();
    history.execute(fill, &mut map).unwrap();

    for y in 0..5 {
        for x in 0..5 {
            let border = x == 0 || y == 0 || x == 4 || y == 4;
            assert_eq!(map.tile(x, y), if border { 1 } else { 4 });
        }
    }

    history.undo(&mut map).unwrap();
    assert_eq!(snapshot(&map), before);
}

#[test]
fn test_fill_onto_same_id_is_not_recorded() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();

    let fill = EditorCommand::fill_area(&map, 0, 0, 0, 0).unwrap();
    assert!(matches!(
        history.execute(fill, &mut map),
        Err(DocumentError::NoChange)
    ));
    assert!(history.is_empty());
    assert!(!map.is_modified());
}

#[test]
fn test_edit_on_locked_layer_is_not_recorded() {
    let mut map = zero_map();
    map.layer_manager_mut().layer_mut(0).unwrap().set_locked(true);
    let mut history = CommandHistory::default();

    let paint = EditorCommand::paint_tile(&map, 0, 1, 1, 7).unwrap();
    assert!(matches!(
        history.execute(paint, &mut map),
        Err(DocumentError::LayerLocked(_))
    ));
    let fill = EditorCommand::fill_area(&map, 0, 1, 1, 7).unwrap();
    assert!(history.execute(fill, &mut map).is_err());

    assert!(!history.can_undo());
    assert_eq!(map.tile(1, 1), 0);
}

#[test]
fn test_out_of_bounds_paint_is_rejected() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();
    let paint = EditorCommand::paint_tiles(&map, 0, [(1, 1, 3), (9, 9, 3)]).unwrap();

    assert!(matches!(
        history.execute(paint, &mut map),
        Err(DocumentError::OutOfBounds { x: 9, y: 9 })
    ));
    assert_eq!(map.tile(1, 1), 0);
}

#[test]
fn test_invalid_layer_index_rejected_at_construction() {
    let map = zero_map();
    assert!(matches!(
        EditorCommand::paint_tile(&map, 3, 0, 0, 1),
        Err(DocumentError::InvalidLayerIndex(3))
    ));
}

#[test]
fn test_redo_reapplies_and_new_command_discards_tail() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();

    for x in 0..3 {
        let paint = EditorCommand::paint_tile(&map, 0, x, 0, 5).unwrap();
        history.execute(paint, &mut map).unwrap();
    }
    history.undo(&mut map).unwrap();
    history.undo(&mut map).unwrap();
    assert_eq!(history.current_index(), 1);
    assert_eq!(map.tile(1, 0), 0);

    history.redo(&mut map).unwrap();
    assert_eq!(map.tile(1, 0), 5);
    assert_history_invariants(&history);

    let paint = EditorCommand::paint_tile(&map, 0, 4, 4, 8).unwrap();
    history.execute(paint, &mut map).unwrap();
    assert_eq!(history.len(), 3);
    assert!(!history.can_redo());
    assert_eq!(map.tile(2, 0), 0);
}

#[test]
fn test_undo_redo_on_empty_history() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();
    assert!(matches!(history.undo(&mut map), Err(DocumentError::NothingToUndo)));
    assert!(matches!(history.redo(&mut map), Err(DocumentError::NothingToRedo)));
    assert!(!map.is_modified());
}

#[test]
fn test_history_capacity_keeps_latest_commands() {
    let mut map = Map::new(20, 20, 32).unwrap();
    let mut history = CommandHistory::with_max_size(10);

    for i in 0..15 {
        let paint = EditorCommand::paint_tile(&map, 0, i, 5, 50 + i).unwrap();
        history.execute(paint, &mut map).unwrap();
        assert_history_invariants(&history);
    }
    assert_eq!(history.len(), 10);
    assert_eq!(history.current_index(), 10);

    while history.can_undo() {
        history.undo(&mut map).unwrap();
        assert_history_invariants(&history);
    }

    // The five oldest paints were evicted and stay applied
    for i in 0..5 {
        assert_eq!(map.tile(i, 5), 50 + i);
    }
    for i in 5..15 {
        assert_ne!(map.tile(i, 5), 50 + i);
    }
}

#[test]
fn test_default_capacity() {
    let mut map = Map::new(MAX_HISTORY_SIZE as i32 + 10, 1, 32).unwrap();
    let mut history = CommandHistory::default();

    for x in 0..(MAX_HISTORY_SIZE as i32 + 10) {
        let paint = EditorCommand::paint_tile(&map, 0, x, 0, 2).unwrap();
        history.execute(paint, &mut map).unwrap();
    }
    assert_eq!(history.len(), MAX_HISTORY_SIZE);
}

#[test]
fn test_trimming_with_redo_tail_keeps_depth() {
    let mut map = zero_map();
    let mut history = CommandHistory::with_max_size(4);
    for x in 0..4 {
        let paint = EditorCommand::paint_tile(&map, 0, x, 0, 1).unwrap();
        history.execute(paint, &mut map).unwrap();
    }
    history.undo(&mut map).unwrap();

    history.set_max_history_size(2);
    assert_eq!(history.len(), 2);
    assert_eq!(history.current_index(), 1);
    assert!(history.can_redo());
    assert_history_invariants(&history);
}

#[test]
fn test_stroke_merges_into_one_step() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();

    history.begin_stroke();
    for (x, tile) in [(0, 3), (1, 3), (0, 4), (2, 3)] {
        let paint = EditorCommand::paint_tile(&map, 0, x, 0, tile).unwrap();
        history.execute(paint, &mut map).unwrap();
    }
    history.end_stroke();

    assert_eq!(history.len(), 1);
    assert_eq!(map.tile(0, 0), 4);

    history.undo(&mut map).unwrap();
    for x in 0..3 {
        assert_eq!(map.tile(x, 0), 0, "cell {} kept a mid-stroke value", x);
    }

    history.redo(&mut map).unwrap();
    assert_eq!(map.tile(0, 0), 4);
    assert_eq!(map.tile(2, 0), 3);
}

#[test]
fn test_paints_outside_stroke_do_not_merge() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();

    history.begin_stroke();
    let paint = EditorCommand::paint_tile(&map, 0, 0, 0, 3).unwrap();
    history.execute(paint, &mut map).unwrap();
    history.end_stroke();

    history.begin_stroke();
    let paint = EditorCommand::paint_tile(&map, 0, 1, 0, 3).unwrap();
    history.execute(paint, &mut map).unwrap();
    history.end_stroke();

    let paint = EditorCommand::paint_tile(&map, 0, 2, 0, 3).unwrap();
    history.execute(paint, &mut map).unwrap();

    assert_eq!(history.len(), 3);
}

#[test]
fn test_stroke_does_not_merge_across_layers() {
    let mut map = three_layer_map();
    let mut history = CommandHistory::default();

    history.begin_stroke();
    let paint = EditorCommand::paint_tile(&map, 0, 0, 0, 7).unwrap();
    history.execute(paint, &mut map).unwrap();
    let paint = EditorCommand::paint_tile(&map, 2, 0, 0, 7).unwrap();
    history.execute(paint, &mut map).unwrap();
    history.end_stroke();

    assert_eq!(history.len(), 2);
}

#[test]
fn test_create_layer_undo_redo() {
    let mut map = three_layer_map();
    let before = snapshot(&map);
    let mut history = CommandHistory::default();

    history
        .execute(EditorCommand::create_layer(LayerProperties::default()), &mut map)
        .unwrap();
    let created = map.layer_manager().layer(3).unwrap().id();
    assert_eq!(map.layer_manager().layer_count(), 4);

    history.undo(&mut map).unwrap();
    assert_eq!(snapshot(&map), before);

    history.redo(&mut map).unwrap();
    assert_eq!(map.layer_manager().layer(3).unwrap().id(), created);
}

#[test]
fn test_remove_layer_undo_restores_position_and_active() {
    let mut map = three_layer_map();
    let before = snapshot(&map);
    let mut history = CommandHistory::default();

    let remove = EditorCommand::remove_layer(&map, 1).unwrap();
    history.execute(remove, &mut map).unwrap();
    assert_eq!(map.layer_manager().layer_count(), 2);
    assert_eq!(map.layer_manager().active_layer_index(), Some(0));

    history.undo(&mut map).unwrap();
    assert_eq!(snapshot(&map), before);

    history.redo(&mut map).unwrap();
    assert_eq!(map.layer_manager().layer_count(), 2);
}

#[test]
fn test_remove_last_layer_and_undo() {
    let mut map = zero_map();
    let before = snapshot(&map);
    let mut history = CommandHistory::default();

    let remove = EditorCommand::remove_layer(&map, 0).unwrap();
    history.execute(remove, &mut map).unwrap();
    assert_eq!(map.layer_manager().active_layer_index(), None);

    history.undo(&mut map).unwrap();
    assert_eq!(snapshot(&map), before);
}

#[test]
fn test_move_layer_undo() {
    let mut map = three_layer_map();
    let before = snapshot(&map);
    let mut history = CommandHistory::default();

    let up = EditorCommand::move_layer(&map, 2, MoveDirection::Up).unwrap();
    history.execute(up, &mut map).unwrap();
    let names: Vec<&str> = map.layer_manager().layers().iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["a", "c", "b"]);
    assert_eq!(map.layer_manager().active_layer_index(), Some(2));

    let down = EditorCommand::move_layer(&map, 0, MoveDirection::Down).unwrap();
    history.execute(down, &mut map).unwrap();

    history.undo(&mut map).unwrap();
    history.undo(&mut map).unwrap();
    assert_eq!(snapshot(&map), before);
}

#[test]
fn test_impossible_move_is_not_recorded() {
    let mut map = three_layer_map();
    let mut history = CommandHistory::default();
    let up = EditorCommand::move_layer(&map, 0, MoveDirection::Up).unwrap();
    assert!(history.execute(up, &mut map).is_err());
    assert!(history.is_empty());
}

#[test]
fn test_duplicate_layer_undo_redo() {
    let mut map = three_layer_map();
    let before = snapshot(&map);
    let mut history = CommandHistory::default();

    let duplicate = EditorCommand::duplicate_layer(&map, 0).unwrap();
    history.execute(duplicate, &mut map).unwrap();
    let copy = map.layer_manager().layer(1).unwrap();
    assert_eq!(copy.name(), "a Cópia");
    assert_eq!(map.layer_manager().active_layer().unwrap().name(), "b");

    history.undo(&mut map).unwrap();
    assert_eq!(snapshot(&map), before);

    history.redo(&mut map).unwrap();
    assert_eq!(map.layer_manager().layer(1).unwrap().name(), "a Cópia");
}

#[test]
fn test_commands_follow_layer_through_reorder() {
    let mut map = three_layer_map();
    let mut history = CommandHistory::default();

    let paint = EditorCommand::paint_tile(&map, 2, 1, 1, 9).unwrap();
    history.execute(paint, &mut map).unwrap();

    // Reorder outside the history so positions shift under the recorded paint
    map.layer_manager_mut().set_layer_order(2, 0).unwrap();

    history.undo(&mut map).unwrap();
    let c = map.layer_manager().layer(0).unwrap();
    assert_eq!(c.name(), "c");
    assert_eq!(c.tile(1, 1), 2);
    assert!(map.layer_manager().layer(2).unwrap().tiles().iter().all(|&t| t == 1));
}

#[test]
fn test_paint_on_restored_layer_redoes() {
    let mut map = three_layer_map();
    let mut history = CommandHistory::default();

    let remove = EditorCommand::remove_layer(&map, 0).unwrap();
    history.execute(remove, &mut map).unwrap();
    history.undo(&mut map).unwrap();

    let paint = EditorCommand::paint_tile(&map, 0, 0, 0, 6).unwrap();
    history.execute(paint, &mut map).unwrap();
    history.undo(&mut map).unwrap();
    history.redo(&mut map).unwrap();
    assert_eq!(map.layer_manager().tile_from_layer(0, 0, 0), 6);
}

#[test]
fn test_paint_on_removed_layer_fails_on_redo() {
    let mut map = three_layer_map();
    let mut history = CommandHistory::default();

    let paint = EditorCommand::paint_tile(&map, 0, 0, 0, 6).unwrap();
    history.execute(paint, &mut map).unwrap();
    history.undo(&mut map).unwrap();

    map.layer_manager_mut().remove_layer(0).unwrap();

    assert!(matches!(
        history.redo(&mut map),
        Err(DocumentError::LayerNotFound(_))
    ));
    assert_eq!(history.current_index(), 0);
    assert!(history.can_redo());
}

#[test]
fn test_mixed_sequence_undoes_to_start() {
    let mut map = three_layer_map();
    let start = snapshot(&map);
    let mut history = CommandHistory::default();

    let steps: Vec<fn(&Map) -> EditorCommand> = vec![
        |m| EditorCommand::paint_tile(m, 1, 0, 0, 8).unwrap(),
        |_| EditorCommand::create_layer(LayerProperties::named("new", LayerType::Overlay)),
        |m| EditorCommand::fill_area(m, 3, 0, 0, 5).unwrap(),
        |m| EditorCommand::duplicate_layer(m, 3).unwrap(),
        |m| EditorCommand::move_layer(m, 1, MoveDirection::Down).unwrap(),
        |m| EditorCommand::remove_layer(m, 0).unwrap(),
        |m| EditorCommand::paint_tile(m, 0, 2, 2, 4).unwrap(),
    ];
    for step in steps {
        let command = step(&map);
        history.execute(command, &mut map).unwrap();
        assert_history_invariants(&history);
        for (i, layer) in map.layer_manager().layers().iter().enumerate() {
            assert_eq!(layer.z_order(), i as i32);
        }
    }

    let end = snapshot(&map);
    while history.can_undo() {
        history.undo(&mut map).unwrap();
    }
    assert_eq!(snapshot(&map), start);

    while history.can_redo() {
        history.redo(&mut map).unwrap();
    }
    assert_eq!(snapshot(&map), end);
}

#[test]
fn test_undo_and_redo_names() {
    let mut map = three_layer_map();
    let mut history = CommandHistory::default();
    assert_eq!(history.undo_name(), None);

    let up = EditorCommand::move_layer(&map, 1, MoveDirection::Up).unwrap();
    history.execute(up, &mut map).unwrap();
    assert_eq!(history.undo_name(), Some("Move Layer Up"));
    assert_eq!(history.redo_name(), None);

    history.undo(&mut map).unwrap();
    assert_eq!(history.undo_name(), None);
    assert_eq!(history.redo_name(), Some("Move Layer Up"));
}

#[test]
fn test_clear_resets_history() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();
    let paint = EditorCommand::paint_tile(&map, 0, 0, 0, 1).unwrap();
    history.execute(paint, &mut map).unwrap();

    history.clear();
    assert!(history.is_empty());
    assert!(!history.can_undo());
    assert_eq!(map.tile(0, 0), 1);
}

fn keyboard_app(map: Map, history: CommandHistory) -> App {
    let mut app = App::new();
    app.init_resource::<ButtonInput<KeyCode>>()
        .insert_resource(map)
        .insert_resource(history)
        .add_systems(Update, (handle_undo, handle_redo).chain());
    app
}

#[test]
fn test_keyboard_undo_and_redo() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();
    let paint = EditorCommand::paint_tile(&map, 0, 2, 2, 7).unwrap();
    history.execute(paint, &mut map).unwrap();

    let mut app = keyboard_app(map, history);
    {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.press(KeyCode::ControlLeft);
        keyboard.press(KeyCode::KeyZ);
    }
    app.update();
    assert_eq!(app.world().resource::<Map>().tile(2, 2), 0);

    {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.release(KeyCode::KeyZ);
        keyboard.clear();
        keyboard.press(KeyCode::KeyY);
    }
    app.update();
    assert_eq!(app.world().resource::<Map>().tile(2, 2), 7);
}

#[test]
fn test_ctrl_shift_z_redoes_without_undoing() {
    let mut map = zero_map();
    let mut history = CommandHistory::default();
    let paint = EditorCommand::paint_tile(&map, 0, 2, 2, 7).unwrap();
    history.execute(paint, &mut map).unwrap();
    history.undo(&mut map).unwrap();

    let mut app = keyboard_app(map, history);
    {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.press(KeyCode::ControlLeft);
        keyboard.press(KeyCode::ShiftLeft);
        keyboard.press(KeyCode::KeyZ);
    }
    app.update();
    assert_eq!(app.world().resource::<Map>().tile(2, 2), 7);
    assert_eq!(app.world().resource::<CommandHistory>().current_index(), 1);
}
