//! Bevy systems for handling undo/redo keyboard shortcuts.

use bevy::prelude::*;

use crate::map::Map;

use super::command_history::CommandHistory;

/// (ctrl, shift) currently held
fn modifiers(keyboard: &ButtonInput<KeyCode>) -> (bool, bool) {
    (
        keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
        keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
    )
}

/// Ctrl+Z without Shift
pub fn handle_undo(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut history: ResMut<CommandHistory>,
    mut map: ResMut<Map>,
) {
    let (ctrl, shift) = modifiers(&keyboard);
    if ctrl && !shift && keyboard.just_pressed(KeyCode::KeyZ) && history.can_undo() {
        // Failures are logged by the history
        let _ = history.undo(&mut map);
    }
}

/// Ctrl+Y or Ctrl+Shift+Z
pub fn handle_redo(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut history: ResMut<CommandHistory>,
    mut map: ResMut<Map>,
) {
    let (ctrl, shift) = modifiers(&keyboard);
    let redo_pressed = ctrl
        && (keyboard.just_pressed(KeyCode::KeyY) || (shift && keyboard.just_pressed(KeyCode::KeyZ)));

    if redo_pressed && history.can_redo() {
        let _ = history.redo(&mut map);
    }
}
