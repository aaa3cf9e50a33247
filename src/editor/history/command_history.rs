//! Command history resource for tracking undo/redo state.

use bevy::prelude::*;

use crate::error::{DocumentError, DocumentResult};
use crate::map::Map;

use super::commands::EditorCommand;
use super::MAX_HISTORY_SIZE;

/// Resource tracking executed commands for undo/redo.
///
/// `commands[..current_index]` are applied; `commands[current_index..]` is the redo tail.
#[derive(Resource, Debug)]
pub struct CommandHistory {
    commands: Vec<EditorCommand>,
    current_index: usize,
    max_history_size: usize,
    /// Inside a `begin_stroke`/`end_stroke` bracket
    stroke_open: bool,
    /// The top command was recorded during the open stroke and may absorb paints
    stroke_target: bool,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_max_size(MAX_HISTORY_SIZE)
    }
}

impl CommandHistory {
    /// History keeping at most `max_size` commands (at least one)
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            commands: Vec::new(),
            current_index: 0,
            max_history_size: max_size.max(1),
            stroke_open: false,
            stroke_target: false,
        }
    }

    /// Executes and records a command, discarding the redo tail.
    ///
    /// A command that fails is not recorded. Paints on the same layer inside an open stroke
    /// merge into the stroke's first paint instead of adding entries.
    pub fn execute(&mut self, mut command: EditorCommand, map: &mut Map) -> DocumentResult<()> {
        if let Err(e) = command.execute(map) {
            match e {
                DocumentError::NoChange => debug!("{} changed nothing", command.name()),
                ref other => warn!("{} failed: {}", command.name(), other),
            }
            return Err(e);
        }

        if self.stroke_open
            && self.stroke_target
            && self.current_index == self.commands.len()
            && let Some(top) = self.commands.last_mut()
            && top.can_merge_with(&command)
        {
            top.merge_with(command);
            return Ok(());
        }

        debug!("Executed: {}", command.name());
        self.commands.truncate(self.current_index);
        self.commands.push(command);
        self.current_index += 1;
        self.stroke_target = self.stroke_open;
        self.trim();
        Ok(())
    }

    pub fn undo(&mut self, map: &mut Map) -> DocumentResult<()> {
        if !self.can_undo() {
            return Err(DocumentError::NothingToUndo);
        }

        let command = &mut self.commands[self.current_index - 1];
        command.undo(map).inspect_err(|e| {
            warn!("Undo of {} failed: {}", command.name(), e);
        })?;
        debug!("Undone: {}", command.name());

        self.current_index -= 1;
        self.stroke_target = false;
        Ok(())
    }

    pub fn redo(&mut self, map: &mut Map) -> DocumentResult<()> {
        if !self.can_redo() {
            return Err(DocumentError::NothingToRedo);
        }

        let command = &mut self.commands[self.current_index];
        command.redo(map).inspect_err(|e| {
            warn!("Redo of {} failed: {}", command.name(), e);
        })?;
        debug!("Redone: {}", command.name());

        self.current_index += 1;
        self.stroke_target = false;
        Ok(())
    }

    /// Starts a drag gesture; paints until `end_stroke` become one undo step
    pub fn begin_stroke(&mut self) {
        self.stroke_open = true;
        self.stroke_target = false;
    }

    pub fn end_stroke(&mut self) {
        self.stroke_open = false;
        self.stroke_target = false;
    }

    pub fn is_stroke_open(&self) -> bool {
        self.stroke_open
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.commands.len()
    }

    pub fn undo_name(&self) -> Option<&'static str> {
        self.current_index
            .checked_sub(1)
            .and_then(|i| self.commands.get(i))
            .map(EditorCommand::name)
    }

    pub fn redo_name(&self) -> Option<&'static str> {
        self.commands.get(self.current_index).map(EditorCommand::name)
    }

    /// Number of applied commands
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Changes the capacity, dropping the oldest commands if needed
    pub fn set_max_history_size(&mut self, max_size: usize) {
        self.max_history_size = max_size.max(1);
        self.trim();
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = 0;
        self.stroke_target = false;
    }

    fn trim(&mut self) {
        if self.commands.len() <= self.max_history_size {
            return;
        }
        let excess = self.commands.len() - self.max_history_size;
        self.commands.drain(..excess);
        self.current_index = self.current_index.saturating_sub(excess);
    }
}
