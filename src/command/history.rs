use std::collections::VecDeque;

use super::Command;
use crate::document::Document;
use crate::error::CommandResult;

/// Default number of commands kept for undo
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug)]
pub struct CommandHistory {
    /// Stack of commands that can be undone, oldest at the front
    undo_stack: VecDeque<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
    /// Maximum number of undo entries
    max_depth: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl CommandHistory {
    /// Creates a new empty history holding at most `max_depth` undo entries
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Execute a command and add it to the history if successful.
    ///
    /// A new action invalidates the redo branch. When the history is full the
    /// oldest entry is evicted.
    pub fn execute(&mut self, command: Command, document: &mut Document) -> CommandResult {
        if let Err(err) = command.execute(document) {
            log::error!("Command '{}' failed: {}", command.label(), err);
            return Err(err);
        }

        log::debug!("Executed '{}'", command.label());
        self.undo_stack.push_back(command);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.max_depth {
            if let Some(evicted) = self.undo_stack.pop_front() {
                log::debug!("History full, dropping '{}'", evicted.label());
            }
        }
        Ok(())
    }

    /// Undo the last executed command. Returns false if there was nothing to undo.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        let Some(command) = self.undo_stack.pop_back() else {
            log::debug!("Nothing to undo");
            return false;
        };
        match command.undo(document) {
            Ok(()) => {
                log::debug!("Undid '{}'", command.label());
                self.redo_stack.push(command);
                true
            }
            Err(err) => {
                log::error!("Undo of '{}' failed, dropping it: {}", command.label(), err);
                false
            }
        }
    }

    /// Redo the last undone command. Returns false if there was nothing to redo.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            log::debug!("Nothing to redo");
            return false;
        };
        match command.execute(document) {
            Ok(()) => {
                log::debug!("Redid '{}'", command.label());
                self.undo_stack.push_back(command);
                true
            }
            Err(err) => {
                log::error!("Redo of '{}' failed, dropping it: {}", command.label(), err);
                false
            }
        }
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the command `undo` would reverse
    pub fn undo_label(&self) -> Option<String> {
        self.undo_stack.back().map(Command::label)
    }

    /// Label of the command `redo` would re-apply
    pub fn redo_label(&self) -> Option<String> {
        self.redo_stack.last().map(Command::label)
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
