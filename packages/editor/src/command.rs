//! The reversible command contract.

use std::any::Any;

use crate::state::EditorState;

/// A self-contained reversible operation over the editor state.
///
/// Each command snapshots exactly the pre-state it needs to reverse itself
/// during `execute`, and nothing more. Commands take the state explicitly;
/// they never capture it, so every command in history operates on the live,
/// evolving store.
///
/// Commands do not fail: a missing node or parent at execute or undo time
/// makes the call a silent no-op. The UI may race a stale command against an
/// already-divergent tree; absorbing that race here keeps the history replay
/// total.
pub trait Command {
    fn execute(&mut self, state: &mut EditorState);

    fn undo(&mut self, state: &mut EditorState);

    /// Replay after an undo. Defaults to re-running `execute`.
    fn redo(&mut self, state: &mut EditorState) {
        self.execute(state);
    }

    /// Whether `other` can be folded into this command instead of growing
    /// the history stack. Checked only inside the history merge window.
    fn can_merge_with(&self, _other: &dyn Command) -> bool {
        false
    }

    /// Fold `other` into this command. Only called after
    /// [`Command::can_merge_with`] returned true.
    fn merge_with(&mut self, _other: Box<dyn Command>) {}

    /// Human-readable description for undo menus and logs.
    fn describe(&self) -> String;

    fn as_any(&self) -> &dyn Any;
}

/// Several commands undone and redone as one step.
///
/// Used where one user intent maps to multiple primitive commands, e.g.
/// realizing a cut as per-root moves plus clearing the cut marks.
pub struct BatchCommand {
    commands: Vec<Box<dyn Command>>,
    description: String,
}

impl BatchCommand {
    pub fn new(commands: Vec<Box<dyn Command>>, description: impl Into<String>) -> Self {
        Self {
            commands,
            description: description.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Command for BatchCommand {
    fn execute(&mut self, state: &mut EditorState) {
        for command in &mut self.commands {
            command.execute(state);
        }
    }

    fn undo(&mut self, state: &mut EditorState) {
        for command in self.commands.iter_mut().rev() {
            command.undo(state);
        }
    }

    fn redo(&mut self, state: &mut EditorState) {
        for command in &mut self.commands {
            command.redo(state);
        }
    }

    fn describe(&self) -> String {
        self.description.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
