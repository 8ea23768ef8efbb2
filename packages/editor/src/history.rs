//! # Undo/Redo History
//!
//! Bounded command stack with a cursor and short-window merging.
//!
//! ## Design
//!
//! - Executed commands are pushed past the cursor; any redo tail is
//!   discarded on a new execution
//! - A command executed within the merge window may be folded into the
//!   entry at the cursor instead of growing the stack, collapsing a
//!   keystroke burst into one undo step
//! - The stack is capped; the oldest entry is evicted first

use std::time::{Duration, Instant};

use crate::command::Command;
use crate::state::EditorState;

const DEFAULT_MAX_ENTRIES: usize = 100;
const DEFAULT_MERGE_WINDOW: Duration = Duration::from_millis(1000);

struct HistoryEntry {
    command: Box<dyn Command>,
    executed_at: Instant,
}

/// Bounded undo/redo stack over [`Command`] objects.
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Index of the most recently executed entry; -1 when empty or fully
    /// undone.
    current: isize,
    merge_window: Duration,
    max_entries: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_ENTRIES, DEFAULT_MERGE_WINDOW)
    }

    pub fn with_limits(max_entries: usize, merge_window: Duration) -> Self {
        Self {
            entries: Vec::new(),
            current: -1,
            merge_window,
            max_entries,
        }
    }

    /// Execute a command and record it.
    ///
    /// If the entry at the cursor is the stack tail, was executed within the
    /// merge window, and accepts the incoming command, the command executes
    /// and folds into that entry without growing the stack.
    pub fn execute(&mut self, mut command: Box<dyn Command>, state: &mut EditorState) {
        tracing::debug!(command = %command.describe(), "execute");

        if self.current >= 0 && self.current as usize == self.entries.len() - 1 {
            let entry = &mut self.entries[self.current as usize];
            if entry.executed_at.elapsed() <= self.merge_window
                && entry.command.can_merge_with(command.as_ref())
            {
                command.execute(state);
                entry.command.merge_with(command);
                entry.executed_at = Instant::now();
                return;
            }
        }

        // Discard the redo tail.
        self.entries.truncate((self.current + 1) as usize);

        command.execute(state);
        self.entries.push(HistoryEntry {
            command,
            executed_at: Instant::now(),
        });
        self.current = self.entries.len() as isize - 1;

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
            self.current -= 1;
        }
    }

    /// Undo the entry at the cursor. Returns false when there is nothing to
    /// undo.
    pub fn undo(&mut self, state: &mut EditorState) -> bool {
        if self.current < 0 {
            return false;
        }
        let entry = &mut self.entries[self.current as usize];
        tracing::debug!(command = %entry.command.describe(), "undo");
        entry.command.undo(state);
        self.current -= 1;
        true
    }

    /// Redo the entry after the cursor. Returns false at the tail.
    pub fn redo(&mut self, state: &mut EditorState) -> bool {
        let next = (self.current + 1) as usize;
        if next >= self.entries.len() {
            return false;
        }
        self.current += 1;
        let entry = &mut self.entries[next];
        tracing::debug!(command = %entry.command.describe(), "redo");
        entry.command.redo(state);
        true
    }

    /// Reset stack and cursor. Used on document close.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = -1;
    }

    pub fn can_undo(&self) -> bool {
        self.current >= 0
    }

    pub fn can_redo(&self) -> bool {
        ((self.current + 1) as usize) < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Description of the next undo step, if any.
    pub fn undo_description(&self) -> Option<String> {
        if self.current < 0 {
            return None;
        }
        Some(self.entries[self.current as usize].command.describe())
    }

    /// Description of the next redo step, if any.
    pub fn redo_description(&self) -> Option<String> {
        let next = (self.current + 1) as usize;
        self.entries.get(next).map(|e| e.command.describe())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
