use std::any::Any;

use treeline_document::NodeId;

use crate::command::Command;
use crate::state::EditorState;

/// Replace a node's content, merging keystroke bursts into one undo step.
///
/// Consecutive edits to the same node merge inside the history window as
/// long as the change does not insert or delete whitespace; a word
/// boundary ends the run, so undoing restores whole words, not whole
/// sessions.
pub struct EditContent {
    node_id: NodeId,
    before: String,
    after: String,
}

impl EditContent {
    pub fn new(node_id: NodeId, before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            node_id,
            before: before.into(),
            after: after.into(),
        }
    }
}

impl Command for EditContent {
    fn execute(&mut self, state: &mut EditorState) {
        if let Some(node) = state.store.get_mut(&self.node_id) {
            node.content = self.after.clone();
        }
    }

    fn undo(&mut self, state: &mut EditorState) {
        if let Some(node) = state.store.get_mut(&self.node_id) {
            node.content = self.before.clone();
        }
    }

    fn can_merge_with(&self, other: &dyn Command) -> bool {
        let Some(other) = other.as_any().downcast_ref::<EditContent>() else {
            return false;
        };
        other.node_id == self.node_id
            && other.before == self.after
            && !delta_touches_whitespace(&other.before, &other.after)
    }

    fn merge_with(&mut self, other: Box<dyn Command>) {
        if let Some(other) = other.as_any().downcast_ref::<EditContent>() {
            self.after = other.after.clone();
        }
    }

    fn describe(&self) -> String {
        "Edit content".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Whether the change from `before` to `after` inserts or deletes any
/// whitespace. Compares around the common prefix/suffix so unchanged text
/// never counts.
fn delta_touches_whitespace(before: &str, after: &str) -> bool {
    let b: Vec<char> = before.chars().collect();
    let a: Vec<char> = after.chars().collect();

    let mut prefix = 0;
    while prefix < b.len() && prefix < a.len() && b[prefix] == a[prefix] {
        prefix += 1;
    }

    let mut suffix = 0;
    while suffix < b.len() - prefix
        && suffix < a.len() - prefix
        && b[b.len() - 1 - suffix] == a[a.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let removed = &b[prefix..b.len() - suffix];
    let inserted = &a[prefix..a.len() - suffix];
    removed.iter().any(|c| c.is_whitespace()) || inserted.iter().any(|c| c.is_whitespace())
}
