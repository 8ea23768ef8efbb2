//! # Editor Façade
//!
//! The host-facing action surface. Actions translate user intent into
//! commands, route them through history, and report a sentinel outcome.
//! Expected refusals (no selection, blocked target, empty clipboard) are
//! outcomes, not errors; only invariant violations are logged as errors.

use serde::{Deserialize, Serialize};
use treeline_document::{NodeId, NodeStatus};

use crate::clipboard::{MemoryClipboard, SystemClipboard};
use crate::command::Command;
use crate::commands::{
    AcceptReview, CreateNode, DeleteNode, EditContent, MoveNode, MultiNodeDeletion, SetStatusBatch,
    SplitNode,
};
use crate::history::History;
use crate::state::EditorState;

/// What an action did, for the host to surface. `Applied` and
/// `BlueprintStripped` mutated the document; everything else left it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionOutcome {
    Applied,
    /// Pasted, but blueprint flags were removed in transit; worth a notice.
    BlueprintStripped,
    NoSelection,
    /// Nothing usable on either clipboard.
    NoContent,
    /// The target refuses this operation (root deletion, cycle, leaf-only
    /// node, missing id).
    Blocked,
    /// A valid request that resolves to doing nothing, e.g. pasting a cut
    /// back onto its own parent.
    Cancelled,
}

impl ActionOutcome {
    /// True when the document changed.
    pub fn mutated(self) -> bool {
        matches!(self, ActionOutcome::Applied | ActionOutcome::BlueprintStripped)
    }
}

type AutosaveHook = Box<dyn FnMut()>;

/// One open document: state, history, and the system clipboard seam.
pub struct Editor {
    pub state: EditorState,
    history: History,
    pub(crate) system_clipboard: Box<dyn SystemClipboard>,
    autosave: Option<AutosaveHook>,
}

impl Editor {
    /// Open a fresh document with an in-process clipboard.
    pub fn new(document_key: &str) -> Self {
        Self::with_clipboard(document_key, Box::new(MemoryClipboard::default()))
    }

    pub fn with_clipboard(document_key: &str, clipboard: Box<dyn SystemClipboard>) -> Self {
        Self {
            state: EditorState::new(document_key),
            history: History::new(),
            system_clipboard: clipboard,
            autosave: None,
        }
    }

    pub fn from_state(state: EditorState, clipboard: Box<dyn SystemClipboard>) -> Self {
        Self {
            state,
            history: History::new(),
            system_clipboard: clipboard,
            autosave: None,
        }
    }

    /// Called after every document mutation, including undo/redo and
    /// expansion toggles. Persistence debouncing is the host's concern.
    pub fn set_autosave(&mut self, hook: impl FnMut() + 'static) {
        self.autosave = Some(Box::new(hook));
    }

    /// For tests and headless hosts: reach the clipboard device directly.
    pub fn system_clipboard_mut(&mut self) -> &mut dyn SystemClipboard {
        &mut *self.system_clipboard
    }

    /// Execute a command through history, then fire autosave.
    pub fn submit(&mut self, command: Box<dyn Command>) {
        self.history.execute(command, &mut self.state);
        self.fire_autosave();
    }

    fn fire_autosave(&mut self) {
        if let Some(hook) = &mut self.autosave {
            hook();
        }
    }

    // ── structural actions ──────────────────────────────────────────────

    /// Insert an empty node right after `node_id` under the same parent.
    /// Returns the new node's id, or None when `node_id` has no parent.
    pub fn create_sibling(&mut self, node_id: &str) -> Option<NodeId> {
        let (parent_id, index) = self.state.store.parent_of(node_id)?;
        let new_id = self.state.store.next_id();
        self.submit(Box::new(CreateNode::new(
            new_id.clone(),
            parent_id,
            index + 1,
            "",
        )));
        Some(new_id)
    }

    /// Insert an empty node as the first child of `parent_id`.
    pub fn create_child(&mut self, parent_id: &str) -> Option<NodeId> {
        let parent = self.state.store.get(parent_id)?;
        if parent.metadata.forbids_children() {
            return None;
        }
        let new_id = self.state.store.next_id();
        self.submit(Box::new(CreateNode::new(
            new_id.clone(),
            parent_id.to_string(),
            0,
            "",
        )));
        Some(new_id)
    }

    /// Split `node_id` at a character offset; the remainder becomes the next
    /// sibling, or the first child when `as_child`.
    pub fn split_node(&mut self, node_id: &str, offset: usize, as_child: bool) -> Option<NodeId> {
        let node = self.state.store.get(node_id)?;
        if node.metadata.is_root {
            return None;
        }
        let new_id = self.state.store.next_id();
        self.submit(Box::new(SplitNode::new(
            node_id.to_string(),
            offset,
            as_child,
            new_id.clone(),
        )));
        Some(new_id)
    }

    pub fn edit_content(&mut self, node_id: &str, after: impl Into<String>) -> ActionOutcome {
        let Some(node) = self.state.store.get(node_id) else {
            return ActionOutcome::Blocked;
        };
        let before = node.content.clone();
        self.submit(Box::new(EditContent::new(
            node_id.to_string(),
            before,
            after.into(),
        )));
        ActionOutcome::Applied
    }

    /// Make `node_id` the last child of its previous sibling.
    pub fn indent(&mut self, node_id: &str) -> ActionOutcome {
        let Some((parent_id, index)) = self.state.store.parent_of(node_id) else {
            return ActionOutcome::Blocked;
        };
        if index == 0 {
            // First under its parent; there is nothing to indent beneath.
            return ActionOutcome::Blocked;
        }
        let previous = self.state.store.get(&parent_id).map(|p| p.children[index - 1].clone());
        let Some(previous) = previous else {
            return ActionOutcome::Blocked;
        };
        if self
            .state
            .store
            .get(&previous)
            .map(|n| n.metadata.forbids_children())
            .unwrap_or(true)
        {
            return ActionOutcome::Blocked;
        }
        self.submit(Box::new(MoveNode::new(
            node_id.to_string(),
            previous,
            usize::MAX,
        )));
        ActionOutcome::Applied
    }

    /// Move `node_id` to sit right after its parent, under the grandparent.
    pub fn outdent(&mut self, node_id: &str) -> ActionOutcome {
        let Some((parent_id, _)) = self.state.store.parent_of(node_id) else {
            return ActionOutcome::Blocked;
        };
        // Already top-level; the root cannot gain siblings.
        let Some((grandparent_id, parent_index)) = self.state.store.parent_of(&parent_id) else {
            return ActionOutcome::Blocked;
        };
        self.submit(Box::new(MoveNode::new(
            node_id.to_string(),
            grandparent_id,
            parent_index + 1,
        )));
        ActionOutcome::Applied
    }

    pub fn move_node(
        &mut self,
        node_id: &str,
        new_parent_id: &str,
        new_index: usize,
    ) -> ActionOutcome {
        let Some(node) = self.state.store.get(node_id) else {
            return ActionOutcome::Blocked;
        };
        if node.metadata.is_root || !self.state.store.contains(new_parent_id) {
            return ActionOutcome::Blocked;
        }
        if node_id == new_parent_id
            || self.state.registry.is_ancestor_of(node_id, new_parent_id)
        {
            return ActionOutcome::Blocked;
        }
        self.submit(Box::new(MoveNode::new(
            node_id.to_string(),
            new_parent_id.to_string(),
            new_index,
        )));
        ActionOutcome::Applied
    }

    // ── status actions ──────────────────────────────────────────────────

    /// Pending flips to completed; anything else returns to pending. The
    /// whole subtree follows as one undo step.
    pub fn toggle_status(&mut self, node_id: &str) -> ActionOutcome {
        let Some(node) = self.state.store.get(node_id) else {
            return ActionOutcome::Blocked;
        };
        let next = match node.metadata.status {
            NodeStatus::Pending => NodeStatus::Completed,
            _ => NodeStatus::Pending,
        };
        self.set_status(node_id, next)
    }

    pub fn set_status(&mut self, node_id: &str, status: NodeStatus) -> ActionOutcome {
        if !self.state.store.contains(node_id) {
            return ActionOutcome::Blocked;
        }
        self.submit(Box::new(SetStatusBatch::new(node_id.to_string(), status)));
        ActionOutcome::Applied
    }

    // ── deletion ────────────────────────────────────────────────────────

    pub fn delete_node(&mut self, node_id: &str) -> ActionOutcome {
        let Some(node) = self.state.store.get(node_id) else {
            return ActionOutcome::Blocked;
        };
        if node.metadata.is_root {
            tracing::error!("attempted to delete the root node");
            return ActionOutcome::Blocked;
        }
        self.submit(Box::new(DeleteNode::new(node_id.to_string())));
        ActionOutcome::Applied
    }

    /// Delete the minimal covering set of the selection in one undo step.
    /// All-or-nothing: if the root is somehow in the set, nothing deletes.
    pub fn delete_selected(&mut self) -> ActionOutcome {
        let targets = self
            .state
            .selection
            .nodes_to_move(&self.state.store, &self.state.registry);
        if targets.is_empty() {
            return ActionOutcome::NoSelection;
        }
        if targets.iter().any(|id| id == self.state.store.root_id()) {
            tracing::error!("selection for deletion contains the root node");
            return ActionOutcome::Blocked;
        }
        self.submit(Box::new(MultiNodeDeletion::new(targets)));
        ActionOutcome::Applied
    }

    // ── review ──────────────────────────────────────────────────────────

    /// Swap `old_root_id`'s subtree for a supplied replacement forest. The
    /// outgoing ids are published as a fade-out hint for the view.
    pub fn accept_review(
        &mut self,
        old_root_id: &str,
        new_root_id: &str,
        new_nodes: Vec<treeline_document::Node>,
    ) -> ActionOutcome {
        let Some(node) = self.state.store.get(old_root_id) else {
            return ActionOutcome::Blocked;
        };
        if node.metadata.is_root {
            return ActionOutcome::Blocked;
        }
        self.state.signals.review_fading_node_ids = self.state.store.subtree_ids(old_root_id);
        self.submit(Box::new(AcceptReview::new(
            old_root_id.to_string(),
            new_root_id.to_string(),
            new_nodes,
        )));
        ActionOutcome::Applied
    }

    // ── view-only state ─────────────────────────────────────────────────

    /// Expansion is presentation state: flipping it is not undoable and
    /// never touches history, but it does persist, so autosave fires.
    pub fn toggle_expanded(&mut self, node_id: &str) -> ActionOutcome {
        let Some(node) = self.state.store.get_mut(node_id) else {
            return ActionOutcome::Blocked;
        };
        node.metadata.expanded = !node.metadata.expanded;
        self.fire_autosave();
        ActionOutcome::Applied
    }

    pub fn toggle_selection(&mut self, node_id: &str) {
        self.state.selection.toggle(
            node_id,
            &self.state.store,
            &self.state.registry,
            self.state.visible_filter.as_ref(),
        );
    }

    pub fn select_range(&mut self, node_id: &str) {
        let sequence = self.state.visible_sequence();
        self.state.selection.select_range(
            node_id,
            &self.state.store,
            &self.state.registry,
            &sequence,
            self.state.visible_filter.as_ref(),
        );
    }

    pub fn set_visible_filter(
        &mut self,
        filter: Option<std::collections::HashSet<NodeId>>,
    ) {
        self.state.visible_filter = filter;
    }

    // ── history ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.state);
        if undone {
            self.fire_autosave();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.state);
        if redone {
            self.fire_autosave();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.history.redo_description()
    }

    /// Drop all history, e.g. when the document is closed or swapped out.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
