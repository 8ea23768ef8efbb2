use std::any::Any;

use treeline_document::{Node, NodeId};

use crate::command::Command;
use crate::state::EditorState;

/// Divide a node's content at a cursor offset.
///
/// The text before the offset stays on the source node; a new node holding
/// the rest becomes the next sibling, or the first child when `as_child`.
/// The new node inherits `is_blueprint` only when its destination parent is
/// context-governed, never from a plain blueprint ancestor, to avoid
/// accidental propagation.
pub struct SplitNode {
    node_id: NodeId,
    /// Offset in characters, clamped to the content length.
    offset: usize,
    as_child: bool,
    new_node_id: NodeId,
    original_content: Option<String>,
}

impl SplitNode {
    pub fn new(node_id: NodeId, offset: usize, as_child: bool, new_node_id: NodeId) -> Self {
        Self {
            node_id,
            offset,
            as_child,
            new_node_id,
            original_content: None,
        }
    }

    pub fn new_node_id(&self) -> &NodeId {
        &self.new_node_id
    }
}

impl Command for SplitNode {
    fn execute(&mut self, state: &mut EditorState) {
        self.original_content = None;

        let Some(node) = state.store.get(&self.node_id) else {
            return;
        };
        if node.metadata.is_root {
            return;
        }

        let (dest_parent, insert_index) = if self.as_child {
            (self.node_id.clone(), 0)
        } else {
            match state.store.parent_of(&self.node_id) {
                Some((parent, pos)) => (parent, pos + 1),
                None => return,
            }
        };

        let content = node.content.clone();
        let source_blueprint = node.metadata.is_blueprint;
        let byte_offset = content
            .char_indices()
            .nth(self.offset)
            .map(|(i, _)| i)
            .unwrap_or(content.len());
        let (before, after) = content.split_at(byte_offset);

        let mut new_node = Node::new(self.new_node_id.clone(), after);
        let governed = state
            .store
            .get(&dest_parent)
            .map(|p| p.metadata.is_context_governed())
            .unwrap_or(false);
        if governed {
            new_node.metadata.is_blueprint = source_blueprint;
        }

        self.original_content = Some(content.clone());
        if let Some(source) = state.store.get_mut(&self.node_id) {
            source.content = before.to_string();
        }

        state.store.insert(new_node);
        state
            .store
            .attach(&dest_parent, insert_index, self.new_node_id.clone());
        state.registry.track_insert(&self.new_node_id, &dest_parent);
    }

    fn undo(&mut self, state: &mut EditorState) {
        let Some(original) = self.original_content.take() else {
            return;
        };

        if state.store.contains(&self.new_node_id) {
            let removed = state.store.subtree_ids(&self.new_node_id);
            state.selection.prune(&removed);
            state.registry.track_remove(&self.new_node_id, &state.store);
            state.store.detach(&self.new_node_id);
            for id in removed {
                state.store.remove(&id);
            }
        }

        if let Some(source) = state.store.get_mut(&self.node_id) {
            source.content = original;
        }
    }

    fn describe(&self) -> String {
        "Split node".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
