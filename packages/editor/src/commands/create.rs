use std::any::Any;

use treeline_document::{Node, NodeId};

use crate::command::Command;
use crate::state::EditorState;

/// Insert a new empty-status node at a given parent and position.
pub struct CreateNode {
    node_id: NodeId,
    parent_id: NodeId,
    index: usize,
    content: String,
}

impl CreateNode {
    pub fn new(
        node_id: NodeId,
        parent_id: NodeId,
        index: usize,
        content: impl Into<String>,
    ) -> Self {
        Self {
            node_id,
            parent_id,
            index,
            content: content.into(),
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }
}

impl Command for CreateNode {
    fn execute(&mut self, state: &mut EditorState) {
        if !state.store.contains(&self.parent_id) || state.store.contains(&self.node_id) {
            return;
        }

        // New nodes start pending; Node::new carries the defaults.
        state
            .store
            .insert(Node::new(self.node_id.clone(), self.content.clone()));
        state
            .store
            .attach(&self.parent_id, self.index, self.node_id.clone());
        state.registry.track_insert(&self.node_id, &self.parent_id);
    }

    fn undo(&mut self, state: &mut EditorState) {
        if !state.store.contains(&self.node_id) {
            return;
        }
        let removed = state.store.subtree_ids(&self.node_id);
        state.selection.prune(&removed);
        state.registry.track_remove(&self.node_id, &state.store);
        state.store.detach(&self.node_id);
        for id in removed {
            state.store.remove(&id);
        }
    }

    fn describe(&self) -> String {
        "Create node".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
