use std::any::Any;

use treeline_document::NodeId;

use crate::command::Command;
use crate::state::EditorState;

/// Set or clear the transient cut marker on a set of nodes.
///
/// Non-destructive: cut in this editor is a deferred move, realized only
/// when a paste target is chosen, so the marked nodes stay in the tree.
pub struct MarkCut {
    node_ids: Vec<NodeId>,
    set: bool,
    prior: Vec<(NodeId, bool)>,
}

impl MarkCut {
    pub fn set(node_ids: Vec<NodeId>) -> Self {
        Self {
            node_ids,
            set: true,
            prior: Vec::new(),
        }
    }

    pub fn clear(node_ids: Vec<NodeId>) -> Self {
        Self {
            node_ids,
            set: false,
            prior: Vec::new(),
        }
    }
}

impl Command for MarkCut {
    fn execute(&mut self, state: &mut EditorState) {
        self.prior.clear();
        for id in &self.node_ids {
            if let Some(node) = state.store.get_mut(id) {
                self.prior.push((id.clone(), node.metadata.is_cut));
                node.metadata.is_cut = self.set;
            }
        }
    }

    fn undo(&mut self, state: &mut EditorState) {
        for (id, was_cut) in self.prior.drain(..) {
            if let Some(node) = state.store.get_mut(&id) {
                node.metadata.is_cut = was_cut;
            }
        }
    }

    fn describe(&self) -> String {
        if self.set {
            "Mark cut".to_string()
        } else {
            "Clear cut marks".to_string()
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
