use std::any::Any;

use treeline_document::NodeId;

use crate::command::Command;
use crate::state::EditorState;

/// Relocate one node (and implicitly its subtree) to a new parent/position.
///
/// Ancestry is recomputed incrementally for the moved node and all of its
/// descendants. When the destination is context-governed (a context
/// declaration or context child), blueprint status propagates onto the
/// moved subtree; prior per-node flags are recorded so undo restores them
/// exactly.
pub struct MoveNode {
    node_id: NodeId,
    new_parent_id: NodeId,
    /// Position among the new parent's children, interpreted after the node
    /// left its old slot, and clamped.
    new_index: usize,
    snapshot: Option<MoveSnapshot>,
}

struct MoveSnapshot {
    old_parent_id: NodeId,
    old_index: usize,
    prior_blueprint: Vec<(NodeId, bool)>,
}

impl MoveNode {
    pub fn new(node_id: NodeId, new_parent_id: NodeId, new_index: usize) -> Self {
        Self {
            node_id,
            new_parent_id,
            new_index,
            snapshot: None,
        }
    }
}

impl Command for MoveNode {
    fn execute(&mut self, state: &mut EditorState) {
        self.snapshot = None;

        let Some(node) = state.store.get(&self.node_id) else {
            return;
        };
        if node.metadata.is_root || !state.store.contains(&self.new_parent_id) {
            return;
        }
        // A node cannot move under itself.
        if self.new_parent_id == self.node_id
            || state
                .registry
                .is_ancestor_of(&self.node_id, &self.new_parent_id)
        {
            return;
        }

        let Some((old_parent_id, old_index)) = state.store.detach(&self.node_id) else {
            return;
        };
        state
            .store
            .attach(&self.new_parent_id, self.new_index, self.node_id.clone());
        state.registry.track_move(&self.node_id, &state.store);

        let governed = state
            .store
            .get(&self.new_parent_id)
            .map(|p| p.metadata.is_context_governed())
            .unwrap_or(false);
        let mut prior_blueprint = Vec::new();
        if governed {
            for id in state.store.subtree_ids(&self.node_id) {
                if let Some(node) = state.store.get_mut(&id) {
                    prior_blueprint.push((id, node.metadata.is_blueprint));
                    node.metadata.is_blueprint = true;
                }
            }
        }

        self.snapshot = Some(MoveSnapshot {
            old_parent_id,
            old_index,
            prior_blueprint,
        });
    }

    fn undo(&mut self, state: &mut EditorState) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        if !state.store.contains(&self.node_id) || !state.store.contains(&snapshot.old_parent_id)
        {
            return;
        }

        state.store.detach(&self.node_id);
        state
            .store
            .attach(&snapshot.old_parent_id, snapshot.old_index, self.node_id.clone());
        state.registry.track_move(&self.node_id, &state.store);

        for (id, was_blueprint) in snapshot.prior_blueprint {
            if let Some(node) = state.store.get_mut(&id) {
                node.metadata.is_blueprint = was_blueprint;
            }
        }
    }

    fn describe(&self) -> String {
        "Move node".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
