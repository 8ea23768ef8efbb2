use std::any::Any;
use std::time::{SystemTime, UNIX_EPOCH};

use treeline_document::{NodeId, NodeStatus};

use crate::command::Command;
use crate::state::EditorState;

/// Apply one status to a node and every descendant as a single undo step.
///
/// `resolved_at` is stamped when the target status is non-pending and
/// cleared otherwise. The timestamp is captured when the command is built,
/// so undo/redo replay identical metadata.
pub struct SetStatusBatch {
    node_id: NodeId,
    status: NodeStatus,
    resolved_at: Option<u64>,
    prior: Vec<(NodeId, NodeStatus, Option<u64>)>,
}

impl SetStatusBatch {
    pub fn new(node_id: NodeId, status: NodeStatus) -> Self {
        let resolved_at = match status {
            NodeStatus::Pending => None,
            _ => Some(unix_now()),
        };
        Self {
            node_id,
            status,
            resolved_at,
            prior: Vec::new(),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl Command for SetStatusBatch {
    fn execute(&mut self, state: &mut EditorState) {
        self.prior.clear();
        if !state.store.contains(&self.node_id) {
            return;
        }

        for id in state.store.subtree_ids(&self.node_id) {
            if let Some(node) = state.store.get_mut(&id) {
                self.prior
                    .push((id.clone(), node.metadata.status, node.metadata.resolved_at));
                node.metadata.status = self.status;
                node.metadata.resolved_at = self.resolved_at;
            }
        }
    }

    fn undo(&mut self, state: &mut EditorState) {
        for (id, status, resolved_at) in self.prior.drain(..) {
            if let Some(node) = state.store.get_mut(&id) {
                node.metadata.status = status;
                node.metadata.resolved_at = resolved_at;
            }
        }
    }

    fn describe(&self) -> String {
        match self.status {
            NodeStatus::Pending => "Mark all pending".to_string(),
            NodeStatus::Completed => "Mark all completed".to_string(),
            NodeStatus::Abandoned => "Mark all abandoned".to_string(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
