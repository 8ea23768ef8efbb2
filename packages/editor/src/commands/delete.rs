use std::any::Any;

use treeline_document::{Node, NodeId};

use crate::command::Command;
use crate::state::EditorState;

/// Remove a node and its entire subtree.
///
/// Before deleting, the previous visible node is computed and published as
/// a scroll hint so the view has somewhere sensible to land. The sole
/// top-level child of the root is never removed; its content is cleared
/// instead, so the root can never become childless through deletion.
pub struct DeleteNode {
    node_id: NodeId,
    undo_state: Option<DeleteUndo>,
}

enum DeleteUndo {
    Removed {
        parent_id: NodeId,
        index: usize,
        nodes: Vec<Node>,
    },
    Cleared {
        prior_content: String,
    },
}

impl DeleteNode {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            undo_state: None,
        }
    }
}

impl Command for DeleteNode {
    fn execute(&mut self, state: &mut EditorState) {
        self.undo_state = None;

        let Some(node) = state.store.get(&self.node_id) else {
            return;
        };
        if node.metadata.is_root {
            return;
        }
        let Some((parent_id, index)) = state.store.parent_of(&self.node_id) else {
            return;
        };

        let sole_top_level = parent_id == *state.store.root_id()
            && state
                .store
                .get(&parent_id)
                .map(|root| root.children.len() == 1)
                .unwrap_or(false);

        if sole_top_level {
            let prior_content = node.content.clone();
            if let Some(node) = state.store.get_mut(&self.node_id) {
                node.content.clear();
            }
            state.signals.scroll_to_node_id = Some(self.node_id.clone());
            self.undo_state = Some(DeleteUndo::Cleared { prior_content });
            return;
        }

        if let Some(candidate) = state.store.previous_visible(&self.node_id) {
            state.signals.scroll_to_node_id = Some(candidate);
        }

        let removed_ids = state.store.subtree_ids(&self.node_id);
        let nodes: Vec<Node> = removed_ids
            .iter()
            .filter_map(|id| state.store.get(id).cloned())
            .collect();

        state.selection.prune(&removed_ids);
        state.registry.track_remove(&self.node_id, &state.store);
        state.store.detach(&self.node_id);
        for id in &removed_ids {
            state.store.remove(id);
        }

        self.undo_state = Some(DeleteUndo::Removed {
            parent_id,
            index,
            nodes,
        });
    }

    fn undo(&mut self, state: &mut EditorState) {
        match self.undo_state.take() {
            Some(DeleteUndo::Cleared { prior_content }) => {
                if let Some(node) = state.store.get_mut(&self.node_id) {
                    node.content = prior_content;
                }
            }
            Some(DeleteUndo::Removed {
                parent_id,
                index,
                nodes,
            }) => {
                if !state.store.contains(&parent_id) {
                    return;
                }
                for node in nodes {
                    state.store.insert(node);
                }
                state.store.attach(&parent_id, index, self.node_id.clone());
                state.registry.track_subtree(&self.node_id, &state.store);
            }
            None => {}
        }
    }

    fn describe(&self) -> String {
        "Delete node".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Delete several subtrees as one logical unit. Shared by bulk-delete and
/// the realization of a cut.
///
/// Each target is snapshotted with its parent and position; undo restores
/// subtrees in descending position per parent so splice-insertion rebuilds
/// the original ordering. The multi-selection is cleared on execute. If the
/// deletion would leave the root childless, a fresh empty node takes the
/// targets' place.
pub struct MultiNodeDeletion {
    target_ids: Vec<NodeId>,
    snapshots: Vec<RemovedSubtree>,
    replacement_id: Option<NodeId>,
}

struct RemovedSubtree {
    parent_id: NodeId,
    index: usize,
    nodes: Vec<Node>,
}

impl MultiNodeDeletion {
    /// `target_ids` is usually a minimal covering set (no target inside
    /// another target's subtree), but nested targets work in any order:
    /// undo defers a subtree until its parent is back in the store.
    pub fn new(target_ids: Vec<NodeId>) -> Self {
        Self {
            target_ids,
            snapshots: Vec::new(),
            replacement_id: None,
        }
    }
}

impl Command for MultiNodeDeletion {
    fn execute(&mut self, state: &mut EditorState) {
        self.snapshots.clear();
        self.replacement_id = None;

        for target in &self.target_ids {
            let Some(node) = state.store.get(target) else {
                continue; // already gone, possibly inside an earlier target
            };
            if node.metadata.is_root {
                continue;
            }
            let Some((parent_id, index)) = state.store.parent_of(target) else {
                continue;
            };

            let removed_ids = state.store.subtree_ids(target);
            let nodes: Vec<Node> = removed_ids
                .iter()
                .filter_map(|id| state.store.get(id).cloned())
                .collect();

            state.registry.track_remove(target, &state.store);
            state.store.detach(target);
            for id in &removed_ids {
                state.store.remove(id);
            }

            self.snapshots.push(RemovedSubtree {
                parent_id,
                index,
                nodes,
            });
        }

        state.selection.clear();

        let root_id = state.store.root_id().clone();
        let root_empty = state
            .store
            .get(&root_id)
            .map(|root| root.children.is_empty())
            .unwrap_or(false);
        if root_empty {
            let id = state.store.next_id();
            state.store.insert(Node::new(id.clone(), ""));
            state.store.attach(&root_id, 0, id.clone());
            state.registry.track_insert(&id, &root_id);
            self.replacement_id = Some(id);
        }
    }

    fn undo(&mut self, state: &mut EditorState) {
        if let Some(replacement) = self.replacement_id.take() {
            if state.store.contains(&replacement) {
                state.registry.track_remove(&replacement, &state.store);
                state.store.detach(&replacement);
                state.store.remove(&replacement);
            }
        }

        // Descending position per parent: inserting the highest index first
        // keeps every later splice at its original offset.
        let mut pending = std::mem::take(&mut self.snapshots);
        pending.sort_by(|a, b| b.index.cmp(&a.index));

        // A nested target's parent may itself be a snapshot that has not
        // been restored yet; defer until the parent is back in the store.
        loop {
            let mut deferred = Vec::new();
            let mut progressed = false;

            for snapshot in pending {
                if !state.store.contains(&snapshot.parent_id) {
                    deferred.push(snapshot);
                    continue;
                }
                let Some(root) = snapshot.nodes.first().map(|n| n.id.clone()) else {
                    continue;
                };
                for node in snapshot.nodes {
                    state.store.insert(node);
                }
                state
                    .store
                    .attach(&snapshot.parent_id, snapshot.index, root.clone());
                state.registry.track_subtree(&root, &state.store);
                progressed = true;
            }

            if deferred.is_empty() || !progressed {
                break;
            }
            pending = deferred;
        }
    }

    fn describe(&self) -> String {
        format!("Delete {} nodes", self.target_ids.len())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
