use std::any::Any;

use treeline_document::{AncestorRegistry, Node, NodeId};

use crate::command::Command;
use crate::state::EditorState;

/// Swap a reviewed subtree for a newly supplied one at the same position.
///
/// This is a rare bulk operation, so both directions end with a full
/// ancestor-registry rebuild instead of incremental patching.
pub struct AcceptReview {
    old_root_id: NodeId,
    new_root_id: NodeId,
    /// Full replacement forest, including the new root.
    new_nodes: Vec<Node>,
    snapshot: Option<ReviewSnapshot>,
}

struct ReviewSnapshot {
    parent_id: NodeId,
    index: usize,
    old_nodes: Vec<Node>,
}

impl AcceptReview {
    pub fn new(old_root_id: NodeId, new_root_id: NodeId, new_nodes: Vec<Node>) -> Self {
        Self {
            old_root_id,
            new_root_id,
            new_nodes,
            snapshot: None,
        }
    }
}

impl Command for AcceptReview {
    fn execute(&mut self, state: &mut EditorState) {
        self.snapshot = None;

        let Some((parent_id, index)) = state.store.parent_of(&self.old_root_id) else {
            return;
        };

        let old_ids = state.store.subtree_ids(&self.old_root_id);
        let old_nodes: Vec<Node> = old_ids
            .iter()
            .filter_map(|id| state.store.get(id).cloned())
            .collect();

        state.selection.prune(&old_ids);
        state.store.detach(&self.old_root_id);
        for id in &old_ids {
            state.store.remove(id);
        }

        for node in &self.new_nodes {
            state.store.insert(node.clone());
        }
        state
            .store
            .attach(&parent_id, index, self.new_root_id.clone());

        state.registry = AncestorRegistry::rebuild(&state.store);

        self.snapshot = Some(ReviewSnapshot {
            parent_id,
            index,
            old_nodes,
        });
    }

    fn undo(&mut self, state: &mut EditorState) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        if !state.store.contains(&snapshot.parent_id) {
            return;
        }

        if state.store.contains(&self.new_root_id) {
            let new_ids = state.store.subtree_ids(&self.new_root_id);
            state.selection.prune(&new_ids);
            state.store.detach(&self.new_root_id);
            for id in new_ids {
                state.store.remove(&id);
            }
        }

        for node in snapshot.old_nodes {
            state.store.insert(node);
        }
        state
            .store
            .attach(&snapshot.parent_id, snapshot.index, self.old_root_id.clone());

        state.registry = AncestorRegistry::rebuild(&state.store);
    }

    fn describe(&self) -> String {
        "Accept review".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> EditorState {
        let mut state = EditorState::new("test");
        let root = state.store.root_id().clone();
        for (id, parent) in [("a", None), ("a1", Some("a")), ("b", None)] {
            state.store.insert(Node::new(id, id));
            let parent_id = parent.map(str::to_string).unwrap_or(root.clone());
            let len = state.store.get(&parent_id).unwrap().children.len();
            state.store.attach(&parent_id, len, id.to_string());
        }
        state.registry = AncestorRegistry::rebuild(&state.store);
        state
    }

    #[test]
    fn test_swap_and_undo_restore_verbatim() {
        let mut state = fixture();
        let root = state.store.root_id().clone();
        let position = state
            .store
            .get(&root)
            .unwrap()
            .children
            .iter()
            .position(|c| c == "a")
            .unwrap();

        let mut replacement_root = Node::new("r", "revised");
        replacement_root.children.push("r1".to_string());
        let replacement_child = Node::new("r1", "revised child");

        let mut cmd = AcceptReview::new(
            "a".into(),
            "r".into(),
            vec![replacement_root, replacement_child],
        );
        cmd.execute(&mut state);

        assert!(!state.store.contains("a"));
        assert!(!state.store.contains("a1"));
        assert_eq!(state.store.get(&root).unwrap().children[position], "r");
        assert!(state.store.contains("r1"));
        assert_eq!(state.registry, AncestorRegistry::rebuild(&state.store));

        cmd.undo(&mut state);
        assert!(!state.store.contains("r"));
        assert_eq!(state.store.get(&root).unwrap().children[position], "a");
        assert_eq!(state.store.get("a").unwrap().children, vec!["a1"]);
        assert_eq!(state.registry, AncestorRegistry::rebuild(&state.store));
    }

    #[test]
    fn test_missing_old_root_is_a_noop() {
        let mut state = fixture();
        let before = state.store.len();

        let mut cmd = AcceptReview::new("ghost".into(), "r".into(), vec![Node::new("r", "x")]);
        cmd.execute(&mut state);
        cmd.undo(&mut state);

        assert_eq!(state.store.len(), before);
    }
}
