use std::any::Any;

use treeline_document::{Node, NodeId};

use crate::command::Command;
use crate::state::EditorState;

/// Insert pre-built subtrees as the last children of a target parent.
///
/// The clipboard engine regenerates every id (and remaps internal child
/// references) before this command is built, so pasting never collides with
/// live ids, including pasting the same subtree repeatedly. Undo removes
/// exactly the pasted id set.
pub struct PasteNodes {
    parent_id: NodeId,
    /// Every record of the pasted forest, subtree roots first within each
    /// subtree.
    nodes: Vec<Node>,
    root_ids: Vec<NodeId>,
    executed: bool,
}

impl PasteNodes {
    pub fn new(parent_id: NodeId, nodes: Vec<Node>, root_ids: Vec<NodeId>) -> Self {
        Self {
            parent_id,
            nodes,
            root_ids,
            executed: false,
        }
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.root_ids
    }
}

impl Command for PasteNodes {
    fn execute(&mut self, state: &mut EditorState) {
        self.executed = false;
        if !state.store.contains(&self.parent_id) {
            return;
        }

        for node in &self.nodes {
            state.store.insert(node.clone());
        }
        for root_id in &self.root_ids {
            let len = state
                .store
                .get(&self.parent_id)
                .map(|p| p.children.len())
                .unwrap_or(0);
            state.store.attach(&self.parent_id, len, root_id.clone());
            state.registry.track_subtree(root_id, &state.store);
        }
        self.executed = true;
    }

    fn undo(&mut self, state: &mut EditorState) {
        if !self.executed {
            return;
        }
        self.executed = false;

        for root_id in &self.root_ids {
            if !state.store.contains(root_id) {
                continue;
            }
            let removed = state.store.subtree_ids(root_id);
            state.selection.prune(&removed);
            state.registry.track_remove(root_id, &state.store);
            state.store.detach(root_id);
            for id in removed {
                state.store.remove(&id);
            }
        }
    }

    fn describe(&self) -> String {
        format!("Paste {} nodes", self.root_ids.len())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treeline_document::AncestorRegistry;

    #[test]
    fn test_paste_appends_as_last_children() {
        let mut state = EditorState::new("test");
        let root = state.store.root_id().clone();

        let mut parent = Node::new("p", "pasted");
        parent.children.push("c".to_string());
        let child = Node::new("c", "child");

        let mut cmd = PasteNodes::new(root.clone(), vec![parent, child], vec!["p".into()]);
        cmd.execute(&mut state);

        let children = &state.store.get(&root).unwrap().children;
        assert_eq!(children.last().map(String::as_str), Some("p"));
        assert!(state.store.contains("c"));
        assert_eq!(state.registry, AncestorRegistry::rebuild(&state.store));

        cmd.undo(&mut state);
        assert!(!state.store.contains("p"));
        assert!(!state.store.contains("c"));
        assert_eq!(state.registry, AncestorRegistry::rebuild(&state.store));
    }

    #[test]
    fn test_missing_parent_is_a_noop() {
        let mut state = EditorState::new("test");
        let before = state.store.len();

        let mut cmd = PasteNodes::new("ghost".into(), vec![Node::new("p", "x")], vec!["p".into()]);
        cmd.execute(&mut state);
        cmd.undo(&mut state);

        assert_eq!(state.store.len(), before);
    }
}
