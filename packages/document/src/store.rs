//! The node store: id → node map plus the root pointer.
//!
//! The store exclusively owns all node records. Nothing outside the command
//! layer mutates them directly; the store only offers the primitive moves
//! (insert, remove, attach, detach) commands are built from.

use std::collections::{HashMap, HashSet};

use crate::errors::StoreError;
use crate::id_generator::IdGenerator;
use crate::node::{Node, NodeId};

#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: HashMap<NodeId, Node>,
    root_id: NodeId,
    ids: IdGenerator,
}

impl NodeStore {
    /// Create a fresh document: a root node with a single empty child.
    ///
    /// A document is never an empty outline; the root always has at least
    /// one child for the user to type into.
    pub fn new(document_key: &str) -> Self {
        let mut ids = IdGenerator::new(document_key);

        let root_id = ids.new_id();
        let first_id = ids.new_id();

        let mut root = Node::new(root_id.clone(), "");
        root.metadata.is_root = true;
        root.children.push(first_id.clone());

        let first = Node::new(first_id.clone(), "");

        let mut nodes = HashMap::new();
        nodes.insert(root_id.clone(), root);
        nodes.insert(first_id, first);

        Self {
            nodes,
            root_id,
            ids,
        }
    }

    /// Adopt an externally persisted node map, validating tree shape.
    pub fn from_parts(
        nodes: HashMap<NodeId, Node>,
        root_id: NodeId,
        document_key: &str,
    ) -> Result<Self, StoreError> {
        if !nodes.contains_key(&root_id) {
            return Err(StoreError::MissingRoot(root_id));
        }

        let mut seen: HashSet<&NodeId> = HashSet::new();
        for node in nodes.values() {
            for child in &node.children {
                if !nodes.contains_key(child) {
                    return Err(StoreError::DanglingChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
                if !seen.insert(child) {
                    return Err(StoreError::MultipleParents {
                        child: child.clone(),
                    });
                }
            }
        }

        // Everything must hang off the root.
        let mut reachable: HashSet<&NodeId> = HashSet::new();
        let mut stack = vec![&root_id];
        while let Some(id) = stack.pop() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(node) = nodes.get(id) {
                stack.extend(node.children.iter());
            }
        }
        if let Some(stray) = nodes.keys().find(|id| !reachable.contains(id)) {
            return Err(StoreError::Unreachable(stray.clone()));
        }

        let mut ids = IdGenerator::new(document_key);
        ids.resume_past(nodes.keys().map(String::as_str));
        let mut store = Self {
            nodes,
            root_id: root_id.clone(),
            ids,
        };

        let needs_child = store
            .nodes
            .get(&root_id)
            .map(|root| root.children.is_empty())
            .unwrap_or(false);
        if let Some(root) = store.nodes.get_mut(&root_id) {
            root.metadata.is_root = true;
        }
        if needs_child {
            let first_id = store.ids.new_id();
            store
                .nodes
                .insert(first_id.clone(), Node::new(first_id.clone(), ""));
            if let Some(root) = store.nodes.get_mut(&root_id) {
                root.children.push(first_id);
            }
        }

        Ok(store)
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &HashMap<NodeId, Node> {
        &self.nodes
    }

    pub fn insert(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Remove a record from the map. Does not touch any parent's child list;
    /// use [`NodeStore::detach`] first for structural removal.
    pub fn remove(&mut self, id: &str) -> Option<Node> {
        self.nodes.remove(id)
    }

    /// Fresh id, unique for the lifetime of this store.
    pub fn next_id(&mut self) -> NodeId {
        self.ids.new_id()
    }

    /// Find the parent of a node and its position in the parent's children.
    pub fn parent_of(&self, id: &str) -> Option<(NodeId, usize)> {
        self.nodes.values().find_map(|node| {
            node.children
                .iter()
                .position(|child| child == id)
                .map(|pos| (node.id.clone(), pos))
        })
    }

    /// Remove `id` from its parent's child list, returning where it was.
    pub fn detach(&mut self, id: &str) -> Option<(NodeId, usize)> {
        let (parent_id, pos) = self.parent_of(id)?;
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children.remove(pos);
        }
        Some((parent_id, pos))
    }

    /// Insert `id` into `parent_id`'s children at `index` (clamped).
    pub fn attach(&mut self, parent_id: &str, index: usize, id: NodeId) {
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, id);
        }
    }

    /// All descendant ids of `id` in depth-first, children-in-order order.
    ///
    /// Explicit stack: tree depth is user-controlled, so no recursion.
    pub fn collect_descendants(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(id) {
            Some(node) => node.children.iter().rev().cloned().collect(),
            None => return out,
        };

        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
            }
            out.push(current);
        }
        out
    }

    /// `id` followed by all of its descendants, depth-first.
    pub fn subtree_ids(&self, id: &str) -> Vec<NodeId> {
        let mut out = vec![id.to_string()];
        out.extend(self.collect_descendants(id));
        out
    }

    /// Nodes in display order, excluding the root, descending only into
    /// expanded nodes. This is the sequence the view renders.
    pub fn visible_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(&self.root_id) {
            Some(root) => root.children.iter().rev().cloned().collect(),
            None => return out,
        };

        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                if node.metadata.expanded {
                    stack.extend(node.children.iter().rev().cloned());
                }
            }
            out.push(current);
        }
        out
    }

    /// The visible node immediately before `id`, if any. Used to pick a
    /// sensible focus target before a deletion.
    pub fn previous_visible(&self, id: &str) -> Option<NodeId> {
        let order = self.visible_order();
        let pos = order.iter().position(|n| n == id)?;
        if pos == 0 {
            None
        } else {
            Some(order[pos - 1].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> NodeStore {
        // root ── a ── a1
        //      └─ b
        let mut store = NodeStore::new("test");
        let root_id = store.root_id().clone();

        let a = store.next_id();
        let a1 = store.next_id();
        let b = store.next_id();

        store.insert(Node::new(a.clone(), "a"));
        store.insert(Node::new(a1.clone(), "a1"));
        store.insert(Node::new(b.clone(), "b"));

        store.get_mut(&a).unwrap().children.push(a1);
        let root = store.get_mut(&root_id).unwrap();
        root.children.push(a);
        root.children.push(b);
        store
    }

    #[test]
    fn test_new_store_has_root_with_one_child() {
        let store = NodeStore::new("test");
        let root = store.get(store.root_id()).unwrap();
        assert!(root.metadata.is_root);
        assert_eq!(root.children.len(), 1);
        assert!(store.contains(&root.children[0]));
    }

    #[test]
    fn test_parent_of_and_detach() {
        let mut store = sample_store();
        let root_id = store.root_id().clone();
        let a = store.get(&root_id).unwrap().children[1].clone();

        let (parent, pos) = store.parent_of(&a).unwrap();
        assert_eq!(parent, root_id);
        assert_eq!(pos, 1);

        let detached = store.detach(&a).unwrap();
        assert_eq!(detached, (root_id.clone(), 1));
        assert!(!store.get(&root_id).unwrap().children.contains(&a));
        // Record still exists; detach is structural only.
        assert!(store.contains(&a));
    }

    #[test]
    fn test_collect_descendants_is_depth_first() {
        let store = sample_store();
        let root_id = store.root_id().clone();
        let descendants = store.collect_descendants(&root_id);

        let contents: Vec<&str> = descendants
            .iter()
            .map(|id| store.get(id).unwrap().content.as_str())
            .collect();
        assert_eq!(contents, vec!["", "a", "a1", "b"]);
    }

    #[test]
    fn test_visible_order_skips_collapsed_subtrees() {
        let mut store = sample_store();
        let root_id = store.root_id().clone();
        let a = store.get(&root_id).unwrap().children[1].clone();

        let before = store.visible_order().len();
        store.get_mut(&a).unwrap().metadata.expanded = false;
        let after = store.visible_order();

        assert_eq!(after.len(), before - 1);
        assert!(after.contains(&a));
    }

    #[test]
    fn test_previous_visible() {
        let store = sample_store();
        let root_id = store.root_id().clone();
        let children = store.get(&root_id).unwrap().children.clone();
        let first = &children[0];
        let a = &children[1];
        let b = &children[2];

        assert_eq!(store.previous_visible(first), None);
        assert_eq!(store.previous_visible(a).as_ref(), Some(first));
        // b's previous visible node is a's last descendant.
        let a1 = &store.get(a).unwrap().children[0];
        assert_eq!(store.previous_visible(b).as_ref(), Some(a1));
    }

    #[test]
    fn test_from_parts_rejects_dangling_children() {
        let mut nodes = HashMap::new();
        let mut root = Node::new("r", "");
        root.children.push("ghost".to_string());
        nodes.insert("r".to_string(), root);

        let err = NodeStore::from_parts(nodes, "r".to_string(), "test").unwrap_err();
        assert!(matches!(err, StoreError::DanglingChild { .. }));
    }

    #[test]
    fn test_from_parts_rejects_multiple_parents() {
        let mut nodes = HashMap::new();
        let mut root = Node::new("r", "");
        root.children.push("a".to_string());
        root.children.push("b".to_string());
        let mut a = Node::new("a", "a");
        a.children.push("b".to_string());
        nodes.insert("r".to_string(), root);
        nodes.insert("a".to_string(), a);
        nodes.insert("b".to_string(), Node::new("b", "b"));

        let err = NodeStore::from_parts(nodes, "r".to_string(), "test").unwrap_err();
        assert!(matches!(err, StoreError::MultipleParents { .. }));
    }

    #[test]
    fn test_from_parts_gives_childless_root_a_child() {
        let mut nodes = HashMap::new();
        nodes.insert("r".to_string(), Node::new("r", ""));

        let store = NodeStore::from_parts(nodes, "r".to_string(), "test").unwrap();
        assert_eq!(store.get("r").unwrap().children.len(), 1);
    }
}
