//! Ancestor registry: each node's root-first ancestor chain.
//!
//! The registry is a derived index over the store's children pointers. Every
//! structural command patches it in the same state transition that changes
//! the tree, so observers never see the two disagree. The contract for the
//! incremental operations is strict: after any of them, the registry must be
//! indistinguishable from a full [`AncestorRegistry::rebuild`].

use std::collections::HashMap;

use crate::node::NodeId;
use crate::store::NodeStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AncestorRegistry {
    chains: HashMap<NodeId, Vec<NodeId>>,
}

impl AncestorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full depth-first rebuild from the root. O(n); used on load and after
    /// bulk subtree swaps where incremental patching is not worth it.
    pub fn rebuild(store: &NodeStore) -> Self {
        let mut chains = HashMap::with_capacity(store.len());
        let root_id = store.root_id().clone();

        let mut stack: Vec<(NodeId, Vec<NodeId>)> = vec![(root_id, Vec::new())];
        while let Some((id, chain)) = stack.pop() {
            if let Some(node) = store.get(&id) {
                let mut child_chain = chain.clone();
                child_chain.push(id.clone());
                for child in &node.children {
                    stack.push((child.clone(), child_chain.clone()));
                }
            }
            chains.insert(id, chain);
        }

        Self { chains }
    }

    /// Ancestors of `id`, root first, excluding `id` itself.
    pub fn ancestors(&self, id: &str) -> Option<&[NodeId]> {
        self.chains.get(id).map(|chain| chain.as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.chains.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Whether `ancestor` appears in `id`'s chain.
    pub fn is_ancestor_of(&self, ancestor: &str, id: &str) -> bool {
        self.ancestors(id)
            .map(|chain| chain.iter().any(|a| a == ancestor))
            .unwrap_or(false)
    }

    /// Register a single freshly inserted leaf under `parent_id`.
    ///
    /// For subtree inserts use [`AncestorRegistry::track_subtree`] after the
    /// subtree is attached.
    pub fn track_insert(&mut self, id: &str, parent_id: &str) {
        let mut chain = self.chains.get(parent_id).cloned().unwrap_or_default();
        chain.push(parent_id.to_string());
        self.chains.insert(id.to_string(), chain);
    }

    /// Drop `id` and all of its descendants from the registry.
    ///
    /// Must be called while the subtree is still present in the store.
    pub fn track_remove(&mut self, id: &str, store: &NodeStore) {
        for descendant in store.collect_descendants(id) {
            self.chains.remove(&descendant);
        }
        self.chains.remove(id);
    }

    /// Recompute the chain of `id` and every descendant after `id` was
    /// attached to (or moved under) its current parent in the store.
    pub fn track_subtree(&mut self, id: &str, store: &NodeStore) {
        let Some((parent_id, _)) = store.parent_of(id) else {
            return;
        };
        let mut chain = self.chains.get(&parent_id).cloned().unwrap_or_default();
        chain.push(parent_id);

        let mut stack: Vec<(NodeId, Vec<NodeId>)> = vec![(id.to_string(), chain)];
        while let Some((current, chain)) = stack.pop() {
            if let Some(node) = store.get(&current) {
                let mut child_chain = chain.clone();
                child_chain.push(current.clone());
                for child in &node.children {
                    stack.push((child.clone(), child_chain.clone()));
                }
            }
            self.chains.insert(current, chain);
        }
    }

    /// Alias for the move case: same recomputation as an attach.
    pub fn track_move(&mut self, id: &str, store: &NodeStore) {
        self.track_subtree(id, store);
    }
}
