//! Multi-select set with descendant propagation and range selection.
//!
//! Selection is a materialization of "which subtree roots are chosen":
//! selecting a node always selects its whole current subtree, and a node
//! under a selected ancestor cannot be independently deselected. The engine
//! is independent of the command/undo layer; selection changes are never
//! history entries.

use std::collections::HashSet;

use treeline_document::{AncestorRegistry, NodeId, NodeStore};

#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<NodeId>,
    /// Range-extension anchor. Kept on deselect so repeated toggling has a
    /// stable reference point.
    anchor: Option<NodeId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn anchor(&self) -> Option<&NodeId> {
        self.anchor.as_ref()
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.selected.iter()
    }

    /// Toggle `id` in or out of the selection.
    ///
    /// Selecting adds the node and all current descendants and makes it the
    /// new anchor. Deselecting is refused while an ancestor is selected;
    /// otherwise the node and its descendants leave the set and the anchor
    /// stays put.
    ///
    /// With a visible filter active, hidden ids are ignored entirely.
    pub fn toggle(
        &mut self,
        id: &str,
        store: &NodeStore,
        registry: &AncestorRegistry,
        visible: Option<&HashSet<NodeId>>,
    ) {
        if let Some(filter) = visible {
            if !filter.contains(id) {
                return;
            }
        }
        if !store.contains(id) {
            return;
        }

        if self.selected.contains(id) {
            if self.has_selected_ancestor(id, registry) {
                return;
            }
            for sub in store.subtree_ids(id) {
                self.selected.remove(&sub);
            }
        } else {
            self.insert_subtree(id, store, visible);
            self.anchor = Some(id.to_string());
        }
    }

    /// Shift-click semantics: select the closed interval between the anchor
    /// and `id` over the visible sequence, each endpoint with its
    /// descendants, replacing the whole selection. Without a usable anchor
    /// this degrades to a plain toggle.
    pub fn select_range(
        &mut self,
        id: &str,
        store: &NodeStore,
        registry: &AncestorRegistry,
        sequence: &[NodeId],
        visible: Option<&HashSet<NodeId>>,
    ) {
        let anchor = match self.anchor.clone().filter(|a| store.contains(a)) {
            Some(anchor) => anchor,
            None => {
                self.toggle(id, store, registry, visible);
                return;
            }
        };

        let Some(from) = sequence.iter().position(|n| n == &anchor) else {
            self.toggle(id, store, registry, visible);
            return;
        };
        let Some(to) = sequence.iter().position(|n| n == id) else {
            return;
        };

        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };

        // Replaces, not unions: a prior independent selection is dropped,
        // matching conventional file-explorer shift-click.
        self.selected.clear();
        for node in &sequence[lo..=hi] {
            self.insert_subtree(node, store, visible);
        }
    }

    /// The minimal covering set: selected nodes without a selected ancestor,
    /// in display order. Moving these carries every other selected node
    /// along, so nothing is moved twice.
    pub fn nodes_to_move(
        &self,
        store: &NodeStore,
        registry: &AncestorRegistry,
    ) -> Vec<NodeId> {
        let mut covering: Vec<NodeId> = Vec::new();
        let mut stack: Vec<NodeId> = match store.get(store.root_id()) {
            Some(root) => root.children.iter().rev().cloned().collect(),
            None => return covering,
        };

        // Display-order walk; collapsed nodes still count, selection is
        // about structure, not visibility.
        while let Some(id) = stack.pop() {
            if self.selected.contains(&id) && !self.has_selected_ancestor(&id, registry) {
                covering.push(id.clone());
            }
            if let Some(node) = store.get(&id) {
                stack.extend(node.children.iter().rev().cloned());
            }
        }
        covering
    }

    /// Drop deleted ids from the selection. Called by deletion commands.
    pub fn prune(&mut self, removed: &[NodeId]) {
        for id in removed {
            self.selected.remove(id);
        }
        if let Some(anchor) = &self.anchor {
            if removed.contains(anchor) {
                self.anchor = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    fn insert_subtree(
        &mut self,
        id: &str,
        store: &NodeStore,
        visible: Option<&HashSet<NodeId>>,
    ) {
        for sub in store.subtree_ids(id) {
            if let Some(filter) = visible {
                if !filter.contains(&sub) {
                    continue;
                }
            }
            self.selected.insert(sub);
        }
    }

    fn has_selected_ancestor(&self, id: &str, registry: &AncestorRegistry) -> bool {
        registry
            .ancestors(id)
            .map(|chain| chain.iter().any(|a| self.selected.contains(a)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treeline_document::Node;

    /// root ── a ── a1 ── a1x
    ///      └─ b ── b1
    ///      └─ c
    fn fixture() -> (NodeStore, AncestorRegistry) {
        let mut store = NodeStore::new("sel");
        let root_id = store.root_id().clone();
        for (id, parent) in [
            ("a", None),
            ("a1", Some("a")),
            ("a1x", Some("a1")),
            ("b", None),
            ("b1", Some("b")),
            ("c", None),
        ] {
            store.insert(Node::new(id, id));
            let parent_id = parent.map(str::to_string).unwrap_or(root_id.clone());
            let len = store.get(&parent_id).unwrap().children.len();
            store.attach(&parent_id, len, id.to_string());
        }
        let registry = AncestorRegistry::rebuild(&store);
        (store, registry)
    }

    #[test]
    fn test_select_includes_descendants_and_sets_anchor() {
        let (store, registry) = fixture();
        let mut sel = Selection::default();

        sel.toggle("a", &store, &registry, None);

        assert!(sel.contains("a"));
        assert!(sel.contains("a1"));
        assert!(sel.contains("a1x"));
        assert!(!sel.contains("b"));
        assert_eq!(sel.anchor().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_deselect_refused_under_selected_ancestor() {
        let (store, registry) = fixture();
        let mut sel = Selection::default();

        sel.toggle("a", &store, &registry, None);
        let before = sel.len();

        // a1 sits under selected a; the toggle must leave everything as-is.
        sel.toggle("a1", &store, &registry, None);
        assert_eq!(sel.len(), before);
        assert!(sel.contains("a1"));
    }

    #[test]
    fn test_deselect_removes_subtree_but_keeps_anchor() {
        let (store, registry) = fixture();
        let mut sel = Selection::default();

        sel.toggle("a", &store, &registry, None);
        sel.toggle("a", &store, &registry, None);

        assert!(sel.is_empty());
        assert_eq!(sel.anchor().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_range_select_replaces_prior_selection() {
        let (store, registry) = fixture();
        let mut sel = Selection::default();
        let sequence = store.visible_order();

        // Prior independent selection on c is lost by the range.
        sel.toggle("c", &store, &registry, None);
        sel.toggle("a", &store, &registry, None);
        sel.select_range("b", &store, &registry, &sequence, None);

        assert!(sel.contains("a"));
        assert!(sel.contains("a1x"));
        assert!(sel.contains("b"));
        assert!(sel.contains("b1"));
        assert!(!sel.contains("c"));
    }

    #[test]
    fn test_range_select_direction_independent() {
        let (store, registry) = fixture();
        let sequence = store.visible_order();

        let mut down = Selection::default();
        down.toggle("a", &store, &registry, None);
        down.select_range("b", &store, &registry, &sequence, None);

        let mut up = Selection::default();
        up.toggle("b", &store, &registry, None);
        up.select_range("a", &store, &registry, &sequence, None);

        let downs: HashSet<&NodeId> = down.ids().collect();
        let ups: HashSet<&NodeId> = up.ids().collect();
        assert_eq!(downs, ups);
    }

    #[test]
    fn test_nodes_to_move_is_minimal_cover() {
        let (store, registry) = fixture();
        let mut sel = Selection::default();

        sel.toggle("a", &store, &registry, None);
        sel.toggle("b", &store, &registry, None);

        // a1/a1x/b1 are selected but covered by their parents.
        assert_eq!(sel.nodes_to_move(&store, &registry), vec!["a", "b"]);
    }

    #[test]
    fn test_visible_filter_blocks_hidden_ids() {
        let (store, registry) = fixture();
        let mut sel = Selection::default();

        let filter: HashSet<NodeId> = ["a", "a1"].iter().map(|s| s.to_string()).collect();

        sel.toggle("b", &store, &registry, Some(&filter));
        assert!(sel.is_empty());

        sel.toggle("a", &store, &registry, Some(&filter));
        assert!(sel.contains("a"));
        assert!(sel.contains("a1"));
        // a1x is hidden by the filter, so it is not silently selected.
        assert!(!sel.contains("a1x"));
    }

    #[test]
    fn test_prune_drops_removed_ids_and_dead_anchor() {
        let (store, registry) = fixture();
        let mut sel = Selection::default();

        sel.toggle("a", &store, &registry, None);
        sel.prune(&["a".to_string(), "a1".to_string(), "a1x".to_string()]);

        assert!(sel.is_empty());
        assert_eq!(sel.anchor(), None);
    }
}
