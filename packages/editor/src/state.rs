//! The editor's state container.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use treeline_document::{AncestorRegistry, NodeId, NodeStore};

use crate::clipboard::ClipboardCache;
use crate::errors::EditorError;
use crate::selection::Selection;

/// All mutable engine state, passed explicitly to commands and actions.
///
/// There are no singletons: a host owning two documents owns two of these.
/// Commands receive `&mut EditorState` and keep `store` and `registry`
/// consistent within each call.
#[derive(Debug)]
pub struct EditorState {
    pub store: NodeStore,
    pub registry: AncestorRegistry,
    pub selection: Selection,

    /// Single-slot clipboard cache, replaced on every copy/cut.
    pub clipboard: Option<ClipboardCache>,

    /// When set, selection operations only touch ids in this set (e.g. a
    /// filtered "summary" view). Hidden nodes are never silently selected.
    pub visible_filter: Option<HashSet<NodeId>>,

    /// Advisory signals for the presentation layer; never read back.
    pub signals: ViewSignals,
}

impl EditorState {
    pub fn new(document_key: &str) -> Self {
        let store = NodeStore::new(document_key);
        let registry = AncestorRegistry::rebuild(&store);
        Self {
            store,
            registry,
            selection: Selection::default(),
            clipboard: None,
            visible_filter: None,
            signals: ViewSignals::default(),
        }
    }

    /// Adopt a persisted node map; the registry is built fresh.
    pub fn from_store(store: NodeStore) -> Self {
        let registry = AncestorRegistry::rebuild(&store);
        Self {
            store,
            registry,
            selection: Selection::default(),
            clipboard: None,
            visible_filter: None,
            signals: ViewSignals::default(),
        }
    }

    pub fn from_parts(
        nodes: std::collections::HashMap<NodeId, treeline_document::Node>,
        root_id: NodeId,
        document_key: &str,
    ) -> Result<Self, EditorError> {
        Ok(Self::from_store(NodeStore::from_parts(
            nodes,
            root_id,
            document_key,
        )?))
    }

    /// The node sequence selection ranges operate over: display order,
    /// collapsed subtrees skipped, then narrowed by the visible filter.
    pub fn visible_sequence(&self) -> Vec<NodeId> {
        let order = self.store.visible_order();
        match &self.visible_filter {
            Some(filter) => order.into_iter().filter(|id| filter.contains(id)).collect(),
            None => order,
        }
    }
}

/// Ephemeral hints for the view: what to flash, where to scroll, what is
/// fading out after a review swap. Purely advisory; serializable so hosts
/// can mirror them across a UI boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSignals {
    pub flashing_node: Option<NodeId>,
    pub scroll_to_node_id: Option<NodeId>,
    pub review_fading_node_ids: Vec<NodeId>,
}
