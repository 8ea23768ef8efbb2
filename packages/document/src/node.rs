//! Node records and their metadata flags.

use serde::{Deserialize, Serialize};

/// Identifier of a node within one document.
pub type NodeId = String;

/// Resolution state of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Pending,
    Completed,
    Abandoned,
}

impl NodeStatus {
    /// Single-character glyph used by the clipboard outline format.
    pub fn glyph(self) -> char {
        match self {
            NodeStatus::Pending => ' ',
            NodeStatus::Completed => 'x',
            NodeStatus::Abandoned => '-',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            ' ' => Some(NodeStatus::Pending),
            'x' => Some(NodeStatus::Completed),
            '-' => Some(NodeStatus::Abandoned),
            _ => None,
        }
    }
}

/// Structured metadata carried by every node.
///
/// The set of flags is closed: hosts that need to attach their own data keep
/// it outside the document (keyed by node id) rather than inside the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    #[serde(default)]
    pub status: NodeStatus,

    /// Unix seconds at which the node left `Pending`. Cleared when it
    /// returns to `Pending`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<u64>,

    #[serde(default)]
    pub is_root: bool,

    /// Part of a reusable template subtree.
    #[serde(default)]
    pub is_blueprint: bool,

    /// Declares a reusable "context" subtree.
    #[serde(default)]
    pub is_context_declaration: bool,

    /// Belongs to a context subtree.
    #[serde(default)]
    pub is_context_child: bool,

    /// Hyperlink nodes reference another node's content by id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_node_id: Option<NodeId>,

    /// External-link nodes reference a URL outside the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    #[serde(default = "default_expanded")]
    pub expanded: bool,

    /// Transient cut marker; never persisted. Cut is a deferred move, the
    /// node stays in the tree until a paste target realizes it.
    #[serde(skip)]
    pub is_cut: bool,
}

fn default_expanded() -> bool {
    true
}

impl Default for NodeMetadata {
    fn default() -> Self {
        Self {
            status: NodeStatus::Pending,
            resolved_at: None,
            is_root: false,
            is_blueprint: false,
            is_context_declaration: false,
            is_context_child: false,
            linked_node_id: None,
            external_url: None,
            expanded: true,
            is_cut: false,
        }
    }
}

impl NodeMetadata {
    pub fn is_hyperlink(&self) -> bool {
        self.linked_node_id.is_some()
    }

    pub fn is_external_link(&self) -> bool {
        self.external_url.is_some()
    }

    /// Context declarations and context children govern blueprint
    /// propagation for nodes moved or split beneath them.
    pub fn is_context_governed(&self) -> bool {
        self.is_context_declaration || self.is_context_child
    }

    /// Hyperlink and external-link nodes are leaves by convention.
    pub fn forbids_children(&self) -> bool {
        self.is_hyperlink() || self.is_external_link()
    }
}

/// A single content unit in the outline tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub content: String,

    /// Child ids in display order. Unique within the document; every child
    /// has exactly one parent.
    #[serde(default)]
    pub children: Vec<NodeId>,

    #[serde(default)]
    pub metadata: NodeMetadata,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            children: Vec::new(),
            metadata: NodeMetadata::default(),
        }
    }
}
