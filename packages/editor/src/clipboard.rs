//! # Clipboard Engine
//!
//! Dual-cache copy/cut/paste bridging the in-process node graph and the
//! system text clipboard.
//!
//! Copy and cut write two things: the system clipboard (markdown outline)
//! and a single-slot in-process cache of node ids. Paste prefers the cache:
//! full-fidelity cloning, or a deferred move for cut, but only while the
//! system clipboard still holds the exact text the cache was written with;
//! any external copy invalidates the cache and paste falls back to parsing
//! whatever text is there now.

use std::time::{SystemTime, UNIX_EPOCH};

use treeline_document::{Node, NodeId, NodeStore};
use treeline_outline::{parse_bare_url, parse_outline, serialize_outline, ParsedNode};

use crate::command::{BatchCommand, Command};
use crate::commands::{MarkCut, MoveNode, PasteNodes};
use crate::editor::{ActionOutcome, Editor};

/// Host seam to the system clipboard. Both calls are single best-effort
/// attempts; failure degrades to a no-content outcome, never an error.
pub trait SystemClipboard {
    fn write_text(&mut self, text: &str) -> bool;
    fn read_text(&mut self) -> Option<String>;
}

/// In-process clipboard for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    /// Simulate an external program replacing the clipboard contents.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

impl SystemClipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> bool {
        self.text = Some(text.to_string());
        true
    }

    fn read_text(&mut self) -> Option<String> {
        self.text.clone()
    }
}

/// The single-slot cache written by every copy/cut.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardCache {
    /// Subtree roots that were copied or cut, in display order.
    pub root_node_ids: Vec<NodeId>,
    /// For a cut: every marked id (roots plus descendants), so realizing
    /// the paste can clear all marks in one step.
    pub all_cut_node_ids: Option<Vec<NodeId>>,
    pub timestamp: u64,
    pub is_cut: bool,
    /// Exact text written to the system clipboard; compared against it on
    /// paste to detect staleness.
    pub clipboard_text: String,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Deep-clone the subtrees under `roots` with freshly generated ids,
/// remapping internal child references. Metadata is preserved in full
/// except the transient cut marker.
fn clone_subtrees(store: &mut NodeStore, roots: &[NodeId]) -> (Vec<Node>, Vec<NodeId>) {
    use std::collections::HashMap;

    let mut nodes = Vec::new();
    let mut new_roots = Vec::new();

    for root in roots {
        let old_ids = store.subtree_ids(root);
        let mut mapping: HashMap<NodeId, NodeId> = HashMap::with_capacity(old_ids.len());
        for old in &old_ids {
            mapping.insert(old.clone(), store.next_id());
        }

        for old in &old_ids {
            let Some(original) = store.get(old) else {
                continue;
            };
            let mut clone = original.clone();
            clone.id = mapping[old].clone();
            clone.children = original
                .children
                .iter()
                .map(|c| mapping[c].clone())
                .collect();
            clone.metadata.is_cut = false;
            nodes.push(clone);
        }
        new_roots.push(mapping[root].clone());
    }

    (nodes, new_roots)
}

/// Materialize parsed clipboard nodes as store records with fresh ids.
fn build_from_parsed(store: &mut NodeStore, parsed: &[ParsedNode]) -> (Vec<Node>, Vec<NodeId>) {
    let mut nodes = Vec::new();
    let mut roots = Vec::new();

    // (parsed node, assigned id) pairs; children are expanded iteratively.
    let mut stack: Vec<(&ParsedNode, NodeId)> = Vec::new();
    for parsed_root in parsed {
        let id = store.next_id();
        roots.push(id.clone());
        stack.push((parsed_root, id));
    }
    // Depth order does not matter here; ids are assigned before children
    // are visited, so parent records can name their children up front.
    while let Some((parsed_node, id)) = stack.pop() {
        let mut node = Node::new(id, parsed_node.content.clone());
        node.metadata.status = parsed_node.status;
        for child in &parsed_node.children {
            let child_id = store.next_id();
            node.children.push(child_id.clone());
            stack.push((child, child_id));
        }
        nodes.push(node);
    }

    (nodes, roots)
}

impl Editor {
    /// Copy the current selection (minimal covering set) to both clipboards.
    pub fn copy_selection(&mut self) -> ActionOutcome {
        let roots = self
            .state
            .selection
            .nodes_to_move(&self.state.store, &self.state.registry);
        self.copy_nodes(roots)
    }

    /// Copy explicit subtree roots to both clipboards.
    pub fn copy_nodes(&mut self, roots: Vec<NodeId>) -> ActionOutcome {
        if roots.is_empty() {
            return ActionOutcome::NoSelection;
        }

        let text = serialize_outline(&self.state.store, &roots);
        self.system_clipboard.write_text(&text);
        self.state.clipboard = Some(ClipboardCache {
            root_node_ids: roots,
            all_cut_node_ids: None,
            timestamp: unix_now(),
            is_cut: false,
            clipboard_text: text,
        });
        ActionOutcome::Applied
    }

    /// Cut the current selection: mark it, cache it, and defer the move
    /// until a paste target is chosen.
    pub fn cut_selection(&mut self) -> ActionOutcome {
        let roots = self
            .state
            .selection
            .nodes_to_move(&self.state.store, &self.state.registry);
        self.cut_nodes(roots)
    }

    /// Cut explicit subtree roots.
    pub fn cut_nodes(&mut self, roots: Vec<NodeId>) -> ActionOutcome {
        if roots.is_empty() {
            return ActionOutcome::NoSelection;
        }
        // All-or-nothing: a cut touching the root node fails in full.
        if roots.iter().any(|id| id == self.state.store.root_id()) {
            tracing::error!("cut selection contains the root node");
            return ActionOutcome::Blocked;
        }

        let mut all_ids = Vec::new();
        for root in &roots {
            all_ids.extend(self.state.store.subtree_ids(root));
        }

        let text = serialize_outline(&self.state.store, &roots);
        self.system_clipboard.write_text(&text);

        self.submit(Box::new(MarkCut::set(all_ids.clone())));
        self.state.clipboard = Some(ClipboardCache {
            root_node_ids: roots,
            all_cut_node_ids: Some(all_ids),
            timestamp: unix_now(),
            is_cut: true,
            clipboard_text: text,
        });
        ActionOutcome::Applied
    }

    /// Paste into `target_id`, resolving the cache first and falling back
    /// to clipboard-text parsing, then to the bare-URL special case.
    pub fn paste_into(&mut self, target_id: &str) -> ActionOutcome {
        let Some(target) = self.state.store.get(target_id) else {
            return ActionOutcome::Blocked;
        };
        // Hyperlink and external-link nodes are leaves by convention.
        if target.metadata.forbids_children() {
            return ActionOutcome::Blocked;
        }

        let system_text = self.system_clipboard.read_text();

        if let Some(cache) = self.state.clipboard.clone() {
            // Staleness check: an external copy since our write means the
            // cache no longer describes what the user intends to paste.
            let cache_fresh = match &system_text {
                Some(text) => *text == cache.clipboard_text,
                None => true, // unreadable clipboard: trust the cache
            };
            if cache_fresh {
                let all_live = cache
                    .root_node_ids
                    .iter()
                    .all(|id| self.state.store.contains(id));
                if all_live {
                    return if cache.is_cut {
                        self.realize_cut(&cache, target_id)
                    } else {
                        self.paste_clones(&cache, target_id)
                    };
                }
                // Referenced nodes are gone; fall through to text parsing.
            }
        }

        let Some(text) = system_text else {
            return ActionOutcome::NoContent;
        };
        match parse_outline(&text) {
            Ok(parsed) if !parsed.is_empty() => self.paste_parsed(&parsed, target_id),
            _ => match parse_bare_url(&text) {
                Some(url) => self.paste_external_link(url, target_id),
                None => ActionOutcome::NoContent,
            },
        }
    }

    /// A cached cut plus a chosen target is a logical move.
    fn realize_cut(&mut self, cache: &ClipboardCache, target_id: &str) -> ActionOutcome {
        let same_parent = cache.root_node_ids.iter().all(|id| {
            self.state
                .store
                .parent_of(id)
                .map(|(parent, _)| parent == target_id)
                .unwrap_or(false)
        });
        if same_parent {
            return ActionOutcome::Cancelled;
        }
        // The target must not sit inside a cut subtree.
        if cache.root_node_ids.iter().any(|id| {
            id == target_id || self.state.registry.is_ancestor_of(id, target_id)
        }) {
            return ActionOutcome::Blocked;
        }

        let mut commands: Vec<Box<dyn Command>> = Vec::new();
        for root in &cache.root_node_ids {
            commands.push(Box::new(MoveNode::new(
                root.clone(),
                target_id.to_string(),
                usize::MAX,
            )));
        }
        let marked = cache
            .all_cut_node_ids
            .clone()
            .unwrap_or_else(|| cache.root_node_ids.clone());
        commands.push(Box::new(MarkCut::clear(marked)));

        self.submit(Box::new(BatchCommand::new(commands, "Paste (move)")));
        self.state.clipboard = None;
        self.state.signals.scroll_to_node_id = cache.root_node_ids.first().cloned();
        ActionOutcome::Applied
    }

    fn paste_clones(&mut self, cache: &ClipboardCache, target_id: &str) -> ActionOutcome {
        let (mut nodes, roots) = clone_subtrees(&mut self.state.store, &cache.root_node_ids);
        let stripped = self.strip_blueprint_if_blocked(&mut nodes, target_id);
        self.insert_pasted(nodes, roots, target_id, stripped)
    }

    fn paste_parsed(&mut self, parsed: &[ParsedNode], target_id: &str) -> ActionOutcome {
        let (nodes, roots) = build_from_parsed(&mut self.state.store, parsed);
        self.insert_pasted(nodes, roots, target_id, false)
    }

    fn paste_external_link(&mut self, url: &str, target_id: &str) -> ActionOutcome {
        let id = self.state.store.next_id();
        let mut node = Node::new(id.clone(), url);
        node.metadata.external_url = Some(url.to_string());
        self.insert_pasted(vec![node], vec![id], target_id, false)
    }

    fn insert_pasted(
        &mut self,
        nodes: Vec<Node>,
        roots: Vec<NodeId>,
        target_id: &str,
        stripped: bool,
    ) -> ActionOutcome {
        self.state.signals.scroll_to_node_id = roots.first().cloned();
        self.submit(Box::new(PasteNodes::new(
            target_id.to_string(),
            nodes,
            roots,
        )));
        if stripped {
            ActionOutcome::BlueprintStripped
        } else {
            ActionOutcome::Applied
        }
    }

    /// Blueprint content may only land under a blueprint-governed parent or
    /// directly under the root. Elsewhere the content itself still pastes,
    /// minus its blueprint flags; the caller surfaces the notice.
    fn strip_blueprint_if_blocked(&self, nodes: &mut [Node], target_id: &str) -> bool {
        let allowed = self
            .state
            .store
            .get(target_id)
            .map(|t| {
                t.metadata.is_root || t.metadata.is_blueprint || t.metadata.is_context_governed()
            })
            .unwrap_or(false);
        if allowed || !nodes.iter().any(|n| n.metadata.is_blueprint) {
            return false;
        }

        tracing::warn!(target = %target_id, "stripping blueprint flags from pasted content");
        for node in nodes.iter_mut() {
            node.metadata.is_blueprint = false;
        }
        true
    }
}
