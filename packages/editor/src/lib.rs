//! # Treeline Editor
//!
//! Reversible command engine for the Treeline outliner.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: NodeStore + AncestorRegistry      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: reversible commands + orchestration │
//! │  - Command objects snapshot their own undo  │
//! │  - History: bounded stack, merge window     │
//! │  - Selection: multi-select with descendant  │
//! │    propagation                              │
//! │  - Clipboard: dual-cache copy/cut/paste     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host UI: binds actions, renders, persists   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **One history entry per logical edit**: actions compose commands into
//!    batches; keystroke bursts merge inside a time window.
//! 2. **Store and registry move together**: every command patches the
//!    ancestor registry in the same `execute`/`undo` call that changes the
//!    tree, so the pair is always observed consistent.
//! 3. **Commands never fail**: a missing node at execute or undo time makes
//!    the command a no-op. Expected user-driven non-outcomes are sentinel
//!    values ([`ActionOutcome`]), not errors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use treeline_editor::Editor;
//!
//! let mut editor = Editor::new("inbox");
//! let root = editor.state.store.root_id().clone();
//! let first = editor.state.store.get(&root).unwrap().children[0].clone();
//!
//! editor.edit_content(&first, "Plan the release");
//! editor.create_sibling(&first);
//! editor.undo();
//! ```

mod clipboard;
mod command;
mod commands;
mod editor;
mod errors;
mod history;
mod selection;
mod state;

pub use clipboard::{ClipboardCache, MemoryClipboard, SystemClipboard};
pub use command::{BatchCommand, Command};
pub use commands::{
    AcceptReview, CreateNode, DeleteNode, EditContent, MarkCut, MoveNode, MultiNodeDeletion,
    PasteNodes, SetStatusBatch, SplitNode,
};
pub use editor::{ActionOutcome, Editor};
pub use errors::EditorError;
pub use history::History;
pub use selection::Selection;
pub use state::{EditorState, ViewSignals};

// Re-export document types for convenience
pub use treeline_document::{
    AncestorRegistry, Node, NodeId, NodeMetadata, NodeStatus, NodeStore,
};
