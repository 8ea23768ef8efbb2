//! # Treeline Document
//!
//! Core data model for the Treeline outliner.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: nodes + derived indexes           │
//! │  - Node records (content, children, flags)  │
//! │  - NodeStore: id → node map + root pointer  │
//! │  - AncestorRegistry: root-first ancestor    │
//! │    chains, rebuilt or patched incrementally │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: reversible commands over the store  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! This crate is pure data: nothing here decides *when* a mutation happens,
//! it only keeps the tree and its indexes consistent while one does.

mod ancestry;
mod errors;
mod id_generator;
mod node;
mod store;

pub use ancestry::AncestorRegistry;
pub use errors::StoreError;
pub use id_generator::{document_seed, IdGenerator};
pub use node::{Node, NodeId, NodeMetadata, NodeStatus};
pub use store::NodeStore;
