//! Error types for document loading.

use thiserror::Error;

/// Structural problems found while adopting an externally supplied node map.
///
/// Mutations inside a live document never produce these: commands treat
/// missing entities as no-ops. They only surface when a host hands the store
/// a persisted document to validate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Root node not found: {0}")]
    MissingRoot(String),

    #[error("Node {parent} references missing child {child}")]
    DanglingChild { parent: String, child: String },

    #[error("Node {child} has more than one parent")]
    MultipleParents { child: String },

    #[error("Node {0} is unreachable from the root")]
    Unreachable(String),
}
