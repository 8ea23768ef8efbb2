//! Error types for the editor.
//!
//! Most of the engine does not error at all: commands absorb missing-entity
//! races as no-ops and actions answer with [`crate::ActionOutcome`]
//! sentinels. Real errors only exist at the host boundary, when adopting a
//! persisted document or parsing clipboard text.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] treeline_document::StoreError),

    #[error("Outline parse error: {0}")]
    Outline(#[from] treeline_outline::OutlineError),
}
