//! The reversible structural commands.
//!
//! Each command snapshots exactly what it needs to reverse itself during
//! `execute`, and nothing more. All of them absorb missing-entity races as
//! silent no-ops.

mod create;
mod delete;
mod edit;
mod mark_cut;
mod move_node;
mod paste;
mod review;
mod split;
mod status;

pub use create::CreateNode;
pub use delete::{DeleteNode, MultiNodeDeletion};
pub use edit::EditContent;
pub use mark_cut::MarkCut;
pub use move_node::MoveNode;
pub use paste::PasteNodes;
pub use review::AcceptReview;
pub use split::SplitNode;
pub use status::SetStatusBatch;
