//! # Treeline Outline
//!
//! The markdown outline clipboard format.
//!
//! Each node is one line: heading depth encodes tree depth, a leading status
//! glyph encodes node status, and multi-line content continues on unprefixed
//! lines:
//!
//! ```text
//! # [ ] Plan the release
//! ## [x] Write the changelog
//! ## [-] Ship the installer
//! second line of the installer note
//! # [ ] Follow-ups
//! ```
//!
//! The format round-trips: serializing a subtree and parsing the result
//! reconstructs an equivalent tree (ids differ, content/status/structure
//! do not).

mod error;
mod parser;
mod serializer;

pub use error::{OutlineError, OutlineResult};
pub use parser::{parse_bare_url, parse_outline, ParsedNode};
pub use serializer::serialize_outline;
