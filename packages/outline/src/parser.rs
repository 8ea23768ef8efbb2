//! Markdown outline text → parsed node tree.

use serde::{Deserialize, Serialize};
use treeline_document::NodeStatus;

use crate::error::{OutlineError, OutlineResult};

/// A node parsed from clipboard text. Carries no id; the paste path assigns
/// fresh ids when the tree is inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedNode {
    pub content: String,
    pub status: NodeStatus,
    pub children: Vec<ParsedNode>,
}

impl ParsedNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: NodeStatus::Pending,
            children: Vec::new(),
        }
    }
}

/// Parse outline text into a forest of [`ParsedNode`]s.
///
/// Permissive on structure: a heading jumping more than one level deeper
/// than its predecessor is clamped to one level, and lines without a heading
/// prefix continue the previous node's content. Text with no headings at all
/// parses to an empty forest. A bracketed status with an unknown glyph is
/// the one hard error.
pub fn parse_outline(text: &str) -> OutlineResult<Vec<ParsedNode>> {
    let mut roots: Vec<ParsedNode> = Vec::new();
    // Path of child indices from `roots` down to the last parsed node.
    let mut path: Vec<usize> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let hashes = line.chars().take_while(|c| *c == '#').count();

        if hashes == 0 {
            // Continuation of the previous node, if there is one. A leading
            // backslash escapes a literal `#` (or `\`) at line start.
            if let Some(node) = node_at_path_mut(&mut roots, &path) {
                node.content.push('\n');
                node.content
                    .push_str(line.strip_prefix('\\').unwrap_or(line));
            }
            continue;
        }

        let rest = line[hashes..].strip_prefix(' ').unwrap_or(&line[hashes..]);
        let (status, content) = split_status(rest, line_no + 1)?;

        let depth = (hashes - 1).min(path.len());
        let node = ParsedNode {
            content: content.to_string(),
            status,
            children: Vec::new(),
        };

        if depth == 0 {
            roots.push(node);
            path = vec![roots.len() - 1];
        } else {
            path.truncate(depth);
            let parent = node_at_path_mut(&mut roots, &path)
                .expect("path always points at a live node");
            parent.children.push(node);
            let index = parent.children.len() - 1;
            path.push(index);
        }
    }

    Ok(roots)
}

fn split_status(rest: &str, line: usize) -> OutlineResult<(NodeStatus, &str)> {
    let mut chars = rest.chars();
    if chars.next() == Some('[') {
        if let (Some(glyph), Some(']')) = (chars.next(), chars.next()) {
            let status = NodeStatus::from_glyph(glyph)
                .ok_or(OutlineError::UnknownStatusGlyph { line, glyph })?;
            let content = chars.as_str().strip_prefix(' ').unwrap_or(chars.as_str());
            return Ok((status, content));
        }
    }
    // No status bracket; the whole remainder is content.
    Ok((NodeStatus::Pending, rest))
}

fn node_at_path_mut<'a>(
    roots: &'a mut Vec<ParsedNode>,
    path: &[usize],
) -> Option<&'a mut ParsedNode> {
    let (&first, rest) = path.split_first()?;
    let mut node = roots.get_mut(first)?;
    for &index in rest {
        node = node.children.get_mut(index)?;
    }
    Some(node)
}

/// If the trimmed text is a single http(s) URL, return it.
///
/// Used by the paste fallback: copying a URL from a browser address bar
/// should become an external-link node, not a plain text node.
pub fn parse_bare_url(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let scheme_ok = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !scheme_ok || trimmed.contains(char::is_whitespace) {
        return None;
    }
    let after_scheme = trimmed.split_once("://").map(|(_, rest)| rest)?;
    if after_scheme.is_empty() {
        return None;
    }
    Some(trimmed)
}
