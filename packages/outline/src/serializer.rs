//! Node tree → markdown outline text.

use treeline_document::{NodeId, NodeStore};

/// Serialize the subtrees rooted at `roots` to outline text.
///
/// Depth is relative to each root: a pasted fragment always starts at `#`.
/// Ids that no longer resolve are omitted entirely. Continuation lines that
/// would read as a heading (or as an escape) get a `\` prefix so the parser
/// keeps them attached to their node.
pub fn serialize_outline(store: &NodeStore, roots: &[NodeId]) -> String {
    let mut out = String::new();

    let mut stack: Vec<(NodeId, usize)> =
        roots.iter().rev().map(|id| (id.clone(), 0)).collect();

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = store.get(&id) else {
            continue;
        };

        // split, not lines(): a trailing newline in content must survive as
        // an empty continuation line.
        let mut lines = node.content.split('\n');
        let first = lines.next().unwrap_or("");

        for _ in 0..=depth {
            out.push('#');
        }
        out.push_str(" [");
        out.push(node.metadata.status.glyph());
        out.push_str("] ");
        out.push_str(first);
        out.push('\n');

        // Continuation lines carry no heading prefix.
        for line in lines {
            if line.starts_with('#') || line.starts_with('\\') {
                out.push('\\');
            }
            out.push_str(line);
            out.push('\n');
        }

        for child in node.children.iter().rev() {
            stack.push((child.clone(), depth + 1));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use treeline_document::{Node, NodeStatus};

    fn store_with(nodes: Vec<Node>, top: &[&str]) -> NodeStore {
        let mut store = NodeStore::new("test");
        let root_id = store.root_id().clone();
        for node in nodes {
            store.insert(node);
        }
        for id in top {
            let len = store.get(&root_id).unwrap().children.len();
            store.attach(&root_id, len, (*id).to_string());
        }
        store
    }

    #[test]
    fn test_serializes_depth_and_status() {
        let mut a = Node::new("a", "Plan");
        a.children.push("a1".to_string());
        let mut a1 = Node::new("a1", "Changelog");
        a1.metadata.status = NodeStatus::Completed;
        let mut b = Node::new("b", "Later");
        b.metadata.status = NodeStatus::Abandoned;

        let store = store_with(vec![a, a1, b], &["a", "b"]);
        let text = serialize_outline(&store, &["a".to_string(), "b".to_string()]);

        assert_eq!(text, "# [ ] Plan\n## [x] Changelog\n# [-] Later\n");
    }

    #[test]
    fn test_multiline_content_continues_unprefixed() {
        let node = Node::new("a", "first\nsecond\nthird");
        let store = store_with(vec![node], &["a"]);

        let text = serialize_outline(&store, &["a".to_string()]);
        assert_eq!(text, "# [ ] first\nsecond\nthird\n");
    }

    #[test]
    fn test_hash_leading_continuation_line_round_trips() {
        let node = Node::new("a", "notes\n# not a heading\n## also content");
        let store = store_with(vec![node], &["a"]);

        let text = serialize_outline(&store, &["a".to_string()]);
        let parsed = crate::parse_outline(&text).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].content, "notes\n# not a heading\n## also content");
        assert!(parsed[0].children.is_empty());
    }

    #[test]
    fn test_backslash_leading_continuation_line_round_trips() {
        let node = Node::new("a", "first\n\\# already escaped");
        let store = store_with(vec![node], &["a"]);

        let text = serialize_outline(&store, &["a".to_string()]);
        let parsed = crate::parse_outline(&text).unwrap();

        assert_eq!(parsed[0].content, "first\n\\# already escaped");
    }

    #[test]
    fn test_trailing_newline_in_content_round_trips() {
        let node = Node::new("a", "ends with a blank\n");
        let store = store_with(vec![node], &["a"]);

        let text = serialize_outline(&store, &["a".to_string()]);
        assert_eq!(text, "# [ ] ends with a blank\n\n");

        let parsed = crate::parse_outline(&text).unwrap();
        assert_eq!(parsed[0].content, "ends with a blank\n");
    }

    #[test]
    fn test_missing_ids_are_omitted() {
        let node = Node::new("a", "kept");
        let store = store_with(vec![node], &["a"]);

        let text = serialize_outline(&store, &["ghost".to_string(), "a".to_string()]);
        assert_eq!(text, "# [ ] kept\n");
    }
}
