//! Copy/cut/paste scenarios across the cache and the system clipboard.

use treeline_document::AncestorRegistry;
use treeline_editor::{ActionOutcome, Editor, NodeId, NodeStatus};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// root ── a ── a1
///      └─ b
fn fixture() -> (Editor, NodeId, NodeId, NodeId) {
    init_tracing();
    let mut editor = Editor::new("clipboard");

    let root = editor.state.store.root_id().clone();
    let a = editor.state.store.get(&root).unwrap().children[0].clone();
    editor.edit_content(&a, "a");
    let b = editor.create_sibling(&a).unwrap();
    editor.edit_content(&b, "b");
    let a1 = editor.create_child(&a).unwrap();
    editor.edit_content(&a1, "a1");

    editor.clear_history();
    (editor, a, a1, b)
}

#[test]
fn copy_paste_duplicates_with_fresh_ids() {
    let (mut editor, a, a1, b) = fixture();

    assert_eq!(editor.copy_nodes(vec![a.clone()]), ActionOutcome::Applied);
    assert_eq!(editor.paste_into(&b), ActionOutcome::Applied);

    // Original untouched.
    assert_eq!(editor.state.store.get(&a).unwrap().children, vec![a1]);

    let pasted = editor.state.store.get(&b).unwrap().children.clone();
    assert_eq!(pasted.len(), 1);
    assert_ne!(pasted[0], a);
    let clone = editor.state.store.get(&pasted[0]).unwrap();
    assert_eq!(clone.content, "a");
    assert_eq!(clone.children.len(), 1);
    assert_eq!(
        editor.state.store.get(&clone.children[0]).unwrap().content,
        "a1"
    );
    assert_eq!(
        editor.state.registry,
        AncestorRegistry::rebuild(&editor.state.store)
    );
}

#[test]
fn paste_undo_removes_exactly_the_pasted_subtree() {
    let (mut editor, a, _a1, b) = fixture();

    editor.copy_nodes(vec![a.clone()]);
    editor.paste_into(&b);
    let pasted_root = editor.state.store.get(&b).unwrap().children[0].clone();

    assert!(editor.undo());
    assert!(!editor.state.store.contains(&pasted_root));
    assert!(editor.state.store.contains(&a));
    assert!(editor.state.store.get(&b).unwrap().children.is_empty());
}

#[test]
fn repeated_paste_never_collides() {
    let (mut editor, a, _a1, b) = fixture();

    editor.copy_nodes(vec![a]);
    editor.paste_into(&b);
    editor.paste_into(&b);

    let pasted = editor.state.store.get(&b).unwrap().children.clone();
    assert_eq!(pasted.len(), 2);
    assert_ne!(pasted[0], pasted[1]);
}

#[test]
fn cut_node_remains_editable_until_paste() {
    let (mut editor, a, a1, b) = fixture();

    assert_eq!(editor.cut_nodes(vec![a.clone()]), ActionOutcome::Applied);

    // Cut is deferred: the subtree stays live and editable, only marked.
    assert!(editor.state.store.get(&a).unwrap().metadata.is_cut);
    assert!(editor.state.store.get(&a1).unwrap().metadata.is_cut);
    assert_eq!(editor.edit_content(&a, "renamed"), ActionOutcome::Applied);

    assert_eq!(editor.paste_into(&b), ActionOutcome::Applied);

    // Same node id, new parent, mark cleared, edit preserved.
    assert_eq!(editor.state.store.get(&b).unwrap().children, vec![a.clone()]);
    let moved = editor.state.store.get(&a).unwrap();
    assert_eq!(moved.content, "renamed");
    assert!(!moved.metadata.is_cut);
    assert!(!editor.state.store.get(&a1).unwrap().metadata.is_cut);
    assert!(editor.state.clipboard.is_none());
}

#[test]
fn cut_paste_onto_current_parent_is_cancelled() {
    let (mut editor, a, _a1, _b) = fixture();
    let root = editor.state.store.root_id().clone();

    editor.cut_nodes(vec![a.clone()]);
    assert_eq!(editor.paste_into(&root), ActionOutcome::Cancelled);

    // Still pending: marks and cache survive for a later target.
    assert!(editor.state.store.get(&a).unwrap().metadata.is_cut);
    assert!(editor.state.clipboard.is_some());
}

#[test]
fn cut_paste_into_own_subtree_is_blocked() {
    let (mut editor, a, a1, _b) = fixture();

    editor.cut_nodes(vec![a.clone()]);
    assert_eq!(editor.paste_into(&a1), ActionOutcome::Blocked);
    assert_eq!(editor.state.store.get(&a).unwrap().children, vec![a1]);
}

#[test]
fn cut_then_paste_unwinds_in_two_steps() {
    let (mut editor, a, _a1, b) = fixture();
    let root = editor.state.store.root_id().clone();

    editor.cut_nodes(vec![a.clone()]);
    editor.paste_into(&b);

    // Undo the move batch, then the mark.
    assert!(editor.undo());
    assert!(editor
        .state
        .store
        .get(&root)
        .unwrap()
        .children
        .contains(&a));
    assert!(editor.state.store.get(&a).unwrap().metadata.is_cut);

    assert!(editor.undo());
    assert!(!editor.state.store.get(&a).unwrap().metadata.is_cut);
}

#[test]
fn external_copy_invalidates_the_cache() {
    let (mut editor, a, _a1, b) = fixture();

    editor.copy_nodes(vec![a]);
    // Another program replaces the system clipboard after our copy.
    editor
        .system_clipboard_mut()
        .write_text("# [x] external note\n");

    assert_eq!(editor.paste_into(&b), ActionOutcome::Applied);

    let pasted = editor.state.store.get(&b).unwrap().children.clone();
    assert_eq!(pasted.len(), 1);
    let node = editor.state.store.get(&pasted[0]).unwrap();
    assert_eq!(node.content, "external note");
    assert_eq!(node.metadata.status, NodeStatus::Completed);
}

#[test]
fn outline_text_round_trips_structure_and_status() {
    let (mut editor, a, a1, b) = fixture();
    editor.edit_content(&a1, "first line\nsecond line");
    editor.set_status(&a1, NodeStatus::Abandoned);

    editor.copy_nodes(vec![a.clone()]);
    // Drop the cache so paste must go through the text parser.
    editor.state.clipboard = None;

    assert_eq!(editor.paste_into(&b), ActionOutcome::Applied);

    let pasted_root_id = editor.state.store.get(&b).unwrap().children[0].clone();
    let pasted_root = editor.state.store.get(&pasted_root_id).unwrap();
    assert_eq!(pasted_root.content, "a");
    assert_eq!(pasted_root.children.len(), 1);
    let pasted_child = editor
        .state
        .store
        .get(&pasted_root.children[0])
        .unwrap();
    assert_eq!(pasted_child.content, "first line\nsecond line");
    assert_eq!(pasted_child.metadata.status, NodeStatus::Abandoned);
}

#[test]
fn bare_url_paste_creates_an_external_link_leaf() {
    let (mut editor, _a, _a1, b) = fixture();

    editor
        .system_clipboard_mut()
        .write_text("https://example.com/design-notes");

    assert_eq!(editor.paste_into(&b), ActionOutcome::Applied);
    let link_id = editor.state.store.get(&b).unwrap().children[0].clone();
    let link = editor.state.store.get(&link_id).unwrap();
    assert_eq!(link.content, "https://example.com/design-notes");
    assert_eq!(
        link.metadata.external_url.as_deref(),
        Some("https://example.com/design-notes")
    );

    // Link nodes are leaves: pasting into one is refused.
    editor.system_clipboard_mut().write_text("# [ ] anything\n");
    assert_eq!(editor.paste_into(&link_id), ActionOutcome::Blocked);
}

#[test]
fn plain_prose_on_the_clipboard_is_no_content() {
    let (mut editor, _a, _a1, b) = fixture();

    editor
        .system_clipboard_mut()
        .write_text("just some prose without headings");
    assert_eq!(editor.paste_into(&b), ActionOutcome::NoContent);
    assert!(editor.state.store.get(&b).unwrap().children.is_empty());
}

#[test]
fn empty_selection_yields_no_selection() {
    let (mut editor, ..) = fixture();
    assert_eq!(editor.copy_selection(), ActionOutcome::NoSelection);
    assert_eq!(editor.cut_selection(), ActionOutcome::NoSelection);
}

#[test]
fn blueprint_paste_into_plain_parent_strips_flags() {
    let (mut editor, a, a1, b) = fixture();
    for id in [&a, &a1] {
        editor.state.store.get_mut(id).unwrap().metadata.is_blueprint = true;
    }

    editor.copy_nodes(vec![a.clone()]);
    assert_eq!(editor.paste_into(&b), ActionOutcome::BlueprintStripped);

    let pasted_root_id = editor.state.store.get(&b).unwrap().children[0].clone();
    let pasted_root = editor.state.store.get(&pasted_root_id).unwrap();
    assert!(!pasted_root.metadata.is_blueprint);
    assert!(
        !editor
            .state
            .store
            .get(&pasted_root.children[0])
            .unwrap()
            .metadata
            .is_blueprint
    );
    // Source flags are untouched.
    assert!(editor.state.store.get(&a).unwrap().metadata.is_blueprint);
}

#[test]
fn blueprint_paste_under_the_root_keeps_flags() {
    let (mut editor, a, _a1, _b) = fixture();
    editor.state.store.get_mut(&a).unwrap().metadata.is_blueprint = true;
    let root = editor.state.store.root_id().clone();

    editor.copy_nodes(vec![a]);
    assert_eq!(editor.paste_into(&root), ActionOutcome::Applied);

    let pasted_id = editor.state.store.get(&root).unwrap().children.last().cloned().unwrap();
    assert!(editor.state.store.get(&pasted_id).unwrap().metadata.is_blueprint);
}

#[test]
fn selection_copy_uses_the_covering_set() {
    let (mut editor, a, a1, b) = fixture();

    editor.toggle_selection(&a);
    editor.toggle_selection(&b);
    assert_eq!(editor.copy_selection(), ActionOutcome::Applied);

    let cache = editor.state.clipboard.as_ref().unwrap();
    assert_eq!(cache.root_node_ids, vec![a.clone(), b.clone()]);
    assert!(!cache.is_cut);
    // a1 rides along inside a's subtree rather than as its own root.
    assert!(!cache.root_node_ids.contains(&a1));
}
