//! Copy/paste between sessions through the transport string

use blockdoc_editor::{Block, BlockKind, EditSession, EditorConfig, MutationResult};
use serde_json::json;

fn session_with(blocks: Vec<Block>) -> EditSession {
    EditSession::from_blocks(EditorConfig::default(), blocks).unwrap()
}

fn kinds_and_contents(session: &EditSession) -> Vec<(BlockKind, String)> {
    session
        .document()
        .blocks()
        .iter()
        .map(|b| (b.kind, b.content.clone()))
        .collect()
}

#[test]
fn test_round_trip_into_empty_document() {
    let mut source = session_with(vec![
        Block::text("a", "a"),
        Block::new("b", BlockKind::Heading1, "b"),
        Block::text("c", "not copied"),
    ]);
    source.select(["b", "a"].map(String::from));
    let copied = source.copy().unwrap();

    let mut target = EditSession::default();
    let blank = target.document().first().id.clone();
    target.focus_block(&blank);

    assert!(target.paste(&copied).is_committed());
    assert_eq!(
        kinds_and_contents(&target),
        vec![(BlockKind::Text, "a".to_string()), (BlockKind::Heading1, "b".to_string())]
    );

    // Pasted blocks get ids of their own
    assert!(!target.document().contains("a"));
    assert!(!target.document().contains("b"));
    assert!(!target.document().contains(&blank));
}

#[test]
fn test_copy_without_selection_produces_nothing() {
    let session = session_with(vec![Block::text("a", "a")]);
    assert_eq!(session.copy(), None);
}

#[test]
fn test_transport_fixture_shape() {
    let mut session = session_with(vec![Block::text("x", "one"), Block::new("y", BlockKind::Heading2, "two")]);
    session.select(["x", "y"].map(String::from));

    let value: serde_json::Value = serde_json::from_str(&session.copy().unwrap()).unwrap();
    assert_eq!(
        value,
        json!([
            { "type": "text", "content": "one" },
            { "type": "h2", "content": "two" }
        ])
    );
}

#[test]
fn test_paste_after_last_selected_block() {
    let mut session = session_with(vec![Block::text("a", "1"), Block::text("b", "2"), Block::text("c", "3")]);
    session.select(["a", "b"].map(String::from));
    session.focus_block("c");

    let payload = json!([{ "type": "h1", "content": "new" }]).to_string();
    session.paste(&payload);

    let contents: Vec<&str> = session.document().blocks().iter().map(|b| b.content.as_str()).collect();
    assert_eq!(contents, ["1", "2", "new", "3"]);
}

#[test]
fn test_paste_after_focused_non_blank_block() {
    let mut session = session_with(vec![Block::text("a", "keep"), Block::text("b", "end")]);
    session.focus_block("a");

    session.paste("pasted");

    let contents: Vec<&str> = session.document().blocks().iter().map(|b| b.content.as_str()).collect();
    assert_eq!(contents, ["keep", "pasted", "end"]);
}

#[test]
fn test_paste_into_blank_heading_inserts_after() {
    let mut session = session_with(vec![Block::new("h", BlockKind::Heading1, "")]);
    session.focus_block("h");

    session.paste("text");
    assert_eq!(session.document().len(), 2);
    assert_eq!(session.document().first().id, "h");
}

#[test]
fn test_paste_without_focus_appends() {
    let mut session = session_with(vec![Block::text("a", "")]);
    session.paste("x\ny");

    let contents: Vec<&str> = session.document().blocks().iter().map(|b| b.content.as_str()).collect();
    assert_eq!(contents, ["", "x", "y"]);
}

#[test]
fn test_plain_text_lines_become_text_blocks() {
    let mut session = EditSession::default();
    let blank = session.document().first().id.clone();
    session.focus_block(&blank);

    session.paste("line1\n\nline2");
    assert_eq!(
        kinds_and_contents(&session),
        vec![(BlockKind::Text, "line1".to_string()), (BlockKind::Text, "line2".to_string())]
    );
}

#[test]
fn test_malformed_json_pastes_as_text() {
    let mut session = session_with(vec![Block::text("a", "x")]);
    session.paste(r#"[{"type":"h1"}]"#);

    assert_eq!(session.document().len(), 2);
    assert_eq!(session.document().last().kind, BlockKind::Text);
    assert_eq!(session.document().last().content, r#"[{"type":"h1"}]"#);
}

#[test]
fn test_blank_paste_is_noop() {
    let mut session = session_with(vec![Block::text("a", "x")]);
    assert_eq!(session.paste(" \n\n\t"), MutationResult::Unchanged);
    assert!(!session.can_undo());
}

#[test]
fn test_paste_is_one_undo_step() {
    let mut session = session_with(vec![Block::text("a", "x")]);
    session.paste("1\n2\n3");
    assert_eq!(session.document().len(), 4);

    session.undo();
    assert_eq!(session.document().len(), 1);
}
