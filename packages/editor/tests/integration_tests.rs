//! Integration tests for editing sessions
//!
//! This tests:
//! - Insert / delete / edit chains with undo and redo
//! - Rubber-band selection through the session
//! - Drag reorder of single blocks and selections
//! - Mutation records round-tripping through JSON

use blockdoc_editor::{
    Block, BlockKind, DropEdge, EditSession, EditorConfig, FixedMetrics, LayoutRegistry, Mutation, MutationError,
    MutationResult, Point, PointerTarget, Rect,
};

fn session_with(contents: &[&str]) -> EditSession {
    let blocks = contents
        .iter()
        .enumerate()
        .map(|(i, c)| Block::text(format!("b{i}"), *c))
        .collect();
    EditSession::from_blocks(EditorConfig::default(), blocks).unwrap()
}

fn order(session: &EditSession) -> Vec<&str> {
    session.document().ids().map(String::as_str).collect()
}

fn column_layout(session: &EditSession) -> LayoutRegistry {
    let rows: Vec<(&str, f32)> = session.document().ids().map(|id| (id.as_str(), 20.0)).collect();
    LayoutRegistry::stacked(rows, 0.0, 300.0)
}

#[test]
fn test_edit_chain_with_undo_redo() {
    let mut session = EditSession::default();
    let first = session.document().first().id.clone();

    session.edit_content(&first, "Title");
    session.set_block_kind(&first, BlockKind::Heading1);
    let second = session.insert_block_after(&first).unwrap();
    session.edit_content(&second, "Body");

    assert_eq!(session.document().len(), 2);
    assert_eq!(session.history().undo_levels(), 4);

    // Walk all the way back
    while session.undo() {}
    assert_eq!(session.document().len(), 1);
    assert_eq!(session.document().first().content, "");
    assert_eq!(session.document().first().kind, BlockKind::Text);

    // And forward again
    while session.redo() {}
    assert_eq!(session.document().blocks()[0].kind, BlockKind::Heading1);
    assert_eq!(session.document().blocks()[1].content, "Body");
}

#[test]
fn test_commit_after_undo_drops_redo_branch() {
    let mut session = session_with(&["a"]);
    session.edit_content("b0", "b");
    session.edit_content("b0", "c");
    session.undo();
    session.undo();

    session.edit_content("b0", "z");
    assert!(!session.can_redo());
    assert_eq!(session.history().undo_levels(), 1);
}

#[test]
fn test_history_cap_evicts_oldest() {
    let config = EditorConfig {
        history_limit: 3,
        ..EditorConfig::default()
    };
    let mut session = EditSession::from_blocks(config, vec![Block::text("a", "0")]).unwrap();
    for i in 1..=5 {
        session.edit_content("a", i.to_string());
    }

    assert_eq!(session.history().len(), 3);
    while session.undo() {}
    assert_eq!(session.document().first().content, "3");
}

#[test]
fn test_removing_every_block_leaves_one_empty_text_block() {
    let mut session = session_with(&["a", "b", "c"]);
    session.select(["b0", "b1", "b2"].map(String::from));
    session.delete_selection();

    assert_eq!(session.document().len(), 1);
    let block = session.document().first();
    assert_eq!(block.kind, BlockKind::Text);
    assert_eq!(block.content, "");
    assert!(!["b0", "b1", "b2"].contains(&block.id.as_str()));
}

#[test]
fn test_rubber_band_then_delete() {
    let mut session = session_with(&["a", "b", "c", "d"]);
    let layout = column_layout(&session);

    assert!(session.pointer_down(Point::new(320.0, 25.0), &PointerTarget::Background));
    assert!(session.pointer_move(Point::new(100.0, 55.0), &layout));
    session.pointer_up();
    assert!(!session.rubber_band().is_active());

    // Rows 20..40 and 40..60 overlap y 25..55
    assert_eq!(session.selection().in_document_order(session.document()), vec!["b1", "b2"]);

    session.delete_selection();
    assert_eq!(order(&session), vec!["b0", "b3"]);
    assert!(session.selection().is_empty());
}

#[test]
fn test_pointer_on_block_does_not_start_selection() {
    let mut session = session_with(&["a", "b"]);
    let layout = column_layout(&session);

    assert!(!session.pointer_down(Point::new(10.0, 5.0), &PointerTarget::DragHandle("b0".to_string())));
    assert!(!session.pointer_move(Point::new(200.0, 200.0), &layout));
    assert!(session.selection().is_empty());
}

#[test]
fn test_drag_single_block_to_top() {
    let mut session = session_with(&["a", "b", "c"]);
    let layout = column_layout(&session);

    let preview = session.begin_drag("b2").unwrap();
    assert_eq!(preview.lines.len(), 1);
    assert_eq!(preview.badge, None);

    let target = session.drag_over("b0", 4.0, &layout).unwrap();
    assert_eq!(target.edge, DropEdge::Top);

    assert!(session.drop_drag().is_committed());
    assert_eq!(order(&session), vec!["b2", "b0", "b1"]);

    session.undo();
    assert_eq!(order(&session), vec!["b0", "b1", "b2"]);
}

#[test]
fn test_drag_selection_keeps_relative_order() {
    let mut session = session_with(&["a", "b", "c", "d", "e"]);
    let layout = column_layout(&session);
    session.select(["b3", "b0"].map(String::from));

    let preview = session.begin_drag("b3").unwrap();
    assert_eq!(preview.badge, Some(2));

    session.drag_over("b4", 95.0, &layout);
    assert!(session.drop_drag().is_committed());
    assert_eq!(order(&session), vec!["b1", "b2", "b4", "b0", "b3"]);
    assert!(session.selection().is_empty());
}

#[test]
fn test_drop_onto_selected_block_is_rejected() {
    let mut session = session_with(&["a", "b", "c"]);
    let layout = column_layout(&session);
    session.select(["b0", "b1"].map(String::from));

    session.begin_drag("b0");
    session.drag_over("b1", 35.0, &layout);
    let result = session.drop_drag();

    assert_eq!(result, MutationResult::Rejected(MutationError::MoveIntoPayload("b1".to_string())));
    assert_eq!(order(&session), vec!["b0", "b1", "b2"]);
    assert!(!session.can_undo());
}

#[test]
fn test_drag_leave_then_drop_is_noop() {
    let mut session = session_with(&["a", "b"]);
    let layout = column_layout(&session);

    session.begin_drag("b0");
    session.drag_over("b1", 35.0, &layout);
    session.drag_leave();

    assert_eq!(session.drop_drag(), MutationResult::Unchanged);
    assert!(!session.drag().is_dragging());
}

#[test]
fn test_focus_request_for_deleted_block_is_dropped() {
    let mut session = session_with(&["a"]);
    let new_id = session.insert_block_after("b0").unwrap();
    session.undo();

    let requests = session.run_post_effects(&LayoutRegistry::new(), &FixedMetrics::default());
    assert!(requests.is_empty(), "block {new_id} no longer exists");
}

#[test]
fn test_click_page_uses_rendered_boxes() {
    let session = session_with(&["a", "b"]);
    let mut layout = LayoutRegistry::new();
    layout.insert("b1", Rect::new(0.0, 500.0, 300.0, 24.0));

    // b0 is not rendered, so b1 is the only candidate
    let request = session.click_page(0, 0.0, &layout).unwrap();
    assert_eq!(request.block_id, "b1");
}

#[test]
fn test_mutation_serialization() -> anyhow::Result<()> {
    let mutation = Mutation::MoveMany {
        ids: vec!["b1".to_string(), "b2".to_string()],
        destination_id: "b0".to_string(),
        edge: DropEdge::Top,
    };

    let json = serde_json::to_value(&mutation)?;
    assert_eq!(json["kind"], "moveMany");
    assert_eq!(json["edge"], "top");

    let back: Mutation = serde_json::from_value(json)?;
    assert_eq!(back, mutation);
    Ok(())
}

#[test]
fn test_applying_recorded_mutations_replays_session() {
    let mut session = session_with(&["a", "b"]);
    let recorded = vec![
        Mutation::InsertAfter {
            anchor_id: "b0".to_string(),
            block: Block::new("h", BlockKind::Heading2, "Section"),
        },
        Mutation::MoveMany {
            ids: vec!["b1".to_string()],
            destination_id: "h".to_string(),
            edge: DropEdge::Top,
        },
        Mutation::Split {
            id: "b0".to_string(),
            at: 0,
            new_id: "b0-tail".to_string(),
        },
    ];

    for mutation in recorded {
        assert!(session.apply(mutation).is_committed());
    }

    assert_eq!(order(&session), vec!["b0", "b0-tail", "b1", "h"]);
    assert_eq!(session.document().get("b0").unwrap().content, "");
    assert_eq!(session.document().get("b0-tail").unwrap().content, "a");
}
