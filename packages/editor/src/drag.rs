//! # Drag Reorder
//!
//! Drag-and-drop of one block or of the whole selection.
//!
//! A drag starts from a block's handle, tracks a drop target while the pointer
//! moves over other blocks, and resolves into a single `MoveMany` mutation on
//! drop. The drop target is transient and never outlives the drag.

use serde::{Deserialize, Serialize};

use crate::block::{BlockId, BlockKind};
use crate::document::Document;
use crate::layout::BlockLayout;
use crate::mutations::Mutation;
use crate::selection::Selection;

/// Which side of the target block the payload lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropEdge {
    Top,
    Bottom,
}

/// Drop position relative to one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub block_id: BlockId,
    pub edge: DropEdge,
}

/// Edge for a pointer at `pointer_y` over a block spanning `top..top + height`
pub fn edge_for(pointer_y: f32, top: f32, height: f32) -> DropEdge {
    if pointer_y < top + height / 2.0 {
        DropEdge::Top
    } else {
        DropEdge::Bottom
    }
}

/// One line of the drag preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub text: String,

    /// Headings render emphasized
    pub emphasized: bool,
}

/// Summary shown next to the pointer while dragging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPreview {
    /// First few dragged blocks
    pub lines: Vec<PreviewLine>,

    /// Dragged blocks not listed in `lines`
    pub overflow: usize,

    /// Count badge, shown only when dragging more than one block
    pub badge: Option<usize>,
}

impl DragPreview {
    /// Build the preview for `ids` (document order), listing at most `limit` blocks
    pub fn build(doc: &Document, ids: &[BlockId], limit: usize) -> Self {
        let blocks: Vec<_> = ids.iter().filter_map(|id| doc.get(id)).collect();

        let lines = blocks
            .iter()
            .take(limit)
            .map(|block| PreviewLine {
                text: if block.content.is_empty() {
                    placeholder(block.kind).to_string()
                } else {
                    block.content.clone()
                },
                emphasized: block.kind.is_heading(),
            })
            .collect();

        Self {
            lines,
            overflow: blocks.len().saturating_sub(limit),
            badge: (blocks.len() > 1).then_some(blocks.len()),
        }
    }
}

fn placeholder(kind: BlockKind) -> &'static str {
    if kind.is_heading() {
        "Empty heading"
    } else {
        "Empty text"
    }
}

/// An in-flight drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Block whose handle started the drag
    pub dragged_id: BlockId,

    /// Last computed drop target
    pub drop_target: Option<DropTarget>,
}

/// Drag-and-drop controller
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: Option<DragState>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging `id`. Collapses the selection to `id` unless it is
    /// already part of it, and returns the ids that will move.
    pub fn begin(&mut self, id: &str, selection: &mut Selection, doc: &Document) -> Vec<BlockId> {
        if !selection.contains(id) {
            *selection = Selection::single(id);
        }

        self.state = Some(DragState {
            dragged_id: id.to_string(),
            drop_target: None,
        });

        selection.in_document_order(doc)
    }

    /// Track the pointer over `target_id`. Ignored when not dragging or when
    /// the target has no rendered box.
    pub fn over(&mut self, target_id: &str, pointer_y: f32, layout: &dyn BlockLayout) -> Option<&DropTarget> {
        let state = self.state.as_mut()?;
        let rect = layout.block_rect(target_id)?;

        state.drop_target = Some(DropTarget {
            block_id: target_id.to_string(),
            edge: edge_for(pointer_y, rect.top(), rect.height),
        });
        state.drop_target.as_ref()
    }

    /// Pointer left the drop-eligible region
    pub fn leave(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.drop_target = None;
        }
    }

    /// Finish the drag and resolve the move, if any.
    ///
    /// The payload is the whole selection when it contains the dragged block,
    /// otherwise just the dragged block.
    pub fn drop(&mut self, selection: &Selection, doc: &Document) -> Option<Mutation> {
        let state = self.state.take()?;
        let target = state.drop_target?;

        let ids = if selection.contains(&state.dragged_id) {
            selection.in_document_order(doc)
        } else {
            vec![state.dragged_id]
        };

        Some(Mutation::MoveMany {
            ids,
            destination_id: target.block_id,
            edge: target.edge,
        })
    }

    /// Abort without moving anything
    pub fn cancel(&mut self) {
        self.state = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    pub fn drop_target(&self) -> Option<&DropTarget> {
        self.state.as_ref().and_then(|s| s.drop_target.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::layout::LayoutRegistry;
    use blockdoc_common::Rect;

    fn doc() -> Document {
        Document::from_blocks(vec![
            Block::text("a", "first"),
            Block::new("b", BlockKind::Heading1, ""),
            Block::text("c", ""),
            Block::text("d", "fourth"),
            Block::text("e", "fifth"),
        ])
        .unwrap()
    }

    fn layout() -> LayoutRegistry {
        LayoutRegistry::stacked(
            [("a", 20.0), ("b", 40.0), ("c", 20.0), ("d", 20.0), ("e", 20.0)],
            0.0,
            300.0,
        )
    }

    #[test]
    fn test_edge_from_midpoint() {
        assert_eq!(edge_for(9.9, 0.0, 20.0), DropEdge::Top);
        assert_eq!(edge_for(10.0, 0.0, 20.0), DropEdge::Bottom);
        assert_eq!(edge_for(35.0, 20.0, 40.0), DropEdge::Top);
    }

    #[test]
    fn test_begin_collapses_foreign_selection() {
        let doc = doc();
        let mut selection: Selection = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let mut drag = DragController::new();

        let payload = drag.begin("d", &mut selection, &doc);
        assert_eq!(payload, vec!["d"]);
        assert_eq!(selection, Selection::single("d"));
    }

    #[test]
    fn test_begin_keeps_selection_containing_dragged_block() {
        let doc = doc();
        let mut selection: Selection = ["d", "a"].iter().map(|s| s.to_string()).collect();
        let mut drag = DragController::new();

        let payload = drag.begin("d", &mut selection, &doc);
        assert_eq!(payload, vec!["a", "d"]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_drop_moves_selection_to_last_target() {
        let doc = doc();
        let layout = layout();
        let mut selection: Selection = ["a", "c"].iter().map(|s| s.to_string()).collect();
        let mut drag = DragController::new();

        drag.begin("a", &mut selection, &doc);
        drag.over("d", 81.0, &layout);
        let target = drag.over("e", 115.0, &layout).cloned();
        assert_eq!(
            target,
            Some(DropTarget {
                block_id: "e".to_string(),
                edge: DropEdge::Bottom
            })
        );

        let mutation = drag.drop(&selection, &doc).unwrap();
        let next = mutation.apply(&doc).unwrap();
        let order: Vec<&str> = next.ids().map(String::as_str).collect();
        assert_eq!(order, ["b", "d", "e", "a", "c"]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drop_without_target_is_noop() {
        let doc = doc();
        let layout = layout();
        let mut selection = Selection::new();
        let mut drag = DragController::new();

        drag.begin("a", &mut selection, &doc);
        drag.over("c", 65.0, &layout);
        drag.leave();

        assert!(drag.drop(&selection, &doc).is_none());
        assert!(drag.drop_target().is_none());
    }

    #[test]
    fn test_over_unrendered_block_is_ignored() {
        let doc = doc();
        let mut selection = Selection::new();
        let mut drag = DragController::new();
        let mut layout = LayoutRegistry::new();
        layout.insert("b", Rect::new(0.0, 0.0, 100.0, 10.0));

        drag.begin("a", &mut selection, &doc);
        assert!(drag.over("zzz", 5.0, &layout).is_none());
        assert!(drag.over("b", 2.0, &layout).is_some());
    }

    #[test]
    fn test_preview_lists_placeholders_overflow_and_badge() {
        let doc = doc();
        let ids: Vec<BlockId> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        let preview = DragPreview::build(&doc, &ids, 3);

        assert_eq!(preview.lines.len(), 3);
        assert_eq!(preview.lines[0].text, "first");
        assert_eq!(preview.lines[1].text, "Empty heading");
        assert!(preview.lines[1].emphasized);
        assert_eq!(preview.lines[2].text, "Empty text");
        assert_eq!(preview.overflow, 2);
        assert_eq!(preview.badge, Some(5));

        let single = DragPreview::build(&doc, &ids[..1], 3);
        assert_eq!(single.overflow, 0);
        assert_eq!(single.badge, None);
    }
}
