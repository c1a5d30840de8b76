//! # Selection Engine
//!
//! Block-level multi-selection plus the rubber-band gesture that drives it.
//!
//! ```text
//! Idle ──pointer down on background──▶ Selecting ──pointer up──▶ Idle
//!                                         │  ▲
//!                                         └──┘ pointer move: recompute set
//! ```

use std::collections::HashSet;

use blockdoc_common::{Point, Rect};

use crate::block::BlockId;
use crate::document::Document;
use crate::layout::BlockLayout;

/// Set of selected block ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<BlockId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(id: impl Into<BlockId>) -> Self {
        let mut selection = Self::new();
        selection.insert(id);
        selection
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<BlockId>) {
        self.ids.insert(id.into());
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &HashSet<BlockId> {
        &self.ids
    }

    /// Replace the whole set
    pub fn set(&mut self, ids: HashSet<BlockId>) {
        self.ids = ids;
    }

    /// Selected ids in document order
    pub fn in_document_order(&self, doc: &Document) -> Vec<BlockId> {
        doc.ids().filter(|id| self.ids.contains(*id)).cloned().collect()
    }

    /// Index of the last selected block in document order
    pub fn last_index(&self, doc: &Document) -> Option<usize> {
        doc.blocks().iter().rposition(|b| self.ids.contains(&b.id))
    }

    /// Drop ids that no longer exist in `doc`. Returns whether anything was dropped.
    pub fn retain_existing(&mut self, doc: &Document) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| doc.contains(id));
        self.ids.len() != before
    }
}

impl FromIterator<BlockId> for Selection {
    fn from_iter<I: IntoIterator<Item = BlockId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Where a pointer-down landed, as classified by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty space inside the selection container
    Background,

    /// A block's editable text region
    Editable(BlockId),

    /// A block's drag handle
    DragHandle(BlockId),
}

/// Rubber-band gesture state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RubberBand {
    #[default]
    Idle,
    Selecting {
        anchor: Point,
        current: Point,
    },
}

impl RubberBand {
    /// Start a gesture. Returns false (and stays idle) unless the pointer
    /// landed on the background.
    pub fn begin(&mut self, point: Point, target: &PointerTarget) -> bool {
        if *target != PointerTarget::Background {
            return false;
        }

        *self = RubberBand::Selecting {
            anchor: point,
            current: point,
        };
        true
    }

    /// Extend the gesture to `point` and compute the covered blocks.
    /// Returns `None` when idle.
    pub fn update(
        &mut self,
        point: Point,
        doc: &Document,
        layout: &dyn BlockLayout,
    ) -> Option<HashSet<BlockId>> {
        let RubberBand::Selecting { current, .. } = self else {
            return None;
        };
        *current = point;

        let rect = self.rect()?;
        Some(blocks_in_rect(rect, doc, layout))
    }

    /// Finish the gesture
    pub fn end(&mut self) {
        *self = RubberBand::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RubberBand::Selecting { .. })
    }

    /// Current selection rectangle, if a gesture is in progress
    pub fn rect(&self) -> Option<Rect> {
        match self {
            RubberBand::Idle => None,
            RubberBand::Selecting { anchor, current } => Some(Rect::from_corners(*anchor, *current)),
        }
    }
}

/// Blocks whose rendered box strictly overlaps `rect`
pub fn blocks_in_rect(rect: Rect, doc: &Document, layout: &dyn BlockLayout) -> HashSet<BlockId> {
    doc.blocks()
        .iter()
        .filter(|block| {
            layout
                .block_rect(&block.id)
                .is_some_and(|bounds| rect.intersects(&bounds))
        })
        .map(|block| block.id.clone())
        .collect()
}
