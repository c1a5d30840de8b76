//! # Document Model
//!
//! An ordered, never-empty sequence of blocks.
//!
//! Every operation here is pure: it borrows the current document and returns
//! a new one. The history stack keeps whole snapshots, so a document value is
//! never mutated after it has been committed.
//!
//! ## Invariants
//!
//! - At least one block exists
//! - Block ids are unique
//! - Insertion order is display order

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block::{byte_index, Block, BlockId, BlockPatch};
use crate::drag::DropEdge;
use crate::mutations::MutationError;

/// Ordered block sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Create a document holding a single block
    pub fn new(first: Block) -> Self {
        Self {
            blocks: vec![first],
        }
    }

    /// Create a document from existing blocks, enforcing the invariants
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, MutationError> {
        if blocks.is_empty() {
            return Err(MutationError::EmptyDocument);
        }

        let mut seen = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            if !seen.insert(block.id.as_str()) {
                return Err(MutationError::DuplicateId(block.id.clone()));
            }
        }

        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true for a document built through this API
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn first(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn last(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn ids(&self) -> impl Iterator<Item = &BlockId> {
        self.blocks.iter().map(|b| &b.id)
    }

    /// Insert `block` right after `anchor_id`, or at the end if the anchor is gone
    pub fn insert_after(&self, anchor_id: &str, block: Block) -> Document {
        let mut blocks = self.blocks.clone();
        let at = self
            .index_of(anchor_id)
            .map(|idx| idx + 1)
            .unwrap_or(blocks.len());
        blocks.insert(at, block);
        Document { blocks }
    }

    /// Remove every block in `ids`. Removing everything leaves `fallback` behind.
    pub fn remove(&self, ids: &HashSet<BlockId>, fallback: Block) -> Document {
        let mut blocks: Vec<Block> = self
            .blocks
            .iter()
            .filter(|b| !ids.contains(&b.id))
            .cloned()
            .collect();

        if blocks.is_empty() {
            blocks.push(fallback);
        }

        Document { blocks }
    }

    /// Merge `patch` into the block with `id` (unchanged copy if absent)
    pub fn update(&self, id: &str, patch: &BlockPatch) -> Document {
        let mut blocks = self.blocks.clone();
        if let Some(block) = blocks.iter_mut().find(|b| b.id == id) {
            block.apply_patch(patch);
        }
        Document { blocks }
    }

    /// Move the blocks in `ids` as one contiguous run next to `destination_id`.
    ///
    /// The run keeps document order regardless of the order of `ids`. Moving
    /// onto a member of the run, onto a missing block, or moving nothing
    /// leaves the document unchanged.
    pub fn move_many(&self, ids: &[BlockId], destination_id: &str, edge: DropEdge) -> Document {
        let moving: HashSet<&str> = ids.iter().map(String::as_str).collect();
        if moving.contains(destination_id) || !self.contains(destination_id) {
            return self.clone();
        }

        let (run, mut remaining): (Vec<Block>, Vec<Block>) = self
            .blocks
            .iter()
            .cloned()
            .partition(|b| moving.contains(b.id.as_str()));

        if run.is_empty() {
            return self.clone();
        }

        let target = remaining
            .iter()
            .position(|b| b.id == destination_id)
            .unwrap_or(remaining.len());

        let at = match edge {
            DropEdge::Top => target,
            DropEdge::Bottom => target + 1,
        };

        remaining.splice(at..at, run);
        Document { blocks: remaining }
    }

    /// Split the block with `id` at a char offset.
    ///
    /// The first half keeps the original id; the second half is a new block of
    /// the same kind carrying `new_id`.
    pub fn split_block(&self, id: &str, at_char_offset: usize, new_id: BlockId) -> Document {
        let Some(index) = self.index_of(id) else {
            return self.clone();
        };

        let original = &self.blocks[index];
        let split_at = byte_index(&original.content, at_char_offset);

        let mut head = original.clone();
        head.content = original.content[..split_at].to_string();
        let tail = Block::new(new_id, original.kind, &original.content[split_at..]);

        let mut blocks = self.blocks.clone();
        blocks.splice(index..=index, [head, tail]);
        Document { blocks }
    }

    /// Generalized splice. `start` and `delete_count` are clamped to bounds.
    ///
    /// A splice that would empty the document keeps it as is.
    pub fn replace_range(&self, start: usize, delete_count: usize, inserted: Vec<Block>) -> Document {
        let start = start.min(self.blocks.len());
        let end = start.saturating_add(delete_count).min(self.blocks.len());

        if inserted.is_empty() && end - start == self.blocks.len() {
            return self.clone();
        }

        let mut blocks = self.blocks.clone();
        blocks.splice(start..end, inserted);
        Document { blocks }
    }
}

impl TryFrom<Vec<Block>> for Document {
    type Error = MutationError;

    fn try_from(blocks: Vec<Block>) -> Result<Self, Self::Error> {
        Document::from_blocks(blocks)
    }
}

impl From<Document> for Vec<Block> {
    fn from(doc: Document) -> Self {
        doc.blocks
    }
}
