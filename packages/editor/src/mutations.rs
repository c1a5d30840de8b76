//! # Document Mutations
//!
//! Serializable records of structural edits.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation is one user-level operation
//! 2. **Validated**: Referential and invariant checks run before applying
//! 3. **Pure**: `apply` borrows the current document and returns the next one
//!
//! ## Failure Semantics
//!
//! A rejected mutation never corrupts state. The session logs the error and
//! keeps the previous snapshot, so callers observe a no-op.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::{Block, BlockId, BlockPatch};
use crate::document::Document;
use crate::drag::DropEdge;

/// Structural edit of a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mutation {
    /// Insert a block right after an anchor (appends if the anchor is gone)
    InsertAfter { anchor_id: BlockId, block: Block },

    /// Remove blocks; `fallback_id` names the empty block left behind if
    /// everything is removed
    Remove { ids: Vec<BlockId>, fallback_id: BlockId },

    /// Merge partial fields into a block
    Update { id: BlockId, patch: BlockPatch },

    /// Move a run of blocks before or after a destination block
    MoveMany {
        ids: Vec<BlockId>,
        destination_id: BlockId,
        edge: DropEdge,
    },

    /// Split a block at a char offset
    Split {
        id: BlockId,
        at: usize,
        new_id: BlockId,
    },

    /// Splice blocks into the sequence
    ReplaceRange {
        start: usize,
        delete_count: usize,
        blocks: Vec<Block>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Duplicate block id: {0}")]
    DuplicateId(String),

    #[error("Cannot move blocks onto a member of the moved run: {0}")]
    MoveIntoPayload(String),

    #[error("Nothing to move")]
    EmptyPayload,

    #[error("Split offset {at} out of range for block of {len} chars")]
    SplitOutOfRange { at: usize, len: usize },

    #[error("Range {start}+{delete_count} out of bounds for {len} blocks")]
    RangeOutOfBounds {
        start: usize,
        delete_count: usize,
        len: usize,
    },

    #[error("Document would be empty")]
    EmptyDocument,
}

impl Mutation {
    /// Apply to `doc`, producing the next document
    pub fn apply(&self, doc: &Document) -> Result<Document, MutationError> {
        self.validate(doc)?;

        let next = match self {
            Mutation::InsertAfter { anchor_id, block } => doc.insert_after(anchor_id, block.clone()),

            Mutation::Remove { ids, fallback_id } => {
                let ids: HashSet<BlockId> = ids.iter().cloned().collect();
                doc.remove(&ids, Block::empty(fallback_id.clone()))
            }

            Mutation::Update { id, patch } => doc.update(id, patch),

            Mutation::MoveMany { ids, destination_id, edge } => doc.move_many(ids, destination_id, *edge),

            Mutation::Split { id, at, new_id } => doc.split_block(id, *at, new_id.clone()),

            Mutation::ReplaceRange { start, delete_count, blocks } => {
                doc.replace_range(*start, *delete_count, blocks.clone())
            }
        };

        Ok(next)
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::InsertAfter { block, .. } => ensure_fresh(doc, &block.id),

            Mutation::Remove { ids, fallback_id } => {
                if !ids.iter().any(|id| doc.contains(id)) {
                    return Err(MutationError::EmptyPayload);
                }
                ensure_fresh(doc, fallback_id)
            }

            Mutation::Update { id, .. } => ensure_exists(doc, id),

            Mutation::MoveMany { ids, destination_id, .. } => {
                ensure_exists(doc, destination_id)?;

                if ids.iter().any(|id| id == destination_id) {
                    return Err(MutationError::MoveIntoPayload(destination_id.clone()));
                }

                if !ids.iter().any(|id| doc.contains(id)) {
                    return Err(MutationError::EmptyPayload);
                }

                Ok(())
            }

            Mutation::Split { id, at, new_id } => {
                let block = doc
                    .get(id)
                    .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;

                let len = block.char_len();
                if *at > len {
                    return Err(MutationError::SplitOutOfRange { at: *at, len });
                }

                ensure_fresh(doc, new_id)
            }

            Mutation::ReplaceRange { start, delete_count, blocks } => {
                let len = doc.len();
                let end = start
                    .checked_add(*delete_count)
                    .filter(|end| *end <= len)
                    .ok_or(MutationError::RangeOutOfBounds {
                        start: *start,
                        delete_count: *delete_count,
                        len,
                    })?;

                if blocks.is_empty() && *delete_count == len {
                    return Err(MutationError::EmptyDocument);
                }

                let replaced: HashSet<&str> = doc.blocks()[*start..end]
                    .iter()
                    .map(|b| b.id.as_str())
                    .collect();

                let mut seen = HashSet::new();
                for block in blocks {
                    let clashes = doc.contains(&block.id) && !replaced.contains(block.id.as_str());
                    if clashes || !seen.insert(block.id.as_str()) {
                        return Err(MutationError::DuplicateId(block.id.clone()));
                    }
                }

                Ok(())
            }
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertAfter { .. } => "insert_after",
            Mutation::Remove { .. } => "remove",
            Mutation::Update { .. } => "update",
            Mutation::MoveMany { .. } => "move_many",
            Mutation::Split { .. } => "split",
            Mutation::ReplaceRange { .. } => "replace_range",
        }
    }
}

fn ensure_exists(doc: &Document, id: &str) -> Result<(), MutationError> {
    if doc.contains(id) {
        Ok(())
    } else {
        Err(MutationError::BlockNotFound(id.to_string()))
    }
}

fn ensure_fresh(doc: &Document, id: &str) -> Result<(), MutationError> {
    if doc.contains(id) {
        Err(MutationError::DuplicateId(id.to_string()))
    } else {
        Ok(())
    }
}

/// Result of running a mutation through the session
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult {
    /// A new snapshot was committed
    Committed,

    /// The mutation applied but produced an identical document
    Unchanged,

    /// The mutation was rejected; the document is untouched
    Rejected(MutationError),
}

impl MutationResult {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationResult::Committed)
    }
}
