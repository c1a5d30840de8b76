//! # Post-Effect Queue
//!
//! Some follow-ups can only run once the host has rendered the latest
//! snapshot: focusing a block that did not exist a moment ago, and
//! re-checking page overflow against fresh measurements.
//!
//! ## Design
//!
//! Intents push effects onto the queue; the host calls
//! [`EditSession::run_post_effects`](crate::EditSession::run_post_effects)
//! after each render pass. Effects are:
//! - **Deferred**: nothing runs inside the intent that queued it
//! - **Stale-safe**: an effect whose block vanished in the meantime is a no-op
//! - **Coalesced**: at most one pending overflow check

use std::collections::VecDeque;

use crate::block::BlockId;

/// Where the caret goes when a block takes focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Caret {
    #[default]
    End,
}

/// Request for the host to focus a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRequest {
    pub block_id: BlockId,
    pub caret: Caret,
}

impl FocusRequest {
    /// Focus `block_id` with the caret at the end of its content
    pub fn at_end(block_id: impl Into<BlockId>) -> Self {
        Self {
            block_id: block_id.into(),
            caret: Caret::End,
        }
    }
}

/// Follow-up action deferred until after render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostEffect {
    /// Move focus to a block (caret at end)
    Focus { block_id: BlockId },

    /// Re-run overflow detection and split if needed
    CheckOverflow,
}

/// FIFO of pending post-effects
#[derive(Debug, Clone, Default)]
pub struct PostEffectQueue {
    pending: VecDeque<PostEffect>,
}

impl PostEffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an effect. A second `CheckOverflow` while one is pending is dropped.
    pub fn push(&mut self, effect: PostEffect) {
        if effect == PostEffect::CheckOverflow && self.pending.contains(&PostEffect::CheckOverflow) {
            return;
        }
        self.pending.push_back(effect);
    }

    pub fn focus(&mut self, block_id: impl Into<BlockId>) {
        self.push(PostEffect::Focus {
            block_id: block_id.into(),
        });
    }

    /// Take everything queued so far, leaving the queue empty
    pub fn take(&mut self) -> Vec<PostEffect> {
        self.pending.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostEffect> {
        self.pending.iter()
    }

    pub fn has_overflow_check(&self) -> bool {
        self.pending.contains(&PostEffect::CheckOverflow)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
