//! # Blockdoc Editor
//!
//! Editing engine for block-based documents: a flat, ordered list of typed
//! text blocks that can be edited, reordered, selected as a group, split
//! across fixed-height pages and undone.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: rendering, text widgets, events       │
//! └─────────────────────────────────────────────┘
//!           ↓ intents          ↑ focus requests
//! ┌─────────────────────────────────────────────┐
//! │ session: EditSession                        │
//! │  - Selection / drag / clipboard intents     │
//! │  - Apply mutations, commit snapshots        │
//! │  - Height feedback → overflow split         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document + mutations: pure snapshot edits   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ undo_stack: snapshot history                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are immutable**: every edit produces a new `Document`
//! 2. **Pages are derived**: recomputed from document, heights and limits
//! 3. **Rendering is injected**: layout and text measurement are traits
//! 4. **Failures are no-ops**: stale ids and invariant violations leave state as is
//!
//! ## Usage
//!
//! ```rust
//! use blockdoc_editor::{EditSession, EditorConfig, FixedMetrics, LayoutRegistry};
//!
//! let mut session = EditSession::new(EditorConfig::default());
//! let first = session.document().first().id.clone();
//!
//! session.edit_content(&first, "Hello");
//! let second = session.insert_block_after(&first).unwrap();
//!
//! // After the host renders, run deferred effects
//! let focus = session.run_post_effects(&LayoutRegistry::new(), &FixedMetrics::default());
//! assert_eq!(focus[0].block_id, second);
//!
//! session.undo();
//! assert_eq!(session.document().len(), 1);
//! ```

mod block;
mod clipboard;
mod config;
mod document;
mod drag;
mod errors;
mod layout;
mod mutations;
mod pagination;
mod post_effects;
mod selection;
mod session;
mod undo_stack;

pub use block::{Block, BlockId, BlockKind, BlockPatch};
pub use clipboard::{
    copy_selection, decode as decode_clipboard, encode as encode_clipboard, resolve_site, ClipboardBlock,
    ClipboardPayload, PasteSite, PasteSource,
};
pub use config::{EditorConfig, ViewMode, DEFAULT_CONFIG_NAME};
pub use document::Document;
pub use drag::{edge_for, DragController, DragPreview, DragState, DropEdge, DropTarget, PreviewLine};
pub use errors::EditorError;
pub use layout::{BlockLayout, FixedMetrics, LayoutRegistry, TextMeasure, TextStyle};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use pagination::{
    find_overflow, find_split_offset, paginate, plan_split, HeightMap, Page, PageLimits, SplitCandidate, SplitPlan,
    SplitPolicy,
};
pub use post_effects::{Caret, FocusRequest, PostEffect, PostEffectQueue};
pub use selection::{blocks_in_rect, PointerTarget, RubberBand, Selection};
pub use session::{strip_slash_command, EditSession};
pub use undo_stack::UndoStack;

// Re-export common types for convenience
pub use blockdoc_common::{Point, Rect};
