//! # Edit Session
//!
//! The controller that owns every piece of editor state and turns host
//! intents into document mutations.
//!
//! ```text
//! host intent ──▶ EditSession ──▶ Mutation::apply ──▶ UndoStack::commit
//!                     ▲                                     │
//!                     │                                     ▼
//!          report_height / run_post_effects ◀── host renders snapshot
//! ```
//!
//! Rejected mutations leave the state untouched and are only logged; no
//! intent returns an error to the host.

use blockdoc_common::{IDGenerator, Point};
use tracing::{debug, info};

use crate::block::{char_prefix, Block, BlockId, BlockKind, BlockPatch};
use crate::clipboard::{self, ClipboardPayload};
use crate::config::{EditorConfig, ViewMode};
use crate::document::Document;
use crate::drag::{DragController, DragPreview, DropTarget};
use crate::errors::EditorError;
use crate::layout::{BlockLayout, TextMeasure};
use crate::mutations::{Mutation, MutationResult};
use crate::pagination::{self, HeightMap, Page};
use crate::post_effects::{FocusRequest, PostEffect, PostEffectQueue};
use crate::selection::{PointerTarget, RubberBand, Selection};
use crate::undo_stack::UndoStack;

/// Single-user editing session over one document
#[derive(Debug, Clone)]
pub struct EditSession {
    config: EditorConfig,

    /// Block id source
    ids: IDGenerator,

    /// Committed document snapshots
    history: UndoStack<Document>,

    selection: Selection,
    rubber_band: RubberBand,
    drag: DragController,

    /// Last measured block heights
    heights: HeightMap,

    /// Block the host reports as focused
    focused: Option<BlockId>,

    effects: PostEffectQueue,
}

impl EditSession {
    /// Start a session on a document holding one empty text block
    pub fn new(config: EditorConfig) -> Self {
        let mut ids = IDGenerator::new(&config.id_seed);
        let document = Document::new(Block::empty(ids.new_id()));
        Self::assemble(config, ids, document)
    }

    /// Start a session on an existing document
    pub fn with_document(config: EditorConfig, document: Document) -> Self {
        let mut ids = IDGenerator::new(&config.id_seed);
        for id in document.ids() {
            ids.observe(id);
        }
        Self::assemble(config, ids, document)
    }

    /// Start a session on existing blocks, checking document invariants
    pub fn from_blocks(config: EditorConfig, blocks: Vec<Block>) -> Result<Self, EditorError> {
        let document = Document::from_blocks(blocks)?;
        Ok(Self::with_document(config, document))
    }

    fn assemble(config: EditorConfig, ids: IDGenerator, document: Document) -> Self {
        Self {
            heights: HeightMap::new(config.default_block_height, config.height_epsilon),
            history: UndoStack::with_max_levels(document, config.history_limit),
            ids,
            selection: Selection::new(),
            rubber_band: RubberBand::default(),
            drag: DragController::new(),
            focused: None,
            effects: PostEffectQueue::new(),
            config,
        }
    }

    pub fn document(&self) -> &Document {
        self.history.current()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn heights(&self) -> &HeightMap {
        &self.heights
    }

    pub fn history(&self) -> &UndoStack<Document> {
        &self.history
    }

    pub fn pending_effects(&self) -> &PostEffectQueue {
        &self.effects
    }

    pub fn view_mode(&self) -> ViewMode {
        self.config.view_mode
    }

    /// Id not used by any block of the current document
    fn fresh_id(&mut self) -> BlockId {
        loop {
            let id = self.ids.new_id();
            if !self.document().contains(&id) {
                return id;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Mutations and history
    // ---------------------------------------------------------------------

    /// Apply a mutation and commit the result as a new history entry
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        let next = match mutation.apply(self.document()) {
            Ok(next) => next,
            Err(err) => {
                debug!(mutation = mutation.name(), error = %err, "Mutation rejected");
                return MutationResult::Rejected(err);
            }
        };

        if next == *self.document() {
            debug!(mutation = mutation.name(), "Mutation left document unchanged");
            return MutationResult::Unchanged;
        }

        if let Mutation::Update { id, .. } | Mutation::Split { id, .. } = &mutation {
            self.heights.invalidate(id);
        }

        self.heights.retain(&next);
        self.history.commit(next);
        self.reconcile();

        debug!(
            mutation = mutation.name(),
            blocks = self.document().len(),
            undo_levels = self.history.undo_levels(),
            "Committed"
        );
        MutationResult::Committed
    }

    pub fn undo(&mut self) -> bool {
        let previous = self.document().clone();
        let moved = self.history.undo();
        if moved {
            self.restored_from(&previous);
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let previous = self.document().clone();
        let moved = self.history.redo();
        if moved {
            self.restored_from(&previous);
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Forget heights of blocks whose content or kind differs from `previous`
    fn restored_from(&mut self, previous: &Document) {
        let doc = self.history.current();
        for block in doc.blocks() {
            let changed = previous
                .get(&block.id)
                .is_some_and(|old| old.kind != block.kind || old.content != block.content);
            if changed {
                self.heights.invalidate(&block.id);
            }
        }

        self.heights.retain(doc);
        self.reconcile();
    }

    /// Drop state that points at blocks the current snapshot no longer has
    fn reconcile(&mut self) {
        let doc = self.history.current();
        self.selection.retain_existing(doc);

        if self.focused.as_deref().is_some_and(|id| !doc.contains(id)) {
            self.focused = None;
        }
    }

    // ---------------------------------------------------------------------
    // Block intents
    // ---------------------------------------------------------------------

    /// Enter: add an empty text block after `id` and focus it after render
    pub fn insert_block_after(&mut self, id: &str) -> Option<BlockId> {
        let new_id = self.fresh_id();
        let mutation = Mutation::InsertAfter {
            anchor_id: id.to_string(),
            block: Block::empty(new_id.clone()),
        };

        if !self.apply(mutation).is_committed() {
            return None;
        }

        self.effects.focus(new_id.clone());
        Some(new_id)
    }

    /// Append an empty text block and focus it after render
    pub fn append_block(&mut self) -> Option<BlockId> {
        let last = self.document().last().id.clone();
        self.insert_block_after(&last)
    }

    /// Backspace on an empty block. The only block is never removed.
    pub fn remove_block(&mut self, id: &str) -> bool {
        let doc = self.document();
        let Some(index) = doc.index_of(id) else {
            return false;
        };
        if doc.len() <= 1 {
            return false;
        }

        let previous = index.checked_sub(1).map(|i| doc.blocks()[i].id.clone());
        let fallback_id = self.fresh_id();
        let mutation = Mutation::Remove {
            ids: vec![id.to_string()],
            fallback_id,
        };

        if !self.apply(mutation).is_committed() {
            return false;
        }

        if let Some(previous) = previous {
            self.effects.focus(previous);
        }
        true
    }

    /// Delete every selected block and clear the selection
    pub fn delete_selection(&mut self) -> MutationResult {
        if self.selection.is_empty() {
            return MutationResult::Unchanged;
        }

        let ids = self.selection.in_document_order(self.document());
        let fallback_id = self.fresh_id();
        let result = self.apply(Mutation::Remove { ids, fallback_id });

        if result.is_committed() {
            self.selection.clear();
        }
        result
    }

    /// Replace the text of a block
    pub fn edit_content(&mut self, id: &str, content: impl Into<String>) -> MutationResult {
        self.apply(Mutation::Update {
            id: id.to_string(),
            patch: BlockPatch::content(content),
        })
    }

    pub fn set_block_kind(&mut self, id: &str, kind: BlockKind) -> MutationResult {
        self.apply(Mutation::Update {
            id: id.to_string(),
            patch: BlockPatch::kind(kind),
        })
    }

    /// Slash-command pick: change the block type, strip the typed command and
    /// refocus the block. `caret` is a char offset into the current content.
    pub fn apply_slash_command(&mut self, id: &str, kind: BlockKind, caret: usize) -> MutationResult {
        let Some(content) = self
            .document()
            .get(id)
            .map(|block| strip_slash_command(&block.content, caret))
        else {
            return self.set_block_kind(id, kind);
        };

        let result = self.apply(Mutation::Update {
            id: id.to_string(),
            patch: BlockPatch::kind(kind).with_content(content),
        });

        if !matches!(result, MutationResult::Rejected(_)) {
            self.effects.focus(id);
        }
        result
    }

    // ---------------------------------------------------------------------
    // Focus and navigation
    // ---------------------------------------------------------------------

    /// Host reports that `id` took focus
    pub fn focus_block(&mut self, id: &str) {
        if self.document().contains(id) {
            self.focused = Some(id.to_string());
        }
    }

    /// Host reports that no block has focus
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Arrow up: block before `id`
    pub fn focus_previous(&self, id: &str) -> Option<FocusRequest> {
        let index = self.document().index_of(id)?;
        let previous = self.document().blocks().get(index.checked_sub(1)?)?;
        Some(FocusRequest::at_end(previous.id.clone()))
    }

    /// Arrow down: block after `id`
    pub fn focus_next(&self, id: &str) -> Option<FocusRequest> {
        let index = self.document().index_of(id)?;
        let next = self.document().blocks().get(index + 1)?;
        Some(FocusRequest::at_end(next.id.clone()))
    }

    /// Click in the empty area below the last block.
    ///
    /// Focuses the last block right away when it is an empty text block.
    /// Otherwise appends one and returns `None`: the new block is focused by
    /// the next `run_post_effects`.
    pub fn click_below_content(&mut self) -> Option<FocusRequest> {
        let last = self.document().last();
        if last.is_text() && last.content.is_empty() {
            return Some(FocusRequest::at_end(last.id.clone()));
        }

        self.append_block();
        None
    }

    /// Click on a page's background: focus the block on that page closest to `y`
    pub fn click_page(&self, page_index: usize, y: f32, layout: &dyn BlockLayout) -> Option<FocusRequest> {
        let pages = self.pages();
        let page = pages.get(page_index)?;

        page.blocks(self.document())
            .iter()
            .filter_map(|block| {
                let rect = layout.block_rect(&block.id)?;
                Some((block, rect.vertical_distance(y)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(block, _)| FocusRequest::at_end(block.id.clone()))
    }

    // ---------------------------------------------------------------------
    // Rubber-band selection
    // ---------------------------------------------------------------------

    /// Pointer down. A press on the background clears the selection and
    /// starts a rubber band; anything else is left to the host.
    pub fn pointer_down(&mut self, point: Point, target: &PointerTarget) -> bool {
        if !self.rubber_band.begin(point, target) {
            return false;
        }

        self.selection.clear();
        true
    }

    /// Pointer move. Returns whether a rubber band is in progress.
    pub fn pointer_move(&mut self, point: Point, layout: &dyn BlockLayout) -> bool {
        let doc = self.history.current();
        match self.rubber_band.update(point, doc, layout) {
            Some(ids) => {
                self.selection.set(ids);
                true
            }
            None => false,
        }
    }

    /// Pointer up. The selection stays as it is.
    pub fn pointer_up(&mut self) {
        self.rubber_band.end();
    }

    pub fn rubber_band(&self) -> &RubberBand {
        &self.rubber_band
    }

    /// Replace the selection with the given ids that exist in the document
    pub fn select(&mut self, ids: impl IntoIterator<Item = BlockId>) {
        let doc = self.history.current();
        self.selection = ids.into_iter().filter(|id| doc.contains(id)).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---------------------------------------------------------------------
    // Drag and drop
    // ---------------------------------------------------------------------

    /// Start dragging from `id`'s handle and describe what is being dragged
    pub fn begin_drag(&mut self, id: &str) -> Option<DragPreview> {
        let doc = self.history.current();
        if !doc.contains(id) {
            return None;
        }

        let payload = self.drag.begin(id, &mut self.selection, doc);
        debug!(dragged = %id, count = payload.len(), "Drag started");
        Some(DragPreview::build(doc, &payload, self.config.drag_preview_limit))
    }

    pub fn drag_over(&mut self, target_id: &str, pointer_y: f32, layout: &dyn BlockLayout) -> Option<DropTarget> {
        self.drag.over(target_id, pointer_y, layout).cloned()
    }

    pub fn drag_leave(&mut self) {
        self.drag.leave();
    }

    /// Drop on the last drop target. The selection is cleared after a move.
    pub fn drop_drag(&mut self) -> MutationResult {
        let Some(mutation) = self.drag.drop(&self.selection, self.history.current()) else {
            return MutationResult::Unchanged;
        };

        let result = self.apply(mutation);
        if result.is_committed() {
            self.selection.clear();
        }
        result
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    // ---------------------------------------------------------------------
    // Clipboard
    // ---------------------------------------------------------------------

    /// Transport string for the selected blocks, if any are selected
    pub fn copy(&self) -> Option<String> {
        clipboard::copy_selection(self.document(), &self.selection)
    }

    /// Paste a transport or plain-text string
    pub fn paste(&mut self, text: &str) -> MutationResult {
        let Some(ClipboardPayload { source, blocks }) = clipboard::decode(text) else {
            return MutationResult::Unchanged;
        };

        let site = clipboard::resolve_site(self.document(), &self.selection, self.focused.as_deref());
        let blocks: Vec<Block> = blocks
            .into_iter()
            .map(|b| Block::new(self.fresh_id(), b.kind, b.content))
            .collect();

        debug!(
            ?source,
            count = blocks.len(),
            start = site.start,
            delete_count = site.delete_count,
            "Pasting"
        );

        self.apply(Mutation::ReplaceRange {
            start: site.start,
            delete_count: site.delete_count,
            blocks,
        })
    }

    // ---------------------------------------------------------------------
    // Layout feedback and pagination
    // ---------------------------------------------------------------------

    /// Host reports a block's rendered height. Returns whether the height map
    /// changed; a change schedules an overflow check.
    pub fn report_height(&mut self, id: &str, height: f32) -> bool {
        if !self.document().contains(id) {
            return false;
        }

        let changed = self.heights.record(id, height);
        if changed && self.config.view_mode == ViewMode::Paginated {
            self.effects.push(PostEffect::CheckOverflow);
        }
        changed
    }

    /// Report a batch of heights. Returns how many changed the height map.
    pub fn report_heights<'a>(&mut self, heights: impl IntoIterator<Item = (&'a str, f32)>) -> usize {
        heights
            .into_iter()
            .filter(|(id, height)| self.report_height(id, *height))
            .count()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.config.view_mode == mode {
            return;
        }

        info!(?mode, "View mode changed");
        self.config.view_mode = mode;
        if mode == ViewMode::Paginated {
            self.effects.push(PostEffect::CheckOverflow);
        }
    }

    /// Current page layout
    pub fn pages(&self) -> Vec<Page> {
        pagination::paginate(self.document(), &self.heights, self.config.page_limits())
    }

    /// Split the first overflowing block if it qualifies.
    /// Returns the id of the block created by the split.
    pub fn check_overflow(&mut self, layout: &dyn BlockLayout, measurer: &dyn TextMeasure) -> Option<BlockId> {
        if self.config.view_mode == ViewMode::Continuous {
            return None;
        }

        let plan = pagination::plan_split(
            self.document(),
            &self.heights,
            self.config.page_limits(),
            self.config.split_policy(),
            layout,
            measurer,
        )?;

        let new_id = self.fresh_id();
        let mutation = Mutation::Split {
            id: plan.block_id.clone(),
            at: plan.offset,
            new_id: new_id.clone(),
        };

        if !self.apply(mutation).is_committed() {
            return None;
        }

        info!(
            block_id = %plan.block_id,
            new_id = %new_id,
            offset = plan.offset,
            available = plan.available,
            "Split block across page break"
        );
        Some(new_id)
    }

    /// Run the effects queued before this call, after the host rendered.
    ///
    /// Returns the focus requests that still point at existing blocks. Effects
    /// queued while running (focus on a freshly split block) wait for the
    /// next call.
    pub fn run_post_effects(&mut self, layout: &dyn BlockLayout, measurer: &dyn TextMeasure) -> Vec<FocusRequest> {
        let mut requests = Vec::new();
        let mut follow_ups = Vec::new();

        for effect in self.effects.take() {
            match effect {
                PostEffect::Focus { block_id } => {
                    if self.document().contains(&block_id) {
                        requests.push(FocusRequest::at_end(block_id));
                    }
                }
                PostEffect::CheckOverflow => {
                    if let Some(new_id) = self.check_overflow(layout, measurer) {
                        follow_ups.push(PostEffect::Focus { block_id: new_id });
                    }
                }
            }
        }

        for effect in follow_ups {
            self.effects.push(effect);
        }
        requests
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

/// Remove the slash command being typed: from the last `/` before the caret
/// (a char offset) up to the caret. When there is none but the trimmed
/// content ends with `/`, everything from the last `/` is dropped.
pub fn strip_slash_command(content: &str, caret: usize) -> String {
    let before = char_prefix(content, caret);

    if let Some(slash) = before.rfind('/') {
        return format!("{}{}", &content[..slash], &content[before.len()..]);
    }

    if content.trim_end().ends_with('/') {
        if let Some(slash) = content.rfind('/') {
            return content[..slash].to_string();
        }
    }

    content.to_string()
}
