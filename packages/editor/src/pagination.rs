//! # Pagination Engine
//!
//! Derives page boundaries from a document and measured block heights, and
//! finds where an oversized text block should be split across a page break.
//!
//! ## Page assignment
//!
//! Greedy first-fit over the blocks in order. A block that would push the
//! current page past its budget starts a new page, unless the current page is
//! still empty (an oversized block then sits alone on an overfull page).
//! The first page has a smaller budget to leave room for the title.
//!
//! ## Overflow split
//!
//! The same walk, stopping at the first block that would overflow. A text
//! block taller than the space left on its page (and with more than a minimum
//! usable amount left) is split at the largest char offset whose prefix still
//! fits, found by binary search over an injected text measurer.
//!
//! Pages are never stored: they are recomputed from
//! `(document, heights, limits)` whenever needed, so the same inputs always
//! give the same pages.

use std::collections::HashMap;
use std::ops::Range;

use tracing::debug;

use crate::block::{char_prefix, Block, BlockId, BlockKind};
use crate::document::Document;
use crate::layout::{BlockLayout, TextMeasure};

/// Height budgets for pages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLimits {
    /// Content height of every page after the first
    pub page_height: f32,

    /// Content height of the first page (page height minus the title area)
    pub first_page_height: f32,
}

impl PageLimits {
    pub fn new(page_height: f32, first_page_height: f32) -> Self {
        Self {
            page_height,
            first_page_height,
        }
    }

    /// Budgets for a page of `page_height` with `title_height` reserved on page one
    pub fn with_title(page_height: f32, title_height: f32) -> Self {
        Self::new(page_height, (page_height - title_height).max(0.0))
    }

    /// One page of unlimited height (continuous mode)
    pub fn unbounded() -> Self {
        Self::new(f32::INFINITY, f32::INFINITY)
    }

    pub fn limit_for(&self, page_index: usize) -> f32 {
        if page_index == 0 {
            self.first_page_height
        } else {
            self.page_height
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.page_height.is_infinite() && self.first_page_height.is_infinite()
    }
}

/// Last measured heights, keyed by block id
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    heights: HashMap<BlockId, f32>,

    /// Estimate for blocks that have not been measured yet
    default_height: f32,

    /// Changes smaller than this are treated as render jitter
    epsilon: f32,
}

impl HeightMap {
    pub fn new(default_height: f32, epsilon: f32) -> Self {
        Self {
            heights: HashMap::new(),
            default_height,
            epsilon,
        }
    }

    /// Height of `id`, or the default estimate
    pub fn get(&self, id: &str) -> f32 {
        self.heights.get(id).copied().unwrap_or(self.default_height)
    }

    /// Measured height of `id`, if any
    pub fn measured(&self, id: &str) -> Option<f32> {
        self.heights.get(id).copied()
    }

    /// Record a measurement. Returns false when it is within `epsilon` of the
    /// previous value (a block never measured counts as 0).
    pub fn record(&mut self, id: &str, height: f32) -> bool {
        let previous = self.heights.get(id).copied().unwrap_or(0.0);
        if (previous - height).abs() < self.epsilon {
            return false;
        }

        self.heights.insert(id.to_string(), height);
        true
    }

    /// Forget the measurement for `id` (its content or kind changed)
    pub fn invalidate(&mut self, id: &str) -> bool {
        self.heights.remove(id).is_some()
    }

    /// Forget measurements of blocks no longer in `doc`
    pub fn retain(&mut self, doc: &Document) {
        self.heights.retain(|id, _| doc.contains(id));
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn default_height(&self) -> f32 {
        self.default_height
    }
}

impl Default for HeightMap {
    fn default() -> Self {
        Self::new(24.0, 2.0)
    }
}

/// A contiguous run of blocks rendered on one page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,

    /// Block indices in the document
    pub range: Range<usize>,

    /// Sum of the block heights on this page
    pub height: f32,
}

impl Page {
    pub fn blocks<'a>(&self, doc: &'a Document) -> &'a [Block] {
        &doc.blocks()[self.range.clone()]
    }

    pub fn block_ids<'a>(&self, doc: &'a Document) -> impl Iterator<Item = &'a BlockId> {
        self.blocks(doc).iter().map(|b| &b.id)
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Greedy page walk shared by assignment and overflow detection
struct PageWalk {
    limits: PageLimits,
    page_index: usize,
    used: f32,
    count: usize,
}

impl PageWalk {
    fn new(limits: PageLimits) -> Self {
        Self {
            limits,
            page_index: 0,
            used: 0.0,
            count: 0,
        }
    }

    fn remaining(&self) -> f32 {
        self.limits.limit_for(self.page_index) - self.used
    }

    fn would_overflow(&self, height: f32) -> bool {
        self.used + height > self.limits.limit_for(self.page_index)
    }

    /// Whether a block of `height` must move to a new page
    fn breaks_before(&self, height: f32) -> bool {
        self.would_overflow(height) && self.count > 0
    }

    fn next_page(&mut self) {
        self.page_index += 1;
        self.used = 0.0;
        self.count = 0;
    }

    /// Place a block, returning true when it opened a new page
    fn place(&mut self, height: f32) -> bool {
        let breaks = self.breaks_before(height);
        if breaks {
            self.next_page();
        }

        self.used += height;
        self.count += 1;
        breaks
    }
}

/// Assign blocks to pages
pub fn paginate(doc: &Document, heights: &HeightMap, limits: PageLimits) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut walk = PageWalk::new(limits);
    let mut start = 0;
    let mut page_height = 0.0;

    for (index, block) in doc.blocks().iter().enumerate() {
        let height = heights.get(&block.id);
        if walk.place(height) {
            pages.push(Page {
                index: pages.len(),
                range: start..index,
                height: page_height,
            });
            start = index;
            page_height = 0.0;
        }
        page_height += height;
    }

    if start < doc.len() {
        pages.push(Page {
            index: pages.len(),
            range: start..doc.len(),
            height: page_height,
        });
    }

    pages
}

/// Thresholds for splitting a block across a page break
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPolicy {
    /// Remaining page space must exceed this for a split to be worth it
    pub min_split_space: f32,

    /// Both halves must keep more than this many chars
    pub margin_chars: usize,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            min_split_space: 50.0,
            margin_chars: 5,
        }
    }
}

/// A block that overflows its page and qualifies for splitting
#[derive(Debug, Clone, PartialEq)]
pub struct SplitCandidate {
    pub block_id: BlockId,

    /// Page the block starts on
    pub page_index: usize,

    /// Space left on that page: the target height for the first half
    pub available: f32,

    /// Full height of the block
    pub height: f32,
}

/// Find the first overflowing text block that should be split.
///
/// Blocks that overflow without qualifying (headings, too little room left,
/// or a block that is not taller than the room left) are deferred whole to
/// the next page, where they are checked once more against a full page, and
/// the walk continues.
pub fn find_overflow(
    doc: &Document,
    heights: &HeightMap,
    limits: PageLimits,
    min_split_space: f32,
) -> Option<SplitCandidate> {
    let mut walk = PageWalk::new(limits);

    let qualifies = |block: &Block, walk: &PageWalk, height: f32| {
        let available = walk.remaining();
        (block.kind == BlockKind::Text && available > min_split_space && height > available).then(|| {
            SplitCandidate {
                block_id: block.id.clone(),
                page_index: walk.page_index,
                available,
                height,
            }
        })
    };

    for block in doc.blocks() {
        let height = heights.get(&block.id);

        if walk.would_overflow(height) {
            if let Some(candidate) = qualifies(block, &walk, height) {
                return Some(candidate);
            }

            if walk.breaks_before(height) {
                walk.next_page();
                if walk.would_overflow(height) {
                    if let Some(candidate) = qualifies(block, &walk, height) {
                        return Some(candidate);
                    }
                }
            }
        }

        walk.place(height);
    }

    None
}

/// Largest char offset in `0..=len` whose prefix measures at most `target`.
///
/// Returns `None` when not even the empty prefix fits. Assumes `measure` is
/// monotonic in prefix length.
pub fn find_split_offset(content: &str, target: f32, measure: impl Fn(&str) -> f32) -> Option<usize> {
    let len = content.chars().count();
    let mut low = 0usize;
    let mut high = len;
    let mut best = None;

    while low <= high {
        let mid = low + (high - low) / 2;
        if measure(char_prefix(content, mid)) <= target {
            best = Some(mid);
            low = mid + 1;
        } else if mid == 0 {
            break;
        } else {
            high = mid - 1;
        }
    }

    best
}

/// A split ready to be applied
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    pub block_id: BlockId,

    /// Char offset of the split
    pub offset: usize,

    /// Height the first half had to fit in
    pub available: f32,
}

/// Detect an overflow and compute where to split it.
///
/// Returns `None` when nothing overflows, when the candidate is not rendered
/// (no width to measure at), or when the split would leave a fragment of
/// `margin_chars` chars or fewer on either side.
pub fn plan_split(
    doc: &Document,
    heights: &HeightMap,
    limits: PageLimits,
    policy: SplitPolicy,
    layout: &dyn BlockLayout,
    measurer: &dyn TextMeasure,
) -> Option<SplitPlan> {
    let candidate = find_overflow(doc, heights, limits, policy.min_split_space)?;
    let block = doc.get(&candidate.block_id)?;
    let width = layout.content_width(&block.id)?;

    let offset = find_split_offset(&block.content, candidate.available, |prefix| {
        measurer.measure_block_text(block, prefix, width)
    })?;

    let len = block.char_len();
    let keeps_margin = offset > policy.margin_chars && offset < len.saturating_sub(policy.margin_chars);

    debug!(
        block_id = %block.id,
        available = candidate.available,
        offset,
        len,
        keeps_margin,
        "Split search finished"
    );

    keeps_margin.then(|| SplitPlan {
        block_id: candidate.block_id,
        offset,
        available: candidate.available,
    })
}
