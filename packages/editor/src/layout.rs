//! # Rendering Capabilities
//!
//! The engine never renders anything. It asks the host two questions:
//!
//! - [`BlockLayout`]: where is a rendered block, and how wide is its text area?
//! - [`TextMeasure`]: how tall would this string be at a given style and width?
//!
//! Both are synchronous and must be deterministic for a given render pass.

use std::collections::HashMap;

use blockdoc_common::Rect;

use crate::block::{Block, BlockId, BlockKind};

/// Registry of rendered blocks, keyed by id
pub trait BlockLayout {
    /// Bounding box of the rendered block in the selection container's space
    fn block_rect(&self, id: &str) -> Option<Rect>;

    /// Width available to the block's text (defaults to the box width)
    fn content_width(&self, id: &str) -> Option<f32> {
        self.block_rect(id).map(|rect| rect.width)
    }
}

/// Text style derived from the block kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub font_size: f32,

    /// Line height as a multiple of the font size
    pub line_height: f32,
}

impl TextStyle {
    pub fn for_kind(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => Self {
                font_size: 16.0,
                line_height: 1.625,
            },
            BlockKind::Heading1 => Self {
                font_size: 30.0,
                line_height: 1.2,
            },
            BlockKind::Heading2 => Self {
                font_size: 24.0,
                line_height: 1.25,
            },
        }
    }

    /// Height of a single line in pixels
    pub fn line_px(&self) -> f32 {
        self.font_size * self.line_height
    }
}

/// Text measurement capability: string, style, width → rendered height
pub trait TextMeasure {
    fn measure(&self, text: &str, style: TextStyle, width: f32) -> f32;

    /// Measure `text` as if it were the content of `block`
    fn measure_block_text(&self, block: &Block, text: &str, width: f32) -> f32 {
        self.measure(text, TextStyle::for_kind(block.kind), width)
    }
}

impl<F> TextMeasure for F
where
    F: Fn(&str, TextStyle, f32) -> f32,
{
    fn measure(&self, text: &str, style: TextStyle, width: f32) -> f32 {
        self(text, style, width)
    }
}

/// Explicit id → box registry filled by the host after each render pass
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    rects: HashMap<BlockId, Rect>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<BlockId>, rect: Rect) {
        self.rects.insert(id.into(), rect);
    }

    pub fn remove(&mut self, id: &str) -> Option<Rect> {
        self.rects.remove(id)
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Lay blocks out top to bottom in a single column using `heights`
    pub fn stacked<'a>(
        blocks: impl IntoIterator<Item = (&'a str, f32)>,
        origin_y: f32,
        width: f32,
    ) -> Self {
        let mut registry = Self::new();
        let mut y = origin_y;
        for (id, height) in blocks {
            registry.insert(id, Rect::new(0.0, y, width, height));
            y += height;
        }
        registry
    }
}

impl BlockLayout for LayoutRegistry {
    fn block_rect(&self, id: &str) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

/// Deterministic monospace wrapping measurer.
///
/// Every char advances by `char_width` em. Lines wrap at the width boundary and
/// at explicit newlines; empty text still occupies one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetrics {
    /// Advance of one char as a fraction of the font size
    pub char_width: f32,
}

impl FixedMetrics {
    pub fn new(char_width: f32) -> Self {
        Self { char_width }
    }

    /// How many chars fit on one line
    pub fn chars_per_line(&self, style: TextStyle, width: f32) -> usize {
        let advance = (style.font_size * self.char_width).max(f32::EPSILON);
        ((width / advance).floor() as usize).max(1)
    }

    /// Number of visual lines `text` wraps into
    pub fn line_count(&self, text: &str, style: TextStyle, width: f32) -> usize {
        let per_line = self.chars_per_line(style, width);
        text.split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum()
    }
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasure for FixedMetrics {
    fn measure(&self, text: &str, style: TextStyle, width: f32) -> f32 {
        self.line_count(text, style, width) as f32 * style.line_px()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_metrics_wraps_by_width() {
        let metrics = FixedMetrics::new(0.5);
        let style = TextStyle::for_kind(BlockKind::Text);

        // 16px font at 0.5em per char → 8px per char → 10 chars in 80px
        assert_eq!(metrics.chars_per_line(style, 80.0), 10);
        assert_eq!(metrics.line_count("", style, 80.0), 1);
        assert_eq!(metrics.line_count("0123456789", style, 80.0), 1);
        assert_eq!(metrics.line_count("0123456789a", style, 80.0), 2);
        assert_eq!(metrics.line_count("ab\ncd", style, 80.0), 2);
        assert_eq!(metrics.measure("0123456789a", style, 80.0), 52.0);
    }

    #[test]
    fn test_closures_are_measurers() {
        let measurer = |text: &str, _style: TextStyle, _width: f32| text.len() as f32;
        let block = Block::text("a", "");
        assert_eq!(measurer.measure_block_text(&block, "abcd", 100.0), 4.0);
    }

    #[test]
    fn test_stacked_registry() {
        let registry = LayoutRegistry::stacked([("a", 20.0), ("b", 30.0)], 10.0, 300.0);
        assert_eq!(registry.block_rect("a"), Some(Rect::new(0.0, 10.0, 300.0, 20.0)));
        assert_eq!(registry.block_rect("b"), Some(Rect::new(0.0, 30.0, 300.0, 30.0)));
        assert_eq!(registry.content_width("b"), Some(300.0));
        assert_eq!(registry.block_rect("c"), None);
    }
}
