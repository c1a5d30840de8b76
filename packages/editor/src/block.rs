//! # Blocks
//!
//! The unit of content in a document. A block has an immutable id, a kind
//! and a plain-text body. Rendered height is not stored here:
//! it belongs to the host and is tracked separately by the pagination engine.

use serde::{Deserialize, Serialize};

/// Opaque block identifier, unique within a document
pub type BlockId = String;

/// Block kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "h1")]
    Heading1,
    #[serde(rename = "h2")]
    Heading2,
}

impl BlockKind {
    /// Wire tag used by the clipboard transport
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Heading1 => "h1",
            BlockKind::Heading2 => "h2",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(BlockKind::Text),
            "h1" => Some(BlockKind::Heading1),
            "h2" => Some(BlockKind::Heading2),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading1 | BlockKind::Heading2)
    }
}

/// A single content block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,

    #[serde(rename = "type")]
    pub kind: BlockKind,

    pub content: String,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
        }
    }

    /// Empty text block
    pub fn empty(id: impl Into<BlockId>) -> Self {
        Self::new(id, BlockKind::Text, "")
    }

    pub fn text(id: impl Into<BlockId>, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Text, content)
    }

    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }

    /// Text block whose content is empty or whitespace only
    pub fn is_blank_text(&self) -> bool {
        self.is_text() && self.content.trim().is_empty()
    }

    /// Content length in chars (split offsets are measured in chars)
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Apply a partial update, returning whether anything changed
    pub fn apply_patch(&mut self, patch: &BlockPatch) -> bool {
        let mut changed = false;

        if let Some(kind) = patch.kind {
            if kind != self.kind {
                self.kind = kind;
                changed = true;
            }
        }

        if let Some(content) = &patch.content {
            if *content != self.content {
                self.content = content.clone();
                changed = true;
            }
        }

        changed
    }
}

/// Partial block fields for `update`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl BlockPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            kind: None,
            content: Some(content.into()),
        }
    }

    pub fn kind(kind: BlockKind) -> Self {
        Self {
            kind: Some(kind),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.content.is_none()
    }
}

/// Byte index of the `char_offset`-th char, clamped to the end of `text`
pub(crate) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Prefix of `text` holding the first `char_offset` chars
pub(crate) fn char_prefix(text: &str, char_offset: usize) -> &str {
    &text[..byte_index(text, char_offset)]
}
