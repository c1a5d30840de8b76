//! # Clipboard Codec
//!
//! Transport format for copy/paste: a JSON array of `{ "type", "content" }`
//! objects. Ids never travel; pasted blocks always get fresh ones.
//!
//! Anything that is not a non-empty array of objects with a string `content`
//! is treated as plain text, one block per non-blank line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{Block, BlockKind};
use crate::document::Document;
use crate::selection::Selection;

/// One block as carried by the clipboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: String,
}

impl From<&Block> for ClipboardBlock {
    fn from(block: &Block) -> Self {
        Self {
            kind: block.kind,
            content: block.content.clone(),
        }
    }
}

/// How a paste payload was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteSource {
    /// The engine's own block format
    Structured,

    /// Plain text split into lines
    PlainText,
}

/// Decoded paste payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub source: PasteSource,
    pub blocks: Vec<ClipboardBlock>,
}

/// Encode blocks (in the given order) to the transport string
pub fn encode<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> String {
    let payload: Vec<ClipboardBlock> = blocks.into_iter().map(ClipboardBlock::from).collect();
    serde_json::to_string(&payload).unwrap_or_else(|_| "[]".to_string())
}

/// Encode the selected blocks of `doc` in document order.
/// Returns `None` when nothing is selected.
pub fn copy_selection(doc: &Document, selection: &Selection) -> Option<String> {
    if selection.is_empty() {
        return None;
    }

    let blocks = doc.blocks().iter().filter(|b| selection.contains(&b.id));
    Some(encode(blocks))
}

/// Decode a transport string. Returns `None` when there is nothing to paste.
pub fn decode(text: &str) -> Option<ClipboardPayload> {
    if let Some(blocks) = decode_structured(text) {
        return Some(ClipboardPayload {
            source: PasteSource::Structured,
            blocks,
        });
    }

    let blocks = decode_plain_text(text);
    if blocks.is_empty() {
        None
    } else {
        Some(ClipboardPayload {
            source: PasteSource::PlainText,
            blocks,
        })
    }
}

/// Structured decode: a non-empty array of objects each carrying a string
/// `content`. Unknown or missing `type` tags fall back to text.
fn decode_structured(text: &str) -> Option<Vec<ClipboardBlock>> {
    let value: Value = serde_json::from_str(text).ok()?;
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }

    items
        .iter()
        .map(|item| {
            let object = item.as_object()?;
            let content = object.get("content")?.as_str()?;
            let kind = object
                .get("type")
                .and_then(Value::as_str)
                .and_then(BlockKind::from_tag)
                .unwrap_or_default();

            Some(ClipboardBlock {
                kind,
                content: content.to_string(),
            })
        })
        .collect()
}

/// Plain-text decode: one text block per line that is not blank
fn decode_plain_text(text: &str) -> Vec<ClipboardBlock> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| ClipboardBlock {
            kind: BlockKind::Text,
            content: line.to_string(),
        })
        .collect()
}

/// Where pasted blocks go, as a splice over the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteSite {
    pub start: usize,
    pub delete_count: usize,
}

/// Resolve the paste site.
///
/// Priority: after the last selected block; else replace a focused blank text
/// block or insert after the focused block; else append.
pub fn resolve_site(doc: &Document, selection: &Selection, focused: Option<&str>) -> PasteSite {
    if let Some(last) = selection.last_index(doc) {
        return PasteSite {
            start: last + 1,
            delete_count: 0,
        };
    }

    if let Some(index) = focused.and_then(|id| doc.index_of(id)) {
        let replace = doc.blocks()[index].is_blank_text();
        return PasteSite {
            start: if replace { index } else { index + 1 },
            delete_count: usize::from(replace),
        };
    }

    PasteSite {
        start: doc.len(),
        delete_count: 0,
    }
}
