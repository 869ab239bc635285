// Blocks: the nodes of the document tree
// A block owns its text plus one metadata record per character; the
// parent/children/sibling fields are key-based links into the arena,
// never owning pointers.

use crate::style::StyleSet;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Unique identifier for a block within a ContentState
pub type BlockKey = usize;

/// Unique identifier for an entity within a ContentState
pub type EntityKey = usize;

/// Block-level content types. Open via the `Custom` variant so
/// embedding applications can register their own tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    Blockquote,
    CodeBlock,
    Atomic,
    UnorderedListItem,
    OrderedListItem,
    Custom(String),
}

impl BlockType {
    pub fn name(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::Atomic => "atomic",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Custom(name) => name,
        }
    }

    /// Depth is only meaningful for these types
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockType::UnorderedListItem | BlockType::OrderedListItem
        )
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "unstyled" => BlockType::Unstyled,
            "header-one" => BlockType::HeaderOne,
            "header-two" => BlockType::HeaderTwo,
            "header-three" => BlockType::HeaderThree,
            "blockquote" => BlockType::Blockquote,
            "code-block" => BlockType::CodeBlock,
            "atomic" => BlockType::Atomic,
            "unordered-list-item" => BlockType::UnorderedListItem,
            "ordered-list-item" => BlockType::OrderedListItem,
            _ => BlockType::Custom(name),
        }
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.name().to_string()
    }
}

/// Per-character annotation: the styles a character carries and the
/// entity (if any) it references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterMetadata {
    pub style: StyleSet,
    pub entity: Option<EntityKey>,
}

impl CharacterMetadata {
    pub fn new(style: StyleSet, entity: Option<EntityKey>) -> Self {
        CharacterMetadata { style, entity }
    }
}

/// A block of content. Text offsets throughout the crate are char
/// offsets, so `chars` always has one entry per char of `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub key: BlockKey,
    pub block_type: BlockType,
    pub depth: usize,
    text: String,
    chars: Vec<CharacterMetadata>,
    pub parent: Option<BlockKey>,
    pub children: Vec<BlockKey>,
    pub prev_sibling: Option<BlockKey>,
    pub next_sibling: Option<BlockKey>,
}

impl Block {
    pub fn new(key: BlockKey, block_type: BlockType) -> Self {
        Block {
            key,
            block_type,
            depth: 0,
            text: String::new(),
            chars: Vec::new(),
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
            next_sibling: None,
        }
    }

    pub fn unstyled(key: BlockKey) -> Self {
        Self::new(key, BlockType::Unstyled)
    }

    pub fn with_text(mut self, text: impl Into<String>, style: StyleSet) -> Self {
        let text = text.into();
        self.chars.extend(
            text.chars()
                .map(|_| CharacterMetadata::new(style, None)),
        );
        self.text.push_str(&text);
        self
    }

    pub fn with_plain_text(self, text: impl Into<String>) -> Self {
        self.with_text(text, StyleSet::plain())
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[CharacterMetadata] {
        &self.chars
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Style set carried by the character at the given offset
    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.chars
            .get(offset)
            .map(|c| c.style)
            .unwrap_or_default()
    }

    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.chars.get(offset).and_then(|c| c.entity)
    }

    /// Insert text at a char offset, each inserted character carrying
    /// the given style and entity reference
    pub fn insert_text(
        &mut self,
        offset: usize,
        text: &str,
        style: StyleSet,
        entity: Option<EntityKey>,
    ) {
        let offset = offset.min(self.chars.len());
        let byte = self.byte_index(offset);
        self.text.insert_str(byte, text);
        let metadata = text
            .chars()
            .map(|_| CharacterMetadata::new(style, entity))
            .collect::<Vec<_>>();
        self.chars.splice(offset..offset, metadata);
    }

    /// Remove the char range [start..end)
    pub fn remove_text(&mut self, start: usize, end: usize) {
        let start = start.min(self.chars.len());
        let end = end.min(self.chars.len());
        if start >= end {
            return;
        }
        let byte_start = self.byte_index(start);
        let byte_end = self.byte_index(end);
        self.text.drain(byte_start..byte_end);
        self.chars.drain(start..end);
    }

    /// Append another block's text and character metadata
    pub fn append_content(&mut self, other: &Block) {
        self.text.push_str(&other.text);
        self.chars.extend_from_slice(&other.chars);
    }

    /// Apply an update to the metadata of every character in [start..end)
    pub fn update_chars<F>(&mut self, start: usize, end: usize, mut update: F)
    where
        F: FnMut(&mut CharacterMetadata),
    {
        let start = start.min(self.chars.len());
        let end = end.min(self.chars.len());
        // An inverted range covers nothing
        if start >= end {
            return;
        }
        for meta in &mut self.chars[start..end] {
            update(meta);
        }
    }

    /// Contiguous runs of characters referencing the same entity,
    /// in document order
    pub fn entity_ranges(&self) -> Vec<(EntityKey, Range<usize>)> {
        let mut ranges: Vec<(EntityKey, Range<usize>)> = Vec::new();
        for (offset, meta) in self.chars.iter().enumerate() {
            let Some(entity) = meta.entity else {
                continue;
            };
            match ranges.last_mut() {
                Some((last, range)) if *last == entity && range.end == offset => {
                    range.end = offset + 1;
                }
                _ => ranges.push((entity, offset..offset + 1)),
            }
        }
        ranges
    }

    fn byte_index(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::InlineStyle;

    #[test]
    fn test_block_type_names_round_trip() {
        for block_type in [
            BlockType::Unstyled,
            BlockType::CodeBlock,
            BlockType::Atomic,
            BlockType::UnorderedListItem,
            BlockType::Custom("callout".to_string()),
        ] {
            let name = String::from(block_type.clone());
            assert_eq!(BlockType::from(name), block_type);
        }
    }

    #[test]
    fn test_insert_and_remove_text() {
        let mut block = Block::unstyled(1).with_plain_text("Hello");
        block.insert_text(5, " world", StyleSet::bold(), None);
        assert_eq!(block.text(), "Hello world");
        assert_eq!(block.len(), 11);
        assert!(block.style_at(7).bold);
        assert!(!block.style_at(2).bold);

        block.remove_text(5, 11);
        assert_eq!(block.text(), "Hello");
        assert_eq!(block.len(), 5);
    }

    #[test]
    fn test_char_offsets_are_not_byte_offsets() {
        let mut block = Block::unstyled(1).with_plain_text("héllo");
        assert_eq!(block.len(), 5);
        block.remove_text(1, 2);
        assert_eq!(block.text(), "hllo");
    }

    #[test]
    fn test_update_chars() {
        let mut block = Block::unstyled(1).with_plain_text("Hello");
        block.update_chars(1, 4, |meta| {
            meta.style = meta.style.with(InlineStyle::Bold);
        });
        assert!(!block.style_at(0).bold);
        assert!(block.style_at(1).bold);
        assert!(block.style_at(3).bold);
        assert!(!block.style_at(4).bold);
    }

    #[test]
    fn test_update_chars_inverted_range_is_a_no_op() {
        let mut block = Block::unstyled(1).with_plain_text("Hello");
        let before = block.chars().to_vec();
        block.update_chars(4, 2, |meta| {
            meta.style = meta.style.with(InlineStyle::Bold);
        });
        assert_eq!(block.chars(), &before[..]);
    }

    #[test]
    fn test_entity_ranges() {
        let mut block = Block::unstyled(1).with_plain_text("a link here");
        block.update_chars(2, 6, |meta| meta.entity = Some(7));
        block.update_chars(7, 11, |meta| meta.entity = Some(9));
        assert_eq!(block.entity_ranges(), vec![(7, 2..6), (9, 7..11)]);
    }
}
