// Content-mutator primitives
// Each operation takes a ContentState + SelectionState and returns the
// next ContentState, or None when it does not apply (the caller treats
// None as a no-op). Tree invariants hold after every operation; the
// nesting-specific guards live a layer up, in the nested policy.

use crate::block::{Block, BlockKey, BlockType, CharacterMetadata, EntityKey};
use crate::document::ContentState;
use crate::selection::SelectionState;
use crate::style::{InlineStyle, StyleSet};

/// Insert text at a collapsed selection. Every inserted character
/// carries the given style set and entity reference.
pub fn insert_text(
    content: &ContentState,
    selection: &SelectionState,
    text: &str,
    style: StyleSet,
    entity: Option<EntityKey>,
) -> Option<ContentState> {
    if !selection.is_collapsed() || text.is_empty() {
        return None;
    }
    let key = selection.start_key();
    content.block(key)?;

    let mut next = content.clone();
    let offset = selection.start_offset();
    next.block_mut(key)?.insert_text(offset, text, style, entity);
    next.set_selection_before(*selection);
    next.set_selection_after(SelectionState::collapsed(
        key,
        offset + text.chars().count(),
    ));
    Some(next)
}

/// Remove the selected range. Within one block this trims characters;
/// across blocks the leading block keeps its identity and absorbs the
/// trailing block's remainder. An atomic block touched by the range is
/// always removed whole, never trimmed.
pub fn remove_range(content: &ContentState, selection: &SelectionState) -> Option<ContentState> {
    if selection.is_collapsed() {
        return None;
    }
    let order = content.document_order();
    let mut start_key = selection.start_key();
    let mut start_offset = selection.start_offset();
    let mut end_key = selection.end_key();
    let mut end_offset = selection.end_offset();
    let mut start_pos = order.iter().position(|k| *k == start_key)?;
    let mut end_pos = order.iter().position(|k| *k == end_key)?;
    // The backward flag is advisory; trust document order
    if start_pos > end_pos {
        std::mem::swap(&mut start_key, &mut end_key);
        std::mem::swap(&mut start_offset, &mut end_offset);
        std::mem::swap(&mut start_pos, &mut end_pos);
    }

    let mut next = content.clone();
    next.set_selection_before(*selection);

    if start_key == end_key {
        let block = content.block(start_key)?;
        if block.block_type == BlockType::Atomic {
            let caret = caret_after_removal(content, &order, start_pos, start_pos);
            next.remove_block_and_promote(start_key);
            let caret = ensure_caret(&mut next, caret);
            next.set_selection_after(caret);
            return Some(next);
        }
        if start_offset >= end_offset {
            return None;
        }
        next.block_mut(start_key)?.remove_text(start_offset, end_offset);
        next.set_selection_after(SelectionState::collapsed(start_key, start_offset));
        return Some(next);
    }

    let start_atomic = content.block(start_key)?.block_type == BlockType::Atomic;
    let end_atomic = content.block(end_key)?.block_type == BlockType::Atomic;

    // Blocks strictly inside the range disappear entirely
    for key in &order[start_pos + 1..end_pos] {
        next.remove_block_and_promote(*key);
    }

    let caret = if start_atomic {
        next.remove_block_and_promote(start_key);
        if end_atomic {
            let caret = caret_after_removal(content, &order, start_pos, end_pos);
            next.remove_block_and_promote(end_key);
            caret
        } else {
            next.block_mut(end_key)?.remove_text(0, end_offset);
            Some(SelectionState::collapsed(end_key, 0))
        }
    } else {
        {
            let start_block = next.block_mut(start_key)?;
            let len = start_block.len();
            start_block.remove_text(start_offset, len);
        }
        if end_atomic {
            next.remove_block_and_promote(end_key);
        } else {
            let mut tail = content.block(end_key)?.clone();
            tail.remove_text(0, end_offset);
            next.block_mut(start_key)?.append_content(&tail);
            next.remove_block_and_promote(end_key);
        }
        Some(SelectionState::collapsed(start_key, start_offset))
    };

    let caret = ensure_caret(&mut next, caret);
    next.set_selection_after(caret);
    Some(next)
}

/// Apply an inline style to every character in the selected range
pub fn apply_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: InlineStyle,
) -> Option<ContentState> {
    update_range_chars(content, selection, |meta| {
        meta.style = meta.style.with(style);
    })
}

/// Remove an inline style from every character in the selected range
pub fn remove_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: InlineStyle,
) -> Option<ContentState> {
    update_range_chars(content, selection, |meta| {
        meta.style = meta.style.without(style);
    })
}

/// Point every character in the selected range at the given entity,
/// or clear the reference when `entity` is None
pub fn apply_entity(
    content: &ContentState,
    selection: &SelectionState,
    entity: Option<EntityKey>,
) -> Option<ContentState> {
    update_range_chars(content, selection, |meta| {
        meta.entity = entity;
    })
}

/// Set the type of every block covered by the selection. Depth is
/// cleared when a block leaves the list family.
pub fn set_block_type(
    content: &ContentState,
    selection: &SelectionState,
    block_type: BlockType,
) -> Option<ContentState> {
    let covered = covered_blocks(content, selection)?;
    let mut next = content.clone();
    let mut changed = false;
    for (key, _, _) in covered {
        let block = next.block_mut(key)?;
        if block.block_type != block_type {
            block.block_type = block_type.clone();
            changed = true;
        }
        if !block.block_type.is_list_item() && block.depth != 0 {
            block.depth = 0;
            changed = true;
        }
    }
    if !changed {
        return None;
    }
    next.set_selection_before(*selection);
    next.set_selection_after(*selection);
    Some(next)
}

/// Blocks covered by a selection, with the char range covered in each:
/// (key, start offset, end offset)
pub(crate) fn covered_blocks(
    content: &ContentState,
    selection: &SelectionState,
) -> Option<Vec<(BlockKey, usize, usize)>> {
    let order = content.document_order();
    let mut start_key = selection.start_key();
    let mut start_offset = selection.start_offset();
    let mut end_key = selection.end_key();
    let mut end_offset = selection.end_offset();
    let mut start_pos = order.iter().position(|k| *k == start_key)?;
    let mut end_pos = order.iter().position(|k| *k == end_key)?;
    if start_pos > end_pos {
        std::mem::swap(&mut start_key, &mut end_key);
        std::mem::swap(&mut start_offset, &mut end_offset);
        std::mem::swap(&mut start_pos, &mut end_pos);
    }

    let mut covered = Vec::with_capacity(end_pos - start_pos + 1);
    for (pos, key) in order[start_pos..=end_pos].iter().enumerate() {
        let block = content.block(*key)?;
        let from = if pos == 0 { start_offset } else { 0 };
        let to = if start_pos + pos == end_pos {
            end_offset
        } else {
            block.len()
        };
        covered.push((*key, from.min(block.len()), to.min(block.len())));
    }
    Some(covered)
}

fn update_range_chars<F>(
    content: &ContentState,
    selection: &SelectionState,
    mut update: F,
) -> Option<ContentState>
where
    F: FnMut(&mut CharacterMetadata),
{
    if selection.is_collapsed() {
        return None;
    }
    let covered = covered_blocks(content, selection)?;
    let mut next = content.clone();
    let mut changed = false;
    for (key, from, to) in covered {
        let block = next.block_mut(key)?;
        block.update_chars(from, to, |meta| {
            let before = *meta;
            update(meta);
            if *meta != before {
                changed = true;
            }
        });
    }
    if !changed {
        return None;
    }
    next.set_selection_before(*selection);
    next.set_selection_after(*selection);
    Some(next)
}

/// Caret position that survives removing the order slice
/// [start_pos..=end_pos]: end of the preceding block, start of the
/// following one, or nothing if the document empties out.
fn caret_after_removal(
    content: &ContentState,
    order: &[BlockKey],
    start_pos: usize,
    end_pos: usize,
) -> Option<SelectionState> {
    if start_pos > 0 {
        let key = order[start_pos - 1];
        let block = content.block(key)?;
        return Some(SelectionState::collapsed(key, block.len()));
    }
    order
        .get(end_pos + 1)
        .map(|key| SelectionState::collapsed(*key, 0))
}

/// A document must never end up with nowhere to put the caret
fn ensure_caret(content: &mut ContentState, caret: Option<SelectionState>) -> SelectionState {
    match caret {
        Some(caret) if content.block(caret.anchor_key).is_some() => caret,
        _ => {
            if content.is_empty() {
                let key = content.add_block(Block::unstyled(0));
                SelectionState::collapsed(key, 0)
            } else {
                SelectionState::collapsed(content.roots()[0], 0)
            }
        }
    }
}
