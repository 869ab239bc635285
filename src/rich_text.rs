// Flat editing policy
// Generic rich-text behaviors that assume a flat block list. The
// nested policy delegates here whenever nesting does not change the
// outcome.

use crate::block::BlockType;
use crate::editor_state::{ChangeType, EditorState};
use crate::modifier;
use crate::selection::SelectionState;
use crate::style::InlineStyle;

/// Type of the block holding the selection start
pub fn current_block_type(state: &EditorState) -> BlockType {
    state
        .content()
        .block(state.selection().start_key())
        .map(|block| block.block_type.clone())
        .unwrap_or(BlockType::Unstyled)
}

/// Toggle a block type over the selected blocks: setting it when the
/// current block differs, reverting to unstyled when it already
/// matches. Atomic blocks in the range make this a no-op.
pub fn toggle_block_type(state: &EditorState, block_type: BlockType) -> EditorState {
    let selection = *state.selection();
    let content = state.content();

    // A range ending at offset 0 of a block does not visually cover
    // that block; pull the end back to the block before it.
    let mut effective = SelectionState::range(
        selection.start_key(),
        selection.start_offset(),
        selection.end_key(),
        selection.end_offset(),
    );
    if effective.end_key() != effective.start_key() && effective.end_offset() == 0 {
        if let Some(before) = content.block_before(effective.end_key()) {
            effective = effective.with_focus(before.key, before.len());
        }
    }

    let Some(covered) = modifier::covered_blocks(content, &effective) else {
        return state.clone();
    };
    let has_atomic = covered.iter().any(|(key, _, _)| {
        content
            .block(*key)
            .is_some_and(|block| block.block_type == BlockType::Atomic)
    });
    if has_atomic {
        return state.clone();
    }

    let target = if current_block_type(state) == block_type {
        BlockType::Unstyled
    } else {
        block_type
    };
    match modifier::set_block_type(content, &effective, target) {
        Some(next) => EditorState::push(state, next, ChangeType::ChangeBlockType),
        None => state.clone(),
    }
}

/// Toggle an inline style for the selection. A collapsed selection
/// flips the pending override instead of touching document content; a
/// ranged one applies or removes the style over the range, judged by
/// the style at the selection start.
pub fn toggle_inline_style(state: &EditorState, style: InlineStyle) -> EditorState {
    let selection = *state.selection();
    let current = state.current_inline_style();

    if selection.is_collapsed() {
        return EditorState::set_inline_style_override(state, current.toggled(style));
    }

    let content = state.content();
    let next = if current.contains(style) {
        modifier::remove_inline_style(content, &selection, style)
    } else {
        modifier::apply_inline_style(content, &selection, style)
    };
    match next {
        Some(next) => EditorState::push(state, next, ChangeType::ChangeInlineStyle),
        None => state.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::document::ContentState;

    fn state_with(text: &str) -> EditorState {
        EditorState::new(ContentState::from_text(text))
    }

    #[test]
    fn test_toggle_block_type_sets_and_reverts() {
        let state = state_with("code");
        let key = state.content().roots()[0];
        let toggled = toggle_block_type(&state, BlockType::CodeBlock);
        assert_eq!(
            toggled.content().block(key).unwrap().block_type,
            BlockType::CodeBlock
        );
        assert_eq!(toggled.last_change_type(), Some(ChangeType::ChangeBlockType));

        let reverted = toggle_block_type(&toggled, BlockType::CodeBlock);
        assert_eq!(
            reverted.content().block(key).unwrap().block_type,
            BlockType::Unstyled
        );
    }

    #[test]
    fn test_toggle_block_type_refuses_atomic_in_range() {
        let mut content = ContentState::new();
        let a = content.add_block(Block::unstyled(0).with_plain_text("text"));
        let b = content.add_block(Block::new(0, BlockType::Atomic).with_plain_text(" "));
        let state = EditorState::new(content);
        let state =
            EditorState::force_selection(&state, SelectionState::range(a, 0, b, 1));
        let after = toggle_block_type(&state, BlockType::HeaderOne);
        assert_eq!(
            after.content().block(a).unwrap().block_type,
            BlockType::Unstyled
        );
        assert_eq!(
            after.content().block(b).unwrap().block_type,
            BlockType::Atomic
        );
    }

    #[test]
    fn test_toggle_block_type_trims_end_at_offset_zero() {
        let mut content = ContentState::new();
        let a = content.add_block(Block::unstyled(0).with_plain_text("one"));
        let b = content.add_block(Block::unstyled(0).with_plain_text("two"));
        let state = EditorState::new(content);
        let state =
            EditorState::force_selection(&state, SelectionState::range(a, 0, b, 0));
        let after = toggle_block_type(&state, BlockType::Blockquote);
        assert_eq!(
            after.content().block(a).unwrap().block_type,
            BlockType::Blockquote
        );
        // b sat at the range edge only; it keeps its type
        assert_eq!(
            after.content().block(b).unwrap().block_type,
            BlockType::Unstyled
        );
    }

    #[test]
    fn test_toggle_inline_style_collapsed_flips_override() {
        let state = state_with("hi");
        let toggled = toggle_inline_style(&state, InlineStyle::Bold);
        assert!(
            toggled
                .inline_style_override()
                .unwrap()
                .contains(InlineStyle::Bold)
        );
        // Content untouched
        let key = toggled.content().roots()[0];
        assert!(!toggled.content().block(key).unwrap().style_at(0).bold);

        let again = toggle_inline_style(&toggled, InlineStyle::Bold);
        assert!(!again.inline_style_override().unwrap().contains(InlineStyle::Bold));
    }

    #[test]
    fn test_toggle_inline_style_ranged_applies_then_removes() {
        let state = state_with("Hello");
        let key = state.content().roots()[0];
        let sel = SelectionState::range(key, 1, key, 4);
        let state = EditorState::force_selection(&state, sel);

        let bolded = toggle_inline_style(&state, InlineStyle::Bold);
        assert!(bolded.content().block(key).unwrap().style_at(1).bold);
        assert_eq!(
            bolded.last_change_type(),
            Some(ChangeType::ChangeInlineStyle)
        );

        let unbolded = toggle_inline_style(&bolded, InlineStyle::Bold);
        assert_eq!(
            unbolded.content().block(key).unwrap().chars(),
            state.content().block(key).unwrap().chars()
        );
    }
}
