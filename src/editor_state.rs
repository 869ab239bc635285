// EditorState: one committed snapshot of document + selection
// States are never mutated; every edit produces a successor via push()
// and the surrounding application keeps the history of prior states.

use crate::document::ContentState;
use crate::selection::SelectionState;
use crate::style::StyleSet;

/// Label committed alongside a new state, describing the edit kind.
/// Consumed by history management outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    InsertCharacters,
    RemoveRange,
    ChangeBlockType,
    ChangeInlineStyle,
    ApplyEntity,
    AdjustDepth,
}

impl ChangeType {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeType::InsertCharacters => "insert-characters",
            ChangeType::RemoveRange => "remove-range",
            ChangeType::ChangeBlockType => "change-block-type",
            ChangeType::ChangeInlineStyle => "change-inline-style",
            ChangeType::ApplyEntity => "apply-entity",
            ChangeType::AdjustDepth => "adjust-depth",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    content: ContentState,
    selection: SelectionState,
    inline_style_override: Option<StyleSet>,
    last_change_type: Option<ChangeType>,
}

impl EditorState {
    /// Wrap a document in a fresh state with the caret at its start.
    /// An empty document gets a single empty unstyled block so the
    /// caret always has somewhere to live.
    pub fn new(mut content: ContentState) -> Self {
        if content.is_empty() {
            content.add_block(crate::block::Block::unstyled(0));
        }
        let first = content.roots()[0];
        EditorState {
            content,
            selection: SelectionState::collapsed(first, 0),
            inline_style_override: None,
            last_change_type: None,
        }
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn inline_style_override(&self) -> Option<StyleSet> {
        self.inline_style_override
    }

    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change_type
    }

    /// Commit a new document version. The new selection is the
    /// content's recorded selection-after, falling back to the
    /// previous selection. Clears any pending style override.
    pub fn push(previous: &EditorState, content: ContentState, change_type: ChangeType) -> Self {
        let selection = content.selection_after().unwrap_or(previous.selection);
        EditorState {
            content,
            selection,
            inline_style_override: None,
            last_change_type: Some(change_type),
        }
    }

    /// Replace the selection without committing new content. Not a
    /// history entry: the change-type label stays what it was.
    pub fn force_selection(previous: &EditorState, selection: SelectionState) -> Self {
        EditorState {
            content: previous.content.clone(),
            selection,
            inline_style_override: previous.inline_style_override,
            last_change_type: previous.last_change_type,
        }
    }

    /// Set the style override governing the next inserted character
    pub fn set_inline_style_override(previous: &EditorState, style: StyleSet) -> Self {
        EditorState {
            content: previous.content.clone(),
            selection: previous.selection,
            inline_style_override: Some(style),
            last_change_type: previous.last_change_type,
        }
    }

    /// The style that applies at the current selection: the pending
    /// override if set, otherwise the style carried by the document at
    /// the selection's start (for a caret, the character before it).
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style) = self.inline_style_override {
            return style;
        }
        let Some(block) = self.content.block(self.selection.start_key()) else {
            return StyleSet::plain();
        };
        let offset = self.selection.start_offset();
        if self.selection.is_collapsed() && offset > 0 {
            block.style_at(offset - 1)
        } else {
            block.style_at(offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::style::InlineStyle;

    #[test]
    fn test_new_state_on_empty_document() {
        let state = EditorState::new(ContentState::new());
        assert_eq!(state.content().block_count(), 1);
        assert!(state.selection().is_collapsed());
    }

    #[test]
    fn test_push_takes_selection_after() {
        let state = EditorState::new(ContentState::from_text("hi"));
        let key = state.content().roots()[0];
        let mut next_content = state.content().clone();
        next_content.set_selection_after(SelectionState::collapsed(key, 2));
        let next = EditorState::push(&state, next_content, ChangeType::InsertCharacters);
        assert_eq!(next.selection().anchor_offset, 2);
        assert_eq!(next.last_change_type(), Some(ChangeType::InsertCharacters));
    }

    #[test]
    fn test_push_clears_style_override() {
        let state = EditorState::new(ContentState::from_text("hi"));
        let state = EditorState::set_inline_style_override(&state, StyleSet::bold());
        assert_eq!(state.current_inline_style(), StyleSet::bold());
        let next = EditorState::push(&state, state.content().clone(), ChangeType::RemoveRange);
        assert!(next.inline_style_override().is_none());
    }

    #[test]
    fn test_current_inline_style_reads_character_before_caret() {
        let mut content = ContentState::new();
        let key = content.add_block(
            Block::unstyled(0)
                .with_text("ab", StyleSet::bold())
                .with_plain_text("cd"),
        );
        let state = EditorState::new(content);
        let state = EditorState::force_selection(&state, SelectionState::collapsed(key, 2));
        assert!(state.current_inline_style().contains(InlineStyle::Bold));
        let state = EditorState::force_selection(&state, SelectionState::collapsed(key, 3));
        assert!(!state.current_inline_style().contains(InlineStyle::Bold));
    }
}
