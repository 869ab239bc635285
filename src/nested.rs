// Nested editing policy
// Command dispatch plus the nesting-aware rules layered above the
// content mutator and the flat policy. Every handler is a pure
// function from the current state to the next one; `None` means
// "not handled, apply default behavior".

use crate::block::{BlockType, EntityKey};
use crate::command::{EditorCommand, TabEvent};
use crate::config::PolicyConfig;
use crate::document::ContentState;
use crate::editor_state::{ChangeType, EditorState};
use crate::modifier;
use crate::rich_text;
use crate::selection::SelectionState;
use crate::style::InlineStyle;

pub struct NestedPolicy {
    config: PolicyConfig,
}

impl NestedPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        NestedPolicy { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Dispatch a named command. Returns the next state, or None when
    /// the command is not handled here and default behavior applies.
    pub fn handle_key_command(
        &self,
        state: &EditorState,
        command: &EditorCommand,
    ) -> Option<EditorState> {
        match command {
            EditorCommand::Bold => Some(self.toggle_inline_style(state, InlineStyle::Bold)),
            EditorCommand::Italic => Some(self.toggle_inline_style(state, InlineStyle::Italic)),
            EditorCommand::Underline => {
                Some(self.toggle_inline_style(state, InlineStyle::Underline))
            }
            EditorCommand::Code => Some(self.toggle_code(state)),
            EditorCommand::Backspace
            | EditorCommand::BackspaceWord
            | EditorCommand::BackspaceToStartOfLine => self.on_backspace(state),
            EditorCommand::Delete
            | EditorCommand::DeleteWord
            | EditorCommand::DeleteToEndOfBlock => self.on_delete(state),
            // Embedders may route their own commands; ignore those
            EditorCommand::Custom(_) => None,
        }
    }

    /// Forward deletion. Only steps in when the caret sits at the end
    /// of its block and the next block is atomic: the atomic block is
    /// then removed as a whole.
    pub fn on_delete(&self, state: &EditorState) -> Option<EditorState> {
        let selection = *state.selection();
        if !selection.is_collapsed() {
            return None;
        }

        let content = state.content();
        let start_key = selection.start_key();
        let block = content.block(start_key)?;

        // The cursor is somewhere within the text. Behave normally.
        if selection.start_offset() < block.len() {
            return None;
        }

        let block_after = content.block_after(start_key)?;
        if block_after.block_type != BlockType::Atomic {
            return None;
        }

        let target = selection.with_focus(block_after.key, block_after.len());
        let without_atomic = modifier::remove_range(content, &target)?;
        Some(EditorState::push(
            state,
            without_atomic,
            ChangeType::RemoveRange,
        ))
    }

    /// Backward deletion at the start of a block. Consumes a preceding
    /// atomic block whole, or failing that strips the current block's
    /// style. Unstyled blocks with a non-atomic previous sibling keep
    /// their default merge-with-previous behavior.
    pub fn on_backspace(&self, state: &EditorState) -> Option<EditorState> {
        let selection = *state.selection();
        let content = state.content();
        let current = content.block(selection.start_key())?;

        let prev_sibling_keeps_default = current.block_type == BlockType::Unstyled
            && current.prev_sibling.is_some_and(|key| {
                content
                    .block(key)
                    .is_some_and(|prev| prev.block_type != BlockType::Atomic)
            });
        if !selection.is_collapsed()
            || selection.anchor_offset != 0
            || selection.focus_offset != 0
            || prev_sibling_keeps_default
        {
            return None;
        }

        let start_key = selection.start_key();
        if let Some(before) = content.block_before(start_key)
            && before.block_type == BlockType::Atomic
        {
            // Delete that block completely
            let target = SelectionState::range(before.key, 0, start_key, 0);
            if let Some(mut without_atomic) = modifier::remove_range(content, &target) {
                without_atomic.set_selection_after(selection);
                return Some(EditorState::push(
                    state,
                    without_atomic,
                    ChangeType::RemoveRange,
                ));
            }
        }

        // If that doesn't succeed, try to remove the current block style
        let without_block_style = self.try_to_remove_block_style(state)?;
        Some(EditorState::push(
            state,
            without_block_style,
            ChangeType::ChangeBlockType,
        ))
    }

    /// Toggle a block type without ever handing children to a type
    /// that may not have any.
    pub fn toggle_block_type(&self, state: &EditorState, block_type: BlockType) -> EditorState {
        let selection = *state.selection();
        let content = state.content();
        let Some(current) = content.block(selection.start_key()) else {
            return state.clone();
        };

        let have_children = current.has_children();
        let is_collapsed = selection.is_collapsed();
        let is_multi_block = selection.anchor_key != selection.focus_key;
        let target_nesting_disabled = self.config.nesting_disabled(&block_type);
        let current_nesting_disabled = self.config.nesting_disabled(&current.block_type);

        // Refuse operations that would hand children to a block type
        // that must stay childless
        if (is_multi_block || have_children) && target_nesting_disabled {
            return state.clone();
        }

        // All of these cases are safe under flat semantics
        if current_nesting_disabled
            || is_collapsed
            || target_nesting_disabled
            || is_multi_block
            || current.block_type == block_type
            || have_children
        {
            return rich_text::toggle_block_type(state, block_type);
        }

        // Remaining case: a ranged selection inside a single childless
        // block, toggling between nesting-friendly types. That would
        // mean splitting the block at the selection boundaries; the
        // split path is deliberately not implemented and leaves the
        // state untouched.
        state.clone()
    }

    /// Code acts at block granularity unless a sub-block character
    /// range is selected, which gets the inline CODE style instead.
    pub fn toggle_code(&self, state: &EditorState) -> EditorState {
        let selection = state.selection();
        if selection.is_collapsed() || selection.anchor_key != selection.focus_key {
            return rich_text::toggle_block_type(state, BlockType::CodeBlock);
        }
        rich_text::toggle_inline_style(state, InlineStyle::Code)
    }

    pub fn toggle_inline_style(&self, state: &EditorState, style: InlineStyle) -> EditorState {
        rich_text::toggle_inline_style(state, style)
    }

    /// Apply an entity reference (or none, removing a link) to an
    /// explicit target selection, independent of the current one
    pub fn toggle_link(
        &self,
        state: &EditorState,
        target_selection: &SelectionState,
        entity: Option<EntityKey>,
    ) -> EditorState {
        match modifier::apply_entity(state.content(), target_selection, entity) {
            Some(next) => EditorState::push(state, next, ChangeType::ApplyEntity),
            None => state.clone(),
        }
    }

    /// Whether any character in the active selection's range resolves
    /// to a LINK entity
    pub fn current_block_contains_link(&self, state: &EditorState) -> bool {
        let selection = state.selection();
        let content = state.content();
        let Some(block) = content.block(selection.anchor_key) else {
            return false;
        };
        let start = selection.start_offset().min(block.len());
        let end = selection.end_offset().min(block.len()).max(start);
        block.chars()[start..end].iter().any(|meta| {
            meta.entity
                .and_then(|key| content.entity(key))
                .is_some_and(|entity| entity.is_link())
        })
    }

    pub fn current_block_type(&self, state: &EditorState) -> BlockType {
        rich_text::current_block_type(state)
    }

    /// Insert a literal newline carrying the current inline style,
    /// then move the caret past it without a second history entry
    pub fn insert_soft_newline(&self, state: &EditorState) -> EditorState {
        let Some(content) = modifier::insert_text(
            state.content(),
            state.selection(),
            "\n",
            state.current_inline_style(),
            None,
        ) else {
            return state.clone();
        };
        let selection_after = content.selection_after();
        let pushed = EditorState::push(state, content, ChangeType::InsertCharacters);
        match selection_after {
            Some(selection) => EditorState::force_selection(&pushed, selection),
            None => pushed,
        }
    }

    /// Tab adjusts list depth. Intercepts the event for list blocks
    /// even at the depth bound; leaves everything else alone.
    pub fn on_tab(&self, event: &mut TabEvent, state: &EditorState, max_depth: usize) -> EditorState {
        let selection = *state.selection();
        if selection.anchor_key != selection.focus_key {
            return state.clone();
        }

        let content = state.content();
        let Some(block) = content.block(selection.anchor_key) else {
            return state.clone();
        };
        if !block.block_type.is_list_item() {
            return state.clone();
        }

        event.prevent_default();

        if !event.shift && block.depth == max_depth {
            return state.clone();
        }

        let delta = if event.shift { -1 } else { 1 };
        let adjusted = crate::depth::adjust_block_depth(content, &selection, delta, max_depth);
        EditorState::push(state, adjusted, ChangeType::AdjustDepth)
    }

    /// When a collapsed cursor sits at the start of a styled block,
    /// degrade the block to unstyled. Contiguous code regions are kept
    /// intact: a code block right after a non-empty code block refuses.
    pub fn try_to_remove_block_style(&self, state: &EditorState) -> Option<ContentState> {
        let selection = *state.selection();
        if !selection.is_collapsed() || selection.anchor_offset != 0 {
            return None;
        }
        let content = state.content();
        let key = selection.anchor_key;
        let block = content.block(key)?;

        if block.block_type == BlockType::CodeBlock
            && content.block_before(key).is_some_and(|before| {
                before.block_type == BlockType::CodeBlock && !before.is_empty()
            })
        {
            return None;
        }

        if block.block_type != BlockType::Unstyled {
            return modifier::set_block_type(content, &selection, BlockType::Unstyled);
        }
        None
    }
}

impl Default for NestedPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}
