// Selection state: an immutable anchor/focus pair over the document.
// Replaced wholesale on every edit, never mutated in place.

use crate::block::BlockKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
    /// True when the focus precedes the anchor in document order
    pub backward: bool,
}

impl SelectionState {
    /// A caret at the given position
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        SelectionState {
            anchor_key: key,
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
            backward: false,
        }
    }

    /// A forward range from anchor to focus
    pub fn range(
        anchor_key: BlockKey,
        anchor_offset: usize,
        focus_key: BlockKey,
        focus_offset: usize,
    ) -> Self {
        SelectionState {
            anchor_key,
            anchor_offset,
            focus_key,
            focus_offset,
            backward: false,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn start_key(&self) -> BlockKey {
        if self.backward {
            self.focus_key
        } else {
            self.anchor_key
        }
    }

    pub fn start_offset(&self) -> usize {
        if self.backward {
            self.focus_offset
        } else {
            self.anchor_offset
        }
    }

    pub fn end_key(&self) -> BlockKey {
        if self.backward {
            self.anchor_key
        } else {
            self.focus_key
        }
    }

    pub fn end_offset(&self) -> usize {
        if self.backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }

    /// Copy of this selection with a new focus
    pub fn with_focus(mut self, key: BlockKey, offset: usize) -> Self {
        self.focus_key = key;
        self.focus_offset = offset;
        self
    }

    /// Copy of this selection with a new anchor
    pub fn with_anchor(mut self, key: BlockKey, offset: usize) -> Self {
        self.anchor_key = key;
        self.anchor_offset = offset;
        self
    }

    pub fn with_backward(mut self, backward: bool) -> Self {
        self.backward = backward;
        self
    }
}
