// ContentState: the document model
// An arena of blocks keyed by stable ids, plus the entity map.
// Cloning a ContentState shares every unchanged block by reference, so
// superseded versions stay valid and cheap to keep around.

use crate::block::{Block, BlockKey, EntityKey};
use crate::selection::SelectionState;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An out-of-band record (type + data) that a character range can
/// reference, e.g. a hyperlink target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub kind: String,
    pub data: HashMap<String, String>,
}

impl Entity {
    pub const LINK: &'static str = "LINK";

    pub fn new(kind: impl Into<String>, data: HashMap<String, String>) -> Self {
        Entity {
            kind: kind.into(),
            data,
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Entity::new(Self::LINK, link_data(url))
    }

    pub fn is_link(&self) -> bool {
        self.kind == Self::LINK
    }
}

/// Data payload for a link entity
pub fn link_data(url: impl Into<String>) -> HashMap<String, String> {
    let mut data = HashMap::new();
    data.insert("url".to_string(), url.into());
    data
}

/// The document model: an ordered forest of blocks plus the entity map
#[derive(Debug, Clone)]
pub struct ContentState {
    blocks: HashMap<BlockKey, Arc<Block>>,
    roots: Vec<BlockKey>,
    entities: HashMap<EntityKey, Arc<Entity>>,
    next_key: usize,
    selection_before: Option<SelectionState>,
    selection_after: Option<SelectionState>,
}

impl ContentState {
    pub fn new() -> Self {
        ContentState {
            blocks: HashMap::new(),
            roots: Vec::new(),
            entities: HashMap::new(),
            next_key: 1,
            selection_before: None,
            selection_after: None,
        }
    }

    /// A document with a single unstyled block holding the given text
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut content = Self::new();
        content.add_block(Block::unstyled(0).with_plain_text(text));
        content
    }

    fn assign_key(&mut self, block: &mut Block) {
        if block.key == 0 {
            block.key = self.next_key;
            self.next_key += 1;
        } else if block.key >= self.next_key {
            self.next_key = block.key + 1;
        }
    }

    /// Append a block at the end of the top level
    pub fn add_block(&mut self, mut block: Block) -> BlockKey {
        self.assign_key(&mut block);
        let key = block.key;
        block.parent = None;
        self.blocks.insert(key, Arc::new(block));
        self.roots.push(key);
        self.relink_siblings(None);
        key
    }

    /// Append a block as the last child of an existing block
    pub fn append_child(&mut self, parent: BlockKey, mut block: Block) -> BlockKey {
        self.assign_key(&mut block);
        let key = block.key;
        block.parent = Some(parent);
        self.blocks.insert(key, Arc::new(block));
        if let Some(parent_block) = self.block_mut(parent) {
            parent_block.children.push(key);
        }
        self.relink_siblings(Some(parent));
        key
    }

    pub fn block(&self, key: BlockKey) -> Option<&Block> {
        self.blocks.get(&key).map(|b| b.as_ref())
    }

    pub(crate) fn block_mut(&mut self, key: BlockKey) -> Option<&mut Block> {
        self.blocks.get_mut(&key).map(Arc::make_mut)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> &[BlockKey] {
        &self.roots
    }

    pub fn first_block(&self) -> Option<&Block> {
        self.roots.first().and_then(|key| self.block(*key))
    }

    /// Keys of all blocks in document (depth-first) order
    pub fn document_order(&self) -> Vec<BlockKey> {
        let mut order = Vec::with_capacity(self.blocks.len());
        let mut stack: Vec<BlockKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            order.push(key);
            if let Some(block) = self.block(key) {
                stack.extend(block.children.iter().rev().copied());
            }
        }
        order
    }

    /// The block immediately following the given one in document order
    pub fn block_after(&self, key: BlockKey) -> Option<&Block> {
        let order = self.document_order();
        let pos = order.iter().position(|k| *k == key)?;
        order.get(pos + 1).and_then(|k| self.block(*k))
    }

    /// The block immediately preceding the given one in document order
    pub fn block_before(&self, key: BlockKey) -> Option<&Block> {
        let order = self.document_order();
        let pos = order.iter().position(|k| *k == key)?;
        if pos == 0 {
            return None;
        }
        order.get(pos - 1).and_then(|k| self.block(*k))
    }

    pub fn create_entity(&mut self, entity: Entity) -> EntityKey {
        let key = self.next_key;
        self.next_key += 1;
        self.entities.insert(key, Arc::new(entity));
        key
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key).map(|e| e.as_ref())
    }

    pub fn selection_before(&self) -> Option<SelectionState> {
        self.selection_before
    }

    pub fn selection_after(&self) -> Option<SelectionState> {
        self.selection_after
    }

    pub(crate) fn set_selection_before(&mut self, selection: SelectionState) {
        self.selection_before = Some(selection);
    }

    pub(crate) fn set_selection_after(&mut self, selection: SelectionState) {
        self.selection_after = Some(selection);
    }

    /// Remove a block, promoting its children into its position so
    /// document order is preserved. Children are reattached to the
    /// removed block's parent.
    pub(crate) fn remove_block_and_promote(&mut self, key: BlockKey) {
        let Some(removed) = self.blocks.remove(&key) else {
            return;
        };
        let parent = removed.parent;
        let children = removed.children.clone();

        for child in &children {
            if let Some(child_block) = self.block_mut(*child) {
                child_block.parent = parent;
            }
        }

        match parent {
            None => {
                if let Some(pos) = self.roots.iter().position(|k| *k == key) {
                    self.roots.splice(pos..pos + 1, children);
                }
            }
            Some(parent_key) => {
                if let Some(parent_block) = self.block_mut(parent_key)
                    && let Some(pos) = parent_block.children.iter().position(|k| *k == key)
                {
                    parent_block.children.splice(pos..pos + 1, children);
                }
            }
        }
        self.relink_siblings(parent);
    }

    /// Rewrite prev/next sibling links for one sibling group
    fn relink_siblings(&mut self, parent: Option<BlockKey>) {
        let group: Vec<BlockKey> = match parent {
            None => self.roots.clone(),
            Some(key) => match self.block(key) {
                Some(block) => block.children.clone(),
                None => return,
            },
        };
        for (i, key) in group.iter().enumerate() {
            let prev = if i > 0 { Some(group[i - 1]) } else { None };
            let next = group.get(i + 1).copied();
            if let Some(block) = self.block_mut(*key) {
                block.prev_sibling = prev;
                block.next_sibling = next;
            }
        }
    }

    /// Whether parent/child/sibling links agree with each other.
    /// Exercised by tests after every structural edit.
    pub fn is_tree_consistent(&self) -> bool {
        let order = self.document_order();
        if order.len() != self.blocks.len() {
            return false;
        }
        for key in &self.roots {
            match self.block(*key) {
                Some(block) if block.parent.is_none() => {}
                _ => return false,
            }
        }
        for (key, block) in &self.blocks {
            let group: Vec<BlockKey> = match block.parent {
                None => self.roots.clone(),
                Some(parent_key) => match self.block(parent_key) {
                    Some(parent) => parent.children.clone(),
                    None => return false,
                },
            };
            let Some(pos) = group.iter().position(|k| k == key) else {
                return false;
            };
            let expected_prev = if pos > 0 { Some(group[pos - 1]) } else { None };
            if block.prev_sibling != expected_prev
                || block.next_sibling != group.get(pos + 1).copied()
            {
                return false;
            }
            for child in &block.children {
                match self.block(*child) {
                    Some(child_block) if child_block.parent == Some(*key) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_block(
            f: &mut fmt::Formatter<'_>,
            content: &ContentState,
            key: BlockKey,
            indent: usize,
        ) -> fmt::Result {
            let Some(block) = content.block(key) else {
                return Ok(());
            };
            writeln!(
                f,
                "{:indent$}[{}] {} d{}: {:?}",
                "",
                block.key,
                block.block_type.name(),
                block.depth,
                block.text(),
                indent = indent
            )?;
            for child in &block.children {
                write_block(f, content, *child, indent + 2)?;
            }
            Ok(())
        }

        writeln!(f, "ContentState ({} blocks):", self.blocks.len())?;
        for key in &self.roots {
            write_block(f, self, *key, 2)?;
        }
        Ok(())
    }
}
