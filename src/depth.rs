// Depth adjustment for list blocks

use crate::document::ContentState;
use crate::modifier::covered_blocks;
use crate::selection::SelectionState;

/// Recompute the depth of every list-item block under the selection,
/// clamped to [0, max_depth]. Non-list blocks are left alone.
pub fn adjust_block_depth(
    content: &ContentState,
    selection: &SelectionState,
    delta: i32,
    max_depth: usize,
) -> ContentState {
    let mut next = content.clone();
    let Some(covered) = covered_blocks(content, selection) else {
        return next;
    };
    for (key, _, _) in covered {
        let Some(block) = next.block_mut(key) else {
            continue;
        };
        if !block.block_type.is_list_item() {
            continue;
        }
        let depth = block.depth as i32 + delta;
        block.depth = depth.clamp(0, max_depth as i32) as usize;
    }
    next.set_selection_before(*selection);
    next.set_selection_after(*selection);
    next
}
