use crate::blocks::{Block, GridLayout};
use crate::document::{EditorMode, PageDocument};
use crate::grid::GridConfig;
use chrono::Utc;
use tracing::debug;

/// Profile pinned to row 1 at full width; everything else stacks into
/// column 1 on successive rows, preserving the prior linear order. Blocks
/// missing a `created_at` are stamped for later re-linearization.
pub fn to_grid(blocks: &[Block], columns: u32) -> Vec<Block> {
    let columns = columns.max(1);
    let now = Utc::now().timestamp_millis();
    let mut next_row = 2;
    blocks
        .iter()
        .map(|block| {
            let mut block = block.clone();
            if block.created_at.is_none() {
                block.created_at = Some(now);
            }
            if block.is_profile() {
                block.layout = Some(GridLayout {
                    column: 1,
                    row: 1,
                    width: columns,
                    height: 1,
                });
            } else {
                block.layout = Some(GridLayout {
                    column: 1,
                    row: next_row,
                    width: 1,
                    height: 1,
                });
                next_row += 1;
            }
            block
        })
        .collect()
}

/// Profile first, the rest by `created_at` ascending (missing timestamps
/// sort earliest), all placements stripped.
pub fn to_linear(blocks: &[Block]) -> Vec<Block> {
    let (profile, mut rest): (Vec<Block>, Vec<Block>) =
        blocks.iter().cloned().partition(Block::is_profile);
    rest.sort_by_key(|block| block.created_at.unwrap_or(0));

    let mut ordered = profile;
    ordered.extend(rest);
    discard_grid_arrangement(&mut ordered);
    ordered
}

/// Manual arrangement does not survive a return to linear mode.
pub fn discard_grid_arrangement(blocks: &mut [Block]) {
    for block in blocks {
        block.layout = None;
    }
}

/// Entering grid mode installs `fallback_config` when the document carries
/// none yet; an existing config is kept.
pub fn toggle_mode(document: &PageDocument, fallback_config: GridConfig) -> PageDocument {
    let mut next = document.clone();
    match document.mode {
        EditorMode::Linear => {
            let config = document.grid.unwrap_or(fallback_config);
            next.blocks = to_grid(&document.blocks, config.columns_desktop);
            next.grid = Some(config);
            next.mode = EditorMode::Grid;
        }
        EditorMode::Grid => {
            next.blocks = to_linear(&document.blocks);
            next.mode = EditorMode::Linear;
        }
    }
    debug!(page = %document.uid, from = ?document.mode, to = ?next.mode, "mode toggled");
    next
}
