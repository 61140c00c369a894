use crate::blocks::{Block, GridLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

pub const MIN_SPAN: u32 = 1;
pub const MAX_SPAN: u32 = 4;

// Extra rows scanned past the last occupied row before giving up.
const FREE_SCAN_MARGIN: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub columns_desktop: u32,
    pub columns_mobile: u32,
    pub gap_px: u32,
    pub cell_height_px: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns_desktop: 4,
            columns_mobile: 2,
            gap_px: 16,
            cell_height_px: 120,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Breakpoint {
    Desktop,
    Mobile,
}

impl GridConfig {
    pub fn columns_for(&self, breakpoint: Breakpoint) -> u32 {
        match breakpoint {
            Breakpoint::Desktop => self.columns_desktop,
            Breakpoint::Mobile => self.columns_mobile,
        }
    }
}

/// Resolved placement of one block. Derived, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPosition {
    pub column: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
}

impl GridPosition {
    pub fn from_layout(layout: GridLayout) -> Self {
        Self {
            column: layout.column,
            row: layout.row,
            width: layout.width,
            height: layout.height,
        }
    }

    pub fn to_layout(self) -> GridLayout {
        GridLayout {
            column: self.column,
            row: self.row,
            width: self.width,
            height: self.height,
        }
    }
}

/// Explicit layouts are clamped to the column bound; blocks without one are
/// auto-packed by index, wrapping row by row.
pub fn compute_positions(blocks: &[Block], columns: u32) -> HashMap<String, GridPosition> {
    let columns = columns.max(1);
    let mut positions = HashMap::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let position = match block.layout {
            Some(layout) => clamp_to_columns(layout, columns),
            None => auto_pack(index as u32, columns),
        };
        positions.insert(block.uid.clone(), position);
    }
    positions
}

fn auto_pack(index: u32, columns: u32) -> GridPosition {
    GridPosition {
        column: index % columns + 1,
        row: index / columns + 1,
        width: 1,
        height: 1,
    }
}

fn clamp_to_columns(layout: GridLayout, columns: u32) -> GridPosition {
    let column = layout.column.max(1).min(columns);
    let width = layout
        .width
        .clamp(MIN_SPAN, MAX_SPAN)
        .min(columns - column + 1);
    GridPosition {
        column,
        row: layout.row.max(1),
        width,
        height: layout.height.clamp(MIN_SPAN, MAX_SPAN),
    }
}

/// Overlap over half-open cell intervals. Touching edges do not collide.
pub fn is_colliding(a: GridPosition, b: GridPosition) -> bool {
    let columns_overlap = a.column < b.column + b.width && b.column < a.column + a.width;
    let rows_overlap = a.row < b.row + b.height && b.row < a.row + a.height;
    columns_overlap && rows_overlap
}

/// The block being moved is excluded from the collision set.
pub fn is_position_valid(
    block_uid: &str,
    candidate: GridPosition,
    positions: &HashMap<String, GridPosition>,
    columns: u32,
) -> bool {
    if candidate.column < 1 || candidate.row < 1 {
        return false;
    }
    if candidate.width < MIN_SPAN || candidate.width > MAX_SPAN {
        return false;
    }
    if candidate.height < MIN_SPAN || candidate.height > MAX_SPAN {
        return false;
    }
    if candidate.column + candidate.width - 1 > columns {
        return false;
    }
    positions
        .iter()
        .all(|(uid, position)| uid == block_uid || !is_colliding(candidate, *position))
}

/// First free rectangle, scanning rows top-down and columns left-to-right
/// within the bounded row range. On `None` the caller appends below
/// everything.
pub fn find_free_position(
    width: u32,
    height: u32,
    positions: &HashMap<String, GridPosition>,
    columns: u32,
) -> Option<GridPosition> {
    let columns = columns.max(1);
    let width = width.clamp(MIN_SPAN, MAX_SPAN).min(columns);
    let height = height.clamp(MIN_SPAN, MAX_SPAN);
    let max_row = positions
        .values()
        .map(|position| position.row + position.height - 1)
        .max()
        .unwrap_or(0);

    for row in 1..=max_row + FREE_SCAN_MARGIN {
        for column in 1..=columns - width + 1 {
            let candidate = GridPosition {
                column,
                row,
                width,
                height,
            };
            if positions
                .values()
                .all(|position| !is_colliding(candidate, *position))
            {
                trace!(column, row, width, height, "free slot found");
                return Some(candidate);
            }
        }
    }
    trace!(width, height, "no free slot within scan bound");
    None
}

pub fn total_rows(positions: &HashMap<String, GridPosition>) -> u32 {
    positions
        .values()
        .map(|position| position.row + position.height - 1)
        .max()
        .unwrap_or(1)
        .max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CssPlacement {
    pub column_start: u32,
    pub column_span: u32,
    pub row_start: u32,
    pub row_span: u32,
}

impl CssPlacement {
    /// `grid-area` shorthand value: `row / column / span rows / span cols`.
    pub fn grid_area(&self) -> String {
        format!(
            "{} / {} / span {} / span {}",
            self.row_start, self.column_start, self.row_span, self.column_span
        )
    }
}

pub fn to_css_placement(position: GridPosition) -> CssPlacement {
    CssPlacement {
        column_start: position.column,
        column_span: position.width,
        row_start: position.row,
        row_span: position.height,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        compute_positions, find_free_position, is_colliding, is_position_valid, to_css_placement,
        total_rows, GridPosition,
    };
    use crate::blocks::{Block, BlockType, GridLayout};
    use std::collections::HashMap;

    fn block(uid: &str, layout: Option<GridLayout>) -> Block {
        Block {
            uid: uid.to_string(),
            kind: BlockType::Link,
            created_at: None,
            layout,
            content: serde_json::Value::Null,
        }
    }

    fn rect(column: u32, row: u32, width: u32, height: u32) -> GridPosition {
        GridPosition {
            column,
            row,
            width,
            height,
        }
    }

    fn occupied(cells: &[(&str, GridPosition)]) -> HashMap<String, GridPosition> {
        cells
            .iter()
            .map(|(uid, position)| (uid.to_string(), *position))
            .collect()
    }

    #[test]
    fn unpositioned_blocks_auto_pack_by_index() {
        let blocks: Vec<Block> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|uid| block(uid, None))
            .collect();
        let positions = compute_positions(&blocks, 4);

        assert_eq!(positions["a"], rect(1, 1, 1, 1));
        assert_eq!(positions["b"], rect(2, 1, 1, 1));
        assert_eq!(positions["c"], rect(3, 1, 1, 1));
        assert_eq!(positions["d"], rect(4, 1, 1, 1));
        assert_eq!(positions["e"], rect(1, 2, 1, 1));
        assert_eq!(total_rows(&positions), 2);
    }

    #[test]
    fn explicit_layouts_do_not_overlap() {
        let blocks = vec![
            block("a", Some(GridLayout { column: 1, row: 1, width: 2, height: 2 })),
            block("b", Some(GridLayout { column: 3, row: 1, width: 2, height: 1 })),
            block("c", Some(GridLayout { column: 3, row: 2, width: 1, height: 1 })),
        ];
        let positions = compute_positions(&blocks, 4);
        let resolved: Vec<_> = positions.values().copied().collect();
        for (i, a) in resolved.iter().enumerate() {
            for b in resolved.iter().skip(i + 1) {
                assert!(!is_colliding(*a, *b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn out_of_bound_layout_is_clamped() {
        let blocks = vec![block(
            "a",
            Some(GridLayout { column: 10, row: 1, width: 3, height: 1 }),
        )];
        let positions = compute_positions(&blocks, 4);
        let position = positions["a"];
        assert_eq!(position.column, 4);
        assert!(position.column + position.width - 1 <= 4);
    }

    #[test]
    fn touching_edges_do_not_collide() {
        assert!(!is_colliding(rect(1, 1, 2, 1), rect(3, 1, 1, 1)));
        assert!(is_colliding(rect(1, 1, 2, 1), rect(2, 1, 1, 1)));
    }

    #[test]
    fn span_out_of_range_is_always_invalid() {
        let positions = HashMap::new();
        assert!(!is_position_valid("a", rect(1, 1, 0, 1), &positions, 4));
        assert!(!is_position_valid("a", rect(1, 1, 5, 1), &positions, 4));
        assert!(!is_position_valid("a", rect(1, 1, 1, 0), &positions, 4));
        assert!(!is_position_valid("a", rect(1, 1, 1, 5), &positions, 4));
    }

    #[test]
    fn position_past_right_bound_is_invalid() {
        let positions = HashMap::new();
        assert!(!is_position_valid("a", rect(4, 1, 2, 1), &positions, 4));
        assert!(is_position_valid("a", rect(4, 1, 1, 1), &positions, 4));
    }

    #[test]
    fn moved_block_is_excluded_from_its_own_collision_set() {
        let positions = occupied(&[("a", rect(1, 1, 1, 1)), ("b", rect(2, 1, 1, 1))]);
        assert!(is_position_valid("a", rect(1, 1, 1, 1), &positions, 4));
        assert!(!is_position_valid("a", rect(2, 1, 1, 1), &positions, 4));
    }

    #[test]
    fn find_free_position_scans_left_to_right_top_down() {
        let positions = occupied(&[("a", rect(1, 1, 1, 1)), ("b", rect(2, 1, 1, 1))]);
        let slot = find_free_position(1, 1, &positions, 4).expect("slot");
        assert_eq!(slot, rect(3, 1, 1, 1));
    }

    #[test]
    fn find_free_position_wraps_to_next_row_for_wide_blocks() {
        let positions = occupied(&[("a", rect(1, 1, 3, 1))]);
        let slot = find_free_position(2, 1, &positions, 4).expect("slot");
        assert_eq!(slot, rect(1, 2, 2, 1));
    }

    #[test]
    fn full_rows_push_slot_below_everything() {
        let positions = occupied(&[("a", rect(1, 1, 4, 1)), ("b", rect(1, 2, 4, 1))]);
        let slot = find_free_position(1, 1, &positions, 4).expect("slot");
        assert_eq!(slot, rect(1, 3, 1, 1));
    }

    #[test]
    fn total_rows_is_at_least_one() {
        assert_eq!(total_rows(&HashMap::new()), 1);
        let positions = occupied(&[("a", rect(1, 2, 1, 3))]);
        assert_eq!(total_rows(&positions), 4);
    }

    #[test]
    fn css_placement_carries_spans() {
        let placement = to_css_placement(rect(2, 3, 2, 1));
        assert_eq!(placement.column_start, 2);
        assert_eq!(placement.column_span, 2);
        assert_eq!(placement.grid_area(), "3 / 2 / span 1 / span 2");
    }
}
