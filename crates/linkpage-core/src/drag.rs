use crate::blocks::GridLayout;
use crate::grid::{self, GridPosition, MAX_SPAN, MIN_SPAN};
use std::collections::HashMap;
use tracing::debug;

/// Pointer coordinates relative to the grid container origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// Pixel geometry of the grid container, supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    pub cell_width_px: f64,
    pub cell_height_px: f64,
    pub gap_px: f64,
}

impl GridMetrics {
    fn stride_x(&self) -> f64 {
        self.cell_width_px + self.gap_px
    }

    fn stride_y(&self) -> f64 {
        self.cell_height_px + self.gap_px
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub column: u32,
    pub row: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    fn horizontal_sign(self) -> i64 {
        match self {
            Self::East | Self::NorthEast | Self::SouthEast => 1,
            Self::West | Self::NorthWest | Self::SouthWest => -1,
            Self::North | Self::South => 0,
        }
    }

    fn vertical_sign(self) -> i64 {
        match self {
            Self::South | Self::SouthEast | Self::SouthWest => 1,
            Self::North | Self::NorthEast | Self::NorthWest => -1,
            Self::East | Self::West => 0,
        }
    }
}

/// The committed outcome of a gesture; the host persists it.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutChange {
    pub block_uid: String,
    pub layout: GridLayout,
}

#[derive(Clone, Debug, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    Dragging {
        block_uid: String,
        start: PointerPosition,
        origin: GridLayout,
        hovered: Option<Cell>,
        valid: bool,
    },
    Resizing {
        block_uid: String,
        handle: ResizeHandle,
        start: PointerPosition,
        last: PointerPosition,
        origin: GridLayout,
        moved: bool,
        valid: bool,
    },
}

#[derive(Debug, Default)]
pub struct DragController {
    gesture: Gesture,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn hovered_cell(&self) -> Option<Cell> {
        match self.gesture {
            Gesture::Dragging { hovered, .. } => hovered,
            _ => None,
        }
    }

    /// Pointer position where the active gesture began.
    pub fn start_pointer(&self) -> Option<PointerPosition> {
        match &self.gesture {
            Gesture::Dragging { start, .. } | Gesture::Resizing { start, .. } => Some(*start),
            Gesture::Idle => None,
        }
    }

    pub fn is_valid_drop(&self) -> bool {
        match self.gesture {
            Gesture::Dragging { valid, .. } | Gesture::Resizing { valid, .. } => valid,
            Gesture::Idle => false,
        }
    }

    /// Abandon any in-flight gesture without emitting a change. Hosts call
    /// this on unmount so a gesture cannot leak across remounts.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Starting a gesture while another is active discards the prior one.
    pub fn on_drag_start(&mut self, block_uid: &str, pointer: PointerPosition, layout: GridLayout) {
        self.gesture = Gesture::Dragging {
            block_uid: block_uid.to_string(),
            start: pointer,
            origin: layout,
            hovered: None,
            valid: false,
        };
    }

    /// Preview only, no block is mutated. Ignored when no drag is active
    /// (late pointer events are normal).
    pub fn on_drag_move(
        &mut self,
        pointer: PointerPosition,
        positions: &HashMap<String, GridPosition>,
        metrics: GridMetrics,
        columns: u32,
    ) {
        let Gesture::Dragging {
            block_uid,
            origin,
            hovered,
            valid,
            ..
        } = &mut self.gesture
        else {
            return;
        };

        let cell = cell_at(pointer, metrics, columns);
        let candidate = GridPosition {
            column: cell.column,
            row: cell.row,
            width: origin.width,
            height: origin.height,
        };
        *hovered = Some(cell);
        *valid = grid::is_position_valid(block_uid, candidate, positions, columns);
    }

    /// Emits the committed move only when the last preview was valid.
    pub fn on_drag_end(&mut self) -> Option<LayoutChange> {
        let gesture = std::mem::take(&mut self.gesture);
        let Gesture::Dragging {
            block_uid,
            origin,
            hovered: Some(cell),
            valid: true,
            ..
        } = gesture
        else {
            return None;
        };

        let layout = GridLayout {
            column: cell.column,
            row: cell.row,
            ..origin
        };
        debug!(block_uid = %block_uid, column = layout.column, row = layout.row, "drag committed");
        Some(LayoutChange { block_uid, layout })
    }

    pub fn on_resize_start(
        &mut self,
        block_uid: &str,
        handle: ResizeHandle,
        pointer: PointerPosition,
        layout: GridLayout,
    ) {
        self.gesture = Gesture::Resizing {
            block_uid: block_uid.to_string(),
            handle,
            start: pointer,
            last: pointer,
            origin: layout,
            moved: false,
            valid: false,
        };
    }

    /// Contract: west/north handles change the spans only. The block's
    /// column/row anchor never moves, so shrinking from the left pulls the
    /// right edge inward.
    pub fn on_resize_move(
        &mut self,
        pointer: PointerPosition,
        positions: &HashMap<String, GridPosition>,
        metrics: GridMetrics,
        columns: u32,
    ) {
        let Gesture::Resizing {
            block_uid,
            handle,
            start,
            last,
            origin,
            moved,
            valid,
        } = &mut self.gesture
        else {
            return;
        };

        *last = pointer;
        *moved = true;
        let (width, height) = resized_spans(*origin, *handle, *start, pointer, metrics);
        let candidate = GridPosition {
            column: origin.column,
            row: origin.row,
            width,
            height,
        };
        *valid = grid::is_position_valid(block_uid, candidate, positions, columns);
    }

    /// The committed size is derived once more from the start-to-end pointer
    /// delta rather than any cached preview, then re-validated. A gesture
    /// that never saw a move emits nothing.
    pub fn on_resize_end(
        &mut self,
        positions: &HashMap<String, GridPosition>,
        metrics: GridMetrics,
        columns: u32,
    ) -> Option<LayoutChange> {
        let gesture = std::mem::take(&mut self.gesture);
        let Gesture::Resizing {
            block_uid,
            handle,
            start,
            last,
            origin,
            moved: true,
            ..
        } = gesture
        else {
            return None;
        };

        let (width, height) = resized_spans(origin, handle, start, last, metrics);
        let candidate = GridPosition {
            column: origin.column,
            row: origin.row,
            width,
            height,
        };
        if !grid::is_position_valid(&block_uid, candidate, positions, columns) {
            return None;
        }

        let layout = GridLayout {
            width,
            height,
            ..origin
        };
        debug!(block_uid = %block_uid, width, height, "resize committed");
        Some(LayoutChange { block_uid, layout })
    }
}

fn cell_at(pointer: PointerPosition, metrics: GridMetrics, columns: u32) -> Cell {
    let column = (pointer.x / metrics.stride_x()).floor() as i64 + 1;
    let row = (pointer.y / metrics.stride_y()).floor() as i64 + 1;
    Cell {
        column: column.clamp(1, columns.max(1) as i64) as u32,
        row: row.max(1) as u32,
    }
}

fn resized_spans(
    origin: GridLayout,
    handle: ResizeHandle,
    start: PointerPosition,
    pointer: PointerPosition,
    metrics: GridMetrics,
) -> (u32, u32) {
    let dx_cells = ((pointer.x - start.x) / metrics.stride_x()).round() as i64;
    let dy_cells = ((pointer.y - start.y) / metrics.stride_y()).round() as i64;

    let width = origin.width as i64 + handle.horizontal_sign() * dx_cells;
    let height = origin.height as i64 + handle.vertical_sign() * dy_cells;
    (
        width.clamp(MIN_SPAN as i64, MAX_SPAN as i64) as u32,
        height.clamp(MIN_SPAN as i64, MAX_SPAN as i64) as u32,
    )
}
