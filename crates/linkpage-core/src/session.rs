use crate::blocks::{Block, BlockType};
use crate::document::{EditorMode, PageDocument};
use crate::drag::{DragController, GridMetrics, LayoutChange, PointerPosition, ResizeHandle};
use crate::grid::{self, Breakpoint, CssPlacement, GridConfig, GridPosition};
use crate::mode;
use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// One open editor for one page. The host forwards pointer events and
/// persists the document after each committing call returns true.
#[derive(Debug)]
pub struct EditorSession {
    document: PageDocument,
    config: GridConfig,
    metrics: GridMetrics,
    drag: DragController,
}

impl EditorSession {
    pub fn new(document: PageDocument, config: GridConfig, metrics: GridMetrics) -> Self {
        Self {
            document,
            config,
            metrics,
            drag: DragController::new(),
        }
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn columns(&self, breakpoint: Breakpoint) -> u32 {
        self.document
            .grid
            .unwrap_or(self.config)
            .columns_for(breakpoint)
    }

    pub fn positions(&self, breakpoint: Breakpoint) -> HashMap<String, GridPosition> {
        grid::compute_positions(&self.document.blocks, self.columns(breakpoint))
    }

    pub fn total_rows(&self, breakpoint: Breakpoint) -> u32 {
        grid::total_rows(&self.positions(breakpoint))
    }

    pub fn css_placements(&self, breakpoint: Breakpoint) -> HashMap<String, CssPlacement> {
        self.positions(breakpoint)
            .into_iter()
            .map(|(uid, position)| (uid, grid::to_css_placement(position)))
            .collect()
    }

    /// Any in-flight gesture is abandoned; a drag cannot survive a
    /// representation change.
    pub fn toggle_mode(&mut self) {
        self.drag.reset();
        self.document = mode::toggle_mode(&self.document, self.config);
    }

    /// The profile block is pinned; gestures on it are refused.
    pub fn begin_block_drag(
        &mut self,
        block_uid: &str,
        pointer: PointerPosition,
        breakpoint: Breakpoint,
    ) -> bool {
        if self.is_profile_block(block_uid) {
            return false;
        }
        let Some(position) = self.positions(breakpoint).get(block_uid).copied() else {
            return false;
        };
        self.drag.on_drag_start(block_uid, pointer, position.to_layout());
        true
    }

    pub fn update_block_drag(&mut self, pointer: PointerPosition, breakpoint: Breakpoint) {
        let positions = self.positions(breakpoint);
        let columns = self.columns(breakpoint);
        self.drag.on_drag_move(pointer, &positions, self.metrics, columns);
    }

    /// Returns whether the document changed.
    pub fn commit_block_drag(&mut self, breakpoint: Breakpoint) -> bool {
        match self.drag.on_drag_end() {
            Some(change) => self.apply_change(change, breakpoint),
            None => false,
        }
    }

    pub fn begin_block_resize(
        &mut self,
        block_uid: &str,
        handle: ResizeHandle,
        pointer: PointerPosition,
        breakpoint: Breakpoint,
    ) -> bool {
        if self.is_profile_block(block_uid) {
            return false;
        }
        let Some(position) = self.positions(breakpoint).get(block_uid).copied() else {
            return false;
        };
        self.drag
            .on_resize_start(block_uid, handle, pointer, position.to_layout());
        true
    }

    pub fn update_block_resize(&mut self, pointer: PointerPosition, breakpoint: Breakpoint) {
        let positions = self.positions(breakpoint);
        let columns = self.columns(breakpoint);
        self.drag.on_resize_move(pointer, &positions, self.metrics, columns);
    }

    pub fn commit_block_resize(&mut self, breakpoint: Breakpoint) -> bool {
        let positions = self.positions(breakpoint);
        let columns = self.columns(breakpoint);
        match self.drag.on_resize_end(&positions, self.metrics, columns) {
            Some(change) => self.apply_change(change, breakpoint),
            None => false,
        }
    }

    /// Write a committed layout change onto its block. Validated once more
    /// against the current document, so a stale change (block removed, slot
    /// taken) is dropped. The profile block's pin never changes this way.
    pub fn apply_change(&mut self, change: LayoutChange, breakpoint: Breakpoint) -> bool {
        if self.is_profile_block(&change.block_uid) {
            return false;
        }
        let positions = self.positions(breakpoint);
        let columns = self.columns(breakpoint);
        let candidate = GridPosition::from_layout(change.layout);
        if !grid::is_position_valid(&change.block_uid, candidate, &positions, columns) {
            return false;
        }
        let Some(block) = self
            .document
            .blocks
            .iter_mut()
            .find(|block| block.uid == change.block_uid)
        else {
            return false;
        };
        block.layout = Some(change.layout);
        debug!(block_uid = %change.block_uid, "layout change applied");
        true
    }

    /// In grid mode the new block lands on the first free cell, or on the
    /// row below everything when the bounded scan finds none.
    pub fn insert_block(&mut self, kind: BlockType, breakpoint: Breakpoint) -> String {
        let mut block = Block::new(kind);
        if self.document.mode == EditorMode::Grid {
            block.layout = Some(self.place_new(1, 1, breakpoint).to_layout());
        }
        let uid = block.uid.clone();
        self.document.blocks.push(block);
        uid
    }

    /// The profile block is not deletable.
    pub fn remove_block(&mut self, block_uid: &str) -> bool {
        let Some(index) = self
            .document
            .blocks
            .iter()
            .position(|block| block.uid == block_uid)
        else {
            return false;
        };
        if self.document.blocks[index].is_profile() {
            return false;
        }
        self.document.blocks.remove(index);
        true
    }

    /// The copy keeps the source's spans but takes its own free slot.
    pub fn duplicate_block(&mut self, block_uid: &str, breakpoint: Breakpoint) -> Option<String> {
        let index = self
            .document
            .blocks
            .iter()
            .position(|block| block.uid == block_uid)?;
        let mut clone = self.document.blocks[index].clone();
        clone.uid = Uuid::new_v4().to_string();
        clone.created_at = Some(Utc::now().timestamp_millis());
        if self.document.mode == EditorMode::Grid {
            let (width, height) = clone
                .layout
                .map(|layout| (layout.width, layout.height))
                .unwrap_or((1, 1));
            clone.layout = Some(self.place_new(width, height, breakpoint).to_layout());
        }
        let uid = clone.uid.clone();
        self.document.blocks.insert(index + 1, clone);
        Some(uid)
    }

    fn is_profile_block(&self, block_uid: &str) -> bool {
        self.document
            .blocks
            .iter()
            .any(|block| block.uid == block_uid && block.is_profile())
    }

    fn place_new(&self, width: u32, height: u32, breakpoint: Breakpoint) -> GridPosition {
        let positions = self.positions(breakpoint);
        let columns = self.columns(breakpoint);
        grid::find_free_position(width, height, &positions, columns).unwrap_or(GridPosition {
            column: 1,
            row: grid::total_rows(&positions) + 1,
            width: width.min(columns.max(1)),
            height,
        })
    }
}
