// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`ViewportState::resize`]: a cell-preserving reshape of the grid dimensions
//! themselves. This does NOT reflow content — it just changes `width`/`height`,
//! keeping whatever cells still fit and padding/clamping the rest. The content-aware
//! rewrap across the new dimensions is [`crate::reflow::reflow`], which tears down and
//! rebuilds the viewport from logical lines; this method is the primitive it (and any
//! caller that just wants to grow/shrink the raw grid without rewrapping) uses.

use super::ViewportState;
use crate::{cell::Cell, row::RowMetadata};

impl ViewportState {
    /// Resizes the raw grid to `new_w`×`new_h`. Existing rows/columns are preserved in
    /// place; new columns are blank-filled with the current erase background, new rows
    /// are fresh. Shrinking truncates without committing the removed content — callers
    /// that need reflow semantics must commit/extract before calling this (the caller
    /// orchestrates that). A zero dimension is rejected by the caller before this is
    /// ever reached.
    pub fn resize(&mut self, new_w: u16, new_h: u16) {
        let new_w = new_w.max(1);
        let new_h = new_h.max(1);
        let blank = Cell::erased(self.erase_bg);

        for row in &mut self.grid {
            row.resize(new_w as usize, blank);
        }
        self.grid.resize(new_h as usize, vec![blank; new_w as usize]);
        self.rows.resize(new_h as usize, RowMetadata::fresh());

        self.width = new_w;
        self.height = new_h;
        self.cursor_x = self.cursor_x.min(new_w - 1);
        self.cursor_y = self.cursor_y.min(new_h - 1);
        self.scroll_top = self.scroll_top.min(new_h - 1);
        self.scroll_bottom = self.scroll_bottom.min(new_h - 1).max(self.scroll_top);
        self.left_margin = self.left_margin.min(new_w - 1);
        self.right_margin = self.right_margin.min(new_w - 1).max(self.left_margin);
        self.wrap_latch = false;
    }

    /// Replaces the grid/row-metadata wholesale with freshly rewrapped content,
    /// preserving every other piece of viewport state (cursor is set separately by the
    /// caller once it knows the rewrapped cursor position). Used by
    /// [`crate::reflow::reflow`] to install its rebuilt rows.
    pub fn install_reflowed_rows(&mut self, width: u16, rows: Vec<Vec<Cell>>, metadata: Vec<RowMetadata>) {
        debug_assert_eq!(rows.len(), metadata.len());
        self.width = width;
        self.height = rows.len() as u16;
        self.grid = rows;
        self.rows = metadata;
        self.scroll_top = 0;
        self.scroll_bottom = self.height - 1;
        self.left_margin = 0;
        self.right_margin = self.width - 1;
        self.wrap_latch = false;
    }
}
