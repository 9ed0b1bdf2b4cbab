// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Scrolling, scroll-region management, and insert/delete-line operations.
//!
//! A full-screen scroll commits the departing top row to history only when the
//! current scroll region's top is row 0 (the LF/IND rule) — a scroll confined to a
//! non-default DECSTBM region never touches history.

use super::ViewportState;
use crate::{cell::Cell, error::EngineResult, history::ScrollbackHistory, row::RowMetadata};

impl ViewportState {
    /// Scrolls the full screen up by `n` rows, committing departing rows to history
    /// when the scroll region's top is row 0 (the default, full-screen case).
    pub fn scroll_up(&mut self, n: u16, history: &ScrollbackHistory, unix_nanos: i64) -> EngineResult<()> {
        let commit = self.scroll_top == 0 && !self.alt_screen;
        self.scroll_region_up(0, self.height - 1, n, history, unix_nanos, commit)
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.scroll_region_down_mechanical(0, self.height - 1, n);
    }

    /// Scrolls rows `top..=bottom` up by `n`, honouring the current left/right margins
    /// (DECSLRM) for the columns touched. Departing rows are committed first when
    /// `commit_departing` is set (true only for the default region's LF/IND scroll) —
    /// never for an explicit DECSTBM-scoped region.
    pub fn scroll_region_up(
        &mut self,
        top: u16,
        bottom: u16,
        n: u16,
        history: &ScrollbackHistory,
        unix_nanos: i64,
        commit_departing: bool,
    ) -> EngineResult<()> {
        let full_width = self.left_margin == 0 && self.right_margin == self.width - 1;
        for _ in 0..n {
            if commit_departing && full_width {
                self.commit_row(top, history, unix_nanos)?;
            }
            self.shift_rows_up_one(top, bottom);
        }
        Ok(())
    }

    pub fn scroll_region_down(&mut self, top: u16, bottom: u16, n: u16) {
        self.scroll_region_down_mechanical(top, bottom, n);
    }

    fn shift_rows_up_one(&mut self, top: u16, bottom: u16) {
        let (left, right) = (self.left_margin as usize, self.right_margin as usize);
        let full_width = left == 0 && right == self.width as usize - 1;
        for y in top..bottom {
            if full_width {
                self.grid[y as usize] = self.grid[(y + 1) as usize].clone();
                self.rows[y as usize] = self.rows[(y + 1) as usize];
            } else {
                for x in left..=right {
                    self.grid[y as usize][x] = self.grid[(y + 1) as usize][x];
                }
            }
        }
        if full_width {
            self.grid[bottom as usize] = vec![Cell::erased(self.erase_bg); self.width as usize];
            self.rows[bottom as usize] = RowMetadata::fresh();
        } else {
            for x in left..=right {
                self.grid[bottom as usize][x] = Cell::erased(self.erase_bg);
            }
        }
    }

    fn scroll_region_down_mechanical(&mut self, top: u16, bottom: u16, n: u16) {
        let (left, right) = (self.left_margin as usize, self.right_margin as usize);
        let full_width = left == 0 && right == self.width as usize - 1;
        for _ in 0..n {
            let mut y = bottom;
            while y > top {
                if full_width {
                    self.grid[y as usize] = self.grid[(y - 1) as usize].clone();
                    self.rows[y as usize] = self.rows[(y - 1) as usize];
                } else {
                    for x in left..=right {
                        self.grid[y as usize][x] = self.grid[(y - 1) as usize][x];
                    }
                }
                y -= 1;
            }
            if full_width {
                self.grid[top as usize] = vec![Cell::erased(self.erase_bg); self.width as usize];
                self.rows[top as usize] = RowMetadata::fresh();
            } else {
                for x in left..=right {
                    self.grid[top as usize][x] = Cell::erased(self.erase_bg);
                }
            }
        }
    }

    /// CSI L (IL): inserts `n` blank lines at the cursor row, shifting rows below it
    /// down within the scroll region; rows pushed past the region's bottom are
    /// discarded without being committed (this is local TUI redraw territory, not
    /// normal scroll-off). A no-op if the cursor is outside the scroll region.
    pub fn insert_lines(&mut self, n: u16) {
        if self.cursor_y < self.scroll_top || self.cursor_y > self.scroll_bottom {
            return;
        }
        self.scroll_region_down_mechanical(self.cursor_y, self.scroll_bottom, n.max(1));
    }

    /// CSI M (DL): deletes `n` lines at the cursor row, shifting rows below it up
    /// within the scroll region. A no-op if the cursor is outside the scroll region.
    pub fn delete_lines(&mut self, n: u16) {
        if self.cursor_y < self.scroll_top || self.cursor_y > self.scroll_bottom {
            return;
        }
        for _ in 0..n.max(1) {
            self.shift_rows_up_one(self.cursor_y, self.scroll_bottom);
        }
    }
}
