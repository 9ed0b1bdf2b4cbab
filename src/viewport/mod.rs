// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`ViewportState`]: the writable W×H cell grid, its per-row metadata, cursor, scroll
//! region, and the shell-integration tracking fields OSC 133 populates.
//!
//! This is a single-writer, many-reader resource: the handler holds exclusive access
//! while dispatching, renderers and the selection machine take snapshots under the
//! same lock. Nothing here is async — committing a row is a plain synchronous call
//! into [`ScrollbackHistory::append`].

mod erase;
mod extract;
mod resize;
mod scroll;

pub use extract::ExtractedChain;

use crate::{
    cell::{Cell, CellStyle},
    color::Color,
    error::EngineResult,
    history::ScrollbackHistory,
    logical_line::LogicalLine,
    row::{RowMetadata, RowState},
};

/// A writable terminal grid plus the metadata needed to commit rows to history and to
/// resolve viewport coordinates back to content coordinates.
pub struct ViewportState {
    width: u16,
    height: u16,
    grid: Vec<Vec<Cell>>,
    rows: Vec<RowMetadata>,
    pub cursor_x: u16,
    pub cursor_y: u16,
    /// Set at the right margin when DECAWM print-wrap is pending; consumed by the next
    /// print.
    pub wrap_latch: bool,
    pub erase_bg: Color,
    /// Inclusive row bounds of the current scroll region (DECSTBM). Defaults to the
    /// full screen.
    pub scroll_top: u16,
    pub scroll_bottom: u16,
    /// Inclusive column bounds of the current scroll region (DECSLRM). Defaults to the
    /// full width; only consulted when the handler has DECLRMM enabled.
    pub left_margin: u16,
    pub right_margin: u16,
    next_logical_line_id: i64,
    pub last_prompt_global_line: Option<u64>,
    pub last_prompt_height: u16,
    pub prompt_start_row: Option<u16>,
    /// Set while this viewport is the alt-screen buffer: scroll-off and explicit
    /// commits never flow to history.
    pub alt_screen: bool,
}

impl ViewportState {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            grid: vec![vec![Cell::blank(); width as usize]; height as usize],
            rows: vec![RowMetadata::fresh(); height as usize],
            cursor_x: 0,
            cursor_y: 0,
            wrap_latch: false,
            erase_bg: Color::Default,
            scroll_top: 0,
            scroll_bottom: height - 1,
            left_margin: 0,
            right_margin: width - 1,
            next_logical_line_id: 0,
            last_prompt_global_line: None,
            last_prompt_height: 0,
            prompt_start_row: None,
            alt_screen: false,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 { self.width }

    #[must_use]
    pub fn height(&self) -> u16 { self.height }

    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Cell { self.grid[y as usize][x as usize] }

    #[must_use]
    pub fn row(&self, y: u16) -> &[Cell] { &self.grid[y as usize] }

    #[must_use]
    pub fn row_metadata(&self, y: u16) -> RowMetadata { self.rows[y as usize] }

    /// Snapshot a row's text with trailing blanks trimmed, for rendering or selection.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        let mut cells: Vec<Cell> = self.grid[y as usize].clone();
        crate::logical_line::trim_trailing_blank(&mut cells);
        cells.iter().map(|c| if c.is_empty() { ' ' } else { c.ch }).collect()
    }

    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor_x = x.min(self.width - 1);
        self.cursor_y = y.min(self.height - 1);
        self.wrap_latch = false;
    }

    /// Resolves H/f cursor addressing relative to the scroll region when origin mode
    /// (DECOM) is active.
    pub fn set_cursor_origin_aware(&mut self, x: u16, y: u16, origin_mode: bool) {
        if origin_mode {
            let y = (self.scroll_top + y).min(self.scroll_bottom);
            self.set_cursor(x.min(self.width - 1), y);
        } else {
            self.set_cursor(x, y);
        }
    }

    fn mark_row_dirty(&mut self, y: u16) { self.rows[y as usize].mark_dirty(); }

    /// Forces every row back to `Dirty` so the next render is a full redraw — used when
    /// a synchronized-update block (DEC 2026) closes.
    pub fn mark_all_dirty(&mut self) {
        for row in &mut self.rows {
            row.mark_dirty();
        }
    }

    /// Places one printable character, honouring the pending wrap latch, DECAWM, and
    /// insert mode, then advances the cursor. The handler is responsible for clearing
    /// its own pending-wrap bookkeeping across explicit cursor moves; this method only
    /// owns the viewport-local latch.
    pub fn write(
        &mut self,
        ch: char,
        width: u8,
        style: CellStyle,
        insert_mode: bool,
        decawm: bool,
        history: &ScrollbackHistory,
        unix_nanos: i64,
    ) -> EngineResult<()> {
        if width == 0 {
            return Ok(());
        }
        if self.wrap_latch {
            self.wrap_latch = false;
            if decawm {
                self.wrap_to_next_row(history, unix_nanos)?;
            }
        }

        // A repaint at column 0 of a continuation row breaks its wrap chain rather than
        // carrying a fresh prompt into the previous logical line.
        if self.cursor_x == 0 && self.rows[self.cursor_y as usize].is_continuation {
            self.rows[self.cursor_y as usize].break_continuation_chain();
        }

        if insert_mode {
            self.shift_row_right(self.cursor_y, self.cursor_x, width);
        }

        let y = self.cursor_y as usize;
        let x = self.cursor_x as usize;
        self.grid[y][x] = Cell {
            ch,
            fg: style.fg,
            bg: style.bg,
            attrs: style.attrs,
            wide: width == 2,
            wrapped: false,
        };
        if width == 2 && x + 1 < self.width as usize {
            self.grid[y][x + 1] = Cell {
                ch: '\0',
                fg: style.fg,
                bg: style.bg,
                attrs: style.attrs,
                wide: true,
                wrapped: false,
            };
        }
        self.mark_row_dirty(self.cursor_y);

        let advance = u16::from(width).max(1);
        if self.cursor_x + advance >= self.width {
            self.cursor_x = self.width - 1;
            self.wrap_latch = true;
        } else {
            self.cursor_x += advance;
        }
        Ok(())
    }

    /// Marks the current row's trailing cell `wrapped`, moves to column 0 of the next
    /// row (scrolling the full screen and committing the departing row if already at
    /// the bottom), and propagates continuation metadata to the new row.
    fn wrap_to_next_row(&mut self, history: &ScrollbackHistory, unix_nanos: i64) -> EngineResult<()> {
        let y = self.cursor_y as usize;
        if let Some(last) = self.grid[y].last_mut() {
            last.wrapped = true;
        }
        let from_id = self.rows[y].logical_line_id;
        if self.cursor_y == self.height - 1 {
            self.scroll_up(1, history, unix_nanos)?;
        } else {
            self.cursor_y += 1;
        }
        self.cursor_x = 0;
        let new_y = self.cursor_y as usize;
        self.rows[new_y] = RowMetadata {
            logical_line_id: from_id,
            is_first_row: false,
            is_continuation: true,
            state: RowState::Clean,
            from_history: false,
        };
        Ok(())
    }

    fn shift_row_right(&mut self, y: u16, from_x: u16, width: u8) {
        let row = &mut self.grid[y as usize];
        let w = row.len();
        let from = from_x as usize;
        let shift = usize::from(width.max(1));
        let mut i = w;
        while i > from + shift {
            row[i - 1] = row[i - 1 - shift];
            i -= 1;
        }
        for cell in row.iter_mut().skip(from).take(shift) {
            *cell = Cell::erased(self.erase_bg);
        }
    }

    /// Appends the logical line anchored at row `y` to history, walking backwards
    /// through any continuation chain to assemble the full line. A no-op (returns
    /// `Ok(None)`) if the row is already `Committed` or was paged in `from_history`.
    pub fn commit_row(&mut self, y: u16, history: &ScrollbackHistory, unix_nanos: i64) -> EngineResult<Option<u64>> {
        let meta = self.rows[y as usize];
        if meta.state == RowState::Committed || meta.from_history || self.alt_screen {
            return Ok(None);
        }

        let mut first = y;
        while first > 0 && self.rows[first as usize].is_continuation {
            first -= 1;
        }

        let mut cells = Vec::new();
        let mut row = first;
        loop {
            let row_cells = &self.grid[row as usize];
            let continues = row_cells.last().is_some_and(|c| c.wrapped) && row < self.height - 1;
            cells.extend_from_slice(row_cells);
            self.rows[row as usize].state = RowState::Committed;
            if !continues {
                break;
            }
            row += 1;
        }

        let line = LogicalLine::reflowable(cells);
        let global_index = history.append(line, unix_nanos)?;
        self.next_logical_line_id = self.next_logical_line_id.max(global_index as i64 + 1);
        Ok(Some(global_index))
    }

    /// Used when leaving alt-screen back to the normal screen: every row that hasn't
    /// already been committed or paged in from history is appended as a fixed-width
    /// line, preserving TUI output byte-for-byte.
    pub fn commit_viewport_as_fixed_width(&mut self, history: &ScrollbackHistory, unix_nanos: i64) -> EngineResult<()> {
        for y in 0..self.height {
            let meta = self.rows[y as usize];
            if meta.state == RowState::Committed || meta.from_history {
                continue;
            }
            let cells = self.grid[y as usize].clone();
            let line = LogicalLine::fixed_width(cells, self.width);
            history.append(line, unix_nanos)?;
            self.rows[y as usize].state = RowState::Committed;
        }
        Ok(())
    }
}
