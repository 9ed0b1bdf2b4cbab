// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Read-only extraction of the currently-visible wrap chains, used by
//! [`crate::reflow::reflow`] to gather the content that needs rewrapping on resize.

use super::ViewportState;
use crate::cell::Cell;

/// One on-screen logical line, reassembled from its wrap chain of rows.
pub struct ExtractedChain {
    pub cells: Vec<Cell>,
    pub first_row: u16,
    pub row_count: u16,
    /// True if any row in the chain is already `Committed` or `from_history` — such a
    /// chain must not be (re-)committed when reflow reinstalls it.
    pub already_committed: bool,
    pub logical_line_id: i64,
}

impl ViewportState {
    /// Walks `is_first_row`/wrap-chain boundaries top to bottom, reassembling each
    /// logical line currently on screen.
    #[must_use]
    pub fn extract_chains(&self) -> Vec<ExtractedChain> {
        let mut chains = Vec::new();
        let mut y = 0u16;
        while y < self.height {
            let start = y;
            let mut cells = self.grid[y as usize].clone();
            let mut already_committed =
                self.rows[y as usize].state == crate::row::RowState::Committed || self.rows[y as usize].from_history;
            let logical_line_id = self.rows[y as usize].logical_line_id;
            while cells.last().is_some_and(|c| c.wrapped) && y + 1 < self.height {
                y += 1;
                cells.extend_from_slice(&self.grid[y as usize]);
                already_committed |=
                    self.rows[y as usize].state == crate::row::RowState::Committed || self.rows[y as usize].from_history;
            }
            chains.push(ExtractedChain {
                cells,
                first_row: start,
                row_count: y - start + 1,
                already_committed,
                logical_line_id,
            });
            y += 1;
        }
        chains
    }

    /// Resolves a viewport `(row, col)` to a content-coordinate `(logical_line, offset)`
    /// pair for the selection machine.
    ///
    /// A chain already paged in from history keeps its real (non-negative) global
    /// index. A chain still only on screen — not yet committed, or committed but not
    /// yet scrolled off — has no stable id of its own, so it is given a *virtual*
    /// negative id derived from its row: the bottom-most on-screen row is always `-1`
    /// (the singular "current uncommitted line"), and earlier rows count down from
    /// there. This keeps ascending (line, offset) order consistent
    /// across the history/screen boundary (history ids are never negative, so they
    /// always sort before anything still on screen) and lets a multi-row on-screen drag
    /// address each row distinctly, which a single shared `-1` could not.
    #[must_use]
    pub fn content_position_at(&self, row: u16, col: u16) -> (i64, usize) {
        let chains = self.extract_chains();
        for chain in &chains {
            if row >= chain.first_row && row < chain.first_row + chain.row_count {
                let id = if chain.already_committed && chain.logical_line_id >= 0 {
                    chain.logical_line_id
                } else {
                    -(i64::from(self.height) - i64::from(chain.first_row))
                };
                let offset = (row - chain.first_row) as usize * self.width as usize + col as usize;
                return (id, offset.min(chain.cells.len()));
            }
        }
        (-1, 0)
    }

    /// The on-screen chain whose virtual id (see [`Self::content_position_at`]) is
    /// `virtual_id`, trailing blanks trimmed. `None` if `virtual_id` is non-negative
    /// (a real history id, not a screen row) or out of range.
    #[must_use]
    pub fn on_screen_chain_text(&self, virtual_id: i64) -> Option<String> {
        if virtual_id >= 0 {
            return None;
        }
        let first_row = u16::try_from(i64::from(self.height) + virtual_id).ok()?;
        let mut cells = self.extract_chains().into_iter().find(|c| c.first_row == first_row)?.cells;
        crate::logical_line::trim_trailing_blank(&mut cells);
        Some(cells.iter().map(|c| if c.is_empty() { ' ' } else { c.ch }).collect())
    }

    /// The chain index (into [`ViewportState::extract_chains`]'s result) and character
    /// offset within that chain's cell sequence for the current cursor position.
    #[must_use]
    pub fn cursor_chain_position(&self) -> (usize, usize) {
        let chains = self.extract_chains();
        let mut idx = 0;
        for (i, chain) in chains.iter().enumerate() {
            if self.cursor_y >= chain.first_row && self.cursor_y < chain.first_row + chain.row_count {
                idx = i;
                break;
            }
        }
        let chain = &chains[idx];
        let offset = (self.cursor_y - chain.first_row) as usize * self.width as usize + self.cursor_x as usize;
        (idx, offset)
    }
}
