// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`LogicalLine`]: the unit the shell thinks of as "one line," independent of how many
//! viewport rows it currently wraps across.

use crate::cell::Cell;

/// One logical line of scrollback: either reflowable shell output (rewrapped on
/// resize) or a fixed-width snapshot of TUI/scroll-region content (preserved
/// byte-for-byte, clipped or padded on resize — never rewrapped).
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    pub cells: Vec<Cell>,
    /// `Some(w)` when this line was committed from alt-screen/TUI content and must not
    /// be reflowed; clipped or padded to `w` instead.
    pub fixed_width: Option<u16>,
}

impl LogicalLine {
    #[must_use]
    pub fn reflowable(mut cells: Vec<Cell>) -> Self {
        trim_trailing_blank(&mut cells);
        Self {
            cells,
            fixed_width: None,
        }
    }

    #[must_use]
    pub fn fixed_width(cells: Vec<Cell>, width: u16) -> Self {
        Self {
            cells,
            fixed_width: Some(width),
        }
    }

    #[must_use]
    pub fn is_fixed_width(&self) -> bool { self.fixed_width.is_some() }

    #[must_use]
    pub fn len(&self) -> usize { self.cells.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    /// Text content with trailing blanks trimmed, used by search indexing and by
    /// selection text extraction for interior/whole-line ranges.
    #[must_use]
    pub fn text(&self) -> String {
        let mut s: String = self.cells.iter().map(|c| if c.is_empty() { ' ' } else { c.ch }).collect();
        let trimmed_len = s.trim_end_matches(' ').len();
        s.truncate(trimmed_len);
        s
    }

    /// Resize a fixed-width line to `new_width`: clip if shrinking, pad with blank
    /// cells if growing. Reflowable lines never go through this path — they're
    /// rewrapped by [`crate::reflow`] instead.
    pub fn clip_or_pad_fixed_width(&mut self, new_width: u16) {
        debug_assert!(self.fixed_width.is_some());
        let w = new_width as usize;
        self.cells.resize(w, Cell::blank());
        self.fixed_width = Some(new_width);
    }
}

/// Trims trailing empty/space cells from a reflowable row's cell buffer. Fixed-width
/// lines skip this entirely since they must be preserved byte-for-byte.
pub fn trim_trailing_blank(cells: &mut Vec<Cell>) {
    while let Some(last) = cells.last() {
        if last.is_empty() || (last.ch == ' ' && !last.wide) {
            cells.pop();
        } else {
            break;
        }
    }
}
