// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The atomic display unit: a [`Cell`], its [`CellAttrs`] bitset, and the glyph width
//! classification used by the print path.

use crate::color::Color;

bitflags::bitflags! {
    /// SGR text attributes. Stored as a bitset on every [`Cell`] so that style runs
    /// don't need a side table — cheap to copy, cheap to compare.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellAttrs: u16 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const REVERSE   = 1 << 4;
        const BLINK     = 1 << 5;
        const HIDDEN    = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

/// One addressable character position in the grid.
///
/// `ch == '\0'` is the empty-cell sentinel (never printed, never matched by search or
/// selection text extraction beyond trailing-space trim).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub attrs: CellAttrs,
    /// Set on the leading cell of a 2-column-wide glyph; the trailing cell carries
    /// `ch == '\0'` and `wide == true` as its placeholder.
    pub wide: bool,
    /// Set on the last cell of a row when the next row is a visual continuation of the
    /// same logical line (consumed by the pending-wrap latch on the next print, and by
    /// reflow to locate wrap chains).
    pub wrapped: bool,
}

impl Cell {
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            ch: '\0',
            fg: Color::Default,
            bg: Color::Default,
            attrs: CellAttrs::empty(),
            wide: false,
            wrapped: false,
        }
    }

    /// A blank cell carrying the current erase-background color, used by the erase
    /// family of operations so that cleared regions show the right background instead
    /// of always reverting to the terminal default.
    #[must_use]
    pub const fn erased(bg: Color) -> Self {
        Self {
            ch: '\0',
            fg: Color::Default,
            bg,
            attrs: CellAttrs::empty(),
            wide: false,
            wrapped: false,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool { self.ch == '\0' }
}

impl Default for Cell {
    fn default() -> Self { Self::blank() }
}

/// The fg/bg/attrs a [`crate::handler::TerminalHandler`] currently has selected via SGR,
/// handed to [`crate::viewport::ViewportState::write`] so the viewport itself never has
/// to know about palette resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub attrs: CellAttrs,
}

/// Display width of a printed character: 0 (combining/control), 1, or 2 (East Asian
/// wide).
#[must_use]
pub fn char_width(ch: char) -> u8 {
    use unicode_width::UnicodeWidthChar;
    match ch {
        '\0' => 0,
        _ => match ch.width() {
            Some(0) => 0,
            Some(w) if w >= 2 => 2,
            _ => 1,
        },
    }
}
