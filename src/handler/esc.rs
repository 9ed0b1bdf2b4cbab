// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Two-character ESC sequence dispatch: RIS full reset, the classic `ESC 7`/`ESC 8`
//! save/restore-cursor aliases, 7-bit IND/NEL/RI, HTS, and SCS charset designation
//! (`ESC ( `/`ESC ) `).

use super::{EngineCallbacks, TerminalHandler};
use crate::charset::Charset;

impl<C: EngineCallbacks> TerminalHandler<C> {
    pub(super) fn handle_esc(&mut self, intermediates: &[u8], action: u8) {
        match (intermediates, action) {
            (b"", b'c') => self.reset_to_initial_state(),
            (b"", b'7') => self.save_cursor(),
            (b"", b'8') => self.restore_cursor(),
            (b"", b'D') => self.line_feed(),
            (b"", b'M') => self.reverse_index(),
            (b"", b'E') => {
                self.line_feed();
                self.viewport.cursor_x = 0;
            }
            (b"(", final_byte) => self.charset.g0 = Charset::from_final(final_byte),
            (b")", final_byte) => self.charset.g1 = Charset::from_final(final_byte),
            (b"", b'H') => self.tabstops.set(self.viewport.cursor_x),
            _ => {}
        }
    }

    /// ESC `M` (RI): moves up, scrolling the scroll region down by one if already at its
    /// top — the mirror image of [`Self::line_feed`].
    fn reverse_index(&mut self) {
        let (top, bottom) = (self.viewport.scroll_top, self.viewport.scroll_bottom);
        if self.viewport.cursor_y == top {
            self.viewport.scroll_region_down(top, bottom, 1);
        } else if self.viewport.cursor_y > 0 {
            self.viewport.cursor_y -= 1;
        }
    }
}
