// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! CSI final-byte dispatch: cursor motion, erase/insert/delete families, scroll region
//! and margin setup, device status/attribute replies, and tab-stop control. SGR lives
//! in [`super::sgr`]; private/ANSI mode toggles live in [`super::mode`].

use super::{EngineCallbacks, TerminalHandler};
use crate::parser::CsiParams;

impl<C: EngineCallbacks> TerminalHandler<C> {
    pub(super) fn handle_csi(&mut self, private: Option<u8>, params: &CsiParams, _intermediates: &[u8], action: char) {
        match (private, action) {
            (None, 'A') => self.move_cursor(0, -i32::from(params.get_or(0, 1))),
            (None, 'B') => self.move_cursor(0, i32::from(params.get_or(0, 1))),
            (None, 'C') => self.move_cursor(i32::from(params.get_or(0, 1)), 0),
            (None, 'D') => self.move_cursor(-i32::from(params.get_or(0, 1)), 0),
            (None, 'E') => {
                self.move_cursor(0, i32::from(params.get_or(0, 1)));
                self.viewport.cursor_x = 0;
            }
            (None, 'F') => {
                self.move_cursor(0, -i32::from(params.get_or(0, 1)));
                self.viewport.cursor_x = 0;
            }
            (None, 'G') => {
                let col = params.get_or(0, 1).saturating_sub(1);
                self.viewport.set_cursor(col, self.viewport.cursor_y);
            }
            (None, 'd') => {
                let row = params.get_or(0, 1).saturating_sub(1);
                self.viewport.set_cursor(self.viewport.cursor_x, row);
            }
            (None, 'H' | 'f') => {
                let row = params.get_or(0, 1).saturating_sub(1);
                let col = params.get_or(1, 1).saturating_sub(1);
                let origin = self.modes.contains(crate::modes::ModeFlags::ORIGIN);
                self.viewport.set_cursor_origin_aware(col, row, origin);
            }
            (None, 'J') => match params.get_or(0, 0) {
                0 => self.viewport.erase_to_eos(),
                1 => self.viewport.erase_from_sos(),
                2 => self.viewport.erase_screen(),
                3 => self.history.clear(),
                _ => {}
            },
            (None, 'K') => match params.get_or(0, 0) {
                0 => self.viewport.erase_to_eol(),
                1 => self.viewport.erase_from_sol(),
                2 => self.viewport.erase_line(),
                _ => {}
            },
            (None, 'L') => self.viewport.insert_lines(params.get_or(0, 1)),
            (None, 'M') => self.viewport.delete_lines(params.get_or(0, 1)),
            (None, 'P') => self.viewport.delete_chars(params.get_or(0, 1)),
            (None, '@') => self.viewport.insert_chars(params.get_or(0, 1)),
            (None, 'X') => self.viewport.erase_chars(params.get_or(0, 1)),
            (None, 'r') => self.set_scroll_region(params),
            (None, 's') => self.handle_csi_s(params),
            (None, 'u') => self.restore_cursor(),
            (None, 'm') => self.apply_sgr(params),
            (None, 'n') => self.handle_dsr(params),
            (None, 'c') | (Some(b'?'), 'c') => self.write_reply(b"\x1b[?6c"),
            (Some(b'>'), 'c') => self.write_reply(b"\x1b[>0;10;0c"),
            (None, 'g') => match params.get_or(0, 0) {
                0 => self.tabstops.clear(self.viewport.cursor_x),
                3 => self.tabstops.clear_all(),
                _ => {}
            },
            (None, 'W') => self.tabstops.set(self.viewport.cursor_x),
            (Some(b'?'), 'h') => self.set_private_modes(params, true),
            (Some(b'?'), 'l') => self.set_private_modes(params, false),
            (None, 'h') => self.set_ansi_modes(params, true),
            (None, 'l') => self.set_ansi_modes(params, false),
            _ => {}
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let x = (i32::from(self.viewport.cursor_x) + dx).clamp(0, i32::from(self.viewport.width()) - 1) as u16;
        let y = (i32::from(self.viewport.cursor_y) + dy).clamp(0, i32::from(self.viewport.height()) - 1) as u16;
        self.viewport.set_cursor(x, y);
    }

    /// CSI `r` (DECSTBM): sets the scroll region, ignoring a degenerate `top >= bottom`
    /// request, then homes the cursor per the usual DECSTBM side effect.
    fn set_scroll_region(&mut self, params: &CsiParams) {
        let top = params.get_or(0, 1).saturating_sub(1);
        let bottom = params.get_or(1, self.viewport.height()).saturating_sub(1).min(self.viewport.height() - 1);
        if top < bottom {
            self.viewport.scroll_top = top;
            self.viewport.scroll_bottom = bottom;
        }
        let origin = self.modes.contains(crate::modes::ModeFlags::ORIGIN);
        self.viewport.set_cursor_origin_aware(0, 0, origin);
    }

    /// CSI `s`: DECSLRM when DECLRMM (`?69`) is enabled, otherwise the classic
    /// save-cursor alias.
    fn handle_csi_s(&mut self, params: &CsiParams) {
        if self.modes.contains(crate::modes::ModeFlags::LEFT_RIGHT_MARGIN) {
            let left = params.get_or(0, 1).saturating_sub(1);
            let right = params.get_or(1, self.viewport.width()).saturating_sub(1).min(self.viewport.width() - 1);
            if left < right {
                self.viewport.left_margin = left;
                self.viewport.right_margin = right;
            }
        } else {
            self.save_cursor();
        }
    }

    fn handle_dsr(&mut self, params: &CsiParams) {
        match params.get_or(0, 0) {
            5 => self.write_reply(b"\x1b[0n"),
            6 => {
                let reply = format!("\x1b[{};{}R", self.viewport.cursor_y + 1, self.viewport.cursor_x + 1);
                self.write_reply(reply.as_bytes());
            }
            _ => {}
        }
    }
}
