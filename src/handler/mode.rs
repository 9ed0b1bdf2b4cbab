// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Private (`CSI ?h`/`?l`) and ANSI (`CSI h`/`l`) mode toggles, plus the two modes
//! whose side effects reach beyond a single bit: alt-screen save/restore and
//! synchronized-update depth.

use super::{EngineCallbacks, TerminalHandler};
use crate::{modes::ModeFlags, parser::CsiParams, viewport::ViewportState};

impl<C: EngineCallbacks> TerminalHandler<C> {
    pub(super) fn set_private_modes(&mut self, params: &CsiParams, enable: bool) {
        for code in params.iter_primary() {
            match code {
                1 => self.modes.set(ModeFlags::APP_CURSOR_KEYS, enable),
                6 => self.modes.set(ModeFlags::ORIGIN, enable),
                7 => self.modes.set(ModeFlags::AUTOWRAP, enable),
                25 => self.modes.set(ModeFlags::CURSOR_VISIBLE, enable),
                69 => self.modes.set(ModeFlags::LEFT_RIGHT_MARGIN, enable),
                1000 => self.modes.set(ModeFlags::MOUSE_X10, enable),
                1002 => self.modes.set(ModeFlags::MOUSE_BUTTON, enable),
                1003 => self.modes.set(ModeFlags::MOUSE_ANY, enable),
                1006 => self.modes.set(ModeFlags::MOUSE_SGR, enable),
                1049 => self.set_alt_screen(enable),
                2004 => {
                    self.modes.set(ModeFlags::BRACKETED_PASTE, enable);
                    self.callbacks.on_bracketed_paste_mode_change(enable);
                }
                2026 => self.set_sync_update(enable),
                _ => {}
            }
        }
    }

    pub(super) fn set_ansi_modes(&mut self, params: &CsiParams, enable: bool) {
        for code in params.iter_primary() {
            if code == 4 {
                self.modes.set(ModeFlags::INSERT, enable);
            }
        }
    }

    /// `CSI ?1049h`/`l`: saves/restores the full main-screen viewport and cursor,
    /// installing a freshly cleared grid for the alt screen. Reflow never touches the
    /// alt screen's content on resize (`ViewportState::alt_screen`).
    fn set_alt_screen(&mut self, enable: bool) {
        if enable {
            if self.saved_main.is_none() {
                self.save_cursor();
                let (w, h) = (self.viewport.width(), self.viewport.height());
                let mut alt = ViewportState::new(w, h);
                alt.alt_screen = true;
                alt.erase_bg = self.viewport.erase_bg;
                let main = std::mem::replace(&mut self.viewport, alt);
                self.saved_main = Some(Box::new(main));
                self.modes.insert(ModeFlags::ALT_SCREEN);
            }
        } else if let Some(main) = self.saved_main.take() {
            let mut alt = std::mem::replace(&mut self.viewport, *main);
            if let Err(err) = alt.commit_viewport_as_fixed_width(&self.history, Self::now_nanos()) {
                tracing::warn!(%err, "history commit failed while preserving alt-screen content");
            }
            self.restore_cursor();
            self.modes.remove(ModeFlags::ALT_SCREEN);
            self.callbacks.on_screen_restored();
        }
    }

    /// `CSI ?2026h`/`l` (DEC synchronized update): while depth is positive, mutations
    /// still mark rows dirty but the consumer refresh is suppressed; on the drop back to
    /// zero, every row is marked dirty and a single refresh fires.
    fn set_sync_update(&mut self, enable: bool) {
        if enable {
            self.sync_depth += 1;
        } else if self.sync_depth > 0 {
            self.sync_depth -= 1;
            if self.sync_depth == 0 {
                self.viewport.mark_all_dirty();
                self.callbacks.on_refresh_needed();
            }
        }
    }
}
