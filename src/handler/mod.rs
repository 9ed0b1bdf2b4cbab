// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`TerminalHandler`]: the glue that implements [`crate::parser::Dispatch`] on top of
//! [`crate::viewport::ViewportState`] + [`crate::history::ScrollbackHistory`]. It owns
//! modes, the palette, tab stops, the active character set, saved-cursor state for
//! `DECSC`/`DECRC`/`CSI s`/`CSI u`, the alt-screen-saved main viewport, and the
//! synchronized-update depth counter.
//!
//! Dispatch never returns an error to the reader — a failed history commit is logged
//! via `tracing` and otherwise ignored; the viewport keeps serving in-memory content
//! regardless.

mod callbacks;
mod csi;
mod esc;
mod mode;
mod osc;
mod sgr;

pub use callbacks::EngineCallbacks;

use std::sync::Arc;

use crate::{
    cell::CellStyle,
    charset::CharsetState,
    history::ScrollbackHistory,
    modes::ModeFlags,
    palette::Palette,
    parser::{Dispatch, Event},
    selection::ContentSource,
    tabstops::TabStops,
    viewport::ViewportState,
};

#[derive(Debug, Clone, Copy)]
struct SavedCursor {
    x: u16,
    y: u16,
    style: CellStyle,
    charset: CharsetState,
    origin_mode: bool,
}

pub struct TerminalHandler<C: EngineCallbacks> {
    pub(crate) viewport: ViewportState,
    /// The main-screen viewport, parked here while `1049h` has the alt screen active.
    saved_main: Option<Box<ViewportState>>,
    history: Arc<ScrollbackHistory>,
    palette: Palette,
    modes: ModeFlags,
    tabstops: TabStops,
    charset: CharsetState,
    style: CellStyle,
    saved_cursor: Option<SavedCursor>,
    sync_depth: u32,
    /// Input-start column for the prompt currently owning the cursor's (still
    /// uncommitted) line, set by OSC 133 `B` and consumed by the selection machine's
    /// [`ContentSource`] impl below.
    current_prompt_input_col: Option<usize>,
    pub callbacks: C,
}

impl<C: EngineCallbacks> TerminalHandler<C> {
    #[must_use]
    pub fn new(width: u16, height: u16, history: Arc<ScrollbackHistory>, callbacks: C) -> Self {
        Self {
            viewport: ViewportState::new(width, height),
            saved_main: None,
            history,
            palette: Palette::new(),
            modes: ModeFlags::defaults(),
            tabstops: TabStops::new(width),
            charset: CharsetState::default(),
            style: CellStyle::default(),
            saved_cursor: None,
            sync_depth: 0,
            current_prompt_input_col: None,
            callbacks,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState { &self.viewport }

    pub fn viewport_mut(&mut self) -> &mut ViewportState { &mut self.viewport }

    /// Re-derives tab stops for the new width after a resize/reflow pass: stops
    /// beyond the new right margin are dropped, narrower defaults are left as
    /// whatever the shell already configured.
    pub fn resize_tab_stops(&mut self, new_width: u16) { self.tabstops.resize(new_width); }

    #[must_use]
    pub fn modes(&self) -> ModeFlags { self.modes }

    #[must_use]
    pub fn palette(&self) -> &Palette { &self.palette }

    /// While positive, consumer refresh notifications are suppressed even though
    /// mutations keep marking rows dirty.
    #[must_use]
    pub fn sync_depth(&self) -> u32 { self.sync_depth }

    fn now_nanos() -> i64 { chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0) }

    fn write_reply(&mut self, bytes: &[u8]) { self.callbacks.write_to_pty(bytes); }

    fn handle_print(&mut self, ch: char, width: u8) {
        let ch = self.charset.active().translate(ch);
        let style = self.style;
        let insert = self.modes.contains(ModeFlags::INSERT);
        let decawm = self.modes.contains(ModeFlags::AUTOWRAP);
        let unix_nanos = Self::now_nanos();
        if let Err(err) = self.viewport.write(ch, width, style, insert, decawm, &self.history, unix_nanos) {
            tracing::warn!(%err, "history commit failed while printing; continuing in-memory only");
        }
    }

    fn handle_execute(&mut self, byte: u8) {
        match byte {
            0x0A | 0x0B | 0x0C => self.line_feed(),
            0x0D => {
                self.viewport.cursor_x = 0;
                self.viewport.wrap_latch = false;
            }
            0x08 => {
                self.viewport.cursor_x = self.viewport.cursor_x.saturating_sub(1);
                self.viewport.wrap_latch = false;
            }
            0x09 => self.tab(),
            0x07 => self.callbacks.on_bell(),
            0x0E => self.charset.shifted_to_g1 = true,
            0x0F => self.charset.shifted_to_g1 = false,
            _ => {}
        }
    }

    /// LF/IND: moves down, scrolling the current scroll region up by one (committing
    /// the departing row only when the region's top is row 0).
    fn line_feed(&mut self) {
        let unix_nanos = Self::now_nanos();
        let (top, bottom) = (self.viewport.scroll_top, self.viewport.scroll_bottom);
        if self.viewport.cursor_y == bottom {
            let commit = top == 0 && !self.viewport.alt_screen;
            if let Err(err) = self.viewport.scroll_region_up(top, bottom, 1, &self.history, unix_nanos, commit) {
                tracing::warn!(%err, "history commit failed during linefeed scroll");
            }
        } else if self.viewport.cursor_y < self.viewport.height() - 1 {
            self.viewport.cursor_y += 1;
        }
    }

    fn tab(&mut self) {
        let next = self.tabstops.next_stop(self.viewport.cursor_x);
        self.viewport.cursor_x = next.min(self.viewport.width() - 1);
        self.viewport.wrap_latch = false;
    }

    fn save_cursor(&mut self) {
        self.saved_cursor = Some(SavedCursor {
            x: self.viewport.cursor_x,
            y: self.viewport.cursor_y,
            style: self.style,
            charset: self.charset,
            origin_mode: self.modes.contains(ModeFlags::ORIGIN),
        });
    }

    fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved_cursor {
            self.viewport.set_cursor(saved.x, saved.y);
            self.style = saved.style;
            self.charset = saved.charset;
            self.modes.set(ModeFlags::ORIGIN, saved.origin_mode);
        }
    }

    /// ESC `c` (RIS): tears down every piece of mutable state and starts over at the
    /// current dimensions, exactly as a freshly constructed handler would.
    fn reset_to_initial_state(&mut self) {
        let (w, h) = (self.viewport.width(), self.viewport.height());
        self.viewport = ViewportState::new(w, h);
        self.saved_main = None;
        self.palette = Palette::new();
        self.modes = ModeFlags::defaults();
        self.tabstops = TabStops::new(w);
        self.charset = CharsetState::default();
        self.style = CellStyle::default();
        self.saved_cursor = None;
        self.sync_depth = 0;
        self.current_prompt_input_col = None;
    }
}

impl<C: EngineCallbacks> Dispatch for TerminalHandler<C> {
    fn dispatch(&mut self, event: Event<'_>) {
        match event {
            Event::Print(ch, width) => self.handle_print(ch, width),
            Event::Execute(byte) => self.handle_execute(byte),
            Event::CsiDispatch {
                private,
                params,
                intermediates,
                action,
            } => self.handle_csi(private, &params, &intermediates, action),
            Event::OscDispatch {
                command,
                payload,
                bell_terminated,
            } => self.handle_osc(&command, payload, bell_terminated),
            Event::EscDispatch { intermediates, action } => self.handle_esc(&intermediates, action),
            // DCS is recognised but ignored; no DCS-driven feature is implemented.
            Event::DcsHook { .. } | Event::DcsPut(_) | Event::DcsUnhook => {}
        }
    }
}

/// Lets the selection machine read content without awaiting history page-in: the
/// current uncommitted line is resolved by reading the viewport's current-line cells
/// rather than history. Committed lines are read via [`ScrollbackHistory::
/// get_resident`], which degrades to an empty string for a line old enough to have
/// spilled, rather than blocking the input-forwarder thread.
impl<C: EngineCallbacks> ContentSource for TerminalHandler<C> {
    fn line_text(&self, logical_line: i64) -> String {
        if logical_line < 0 {
            return self.viewport.on_screen_chain_text(logical_line).unwrap_or_default();
        }
        self.history.get_resident(logical_line as u64).map(|line| line.text()).unwrap_or_default()
    }

    fn prompt_input_start(&self, logical_line: i64) -> Option<usize> {
        if logical_line >= 0 {
            return None;
        }
        let prompt_row = self.viewport.prompt_start_row?;
        let bottom_most_first_row = self.viewport.height() as i64 + logical_line;
        (i64::from(prompt_row) == bottom_most_first_row).then_some(self.current_prompt_input_col).flatten()
    }
}
