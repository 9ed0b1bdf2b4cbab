// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`EngineCallbacks`]: the embedder-facing side of [`super::TerminalHandler`] —
//! everything the handler needs to push back out to the PTY or up to the embedder.
//! Every method but `write_to_pty` has a no-op default, since most embedders only
//! care about a handful of these.

use crate::color::Color;

/// Side effects a [`super::TerminalHandler`] cannot produce on its own: writing a
/// response back to the child process, and notifying the embedder of state changes that
/// affect chrome outside the grid (title, default colours, bracketed paste, bell).
pub trait EngineCallbacks {
    /// Writes a response sequence (DSR, DA, colour-query reply, OSC 52 reply) back to
    /// the PTY. Always UTF-8 bytes.
    fn write_to_pty(&mut self, bytes: &[u8]);

    fn on_title_change(&mut self, _title: &str) {}
    fn on_default_fg_change(&mut self, _color: Color) {}
    fn on_default_bg_change(&mut self, _color: Color) {}
    /// Fired before the handler writes its own reply, so an embedder can observe the
    /// query even though it does not need to compute the reply itself.
    fn on_query_default_fg(&mut self) {}
    fn on_query_default_bg(&mut self) {}
    fn on_bracketed_paste_mode_change(&mut self, _enabled: bool) {}
    fn on_bell(&mut self) {}
    /// Fired after a `1049l` restore — the embedder should trigger a full reflow/resize
    /// pass since alt-screen content was never reflow-tracked.
    fn on_screen_restored(&mut self) {}
    /// Fired when a synchronized-update block closes, or after a batch of bytes is fed
    /// outside of one, so the embedder's single-slot refresh channel has something to
    /// coalesce onto.
    fn on_refresh_needed(&mut self) {}
    /// OSC 52 clipboard dispatch path; actually reading/writing the clipboard is a host
    /// concern out of scope for this crate.
    fn on_clipboard_set(&mut self, _selection: char, _base64_data: &[u8]) {}
    fn on_clipboard_get(&mut self, _selection: char) {}
}
