// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`Engine`]: the crate's single public facade — one owner for the pieces that would
//! otherwise have to be wired together by every embedder. It owns one `ViewportState`
//! (via its `TerminalHandler`), one `ScrollbackHistory`, one `VtParser`, and one
//! `SelectionMachine`, and exposes the concurrent entry points a PTY reader, an input
//! forwarder, and an auto-scroll ticker task each drive independently.

use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, Notify};

use crate::{
    config::EngineConfig,
    handler::{EngineCallbacks, TerminalHandler},
    history::ScrollbackHistory,
    parser::VtParser,
    reflow,
    search::SearchHit,
    selection::{AutoScrollTicker, ClickDetector, ClickType, EdgeDirection, Modifiers, SelectionMachine, SelectionText},
};

pub struct Engine<C: EngineCallbacks> {
    history: Arc<ScrollbackHistory>,
    handler: Mutex<TerminalHandler<C>>,
    parser: Mutex<VtParser>,
    selection: Mutex<SelectionMachine>,
    clicks: Mutex<ClickDetector>,
    autoscroll: Mutex<AutoScrollTicker>,
    refresh: Notify,
    config: EngineConfig,
}

impl<C: EngineCallbacks> Engine<C> {
    #[must_use]
    pub fn new(width: u16, height: u16, callbacks: C, config: EngineConfig) -> Self {
        let history = Arc::new(ScrollbackHistory::new(
            config.history_memory_cap_lines,
            config.spill_dir.clone(),
            config.search_result_cap,
        ));
        Self {
            handler: Mutex::new(TerminalHandler::new(width, height, Arc::clone(&history), callbacks)),
            parser: Mutex::new(VtParser::new(config.osc_payload_cap_bytes)),
            selection: Mutex::new(SelectionMachine::new()),
            clicks: Mutex::new(ClickDetector::new(config.click_timeout_ms)),
            autoscroll: Mutex::new(AutoScrollTicker::new(config.auto_scroll_edge_zone_rows, config.auto_scroll_max_speed)),
            refresh: Notify::new(),
            history,
            config,
        }
    }

    #[must_use]
    pub fn history(&self) -> &Arc<ScrollbackHistory> { &self.history }

    #[must_use]
    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Direct access to the handler (viewport, modes, palette) for a renderer that
    /// needs more than the facade's own entry points expose.
    #[must_use]
    pub fn handler(&self) -> &Mutex<TerminalHandler<C>> { &self.handler }

    /// The PTY reader's entry point: feeds one chunk through the parser into the
    /// handler. Held locks never cross an `.await` — both the parser and handler are
    /// fully synchronous once the lock is acquired.
    pub async fn feed_bytes(&self, bytes: &[u8]) {
        let mut parser = self.parser.lock().await;
        let mut handler = self.handler.lock().await;
        parser.feed(bytes, &mut *handler);
        drop(handler);
        drop(parser);
        self.refresh.notify_one();
    }

    /// Runs the reflow algorithm against the new dimensions. A no-op for a degenerate
    /// `0`-sized request.
    pub async fn resize(&self, new_w: u16, new_h: u16) {
        if new_w == 0 || new_h == 0 {
            return;
        }
        let mut handler = self.handler.lock().await;
        if let Err(err) = reflow::reflow(handler.viewport_mut(), &self.history, new_w, new_h).await {
            tracing::warn!(%err, "reflow failed during resize");
        }
        handler.resize_tab_stops(new_w);
        drop(handler);
        self.refresh.notify_one();
    }

    /// Begins a selection gesture at viewport coordinates `(row, col)`. Runs the
    /// click-cycle detector first so a rapid double/triple click at the same spot
    /// upgrades the gesture type automatically.
    pub async fn selection_start(&self, row: u16, col: u16, modifiers: Modifiers) {
        let handler = self.handler.lock().await;
        let (line, offset) = handler.viewport().content_position_at(row, col);
        let click_type = self.clicks.lock().await.register(line, offset, std::time::Instant::now());
        self.selection.lock().await.start(&*handler, line, offset, click_type, modifiers);
    }

    /// Extends the active drag to viewport coordinates `(row, col)`.
    pub async fn selection_update(&self, row: u16, col: u16) {
        let handler = self.handler.lock().await;
        let (line, offset) = handler.viewport().content_position_at(row, col);
        drop(handler);
        self.selection.lock().await.update(line, offset);
    }

    /// Ends the active gesture, returning the extracted selection text.
    pub async fn selection_finish(&self) -> SelectionText {
        let handler = self.handler.lock().await;
        self.selection.lock().await.finish(&*handler)
    }

    pub async fn selection_cancel(&self) { self.selection.lock().await.cancel(); }

    #[must_use]
    pub async fn selection_range(&self) -> Option<(i64, usize, i64, usize)> { self.selection.lock().await.range() }

    /// One tick of the auto-scroll ticker task: given the pointer's current row
    /// (which may sit outside `0..viewport_height` while the drag is held past an
    /// edge) and the elapsed time since the last tick, returns the scroll direction and
    /// line count to apply this tick, if the pointer is still in an edge zone. The
    /// caller (not this method) is responsible for actually shifting whatever history
    /// window is currently displayed and re-issuing `selection_update` against the new
    /// content.
    pub async fn auto_scroll_tick(&self, pointer_row: i32, dt: Duration) -> Option<(EdgeDirection, u32)> {
        let height = self.handler.lock().await.viewport().height();
        self.autoscroll.lock().await.tick(pointer_row, height, dt)
    }

    pub async fn reset_auto_scroll(&self) { self.autoscroll.lock().await.reset(); }

    pub async fn reset_click_cycle(&self) { self.clicks.lock().await.reset(); }

    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        self.history.search(query, max_results.min(self.config.search_result_cap)).await.unwrap_or_else(|err| {
            tracing::warn!(%err, "scrollback search failed");
            Vec::new()
        })
    }

    pub async fn find_line_at(&self, target_time_unix_nanos: i64) -> Option<u64> {
        self.history.find_line_at(target_time_unix_nanos).await.unwrap_or_else(|err| {
            tracing::warn!(%err, "find_line_at failed");
            None
        })
    }

    /// The single-slot refresh signal embedders await between paints: any number of
    /// mutations between two `notified()` calls still only wakes the waiter once, so a
    /// slow renderer coalesces bursts of output into one redraw.
    #[must_use]
    pub fn refresh_signal(&self) -> &Notify { &self.refresh }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullCallbacks {
        written: Vec<Vec<u8>>,
    }

    impl EngineCallbacks for NullCallbacks {
        fn write_to_pty(&mut self, bytes: &[u8]) { self.written.push(bytes.to_vec()); }
    }

    fn engine() -> Engine<NullCallbacks> {
        Engine::new(10, 4, NullCallbacks { written: Vec::new() }, EngineConfig::default())
    }

    #[tokio::test]
    async fn feed_bytes_notifies_refresh() {
        let engine = engine();
        engine.feed_bytes(b"hello").await;
        // notify_one is latched, so this resolves immediately rather than hanging.
        engine.refresh_signal().notified().await;
    }

    #[tokio::test]
    async fn selection_round_trip_extracts_typed_text() {
        let engine = engine();
        engine.feed_bytes(b"hello world").await;
        engine.selection_start(0, 0, Modifiers::empty()).await;
        engine.selection_update(0, 5).await;
        let text = engine.selection_finish().await;
        assert!(text.ok);
        assert_eq!(text.bytes, b"hello");
    }

    #[tokio::test]
    async fn resize_to_zero_is_ignored() {
        let engine = engine();
        engine.feed_bytes(b"abc").await;
        engine.resize(0, 10).await;
        let handler = engine.handler.lock().await;
        assert_eq!(handler.viewport().width(), 10);
    }
}
