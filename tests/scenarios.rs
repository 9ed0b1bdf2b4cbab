// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Black-box end-to-end scenarios, one per literal input described for the viewport +
//! selection + history model.

use vt_engine::{modes::ModeFlags, selection::Modifiers, Engine, EngineCallbacks, EngineConfig};

struct NullCallbacks;
impl EngineCallbacks for NullCallbacks {
    fn write_to_pty(&mut self, _bytes: &[u8]) {}
}

fn engine(width: u16, height: u16) -> Engine<NullCallbacks> {
    Engine::new(width, height, NullCallbacks, EngineConfig::default())
}

#[tokio::test]
async fn plain_echo_no_wrap() {
    let engine = engine(40, 10);
    engine.feed_bytes(b"hello world\n").await;

    let handler = engine.handler();
    let handler = handler.lock().await;
    assert_eq!(handler.viewport().row_text(0), "hello world");
    assert_eq!(handler.viewport().cursor_x, 0);
    assert_eq!(handler.viewport().cursor_y, 1);
}

#[tokio::test]
async fn line_wrap_at_right_margin() {
    let engine = engine(10, 10);
    engine.feed_bytes(b"ABCDEFGHIJKLMNOPQRST").await;

    let handler = engine.handler();
    let handler = handler.lock().await;
    assert_eq!(handler.viewport().row_text(0), "ABCDEFGHIJ");
    assert!(handler.viewport().row(0).last().unwrap().wrapped);
    assert_eq!(handler.viewport().row_text(1), "KLMNOPQRST");
}

#[tokio::test]
async fn alt_screen_isolates_content() {
    let engine = engine(20, 5);
    engine.feed_bytes(b"Main").await;
    engine.feed_bytes(b"\x1b[?1049h").await;
    engine.feed_bytes(b"Alt").await;

    {
        let handler = engine.handler();
        let handler = handler.lock().await;
        assert!(handler.modes().contains(ModeFlags::ALT_SCREEN));
        assert_eq!(handler.viewport().row_text(0), "Alt");
    }

    engine.feed_bytes(b"\x1b[?1049l").await;
    let handler = engine.handler();
    let handler = handler.lock().await;
    assert!(!handler.modes().contains(ModeFlags::ALT_SCREEN));
    assert_eq!(handler.viewport().row_text(0), "Main");
}

#[tokio::test]
async fn alt_screen_exit_preserves_tui_content_as_fixed_width_history() {
    let engine = engine(20, 5);
    engine.feed_bytes(b"\x1b[?1049h").await;
    engine.feed_bytes(b"htop output").await;
    assert_eq!(engine.history().total_len(), 0);

    engine.feed_bytes(b"\x1b[?1049l").await;
    assert!(engine.history().total_len() > 0);
}

#[tokio::test]
async fn scroll_region_confined_scroll_does_not_commit() {
    let engine = engine(40, 5);
    engine.feed_bytes(b"\x1b[2;4r").await; // DECSTBM rows 2..4 (1-based)
    for i in 0..10u8 {
        let line = format!("line{i}\n");
        engine.feed_bytes(line.as_bytes()).await;
    }

    // None of those scrolls happened at the full-screen top, so nothing was committed.
    assert_eq!(engine.history().total_len(), 0);
}

#[tokio::test]
async fn full_screen_scroll_commits_departing_rows() {
    let engine = engine(40, 3);
    for i in 0..5u8 {
        let line = format!("row{i}\n");
        engine.feed_bytes(line.as_bytes()).await;
    }
    assert!(engine.history().total_len() > 0);
}

#[tokio::test]
async fn triple_click_skips_prompt_input_start_unless_shift() {
    // OSC 133 B must fire once the cursor sits right after the prompt glyph, so the
    // input-start column it records is 2 ("$ ").
    let engine = engine(40, 10);
    engine.feed_bytes(b"\x1b]133;A\x07").await;
    engine.feed_bytes(b"$ ").await;
    engine.feed_bytes(b"\x1b]133;B\x07").await;
    engine.feed_bytes(b"cargo build").await;

    engine.selection_start(0, 20, Modifiers::empty()).await;
    // Triple-click requires three registered clicks at the same spot.
    engine.selection_start(0, 20, Modifiers::empty()).await;
    engine.selection_start(0, 20, Modifiers::empty()).await;
    let range = engine.selection_range().await.unwrap();
    assert_eq!(range.1, 2); // input starts at column 2, after "$ "

    engine.selection_cancel().await;
    engine.reset_click_cycle().await;
    engine.selection_start(0, 20, Modifiers::SHIFT).await;
    engine.selection_start(0, 20, Modifiers::SHIFT).await;
    engine.selection_start(0, 20, Modifiers::SHIFT).await;
    let range = engine.selection_range().await.unwrap();
    assert_eq!(range.1, 0);
}

#[tokio::test]
async fn repaint_at_column_zero_breaks_continuation_chain() {
    let engine = engine(10, 5);
    engine.feed_bytes(b"ABCDEFGHIJKLMNO").await;
    {
        let handler = engine.handler();
        let handler = handler.lock().await;
        assert!(handler.viewport().row_metadata(1).is_continuation);
    }

    // Move to row 1 (1-based row 2), column 0, and repaint as a fresh prompt.
    engine.feed_bytes(b"\x1b[2;1H$ ").await;
    let handler = engine.handler();
    let handler = handler.lock().await;
    let meta = handler.viewport().row_metadata(1);
    assert!(!meta.is_continuation);
    assert!(meta.is_first_row);
}

#[tokio::test]
async fn search_finds_the_one_matching_line() {
    let engine = engine(80, 24);
    for i in 0..1000u32 {
        let line = if i == 317 { "has the needle in it\n".to_string() } else { format!("filler {i}\n") };
        engine.feed_bytes(line.as_bytes()).await;
    }

    let hits = engine.search("needle", 100).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].global_index, 317);
}

#[tokio::test]
async fn click_type_cycles_without_shared_state_bleeding_across_lines() {
    let engine = engine(40, 10);
    engine.feed_bytes(b"hello world\nsecond line\n").await;

    engine.selection_start(0, 0, Modifiers::empty()).await;
    engine.selection_update(1, 6).await;
    let text = engine.selection_finish().await;
    assert_eq!(text.bytes, b"hello world\nsecond");
}
