// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Structured error types returned by the history/search/selection layers.
//!
//! The VT parser and [`crate::handler::TerminalHandler`] never return an error — a
//! malformed byte stream degrades to garbled glyphs, never a panic or a `Result`. Only
//! the scrollback spill path and the search index's backing store can fail, and those
//! failures are surfaced here so an embedder can log them; none of them unwind the
//! process.

use std::path::PathBuf;

/// Errors surfaced by [`crate::history::ScrollbackHistory`] and
/// [`crate::search::SearchIndex`].
///
/// These are never propagated through the parser or handler (see module docs). History
/// continues serving in-memory content even after a spill failure; search reports are
/// simply empty until the backing store recovers.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to spill scrollback line {global_index} to {path}: {source}")]
    SpillWrite {
        global_index: u64,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to page in scrollback line {global_index} from {path}: {source}")]
    SpillRead {
        global_index: u64,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scrollback spill index is corrupt at offset {offset}: {reason}")]
    SpillIndexCorrupt { offset: u64, reason: &'static str },

    #[error("requested global index {requested} is beyond total_len {total_len}")]
    IndexOutOfRange { requested: u64, total_len: u64 },
}

pub type EngineResult<T> = Result<T, EngineError>;
