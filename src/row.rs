// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Per-viewport-row metadata: where a row sits in a wrapped logical-line chain, and
//! whether it still needs to be committed to history.

/// Lifecycle of a viewport row:
///
/// ```text
/// Dirty ──(commit)──► Committed ──(scroll off)──► (row discarded)
/// Clean ─(write)──► Dirty
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
    #[default]
    Clean,
    Dirty,
    Committed,
}

/// Metadata tracked alongside each row of cells in [`crate::viewport::ViewportState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetadata {
    /// -1 = unassigned (row has never been committed or paged in from history).
    pub logical_line_id: i64,
    /// Start of a logical line. Mutually exclusive with `is_continuation`.
    pub is_first_row: bool,
    /// Continuation of a logical line that wrapped onto this row.
    pub is_continuation: bool,
    pub state: RowState,
    /// Populated by scrollback paging; such a row must never be re-committed, even if
    /// the handler writes into it (that write breaks the history linkage but does not
    /// flip this flag).
    pub from_history: bool,
}

impl RowMetadata {
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            logical_line_id: -1,
            is_first_row: true,
            is_continuation: false,
            state: RowState::Clean,
            from_history: false,
        }
    }

    /// Writing at column 0 on a continuation row breaks the wrap chain and starts a
    /// fresh logical line here, so a shell repainting a prompt over an old wrapped
    /// line doesn't attach the new text to the previous logical line in history.
    pub fn break_continuation_chain(&mut self) {
        self.is_continuation = false;
        self.is_first_row = true;
        self.logical_line_id = -1;
    }

    pub fn mark_dirty(&mut self) {
        if self.state != RowState::Committed {
            self.state = RowState::Dirty;
        }
    }
}

impl Default for RowMetadata {
    fn default() -> Self { Self::fresh() }
}
