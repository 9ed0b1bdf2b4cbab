// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`ScrollbackHistory`]: an append-only, globally-indexed sequence of
//! [`LogicalLine`]s with an in-memory cap and transparent paging beyond it.
//!
//! Global indices are assigned in strict append order and are stable for the lifetime
//! of the process, regardless of whether a given line is still resident in memory or
//! has been spilled. [`append`](ScrollbackHistory::append) is synchronous — it is
//! called directly from [`crate::handler::TerminalHandler`] dispatch, which runs inside
//! `vte::Perform`'s synchronous trait methods — while lookups that may need to page a
//! spilled line back in ([`get`](ScrollbackHistory::get), `search`, `find_line_at`) are
//! `async fn`s that may suspend on the [`SearchIndex`]'s background spill thread.

use std::{collections::VecDeque, path::PathBuf, sync::RwLock};

use crate::{
    error::EngineResult,
    logical_line::LogicalLine,
    search::{SearchHit, SearchIndex},
};

struct Inner {
    resident: VecDeque<LogicalLine>,
    resident_base: u64,
    total_len: u64,
}

pub struct ScrollbackHistory {
    inner: RwLock<Inner>,
    search: SearchIndex,
    memory_cap: usize,
}

impl ScrollbackHistory {
    #[must_use]
    pub fn new(memory_cap_lines: usize, spill_dir: Option<PathBuf>, search_result_cap: usize) -> Self {
        let _ = search_result_cap; // cap is applied at call sites of `search`, not stored here.
        Self {
            inner: RwLock::new(Inner {
                resident: VecDeque::new(),
                resident_base: 0,
                total_len: 0,
            }),
            search: SearchIndex::new(memory_cap_lines, spill_dir),
            memory_cap: memory_cap_lines,
        }
    }

    #[must_use]
    pub fn search_index(&self) -> &SearchIndex { &self.search }

    /// Appends a line, returning the global index assigned to it. Commit order is
    /// exactly append order, since `total_len` only ever increases under the write
    /// lock held for the duration of this call. Indexing into [`SearchIndex`] happens
    /// in the same call so the two never disagree about what has been committed.
    pub fn append(&self, line: LogicalLine, unix_nanos: i64) -> EngineResult<u64> {
        let text = line.text();
        let mut inner = self.inner.write().expect("history lock poisoned");
        let global_index = inner.total_len;
        inner.total_len += 1;
        inner.resident.push_back(line);

        if inner.resident.len() > self.memory_cap {
            inner.resident.pop_front();
            inner.resident_base += 1;
        }
        drop(inner);

        self.search.index_line(global_index, unix_nanos, text)?;
        Ok(global_index)
    }

    #[must_use]
    pub fn total_len(&self) -> u64 { self.inner.read().expect("history lock poisoned").total_len }

    /// Synchronous best-effort lookup used by the selection machine's [`crate::
    /// selection::ContentSource`] implementation, which cannot await a page-in from the
    /// input-forwarder thread. Returns `None` for a spilled line exactly as it would
    /// for one out of range — the caller degrades to empty text rather than blocking.
    #[must_use]
    pub fn get_resident(&self, global_index: u64) -> Option<LogicalLine> {
        let inner = self.inner.read().expect("history lock poisoned");
        if global_index < inner.resident_base || global_index >= inner.total_len {
            return None;
        }
        inner.resident.get((global_index - inner.resident_base) as usize).cloned()
    }

    /// Fetches a line by global index. May suspend on page-in I/O for a spilled line —
    /// callers must not hold the viewport/parser lock across this call.
    pub async fn get(&self, global_index: u64) -> EngineResult<Option<LogicalLine>> {
        let resident_hit = {
            let inner = self.inner.read().expect("history lock poisoned");
            if global_index >= inner.total_len {
                return Ok(None);
            }
            if global_index >= inner.resident_base {
                let slot = (global_index - inner.resident_base) as usize;
                Some(inner.resident.get(slot).cloned())
            } else {
                None
            }
        };
        if let Some(hit) = resident_hit {
            return Ok(hit);
        }

        // Spilled beyond the in-memory window: reconstruct a plain-text line from the
        // search index's backing store. Per-cell styling does not survive eviction —
        // only text and timestamp are persisted — an accepted loss for lines old
        // enough to have paged out.
        let text = self.search.get_text_for_history(global_index).await?;
        Ok(text.map(|t| LogicalLine::reflowable(t.chars().map(plain_cell).collect())))
    }

    pub async fn get_timestamp(&self, global_index: u64) -> EngineResult<Option<i64>> {
        self.search.get_timestamp(global_index).await
    }

    /// Fetches `range.start..range.end`, skipping indices beyond `total_len`.
    pub async fn range(&self, range: std::ops::Range<u64>) -> EngineResult<Vec<LogicalLine>> {
        let mut out = Vec::with_capacity((range.end - range.start) as usize);
        for idx in range {
            if let Some(line) = self.get(idx).await? {
                out.push(line);
            }
        }
        Ok(out)
    }

    pub async fn search(&self, query: &str, max_results: usize) -> EngineResult<Vec<SearchHit>> {
        self.search.search(query, max_results).await
    }

    pub async fn find_line_at(&self, target_time: i64) -> EngineResult<Option<u64>> {
        self.search.find_line_at(target_time).await
    }

    /// CSI J 3 (erase scrollback): discards in-memory history. The search index keeps
    /// its own spilled records on disk but future lookups below the new base return
    /// `None`, since `resident_base`/`total_len` jump forward to the same point.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("history lock poisoned");
        inner.resident.clear();
        inner.resident_base = inner.total_len;
        drop(inner);
        self.search.clear();
    }
}

fn plain_cell(ch: char) -> crate::cell::Cell {
    crate::cell::Cell {
        ch,
        ..crate::cell::Cell::blank()
    }
}
