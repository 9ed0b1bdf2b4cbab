// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Time- and content-indexed scrollback: every line ever appended to history is
//! indexed here by (global_index, append time, trimmed text), supporting substring
//! search and time→line lookup that stay consistent with history commits.
//!
//! Entries are kept resident up to a configured cap; older entries are handed off to a
//! dedicated background thread ([`spill::SpillHandle`]) that owns the on-disk log. The
//! handoff is fire-and-forget, so [`SearchIndex::index_line`] — called from the same
//! synchronous critical section as [`crate::history::ScrollbackHistory::append`] —
//! never has to cross an await point. Only a page-in read (an index below the
//! resident window) needs to await the background thread's response.

mod spill;

use std::{collections::VecDeque, path::PathBuf, sync::RwLock};

pub use spill::SpillHandle;

use crate::error::EngineResult;

#[derive(Debug, Clone)]
struct SearchEntry {
    unix_nanos: i64,
    text: String,
}

struct Inner {
    resident: VecDeque<SearchEntry>,
    resident_base: u64,
    total_len: u64,
    spill: Option<SpillHandle>,
    memory_cap: usize,
}

/// A single substring search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub global_index: u64,
    pub match_start: usize,
    pub match_end: usize,
}

pub struct SearchIndex {
    inner: RwLock<Inner>,
    spill_dir: Option<PathBuf>,
}

impl SearchIndex {
    #[must_use]
    pub fn new(memory_cap: usize, spill_dir: Option<PathBuf>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                resident: VecDeque::new(),
                resident_base: 0,
                total_len: 0,
                spill: None,
                memory_cap,
            }),
            spill_dir,
        }
    }

    /// Indexes a newly-appended line. Synchronous and non-blocking on the hot path:
    /// overflow entries are handed to the background spill thread rather than written
    /// inline, so this can be called directly from [`crate::parser`] dispatch (which
    /// runs inside `vte::Perform`'s synchronous trait methods).
    pub fn index_line(&self, global_index: u64, unix_nanos: i64, text: String) -> EngineResult<()> {
        let mut inner = self.inner.write().expect("search index lock poisoned");
        debug_assert_eq!(global_index, inner.total_len, "global index must be monotonic");
        inner.total_len += 1;
        inner.resident.push_back(SearchEntry { unix_nanos, text });

        if inner.resident.len() > inner.memory_cap {
            let overflow_count = inner.resident.len() - inner.memory_cap;
            if let Some(dir) = self.spill_dir.clone() {
                if inner.spill.is_none() {
                    inner.spill = Some(SpillHandle::spawn(&dir, inner.resident_base)?);
                }
                let spill = inner.spill.as_ref().expect("just initialized");
                for offset in 0..overflow_count {
                    let entry = inner.resident[offset].clone();
                    spill.append(inner.resident_base + offset as u64, entry.unix_nanos, entry.text);
                }
            }
            for _ in 0..overflow_count {
                inner.resident.pop_front();
            }
            inner.resident_base += overflow_count as u64;
        }
        Ok(())
    }

    #[must_use]
    pub fn total_len(&self) -> u64 { self.inner.read().expect("search index lock poisoned").total_len }

    /// Discards all indexed content (CSI J 3 / "clear scrollback") while preserving
    /// `total_len` so global indices assigned after the clear keep counting upward.
    /// The background spill thread (if any) is dropped along with its handle; its files
    /// are left on disk but nothing will read from them again, since `resident_base`
    /// jumps past every index they cover.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("search index lock poisoned");
        inner.resident.clear();
        inner.resident_base = inner.total_len;
        inner.spill = None;
    }

    /// O(1) when `global_index` is resident; awaits a seeked disk read via the
    /// background spill thread otherwise.
    pub async fn get_timestamp(&self, global_index: u64) -> EngineResult<Option<i64>> {
        let (resident_hit, spill) = {
            let inner = self.inner.read().expect("search index lock poisoned");
            if global_index >= inner.total_len {
                return Ok(None);
            }
            if global_index >= inner.resident_base {
                let slot = (global_index - inner.resident_base) as usize;
                (Some(inner.resident.get(slot).map(|e| e.unix_nanos)), None)
            } else {
                (None, inner.spill.clone())
            }
        };
        if let Some(hit) = resident_hit {
            return Ok(hit);
        }
        match spill {
            Some(spill) => spill.read(global_index).await.map(|(ts, _text)| Some(ts)),
            None => Ok(None),
        }
    }

    async fn get_text(&self, global_index: u64) -> EngineResult<Option<String>> {
        let (resident_hit, spill) = {
            let inner = self.inner.read().expect("search index lock poisoned");
            if global_index >= inner.total_len {
                return Ok(None);
            }
            if global_index >= inner.resident_base {
                let slot = (global_index - inner.resident_base) as usize;
                (Some(inner.resident.get(slot).map(|e| e.text.clone())), None)
            } else {
                (None, inner.spill.clone())
            }
        };
        if let Some(hit) = resident_hit {
            return Ok(hit);
        }
        match spill {
            Some(spill) => spill.read(global_index).await.map(|(_ts, text)| Some(text)),
            None => Ok(None),
        }
    }

    /// Exposed for [`crate::history::ScrollbackHistory::get`] to reconstruct a
    /// plain-text [`crate::logical_line::LogicalLine`] for a line that has been spilled
    /// (and thus lost its cell-level styling — only text and timestamp survive
    /// eviction).
    pub(crate) async fn get_text_for_history(&self, global_index: u64) -> EngineResult<Option<String>> {
        self.get_text(global_index).await
    }

    /// Case-insensitive substring search, capped at `max_results`, ascending by
    /// global_index.
    pub async fn search(&self, query: &str, max_results: usize) -> EngineResult<Vec<SearchHit>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();
        let mut hits = Vec::new();

        let spilled_range = self.inner.read().expect("search index lock poisoned").resident_base;

        // Spilled range first (ascending), then resident range, so overall order stays
        // ascending by global_index without needing to merge two sorted lists.
        for idx in 0..spilled_range {
            if hits.len() >= max_results {
                return Ok(hits);
            }
            if let Some(text) = self.get_text(idx).await? {
                if let Some((start, end)) = find_ci(&text, &needle) {
                    hits.push(SearchHit {
                        global_index: idx,
                        match_start: start,
                        match_end: end,
                    });
                }
            }
        }

        let inner = self.inner.read().expect("search index lock poisoned");
        for (offset, entry) in inner.resident.iter().enumerate() {
            if hits.len() >= max_results {
                break;
            }
            if let Some((start, end)) = find_ci(&entry.text, &needle) {
                hits.push(SearchHit {
                    global_index: inner.resident_base + offset as u64,
                    match_start: start,
                    match_end: end,
                });
            }
        }
        Ok(hits)
    }

    /// Returns the largest global_index whose append time is ≤ `target_time`, or the
    /// smallest whose append time is ≥ `target_time` if none precede it.
    pub async fn find_line_at(&self, target_time: i64) -> EngineResult<Option<u64>> {
        let total_len = self.inner.read().expect("search index lock poisoned").total_len;
        if total_len == 0 {
            return Ok(None);
        }

        let mut best_before: Option<u64> = None;
        let mut best_after: Option<u64> = None;

        // A linear scan is sufficient here: the resident window is bounded by
        // `memory_cap`, and spilled entries are append-ordered by both index and time,
        // so a binary search over timestamps would work too, but correctness matters
        // more than micro-optimizing a path that is not on the hot write path.
        for idx in 0..total_len {
            let Some(ts) = self.get_timestamp(idx).await? else { continue };
            if ts <= target_time {
                best_before = Some(idx);
            } else if best_after.is_none() {
                best_after = Some(idx);
                break;
            }
        }

        Ok(best_before.or(best_after))
    }
}

fn find_ci(haystack: &str, needle_lower: &str) -> Option<(usize, usize)> {
    let haystack_lower = haystack.to_lowercase();
    haystack_lower.find(needle_lower).map(|start| (start, start + needle_lower.len()))
}
