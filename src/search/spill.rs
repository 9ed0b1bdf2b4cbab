// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! On-disk backing store for [`super::SearchIndex`] entries evicted from memory.
//!
//! Format: an append-only log file of records
//! `{u64 global_index; i64 unix_nanos; u32 length; bytes utf8_text}`, little-endian,
//! plus a sibling index file of `u64` byte offsets (one per spilled record, in append
//! order) so a lookup by global index is a single seek rather than a scan. Not required
//! to be portable across hosts — only self-consistent across restarts of the same
//! process.
//!
//! All file I/O here is blocking (`std::fs`) and confined to a single dedicated thread
//! (see [`SpillHandle`]) so that the hot append path in [`super::SearchIndex`] and
//! [`crate::history::ScrollbackHistory`] never has to cross an await point: spilling is
//! a fire-and-forget background concern, and only a page-in read needs to wait on it.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};

use tokio::sync::oneshot;

use crate::error::{EngineError, EngineResult};

enum Request {
    Append {
        global_index: u64,
        unix_nanos: i64,
        text: String,
    },
    Read {
        global_index: u64,
        respond: oneshot::Sender<EngineResult<(i64, String)>>,
    },
}

/// A handle to the background spill thread. Cheap to clone; all clones share the same
/// worker and the same log/index files.
#[derive(Clone)]
pub struct SpillHandle {
    tx: mpsc::Sender<Request>,
}

impl SpillHandle {
    pub fn spawn(dir: &Path, spill_base: u64) -> EngineResult<Self> {
        std::fs::create_dir_all(dir).map_err(|source| EngineError::SpillWrite {
            global_index: spill_base,
            path: dir.to_path_buf(),
            source,
        })?;
        let mut worker = SpillWorker::open(dir, spill_base)?;
        let (tx, rx) = mpsc::channel::<Request>();
        thread::Builder::new()
            .name("vt-engine-spill".into())
            .spawn(move || {
                while let Ok(req) = rx.recv() {
                    match req {
                        Request::Append {
                            global_index,
                            unix_nanos,
                            text,
                        } => {
                            if let Err(e) = worker.append(global_index, unix_nanos, &text) {
                                tracing::warn!("scrollback spill write failed: {e}");
                            }
                        }
                        Request::Read {
                            global_index,
                            respond,
                        } => {
                            let result = worker.read(global_index);
                            let _unused = respond.send(result);
                        }
                    }
                }
            })
            .expect("failed to spawn scrollback spill thread");
        Ok(Self { tx })
    }

    /// Fire-and-forget: the hot append path never waits on disk I/O.
    pub fn append(&self, global_index: u64, unix_nanos: i64, text: String) {
        let _unused = self.tx.send(Request::Append {
            global_index,
            unix_nanos,
            text,
        });
    }

    /// Awaits a page-in read from the background thread.
    pub async fn read(&self, global_index: u64) -> EngineResult<(i64, String)> {
        let (respond, rx) = oneshot::channel();
        if self
            .tx
            .send(Request::Read {
                global_index,
                respond,
            })
            .is_err()
        {
            return Err(EngineError::IndexOutOfRange {
                requested: global_index,
                total_len: global_index,
            });
        }
        rx.await.unwrap_or(Err(EngineError::IndexOutOfRange {
            requested: global_index,
            total_len: global_index,
        }))
    }
}

struct SpillWorker {
    log_path: PathBuf,
    index_path: PathBuf,
    log: File,
    index: File,
    spill_base: u64,
    spilled_count: u64,
}

impl SpillWorker {
    fn open(dir: &Path, spill_base: u64) -> EngineResult<Self> {
        let log_path = dir.join("scrollback.log");
        let index_path = dir.join("scrollback.idx");
        let log = open_rw(&log_path)?;
        let index = open_rw(&index_path)?;
        let spilled_count = index
            .metadata()
            .map(|m| m.len() / 8)
            .unwrap_or(0);
        Ok(Self {
            log_path,
            index_path,
            log,
            index,
            spill_base,
            spilled_count,
        })
    }

    fn append(&mut self, global_index: u64, unix_nanos: i64, text: &str) -> EngineResult<()> {
        let offset = self
            .log
            .seek(SeekFrom::End(0))
            .map_err(|source| self.write_err(global_index, source))?;

        let bytes = text.as_bytes();
        let mut record = Vec::with_capacity(20 + bytes.len());
        record.extend_from_slice(&global_index.to_le_bytes());
        record.extend_from_slice(&unix_nanos.to_le_bytes());
        record.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        record.extend_from_slice(bytes);
        self.log.write_all(&record).map_err(|source| self.write_err(global_index, source))?;
        self.log.flush().map_err(|source| self.write_err(global_index, source))?;

        self.index
            .seek(SeekFrom::End(0))
            .map_err(|source| self.write_err(global_index, source))?;
        self.index
            .write_all(&offset.to_le_bytes())
            .map_err(|source| self.write_err(global_index, source))?;
        self.index.flush().map_err(|source| self.write_err(global_index, source))?;

        self.spilled_count += 1;
        Ok(())
    }

    fn read(&mut self, global_index: u64) -> EngineResult<(i64, String)> {
        if global_index < self.spill_base || global_index >= self.spill_base + self.spilled_count {
            return Err(EngineError::IndexOutOfRange {
                requested: global_index,
                total_len: self.spill_base + self.spilled_count,
            });
        }
        let slot = global_index - self.spill_base;

        self.index
            .seek(SeekFrom::Start(slot * 8))
            .map_err(|source| self.read_err(global_index, source))?;
        let mut offset_buf = [0u8; 8];
        self.index.read_exact(&mut offset_buf).map_err(|source| self.read_err(global_index, source))?;
        let offset = u64::from_le_bytes(offset_buf);

        self.log.seek(SeekFrom::Start(offset)).map_err(|source| self.read_err(global_index, source))?;
        let mut header = [0u8; 20];
        self.log.read_exact(&mut header).map_err(|source| self.read_err(global_index, source))?;
        let stored_index = u64::from_le_bytes(header[0..8].try_into().unwrap());
        if stored_index != global_index {
            return Err(EngineError::SpillIndexCorrupt {
                offset,
                reason: "log record index does not match index-file entry",
            });
        }
        let unix_nanos = i64::from_le_bytes(header[8..16].try_into().unwrap());
        let length = u32::from_le_bytes(header[16..20].try_into().unwrap()) as usize;

        let mut text_buf = vec![0u8; length];
        self.log.read_exact(&mut text_buf).map_err(|source| self.read_err(global_index, source))?;
        Ok((unix_nanos, String::from_utf8_lossy(&text_buf).into_owned()))
    }

    fn write_err(&self, global_index: u64, source: std::io::Error) -> EngineError {
        EngineError::SpillWrite {
            global_index,
            path: self.log_path.clone(),
            source,
        }
    }

    fn read_err(&self, global_index: u64, source: std::io::Error) -> EngineError {
        EngineError::SpillRead {
            global_index,
            path: self.index_path.clone(),
            source,
        }
    }
}

fn open_rw(path: &Path) -> EngineResult<File> {
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|source| EngineError::SpillWrite {
            global_index: 0,
            path: path.to_path_buf(),
            source,
        })
}
