// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Core terminal emulation engine: a byte-granular VT/ANSI parser, a viewport +
//! scrollback history model with resize reflow, content-coordinate selection, and a
//! scrollback search index.
//!
//! [`Engine`] is the facade most embedders want; the component modules below it are
//! public too since integration tests and advanced embedders (custom renderers, a PTY
//! multiplexer atop several engines) need to reach `ViewportState`, `ScrollbackHistory`,
//! and `SelectionMachine` directly.

pub mod cell;
pub mod charset;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod history;
pub mod logical_line;
pub mod modes;
pub mod palette;
pub mod parser;
pub mod reflow;
pub mod row;
pub mod search;
pub mod selection;
pub mod tabstops;
pub mod viewport;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use handler::EngineCallbacks;
