// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The five event kinds a [`super::VtParser`] emits to a [`super::Dispatch`]
//! implementor, plus [`CsiParams`], a clamped/bounded view over `vte::Params`.

use smallvec::SmallVec;
use vte::Params;

/// Up to 16 CSI parameters, each already clamped to `u16::MAX` by `vte` itself.
/// Sub-parameters (colon-separated, e.g. `38:2:r:g:b`) are preserved per-position so SGR
/// extended-color dispatch can read them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsiParams {
    positions: SmallVec<[SmallVec<[u16; 4]>; 16]>,
}

impl CsiParams {
    pub(crate) fn from_vte(params: &Params) -> Self {
        let mut positions = SmallVec::new();
        for (i, group) in params.iter().enumerate() {
            if i >= 16 {
                break;
            }
            positions.push(group.iter().copied().collect());
        }
        Self { positions }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.positions.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    /// Primary value at position `i`, or `default` if absent or explicitly zero — the
    /// VT100-standard "missing or zero means default" rule for most CSI finals.
    #[must_use]
    pub fn get_or(&self, i: usize, default: u16) -> u16 {
        match self.positions.get(i).and_then(|g| g.first()) {
            Some(0) | None => default,
            Some(&v) => v,
        }
    }

    /// Primary value at position `i`, `None` if the position doesn't exist (distinct
    /// from an explicit `0`) — needed by SGR's reset-vs-param-38 disambiguation.
    #[must_use]
    pub fn raw(&self, i: usize) -> Option<u16> { self.positions.get(i).and_then(|g| g.first()).copied() }

    /// Full sub-parameter slice at position `i` (e.g. `[38, 2, r, g, b]` when the shell
    /// used `:`-separated sub-params, or a single-element slice otherwise).
    #[must_use]
    pub fn group(&self, i: usize) -> &[u16] { self.positions.get(i).map_or(&[], |g| g.as_slice()) }

    #[must_use]
    pub fn iter_primary(&self) -> impl Iterator<Item = u16> + '_ {
        self.positions.iter().map(|g| g.first().copied().unwrap_or(0))
    }
}

/// One semantic unit produced by feeding a byte stream through [`super::VtParser`].
#[derive(Debug)]
pub enum Event<'a> {
    /// A printable scalar and its display width (0/1/2).
    Print(char, u8),
    /// A C0/C1 control byte (LF, CR, BS, HT, BEL, ...).
    Execute(u8),
    CsiDispatch {
        /// The private-mode marker byte (`?`, `>`, `<`, `=`), if any.
        private: Option<u8>,
        params: CsiParams,
        intermediates: Vec<u8>,
        action: char,
    },
    OscDispatch {
        /// The first semicolon-delimited field, e.g. `"133"`, `"4"`, `"52"`.
        command: String,
        /// The remaining fields, not yet joined or decoded.
        payload: &'a [&'a [u8]],
        bell_terminated: bool,
    },
    EscDispatch {
        intermediates: Vec<u8>,
        action: u8,
    },
    /// DCS is recognised but ignored: no handler in this crate acts on it.
    DcsHook {
        params: CsiParams,
        intermediates: Vec<u8>,
        action: char,
    },
    DcsPut(u8),
    DcsUnhook,
}
