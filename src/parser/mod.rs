// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The VT/ANSI byte-stream state machine, built on `vte::Parser`/`vte::Perform` — the
//! Ground/Escape/CSI/OSC/DCS state table is `vte`'s. [`VtParser`] is a thin pure
//! wrapper: it owns no handler state itself, avoiding cyclic ownership between handler
//! and parser, translating each `vte::Perform` callback into one of our own [`Event`]
//! variants before it reaches whatever implements [`Dispatch`] — normally
//! [`crate::handler::TerminalHandler`].

mod event;

pub use event::{CsiParams, Event};
use vte::{Params, Perform};

use crate::cell::char_width;

/// The dispatch interface a [`VtParser`] feeds events to. [`crate::handler::
/// TerminalHandler`] is the only implementor in this crate, but keeping the interface
/// separate is what lets the parser stay a pure state machine.
pub trait Dispatch {
    fn dispatch(&mut self, event: Event<'_>);
}

/// Byte-granular VT/ANSI parser. Never requires chunk-boundary alignment — UTF-8
/// continuation and escape/CSI/OSC/DCS assembly all survive being fed one byte at a
/// time or in arbitrary chunks.
pub struct VtParser {
    inner: vte::Parser,
    osc_payload_cap_bytes: usize,
}

impl VtParser {
    #[must_use]
    pub fn new(osc_payload_cap_bytes: usize) -> Self {
        Self {
            inner: vte::Parser::new(),
            osc_payload_cap_bytes,
        }
    }

    /// Feeds one chunk of bytes, dispatching every resulting event to `handler`.
    pub fn feed(&mut self, bytes: &[u8], handler: &mut impl Dispatch) {
        let mut adapter = Adapter {
            handler,
            osc_payload_cap_bytes: self.osc_payload_cap_bytes,
        };
        for &byte in bytes {
            self.inner.advance(&mut adapter, byte);
        }
    }
}

struct Adapter<'a, D: Dispatch> {
    handler: &'a mut D,
    osc_payload_cap_bytes: usize,
}

impl<D: Dispatch> Perform for Adapter<'_, D> {
    fn print(&mut self, ch: char) {
        self.handler.dispatch(Event::Print(ch, char_width(ch)));
    }

    fn execute(&mut self, byte: u8) {
        self.handler.dispatch(Event::Execute(byte));
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        let private = intermediates.iter().copied().find(|b| matches!(b, b'?' | b'>' | b'<' | b'='));
        let plain_intermediates: Vec<u8> =
            intermediates.iter().copied().filter(|b| !matches!(b, b'?' | b'>' | b'<' | b'=')).collect();
        self.handler.dispatch(Event::CsiDispatch {
            private,
            params: CsiParams::from_vte(params),
            intermediates: plain_intermediates,
            action,
        });
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], bell_terminated: bool) {
        let total: usize = params.iter().map(|p| p.len()).sum();
        if total > self.osc_payload_cap_bytes {
            // Oversize payload: discard; state machine already reset by vte.
            return;
        }
        let Some((command, rest)) = params.split_first() else { return };
        let command = String::from_utf8_lossy(command).into_owned();
        self.handler.dispatch(Event::OscDispatch {
            command,
            payload: rest,
            bell_terminated,
        });
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        self.handler.dispatch(Event::EscDispatch {
            intermediates: intermediates.to_vec(),
            action: byte,
        });
    }

    // DCS is recognised but ignored: we surface hook/unhook as events so a handler
    // *could* act on them, but `TerminalHandler` does not.
    fn hook(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        self.handler.dispatch(Event::DcsHook {
            params: CsiParams::from_vte(params),
            intermediates: intermediates.to_vec(),
            action,
        });
    }

    fn put(&mut self, byte: u8) { self.handler.dispatch(Event::DcsPut(byte)); }

    fn unhook(&mut self) { self.handler.dispatch(Event::DcsUnhook); }
}
