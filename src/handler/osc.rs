// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! OSC dispatch: window title, indexed-palette and default-fg/bg set or query,
//! shell-integration prompt markers (OSC 133), and clipboard passthrough (OSC 52).

use super::{EngineCallbacks, TerminalHandler};
use crate::palette::format_rgb_reply;

impl<C: EngineCallbacks> TerminalHandler<C> {
    pub(super) fn handle_osc(&mut self, command: &str, payload: &[&[u8]], _bell_terminated: bool) {
        match command {
            "0" | "2" => {
                if let Some(title) = payload.first().and_then(|b| std::str::from_utf8(b).ok()) {
                    self.callbacks.on_title_change(title);
                }
            }
            "4" => self.handle_osc4(payload),
            "10" => self.handle_osc_default_color(payload, true),
            "11" => self.handle_osc_default_color(payload, false),
            "133" => self.handle_osc133(payload),
            "52" => self.handle_osc52(payload),
            _ => {}
        }
    }

    /// OSC `4;index;spec` (one or more `index;spec` pairs per dispatch): sets a palette
    /// slot, or replies with its current value when `spec` is `?`.
    fn handle_osc4(&mut self, payload: &[&[u8]]) {
        let mut fields = payload.iter().filter_map(|f| std::str::from_utf8(f).ok());
        while let (Some(index), Some(spec)) = (fields.next(), fields.next()) {
            let Ok(index) = index.parse::<u8>() else { continue };
            if spec == "?" {
                let rgb = self.palette.resolve(crate::color::Color::Indexed(index));
                let reply = format!("\x1b]4;{index};{}\x1b\\", format_rgb_reply(rgb));
                self.write_reply(reply.as_bytes());
            } else if let Some(rgb) = parse_rgb_spec(spec) {
                self.palette.set_indexed(index, rgb);
            }
        }
    }

    /// OSC `10`/`11`: sets or queries the default foreground/background colour.
    fn handle_osc_default_color(&mut self, payload: &[&[u8]], is_fg: bool) {
        let Some(spec) = payload.first().and_then(|f| std::str::from_utf8(f).ok()) else {
            return;
        };
        if spec == "?" {
            let rgb = if is_fg { self.palette.default_fg() } else { self.palette.default_bg() };
            let code = if is_fg { 10 } else { 11 };
            let reply = format!("\x1b]{code};{}\x1b\\", format_rgb_reply(rgb));
            self.write_reply(reply.as_bytes());
            if is_fg {
                self.callbacks.on_query_default_fg();
            } else {
                self.callbacks.on_query_default_bg();
            }
        } else if let Some(rgb) = parse_rgb_spec(spec) {
            if is_fg {
                self.palette.set_default_fg(rgb);
                self.callbacks.on_default_fg_change(crate::color::Color::Rgb(rgb.0, rgb.1, rgb.2));
            } else {
                self.palette.set_default_bg(rgb);
                self.callbacks.on_default_bg_change(crate::color::Color::Rgb(rgb.0, rgb.1, rgb.2));
            }
        }
    }

    /// OSC `133;A` marks a fresh prompt (clears the tracked input-start column); `133;B`
    /// records the cursor's current column as where user input begins on this line.
    /// The heuristic fallback in [`crate::selection::prompt_boundary`] covers lines
    /// scrolled off before this ran.
    fn handle_osc133(&mut self, payload: &[&[u8]]) {
        match payload.first().and_then(|f| std::str::from_utf8(f).ok()) {
            Some("A") => {
                self.current_prompt_input_col = None;
                self.viewport.prompt_start_row = Some(self.viewport.cursor_y);
            }
            Some("B") => {
                self.current_prompt_input_col = Some(usize::from(self.viewport.cursor_x));
            }
            _ => {}
        }
    }

    /// OSC `52;selection;base64-data`: dispatch-only passthrough — this crate never
    /// touches a system clipboard itself.
    fn handle_osc52(&mut self, payload: &[&[u8]]) {
        let selection = payload.first().and_then(|f| f.first()).copied().unwrap_or(b'c') as char;
        match payload.get(1) {
            Some(data) if *data != b"?" => self.callbacks.on_clipboard_set(selection, data),
            _ => self.callbacks.on_clipboard_get(selection),
        }
    }
}

/// Parses an X11 `rgb:RRRR/GGGG/BBBB` colour spec (OSC 4/10/11), taking the high byte of
/// each 16-bit channel. Returns `None` for any other form (named colours are not
/// supported).
fn parse_rgb_spec(spec: &str) -> Option<(u8, u8, u8)> {
    let rest = spec.strip_prefix("rgb:")?;
    let mut channels = rest.split('/');
    let r = hex_component(channels.next()?)?;
    let g = hex_component(channels.next()?)?;
    let b = hex_component(channels.next()?)?;
    Some((r, g, b))
}

/// Takes the high byte of a 1-4 digit hex channel (`"ff"` -> `0xff`, `"ffff"` -> `0xff`).
fn hex_component(digits: &str) -> Option<u8> {
    let value = u32::from_str_radix(digits, 16).ok()?;
    let bits = digits.len() * 4;
    Some((value >> bits.saturating_sub(8)) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_eight_bit_rgb_spec() {
        assert_eq!(parse_rgb_spec("rgb:ff/80/00"), Some((0xff, 0x80, 0x00)));
    }

    #[test]
    fn parses_sixteen_bit_rgb_spec_taking_high_byte() {
        assert_eq!(parse_rgb_spec("rgb:ffff/8080/0000"), Some((0xff, 0x80, 0x00)));
    }

    #[test]
    fn rejects_non_rgb_spec() {
        assert_eq!(parse_rgb_spec("cyan"), None);
    }
}
