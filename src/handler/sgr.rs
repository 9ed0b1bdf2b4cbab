// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! SGR (CSI `m`) attribute and colour dispatch: ANSI 16-colour, 256-colour
//! (`38;5;n`/`48;5;n`), and RGB (`38;2;r;g;b`/`48;2;r;g;b`) forms, including the
//! colon-separated sub-parameter variant some emulators emit for the extended forms.

use super::{EngineCallbacks, TerminalHandler};
use crate::{cell::CellAttrs, color::Color, parser::CsiParams};

impl<C: EngineCallbacks> TerminalHandler<C> {
    pub(super) fn apply_sgr(&mut self, params: &CsiParams) {
        if params.is_empty() {
            self.style = crate::cell::CellStyle::default();
            return;
        }

        let primaries: Vec<u16> = params.iter_primary().collect();
        let mut i = 0;
        while i < primaries.len() {
            let code = primaries[i];
            match code {
                0 => self.style = crate::cell::CellStyle::default(),
                1 => self.style.attrs.insert(CellAttrs::BOLD),
                2 => self.style.attrs.insert(CellAttrs::DIM),
                3 => self.style.attrs.insert(CellAttrs::ITALIC),
                4 => self.style.attrs.insert(CellAttrs::UNDERLINE),
                5 | 6 => self.style.attrs.insert(CellAttrs::BLINK),
                7 => self.style.attrs.insert(CellAttrs::REVERSE),
                8 => self.style.attrs.insert(CellAttrs::HIDDEN),
                9 => self.style.attrs.insert(CellAttrs::STRIKETHROUGH),
                21 => self.style.attrs.remove(CellAttrs::BOLD),
                22 => self.style.attrs.remove(CellAttrs::BOLD | CellAttrs::DIM),
                23 => self.style.attrs.remove(CellAttrs::ITALIC),
                24 => self.style.attrs.remove(CellAttrs::UNDERLINE),
                25 => self.style.attrs.remove(CellAttrs::BLINK),
                27 => self.style.attrs.remove(CellAttrs::REVERSE),
                28 => self.style.attrs.remove(CellAttrs::HIDDEN),
                29 => self.style.attrs.remove(CellAttrs::STRIKETHROUGH),
                30..=37 => self.style.fg = Color::standard((code - 30) as u8),
                39 => self.style.fg = Color::Default,
                40..=47 => self.style.bg = Color::standard((code - 40) as u8),
                49 => self.style.bg = Color::Default,
                90..=97 => self.style.fg = Color::standard((code - 90) as u8 + 8),
                100..=107 => self.style.bg = Color::standard((code - 100) as u8 + 8),
                38 | 48 => {
                    let (color, consumed) = parse_extended_color(&primaries[i..], params.group(i));
                    if let Some(color) = color {
                        if code == 38 {
                            self.style.fg = color;
                        } else {
                            self.style.bg = color;
                        }
                    }
                    i += consumed;
                    continue;
                }
                // Unknown parameters are ignored, never fatal.
                _ => {}
            }
            i += 1;
        }
    }
}

/// Parses the `38`/`48` extended-colour forms starting at `rest_primaries[0]` (which is
/// `38` or `48` itself). `group_at_i` is the raw sub-parameter group vte captured at that
/// same position — non-empty beyond one element only for the colon-separated form
/// (`38:2:r:g:b`), where mode and components share a single CSI parameter position.
/// Returns the resolved colour (if any) and how many `rest_primaries` entries it
/// consumed, so the caller's index can skip past the ones the semicolon form spreads
/// across separate positions.
fn parse_extended_color(rest_primaries: &[u16], group_at_i: &[u16]) -> (Option<Color>, usize) {
    if group_at_i.len() > 1 {
        return match group_at_i.get(1) {
            Some(2) => {
                let r = *group_at_i.get(2).unwrap_or(&0) as u8;
                let g = *group_at_i.get(3).unwrap_or(&0) as u8;
                let b = *group_at_i.get(4).unwrap_or(&0) as u8;
                (Some(Color::rgb(r, g, b)), 1)
            }
            Some(5) => {
                let n = *group_at_i.get(2).unwrap_or(&0);
                (Some(Color::indexed(u32::from(n))), 1)
            }
            _ => (None, 1),
        };
    }

    match rest_primaries.get(1) {
        Some(2) => {
            let r = *rest_primaries.get(2).unwrap_or(&0) as u8;
            let g = *rest_primaries.get(3).unwrap_or(&0) as u8;
            let b = *rest_primaries.get(4).unwrap_or(&0) as u8;
            (Some(Color::rgb(r, g, b)), 5)
        }
        Some(5) => {
            let n = *rest_primaries.get(2).unwrap_or(&0);
            (Some(Color::indexed(u32::from(n))), 3)
        }
        _ => (None, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_rgb_resolves_truecolor() {
        let primaries = [38u16, 2, 10, 20, 30];
        let (color, consumed) = parse_extended_color(&primaries, &[38]);
        assert_eq!(color, Some(Color::rgb(10, 20, 30)));
        assert_eq!(consumed, 5);
    }

    #[test]
    fn colon_indexed_resolves_single_group() {
        let group = [38u16, 5, 200];
        let (color, consumed) = parse_extended_color(&group, &group);
        assert_eq!(color, Some(Color::Indexed(200)));
        assert_eq!(consumed, 1);
    }
}
