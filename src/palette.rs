// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The handler-owned, lock-serialised 258-slot palette: 16 ANSI standard colours, 240
//! indexed-256 colours, and a default-FG/default-BG slot, all resolvable to concrete
//! RGB for OSC 4/10/11 query replies.

use crate::color::Color;

const STANDARD_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 0, 0),
    (0, 205, 0),
    (205, 205, 0),
    (0, 0, 238),
    (205, 0, 205),
    (0, 205, 205),
    (229, 229, 229),
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// Palette storage: the 16 standard slots and 240 indexed-256 slots are reassignable
/// via OSC 4; the default FG/BG are reassignable via OSC 10/11. Indices 16..=255 of the
/// 256-color cube/greyscale ramp are seeded at construction and then behave like any
/// other OSC-4-settable slot.
pub struct Palette {
    standard: [(u8, u8, u8); 16],
    indexed: [(u8, u8, u8); 240],
    default_fg: (u8, u8, u8),
    default_bg: (u8, u8, u8),
}

impl Palette {
    #[must_use]
    pub fn new() -> Self {
        let mut indexed = [(0u8, 0u8, 0u8); 240];
        for (slot, rgb) in indexed.iter_mut().enumerate() {
            let n = slot + 16;
            *rgb = if n < 232 {
                let n = n - 16;
                let steps = [0u8, 95, 135, 175, 215, 255];
                (steps[n / 36], steps[(n / 6) % 6], steps[n % 6])
            } else {
                let level = 8 + (n - 232) as u8 * 10;
                (level, level, level)
            };
        }
        Self {
            standard: STANDARD_RGB,
            indexed,
            default_fg: (255, 255, 255),
            default_bg: (0, 0, 0),
        }
    }

    /// Resolves a [`Color`] to concrete RGB, needed for OSC query replies and any
    /// embedder that wants the literal pixel value for the current palette.
    #[must_use]
    pub fn resolve(&self, color: Color) -> (u8, u8, u8) {
        match color {
            Color::Default => self.default_fg,
            Color::Standard(n) => self.standard[usize::from(n & 0x0F)],
            Color::Indexed(n) => {
                let n = usize::from(n);
                if n < 16 {
                    self.standard[n]
                } else {
                    self.indexed[n - 16]
                }
            }
            Color::Rgb(r, g, b) => (r, g, b),
        }
    }

    pub fn set_indexed(&mut self, index: u8, rgb: (u8, u8, u8)) {
        let index = usize::from(index);
        if index < 16 {
            self.standard[index] = rgb;
        } else {
            self.indexed[index - 16] = rgb;
        }
    }

    #[must_use]
    pub fn default_fg(&self) -> (u8, u8, u8) { self.default_fg }

    #[must_use]
    pub fn default_bg(&self) -> (u8, u8, u8) { self.default_bg }

    pub fn set_default_fg(&mut self, rgb: (u8, u8, u8)) { self.default_fg = rgb; }

    pub fn set_default_bg(&mut self, rgb: (u8, u8, u8)) { self.default_bg = rgb; }
}

impl Default for Palette {
    fn default() -> Self { Self::new() }
}

/// Formats an 8-bit RGB triple as the `rgb:RRRR/GGGG/BBBB` reply body used by OSC
/// 4/10/11 query responses: each channel is scaled `value << 8 | value`.
#[must_use]
pub fn format_rgb_reply((r, g, b): (u8, u8, u8)) -> String {
    format!("rgb:{r:02x}{r:02x}/{g:02x}{g:02x}/{b:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_standard_colors() {
        let pal = Palette::new();
        assert_eq!(pal.resolve(Color::Standard(1)), (205, 0, 0));
    }

    #[test]
    fn rgb_reply_scales_8_to_16_bit() {
        assert_eq!(format_rgb_reply((0xFF, 0x00, 0x80)), "rgb:ffff/0000/8080");
    }

    #[test]
    fn set_default_fg_overrides_resolution() {
        let mut pal = Palette::new();
        pal.set_default_fg((1, 2, 3));
        assert_eq!(pal.resolve(Color::Default), (1, 2, 3));
    }
}
