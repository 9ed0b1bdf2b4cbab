// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal color model: the default pen, the 16 ANSI standard colors, the 256-color
//! indexed palette, and 24-bit RGB passthrough.

/// A terminal color, tagged by how it was specified.
///
/// `Default` means "whatever the handler's current default FG/BG is" — it is not
/// resolved to a concrete RGB value until render time, so that an OSC 10/11 palette
/// change retroactively recolors cells that were printed with the default pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    /// One of the 16 standard ANSI colors (SGR 30-37/90-97, 40-47/100-107).
    Standard(u8),
    /// 256-color indexed palette (SGR `38;5;n` / `48;5;n`).
    Indexed(u8),
    /// 24-bit truecolor (SGR `38;2;r;g;b` / `48;2;r;g;b`).
    Rgb(u8, u8, u8),
}

impl Color {
    /// Builds a [`Color::Standard`] from an SGR foreground/background code, clamping to
    /// the 0..=15 range the standard palette defines.
    #[must_use]
    pub fn standard(code: u8) -> Self { Self::Standard(code & 0x0F) }

    /// Builds a [`Color::Indexed`] from a 256-color palette slot (SGR `5;n` form).
    /// Out-of-range indices are clamped to 255 rather than rejected, matching how
    /// malformed SGR parameters are handled elsewhere in the handler.
    #[must_use]
    pub fn indexed(n: u32) -> Self { Self::Indexed(u8::try_from(n.min(255)).unwrap_or(255)) }

    #[must_use]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self { Self::Rgb(r, g, b) }
}
