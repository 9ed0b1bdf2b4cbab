// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal mode flags toggled by CSI `?h`/`?l` (private) and CSI `h`/`l` (ANSI), plus
//! the handful of non-bitset mode state (synchronized-update depth, DECSLRM bounds are
//! tracked on [`crate::viewport::ViewportState`] itself) that doesn't fit a bitset.

bitflags::bitflags! {
    /// One bit per DEC private or ANSI mode the handler understands.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModeFlags: u32 {
        /// DECCKM (`?1`) — cursor keys send application sequences instead of ANSI.
        const APP_CURSOR_KEYS   = 1 << 0;
        /// DECOM (`?6`) — H/f cursor addressing is relative to the scroll region.
        const ORIGIN            = 1 << 1;
        /// DECAWM (`?7`) — printing at the right margin sets the pending-wrap latch.
        const AUTOWRAP          = 1 << 2;
        /// DECTCEM (`?25`) — cursor is visible.
        const CURSOR_VISIBLE    = 1 << 3;
        /// IRM (`4`) — writes shift the row tail right instead of overwriting.
        const INSERT            = 1 << 4;
        /// DECLRMM (`?69`) — CSI `s` sets DECSLRM margins instead of saving the cursor.
        const LEFT_RIGHT_MARGIN = 1 << 5;
        const MOUSE_X10         = 1 << 6;
        const MOUSE_BUTTON      = 1 << 7;
        const MOUSE_ANY         = 1 << 8;
        const MOUSE_SGR         = 1 << 9;
        const ALT_SCREEN        = 1 << 10;
        const BRACKETED_PASTE   = 1 << 11;
    }
}

impl ModeFlags {
    #[must_use]
    pub fn defaults() -> Self { Self::AUTOWRAP | Self::CURSOR_VISIBLE }

    #[must_use]
    pub fn mouse_reporting_active(self) -> bool {
        self.intersects(Self::MOUSE_X10 | Self::MOUSE_BUTTON | Self::MOUSE_ANY)
    }
}
