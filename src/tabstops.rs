// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tab stop tracking for HT and CSI `g`/`W`/ESC `H` (TBC/HTS): a shell that
//! reconfigures tabs needs more than "every 8 columns."

use rustc_hash::FxHashSet;

pub struct TabStops {
    width: u16,
    stops: FxHashSet<u16>,
}

impl TabStops {
    #[must_use]
    pub fn new(width: u16) -> Self {
        let mut stops = FxHashSet::default();
        let mut col = 8u16;
        while col < width {
            stops.insert(col);
            col += 8;
        }
        Self { width, stops }
    }

    pub fn resize(&mut self, new_width: u16) {
        self.width = new_width;
        self.stops.retain(|&c| c < new_width);
    }

    /// HTS (ESC `H` / CSI `W`): sets a stop at `col`.
    pub fn set(&mut self, col: u16) {
        if col < self.width {
            self.stops.insert(col);
        }
    }

    /// TBC 0: clears the stop at `col`.
    pub fn clear(&mut self, col: u16) { self.stops.remove(&col); }

    /// TBC 3: clears every stop.
    pub fn clear_all(&mut self) { self.stops.clear(); }

    /// Next tab stop strictly after `from`, or the right margin if none remain.
    #[must_use]
    pub fn next_stop(&self, from: u16) -> u16 {
        (from + 1..self.width)
            .find(|c| self.stops.contains(c))
            .unwrap_or(self.width - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_every_8_columns() {
        let tabs = TabStops::new(40);
        assert_eq!(tabs.next_stop(0), 8);
        assert_eq!(tabs.next_stop(5), 8);
        assert_eq!(tabs.next_stop(8), 16);
    }

    #[test]
    fn custom_stop_overrides_default_spacing() {
        let mut tabs = TabStops::new(40);
        tabs.clear_all();
        tabs.set(4);
        tabs.set(12);
        assert_eq!(tabs.next_stop(0), 4);
        assert_eq!(tabs.next_stop(4), 12);
        assert_eq!(tabs.next_stop(12), 39);
    }
}
