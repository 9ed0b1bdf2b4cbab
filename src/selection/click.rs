// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Click-cycle detection: consecutive clicks within a configurable timeout at the same
//! (line, column) cycle Single→Double→Triple→Single; any position change or timeout
//! resets to Single.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    Single,
    Double,
    Triple,
}

pub struct ClickDetector {
    timeout: Duration,
    last: Option<(i64, usize, Instant)>,
    count: u8,
}

impl ClickDetector {
    #[must_use]
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            last: None,
            count: 0,
        }
    }

    /// Records a click at `(line, offset)` at time `now`, returning the resulting
    /// [`ClickType`] in the Single→Double→Triple→Single cycle.
    pub fn register(&mut self, line: i64, offset: usize, now: Instant) -> ClickType {
        let continues = self
            .last
            .is_some_and(|(l, o, t)| l == line && o == offset && now.saturating_duration_since(t) <= self.timeout);

        self.count = if continues { self.count % 3 + 1 } else { 1 };
        self.last = Some((line, offset, now));

        match self.count {
            1 => ClickType::Single,
            2 => ClickType::Double,
            _ => ClickType::Triple,
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_click_counts_at_same_position() {
        let mut det = ClickDetector::new(500);
        let t0 = Instant::now();
        assert_eq!(det.register(0, 0, t0), ClickType::Single);
        assert_eq!(det.register(0, 0, t0 + Duration::from_millis(100)), ClickType::Double);
        assert_eq!(det.register(0, 0, t0 + Duration::from_millis(200)), ClickType::Triple);
        assert_eq!(det.register(0, 0, t0 + Duration::from_millis(300)), ClickType::Single);
    }

    #[test]
    fn position_change_resets_to_single() {
        let mut det = ClickDetector::new(500);
        let t0 = Instant::now();
        det.register(0, 0, t0);
        assert_eq!(det.register(0, 1, t0 + Duration::from_millis(50)), ClickType::Single);
    }

    #[test]
    fn timeout_resets_to_single() {
        let mut det = ClickDetector::new(500);
        let t0 = Instant::now();
        det.register(0, 0, t0);
        assert_eq!(det.register(0, 0, t0 + Duration::from_millis(600)), ClickType::Single);
    }
}
