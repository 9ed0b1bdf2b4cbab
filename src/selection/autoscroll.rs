// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Edge-based auto-scroll: while a drag is active and the pointer sits within
//! `edge_zone` rows of the top/bottom, scroll at a rate that ramps from 1× to
//! `max_speed`× over ~3 seconds spent in the zone. [`crate::engine::Engine`] owns the
//! actual ticker task; this module is the pure rate calculation plus the small piece of
//! state (time-in-zone) it needs, so it can be unit tested without a timer.

use std::time::Duration;

/// Ticks at roughly 20 Hz.
pub const AUTO_SCROLL_HZ: u32 = 20;
const RAMP_DURATION: Duration = Duration::from_secs(3);
const RAMP_MAX_MULTIPLIER: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Up,
    Down,
}

/// Tracks how long the pointer has continuously stayed in an edge zone, producing the
/// scroll velocity (in lines) for each tick. Exiting the zone stops the ticker and
/// resets the accumulator.
pub struct AutoScrollTicker {
    edge_zone_rows: u16,
    max_speed: f64,
    time_in_zone: Duration,
}

impl AutoScrollTicker {
    #[must_use]
    pub fn new(edge_zone_rows: u16, max_speed: f64) -> Self {
        Self {
            edge_zone_rows,
            max_speed,
            time_in_zone: Duration::ZERO,
        }
    }

    /// `pointer_y`/`viewport_height` are in viewport rows. Returns `None` when the
    /// pointer is outside the edge zone (and resets the ramp accumulator).
    pub fn tick(&mut self, pointer_y: i32, viewport_height: u16, dt: Duration) -> Option<(EdgeDirection, u32)> {
        let zone = i32::from(self.edge_zone_rows);
        let direction = if pointer_y < zone {
            Some(EdgeDirection::Up)
        } else if pointer_y >= i32::from(viewport_height) - zone {
            Some(EdgeDirection::Down)
        } else {
            None
        };

        let Some(direction) = direction else {
            self.time_in_zone = Duration::ZERO;
            return None;
        };

        self.time_in_zone += dt;
        let ramp = (self.time_in_zone.as_secs_f64() / RAMP_DURATION.as_secs_f64()).clamp(0.0, 1.0);
        let multiplier = 1.0 + ramp * (RAMP_MAX_MULTIPLIER - 1.0);

        let edge_distance = if direction == EdgeDirection::Up {
            zone - pointer_y
        } else {
            pointer_y - (i32::from(viewport_height) - zone) + 1
        }
        .max(1) as f64;

        let lines = (edge_distance * self.max_speed * multiplier / f64::from(self.edge_zone_rows).max(1.0)).round();
        Some((direction, (lines as u32).max(1)))
    }

    pub fn reset(&mut self) { self.time_in_zone = Duration::ZERO; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_edge_zone_yields_none() {
        let mut ticker = AutoScrollTicker::new(3, 4.0);
        assert_eq!(ticker.tick(10, 24, Duration::from_millis(50)), None);
    }

    #[test]
    fn ramps_up_over_three_seconds() {
        let mut ticker = AutoScrollTicker::new(3, 4.0);
        let (dir, early_speed) = ticker.tick(0, 24, Duration::from_millis(50)).unwrap();
        assert_eq!(dir, EdgeDirection::Up);
        for _ in 0..60 {
            ticker.tick(0, 24, Duration::from_millis(50));
        }
        let (_, late_speed) = ticker.tick(0, 24, Duration::from_millis(50)).unwrap();
        assert!(late_speed > early_speed);
    }

    #[test]
    fn leaving_zone_resets_accumulator() {
        let mut ticker = AutoScrollTicker::new(3, 4.0);
        for _ in 0..60 {
            ticker.tick(0, 24, Duration::from_millis(50));
        }
        assert!(ticker.tick(10, 24, Duration::from_millis(50)).is_none());
        let (_, speed_after_reset) = ticker.tick(0, 24, Duration::from_millis(50)).unwrap();
        assert_eq!(speed_after_reset, 1);
    }
}
