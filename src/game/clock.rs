//! Round countdown.
//!
//! Driven by measured frame delta, unlike movement and animation which step
//! a fixed amount per tick.

use serde::{Serialize, Deserialize};

use crate::core::constants::SECOND_MS;

/// What one clock update did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockStep {
    /// Accumulator grew, no second boundary crossed
    Idle,
    /// One second elapsed, time remains
    SecondElapsed,
    /// The last second elapsed
    Expired,
}

/// Countdown clock for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    /// Round length in seconds
    pub total_secs: u32,
    /// Seconds left; never negative
    pub remaining_secs: u32,
    /// Milliseconds accumulated toward the next second
    pub accumulator_ms: u32,
}

impl GameClock {
    /// Full clock for a round of `total_secs`.
    pub fn new(total_secs: u32) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            accumulator_ms: 0,
        }
    }

    /// Feed measured frame time.
    ///
    /// At most one second is consumed per call and the accumulator restarts
    /// from zero, so any excess past the boundary is dropped.
    pub fn advance(&mut self, delta_ms: u32) -> ClockStep {
        if self.remaining_secs == 0 {
            return ClockStep::Idle;
        }

        self.accumulator_ms = self.accumulator_ms.saturating_add(delta_ms);
        if self.accumulator_ms < SECOND_MS {
            return ClockStep::Idle;
        }

        self.accumulator_ms = 0;
        self.remaining_secs -= 1;

        if self.remaining_secs == 0 {
            ClockStep::Expired
        } else {
            ClockStep::SecondElapsed
        }
    }

    /// Check if the countdown hit zero.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// HUD text, `m:ss`.
    pub fn format_mmss(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_below_a_second() {
        let mut clock = GameClock::new(120);
        for _ in 0..62 {
            assert_eq!(clock.advance(16), ClockStep::Idle);
        }
        assert_eq!(clock.accumulator_ms, 992);
        assert_eq!(clock.remaining_secs, 120);

        assert_eq!(clock.advance(16), ClockStep::SecondElapsed);
        assert_eq!(clock.remaining_secs, 119);
        assert_eq!(clock.accumulator_ms, 0);
    }

    #[test]
    fn test_excess_is_discarded() {
        let mut clock = GameClock::new(120);
        assert_eq!(clock.advance(2500), ClockStep::SecondElapsed);
        assert_eq!(clock.remaining_secs, 119);
        assert_eq!(clock.accumulator_ms, 0);
    }

    #[test]
    fn test_expires_exactly_once() {
        let mut clock = GameClock::new(2);
        assert_eq!(clock.advance(1000), ClockStep::SecondElapsed);
        assert_eq!(clock.advance(1000), ClockStep::Expired);
        assert!(clock.is_expired());
        assert_eq!(clock.advance(1000), ClockStep::Idle);
        assert_eq!(clock.remaining_secs, 0);
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(GameClock::new(120).format_mmss(), "2:00");
        assert_eq!(GameClock::new(9).format_mmss(), "0:09");
        assert_eq!(GameClock::new(75).format_mmss(), "1:15");
    }
}
