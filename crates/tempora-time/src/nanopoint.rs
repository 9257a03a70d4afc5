//! Monotonic timestamps at nanosecond resolution
//!
//! A `NanoPoint` is a nanosecond count on a steady clock whose reference
//! is the first sample taken by the process. It has no relation to wall
//! clocks or zones; it is only guaranteed non-decreasing within a process.

use std::fmt;
use std::ops::Sub;
use std::sync::OnceLock;
use std::time::Instant;

use crate::span::{
    Span, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MICRO, NANOS_PER_MILLI, NANOS_PER_MIN,
    NANOS_PER_SEC,
};

/// A nanosecond-resolution monotonic timestamp
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NanoPoint(i64);

fn origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

impl NanoPoint {
    /// Sample the monotonic clock
    pub fn now() -> NanoPoint {
        let elapsed = origin().elapsed().as_nanos();
        NanoPoint(elapsed.min(i64::MAX as u128) as i64)
    }

    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        NanoPoint(nanos)
    }

    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Elapsed time since the clock reference, as a span
    #[inline]
    pub const fn since_origin(self) -> Span {
        Span::from_nanos(self.0)
    }

    /// The value modulo one day: the synthetic time-of-day the day-cycle
    /// accessors decompose
    #[inline]
    fn day_cycle(self) -> i64 {
        self.0.rem_euclid(NANOS_PER_DAY)
    }

    /// Day-cycle hour (0..=23); not a wall-clock reading
    #[inline]
    pub fn hour(self) -> i64 {
        self.day_cycle() / NANOS_PER_HOUR
    }

    #[inline]
    pub fn minute(self) -> i64 {
        (self.day_cycle() % NANOS_PER_HOUR) / NANOS_PER_MIN
    }

    #[inline]
    pub fn second(self) -> i64 {
        (self.day_cycle() % NANOS_PER_MIN) / NANOS_PER_SEC
    }

    /// Millisecond digit group of the day-cycle remainder (0..=999)
    #[inline]
    pub fn millisecond(self) -> i64 {
        (self.day_cycle() % NANOS_PER_SEC) / NANOS_PER_MILLI
    }

    /// Microsecond digit group within the millisecond (0..=999)
    #[inline]
    pub fn microsecond(self) -> i64 {
        (self.day_cycle() % NANOS_PER_MILLI) / NANOS_PER_MICRO
    }

    /// Nanosecond digit group within the microsecond (0..=999)
    #[inline]
    pub fn nanosecond(self) -> i64 {
        self.day_cycle() % NANOS_PER_MICRO
    }

    #[inline]
    pub fn add_span(self, span: Span) -> NanoPoint {
        NanoPoint(self.0.saturating_add(span.as_nanos()))
    }

    #[inline]
    pub fn sub_span(self, span: Span) -> NanoPoint {
        NanoPoint(self.0.saturating_sub(span.as_nanos()))
    }
}

impl Sub for NanoPoint {
    type Output = Span;

    /// True elapsed difference, not the day-cycle view
    #[inline]
    fn sub(self, rhs: NanoPoint) -> Span {
        Span::from_nanos(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for NanoPoint {
    /// Default span form of the raw elapsed value
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.since_origin(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_samples() {
        let earlier = NanoPoint::now();
        let later = NanoPoint::now();
        assert!(later - earlier >= Span::ZERO);
    }

    #[test]
    fn test_day_cycle_decomposition() {
        // 1 day + 01:02:03.004005006 elapsed
        let value = NANOS_PER_DAY
            + NANOS_PER_HOUR
            + 2 * NANOS_PER_MIN
            + 3 * NANOS_PER_SEC
            + 4 * NANOS_PER_MILLI
            + 5 * NANOS_PER_MICRO
            + 6;
        let np = NanoPoint::from_nanos(value);
        assert_eq!(np.hour(), 1);
        assert_eq!(np.minute(), 2);
        assert_eq!(np.second(), 3);
        assert_eq!(np.millisecond(), 4);
        assert_eq!(np.microsecond(), 5);
        assert_eq!(np.nanosecond(), 6);
    }

    #[test]
    fn test_day_cycle_wraps_negative_values() {
        // One hour before the reference reads as 23:00 on the day cycle.
        let np = NanoPoint::from_nanos(-NANOS_PER_HOUR);
        assert_eq!(np.hour(), 23);
        assert_eq!(np.minute(), 0);
    }

    #[test]
    fn test_span_arithmetic_roundtrip() {
        let np = NanoPoint::from_nanos(123_456_789);
        let s = Span::from_secs(42);
        assert_eq!(np.add_span(s).sub_span(s), np);
        assert_eq!(np.add_span(s) - np, s);
    }

    #[test]
    fn test_subtraction_is_true_elapsed() {
        let a = NanoPoint::from_nanos(NANOS_PER_DAY + 5);
        let b = NanoPoint::from_nanos(5);
        assert_eq!(a - b, Span::from_nanos(NANOS_PER_DAY));
    }

    #[test]
    fn test_display_is_raw_elapsed_not_day_cycle() {
        let np = NanoPoint::from_nanos(NANOS_PER_DAY + NANOS_PER_HOUR);
        assert_eq!(np.to_string(), "25:00:00.000000000");
    }
}
