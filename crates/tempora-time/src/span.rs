//! Signed durations at nanosecond resolution
//!
//! A `Span` is an `i64` count of nanoseconds. Arithmetic is exact integer
//! arithmetic that saturates at `i64::MIN`/`i64::MAX` instead of wrapping.
//! Spans carry no zone and no calendar association.

use std::fmt;
use std::ops::{Add, Neg, Sub};

pub const NANOS_PER_MICRO: i64 = 1_000;
pub const NANOS_PER_MILLI: i64 = 1_000_000;
pub const NANOS_PER_SEC: i64 = 1_000_000_000;
pub const NANOS_PER_MIN: i64 = 60 * NANOS_PER_SEC;
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MIN;
pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// Average Gregorian month (1/12 of the average year), in seconds
const SECS_PER_MONTH: i64 = 2_629_746;
/// Average Gregorian year (365.2425 days), in seconds
const SECS_PER_YEAR: i64 = 31_556_952;

/// A signed duration with nanosecond resolution
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Span(i64);

impl Span {
    pub const ZERO: Span = Span(0);
    pub const MIN: Span = Span(i64::MIN);
    pub const MAX: Span = Span(i64::MAX);

    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        Span(nanos)
    }

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        Span(micros.saturating_mul(NANOS_PER_MICRO))
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Span(millis.saturating_mul(NANOS_PER_MILLI))
    }

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        Span(secs.saturating_mul(NANOS_PER_SEC))
    }

    #[inline]
    pub fn from_mins(mins: i64) -> Self {
        Span(mins.saturating_mul(NANOS_PER_MIN))
    }

    #[inline]
    pub fn from_hours(hours: i64) -> Self {
        Span(hours.saturating_mul(NANOS_PER_HOUR))
    }

    #[inline]
    pub fn from_days(days: i64) -> Self {
        Span(days.saturating_mul(NANOS_PER_DAY))
    }

    /// Fixed-ratio month: 2,629,746 seconds, not calendar-aware
    ///
    /// Twelve of these equal one [`Span::from_years`] year exactly, but a
    /// span of months diverges from calendar month addition.
    #[inline]
    pub fn from_months(months: i64) -> Self {
        Span(months.saturating_mul(SECS_PER_MONTH).saturating_mul(NANOS_PER_SEC))
    }

    /// Fixed-ratio year: 31,556,952 seconds (365.2425 days), not calendar-aware
    #[inline]
    pub fn from_years(years: i64) -> Self {
        Span(years.saturating_mul(SECS_PER_YEAR).saturating_mul(NANOS_PER_SEC))
    }

    /// Combine clock-style fields into a span
    pub fn from_hms(hours: i64, mins: i64, secs: i64, millis: i64) -> Self {
        Span::from_hours(hours) + Span::from_mins(mins) + Span::from_secs(secs)
            + Span::from_millis(millis)
    }

    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Whole milliseconds, truncated toward zero
    #[inline]
    pub const fn as_millis(self) -> i64 {
        self.0 / NANOS_PER_MILLI
    }

    #[inline]
    pub fn total_nanoseconds(self) -> f64 {
        self.0 as f64
    }

    #[inline]
    pub fn total_microseconds(self) -> f64 {
        self.0 as f64 / NANOS_PER_MICRO as f64
    }

    #[inline]
    pub fn total_seconds(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    #[inline]
    pub fn total_minutes(self) -> f64 {
        self.0 as f64 / NANOS_PER_MIN as f64
    }

    #[inline]
    pub fn total_hours(self) -> f64 {
        self.0 as f64 / NANOS_PER_HOUR as f64
    }

    #[inline]
    pub fn saturating_add(self, rhs: Span) -> Span {
        Span(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Span) -> Span {
        Span(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Span {
    type Output = Span;

    #[inline]
    fn add(self, rhs: Span) -> Span {
        self.saturating_add(rhs)
    }
}

impl Sub for Span {
    type Output = Span;

    #[inline]
    fn sub(self, rhs: Span) -> Span {
        self.saturating_sub(rhs)
    }
}

impl Neg for Span {
    type Output = Span;

    #[inline]
    fn neg(self) -> Span {
        Span(self.0.saturating_neg())
    }
}

impl fmt::Display for Span {
    /// Fixed-width `HH:MM:SS.nnnnnnnnn`, sign prefix for negative spans
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::fmt::default_span(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unit_ratios() {
        assert_eq!(Span::from_secs(1).as_nanos(), 1_000_000_000);
        assert_eq!(Span::from_mins(1), Span::from_secs(60));
        assert_eq!(Span::from_hours(1), Span::from_mins(60));
        assert_eq!(Span::from_days(1), Span::from_hours(24));
    }

    #[test]
    fn test_month_year_ratios_are_consistent_but_not_calendar_exact() {
        assert_eq!(Span::from_months(12), Span::from_years(1));
        assert_ne!(Span::from_days(365), Span::from_years(1));
    }

    #[test]
    fn test_from_hms() {
        let span = Span::from_hms(1, 2, 3, 4);
        assert_eq!(
            span.as_nanos(),
            NANOS_PER_HOUR + 2 * NANOS_PER_MIN + 3 * NANOS_PER_SEC + 4 * NANOS_PER_MILLI
        );
    }

    #[test]
    fn test_saturation_at_bounds() {
        assert_eq!(Span::MAX + Span::from_secs(1), Span::MAX);
        assert_eq!(Span::MIN - Span::from_secs(1), Span::MIN);
        assert_eq!(Span::from_years(i64::MAX), Span::MAX);
    }

    #[test]
    fn test_total_accessors() {
        let span = Span::from_millis(1_500);
        assert_eq!(span.total_seconds(), 1.5);
        assert_eq!(span.total_minutes(), 1.5 / 60.0);
        assert_eq!(span.total_microseconds(), 1_500_000.0);
        assert_eq!(span.total_nanoseconds(), 1_500_000_000.0);
    }

    #[test]
    fn test_as_millis_truncates_toward_zero() {
        assert_eq!(Span::from_nanos(1_999_999).as_millis(), 1);
        assert_eq!(Span::from_nanos(-1_999_999).as_millis(), -1);
    }

    proptest! {
        #[test]
        fn prop_add_sub_roundtrip(a in -1_000_000_000_000i64..1_000_000_000_000,
                                  b in -1_000_000_000_000i64..1_000_000_000_000) {
            let a = Span::from_nanos(a);
            let b = Span::from_nanos(b);
            prop_assert_eq!((a + b) - b, a);
        }

        #[test]
        fn prop_add_commutes(a in -1_000_000_000_000i64..1_000_000_000_000,
                             b in -1_000_000_000_000i64..1_000_000_000_000) {
            let a = Span::from_nanos(a);
            let b = Span::from_nanos(b);
            prop_assert_eq!(a + b, b + a);
        }

        #[test]
        fn prop_ordering_matches_nanos(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(Span::from_nanos(a) < Span::from_nanos(b), a < b);
        }
    }
}
