//! Zoned calendar timestamps at millisecond resolution
//!
//! A `Point` pairs an absolute instant, truncated to milliseconds, with a
//! named IANA zone. The zone only affects the calendar-local view; equality
//! and ordering always compare the absolute instant, even across zones.

use std::fmt;
use std::ops::Sub;

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use tempora_host::{HostError, HostResult};

use crate::span::Span;
use crate::{fmt as span_fmt, zone};

/// A millisecond-resolution instant bound to a time zone
#[derive(Clone, Debug)]
pub struct Point {
    stamp: DateTime<Tz>,
}

/// Ambiguous local times (DST fall-back) take the earlier offset;
/// nonexistent local times (spring-forward gap) resolve to the first
/// representable wall time at or after the requested fields, the gap end.
fn resolve_local(zone: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(stamp) => stamp,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => gap_end(zone, naive)
            // Unreachable for real zone data; interpret as UTC rather
            // than failing the call.
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(&zone)),
    }
}

/// Earliest wall time at or after `naive` that `zone` can represent
///
/// `naive` is known to fall inside a transition gap; gaps are bounded by
/// the largest offset change in the zone database, well under eight hours.
fn gap_end(zone: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    let mut low = 0_i64;
    let mut high = 8 * 3600;
    naive.checked_add_signed(TimeDelta::seconds(high))?;
    if matches!(
        zone.from_local_datetime(&(naive + TimeDelta::seconds(high))),
        LocalResult::None
    ) {
        return None;
    }
    // Bisect to the second: `naive + low` is nonexistent, `naive + high`
    // is representable.
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        match zone.from_local_datetime(&(naive + TimeDelta::seconds(mid))) {
            LocalResult::None => low = mid,
            _ => high = mid,
        }
    }
    match zone.from_local_datetime(&(naive + TimeDelta::seconds(high))) {
        LocalResult::Single(stamp) | LocalResult::Ambiguous(stamp, _) => Some(stamp),
        LocalResult::None => None,
    }
}

impl Point {
    fn from_utc_millis(millis: i64, zone: Tz) -> Point {
        let utc = match Utc.timestamp_millis_opt(millis) {
            LocalResult::Single(stamp) => stamp,
            // Saturate at the calendar's representable range.
            _ if millis > 0 => DateTime::<Utc>::MAX_UTC,
            _ => DateTime::<Utc>::MIN_UTC,
        };
        Point {
            stamp: utc.with_timezone(&zone),
        }
    }

    /// Current wall-clock time in the named zone (system zone when absent)
    pub fn now(zone_name: Option<&str>) -> HostResult<Point> {
        let zone = match zone_name {
            Some(name) => zone::locate(name)?,
            None => zone::system(),
        };
        Ok(Point::from_utc_millis(Utc::now().timestamp_millis(), zone))
    }

    /// Current wall-clock time, zone fixed to UTC
    pub fn utc_now() -> Point {
        Point::from_utc_millis(Utc::now().timestamp_millis(), Tz::UTC)
    }

    /// Midnight of the given calendar date in the system zone
    pub fn from_date(year: i32, month: u32, day: u32) -> HostResult<Point> {
        Point::from_fields(zone::system(), year, month, day, 0, 0, 0)
    }

    /// Calendar date and time of day in the system zone
    pub fn from_datetime(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> HostResult<Point> {
        Point::from_fields(zone::system(), year, month, day, hour, min, sec)
    }

    /// Calendar fields interpreted in `zone`
    ///
    /// DST discontinuities follow [`resolve_local`]: ambiguous local times
    /// take the earlier offset, nonexistent ones resolve to the gap end.
    pub fn from_fields(
        zone: Tz,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> HostResult<Point> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            HostError::InvalidDate(format!("{year:04}-{month:02}-{day:02} is not a valid date"))
        })?;
        let naive = date.and_hms_opt(hour, min, sec).ok_or_else(|| {
            HostError::InvalidDate(format!(
                "{hour:02}:{min:02}:{sec:02} is not a valid time of day"
            ))
        })?;
        Ok(Point {
            stamp: resolve_local(zone, naive),
        })
    }

    /// Milliseconds since the Unix epoch, zone-independent
    #[inline]
    pub fn epoch_millis(&self) -> i64 {
        self.stamp.timestamp_millis()
    }

    #[inline]
    pub fn zone(&self) -> Tz {
        self.stamp.timezone()
    }

    /// IANA name of the bound zone
    #[inline]
    pub fn zone_name(&self) -> &'static str {
        self.stamp.timezone().name()
    }

    /// Zone abbreviation at this instant (DST-sensitive, e.g. `EST`/`EDT`)
    pub fn zone_abbreviation(&self) -> String {
        self.stamp.format("%Z").to_string()
    }

    #[inline]
    pub fn year(&self) -> i64 {
        self.stamp.year() as i64
    }

    #[inline]
    pub fn month(&self) -> i64 {
        self.stamp.month() as i64
    }

    #[inline]
    pub fn day(&self) -> i64 {
        self.stamp.day() as i64
    }

    #[inline]
    pub fn hour(&self) -> i64 {
        self.stamp.hour() as i64
    }

    #[inline]
    pub fn minute(&self) -> i64 {
        self.stamp.minute() as i64
    }

    #[inline]
    pub fn second(&self) -> i64 {
        self.stamp.second() as i64
    }

    #[inline]
    pub fn millisecond(&self) -> i64 {
        self.stamp.timestamp_subsec_millis() as i64
    }

    /// Rebind to another zone without changing the absolute instant
    pub fn change_zone(&self, name: &str) -> HostResult<Point> {
        let tz = zone::locate(name)?;
        Ok(Point {
            stamp: self.stamp.with_timezone(&tz),
        })
    }

    /// Zone-aware strftime formatting; malformed patterns are format errors
    pub fn format(&self, pattern: &str) -> HostResult<String> {
        span_fmt::validate_strftime(pattern)?;
        Ok(self.stamp.format(pattern).to_string())
    }

    /// Shift by a span, preserving the zone
    ///
    /// The span is truncated to the point's millisecond resolution first.
    pub fn add_span(&self, span: Span) -> Point {
        Point::from_utc_millis(self.epoch_millis().saturating_add(span.as_millis()), self.zone())
    }

    /// Shift backwards by a span, preserving the zone
    pub fn sub_span(&self, span: Span) -> Point {
        Point::from_utc_millis(self.epoch_millis().saturating_sub(span.as_millis()), self.zone())
    }
}

impl PartialEq for Point {
    #[inline]
    fn eq(&self, other: &Point) -> bool {
        self.epoch_millis() == other.epoch_millis()
    }
}

impl Eq for Point {}

impl PartialOrd for Point {
    #[inline]
    fn partial_cmp(&self, other: &Point) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    #[inline]
    fn cmp(&self, other: &Point) -> std::cmp::Ordering {
        self.epoch_millis().cmp(&other.epoch_millis())
    }
}

impl Sub for &Point {
    type Output = Span;

    /// Absolute-time difference, independent of either operand's zone
    fn sub(self, rhs: &Point) -> Span {
        Span::from_millis(self.epoch_millis().saturating_sub(rhs.epoch_millis()))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stamp.format("%Y-%m-%d %H:%M:%S%.3f %Z"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    #[test]
    fn test_fields_roundtrip() {
        let p = Point::from_fields(Tz::UTC, 2024, 6, 15, 13, 14, 15).unwrap();
        assert_eq!(p.year(), 2024);
        assert_eq!(p.month(), 6);
        assert_eq!(p.day(), 15);
        assert_eq!(p.hour(), 13);
        assert_eq!(p.minute(), 14);
        assert_eq!(p.second(), 15);
        assert_eq!(p.millisecond(), 0);
    }

    #[test]
    fn test_system_zone_fields_roundtrip() {
        // Whatever the host zone is, reading the fields back in that same
        // zone reproduces them.
        let p = Point::from_datetime(2023, 11, 20, 7, 6, 5).unwrap();
        assert_eq!(
            (p.year(), p.month(), p.day(), p.hour(), p.minute(), p.second()),
            (2023, 11, 20, 7, 6, 5)
        );
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        assert!(matches!(
            Point::from_fields(Tz::UTC, 2023, 2, 29, 0, 0, 0),
            Err(HostError::InvalidDate(_))
        ));
        assert!(matches!(
            Point::from_fields(Tz::UTC, 2023, 1, 1, 25, 0, 0),
            Err(HostError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_leap_day_difference_is_24_hours() {
        let feb29 = Point::from_fields(Tz::UTC, 2024, 2, 29, 0, 0, 0).unwrap();
        let feb28 = Point::from_fields(Tz::UTC, 2024, 2, 28, 0, 0, 0).unwrap();
        assert_eq!(&feb29 - &feb28, Span::from_hours(24));
    }

    #[test]
    fn test_change_zone_preserves_instant() {
        let utc = Point::from_fields(Tz::UTC, 2024, 1, 15, 12, 0, 0).unwrap();
        let tokyo = utc.change_zone("Asia/Tokyo").unwrap();
        assert_eq!(utc, tokyo);
        assert_eq!(tokyo.zone_name(), "Asia/Tokyo");
        assert_eq!(tokyo.hour(), 21);

        // Differences are invariant under rebinding.
        let other = Point::from_fields(Tz::UTC, 2024, 1, 16, 12, 0, 0).unwrap();
        assert_eq!(&other - &utc, &other - &tokyo);
    }

    #[test]
    fn test_change_zone_unknown_zone() {
        let p = Point::utc_now();
        assert!(matches!(
            p.change_zone("Mars/Olympus"),
            Err(HostError::InvalidZone { .. })
        ));
    }

    #[test]
    fn test_span_arithmetic_preserves_zone_and_roundtrips() {
        let p = Point::from_fields(New_York, 2024, 5, 1, 10, 30, 0).unwrap();
        let s = Span::from_hms(5, 45, 30, 250);
        let shifted = p.add_span(s);
        assert_eq!(shifted.zone_name(), "America/New_York");
        assert_eq!(shifted.sub_span(s), p);
    }

    #[test]
    fn test_dst_gap_resolves_to_gap_end() {
        // 2024-03-10 02:00..03:00 does not exist in New York; any request
        // inside it resolves to 03:00 EDT, not to a stepped-past instant.
        for (hour, min, sec) in [(2, 0, 0), (2, 20, 0), (2, 30, 0), (2, 59, 59)] {
            let p = Point::from_fields(New_York, 2024, 3, 10, hour, min, sec).unwrap();
            assert_eq!((p.hour(), p.minute(), p.second()), (3, 0, 0));
            assert_eq!(p.zone_abbreviation(), "EDT");
        }
    }

    #[test]
    fn test_dst_ambiguity_takes_earlier_offset() {
        // 2024-11-03 01:30 happens twice in New York; the earlier pass is
        // still daylight time.
        let p = Point::from_fields(New_York, 2024, 11, 3, 1, 30, 0).unwrap();
        assert_eq!(p.zone_abbreviation(), "EDT");
    }

    #[test]
    fn test_equality_is_zone_independent() {
        let a = Point::from_fields(Tz::UTC, 2024, 7, 1, 15, 0, 0).unwrap();
        let b = a.change_zone("Australia/Sydney").unwrap();
        assert_eq!(a, b);
        assert_eq!(&a - &b, Span::ZERO);
    }

    #[test]
    fn test_format_and_bad_pattern() {
        let p = Point::from_fields(Tz::UTC, 2024, 2, 29, 23, 59, 58).unwrap();
        assert_eq!(p.format("%Y-%m-%d %H:%M:%S").unwrap(), "2024-02-29 23:59:58");
        assert!(matches!(p.format("%Y %!"), Err(HostError::Format { .. })));
    }

    #[test]
    fn test_display_has_zone_abbreviation() {
        let p = Point::from_fields(Tz::UTC, 2024, 2, 29, 23, 59, 58).unwrap();
        assert_eq!(p.to_string(), "2024-02-29 23:59:58.000 UTC");
    }
}
