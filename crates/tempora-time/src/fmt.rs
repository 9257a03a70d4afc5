//! Formatting for spans and strftime pattern validation
//!
//! The default span form decomposes the magnitude by repeated truncating
//! division: whole hours first, then minutes, seconds and the nanosecond
//! remainder. Pattern-driven span formatting is a small directive engine
//! over the same decomposition; Point formatting delegates to chrono's
//! strftime but validates the pattern first so a malformed pattern is a
//! recoverable error instead of mangled output.

use chrono::format::{Item, StrftimeItems};
use tempora_host::{HostError, HostResult};

use crate::span::{Span, NANOS_PER_HOUR, NANOS_PER_MIN, NANOS_PER_SEC};

struct SpanParts {
    negative: bool,
    hours: u64,
    minutes: u64,
    seconds: u64,
    nanos: u64,
}

/// Successive truncating division of the span's magnitude
fn split(span: Span) -> SpanParts {
    let total = span.as_nanos().unsigned_abs();
    let hours = total / NANOS_PER_HOUR as u64;
    let rem = total % NANOS_PER_HOUR as u64;
    let minutes = rem / NANOS_PER_MIN as u64;
    let rem = rem % NANOS_PER_MIN as u64;
    let seconds = rem / NANOS_PER_SEC as u64;
    let nanos = rem % NANOS_PER_SEC as u64;
    SpanParts {
        negative: span.as_nanos() < 0,
        hours,
        minutes,
        seconds,
        nanos,
    }
}

/// Default fixed-width span form: `HH:MM:SS.nnnnnnnnn`
///
/// Hours have unbounded width but at least two digits; minutes and seconds
/// are zero-padded to two digits, the nanosecond remainder to nine.
pub fn default_span(span: Span) -> String {
    let parts = split(span);
    format!(
        "{}{:02}:{:02}:{:02}.{:09}",
        if parts.negative { "-" } else { "" },
        parts.hours,
        parts.minutes,
        parts.seconds,
        parts.nanos
    )
}

/// Render `span` with a directive pattern
///
/// Supported directives: `%H` (whole hours, sign carried), `%M` (minutes),
/// `%S` (seconds), `%N` (nine-digit nanosecond remainder), `%T` (shorthand
/// for the default form) and `%%`. Anything else is a format error naming
/// the offending directive.
pub fn format_span(span: Span, pattern: &str) -> HostResult<String> {
    let parts = split(span);
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('H') => {
                if parts.negative {
                    out.push('-');
                }
                out.push_str(&format!("{:02}", parts.hours));
            }
            Some('M') => out.push_str(&format!("{:02}", parts.minutes)),
            Some('S') => out.push_str(&format!("{:02}", parts.seconds)),
            Some('N') => out.push_str(&format!("{:09}", parts.nanos)),
            Some('T') => out.push_str(&default_span(span)),
            Some('%') => out.push('%'),
            Some(other) => {
                return Err(HostError::Format {
                    pattern: pattern.to_string(),
                    reason: format!("unknown directive '%{other}'"),
                })
            }
            None => {
                return Err(HostError::Format {
                    pattern: pattern.to_string(),
                    reason: "trailing '%'".to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Reject strftime patterns chrono cannot render
pub fn validate_strftime(pattern: &str) -> HostResult<()> {
    for item in StrftimeItems::new(pattern) {
        if matches!(item, Item::Error) {
            return Err(HostError::Format {
                pattern: pattern.to_string(),
                reason: "unrecognized strftime directive".to_string(),
            });
        }
    }
    Ok(())
}
