//! Tempora Time - the time domain model
//!
//! Three cooperating representations:
//! - `Span`: signed duration, nanosecond resolution, saturating arithmetic
//! - `Point`: calendar timestamp bound to an IANA zone, millisecond resolution
//! - `NanoPoint`: monotonic timestamp, nanosecond resolution, no calendar
//!
//! Closure rules relating them (anything else is a type error, handled at
//! the bridge layer):
//! - `Span ± Span -> Span`
//! - `Point ± Span -> Point` (zone preserved)
//! - `NanoPoint ± Span -> NanoPoint`
//! - `Point - Point -> Span`, `NanoPoint - NanoPoint -> Span`

pub mod fmt;
pub mod nanopoint;
pub mod point;
pub mod span;
pub mod zone;

pub use fmt::*;
pub use nanopoint::*;
pub use point::*;
pub use span::*;
pub use zone::*;
