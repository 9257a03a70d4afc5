//! Tempora Module - the `time` module a scripting host loads
//!
//! Wires the time domain into the native-value bridge:
//! - Dispatch tables for the three bridged types (`time.span`,
//!   `time.timepoint`, `time.nanopoint`), registered lazily on first
//!   construction
//! - Factory functions (`now`, `utc_now`, `nano_now`, calendar and
//!   duration constructors, unit constructors)
//! - `open()`, which builds the sealed, read-only module table

pub mod nanopoint;
pub mod point;
pub mod span;
pub mod surface;

pub use nanopoint::{wrap_nanopoint, NANOPOINT_TYPE};
pub use point::{wrap_point, POINT_TYPE};
pub use span::{wrap_span, SPAN_TYPE};
pub use surface::{open, MODULE_NAME};
