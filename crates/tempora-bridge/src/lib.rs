//! Tempora Bridge - the generic native-value bridge
//!
//! The bridge lets the host hold, pass and eventually reclaim a native
//! value of any registered type, while routing host-initiated operations
//! back into per-type dispatch tables:
//! - Lazy, idempotent, first-caller-wins type registration (`register_once`)
//! - Ownership transfer into host-managed cells (`wrap`)
//! - Tag-checked downcasts (`borrow`, `borrow_mut`, `is`)
//! - Attribute, method and operator dispatch (`index`, `newindex`,
//!   `namecall`, `arith`, `equals`, `display`)
//!
//! Registration state is process-wide and written once per type; every
//! dispatch error aborts only the current host call and never disturbs
//! registry state.

pub mod dispatch;
pub mod registry;

pub use dispatch::*;
pub use registry::*;
