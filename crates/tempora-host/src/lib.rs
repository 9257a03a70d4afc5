//! Tempora Host - the capability surface a scripting host exposes to native code
//!
//! This crate defines the pieces of the host the native side calls through:
//! - Dynamic values (`Value`) and tagged opaque handles (`Handle`)
//! - The call context (`Scope`) with checked argument access
//! - Interned method-name atoms (`Atom`)
//! - Read-only module tables (`Module`, `ModuleBuilder`)
//! - The shared error type (`HostError`)
//!
//! The host's own VM, parser and collector are out of scope; everything here
//! is the boundary native extensions are written against.

pub mod atom;
pub mod error;
pub mod module;
pub mod scope;
pub mod value;

pub use atom::*;
pub use error::*;
pub use module::*;
pub use scope::*;
pub use value::*;
