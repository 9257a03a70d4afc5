//! Error types shared across the Tempora crates
//!
//! Every failure surfaces as a host call failure: the error aborts the
//! current call and is recoverable at the host's call boundary. Nothing in
//! this workspace panics on bad script input.

use thiserror::Error;

/// Errors raised by native code while servicing a host call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    // Bridge errors
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("invalid index '{key}' on {type_name}")]
    UnknownAttribute { type_name: String, key: String },

    #[error("invalid namecall '{method}' on {type_name}")]
    UnknownMethod { type_name: String, method: String },

    #[error("unknown arithmetic operation: {lhs} {op} {rhs}")]
    UnsupportedArithmetic { op: char, lhs: String, rhs: String },

    // Call convention errors
    #[error("bad argument #{index}: expected {expected}, got {actual}")]
    BadArgument {
        index: usize,
        expected: &'static str,
        actual: String,
    },

    // Time errors
    #[error("unknown time zone '{name}'")]
    InvalidZone { name: String },

    #[error("invalid calendar fields: {0}")]
    InvalidDate(String),

    #[error("invalid format pattern '{pattern}': {reason}")]
    Format { pattern: String, reason: String },

    // Module table errors
    #[error("'{name}' is not a member of module '{module}'")]
    UnknownModuleMember { module: String, name: String },

    #[error("attempt to modify a read-only module table")]
    ReadOnly,
}

/// Result type for host-facing operations
pub type HostResult<T> = Result<T, HostError>;
