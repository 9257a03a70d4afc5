//! Call context for host-initiated calls into native code
//!
//! A `Scope` carries the arguments of the current call and offers checked
//! accessors in the style of a scripting host's argument API. Argument
//! positions are 1-based, matching the positions scripts see; for method
//! calls the receiver is not part of the argument list.

use crate::{Handle, HostError, HostResult, Value};

/// Arguments of the call currently being serviced
#[derive(Debug, Default)]
pub struct Scope {
    args: Vec<Value>,
}

static NIL: Value = Value::Nil;

impl Scope {
    pub fn new(args: Vec<Value>) -> Self {
        Scope { args }
    }

    pub fn empty() -> Self {
        Scope { args: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Argument at 1-based `index`; absent arguments read as nil
    pub fn arg(&self, index: usize) -> &Value {
        if index == 0 {
            return &NIL;
        }
        self.args.get(index - 1).unwrap_or(&NIL)
    }

    /// Required integer argument; integral floats are accepted
    pub fn check_int(&self, index: usize) -> HostResult<i64> {
        // `i64::MAX as f64` rounds up to 2^63, one past `i64::MAX`, so the
        // upper bound is exclusive.
        const I64_RANGE_END: f64 = 9_223_372_036_854_775_808.0;
        match self.arg(index) {
            Value::Int(v) => Ok(*v),
            Value::Number(n) if n.fract() == 0.0 && *n >= -I64_RANGE_END && *n < I64_RANGE_END => {
                Ok(*n as i64)
            }
            other => Err(HostError::BadArgument {
                index,
                expected: "integer",
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// Optional integer argument, `default` when absent or nil
    pub fn opt_int(&self, index: usize, default: i64) -> HostResult<i64> {
        match self.arg(index) {
            Value::Nil => Ok(default),
            _ => self.check_int(index),
        }
    }

    /// Required string argument
    pub fn check_str(&self, index: usize) -> HostResult<&str> {
        match self.arg(index) {
            Value::Str(s) => Ok(s),
            other => Err(HostError::BadArgument {
                index,
                expected: "string",
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// Optional string argument, `None` when absent or nil
    pub fn opt_str(&self, index: usize) -> HostResult<Option<&str>> {
        match self.arg(index) {
            Value::Nil => Ok(None),
            _ => self.check_str(index).map(Some),
        }
    }

    /// Required handle argument
    pub fn check_handle(&self, index: usize) -> HostResult<&Handle> {
        match self.arg(index) {
            Value::Handle(h) => Ok(h),
            other => Err(HostError::BadArgument {
                index,
                expected: "userdata",
                actual: other.type_name().to_string(),
            }),
        }
    }
}
