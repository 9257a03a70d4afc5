//! Bridged surface of `time.nanopoint`
//!
//! The calendar-style accessors expose the day-cycle view of the elapsed
//! value, not a wall clock; no zone semantics apply anywhere on this type.

use tempora_bridge::{self as bridge, Metamethods, TypeSpec};
use tempora_host::{Handle, HostError, HostResult, Scope, Value};
use tempora_time::{NanoPoint, Span};

use crate::span::wrap_span;

/// Type name of monotonic timestamps as seen by the host
pub const NANOPOINT_TYPE: &str = "time.nanopoint";

/// Wrap a monotonic timestamp, registering the type on first use
pub fn wrap_nanopoint(value: NanoPoint) -> Handle {
    bridge::wrap(value, spec)
}

fn spec() -> TypeSpec<NanoPoint> {
    let mut spec = TypeSpec::new(NANOPOINT_TYPE);
    spec.index = vec![
        ("hour", |np: &NanoPoint, _: &mut Scope| Ok(Value::Int(np.hour()))),
        ("minute", |np: &NanoPoint, _: &mut Scope| Ok(Value::Int(np.minute()))),
        ("second", |np: &NanoPoint, _: &mut Scope| Ok(Value::Int(np.second()))),
        ("millisecond", |np: &NanoPoint, _: &mut Scope| {
            Ok(Value::Int(np.millisecond()))
        }),
        ("microsecond", |np: &NanoPoint, _: &mut Scope| {
            Ok(Value::Int(np.microsecond()))
        }),
        ("nanosecond", |np: &NanoPoint, _: &mut Scope| {
            Ok(Value::Int(np.nanosecond()))
        }),
    ];
    spec.namecall = vec![("type", |_: &NanoPoint, _: &mut Scope| {
        Ok(Value::Str(NANOPOINT_TYPE.into()))
    })];
    spec.meta = Metamethods {
        // nanopoint + span resolves through the span type's add handler.
        add: None,
        sub: Some(nano_sub),
        eq: Some(nano_eq),
        tostring: Some(|np: &NanoPoint| np.to_string()),
    };
    spec
}

fn nano_sub(lhs: &Value, rhs: &Value) -> HostResult<Value> {
    let left = match lhs.as_handle() {
        Some(handle) if bridge::is::<NanoPoint>(handle) => *bridge::borrow::<NanoPoint>(handle)?,
        _ => {
            return Err(HostError::TypeMismatch {
                expected: NANOPOINT_TYPE.to_string(),
                actual: lhs.type_name().to_string(),
            })
        }
    };

    if let Some(handle) = rhs.as_handle() {
        if bridge::is::<Span>(handle) {
            let span = *bridge::borrow::<Span>(handle)?;
            return Ok(Value::Handle(wrap_nanopoint(left.sub_span(span))));
        }
        if bridge::is::<NanoPoint>(handle) {
            let right = *bridge::borrow::<NanoPoint>(handle)?;
            return Ok(Value::Handle(wrap_span(left - right)));
        }
    }
    Err(HostError::TypeMismatch {
        expected: NANOPOINT_TYPE.to_string(),
        actual: rhs.type_name().to_string(),
    })
}

fn nano_eq(lhs: &Value, rhs: &Value) -> HostResult<bool> {
    match (lhs.as_handle(), rhs.as_handle()) {
        (Some(a), Some(b)) if bridge::is::<NanoPoint>(a) && bridge::is::<NanoPoint>(b) => {
            Ok(*bridge::borrow::<NanoPoint>(a)? == *bridge::borrow::<NanoPoint>(b)?)
        }
        _ => Ok(false),
    }
}
