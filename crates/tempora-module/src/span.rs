//! Bridged surface of `time.span`
//!
//! Span registers the shared arithmetic handlers: the host probes the left
//! operand's metamethod first and the right operand's second, so the
//! handlers here resolve every legal combination of the closure table by
//! inspecting both operand tags at runtime.

use tempora_bridge::{self as bridge, Metamethods, TypeSpec};
use tempora_host::{Handle, HostError, HostResult, Scope, Value};
use tempora_time::{format_span, NanoPoint, Point, Span};

use crate::nanopoint::wrap_nanopoint;
use crate::point::wrap_point;

/// Type name of spans as seen by the host
pub const SPAN_TYPE: &str = "time.span";

/// Wrap a span into a tagged handle, registering the type on first use
pub fn wrap_span(value: Span) -> Handle {
    bridge::wrap(value, spec)
}

fn spec() -> TypeSpec<Span> {
    let mut spec = TypeSpec::new(SPAN_TYPE);
    spec.index = vec![
        ("total_seconds", |s: &Span, _: &mut Scope| {
            Ok(Value::Number(s.total_seconds()))
        }),
        ("total_microseconds", |s: &Span, _: &mut Scope| {
            Ok(Value::Number(s.total_microseconds()))
        }),
        ("total_nanoseconds", |s: &Span, _: &mut Scope| {
            Ok(Value::Number(s.total_nanoseconds()))
        }),
        ("total_minutes", |s: &Span, _: &mut Scope| {
            Ok(Value::Number(s.total_minutes()))
        }),
        ("total_hours", |s: &Span, _: &mut Scope| {
            Ok(Value::Number(s.total_hours()))
        }),
    ];
    spec.namecall = vec![
        ("format", |s: &Span, scope: &mut Scope| {
            let pattern = scope.check_str(1)?;
            Ok(Value::Str(format_span(*s, pattern)?))
        }),
        ("type", |_: &Span, _: &mut Scope| Ok(Value::Str(SPAN_TYPE.into()))),
    ];
    spec.meta = Metamethods {
        add: Some(span_add),
        sub: Some(span_sub),
        eq: Some(span_eq),
        tostring: Some(|s: &Span| s.to_string()),
    };
    spec
}

/// The right-hand operand of span arithmetic must itself be a span
fn check_span_operand(value: &Value) -> HostResult<Span> {
    let handle = value.as_handle().ok_or_else(|| HostError::TypeMismatch {
        expected: SPAN_TYPE.to_string(),
        actual: value.type_name().to_string(),
    })?;
    Ok(*bridge::borrow::<Span>(handle)?)
}

fn unsupported(op: char, lhs: &Value, rhs: &Value) -> HostError {
    HostError::UnsupportedArithmetic {
        op,
        lhs: lhs.type_name().to_string(),
        rhs: rhs.type_name().to_string(),
    }
}

fn span_add(lhs: &Value, rhs: &Value) -> HostResult<Value> {
    if let Some(handle) = lhs.as_handle() {
        if bridge::is::<Point>(handle) {
            let point = bridge::borrow::<Point>(handle)?;
            let span = check_span_operand(rhs)?;
            return Ok(Value::Handle(wrap_point(point.add_span(span))));
        }
        if bridge::is::<NanoPoint>(handle) {
            let nano = *bridge::borrow::<NanoPoint>(handle)?;
            let span = check_span_operand(rhs)?;
            return Ok(Value::Handle(wrap_nanopoint(nano.add_span(span))));
        }
        if bridge::is::<Span>(handle) {
            let left = *bridge::borrow::<Span>(handle)?;
            let right = check_span_operand(rhs)?;
            return Ok(Value::Handle(wrap_span(left + right)));
        }
    }
    Err(unsupported('+', lhs, rhs))
}

fn span_sub(lhs: &Value, rhs: &Value) -> HostResult<Value> {
    if let Some(handle) = lhs.as_handle() {
        if bridge::is::<Point>(handle) {
            let point = bridge::borrow::<Point>(handle)?;
            let span = check_span_operand(rhs)?;
            return Ok(Value::Handle(wrap_point(point.sub_span(span))));
        }
        if bridge::is::<NanoPoint>(handle) {
            let nano = *bridge::borrow::<NanoPoint>(handle)?;
            let span = check_span_operand(rhs)?;
            return Ok(Value::Handle(wrap_nanopoint(nano.sub_span(span))));
        }
        if bridge::is::<Span>(handle) {
            let left = *bridge::borrow::<Span>(handle)?;
            let right = check_span_operand(rhs)?;
            return Ok(Value::Handle(wrap_span(left - right)));
        }
    }
    Err(unsupported('-', lhs, rhs))
}

fn span_eq(lhs: &Value, rhs: &Value) -> HostResult<bool> {
    match (lhs.as_handle(), rhs.as_handle()) {
        (Some(a), Some(b)) if bridge::is::<Span>(a) && bridge::is::<Span>(b) => {
            Ok(*bridge::borrow::<Span>(a)? == *bridge::borrow::<Span>(b)?)
        }
        _ => Ok(false),
    }
}
