//! Bridged surface of `time.timepoint`
//!
//! Attribute reads project the zone-local calendar view of the absolute
//! instant; subtraction and equality compare absolute instants no matter
//! which zones the operands are bound to.

use tempora_bridge::{self as bridge, Metamethods, TypeSpec};
use tempora_host::{Handle, HostError, HostResult, Scope, Value};
use tempora_time::{Point, Span};

use crate::span::wrap_span;

/// Type name of zoned timestamps as seen by the host
pub const POINT_TYPE: &str = "time.timepoint";

/// Wrap a point into a tagged handle, registering the type on first use
pub fn wrap_point(value: Point) -> Handle {
    bridge::wrap(value, spec)
}

fn spec() -> TypeSpec<Point> {
    let mut spec = TypeSpec::new(POINT_TYPE);
    spec.index = vec![
        ("year", |p: &Point, _: &mut Scope| Ok(Value::Int(p.year()))),
        ("month", |p: &Point, _: &mut Scope| Ok(Value::Int(p.month()))),
        ("day", |p: &Point, _: &mut Scope| Ok(Value::Int(p.day()))),
        ("hour", |p: &Point, _: &mut Scope| Ok(Value::Int(p.hour()))),
        ("minute", |p: &Point, _: &mut Scope| Ok(Value::Int(p.minute()))),
        ("second", |p: &Point, _: &mut Scope| Ok(Value::Int(p.second()))),
        ("millisecond", |p: &Point, _: &mut Scope| {
            Ok(Value::Int(p.millisecond()))
        }),
        ("time_zone", |p: &Point, _: &mut Scope| {
            Ok(Value::Str(p.zone_name().to_string()))
        }),
        ("zone_abbreviation", |p: &Point, _: &mut Scope| {
            Ok(Value::Str(p.zone_abbreviation()))
        }),
    ];
    spec.namecall = vec![
        ("format", |p: &Point, scope: &mut Scope| {
            let pattern = scope.check_str(1)?;
            Ok(Value::Str(p.format(pattern)?))
        }),
        ("change_zone", |p: &Point, scope: &mut Scope| {
            let name = scope.check_str(1)?;
            Ok(Value::Handle(wrap_point(p.change_zone(name)?)))
        }),
        ("type", |_: &Point, _: &mut Scope| Ok(Value::Str(POINT_TYPE.into()))),
    ];
    spec.meta = Metamethods {
        // Point + span resolves through the span type's add handler.
        add: None,
        sub: Some(point_sub),
        eq: Some(point_eq),
        tostring: Some(|p: &Point| p.to_string()),
    };
    spec
}

fn check_point_operand(value: &Value) -> HostResult<Handle> {
    match value.as_handle() {
        Some(handle) if bridge::is::<Point>(handle) => Ok(handle.clone()),
        _ => Err(HostError::TypeMismatch {
            expected: POINT_TYPE.to_string(),
            actual: value.type_name().to_string(),
        }),
    }
}

fn point_sub(lhs: &Value, rhs: &Value) -> HostResult<Value> {
    let left = check_point_operand(lhs)?;
    let left = bridge::borrow::<Point>(&left)?;

    // point - span shifts the instant; point - point is the absolute-time
    // difference.
    if let Some(handle) = rhs.as_handle() {
        if bridge::is::<Span>(handle) {
            let span = *bridge::borrow::<Span>(handle)?;
            return Ok(Value::Handle(wrap_point(left.sub_span(span))));
        }
    }
    let right = check_point_operand(rhs)?;
    let right = bridge::borrow::<Point>(&right)?;
    Ok(Value::Handle(wrap_span(&*left - &*right)))
}

fn point_eq(lhs: &Value, rhs: &Value) -> HostResult<bool> {
    match (lhs.as_handle(), rhs.as_handle()) {
        (Some(a), Some(b)) if bridge::is::<Point>(a) && bridge::is::<Point>(b) => {
            Ok(*bridge::borrow::<Point>(a)? == *bridge::borrow::<Point>(b)?)
        }
        _ => Ok(false),
    }
}
