//! The read-only `time` module table
//!
//! Factory functions construct bridged handles; each constructor lazily
//! registers its type's dispatch tables on first use, so no explicit
//! module-init phase has to run before values can be created. The table
//! itself is sealed at build time and rejects writes.

use tracing::debug;

use tempora_host::{HostError, HostResult, Module, ModuleBuilder, Scope, Value};
use tempora_time::{zone, NanoPoint, Point, Span};

use crate::nanopoint::wrap_nanopoint;
use crate::point::wrap_point;
use crate::span::wrap_span;

/// Name of the module table
pub const MODULE_NAME: &str = "time";

fn now(scope: &mut Scope) -> HostResult<Value> {
    let zone_name = scope.opt_str(1)?;
    Ok(Value::Handle(wrap_point(Point::now(zone_name)?)))
}

fn utc_now(_scope: &mut Scope) -> HostResult<Value> {
    Ok(Value::Handle(wrap_point(Point::utc_now())))
}

fn nano_now(_scope: &mut Scope) -> HostResult<Value> {
    Ok(Value::Handle(wrap_nanopoint(NanoPoint::now())))
}

/// Calendar field arguments are integers within `u32` range
fn field_u32(scope: &Scope, index: usize) -> HostResult<u32> {
    let value = scope.check_int(index)?;
    u32::try_from(value).map_err(|_| HostError::InvalidDate(format!("field value {value} is out of range")))
}

fn from_datetime(scope: &mut Scope) -> HostResult<Value> {
    let year = scope.check_int(1)?;
    let year = i32::try_from(year)
        .map_err(|_| HostError::InvalidDate(format!("year {year} is out of range")))?;
    let month = field_u32(scope, 2)?;
    let day = field_u32(scope, 3)?;
    let hour = field_u32(scope, 4)?;
    let min = field_u32(scope, 5)?;
    let sec = field_u32(scope, 6)?;
    Ok(Value::Handle(wrap_point(Point::from_datetime(
        year, month, day, hour, min, sec,
    )?)))
}

fn from_date(scope: &mut Scope) -> HostResult<Value> {
    let year = scope.check_int(1)?;
    let year = i32::try_from(year)
        .map_err(|_| HostError::InvalidDate(format!("year {year} is out of range")))?;
    let month = field_u32(scope, 2)?;
    let day = field_u32(scope, 3)?;
    Ok(Value::Handle(wrap_point(Point::from_date(year, month, day)?)))
}

fn clock_fields(scope: &Scope) -> HostResult<Span> {
    let hours = scope.check_int(1)?;
    let mins = scope.check_int(2)?;
    let secs = scope.check_int(3)?;
    let millis = scope.opt_int(4, 0)?;
    Ok(Span::from_hms(hours, mins, secs, millis))
}

fn from_time(scope: &mut Scope) -> HostResult<Value> {
    Ok(Value::Handle(wrap_span(clock_fields(scope)?)))
}

fn from_duration(scope: &mut Scope) -> HostResult<Value> {
    Ok(Value::Handle(wrap_span(clock_fields(scope)?)))
}

macro_rules! unit_constructor {
    ($name:ident, $make:path) => {
        fn $name(scope: &mut Scope) -> HostResult<Value> {
            let count = scope.check_int(1)?;
            Ok(Value::Handle(wrap_span($make(count))))
        }
    };
}

unit_constructor!(seconds, Span::from_secs);
unit_constructor!(nanoseconds, Span::from_nanos);
unit_constructor!(microseconds, Span::from_micros);
unit_constructor!(minutes, Span::from_mins);
unit_constructor!(hours, Span::from_hours);
unit_constructor!(days, Span::from_days);
unit_constructor!(months, Span::from_months);
unit_constructor!(years, Span::from_years);

/// Build the sealed `time` module table
///
/// `current_zone` is captured once, at module load.
pub fn open() -> Module {
    let module = ModuleBuilder::new(MODULE_NAME)
        .function("now", now)
        .function("utc_now", utc_now)
        .function("nano_now", nano_now)
        .function("from_datetime", from_datetime)
        .function("from_date", from_date)
        .function("from_time", from_time)
        .function("from_duration", from_duration)
        .function("seconds", seconds)
        .function("nanoseconds", nanoseconds)
        .function("microseconds", microseconds)
        .function("minutes", minutes)
        .function("hours", hours)
        .function("days", days)
        .function("months", months)
        .function("years", years)
        .constant("current_zone", Value::Str(zone::system_name().to_string()))
        .seal();
    debug!(module = MODULE_NAME, "opened time module");
    module
}
