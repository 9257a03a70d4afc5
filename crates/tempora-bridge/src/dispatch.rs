//! Host-initiated dispatch on bridged handles
//!
//! The host drives these entry points synchronously while executing script
//! code: attribute reads and writes arrive keyed by name, method calls by
//! interned atom, operators by probing the left operand's handler first and
//! the right operand's second (so a handler can resolve mixed-type
//! combinations by inspecting both tags). Lookup misses are recoverable
//! call errors naming the offending key.

use std::sync::Arc;

use tempora_host::{intern, name_of, Atom, Handle, HostError, HostResult, Scope, Value};

use crate::registry::{row_by_tag, TypeRow};

/// Operator being dispatched
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArithOp {
    Add,
    Sub,
}

impl ArithOp {
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            ArithOp::Add => '+',
            ArithOp::Sub => '-',
        }
    }
}

fn row_of(handle: &Handle) -> HostResult<Arc<TypeRow>> {
    row_by_tag(handle.tag()).ok_or_else(|| HostError::TypeMismatch {
        expected: "registered native type".to_string(),
        actual: handle.type_name().to_string(),
    })
}

/// Attribute read: `handle.key`
pub fn index(handle: &Handle, key: &str, scope: &mut Scope) -> HostResult<Value> {
    let row = row_of(handle)?;
    let callback = row.index.get(key).ok_or_else(|| HostError::UnknownAttribute {
        type_name: row.name.to_string(),
        key: key.to_string(),
    })?;
    let payload = handle.read();
    callback(&**payload, scope)
}

/// Attribute write: `handle.key = value`
pub fn newindex(handle: &Handle, key: &str, value: Value) -> HostResult<()> {
    let row = row_of(handle)?;
    let callback = row
        .newindex
        .get(key)
        .ok_or_else(|| HostError::UnknownAttribute {
            type_name: row.name.to_string(),
            key: key.to_string(),
        })?;
    let mut payload = handle.write();
    callback(&mut **payload, value)
}

/// Method call with a pre-interned name: `handle:method(args)`
pub fn namecall_atom(handle: &Handle, method: Atom, scope: &mut Scope) -> HostResult<Value> {
    let row = row_of(handle)?;
    let callback = row.namecall.get(&method).ok_or_else(|| HostError::UnknownMethod {
        type_name: row.name.to_string(),
        method: name_of(method),
    })?;
    let payload = handle.read();
    callback(&**payload, scope)
}

/// Method call by name; the name is interned once per distinct string
pub fn namecall(handle: &Handle, method: &str, scope: &mut Scope) -> HostResult<Value> {
    namecall_atom(handle, intern(method), scope)
}

fn arith_handler(op: ArithOp, operand: &Value) -> Option<crate::ArithFn> {
    let row = row_by_tag(operand.as_handle()?.tag())?;
    match op {
        ArithOp::Add => row.add,
        ArithOp::Sub => row.sub,
    }
}

/// Operator dispatch: `lhs op rhs`
///
/// The left operand's handler is tried first, then the right's; with
/// neither registered the operation is a type-mismatch error.
pub fn arith(op: ArithOp, lhs: &Value, rhs: &Value) -> HostResult<Value> {
    if let Some(handler) = arith_handler(op, lhs) {
        return handler(lhs, rhs);
    }
    if let Some(handler) = arith_handler(op, rhs) {
        return handler(lhs, rhs);
    }
    Err(HostError::UnsupportedArithmetic {
        op: op.symbol(),
        lhs: lhs.type_name().to_string(),
        rhs: rhs.type_name().to_string(),
    })
}

/// Equality between two host values
///
/// Handles of the same type defer to the type's `eq` handler, falling back
/// to cell identity; handles of different types are never equal.
pub fn equals(lhs: &Value, rhs: &Value) -> HostResult<bool> {
    match (lhs, rhs) {
        (Value::Handle(a), Value::Handle(b)) => {
            if a.tag() != b.tag() {
                return Ok(false);
            }
            match row_of(a)?.eq {
                Some(handler) => handler(lhs, rhs),
                None => Ok(a.same_cell(b)),
            }
        }
        _ => Ok(false),
    }
}

/// String form of a handle, via the type's `tostring` metamethod
pub fn display(handle: &Handle) -> HostResult<String> {
    let row = row_of(handle)?;
    match &row.tostring {
        Some(render) => {
            let payload = handle.read();
            Ok(render(&**payload))
        }
        None => Ok(format!("{:?}", handle)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{borrow, borrow_mut, is, register_once, wrap, Metamethods, TypeSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Each test uses its own local type: the registry is process-wide and
    // tests run in parallel.

    #[derive(Debug, PartialEq)]
    struct Counter {
        hits: i64,
    }

    fn counter_spec() -> TypeSpec<Counter> {
        let mut spec = TypeSpec::new("test.counter");
        spec.index = vec![("hits", |c: &Counter, _: &mut Scope| Ok(Value::Int(c.hits)))];
        spec.newindex = vec![("hits", |c: &mut Counter, value: Value| {
            c.hits = value.as_int().ok_or(HostError::BadArgument {
                index: 1,
                expected: "integer",
                actual: value.type_name().to_string(),
            })?;
            Ok(())
        })];
        spec.namecall = vec![("bump", |c: &Counter, scope: &mut Scope| {
            Ok(Value::Int(c.hits + scope.opt_int(1, 1)?))
        })];
        spec.meta = Metamethods {
            tostring: Some(|c: &Counter| format!("counter({})", c.hits)),
            ..Metamethods::default()
        };
        spec
    }

    #[test]
    fn test_registration_is_idempotent_first_caller_wins() {
        struct Probe;
        let first = register_once::<Probe>(|| {
            let mut spec = TypeSpec::new("test.probe");
            spec.index = vec![("a", |_: &Probe, _: &mut Scope| Ok(Value::Int(1)))];
            spec
        });
        let second = register_once::<Probe>(|| {
            let mut spec = TypeSpec::new("test.probe2");
            spec.index = vec![("b", |_: &Probe, _: &mut Scope| Ok(Value::Int(2)))];
            spec
        });
        assert_eq!(first, second);

        // The second caller's tables were discarded.
        let handle = wrap(Probe, || TypeSpec::new("test.probe"));
        assert_eq!(handle.type_name(), "test.probe");
        let mut scope = Scope::empty();
        assert!(index(&handle, "a", &mut scope).is_ok());
        let err = index(&handle, "b", &mut scope).unwrap_err();
        assert_eq!(
            err,
            HostError::UnknownAttribute {
                type_name: "test.probe".to_string(),
                key: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_wrap_borrow_roundtrip() {
        let handle = wrap(Counter { hits: 3 }, counter_spec);
        assert!(is::<Counter>(&handle));
        assert_eq!(borrow::<Counter>(&handle).unwrap().hits, 3);
    }

    #[test]
    fn test_borrow_wrong_type_names_both_types() {
        #[derive(Debug)]
        struct Other;
        register_once::<Other>(|| TypeSpec::new("test.other"));
        let handle = wrap(Counter { hits: 0 }, counter_spec);
        let err = borrow::<Other>(&handle).unwrap_err();
        assert_eq!(
            err,
            HostError::TypeMismatch {
                expected: "test.other".to_string(),
                actual: "test.counter".to_string(),
            }
        );
    }

    #[test]
    fn test_index_and_newindex_dispatch() {
        let handle = wrap(Counter { hits: 1 }, counter_spec);
        let mut scope = Scope::empty();
        assert_eq!(index(&handle, "hits", &mut scope).unwrap().as_int(), Some(1));

        newindex(&handle, "hits", Value::Int(9)).unwrap();
        assert_eq!(index(&handle, "hits", &mut scope).unwrap().as_int(), Some(9));

        let err = newindex(&handle, "misses", Value::Int(0)).unwrap_err();
        assert_eq!(
            err,
            HostError::UnknownAttribute {
                type_name: "test.counter".to_string(),
                key: "misses".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_attribute_is_not_nil() {
        let handle = wrap(Counter { hits: 1 }, counter_spec);
        let mut scope = Scope::empty();
        let result = index(&handle, "undefined", &mut scope);
        assert!(matches!(result, Err(HostError::UnknownAttribute { .. })));
    }

    #[test]
    fn test_namecall_dispatch_by_atom() {
        let handle = wrap(Counter { hits: 5 }, counter_spec);
        let mut scope = Scope::new(vec![Value::Int(2)]);
        assert_eq!(namecall(&handle, "bump", &mut scope).unwrap().as_int(), Some(7));

        let atom = intern("bump");
        let mut scope = Scope::empty();
        assert_eq!(
            namecall_atom(&handle, atom, &mut scope).unwrap().as_int(),
            Some(6)
        );

        let err = namecall(&handle, "reset", &mut Scope::empty()).unwrap_err();
        assert_eq!(
            err,
            HostError::UnknownMethod {
                type_name: "test.counter".to_string(),
                method: "reset".to_string(),
            }
        );
    }

    #[test]
    fn test_arith_without_handlers_is_type_mismatch() {
        let a = Value::Handle(wrap(Counter { hits: 1 }, counter_spec));
        let b = Value::Handle(wrap(Counter { hits: 2 }, counter_spec));
        let err = arith(ArithOp::Add, &a, &b).unwrap_err();
        assert_eq!(
            err,
            HostError::UnsupportedArithmetic {
                op: '+',
                lhs: "test.counter".to_string(),
                rhs: "test.counter".to_string(),
            }
        );
    }

    #[test]
    fn test_equals_defaults_to_identity() {
        let a = wrap(Counter { hits: 1 }, counter_spec);
        let b = a.clone();
        let c = wrap(Counter { hits: 1 }, counter_spec);
        assert!(equals(&Value::Handle(a.clone()), &Value::Handle(b)).unwrap());
        assert!(!equals(&Value::Handle(a), &Value::Handle(c)).unwrap());
    }

    #[test]
    fn test_display_uses_tostring_metamethod() {
        let handle = wrap(Counter { hits: 4 }, counter_spec);
        assert_eq!(display(&handle).unwrap(), "counter(4)");
    }

    #[test]
    fn test_finalizer_runs_exactly_once() {
        static RECLAIMED: AtomicUsize = AtomicUsize::new(0);

        struct Tracked;
        let handle = wrap(Tracked, || {
            let mut spec = TypeSpec::new("test.tracked");
            spec.finalizer = Some(|_: &mut Tracked| {
                RECLAIMED.fetch_add(1, Ordering::SeqCst);
            });
            spec
        });
        let clone = handle.clone();
        drop(handle);
        assert_eq!(RECLAIMED.load(Ordering::SeqCst), 0);
        drop(clone);
        assert_eq!(RECLAIMED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mutable_borrow() {
        let handle = wrap(Counter { hits: 0 }, counter_spec);
        borrow_mut::<Counter>(&handle).unwrap().hits = 11;
        assert_eq!(borrow::<Counter>(&handle).unwrap().hits, 11);
    }
}
