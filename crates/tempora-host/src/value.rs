//! Dynamic values and tagged opaque handles
//!
//! A `Handle` is the host-managed, reference-counted cell behind every
//! bridged native value. It carries a runtime type tag for checked
//! downcasts and an optional finalizer that runs exactly once, when the
//! last clone of the handle is dropped.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Runtime tag identifying which native type a handle's payload holds
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TypeTag(pub u32);

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type-erased payload stored inside a handle
pub type Payload = Box<dyn Any + Send + Sync>;

/// Finalizer invoked when the payload is reclaimed
pub type Finalizer = Arc<dyn Fn(&mut (dyn Any + Send + Sync)) + Send + Sync>;

struct UserdataCell {
    tag: TypeTag,
    type_name: &'static str,
    payload: RwLock<Payload>,
    finalizer: Option<Finalizer>,
}

impl Drop for UserdataCell {
    fn drop(&mut self) {
        if let Some(run) = self.finalizer.take() {
            run(self.payload.get_mut().as_mut());
        }
    }
}

/// Opaque, host-managed reference to a native value
///
/// Cloning a handle clones the reference, not the value. The payload is
/// reclaimed when the last clone drops; destruction is deterministic but
/// not necessarily prompt.
#[derive(Clone)]
pub struct Handle {
    cell: Arc<UserdataCell>,
}

impl Handle {
    /// Allocate a cell for `payload`, transferring ownership to the host
    pub fn new(
        tag: TypeTag,
        type_name: &'static str,
        payload: Payload,
        finalizer: Option<Finalizer>,
    ) -> Self {
        Handle {
            cell: Arc::new(UserdataCell {
                tag,
                type_name,
                payload: RwLock::new(payload),
                finalizer,
            }),
        }
    }

    #[inline]
    pub fn tag(&self) -> TypeTag {
        self.cell.tag
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.cell.type_name
    }

    /// Shared access to the payload for the duration of the current call
    ///
    /// Recursive reads are allowed: a binary operation may borrow the same
    /// handle on both sides.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, Payload> {
        self.cell.payload.read_recursive()
    }

    /// Exclusive access to the payload for the duration of the current call
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, Payload> {
        self.cell.payload.write()
    }

    /// Identity comparison: do both handles refer to the same cell?
    #[inline]
    pub fn same_cell(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:p}", self.cell.type_name, Arc::as_ptr(&self.cell))
    }
}

/// A dynamically-typed host value
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Number(f64),
    Str(String),
    Handle(Handle),
}

impl Value {
    /// Name of the value's type as seen by scripts
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Handle(h) => h.type_name(),
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Value::Handle(h) => Some(h),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<Handle> for Value {
    fn from(v: Handle) -> Self {
        Value::Handle(v)
    }
}
