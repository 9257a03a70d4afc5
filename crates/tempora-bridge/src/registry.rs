//! Process-wide native type registry
//!
//! Each native type is registered at most once, on the first construction
//! call that needs it. Registration assigns the type a runtime tag, erases
//! its dispatch tables, interns its method names into atoms and records its
//! finalizer. A duplicate registration returns the existing tag and
//! discards the new tables: first caller wins.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use tracing::{debug, trace};

use tempora_host::{intern, Atom, Finalizer, Handle, HostError, HostResult, Scope, TypeTag, Value};

/// Attribute-read callback for a type `T`
pub type AttrFn<T> = fn(&T, &mut Scope) -> HostResult<Value>;

/// Attribute-write callback for a type `T`
pub type SetFn<T> = fn(&mut T, Value) -> HostResult<()>;

/// Method callback for a type `T`; the receiver is passed separately from
/// the argument scope
pub type MethodFn<T> = fn(&T, &mut Scope) -> HostResult<Value>;

/// Operator handler; untyped because the handler itself inspects the tags
/// of both operands to resolve the closed set of legal combinations
pub type ArithFn = fn(&Value, &Value) -> HostResult<Value>;

/// Equality handler, same shape as `ArithFn`
pub type EqFn = fn(&Value, &Value) -> HostResult<bool>;

/// Metamethods of a bridged type
pub struct Metamethods<T> {
    pub add: Option<ArithFn>,
    pub sub: Option<ArithFn>,
    pub eq: Option<EqFn>,
    pub tostring: Option<fn(&T) -> String>,
}

impl<T> Default for Metamethods<T> {
    fn default() -> Self {
        Metamethods {
            add: None,
            sub: None,
            eq: None,
            tostring: None,
        }
    }
}

/// Dispatch tables a type hands to the bridge on registration
pub struct TypeSpec<T> {
    pub name: &'static str,
    pub index: Vec<(&'static str, AttrFn<T>)>,
    pub newindex: Vec<(&'static str, SetFn<T>)>,
    pub namecall: Vec<(&'static str, MethodFn<T>)>,
    pub meta: Metamethods<T>,
    pub finalizer: Option<fn(&mut T)>,
}

impl<T> TypeSpec<T> {
    pub fn new(name: &'static str) -> Self {
        TypeSpec {
            name,
            index: Vec::new(),
            newindex: Vec::new(),
            namecall: Vec::new(),
            meta: Metamethods::default(),
            finalizer: None,
        }
    }
}

type Erased = dyn Any + Send + Sync;
type DynAttr = Box<dyn Fn(&Erased, &mut Scope) -> HostResult<Value> + Send + Sync>;
type DynSet = Box<dyn Fn(&mut Erased, Value) -> HostResult<()> + Send + Sync>;
type DynToString = Box<dyn Fn(&Erased) -> String + Send + Sync>;

pub(crate) struct TypeRow {
    pub(crate) tag: TypeTag,
    pub(crate) name: &'static str,
    pub(crate) index: HashMap<&'static str, DynAttr>,
    pub(crate) newindex: HashMap<&'static str, DynSet>,
    pub(crate) namecall: HashMap<Atom, DynAttr>,
    pub(crate) add: Option<ArithFn>,
    pub(crate) sub: Option<ArithFn>,
    pub(crate) eq: Option<EqFn>,
    pub(crate) tostring: Option<DynToString>,
    pub(crate) finalizer: Option<Finalizer>,
}

#[derive(Default)]
struct Registry {
    by_type: HashMap<TypeId, TypeTag>,
    rows: Vec<Arc<TypeRow>>,
}

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Registry::default()))
}

fn erase_attr<T: Any>(name: &'static str, f: AttrFn<T>) -> DynAttr {
    Box::new(move |payload, scope| {
        let value = payload
            .downcast_ref::<T>()
            .unwrap_or_else(|| panic!("payload behind tag is not {name}"));
        f(value, scope)
    })
}

fn erase_set<T: Any>(name: &'static str, f: SetFn<T>) -> DynSet {
    Box::new(move |payload, value| {
        let target = payload
            .downcast_mut::<T>()
            .unwrap_or_else(|| panic!("payload behind tag is not {name}"));
        f(target, value)
    })
}

fn build_row<T: Any + Send + Sync>(tag: TypeTag, spec: TypeSpec<T>) -> TypeRow {
    let name = spec.name;
    let index = spec
        .index
        .into_iter()
        .map(|(key, f)| (key, erase_attr(name, f)))
        .collect();
    let newindex = spec
        .newindex
        .into_iter()
        .map(|(key, f)| (key, erase_set(name, f)))
        .collect();
    // Method names are interned once, at registration time.
    let namecall = spec
        .namecall
        .into_iter()
        .map(|(key, f)| (intern(key), erase_attr(name, f)))
        .collect();
    let tostring: Option<DynToString> = spec.meta.tostring.map(|f| {
        let render: DynToString = Box::new(move |payload: &Erased| {
            let value = payload
                .downcast_ref::<T>()
                .unwrap_or_else(|| panic!("payload behind tag is not {name}"));
            f(value)
        });
        render
    });
    let finalizer: Option<Finalizer> = spec.finalizer.map(|f| {
        let run: Finalizer = Arc::new(move |payload: &mut Erased| {
            if let Some(value) = payload.downcast_mut::<T>() {
                f(value);
            }
        });
        run
    });
    TypeRow {
        tag,
        name,
        index,
        newindex,
        namecall,
        add: spec.meta.add,
        sub: spec.meta.sub,
        eq: spec.meta.eq,
        tostring,
        finalizer,
    }
}

/// Register `T`'s dispatch tables if they are not registered yet
///
/// Idempotent and process-lifetime: the builder closure runs at most once,
/// and a duplicate call returns the tag assigned by the first caller. Safe
/// to call from every construction site; registration cannot fail.
pub fn register_once<T: Any + Send + Sync>(build: impl FnOnce() -> TypeSpec<T>) -> TypeTag {
    let key = TypeId::of::<T>();
    if let Some(&tag) = registry().read().by_type.get(&key) {
        return tag;
    }
    // Build outside the lock: the spec builder may register other types.
    let spec = build();
    let name = spec.name;
    let mut guard = registry().write();
    if let Some(&tag) = guard.by_type.get(&key) {
        trace!(type_name = name, "duplicate registration ignored");
        return tag;
    }
    let tag = TypeTag(guard.rows.len() as u32);
    guard.rows.push(Arc::new(build_row(tag, spec)));
    guard.by_type.insert(key, tag);
    debug!(type_name = name, tag = tag.0, "registered native type");
    tag
}

/// Tag previously assigned to `T`, if any
pub fn tag_of<T: Any>() -> Option<TypeTag> {
    registry().read().by_type.get(&TypeId::of::<T>()).copied()
}

pub(crate) fn row_by_tag(tag: TypeTag) -> Option<Arc<TypeRow>> {
    registry().read().rows.get(tag.0 as usize).cloned()
}

/// Does `handle` hold a value of type `T`?
pub fn is<T: Any>(handle: &Handle) -> bool {
    tag_of::<T>() == Some(handle.tag())
}

/// Move `value` into a host-managed cell, registering `T` first if needed
///
/// Ownership transfers to the host; the value is reclaimed (and its
/// finalizer runs) when the last clone of the returned handle drops.
pub fn wrap<T: Any + Send + Sync>(value: T, build: impl FnOnce() -> TypeSpec<T>) -> Handle {
    let tag = register_once(build);
    let row = row_by_tag(tag).expect("tag was just registered");
    Handle::new(tag, row.name, Box::new(value), row.finalizer.clone())
}

fn mismatch<T: Any>(handle: &Handle) -> HostError {
    let expected = tag_of::<T>()
        .and_then(row_by_tag)
        .map(|row| row.name.to_string())
        .unwrap_or_else(|| std::any::type_name::<T>().to_string());
    HostError::TypeMismatch {
        expected,
        actual: handle.type_name().to_string(),
    }
}

/// Tag-checked shared borrow of the value behind `handle`
///
/// The reference is valid only for the duration of the current call. A tag
/// mismatch aborts the call with a type error naming the expected type.
pub fn borrow<T: Any + Send + Sync>(
    handle: &Handle,
) -> HostResult<MappedRwLockReadGuard<'_, T>> {
    if !is::<T>(handle) {
        return Err(mismatch::<T>(handle));
    }
    Ok(RwLockReadGuard::map(handle.read(), |payload| {
        payload
            .downcast_ref::<T>()
            .unwrap_or_else(|| panic!("payload does not match its tag"))
    }))
}

/// Tag-checked exclusive borrow of the value behind `handle`
pub fn borrow_mut<T: Any + Send + Sync>(
    handle: &Handle,
) -> HostResult<MappedRwLockWriteGuard<'_, T>> {
    if !is::<T>(handle) {
        return Err(mismatch::<T>(handle));
    }
    Ok(RwLockWriteGuard::map(handle.write(), |payload| {
        payload
            .downcast_mut::<T>()
            .unwrap_or_else(|| panic!("payload does not match its tag"))
    }))
}
