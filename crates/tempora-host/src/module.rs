//! Read-only module tables
//!
//! A module is built once through `ModuleBuilder`, sealed, and exposed to
//! scripts as a read-only table of native functions and constants. The
//! sealed table offers no mutators; a script-side write attempt maps to
//! `Module::set`, which always fails with `HostError::ReadOnly`.

use std::collections::HashMap;

use tracing::debug;

use crate::{HostError, HostResult, Scope, Value};

/// Native function callable from the host
pub type NativeFn = fn(&mut Scope) -> HostResult<Value>;

/// One member of a module table
#[derive(Clone, Debug)]
pub enum Entry {
    Function(NativeFn),
    Constant(Value),
}

/// Accumulates module members before sealing
pub struct ModuleBuilder {
    name: &'static str,
    entries: HashMap<&'static str, Entry>,
}

impl ModuleBuilder {
    pub fn new(name: &'static str) -> Self {
        ModuleBuilder {
            name,
            entries: HashMap::new(),
        }
    }

    pub fn function(mut self, name: &'static str, f: NativeFn) -> Self {
        self.entries.insert(name, Entry::Function(f));
        self
    }

    pub fn constant(mut self, name: &'static str, value: Value) -> Self {
        self.entries.insert(name, Entry::Constant(value));
        self
    }

    /// Freeze the table; no member can be added or replaced afterwards
    pub fn seal(self) -> Module {
        debug!(module = self.name, members = self.entries.len(), "sealed module table");
        Module {
            name: self.name,
            entries: self.entries,
        }
    }
}

/// A sealed, read-only module table
pub struct Module {
    name: &'static str,
    entries: HashMap<&'static str, Entry>,
}

impl Module {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Read a member, failing with an unknown-member error on a miss
    pub fn read(&self, name: &str) -> HostResult<&Entry> {
        self.entries
            .get(name)
            .ok_or_else(|| HostError::UnknownModuleMember {
                module: self.name.to_string(),
                name: name.to_string(),
            })
    }

    /// Invoke the named function member with `args`
    pub fn call(&self, name: &str, args: Vec<Value>) -> HostResult<Value> {
        match self.read(name)? {
            Entry::Function(f) => f(&mut Scope::new(args)),
            Entry::Constant(v) => Err(HostError::BadArgument {
                index: 0,
                expected: "function",
                actual: v.type_name().to_string(),
            }),
        }
    }

    /// Script-side write attempt; the table is read-only by construction
    pub fn set(&self, _name: &str, _value: Value) -> HostResult<()> {
        Err(HostError::ReadOnly)
    }

    pub fn member_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(_scope: &mut Scope) -> HostResult<Value> {
        Ok(Value::Int(42))
    }

    #[test]
    fn test_call_function_member() {
        let module = ModuleBuilder::new("demo").function("answer", answer).seal();
        let result = module.call("answer", vec![]).unwrap();
        assert_eq!(result.as_int(), Some(42));
    }

    #[test]
    fn test_unknown_member_names_key() {
        let module = ModuleBuilder::new("demo").seal();
        let err = module.read("missing").unwrap_err();
        assert_eq!(
            err,
            HostError::UnknownModuleMember {
                module: "demo".to_string(),
                name: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_sealed_table_rejects_writes() {
        let module = ModuleBuilder::new("demo").seal();
        assert_eq!(module.set("x", Value::Int(1)).unwrap_err(), HostError::ReadOnly);
    }

    #[test]
    fn test_constant_member() {
        let module = ModuleBuilder::new("demo")
            .constant("version", Value::Str("0.1.0".into()))
            .seal();
        match module.read("version").unwrap() {
            Entry::Constant(v) => assert_eq!(v.as_str(), Some("0.1.0")),
            Entry::Function(_) => panic!("expected constant"),
        }
    }
}
