//! Interned method-name atoms
//!
//! The host interns every distinct method name it has ever seen into a
//! small integer token, so method dispatch is an O(1) average map lookup
//! instead of a string comparison per call. Interning is process-wide and
//! a name's atom never changes once assigned.

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

/// Token for an interned method name
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Atom(u32);

impl Atom {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Default)]
struct Interner {
    map: HashMap<String, Atom>,
    names: Vec<String>,
}

fn interner() -> &'static RwLock<Interner> {
    static INTERNER: OnceLock<RwLock<Interner>> = OnceLock::new();
    INTERNER.get_or_init(|| RwLock::new(Interner::default()))
}

/// Intern `name`, returning its stable atom
pub fn intern(name: &str) -> Atom {
    if let Some(&atom) = interner().read().map.get(name) {
        return atom;
    }
    let mut guard = interner().write();
    if let Some(&atom) = guard.map.get(name) {
        return atom;
    }
    let atom = Atom(guard.names.len() as u32);
    guard.names.push(name.to_string());
    guard.map.insert(name.to_string(), atom);
    atom
}

/// Resolve an atom back to its name, for diagnostics
pub fn name_of(atom: Atom) -> String {
    interner()
        .read()
        .names
        .get(atom.0 as usize)
        .cloned()
        .unwrap_or_else(|| format!("<atom {}>", atom.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let a = intern("format");
        let b = intern("format");
        assert_eq!(a, b);
        assert_eq!(name_of(a), "format");
    }

    #[test]
    fn test_distinct_names_distinct_atoms() {
        let a = intern("change_zone");
        let b = intern("type");
        assert_ne!(a, b);
    }
}
