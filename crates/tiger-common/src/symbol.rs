//! Interned identifiers.
//!
//! Every name in a Tiger program (variables, functions, types, record
//! fields) is interned once and handled as a [`Symbol`] afterwards.
//! Symbols are `Copy`, compare in O(1), and order by interning index,
//! which makes them cheap map keys for the analyzer's environments.

use std::fmt;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// An interned name, identified by its index in the global interner.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Symbol(u32);

static INTERNER: Lazy<Mutex<Interner>> = Lazy::new(|| Mutex::new(Interner::default()));

#[derive(Default)]
struct Interner {
    names: Vec<String>,
    table: FxHashMap<String, u32>,
}

impl Interner {
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&idx) = self.table.get(name) {
            return idx;
        }
        let idx = self.names.len() as u32;
        self.names.push(name.to_string());
        self.table.insert(name.to_string(), idx);
        idx
    }

    fn name(&self, idx: u32) -> String {
        self.names[idx as usize].clone()
    }
}

impl Symbol {
    /// Intern a string, returning the same `Symbol` for equal strings.
    pub fn intern(name: &str) -> Symbol {
        let mut interner = INTERNER.lock().expect("symbol interner poisoned");
        Symbol(interner.intern(name))
    }

    /// The string this symbol was interned from.
    pub fn name(self) -> String {
        let interner = INTERNER.lock().expect("symbol interner poisoned");
        interner.name(self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_intern_to_the_same_symbol() {
        assert_eq!(Symbol::intern("foo"), Symbol::intern("foo"));
    }

    #[test]
    fn distinct_strings_intern_to_distinct_symbols() {
        assert_ne!(Symbol::intern("foo"), Symbol::intern("bar"));
    }

    #[test]
    fn name_round_trips() {
        let sym = Symbol::intern("substring");
        assert_eq!(sym.name(), "substring");
        assert_eq!(sym.to_string(), "substring");
    }
}
