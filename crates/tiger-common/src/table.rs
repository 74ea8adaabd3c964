//! Persistent symbol-keyed map.
//!
//! The analyzer's environments are lexically scoped: entering a
//! declaration extends the environment, leaving a scope drops the
//! extension, and the parent is never mutated. [`Table`] implements
//! that discipline directly as an immutable chain of bindings. `insert`
//! returns a new table whose tail is shared with the old one, `Clone`
//! is a reference-count bump, and `lookup` walks the chain newest-first
//! so inner bindings shadow outer ones.

use std::rc::Rc;

use crate::symbol::Symbol;

/// A persistent map from [`Symbol`] to `V`.
pub struct Table<V> {
    node: Option<Rc<Node<V>>>,
}

struct Node<V> {
    sym: Symbol,
    value: V,
    rest: Option<Rc<Node<V>>>,
}

impl<V> Table<V> {
    /// The empty table.
    pub fn empty() -> Self {
        Table { node: None }
    }

    /// Return a table extended with `sym -> value`.
    ///
    /// The receiver is unchanged; the new binding shadows any existing
    /// binding for `sym`.
    pub fn insert(&self, sym: Symbol, value: V) -> Table<V> {
        Table {
            node: Some(Rc::new(Node {
                sym,
                value,
                rest: self.node.clone(),
            })),
        }
    }

    /// Look up the innermost binding for `sym`.
    pub fn lookup(&self, sym: Symbol) -> Option<&V> {
        let mut cur = self.node.as_deref();
        while let Some(node) = cur {
            if node.sym == sym {
                return Some(&node.value);
            }
            cur = node.rest.as_deref();
        }
        None
    }

    /// Whether the table holds no bindings at all.
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }
}

impl<V> Clone for Table<V> {
    fn clone(&self) -> Self {
        Table {
            node: self.node.clone(),
        }
    }
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::empty()
    }
}
