//! Value and type environments.
//!
//! The checker threads two persistent tables through its recursion: the
//! value environment (variables and functions) and the type environment
//! (named types). Extending either one returns a new [`Env`]; the
//! caller's view is never touched, so leaving a scope is just dropping
//! the extension.

use tiger_common::{Symbol, Table};

use crate::builtins;
use crate::ty::Ty;

/// What a name in the value environment stands for.
#[derive(Clone, Debug)]
pub enum Entry {
    /// A variable of the given type.
    Var { ty: Ty },
    /// A function with its formal parameter types and result type.
    Fun { formals: Vec<Ty>, result: Ty },
}

/// The pair of environments the checker carries.
#[derive(Clone)]
pub struct Env {
    /// Value environment: variables and functions.
    pub venv: Table<Entry>,
    /// Type environment: named types.
    pub tenv: Table<Ty>,
}

impl Env {
    /// The base environment: primitive types and built-in procedures.
    pub fn base() -> Env {
        Env {
            venv: builtins::base_venv(),
            tenv: builtins::base_tenv(),
        }
    }

    /// An environment with no bindings at all. Tests only need this.
    pub fn empty() -> Env {
        Env {
            venv: Table::empty(),
            tenv: Table::empty(),
        }
    }

    /// Extend the value environment with a variable.
    pub fn with_var(&self, name: Symbol, ty: Ty) -> Env {
        Env {
            venv: self.venv.insert(name, Entry::Var { ty }),
            tenv: self.tenv.clone(),
        }
    }

    /// Extend the value environment with a function header.
    pub fn with_fun(&self, name: Symbol, formals: Vec<Ty>, result: Ty) -> Env {
        Env {
            venv: self.venv.insert(name, Entry::Fun { formals, result }),
            tenv: self.tenv.clone(),
        }
    }

    /// Extend the type environment with a named type.
    pub fn with_type(&self, name: Symbol, ty: Ty) -> Env {
        Env {
            venv: self.venv.clone(),
            tenv: self.tenv.insert(name, ty),
        }
    }

    /// Replace the type environment wholesale (after resolving a
    /// declaration block).
    pub fn with_tenv(&self, tenv: Table<Ty>) -> Env {
        Env {
            venv: self.venv.clone(),
            tenv,
        }
    }
}
