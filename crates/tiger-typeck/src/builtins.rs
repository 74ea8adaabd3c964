//! The base environment.
//!
//! Preloads the primitive types and the standard procedures every Tiger
//! program can call without declaring. These form the starting
//! vocabulary of the checker; user declarations only ever extend them.

use tiger_common::{Symbol, Table};

use crate::env::Entry;
use crate::ty::Ty;

fn fun(formals: Vec<Ty>, result: Ty) -> Entry {
    Entry::Fun { formals, result }
}

/// The base type environment: `int` and `string`.
pub fn base_tenv() -> Table<Ty> {
    Table::empty()
        .insert(Symbol::intern("int"), Ty::Int)
        .insert(Symbol::intern("string"), Ty::String)
}

/// The base value environment: the standard procedures.
pub fn base_venv() -> Table<Entry> {
    let venv = Table::empty();

    // ── I/O ─────────────────────────────────────────────────────────
    let venv = venv.insert(Symbol::intern("print"), fun(vec![Ty::String], Ty::Unit));
    let venv = venv.insert(Symbol::intern("flush"), fun(vec![], Ty::Unit));
    let venv = venv.insert(Symbol::intern("getchar"), fun(vec![], Ty::String));

    // ── Characters and strings ──────────────────────────────────────
    let venv = venv.insert(Symbol::intern("ord"), fun(vec![Ty::String], Ty::Int));
    let venv = venv.insert(Symbol::intern("chr"), fun(vec![Ty::Int], Ty::String));
    let venv = venv.insert(Symbol::intern("size"), fun(vec![Ty::String], Ty::Int));
    let venv = venv.insert(
        Symbol::intern("substring"),
        fun(vec![Ty::String, Ty::Int, Ty::Int], Ty::String),
    );
    let venv = venv.insert(
        Symbol::intern("concat"),
        fun(vec![Ty::String, Ty::String], Ty::String),
    );

    // ── Arithmetic and control ──────────────────────────────────────
    let venv = venv.insert(Symbol::intern("not"), fun(vec![Ty::Int], Ty::Int));
    venv.insert(Symbol::intern("exit"), fun(vec![Ty::Int], Ty::Unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_procedures_are_present() {
        let venv = base_venv();
        for name in [
            "print",
            "flush",
            "getchar",
            "ord",
            "chr",
            "size",
            "substring",
            "concat",
            "not",
            "exit",
        ] {
            assert!(
                venv.lookup(Symbol::intern(name)).is_some(),
                "builtin `{}` should be bound",
                name
            );
        }
    }

    #[test]
    fn substring_signature() {
        let venv = base_venv();
        match venv.lookup(Symbol::intern("substring")) {
            Some(Entry::Fun { formals, result }) => {
                assert_eq!(formals.len(), 3);
                assert!(matches!(result, Ty::String));
            }
            other => panic!("expected a function entry, got {:?}", other),
        }
    }
}
