//! Resolution of mutually recursive type declarations.
//!
//! A `type` block introduces all of its names at once, so any member may
//! refer to any other, including itself through a record or array.
//! Resolution runs in two passes:
//!
//! 1. **Introduce**: bind every declared name to a preliminary type. A
//!    reference to a name with no concrete binding yet becomes a fresh
//!    unresolved [`Ty::Name`] cell.
//! 2. **Resolve**: walk each fresh cell's chain of references until it
//!    reaches a concrete type, filling every cell on the way. A chain
//!    that returns to itself without passing through a record or array
//!    is a cyclic alias group: every cell on the path becomes `Top` and
//!    one diagnostic names the members.
//!
//! Afterwards no cell introduced by the block is unresolved, and a
//! filled cell always holds a concrete type, never another name.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use tiger_ast as ast;
use tiger_common::{Pos, Symbol, Table};

use crate::error::{ErrorSink, TypeErrorKind};
use crate::ty::{NameTy, Ty};

/// A fresh cell created in pass 1, with the position that referenced it.
struct Pending {
    cell: Rc<NameTy>,
    pos: Pos,
}

/// Resolve one block of type declarations against `tenv`, returning the
/// extended type environment.
pub fn resolve_typedecs(
    sink: &mut ErrorSink,
    tenv: &Table<Ty>,
    decs: &[ast::Typedec],
) -> Table<Ty> {
    let mut tenv = tenv.clone();
    let mut introduced: FxHashSet<Symbol> = FxHashSet::default();
    let mut pending: Vec<Pending> = Vec::new();

    // ── Pass 1: introduce preliminary types ─────────────────────────
    for dec in decs {
        if !introduced.insert(dec.name) {
            sink.log(dec.pos, TypeErrorKind::TypeRedefined { name: dec.name });
            continue;
        }
        let prelim = match &dec.ty {
            ast::Ty::Name(sym, pos) => reference(&tenv, *sym, *pos, &mut pending),
            ast::Ty::Record(fields) => Ty::record(
                fields
                    .iter()
                    .map(|field| {
                        (
                            field.name,
                            reference(&tenv, field.typ, field.pos, &mut pending),
                        )
                    })
                    .collect(),
            ),
            ast::Ty::Array(sym, pos) => Ty::array(reference(&tenv, *sym, *pos, &mut pending)),
        };
        tenv = tenv.insert(dec.name, prelim);
    }

    // ── Pass 2: resolve and cycle-check every fresh cell ────────────
    for p in &pending {
        walk(sink, &tenv, &p.cell, p.pos);
    }

    tenv
}

/// The preliminary type for a reference to `sym`.
///
/// A binding that is concrete (or a resolved name) is used directly. An
/// unbound name -- or one still pending in this block -- gets its own
/// fresh cell; sharing the pending cell would fuse distinct links of an
/// alias chain and lose track of which declarations participate in a
/// cycle.
fn reference(tenv: &Table<Ty>, sym: Symbol, pos: Pos, pending: &mut Vec<Pending>) -> Ty {
    match tenv.lookup(sym) {
        Some(ty) if !is_unresolved_name(ty) => ty.clone(),
        _ => {
            let cell = Rc::new(NameTy::new(sym));
            pending.push(Pending {
                cell: cell.clone(),
                pos,
            });
            Ty::Name(cell)
        }
    }
}

fn is_unresolved_name(ty: &Ty) -> bool {
    matches!(ty, Ty::Name(name) if name.resolved().is_none())
}

/// Follow `start`'s chain of names to a concrete type, filling every
/// cell passed on the way. Detects pure-alias cycles via the path.
fn walk(sink: &mut ErrorSink, tenv: &Table<Ty>, start: &Rc<NameTy>, pos: Pos) {
    let mut path: Vec<Rc<NameTy>> = Vec::new();
    let mut cur = Ty::Name(start.clone());
    loop {
        match cur {
            Ty::Name(name) if name.resolved().is_none() => {
                if path.iter().any(|seen| Rc::ptr_eq(seen, &name)) {
                    sink.log(
                        pos,
                        TypeErrorKind::CyclicTypeDec {
                            names: path.iter().map(|n| n.sym()).collect(),
                        },
                    );
                    fill(&path, Ty::Top);
                    return;
                }
                match tenv.lookup(name.sym()) {
                    Some(next) => {
                        let next = next.clone();
                        path.push(name);
                        cur = next;
                    }
                    None => {
                        sink.log(pos, TypeErrorKind::UnresolvedType { name: name.sym() });
                        path.push(name);
                        fill(&path, Ty::Top);
                        return;
                    }
                }
            }
            // A resolved name's slot is already concrete; land on that.
            Ty::Name(name) => {
                let concrete = name
                    .resolved()
                    .cloned()
                    .unwrap_or(Ty::Top);
                fill(&path, concrete);
                return;
            }
            concrete => {
                fill(&path, concrete);
                return;
            }
        }
    }
}

fn fill(path: &[Rc<NameTy>], ty: Ty) {
    for cell in path {
        cell.resolve(ty.clone());
    }
}
