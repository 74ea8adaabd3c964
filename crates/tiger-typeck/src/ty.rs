//! Type representation for the Tiger type system.
//!
//! Defines the core [`Ty`] enum and the subtype/join lattice the checker
//! works in. Records and arrays are nominal: two record types are the
//! same type only when they originate from the same declaration, which
//! is represented here as sharing the same allocation (`Rc::ptr_eq`).
//! Named types carry a one-shot resolution slot so that a group of
//! mutually recursive declarations can be stitched together after all
//! of them have been introduced.

use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tiger_common::Symbol;

/// A Tiger type.
///
/// `Top` and `Bottom` are not source-level types: `Top` marks an
/// already-reported error and silently absorbs further checks, `Bottom`
/// is the type of `break` and of the unconstrained equality operand.
#[derive(Clone, Debug)]
pub enum Ty {
    /// The integer type.
    Int,
    /// The string type.
    String,
    /// The no-value type, produced by statements-as-expressions.
    Unit,
    /// The type of the `nil` literal, a subtype of every record.
    Nil,
    /// A record type with its declaration identity.
    Record(Rc<RecordTy>),
    /// An array type with its declaration identity.
    Array(Rc<ArrayTy>),
    /// A named type whose definition may not be known yet.
    Name(Rc<NameTy>),
    /// The universal type: an error that has already been reported.
    Top,
    /// The empty type: subtype of everything.
    Bottom,
}

/// The structural part of a record type: ordered fields.
#[derive(Debug)]
pub struct RecordTy {
    pub fields: Vec<(Symbol, Ty)>,
}

/// The structural part of an array type: its element type.
#[derive(Debug)]
pub struct ArrayTy {
    pub elem: Ty,
}

/// A named type: a symbol plus a one-shot resolution slot.
///
/// The slot starts empty and is written exactly once, by the
/// type-declaration resolver. A filled slot never holds another
/// `Ty::Name`; one hop always reaches a concrete type (or `Top` for a
/// cyclic or unbound name).
pub struct NameTy {
    sym: Symbol,
    slot: OnceCell<Ty>,
}

impl NameTy {
    pub(crate) fn new(sym: Symbol) -> Self {
        NameTy {
            sym,
            slot: OnceCell::new(),
        }
    }

    /// The symbol this named type refers to.
    pub fn sym(&self) -> Symbol {
        self.sym
    }

    /// The resolved type, if the resolver has run.
    pub fn resolved(&self) -> Option<&Ty> {
        self.slot.get()
    }

    /// Fill the slot. Only the resolver calls this, at most once per cell.
    pub(crate) fn resolve(&self, ty: Ty) {
        self.slot
            .set(ty)
            .unwrap_or_else(|_| panic!("named type `{}` resolved twice", self.sym));
    }
}

// The derived Debug would chase the slot and loop on recursive types.
impl fmt::Debug for NameTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameTy")
            .field("sym", &self.sym)
            .field("resolved", &self.slot.get().is_some())
            .finish()
    }
}

impl Ty {
    /// Create a fresh record type with its own identity.
    pub fn record(fields: Vec<(Symbol, Ty)>) -> Ty {
        Ty::Record(Rc::new(RecordTy { fields }))
    }

    /// Create a fresh array type with its own identity.
    pub fn array(elem: Ty) -> Ty {
        Ty::Array(Rc::new(ArrayTy { elem }))
    }

    /// Create a fresh unresolved named type.
    pub fn name(sym: Symbol) -> Ty {
        Ty::Name(Rc::new(NameTy::new(sym)))
    }

    /// Follow name indirections to the underlying concrete type.
    ///
    /// An unresolved name collapses to `Top`: the resolver has already
    /// reported whatever went wrong with it.
    pub fn actual(&self) -> Ty {
        let mut ty = self.clone();
        loop {
            match ty {
                Ty::Name(name) => match name.resolved() {
                    Some(next) => ty = next.clone(),
                    None => return Ty::Top,
                },
                other => return other,
            }
        }
    }

    /// Whether this type is not the error type.
    pub fn is_well_typed(&self) -> bool {
        !matches!(self.actual(), Ty::Top)
    }
}

/// Strict identity: the two types are the very same type.
///
/// Unlike [`subtype`], `nil` is only the same as `nil`. Used where the
/// checker needs to single out `nil` itself, e.g. rejecting
/// `var x := nil` with no annotation.
pub fn same(a: &Ty, b: &Ty) -> bool {
    match (a.actual(), b.actual()) {
        (Ty::Int, Ty::Int)
        | (Ty::String, Ty::String)
        | (Ty::Unit, Ty::Unit)
        | (Ty::Nil, Ty::Nil)
        | (Ty::Top, Ty::Top)
        | (Ty::Bottom, Ty::Bottom) => true,
        (Ty::Record(r1), Ty::Record(r2)) => Rc::ptr_eq(&r1, &r2),
        (Ty::Array(a1), Ty::Array(a2)) => Rc::ptr_eq(&a1, &a2),
        _ => false,
    }
}

/// The subtype relation `a <= b`.
///
/// Reflexive, with three extra rules: `Bottom <= t`, `t <= Top`, and
/// `Nil <= r` for every record `r`. Records and arrays are otherwise
/// compared by identity only.
pub fn subtype(a: &Ty, b: &Ty) -> bool {
    let (a, b) = (a.actual(), b.actual());
    match (&a, &b) {
        (Ty::Bottom, _) | (_, Ty::Top) => true,
        (Ty::Nil, Ty::Record(_)) => true,
        _ => same(&a, &b),
    }
}

/// The least upper bound of `a` and `b`, `Top` when they are unrelated.
pub fn join(a: &Ty, b: &Ty) -> Ty {
    if subtype(a, b) {
        b.actual()
    } else if subtype(b, a) {
        a.actual()
    } else {
        Ty::Top
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::String => write!(f, "string"),
            Ty::Unit => write!(f, "unit"),
            Ty::Nil => write!(f, "nil"),
            Ty::Record(record) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in record.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, ty)?;
                }
                write!(f, "}}")
            }
            Ty::Array(array) => write!(f, "array of {}", array.elem),
            // A name prints as its symbol without following the slot;
            // recursive types would otherwise never stop printing.
            Ty::Name(name) => write!(f, "{}", name.sym()),
            Ty::Top => write!(f, "<error>"),
            Ty::Bottom => write!(f, "<any>"),
        }
    }
}
