//! Declaration nodes.
//!
//! Adjacent function declarations and adjacent type declarations are
//! grouped by the parser into a single `Dec`, because each group is a
//! unit of mutual recursion for the analyzer.

use tiger_common::{Pos, Symbol};

use crate::exp::Exp;

/// A declaration inside a `let`.
#[derive(Debug, Clone, PartialEq)]
pub enum Dec {
    /// A block of mutually recursive function declarations.
    Function(Vec<Fundec>),
    /// A single variable declaration `var name [: typ] := init`.
    Var {
        name: Symbol,
        escape: bool,
        typ: Option<(Symbol, Pos)>,
        init: Box<Exp>,
        pos: Pos,
    },
    /// A block of mutually recursive type declarations.
    Type(Vec<Typedec>),
}

/// One function declaration within a `Dec::Function` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Fundec {
    pub name: Symbol,
    pub params: Vec<Field>,
    /// Declared result type; `None` means the function is a procedure.
    pub result: Option<(Symbol, Pos)>,
    pub body: Exp,
    pub pos: Pos,
}

/// One type declaration within a `Dec::Type` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Typedec {
    pub name: Symbol,
    pub ty: Ty,
    pub pos: Pos,
}

/// The right-hand side of a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    /// An alias to another named type.
    Name(Symbol, Pos),
    /// A record type `{ f1: T1, ... }`.
    Record(Vec<Field>),
    /// An array type `array of T`.
    Array(Symbol, Pos),
}

/// A name/type pair: a record field or a function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Symbol,
    pub escape: bool,
    pub typ: Symbol,
    pub pos: Pos,
}
