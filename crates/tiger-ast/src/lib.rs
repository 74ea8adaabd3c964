//! Abstract syntax tree for the Tiger language.
//!
//! This is the contract between the parser and everything downstream:
//! plain owned data, one enum per syntactic category, every node
//! carrying the byte-offset [`Pos`](tiger_common::Pos) where it starts.
//! The tree is fully explicit -- all parameter and result types are
//! written in the source, so no node carries inferred information.

pub mod dec;
pub mod exp;

pub use dec::{Dec, Field, Fundec, Ty, Typedec};
pub use exp::{Exp, Oper, Var};
