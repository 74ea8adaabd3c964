//! Tiger semantic analyzer.
//!
//! This crate type-checks a parsed Tiger program. It walks the AST with
//! two persistent environments (values and types), enforces the
//! subtype/join rules of the type lattice, resolves mutually recursive
//! type declarations, and reports every independent error it finds
//! without ever aborting.
//!
//! # Architecture
//!
//! - [`ty`]: the type lattice (subtype, join, named-type resolution slots)
//! - [`env`]: value and type environments over persistent tables
//! - [`builtins`]: the base environment (primitive types, standard procedures)
//! - [`resolve`]: two-pass resolution of type-declaration blocks
//! - [`check`]: the recursive checker over expressions and declarations
//! - [`error`]: the diagnostic taxonomy and sink
//! - [`diagnostics`]: ariadne rendering of diagnostics
//! - [`translate`]: placeholder for the downstream IR translation

pub mod builtins;
pub mod check;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod resolve;
pub mod translate;
pub mod ty;

use crate::check::Checker;
use crate::diagnostics::DiagnosticOptions;
use crate::error::TypeError;
use crate::translate::TransExp;
use crate::ty::Ty;

pub use crate::check::ExpTy;

/// The result of type checking a Tiger program.
///
/// The result type is always present: `Top` marks an ill-typed program
/// whose errors are in `errors`. The `translated` slot belongs to the
/// downstream lowering pass and holds its placeholder for now.
pub struct TypeckResult {
    /// Placeholder for the translated program.
    pub translated: TransExp,
    /// The type of the whole program expression.
    pub ty: Ty,
    /// Every diagnostic, in traversal order.
    pub errors: Vec<TypeError>,
}

impl TypeckResult {
    /// Whether checking found no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render all diagnostics as formatted strings.
    pub fn render_errors(
        &self,
        source: &str,
        filename: &str,
        options: &DiagnosticOptions,
    ) -> Vec<String> {
        self.errors
            .iter()
            .map(|err| diagnostics::render_diagnostic(err, source, filename, options))
            .collect()
    }
}

/// Type-check a program.
///
/// This is the main entry point: checks the root expression in the base
/// environment and returns its type along with the diagnostic log.
pub fn check(exp: &tiger_ast::Exp) -> TypeckResult {
    let mut checker = Checker::new();
    let ExpTy { exp: translated, ty } = checker.trans_prog(exp);
    TypeckResult {
        translated,
        ty,
        errors: checker.sink.into_errors(),
    }
}
