//! Placeholder for the IR translation collaborator.
//!
//! The checker's results are shaped for a later lowering pass: every
//! [`ExpTy`](crate::check::ExpTy) carries a translated-expression slot
//! alongside the type. Until that pass exists, the slot holds this
//! opaque zero-sized placeholder.

/// An opaque translated expression. Carries no information yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransExp;

impl TransExp {
    /// The placeholder value the checker emits for every result.
    pub fn placeholder() -> TransExp {
        TransExp
    }
}
