//! Shared AST builders for the integration tests.
//!
//! Parsing is upstream of this crate, so tests construct the AST
//! directly. Positions default to zero; tests that care about a
//! position build the node by hand.

#![allow(dead_code)]

use tiger_ast::{Dec, Exp, Field, Fundec, Oper, Ty as AstTy, Typedec, Var};
use tiger_common::{Pos, Symbol};
use tiger_typeck::error::TypeError;
use tiger_typeck::TypeckResult;

pub fn sym(s: &str) -> Symbol {
    Symbol::intern(s)
}

// ── Expressions ────────────────────────────────────────────────────────

pub fn int(n: i64) -> Exp {
    Exp::Int(Pos::ZERO, n)
}

pub fn string(s: &str) -> Exp {
    Exp::String(Pos::ZERO, s.to_string())
}

pub fn nil() -> Exp {
    Exp::Nil(Pos::ZERO)
}

/// The empty sequence `()`.
pub fn unit() -> Exp {
    Exp::Seq(Vec::new(), Pos::ZERO)
}

pub fn seq(exps: Vec<Exp>) -> Exp {
    Exp::Seq(exps.into_iter().map(|e| (e, Pos::ZERO)).collect(), Pos::ZERO)
}

pub fn simple(name: &str) -> Var {
    Var::Simple(sym(name), Pos::ZERO)
}

pub fn field_var(var: Var, field: &str) -> Var {
    Var::Field(Box::new(var), sym(field), Pos::ZERO)
}

pub fn subscript(var: Var, index: Exp) -> Var {
    Var::Subscript(Box::new(var), Box::new(index), Pos::ZERO)
}

/// A read of a simple variable.
pub fn name(n: &str) -> Exp {
    Exp::Var(simple(n))
}

pub fn call(func: &str, args: Vec<Exp>) -> Exp {
    Exp::Call {
        func: sym(func),
        args,
        pos: Pos::ZERO,
    }
}

pub fn op(left: Exp, oper: Oper, right: Exp) -> Exp {
    Exp::Op {
        left: Box::new(left),
        oper,
        right: Box::new(right),
        pos: Pos::ZERO,
    }
}

pub fn record_lit(typ: &str, fields: Vec<(&str, Exp)>) -> Exp {
    Exp::Record {
        fields: fields
            .into_iter()
            .map(|(name, exp)| (sym(name), exp, Pos::ZERO))
            .collect(),
        typ: sym(typ),
        pos: Pos::ZERO,
    }
}

pub fn assign(var: Var, exp: Exp) -> Exp {
    Exp::Assign {
        var,
        exp: Box::new(exp),
        pos: Pos::ZERO,
    }
}

pub fn if_then(test: Exp, then: Exp) -> Exp {
    Exp::If {
        test: Box::new(test),
        then: Box::new(then),
        els: None,
        pos: Pos::ZERO,
    }
}

pub fn if_else(test: Exp, then: Exp, els: Exp) -> Exp {
    Exp::If {
        test: Box::new(test),
        then: Box::new(then),
        els: Some(Box::new(els)),
        pos: Pos::ZERO,
    }
}

pub fn while_loop(test: Exp, body: Exp) -> Exp {
    Exp::While {
        test: Box::new(test),
        body: Box::new(body),
        pos: Pos::ZERO,
    }
}

pub fn for_loop(var: &str, lo: Exp, hi: Exp, body: Exp) -> Exp {
    Exp::For {
        var: sym(var),
        escape: false,
        lo: Box::new(lo),
        hi: Box::new(hi),
        body: Box::new(body),
        pos: Pos::ZERO,
    }
}

pub fn let_in(decs: Vec<Dec>, body: Exp) -> Exp {
    Exp::Let {
        decs,
        body: Box::new(body),
        pos: Pos::ZERO,
    }
}

pub fn array_lit(typ: &str, size: Exp, init: Exp) -> Exp {
    Exp::Array {
        typ: sym(typ),
        size: Box::new(size),
        init: Box::new(init),
        pos: Pos::ZERO,
    }
}

pub fn break_exp() -> Exp {
    Exp::Break(Pos::ZERO)
}

// ── Declarations ───────────────────────────────────────────────────────

pub fn var_dec(name: &str, typ: Option<&str>, init: Exp) -> Dec {
    Dec::Var {
        name: sym(name),
        escape: false,
        typ: typ.map(|t| (sym(t), Pos::ZERO)),
        init: Box::new(init),
        pos: Pos::ZERO,
    }
}

pub fn type_block(decs: Vec<Typedec>) -> Dec {
    Dec::Type(decs)
}

pub fn alias(name: &str, target: &str) -> Typedec {
    Typedec {
        name: sym(name),
        ty: AstTy::Name(sym(target), Pos::ZERO),
        pos: Pos::ZERO,
    }
}

pub fn record_ty(name: &str, fields: &[(&str, &str)]) -> Typedec {
    Typedec {
        name: sym(name),
        ty: AstTy::Record(
            fields
                .iter()
                .map(|(fname, ftyp)| Field {
                    name: sym(fname),
                    escape: false,
                    typ: sym(ftyp),
                    pos: Pos::ZERO,
                })
                .collect(),
        ),
        pos: Pos::ZERO,
    }
}

pub fn array_ty(name: &str, elem: &str) -> Typedec {
    Typedec {
        name: sym(name),
        ty: AstTy::Array(sym(elem), Pos::ZERO),
        pos: Pos::ZERO,
    }
}

pub fn fun_block(fundecs: Vec<Fundec>) -> Dec {
    Dec::Function(fundecs)
}

pub fn fundec(name: &str, params: &[(&str, &str)], result: Option<&str>, body: Exp) -> Fundec {
    Fundec {
        name: sym(name),
        params: params
            .iter()
            .map(|(pname, ptyp)| Field {
                name: sym(pname),
                escape: false,
                typ: sym(ptyp),
                pos: Pos::ZERO,
            })
            .collect(),
        result: result.map(|r| (sym(r), Pos::ZERO)),
        body,
        pos: Pos::ZERO,
    }
}

// ── Assertions ─────────────────────────────────────────────────────────

pub fn check(exp: &Exp) -> TypeckResult {
    tiger_typeck::check(exp)
}

pub fn assert_no_errors(result: &TypeckResult) {
    assert!(
        result.errors.is_empty(),
        "expected no errors, got: {:?}",
        result.errors
    );
}

/// Assert that the result contains an error matching the predicate.
pub fn assert_has_error<F: Fn(&TypeError) -> bool>(result: &TypeckResult, pred: F, desc: &str) {
    assert!(
        result.errors.iter().any(|e| pred(e)),
        "expected an error matching `{}`, got: {:?}",
        desc,
        result.errors
    );
}

/// How many errors match the predicate.
pub fn count_errors<F: Fn(&TypeError) -> bool>(result: &TypeckResult, pred: F) -> usize {
    result.errors.iter().filter(|e| pred(e)).count()
}
