//! The recursive checker over expressions, lvalues, and declarations.
//!
//! Each `trans_*` method takes the current [`Env`] (persistent, so
//! extending it for a sub-tree never disturbs the caller) and an
//! `in_loop` flag for `break` legality, and returns an [`ExpTy`]. On a
//! local error the checker logs one diagnostic, produces [`Ty::Top`],
//! and keeps going; any later check that sees `Top` on either side
//! stays silent so one root cause yields one report.

use rustc_hash::FxHashSet;
use tiger_ast as ast;
use tiger_common::{Pos, Symbol};

use crate::env::{Entry, Env};
use crate::error::{ErrorSink, RangeEnd, TypeErrorKind};
use crate::resolve::resolve_typedecs;
use crate::translate::TransExp;
use crate::ty::{join, same, subtype, Ty};

/// A checked expression: the translation placeholder plus its type.
#[derive(Debug)]
pub struct ExpTy {
    pub exp: TransExp,
    pub ty: Ty,
}

fn out(ty: Ty) -> ExpTy {
    ExpTy {
        exp: TransExp::placeholder(),
        ty,
    }
}

/// The checker: owns the diagnostic sink, everything else is threaded
/// through the recursion.
pub struct Checker {
    pub sink: ErrorSink,
}

impl Checker {
    pub fn new() -> Self {
        Checker {
            sink: ErrorSink::new(),
        }
    }

    /// Check a whole program: the root expression in the base
    /// environment, outside any loop.
    pub fn trans_prog(&mut self, exp: &ast::Exp) -> ExpTy {
        self.trans_exp(&Env::base(), false, exp)
    }

    // ── Expressions ─────────────────────────────────────────────────

    pub fn trans_exp(&mut self, env: &Env, in_loop: bool, exp: &ast::Exp) -> ExpTy {
        match exp {
            ast::Exp::Nil(_) => out(Ty::Nil),
            ast::Exp::Int(_, _) => out(Ty::Int),
            ast::Exp::String(_, _) => out(Ty::String),
            ast::Exp::Var(var) => self.trans_var(env, in_loop, var),
            ast::Exp::Call { func, args, pos } => {
                self.check_call(env, in_loop, *func, args, *pos)
            }
            ast::Exp::Op {
                left,
                oper,
                right,
                pos: _,
            } => self.check_op(env, in_loop, left, *oper, right),
            ast::Exp::Record { fields, typ, pos } => {
                self.check_record(env, in_loop, *typ, fields, *pos)
            }
            ast::Exp::Seq(items, _) => {
                let mut ty = Ty::Unit;
                for (item, _) in items {
                    ty = self.trans_exp(env, in_loop, item).ty;
                }
                out(ty)
            }
            ast::Exp::Assign { var, exp, pos } => {
                let lhs = self.trans_var(env, in_loop, var);
                let rhs = self.trans_exp(env, in_loop, exp);
                self.expect_subtype(&rhs.ty, &lhs.ty, *pos, |actual, expected| {
                    TypeErrorKind::AssignmentMismatch { actual, expected }
                });
                out(Ty::Unit)
            }
            ast::Exp::If {
                test,
                then,
                els,
                pos,
            } => self.check_if(env, in_loop, test, then, els.as_deref(), *pos),
            ast::Exp::While { test, body, pos: _ } => {
                let test_ty = self.trans_exp(env, in_loop, test).ty;
                self.expect_int_condition(&test_ty, test.pos());
                let body_ty = self.trans_exp(env, true, body).ty;
                if !subtype(&body_ty, &Ty::Unit) && body_ty.is_well_typed() {
                    self.sink.log(
                        body.pos(),
                        TypeErrorKind::NonUnitWhile {
                            actual: body_ty.actual(),
                        },
                    );
                }
                out(Ty::Unit)
            }
            ast::Exp::For {
                var,
                escape: _,
                lo,
                hi,
                body,
                pos: _,
            } => self.check_for(env, in_loop, *var, lo, hi, body),
            ast::Exp::Let { decs, body, pos: _ } => {
                let mut inner = env.clone();
                for dec in decs {
                    inner = self.trans_dec(&inner, in_loop, dec);
                }
                self.trans_exp(&inner, in_loop, body)
            }
            ast::Exp::Array {
                typ,
                size,
                init,
                pos,
            } => self.check_array(env, in_loop, *typ, size, init, *pos),
            ast::Exp::Break(pos) => {
                if !in_loop {
                    self.sink.log(*pos, TypeErrorKind::IllegalBreak);
                }
                out(Ty::Bottom)
            }
        }
    }

    fn check_call(
        &mut self,
        env: &Env,
        in_loop: bool,
        func: Symbol,
        args: &[ast::Exp],
        pos: Pos,
    ) -> ExpTy {
        match env.venv.lookup(func) {
            None => {
                self.sink
                    .log(pos, TypeErrorKind::UndefinedFunction { name: func });
                out(Ty::Top)
            }
            Some(Entry::Var { .. }) => {
                self.sink
                    .log(pos, TypeErrorKind::NameBoundToVar { name: func });
                out(Ty::Top)
            }
            Some(Entry::Fun { formals, result }) => {
                if formals.len() != args.len() {
                    self.sink.log(
                        pos,
                        TypeErrorKind::ArityMismatch {
                            name: func,
                            actual: args.len(),
                            expected: formals.len(),
                        },
                    );
                }
                // Check whatever pairs line up, even after an arity error.
                for (formal, arg) in formals.iter().zip(args) {
                    let arg_ty = self.trans_exp(env, in_loop, arg).ty;
                    self.expect_subtype(&arg_ty, formal, arg.pos(), |actual, expected| {
                        TypeErrorKind::ArgumentMismatch { actual, expected }
                    });
                }
                out(result.clone())
            }
        }
    }

    /// Binary operators.
    ///
    /// Arithmetic and ordering expect `int` on both sides. Equality
    /// expects `Bottom` -- anything -- and then requires the right side
    /// to agree with the left. The result is always `int`.
    fn check_op(
        &mut self,
        env: &Env,
        in_loop: bool,
        left: &ast::Exp,
        oper: ast::Oper,
        right: &ast::Exp,
    ) -> ExpTy {
        let left_ty = self.trans_exp(env, in_loop, left).ty;
        let right_ty = self.trans_exp(env, in_loop, right).ty;
        let expected = if oper.is_equality() {
            Ty::Bottom
        } else {
            Ty::Int
        };

        let left_join = join(&left_ty, &expected);
        if !left_join.is_well_typed() {
            if left_ty.is_well_typed() {
                self.sink.log(
                    left.pos(),
                    TypeErrorKind::OperandMismatch {
                        oper,
                        actual: left_ty.actual(),
                        expected,
                    },
                );
            }
        } else {
            let combined = join(&left_join, &right_ty);
            if !combined.is_well_typed() && right_ty.is_well_typed() {
                self.sink.log(
                    right.pos(),
                    TypeErrorKind::OperandMismatch {
                        oper,
                        actual: right_ty.actual(),
                        expected: left_join,
                    },
                );
            }
        }
        out(Ty::Int)
    }

    fn check_record(
        &mut self,
        env: &Env,
        in_loop: bool,
        typ: Symbol,
        fields: &[(Symbol, ast::Exp, Pos)],
        pos: Pos,
    ) -> ExpTy {
        let declared = match env.tenv.lookup(typ) {
            Some(ty) => ty.actual(),
            None => {
                self.sink
                    .log(pos, TypeErrorKind::UnboundRecordType { name: typ });
                return out(Ty::Top);
            }
        };
        let record = match &declared {
            Ty::Record(record) => record.clone(),
            Ty::Top => return out(Ty::Top),
            other => {
                self.sink.log(
                    pos,
                    TypeErrorKind::NonRecordType {
                        name: typ,
                        actual: other.clone(),
                    },
                );
                return out(Ty::Top);
            }
        };

        for (field_name, field_ty) in &record.fields {
            match fields.iter().find(|(name, _, _)| name == field_name) {
                Some((_, init, field_pos)) => {
                    let init_ty = self.trans_exp(env, in_loop, init).ty;
                    self.expect_subtype(&init_ty, field_ty, *field_pos, |actual, expected| {
                        TypeErrorKind::FieldMismatch {
                            field: *field_name,
                            actual,
                            expected,
                        }
                    });
                }
                None => {
                    self.sink.log(
                        pos,
                        TypeErrorKind::MissingField {
                            field: *field_name,
                            expected: field_ty.actual(),
                        },
                    );
                }
            }
        }
        // Literal fields the record does not declare are left alone.
        out(declared)
    }

    fn check_if(
        &mut self,
        env: &Env,
        in_loop: bool,
        test: &ast::Exp,
        then: &ast::Exp,
        els: Option<&ast::Exp>,
        pos: Pos,
    ) -> ExpTy {
        let test_ty = self.trans_exp(env, in_loop, test).ty;
        self.expect_int_condition(&test_ty, test.pos());

        let then_ty = self.trans_exp(env, in_loop, then).ty;
        match els {
            None => {
                if !subtype(&then_ty, &Ty::Unit) && then_ty.is_well_typed() {
                    self.sink.log(
                        then.pos(),
                        TypeErrorKind::NonUnitIf {
                            actual: then_ty.actual(),
                        },
                    );
                }
                out(Ty::Unit)
            }
            Some(els) => {
                let else_ty = self.trans_exp(env, in_loop, els).ty;
                let result = join(&then_ty, &else_ty);
                if !result.is_well_typed()
                    && then_ty.is_well_typed()
                    && else_ty.is_well_typed()
                {
                    self.sink.log(
                        pos,
                        TypeErrorKind::IfBranchMismatch {
                            then_ty: then_ty.actual(),
                            else_ty: else_ty.actual(),
                        },
                    );
                }
                out(result)
            }
        }
    }

    fn check_for(
        &mut self,
        env: &Env,
        in_loop: bool,
        var: Symbol,
        lo: &ast::Exp,
        hi: &ast::Exp,
        body: &ast::Exp,
    ) -> ExpTy {
        let lo_ty = self.trans_exp(env, in_loop, lo).ty;
        if !subtype(&lo_ty, &Ty::Int) && lo_ty.is_well_typed() {
            self.sink.log(
                lo.pos(),
                TypeErrorKind::ForRangeMismatch {
                    which: RangeEnd::Lower,
                    actual: lo_ty.actual(),
                },
            );
        }
        let hi_ty = self.trans_exp(env, in_loop, hi).ty;
        if !subtype(&hi_ty, &Ty::Int) && hi_ty.is_well_typed() {
            self.sink.log(
                hi.pos(),
                TypeErrorKind::ForRangeMismatch {
                    which: RangeEnd::Upper,
                    actual: hi_ty.actual(),
                },
            );
        }

        let inner = env.with_var(var, Ty::Int);
        let body_ty = self.trans_exp(&inner, true, body).ty;
        if !subtype(&body_ty, &Ty::Unit) && body_ty.is_well_typed() {
            self.sink.log(
                body.pos(),
                TypeErrorKind::NonUnitFor {
                    actual: body_ty.actual(),
                },
            );
        }
        out(Ty::Unit)
    }

    fn check_array(
        &mut self,
        env: &Env,
        in_loop: bool,
        typ: Symbol,
        size: &ast::Exp,
        init: &ast::Exp,
        pos: Pos,
    ) -> ExpTy {
        let size_ty = self.trans_exp(env, in_loop, size).ty;
        if !subtype(&size_ty, &Ty::Int) && size_ty.is_well_typed() {
            self.sink.log(
                size.pos(),
                TypeErrorKind::ArraySizeMismatch {
                    actual: size_ty.actual(),
                },
            );
        }

        let declared = self.lookup_type(env, typ, pos).actual();
        let init_ty = self.trans_exp(env, in_loop, init).ty;
        match &declared {
            Ty::Array(array) => {
                self.expect_subtype(&init_ty, &array.elem, init.pos(), |actual, expected| {
                    TypeErrorKind::ArrayInitMismatch { actual, expected }
                });
                out(declared)
            }
            Ty::Top => out(Ty::Top),
            other => {
                self.sink.log(
                    pos,
                    TypeErrorKind::NonArrayType {
                        name: typ,
                        actual: other.clone(),
                    },
                );
                out(Ty::Top)
            }
        }
    }

    // ── Lvalues ─────────────────────────────────────────────────────

    pub fn trans_var(&mut self, env: &Env, in_loop: bool, var: &ast::Var) -> ExpTy {
        match var {
            ast::Var::Simple(name, pos) => match env.venv.lookup(*name) {
                Some(Entry::Var { ty }) => out(ty.clone()),
                Some(Entry::Fun { .. }) => {
                    self.sink
                        .log(*pos, TypeErrorKind::NameBoundToFunction { name: *name });
                    out(Ty::Top)
                }
                None => {
                    self.sink
                        .log(*pos, TypeErrorKind::UndefinedVar { name: *name });
                    out(Ty::Top)
                }
            },
            ast::Var::Field(var, field, pos) => {
                let var_ty = self.trans_var(env, in_loop, var).ty.actual();
                match &var_ty {
                    Ty::Record(record) => {
                        match record.fields.iter().find(|(name, _)| name == field) {
                            Some((_, field_ty)) => out(field_ty.actual()),
                            None => {
                                self.sink.log(
                                    *pos,
                                    TypeErrorKind::NoSuchField {
                                        field: *field,
                                        record: var_ty.clone(),
                                    },
                                );
                                out(Ty::Top)
                            }
                        }
                    }
                    Ty::Top => out(Ty::Top),
                    other => {
                        self.sink.log(
                            *pos,
                            TypeErrorKind::NonRecordAccess {
                                field: *field,
                                actual: other.clone(),
                            },
                        );
                        out(Ty::Top)
                    }
                }
            }
            ast::Var::Subscript(var, index, pos) => {
                let index_ty = self.trans_exp(env, in_loop, index).ty;
                if !subtype(&index_ty, &Ty::Int) && index_ty.is_well_typed() {
                    self.sink.log(
                        index.pos(),
                        TypeErrorKind::NonIntSubscript {
                            actual: index_ty.actual(),
                        },
                    );
                }
                let var_ty = self.trans_var(env, in_loop, var).ty.actual();
                match &var_ty {
                    Ty::Array(array) => out(array.elem.actual()),
                    Ty::Top => out(Ty::Top),
                    // Reported for every well-typed non-array, nil included.
                    other => {
                        self.sink.log(
                            *pos,
                            TypeErrorKind::NonArrayAccess {
                                actual: other.clone(),
                            },
                        );
                        out(Ty::Top)
                    }
                }
            }
        }
    }

    // ── Declarations ────────────────────────────────────────────────

    pub fn trans_dec(&mut self, env: &Env, in_loop: bool, dec: &ast::Dec) -> Env {
        match dec {
            ast::Dec::Var {
                name,
                escape: _,
                typ,
                init,
                pos,
            } => {
                let init_ty = self.trans_exp(env, in_loop, init).ty;
                let declared = match typ {
                    Some((sym, typ_pos)) => self.lookup_type(env, *sym, *typ_pos),
                    None => init_ty.clone(),
                };
                let declared = if same(&declared, &Ty::Nil) {
                    // nil alone says nothing about which record type
                    // the variable should have.
                    self.sink
                        .log(*pos, TypeErrorKind::NilInitialization { name: *name });
                    Ty::Top
                } else {
                    declared
                };
                self.expect_subtype(&init_ty, &declared, *pos, |actual, expected| {
                    TypeErrorKind::AssignmentMismatch { actual, expected }
                });
                env.with_var(*name, declared)
            }
            ast::Dec::Type(decs) => {
                let tenv = resolve_typedecs(&mut self.sink, &env.tenv, decs);
                env.with_tenv(tenv)
            }
            ast::Dec::Function(fundecs) => self.trans_fundecs(env, fundecs),
        }
    }

    /// A block of mutually recursive functions: bind every header
    /// first, then check every body with all headers in scope.
    fn trans_fundecs(&mut self, env: &Env, fundecs: &[ast::Fundec]) -> Env {
        let mut headers: Vec<(Vec<(Symbol, Ty)>, Ty)> = Vec::new();
        let mut bound = env.clone();

        for fundec in fundecs {
            let mut seen: FxHashSet<Symbol> = FxHashSet::default();
            let mut formals: Vec<(Symbol, Ty)> = Vec::new();
            for param in &fundec.params {
                if !seen.insert(param.name) {
                    self.sink.log(
                        param.pos,
                        TypeErrorKind::ArgumentRedefined {
                            function: fundec.name,
                            argument: param.name,
                        },
                    );
                }
                let ty = self.lookup_type(env, param.typ, param.pos);
                formals.push((param.name, ty));
            }
            let result = match &fundec.result {
                Some((sym, pos)) => self.lookup_type(env, *sym, *pos),
                None => Ty::Unit,
            };
            bound = bound.with_fun(
                fundec.name,
                formals.iter().map(|(_, ty)| ty.clone()).collect(),
                result.clone(),
            );
            headers.push((formals, result));
        }

        for (fundec, (formals, result)) in fundecs.iter().zip(&headers) {
            let mut body_env = bound.clone();
            for (name, ty) in formals {
                body_env = body_env.with_var(*name, ty.clone());
            }
            // A function body starts outside any loop.
            let body_ty = self.trans_exp(&body_env, false, &fundec.body).ty;
            match &fundec.result {
                None => {
                    if !subtype(&body_ty, &Ty::Unit) && body_ty.is_well_typed() {
                        self.sink.log(
                            fundec.pos,
                            TypeErrorKind::NonUnitProcedure {
                                name: fundec.name,
                                actual: body_ty.actual(),
                            },
                        );
                    }
                }
                Some(_) => {
                    self.expect_subtype(&body_ty, result, fundec.pos, |actual, expected| {
                        TypeErrorKind::TypeMismatch { actual, expected }
                    });
                }
            }
        }

        bound
    }

    // ── Shared helpers ──────────────────────────────────────────────

    /// Look up a type annotation; an unbound name is reported once and
    /// becomes `Top` so downstream checks stay quiet.
    fn lookup_type(&mut self, env: &Env, sym: Symbol, pos: Pos) -> Ty {
        match env.tenv.lookup(sym) {
            Some(ty) => ty.clone(),
            None => {
                self.sink.log(pos, TypeErrorKind::UnboundType { name: sym });
                Ty::Top
            }
        }
    }

    /// Assert `actual <= expected`; report via `make` unless either
    /// side is already the error type.
    fn expect_subtype(
        &mut self,
        actual: &Ty,
        expected: &Ty,
        pos: Pos,
        make: impl FnOnce(Ty, Ty) -> TypeErrorKind,
    ) {
        if !subtype(actual, expected) && actual.is_well_typed() && expected.is_well_typed() {
            self.sink.log(pos, make(actual.actual(), expected.actual()));
        }
    }

    fn expect_int_condition(&mut self, actual: &Ty, pos: Pos) {
        if !subtype(actual, &Ty::Int) && actual.is_well_typed() {
            self.sink.log(
                pos,
                TypeErrorKind::ConditionMismatch {
                    actual: actual.actual(),
                },
            );
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}
