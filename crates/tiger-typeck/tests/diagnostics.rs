//! Rendering tests for the ariadne diagnostic pipeline.
//!
//! These build small programs with real byte positions into a matching
//! source string, then assert on fragments of the rendered output:
//! error codes, messages, and help text.

mod common;

use common::*;
use tiger_ast::{Dec, Exp};
use tiger_common::Pos;
use tiger_typeck::diagnostics::DiagnosticOptions;
use tiger_typeck::TypeckResult;

fn opts() -> DiagnosticOptions {
    DiagnosticOptions::colorless()
}

fn render_all(result: &TypeckResult, source: &str) -> Vec<String> {
    result.render_errors(source, "test.tig", &opts())
}

#[test]
fn assignment_mismatch_renders_code_and_message() {
    let source = "let var x : int := \"hi\" in x end";
    let program = Exp::Let {
        decs: vec![Dec::Var {
            name: sym("x"),
            escape: false,
            typ: Some((sym("int"), Pos::new(12))),
            init: Box::new(Exp::String(Pos::new(19), "hi".to_string())),
            pos: Pos::new(4),
        }],
        body: Box::new(Exp::Var(tiger_ast::Var::Simple(sym("x"), Pos::new(27)))),
        pos: Pos::new(0),
    };
    let result = check(&program);
    assert_eq!(result.errors.len(), 1, "{:?}", result.errors);

    let rendered = render_all(&result, source);
    assert_eq!(rendered.len(), 1);
    let text = &rendered[0];
    assert!(text.contains("E0021"), "missing code: {}", text);
    assert!(
        text.contains("cannot assign `string` where `int` is expected"),
        "missing message: {}",
        text
    );
    assert!(
        text.contains("expected `int`, found `string`"),
        "missing label: {}",
        text
    );
}

#[test]
fn illegal_break_renders_help() {
    let source = "break";
    let result = check(&Exp::Break(Pos::new(0)));
    let rendered = render_all(&result, source);
    assert_eq!(rendered.len(), 1);
    let text = &rendered[0];
    assert!(text.contains("E0034"), "{}", text);
    assert!(text.contains("break outside of loop"), "{}", text);
    assert!(
        text.contains("while and for"),
        "expected the help text: {}",
        text
    );
}

#[test]
fn colorless_output_has_no_escape_codes() {
    let source = "ghost";
    let result = check(&Exp::Var(tiger_ast::Var::Simple(
        sym("ghost"),
        Pos::new(0),
    )));
    let rendered = render_all(&result, source);
    assert!(!rendered.is_empty());
    for text in &rendered {
        assert!(
            !text.contains('\u{1b}'),
            "colorless output should carry no ANSI escapes: {:?}",
            text
        );
    }
}

#[test]
fn one_rendered_diagnostic_per_error() {
    // Two independent errors: an undefined variable and a stray break.
    let source = "(ghost; break)";
    let program = Exp::Seq(
        vec![
            (
                Exp::Var(tiger_ast::Var::Simple(sym("ghost"), Pos::new(1))),
                Pos::new(1),
            ),
            (Exp::Break(Pos::new(8)), Pos::new(8)),
        ],
        Pos::new(0),
    );
    let result = check(&program);
    assert_eq!(result.errors.len(), 2, "{:?}", result.errors);

    let rendered = render_all(&result, source);
    assert_eq!(rendered.len(), 2);
    assert!(rendered[0].contains("undefined variable"), "{}", rendered[0]);
    assert!(rendered[1].contains("break outside of loop"), "{}", rendered[1]);
}

#[test]
fn position_past_the_end_of_source_still_renders() {
    // A synthesized node can carry a position beyond the text it is
    // rendered against; the span is clamped rather than panicking.
    let source = "x";
    let result = check(&Exp::Var(tiger_ast::Var::Simple(
        sym("ghost"),
        Pos::new(500),
    )));
    let rendered = render_all(&result, source);
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("undefined variable"), "{}", rendered[0]);
}
