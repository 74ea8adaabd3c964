//! Ariadne-based rendering for type errors.
//!
//! Turns a [`TypeError`] into a formatted, labeled terminal diagnostic:
//! an error code, a terse message, a labeled source span at the
//! position the checker recorded, and help text when a plausible fix
//! exists.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::error::{TypeError, TypeErrorKind};

/// Options controlling rendered output.
pub struct DiagnosticOptions {
    /// Whether to emit ANSI colors.
    pub color: bool,
}

impl DiagnosticOptions {
    /// Colorless output for deterministic test assertions.
    pub fn colorless() -> Self {
        DiagnosticOptions { color: false }
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions { color: true }
    }
}

// ── Error Codes ────────────────────────────────────────────────────────

/// A stable code per diagnostic kind.
fn error_code(kind: &TypeErrorKind) -> &'static str {
    use TypeErrorKind::*;
    match kind {
        UnboundType { .. } => "E0001",
        UnresolvedType { .. } => "E0002",
        CyclicTypeDec { .. } => "E0003",
        TypeRedefined { .. } => "E0004",
        UndefinedVar { .. } => "E0005",
        UndefinedFunction { .. } => "E0006",
        NameBoundToFunction { .. } => "E0007",
        NameBoundToVar { .. } => "E0008",
        NoSuchField { .. } => "E0009",
        NonRecordAccess { .. } => "E0010",
        NonIntSubscript { .. } => "E0011",
        NonArrayAccess { .. } => "E0012",
        ArityMismatch { .. } => "E0013",
        ArgumentMismatch { .. } => "E0014",
        ArgumentRedefined { .. } => "E0015",
        OperandMismatch { .. } => "E0016",
        FieldMismatch { .. } => "E0017",
        MissingField { .. } => "E0018",
        NonRecordType { .. } => "E0019",
        UnboundRecordType { .. } => "E0020",
        AssignmentMismatch { .. } => "E0021",
        NilInitialization { .. } => "E0022",
        ConditionMismatch { .. } => "E0023",
        NonUnitIf { .. } => "E0024",
        NonUnitWhile { .. } => "E0025",
        NonUnitFor { .. } => "E0026",
        NonUnitProcedure { .. } => "E0027",
        IfBranchMismatch { .. } => "E0028",
        ForRangeMismatch { .. } => "E0029",
        ArraySizeMismatch { .. } => "E0030",
        ArrayInitMismatch { .. } => "E0031",
        NonArrayType { .. } => "E0032",
        TypeMismatch { .. } => "E0033",
        IllegalBreak => "E0034",
    }
}

// ── Labels and Help ────────────────────────────────────────────────────

/// The label attached to the primary span, plus optional help text.
fn label_and_help(kind: &TypeErrorKind) -> (String, Option<String>) {
    use TypeErrorKind::*;
    match kind {
        UnboundType { name } | UnresolvedType { name } => (
            format!("`{}` is not a type in scope", name),
            None,
        ),
        CyclicTypeDec { .. } => (
            "this alias chain never reaches a concrete type".to_string(),
            Some("route the recursion through a record or array".to_string()),
        ),
        TypeRedefined { name } => (
            format!("`{}` was already declared in this block", name),
            Some("only the first declaration takes effect".to_string()),
        ),
        UndefinedVar { .. } | UndefinedFunction { .. } => {
            ("not found in this scope".to_string(), None)
        }
        NameBoundToFunction { name } => (
            format!("`{}` names a function here", name),
            None,
        ),
        NameBoundToVar { name } => (format!("`{}` names a variable here", name), None),
        NoSuchField { field, .. } => (format!("no field `{}`", field), None),
        NonRecordAccess { actual, .. } => {
            (format!("`{}` has no fields", actual), None)
        }
        NonIntSubscript { actual } => (format!("found `{}`", actual), None),
        NonArrayAccess { actual } => (format!("`{}` cannot be indexed", actual), None),
        ArityMismatch { actual, expected, .. } => {
            let help = if expected > actual {
                format!("missing {} argument(s)", expected - actual)
            } else {
                format!("{} extra argument(s)", actual - expected)
            };
            (format!("expected {} argument(s)", expected), Some(help))
        }
        ArgumentMismatch { actual, expected }
        | ArrayInitMismatch { actual, expected }
        | AssignmentMismatch { actual, expected }
        | TypeMismatch { actual, expected } => (
            format!("expected `{}`, found `{}`", expected, actual),
            None,
        ),
        ArgumentRedefined { argument, .. } => (
            format!("`{}` is already a parameter of this function", argument),
            None,
        ),
        OperandMismatch { expected, actual, .. } => (
            format!("expected `{}`, found `{}`", expected, actual),
            None,
        ),
        FieldMismatch { actual, expected, .. } => (
            format!("expected `{}`, found `{}`", expected, actual),
            None,
        ),
        MissingField { field, .. } => (
            format!("field `{}` is required", field),
            Some(format!("add `{} = <value>`", field)),
        ),
        NonRecordType { name, .. } | UnboundRecordType { name } => (
            format!("`{}` does not name a record type", name),
            None,
        ),
        NilInitialization { name } => (
            "nil alone does not determine a record type".to_string(),
            Some(format!("annotate the declaration: `var {} : T := nil`", name)),
        ),
        ConditionMismatch { actual } => (
            format!("the condition has type `{}`", actual),
            None,
        ),
        NonUnitIf { actual } | NonUnitWhile { actual } | NonUnitFor { actual } => (
            format!("this body produces a `{}`", actual),
            None,
        ),
        NonUnitProcedure { actual, .. } => (
            format!("the body produces a `{}`", actual),
            Some("declare a result type or discard the value".to_string()),
        ),
        IfBranchMismatch { then_ty, else_ty } => (
            format!("then is `{}`, else is `{}`", then_ty, else_ty),
            Some("both branches of an if/else must produce the same type".to_string()),
        ),
        ForRangeMismatch { which, actual } => (
            format!("the {} bound has type `{}`", which, actual),
            None,
        ),
        ArraySizeMismatch { actual } => (format!("found `{}`", actual), None),
        NonArrayType { name, .. } => (
            format!("`{}` does not name an array type", name),
            None,
        ),
        IllegalBreak => (
            "no enclosing loop".to_string(),
            Some("break is only legal inside while and for bodies".to_string()),
        ),
    }
}

// ── Rendering ──────────────────────────────────────────────────────────

/// Render one type error against its source text.
pub fn render_diagnostic(
    error: &TypeError,
    source: &str,
    _filename: &str,
    options: &DiagnosticOptions,
) -> String {
    let config = Config::default().with_color(options.color);

    // The checker records single byte offsets; give ariadne a one-byte
    // span, pulled back inside the source when the position runs past
    // its end (synthesized nodes can do that).
    let len = source.len();
    let start = (error.pos.offset() as usize).min(len.saturating_sub(1));
    let end = (start + 1).min(len);
    let span: Range<usize> = start..end.max(start);

    let (label, help) = label_and_help(&error.kind);
    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_code(error_code(&error.kind))
        .with_message(error.kind.to_string())
        .with_config(config)
        .with_label(
            Label::new(span)
                .with_message(label)
                .with_color(Color::Red),
        );
    if let Some(help) = help {
        builder.set_help(help);
    }
    let report = builder.finish();

    let mut buf = Vec::new();
    report
        .write(Source::from(source), &mut buf)
        .expect("failed to write diagnostic");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}
