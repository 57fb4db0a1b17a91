//! `Expression` — the input AST's expression family (spec §3). Produced
//! by the parser, never mutated once built.

use codemap::Span;

use crate::args::CallArg as EvaluatedCallArg;
use crate::ast::interpolation::Interpolation;
use crate::color::Color;
use crate::common::{BinaryOp, Brackets, ListSeparator, QuoteKind, UnaryOp};
use crate::value::calculation::CalcName;

/// One argument at a call site, still unevaluated.
#[derive(Debug, Clone)]
pub enum ArgExpr {
    Positional(Expression),
    Named(String, Expression),
    Rest(Expression),
}

impl ArgExpr {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ArgExpr::Positional(_) => "positional",
            ArgExpr::Named(..) => "named",
            ArgExpr::Rest(_) => "rest",
        }
    }
}

/// Placeholder used when this enum needs to refer to an already-bound
/// evaluated argument (e.g. `call($function, $args...)`, spec §4.1
/// "lazy macro arguments": "`call($function, $args…)` builds a
/// synthetic invocation at runtime from the current `$args`").
pub type EvaluatedArg = EvaluatedCallArg;

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub namespace: Option<String>,
    pub name: String,
    pub args: Vec<ArgExpr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Expression {
    BinaryOp {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        /// True inside a `calc()`/`min()`/`max()`/`clamp()` argument:
        /// arithmetic here never emits the `/`-division deprecation
        /// warning (spec §4.1).
        in_calculation: bool,
        span: Span,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expression>,
        span: Span,
    },
    Bool(bool),
    Color(Color),
    Number {
        value: f64,
        numerator_units: Vec<String>,
        denominator_units: Vec<String>,
    },
    List {
        elements: Vec<Expression>,
        separator: ListSeparator,
        brackets: Brackets,
        span: Span,
    },
    Map {
        pairs: Vec<(Expression, Expression)>,
        span: Span,
    },
    Str {
        text: Interpolation,
        quote: QuoteKind,
    },
    Variable {
        namespace: Option<String>,
        name: String,
        span: Span,
    },
    FunctionCall(CallExpr),
    /// `if(condition, if_true, if_false)` — a lazy macro: exactly one
    /// branch is evaluated (spec §4.1).
    If {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
        span: Span,
    },
    Paren(Box<Expression>),
    Calculation {
        name: CalcName,
        args: Vec<Expression>,
        span: Span,
    },
    /// An interpolated unquoted fragment evaluated in "selector/query
    /// mode" (spec §4.1): a bare color emits a deprecation warning.
    SelectorQueryInterpolation(Interpolation),
    /// `&` — resolved by the statement executor against the enclosing
    /// style rule, not by the expression evaluator itself.
    ParentSelector(Span),
    /// Raw, already-parsed `@supports` condition text; re-evaluated as
    /// an interpolation the same way selectors are (spec §3).
    Supports(Interpolation),
}

impl Expression {
    pub fn span(&self) -> Option<Span> {
        match self {
            Expression::BinaryOp { span, .. }
            | Expression::UnaryOp { span, .. }
            | Expression::List { span, .. }
            | Expression::Map { span, .. }
            | Expression::Variable { span, .. }
            | Expression::If { span, .. }
            | Expression::Calculation { span, .. }
            | Expression::ParentSelector(span) => Some(*span),
            Expression::FunctionCall(call) => Some(call.span),
            Expression::Str { text, .. } | Expression::SelectorQueryInterpolation(text) | Expression::Supports(text) => {
                Some(text.span)
            }
            Expression::Paren(inner) => inner.span(),
            _ => None,
        }
    }
}
