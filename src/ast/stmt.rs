//! `Statement` — the input AST's statement family (spec §3).

use codemap::Span;

use crate::args::CallArg as ArgExprAlias;
use crate::ast::expr::{ArgExpr, Expression};
use crate::ast::interpolation::Interpolation;
use crate::common::ScopeKind;

/// One declared parameter in a `@mixin`/`@function` signature, still
/// unevaluated (the default is an `Expression`, evaluated lazily at
/// call time against the callable's own closure — spec §4.4 step 3).
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub default: Option<Expression>,
    pub is_rest: bool,
}

#[derive(Debug, Clone)]
pub struct ArgumentSignature {
    pub params: Vec<ParamDecl>,
}

/// `@each $a, $b in <expr>` binds one or more pattern variables per
/// iteration (spec §4.2 `EachRule`).
#[derive(Debug, Clone)]
pub struct EachPattern {
    pub names: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Stylesheet {
        body: Vec<Statement>,
        span: Span,
    },
    StyleRule {
        selector: Interpolation,
        body: Vec<Statement>,
        span: Span,
    },
    Declaration {
        name: Interpolation,
        value: Option<Expression>,
        body: Vec<Statement>,
        span: Span,
    },
    VariableDeclaration {
        namespace: Option<String>,
        name: String,
        value: Expression,
        is_global: bool,
        is_default: bool,
        span: Span,
    },
    IfRule {
        clauses: Vec<(Expression, Vec<Statement>)>,
        else_clause: Option<Vec<Statement>>,
        span: Span,
    },
    EachRule {
        pattern: EachPattern,
        list: Expression,
        body: Vec<Statement>,
        span: Span,
    },
    ForRule {
        variable: String,
        from: Expression,
        to: Expression,
        is_exclusive: bool,
        body: Vec<Statement>,
        span: Span,
    },
    WhileRule {
        condition: Expression,
        body: Vec<Statement>,
        span: Span,
    },
    MixinRule {
        name: String,
        args: ArgumentSignature,
        accepts_content: bool,
        body: Vec<Statement>,
        span: Span,
    },
    IncludeRule {
        namespace: Option<String>,
        name: String,
        args: Vec<ArgExpr>,
        content: Option<Vec<Statement>>,
        span: Span,
    },
    ContentBlock {
        body: Vec<Statement>,
        span: Span,
    },
    ContentRule {
        args: Vec<ArgExpr>,
        span: Span,
    },
    FunctionRule {
        name: String,
        args: ArgumentSignature,
        body: Vec<Statement>,
        span: Span,
    },
    ReturnRule {
        value: Expression,
        span: Span,
    },
    ExtendRule {
        selector: Interpolation,
        is_optional: bool,
        span: Span,
    },
    MediaRule {
        query: Interpolation,
        body: Vec<Statement>,
        span: Span,
    },
    SupportsRule {
        condition: Interpolation,
        body: Vec<Statement>,
        span: Span,
    },
    AtRule {
        name: String,
        params: Interpolation,
        body: Option<Vec<Statement>>,
        span: Span,
    },
    AtRootRule {
        query: Option<Interpolation>,
        body: Vec<Statement>,
        span: Span,
    },
    ImportRule {
        imports: Vec<ImportArgument>,
        span: Span,
    },
    UseRule {
        url: String,
        namespace: UseNamespace,
        configuration: Vec<(String, Expression)>,
        span: Span,
    },
    ForwardRule {
        url: String,
        prefix: Option<String>,
        visibility: ForwardVisibility,
        configuration: Vec<(String, Expression)>,
        span: Span,
    },
    WarnRule {
        message: Expression,
        span: Span,
    },
    ErrorRule {
        message: Expression,
        span: Span,
    },
    DebugRule {
        message: Expression,
        span: Span,
    },
    LoudComment {
        text: Interpolation,
        span: Span,
    },
    SilentComment {
        text: String,
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub enum ImportArgument {
    /// A URL that ends in `.css`, starts with `url(`, or is prefixed
    /// with a protocol — preserved as a literal `@import` in the output
    /// (spec §4.2: "static CSS imports").
    StaticCss(Interpolation),
    /// Everything else: re-parsed and executed dynamically.
    Dynamic(String),
}

#[derive(Debug, Clone)]
pub enum UseNamespace {
    Named(String),
    /// `as *` — members are unnamespaced in the using module.
    Unnamespaced,
    /// No `as` clause: the namespace defaults to the last URL segment.
    Default,
}

#[derive(Debug, Clone, Default)]
pub struct ForwardVisibility {
    pub show: Option<Vec<String>>,
    pub hide: Vec<String>,
}

/// Exists only so `args.rs`'s evaluated-argument type has a name
/// reachable from the AST layer too (spec §4.1 "lazy macro arguments",
/// `call($function, $args…)`).
pub type EvaluatedArg = ArgExprAlias;

/// Which kind of scope a control-flow block's body should run in
/// (spec §4.2: "evaluate in a semi-global scope").
pub const CONTROL_FLOW_SCOPE: ScopeKind = ScopeKind::SemiGlobal;
