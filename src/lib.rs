//! A tree-walking evaluator for a Sass-to-CSS compiler: takes a parsed
//! stylesheet AST and produces a CSS document tree, resolving
//! variables, mixins, functions, imports, control flow, `@extend`, and
//! media-query merging along the way.
//!
//! Parsing Sass/SCSS/CSS source into the AST consumed here, and
//! serializing the resulting [`css_tree::CssTree`] back into text, are
//! both treated as external collaborators (see [`Parser`] below) — this
//! crate owns the evaluator in between.

pub mod args;
pub mod ast;
pub mod builtin;
pub mod color;
pub mod common;
pub mod css_tree;
pub mod env;
pub mod error;
pub mod eval;
pub mod logger;
pub mod media;
pub mod options;
pub mod selector;
pub mod value;

pub use ast::Statement;
pub use css_tree::CssTree;
pub use error::{SassError, SassResult};
pub use eval::{Evaluator, Flow};
pub use options::Options;
pub use value::Value;

/// The three source dialects the surrounding tooling recognizes (spec
/// GLOSSARY: "syntax tag (indented vs bracketed vs CSS)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `.sass` — significant-whitespace syntax.
    Indented,
    /// `.scss` — the bracketed syntax.
    Scss,
    /// Plain CSS, loaded as-is; `&` and most Sass extensions are
    /// disabled while executing it (spec §4.2 "plain CSS mode").
    Css,
}

/// External collaborator (spec §1, §6): resolves a `@use`/`@forward`/
/// `@import` URL against a base URL and loads its source text.
/// Returning `None` from either method means "not found, try the next
/// importer" rather than a hard failure.
pub trait Importer: std::fmt::Debug {
    /// Resolves `url` (relative to `base_url`, when given) to a
    /// canonical URL. `for_import` distinguishes legacy `@import`
    /// (which may resolve partials differently) from `@use`/`@forward`.
    fn canonicalize(&self, url: &str, base_url: Option<&str>, for_import: bool) -> Option<String>;

    /// Loads already-canonicalized `canonical_url`, returning its
    /// source text, dialect, and a human-readable source URL for error
    /// messages and stack traces.
    fn load(&self, canonical_url: &str) -> Option<(String, Syntax, String)>;
}

/// An importer that resolves nothing; suitable for compiling a single
/// stylesheet with no `@use`/`@import` targets.
#[derive(Debug, Default)]
pub struct NoOpImporter;

impl Importer for NoOpImporter {
    fn canonicalize(&self, _url: &str, _base_url: Option<&str>, _for_import: bool) -> Option<String> {
        None
    }

    fn load(&self, _canonical_url: &str) -> Option<(String, Syntax, String)> {
        None
    }
}

/// External collaborator: turns source text plus its dialect into a
/// statement AST (spec §1: parsing is never the core's job). The
/// evaluator calls back into this every time `@use`/`@forward`/a
/// dynamic `@import` needs to load another stylesheet, since only the
/// top-level entry stylesheet arrives already parsed.
pub trait Parser: std::fmt::Debug {
    fn parse(&self, source: &str, syntax: Syntax, span: codemap::Span) -> SassResult<Vec<Statement>>;
}

/// A parser that rejects every load; suitable when the caller knows the
/// entry stylesheet has no `@use`/`@forward`/dynamic `@import`s.
#[derive(Debug, Default)]
pub struct NoOpParser;

impl Parser for NoOpParser {
    fn parse(&self, _source: &str, _syntax: Syntax, span: codemap::Span) -> SassResult<Vec<Statement>> {
        Err(SassError::runtime(
            "This build has no parser configured; cannot load another stylesheet.",
            span,
        ))
    }
}

/// Compiles a parsed stylesheet to a CSS tree (spec §6 "Entry points").
/// Returns the final tree plus the set of canonical URLs loaded along
/// the way (for `@use`/`@import` dependency tracking).
pub fn evaluate(
    stylesheet: &[Statement],
    options: &Options,
) -> SassResult<(CssTree, std::collections::HashSet<String>)> {
    let mut evaluator = Evaluator::new(options);
    evaluator.exec_block(stylesheet)?;
    evaluator.extensions.finish(&mut evaluator.tree)?;
    Ok((evaluator.tree, evaluator.loading))
}

/// Evaluates a single expression against a fresh environment seeded
/// with `options.variables` (spec §6: evaluate a standalone expression
/// against a fresh top-level environment).
pub fn evaluate_expression(expr: &ast::Expression, options: &Options) -> SassResult<Value> {
    let mut evaluator = Evaluator::new(options);
    evaluator.eval_expr(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::common::BinaryOp;
    use crate::value::Number;

    fn span() -> codemap::Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn evaluates_a_standalone_expression() {
        let options = Options::new(Box::new(NoOpImporter));
        let expr = Expression::BinaryOp {
            op: BinaryOp::Add,
            lhs: Box::new(Expression::Number {
                value: 1.0,
                numerator_units: vec![],
                denominator_units: vec![],
            }),
            rhs: Box::new(Expression::Number {
                value: 2.0,
                numerator_units: vec![],
                denominator_units: vec![],
            }),
            in_calculation: false,
            span: span(),
        };
        let value = evaluate_expression(&expr, &options).unwrap();
        assert_eq!(value, Value::Number(Number::unitless(3.0)));
    }

    #[test]
    fn compiles_an_empty_stylesheet() {
        let options = Options::new(Box::new(NoOpImporter));
        let (tree, loading) = evaluate(&[], &options).unwrap();
        assert!(tree.is_empty_of_output(tree.root()));
        assert!(loading.is_empty());
    }
}
