//! Hand-built `Statement`/`Expression` fragments for integration tests.
//! There's no in-crate parser to turn Sass source text into these (spec
//! §1 treats parsing as an external collaborator), so tests build the
//! AST a parser would have produced directly.

#![allow(dead_code)]

use std::collections::HashMap;

use sass_core::ast::interpolation::{Interpolation, InterpolationPart};
use sass_core::ast::{Expression, Statement};
use sass_core::common::QuoteKind;
use sass_core::{Importer, Parser, SassResult, Syntax};

pub fn span() -> codemap::Span {
    let mut map = codemap::CodeMap::new();
    let file = map.add_file("test".into(), "x".into());
    file.span
}

pub fn lit(text: &str) -> Interpolation {
    Interpolation::literal(text, span())
}

pub fn interp(parts: Vec<InterpolationPart>) -> Interpolation {
    Interpolation::new(parts, span())
}

pub fn str_expr(text: &str) -> Expression {
    Expression::Str {
        text: lit(text),
        quote: QuoteKind::None,
    }
}

pub fn number(value: f64) -> Expression {
    Expression::Number {
        value,
        numerator_units: vec![],
        denominator_units: vec![],
    }
}

pub fn var(name: &str) -> Expression {
    Expression::Variable {
        namespace: None,
        name: name.to_string(),
        span: span(),
    }
}

pub fn decl(name: &str, value: Expression) -> Statement {
    Statement::Declaration {
        name: lit(name),
        value: Some(value),
        body: vec![],
        span: span(),
    }
}

pub fn style_rule(selector: &str, body: Vec<Statement>) -> Statement {
    Statement::StyleRule {
        selector: lit(selector),
        body,
        span: span(),
    }
}

/// A fixed in-memory `Importer`/`Parser` pair for exercising `@use`/
/// `@forward`/`@import`: `load` hands back the canonical URL itself as
/// the "source text", and the paired `MapParser` looks the body up by
/// that same string instead of actually parsing anything.
#[derive(Debug, Clone)]
pub struct MapImporter {
    pub modules: HashMap<String, Vec<Statement>>,
}

impl Importer for MapImporter {
    fn canonicalize(&self, url: &str, _base_url: Option<&str>, _for_import: bool) -> Option<String> {
        self.modules.contains_key(url).then(|| url.to_string())
    }

    fn load(&self, canonical_url: &str) -> Option<(String, Syntax, String)> {
        self.modules
            .contains_key(canonical_url)
            .then(|| (canonical_url.to_string(), Syntax::Scss, canonical_url.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct MapParser {
    pub modules: HashMap<String, Vec<Statement>>,
}

impl Parser for MapParser {
    fn parse(&self, source: &str, _syntax: Syntax, span: codemap::Span) -> SassResult<Vec<Statement>> {
        self.modules
            .get(source)
            .cloned()
            .ok_or_else(|| sass_core::SassError::runtime(format!("no such stub module \"{}\"", source), span))
    }
}
