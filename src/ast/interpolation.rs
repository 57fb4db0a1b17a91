//! Interpolation: "a sequence of literal text fragments and embedded
//! expressions" (spec GLOSSARY). Produced by the parser for anything
//! that can contain `#{ … }` — strings, selectors, at-rule parameters,
//! plain-CSS property names.

use codemap::Span;

use crate::ast::expr::Expression;

#[derive(Debug, Clone)]
pub enum InterpolationPart {
    Literal(String),
    Expr(Expression),
}

#[derive(Debug, Clone)]
pub struct Interpolation {
    pub parts: Vec<InterpolationPart>,
    pub span: Span,
}

impl Interpolation {
    pub fn literal(text: impl Into<String>, span: Span) -> Self {
        Interpolation {
            parts: vec![InterpolationPart::Literal(text.into())],
            span,
        }
    }

    pub fn new(parts: Vec<InterpolationPart>, span: Span) -> Self {
        Interpolation { parts, span }
    }

    /// True when this interpolation is just literal text with no
    /// embedded expressions — the common case, and the one the executor
    /// can skip the evaluator for entirely.
    pub fn is_plain(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, InterpolationPart::Literal(_)))
    }

    pub fn as_plain_text(&self) -> Option<String> {
        if !self.is_plain() {
            return None;
        }
        let mut s = String::new();
        for part in &self.parts {
            if let InterpolationPart::Literal(text) = part {
                s.push_str(text);
            }
        }
        Some(s)
    }
}
