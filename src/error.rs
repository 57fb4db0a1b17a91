//! Error types shared by every stage of evaluation.
//!
//! Three kinds of failure exist, matching the three ways evaluation can go
//! wrong: the core re-parsing interpolated text, the executor hitting a
//! genuine runtime fault, and a `Value` operation rejecting its operands.

use std::fmt;

use codemap::Span;

/// One frame of the evaluator's call stack, pushed on every mixin,
/// function, content-block, `@import`, and `@use` invocation.
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub name: String,
    pub span: Span,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A secondary span attached to a `RuntimeError`, with a short label
/// explaining what it points at (e.g. "first loaded here").
#[derive(Debug, Clone)]
pub struct SecondarySpan {
    pub label: String,
    pub span: Span,
}

#[derive(Debug, thiserror::Error)]
pub enum SassError {
    /// Raised only when the core re-parses interpolated text (selectors,
    /// media queries, `@at-root` queries). The span is synthesized from
    /// the outer interpolation's span plus the inner offset.
    #[error("Error: {message}")]
    ParseError { message: String, span: Span },

    /// Undefined variables/mixins/functions, bad arguments, cycle
    /// detection, a non-optional `@extend` that matched nothing, `@error`,
    /// etc. Carries a full stack trace for diagnostics.
    #[error("Error: {message}")]
    RuntimeError {
        message: String,
        primary_span: Span,
        secondary: Vec<SecondarySpan>,
        trace: Vec<StackFrame>,
    },

    /// Thrown from `Value` operations (`$x is not a number`, bad division,
    /// etc). Always caught by the executor, which attaches the current
    /// span and stack and re-raises as `RuntimeError`.
    #[error("{0}")]
    ScriptError(String),
}

impl SassError {
    pub fn parse<S: Into<String>>(message: S, span: Span) -> Self {
        SassError::ParseError {
            message: message.into(),
            span,
        }
    }

    pub fn runtime<S: Into<String>>(message: S, span: Span) -> Self {
        SassError::RuntimeError {
            message: message.into(),
            primary_span: span,
            secondary: Vec::new(),
            trace: Vec::new(),
        }
    }

    pub fn runtime_with_secondary<S: Into<String>>(
        message: S,
        span: Span,
        secondary: Vec<SecondarySpan>,
    ) -> Self {
        SassError::RuntimeError {
            message: message.into(),
            primary_span: span,
            secondary,
            trace: Vec::new(),
        }
    }

    pub fn script<S: Into<String>>(message: S) -> Self {
        SassError::ScriptError(message.into())
    }

    /// Attach the executor's current span and call stack to a
    /// `ScriptError`, turning it into a `RuntimeError`. Other variants
    /// pass through untouched.
    pub fn into_runtime(self, span: Span, trace: Vec<StackFrame>) -> Self {
        match self {
            SassError::ScriptError(message) => SassError::RuntimeError {
                message,
                primary_span: span,
                secondary: Vec::new(),
                trace,
            },
            SassError::RuntimeError {
                message,
                primary_span,
                secondary,
                trace: existing_trace,
            } => {
                let trace = if existing_trace.is_empty() {
                    trace
                } else {
                    existing_trace
                };
                SassError::RuntimeError {
                    message,
                    primary_span,
                    secondary,
                    trace,
                }
            }
            other => other,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            SassError::ParseError { span, .. } => Some(*span),
            SassError::RuntimeError { primary_span, .. } => Some(*primary_span),
            SassError::ScriptError(_) => None,
        }
    }
}

pub type SassResult<T> = Result<T, SassError>;
