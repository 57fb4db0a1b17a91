//! `@mixin`/`@include`/`@content` (spec §4.2 `MixinRule`, `IncludeRule`,
//! `ContentRule`: "the block is captured as a callable bound to the call
//! site's environment").

use std::rc::Rc;

use codemap::Span;

use crate::ast::expr::ArgExpr;
use crate::ast::stmt::{ArgumentSignature, Statement};
use crate::env::CallableRef;
use crate::error::{SassError, SassResult};
use crate::eval::{CapturedContent, Evaluator, Flow};

impl<'a> Evaluator<'a> {
    pub fn exec_mixin_rule(
        &mut self,
        name: &str,
        args: &ArgumentSignature,
        accepts_content: bool,
        body: &[Statement],
        span: Span,
    ) -> SassResult<Flow> {
        let callable = CallableRef {
            name: name.to_string(),
            params: Rc::new(args.clone()),
            body: Rc::new(body.to_vec()),
            closure: self.env.snapshot(),
            accepts_content,
        };
        self.env.declare_mixin(name, callable, span);
        Ok(Flow::Normal)
    }

    pub fn exec_include_rule(
        &mut self,
        namespace: &Option<String>,
        name: &str,
        args: &[ArgExpr],
        content: &Option<Vec<Statement>>,
        span: Span,
    ) -> SassResult<Flow> {
        let full_name = match namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        };
        let callable = self
            .env
            .get_mixin(&full_name)
            .ok_or_else(|| crate::env::Environment::undefined_mixin(name, span))?;

        if content.is_some() && !callable.accepts_content {
            return Err(SassError::runtime(
                format!("Mixin \"{}\" doesn't accept content blocks.", name),
                span,
            ));
        }

        let call_args = self.eval_args(args, span)?;
        let captured = content.as_ref().map(|body| CapturedContent {
            body: Rc::new(body.clone()),
            closure: self.env.snapshot(),
        });

        self.invoke_callable(&callable, &call_args, captured, false)
    }

    /// Content-block parameters (`@include foo using ($x) { ... }`) are
    /// out of scope here; arguments are still evaluated so a bad
    /// expression surfaces its error at the call site.
    pub fn exec_content_rule(&mut self, args: &[ArgExpr], span: Span) -> SassResult<Flow> {
        for arg in args {
            match arg {
                ArgExpr::Positional(e) | ArgExpr::Named(_, e) | ArgExpr::Rest(e) => {
                    self.eval_expr(e)?;
                }
            }
        }

        let captured = match self.content_stack.last() {
            Some(Some(c)) => c.clone(),
            _ => return Ok(Flow::Normal),
        };

        self.push_frame("@content", span)?;
        let (saved_scopes, saved_kinds) = self.env.swap_in_closure((*captured.closure).clone());
        self.content_stack.push(None);
        let result = self.exec_block(&captured.body);
        self.content_stack.pop();
        self.env.restore_scopes(saved_scopes, saved_kinds);
        self.pop_frame();
        result
    }
}
