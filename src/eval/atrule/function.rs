//! `@function` declaration (spec §4.2 `FunctionRule`). `@return` itself
//! is handled directly in `eval::stmt` since it is a one-line
//! `Flow::Return` construction with no further collaborators.

use std::rc::Rc;

use codemap::Span;

use crate::ast::stmt::{ArgumentSignature, Statement};
use crate::env::CallableRef;
use crate::error::SassResult;
use crate::eval::{Evaluator, Flow};

impl<'a> Evaluator<'a> {
    pub fn exec_function_rule(
        &mut self,
        name: &str,
        args: &ArgumentSignature,
        body: &[Statement],
        span: Span,
    ) -> SassResult<Flow> {
        let callable = CallableRef {
            name: name.to_string(),
            params: Rc::new(args.clone()),
            body: Rc::new(body.to_vec()),
            closure: self.env.snapshot(),
            accepts_content: false,
        };
        self.env.declare_function(name, callable, span);
        Ok(Flow::Normal)
    }
}
