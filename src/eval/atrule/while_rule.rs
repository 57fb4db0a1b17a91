//! `@while <expr>` (spec §4.2 `WhileRule`).

use crate::ast::expr::Expression;
use crate::ast::stmt::{Statement, CONTROL_FLOW_SCOPE};
use crate::error::SassResult;
use crate::eval::{Evaluator, Flow};

impl<'a> Evaluator<'a> {
    pub fn exec_while_rule(&mut self, condition: &Expression, body: &[Statement]) -> SassResult<Flow> {
        loop {
            if !self.eval_expr(condition)?.is_truthy() {
                return Ok(Flow::Normal);
            }
            self.env.push_scope(CONTROL_FLOW_SCOPE);
            let flow = self.exec_block(body);
            self.env.pop_scope();
            match flow? {
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Normal => {}
            }
        }
    }
}
