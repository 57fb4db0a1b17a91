//! `@if`/`@else if`/`@else` (spec §4.2 `IfRule`).

use crate::ast::expr::Expression;
use crate::ast::stmt::{Statement, CONTROL_FLOW_SCOPE};
use crate::error::SassResult;
use crate::eval::{Evaluator, Flow};

impl<'a> Evaluator<'a> {
    pub fn exec_if_rule(
        &mut self,
        clauses: &[(Expression, Vec<Statement>)],
        else_clause: &Option<Vec<Statement>>,
    ) -> SassResult<Flow> {
        for (condition, body) in clauses {
            if self.eval_expr(condition)?.is_truthy() {
                return self.exec_clause_scoped(body);
            }
        }
        match else_clause {
            Some(body) => self.exec_clause_scoped(body),
            None => Ok(Flow::Normal),
        }
    }

    fn exec_clause_scoped(&mut self, body: &[Statement]) -> SassResult<Flow> {
        self.env.push_scope(CONTROL_FLOW_SCOPE);
        let result = self.exec_block(body);
        self.env.pop_scope();
        result
    }
}
