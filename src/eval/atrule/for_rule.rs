//! `@for $i from <expr> [to|through] <expr>` (spec §4.2 `ForRule`).

use codemap::Span;

use crate::ast::expr::Expression;
use crate::ast::stmt::{Statement, CONTROL_FLOW_SCOPE};
use crate::error::SassResult;
use crate::eval::{Evaluator, Flow};
use crate::value::{Number, Value};

impl<'a> Evaluator<'a> {
    pub fn exec_for_rule(
        &mut self,
        variable: &str,
        from: &Expression,
        to: &Expression,
        is_exclusive: bool,
        body: &[Statement],
        span: Span,
    ) -> SassResult<Flow> {
        let from_value = self.eval_expr(from)?;
        let to_value = self.eval_expr(to)?;
        let from_n = from_value.as_number()?.value().round() as i64;
        let to_n = to_value.as_number()?.value().round() as i64;

        let range: Box<dyn Iterator<Item = i64>> = if from_n <= to_n {
            if is_exclusive {
                Box::new(from_n..to_n)
            } else {
                Box::new(from_n..=to_n)
            }
        } else if is_exclusive {
            Box::new((to_n + 1..=from_n).rev())
        } else {
            Box::new((to_n..=from_n).rev())
        };

        for i in range {
            self.env.push_scope(CONTROL_FLOW_SCOPE);
            self.env.set_variable(variable, Value::Number(Number::unitless(i as f64)), span);
            let flow = self.exec_block(body);
            self.env.pop_scope();
            match flow? {
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Normal => {}
            }
        }
        Ok(Flow::Normal)
    }
}
