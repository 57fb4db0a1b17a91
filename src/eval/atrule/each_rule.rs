//! `@each $a, $b, ... in <expr>` (spec §4.2 `EachRule`).

use codemap::Span;

use crate::ast::expr::Expression;
use crate::ast::stmt::{EachPattern, Statement, CONTROL_FLOW_SCOPE};
use crate::error::SassResult;
use crate::eval::{Evaluator, Flow};
use crate::value::Value;

impl<'a> Evaluator<'a> {
    pub fn exec_each_rule(
        &mut self,
        pattern: &EachPattern,
        list: &Expression,
        body: &[Statement],
        span: Span,
    ) -> SassResult<Flow> {
        let list_value = self.eval_expr(list)?;
        for item in list_value.as_list() {
            self.env.push_scope(CONTROL_FLOW_SCOPE);
            self.bind_each_pattern(pattern, item, span);
            let flow = self.exec_block(body);
            self.env.pop_scope();
            match flow? {
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Normal => {}
            }
        }
        Ok(Flow::Normal)
    }

    /// A single pattern name binds the whole item; multiple names
    /// destructure it like a list, with missing trailing names bound to
    /// `null` (spec §4.2: "multi-name destructuring against a list").
    fn bind_each_pattern(&mut self, pattern: &EachPattern, item: Value, span: Span) {
        if pattern.names.len() == 1 {
            self.env.set_variable(&pattern.names[0], item, span);
            return;
        }
        let parts = item.as_list();
        for (i, name) in pattern.names.iter().enumerate() {
            let value = parts.get(i).cloned().unwrap_or(Value::Null);
            self.env.set_variable(name, value, span);
        }
    }
}
