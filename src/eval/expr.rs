//! Expression evaluator (spec §4.1): reduces `Expression` to `Value`.

use codemap::Span;

use crate::args::{CallArg, CallArgs};
use crate::ast::expr::{ArgExpr, CallExpr, Expression};
use crate::ast::interpolation::{Interpolation, InterpolationPart};
use crate::common::{BinaryOp, Brackets, ListSeparator, QuoteKind, UnaryOp};
use crate::error::{SassError, SassResult};
use crate::eval::Evaluator;
use crate::value::calculation::{CalcOperand, Calculation};
use crate::value::{Number, Value};

impl<'a> Evaluator<'a> {
    pub fn eval_expr(&mut self, expr: &Expression) -> SassResult<Value> {
        match expr {
            Expression::Bool(b) => Ok(Value::Bool(*b)),
            Expression::Color(c) => Ok(Value::Color(c.clone())),
            Expression::Number {
                value,
                numerator_units,
                denominator_units,
            } => Ok(Value::Number(Number::with_units(
                *value,
                numerator_units.clone(),
                denominator_units.clone(),
            ))),
            Expression::Paren(inner) => self.eval_expr(inner),
            Expression::List {
                elements,
                separator,
                brackets,
                ..
            } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element)?);
                }
                Ok(Value::List(values, *separator, *brackets))
            }
            Expression::Map { pairs, span } => {
                let mut map = crate::value::SassMap::new();
                for (key_expr, value_expr) in pairs {
                    let key = self.eval_expr(key_expr)?;
                    let value = self.eval_expr(value_expr)?;
                    let key_span = key_expr.span().unwrap_or(*span);
                    map.insert_unique(key, value, key_span, key_span)?;
                }
                Ok(Value::Map(map))
            }
            Expression::Str { text, quote } => {
                let rendered = self.eval_interpolation_to_string(text, false)?;
                Ok(Value::String(rendered, *quote))
            }
            Expression::Variable { namespace, name, span } => {
                let full_name = match namespace {
                    Some(ns) => format!("{}.{}", ns, name),
                    None => name.clone(),
                };
                self.env
                    .get_variable(&full_name)
                    .ok_or_else(|| crate::env::Environment::undefined_variable(name, *span))
            }
            Expression::UnaryOp { op, operand, span } => {
                let value = self.eval_expr(operand)?;
                self.eval_unary(*op, value, *span)
            }
            Expression::BinaryOp {
                op,
                lhs,
                rhs,
                in_calculation,
                span,
            } => self.eval_binary(*op, lhs, rhs, *in_calculation, *span),
            Expression::If {
                condition,
                if_true,
                if_false,
                ..
            } => {
                if self.eval_expr(condition)?.is_truthy() {
                    self.eval_expr(if_true)
                } else {
                    self.eval_expr(if_false)
                }
            }
            Expression::FunctionCall(call) => self.eval_call(call),
            Expression::Calculation { name, args, span } => self.eval_calculation(*name, args, *span),
            Expression::SelectorQueryInterpolation(text) => {
                let rendered = self.eval_interpolation_to_string(text, true)?;
                Ok(Value::unquoted_string(rendered))
            }
            Expression::Supports(text) => {
                let rendered = self.eval_interpolation_to_string(text, false)?;
                Ok(Value::unquoted_string(rendered))
            }
            Expression::ParentSelector(span) => match &self.context.style_rule {
                Some(rule) if !self.context.is_plain_css => Ok(Value::unquoted_string(rule.original_selector.to_string())),
                _ => Ok(Value::Null),
            },
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, value: Value, span: Span) -> SassResult<Value> {
        match op {
            UnaryOp::Plus => match value {
                Value::Number(_) => Ok(value),
                other => Ok(Value::unquoted_string(format!("+{}", other.to_css_string(span)?))),
            },
            UnaryOp::Neg => value.neg(span),
            UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOp::Div => value.unary_div(span),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
        in_calculation: bool,
        span: Span,
    ) -> SassResult<Value> {
        // `and`/`or` short-circuit on truthiness (spec §4.1) before the
        // right operand is even evaluated.
        if op == BinaryOp::And {
            let left = self.eval_expr(lhs)?;
            return if left.is_truthy() { self.eval_expr(rhs) } else { Ok(left) };
        }
        if op == BinaryOp::Or {
            let left = self.eval_expr(lhs)?;
            return if left.is_truthy() { Ok(left) } else { self.eval_expr(rhs) };
        }

        let left = self.eval_expr(lhs)?;
        let right = self.eval_expr(rhs)?;
        match op {
            BinaryOp::SingleEq => left.single_eq(&right, span),
            BinaryOp::Eq => Ok(Value::Bool(left.equals(&right))),
            BinaryOp::Neq => Ok(Value::Bool(!left.equals(&right))),
            BinaryOp::Gt => Ok(Value::Bool(left.cmp(&right, span)? == std::cmp::Ordering::Greater)),
            BinaryOp::Gte => Ok(Value::Bool(left.cmp(&right, span)? != std::cmp::Ordering::Less)),
            BinaryOp::Lt => Ok(Value::Bool(left.cmp(&right, span)? == std::cmp::Ordering::Less)),
            BinaryOp::Lte => Ok(Value::Bool(left.cmp(&right, span)? != std::cmp::Ordering::Greater)),
            BinaryOp::Add => left.add(&right, span),
            BinaryOp::Sub => left.sub(&right, span),
            BinaryOp::Mul => left.mul(&right),
            BinaryOp::Div if in_calculation => left.div_without_deprecation(&right),
            BinaryOp::Div => left.div(&right, span, self.logger()),
            BinaryOp::Rem => left.rem(&right),
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        }
        .map_err(|e| self.attach_trace(e, span))
    }

    fn eval_call(&mut self, call: &CallExpr) -> SassResult<Value> {
        let args = self.eval_args(&call.args, call.span)?;

        if call.namespace.is_none() {
            if let Some(value) = self.eval_builtin_function(&call.name, &args, call.span)? {
                return Ok(value);
            }
        }

        let full_name = match &call.namespace {
            Some(ns) => format!("{}.{}", ns, call.name),
            None => call.name.clone(),
        };
        let callable = self
            .env
            .get_function(&full_name)
            .ok_or_else(|| crate::env::Environment::undefined_function(&call.name, call.span))?;

        match self.invoke_callable(&callable, &args, None, true)? {
            crate::eval::Flow::Return(v) => Ok(v),
            crate::eval::Flow::Normal => Err(SassError::runtime(
                format!("Function {} finished without @return.", call.name),
                call.span,
            )),
        }
    }

    pub fn eval_args(&mut self, args: &[ArgExpr], span: Span) -> SassResult<CallArgs> {
        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(match arg {
                ArgExpr::Positional(e) => CallArg::Positional(self.eval_expr(e)?),
                ArgExpr::Named(name, e) => CallArg::Named(name.clone(), self.eval_expr(e)?),
                ArgExpr::Rest(e) => CallArg::Rest(self.eval_expr(e)?),
            });
        }
        CallArgs::from_args(evaluated, span)
    }

    /// Value-mode interpolation (spec §4.1): each embedded expression is
    /// evaluated and serialized without quotes; pieces are concatenated.
    /// `warn_on_color` switches on selector/query-mode's extra check
    /// ("emits a deprecation warning when a bare color value appears").
    pub fn eval_interpolation_to_string(&mut self, interp: &Interpolation, warn_on_color: bool) -> SassResult<String> {
        if let Some(plain) = interp.as_plain_text() {
            return Ok(plain);
        }
        let mut out = String::new();
        for part in &interp.parts {
            match part {
                InterpolationPart::Literal(text) => out.push_str(text),
                InterpolationPart::Expr(expr) => {
                    let value = self.eval_expr(expr)?;
                    if warn_on_color && matches!(value, Value::Color(_)) {
                        self.warn(
                            "Using a color value directly in selector/media-query interpolation is deprecated.",
                            expr.span(),
                        );
                    }
                    out.push_str(&value.to_css_string(interp.span)?);
                }
            }
        }
        Ok(out)
    }

    fn eval_calculation(&mut self, name: crate::value::calculation::CalcName, args: &[Expression], span: Span) -> SassResult<Value> {
        let mut operands = Vec::with_capacity(args.len());
        for arg in args {
            operands.push(self.eval_calc_operand(arg, span)?);
        }
        Ok(Value::Calculation(Calculation::new(name, operands)))
    }

    fn eval_calc_operand(&mut self, expr: &Expression, span: Span) -> SassResult<CalcOperand> {
        match expr {
            Expression::BinaryOp { op, lhs, rhs, .. } => {
                let left = self.eval_calc_operand(lhs, span)?;
                let right = self.eval_calc_operand(rhs, span)?;
                let symbol = match op {
                    BinaryOp::Add => '+',
                    BinaryOp::Sub => '-',
                    BinaryOp::Mul => '*',
                    BinaryOp::Div => '/',
                    other => {
                        return Err(SassError::runtime(format!("{:?} is not allowed in a calculation.", other), span));
                    }
                };
                Ok(CalcOperand::Operation {
                    op: symbol,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            Expression::Calculation { name, args, span: inner_span } => {
                let nested = self.eval_calculation(*name, args, *inner_span)?;
                match nested {
                    Value::Calculation(calc) => Ok(CalcOperand::Calculation(Box::new(calc))),
                    _ => unreachable!("eval_calculation always returns Value::Calculation"),
                }
            }
            other => match self.eval_expr(other)? {
                Value::Number(n) => Ok(CalcOperand::Number(n)),
                Value::Calculation(c) => Ok(CalcOperand::Calculation(Box::new(c))),
                value => Ok(CalcOperand::Opaque(value.to_css_string(span)?)),
            },
        }
    }
}
