//! `sass:math` built-ins: a representative subset.

use codemap::Span;

use crate::args::CallArgs;
use crate::builtin::bind_positional;
use crate::error::{SassError, SassResult};
use crate::value::{Number, Value};

pub fn dispatch(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let result = match name {
        "round" => unary_number(args, span, "round", |n| n.round())?,
        "ceil" => unary_number(args, span, "ceil", |n| n.ceil())?,
        "floor" => unary_number(args, span, "floor", |n| n.floor())?,
        "abs" => {
            let [n] = bind_positional("abs", args, &[("number", None)])?.try_into().unwrap();
            let number = n.as_number()?;
            Value::Number(Number::with_units(
                number.value().abs(),
                number.numerator_units().to_vec(),
                number.denominator_units().to_vec(),
            ))
        }
        "min" => extremum(args, span, "min", std::cmp::Ordering::Less)?,
        "max" => extremum(args, span, "max", std::cmp::Ordering::Greater)?,
        "percentage" => {
            let [n] = bind_positional("percentage", args, &[("number", None)])?.try_into().unwrap();
            let number = n.as_number()?;
            if !number.is_unitless() {
                return Err(SassError::runtime(format!("{} is not unitless.", number), span));
            }
            Value::Number(Number::with_unit(number.value() * 100.0, "%"))
        }
        "unit" => {
            let [n] = bind_positional("unit", args, &[("number", None)])?.try_into().unwrap();
            Value::quoted_string(n.as_number()?.unit_string())
        }
        "is-unitless" => {
            let [n] = bind_positional("is-unitless", args, &[("number", None)])?.try_into().unwrap();
            Value::Bool(n.as_number()?.is_unitless())
        }
        "compatible" => {
            let [a, b] = bind_positional("compatible", args, &[("number1", None), ("number2", None)])?.try_into().unwrap();
            Value::Bool(a.as_number()?.is_compatible_with(b.as_number()?))
        }
        "sqrt" => {
            let [n] = bind_positional("sqrt", args, &[("number", None)])?.try_into().unwrap();
            let number = n.as_number()?;
            if !number.is_unitless() {
                return Err(SassError::runtime(format!("{} is not unitless.", number), span));
            }
            Value::Number(Number::unitless(number.value().sqrt()))
        }
        "pow" => {
            let [base, exponent] = bind_positional("pow", args, &[("base", None), ("exponent", None)])?.try_into().unwrap();
            let base = base.as_number()?;
            let exponent = exponent.as_number()?;
            if !base.is_unitless() || !exponent.is_unitless() {
                return Err(SassError::runtime("Arguments to pow() must be unitless.", span));
            }
            Value::Number(Number::unitless(base.value().powf(exponent.value())))
        }
        "random" => return Err(SassError::script("random() is not supported without a random source.")),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn unary_number(args: &CallArgs, span: Span, name: &'static str, f: impl Fn(f64) -> f64) -> SassResult<Value> {
    let [n] = bind_positional(name, args, &[("number", None)])?.try_into().unwrap();
    let number = n.as_number()?;
    let _ = span;
    Ok(Value::Number(Number::with_units(
        f(number.value()),
        number.numerator_units().to_vec(),
        number.denominator_units().to_vec(),
    )))
}

fn extremum(args: &CallArgs, span: Span, name: &'static str, keep: std::cmp::Ordering) -> SassResult<Value> {
    if args.positional.is_empty() {
        return Err(SassError::runtime(format!("{}() requires at least one argument.", name), span));
    }
    let mut best = args.positional[0].clone();
    for candidate in &args.positional[1..] {
        let ordering = candidate.as_number()?.compare(best.as_number()?).map_err(|e| SassError::runtime(e.to_string(), span))?;
        if ordering == keep {
            best = candidate.clone();
        }
    }
    Ok(best)
}
