//! `sass:meta` built-ins: a representative subset. Unlike the other
//! categories, `call()` needs to invoke a user-defined callable, so this
//! module dispatches against `&mut Evaluator` rather than bound `Value`s
//! alone (spec §4.4: "the core resolves overloads ... at call time").

use codemap::Span;

use crate::args::CallArgs;
use crate::error::{SassError, SassResult};
use crate::eval::{Evaluator, Flow};
use crate::value::Value;

pub fn dispatch(ev: &mut Evaluator, name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let result = match name {
        "type-of" => {
            let value = first_positional(args, "value", span)?;
            Value::unquoted_string(value.type_name())
        }
        "inspect" => {
            let value = first_positional(args, "value", span)?;
            Value::unquoted_string(value.to_css_string(span).unwrap_or_else(|_| format!("{:?}", value)))
        }
        "unit" => return Ok(None),
        "feature-exists" => {
            let value = first_positional(args, "feature", span)?;
            let feature = value.to_css_string(span)?;
            Value::Bool(matches!(feature.as_str(), "global-variable-shadowing" | "extend-selector-pseudoclass" | "at-error" | "units-level-3"))
        }
        "variable-exists" => {
            let value = first_positional(args, "name", span)?;
            Value::Bool(ev.env.get_variable(&value.to_css_string(span)?).is_some())
        }
        "function-exists" => {
            let value = first_positional(args, "name", span)?;
            Value::Bool(ev.env.get_function(&value.to_css_string(span)?).is_some())
        }
        "mixin-exists" => {
            let value = first_positional(args, "name", span)?;
            Value::Bool(ev.env.get_mixin(&value.to_css_string(span)?).is_some())
        }
        "content-exists" => Value::Bool(ev.content_stack.last().map(Option::is_some).unwrap_or(false)),
        "get-function" => {
            let value = first_positional(args, "name", span)?;
            let fname = value.to_css_string(span)?;
            let callable = ev
                .env
                .get_function(&fname)
                .ok_or_else(|| SassError::runtime(format!("Function not found: {}", fname), span))?;
            Value::Function(callable)
        }
        "call" => {
            if args.positional.is_empty() {
                return Err(SassError::runtime("Missing argument $function.", span));
            }
            let target = args.positional[0].clone();
            let forwarded = CallArgs {
                positional: args.positional[1..].to_vec(),
                named: args.named.clone(),
                span,
            };
            let callable = match target {
                Value::Function(c) => c,
                other => {
                    let fname = other.to_css_string(span)?;
                    ev.env
                        .get_function(&fname)
                        .ok_or_else(|| SassError::runtime(format!("Function not found: {}", fname), span))?
                }
            };
            match ev.invoke_callable(&callable, &forwarded, None, true)? {
                Flow::Return(v) => v,
                Flow::Normal => return Err(SassError::runtime("Function finished without @return.", span)),
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn first_positional(args: &CallArgs, name: &'static str, span: Span) -> SassResult<Value> {
    args.positional
        .first()
        .cloned()
        .or_else(|| args.named.iter().find(|(n, _)| n == name).map(|(_, v)| v.clone()))
        .ok_or_else(|| SassError::runtime(format!("Missing argument ${}.", name), span))
}
