//! `sass:list` built-ins: a representative subset.

use codemap::Span;

use crate::args::CallArgs;
use crate::builtin::bind_positional;
use crate::common::{Brackets, ListSeparator};
use crate::error::{SassError, SassResult};
use crate::value::{Number, Value};

pub fn dispatch(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let result = match name {
        "length" => {
            let [list] = bind_positional("length", args, &[("list", None)])?.try_into().unwrap();
            Value::Number(Number::unitless(list.as_list().len() as f64))
        }
        "nth" => {
            let [list, n] = bind_positional("nth", args, &[("list", None), ("n", None)])?.try_into().unwrap();
            nth(list, n, span)?
        }
        "list-separator" => {
            let [list] = bind_positional("list-separator", args, &[("list", None)])?.try_into().unwrap();
            let sep = match list.separator() {
                ListSeparator::Comma => "comma",
                ListSeparator::Space => "space",
                ListSeparator::Slash => "slash",
                ListSeparator::Undecided => "space",
            };
            Value::unquoted_string(sep)
        }
        "is-bracketed" => {
            let [list] = bind_positional("is-bracketed", args, &[("list", None)])?.try_into().unwrap();
            Value::Bool(matches!(list, Value::List(_, _, Brackets::Bracketed)))
        }
        "join" => {
            let [list1, list2, separator, bracketed] = bind_positional(
                "join",
                args,
                &[
                    ("list1", None),
                    ("list2", None),
                    ("separator", Some(Value::unquoted_string("auto"))),
                    ("bracketed", Some(Value::unquoted_string("auto"))),
                ],
            )?
            .try_into()
            .unwrap();
            join(list1, list2, separator, bracketed, span)?
        }
        "append" => {
            let [list, val, separator] = bind_positional(
                "append",
                args,
                &[("list", None), ("val", None), ("separator", Some(Value::unquoted_string("auto")))],
            )?
            .try_into()
            .unwrap();
            let mut items = list.as_list();
            let sep = resolve_separator(&separator, list.separator(), span)?;
            items.push(val);
            Value::List(items, sep, Brackets::None)
        }
        "zip" => return Ok(None),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn nth(list: Value, n: Value, span: Span) -> SassResult<Value> {
    let items = list.as_list();
    let len = items.len();
    let index = n.as_number()?.value();
    if index.fract() != 0.0 || index == 0.0 {
        return Err(SassError::runtime(format!("{} is not an int.", index), span));
    }
    let index = index as i64;
    let resolved = if index < 0 { len as i64 + index } else { index - 1 };
    if resolved < 0 || resolved as usize >= len {
        return Err(SassError::runtime(format!("Invalid index {} for a list with {} elements.", index, len), span));
    }
    Ok(items[resolved as usize].clone())
}

fn resolve_separator(requested: &Value, fallback: ListSeparator, span: Span) -> SassResult<ListSeparator> {
    match requested {
        Value::String(s, _) if s == "comma" => Ok(ListSeparator::Comma),
        Value::String(s, _) if s == "space" => Ok(ListSeparator::Space),
        Value::String(s, _) if s == "slash" => Ok(ListSeparator::Slash),
        Value::String(s, _) if s == "auto" => Ok(fallback),
        other => Err(SassError::runtime(format!("{} is not \"space\", \"comma\", \"slash\", or \"auto\".", other), span)),
    }
}

fn resolve_brackets(requested: &Value, fallback: Brackets, span: Span) -> SassResult<Brackets> {
    match requested {
        Value::String(s, _) if s == "auto" => Ok(fallback),
        other => {
            if other.is_truthy() {
                Ok(Brackets::Bracketed)
            } else {
                let _ = span;
                Ok(Brackets::None)
            }
        }
    }
}

fn join(list1: Value, list2: Value, separator: Value, bracketed: Value, span: Span) -> SassResult<Value> {
    let mut items = list1.as_list();
    items.extend(list2.as_list());
    let sep_fallback = if !list1.as_list().is_empty() {
        list1.separator()
    } else {
        list2.separator()
    };
    let sep = resolve_separator(&separator, sep_fallback, span)?;
    let bracket_fallback = match &list1 {
        Value::List(_, _, b) => *b,
        _ => Brackets::None,
    };
    let brackets = resolve_brackets(&bracketed, bracket_fallback, span)?;
    Ok(Value::List(items, sep, brackets))
}
