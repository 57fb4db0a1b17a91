//! `sass:string` built-ins: a representative subset.

use codemap::Span;

use crate::args::CallArgs;
use crate::builtin::bind_positional;
use crate::common::QuoteKind;
use crate::error::{SassError, SassResult};
use crate::value::{Number, Value};

pub fn dispatch(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let result = match name {
        "quote" => {
            let [s] = bind_positional("quote", args, &[("string", None)])?.try_into().unwrap();
            Value::String(s.to_css_string(span)?, QuoteKind::Quoted)
        }
        "unquote" => {
            let [s] = bind_positional("unquote", args, &[("string", None)])?.try_into().unwrap();
            Value::String(s.to_css_string(span)?, QuoteKind::None)
        }
        "to-upper-case" => {
            let [s] = bind_positional("to-upper-case", args, &[("string", None)])?.try_into().unwrap();
            string_map(s, span, |t| t.to_uppercase())?
        }
        "to-lower-case" => {
            let [s] = bind_positional("to-lower-case", args, &[("string", None)])?.try_into().unwrap();
            string_map(s, span, |t| t.to_lowercase())?
        }
        "str-length" => {
            let [s] = bind_positional("str-length", args, &[("string", None)])?.try_into().unwrap();
            Value::Number(Number::unitless(s.to_css_string(span)?.chars().count() as f64))
        }
        "str-slice" => {
            let [s, start, end] = bind_positional(
                "str-slice",
                args,
                &[("string", None), ("start-at", None), ("end-at", Some(Value::Number(Number::unitless(-1.0))))],
            )?
            .try_into()
            .unwrap();
            str_slice(s, start, end, span)?
        }
        "str-insert" => {
            let [s, insert, index] =
                bind_positional("str-insert", args, &[("string", None), ("insert", None), ("index", None)])?
                    .try_into()
                    .unwrap();
            str_insert(s, insert, index, span)?
        }
        "unique-id" => return Err(SassError::script("unique-id() is not supported without a random source.")),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn string_map(value: Value, span: Span, f: impl FnOnce(&str) -> String) -> SassResult<Value> {
    match value {
        Value::String(s, quote) => Ok(Value::String(f(&s), quote)),
        other => Err(SassError::runtime(format!("{} is not a string.", other.to_css_string(span)?), span)),
    }
}

fn normalize_index(index: &Number, len: usize, span: Span) -> SassResult<usize> {
    let i = index.value();
    if i.fract() != 0.0 {
        return Err(SassError::runtime(format!("{} is not an integer.", i), span));
    }
    let i = i as i64;
    let resolved = if i < 0 { len as i64 + i + 1 } else { i };
    if resolved < 1 || resolved as usize > len.max(1) {
        return Err(SassError::runtime(format!("Invalid index {} for a string of length {}.", i, len), span));
    }
    Ok(resolved as usize)
}

fn str_slice(s: Value, start: Value, end: Value, span: Span) -> SassResult<Value> {
    let (text, quote) = match s {
        Value::String(t, q) => (t, q),
        other => return Err(SassError::runtime(format!("{} is not a string.", other), span)),
    };
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let start_idx = normalize_index(start.as_number()?, len, span)?;
    let end_idx = normalize_index(end.as_number()?, len, span)?;
    if start_idx > end_idx || len == 0 {
        return Ok(Value::String(String::new(), quote));
    }
    let slice: String = chars[start_idx - 1..end_idx.min(len)].iter().collect();
    Ok(Value::String(slice, quote))
}

fn str_insert(s: Value, insert: Value, index: Value, span: Span) -> SassResult<Value> {
    let (text, quote) = match s {
        Value::String(t, q) => (t, q),
        other => return Err(SassError::runtime(format!("{} is not a string.", other), span)),
    };
    let insert_text = insert.to_css_string(span)?;
    let mut chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let idx = normalize_index(index.as_number()?, len, span)?;
    let insert_at = (idx - 1).min(chars.len());
    for (offset, c) in insert_text.chars().enumerate() {
        chars.insert(insert_at + offset, c);
    }
    Ok(Value::String(chars.into_iter().collect(), quote))
}
