//! Callable invocation (spec §4.4): argument binding shared by
//! user-defined functions, user-defined mixins, and built-ins.

use std::collections::HashMap;

use codemap::Span;

use crate::common::{normalize_name, ListSeparator};
use crate::error::{SassError, SassResult};
use crate::value::{ArgumentList, Value};

/// One already-evaluated positional or named argument at a call site,
/// plus an optional `...` splat marker (spec §4.4 step 2).
#[derive(Debug, Clone)]
pub enum CallArg {
    Positional(Value),
    Named(String, Value),
    /// `...$list` or `...$map` — splats into positional args (list) or
    /// named args (map); an `ArgumentList` contributes both.
    Rest(Value),
}

/// The fully evaluated argument list at one call site, before binding
/// against a declared parameter list.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
    pub span: Span,
}

impl CallArgs {
    pub fn from_args(args: Vec<CallArg>, span: Span) -> SassResult<Self> {
        let mut positional = Vec::new();
        let mut named = Vec::new();
        for arg in args {
            match arg {
                CallArg::Positional(v) => positional.push(v),
                CallArg::Named(name, v) => named.push((normalize_name(&name), v)),
                CallArg::Rest(v) => splat_into(v, &mut positional, &mut named, span)?,
            }
        }
        Ok(CallArgs { positional, named, span })
    }
}

/// Splats one `...` rest argument (spec §4.4 step 2): a `List` becomes
/// additional positional args, a `Map` becomes named args (string keys
/// required), an `ArgumentList` contributes both.
fn splat_into(value: Value, positional: &mut Vec<Value>, named: &mut Vec<(String, Value)>, span: Span) -> SassResult<()> {
    match value {
        Value::ArgumentList(args) => {
            positional.extend(args.positional().iter().cloned());
            for (k, v) in args.keywords() {
                named.push((normalize_name(k), v.clone()));
            }
            Ok(())
        }
        Value::Map(map) => {
            for (k, v) in map.iter() {
                let key = match k {
                    Value::String(s, _) => s.clone(),
                    other => return Err(SassError::runtime(format!("{} is not a string in keyword rest argument.", other), span)),
                };
                named.push((normalize_name(&key), v.clone()));
            }
            Ok(())
        }
        other => {
            positional.extend(other.as_list());
            Ok(())
        }
    }
}

/// One declared parameter (spec §4.4 step 3): a name, optional default
/// expression value (pre-evaluated by the caller against the callable's
/// closure scope), and whether this is the trailing `...` rest param.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub default: Option<Value>,
    pub is_rest: bool,
}

impl Parameter {
    pub fn required(name: impl Into<String>) -> Self {
        Parameter {
            name: normalize_name(&name.into()),
            default: None,
            is_rest: false,
        }
    }

    pub fn with_default(name: impl Into<String>, default: Value) -> Self {
        Parameter {
            name: normalize_name(&name.into()),
            default: Some(default),
            is_rest: false,
        }
    }

    pub fn rest(name: impl Into<String>) -> Self {
        Parameter {
            name: normalize_name(&name.into()),
            default: None,
            is_rest: true,
        }
    }
}

/// A declared parameter list (spec §4.4: "FuncArgs").
#[derive(Debug, Clone, Default)]
pub struct FuncArgs {
    pub params: Vec<Parameter>,
}

impl FuncArgs {
    pub fn new(params: Vec<Parameter>) -> Self {
        FuncArgs { params }
    }

    fn rest_param(&self) -> Option<&Parameter> {
        self.params.last().filter(|p| p.is_rest)
    }

    fn named_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| !p.is_rest)
    }
}

/// Binds evaluated `CallArgs` against a declared `FuncArgs`, producing
/// the name -> value map a fresh call scope should be seeded with
/// (spec §4.4 steps 3-4).
pub fn bind_arguments(decl: &FuncArgs, name: &str, call: &CallArgs) -> SassResult<HashMap<String, Value>> {
    let mut bound: HashMap<String, Value> = HashMap::new();
    let named_params: Vec<&Parameter> = decl.named_params().collect();

    let mut positional_iter = call.positional.iter();
    for param in &named_params {
        if let Some(value) = positional_iter.next() {
            bound.insert(param.name.clone(), value.clone());
        }
    }

    let mut surplus_positional: Vec<Value> = positional_iter.cloned().collect();

    let mut unknown_named = Vec::new();
    for (arg_name, value) in &call.named {
        if bound.contains_key(arg_name) {
            return Err(SassError::runtime(
                format!("{} named argument \"${}\" was passed both by position and by name.", name, arg_name),
                call.span,
            ));
        }
        if named_params.iter().any(|p| &p.name == arg_name) {
            bound.insert(arg_name.clone(), value.clone());
        } else {
            unknown_named.push((arg_name.clone(), value.clone()));
        }
    }

    if let Some(rest) = decl.rest_param() {
        let rest_value = if unknown_named.is_empty() {
            Value::ArgumentList(ArgumentList::new(surplus_positional, Vec::new(), ListSeparator::Comma))
        } else {
            Value::ArgumentList(ArgumentList::new(surplus_positional, unknown_named, ListSeparator::Comma))
        };
        bound.insert(rest.name.clone(), rest_value);
    } else {
        if !surplus_positional.is_empty() {
            return Err(SassError::runtime(
                format!(
                    "{} only takes {} argument{}.",
                    name,
                    named_params.len(),
                    if named_params.len() == 1 { "" } else { "s" }
                ),
                call.span,
            ));
        }
        if !unknown_named.is_empty() {
            let names: Vec<String> = unknown_named.iter().map(|(n, _)| format!("${}", n)).collect();
            return Err(SassError::runtime(
                format!("{} has no argument{} named {}.", name, if names.len() == 1 { "" } else { "s" }, names.join(", ")),
                call.span,
            ));
        }
        surplus_positional.clear();
    }

    for param in &named_params {
        if !bound.contains_key(&param.name) {
            match &param.default {
                Some(default) => {
                    bound.insert(param.name.clone(), default.clone());
                }
                None => {
                    return Err(SassError::runtime(format!("Missing argument ${}.", param.name), call.span));
                }
            }
        }
    }

    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    fn span() -> Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn binds_positional_then_fills_defaults() {
        let decl = FuncArgs::new(vec![
            Parameter::required("a"),
            Parameter::with_default("b", Value::Number(Number::unitless(10.0))),
        ]);
        let call = CallArgs {
            positional: vec![Value::Number(Number::unitless(1.0))],
            named: Vec::new(),
            span: span(),
        };
        let bound = bind_arguments(&decl, "f", &call).unwrap();
        assert_eq!(bound["a"], Value::Number(Number::unitless(1.0)));
        assert_eq!(bound["b"], Value::Number(Number::unitless(10.0)));
    }

    #[test]
    fn surplus_positional_without_rest_param_is_an_error() {
        let decl = FuncArgs::new(vec![Parameter::required("a")]);
        let call = CallArgs {
            positional: vec![Value::Bool(true), Value::Bool(false)],
            named: Vec::new(),
            span: span(),
        };
        assert!(bind_arguments(&decl, "f", &call).is_err());
    }

    #[test]
    fn surplus_positional_collects_into_rest_arglist() {
        let decl = FuncArgs::new(vec![Parameter::required("a"), Parameter::rest("rest")]);
        let call = CallArgs {
            positional: vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)],
            named: Vec::new(),
            span: span(),
        };
        let bound = bind_arguments(&decl, "f", &call).unwrap();
        match &bound["rest"] {
            Value::ArgumentList(args) => assert_eq!(args.positional().len(), 2),
            other => panic!("expected arglist, got {:?}", other),
        }
    }

    #[test]
    fn unknown_named_argument_without_rest_param_is_an_error() {
        let decl = FuncArgs::new(vec![Parameter::required("a")]);
        let call = CallArgs {
            positional: vec![Value::Bool(true)],
            named: vec![("b".into(), Value::Bool(true))],
            span: span(),
        };
        assert!(bind_arguments(&decl, "f", &call).is_err());
    }
}
