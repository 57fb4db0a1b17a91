//! Built-in function registration (spec §4.4, §6): "each built-in
//! declares a name and one or more overloads ... the core resolves
//! overloads by arity/named-key signature at call time." This module
//! implements a representative subset — string, list, map, math, color,
//! and meta functions — enough to demonstrate the pipeline end to end;
//! a production build would register the full standard library the
//! same way.

pub mod color;
pub mod list;
pub mod map;
pub mod math;
pub mod meta;
pub mod string;

use codemap::Span;

use crate::args::{CallArgs, FuncArgs, Parameter};
use crate::common::normalize_name;
use crate::error::SassResult;
use crate::eval::Evaluator;
use crate::value::Value;

/// Binds `call_args` against a simple, all-defaults-known parameter
/// list and returns the bound values in declaration order — the common
/// case for built-ins, which rarely need a rest parameter (spec §4.4:
/// "Built-ins are registered as pairs (overload_signature, callback)").
pub fn bind_positional(name: &str, call_args: &CallArgs, params: &[(&str, Option<Value>)]) -> SassResult<Vec<Value>> {
    let decl = FuncArgs::new(
        params
            .iter()
            .map(|(n, default)| match default {
                Some(v) => Parameter::with_default(*n, v.clone()),
                None => Parameter::required(*n),
            })
            .collect(),
    );
    let bound = crate::args::bind_arguments(&decl, name, call_args)?;
    Ok(params
        .iter()
        .map(|(n, _)| bound[&normalize_name(n)].clone())
        .collect())
}

impl<'a> Evaluator<'a> {
    /// Tries host-registered functions first (spec §6: external
    /// embedders may register functions by name), then the built-in
    /// categories below. `Ok(None)` means "not a built-in"; the caller
    /// falls through to user-defined function lookup.
    pub fn eval_builtin_function(&mut self, name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
        let normalized = normalize_name(name);
        if let Some(host) = self.options.functions.iter().find(|f| normalize_name(&f.name) == normalized) {
            return (host.callback)(&args.positional).map(Some);
        }

        if let Some(v) = meta::dispatch(self, &normalized, args, span)? {
            return Ok(Some(v));
        }
        if let Some(v) = string::dispatch(&normalized, args, span)? {
            return Ok(Some(v));
        }
        if let Some(v) = list::dispatch(&normalized, args, span)? {
            return Ok(Some(v));
        }
        if let Some(v) = map::dispatch(&normalized, args, span)? {
            return Ok(Some(v));
        }
        if let Some(v) = math::dispatch(&normalized, args, span)? {
            return Ok(Some(v));
        }
        if let Some(v) = color::dispatch(&normalized, args, span)? {
            return Ok(Some(v));
        }
        Ok(None)
    }
}
