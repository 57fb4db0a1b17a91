//! `@use`/`@forward` (spec §4.3 "Modules"): loads another stylesheet
//! into a fresh, isolated `Environment`, then exposes its public
//! top-level bindings as a `Module` — namespaced (`@use`), merged
//! unnamespaced (`@use ... as *`/`@forward`), or filtered and
//! re-exported with a prefix (`@forward ... as prefix-*`).

use std::collections::HashMap;

use codemap::Span;

use crate::ast::expr::Expression;
use crate::ast::stmt::{ForwardVisibility, UseNamespace};
use crate::common::normalize_name;
use crate::env::{Environment, Module};
use crate::error::{SassError, SassResult, SecondarySpan};
use crate::eval::{Evaluator, Flow, LoadedModule};
use crate::value::Value;

impl<'a> Evaluator<'a> {
    pub fn exec_use_rule(
        &mut self,
        url: &str,
        namespace: &UseNamespace,
        configuration: &[(String, Expression)],
        span: Span,
    ) -> SassResult<Flow> {
        let config = self.eval_configuration(configuration)?;
        let module = self.load_and_run_module(url, config, span, true)?;

        match namespace {
            UseNamespace::Unnamespaced => self.merge_module_unnamespaced(module, span),
            UseNamespace::Named(name) => self.env.register_module(name.clone(), module),
            UseNamespace::Default => self.env.register_module(default_namespace(url), module),
        }
        Ok(Flow::Normal)
    }

    pub fn exec_forward_rule(
        &mut self,
        url: &str,
        prefix: &Option<String>,
        visibility: &ForwardVisibility,
        configuration: &[(String, Expression)],
        span: Span,
    ) -> SassResult<Flow> {
        let config = self.eval_configuration(configuration)?;
        let module = self.load_and_run_module(url, config, span, false)?;
        let filtered = apply_forward_filter(module, prefix, visibility);
        self.merge_module_unnamespaced(filtered, span);
        Ok(Flow::Normal)
    }

    fn eval_configuration(&mut self, configuration: &[(String, Expression)]) -> SassResult<HashMap<String, Value>> {
        let mut config = HashMap::new();
        for (name, expr) in configuration {
            let value = self.eval_expr(expr)?;
            config.insert(normalize_name(name), value);
        }
        Ok(config)
    }

    /// Loads `url`, parses it, and executes it against a fresh,
    /// isolated environment (spec §4.3: a `@use`d/`@forward`ed module's
    /// top level runs in its own `Environment`, never polluting the
    /// loading stylesheet's scope directly). A module is built at most
    /// once per `(canonical URL, configuration)` (spec §3, §4.3,
    /// §8 invariant 6): a later load with the identical configuration
    /// returns the cached snapshot; a later load with a different one is
    /// a fatal error pointing at both load sites. The loaded module's
    /// CSS output still lands in the shared tree, at the first
    /// `@use`/`@forward` site that built it.
    fn load_and_run_module(&mut self, url: &str, config: HashMap<String, Value>, span: Span, for_use: bool) -> SassResult<Module> {
        let canonical = self
            .options
            .importer
            .canonicalize(url, None, false)
            .ok_or_else(|| SassError::runtime(format!("Can't find stylesheet to import: \"{}\"", url), span))?;

        if let Some(loaded) = self.module_cache.get(&canonical) {
            if loaded.config == config {
                return Ok(loaded.module.clone());
            }
            return Err(SassError::runtime_with_secondary(
                format!("\"{}\" was already loaded with a different configuration.", url),
                span,
                vec![SecondarySpan {
                    label: "first loaded here".to_string(),
                    span: loaded.span,
                }],
            ));
        }

        if self.loading_stack.contains(&canonical) {
            let keyword = if for_use { "@use" } else { "@forward" };
            return Err(SassError::runtime(format!("Module loop: {} \"{}\" is already being loaded.", keyword, url), span));
        }
        self.loading.insert(canonical.clone());
        self.loading_stack.push(canonical.clone());

        let loaded = self
            .options
            .importer
            .load(&canonical)
            .ok_or_else(|| SassError::runtime(format!("Can't find stylesheet to import: \"{}\"", url), span));

        let result = loaded.and_then(|(source, syntax, _source_url)| self.options.parser.parse(&source, syntax, span)).and_then(|body| {
            let saved_env = std::mem::replace(&mut self.env, Environment::new());
            let saved_config = std::mem::replace(&mut self.module_config, config.clone());
            let exec_result = self.exec_block(&body);
            let module = self.env.snapshot_as_module();
            self.env = saved_env;
            self.module_config = saved_config;
            exec_result.map(|_| module)
        });

        self.loading_stack.pop();

        if let Ok(module) = &result {
            self.module_cache.insert(
                canonical,
                LoadedModule {
                    module: module.clone(),
                    config,
                    span,
                },
            );
        }

        result
    }

    fn merge_module_unnamespaced(&mut self, module: Module, span: Span) {
        for (name, value) in module.variables {
            self.env.set_variable(&name, value, span);
        }
        for (name, callable) in module.functions {
            self.env.declare_function(&name, callable, span);
        }
        for (name, callable) in module.mixins {
            self.env.declare_mixin(&name, callable, span);
        }
    }
}

/// `@use "sass:math"` / `@use "foo/bar"` default to the last URL
/// segment, minus any leading partial underscore and file extension
/// (spec §4.3 "no `as` clause: the namespace defaults to the last URL
/// segment").
fn default_namespace(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or(url);
    let last = url.rsplit(':').next().unwrap_or(last);
    let last = last.trim_start_matches('_');
    match last.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => last.to_string(),
    }
}

/// Applies a `@forward`'s `show`/`hide` filter and `as prefix-*` prefix
/// (spec §4.3 `ForwardRule`).
fn apply_forward_filter(module: Module, prefix: &Option<String>, visibility: &ForwardVisibility) -> Module {
    let keep = |name: &str| match &visibility.show {
        Some(show) => show.iter().any(|n| normalize_name(n) == normalize_name(name)),
        None => !visibility.hide.iter().any(|n| normalize_name(n) == normalize_name(name)),
    };
    let with_prefix = |name: &str| match prefix {
        Some(p) => format!("{}{}", p, name),
        None => name.to_string(),
    };

    let mut out = Module::new();
    for (name, value) in module.variables {
        if keep(&name) {
            out.variables.insert(with_prefix(&name), value);
        }
    }
    for (name, callable) in module.functions {
        if keep(&name) {
            out.functions.insert(with_prefix(&name), callable);
        }
    }
    for (name, callable) in module.mixins {
        if keep(&name) {
            out.mixins.insert(with_prefix(&name), callable);
        }
    }
    out
}
