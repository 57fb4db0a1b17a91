//! The evaluator (spec §4.1 + §4.2): walks `Statement`/`Expression` AST
//! nodes under a mutable `Environment`, appending CSS nodes into the
//! current parent and finalizing `@extend`s once a module is done.

pub mod atrule;
pub mod expr;
pub mod stmt;
pub mod visitor;

use std::collections::HashSet;
use std::rc::Rc;

use codemap::Span;

use crate::args::CallArgs;
use crate::ast::stmt::Statement;
use crate::css_tree::{CssTree, NodeId};
use crate::env::{CallableRef, Environment, Module, Scope};
use crate::error::{SassError, SassResult, StackFrame};
use crate::media::MediaQueryList;
use crate::options::Options;
use crate::selector::extend::ExtensionStore;
use crate::selector::SelectorList;
use crate::value::Value;

/// Guards against runaway mutual recursion between functions/mixins
/// (spec §7: "cycle detection" is one of `RuntimeError`'s causes).
const MAX_CALL_DEPTH: usize = 256;

/// The nearest enclosing style rule, tracked so `&` can be resolved
/// against its *original* (pre-extension) selector (spec §4.5) and so
/// `@extend` can find the rule to register against (spec §4.2
/// `ExtendRule`).
#[derive(Debug, Clone)]
pub struct StyleRuleContext {
    pub node: NodeId,
    pub original_selector: SelectorList,
}

/// Mutable context saved/restored around each rule handler (spec §9:
/// "a scoped-guard pattern ... rather than a mutable global").
#[derive(Debug, Clone)]
pub struct Context {
    pub parent: NodeId,
    pub style_rule: Option<StyleRuleContext>,
    pub media_queries: Option<MediaQueryList>,
    pub declaration_name: Option<String>,
    pub in_keyframes: bool,
    pub in_unknown_at_rule: bool,
    pub at_root_excluding_style_rule: bool,
    /// Plain CSS mode disables `&` (spec §4.2 "stylesheet ... governs
    /// behaviors like 'plain CSS mode disables `&`'").
    pub is_plain_css: bool,
    /// Set while a `@function` body is executing, so bare declarations
    /// are discarded instead of reaching the real tree (spec §4.2
    /// `FunctionRule`).
    pub suppress_css: bool,
}

impl Context {
    fn root(parent: NodeId) -> Self {
        Context {
            parent,
            style_rule: None,
            media_queries: None,
            declaration_name: None,
            in_keyframes: false,
            in_unknown_at_rule: false,
            at_root_excluding_style_rule: false,
            is_plain_css: false,
            suppress_css: false,
        }
    }
}

/// A `@content` block captured at the mixin-invocation site, closed
/// over that site's environment (spec §4.2 `IncludeRule`: "the block is
/// captured as a callable bound to the call site's environment").
#[derive(Debug, Clone)]
pub struct CapturedContent {
    pub body: Rc<Vec<Statement>>,
    pub closure: Rc<Vec<Scope>>,
}

/// Either a normal fall-through or a `@return` that should unwind to
/// the enclosing function call (spec §4.2: "Each iteration's return
/// value propagates outward").
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Evaluator<'a> {
    pub env: Environment,
    pub tree: CssTree,
    pub extensions: ExtensionStore,
    pub options: &'a Options,
    pub context: Context,
    pub stack: Vec<StackFrame>,
    pub content_stack: Vec<Option<CapturedContent>>,
    /// Every canonical URL loaded so far, accumulated and never
    /// removed (spec §6 "Entry points": `evaluate` returns this set for
    /// dependency tracking).
    pub loading: HashSet<String>,
    /// Canonical URLs currently on the `@use`/`@forward`/`@import` load
    /// stack, pushed before and popped after loading each one — distinct
    /// from `loading` because a diamond dependency legitimately loads
    /// the same URL twice without either load being *nested* in the
    /// other (spec §4.3, §4.2 `ImportRule`: cycle detection).
    pub loading_stack: Vec<String>,
    /// `@use ... with (...)`/`@forward ... with (...)` configuration
    /// currently in effect for whichever module is executing at top
    /// level; consulted by `!default` writes (spec §4.3 "Modules").
    pub module_config: std::collections::HashMap<String, Value>,
    /// Modules already built, keyed by canonical URL, so a second
    /// `@use`/`@forward` of the same URL returns the cached snapshot
    /// instead of re-running the stylesheet (spec §3, §4.3: "built at
    /// most once per (URL, configuration) and cached"). The stored
    /// configuration and span let a later, incompatible reload be
    /// reported as a fatal error pointing at both load sites.
    pub module_cache: std::collections::HashMap<String, LoadedModule>,
    /// Where the next top-level static `@import` should land among the
    /// root's children (spec §5: imports are reordered to the top of
    /// the stylesheet, in their relative order, even when interspersed
    /// with other content).
    pub next_import_index: usize,
}

/// A cached module plus the configuration it was built with and the
/// span of the `@use`/`@forward` that first loaded it.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub module: Module,
    pub config: std::collections::HashMap<String, Value>,
    pub span: Span,
}

impl<'a> Evaluator<'a> {
    pub fn new(options: &'a Options) -> Self {
        let mut tree = CssTree::new();
        let root = tree.root();
        let mut env = Environment::new();
        for (name, value) in &options.variables {
            env.set_variable(name, value.clone(), dummy_span());
        }
        Evaluator {
            env,
            tree,
            extensions: ExtensionStore::new(),
            options,
            context: Context::root(root),
            stack: Vec::new(),
            content_stack: Vec::new(),
            loading: HashSet::new(),
            loading_stack: Vec::new(),
            module_config: std::collections::HashMap::new(),
            module_cache: std::collections::HashMap::new(),
            next_import_index: 0,
        }
    }

    pub fn logger(&self) -> &dyn crate::logger::Logger {
        self.options.logger.as_ref()
    }

    pub fn warn(&self, message: impl Into<String>, span: Option<Span>) {
        if self.stack.is_empty() && self.options.quiet_deps {
            // no special-casing needed yet; quiet_deps narrows by source
            // file, which only the importer knows, so this is a no-op
            // placeholder for the common path.
        }
        self.logger().warn(&message.into(), span);
    }

    /// Executes a whole block, stopping early and propagating a
    /// `@return` value the moment one is produced.
    pub fn exec_block(&mut self, body: &[Statement]) -> SassResult<Flow> {
        for stmt in body {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                Flow::Return(v) => return Ok(Flow::Return(v)),
            }
        }
        Ok(Flow::Normal)
    }

    /// Runs `f` with `context` replacing the current one, always
    /// restoring the prior context afterward (spec §9 scoped-guard
    /// pattern), even if `f` returns an error.
    pub fn with_context<F, R>(&mut self, context: Context, f: F) -> SassResult<R>
    where
        F: FnOnce(&mut Self) -> SassResult<R>,
    {
        let saved = std::mem::replace(&mut self.context, context);
        let result = f(self);
        self.context = saved;
        result
    }

    pub fn push_frame(&mut self, name: impl Into<String>, span: Span) -> SassResult<()> {
        if self.stack.len() >= MAX_CALL_DEPTH {
            return Err(SassError::runtime("Maximum call stack size exceeded", span));
        }
        self.stack.push(StackFrame { name: name.into(), span });
        Ok(())
    }

    pub fn pop_frame(&mut self) {
        self.stack.pop();
    }

    pub fn attach_trace(&self, err: SassError, span: Span) -> SassError {
        err.into_runtime(span, self.stack.clone())
    }

    /// Invokes a user-defined function or mixin body against already
    /// built `CallArgs`, entering its closure and restoring the caller's
    /// scope chain afterward regardless of outcome (spec §4.4 step 5,
    /// §9 "closures capture environment"). Default-value expressions
    /// are evaluated lazily, inside the closure, only for parameters
    /// left unbound by the call — so a later default can reference an
    /// earlier positional argument.
    pub fn invoke_callable(
        &mut self,
        callable: &CallableRef,
        call_args: &CallArgs,
        content: Option<CapturedContent>,
        is_function: bool,
    ) -> SassResult<Flow> {
        self.push_frame(callable.name.clone(), call_args.span)?;
        let (saved_scopes, saved_kinds) = self.env.swap_in_closure((*callable.closure).clone());

        let bind_result = self.bind_and_install_args(&callable.params, &callable.name, call_args);
        let result = match bind_result {
            Ok(()) => {
                self.content_stack.push(content);
                let mut new_context = self.context.clone();
                if is_function {
                    new_context.suppress_css = true;
                }
                let r = self.with_context(new_context, |ev| ev.exec_block(&callable.body));
                self.content_stack.pop();
                r
            }
            Err(e) => Err(e),
        };

        self.env.restore_scopes(saved_scopes, saved_kinds);
        self.pop_frame();
        result
    }

    fn bind_and_install_args(
        &mut self,
        params: &crate::ast::stmt::ArgumentSignature,
        name: &str,
        call_args: &CallArgs,
    ) -> SassResult<()> {
        use crate::ast::stmt::ParamDecl;
        use crate::common::normalize_name;

        let named_params: Vec<&ParamDecl> = params.params.iter().filter(|p| !p.is_rest).collect();
        let rest_param = params.params.iter().find(|p| p.is_rest);

        let mut positional_iter = call_args.positional.iter();
        let mut bound_names: Vec<String> = Vec::new();
        for param in &named_params {
            if let Some(value) = positional_iter.next() {
                let key = normalize_name(&param.name);
                self.env.set_variable(&key, value.clone(), call_args.span);
                bound_names.push(key);
            }
        }
        let surplus_positional: Vec<Value> = positional_iter.cloned().collect();

        let mut unknown_named = Vec::new();
        for (arg_name, value) in &call_args.named {
            if bound_names.contains(arg_name) {
                return Err(SassError::runtime(
                    format!("{} named argument \"${}\" was passed both by position and by name.", name, arg_name),
                    call_args.span,
                ));
            }
            if named_params.iter().any(|p| normalize_name(&p.name) == *arg_name) {
                self.env.set_variable(arg_name, value.clone(), call_args.span);
                bound_names.push(arg_name.clone());
            } else {
                unknown_named.push((arg_name.clone(), value.clone()));
            }
        }

        if let Some(rest) = rest_param {
            let rest_value = Value::ArgumentList(crate::value::ArgumentList::new(
                surplus_positional,
                unknown_named,
                crate::common::ListSeparator::Comma,
            ));
            self.env.set_variable(&normalize_name(&rest.name), rest_value, call_args.span);
        } else {
            if !surplus_positional.is_empty() {
                return Err(SassError::runtime(
                    format!(
                        "{} only takes {} argument{}.",
                        name,
                        named_params.len(),
                        if named_params.len() == 1 { "" } else { "s" }
                    ),
                    call_args.span,
                ));
            }
            if !unknown_named.is_empty() {
                let names: Vec<String> = unknown_named.iter().map(|(n, _)| format!("${}", n)).collect();
                return Err(SassError::runtime(
                    format!("{} has no argument{} named {}.", name, if names.len() == 1 { "" } else { "s" }, names.join(", ")),
                    call_args.span,
                ));
            }
        }

        for param in &named_params {
            let key = normalize_name(&param.name);
            if bound_names.contains(&key) {
                continue;
            }
            match &param.default {
                Some(default_expr) => {
                    let value = self.eval_expr(default_expr)?;
                    self.env.set_variable(&key, value, call_args.span);
                }
                None => {
                    return Err(SassError::runtime(format!("Missing argument ${}.", key), call_args.span));
                }
            }
        }

        Ok(())
    }
}

fn dummy_span() -> Span {
    let mut map = codemap::CodeMap::new();
    let file = map.add_file("root".into(), String::new());
    file.span
}
