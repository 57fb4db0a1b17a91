//! Environment & module system (spec §4.3): lexical scopes, the
//! variable/function/mixin namespaces they carry, and the module table
//! that backs `@use`/`@forward`/`@import`.

use std::collections::HashMap;
use std::rc::Rc;

use codemap::Span;

use crate::ast::stmt::{ArgumentSignature, Statement};
use crate::common::{normalize_name, ScopeKind};
use crate::error::{SassError, SassResult};
use crate::value::Value;

/// A bound slot: the value plus the span where it was defined, carried
/// for error messages that point back at a declaration.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    pub value: T,
    pub span: Span,
}

/// A reference to a function/mixin body, closed over the scope chain
/// that existed when it was declared (spec §9 "closures capture
/// environment"). `body` is opaque to `env`/`value` — the evaluator
/// fills it in with its own AST pointer type; here it is only ever
/// cloned and compared by identity via `Rc`.
#[derive(Debug, Clone)]
pub struct CallableRef {
    pub name: String,
    pub params: Rc<ArgumentSignature>,
    pub body: Rc<Vec<Statement>>,
    pub closure: Rc<Vec<Scope>>,
    /// Mixins declared to accept `@content`; meaningless for functions.
    pub accepts_content: bool,
}

impl PartialEq for CallableRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

/// One lexical scope. `kind` decides how writes to unbound names behave
/// (spec §4.3 / §3 "Environment").
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub kind_is_global: bool,
    pub variables: HashMap<String, Slot<Value>>,
    pub functions: HashMap<String, Slot<CallableRef>>,
    pub mixins: HashMap<String, Slot<CallableRef>>,
}

impl Scope {
    fn new() -> Self {
        Scope::default()
    }
}

/// The fully-executed snapshot of one stylesheet: its public top-level
/// bindings, addressable by a namespace from a `@use`ing stylesheet
/// (spec §3 "Module").
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub variables: HashMap<String, Value>,
    pub functions: HashMap<String, CallableRef>,
    pub mixins: HashMap<String, CallableRef>,
}

impl Module {
    pub fn new() -> Self {
        Module::default()
    }
}

/// A stack of scopes plus the table of loaded modules, namespaced by the
/// name given in their `@use`/`@forward` clause (spec §4.3).
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    /// `kinds[i]` describes `scopes[i]`; kept parallel to `scopes` rather
    /// than folded into `Scope` so global/local/semi-global bookkeeping
    /// stays in one place.
    kinds: Vec<ScopeKind>,
    modules: HashMap<String, Module>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::new()],
            kinds: vec![ScopeKind::Global],
            modules: HashMap::new(),
        }
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new());
        self.kinds.push(kind);
    }

    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot pop the global scope");
        self.scopes.pop();
        self.kinds.pop();
    }

    /// Captures the current scope chain for a closure (spec §9: "a
    /// user-defined function stores a snapshot of the scope-chain's
    /// current frame pointers").
    pub fn snapshot(&self) -> Rc<Vec<Scope>> {
        Rc::new(self.scopes.clone())
    }

    /// Swaps the live scope chain for `new_scopes` plus one fresh local
    /// scope, returning the caller's chain so it can be restored with
    /// [`Environment::restore_scopes`]. Used to enter a callable's
    /// closure (spec §9: "binding new locals during the call never
    /// mutates the captured frames"). `Scope` is cheaply `Clone`, so
    /// this is a snapshot copy rather than a pointer-based chain;
    /// correct for a tree-walking interpreter, just not allocation-free.
    pub fn swap_in_closure(&mut self, new_scopes: Vec<Scope>) -> (Vec<Scope>, Vec<ScopeKind>) {
        let new_len = new_scopes.len();
        let saved_scopes = std::mem::replace(&mut self.scopes, new_scopes);
        let saved_kinds = std::mem::replace(&mut self.kinds, vec![ScopeKind::Global; new_len]);
        self.push_scope(ScopeKind::Local);
        (saved_scopes, saved_kinds)
    }

    pub fn restore_scopes(&mut self, scopes: Vec<Scope>, kinds: Vec<ScopeKind>) {
        self.scopes = scopes;
        self.kinds = kinds;
    }

    pub fn register_module(&mut self, namespace: String, module: Module) {
        self.modules.insert(namespace, module);
    }

    pub fn module(&self, namespace: &str) -> Option<&Module> {
        self.modules.get(namespace)
    }

    /// Builds the `Module` snapshot for the scope currently at index 0
    /// (the entrypoint/global scope of the stylesheet being executed).
    pub fn snapshot_as_module(&self) -> Module {
        let global = &self.scopes[0];
        Module {
            variables: global
                .variables
                .iter()
                .map(|(k, v)| (k.clone(), v.value.clone()))
                .collect(),
            functions: global
                .functions
                .iter()
                .map(|(k, v)| (k.clone(), v.value.clone()))
                .collect(),
            mixins: global
                .mixins
                .iter()
                .map(|(k, v)| (k.clone(), v.value.clone()))
                .collect(),
        }
    }

    fn split_qualified<'a>(name: &'a str) -> Option<(&'a str, &'a str)> {
        name.find('.').map(|idx| (&name[..idx], &name[idx + 1..]))
    }

    /// Reads a variable. Qualified names (`namespace.name`) look up the
    /// named module's exports only; unqualified names search local
    /// scopes outward to global (spec §4.3 "Name resolution").
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        let name = normalize_name(name);
        if let Some((ns, rest)) = Self::split_qualified(&name) {
            return self.modules.get(ns)?.variables.get(rest).cloned();
        }
        for scope in self.scopes.iter().rev() {
            if let Some(slot) = scope.variables.get(&name) {
                return Some(slot.value.clone());
            }
        }
        None
    }

    pub fn get_function(&self, name: &str) -> Option<CallableRef> {
        let name = normalize_name(name);
        if let Some((ns, rest)) = Self::split_qualified(&name) {
            return self.modules.get(ns)?.functions.get(rest).cloned();
        }
        for scope in self.scopes.iter().rev() {
            if let Some(slot) = scope.functions.get(&name) {
                return Some(slot.value.clone());
            }
        }
        None
    }

    pub fn get_mixin(&self, name: &str) -> Option<CallableRef> {
        let name = normalize_name(name);
        if let Some((ns, rest)) = Self::split_qualified(&name) {
            return self.modules.get(ns)?.mixins.get(rest).cloned();
        }
        for scope in self.scopes.iter().rev() {
            if let Some(slot) = scope.mixins.get(&name) {
                return Some(slot.value.clone());
            }
        }
        None
    }

    /// Declares/overwrites a function or mixin in the innermost scope
    /// (function and mixin declarations are always effectively global to
    /// the module they're written in, but are stored at whatever scope
    /// is current since only the module's top level ever declares one in
    /// practice).
    pub fn declare_function(&mut self, name: &str, callable: CallableRef, span: Span) {
        let name = normalize_name(name);
        self.current_mut().functions.insert(name, Slot { value: callable, span });
    }

    pub fn declare_mixin(&mut self, name: &str, callable: CallableRef, span: Span) {
        let name = normalize_name(name);
        self.current_mut().mixins.insert(name, Slot { value: callable, span });
    }

    fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack is never empty")
    }

    /// Plain `$x: v` write (spec §4.3): finds the nearest existing
    /// binding walking outward; if none exists, writes into the current
    /// scope (respecting semi-global escape: writes to a *new* name in a
    /// semi-global scope land in the nearest enclosing semi-global's
    /// parent, so the binding outlives the loop body per spec's "new
    /// names escape to the nearest enclosing semi-global parent").
    pub fn set_variable(&mut self, name: &str, value: Value, span: Span) {
        let name = normalize_name(name);
        for idx in (0..self.scopes.len()).rev() {
            if self.scopes[idx].variables.contains_key(&name) {
                self.scopes[idx].variables.insert(name, Slot { value, span });
                return;
            }
        }
        let target = self.semi_global_escape_target();
        self.scopes[target].variables.insert(name, Slot { value, span });
    }

    /// Index of the scope a brand-new binding in the current (possibly
    /// semi-global) scope should land in: the current scope itself,
    /// unless the current scope (and any run of semi-global scopes
    /// directly above it) is semi-global, in which case the write
    /// escapes past all of them to their nearest non-semi-global parent.
    fn semi_global_escape_target(&self) -> usize {
        let mut idx = self.scopes.len() - 1;
        while idx > 0 && matches!(self.kinds[idx], ScopeKind::SemiGlobal) {
            idx -= 1;
        }
        idx
    }

    /// `!global` write: the entrypoint module's global scope (index 0).
    pub fn set_global_variable(&mut self, name: &str, value: Value, span: Span) {
        let name = normalize_name(name);
        self.scopes[0].variables.insert(name, Slot { value, span });
    }

    /// `!default` write (spec §4.3, §8 "re-assignment is a no-op when a
    /// binding already exists and is not null"): stores only if the
    /// current binding is absent or null.
    pub fn set_default_variable(&mut self, name: &str, value: Value, span: Span) {
        let normalized = normalize_name(name);
        if let Some(existing) = self.get_variable(&normalized) {
            if !existing.is_null() {
                return;
            }
        }
        self.set_variable(&normalized, value, span);
    }

    /// Resolves a configuration-supplied value for a `!default` binding
    /// inside a freshly loaded module, preferring the configuration map
    /// over the stylesheet's own default expression (spec §4.3
    /// "Modules": "if the name is in the current module's configuration,
    /// take the configured value instead").
    pub fn set_default_variable_with_config(
        &mut self,
        name: &str,
        default: Value,
        configuration: &HashMap<String, Value>,
        span: Span,
    ) {
        let normalized = normalize_name(name);
        if let Some(configured) = configuration.get(&normalized) {
            self.set_variable(&normalized, configured.clone(), span);
            return;
        }
        self.set_default_variable(&normalized, default, span);
    }

    pub fn undefined_variable(name: &str, span: Span) -> SassError {
        SassError::runtime(format!("Undefined variable: \"${}\".", name), span)
    }

    pub fn undefined_function(name: &str, span: Span) -> SassError {
        SassError::runtime(format!("Undefined function: \"{}\".", name), span)
    }

    pub fn undefined_mixin(name: &str, span: Span) -> SassError {
        SassError::runtime(format!("Undefined mixin: \"{}\".", name), span)
    }

    pub fn require_variable(&self, name: &str, span: Span) -> SassResult<Value> {
        self.get_variable(name).ok_or_else(|| Self::undefined_variable(name, span))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn variable_write_finds_outer_binding_through_semi_global_scope() {
        let mut env = Environment::new();
        env.set_variable("x", Value::Bool(false), span());
        env.push_scope(ScopeKind::SemiGlobal);
        env.set_variable("x", Value::Bool(true), span());
        env.pop_scope();
        assert_eq!(env.get_variable("x"), Some(Value::Bool(true)));
    }

    #[test]
    fn new_name_in_semi_global_scope_escapes_to_enclosing_scope() {
        let mut env = Environment::new();
        env.push_scope(ScopeKind::SemiGlobal);
        env.set_variable("y", Value::Bool(true), span());
        env.pop_scope();
        assert_eq!(env.get_variable("y"), Some(Value::Bool(true)));
    }

    #[test]
    fn new_name_in_local_scope_does_not_escape() {
        let mut env = Environment::new();
        env.push_scope(ScopeKind::Local);
        env.set_variable("z", Value::Bool(true), span());
        env.pop_scope();
        assert_eq!(env.get_variable("z"), None);
    }

    #[test]
    fn underscore_and_hyphen_names_are_the_same_binding() {
        let mut env = Environment::new();
        env.set_variable("foo_bar", Value::Bool(true), span());
        assert_eq!(env.get_variable("foo-bar"), Some(Value::Bool(true)));
    }

    #[test]
    fn default_write_is_a_no_op_once_bound_to_non_null() {
        let mut env = Environment::new();
        env.set_variable("x", Value::Bool(false), span());
        env.set_default_variable("x", Value::Bool(true), span());
        assert_eq!(env.get_variable("x"), Some(Value::Bool(false)));
    }

    #[test]
    fn qualified_lookup_reads_only_the_named_module() {
        let mut env = Environment::new();
        let mut module = Module::new();
        module.variables.insert("color".into(), Value::Bool(true));
        env.register_module("colors".into(), module);
        assert_eq!(env.get_variable("colors.color"), Some(Value::Bool(true)));
        assert_eq!(env.get_variable("color"), None);
    }
}
