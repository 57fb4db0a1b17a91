//! Bundles the knobs a compilation entry point (spec §6) takes.

use std::collections::HashMap;

use crate::logger::{DeafLogger, Logger, TracingLogger, WarningDeduplicator};
use crate::value::Value;
use crate::{Importer, NoOpParser, Parser};

/// A host-registered built-in function, as opposed to one defined in
/// Sass source via `@function`.
pub struct HostFunction {
    pub name: String,
    pub callback: Box<dyn Fn(&[Value]) -> crate::error::SassResult<Value>>,
}

impl std::fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFunction").field("name", &self.name).finish()
    }
}

/// Configuration for one compilation, mirroring `grass`'s entry points
/// (`StyleSheet::from_path`/`StyleSheet::new`) but generalized to the
/// async-importer, pluggable-logger world spec §6 describes.
pub struct Options {
    pub importer: Box<dyn Importer>,
    /// Turns a loaded stylesheet's source text back into statements for
    /// `@use`/`@forward`/dynamic `@import` (spec §1: parsing stays an
    /// external collaborator even when the core has to trigger it).
    pub parser: Box<dyn Parser>,
    pub functions: Vec<HostFunction>,
    pub variables: HashMap<String, Value>,
    pub logger: Box<dyn Logger>,
    pub quiet_deps: bool,
    pub source_map: bool,
}

impl Options {
    pub fn new(importer: Box<dyn Importer>) -> Self {
        Options {
            importer,
            parser: Box::new(NoOpParser),
            functions: Vec::new(),
            variables: HashMap::new(),
            logger: Box::new(WarningDeduplicator::new(TracingLogger)),
            quiet_deps: false,
            source_map: false,
        }
    }

    pub fn silent(importer: Box<dyn Importer>) -> Self {
        Options {
            importer,
            parser: Box::new(NoOpParser),
            functions: Vec::new(),
            variables: HashMap::new(),
            logger: Box::new(DeafLogger),
            quiet_deps: true,
            source_map: false,
        }
    }

    pub fn with_parser(mut self, parser: Box<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_function(mut self, function: HostFunction) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn quiet_deps(mut self, quiet: bool) -> Self {
        self.quiet_deps = quiet;
        self
    }
}
