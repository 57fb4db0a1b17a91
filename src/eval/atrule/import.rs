//! `@import` (spec §4.2 `ImportRule`): legacy, pre-module semantics. A
//! static CSS import is preserved literally in the output; anything
//! else is loaded, parsed, and run inline against the *current*
//! `env`/`tree` — no isolation, unlike `@use` (see `use_rule.rs`), so a
//! variable the imported file sets is visible to the importing
//! stylesheet afterward.

use codemap::Span;

use crate::ast::stmt::ImportArgument;
use crate::error::{SassError, SassResult};
use crate::eval::{Evaluator, Flow};

impl<'a> Evaluator<'a> {
    pub fn exec_import_rule(&mut self, imports: &[ImportArgument], span: Span) -> SassResult<Flow> {
        for import in imports {
            match import {
                ImportArgument::StaticCss(text) => {
                    let url = self.eval_interpolation_to_string(text, false)?;
                    self.push_static_import(url, span);
                }
                ImportArgument::Dynamic(url) => {
                    self.exec_dynamic_import(url, span)?;
                }
            }
        }
        Ok(Flow::Normal)
    }

    /// Static CSS imports are reordered to the top of the stylesheet,
    /// in their relative order, even when interspersed with other
    /// content at the root (spec §5). Imports nested inside a rule
    /// stay exactly where they're written.
    fn push_static_import(&mut self, url: String, span: Span) {
        if self.context.parent != self.tree.root() {
            self.tree.push_import(self.context.parent, url, span);
            return;
        }
        self.tree.insert_import(self.context.parent, self.next_import_index, url, span);
        self.next_import_index += 1;
    }

    fn exec_dynamic_import(&mut self, url: &str, span: Span) -> SassResult<Flow> {
        let canonical = self
            .options
            .importer
            .canonicalize(url, None, true)
            .ok_or_else(|| SassError::runtime(format!("Can't find stylesheet to import: \"{}\"", url), span))?;

        if self.loading_stack.contains(&canonical) {
            return Err(SassError::runtime(format!("Import loop: \"{}\" is already being loaded.", url), span));
        }
        self.loading.insert(canonical.clone());
        self.loading_stack.push(canonical.clone());

        let loaded = self
            .options
            .importer
            .load(&canonical)
            .ok_or_else(|| SassError::runtime(format!("Can't find stylesheet to import: \"{}\"", url), span));

        self.push_frame(format!("@import \"{}\"", url), span)?;
        let result = loaded
            .and_then(|(source, syntax, _source_url)| self.options.parser.parse(&source, syntax, span))
            .and_then(|body| self.exec_block(&body));
        self.pop_frame();

        self.loading_stack.pop();
        result
    }
}
