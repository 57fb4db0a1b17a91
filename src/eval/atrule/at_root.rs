//! `@at-root` (spec §4.2 `AtRootRule`): re-parents its body past
//! enclosing containers of the excluded categories, walking the CSS
//! tree's parent chain rather than the statement AST (the statement
//! executor has already built real tree nodes for every enclosing
//! context by the time `@at-root` runs).

use std::collections::HashSet;

use codemap::Span;

use crate::ast::interpolation::Interpolation;
use crate::ast::stmt::Statement;
use crate::css_tree::{CssNodeKind, CssTree, NodeId};
use crate::error::{SassError, SassResult};
use crate::eval::{Evaluator, Flow};

const ALL_CATEGORIES: [&str; 3] = ["rule", "media", "supports"];

fn node_category(tree: &CssTree, node: NodeId) -> &'static str {
    match &tree.node(node).kind {
        CssNodeKind::Media(_) => "media",
        CssNodeKind::Supports(_) => "supports",
        _ => "rule",
    }
}

/// Parses `(without: rule media)`/`(with: media)` into the set of
/// categories to exclude. `all` is shorthand for every category (spec
/// §4.2: "category-based exclusion model").
fn parse_at_root_query(text: &str, span: Span) -> SassResult<HashSet<String>> {
    let trimmed = text.trim().trim_start_matches('(').trim_end_matches(')');
    let mut parts = trimmed.splitn(2, ':');
    let key = parts.next().unwrap_or("").trim().to_lowercase();
    let value = parts.next().unwrap_or("").trim();
    let categories: HashSet<String> = value.split_whitespace().map(str::to_lowercase).collect();

    match key.as_str() {
        "without" => {
            if categories.contains("all") {
                Ok(ALL_CATEGORIES.iter().map(|s| s.to_string()).collect())
            } else {
                Ok(categories)
            }
        }
        "with" => {
            if categories.contains("all") {
                Ok(HashSet::new())
            } else {
                Ok(ALL_CATEGORIES.iter().filter(|c| !categories.contains(**c)).map(|s| s.to_string()).collect())
            }
        }
        _ => Err(SassError::parse(format!("Expected \"with\" or \"without\", got \"{}\".", key), span)),
    }
}

impl<'a> Evaluator<'a> {
    pub fn exec_at_root_rule(&mut self, query: &Option<Interpolation>, body: &[Statement], span: Span) -> SassResult<Flow> {
        let excluded = match query {
            Some(interp) => {
                let text = self.eval_interpolation_to_string(interp, false)?;
                parse_at_root_query(&text, span)?
            }
            None => {
                let mut default = HashSet::new();
                default.insert("rule".to_string());
                default
            }
        };

        let mut target = self.context.parent;
        while target != self.tree.root() && excluded.contains(node_category(&self.tree, target)) {
            target = self.tree.parent(target).unwrap_or_else(|| self.tree.root());
        }

        let mut new_context = self.context.clone();
        new_context.parent = target;
        if excluded.contains("rule") {
            new_context.style_rule = None;
            new_context.at_root_excluding_style_rule = true;
        }
        if excluded.contains("media") {
            new_context.media_queries = None;
        }

        self.with_context(new_context, |ev| ev.exec_block(body))
    }
}
