//! `@media`/`@supports`/generic unknown at-rules, and `@keyframes`
//! (spec §4.2 `MediaRule`, `SupportsRule`, `AtRule`).
//!
//! When one of these is written nested inside a style rule, it does not
//! nest in the *output*: it attaches as a sibling of that style rule, at
//! the style rule's own parent, with a fresh copy of the style rule
//! nested back inside it (spec §4.2, §9 "bubbling"). `@keyframes` is the
//! one exception — it never bubbles, and its children are keyframe
//! blocks (`50% { ... }`) rather than ordinary style rules.

use codemap::Span;

use crate::ast::interpolation::Interpolation;
use crate::ast::stmt::Statement;
use crate::css_tree::NodeId;
use crate::error::SassResult;
use crate::eval::{Context, Evaluator, Flow, StyleRuleContext};
use crate::media::{parse_media_query_list, MergeOutcome};

impl<'a> Evaluator<'a> {
    /// Pushes a node built by `push`, bubbling it past any enclosing
    /// style rule. Returns the node body statements should execute
    /// inside, plus a `StyleRuleContext` to install when bubbling
    /// re-wrapped a style rule (so `&` and `@extend` keep working inside
    /// it).
    pub(crate) fn push_bubbling_at_rule(
        &mut self,
        span: Span,
        push: impl FnOnce(&mut crate::css_tree::CssTree, NodeId, Span) -> NodeId,
    ) -> (NodeId, Option<StyleRuleContext>) {
        match self.context.style_rule.clone() {
            Some(rule) if !self.context.is_plain_css => {
                let outer_parent = self.tree.parent(rule.node).unwrap_or_else(|| self.tree.root());
                let at_rule_node = push(&mut self.tree, outer_parent, span);
                let selector = self.tree.selector(rule.node).clone();
                let inner_rule_node = self.tree.push_style_rule(at_rule_node, selector, span);
                self.extensions.register_style_rule(inner_rule_node, self.context.media_queries.clone());
                let new_rule_ctx = StyleRuleContext {
                    node: inner_rule_node,
                    original_selector: rule.original_selector,
                };
                (inner_rule_node, Some(new_rule_ctx))
            }
            _ => {
                let node = push(&mut self.tree, self.context.parent, span);
                (node, None)
            }
        }
    }

    pub fn exec_media_rule(&mut self, query: &Interpolation, body: &[Statement], span: Span) -> SassResult<Flow> {
        let query_text = self.eval_interpolation_to_string(query, true)?;
        let parsed = parse_media_query_list(&query_text, span)?;

        let effective = match &self.context.media_queries {
            Some(outer) => match outer.merge_or_nest(&parsed) {
                MergeOutcome::Merged(m) => m,
                MergeOutcome::Empty => return Ok(Flow::Normal),
                MergeOutcome::Unrepresentable => parsed,
            },
            None => parsed,
        };

        let (node, new_rule_ctx) = {
            let effective = effective.clone();
            self.push_bubbling_at_rule(span, move |tree, parent, span| tree.push_media(parent, effective, span))
        };

        let mut new_context = self.context.clone();
        new_context.parent = node;
        new_context.media_queries = Some(effective);
        if let Some(rule_ctx) = new_rule_ctx {
            new_context.style_rule = Some(rule_ctx);
        }
        self.with_context(new_context, |ev| ev.exec_block(body))
    }

    pub fn exec_supports_rule(&mut self, condition: &Interpolation, body: &[Statement], span: Span) -> SassResult<Flow> {
        let condition_text = self.eval_interpolation_to_string(condition, false)?;

        let (node, new_rule_ctx) = {
            let condition_text = condition_text.clone();
            self.push_bubbling_at_rule(span, move |tree, parent, span| tree.push_supports(parent, condition_text, span))
        };

        let mut new_context = self.context.clone();
        new_context.parent = node;
        if let Some(rule_ctx) = new_rule_ctx {
            new_context.style_rule = Some(rule_ctx);
        }
        self.with_context(new_context, |ev| ev.exec_block(body))
    }

    pub fn exec_at_rule(
        &mut self,
        name: &str,
        params: &Interpolation,
        body: &Option<Vec<Statement>>,
        span: Span,
    ) -> SassResult<Flow> {
        let params_text = self.eval_interpolation_to_string(params, false)?;

        if name.to_lowercase().ends_with("keyframes") {
            let node = self.tree.push_keyframes(self.context.parent, params_text, span);
            let mut new_context = self.context.clone();
            new_context.parent = node;
            new_context.style_rule = None;
            new_context.in_keyframes = true;
            let empty = Vec::new();
            let inner_body = body.as_ref().unwrap_or(&empty);
            return self.with_context(new_context, |ev| ev.exec_block(inner_body));
        }

        let has_block = body.is_some();
        let (node, new_rule_ctx) = {
            let name = name.to_string();
            let params_text = params_text.clone();
            self.push_bubbling_at_rule(span, move |tree, parent, span| tree.push_at_rule(parent, name, params_text, has_block, span))
        };

        let Some(body) = body else {
            return Ok(Flow::Normal);
        };

        let mut new_context: Context = self.context.clone();
        new_context.parent = node;
        new_context.in_unknown_at_rule = true;
        if let Some(rule_ctx) = new_rule_ctx {
            new_context.style_rule = Some(rule_ctx);
        }
        self.with_context(new_context, |ev| ev.exec_block(body))
    }
}
