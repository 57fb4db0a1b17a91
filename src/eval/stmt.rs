//! Statement execution (spec §4.2): one arm per `Statement` variant,
//! delegating to `eval::atrule` for anything with more than a couple of
//! collaborators.

use crate::ast::stmt::Statement;
use crate::error::{SassError, SassResult};
use crate::eval::{Evaluator, Flow, StyleRuleContext};
use crate::selector::parse::parse_selector_list;
use crate::selector::extend::Extension;

impl<'a> Evaluator<'a> {
    pub fn exec_stmt(&mut self, stmt: &Statement) -> SassResult<Flow> {
        match stmt {
            Statement::Stylesheet { body, .. } => self.exec_block(body),

            Statement::StyleRule { selector, body, span } => self.exec_style_rule(selector, body, *span),

            Statement::Declaration { name, value, body, span } => self.exec_declaration(name, value, body, *span),

            Statement::VariableDeclaration {
                namespace,
                name,
                value,
                is_global,
                is_default,
                span,
            } => self.exec_variable_declaration(namespace, name, value, *is_global, *is_default, *span),

            Statement::IfRule { clauses, else_clause, .. } => self.exec_if_rule(clauses, else_clause),

            Statement::EachRule { pattern, list, body, span } => self.exec_each_rule(pattern, list, body, *span),

            Statement::ForRule {
                variable,
                from,
                to,
                is_exclusive,
                body,
                span,
            } => self.exec_for_rule(variable, from, to, *is_exclusive, body, *span),

            Statement::WhileRule { condition, body, .. } => self.exec_while_rule(condition, body),

            Statement::MixinRule {
                name,
                args,
                accepts_content,
                body,
                span,
            } => self.exec_mixin_rule(name, args, *accepts_content, body, *span),

            Statement::IncludeRule {
                namespace,
                name,
                args,
                content,
                span,
            } => self.exec_include_rule(namespace, name, args, content, *span),

            // Transparent: `@include foo { ... }`'s captured block runs in
            // the environment `@content` swaps in, not as a container of
            // its own — by the time this variant is reached directly (as
            // opposed to via `content_stack`), it is just an ordinary
            // nested block.
            Statement::ContentBlock { body, .. } => self.exec_block(body),

            Statement::ContentRule { args, span } => self.exec_content_rule(args, *span),

            Statement::FunctionRule { name, args, body, span } => self.exec_function_rule(name, args, body, *span),

            Statement::ReturnRule { value, .. } => {
                let v = self.eval_expr(value)?;
                Ok(Flow::Return(v))
            }

            Statement::ExtendRule { selector, is_optional, span } => self.exec_extend_rule(selector, *is_optional, *span),

            Statement::MediaRule { query, body, span } => self.exec_media_rule(query, body, *span),

            Statement::SupportsRule { condition, body, span } => self.exec_supports_rule(condition, body, *span),

            Statement::AtRule { name, params, body, span } => self.exec_at_rule(name, params, body, *span),

            Statement::AtRootRule { query, body, span } => self.exec_at_root_rule(query, body, *span),

            Statement::ImportRule { imports, span } => self.exec_import_rule(imports, *span),

            Statement::UseRule {
                url,
                namespace,
                configuration,
                span,
            } => self.exec_use_rule(url, namespace, configuration, *span),

            Statement::ForwardRule {
                url,
                prefix,
                visibility,
                configuration,
                span,
            } => self.exec_forward_rule(url, prefix, visibility, configuration, *span),

            Statement::WarnRule { message, span } => {
                let v = self.eval_expr(message)?;
                self.warn(v.to_string(), Some(*span));
                Ok(Flow::Normal)
            }

            Statement::ErrorRule { message, span } => {
                let v = self.eval_expr(message)?;
                Err(SassError::runtime(v.to_string(), *span))
            }

            Statement::DebugRule { message, span } => {
                let v = self.eval_expr(message)?;
                self.logger().debug(&v.to_string(), Some(*span));
                Ok(Flow::Normal)
            }

            Statement::LoudComment { text, span } => {
                let rendered = self.eval_interpolation_to_string(text, false)?;
                self.tree.push_comment(self.context.parent, rendered, *span);
                Ok(Flow::Normal)
            }

            Statement::SilentComment { .. } => Ok(Flow::Normal),
        }
    }

    fn exec_style_rule(&mut self, selector: &crate::ast::interpolation::Interpolation, body: &[Statement], span: codemap::Span) -> SassResult<Flow> {
        let selector_text = self.eval_interpolation_to_string(selector, false)?;
        let parsed = parse_selector_list(&selector_text, span)?;

        if self.context.in_keyframes {
            let node = self.tree.push_keyframe_block(self.context.parent, selector_text.trim().to_string(), span);
            let mut new_context = self.context.clone();
            new_context.parent = node;
            return self.with_context(new_context, |ev| ev.exec_block(body));
        }

        let resolved = match &self.context.style_rule {
            Some(rule) if !self.context.is_plain_css => parsed.resolve_parent(&rule.original_selector, self.context.at_root_excluding_style_rule),
            _ => parsed,
        };

        // A style rule nested inside another one never nests in the
        // output — its resolved selector already folds the parent in,
        // so it bubbles out to sit beside the enclosing rule rather
        // than inside it (mirrors `push_bubbling_at_rule`).
        let target_parent = match &self.context.style_rule {
            Some(rule) if !self.context.is_plain_css => self.tree.parent(rule.node).unwrap_or_else(|| self.tree.root()),
            _ => self.context.parent,
        };

        let node = self.tree.push_style_rule(target_parent, resolved.clone(), span);
        self.extensions.register_style_rule(node, self.context.media_queries.clone());

        let mut new_context = self.context.clone();
        new_context.parent = node;
        new_context.style_rule = Some(StyleRuleContext { node, original_selector: resolved });
        new_context.declaration_name = None;
        new_context.at_root_excluding_style_rule = false;
        self.with_context(new_context, |ev| ev.exec_block(body))
    }

    fn exec_declaration(
        &mut self,
        name: &crate::ast::interpolation::Interpolation,
        value: &Option<crate::ast::expr::Expression>,
        body: &[Statement],
        span: codemap::Span,
    ) -> SassResult<Flow> {
        let name_text = self.eval_interpolation_to_string(name, false)?;
        let full_name = match &self.context.declaration_name {
            Some(prefix) => format!("{}-{}", prefix, name_text),
            None => name_text,
        };

        if let Some(value_expr) = value {
            let v = self.eval_expr(value_expr)?;

            if full_name.starts_with("--") && v.is_blank() {
                return Err(SassError::runtime(
                    format!("Custom property value for \"{}\" must be non-empty.", full_name),
                    span,
                ));
            }

            if !self.context.suppress_css && (!v.is_blank() || v.is_empty_list()) {
                let css_value = v.to_css_string(span)?;
                self.tree.push_declaration(self.context.parent, full_name.clone(), css_value, span);
            }
        }

        if body.is_empty() {
            return Ok(Flow::Normal);
        }

        let mut new_context = self.context.clone();
        new_context.declaration_name = Some(full_name);
        self.with_context(new_context, |ev| ev.exec_block(body))
    }

    fn exec_variable_declaration(
        &mut self,
        namespace: &Option<String>,
        name: &str,
        value: &crate::ast::expr::Expression,
        is_global: bool,
        is_default: bool,
        span: codemap::Span,
    ) -> SassResult<Flow> {
        if namespace.is_some() {
            return Err(SassError::runtime(format!("Cannot modify \"${}\": it's read-only from this module.", name), span));
        }

        let v = self.eval_expr(value)?;

        if is_default {
            if self.module_config.is_empty() {
                self.env.set_default_variable(name, v, span);
            } else {
                self.env.set_default_variable_with_config(name, v, &self.module_config.clone(), span);
            }
        } else if is_global {
            self.env.set_global_variable(name, v, span);
        } else {
            self.env.set_variable(name, v, span);
        }

        Ok(Flow::Normal)
    }

    /// `@extend` (spec §4.2 `ExtendRule`, §4.5): the extended selector
    /// must reduce to a compound selector made of a single simple
    /// selector per comma-separated branch — anything more is a
    /// `RuntimeError`, never silently narrowed.
    fn exec_extend_rule(&mut self, selector: &crate::ast::interpolation::Interpolation, is_optional: bool, span: codemap::Span) -> SassResult<Flow> {
        let Some(rule) = self.context.style_rule.clone() else {
            return Err(SassError::runtime("@extend may only be used within style rules.", span));
        };

        let text = self.eval_interpolation_to_string(selector, false)?;
        let parsed = parse_selector_list(&text, span)?;

        for complex in &parsed.complexes {
            let [(None, compound)] = complex.components.as_slice() else {
                return Err(SassError::runtime("@extend may only be used with a compound selector of a single simple selector.", span));
            };
            let [target] = compound.simples.as_slice() else {
                return Err(SassError::runtime("@extend may only be used with a compound selector of a single simple selector.", span));
            };

            self.extensions.register_extend(Extension {
                extender: rule.original_selector.clone(),
                target: target.clone(),
                is_optional,
                media_context: self.context.media_queries.clone(),
                span,
            });
        }

        Ok(Flow::Normal)
    }
}
