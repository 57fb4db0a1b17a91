//! Read-only statement-tree traversal (spec §9 "visitor scaffolding"):
//! a small visitor trait plus the recursive search utilities built on
//! it, kept separate from `stmt.rs` since nothing here mutates
//! evaluator state.

use crate::ast::stmt::Statement;

/// Implement to search a statement tree for something without hand-
/// rolling the recursion; `visit` returning `Some` stops the walk.
pub trait StatementVisitor<T> {
    fn visit(&mut self, stmt: &Statement) -> Option<T>;
}

/// Depth-first pre-order search over `body` and everything nested in
/// it. Stops at the first `Some` returned by `visitor` or found in a
/// nested body.
pub fn find_first<T>(body: &[Statement], visitor: &mut impl StatementVisitor<T>) -> Option<T> {
    for stmt in body {
        if let Some(found) = visitor.visit(stmt) {
            return Some(found);
        }
        if let Some(found) = visit_children(stmt, visitor) {
            return Some(found);
        }
    }
    None
}

fn visit_children<T>(stmt: &Statement, visitor: &mut impl StatementVisitor<T>) -> Option<T> {
    match stmt {
        Statement::Stylesheet { body, .. }
        | Statement::StyleRule { body, .. }
        | Statement::Declaration { body, .. }
        | Statement::EachRule { body, .. }
        | Statement::ForRule { body, .. }
        | Statement::WhileRule { body, .. }
        | Statement::MixinRule { body, .. }
        | Statement::FunctionRule { body, .. }
        | Statement::ContentBlock { body, .. }
        | Statement::MediaRule { body, .. }
        | Statement::SupportsRule { body, .. }
        | Statement::AtRootRule { body, .. } => find_first(body, visitor),

        Statement::IfRule { clauses, else_clause, .. } => {
            for (_, body) in clauses {
                if let Some(found) = find_first(body, visitor) {
                    return Some(found);
                }
            }
            else_clause.as_deref().and_then(|body| find_first(body, visitor))
        }

        Statement::IncludeRule { content, .. } => content.as_deref().and_then(|body| find_first(body, visitor)),

        Statement::AtRule { body, .. } => body.as_deref().and_then(|body| find_first(body, visitor)),

        Statement::VariableDeclaration { .. }
        | Statement::ContentRule { .. }
        | Statement::ReturnRule { .. }
        | Statement::ExtendRule { .. }
        | Statement::ImportRule { .. }
        | Statement::UseRule { .. }
        | Statement::ForwardRule { .. }
        | Statement::WarnRule { .. }
        | Statement::ErrorRule { .. }
        | Statement::DebugRule { .. }
        | Statement::LoudComment { .. }
        | Statement::SilentComment { .. } => None,
    }
}

/// Whether `body` uses `@content` anywhere that would resolve to *this*
/// body's caller — stops recursing at a nested `@mixin`/`@function`
/// declaration (those have their own, unrelated content slot) and at a
/// nested `@include ... { }`'s captured block (a `@content` there
/// belongs to that inner mixin call, not to us).
pub fn contains_content_rule(body: &[Statement]) -> bool {
    body.iter().any(contains_content_rule_stmt)
}

fn contains_content_rule_stmt(stmt: &Statement) -> bool {
    match stmt {
        Statement::ContentRule { .. } => true,
        Statement::MixinRule { .. } | Statement::FunctionRule { .. } | Statement::IncludeRule { .. } => false,

        Statement::Stylesheet { body, .. }
        | Statement::StyleRule { body, .. }
        | Statement::Declaration { body, .. }
        | Statement::EachRule { body, .. }
        | Statement::ForRule { body, .. }
        | Statement::WhileRule { body, .. }
        | Statement::ContentBlock { body, .. }
        | Statement::MediaRule { body, .. }
        | Statement::SupportsRule { body, .. }
        | Statement::AtRootRule { body, .. } => contains_content_rule(body),

        Statement::IfRule { clauses, else_clause, .. } => {
            clauses.iter().any(|(_, body)| contains_content_rule(body)) || else_clause.as_deref().is_some_and(contains_content_rule)
        }

        Statement::AtRule { body, .. } => body.as_deref().is_some_and(contains_content_rule),

        Statement::VariableDeclaration { .. }
        | Statement::ReturnRule { .. }
        | Statement::ExtendRule { .. }
        | Statement::ImportRule { .. }
        | Statement::UseRule { .. }
        | Statement::ForwardRule { .. }
        | Statement::WarnRule { .. }
        | Statement::ErrorRule { .. }
        | Statement::DebugRule { .. }
        | Statement::LoudComment { .. }
        | Statement::SilentComment { .. } => false,
    }
}
