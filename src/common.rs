//! Small shared enums used by both the AST and the value system.

/// How a `List`'s elements are joined when serialized, and how two lists
/// combine under concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSeparator {
    Space,
    Comma,
    Slash,
    /// Not yet determined; a list with this separator may only ever hold
    /// zero or one element.
    Undecided,
}

impl ListSeparator {
    pub const fn as_str(self) -> &'static str {
        match self {
            ListSeparator::Space => " ",
            ListSeparator::Comma => ", ",
            ListSeparator::Slash => " / ",
            ListSeparator::Undecided => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Brackets {
    None,
    Bracketed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    Quoted,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    SingleEq,
    Or,
    And,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    /// Legacy CSS `/1` prefix, kept for calc-string compatibility.
    Div,
}

/// How a variable write resolves a name against the scope chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Popped with the enclosing block; declarations never escape.
    Local,
    /// Introduced by control flow (`@if`/`@each`/`@for`/`@while`): writes
    /// to names already bound in an outer scope escape upward, new names
    /// escape to the nearest enclosing semi-global parent.
    SemiGlobal,
    /// A module's top-level scope.
    Global,
}

/// Normalizes a Sass identifier so that `_` and `-` compare equal, per
/// spec §3 ("Names are normalized: `_` ≡ `-`").
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '_' { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_underscores_to_hyphens() {
        assert_eq!(normalize_name("foo_bar"), "foo-bar");
        assert_eq!(normalize_name("foo-bar"), "foo-bar");
        assert_eq!(normalize_name("__a_b-c"), "--a-b-c");
    }
}
