//! Selectors — spec §3 "Selector (nested form)" and §4.5.
//!
//! `SelectorList -> ComplexSelector -> CompoundSelector -> simple
//! selectors`. The full CSS/Sass selector grammar is the parser's job
//! (out of scope per spec §1), but the evaluator owns one genuinely
//! in-scope piece of selector parsing: spec §7 calls out that a
//! `ParseError` is "raised only when the core re-parses interpolated
//! text (selectors, media queries, `@at-root` queries)" — i.e. after
//! `#{...}` has been substituted into selector text, the executor must
//! turn that text back into a `SelectorList` before resolving `&` and
//! registering it. `parse::parse_selector_list` is that reparse step: a
//! selector grammar small enough to cover what interpolation can
//! legitimately produce (combinators, compound selectors, simple
//! selectors including the handful of selectors that nest another
//! selector), not a general CSS selector parser.

pub mod extend;
pub mod parse;
pub mod unify;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    FollowingSibling,
}

impl Combinator {
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::NextSibling => " + ",
            Combinator::FollowingSibling => " ~ ",
        }
    }
}

/// One simple selector. Pseudo-classes that contain selectors (`:not`,
/// `:is`, `:matches`, `:has`, `:nth-*(of S)`) store a fully parsed
/// `SelectorList` (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Type { namespace: Option<String>, name: String },
    Universal { namespace: Option<String> },
    Id(String),
    Class(String),
    Placeholder(String),
    Attribute { name: String, op: Option<String>, value: Option<String> },
    /// `&`
    Parent,
    Pseudo {
        name: String,
        is_class: bool,
        argument: Option<String>,
        selector: Option<Box<SelectorList>>,
    },
}

impl SimpleSelector {
    /// Two simple selectors of these kinds may never coexist twice in
    /// the same compound selector: two `Type`s, two `Universal`s, or two
    /// pseudo-elements (spec §4.5: "respecting uniqueness of
    /// type/universal/pseudo-element").
    fn exclusive_kind(&self) -> Option<&'static str> {
        match self {
            SimpleSelector::Type { .. } => Some("type"),
            SimpleSelector::Universal { .. } => Some("universal"),
            SimpleSelector::Pseudo { is_class: false, .. } => Some("pseudo-element"),
            _ => None,
        }
    }

    pub fn contains_parent(&self) -> bool {
        match self {
            SimpleSelector::Parent => true,
            SimpleSelector::Pseudo { selector: Some(s), .. } => s.contains_parent(),
            _ => false,
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Type { namespace, name } => {
                if let Some(ns) = namespace {
                    write!(f, "{}|{}", ns, name)
                } else {
                    write!(f, "{}", name)
                }
            }
            SimpleSelector::Universal { namespace } => {
                if let Some(ns) = namespace {
                    write!(f, "{}|*", ns)
                } else {
                    write!(f, "*")
                }
            }
            SimpleSelector::Id(name) => write!(f, "#{}", name),
            SimpleSelector::Class(name) => write!(f, ".{}", name),
            SimpleSelector::Placeholder(name) => write!(f, "%{}", name),
            SimpleSelector::Attribute { name, op, value } => match (op, value) {
                (Some(op), Some(value)) => write!(f, "[{}{}\"{}\"]", name, op, value),
                _ => write!(f, "[{}]", name),
            },
            SimpleSelector::Parent => write!(f, "&"),
            SimpleSelector::Pseudo {
                name,
                is_class,
                argument,
                selector,
            } => {
                write!(f, "{}{}", if *is_class { ":" } else { "::" }, name)?;
                if argument.is_some() || selector.is_some() {
                    write!(f, "(")?;
                    if let Some(arg) = argument {
                        write!(f, "{}", arg)?;
                    }
                    if let Some(sel) = selector {
                        write!(f, "{}", sel)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

/// A set of simple selectors applied to one element (`a.cls:hover`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn new(simples: Vec<SimpleSelector>) -> Self {
        CompoundSelector { simples }
    }

    pub fn contains_parent(&self) -> bool {
        self.simples.iter().any(SimpleSelector::contains_parent)
    }

    pub fn contains(&self, target: &SimpleSelector) -> bool {
        self.simples.contains(target)
    }

    /// Merges two compound selectors' simple-selector sets, respecting
    /// uniqueness of type/universal/pseudo-element (spec §4.5). Returns
    /// `None` on an incompatible merge (e.g. two different type
    /// selectors).
    pub fn unify(&self, other: &CompoundSelector) -> Option<CompoundSelector> {
        let mut merged = self.simples.clone();
        for simple in &other.simples {
            if merged.contains(simple) {
                continue;
            }
            if let Some(kind) = simple.exclusive_kind() {
                if merged.iter().any(|s| s.exclusive_kind() == Some(kind) && s != simple) {
                    return None;
                }
            }
            merged.push(simple.clone());
        }
        Some(CompoundSelector::new(merged))
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.simples.is_empty() {
            return write!(f, "*");
        }
        for simple in &self.simples {
            write!(f, "{}", simple)?;
        }
        Ok(())
    }
}

/// A sequence of compound selectors joined by combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// `components[0]` has no leading combinator; every later entry's
    /// combinator joins it to the previous component.
    pub components: Vec<(Option<Combinator>, CompoundSelector)>,
}

impl ComplexSelector {
    pub fn single(compound: CompoundSelector) -> Self {
        ComplexSelector {
            components: vec![(None, compound)],
        }
    }

    pub fn contains_parent(&self) -> bool {
        self.components.iter().any(|(_, c)| c.contains_parent())
    }

    pub fn contains_simple(&self, target: &SimpleSelector) -> bool {
        self.components.iter().any(|(_, c)| c.contains(target))
    }

    /// Replaces every compound selector in this complex selector that
    /// contains `target` with the same compound, but with `target`
    /// removed and `extender`'s simple selectors unified in. Called once
    /// per extend application (spec §4.5 step 1).
    pub fn with_extended(&self, target: &SimpleSelector, extender: &CompoundSelector) -> Vec<ComplexSelector> {
        let mut results = Vec::new();
        for (idx, (_, compound)) in self.components.iter().enumerate() {
            if !compound.contains(target) {
                continue;
            }
            let trimmed: Vec<SimpleSelector> = compound
                .simples
                .iter()
                .filter(|s| *s != target)
                .cloned()
                .collect();
            let trimmed_compound = CompoundSelector::new(trimmed);
            if let Some(unified) = trimmed_compound.unify(extender) {
                let mut new_components = self.components.clone();
                new_components[idx].1 = unified;
                results.push(ComplexSelector {
                    components: new_components,
                });
            }
        }
        results
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (combinator, compound)) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", combinator.unwrap_or(Combinator::Descendant).as_str())?;
            }
            write!(f, "{}", compound)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub complexes: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn new(complexes: Vec<ComplexSelector>) -> Self {
        SelectorList { complexes }
    }

    pub fn contains_parent(&self) -> bool {
        self.complexes.iter().any(ComplexSelector::contains_parent)
    }

    /// Resolves every `&` in `self` against `parent`'s complex selectors,
    /// producing the cartesian product (spec §4.5). If `&` does not
    /// appear anywhere in a complex selector, the parent is prepended
    /// (implicit parent) unless `suppress_implicit_parent` is set (used
    /// inside `@at-root` that excludes style rules).
    pub fn resolve_parent(&self, parent: &SelectorList, suppress_implicit_parent: bool) -> SelectorList {
        let mut resolved = Vec::new();
        for complex in &self.complexes {
            if complex.contains_parent() {
                for parent_complex in &parent.complexes {
                    resolved.push(substitute_parent(complex, parent_complex));
                }
            } else if suppress_implicit_parent {
                resolved.push(complex.clone());
            } else {
                for parent_complex in &parent.complexes {
                    let mut components = parent_complex.components.clone();
                    components.extend(complex.components.clone());
                    resolved.push(ComplexSelector { components });
                }
            }
        }
        dedup_complex(resolved)
    }
}

fn substitute_parent(complex: &ComplexSelector, parent: &ComplexSelector) -> ComplexSelector {
    let mut components = Vec::new();
    for (combinator, compound) in &complex.components {
        if compound.contains_parent() {
            let mut replaced_first = true;
            for (i, (parent_combinator, parent_compound)) in parent.components.iter().enumerate() {
                let without_parent: Vec<SimpleSelector> = compound
                    .simples
                    .iter()
                    .filter(|s| !matches!(s, SimpleSelector::Parent))
                    .cloned()
                    .collect();
                let mut simples = parent_compound.simples.clone();
                simples.extend(without_parent.clone());
                let combined = CompoundSelector::new(simples);
                let used_combinator = if i == 0 { *combinator } else { *parent_combinator };
                components.push((used_combinator, combined));
                replaced_first = false;
            }
            if replaced_first {
                components.push((*combinator, compound.clone()));
            }
        } else {
            components.push((*combinator, compound.clone()));
        }
    }
    ComplexSelector { components }
}

fn dedup_complex(complexes: Vec<ComplexSelector>) -> SelectorList {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for c in complexes {
        let key = c.to_string();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(c);
        }
    }
    SelectorList::new(out)
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, complex) in self.complexes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", complex)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parse::parse_selector_list;

    fn span() -> codemap::Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn ampersand_resolves_against_every_parent_selector() {
        let parent = parse_selector_list(".a, .b", span()).unwrap();
        let child = parse_selector_list("&:hover", span()).unwrap();
        let resolved = child.resolve_parent(&parent, false);
        assert_eq!(resolved.to_string(), ".a:hover, .b:hover");
    }

    #[test]
    fn implicit_parent_is_prepended_when_ampersand_absent() {
        let parent = parse_selector_list(".a", span()).unwrap();
        let child = parse_selector_list("b", span()).unwrap();
        let resolved = child.resolve_parent(&parent, false);
        assert_eq!(resolved.to_string(), ".a b");
    }
}
