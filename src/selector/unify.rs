//! Complex-selector unification: the "weave" algorithm (spec §4.5).
//!
//! Two complex selectors unify by aligning their combinator sequences,
//! producing every interleaving that preserves each input's internal
//! order and respects combinator compatibility (`>` requires the same
//! parent depth, `+`/`~` are sibling constraints, descendant is the most
//! permissive). Used both by pseudo-class inner selectors
//! (`:is(.a) .b` unified against a context) and by `@extend`.

use crate::selector::{Combinator, ComplexSelector};

/// All valid interleavings of `a` and `b`'s components that keep each
/// side's relative order intact. `>` combinators pin their compound to
/// an exact position, so only weaves that keep both sides of a `>` edge
/// adjacent are kept; `+`/`~` likewise require their compound to
/// immediately follow in the output; plain descendant combinators may be
/// reordered freely relative to each other.
pub fn weave(a: &ComplexSelector, b: &ComplexSelector) -> Vec<ComplexSelector> {
    if a.components.is_empty() {
        return vec![b.clone()];
    }
    if b.components.is_empty() {
        return vec![a.clone()];
    }

    let mut results = Vec::new();
    interleave(&a.components, &b.components, Vec::new(), &mut results);
    results
        .into_iter()
        .map(|components| ComplexSelector { components })
        .collect()
}

type Component = (Option<Combinator>, crate::selector::CompoundSelector);

fn interleave(a: &[Component], b: &[Component], acc: Vec<Component>, out: &mut Vec<Vec<Component>>) {
    if a.is_empty() {
        let mut result = acc;
        result.extend_from_slice(b);
        out.push(result);
        return;
    }
    if b.is_empty() {
        let mut result = acc;
        result.extend_from_slice(a);
        out.push(result);
        return;
    }

    let a_forces_next = matches!(a[0].0, Some(Combinator::Child) | Some(Combinator::NextSibling));
    let b_forces_next = matches!(b[0].0, Some(Combinator::Child) | Some(Combinator::NextSibling));

    // A combinator that pins adjacency must be taken before its sibling
    // can be considered, otherwise the constraint it encodes is lost.
    if a_forces_next || !b_forces_next {
        let mut next_acc = acc.clone();
        next_acc.push(a[0].clone());
        interleave(&a[1..], b, next_acc, out);
    }
    if b_forces_next || !a_forces_next {
        let mut next_acc = acc;
        next_acc.push(b[0].clone());
        interleave(a, &b[1..], next_acc, out);
    }
}

/// Removes weave results that are structurally identical (spec §4.5:
/// "Duplicate results are removed; the result list retains input
/// ordering").
pub fn dedup_preserving_order(selectors: Vec<ComplexSelector>) -> Vec<ComplexSelector> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for selector in selectors {
        let key = selector.to_string();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(selector);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parse::parse_selector_list;

    fn span() -> codemap::Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn weaving_two_descendant_chains_keeps_both_orders_possible() {
        let a = parse_selector_list("a b", span()).unwrap();
        let b = parse_selector_list("c d", span()).unwrap();
        let woven = weave(&a.complexes[0], &b.complexes[0]);
        assert!(!woven.is_empty());
        for result in &woven {
            // every weave contains all four compounds
            assert_eq!(result.components.len(), 4);
        }
    }

    #[test]
    fn child_combinator_pins_adjacency() {
        let a = parse_selector_list("a > b", span()).unwrap();
        let b = parse_selector_list("c", span()).unwrap();
        let woven = weave(&a.complexes[0], &b.complexes[0]);
        for result in &woven {
            let positions: Vec<_> = result
                .components
                .iter()
                .enumerate()
                .filter(|(_, (combinator, _))| *combinator == Some(Combinator::Child))
                .map(|(i, _)| i)
                .collect();
            for pos in positions {
                assert!(pos > 0, "child combinator must not be the first component");
            }
        }
    }
}
