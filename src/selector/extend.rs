//! Extension store: registers `@extend` declarations and applies them
//! to every style rule in a module at finalize time (spec §3 "Extension
//! store", §4.5 "Extension application").

use std::collections::HashSet;

use codemap::Span;

use crate::css_tree::{CssTree, NodeId};
use crate::error::{SassError, SassResult};
use crate::media::MediaQueryList;
use crate::selector::{unify, SelectorList, SimpleSelector};

/// One registered `@extend extender { target }` (spec §3: `{extender_selector,
/// target_simple, modifiers}`).
#[derive(Debug, Clone)]
pub struct Extension {
    pub extender: SelectorList,
    pub target: SimpleSelector,
    pub is_optional: bool,
    /// If set, the extension only applies within style rules whose
    /// enclosing media query list is a subset of this one (spec §4.5
    /// step 2).
    pub media_context: Option<MediaQueryList>,
    pub span: Span,
}

/// For one module: the registered extends, and the style rules
/// (identified by their CSS-tree node id) that may be targets.
#[derive(Debug, Default)]
pub struct ExtensionStore {
    extensions: Vec<Extension>,
    /// Style rules in emission order, paired with the media context
    /// active when they were emitted.
    style_rules: Vec<(NodeId, Option<MediaQueryList>)>,
    matched_targets: HashSet<usize>,
}

impl ExtensionStore {
    pub fn new() -> Self {
        ExtensionStore::default()
    }

    pub fn register_extend(&mut self, extension: Extension) {
        self.extensions.push(extension);
    }

    pub fn register_style_rule(&mut self, node: NodeId, media_context: Option<MediaQueryList>) {
        self.style_rules.push((node, media_context));
    }

    /// Applies every registered extend against every registered style
    /// rule, rewriting the rule's selector in `tree`. Recurses so that
    /// newly produced selectors may themselves be further extended,
    /// bounded by a visited set to guarantee termination (spec §4.5
    /// step 1 "Recurse ... bounded by a visited-set").
    pub fn finish(&mut self, tree: &mut CssTree) -> SassResult<()> {
        for (node, rule_media) in self.style_rules.clone() {
            let mut current = tree.selector(node).clone();
            let mut visited: HashSet<String> = current
                .complexes
                .iter()
                .map(std::string::ToString::to_string)
                .collect();
            let mut changed = true;
            while changed {
                changed = false;
                let mut additions = Vec::new();
                for (idx, extension) in self.extensions.iter().enumerate() {
                    if let Some(ctx) = &extension.media_context {
                        if !media_context_is_subset(rule_media.as_ref(), ctx) {
                            continue;
                        }
                    }
                    let mut matched_here = false;
                    for complex in &current.complexes {
                        if !complex.contains_simple(&extension.target) {
                            continue;
                        }
                        for extender_complex in &extension.extender.complexes {
                            for extender_compound in
                                extender_complex.components.iter().map(|(_, c)| c)
                            {
                                for produced in complex.with_extended(&extension.target, extender_compound) {
                                    let key = produced.to_string();
                                    if visited.insert(key) {
                                        additions.push(produced);
                                        matched_here = true;
                                    }
                                }
                            }
                        }
                    }
                    if matched_here {
                        self.matched_targets.insert(idx);
                    }
                }
                if !additions.is_empty() {
                    changed = true;
                    current.complexes.extend(additions);
                }
            }
            current.complexes = unify::dedup_preserving_order(current.complexes);
            tree.set_selector(node, current);
        }

        for (idx, extension) in self.extensions.iter().enumerate() {
            if !extension.is_optional && !self.matched_targets.contains(&idx) {
                return Err(SassError::runtime(
                    format!(
                        "The target selector was not found.\n  {}",
                        extension.target
                    ),
                    extension.span,
                ));
            }
        }

        Ok(())
    }
}

fn media_context_is_subset(rule_media: Option<&MediaQueryList>, extend_media: &MediaQueryList) -> bool {
    match rule_media {
        None => extend_media.queries.is_empty(),
        Some(rule_media) => rule_media.is_subset_of(extend_media),
    }
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
    fn extend_adds_new_complex_selector() {
        let mut tree = CssTree::new();
        let sp = span();
        let rule_selector = parse_selector_list("a", sp).unwrap();
        let node = tree.push_style_rule(tree.root(), rule_selector, sp);

        let mut store = ExtensionStore::new();
        store.register_style_rule(node, None);
        store.register_extend(Extension {
            extender: parse_selector_list(".b", sp).unwrap(),
            target: SimpleSelector::Type {
                namespace: None,
                name: "a".into(),
            },
            is_optional: false,
            media_context: None,
            span: sp,
        });

        store.finish(&mut tree).unwrap();
        assert_eq!(tree.selector(node).to_string(), "a, .b");
    }

    #[test]
    fn non_optional_extend_with_no_match_is_fatal() {
        let mut tree = CssTree::new();
        let sp = span();
        let node = tree.push_style_rule(tree.root(), parse_selector_list("a", sp).unwrap(), sp);
        let mut store = ExtensionStore::new();
        store.register_style_rule(node, None);
        store.register_extend(Extension {
            extender: parse_selector_list(".b", sp).unwrap(),
            target: SimpleSelector::Class("never-used".into()),
            is_optional: false,
            media_context: None,
            span: sp,
        });
        assert!(store.finish(&mut tree).is_err());
    }
}
