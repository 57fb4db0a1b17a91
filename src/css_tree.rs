//! The output CSS tree: an arena of nodes built up during statement
//! execution and walked once, at the end, to serialize CSS (spec §3
//! "CSS node", §9 "visitor").
//!
//! Using an arena rather than `Rc<RefCell<Node>>` lets `@extend`
//! resolution (spec §4.5) mutate a style rule's selector after the rest
//! of the tree has already been built, without fighting the borrow
//! checker over shared parent/child links.

use codemap::Span;

use crate::media::MediaQueryList;
use crate::selector::SelectorList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub enum CssNodeKind {
    Root,
    StyleRule(SelectorList),
    Declaration {
        property: String,
        value: String,
    },
    Media(MediaQueryList),
    Supports(String),
    AtRule {
        name: String,
        params: String,
        /// At-rules without a block (e.g. `@charset "UTF-8";`) are
        /// childless and emit with a trailing `;` instead of `{}`.
        has_block: bool,
    },
    Keyframes {
        name: String,
    },
    KeyframeBlock {
        selector: String,
    },
    Import(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct CssNode {
    pub kind: CssNodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Set once a node is known to be the last emitted child of its
    /// parent group; used by the serializer to decide whether a blank
    /// line follows (spec §9, cosmetic only).
    pub is_group_end: bool,
}

/// Arena-backed output tree. Node 0 is always the root.
#[derive(Debug)]
pub struct CssTree {
    nodes: Vec<CssNode>,
}

impl CssTree {
    pub fn new() -> Self {
        let root = CssNode {
            kind: CssNodeKind::Root,
            span: dummy_span(),
            parent: None,
            children: Vec::new(),
            is_group_end: false,
        };
        CssTree { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, parent: NodeId, kind: CssNodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CssNode {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
            is_group_end: false,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn push_style_rule(&mut self, parent: NodeId, selector: SelectorList, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::StyleRule(selector), span)
    }

    pub fn push_declaration(&mut self, parent: NodeId, property: String, value: String, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::Declaration { property, value }, span)
    }

    pub fn push_media(&mut self, parent: NodeId, query: MediaQueryList, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::Media(query), span)
    }

    pub fn push_supports(&mut self, parent: NodeId, condition: String, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::Supports(condition), span)
    }

    pub fn push_at_rule(&mut self, parent: NodeId, name: String, params: String, has_block: bool, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::AtRule { name, params, has_block }, span)
    }

    pub fn push_keyframes(&mut self, parent: NodeId, name: String, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::Keyframes { name }, span)
    }

    pub fn push_keyframe_block(&mut self, parent: NodeId, selector: String, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::KeyframeBlock { selector }, span)
    }

    pub fn push_import(&mut self, parent: NodeId, url: String, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::Import(url), span)
    }

    /// Inserts an import at a specific position among `parent`'s
    /// children instead of appending it, so static CSS imports can be
    /// reordered to the top of the stylesheet (spec §5).
    pub fn insert_import(&mut self, parent: NodeId, index: usize, url: String, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CssNode {
            kind: CssNodeKind::Import(url),
            span,
            parent: Some(parent),
            children: Vec::new(),
            is_group_end: false,
        });
        let children = &mut self.nodes[parent.0].children;
        let at = index.min(children.len());
        children.insert(at, id);
        id
    }

    pub fn push_comment(&mut self, parent: NodeId, text: String, span: Span) -> NodeId {
        self.push(parent, CssNodeKind::Comment(text), span)
    }

    pub fn node(&self, id: NodeId) -> &CssNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CssNode {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Panics if `node` is not a `StyleRule`; every caller that reaches
    /// here already holds a `NodeId` it obtained from `push_style_rule`.
    pub fn selector(&self, node: NodeId) -> &SelectorList {
        match &self.nodes[node.0].kind {
            CssNodeKind::StyleRule(selector) => selector,
            _ => panic!("CssTree::selector called on a non-style-rule node"),
        }
    }

    pub fn set_selector(&mut self, node: NodeId, selector: SelectorList) {
        match &mut self.nodes[node.0].kind {
            CssNodeKind::StyleRule(slot) => *slot = selector,
            _ => panic!("CssTree::set_selector called on a non-style-rule node"),
        }
    }

    /// True if a style rule has no declarations and no nested style
    /// rules anywhere beneath it; such rules are omitted from output
    /// (spec §4.2, "empty style rules produce no CSS").
    pub fn is_empty_of_output(&self, id: NodeId) -> bool {
        self.children(id).iter().all(|&child| match &self.nodes[child.0].kind {
            CssNodeKind::Declaration { .. } => false,
            CssNodeKind::Comment(_) => false,
            CssNodeKind::StyleRule(_) => self.is_empty_of_output(child),
            CssNodeKind::Media(_) | CssNodeKind::Supports(_) | CssNodeKind::AtRule { .. } => {
                self.is_empty_of_output(child)
            }
            _ => false,
        })
    }
}

impl Default for CssTree {
    fn default() -> Self {
        CssTree::new()
    }
}

fn dummy_span() -> Span {
    let mut map = codemap::CodeMap::new();
    let file = map.add_file("root".into(), String::new());
    file.span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parse::parse_selector_list;

    fn span() -> Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn pushed_children_are_linked_to_their_parent() {
        let mut tree = CssTree::new();
        let sp = span();
        let rule = tree.push_style_rule(tree.root(), parse_selector_list(".a", sp).unwrap(), sp);
        let decl = tree.push_declaration(rule, "color".into(), "red".into(), sp);
        assert_eq!(tree.children(tree.root()), &[rule]);
        assert_eq!(tree.children(rule), &[decl]);
        assert_eq!(tree.parent(decl), Some(rule));
    }

    #[test]
    fn empty_style_rule_is_detected() {
        let mut tree = CssTree::new();
        let sp = span();
        let rule = tree.push_style_rule(tree.root(), parse_selector_list(".a", sp).unwrap(), sp);
        assert!(tree.is_empty_of_output(rule));
        tree.push_declaration(rule, "color".into(), "red".into(), sp);
        assert!(!tree.is_empty_of_output(rule));
    }
}
