mod support;

use std::collections::HashMap;

use sass_core::ast::stmt::{ImportArgument, UseNamespace};
use sass_core::ast::{Expression, Statement};
use sass_core::common::BinaryOp;
use sass_core::css_tree::CssNodeKind;
use sass_core::value::{Number, Value};
use sass_core::{evaluate, evaluate_expression, NoOpImporter, Options};

use support::{decl, lit, number, span, str_expr, style_rule, var, MapImporter, MapParser};

fn options() -> Options {
    Options::silent(Box::new(NoOpImporter))
}

#[test]
fn style_rule_emits_a_node_with_its_declarations() {
    let body = vec![style_rule(".foo", vec![decl("color", str_expr("red"))])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let rule_id = tree.children(tree.root())[0];
    assert_eq!(tree.selector(rule_id).to_string(), ".foo");

    let decl_id = tree.children(rule_id)[0];
    match &tree.node(decl_id).kind {
        CssNodeKind::Declaration { property, value } => {
            assert_eq!(property, "color");
            assert_eq!(value, "red");
        }
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn nested_style_rule_bubbles_out_beside_its_parent() {
    let body = vec![style_rule(".outer", vec![style_rule(".inner", vec![decl("color", str_expr("red"))])])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    // `.inner` doesn't nest inside `.outer` in the output; it bubbles
    // out to sit beside it, with its resolved selector already folding
    // the parent in.
    let root_children = tree.children(tree.root());
    assert_eq!(root_children.len(), 2);
    assert_eq!(tree.selector(root_children[0]).to_string(), ".outer");
    assert_eq!(tree.selector(root_children[1]).to_string(), ".outer .inner");
    assert!(tree.children(root_children[0]).is_empty());

    let decl_id = tree.children(root_children[1])[0];
    assert!(matches!(tree.node(decl_id).kind, CssNodeKind::Declaration { .. }));
}

#[test]
fn ampersand_resolves_against_the_original_selector() {
    let body = vec![style_rule(".foo", vec![style_rule("&:hover", vec![decl("color", str_expr("red"))])])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let root_children = tree.children(tree.root());
    assert_eq!(root_children.len(), 2);
    assert_eq!(tree.selector(root_children[1]).to_string(), ".foo:hover");
}

#[test]
fn variable_write_then_read() {
    let body = vec![
        Statement::VariableDeclaration {
            namespace: None,
            name: "size".to_string(),
            value: number(12.0),
            is_global: false,
            is_default: false,
            span: span(),
        },
        style_rule(".foo", vec![decl("width", var("size"))]),
    ];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let rule_id = tree.children(tree.root())[0];
    let decl_id = tree.children(rule_id)[0];
    match &tree.node(decl_id).kind {
        CssNodeKind::Declaration { value, .. } => assert_eq!(value, "12"),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn if_rule_picks_the_matching_clause() {
    let body = vec![Statement::IfRule {
        clauses: vec![(Expression::Bool(false), vec![decl("color", str_expr("red"))]), (Expression::Bool(true), vec![decl("color", str_expr("blue"))])],
        else_clause: Some(vec![decl("color", str_expr("green"))]),
        span: span(),
    }];

    // `@if`/`@each`/`@for`/`@while` only make sense inside a style rule in
    // practice, but the executor itself does not require one — wrap so
    // the emitted declaration has somewhere to attach.
    let wrapped = vec![style_rule(".foo", body)];
    let (tree, _) = evaluate(&wrapped, &options()).unwrap();

    let rule_id = tree.children(tree.root())[0];
    let decl_id = tree.children(rule_id)[0];
    match &tree.node(decl_id).kind {
        CssNodeKind::Declaration { value, .. } => assert_eq!(value, "blue"),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn each_rule_variable_leaks_to_the_enclosing_scope() {
    let list = Expression::List {
        elements: vec![number(1.0), number(2.0), number(3.0)],
        separator: sass_core::common::ListSeparator::Comma,
        brackets: sass_core::common::Brackets::None,
        span: span(),
    };
    let each = Statement::EachRule {
        pattern: sass_core::ast::stmt::EachPattern { names: vec!["i".to_string()] },
        list,
        body: vec![],
        span: span(),
    };
    let body = vec![style_rule(".foo", vec![each, decl("counter", var("i"))])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let rule_id = tree.children(tree.root())[0];
    let decl_id = tree.children(rule_id)[0];
    match &tree.node(decl_id).kind {
        CssNodeKind::Declaration { value, .. } => assert_eq!(value, "3"),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn mixin_include_and_content_block() {
    let mixin = Statement::MixinRule {
        name: "wrap".to_string(),
        args: sass_core::ast::stmt::ArgumentSignature { params: vec![] },
        accepts_content: true,
        body: vec![style_rule(".inner", vec![Statement::ContentRule { args: vec![], span: span() }])],
        span: span(),
    };
    let include = Statement::IncludeRule {
        namespace: None,
        name: "wrap".to_string(),
        args: vec![],
        content: Some(vec![decl("color", str_expr("red"))]),
        span: span(),
    };
    let body = vec![mixin, style_rule(".outer", vec![include])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let root_children = tree.children(tree.root());
    assert_eq!(root_children.len(), 2);
    assert_eq!(tree.selector(root_children[0]).to_string(), ".outer");
    let inner_id = root_children[1];
    assert_eq!(tree.selector(inner_id).to_string(), ".outer .inner");
    let decl_id = tree.children(inner_id)[0];
    match &tree.node(decl_id).kind {
        CssNodeKind::Declaration { property, value } => {
            assert_eq!(property, "color");
            assert_eq!(value, "red");
        }
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn include_rejects_a_content_block_when_the_mixin_does_not_accept_one() {
    let mixin = Statement::MixinRule {
        name: "plain".to_string(),
        args: sass_core::ast::stmt::ArgumentSignature { params: vec![] },
        accepts_content: false,
        body: vec![decl("color", str_expr("red"))],
        span: span(),
    };
    let include = Statement::IncludeRule {
        namespace: None,
        name: "plain".to_string(),
        args: vec![],
        content: Some(vec![decl("color", str_expr("blue"))]),
        span: span(),
    };
    let body = vec![mixin, style_rule(".outer", vec![include])];
    let err = evaluate(&body, &options()).unwrap_err();
    assert!(err.to_string().contains("doesn't accept content blocks"));
}

#[test]
fn extend_rewrites_the_target_rules_selector() {
    let body = vec![
        style_rule(".message", vec![decl("color", str_expr("black"))]),
        style_rule(
            ".error",
            vec![Statement::ExtendRule {
                selector: lit(".message"),
                is_optional: false,
                span: span(),
            }],
        ),
    ];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let message_id = tree.children(tree.root())[0];
    assert_eq!(tree.selector(message_id).to_string(), ".message, .error");
}

#[test]
fn extend_outside_a_style_rule_is_an_error() {
    let body = vec![Statement::ExtendRule {
        selector: lit(".message"),
        is_optional: false,
        span: span(),
    }];
    let err = evaluate(&body, &options()).unwrap_err();
    assert!(err.to_string().contains("@extend may only be used within style rules"));
}

#[test]
fn media_rule_bubbles_out_of_an_enclosing_style_rule() {
    let body = vec![style_rule(
        ".foo",
        vec![Statement::MediaRule {
            query: lit("(min-width: 100px)"),
            body: vec![decl("color", str_expr("red"))],
            span: span(),
        }],
    )];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    // The media rule attaches at the root, not inside `.foo`.
    let root_children = tree.children(tree.root());
    assert_eq!(root_children.len(), 1);
    let media_id = root_children[0];
    assert!(matches!(tree.node(media_id).kind, CssNodeKind::Media(_)));

    let rewrapped_rule_id = tree.children(media_id)[0];
    assert_eq!(tree.selector(rewrapped_rule_id).to_string(), ".foo");
}

#[test]
fn nested_media_rules_merge_their_conditions() {
    let body = vec![Statement::MediaRule {
        query: lit("(min-width: 100px)"),
        body: vec![Statement::MediaRule {
            query: lit("(max-width: 200px)"),
            body: vec![decl("color", str_expr("red"))],
            span: span(),
        }],
        span: span(),
    }];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let outer_id = tree.children(tree.root())[0];
    let inner_id = tree.children(outer_id)[0];
    match &tree.node(inner_id).kind {
        CssNodeKind::Media(query) => {
            assert_eq!(query.to_string(), "(min-width: 100px) and (max-width: 200px)");
        }
        other => panic!("expected a media node, got {:?}", other),
    }
    let decl_id = tree.children(inner_id)[0];
    assert!(matches!(tree.node(decl_id).kind, CssNodeKind::Declaration { .. }));
}

#[test]
fn keyframes_does_not_bubble_and_uses_keyframe_blocks() {
    let body = vec![style_rule(
        ".foo",
        vec![Statement::AtRule {
            name: "keyframes".to_string(),
            params: lit("spin"),
            body: Some(vec![Statement::StyleRule {
                selector: lit("50%"),
                body: vec![decl("opacity", number(0.5))],
                span: span(),
            }]),
            span: span(),
        }],
    )];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    // Unlike `@media`/`@supports`/unknown at-rules, `@keyframes` never
    // bubbles out of its enclosing style rule.
    let outer_id = tree.children(tree.root())[0];
    assert_eq!(tree.children(tree.root()).len(), 1);
    let keyframes_id = tree.children(outer_id)[0];
    assert!(matches!(tree.node(keyframes_id).kind, CssNodeKind::Keyframes { .. }));

    let block_id = tree.children(keyframes_id)[0];
    match &tree.node(block_id).kind {
        CssNodeKind::KeyframeBlock { selector } => assert_eq!(selector, "50%"),
        other => panic!("expected a keyframe block, got {:?}", other),
    }
}

#[test]
fn use_rule_namespaces_the_loaded_modules_variables() {
    let mut modules = HashMap::new();
    modules.insert(
        "colors".to_string(),
        vec![Statement::VariableDeclaration {
            namespace: None,
            name: "brand".to_string(),
            value: str_expr("teal"),
            is_global: false,
            is_default: false,
            span: span(),
        }],
    );
    let importer = MapImporter { modules: modules.clone() };
    let parser = MapParser { modules };

    let use_stmt = Statement::UseRule {
        url: "colors".to_string(),
        namespace: UseNamespace::Named("c".to_string()),
        configuration: vec![],
        span: span(),
    };
    let body = vec![use_stmt, style_rule(".foo", vec![decl("color", var("c.brand"))])];

    let options = Options::silent(Box::new(importer)).with_parser(Box::new(parser));
    let (tree, loading) = evaluate(&body, &options).unwrap();

    assert!(loading.contains("colors"));
    let rule_id = tree.children(tree.root())[0];
    let decl_id = tree.children(rule_id)[0];
    match &tree.node(decl_id).kind {
        CssNodeKind::Declaration { value, .. } => assert_eq!(value, "teal"),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn use_rule_rejects_writes_to_a_namespaced_variable() {
    let mut modules = HashMap::new();
    modules.insert("colors".to_string(), vec![]);
    let importer = MapImporter { modules: modules.clone() };
    let parser = MapParser { modules };

    let use_stmt = Statement::UseRule {
        url: "colors".to_string(),
        namespace: UseNamespace::Named("c".to_string()),
        configuration: vec![],
        span: span(),
    };
    let bad_write = Statement::VariableDeclaration {
        namespace: Some("c".to_string()),
        name: "brand".to_string(),
        value: str_expr("red"),
        is_global: false,
        is_default: false,
        span: span(),
    };
    let body = vec![use_stmt, bad_write];

    let options = Options::silent(Box::new(importer)).with_parser(Box::new(parser));
    let err = evaluate(&body, &options).unwrap_err();
    assert!(err.to_string().contains("read-only from this module"));
}

#[test]
fn use_rule_reuses_the_cached_module_on_a_second_load_with_the_same_configuration() {
    let mut modules = HashMap::new();
    modules.insert(
        "colors".to_string(),
        vec![Statement::VariableDeclaration {
            namespace: None,
            name: "brand".to_string(),
            value: str_expr("teal"),
            is_global: false,
            is_default: false,
            span: span(),
        }],
    );
    let importer = MapImporter { modules: modules.clone() };
    let parser = MapParser { modules };

    let use_a = Statement::UseRule {
        url: "colors".to_string(),
        namespace: UseNamespace::Named("a".to_string()),
        configuration: vec![],
        span: span(),
    };
    let use_b = Statement::UseRule {
        url: "colors".to_string(),
        namespace: UseNamespace::Named("b".to_string()),
        configuration: vec![],
        span: span(),
    };
    let body = vec![use_a, use_b, style_rule(".foo", vec![decl("a", var("a.brand")), decl("b", var("b.brand"))])];

    let options = Options::silent(Box::new(importer)).with_parser(Box::new(parser));
    let (tree, _) = evaluate(&body, &options).unwrap();

    let rule_id = tree.children(tree.root())[0];
    let decls = tree.children(rule_id);
    assert_eq!(decls.len(), 2);
    for &id in decls {
        match &tree.node(id).kind {
            CssNodeKind::Declaration { value, .. } => assert_eq!(value, "teal"),
            other => panic!("expected a declaration, got {:?}", other),
        }
    }
}

#[test]
fn use_rule_rejects_a_second_load_with_incompatible_configuration() {
    let mut modules = HashMap::new();
    modules.insert("colors".to_string(), vec![]);
    let importer = MapImporter { modules: modules.clone() };
    let parser = MapParser { modules };

    let use_a = Statement::UseRule {
        url: "colors".to_string(),
        namespace: UseNamespace::Named("a".to_string()),
        configuration: vec![("seed".to_string(), str_expr("one"))],
        span: span(),
    };
    let use_b = Statement::UseRule {
        url: "colors".to_string(),
        namespace: UseNamespace::Named("b".to_string()),
        configuration: vec![("seed".to_string(), str_expr("two"))],
        span: span(),
    };
    let body = vec![use_a, use_b];

    let options = Options::silent(Box::new(importer)).with_parser(Box::new(parser));
    let err = evaluate(&body, &options).unwrap_err();
    assert!(err.to_string().contains("already loaded with a different configuration"));
}

#[test]
fn declaration_with_an_empty_list_value_is_still_emitted() {
    let empty_list = Expression::List {
        elements: vec![],
        separator: sass_core::common::ListSeparator::Comma,
        brackets: sass_core::common::Brackets::None,
        span: span(),
    };
    let body = vec![style_rule(".foo", vec![decl("grid-template-columns", empty_list)])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let rule_id = tree.children(tree.root())[0];
    let decl_id = tree.children(rule_id)[0];
    match &tree.node(decl_id).kind {
        CssNodeKind::Declaration { property, value } => {
            assert_eq!(property, "grid-template-columns");
            assert_eq!(value, "");
        }
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn declaration_with_a_blank_value_is_discarded() {
    let body = vec![style_rule(".foo", vec![decl("color", str_expr(""))])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let rule_id = tree.children(tree.root())[0];
    assert!(tree.children(rule_id).is_empty());
}

#[test]
fn custom_property_rejects_an_empty_value() {
    let body = vec![style_rule(".foo", vec![decl("--theme", str_expr(""))])];
    let err = evaluate(&body, &options()).unwrap_err();
    assert!(err.to_string().contains("Custom property value"));
}

#[test]
fn function_body_discards_bare_declarations() {
    let function = Statement::FunctionRule {
        name: "noisy".to_string(),
        args: sass_core::ast::stmt::ArgumentSignature { params: vec![] },
        body: vec![decl("color", str_expr("red")), Statement::ReturnRule { value: number(1.0), span: span() }],
        span: span(),
    };
    let call = Expression::FunctionCall(sass_core::ast::expr::CallExpr {
        namespace: None,
        name: "noisy".to_string(),
        args: vec![],
        span: span(),
    });
    let body = vec![function, style_rule(".foo", vec![decl("width", call)])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let rule_id = tree.children(tree.root())[0];
    let decls = tree.children(rule_id);
    assert_eq!(decls.len(), 1);
    match &tree.node(decls[0]).kind {
        CssNodeKind::Declaration { property, value } => {
            assert_eq!(property, "width");
            assert_eq!(value, "1");
        }
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn null_list_elements_are_omitted_on_serialization() {
    let list = Expression::List {
        elements: vec![str_expr("a"), Expression::ParentSelector(span()), str_expr("b")],
        separator: sass_core::common::ListSeparator::Comma,
        brackets: sass_core::common::Brackets::None,
        span: span(),
    };
    let body = vec![style_rule(".foo", vec![decl("font-family", list)])];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let rule_id = tree.children(tree.root())[0];
    let decl_id = tree.children(rule_id)[0];
    match &tree.node(decl_id).kind {
        CssNodeKind::Declaration { value, .. } => assert_eq!(value, "a, b"),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn static_css_imports_are_reordered_to_the_top_of_the_stylesheet() {
    let body = vec![
        style_rule(".foo", vec![decl("color", str_expr("red"))]),
        Statement::ImportRule {
            imports: vec![ImportArgument::StaticCss(lit("\"reset.css\""))],
            span: span(),
        },
    ];
    let (tree, _) = evaluate(&body, &options()).unwrap();

    let root_children = tree.children(tree.root());
    assert_eq!(root_children.len(), 2);
    assert!(matches!(tree.node(root_children[0]).kind, CssNodeKind::Import(_)));
    assert!(matches!(tree.node(root_children[1]).kind, CssNodeKind::StyleRule(_)));
}

#[test]
fn binary_op_expression_evaluates_standalone() {
    let expr = Expression::BinaryOp {
        op: BinaryOp::Add,
        lhs: Box::new(number(1.0)),
        rhs: Box::new(number(2.0)),
        in_calculation: false,
        span: span(),
    };
    let value = evaluate_expression(&expr, &options()).unwrap();
    assert_eq!(value, Value::Number(Number::unitless(3.0)));
}
