use rowan::GreenNodeBuilder;
use test_env_log::test;
use ttcn3_syn::ast::AstNode;
use ttcn3_syn::{SynTag, SyntaxNode, Tree};

use crate::{build_scope, definitions, lookup, Scope};

fn parse(source: &str) -> Tree {
    let tree = Tree::parse(source);
    assert!(tree.errors().is_empty(), "parse errors: {:?}", tree.errors());
    tree
}

fn module_node(tree: &Tree) -> SyntaxNode {
    tree.module().expect("no module").node().clone()
}

/// The `n`th node of the given kind, in preorder.
fn nth_node(tree: &Tree, kind: SynTag, n: usize) -> SyntaxNode {
    tree.root()
        .descendants()
        .filter(|node| node.kind() == kind)
        .nth(n)
        .unwrap_or_else(|| panic!("no {:?} #{}", kind, n))
}

fn names(scope: &Scope) -> Vec<String> {
    scope
        .definitions()
        .iter()
        .map(|def| def.name().to_string())
        .collect()
}

fn scope_names(tree: &Tree, kind: SynTag) -> Vec<String> {
    let node = nth_node(tree, kind, 0);
    let scope = build_scope(&node, tree).expect("not a scope");
    names(&scope)
}

#[test]
fn test_enumerators_are_promoted_to_module() {
    let tree = parse(
        r#"
module M {
    group G {
        type enumerated Color { red, green(2) }
    }
    type record R { enumerated { up, down } state }
    function f() {
        type enumerated Local { inner }
        var integer x;
    }
}
"#,
    );
    let module = module_node(&tree);

    for name in ["red", "green", "up", "down", "inner"] {
        assert_eq!(definitions(name, &module, &tree).len(), 1, "{}", name);
    }
    assert_eq!(
        definitions("red", &module, &tree)[0].node().kind(),
        SynTag::EnumTypeDecl
    );
    assert_eq!(
        definitions("up", &module, &tree)[0].node().kind(),
        SynTag::EnumSpec
    );

    for name in ["Color", "R", "f"] {
        assert_eq!(definitions(name, &module, &tree).len(), 1, "{}", name);
    }
    // locals, groups and the module itself stay out
    for name in ["Local", "x", "G", "M", "state"] {
        assert!(definitions(name, &module, &tree).is_empty(), "{}", name);
    }
}

#[test]
fn test_redeclaration_is_most_recent_first() {
    let tree = parse("module M {\n    const integer x := 1;\n    var integer x;\n}\n");
    let defs = definitions("x", &module_node(&tree), &tree);
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].position().line, 3);
    assert_eq!(defs[1].position().line, 2);
    assert_eq!(defs[1].position().column, 19);
    assert!(defs.iter().all(|def| def.node().kind() == SynTag::ValueDecl));
    assert!(defs.iter().all(|def| def.name() == "x"));
}

#[test]
fn test_lookup_on_missing_scope_is_empty() {
    let tree = parse("module M { const integer x := y; }");
    assert!(lookup(None, "x").is_empty());

    let scope = build_scope(&module_node(&tree), &tree).expect("module scope");
    assert!(scope.lookup("nope").is_empty());

    let ident = nth_node(&tree, SynTag::IdentExpr, 0);
    assert!(build_scope(&ident, &tree).is_none());
    assert!(definitions("y", &ident, &tree).is_empty());
}

#[test]
fn test_group_members_are_inserted_once() {
    let tree = parse(
        r#"
module M {
    group Outer {
        const integer g := 1;
        group Inner { template integer t := 2; }
    }
}
"#,
    );
    let module = module_node(&tree);
    assert_eq!(definitions("g", &module, &tree).len(), 1);
    assert_eq!(definitions("t", &module, &tree).len(), 1);
    assert!(definitions("Outer", &module, &tree).is_empty());
    assert!(definitions("Inner", &module, &tree).is_empty());

    assert_eq!(scope_names(&tree, SynTag::GroupDecl), vec!["g", "t"]);
}

#[test]
fn test_module_level_declarations() {
    let tree = parse(
        r#"
module M {
    import from Other all;
    type integer Byte (0..255);
    type record Point { integer x, integer y }
    type component C {}
    type port P message {}
    type function F();
    signature S();
    template integer t := 1;
    modulepar integer mp1, mp2 := 2;
    function f() {}
    control {}
}
"#,
    );
    pretty_assertions::assert_eq!(
        names(&build_scope(&module_node(&tree), &tree).expect("module scope")),
        vec![
            "Other", "Byte", "Point", "C", "P", "F", "S", "t", "mp1", "mp2", "f", "control"
        ]
    );

    let control = definitions("control", &module_node(&tree), &tree);
    assert_eq!(control[0].node().kind(), SynTag::ControlPart);
    let byte = definitions("Byte", &module_node(&tree), &tree);
    assert_eq!(byte[0].node().kind(), SynTag::Field);
}

#[test]
fn test_function_parameters() {
    let tree = parse("module M { function f<type T>(integer a, T b) { var integer c; } }");
    let func = nth_node(&tree, SynTag::FuncDecl, 0);
    assert_eq!(definitions("a", &func, &tree).len(), 1);
    assert_eq!(definitions("b", &func, &tree).len(), 1);
    assert_eq!(definitions("T", &func, &tree).len(), 1);
    assert!(definitions("c", &func, &tree).is_empty());

    assert_eq!(scope_names(&tree, SynTag::FormalPars), vec!["a", "b"]);
    assert_eq!(scope_names(&tree, SynTag::TypePars), vec!["T"]);
    assert_eq!(scope_names(&tree, SynTag::BlockStmt), vec!["c"]);
}

#[test]
fn test_template_and_signature_parameters() {
    let tree = parse(
        r#"
module M {
    template R tr<type T>(integer p) := { f := p };
    signature S(in integer q) return boolean;
    type altstep A(timer t);
}
"#,
    );
    assert_eq!(scope_names(&tree, SynTag::TemplateDecl), vec!["T", "p"]);
    assert_eq!(scope_names(&tree, SynTag::SignatureDecl), vec!["q"]);
    assert_eq!(scope_names(&tree, SynTag::BehaviourTypeDecl), vec!["t"]);
}

#[test]
fn test_block_skips_non_declarations() {
    let tree = parse(
        r#"
module M {
    function f() {
        var integer a;
        a := 1;
        label L;
        goto L;
        const integer b := 2, c := 3;
        timer t;
    }
}
"#,
    );
    assert_eq!(
        scope_names(&tree, SynTag::BlockStmt),
        vec!["a", "L", "b", "c", "t"]
    );
    let label = definitions("L", &nth_node(&tree, SynTag::BlockStmt, 0), &tree);
    assert_eq!(label[0].node().kind(), SynTag::BranchStmt);
}

#[test]
fn test_for_inserts_only_its_initializer() {
    let tree = parse(
        "module M { function f() { for (var integer i := 0; i < 3; i := i + 1) { var integer j; } } }",
    );
    assert_eq!(scope_names(&tree, SynTag::ForStmt), vec!["i"]);
}

#[test]
fn test_if_inserts_all_branches() {
    let tree = parse(
        r#"
module M {
    function f() {
        if (x) { var integer a; } else if (y) { var integer b; } else { var integer c; }
    }
}
"#,
    );
    assert_eq!(scope_names(&tree, SynTag::IfStmt), vec!["a", "b", "c"]);
}

#[test]
fn test_alt_is_an_empty_scope() {
    let tree = parse("module M { function f() { alt { [] t.timeout { var integer a; } } } }");
    let alt = nth_node(&tree, SynTag::AltStmt, 0);
    let scope = build_scope(&alt, &tree).expect("alt scope");
    assert!(scope.is_empty());
}

#[test]
fn test_struct_types_and_fields() {
    let tree = parse(
        r#"
module M {
    type record R<type T> {
        integer f1,
        T f2 optional,
        record { integer inner } nested
    }
}
"#,
    );
    assert_eq!(
        scope_names(&tree, SynTag::StructTypeDecl),
        vec!["T", "f1", "f2", "nested"]
    );
    // the inline record of `nested`
    assert_eq!(scope_names(&tree, SynTag::StructSpec), vec!["inner"]);
    let nested = nth_node(&tree, SynTag::Field, 2);
    assert_eq!(definitions("inner", &nested, &tree).len(), 1);
    assert!(definitions("nested", &nested, &tree).is_empty());
}

#[test]
fn test_subtype_with_inline_struct() {
    let tree = parse("module M { type record { integer a, integer b } Pair<type T>; }");
    // `type record {` without a name is a subtype whose field carries the struct
    assert_eq!(scope_names(&tree, SynTag::SubTypeDecl), vec!["a", "b", "T"]);
}

#[test]
fn test_enum_type_scope() {
    let tree = parse("module M { type enumerated E { a, b(1), c } }");
    assert_eq!(scope_names(&tree, SynTag::EnumTypeDecl), vec!["a", "b", "c"]);
}

#[test]
fn test_component_and_port_types() {
    let tree = parse(
        r#"
module M {
    type component C {
        var integer v;
        port P p;
        timer t;
        v := 1;
    }
    type port P message {
        inout integer;
        map param (integer m)
    }
}
"#,
    );
    assert_eq!(
        scope_names(&tree, SynTag::ComponentTypeDecl),
        vec!["v", "p", "t"]
    );
    assert_eq!(scope_names(&tree, SynTag::PortMapAttribute), vec!["m"]);
    assert!(scope_names(&tree, SynTag::PortTypeDecl).is_empty());
}

#[test]
fn test_behaviour_spec_parameters() {
    let tree = parse("module M { type record R { function (integer x) return integer cb } }");
    assert_eq!(scope_names(&tree, SynTag::BehaviourSpec), vec!["x"]);
}

#[test]
fn test_definition_accessors() {
    let tree = parse("module M {\n  function foo() {}\n}");
    let def = definitions("foo", &module_node(&tree), &tree)
        .pop()
        .expect("definition of foo");
    assert_eq!(def.name(), "foo");
    assert_eq!(def.ident().kind(), SynTag::Ident);
    assert_eq!(def.node().kind(), SynTag::FuncDecl);
    assert_eq!(def.position().to_string(), "2:12");
    assert_eq!(&tree.text()[def.range()], "foo");
    assert_eq!(def.tree().text(), tree.text());
}

#[test]
#[should_panic(expected = "is not a declaration")]
fn test_module_def_without_declaration_panics() {
    let mut b = GreenNodeBuilder::new();
    b.start_node(SynTag::Module.into());
    b.start_node(SynTag::ModuleDef.into());
    b.start_node(SynTag::IdentExpr.into());
    b.token(SynTag::Ident.into(), "x");
    b.finish_node();
    b.finish_node();
    b.finish_node();
    let module = SyntaxNode::new_root(b.finish());

    let _ = build_scope(&module, &Tree::parse(""));
}
