use test_env_log::test;
use ttcn3_syn::{Position, SynTag, Tree};

use super::*;

const SOURCE: &str = r#"module M {
    type integer Byte;
    type enumerated Color { red, green }
    function f(integer a) return integer {
        var Byte b := a;
        if (b > 0) {
            var Color c := red;
        }
        return a;
    }
    const integer x := 1;
    var integer x;
}
"#;

fn parse(source: &str) -> Tree {
    let tree = Tree::parse(source);
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    tree
}

fn at(line: usize, column: usize) -> Position {
    Position { line, column }
}

#[test]
fn test_parameter_from_function_body() {
    let tree = parse(SOURCE);
    // `a` in `return a;`
    let defs = goto_definition(&tree, at(9, 16));
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name(), "a");
    assert_eq!(defs[0].node().kind(), SynTag::FormalPar);
    assert_eq!(defs[0].position(), at(4, 24));
}

#[test]
fn test_module_type_from_nested_function() {
    let tree = parse(SOURCE);
    // `Byte` in `var Byte b`
    let defs = goto_definition(&tree, at(5, 13));
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].node().kind(), SynTag::Field);
    assert_eq!(defs[0].position(), at(2, 18));
}

#[test]
fn test_promoted_enumerator() {
    let tree = parse(SOURCE);
    // `red` inside the nested block
    let defs = goto_definition(&tree, at(7, 28));
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].node().kind(), SynTag::EnumTypeDecl);
    assert_eq!(defs[0].position(), at(3, 29));
}

#[test]
fn test_innermost_declaration_wins() {
    let tree = parse(SOURCE);
    // `b` in the `if` condition resolves to the local, not anything outside
    let defs = goto_definition(&tree, at(6, 13));
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].position(), at(5, 18));

    // the cursor right after an identifier still finds it
    assert_eq!(goto_definition(&tree, at(6, 14)).len(), 1);
}

#[test]
fn test_nothing_to_resolve() {
    let tree = parse(SOURCE);
    // on a keyword
    assert!(goto_definition(&tree, at(4, 6)).is_empty());
    // past the last line
    assert!(goto_definition(&tree, at(40, 1)).is_empty());
    // an undeclared name
    let tree = parse("module M { const integer y := z; }");
    assert!(goto_definition(&tree, at(1, 31)).is_empty());
}

#[test]
fn test_symbols_in_source_order() {
    let tree = parse(SOURCE);
    let syms = symbols(&tree)
        .into_iter()
        .map(|sym| format!("{} {:?} {}", sym.name, sym.kind, sym.position))
        .collect::<Vec<_>>();
    pretty_assertions::assert_eq!(
        syms,
        vec![
            "Byte Field 2:18",
            "Color EnumTypeDecl 3:21",
            "red EnumTypeDecl 3:29",
            "green EnumTypeDecl 3:34",
            "f FuncDecl 4:14",
            "x ValueDecl 11:19",
            "x ValueDecl 12:17",
        ]
    );
}

#[test]
fn test_redeclarations() {
    let tree = parse(SOURCE);
    let found = redeclarations(&tree);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].latest.name(), "x");
    assert_eq!(found[0].latest.position(), at(12, 17));
    assert_eq!(found[0].previous.len(), 1);
    assert_eq!(found[0].previous[0].position(), at(11, 19));

    expect_test::expect![[r#"
        error: `x` is declared more than once
          --> m.ttcn3:12:17
           |
        12 |     var integer x;
           |                 ^
           = note: previously declared at 11:19
    "#]]
    .assert_eq(&render_redeclaration("m.ttcn3", &found[0]));
}

#[test]
fn test_group_redeclaration_is_reported_once() {
    let tree = parse(
        r#"
module M {
    group G {
        const integer g := 1;
        const integer g := 2;
    }
    function f() {
        var integer l;
        var integer l;
    }
}
"#,
    );
    let found = redeclarations(&tree)
        .iter()
        .map(|r| (r.latest.name().to_owned(), r.latest.position().line))
        .collect::<Vec<_>>();
    assert_eq!(found, vec![("g".to_owned(), 5), ("l".to_owned(), 9)]);
}
