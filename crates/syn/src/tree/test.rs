use test_env_log::test;

use super::{Position, Tree};

const SOURCE: &str = "module M {\n  const integer x := 1;\n}\n";

#[test]
fn test_position_of_offset() {
    let tree = Tree::parse(SOURCE);
    assert_eq!(tree.position(0), Position { line: 1, column: 1 });

    let x = SOURCE.find("x :=").expect("x in source");
    assert_eq!(tree.position(x), Position { line: 2, column: 17 });
    assert_eq!(tree.position(x).to_string(), "2:17");
}

#[test]
fn test_offset_round_trip() {
    let tree = Tree::parse(SOURCE);
    for offset in [0, 4, 11, 27, SOURCE.find('}').expect("closing brace")] {
        let pos = tree.position(offset);
        assert_eq!(tree.offset(pos), Some(offset), "at {}", pos);
    }
}

#[test]
fn test_offset_out_of_range() {
    let tree = Tree::parse(SOURCE);
    assert_eq!(tree.offset(Position { line: 0, column: 1 }), None);
    assert_eq!(tree.offset(Position { line: 42, column: 1 }), None);
    // columns past the line end stick to it
    assert_eq!(tree.offset(Position { line: 1, column: 99 }), Some(10));
}

#[test]
fn test_columns_count_characters() {
    let tree = Tree::parse("module M { const charstring s := \"äö\"; }");
    let semi = tree.text().find(';').expect("semicolon");
    assert_eq!(tree.position(semi).column, 38);

    // inside `ä` and inside `ö`
    let a = tree.text().find('ä').expect("umlaut");
    assert_eq!(tree.position(a + 1), tree.position(a));
    assert_eq!(tree.position(a + 3).column, tree.position(a).column + 1);
}

#[test]
fn test_imported_modules() {
    let tree = Tree::parse(
        r#"
module M {
    import from A all;
    group G {
        import from B { const x };
        group H { import from C all except { type T }; }
    }
    function f() {}
}
"#,
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let imports = tree.imported_modules();
    pretty_assertions::assert_eq!(imports, vec!["A", "B", "C"]);
}

#[test]
fn test_module_of_empty_file() {
    let tree = Tree::parse("");
    assert!(tree.module().is_none());
    assert!(tree.imported_modules().is_empty());
}
