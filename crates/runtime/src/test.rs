use std::rc::Rc;

use bigdecimal::BigDecimal;
use expect_test::expect;
use num_bigint::{BigInt, BigUint};
use num_traits::{Pow, Signed};
use test_env_log::test;
use ttcn3_syn::ast::{AstNode, FuncDecl};
use ttcn3_syn::Tree;

use crate::builtins::{self, log_line};
use crate::{Bitstring, Environment, Function, Object, ObjectType, Unit, ValueError, Verdict};

fn call(name: &str, args: &[Object]) -> Object {
    builtins::lookup(name)
        .unwrap_or_else(|| panic!("no builtin {}", name))
        .call(args)
}

fn bits(s: &str) -> Object {
    Object::bitstring_from_literal(s).unwrap_or_else(|e| panic!("{}", e))
}

fn int(s: &str) -> Object {
    Object::int_from_literal(s).unwrap_or_else(|e| panic!("{}", e))
}

fn float(s: &str) -> Object {
    Object::float_from_literal(s).unwrap_or_else(|e| panic!("{}", e))
}

#[test]
fn test_bitstring_literals() {
    expect![["'1010'B"]].assert_eq(&bits("'1010'B").inspect());
    expect![["'ff'H"]].assert_eq(&bits("'FF'H").inspect());
    expect![["'ff'O"]].assert_eq(&bits("'fF'o").inspect());
    expect![["'abc'H"]].assert_eq(&bits("' A B\tC 'H").inspect());
    // leading zeros are not kept
    expect![["'1'B"]].assert_eq(&bits("'0001'B").inspect());
    expect![["'0'H"]].assert_eq(&bits("'000'H").inspect());

    let b = Bitstring::parse("'1010'b").expect("valid bitstring");
    assert_eq!(b.unit(), Unit::Bit);
    assert_eq!(b.value(), &BigUint::from(10u32));
}

#[test]
fn test_malformed_bitstrings() {
    for s in ["'12'X", "'12'B", "'G'H", "''B", "' 'B", "'1'", "1010B", "'1010B", ""] {
        assert_eq!(
            Bitstring::parse(s),
            Err(ValueError::InvalidBitstring(s.to_owned())),
            "{}",
            s
        );
    }
}

#[test]
fn test_number_literals() {
    assert_eq!(int("42").as_int(), Some(&BigInt::from(42)));
    expect![["123456789012345678901234567890"]]
        .assert_eq(&int("123456789012345678901234567890").inspect());
    assert!(matches!(
        Object::int_from_literal("4x"),
        Err(ValueError::InvalidInteger(_))
    ));

    expect![["1.5"]].assert_eq(&float("1.5").inspect());
    expect![["0.1"]].assert_eq(&float("0.10").inspect());
    expect![["2.0"]].assert_eq(&float("2").inspect());
    expect![["1500.0"]].assert_eq(&float("1.5e3").inspect());
    expect![["-3.0"]].assert_eq(&float("-3.000").inspect());
    expect![["0.0"]].assert_eq(&float("0.000").inspect());
    expect![["-0.001"]].assert_eq(&float("-1e-3").inspect());
    // never an exponent, however small or large
    expect![["0.00000000000000000001"]].assert_eq(&float("1e-20").inspect());
    expect![["1000000000000000000000000000000.0"]].assert_eq(&float("1e30").inspect());
    assert!(matches!(
        Object::float_from_literal("1.2.3"),
        Err(ValueError::InvalidFloat(_))
    ));
}

#[test]
fn test_inspect() {
    assert_eq!(Object::Undefined.inspect(), "undefined");
    assert_eq!(Object::from(true).inspect(), "true");
    assert_eq!(Object::from("hello").inspect(), "hello");
    assert_eq!(Object::error("boom").inspect(), "Error: boom");
    assert_eq!(Object::from(Verdict::Inconc).inspect(), "inconc");
    assert_eq!(
        Object::ReturnValue(Box::new(Object::from(7))).inspect(),
        "7"
    );
    assert_eq!(
        Object::List(vec![Some(Object::from(1)), None, Some(Object::from("x"))]).inspect(),
        "{1, null, x}"
    );
    assert_eq!(Object::List(vec![]).inspect(), "{}");

    let log = builtins::lookup("log").expect("log");
    assert_eq!(Object::Builtin(log).inspect(), "builtin function");
    assert_eq!(Object::from(3).to_string(), "3");
}

#[test]
fn test_function_inspect_lists_parameters() {
    let tree = Tree::parse("module M { function f(integer a, charstring b) { return a; } }");
    let func = tree
        .root()
        .descendants()
        .find_map(FuncDecl::cast)
        .expect("function");
    let obj = Object::Function(Rc::new(Function {
        params: func.pars(),
        body: func.body().expect("body"),
        env: Environment::new(None),
    }));
    assert_eq!(obj.inspect(), r#"function("a, b")"#);
    assert_eq!(obj.object_type(), ObjectType::Function);
}

#[test]
fn test_object_types() {
    let cases = [
        (Object::Undefined, "undefined"),
        (Object::error("e"), "runtime error"),
        (Object::ReturnValue(Box::new(Object::Undefined)), "return value"),
        (Object::from(1), "integer"),
        (float("1.0"), "float"),
        (Object::from(false), "boolean"),
        (Object::from("s"), "string"),
        (bits("'1'B"), "bitstring"),
        (Object::List(vec![]), "list"),
        (Object::Verdict(Verdict::Pass), "verdict"),
    ];
    for (obj, name) in cases {
        assert_eq!(obj.object_type().to_string(), name);
    }
    assert!(Object::error("e").is_error());
    assert!(!Object::Undefined.is_error());
}

#[test]
fn test_verdict_keywords() {
    for v in [
        Verdict::None,
        Verdict::Pass,
        Verdict::Inconc,
        Verdict::Fail,
        Verdict::Error,
    ] {
        assert_eq!(Verdict::from_keyword(v.as_str()), Some(v));
    }
    assert_eq!(Verdict::from_keyword("maybe"), None);
}

#[test]
fn test_environment_lookup_falls_through() {
    let outer = Environment::new(None);
    outer.set("x", Object::from(1));
    let inner = outer.enclosed();

    assert_eq!(inner.get("x").and_then(|v| v.as_int().cloned()), Some(1.into()));
    assert!(inner.get("y").is_none());
    assert!(!inner.is_bound_locally("x"));
}

#[test]
fn test_environment_set_is_local() {
    let outer = Environment::new(None);
    outer.set("x", Object::from(1));
    let inner = outer.enclosed();

    let returned = inner.set("x", Object::from(2));
    assert_eq!(returned.inspect(), "2");
    assert_eq!(inner.get("x").map(|v| v.inspect()).as_deref(), Some("2"));
    // the outer binding is shadowed, not updated
    assert_eq!(outer.get("x").map(|v| v.inspect()).as_deref(), Some("1"));
    assert!(inner.is_bound_locally("x"));
}

#[test]
fn test_environment_clones_share_bindings() {
    let env = Environment::new(None);
    let captured = env.clone();
    env.set("late", Object::from("bound"));
    assert_eq!(
        captured.get("late").map(|v| v.inspect()).as_deref(),
        Some("bound")
    );
    assert!(captured.enclosed().outer().is_some());
}

#[test]
fn test_lengthof() {
    assert_eq!(call("lengthof", &[Object::from("héllo")]).inspect(), "5");
    assert_eq!(call("lengthof", &[bits("'1010'B")]).inspect(), "4");
    assert_eq!(call("lengthof", &[bits("'FF'H")]).inspect(), "2");
    // octets are counted in 4-bit steps
    assert_eq!(call("lengthof", &[bits("'FFFF'O")]).inspect(), "4");
    // the bit length of the magnitude
    assert_eq!(call("lengthof", &[bits("'0001'B")]).inspect(), "1");

    assert_eq!(
        call("lengthof", &[Object::from(1)]).inspect(),
        "Error: integer arguments not supported"
    );
    assert_eq!(
        call("lengthof", &[]).inspect(),
        "Error: wrong number of arguments. got=0, want=1"
    );
}

#[test]
fn test_rnd() {
    for _ in 0..16 {
        let f = call("rnd", &[]);
        let f = f.as_float().expect("rnd returns a float");
        assert!(*f >= BigDecimal::from(0) && *f < BigDecimal::from(1), "{}", f);

        // the shortest text of the sampled double, in plain notation
        let text = Object::Float(f.clone()).inspect();
        assert!(text.starts_with("0."), "{}", text);
        assert!(!text.contains(|c: char| c == 'e' || c == 'E'), "{}", text);
        let significant = text[2..].trim_start_matches('0');
        assert!(significant.len() <= 17, "{}", text);
    }
    assert_eq!(
        call("rnd", &[Object::from(1)]).inspect(),
        "Error: wrong number of arguments. got=1, want=0"
    );
}

#[test]
fn test_int2float() {
    assert_eq!(call("int2float", &[Object::from(3)]).inspect(), "3.0");
    // rounds through a double
    let big = call("int2float", &[int("9007199254740993")]);
    assert_eq!(big.inspect(), "9007199254740992.0");
    assert_eq!(call("int2float", &[int("-5")]).inspect(), "-5.0");
    assert_eq!(
        call("int2float", &[Object::from("1")]).inspect(),
        "Error: string arguments not supported"
    );
}

#[test]
fn test_int2float_beyond_double_range() {
    let huge = BigInt::from(10).pow(400u32);
    let f = call("int2float", &[Object::Int(huge.clone())]);
    assert_eq!(f.object_type(), ObjectType::Float, "{}", f);
    assert!(f.inspect().ends_with(".0"));

    // rounded to the precision of a double, so close but not equal
    let back = call("float2int", &[f]);
    let back = back.as_int().expect("float2int returns an integer");
    let diff = (back - &huge).abs();
    assert!(diff > BigInt::from(0));
    assert!(diff <= &huge >> 52usize);

    let neg = call("int2float", &[Object::Int(-huge)]);
    assert!(neg.inspect().starts_with('-'), "{}", neg);
}

#[test]
fn test_int_float_round_trip_loses_precision_above_2_pow_53() {
    let round_trip = |s: &str| {
        let f = call("int2float", &[int(s)]);
        call("float2int", &[f]).inspect()
    };
    assert_eq!(round_trip("9007199254740992"), "9007199254740992");
    assert_eq!(round_trip("9007199254740993"), "9007199254740992");
    assert_eq!(round_trip("-42"), "-42");
}

#[test]
fn test_float2int_truncates() {
    assert_eq!(call("float2int", &[float("2.7")]).inspect(), "2");
    assert_eq!(call("float2int", &[float("-2.7")]).inspect(), "-2");
    assert_eq!(call("float2int", &[float("1.5e3")]).inspect(), "1500");
    assert_eq!(
        call("float2int", &[Object::from(true)]).inspect(),
        "Error: boolean arguments not supported"
    );
    assert_eq!(
        call("float2int", &[float("1.0"), float("2.0")]).inspect(),
        "Error: wrong number of arguments. got=2, want=1"
    );
}

#[test]
fn test_log() {
    assert_eq!(log_line(&[Object::from("a"), Object::from(1)]), "a 1");
    assert_eq!(log_line(&[]), "");
    assert!(call("log", &[Object::from("x")]).is_undefined());
}

#[test]
fn test_builtin_table() {
    let names = builtins::all().iter().map(|b| b.name()).collect::<Vec<_>>();
    pretty_assertions::assert_eq!(names, vec!["lengthof", "rnd", "int2float", "float2int", "log"]);
    assert!(builtins::lookup("nope").is_none());
    assert_eq!(builtins::lookup("rnd"), builtins::lookup("rnd"));
}
