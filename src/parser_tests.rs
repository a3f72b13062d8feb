use crate::{BigIntPolicy, ErrorCategory, ErrorKind, ParseOptions, Table, Value};

fn parse_ok(input: &str) -> Table {
    crate::parse(input).unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"))
}

fn parse_err(input: &str) -> crate::Error {
    match crate::parse(input) {
        Ok(table) => panic!("expected {input:?} to fail, got {table:?}"),
        Err(e) => e,
    }
}

fn err_kind(input: &str) -> ErrorKind {
    parse_err(input).kind
}

fn int(table: &Table, key: &str) -> Option<i64> {
    table.get(key).and_then(Value::as_integer)
}

#[test]
fn basic_scalar_values() {
    let v = parse_ok("");
    assert!(v.is_empty());

    let v = parse_ok("a = \"hello\"");
    assert_eq!(v["a"].as_str(), Some("hello"));

    let v = parse_ok("a = 42\nb = -100\nc = 1.5\nd = true\ne = false");
    assert_eq!(int(&v, "a"), Some(42));
    assert_eq!(int(&v, "b"), Some(-100));
    assert_eq!(v["c"].as_float(), Some(1.5));
    assert_eq!(v["d"].as_bool(), Some(true));
    assert_eq!(v["e"].as_bool(), Some(false));
    assert_eq!(v.keys().collect::<Vec<_>>(), ["a", "b", "c", "d", "e"]);

    let v = parse_ok("when = 1979-05-27T07:32:00-08:00");
    assert_eq!(v["when"].as_datetime().map(|d| d.to_string()).as_deref(), Some("1979-05-27T07:32:00-08:00"));
}

#[test]
fn whitespace_and_comments() {
    let v = parse_ok("# leading\n\n  a = 1 # trailing\r\n\tb=2\n# last");
    assert_eq!(int(&v, "a"), Some(1));
    assert_eq!(int(&v, "b"), Some(2));

    let v = parse_ok("a = \"# not a comment\" # but this is");
    assert_eq!(v["a"].as_str(), Some("# not a comment"));

    assert_eq!(err_kind("a = 1 # bad\u{1}"), ErrorKind::ControlCharInComment);
    assert_eq!(err_kind("# bad\u{7f}\na = 1"), ErrorKind::ControlCharInComment);
}

#[test]
fn strings_in_documents() {
    let v = parse_ok(
        "a = 'lit\\n'\nb = \"\"\"\nmulti\nline\"\"\"\nc = '''\nraw \\ text'''\nd = \"a\\tb\\u0041\"",
    );
    assert_eq!(v["a"].as_str(), Some("lit\\n"));
    assert_eq!(v["b"].as_str(), Some("multi\nline"));
    assert_eq!(v["c"].as_str(), Some("raw \\ text"));
    assert_eq!(v["d"].as_str(), Some("a\tbA"));

    let err = parse_err("a = \"\\q\"");
    assert_eq!(err.kind, ErrorKind::UnknownEscape('q'));
    assert_eq!(err.category(), ErrorCategory::MalformedLiteral);

    assert_eq!(err_kind("a = \"open"), ErrorKind::UnterminatedString);
    assert_eq!(err_kind("a = \"x\"\"\"\n"), ErrorKind::ExpectedNewline);
}

#[test]
fn arrays() {
    let v = parse_ok("a = [1, 2, 3]");
    let values: Vec<i64> = v["a"].as_array().unwrap().iter().filter_map(Value::as_integer).collect();
    assert_eq!(values, [1, 2, 3]);

    let v = parse_ok("a = [\n  1, # one\n  2,\n  # nothing\n]");
    assert_eq!(v["a"].as_array().map(|a| a.len()), Some(2));

    let v = parse_ok("a = [[1, 2], [\"x\", 'y'], [], {k = 1}]");
    let a = v["a"].as_array().unwrap();
    assert_eq!(a.len(), 4);
    assert_eq!(a[0].as_array().map(|a| a.len()), Some(2));
    assert_eq!(a[1].as_array().and_then(|a| a[1].as_str()), Some("y"));
    assert!(a[2].as_array().is_some_and(|a| a.is_empty()));
    assert_eq!(a[3].get("k").and_then(Value::as_integer), Some(1));

    // Mixed types are allowed.
    let v = parse_ok("a = [1, 'two', 3.0, true, 1979-05-27]");
    assert_eq!(v["a"].as_array().map(|a| a.len()), Some(5));
}

#[test]
fn array_errors() {
    assert_eq!(err_kind("a = [1, 2"), ErrorKind::UnterminatedStructure);
    assert_eq!(err_kind("a = [1, 2,\n"), ErrorKind::UnterminatedArray);
    assert_eq!(err_kind("a = [,]"), ErrorKind::UnexpectedComma);
    assert_eq!(err_kind("a = [1,,2]"), ErrorKind::UnexpectedComma);
    assert_eq!(err_kind("a = [\"x\" \"y\"]"), ErrorKind::UnexpectedCharacter('"'));
    assert_eq!(err_kind("a = [1 # c\n 2]"), ErrorKind::UnexpectedCharacter('2'));

    let err = parse_err("a = [\n  1,\n  [2,\n");
    assert_eq!(err.kind, ErrorKind::UnterminatedArray);
    assert_eq!((err.line, err.column), (3, 3));
}

#[test]
fn inline_tables() {
    let v = parse_ok("p = { x = 1, y.z = 'two', w = { q = [] } }");
    let p = v["p"].as_table().unwrap();
    assert_eq!(int(p, "x"), Some(1));
    assert_eq!(p["y"].get("z").and_then(Value::as_str), Some("two"));
    assert!(p["w"].get("q").is_some_and(|q| q.as_array().is_some()));

    let v = parse_ok("e = {}");
    assert!(v["e"].as_table().is_some_and(Table::is_empty));

    // Arrays inside inline tables may still span lines.
    let v = parse_ok("t = { a = [\n1,\n2,\n] }");
    assert_eq!(v["t"].get("a").and_then(Value::as_array).map(|a| a.len()), Some(2));
}

#[test]
fn inline_table_errors() {
    assert_eq!(err_kind("t = { a = 1, }"), ErrorKind::TrailingComma);
    assert_eq!(err_kind("t = { a = \"x\",}"), ErrorKind::TrailingComma);
    assert_eq!(err_kind("t = {\n a = 1 }"), ErrorKind::NewlineInInlineTable);
    assert_eq!(err_kind("t = { a = 1\n}"), ErrorKind::NewlineInInlineTable);
    assert_eq!(err_kind("t = { a = 'x'\n}"), ErrorKind::NewlineInInlineTable);
    assert_eq!(err_kind("t = { # c\n a = 1 }"), ErrorKind::CommentInInlineTable);
    assert_eq!(err_kind("t = { a = 1 # c\n}"), ErrorKind::CommentInInlineTable);
    assert_eq!(err_kind("t = { , a = 1 }"), ErrorKind::UnexpectedComma);
    assert_eq!(err_kind("t = { a = 1, a = 2 }"), ErrorKind::DuplicateKey { key: "a".into() });
    assert_eq!(
        err_kind("t = { a.b = 1, a = 2 }"),
        ErrorKind::DuplicateKey { key: "a".into() }
    );
    assert_eq!(err_kind("t = { a = 'x' b = 1 }"), ErrorKind::UnexpectedCharacter('b'));

    let err = parse_err("t = { a = {");
    assert_eq!(err.kind, ErrorKind::UnterminatedInlineTable);
    assert_eq!(err.category(), ErrorCategory::UnterminatedStructure);
    assert_eq!(err.span.start, 10);
}

#[test]
fn inline_tables_are_closed() {
    assert_eq!(
        err_kind("a = { b = 1 }\na.c = 2"),
        ErrorKind::DuplicateKey { key: "a.c".into() }
    );
    assert_eq!(
        err_kind("a = { b = 1 }\n[a]"),
        ErrorKind::DuplicateTable { name: "a".into() }
    );
    assert_eq!(
        err_kind("a = { b = 1 }\n[a.c]"),
        ErrorKind::DuplicateTable { name: "a.c".into() }
    );
}

#[test]
fn tables_and_dotted_keys() {
    let v = parse_ok("a.b = 1\n[a.c]\nd = 2\n[x]\ny.z = 3\n[x.w]");
    assert_eq!(v["a"].get("b").and_then(Value::as_integer), Some(1));
    assert_eq!(v["a"].get("c").and_then(|c| c.get("d")).and_then(Value::as_integer), Some(2));
    assert!(v["x"].get("w").is_some_and(|w| w.as_table().is_some_and(Table::is_empty)));

    let v = parse_ok("[a.b.c]\n[a]\nk = 1");
    assert_eq!(int(v["a"].as_table().unwrap(), "k"), Some(1));

    let v = parse_ok("\"quoted . key\" = 1\n[ 'x' . \"y\" ]\nz = 2");
    assert_eq!(int(&v, "quoted . key"), Some(1));
    assert_eq!(v["x"].get("y").and_then(|y| y.get("z")).and_then(Value::as_integer), Some(2));
}

#[test]
fn table_conflicts() {
    let err = parse_err("a = 1\nb = 2\na = 3");
    assert_eq!(err.kind, ErrorKind::DuplicateKey { key: "a".into() });
    assert_eq!(err.category(), ErrorCategory::StructuralConflict);
    assert_eq!((err.line, err.column), (3, 1));

    assert_eq!(
        err_kind("a.b = 1\n[a]"),
        ErrorKind::DuplicateTable { name: "a".into() }
    );
    assert_eq!(
        err_kind("[a]\n[a]"),
        ErrorKind::DuplicateTable { name: "a".into() }
    );
    assert_eq!(
        err_kind("[a]\nb = 1\n[a.b]"),
        ErrorKind::DuplicateTable { name: "a.b".into() }
    );
    assert_eq!(
        err_kind("[a.b]\n[a]\nb.c = 1"),
        ErrorKind::DottedKeyIntoTable { key: "b.c".into() }
    );
    assert_eq!(
        err_kind("a = 1\na.b = 2"),
        ErrorKind::DuplicateKey { key: "a.b".into() }
    );
}

#[test]
fn arrays_of_tables() {
    let v = parse_ok("[[x]]\n y=1\n[[x]]\n y=2");
    let ys: Vec<i64> = v["x"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t.get("y").and_then(Value::as_integer))
        .collect();
    assert_eq!(ys, [1, 2]);

    let v = parse_ok(
        "[[fruit]]\nname = 'apple'\n[fruit.physical]\ncolor = 'red'\n[[fruit.variety]]\nname = 'red delicious'\n[[fruit.variety]]\nname = 'granny smith'\n[[fruit]]\nname = 'banana'\n[[fruit.variety]]\nname = 'plantain'",
    );
    let fruit = v["fruit"].as_array().unwrap();
    assert_eq!(fruit.len(), 2);
    assert_eq!(fruit[0].get("physical").and_then(|p| p.get("color")).and_then(Value::as_str), Some("red"));
    assert_eq!(fruit[0].get("variety").and_then(Value::as_array).map(|a| a.len()), Some(2));
    assert_eq!(fruit[1].get("variety").and_then(Value::as_array).map(|a| a.len()), Some(1));

    let v = parse_ok("[[a.b]]\nx = 1\n[a]\ny = 2");
    assert_eq!(v["a"].get("y").and_then(Value::as_integer), Some(2));
}

#[test]
fn array_of_tables_conflicts() {
    assert_eq!(
        err_kind("a = []\n[[a]]"),
        ErrorKind::RedefineAsArray { name: "a".into() }
    );
    assert_eq!(
        err_kind("[a]\n[[a]]"),
        ErrorKind::RedefineAsArray { name: "a".into() }
    );
    assert_eq!(
        err_kind("[[a]]\n[a]"),
        ErrorKind::DuplicateTable { name: "a".into() }
    );
    assert_eq!(err_kind("[[a]x"), ErrorKind::ExpectedTableEnd);
    assert_eq!(err_kind("[[a] ]"), ErrorKind::ExpectedTableEnd);
}

#[test]
fn line_structure() {
    assert_eq!(err_kind("a = 1 b = 2"), ErrorKind::InvalidValue);
    assert_eq!(err_kind("a = 'x' b = 2"), ErrorKind::ExpectedNewline);
    assert_eq!(err_kind("[a] b = 1"), ErrorKind::ExpectedNewline);
    assert_eq!(err_kind("a = 1,"), ErrorKind::InvalidValue);
    assert_eq!(err_kind("a ="), ErrorKind::MissingValue);
    assert_eq!(err_kind("a = # nothing"), ErrorKind::MissingValue);
    assert_eq!(err_kind("a"), ErrorKind::IncompleteKey);
    assert_eq!(err_kind("a b = 1"), ErrorKind::IllegalKeyChar);
    assert_eq!(err_kind("[]"), ErrorKind::IllegalKeyChar);
    assert_eq!(err_kind("\"\"\"k\"\"\" = 1"), ErrorKind::MultilineKeyForbidden);
}

#[test]
fn crlf_documents() {
    let v = parse_ok("a = 1\r\n[t]\r\nb = \"\"\"\r\nx\r\ny\"\"\"\r\n");
    assert_eq!(int(&v, "a"), Some(1));
    assert_eq!(v["t"].get("b").and_then(Value::as_str), Some("x\r\ny"));

    // A carriage return on its own is not a line break.
    assert_eq!(err_kind("a = 1\rb = 2"), ErrorKind::InvalidValue);
}

#[test]
fn depth_limit() {
    let options = ParseOptions::default().with_max_depth(3);
    assert!(crate::parse_with("a = [[[]]]", &options).is_ok());
    let err = crate::parse_with("a = [[[[]]]]", &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MaxDepthExceeded);
    assert_eq!(err.category(), ErrorCategory::DepthExceeded);

    // Scalars inside the deepest container count as one more level.
    assert!(crate::parse_with("a = [[[1]]]", &options).is_err());
    assert!(crate::parse_with("a = {b = {c = 1}}", &options).is_ok());
    assert!(crate::parse_with("a = {b = {c = {d = 1}}}", &options).is_err());

    let none = ParseOptions::default().with_max_depth(0);
    assert!(crate::parse_with("", &none).is_ok());
    assert!(crate::parse_with("[t]", &none).is_ok());
    assert!(crate::parse_with("a = 1", &none).is_err());
}

#[test]
fn integer_policy_applies_everywhere() {
    let huge = "a = [123456789012345678901234567890]";
    let err = parse_err(huge);
    assert_eq!(err.kind, ErrorKind::LossyInteger);
    assert_eq!(err.span.start, 5);

    let options = ParseOptions::default().with_integers(BigIntPolicy::AsNeeded);
    let v = crate::parse_with(huge, &options).unwrap();
    let n = v["a"].as_array().unwrap()[0].as_big_integer().unwrap();
    assert_eq!(n.to_string(), "123456789012345678901234567890");

    let options = ParseOptions::default().with_integers(BigIntPolicy::Always);
    let v = crate::parse_with("a = 1\nb = { c = -0 }", &options).unwrap();
    assert!(matches!(v["a"], Value::BigInteger(_)));
    assert!(matches!(v["b"].get("c"), Some(Value::BigInteger(_))));
}

#[test]
fn error_position_and_snippet() {
    let src = "a = 1\nb = 2\nab=\"\u{1}\"\nd = 4";
    let err = parse_err(src);
    assert_eq!(err.kind, ErrorKind::IllegalControlCharacter);
    assert_eq!(err.category(), ErrorCategory::Lexical);
    assert_eq!((err.line, err.column), (3, 5));
    assert_eq!(
        err.code_snippet,
        "2:  b = 2\n3:  ab=\"\u{1}\"\n        ^\n4:  d = 4\n"
    );
}
