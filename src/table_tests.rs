use super::*;

fn ival(i: i64) -> Value {
    Value::Integer(i)
}

#[test]
fn insert_and_lookup_small() {
    let mut t = Table::new();
    assert!(t.is_empty());
    assert!(t.index.is_none());

    assert_eq!(t.insert("a", ival(10)), None);
    assert_eq!(t.insert("b", ival(20)), None);
    assert_eq!(t.len(), 2);

    assert_eq!(t.get("a"), Some(&ival(10)));
    assert!(t.get("missing").is_none());
    assert!(t.contains_key("b"));
    assert!(!t.contains_key("c"));

    let (k, v) = t.get_key_value("b").unwrap();
    assert_eq!(k, "b");
    assert_eq!(v.as_integer(), Some(20));
}

#[test]
fn insert_replaces_in_place() {
    let mut t = Table::new();
    t.insert("first", ival(1));
    t.insert("second", ival(2));
    assert_eq!(t.insert("first", ival(3)), Some(ival(1)));
    assert_eq!(t.len(), 2);
    assert_eq!(t.keys().collect::<Vec<_>>(), ["first", "second"]);
    assert_eq!(t["first"].as_integer(), Some(3));
}

#[test]
fn index_is_built_at_threshold() {
    let mut t = Table::new();
    for i in 0..INDEXED_TABLE_THRESHOLD - 1 {
        t.insert(format!("k{i}"), ival(i as i64));
    }
    assert!(t.index.is_none());

    t.insert("k5", ival(5));
    assert!(t.index.is_some());

    for i in 6..40 {
        t.insert(format!("k{i}"), ival(i));
    }
    assert_eq!(t.len(), 40);
    for i in 0..40 {
        let name = format!("k{i}");
        assert_eq!(t.get(&name).and_then(Value::as_integer), Some(i));
    }
    assert_eq!(t.insert("k7", ival(-7)), Some(ival(7)));
    assert_eq!(t.len(), 40);
    assert!(t.get("k40").is_none());
}

#[test]
fn iteration_keeps_insertion_order() {
    let names = ["zeta", "alpha", "mid", "beta", "omega", "gamma", "delta"];
    let t: Table = names.iter().enumerate().map(|(i, n)| (*n, ival(i as i64))).collect();

    assert_eq!(t.keys().collect::<Vec<_>>(), names);
    let values: Vec<i64> = t.values().filter_map(Value::as_integer).collect();
    assert_eq!(values, [0, 1, 2, 3, 4, 5, 6]);

    let pairs: Vec<(&str, i64)> = t
        .iter()
        .map(|(k, v)| (k, v.as_integer().unwrap()))
        .collect();
    assert_eq!(pairs[0], ("zeta", 0));
    assert_eq!(pairs[6], ("delta", 6));

    let owned: Vec<String> = t.into_iter().map(|(k, _)| k).collect();
    assert_eq!(owned, names);
}

#[test]
fn values_mut_and_get_mut() {
    let mut t = Table::new();
    t.insert("a", ival(1));
    t.insert("b", ival(2));
    for v in t.values_mut() {
        if let Value::Integer(i) = v {
            *i += 100;
        }
    }
    if let Some(Value::Integer(i)) = t.get_mut("a") {
        *i += 1;
    }
    assert_eq!(t["a"].as_integer(), Some(102));
    assert_eq!(t["b"].as_integer(), Some(102));
}

#[test]
fn equality_ignores_order() {
    let a: Table = [("x", ival(1)), ("y", ival(2))].into_iter().collect();
    let b: Table = [("y", ival(2)), ("x", ival(1))].into_iter().collect();
    let c: Table = [("y", ival(3)), ("x", ival(1))].into_iter().collect();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, Table::new());
}

#[test]
#[should_panic(expected = "no entry found for key `nope`")]
fn index_missing_key_panics() {
    let t = Table::new();
    let _ = &t["nope"];
}

#[test]
fn debug_is_a_map() {
    let mut t = Table::new();
    t.insert("a", ival(1));
    assert_eq!(format!("{t:?}"), r#"{"a": Integer(1)}"#);
}
