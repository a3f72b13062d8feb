use super::*;

#[test]
fn accessors_match_variants() {
    let s = Value::from("hi");
    assert_eq!(s.as_str(), Some("hi"));
    assert_eq!(s.as_integer(), None);
    assert_eq!(s.type_str(), "string");

    let i = Value::from(42i64);
    assert_eq!(i.as_integer(), Some(42));
    assert_eq!(i.as_big_integer(), Some(BigInt::from(42)));
    assert_eq!(i.as_float(), None);
    assert_eq!(i.type_str(), "integer");

    let f = Value::from(1.5);
    assert_eq!(f.as_float(), Some(1.5));
    assert_eq!(f.type_str(), "float");

    let b = Value::from(true);
    assert_eq!(b.as_bool(), Some(true));
    assert_eq!(b.type_str(), "boolean");

    let d = Value::from(Datetime::parse("1979-05-27"));
    assert!(d.as_datetime().is_some_and(Datetime::is_date));
    assert_eq!(d.type_str(), "datetime");
}

#[test]
fn big_integer_accessors() {
    let small = Value::BigInteger(BigInt::from(-7));
    assert_eq!(small.as_integer(), Some(-7));
    assert_eq!(small.type_str(), "integer");

    let big: BigInt = "123456789012345678901234567890".parse().unwrap();
    let value = Value::from(big.clone());
    assert_eq!(value.as_integer(), None);
    assert_eq!(value.as_big_integer(), Some(big));
}

#[test]
fn containers() {
    let mut table = Table::new();
    table.insert("n", Value::from(1i64));
    let mut value = Value::from(table);
    assert_eq!(value.type_str(), "table");
    assert_eq!(value.get("n").and_then(Value::as_integer), Some(1));
    assert!(value.get("missing").is_none());

    if let Some(t) = value.as_table_mut() {
        t.insert("m", Value::from(2i64));
    }
    assert_eq!(value.as_table().map(Table::len), Some(2));

    let mut array = Value::from(Array::from(vec![Value::from(1i64)]));
    assert_eq!(array.type_str(), "array");
    assert!(array.get("n").is_none());
    if let Some(a) = array.as_array_mut() {
        a.push(Value::from(2i64));
    }
    assert_eq!(array.as_array().map(Array::len), Some(2));
}

#[test]
fn display_is_short() {
    assert_eq!(Value::from("a\"b").to_string(), r#""a\"b""#);
    assert_eq!(Value::from(-3i64).to_string(), "-3");
    assert_eq!(Value::from(false).to_string(), "false");
    assert_eq!(
        Value::from(Datetime::parse("07:32:00.5")).to_string(),
        "07:32:00.5"
    );
    assert_eq!(Value::from(Array::new()).to_string(), "array of 0 values");
    assert_eq!(Value::from(Table::new()).to_string(), "table of 0 keys");
}

#[test]
fn nan_is_not_equal_to_itself() {
    let nan = Value::Float(f64::NAN);
    assert_ne!(nan, nan.clone());
    assert!(nan.as_float().is_some_and(f64::is_nan));
}
