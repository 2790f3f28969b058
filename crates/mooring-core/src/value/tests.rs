use crate::value::Value;
use std::collections::BTreeMap;

#[test]
fn strict_eq_does_not_coerce_text_and_numbers() {
    assert!(!Value::from("1").strict_eq(&Value::Int(1)));
    assert!(!Value::Int(1).strict_eq(&Value::from("1")));
    assert!(!Value::Bool(true).strict_eq(&Value::Int(1)));
}

#[test]
fn strict_eq_treats_ints_and_integral_floats_as_one_number_kind() {
    assert!(Value::Int(10).strict_eq(&Value::Float(10.0)));
    assert!(Value::Float(10.0).strict_eq(&Value::Int(10)));
    assert!(!Value::Int(10).strict_eq(&Value::Float(10.5)));
    assert!(!Value::Int(i64::MAX).strict_eq(&Value::Float(f64::INFINITY)));
}

#[test]
fn strict_eq_nan_never_matches() {
    assert!(!Value::Float(f64::NAN).strict_eq(&Value::Float(f64::NAN)));
}

#[test]
fn strict_eq_null_matches_null_only() {
    assert!(Value::Null.strict_eq(&Value::Null));
    assert!(!Value::Null.strict_eq(&Value::Int(0)));
    assert!(!Value::Null.strict_eq(&Value::from("")));
}

#[test]
fn strict_eq_rejects_composite_values() {
    let list = Value::List(vec![Value::Int(1)]);
    assert!(!list.strict_eq(&list.clone()));

    let map = Value::Map(BTreeMap::from([("a".to_string(), Value::Int(1))]));
    assert!(!map.strict_eq(&map.clone()));
}

#[test]
fn untagged_decoding_keeps_integers_integral() {
    let decoded: Vec<Value> =
        serde_json::from_str(r#"[10, 10.5, null, true, "x", [1], {"k": 2}]"#)
            .expect("json should decode");

    assert_eq!(decoded[0], Value::Int(10));
    assert_eq!(decoded[1], Value::Float(10.5));
    assert_eq!(decoded[2], Value::Null);
    assert_eq!(decoded[3], Value::Bool(true));
    assert_eq!(decoded[4], Value::from("x"));
    assert_eq!(decoded[5], Value::List(vec![Value::Int(1)]));
    assert_eq!(
        decoded[6],
        Value::Map(BTreeMap::from([("k".to_string(), Value::Int(2))]))
    );
}

#[test]
fn option_conversion_maps_none_to_null() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some(3)), Value::Int(3));
}
