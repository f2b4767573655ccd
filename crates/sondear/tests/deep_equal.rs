//! Deep-equality behavior across both comparison modes.
//!
//! Exercises the cycle-memoized comparator end to end: mode divergence,
//! collection order independence, and the float typed-array quirk.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use sondear::prelude::*;

// ============================================================================
// Mode divergence
// ============================================================================

#[test]
fn test_loose_coerces_strict_does_not() {
    assert!(is_deep_equal(&Value::from(1), &Value::from("1")));
    assert!(!is_deep_strict_equal(&Value::from(1), &Value::from("1")));
}

#[test]
fn test_nan_equals_nan_in_both_modes() {
    let nan = Value::Number(f64::NAN);
    assert!(is_deep_equal(&nan, &nan.clone()));
    assert!(is_deep_strict_equal(&nan, &nan.clone()));
}

#[test]
fn test_signed_zero_distinguished_only_in_strict() {
    let pos = Value::Number(0.0);
    let neg = Value::Number(-0.0);
    assert!(is_deep_equal(&pos, &neg));
    assert!(!is_deep_strict_equal(&pos, &neg));
}

#[test]
fn test_prototype_identity_only_in_strict() {
    let plain = Value::object([("x", Value::from(1))]);
    let classy = Value::class_object("Point", [("x", Value::from(1))]);
    assert!(is_deep_equal(&plain, &classy));
    assert!(!is_deep_strict_equal(&plain, &classy));
}

// ============================================================================
// Nested structures
// ============================================================================

fn nested(y: i32) -> Value {
    Value::object([(
        "x",
        Value::array([Value::from(1), Value::object([("y", Value::from(y))])]),
    )])
}

#[test]
fn test_nested_structural_equality() {
    assert!(is_deep_strict_equal(&nested(2), &nested(2)));
    assert!(!is_deep_strict_equal(&nested(2), &nested(3)));
}

#[test]
fn test_array_holes_compare_as_holes() {
    let a = Value::sparse_array(vec![Some(Value::from(1)), None, Some(Value::from(3))]);
    let b = Value::sparse_array(vec![Some(Value::from(1)), None, Some(Value::from(3))]);
    let c = Value::array([Value::from(1), Value::Undefined, Value::from(3)]);
    assert!(is_deep_strict_equal(&a, &b));
    // A hole is an absent index, so a present undefined never matches it,
    // in either mode.
    assert!(!is_deep_strict_equal(&a, &c));
    assert!(!is_deep_equal(&a, &c));
}

// ============================================================================
// Cycles
// ============================================================================

#[test]
fn test_self_referential_objects_are_equal() {
    let a = Value::object::<&str, _>([]);
    a.as_object().unwrap().set("self", a.clone());
    let b = Value::object::<&str, _>([]);
    b.as_object().unwrap().set("self", b.clone());
    assert!(is_deep_equal(&a, &b));
    assert!(is_deep_strict_equal(&a, &b));
}

#[test]
fn test_mutually_referential_structures_terminate() {
    let a1 = Value::object::<&str, _>([]);
    let a2 = Value::object::<&str, _>([]);
    a1.as_object().unwrap().set("next", a2.clone());
    a2.as_object().unwrap().set("next", a1.clone());

    let b1 = Value::object::<&str, _>([]);
    let b2 = Value::object::<&str, _>([]);
    b1.as_object().unwrap().set("next", b2.clone());
    b2.as_object().unwrap().set("next", b1.clone());

    assert!(is_deep_strict_equal(&a1, &b1));
}

#[test]
fn test_cycle_position_mismatch_detected() {
    // a points straight back at itself; b reaches a self-cycle one hop in.
    let a = Value::object::<&str, _>([]);
    a.as_object().unwrap().set("me", a.clone());
    let inner = Value::object::<&str, _>([]);
    inner.as_object().unwrap().set("me", inner.clone());
    let b = Value::object([("me", inner)]);
    assert!(is_deep_strict_equal(&a, &b));
}

#[test]
fn test_deeply_nested_structures_terminate() {
    let build = || {
        let mut v = Value::from(0);
        for _ in 0..512 {
            v = Value::array([v]);
        }
        v
    };
    assert!(is_deep_strict_equal(&build(), &build()));
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_set_equality_ignores_insertion_order() {
    let a = Value::set([Value::from(1), Value::from(2)]);
    let b = Value::set([Value::from(2), Value::from(1)]);
    assert!(is_deep_equal(&a, &b));
    assert!(is_deep_strict_equal(&a, &b));
}

#[test]
fn test_map_equality_ignores_insertion_order() {
    let a = Value::map([
        (Value::from(1), Value::from("a")),
        (Value::from(2), Value::from("b")),
    ]);
    let b = Value::map([
        (Value::from(2), Value::from("b")),
        (Value::from(1), Value::from("a")),
    ]);
    assert!(is_deep_equal(&a, &b));
    assert!(is_deep_strict_equal(&a, &b));
}

#[test]
fn test_loose_map_keys_coerce() {
    let a = Value::map([(Value::from(1), Value::from("a"))]);
    let b = Value::map([(Value::from("1"), Value::from("a"))]);
    assert!(is_deep_equal(&a, &b));
    assert!(!is_deep_strict_equal(&a, &b));
}

// ============================================================================
// Typed arrays
// ============================================================================

#[test]
fn test_float_typed_array_nan_unequal_in_loose_mode() {
    // Plain NaN primitives compare equal, but float typed arrays go
    // element-wise through `!=` in loose mode, so NaN never matches itself.
    let a = Value::float64_array(&[f64::NAN]);
    let b = Value::float64_array(&[f64::NAN]);
    assert!(!is_deep_equal(&a, &b));
    assert!(is_deep_strict_equal(&a, &b));
}

#[test]
fn test_typed_array_kinds_never_cross_compare() {
    let ints = Value::int8_array(&[1, 2]);
    let uints = Value::uint8_array(&[1, 2]);
    assert!(!is_deep_strict_equal(&ints, &uints));
    assert!(!is_deep_equal(&ints, &uints));
}

// ============================================================================
// JSON bridge
// ============================================================================

#[test]
fn test_json_values_compare_structurally() {
    let json: serde_json::Value =
        serde_json::from_str(r#"{"a": 1, "b": [true, null, "x"]}"#).expect("valid json");
    let a = Value::from_json(&json);
    let b = Value::from_json(&json);
    assert!(is_deep_strict_equal(&a, &b));
}

// ============================================================================
// Properties
// ============================================================================

fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        // Finite numbers keep reflexivity meaningful.
        (-1.0e9f64..1.0e9).prop_map(Value::Number),
        any::<i64>().prop_map(|i| Value::BigInt(i128::from(i))),
        "[a-z]{0,8}".prop_map(Value::str),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::array),
            prop::collection::btree_map("[a-z]{1,4}", inner.clone(), 0..4)
                .prop_map(Value::object),
            prop::collection::vec(inner, 0..3).prop_map(Value::set),
        ]
    })
}

proptest! {
    #[test]
    fn prop_reflexive(v in value_strategy()) {
        prop_assert!(is_deep_equal(&v, &v));
        prop_assert!(is_deep_strict_equal(&v, &v));
    }

    #[test]
    fn prop_symmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(is_deep_equal(&a, &b), is_deep_equal(&b, &a));
        prop_assert_eq!(is_deep_strict_equal(&a, &b), is_deep_strict_equal(&b, &a));
    }

    #[test]
    fn prop_strict_implies_loose(a in value_strategy(), b in value_strategy()) {
        if is_deep_strict_equal(&a, &b) {
            prop_assert!(is_deep_equal(&a, &b));
        }
    }

    #[test]
    fn prop_cycle_wrapping_terminates(v in value_strategy()) {
        let a = Value::object([("inner", v.clone())]);
        a.as_object().unwrap().set("cycle", a.clone());
        let b = Value::object([("inner", v)]);
        b.as_object().unwrap().set("cycle", b.clone());
        prop_assert!(is_deep_strict_equal(&a, &b));
    }
}
