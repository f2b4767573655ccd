//! End-to-end assertion surface, including the async rejection helpers.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use sondear::prelude::*;

// ============================================================================
// Equality family
// ============================================================================

#[test]
fn test_strict_equal_short_diff() {
    let err = strict_equal(&Value::from(1), &Value::from(2), None).unwrap_err();
    assert!(err.message.contains("1 !== 2"), "got: {}", err.message);
    assert_eq!(err.operator, Operator::StrictEqual);
    assert!(is_deep_strict_equal(
        err.actual.as_ref().unwrap(),
        &Value::from(1)
    ));
    assert!(is_deep_strict_equal(
        err.expected.as_ref().unwrap(),
        &Value::from(2)
    ));
}

#[test]
fn test_deep_strict_equal_scenario() {
    let build = |y: i32| {
        Value::object([(
            "x",
            Value::array([Value::from(1), Value::object([("y", Value::from(y))])]),
        )])
    };
    assert!(deep_strict_equal(&build(2), &build(2), None).is_ok());
    let err = deep_strict_equal(&build(2), &build(3), None).unwrap_err();
    assert!(err.message.contains("+ actual"), "got: {}", err.message);
    assert!(err.message.contains("- expected"), "got: {}", err.message);
}

#[test]
fn test_element_order_difference_is_reported() {
    let a = Value::array([Value::from(1), Value::from(2)]);
    let b = Value::array([Value::from(2), Value::from(1)]);
    let err = deep_strict_equal(&a, &b, None).unwrap_err();
    assert!(err.message.contains("+ actual"), "got: {}", err.message);
    assert!(
        !err.message.contains("same structure"),
        "got: {}",
        err.message
    );
}

#[test]
fn test_deep_equal_is_loose() {
    let a = Value::object([("n", Value::from(1))]);
    let b = Value::object([("n", Value::from("1"))]);
    assert!(deep_equal(&a, &b, None).is_ok());
    assert!(deep_strict_equal(&a, &b, None).is_err());
}

#[test]
fn test_error_message_is_display() {
    let err = deep_strict_equal(
        &Value::object([("a", Value::from(1))]),
        &Value::object([("a", Value::from(2))]),
        None,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), err.message);
}

// ============================================================================
// Throws scenarios
// ============================================================================

#[test]
fn test_throws_scenario() {
    // A closure that throws a TypeError satisfies the TypeError matcher.
    let outcome = throws(
        || Err(Value::error("TypeError", "bad")),
        Some(&ErrorMatcher::Name("TypeError".into())),
        None,
    );
    assert!(outcome.is_ok());

    // A closure that does not throw fails with the missing-exception text.
    let err = throws(
        || Ok(Value::Undefined),
        Some(&ErrorMatcher::Name("TypeError".into())),
        None,
    )
    .unwrap_err();
    assert_eq!(err.message, "Missing expected exception.");
}

// ============================================================================
// Async rejection helpers
// ============================================================================

#[tokio::test]
async fn test_rejects_accepts_rejection() {
    let reason = rejects(
        async { Err(Value::error("Error", "nope")) },
        Some(&ErrorMatcher::Message("nope".into())),
        None,
    )
    .await
    .unwrap();
    assert!(instance_of(&reason, "Error", None).is_ok());
}

#[tokio::test]
async fn test_rejects_fails_on_resolution() {
    let err = rejects(async { Ok(Value::from(1)) }, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Missing expected rejection.");
}

#[tokio::test]
async fn test_rejects_validates_reason() {
    let err = rejects(
        async { Err(Value::error("RangeError", "oops")) },
        Some(&ErrorMatcher::Name("TypeError".into())),
        None,
    )
    .await
    .unwrap_err();
    assert_eq!(err.operator, Operator::Rejects);
}

#[tokio::test]
async fn test_does_not_reject() {
    let value = does_not_reject(async { Ok(Value::from(7)) }, None, None)
        .await
        .unwrap();
    assert!(strict_equal(&value, &Value::from(7), None).is_ok());

    let err = does_not_reject(async { Err(Value::error("Error", "boom")) }, None, None)
        .await
        .unwrap_err();
    assert!(err.message.contains("Got unwanted rejection."));
    assert!(err.message.contains("boom"));
}

#[tokio::test]
async fn test_does_not_reject_matcher_scope() {
    // A matching rejection is the unwanted one; a non-matching rejection
    // propagates with its own message.
    let err = does_not_reject(
        async { Err(Value::error("TypeError", "bad")) },
        Some(&ErrorMatcher::Name("TypeError".into())),
        None,
    )
    .await
    .unwrap_err();
    assert!(err.message.contains("Got unwanted rejection."));

    let err = does_not_reject(
        async { Err(Value::error("TypeError", "bad")) },
        Some(&ErrorMatcher::Name("RangeError".into())),
        None,
    )
    .await
    .unwrap_err();
    assert_eq!(err.message, "bad");
}
