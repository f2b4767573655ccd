//! Assertion predicates over dynamic values.
//!
//! Every predicate returns `Result<(), AssertionError>`; a failure carries
//! the operands, the operator, and a message that is either caller-supplied
//! or generated from the diff/inspection machinery. Equality-family
//! failures render a full `+ actual` / `- expected` line diff.

use std::cmp::Ordering;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use thiserror::Error;

use crate::comparison::{
    is_deep_equal, is_deep_strict_equal, loose_primitive_eq, strict_primitive_eq, string_to_number,
};
use crate::diff::{create_err_diff, inspect_operand};
use crate::inspect::thrown_message;
use crate::value::Value;

/// Shorthand for a predicate outcome.
pub type AssertResult = Result<(), AssertionError>;

/// The operator recorded on a failed assertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Operator {
    Equal,
    NotEqual,
    StrictEqual,
    NotStrictEqual,
    DeepEqual,
    NotDeepEqual,
    DeepStrictEqual,
    NotDeepStrictEqual,
    /// [`Operator::StrictEqual`] reclassified when both operands are objects.
    StrictEqualObject,
    NotStrictEqualObject,
    /// Structurally identical operands that differ only by reference.
    NotIdentical,
    Ok,
    Fail,
    IfError,
    Match,
    DoesNotMatch,
    Includes,
    NotIncludes,
    Contains,
    NotContains,
    TypeOf,
    InstanceOf,
    NotInstanceOf,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Throws,
    DoesNotThrow,
    Rejects,
    DoesNotReject,
}

impl Operator {
    /// Human-readable claim printed above equality-family diffs.
    #[must_use]
    pub const fn readable(self) -> &'static str {
        match self {
            Self::Equal => "Expected values to be loosely equal:",
            Self::NotEqual => "Expected \"actual\" to be loosely unequal to:",
            Self::StrictEqual => "Expected values to be strictly equal:",
            Self::NotStrictEqual => "Expected \"actual\" to be strictly unequal to:",
            Self::DeepEqual => "Expected values to be loosely deep-equal:",
            Self::NotDeepEqual => "Expected \"actual\" not to be loosely deep-equal to:",
            Self::DeepStrictEqual => "Expected values to be strictly deep-equal:",
            Self::NotDeepStrictEqual => "Expected \"actual\" not to be strictly deep-equal to:",
            Self::StrictEqualObject => {
                "Expected \"actual\" to be reference-equal to \"expected\":"
            }
            Self::NotStrictEqualObject => {
                "Expected \"actual\" not to be reference-equal to \"expected\":"
            }
            Self::NotIdentical => "Values have same structure but are not reference-equal:",
            Self::Ok => "The expression evaluated to a falsy value:",
            Self::Fail => "Failed",
            Self::IfError => "ifError got unwanted exception:",
            Self::Match => "The input did not match the regular expression",
            Self::DoesNotMatch => "The input was expected to not match the regular expression",
            Self::Includes => "Expected the container to include the value:",
            Self::NotIncludes => "Expected the container not to include the value:",
            Self::Contains => "Expected the collection to contain the member:",
            Self::NotContains => "Expected the collection not to contain the member:",
            Self::TypeOf => "Expected value to have type:",
            Self::InstanceOf => "Expected value to be an instance of:",
            Self::NotInstanceOf => "Expected value not to be an instance of:",
            Self::GreaterThan => "Expected \"actual\" to be greater than \"expected\":",
            Self::GreaterOrEqual => {
                "Expected \"actual\" to be greater than or equal to \"expected\":"
            }
            Self::LessThan => "Expected \"actual\" to be less than \"expected\":",
            Self::LessOrEqual => "Expected \"actual\" to be less than or equal to \"expected\":",
            Self::Throws => "Missing expected exception.",
            Self::DoesNotThrow => "Got unwanted exception.",
            Self::Rejects => "Missing expected rejection.",
            Self::DoesNotReject => "Got unwanted rejection.",
        }
    }

    const fn token(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::StrictEqual => "strictEqual",
            Self::NotStrictEqual => "notStrictEqual",
            Self::DeepEqual => "deepEqual",
            Self::NotDeepEqual => "notDeepEqual",
            Self::DeepStrictEqual => "deepStrictEqual",
            Self::NotDeepStrictEqual => "notDeepStrictEqual",
            Self::StrictEqualObject => "strictEqualObject",
            Self::NotStrictEqualObject => "notStrictEqualObject",
            Self::NotIdentical => "notIdentical",
            Self::Ok => "ok",
            Self::Fail => "fail",
            Self::IfError => "ifError",
            Self::Match => "match",
            Self::DoesNotMatch => "doesNotMatch",
            Self::Includes => "includes",
            Self::NotIncludes => "notIncludes",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::TypeOf => "typeOf",
            Self::InstanceOf => "instanceOf",
            Self::NotInstanceOf => "notInstanceOf",
            Self::GreaterThan => "greaterThan",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::LessThan => "lessThan",
            Self::LessOrEqual => "lessOrEqual",
            Self::Throws => "throws",
            Self::DoesNotThrow => "doesNotThrow",
            Self::Rejects => "rejects",
            Self::DoesNotReject => "doesNotReject",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A failed assertion.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct AssertionError {
    /// Caller-supplied or generated failure text.
    pub message: String,
    /// The asserted value, when the predicate has one.
    pub actual: Option<Value>,
    /// The expectation, when the predicate has one.
    pub expected: Option<Value>,
    /// Which predicate failed.
    pub operator: Operator,
    /// Whether `message` was generated rather than caller-supplied.
    pub generated_message: bool,
}

impl AssertionError {
    fn new(
        actual: Option<Value>,
        expected: Option<Value>,
        operator: Operator,
        message: Option<&str>,
    ) -> Self {
        let (message, generated_message) = match message {
            Some(m) => (m.to_owned(), false),
            None => (
                generate_message(actual.as_ref(), expected.as_ref(), operator),
                true,
            ),
        };
        tracing::trace!(operator = %operator, "assertion failed");
        Self {
            message,
            actual,
            expected,
            operator,
            generated_message,
        }
    }

    fn generated(
        message: String,
        actual: Option<Value>,
        expected: Option<Value>,
        operator: Operator,
    ) -> Self {
        tracing::trace!(operator = %operator, "assertion failed");
        Self {
            message,
            actual,
            expected,
            operator,
            generated_message: true,
        }
    }
}

fn generate_message(actual: Option<&Value>, expected: Option<&Value>, operator: Operator) -> String {
    match operator {
        Operator::Equal | Operator::StrictEqual | Operator::DeepEqual | Operator::DeepStrictEqual => {
            match (actual, expected) {
                (Some(a), Some(e)) => create_err_diff(a, e, operator),
                _ => operator.readable().to_owned(),
            }
        }
        Operator::NotEqual
        | Operator::NotStrictEqual
        | Operator::NotDeepEqual
        | Operator::NotDeepStrictEqual => {
            let Some(a) = actual else {
                return operator.readable().to_owned();
            };
            let rendered = inspect_operand(a);
            let mut lines: Vec<&str> = rendered.split('\n').collect();
            if lines.len() == 1 && lines[0].len() <= 5 {
                return format!("{} {}", operator.readable(), lines[0]);
            }
            if lines.len() > 50 {
                lines.truncate(50);
                return format!("{}\n\n{}\n...\n", operator.readable(), lines.join("\n"));
            }
            format!("{}\n\n{rendered}\n", operator.readable())
        }
        Operator::Fail | Operator::Throws | Operator::Rejects => operator.readable().to_owned(),
        _ => {
            let a = actual.map_or_else(|| "undefined".to_owned(), |v| clipped(v, 512));
            let e = expected.map_or_else(|| "undefined".to_owned(), |v| clipped(v, 512));
            format!("{a} {operator} {e}")
        }
    }
}

fn clipped(value: &Value, max: usize) -> String {
    let mut rendered = inspect_operand(value);
    if rendered.len() > max {
        let mut cut = max - 3;
        while !rendered.is_char_boundary(cut) {
            cut -= 1;
        }
        rendered.truncate(cut);
        rendered.push_str("...");
    }
    rendered
}

/// JS truthiness.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::BigInt(i) => *i != 0,
        Value::Str(s) => !s.is_empty(),
        Value::Symbol(_) | Value::Object(_) => true,
    }
}

/// `==`-family scalar equality with reference equality for objects.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        (Value::Object(_), _) | (_, Value::Object(_)) => false,
        _ => loose_primitive_eq(a, b),
    }
}

/// `Object.is`-family equality with reference equality for objects.
fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        (Value::Object(_), _) | (_, Value::Object(_)) => false,
        _ => strict_primitive_eq(a, b),
    }
}

/// Assert that `value` is truthy.
pub fn ok(value: &Value, message: Option<&str>) -> AssertResult {
    if is_truthy(value) {
        return Ok(());
    }
    if let Some(m) = message {
        return Err(AssertionError::new(
            Some(value.clone()),
            Some(Value::Bool(true)),
            Operator::Ok,
            Some(m),
        ));
    }
    Err(AssertionError::generated(
        format!("{}\n\n{}\n", Operator::Ok.readable(), inspect_operand(value)),
        Some(value.clone()),
        Some(Value::Bool(true)),
        Operator::Ok,
    ))
}

/// Unconditionally fail.
pub fn fail(message: Option<&str>) -> AssertResult {
    Err(AssertionError::new(None, None, Operator::Fail, message))
}

/// Assert loose (`==`) equality. Objects compare by reference.
pub fn equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    if loose_eq(actual, expected) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        Operator::Equal,
        message,
    ))
}

/// Assert loose (`!=`) inequality.
pub fn not_equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    if !loose_eq(actual, expected) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        Operator::NotEqual,
        message,
    ))
}

/// Assert `Object.is`-style equality. Objects compare by reference.
pub fn strict_equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    if strict_eq(actual, expected) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        Operator::StrictEqual,
        message,
    ))
}

/// Assert `Object.is`-style inequality.
pub fn not_strict_equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    if !strict_eq(actual, expected) {
        return Ok(());
    }
    let operator = if actual.is_object() {
        Operator::NotStrictEqualObject
    } else {
        Operator::NotStrictEqual
    };
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        operator,
        message,
    ))
}

/// Assert loose structural equality.
pub fn deep_equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    if is_deep_equal(actual, expected) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        Operator::DeepEqual,
        message,
    ))
}

/// Assert loose structural inequality.
pub fn not_deep_equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    if !is_deep_equal(actual, expected) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        Operator::NotDeepEqual,
        message,
    ))
}

/// Assert strict structural equality.
pub fn deep_strict_equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    if is_deep_strict_equal(actual, expected) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        Operator::DeepStrictEqual,
        message,
    ))
}

/// Assert strict structural inequality.
pub fn not_deep_strict_equal(
    actual: &Value,
    expected: &Value,
    message: Option<&str>,
) -> AssertResult {
    if !is_deep_strict_equal(actual, expected) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        Operator::NotDeepStrictEqual,
        message,
    ))
}

/// `ToNumber` for relational comparison.
fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::BigInt(i) => *i as f64,
        Value::Str(s) => string_to_number(s),
        Value::Symbol(_) | Value::Object(_) => f64::NAN,
    }
}

/// Relational comparison: string pairs compare lexicographically, anything
/// else through `ToNumber`. `None` when either side coerces to NaN.
fn relational(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Value::Str(x), Value::Str(y)) = (a, b) {
        return Some(x.cmp(y));
    }
    to_number(a).partial_cmp(&to_number(b))
}

fn ordering_assert(
    actual: &Value,
    expected: &Value,
    operator: Operator,
    accept: impl Fn(Ordering) -> bool,
    message: Option<&str>,
) -> AssertResult {
    if relational(actual, expected).is_some_and(accept) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(actual.clone()),
        Some(expected.clone()),
        operator,
        message,
    ))
}

/// Assert `actual > expected` under relational coercion.
pub fn greater_than(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    ordering_assert(
        actual,
        expected,
        Operator::GreaterThan,
        |o| o == Ordering::Greater,
        message,
    )
}

/// Assert `actual >= expected` under relational coercion.
pub fn greater_or_equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    ordering_assert(
        actual,
        expected,
        Operator::GreaterOrEqual,
        |o| o != Ordering::Less,
        message,
    )
}

/// Assert `actual < expected` under relational coercion.
pub fn less_than(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    ordering_assert(
        actual,
        expected,
        Operator::LessThan,
        |o| o == Ordering::Less,
        message,
    )
}

/// Assert `actual <= expected` under relational coercion.
pub fn less_or_equal(actual: &Value, expected: &Value, message: Option<&str>) -> AssertResult {
    ordering_assert(
        actual,
        expected,
        Operator::LessOrEqual,
        |o| o != Ordering::Greater,
        message,
    )
}

fn includes_check(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::Str(s) => match needle {
            Value::Str(sub) => s.contains(sub.as_str()),
            _ => false,
        },
        Value::Object(obj) => match &obj.data().kind {
            crate::value::ObjectKind::Array(items) => items
                .iter()
                .flatten()
                .any(|item| is_deep_strict_equal(item, needle)),
            crate::value::ObjectKind::Set(items) => {
                items.iter().any(|item| is_deep_strict_equal(item, needle))
            }
            _ => false,
        },
        _ => false,
    }
}

/// Assert that a string, array, or set contains `needle`. String haystacks
/// take substring needles; collections match members by strict structural
/// equality.
pub fn includes(haystack: &Value, needle: &Value, message: Option<&str>) -> AssertResult {
    if includes_check(haystack, needle) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(haystack.clone()),
        Some(needle.clone()),
        Operator::Includes,
        message,
    ))
}

/// Assert that a string, array, or set does not contain `needle`.
pub fn not_includes(haystack: &Value, needle: &Value, message: Option<&str>) -> AssertResult {
    if !includes_check(haystack, needle) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(haystack.clone()),
        Some(needle.clone()),
        Operator::NotIncludes,
        message,
    ))
}

/// Membership in the kinds that carry it: Set members and Map keys, matched
/// by strict structural equality. Everything else has no members.
fn contains_check(collection: &Value, member: &Value) -> bool {
    collection.as_object().is_some_and(|obj| match &obj.data().kind {
        crate::value::ObjectKind::Set(items) => {
            items.iter().any(|item| is_deep_strict_equal(item, member))
        }
        crate::value::ObjectKind::Map(entries) => entries
            .iter()
            .any(|(key, _)| is_deep_strict_equal(key, member)),
        _ => false,
    })
}

/// Assert that a Set contains the member, or a Map contains the key.
pub fn contains(collection: &Value, member: &Value, message: Option<&str>) -> AssertResult {
    if contains_check(collection, member) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(collection.clone()),
        Some(member.clone()),
        Operator::Contains,
        message,
    ))
}

/// Assert that a Set does not contain the member, nor a Map the key.
pub fn not_contains(collection: &Value, member: &Value, message: Option<&str>) -> AssertResult {
    if !contains_check(collection, member) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(collection.clone()),
        Some(member.clone()),
        Operator::NotContains,
        message,
    ))
}

/// Assert that `value.type_of()` equals `expected`.
pub fn type_of(value: &Value, expected: &str, message: Option<&str>) -> AssertResult {
    if value.type_of() == expected {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(value.clone()),
        Some(Value::str(expected)),
        Operator::TypeOf,
        message,
    ))
}

fn instance_check(value: &Value, class: &str) -> bool {
    value.as_object().is_some_and(|obj| {
        let data = obj.data();
        if data.constructor_name.as_deref() == Some(class) {
            return true;
        }
        if data.kind.tag() == class {
            return true;
        }
        matches!(&data.kind, crate::value::ObjectKind::Error { name, .. }
            if name == class || class == "Error")
    })
}

/// Assert that an object is an instance of the named class: its constructor
/// name, category tag, or error class name matches.
pub fn instance_of(value: &Value, class: &str, message: Option<&str>) -> AssertResult {
    if instance_check(value, class) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(value.clone()),
        Some(Value::str(class)),
        Operator::InstanceOf,
        message,
    ))
}

/// Assert that a value is not an instance of the named class.
pub fn not_instance_of(value: &Value, class: &str, message: Option<&str>) -> AssertResult {
    if !instance_check(value, class) {
        return Ok(());
    }
    Err(AssertionError::new(
        Some(value.clone()),
        Some(Value::str(class)),
        Operator::NotInstanceOf,
        message,
    ))
}

fn pattern_failure(
    value: &Value,
    pattern: &regex::Regex,
    operator: Operator,
    message: Option<&str>,
) -> AssertionError {
    match message {
        Some(text) => AssertionError::new(
            Some(value.clone()),
            Some(Value::str(pattern.as_str())),
            operator,
            Some(text),
        ),
        None => AssertionError::generated(
            format!(
                "{} /{}/. Input:\n\n{}\n",
                operator.readable(),
                pattern.as_str(),
                inspect_operand(value)
            ),
            Some(value.clone()),
            Some(Value::str(pattern.as_str())),
            operator,
        ),
    }
}

/// Assert that a string matches the pattern. Non-string input fails.
pub fn matches(value: &Value, pattern: &regex::Regex, message: Option<&str>) -> AssertResult {
    match value {
        Value::Str(s) if pattern.is_match(s) => Ok(()),
        _ => Err(pattern_failure(value, pattern, Operator::Match, message)),
    }
}

/// Assert that a string does not match the pattern. Non-string input fails.
pub fn does_not_match(value: &Value, pattern: &regex::Regex, message: Option<&str>) -> AssertResult {
    match value {
        Value::Str(s) if !pattern.is_match(s) => Ok(()),
        _ => Err(pattern_failure(value, pattern, Operator::DoesNotMatch, message)),
    }
}

/// How a thrown or rejected value is validated.
#[derive(Clone)]
pub enum ErrorMatcher {
    /// Error class name must match.
    Name(String),
    /// Error message (or thrown string) must match exactly.
    Message(String),
    /// Error message (or thrown string) must match the pattern.
    Pattern(regex::Regex),
    /// Each own property of this object must strictly deep-equal the
    /// thrown object's same-named property.
    Structure(Value),
    /// Arbitrary predicate over the thrown value.
    Predicate(Rc<dyn Fn(&Value) -> bool>),
}

impl fmt::Debug for ErrorMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(n) => f.debug_tuple("Name").field(n).finish(),
            Self::Message(m) => f.debug_tuple("Message").field(m).finish(),
            Self::Pattern(p) => f.debug_tuple("Pattern").field(&p.as_str()).finish(),
            Self::Structure(_) => f.write_str("Structure"),
            Self::Predicate(_) => f.write_str("Predicate"),
        }
    }
}

impl ErrorMatcher {
    /// Whether the thrown value satisfies this matcher.
    #[must_use]
    pub fn matches(&self, thrown: &Value) -> bool {
        match self {
            Self::Name(expected) => thrown.as_object().is_some_and(|obj| {
                matches!(&obj.data().kind, crate::value::ObjectKind::Error { name, .. }
                    if name == expected)
            }),
            Self::Message(expected) => thrown_message(thrown) == *expected,
            Self::Pattern(pattern) => pattern.is_match(&thrown_message(thrown)),
            Self::Structure(shape) => {
                let Some(shape_obj) = shape.as_object() else {
                    return false;
                };
                let Some(thrown_obj) = thrown.as_object() else {
                    return false;
                };
                let keys: Vec<String> = shape_obj
                    .data()
                    .enumerable_string_keys()
                    .iter()
                    .map(|k| (*k).to_owned())
                    .collect();
                keys.iter().all(|key| {
                    let want = shape_obj.get(key).unwrap_or(Value::Undefined);
                    let got = thrown_obj.get(key).unwrap_or(Value::Undefined);
                    is_deep_strict_equal(&got, &want)
                })
            }
            Self::Predicate(pred) => pred(thrown),
        }
    }
}

fn validate_thrown(
    thrown: Value,
    matcher: Option<&ErrorMatcher>,
    operator: Operator,
    message: Option<&str>,
) -> Result<Value, AssertionError> {
    match matcher {
        Some(m) if !m.matches(&thrown) => {
            let generated = format!(
                "The thrown value does not satisfy the matcher {:?}. Thrown:\n\n{}\n",
                m,
                inspect_operand(&thrown)
            );
            Err(match message {
                Some(text) => AssertionError::new(Some(thrown), None, operator, Some(text)),
                None => AssertionError::generated(generated, Some(thrown), None, operator),
            })
        }
        _ => Ok(thrown),
    }
}

/// Assert that the closure throws, optionally validating the thrown value.
/// Returns the thrown value on success.
pub fn throws(
    f: impl FnOnce() -> Result<Value, Value>,
    matcher: Option<&ErrorMatcher>,
    message: Option<&str>,
) -> Result<Value, AssertionError> {
    match f() {
        Err(thrown) => validate_thrown(thrown, matcher, Operator::Throws, message),
        Ok(_) => Err(AssertionError::new(None, None, Operator::Throws, message)),
    }
}

fn unwanted_exception(
    thrown: Value,
    matcher: Option<&ErrorMatcher>,
    operator: Operator,
    message: Option<&str>,
) -> AssertionError {
    // A thrown value outside the matcher's scope propagates with its own
    // message instead of being reported as the unwanted exception.
    if matcher.is_some_and(|m| !m.matches(&thrown)) {
        return AssertionError::generated(thrown_message(&thrown), Some(thrown), None, operator);
    }
    let generated = format!(
        "{}\nActual message: {}",
        operator.readable(),
        thrown_message(&thrown)
    );
    match message {
        Some(text) => AssertionError::new(Some(thrown), None, operator, Some(text)),
        None => AssertionError::generated(generated, Some(thrown), None, operator),
    }
}

/// Assert that the closure does not throw. A matcher narrows the claim to
/// throws it covers. Returns the produced value.
pub fn does_not_throw(
    f: impl FnOnce() -> Result<Value, Value>,
    matcher: Option<&ErrorMatcher>,
    message: Option<&str>,
) -> Result<Value, AssertionError> {
    match f() {
        Ok(value) => Ok(value),
        Err(thrown) => Err(unwanted_exception(
            thrown,
            matcher,
            Operator::DoesNotThrow,
            message,
        )),
    }
}

/// Assert that the future rejects, optionally validating the rejection
/// reason. Returns the reason on success.
pub async fn rejects<F>(
    future: F,
    matcher: Option<&ErrorMatcher>,
    message: Option<&str>,
) -> Result<Value, AssertionError>
where
    F: Future<Output = Result<Value, Value>>,
{
    match future.await {
        Err(reason) => validate_thrown(reason, matcher, Operator::Rejects, message),
        Ok(_) => Err(AssertionError::new(None, None, Operator::Rejects, message)),
    }
}

/// Assert that the future does not reject. A matcher narrows the claim to
/// rejections it covers. Returns the resolved value.
pub async fn does_not_reject<F>(
    future: F,
    matcher: Option<&ErrorMatcher>,
    message: Option<&str>,
) -> Result<Value, AssertionError>
where
    F: Future<Output = Result<Value, Value>>,
{
    match future.await {
        Ok(value) => Ok(value),
        Err(reason) => Err(unwanted_exception(
            reason,
            matcher,
            Operator::DoesNotReject,
            message,
        )),
    }
}

/// Fail when the value is anything other than `undefined` or `null`.
pub fn if_error(value: &Value) -> AssertResult {
    if matches!(value, Value::Undefined | Value::Null) {
        return Ok(());
    }
    Err(AssertionError::generated(
        format!(
            "{} {}",
            Operator::IfError.readable(),
            thrown_message(value)
        ),
        Some(value.clone()),
        None,
        Operator::IfError,
    ))
}
