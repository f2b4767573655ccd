//! Structural deep equality over dynamic value graphs.
//!
//! Two entry points fix the mode: [`is_deep_equal`] (loose, coercing
//! primitive equality) and [`is_deep_strict_equal`] (identity-like primitive
//! equality plus prototype checks). Both walk arbitrary, possibly cyclic
//! graphs; a memo table of in-progress pairs keeps cycles from recursing
//! forever.
//!
//! The comparator never panics and never errors: any structural mismatch is
//! simply `false`.

use std::collections::HashMap;

use crate::value::{
    decode_elements, BoxedPrimitive, ObjectData, ObjectKind, ObjectRef, PropertyKey,
    PropertyValue, SymbolRef, TypedElement, Value,
};

/// Loose structural equality (`==`-like primitive semantics).
#[must_use]
pub fn is_deep_equal(a: &Value, b: &Value) -> bool {
    tracing::trace!(mode = "loose", "deep equality check");
    inner_deep_equal(a, b, false, &mut Memo::default())
}

/// Strict structural equality (`Object.is`-like primitive semantics plus
/// prototype identity for objects).
#[must_use]
pub fn is_deep_strict_equal(a: &Value, b: &Value) -> bool {
    tracing::trace!(mode = "strict", "deep equality check");
    inner_deep_equal(a, b, true, &mut Memo::default())
}

/// Cycle-detection table: in-progress pairs keyed by object identity.
///
/// A pair is inserted before recursing into shared children and removed as
/// soon as the recursion returns, so the table only ever reflects the
/// current recursion path. A pair revisited mid-recursion is equal exactly
/// when both sides were entered at the same position.
#[derive(Default)]
struct Memo {
    seen_left: HashMap<usize, u32>,
    seen_right: HashMap<usize, u32>,
    position: u32,
}

fn inner_deep_equal(a: &Value, b: &Value, strict: bool, memo: &mut Memo) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            object_deep_equal(x, y, strict, memo)
        }
        // Exactly one side an object: unequal in both modes.
        (Value::Object(_), _) | (_, Value::Object(_)) => false,
        _ => {
            if strict {
                strict_primitive_eq(a, b)
            } else {
                loose_primitive_eq(a, b)
            }
        }
    }
}

/// `Object.is`-like equality for non-object values: NaN equals NaN, signed
/// zeros are distinguished (bit comparison).
pub(crate) fn strict_primitive_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
        }
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x.ptr_eq(y),
        _ => false,
    }
}

/// `==`-like equality for non-object values, with the NaN carve-out the
/// comparator applies in both modes.
pub(crate) fn loose_primitive_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x.ptr_eq(y),
        (Value::Bool(x), other) => {
            loose_primitive_eq(&Value::Number(if *x { 1.0 } else { 0.0 }), other)
        }
        (other, Value::Bool(y)) => {
            loose_primitive_eq(other, &Value::Number(if *y { 1.0 } else { 0.0 }))
        }
        (Value::Number(x), Value::Str(s)) | (Value::Str(s), Value::Number(x)) => {
            let n = string_to_number(s);
            !n.is_nan() && n == *x
        }
        (Value::BigInt(i), Value::Number(x)) | (Value::Number(x), Value::BigInt(i)) => {
            x.is_finite() && x.fract() == 0.0 && *x == *i as f64
        }
        (Value::BigInt(i), Value::Str(s)) | (Value::Str(s), Value::BigInt(i)) => {
            s.trim().parse::<i128>().is_ok_and(|v| v == *i)
        }
        _ => false,
    }
}

/// `ToNumber` semantics for strings: empty/whitespace is zero, `Infinity`
/// spellings are honored, radix prefixes parse, anything else is NaN.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return u128::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    if let Some(oct) = trimmed.strip_prefix("0o").or_else(|| trimmed.strip_prefix("0O")) {
        return u128::from_str_radix(oct, 8).map_or(f64::NAN, |v| v as f64);
    }
    if let Some(bin) = trimmed.strip_prefix("0b").or_else(|| trimmed.strip_prefix("0B")) {
        return u128::from_str_radix(bin, 2).map_or(f64::NAN, |v| v as f64);
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// `SameValueZero`: set/map membership semantics (NaN matches NaN, signed
/// zeros collapse, objects by identity).
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        _ => strict_primitive_eq(a, b),
    }
}

/// What the cycle-protected region of the comparison has to iterate beyond
/// plain own keys.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Iteration {
    None,
    Array,
    Set,
    Map,
}

fn object_deep_equal(x: &ObjectRef, y: &ObjectRef, strict: bool, memo: &mut Memo) -> bool {
    // Snapshots, not live borrows: property getters are user closures that
    // may mutate their own object while the walk evaluates them.
    let xd = x.data().clone();
    let yd = y.data().clone();

    if strict
        && (xd.constructor_name != yd.constructor_name || xd.null_prototype != yd.null_prototype)
    {
        return false;
    }
    if !xd.kind.same_category(&yd.kind) {
        return false;
    }

    // Category-specific pre-checks in fallback order: array, plain object,
    // date, regexp, error, binary view, set, map, array buffer, boxed
    // primitive. Survivors fall through to the generic key check.
    let iteration = match (&xd.kind, &yd.kind) {
        (ObjectKind::Array(a_items), ObjectKind::Array(b_items)) => {
            if a_items.len() != b_items.len() {
                return false;
            }
            Iteration::Array
        }
        (ObjectKind::Plain, ObjectKind::Plain) => Iteration::None,
        (ObjectKind::Date(t1), ObjectKind::Date(t2)) => {
            if t1 != t2 {
                return false;
            }
            Iteration::None
        }
        (
            ObjectKind::RegExp {
                source: s1,
                flags: f1,
            },
            ObjectKind::RegExp {
                source: s2,
                flags: f2,
            },
        ) => {
            if s1 != s2 || f1 != f2 {
                return false;
            }
            Iteration::None
        }
        (
            ObjectKind::Error {
                name: n1,
                message: m1,
                ..
            },
            ObjectKind::Error {
                name: n2,
                message: m2,
                ..
            },
        ) => {
            // Stack traces are deliberately ignored.
            if n1 != n2 || m1 != m2 {
                return false;
            }
            Iteration::None
        }
        (
            ObjectKind::TypedArray { kind, bytes: b1 },
            ObjectKind::TypedArray { bytes: b2, .. },
        ) => {
            if b1.len() != b2.len() {
                return false;
            }
            if !strict && kind.is_float() {
                // Loose float views compare element-wise with plain `!=`,
                // so NaN never matches itself here. Strict mode compares
                // raw bytes instead (equal NaN bit patterns match).
                if !float_elements_equal(*kind, b1, b2) {
                    return false;
                }
            } else if b1 != b2 {
                return false;
            }
            Iteration::None
        }
        (ObjectKind::DataView(b1), ObjectKind::DataView(b2))
        | (ObjectKind::ArrayBuffer(b1), ObjectKind::ArrayBuffer(b2))
        | (ObjectKind::SharedArrayBuffer(b1), ObjectKind::SharedArrayBuffer(b2)) => {
            if b1 != b2 {
                return false;
            }
            Iteration::None
        }
        (ObjectKind::Set(s1), ObjectKind::Set(s2)) => {
            if s1.len() != s2.len() {
                return false;
            }
            Iteration::Set
        }
        (ObjectKind::Map(m1), ObjectKind::Map(m2)) => {
            if m1.len() != m2.len() {
                return false;
            }
            Iteration::Map
        }
        (ObjectKind::Boxed(p1), ObjectKind::Boxed(p2)) => {
            if !boxed_eq(p1, p2) {
                return false;
            }
            Iteration::None
        }
        // Function / Promise / WeakMap / WeakSet carry no comparable
        // payload; they fall back to the key check.
        _ => Iteration::None,
    };

    key_check(x, y, &xd, &yd, strict, iteration, memo)
}

fn float_elements_equal(kind: crate::value::ElementKind, b1: &[u8], b2: &[u8]) -> bool {
    let e1 = decode_elements(kind, b1);
    let e2 = decode_elements(kind, b2);
    e1.iter().zip(e2.iter()).all(|(l, r)| match (l, r) {
        (TypedElement::Float(a), TypedElement::Float(b)) => a == b,
        _ => false,
    })
}

fn boxed_eq(a: &BoxedPrimitive, b: &BoxedPrimitive) -> bool {
    match (a, b) {
        (BoxedPrimitive::Number(x), BoxedPrimitive::Number(y)) => {
            (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
        }
        (BoxedPrimitive::Str(x), BoxedPrimitive::Str(y)) => x == y,
        (BoxedPrimitive::Bool(x), BoxedPrimitive::Bool(y)) => x == y,
        (BoxedPrimitive::BigInt(x), BoxedPrimitive::BigInt(y)) => x == y,
        (BoxedPrimitive::Symbol(x), BoxedPrimitive::Symbol(y)) => x.ptr_eq(y),
        _ => false,
    }
}

/// Own property value for the comparison walk. Accessors are evaluated; a
/// throwing getter degrades to undefined rather than aborting.
fn own_value(data: &ObjectData, key: &str) -> Value {
    for prop in &data.properties {
        if let PropertyKey::Str(k) = &prop.key {
            if k == key {
                return match &prop.value {
                    PropertyValue::Data(v) => v.clone(),
                    PropertyValue::Accessor { get: Some(g), .. } => {
                        g.call().unwrap_or(Value::Undefined)
                    }
                    PropertyValue::Accessor { get: None, .. } => Value::Undefined,
                };
            }
        }
    }
    Value::Undefined
}

fn symbol_value(data: &ObjectData, key: &SymbolRef) -> Value {
    match data.symbol_property(key).map(|p| &p.value) {
        Some(PropertyValue::Data(v)) => v.clone(),
        Some(PropertyValue::Accessor { get: Some(g), .. }) => g.call().unwrap_or(Value::Undefined),
        _ => Value::Undefined,
    }
}

#[allow(clippy::too_many_arguments)]
fn key_check(
    x: &ObjectRef,
    y: &ObjectRef,
    xd: &ObjectData,
    yd: &ObjectData,
    strict: bool,
    iteration: Iteration,
    memo: &mut Memo,
) -> bool {
    let a_keys = xd.enumerable_string_keys();
    let b_keys = yd.enumerable_string_keys();
    if a_keys.len() != b_keys.len() {
        return false;
    }
    for key in &a_keys {
        if !yd.has_string_key(key) {
            return false;
        }
    }

    let mut sym_keys: Vec<SymbolRef> = Vec::new();
    if strict {
        for prop in &xd.properties {
            if let PropertyKey::Symbol(sym) = &prop.key {
                match yd.symbol_property(sym) {
                    Some(other) => {
                        if prop.enumerable != other.enumerable {
                            return false;
                        }
                        if prop.enumerable {
                            sym_keys.push(sym.clone());
                        }
                    }
                    None => {
                        if prop.enumerable {
                            return false;
                        }
                    }
                }
            }
        }
        let b_enumerable_syms = yd
            .properties
            .iter()
            .filter(|p| p.enumerable && matches!(p.key, PropertyKey::Symbol(_)))
            .count();
        if sym_keys.len() != b_enumerable_syms {
            return false;
        }
    }

    // Fast path: nothing to recurse into.
    let iter_len = match &xd.kind {
        ObjectKind::Array(items) => items.len(),
        ObjectKind::Set(items) => items.len(),
        ObjectKind::Map(entries) => entries.len(),
        _ => 0,
    };
    if a_keys.is_empty() && sym_keys.is_empty() && iter_len == 0 {
        return true;
    }

    // Cycle check: a pair already on the recursion path is equal exactly
    // when both sides were entered at the same position.
    let (xid, yid) = (x.id(), y.id());
    if let (Some(&p1), Some(&p2)) = (memo.seen_left.get(&xid), memo.seen_right.get(&yid)) {
        return p1 == p2;
    }
    memo.seen_left.insert(xid, memo.position);
    memo.seen_right.insert(yid, memo.position);
    memo.position += 1;
    let result = obj_equiv(xd, yd, strict, iteration, &a_keys, &sym_keys, memo);
    memo.seen_left.remove(&xid);
    memo.seen_right.remove(&yid);
    result
}

fn obj_equiv(
    xd: &ObjectData,
    yd: &ObjectData,
    strict: bool,
    iteration: Iteration,
    a_keys: &[&str],
    sym_keys: &[SymbolRef],
    memo: &mut Memo,
) -> bool {
    match iteration {
        Iteration::Array => {
            let (ObjectKind::Array(a_items), ObjectKind::Array(b_items)) = (&xd.kind, &yd.kind)
            else {
                return false;
            };
            for (l, r) in a_items.iter().zip(b_items.iter()) {
                match (l, r) {
                    // Matching holes are equal; a hole never matches a
                    // present element (not even a present undefined).
                    (None, None) => {}
                    (Some(lv), Some(rv)) => {
                        if !inner_deep_equal(lv, rv, strict, memo) {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        Iteration::Set => {
            let (ObjectKind::Set(s1), ObjectKind::Set(s2)) = (&xd.kind, &yd.kind) else {
                return false;
            };
            if !set_equiv(s1, s2, strict, memo) {
                return false;
            }
        }
        Iteration::Map => {
            let (ObjectKind::Map(m1), ObjectKind::Map(m2)) = (&xd.kind, &yd.kind) else {
                return false;
            };
            if !map_equiv(m1, m2, strict, memo) {
                return false;
            }
        }
        Iteration::None => {}
    }

    for key in a_keys {
        let v1 = own_value(xd, key);
        let v2 = own_value(yd, key);
        if !inner_deep_equal(&v1, &v2, strict, memo) {
            return false;
        }
    }
    for sym in sym_keys {
        let v1 = symbol_value(xd, sym);
        let v2 = symbol_value(yd, sym);
        if !inner_deep_equal(&v1, &v2, strict, memo) {
            return false;
        }
    }
    true
}

fn set_has(items: &[Value], val: &Value) -> bool {
    items.iter().any(|m| same_value_zero(m, val))
}

/// Whether the other set holds a primitive that only matches under loose
/// coercion (`"1"` vs `1`, undefined vs null, ...). Objects and symbols
/// never coerce.
fn set_might_have_loose_prim(items: &[Value], prim: &Value) -> bool {
    items
        .iter()
        .any(|m| !m.is_object() && !same_value_zero(m, prim) && loose_primitive_eq(m, prim))
}

/// Remove the first pool member deep-equal to `val`. Removal prevents one
/// candidate from matching twice.
fn remove_equal_element(pool: &mut Vec<Value>, val: &Value, strict: bool, memo: &mut Memo) -> bool {
    for i in 0..pool.len() {
        let candidate = pool[i].clone();
        if inner_deep_equal(&candidate, val, strict, memo) {
            pool.swap_remove(i);
            return true;
        }
    }
    false
}

/// Dual-pass set equivalence: primitives by direct membership (with loose
/// coercion fallback), objects through a candidate pool matched by nested
/// equality search.
fn set_equiv(a: &[Value], b: &[Value], strict: bool, memo: &mut Memo) -> bool {
    let mut pool: Vec<Value> = Vec::new();
    for val in a {
        if val.is_object() {
            pool.push(val.clone());
        } else if !set_has(b, val) {
            if strict {
                return false;
            }
            if !set_might_have_loose_prim(b, val) {
                return false;
            }
            pool.push(val.clone());
        }
    }
    if !pool.is_empty() {
        for val in b {
            if val.is_object() {
                if !remove_equal_element(&mut pool, val, strict, memo) {
                    return false;
                }
            } else if !strict
                && !set_has(a, val)
                && !remove_equal_element(&mut pool, val, strict, memo)
            {
                return false;
            }
        }
        return pool.is_empty();
    }
    true
}

fn map_get<'a>(entries: &'a [(Value, Value)], key: &Value) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(k, _)| same_value_zero(k, key))
        .map(|(_, v)| v)
}

fn map_might_have_loose_prim(
    b: &[(Value, Value)],
    prim: &Value,
    item: &Value,
    memo: &mut Memo,
) -> bool {
    for (k2, v2) in b {
        if !k2.is_object()
            && !same_value_zero(k2, prim)
            && loose_primitive_eq(k2, prim)
            && inner_deep_equal(item, v2, false, memo)
        {
            return true;
        }
    }
    false
}

fn remove_equal_entry(
    pool: &mut Vec<(Value, Value)>,
    key: &Value,
    val: &Value,
    strict: bool,
    memo: &mut Memo,
) -> bool {
    for i in 0..pool.len() {
        let (k, v) = pool[i].clone();
        if inner_deep_equal(&k, key, strict, memo) && inner_deep_equal(&v, val, strict, memo) {
            pool.swap_remove(i);
            return true;
        }
    }
    false
}

/// Dual-pass map equivalence: like sets, but every matched key also has to
/// carry a deep-equal value.
fn map_equiv(a: &[(Value, Value)], b: &[(Value, Value)], strict: bool, memo: &mut Memo) -> bool {
    let mut pool: Vec<(Value, Value)> = Vec::new();
    for (key, val) in a {
        if key.is_object() {
            pool.push((key.clone(), val.clone()));
        } else {
            match map_get(b, key) {
                Some(v2) => {
                    let v2 = v2.clone();
                    if !inner_deep_equal(val, &v2, strict, memo) {
                        if strict {
                            return false;
                        }
                        if !map_might_have_loose_prim(b, key, val, memo) {
                            return false;
                        }
                        pool.push((key.clone(), val.clone()));
                    }
                }
                None => {
                    if strict {
                        return false;
                    }
                    if !map_might_have_loose_prim(b, key, val, memo) {
                        return false;
                    }
                    pool.push((key.clone(), val.clone()));
                }
            }
        }
    }
    if !pool.is_empty() {
        for (key2, val2) in b {
            if key2.is_object() {
                if !remove_equal_entry(&mut pool, key2, val2, strict, memo) {
                    return false;
                }
            } else if !strict {
                let direct = match map_get(a, key2) {
                    Some(v) => {
                        let v = v.clone();
                        inner_deep_equal(&v, val2, false, memo)
                    }
                    None => false,
                };
                if !direct && !remove_equal_entry(&mut pool, key2, val2, false, memo) {
                    return false;
                }
            }
        }
        return pool.is_empty();
    }
    true
}
