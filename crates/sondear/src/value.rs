//! Dynamic value model.
//!
//! The comparator and inspector operate on arbitrary dynamic value graphs:
//! primitives, plain objects, arrays with holes, collections, binary views,
//! boxed primitives, and cyclic references between any of them. This module
//! models that universe as a closed sum type so category dispatch is an
//! explicit `match` instead of runtime tag sniffing.
//!
//! Object identity (the thing cycle detection keys on) is `Rc` pointer
//! identity; interior mutability is what lets fixtures build cyclic graphs
//! after construction.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::inspect::InspectOptions;

/// A dynamic value: primitive or reference to heap object data.
///
/// Cloning a `Value` is cheap for objects (it clones the reference, not the
/// object graph), which is what makes shared and cyclic structure possible.
#[derive(Clone, Debug)]
pub enum Value {
    /// The undefined sentinel.
    Undefined,
    /// The null sentinel (a distinct category from objects here, even though
    /// its `type_of` tag is `"object"`).
    Null,
    /// A boolean primitive.
    Bool(bool),
    /// A double-precision number primitive.
    Number(f64),
    /// An arbitrary-precision integer primitive (modeled as `i128`).
    BigInt(i128),
    /// A string primitive.
    Str(String),
    /// A symbol primitive (identity-compared).
    Symbol(SymbolRef),
    /// A reference to heap object data.
    Object(ObjectRef),
}

/// A shared, identity-compared symbol.
#[derive(Clone)]
pub struct SymbolRef(Rc<SymbolData>);

struct SymbolData {
    description: Option<String>,
}

impl SymbolRef {
    /// Create a fresh symbol with an optional description.
    ///
    /// Every call produces a distinct identity, even for equal descriptions.
    #[must_use]
    pub fn new(description: Option<&str>) -> Self {
        Self(Rc::new(SymbolData {
            description: description.map(str::to_owned),
        }))
    }

    /// The symbol's description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// Identity key (pointer address) for memo tables.
    #[must_use]
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Whether two references denote the same symbol.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(desc) => write!(f, "Symbol({desc})"),
            None => write!(f, "Symbol()"),
        }
    }
}

/// A shared reference to object data.
///
/// Identity (`ptr_eq`/`id`) is the reference identity the comparator's memo
/// table and the inspector's seen-stack key on.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

impl ObjectRef {
    /// Wrap freshly built object data.
    #[must_use]
    pub fn new(data: ObjectData) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    /// Identity key (pointer address) for memo tables and seen-stacks.
    #[must_use]
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Whether two references denote the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Borrow the object data.
    #[must_use]
    pub fn data(&self) -> Ref<'_, ObjectData> {
        self.0.borrow()
    }

    /// Mutably borrow the object data.
    #[must_use]
    pub fn data_mut(&self) -> RefMut<'_, ObjectData> {
        self.0.borrow_mut()
    }

    /// Insert or replace an enumerable string-keyed data property.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.data_mut().set_property(key.into(), value, true);
    }

    /// Insert or replace a non-enumerable string-keyed data property.
    pub fn set_hidden(&self, key: impl Into<String>, value: Value) {
        self.data_mut().set_property(key.into(), value, false);
    }

    /// Insert a symbol-keyed data property.
    pub fn set_symbol(&self, key: SymbolRef, value: Value, enumerable: bool) {
        self.data_mut().properties.push(Property {
            key: PropertyKey::Symbol(key),
            enumerable,
            value: PropertyValue::Data(value),
        });
    }

    /// Install an accessor property.
    pub fn set_accessor(
        &self,
        key: impl Into<String>,
        get: Option<Getter>,
        has_setter: bool,
    ) {
        self.data_mut().properties.push(Property {
            key: PropertyKey::Str(key.into()),
            enumerable: true,
            value: PropertyValue::Accessor {
                get,
                set: has_setter,
            },
        });
    }

    /// Read a string-keyed own property value, invoking getters.
    ///
    /// A getter that throws yields `None`, as does a missing key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        // Release the borrow before running a getter; it may mutate us.
        let prop = {
            let data = self.data();
            data.properties.iter().find_map(|prop| match &prop.key {
                PropertyKey::Str(k) if k == key => Some(prop.value.clone()),
                _ => None,
            })
        };
        match prop? {
            PropertyValue::Data(v) => Some(v),
            PropertyValue::Accessor { get: Some(g), .. } => g.call().ok(),
            PropertyValue::Accessor { get: None, .. } => Some(Value::Undefined),
        }
    }

    /// Append an element to an array object.
    ///
    /// Panics when the object is not an array; fixture code is expected to
    /// know what it built.
    pub fn push(&self, value: Value) {
        match &mut self.data_mut().kind {
            ObjectKind::Array(items) => items.push(Some(value)),
            other => panic!("push on non-array object ({})", other.tag()),
        }
    }

    /// Add a member to a set object. Panics when the object is not a set.
    pub fn add(&self, value: Value) {
        match &mut self.data_mut().kind {
            ObjectKind::Set(items) => items.push(value),
            other => panic!("add on non-set object ({})", other.tag()),
        }
    }

    /// Append an entry to a map object. Panics when the object is not a map.
    pub fn insert_entry(&self, key: Value, value: Value) {
        match &mut self.data_mut().kind {
            ObjectKind::Map(entries) => entries.push((key, value)),
            other => panic!("insert_entry on non-map object ({})", other.tag()),
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Avoid recursing through (possibly cyclic) data.
        write!(f, "ObjectRef({:#x}, {})", self.id(), self.data().kind.tag())
    }
}

/// Heap data for a single object.
#[derive(Clone, Debug)]
pub struct ObjectData {
    /// Category tag with per-category payload.
    pub kind: ObjectKind,
    /// Own properties in insertion order (string and symbol keyed). For
    /// arrays these are the *non-index* properties; the elements live in the
    /// kind payload.
    pub properties: Vec<Property>,
    /// Class name when constructed by something other than the category's
    /// default constructor (e.g. a user class). Strict equality requires
    /// this to match; the inspector renders it as a base prefix.
    pub constructor_name: Option<String>,
    /// Whether the object has a null prototype.
    pub null_prototype: bool,
    /// Self-describing inspection hook, honored when the inspector's
    /// `custom_inspect` option is on.
    pub custom_inspect: Option<InspectHook>,
}

impl ObjectData {
    /// Object data of the given kind with no own properties.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            constructor_name: None,
            null_prototype: false,
            custom_inspect: None,
        }
    }

    fn set_property(&mut self, key: String, value: Value, enumerable: bool) {
        for prop in &mut self.properties {
            if let PropertyKey::Str(k) = &prop.key {
                if *k == key {
                    prop.value = PropertyValue::Data(value);
                    prop.enumerable = enumerable;
                    return;
                }
            }
        }
        self.properties.push(Property {
            key: PropertyKey::Str(key),
            enumerable,
            value: PropertyValue::Data(value),
        });
    }

    /// Own enumerable string keys, in insertion order.
    #[must_use]
    pub fn enumerable_string_keys(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| p.enumerable)
            .filter_map(|p| match &p.key {
                PropertyKey::Str(k) => Some(k.as_str()),
                PropertyKey::Symbol(_) => None,
            })
            .collect()
    }

    /// Whether an own string-keyed property exists (enumerable or not).
    #[must_use]
    pub fn has_string_key(&self, key: &str) -> bool {
        self.properties
            .iter()
            .any(|p| matches!(&p.key, PropertyKey::Str(k) if k == key))
    }

    /// Look up an own symbol-keyed property.
    #[must_use]
    pub fn symbol_property(&self, key: &SymbolRef) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| matches!(&p.key, PropertyKey::Symbol(s) if s.ptr_eq(key)))
    }
}

/// One own property.
#[derive(Clone, Debug)]
pub struct Property {
    /// String or symbol key.
    pub key: PropertyKey,
    /// Enumerability flag (`show_hidden` reveals non-enumerable entries).
    pub enumerable: bool,
    /// Data value or accessor pair.
    pub value: PropertyValue,
}

/// A property key.
#[derive(Clone, Debug)]
pub enum PropertyKey {
    /// A string key.
    Str(String),
    /// A symbol key (identity-compared).
    Symbol(SymbolRef),
}

/// A property payload.
#[derive(Clone, Debug)]
pub enum PropertyValue {
    /// Plain data property.
    Data(Value),
    /// Accessor property. The getter is a fallible closure; a thrown value
    /// travels through the `Err` channel and is rendered inline by the
    /// inspector rather than propagated.
    Accessor {
        /// Getter, if defined.
        get: Option<Getter>,
        /// Whether a setter is defined.
        set: bool,
    },
}

/// A fallible getter closure. `Err` carries the thrown value.
#[derive(Clone)]
pub struct Getter(Rc<dyn Fn() -> Result<Value, Value>>);

impl Getter {
    /// Wrap a getter closure.
    pub fn new(f: impl Fn() -> Result<Value, Value> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the getter.
    pub fn call(&self) -> Result<Value, Value> {
        (self.0)()
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Getter")
    }
}

/// A self-describing inspection hook.
///
/// Receives the remaining depth budget (`None` = unlimited) and a snapshot
/// of the active options. A `Str` result is spliced in verbatim
/// (re-indented); any other result is rendered in its place.
#[derive(Clone)]
pub struct InspectHook(Rc<dyn Fn(Option<usize>, &InspectOptions) -> Value>);

impl InspectHook {
    /// Wrap a hook closure.
    pub fn new(f: impl Fn(Option<usize>, &InspectOptions) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the hook.
    #[must_use]
    pub fn call(&self, depth: Option<usize>, options: &InspectOptions) -> Value {
        (self.0)(depth, options)
    }
}

impl fmt::Debug for InspectHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InspectHook")
    }
}

/// Object category with per-category payload.
///
/// The comparator and inspector both dispatch on this tag; the fallback
/// order of the comparator's category checks is part of its contract.
#[derive(Clone, Debug)]
pub enum ObjectKind {
    /// Plain object.
    Plain,
    /// Array; `None` entries are holes (absent indices).
    Array(Vec<Option<Value>>),
    /// Date as milliseconds since the epoch.
    Date(i64),
    /// Regular expression literal parts.
    RegExp {
        /// Pattern source.
        source: String,
        /// Flag letters.
        flags: String,
    },
    /// Error with name/message and an optional pre-rendered stack.
    Error {
        /// Error class name (`Error`, `TypeError`, ...).
        name: String,
        /// Error message.
        message: String,
        /// Pre-rendered stack text, if captured.
        stack: Option<String>,
    },
    /// Ordered map entries (insertion order preserved, equality ignores it).
    Map(Vec<(Value, Value)>),
    /// Ordered set members (insertion order preserved, equality ignores it).
    Set(Vec<Value>),
    /// Typed array view over raw little-endian bytes.
    TypedArray {
        /// Element category.
        kind: ElementKind,
        /// Raw contents.
        bytes: Vec<u8>,
    },
    /// DataView over raw bytes.
    DataView(Vec<u8>),
    /// ArrayBuffer contents.
    ArrayBuffer(Vec<u8>),
    /// SharedArrayBuffer contents.
    SharedArrayBuffer(Vec<u8>),
    /// Boxed (wrapper-object) primitive.
    Boxed(BoxedPrimitive),
    /// Function object.
    Function {
        /// Function name; empty means anonymous.
        name: String,
    },
    /// Promise with introspectable state.
    Promise(PromiseState),
    /// WeakMap (contents unobservable).
    WeakMap,
    /// WeakSet (contents unobservable).
    WeakSet,
    /// A live Map or Set iterator.
    Iterator {
        /// Which collection the iterator was taken from.
        tag: IteratorTag,
        /// Unconsumed items in iteration order. Map iterators carry
        /// `[key, value]` pair arrays.
        items: Vec<Value>,
    },
}

impl ObjectKind {
    /// Human-readable tag used for placeholders (`[Array]`, `[Map]`, ...).
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Plain => "Object",
            Self::Array(_) => "Array",
            Self::Date(_) => "Date",
            Self::RegExp { .. } => "RegExp",
            Self::Error { .. } => "Error",
            Self::Map(_) => "Map",
            Self::Set(_) => "Set",
            Self::TypedArray { kind, .. } => kind.name(),
            Self::DataView(_) => "DataView",
            Self::ArrayBuffer(_) => "ArrayBuffer",
            Self::SharedArrayBuffer(_) => "SharedArrayBuffer",
            Self::Boxed(b) => b.tag(),
            Self::Function { .. } => "Function",
            Self::Promise(_) => "Promise",
            Self::WeakMap => "WeakMap",
            Self::WeakSet => "WeakSet",
            Self::Iterator { tag, .. } => tag.text(),
        }
    }

    /// Whether two kinds belong to the same category (the tag-match gate the
    /// comparator applies before any bespoke comparison).
    #[must_use]
    pub fn same_category(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TypedArray { kind: a, .. }, Self::TypedArray { kind: b, .. }) => a == b,
            (Self::Boxed(a), Self::Boxed(b)) => a.same_category(b),
            (Self::Iterator { tag: a, .. }, Self::Iterator { tag: b, .. }) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// Which collection kind an iterator object was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IteratorTag {
    /// Iterator over a map's entries.
    Map,
    /// Iterator over a set's members.
    Set,
}

impl IteratorTag {
    /// Tag text used in placeholders and the inspector's base prefix.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Map => "Map Iterator",
            Self::Set => "Set Iterator",
        }
    }
}

/// Promise state for inspection.
#[derive(Clone, Debug)]
pub enum PromiseState {
    /// Not yet settled.
    Pending,
    /// Settled with a value.
    Fulfilled(Value),
    /// Settled with a rejection reason.
    Rejected(Value),
}

/// A boxed (wrapper-object) primitive payload.
#[derive(Clone, Debug)]
pub enum BoxedPrimitive {
    /// Number wrapper.
    Number(f64),
    /// String wrapper.
    Str(String),
    /// Boolean wrapper.
    Bool(bool),
    /// BigInt wrapper.
    BigInt(i128),
    /// Symbol wrapper.
    Symbol(SymbolRef),
}

impl BoxedPrimitive {
    fn tag(&self) -> &'static str {
        match self {
            Self::Number(_) => "Number",
            Self::Str(_) => "String",
            Self::Bool(_) => "Boolean",
            Self::BigInt(_) => "BigInt",
            Self::Symbol(_) => "Symbol",
        }
    }

    fn same_category(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Typed-array element category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// `i8` elements.
    Int8,
    /// `u8` elements.
    Uint8,
    /// `u8` elements with clamped stores.
    Uint8Clamped,
    /// `i16` elements.
    Int16,
    /// `u16` elements.
    Uint16,
    /// `i32` elements.
    Int32,
    /// `u32` elements.
    Uint32,
    /// `f32` elements.
    Float32,
    /// `f64` elements.
    Float64,
    /// `i64` elements.
    BigInt64,
    /// `u64` elements.
    BigUint64,
}

impl ElementKind {
    /// Element width in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 | Self::Uint8Clamped => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Float64 | Self::BigInt64 | Self::BigUint64 => 8,
        }
    }

    /// Constructor name (`Float64Array`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "Int8Array",
            Self::Uint8 => "Uint8Array",
            Self::Uint8Clamped => "Uint8ClampedArray",
            Self::Int16 => "Int16Array",
            Self::Uint16 => "Uint16Array",
            Self::Int32 => "Int32Array",
            Self::Uint32 => "Uint32Array",
            Self::Float32 => "Float32Array",
            Self::Float64 => "Float64Array",
            Self::BigInt64 => "BigInt64Array",
            Self::BigUint64 => "BigUint64Array",
        }
    }

    /// Whether elements are floating point (the category with the loose-mode
    /// element-wise comparison quirk).
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Whether elements render with the bigint suffix.
    #[must_use]
    pub const fn is_bigint(self) -> bool {
        matches!(self, Self::BigInt64 | Self::BigUint64)
    }
}

/// A decoded typed-array element.
#[derive(Clone, Copy, Debug)]
pub enum TypedElement {
    /// From a float kind.
    Float(f64),
    /// From a signed integer kind.
    Int(i64),
    /// From an unsigned integer kind.
    Uint(u64),
}

/// Decode little-endian bytes into elements of the given kind.
///
/// Trailing bytes short of a full element are ignored.
#[must_use]
pub fn decode_elements(kind: ElementKind, bytes: &[u8]) -> Vec<TypedElement> {
    let width = kind.width();
    bytes
        .chunks_exact(width)
        .map(|chunk| match kind {
            ElementKind::Int8 => TypedElement::Int(i64::from(chunk[0] as i8)),
            ElementKind::Uint8 | ElementKind::Uint8Clamped => {
                TypedElement::Uint(u64::from(chunk[0]))
            }
            ElementKind::Int16 => {
                TypedElement::Int(i64::from(i16::from_le_bytes([chunk[0], chunk[1]])))
            }
            ElementKind::Uint16 => {
                TypedElement::Uint(u64::from(u16::from_le_bytes([chunk[0], chunk[1]])))
            }
            ElementKind::Int32 => TypedElement::Int(i64::from(i32::from_le_bytes([
                chunk[0], chunk[1], chunk[2], chunk[3],
            ]))),
            ElementKind::Uint32 => TypedElement::Uint(u64::from(u32::from_le_bytes([
                chunk[0], chunk[1], chunk[2], chunk[3],
            ]))),
            ElementKind::Float32 => TypedElement::Float(f64::from(f32::from_le_bytes([
                chunk[0], chunk[1], chunk[2], chunk[3],
            ]))),
            ElementKind::Float64 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                TypedElement::Float(f64::from_le_bytes(buf))
            }
            ElementKind::BigInt64 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                TypedElement::Int(i64::from_le_bytes(buf))
            }
            ElementKind::BigUint64 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                TypedElement::Uint(u64::from_le_bytes(buf))
            }
        })
        .collect()
}

impl Value {
    /// String primitive.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Fresh symbol primitive.
    #[must_use]
    pub fn symbol(description: Option<&str>) -> Self {
        Self::Symbol(SymbolRef::new(description))
    }

    /// Plain object with enumerable string-keyed data properties.
    #[must_use]
    pub fn object<K, I>(props: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let obj = ObjectRef::new(ObjectData::new(ObjectKind::Plain));
        for (k, v) in props {
            obj.set(k, v);
        }
        Self::Object(obj)
    }

    /// Plain object tagged with a constructor (class) name.
    #[must_use]
    pub fn class_object<K, I>(class: &str, props: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let value = Self::object(props);
        if let Self::Object(obj) = &value {
            obj.data_mut().constructor_name = Some(class.to_owned());
        }
        value
    }

    /// Plain object with a null prototype.
    #[must_use]
    pub fn null_proto_object<K, I>(props: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let value = Self::object(props);
        if let Self::Object(obj) = &value {
            obj.data_mut().null_prototype = true;
        }
        value
    }

    /// Dense array.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Array(
            items.into_iter().map(Some).collect(),
        ))))
    }

    /// Array with holes (`None` entries are absent indices).
    #[must_use]
    pub fn sparse_array(items: Vec<Option<Value>>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Array(items))))
    }

    /// Set with members in insertion order.
    #[must_use]
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Set(
            items.into_iter().collect(),
        ))))
    }

    /// Map with entries in insertion order.
    #[must_use]
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Map(
            entries.into_iter().collect(),
        ))))
    }

    /// Date from epoch milliseconds.
    #[must_use]
    pub fn date(epoch_ms: i64) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Date(epoch_ms))))
    }

    /// Regular expression from source and flags.
    #[must_use]
    pub fn regexp(source: &str, flags: &str) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::RegExp {
            source: source.to_owned(),
            flags: flags.to_owned(),
        })))
    }

    /// Error with name and message, no stack.
    #[must_use]
    pub fn error(name: &str, message: &str) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Error {
            name: name.to_owned(),
            message: message.to_owned(),
            stack: None,
        })))
    }

    /// Error carrying a pre-rendered stack.
    #[must_use]
    pub fn error_with_stack(name: &str, message: &str, stack: &str) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Error {
            name: name.to_owned(),
            message: message.to_owned(),
            stack: Some(stack.to_owned()),
        })))
    }

    /// Function object (empty name = anonymous).
    #[must_use]
    pub fn function(name: &str) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Function {
            name: name.to_owned(),
        })))
    }

    /// Promise in the given state.
    #[must_use]
    pub fn promise(state: PromiseState) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Promise(state))))
    }

    /// WeakMap placeholder.
    #[must_use]
    pub fn weak_map() -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::WeakMap)))
    }

    /// WeakSet placeholder.
    #[must_use]
    pub fn weak_set() -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::WeakSet)))
    }

    /// Live iterator over a map's entries; each unconsumed entry becomes a
    /// `[key, value]` pair array.
    #[must_use]
    pub fn map_iterator(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Iterator {
            tag: IteratorTag::Map,
            items: entries
                .into_iter()
                .map(|(k, v)| Self::array([k, v]))
                .collect(),
        })))
    }

    /// Live iterator over a set's members.
    #[must_use]
    pub fn set_iterator(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Iterator {
            tag: IteratorTag::Set,
            items: items.into_iter().collect(),
        })))
    }

    /// ArrayBuffer over raw bytes.
    #[must_use]
    pub fn array_buffer(bytes: Vec<u8>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::ArrayBuffer(
            bytes,
        ))))
    }

    /// SharedArrayBuffer over raw bytes.
    #[must_use]
    pub fn shared_array_buffer(bytes: Vec<u8>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(
            ObjectKind::SharedArrayBuffer(bytes),
        )))
    }

    /// DataView over raw bytes.
    #[must_use]
    pub fn data_view(bytes: Vec<u8>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::DataView(bytes))))
    }

    /// Typed array from raw little-endian bytes.
    #[must_use]
    pub fn typed_array(kind: ElementKind, bytes: Vec<u8>) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::TypedArray {
            kind,
            bytes,
        })))
    }

    /// Uint8Array from elements.
    #[must_use]
    pub fn uint8_array(items: &[u8]) -> Self {
        Self::typed_array(ElementKind::Uint8, items.to_vec())
    }

    /// Int8Array from elements.
    #[must_use]
    pub fn int8_array(items: &[i8]) -> Self {
        Self::typed_array(ElementKind::Int8, items.iter().map(|v| *v as u8).collect())
    }

    /// Int32Array from elements.
    #[must_use]
    pub fn int32_array(items: &[i32]) -> Self {
        Self::typed_array(
            ElementKind::Int32,
            items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        )
    }

    /// Uint32Array from elements.
    #[must_use]
    pub fn uint32_array(items: &[u32]) -> Self {
        Self::typed_array(
            ElementKind::Uint32,
            items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        )
    }

    /// Float32Array from elements.
    #[must_use]
    pub fn float32_array(items: &[f32]) -> Self {
        Self::typed_array(
            ElementKind::Float32,
            items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        )
    }

    /// Float64Array from elements.
    #[must_use]
    pub fn float64_array(items: &[f64]) -> Self {
        Self::typed_array(
            ElementKind::Float64,
            items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        )
    }

    /// BigInt64Array from elements.
    #[must_use]
    pub fn bigint64_array(items: &[i64]) -> Self {
        Self::typed_array(
            ElementKind::BigInt64,
            items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        )
    }

    /// BigUint64Array from elements.
    #[must_use]
    pub fn biguint64_array(items: &[u64]) -> Self {
        Self::typed_array(
            ElementKind::BigUint64,
            items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        )
    }

    /// Boxed number wrapper object.
    #[must_use]
    pub fn boxed_number(value: f64) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Boxed(
            BoxedPrimitive::Number(value),
        ))))
    }

    /// Boxed string wrapper object.
    #[must_use]
    pub fn boxed_str(value: &str) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Boxed(
            BoxedPrimitive::Str(value.to_owned()),
        ))))
    }

    /// Boxed boolean wrapper object.
    #[must_use]
    pub fn boxed_bool(value: bool) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Boxed(
            BoxedPrimitive::Bool(value),
        ))))
    }

    /// Boxed bigint wrapper object.
    #[must_use]
    pub fn boxed_bigint(value: i128) -> Self {
        Self::Object(ObjectRef::new(ObjectData::new(ObjectKind::Boxed(
            BoxedPrimitive::BigInt(value),
        ))))
    }

    /// The object reference, when this value is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Whether this value is a (non-null) object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// The `typeof`-style tag for this value.
    #[must_use]
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::BigInt(_) => "bigint",
            Self::Str(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Object(obj) => {
                if matches!(obj.data().kind, ObjectKind::Function { .. }) {
                    "function"
                } else {
                    "object"
                }
            }
        }
    }

    /// Build a value tree from JSON (objects become plain objects, arrays
    /// dense arrays, numbers doubles).
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::Str(s.clone()),
            serde_json::Value::Array(items) => Self::array(items.iter().map(Self::from_json)),
            serde_json::Value::Object(entries) => {
                Self::object(entries.iter().map(|(k, v)| (k.clone(), Self::from_json(v))))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_identity() {
        let a = Value::object([("x", Value::from(1))]);
        let b = a.clone();
        let (a, b) = (a.as_object().unwrap(), b.as_object().unwrap());
        assert!(a.ptr_eq(b));
        assert_eq!(a.id(), b.id());

        let c = Value::object([("x", Value::from(1))]);
        assert!(!a.ptr_eq(c.as_object().unwrap()));
    }

    #[test]
    fn test_symbol_identity() {
        let a = SymbolRef::new(Some("tag"));
        let b = SymbolRef::new(Some("tag"));
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
        assert_eq!(a.description(), Some("tag"));
    }

    #[test]
    fn test_cycle_construction() {
        let value = Value::object([("name", Value::from("root"))]);
        let obj = value.as_object().unwrap();
        obj.set("me", value.clone());
        let inner = obj.get("me").unwrap();
        assert!(inner.as_object().unwrap().ptr_eq(obj));
    }

    #[test]
    fn test_getter_capture() {
        let value = Value::object([("a", Value::from(1))]);
        let obj = value.as_object().unwrap();
        obj.set_accessor("boom", Some(Getter::new(|| Err(Value::error("Error", "no")))), false);
        assert!(obj.get("boom").is_none());
    }

    #[test]
    fn test_typed_array_decode() {
        let v = Value::float64_array(&[1.5, f64::NAN]);
        let obj = v.as_object().unwrap();
        let data = obj.data();
        let ObjectKind::TypedArray { kind, bytes } = &data.kind else {
            panic!("expected typed array");
        };
        let elements = decode_elements(*kind, bytes);
        assert_eq!(elements.len(), 2);
        match elements[0] {
            TypedElement::Float(f) => assert_eq!(f, 1.5),
            _ => panic!("expected float element"),
        }
        match elements[1] {
            TypedElement::Float(f) => assert!(f.is_nan()),
            _ => panic!("expected float element"),
        }
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a":1,"b":[true,null,"x"]}"#).unwrap();
        let value = Value::from_json(&json);
        let obj = value.as_object().unwrap();
        assert!(matches!(obj.get("a"), Some(Value::Number(n)) if n == 1.0));
        let b = obj.get("b").unwrap();
        let b = b.as_object().unwrap();
        let data = b.data();
        let ObjectKind::Array(items) = &data.kind else {
            panic!("expected array");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Undefined.type_of(), "undefined");
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::from(1).type_of(), "number");
        assert_eq!(Value::from("s").type_of(), "string");
        assert_eq!(Value::function("f").type_of(), "function");
        assert_eq!(Value::array([]).type_of(), "object");
    }
}
