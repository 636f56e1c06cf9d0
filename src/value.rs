//! The immutable JSON value.
//!
//! [`Value`] is a small tagged handle: scalars, short strings and short
//! number texts live inline, everything else is a shared, refcounted,
//! immutable buffer. Cloning a value never copies container contents, only
//! bumps a reference count, so values are cheap to pass around and safe to
//! read from any number of threads.
//!
//! ## Core rules
//!
//! - `undefined` is the default state. It means "no value here", is distinct
//!   from `null`, and compares unequal to everything, itself included.
//! - Objects are stored sorted ascending by key (byte-wise UTF-8 order) and
//!   looked up by binary search.
//! - A number may carry its exact decimal spelling as text; the spelling is
//!   emitted verbatim by the serializers and converted on demand by the
//!   accessors.
//!
//! ## Creating values
//!
//! ```rust
//! use incjson::{json, KeyValue, Value};
//!
//! let simple = Value::from(42);
//! let text = Value::from("hello");
//! let exact = Value::number_str("0.1000000000000000002");
//!
//! let doc = json!({
//!     "id": 7,
//!     "name": "Alice",
//!     "tags": ["admin", "ops"]
//! });
//! assert_eq!(doc["name"].get_string(), "Alice");
//!
//! // Collecting entries builds an object, collecting values an array.
//! let obj: Value = (1..=3)
//!     .map(|n| KeyValue::new(n.to_string(), Value::from(n)))
//!     .collect();
//! assert_eq!(obj["2"].get_i64(), 2);
//! # let _ = (simple, text, exact);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::custom::CustomValue;
use crate::key::KeyValue;
use crate::number;

/// The seven logical types a value can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

/// Physical storage of a value, exposed for low-level introspection and
/// tests. Most code should use [`Value::value_type`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    Undefined,
    Null,
    BoolFalse,
    BoolTrue,
    Int64,
    UInt64,
    Double,
    ShortString,
    ShortNumber,
    StaticString,
    StaticNumber,
    LongString,
    LongNumber,
    EmptyArray,
    EmptyObject,
    Array,
    Object,
    Custom,
}

/// A string of at most 14 bytes stored inline in the value itself.
#[derive(Clone, Copy)]
pub(crate) struct ShortStr {
    len: u8,
    buf: [u8; 14],
}

impl ShortStr {
    pub(crate) const MAX: usize = 14;

    const fn make(s: &str) -> ShortStr {
        let bytes = s.as_bytes();
        let mut buf = [0u8; 14];
        let mut i = 0;
        while i < bytes.len() {
            buf[i] = bytes[i];
            i += 1;
        }
        ShortStr {
            len: bytes.len() as u8,
            buf,
        }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len as usize])
            .expect("short strings always hold valid UTF-8")
    }
}

impl fmt::Debug for ShortStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

#[derive(Clone, Debug)]
enum Repr {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    ShortString(ShortStr),
    ShortNumber(ShortStr),
    StaticString(&'static str),
    StaticNumber(&'static str),
    LongString(Arc<str>),
    LongNumber(Arc<str>),
    EmptyArray,
    EmptyObject,
    Array(Arc<[Value]>),
    Object(Arc<[KeyValue]>),
    Custom(Arc<dyn CustomValue>),
}

/// The shared undefined value, returned by reference from missed lookups.
pub static UNDEFINED: Value = Value {
    repr: Repr::Undefined,
};

/// An immutable handle to a JSON-representable datum.
///
/// See the [module documentation](self) for the core rules.
#[derive(Clone)]
pub struct Value {
    repr: Repr,
}

/// One level of a value, as seen by pattern matching.
///
/// This is the dispatcher the library itself routes through: every string
/// flavor (inline, shared, borrowed, plain or number-flagged) collapses to
/// [`Payload::Text`], and both empty-container storages surface as empty
/// slices. Use [`Value::value_type`] alongside it when the string/number
/// distinction matters.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Text(&'a str),
    Array(&'a [Value]),
    Object(&'a [KeyValue]),
    Custom(&'a dyn CustomValue),
}

pub(crate) const TRUE_TEXT: &str = "true";
pub(crate) const FALSE_TEXT: &str = "false";
pub(crate) const NULL_TEXT: &str = "null";
pub(crate) const UNDEFINED_TEXT: &str = "(undefined)";

impl Value {
    /// The undefined value.
    #[inline]
    #[must_use]
    pub const fn undefined() -> Value {
        Value {
            repr: Repr::Undefined,
        }
    }

    /// The null value.
    #[inline]
    #[must_use]
    pub const fn null() -> Value {
        Value { repr: Repr::Null }
    }

    /// A string value from borrowed static text. Usable in `const` and
    /// `static` items; text short enough to inline is inlined anyway.
    #[must_use]
    pub const fn from_static(s: &'static str) -> Value {
        if s.len() <= ShortStr::MAX {
            Value {
                repr: Repr::ShortString(ShortStr::make(s)),
            }
        } else {
            Value {
                repr: Repr::StaticString(s),
            }
        }
    }

    /// A number value from borrowed static spelling, see [`Value::from_static`].
    #[must_use]
    pub const fn from_static_number(s: &'static str) -> Value {
        if s.len() <= ShortStr::MAX {
            Value {
                repr: Repr::ShortNumber(ShortStr::make(s)),
            }
        } else {
            Value {
                repr: Repr::StaticNumber(s),
            }
        }
    }

    /// A number whose exact decimal spelling is the given text.
    ///
    /// The spelling is not validated; the serializers emit it verbatim, so
    /// handing over something that is not a number produces broken output.
    ///
    /// ```rust
    /// use incjson::Value;
    /// let n = Value::number_str("123.321000000000001");
    /// assert_eq!(incjson::stringify(&n), "123.321000000000001");
    /// assert_eq!(n.get_i64(), 123);
    /// ```
    #[must_use]
    pub fn number_str(s: &str) -> Value {
        if s.len() <= ShortStr::MAX {
            Value {
                repr: Repr::ShortNumber(ShortStr::make(s)),
            }
        } else {
            Value {
                repr: Repr::LongNumber(Arc::from(s)),
            }
        }
    }

    /// Wraps a custom value.
    pub fn custom<T: CustomValue + 'static>(value: T) -> Value {
        Value::from_custom(Arc::new(value))
    }

    /// Wraps an already shared custom value.
    pub fn from_custom(value: Arc<dyn CustomValue>) -> Value {
        Value {
            repr: Repr::Custom(value),
        }
    }

    pub(crate) fn object_presorted(entries: Vec<KeyValue>) -> Value {
        if entries.is_empty() {
            Value {
                repr: Repr::EmptyObject,
            }
        } else {
            Value {
                repr: Repr::Object(entries.into()),
            }
        }
    }

    /// The logical type of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match &self.repr {
            Repr::Undefined => ValueType::Undefined,
            Repr::Null => ValueType::Null,
            Repr::Bool(_) => ValueType::Boolean,
            Repr::Int(_)
            | Repr::UInt(_)
            | Repr::Double(_)
            | Repr::ShortNumber(_)
            | Repr::StaticNumber(_)
            | Repr::LongNumber(_) => ValueType::Number,
            Repr::ShortString(_) | Repr::StaticString(_) | Repr::LongString(_) => ValueType::String,
            Repr::EmptyArray | Repr::Array(_) => ValueType::Array,
            Repr::EmptyObject | Repr::Object(_) => ValueType::Object,
            Repr::Custom(c) => c.value_type(),
        }
    }

    /// The physical storage variant, for low-level users.
    #[must_use]
    pub fn storage(&self) -> Storage {
        match &self.repr {
            Repr::Undefined => Storage::Undefined,
            Repr::Null => Storage::Null,
            Repr::Bool(false) => Storage::BoolFalse,
            Repr::Bool(true) => Storage::BoolTrue,
            Repr::Int(_) => Storage::Int64,
            Repr::UInt(_) => Storage::UInt64,
            Repr::Double(_) => Storage::Double,
            Repr::ShortString(_) => Storage::ShortString,
            Repr::ShortNumber(_) => Storage::ShortNumber,
            Repr::StaticString(_) => Storage::StaticString,
            Repr::StaticNumber(_) => Storage::StaticNumber,
            Repr::LongString(_) => Storage::LongString,
            Repr::LongNumber(_) => Storage::LongNumber,
            Repr::EmptyArray => Storage::EmptyArray,
            Repr::EmptyObject => Storage::EmptyObject,
            Repr::Array(_) => Storage::Array,
            Repr::Object(_) => Storage::Object,
            Repr::Custom(_) => Storage::Custom,
        }
    }

    /// The value one level deep, for pattern matching.
    #[must_use]
    pub fn payload(&self) -> Payload<'_> {
        match &self.repr {
            Repr::Undefined => Payload::Undefined,
            Repr::Null => Payload::Null,
            Repr::Bool(b) => Payload::Bool(*b),
            Repr::Int(n) => Payload::Int(*n),
            Repr::UInt(n) => Payload::UInt(*n),
            Repr::Double(n) => Payload::Double(*n),
            Repr::ShortString(s) | Repr::ShortNumber(s) => Payload::Text(s.as_str()),
            Repr::StaticString(s) | Repr::StaticNumber(s) => Payload::Text(s),
            Repr::LongString(s) | Repr::LongNumber(s) => Payload::Text(s),
            Repr::EmptyArray => Payload::Array(&[]),
            Repr::EmptyObject => Payload::Object(&[]),
            Repr::Array(a) => Payload::Array(a),
            Repr::Object(o) => Payload::Object(o),
            Repr::Custom(c) => Payload::Custom(&**c),
        }
    }

    /// Whether the value is defined (anything but undefined).
    #[inline]
    #[must_use]
    pub fn is_defined(&self) -> bool {
        !matches!(self.repr, Repr::Undefined)
    }

    /// Whether the value is defined and not null.
    #[inline]
    #[must_use]
    pub fn has_value(&self) -> bool {
        !matches!(self.repr, Repr::Undefined | Repr::Null)
    }

    /// Whether the value is an array or an object.
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self.repr,
            Repr::EmptyArray | Repr::Array(_) | Repr::EmptyObject | Repr::Object(_)
        )
    }

    /// Item count for containers and container-like custom values, zero for
    /// everything else.
    #[must_use]
    pub fn size(&self) -> usize {
        match &self.repr {
            Repr::Array(a) => a.len(),
            Repr::Object(o) => o.len(),
            Repr::Custom(c) => c.size(),
            _ => 0,
        }
    }

    /// Whether the value is an empty container; true for non-containers.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// True for the boolean `true`, false for everything else.
    #[inline]
    #[must_use]
    pub fn get_bool(&self) -> bool {
        matches!(self.repr, Repr::Bool(true))
    }

    /// Best-effort conversion to `i64`: numeric storages cast, number and
    /// string texts parse their leading digits, booleans count as 0/1,
    /// anything else is 0.
    #[must_use]
    pub fn get_i64(&self) -> i64 {
        match self.payload() {
            Payload::Bool(b) => i64::from(b),
            Payload::Int(n) => n,
            Payload::UInt(n) => n as i64,
            Payload::Double(n) => n as i64,
            Payload::Text(s) => number::parse_i64_prefix(s),
            _ => 0,
        }
    }

    /// Best-effort conversion to `u64`, see [`Value::get_i64`].
    #[must_use]
    pub fn get_u64(&self) -> u64 {
        match self.payload() {
            Payload::Bool(b) => u64::from(b),
            Payload::Int(n) => n as u64,
            Payload::UInt(n) => n,
            Payload::Double(n) => n as u64,
            Payload::Text(s) => number::parse_u64_prefix(s),
            _ => 0,
        }
    }

    /// Best-effort conversion to `i32`, see [`Value::get_i64`].
    #[inline]
    #[must_use]
    pub fn get_i32(&self) -> i32 {
        self.get_i64() as i32
    }

    /// Best-effort conversion to `u32`, see [`Value::get_i64`].
    #[inline]
    #[must_use]
    pub fn get_u32(&self) -> u32 {
        self.get_u64() as u32
    }

    /// Best-effort conversion to `f64`. Number and string texts parse in
    /// full, with `∞`/`-∞` mapping to the infinities and anything
    /// unparseable to NaN; non-numeric, non-text values are NaN.
    #[must_use]
    pub fn get_f64(&self) -> f64 {
        match self.payload() {
            Payload::Bool(b) => f64::from(u8::from(b)),
            Payload::Int(n) => n as f64,
            Payload::UInt(n) => n as f64,
            Payload::Double(n) => n,
            Payload::Text(s) => number::parse_f64_text(s),
            _ => f64::NAN,
        }
    }

    /// The string content of string values, the canonical word for
    /// booleans, null and undefined, the custom value's string content for
    /// custom values, and `""` for everything else. Numbers are *not*
    /// rendered; use [`Display`](std::fmt::Display) for that.
    #[must_use]
    pub fn get_string(&self) -> &str {
        match &self.repr {
            Repr::ShortString(s) | Repr::ShortNumber(s) => s.as_str(),
            Repr::StaticString(s) | Repr::StaticNumber(s) => s,
            Repr::LongString(s) | Repr::LongNumber(s) => s,
            Repr::Bool(true) => TRUE_TEXT,
            Repr::Bool(false) => FALSE_TEXT,
            Repr::Null => NULL_TEXT,
            Repr::Undefined => UNDEFINED_TEXT,
            Repr::Custom(c) => c.get_string(),
            _ => "",
        }
    }

    /// The boolean if this is a boolean, otherwise the caller's default.
    #[must_use]
    pub fn get_bool_or(&self, default: bool) -> bool {
        if self.value_type() == ValueType::Boolean {
            self.get_bool()
        } else {
            default
        }
    }

    /// The number as `i64` if this is a number, otherwise the caller's default.
    #[must_use]
    pub fn get_i64_or(&self, default: i64) -> i64 {
        if self.value_type() == ValueType::Number {
            self.get_i64()
        } else {
            default
        }
    }

    /// The number as `u64` if this is a number, otherwise the caller's default.
    #[must_use]
    pub fn get_u64_or(&self, default: u64) -> u64 {
        if self.value_type() == ValueType::Number {
            self.get_u64()
        } else {
            default
        }
    }

    /// The number as `f64` if this is a number, otherwise the caller's default.
    #[must_use]
    pub fn get_f64_or(&self, default: f64) -> f64 {
        if self.value_type() == ValueType::Number {
            self.get_f64()
        } else {
            default
        }
    }

    /// The text if this is a string, otherwise the caller's default.
    #[must_use]
    pub fn get_str_or<'a>(&'a self, default: &'a str) -> &'a str {
        if self.value_type() == ValueType::String {
            self.get_string()
        } else {
            default
        }
    }

    /// The elements if this is an array, an empty slice otherwise.
    #[must_use]
    pub fn as_array(&self) -> &[Value] {
        match &self.repr {
            Repr::Array(a) => a,
            _ => &[],
        }
    }

    /// The sorted entries if this is an object, an empty slice otherwise.
    ///
    /// ```rust
    /// use incjson::json;
    /// let v = json!({"b": 1, "a": 2, "c": 3});
    /// let keys: Vec<&str> = v.keys().iter().map(|kv| kv.key.as_str()).collect();
    /// assert_eq!(keys, ["a", "b", "c"]);
    /// ```
    #[must_use]
    pub fn keys(&self) -> &[KeyValue] {
        match &self.repr {
            Repr::Object(o) => o,
            _ => &[],
        }
    }

    /// The shared custom value, if one is stored here.
    #[must_use]
    pub fn get_custom(&self) -> Option<Arc<dyn CustomValue>> {
        match &self.repr {
            Repr::Custom(c) => Some(c.clone()),
            _ => None,
        }
    }

    /// Scalar rendition as an owned string: numbers in decimal, text
    /// verbatim, the canonical words for booleans, null and undefined, and
    /// the placeholders `[array]` / `{object}` for containers. The
    /// [`Display`](std::fmt::Display) impl is built on this.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self.payload() {
            Payload::Undefined => UNDEFINED_TEXT.to_string(),
            Payload::Null => NULL_TEXT.to_string(),
            Payload::Bool(true) => TRUE_TEXT.to_string(),
            Payload::Bool(false) => FALSE_TEXT.to_string(),
            Payload::Int(n) => n.to_string(),
            Payload::UInt(n) => n.to_string(),
            Payload::Double(n) => n.to_string(),
            Payload::Text(s) => s.to_string(),
            Payload::Array(_) => "[array]".to_string(),
            Payload::Object(_) => "{object}".to_string(),
            Payload::Custom(c) => c.to_string(),
        }
    }

    /// Iterates contained values: array elements, or object values in key
    /// order. Empty for everything else.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        match &self.repr {
            Repr::Array(a) => Iter(IterRepr::Values(a.iter())),
            Repr::Object(o) => Iter(IterRepr::Entries(o.iter())),
            _ => Iter(IterRepr::Values(self.as_array().iter())),
        }
    }
}

impl Default for Value {
    #[inline]
    fn default() -> Self {
        Value::undefined()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.repr, f)
    }
}

/// See [`Value::to_text`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Equality over visited payloads.
///
/// `undefined` never compares equal, not even to itself, so `Value` is
/// `PartialEq` without being `Eq`. String flavors compare by text
/// regardless of storage or numeric flag; integers compare numerically
/// across the signed and unsigned storages; doubles compare only with
/// doubles; custom values use their `equals` capability.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self.payload(), other.payload()) {
            (Payload::Undefined, _) | (_, Payload::Undefined) => false,
            (Payload::Null, Payload::Null) => true,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Int(a), Payload::Int(b)) => a == b,
            (Payload::UInt(a), Payload::UInt(b)) => a == b,
            (Payload::Int(a), Payload::UInt(b)) | (Payload::UInt(b), Payload::Int(a)) => {
                a >= 0 && a as u64 == b
            }
            (Payload::Double(a), Payload::Double(b)) => a == b,
            (Payload::Text(a), Payload::Text(b)) => a == b,
            (Payload::Array(a), Payload::Array(b)) => a == b,
            (Payload::Object(a), Payload::Object(b)) => a == b,
            (Payload::Custom(a), Payload::Custom(b)) => a.equals(b),
            _ => false,
        }
    }
}

/// Lookup by key. Returns the shared undefined value when the receiver is
/// not an object or the key is absent; duplicate keys resolve to the first
/// match in sort order.
impl std::ops::Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match &self.repr {
            Repr::Object(entries) => {
                let at = entries.partition_point(|kv| kv.key.as_str() < key);
                match entries.get(at) {
                    Some(kv) if kv.key.as_str() == key => &kv.value,
                    _ => &UNDEFINED,
                }
            }
            Repr::Custom(c) => c.get_by_key(key),
            _ => &UNDEFINED,
        }
    }
}

/// Lookup by position: array element, or the value part of the i-th object
/// entry. Returns the shared undefined value out of range.
impl std::ops::Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match &self.repr {
            Repr::Array(items) => items.get(index).unwrap_or(&UNDEFINED),
            Repr::Object(entries) => entries.get(index).map_or(&UNDEFINED, |kv| &kv.value),
            Repr::Custom(c) => c.get_by_index(index),
            _ => &UNDEFINED,
        }
    }
}

enum IterRepr<'a> {
    Values(std::slice::Iter<'a, Value>),
    Entries(std::slice::Iter<'a, KeyValue>),
}

/// Iterator over contained values, see [`Value::iter`].
pub struct Iter<'a>(IterRepr<'a>);

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match &mut self.0 {
            IterRepr::Values(it) => it.next(),
            IterRepr::Entries(it) => it.next().map(|kv| &kv.value),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            IterRepr::Values(it) => it.size_hint(),
            IterRepr::Entries(it) => it.size_hint(),
        }
    }
}

impl<'a> IntoIterator for &'a Value {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value {
            repr: Repr::Bool(v),
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value { repr: Repr::Int(v as i64) }
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value { repr: Repr::UInt(v as u64) }
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value {
            repr: Repr::Double(f64::from(v)),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value {
            repr: Repr::Double(v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        if s.len() <= ShortStr::MAX {
            Value {
                repr: Repr::ShortString(ShortStr::make(s)),
            }
        } else {
            Value {
                repr: Repr::LongString(Arc::from(s)),
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        if s.len() <= ShortStr::MAX {
            Value {
                repr: Repr::ShortString(ShortStr::make(&s)),
            }
        } else {
            Value {
                repr: Repr::LongString(Arc::from(s)),
            }
        }
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        if items.is_empty() {
            Value {
                repr: Repr::EmptyArray,
            }
        } else {
            Value {
                repr: Repr::Array(items.into()),
            }
        }
    }
}

impl From<Vec<KeyValue>> for Value {
    fn from(mut entries: Vec<KeyValue>) -> Self {
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Value::object_presorted(entries)
    }
}

/// The canonical empty instance of each logical type.
impl From<ValueType> for Value {
    fn from(t: ValueType) -> Self {
        let repr = match t {
            ValueType::Undefined => Repr::Undefined,
            ValueType::Null => Repr::Null,
            ValueType::Boolean => Repr::Bool(false),
            ValueType::Number => Repr::Int(0),
            ValueType::String => Repr::ShortString(ShortStr::make("")),
            ValueType::Array => Repr::EmptyArray,
            ValueType::Object => Repr::EmptyObject,
        };
        Value { repr }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::from(iter.into_iter().collect::<Vec<Value>>())
    }
}

impl FromIterator<KeyValue> for Value {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        Value::from(iter.into_iter().collect::<Vec<KeyValue>>())
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| KeyValue::new(k, v))
            .collect()
    }
}

mod serde_impls {
    use super::{Value, ValueType};
    use crate::key::KeyValue;
    use crate::number;
    use crate::Payload;
    use serde::de::{MapAccess, SeqAccess, Visitor};
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for Value {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self.payload() {
                Payload::Undefined | Payload::Null => serializer.serialize_unit(),
                Payload::Bool(b) => serializer.serialize_bool(b),
                Payload::Int(n) => serializer.serialize_i64(n),
                Payload::UInt(n) => serializer.serialize_u64(n),
                Payload::Double(n) => serializer.serialize_f64(n),
                Payload::Text(s) => {
                    if self.value_type() == ValueType::Number {
                        if let Ok(n) = s.parse::<i64>() {
                            serializer.serialize_i64(n)
                        } else if let Ok(n) = s.parse::<u64>() {
                            serializer.serialize_u64(n)
                        } else {
                            serializer.serialize_f64(number::parse_f64_text(s))
                        }
                    } else {
                        serializer.serialize_str(s)
                    }
                }
                Payload::Array(items) => {
                    let defined = items.iter().filter(|v| v.is_defined());
                    let mut seq = serializer.serialize_seq(Some(defined.clone().count()))?;
                    for item in defined {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
                Payload::Object(entries) => {
                    let defined = entries.iter().filter(|kv| kv.value.is_defined());
                    let mut map = serializer.serialize_map(Some(defined.clone().count()))?;
                    for kv in defined {
                        map.serialize_entry(kv.key.as_str(), &kv.value)?;
                    }
                    map.end()
                }
                Payload::Custom(c) => c.to_json().serialize(serializer),
            }
        }
    }

    impl<'de> Deserialize<'de> for Value {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct ValueVisitor;

            impl<'de> Visitor<'de> for ValueVisitor {
                type Value = Value;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("any JSON-representable value")
                }

                fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
                    Ok(Value::from(v))
                }

                fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
                    Ok(Value::from(v))
                }

                fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
                    Ok(Value::from(v))
                }

                fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
                    Ok(Value::from(v))
                }

                fn visit_str<E>(self, v: &str) -> Result<Value, E> {
                    Ok(Value::from(v))
                }

                fn visit_string<E>(self, v: String) -> Result<Value, E> {
                    Ok(Value::from(v))
                }

                fn visit_unit<E>(self) -> Result<Value, E> {
                    Ok(Value::null())
                }

                fn visit_none<E>(self) -> Result<Value, E> {
                    Ok(Value::null())
                }

                fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    Deserialize::deserialize(deserializer)
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
                where
                    A: SeqAccess<'de>,
                {
                    let mut items: Vec<Value> = Vec::new();
                    while let Some(item) = seq.next_element()? {
                        items.push(item);
                    }
                    Ok(Value::from(items))
                }

                fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
                where
                    A: MapAccess<'de>,
                {
                    let mut entries: Vec<KeyValue> = Vec::new();
                    while let Some((key, value)) = map.next_entry::<String, Value>()? {
                        entries.push(KeyValue::new(key, value));
                    }
                    Ok(Value::from(entries))
                }
            }

            deserializer.deserialize_any(ValueVisitor)
        }
    }
}
