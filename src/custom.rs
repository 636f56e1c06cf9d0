//! User-defined values.
//!
//! A custom value is an opaque, refcounted leaf that masquerades as one of
//! the logical JSON types. It must be able to describe itself as text
//! (the [`Display`](std::fmt::Display) supertrait) and name the logical type
//! it acts as; everything else is optional. Serialization goes through
//! [`CustomValue::to_json`]: the serializers call it once per distinct
//! custom value and cache the projection.
//!
//! ```rust
//! use std::fmt;
//! use incjson::{CustomValue, Value, ValueType};
//!
//! #[derive(Debug)]
//! struct Celsius(f64);
//!
//! impl fmt::Display for Celsius {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "{}\u{b0}C", self.0)
//!     }
//! }
//!
//! impl CustomValue for Celsius {
//!     fn value_type(&self) -> ValueType {
//!         ValueType::Number
//!     }
//!     fn to_json(&self) -> Value {
//!         Value::from(self.0)
//!     }
//! }
//!
//! let v = Value::custom(Celsius(21.5));
//! assert_eq!(v.value_type(), ValueType::Number);
//! assert_eq!(incjson::stringify(&v), "21.5");
//! ```

use std::fmt;

use crate::value::{Value, ValueType, UNDEFINED};

/// Capability interface for values stored behind [`Value::custom`].
///
/// Custom values should be immutable: they are shared by reference and may
/// be read from any number of threads at once.
pub trait CustomValue: fmt::Debug + fmt::Display + Send + Sync {
    /// The logical type this value acts as. Affects how generic code
    /// accesses it; `String`, `Array` and `Object` are the useful choices
    /// alongside `Number`.
    fn value_type(&self) -> ValueType;

    /// Projection to a plain JSON value, used by the serializers. Called at
    /// most once per distinct custom value per serializer instance.
    fn to_json(&self) -> Value {
        Value::null()
    }

    /// String content, if the value acts as a string.
    fn get_string(&self) -> &str {
        ""
    }

    /// Item count, if the value acts as a container.
    fn size(&self) -> usize {
        0
    }

    /// Item lookup by position, if the value acts as a container. Out of
    /// range lookups must return the undefined value.
    fn get_by_index(&self, _index: usize) -> &Value {
        &UNDEFINED
    }

    /// Item lookup by key, if the value acts as an object.
    fn get_by_key(&self, _key: &str) -> &Value {
        &UNDEFINED
    }

    /// Equality between custom values. The default is identity; structural
    /// equality is opt-in.
    fn equals(&self, other: &dyn CustomValue) -> bool {
        std::ptr::eq(
            self as *const Self as *const u8,
            other as *const dyn CustomValue as *const u8,
        )
    }
}
