//! Structural transforms.
//!
//! Every operation here produces a freshly allocated container; receivers
//! and arguments are never mutated through their shared handles. The
//! `&mut self` methods rebind the receiver to the new container and leave
//! every other holder of the old one undisturbed.
//!
//! Two conventions run through the whole module:
//! - an `undefined` output from a mapping function means "drop this slot";
//! - an `undefined` value on the right-hand side of a key merge means
//!   "delete this key".

use crate::key::KeyValue;
use crate::value::Value;

impl Value {
    /// Maps contained values (array elements, or object values in key
    /// order) to a new array, dropping undefined outputs.
    ///
    /// ```rust
    /// use incjson::{json, Value};
    /// let squares = json!([1, 2, 3]).map(|v| Value::from(v.get_i64() * v.get_i64()));
    /// assert_eq!(squares, json!([1, 4, 9]));
    /// ```
    #[must_use]
    pub fn map<F>(&self, mut f: F) -> Value
    where
        F: FnMut(&Value) -> Value,
    {
        let mut out = Vec::with_capacity(self.size());
        for v in self {
            let w = f(v);
            if w.is_defined() {
                out.push(w);
            }
        }
        Value::from(out)
    }

    /// Maps object entries to entries, yielding a sorted object and
    /// dropping entries whose mapped value is undefined.
    #[must_use]
    pub fn map_entries<F>(&self, mut f: F) -> Value
    where
        F: FnMut(&KeyValue) -> KeyValue,
    {
        let mut out = Vec::with_capacity(self.size());
        for kv in self.keys() {
            let w = f(kv);
            if w.value.is_defined() {
                out.push(w);
            }
        }
        Value::from(out)
    }

    /// Maps contained values to entries, yielding a sorted object and
    /// dropping entries whose value is undefined.
    #[must_use]
    pub fn map_to_entries<F>(&self, mut f: F) -> Value
    where
        F: FnMut(&Value) -> KeyValue,
    {
        let mut out = Vec::with_capacity(self.size());
        for v in self {
            let w = f(v);
            if w.value.is_defined() {
                out.push(w);
            }
        }
        Value::from(out)
    }

    /// Maps object entries to plain values, yielding an array and dropping
    /// undefined outputs.
    #[must_use]
    pub fn map_values<F>(&self, mut f: F) -> Value
    where
        F: FnMut(&KeyValue) -> Value,
    {
        let mut out = Vec::with_capacity(self.size());
        for kv in self.keys() {
            let w = f(kv);
            if w.is_defined() {
                out.push(w);
            }
        }
        Value::from(out)
    }

    /// Keeps contained values the predicate accepts, as a new array.
    #[must_use]
    pub fn filter<F>(&self, mut f: F) -> Value
    where
        F: FnMut(&Value) -> bool,
    {
        let mut out = Vec::with_capacity(self.size());
        for v in self {
            if f(v) {
                out.push(v.clone());
            }
        }
        Value::from(out)
    }

    /// Keeps object entries the predicate accepts, as a new object.
    #[must_use]
    pub fn filter_entries<F>(&self, mut f: F) -> Value
    where
        F: FnMut(&KeyValue) -> bool,
    {
        let mut out = Vec::with_capacity(self.size());
        for kv in self.keys() {
            if f(kv) {
                out.push(kv.clone());
            }
        }
        Value::object_presorted(out)
    }

    /// Replaces the elements in `[from, to)` with `items` and returns the
    /// removed slice as an array. Positions clamp to the array bounds; a
    /// non-array receiver behaves as an empty array, so the receiver ends
    /// up holding just the inserted items.
    pub fn splice<I>(&mut self, from: usize, to: usize, items: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let src = self.as_array();
        let from = from.min(src.len());
        let to = to.clamp(from, src.len());
        let removed: Vec<Value> = src[from..to].to_vec();
        let mut out = Vec::with_capacity(src.len() - removed.len());
        out.extend_from_slice(&src[..from]);
        out.extend(items.into_iter().map(Into::into));
        out.extend_from_slice(&src[to..]);
        *self = Value::from(out);
        Value::from(removed)
    }

    /// Inserts `items` before position `at`.
    pub fn insert<I>(&mut self, at: usize, items: I) -> &mut Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.splice(at, at, items);
        self
    }

    /// Removes the elements in `[from, to)`.
    pub fn erase(&mut self, from: usize, to: usize) -> &mut Value {
        self.splice(from, to, std::iter::empty::<Value>());
        self
    }

    /// Appends `items` at the end.
    pub fn append<I>(&mut self, items: I) -> &mut Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let len = self.as_array().len();
        self.splice(len, len, items);
        self
    }

    /// The elements in `[from, to)` as a new array, positions clamped.
    #[must_use]
    pub fn slice(&self, from: usize, to: usize) -> Value {
        let src = self.as_array();
        let from = from.min(src.len());
        let to = to.clamp(from, src.len());
        Value::from(src[from..to].to_vec())
    }

    /// Merges the keys of `changes` into this object.
    ///
    /// Both sides should be objects. On a key collision `changes` wins; a
    /// key mapped to undefined in `changes` is deleted; keys present on
    /// only one side are kept. The result is a freshly allocated sorted
    /// object.
    ///
    /// ```rust
    /// use incjson::json;
    /// let mut v = json!({"keep": 1, "old": 2, "gone": 3});
    /// v.merge_keys(&json!({"old": 20, "new": 4, "gone": undefined}));
    /// assert_eq!(v, json!({"keep": 1, "old": 20, "new": 4}));
    /// ```
    pub fn merge_keys(&mut self, changes: &Value) -> &mut Value {
        let ours = self.keys();
        let theirs = changes.keys();
        let mut out = Vec::with_capacity(ours.len() + theirs.len());
        let (mut i, mut j) = (0, 0);
        while i < ours.len() && j < theirs.len() {
            match ours[i].key.cmp(&theirs[j].key) {
                std::cmp::Ordering::Less => {
                    out.push(ours[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    if theirs[j].value.is_defined() {
                        out.push(theirs[j].clone());
                    }
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    if theirs[j].value.is_defined() {
                        out.push(theirs[j].clone());
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&ours[i..]);
        out.extend(
            theirs[j..]
                .iter()
                .filter(|kv| kv.value.is_defined())
                .cloned(),
        );
        *self = Value::object_presorted(out);
        self
    }

    /// Sets, replaces or (via undefined values) deletes the listed keys.
    /// Equivalent to building an object from `items` and merging it in.
    pub fn set_keys<I>(&mut self, items: I) -> &mut Value
    where
        I: IntoIterator<Item = KeyValue>,
    {
        let patch = items.into_iter().collect::<Value>();
        self.merge_keys(&patch)
    }
}
