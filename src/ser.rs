//! Incremental text serializer.
//!
//! The serializer walks the value through an explicit frame stack and emits
//! output in bounded chunks: every [`read`](Serializer::read) drives the
//! machine to its next natural yield point and hands back what was produced.
//! An empty chunk means the value has been fully rendered.
//!
//! ```rust
//! use incjson::{json, Serializer};
//!
//! let mut ser = Serializer::new(json!({"a": 1, "b": [true, null]}));
//! let mut out = String::new();
//! loop {
//!     let chunk = ser.read();
//!     if chunk.is_empty() {
//!         break;
//!     }
//!     out.push_str(chunk);
//! }
//! assert_eq!(out, r#"{"a":1,"b":[true,null]}"#);
//! ```
//!
//! Rendering notes, beyond plain JSON:
//! - undefined entries of arrays and objects are omitted entirely, separator
//!   included; a top-level undefined renders as `null`;
//! - number texts are emitted verbatim;
//! - NaN renders as `null` and the infinities as the quoted glyphs `"∞"` /
//!   `"-∞"`;
//! - custom values render their [`to_json`](crate::CustomValue::to_json)
//!   projection, computed once per distinct value.

use std::collections::HashMap;

use crate::custom::CustomValue;
use crate::number;
use crate::value::{Payload, Value, ValueType};

/// Incremental serializer producing the textual JSON encoding.
pub struct Serializer {
    out: String,
    stack: Vec<Frame>,
    projections: HashMap<usize, Value>,
}

enum Frame {
    /// A value waiting to be rendered.
    Pending(Value),
    /// An array with elements still to render; `owner` keeps the container
    /// alive, `at` is the next element.
    ArrayCursor { owner: Value, at: usize },
    ObjectCursor { owner: Value, at: usize },
}

impl Serializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Serializer {
            out: String::new(),
            stack: vec![Frame::Pending(value)],
            projections: HashMap::new(),
        }
    }

    /// Renders up to the next yield point and returns the produced chunk.
    /// The chunk borrows the serializer's buffer and is overwritten by the
    /// next call; an empty chunk signals completion.
    pub fn read(&mut self) -> &str {
        self.out.clear();
        self.advance();
        &self.out
    }

    fn advance(&mut self) {
        loop {
            let Some(frame) = self.stack.pop() else {
                return;
            };
            match frame {
                Frame::Pending(v) => {
                    self.render_value(&v);
                    return;
                }
                Frame::ArrayCursor { owner, mut at } => {
                    let next = loop {
                        let items = owner.as_array();
                        if at >= items.len() {
                            break None;
                        }
                        let v = &items[at];
                        at += 1;
                        if v.is_defined() {
                            break Some(v.clone());
                        }
                    };
                    if let Some(v) = next {
                        self.out.push(',');
                        self.stack.push(Frame::ArrayCursor { owner, at });
                        self.render_value(&v);
                        return;
                    }
                    self.out.push(']');
                }
                Frame::ObjectCursor { owner, mut at } => {
                    let next = loop {
                        let entries = owner.keys();
                        if at >= entries.len() {
                            break None;
                        }
                        let kv = &entries[at];
                        at += 1;
                        if kv.value.is_defined() {
                            break Some((kv.key.clone(), kv.value.clone()));
                        }
                    };
                    if let Some((key, v)) = next {
                        self.out.push(',');
                        self.render_string(key.as_str());
                        self.out.push(':');
                        self.stack.push(Frame::ObjectCursor { owner, at });
                        self.render_value(&v);
                        return;
                    }
                    self.out.push('}');
                }
            }
        }
    }

    fn render_value(&mut self, v: &Value) {
        match v.payload() {
            Payload::Undefined | Payload::Null => self.out.push_str("null"),
            Payload::Bool(true) => self.out.push_str("true"),
            Payload::Bool(false) => self.out.push_str("false"),
            Payload::Int(n) => self.out.push_str(&n.to_string()),
            Payload::UInt(n) => self.out.push_str(&n.to_string()),
            Payload::Double(n) => self.render_double(n),
            Payload::Text(s) => {
                if v.value_type() == ValueType::Number {
                    self.out.push_str(s);
                } else {
                    self.render_string(s);
                }
            }
            Payload::Array(items) => {
                self.out.push('[');
                let mut at = 0;
                let first = loop {
                    if at >= items.len() {
                        break None;
                    }
                    let item = &items[at];
                    at += 1;
                    if item.is_defined() {
                        break Some(item.clone());
                    }
                };
                if let Some(item) = first {
                    self.stack.push(Frame::ArrayCursor {
                        owner: v.clone(),
                        at,
                    });
                    self.render_value(&item);
                } else {
                    self.out.push(']');
                }
            }
            Payload::Object(entries) => {
                self.out.push('{');
                let mut at = 0;
                let first = loop {
                    if at >= entries.len() {
                        break None;
                    }
                    let kv = &entries[at];
                    at += 1;
                    if kv.value.is_defined() {
                        break Some((kv.key.clone(), kv.value.clone()));
                    }
                };
                if let Some((key, value)) = first {
                    self.render_string(key.as_str());
                    self.out.push(':');
                    self.stack.push(Frame::ObjectCursor {
                        owner: v.clone(),
                        at,
                    });
                    self.render_value(&value);
                } else {
                    self.out.push('}');
                }
            }
            Payload::Custom(c) => {
                let identity = c as *const dyn CustomValue as *const u8 as usize;
                let projection = self
                    .projections
                    .entry(identity)
                    .or_insert_with(|| c.to_json())
                    .clone();
                self.render_value(&projection);
            }
        }
    }

    fn render_double(&mut self, n: f64) {
        if n.is_nan() {
            self.out.push_str("null");
        } else if n == f64::INFINITY {
            self.out.push('"');
            self.out.push_str(number::INFINITY_TEXT);
            self.out.push('"');
        } else if n == f64::NEG_INFINITY {
            self.out.push('"');
            self.out.push_str(number::NEG_INFINITY_TEXT);
            self.out.push('"');
        } else {
            number::format_finite(&mut self.out, n);
        }
    }

    fn render_string(&mut self, s: &str) {
        self.out.push('"');
        encode_str(&mut self.out, s);
        self.out.push('"');
    }
}

/// JSON escape encoding: the named escapes, `\u00XX` for the remaining
/// control characters, everything else verbatim (UTF-8 passes through).
pub(crate) fn encode_str(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{json, stringify};

    #[test]
    fn chunks_concatenate_to_the_document() {
        let v = json!({"a": [1, 2], "b": {"c": null}});
        let mut ser = Serializer::new(v.clone());
        let mut chunks = 0;
        let mut out = String::new();
        loop {
            let part = ser.read();
            if part.is_empty() {
                break;
            }
            chunks += 1;
            out.push_str(part);
        }
        assert!(chunks > 1);
        assert_eq!(out, stringify(&v));
    }

    #[test]
    fn escapes_control_characters() {
        let s = stringify(&json!("a\"b\\c\nd\re\tf\u{8}g\u{c}h\u{1}i"));
        assert_eq!(s, r#""a\"b\\c\nd\re\tf\bg\fh\u0001i""#);
    }

    #[test]
    fn special_doubles() {
        assert_eq!(stringify(&json!((f64::NAN))), "null");
        assert_eq!(stringify(&json!((f64::INFINITY))), "\"\u{221e}\"");
        assert_eq!(stringify(&json!((f64::NEG_INFINITY))), "\"-\u{221e}\"");
    }

    #[test]
    fn top_level_undefined_is_null() {
        assert_eq!(stringify(&Value::undefined()), "null");
    }

    #[test]
    fn empty_containers() {
        assert_eq!(stringify(&json!([])), "[]");
        assert_eq!(stringify(&json!({})), "{}");
        assert_eq!(stringify(&json!([undefined, undefined])), "[]");
    }
}
