//! # incjson
//!
//! Immutable JSON values with incremental text and binary codecs.
//!
//! The crate has three tightly coupled pieces:
//!
//! - **[`Value`]**: an immutable, cheaply clonable JSON datum. Scalars and
//!   short strings live inline; arrays, objects and long strings are shared
//!   refcounted buffers, so clones are O(1) and values can be read from any
//!   number of threads. Objects keep their entries sorted by key. Alongside
//!   `null` there is an `undefined` state meaning "no value here", which
//!   compares unequal to everything and doubles as the deletion signal in
//!   key merges.
//! - **Incremental parsers**: [`Parser`] for text JSON and [`BinaryParser`]
//!   for the binary TLV encoding. Both are pushdown machines fed with input
//!   chunks of any size, designed to be driven from cooperative I/O loops:
//!   they never block, never recurse over input and give control back at
//!   every chunk boundary.
//! - **Incremental serializers**: [`Serializer`] and [`BinarySerializer`],
//!   the mirror image: they yield output in bounded chunks on demand.
//!
//! The one-shot façades [`parse`], [`stringify`], [`binarize`] and
//! [`unbinarize`] wrap the incremental machinery for when the whole
//! document is at hand.
//!
//! ## Quick start
//!
//! ```rust
//! use incjson::{json, parse, stringify};
//!
//! let v = parse(r#"{"b": 1, "a": [true, null, "text"]}"#).unwrap();
//! assert_eq!(v["a"][2].get_string(), "text");
//!
//! // objects render in sorted key order
//! assert_eq!(stringify(&v), r#"{"a":[true,null,"text"],"b":1}"#);
//!
//! // values are built with `json!` or plain `From` conversions
//! let patch = json!({"b": undefined, "c": 3});
//! let mut merged = v.clone();
//! merged.merge_keys(&patch);
//! assert_eq!(stringify(&merged), r#"{"a":[true,null,"text"],"c":3}"#);
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use incjson::{Parser, Serializer};
//!
//! // parse: feed chunks until write() stops asking for more
//! let mut parser = Parser::new();
//! for chunk in [&b"[\"spl"[..], &b"it\", 42]"[..]] {
//!     parser.write(chunk);
//! }
//! let value = parser.get_result();
//! assert_eq!(value[0].get_string(), "split");
//!
//! // serialize: drain chunks until empty
//! let mut ser = Serializer::new(value);
//! let mut out = String::new();
//! loop {
//!     let chunk = ser.read();
//!     if chunk.is_empty() {
//!         break;
//!     }
//!     out.push_str(chunk);
//! }
//! assert_eq!(out, r#"["split",42]"#);
//! ```
//!
//! ## Format notes
//!
//! Text output deviates from plain JSON in documented ways: numbers keep
//! their exact parsed spelling, `NaN` renders as `null`, the infinities
//! render as the quoted glyphs `"∞"`/`"-∞"` (and parse back unquoted as
//! number literals), and undefined container entries are omitted. The
//! binary format is a TLV encoding with one header byte per value and
//! little-endian IEEE-754 doubles; it elides nothing and round-trips the
//! whole value space bit-exactly. See the [`binary`] module docs for the
//! header layout.
//!
//! `Value` also implements serde's `Serialize`/`Deserialize`, so documents
//! can cross into any serde-based format when needed.

pub mod binary;
pub mod custom;
pub mod error;
pub mod key;
pub mod macros;
mod number;
pub mod parser;
pub mod ser;
mod transform;
pub mod value;

pub use binary::{BinaryParser, BinarySerializer};
pub use custom::CustomValue;
pub use error::{Error, ParseError, Result};
pub use key::{Key, KeyValue};
pub use parser::Parser;
pub use ser::Serializer;
pub use value::{Iter, Payload, Storage, Value, ValueType, UNDEFINED};

/// Parses one JSON value from text.
///
/// Trailing bytes after the first complete value are ignored, matching the
/// incremental parser's stream-multiplexing contract; use [`Parser`]
/// directly when the tail position matters.
///
/// # Errors
///
/// [`ParseError`] with the byte offset of the first unprocessed byte when
/// the text is malformed or truncated.
///
/// ```rust
/// let v = incjson::parse("[1, 2, 3]").unwrap();
/// assert_eq!(v.size(), 3);
/// assert!(incjson::parse("[1, 2").is_err());
/// ```
pub fn parse(text: &str) -> Result<Value> {
    let mut p = Parser::new();
    if p.write(text.as_bytes()) {
        // frames still open at end of input; a synthetic terminator lets a
        // pending top-level number finish
        if p.write(b" ") || p.is_error() {
            return Err(ParseError { offset: text.len() });
        }
        return Ok(p.get_result());
    }
    if p.is_error() {
        return Err(ParseError {
            offset: text.len() - p.unprocessed_len(),
        });
    }
    Ok(p.get_result())
}

/// Renders a value as a JSON string.
#[must_use]
pub fn stringify(value: &Value) -> String {
    let mut ser = Serializer::new(value.clone());
    let mut out = String::new();
    loop {
        let chunk = ser.read();
        if chunk.is_empty() {
            break;
        }
        out.push_str(chunk);
    }
    out
}

/// Encodes a value in the binary TLV format.
#[must_use]
pub fn binarize(value: &Value) -> Vec<u8> {
    let mut ser = BinarySerializer::new(value.clone());
    let mut out = Vec::new();
    loop {
        let chunk = ser.read();
        if chunk.is_empty() {
            break;
        }
        out.extend_from_slice(chunk);
    }
    out
}

/// Decodes one value from the binary TLV format.
///
/// # Errors
///
/// [`ParseError`] when the data is malformed or truncated.
///
/// ```rust
/// use incjson::{binarize, json, unbinarize};
/// let v = json!({"aaa": [1, 2, 3], "m1": 42});
/// assert_eq!(unbinarize(&binarize(&v)).unwrap(), v);
/// ```
pub fn unbinarize(data: &[u8]) -> Result<Value> {
    let mut p = BinaryParser::new();
    if p.write(data) {
        return Err(ParseError { offset: data.len() });
    }
    if p.is_error() {
        return Err(ParseError {
            offset: data.len() - p.unprocessed_len(),
        });
    }
    Ok(p.get_result())
}
