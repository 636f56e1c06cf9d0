//! Binary TLV codec.
//!
//! Every encoded value starts with one header byte, `TTTTTAAA`: a 5-bit
//! major tag and a 3-bit argument.
//!
//! ```text
//! 00000 AAA  simple       A ∈ {0=null, 1=true, 2=false, 3=double, 7=undefined}
//! 0001S AAA  integer      S=0 positive, S=1 negative; A+1 magnitude bytes (BE)
//! 00100 AAA  string       A+1 length-prefix bytes (BE), then the UTF-8 bytes
//! 00101 AAA  number text  same, numeric-flagged
//! 00110 AAA  array        A+1 count-prefix bytes (BE), then that many values
//! 00111 AAA  object       same, then that many (string key, value) pairs
//! ```
//!
//! A double header is followed by 8 bytes of little-endian IEEE-754, so
//! encoded documents are byte-exact across hosts. Unlike the text encoding,
//! nothing is elided here: undefined entries encode as `0x07`, which makes
//! the binary round-trip total over the value space.
//!
//! Both ends are incremental with the same chunk protocol as their text
//! counterparts: [`BinaryParser::write`] consumes input chunk by chunk,
//! [`BinarySerializer::read`] produces output chunk by chunk.

use std::collections::HashMap;

use crate::custom::CustomValue;
use crate::key::{Key, KeyValue};
use crate::value::{Payload, Value, ValueType};

const MAJOR_MASK: u8 = 0xF8;
const SIZE_MASK: u8 = 0x07;

const SIMPLE: u8 = 0x00;
const SIMPLE_NULL: u8 = 0x00;
const SIMPLE_TRUE: u8 = 0x01;
const SIMPLE_FALSE: u8 = 0x02;
const SIMPLE_DOUBLE: u8 = 0x03;
const SIMPLE_UNDEFINED: u8 = 0x07;

const POS_INT: u8 = 0x10;
const NEG_INT: u8 = 0x18;
const STRING: u8 = 0x20;
const NUMBER: u8 = 0x28;
const ARRAY: u8 = 0x30;
const OBJECT: u8 = 0x38;

/// Minimum big-endian byte count representing `n`, at least one.
fn magnitude_bytes(n: u64) -> usize {
    std::cmp::max(1, (64 - n.leading_zeros() as usize).div_ceil(8))
}

/// Big-endian integer being accumulated byte by byte.
struct Prefix {
    remaining: u8,
    value: u64,
}

impl Prefix {
    fn new(bytes: u8) -> Self {
        Prefix {
            remaining: bytes,
            value: 0,
        }
    }

    /// Consumes up to `remaining` bytes; true once the integer is complete.
    fn feed(&mut self, chunk: &[u8], pos: &mut usize) -> bool {
        while self.remaining > 0 && *pos < chunk.len() {
            self.value = (self.value << 8) | u64::from(chunk[*pos]);
            *pos += 1;
            self.remaining -= 1;
        }
        self.remaining == 0
    }
}

enum Frame {
    /// Expecting a header byte.
    Detect,
    IntVal { negative: bool, magnitude: Prefix },
    DoubleVal { filled: u8, bytes: [u8; 8] },
    Text { numeric: bool, len: Prefix, data: Vec<u8> },
    Seq { count: Prefix, items: Vec<Value> },
    Map {
        count: Prefix,
        reading_key: bool,
        key: Key,
        items: Vec<KeyValue>,
    },
}

enum Step {
    More,
    Push(Frame),
    Complete(Value),
    Fail,
}

/// Incremental parser for the binary TLV encoding.
///
/// Same protocol as the text [`Parser`](crate::Parser): feed chunks with
/// [`write`](BinaryParser::write) until it returns false, then check
/// [`is_error`](BinaryParser::is_error) and take
/// [`get_result`](BinaryParser::get_result). The preprocessor hook sees
/// every decoded value in depth-first order, keys included.
pub struct BinaryParser<F = fn(Value) -> Value> {
    preproc: F,
    stack: Vec<Frame>,
    result: Value,
    error: bool,
    unprocessed: usize,
}

impl BinaryParser {
    /// A parser with the identity preprocessor.
    #[must_use]
    pub fn new() -> Self {
        BinaryParser::with_preprocessor(std::convert::identity::<Value> as fn(Value) -> Value)
    }
}

impl Default for BinaryParser {
    fn default() -> Self {
        BinaryParser::new()
    }
}

impl<F: FnMut(Value) -> Value> BinaryParser<F> {
    pub fn with_preprocessor(preproc: F) -> Self {
        BinaryParser {
            preproc,
            stack: vec![Frame::Detect],
            result: Value::undefined(),
            error: false,
            unprocessed: 0,
        }
    }

    /// Feeds the next chunk. Returns true while more input is required.
    pub fn write(&mut self, chunk: &[u8]) -> bool {
        let mut pos = 0;
        while pos < chunk.len() {
            if !self.cycle(chunk, &mut pos) {
                self.unprocessed = chunk.len() - pos;
                return false;
            }
        }
        self.unprocessed = 0;
        !self.stack.is_empty()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// The decoded value; undefined on error or while decoding is pending.
    #[must_use]
    pub fn get_result(&self) -> Value {
        if self.error {
            Value::undefined()
        } else {
            self.result.clone()
        }
    }

    /// Length of the unconsumed tail of the most recent chunk.
    #[must_use]
    pub fn unprocessed_len(&self) -> usize {
        self.unprocessed
    }

    fn cycle(&mut self, chunk: &[u8], pos: &mut usize) -> bool {
        let Some(top) = self.stack.last_mut() else {
            return false;
        };
        match step(top, chunk, pos) {
            Step::More => true,
            Step::Push(frame) => {
                self.stack.push(frame);
                true
            }
            Step::Complete(v) => {
                // simple values complete straight out of the header frame,
                // so the hook applies here rather than on unwind
                let was_detect = matches!(self.stack.pop(), Some(Frame::Detect));
                let v = if was_detect { (self.preproc)(v) } else { v };
                self.bubble(v)
            }
            Step::Fail => {
                self.error = true;
                false
            }
        }
    }

    fn bubble(&mut self, mut value: Value) -> bool {
        loop {
            match self.stack.last_mut() {
                None => {
                    self.result = value;
                    return false;
                }
                Some(Frame::Detect) => {
                    self.stack.pop();
                    value = (self.preproc)(value);
                }
                Some(Frame::Seq { count, items }) => {
                    items.push(value);
                    if items.len() == count.value as usize {
                        let done = Value::from(std::mem::take(items));
                        self.stack.pop();
                        value = done;
                        continue;
                    }
                    return true;
                }
                Some(Frame::Map {
                    count,
                    reading_key,
                    key,
                    items,
                }) => {
                    if *reading_key {
                        if value.value_type() != ValueType::String {
                            self.error = true;
                            return false;
                        }
                        *key = Key::from(value);
                        *reading_key = false;
                        return true;
                    }
                    items.push(KeyValue {
                        key: std::mem::take(key),
                        value,
                    });
                    *reading_key = true;
                    if items.len() == count.value as usize {
                        let done = Value::from(std::mem::take(items));
                        self.stack.pop();
                        value = done;
                        continue;
                    }
                    return true;
                }
                Some(_) => {
                    // scalar frames never have children
                    self.error = true;
                    return false;
                }
            }
        }
    }
}

fn step(frame: &mut Frame, chunk: &[u8], pos: &mut usize) -> Step {
    match frame {
        Frame::Detect => {
            if *pos >= chunk.len() {
                return Step::More;
            }
            let header = chunk[*pos];
            *pos += 1;
            let arg = header & SIZE_MASK;
            match header & MAJOR_MASK {
                SIMPLE => match arg {
                    SIMPLE_NULL => Step::Complete(Value::null()),
                    SIMPLE_TRUE => Step::Complete(Value::from(true)),
                    SIMPLE_FALSE => Step::Complete(Value::from(false)),
                    SIMPLE_DOUBLE => Step::Push(Frame::DoubleVal {
                        filled: 0,
                        bytes: [0; 8],
                    }),
                    SIMPLE_UNDEFINED => Step::Complete(Value::undefined()),
                    _ => Step::Fail,
                },
                POS_INT => Step::Push(Frame::IntVal {
                    negative: false,
                    magnitude: Prefix::new(arg + 1),
                }),
                NEG_INT => Step::Push(Frame::IntVal {
                    negative: true,
                    magnitude: Prefix::new(arg + 1),
                }),
                STRING => Step::Push(Frame::Text {
                    numeric: false,
                    len: Prefix::new(arg + 1),
                    data: Vec::new(),
                }),
                NUMBER => Step::Push(Frame::Text {
                    numeric: true,
                    len: Prefix::new(arg + 1),
                    data: Vec::new(),
                }),
                ARRAY => Step::Push(Frame::Seq {
                    count: Prefix::new(arg + 1),
                    items: Vec::new(),
                }),
                OBJECT => Step::Push(Frame::Map {
                    count: Prefix::new(arg + 1),
                    reading_key: true,
                    key: Key::default(),
                    items: Vec::new(),
                }),
                _ => Step::Fail,
            }
        }
        Frame::IntVal {
            negative,
            magnitude,
        } => {
            if !magnitude.feed(chunk, pos) {
                return Step::More;
            }
            if *negative {
                if magnitude.value > 1u64 << 63 {
                    return Step::Fail;
                }
                Step::Complete(Value::from((magnitude.value as i64).wrapping_neg()))
            } else {
                Step::Complete(Value::from(magnitude.value))
            }
        }
        Frame::DoubleVal { filled, bytes } => {
            while *pos < chunk.len() && (*filled as usize) < bytes.len() {
                bytes[*filled as usize] = chunk[*pos];
                *pos += 1;
                *filled += 1;
            }
            if (*filled as usize) < bytes.len() {
                return Step::More;
            }
            Step::Complete(Value::from(f64::from_le_bytes(*bytes)))
        }
        Frame::Text { numeric, len, data } => {
            if !len.feed(chunk, pos) {
                return Step::More;
            }
            let total = len.value as usize;
            let missing = total - data.len();
            let take = missing.min(chunk.len() - *pos);
            data.extend_from_slice(&chunk[*pos..*pos + take]);
            *pos += take;
            if data.len() < total {
                return Step::More;
            }
            match std::str::from_utf8(data) {
                Ok(s) if *numeric => Step::Complete(Value::number_str(s)),
                Ok(s) => Step::Complete(Value::from(s)),
                Err(_) => Step::Fail,
            }
        }
        Frame::Seq { count, items } => {
            if !count.feed(chunk, pos) {
                return Step::More;
            }
            if items.len() < count.value as usize {
                Step::Push(Frame::Detect)
            } else {
                // only reachable for a zero count; filled sequences
                // complete as their last element bubbles up
                Step::Complete(Value::from(std::mem::take(items)))
            }
        }
        Frame::Map { count, items, .. } => {
            if !count.feed(chunk, pos) {
                return Step::More;
            }
            if items.len() < count.value as usize {
                Step::Push(Frame::Detect)
            } else {
                Step::Complete(Value::from(std::mem::take(items)))
            }
        }
    }
}

/// Incremental serializer producing the binary TLV encoding.
///
/// Same protocol as the text [`Serializer`](crate::Serializer): call
/// [`read`](BinarySerializer::read) until it returns an empty chunk.
pub struct BinarySerializer {
    out: Vec<u8>,
    stack: Vec<SerFrame>,
    projections: HashMap<usize, Value>,
}

enum SerFrame {
    Pending(Value),
    ArrayCursor { owner: Value, at: usize },
    ObjectCursor { owner: Value, at: usize },
}

impl BinarySerializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        BinarySerializer {
            out: Vec::new(),
            stack: vec![SerFrame::Pending(value)],
            projections: HashMap::new(),
        }
    }

    /// Produces the next chunk of encoded bytes; empty means done. The
    /// chunk borrows the serializer's buffer and is overwritten by the
    /// next call.
    pub fn read(&mut self) -> &[u8] {
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
                SerFrame::Pending(v) => {
                    self.render_value(&v);
                    return;
                }
                SerFrame::ArrayCursor { owner, at } => {
                    let items = owner.as_array();
                    if at >= items.len() {
                        continue;
                    }
                    let v = items[at].clone();
                    self.stack.push(SerFrame::ArrayCursor {
                        owner,
                        at: at + 1,
                    });
                    self.render_value(&v);
                    return;
                }
                SerFrame::ObjectCursor { owner, at } => {
                    let entries = owner.keys();
                    if at >= entries.len() {
                        continue;
                    }
                    let kv = entries[at].clone();
                    self.stack.push(SerFrame::ObjectCursor {
                        owner,
                        at: at + 1,
                    });
                    self.render_text(STRING, kv.key.as_str());
                    self.render_value(&kv.value);
                    return;
                }
            }
        }
    }

    fn render_value(&mut self, v: &Value) {
        match v.payload() {
            Payload::Undefined => self.out.push(SIMPLE | SIMPLE_UNDEFINED),
            Payload::Null => self.out.push(SIMPLE | SIMPLE_NULL),
            Payload::Bool(true) => self.out.push(SIMPLE | SIMPLE_TRUE),
            Payload::Bool(false) => self.out.push(SIMPLE | SIMPLE_FALSE),
            Payload::Int(n) => {
                if n < 0 {
                    self.render_int(NEG_INT, n.unsigned_abs());
                } else {
                    self.render_int(POS_INT, n as u64);
                }
            }
            Payload::UInt(n) => self.render_int(POS_INT, n),
            Payload::Double(n) => {
                self.out.push(SIMPLE | SIMPLE_DOUBLE);
                self.out.extend_from_slice(&n.to_le_bytes());
            }
            Payload::Text(s) => {
                let major = if v.value_type() == ValueType::Number {
                    NUMBER
                } else {
                    STRING
                };
                self.render_text(major, s);
            }
            Payload::Array(items) => {
                self.render_int(ARRAY, items.len() as u64);
                if !items.is_empty() {
                    self.stack.push(SerFrame::ArrayCursor {
                        owner: v.clone(),
                        at: 0,
                    });
                }
            }
            Payload::Object(entries) => {
                self.render_int(OBJECT, entries.len() as u64);
                if !entries.is_empty() {
                    self.stack.push(SerFrame::ObjectCursor {
                        owner: v.clone(),
                        at: 0,
                    });
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

    /// Header plus minimal big-endian magnitude; also used for the count
    /// and length prefixes of containers and strings.
    fn render_int(&mut self, major: u8, magnitude: u64) {
        let count = magnitude_bytes(magnitude);
        self.out.push(major | (count as u8 - 1));
        self.out
            .extend_from_slice(&magnitude.to_be_bytes()[8 - count..]);
    }

    fn render_text(&mut self, major: u8, s: &str) {
        self.render_int(major, s.len() as u64);
        self.out.extend_from_slice(s.as_bytes());
    }
}
