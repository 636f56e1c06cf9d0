use std::fmt;

use incjson::{json, stringify, CustomValue, Serializer, Value, ValueType};

#[test]
fn document_renders_sorted_and_elided() {
    let data = json!({
        "m1": 42,
        "abcdefgewwqeq": [1, 12.3, 43.212, (1.2342312e10), (0.0), (f64::MIN_POSITIVE)],
        "missing": null,
        "not here": undefined,
        "subobject": {
            "abc": (-123),
            "num": (Value::number_str("123.321000000000001"))
        },
        "bool1": true,
        "bool2": false,
        "inf1": (f64::INFINITY),
        "inf2": (f64::NEG_INFINITY),
        "nan": (f64::NAN)
    });

    let expected = concat!(
        "{\"abcdefgewwqeq\":[1,12.3,43.212,1.2342312e+10,0,2.225073858507e-308],",
        "\"bool1\":true,\"bool2\":false,",
        "\"inf1\":\"\u{221e}\",\"inf2\":\"-\u{221e}\",",
        "\"m1\":42,\"missing\":null,\"nan\":null,",
        "\"subobject\":{\"abc\":-123,\"num\":123.321000000000001}}"
    );
    assert_eq!(stringify(&data), expected);
}

#[test]
fn undefined_entries_vanish_without_separators() {
    let v = json!({"a": 1, "b": undefined, "c": 3});
    assert_eq!(stringify(&v), r#"{"a":1,"c":3}"#);

    let v = json!([1, undefined, 3]);
    assert_eq!(stringify(&v), "[1,3]");
    let v = json!([undefined, 1]);
    assert_eq!(stringify(&v), "[1]");
    let v = json!([1, undefined]);
    assert_eq!(stringify(&v), "[1]");
}

#[test]
fn infinities_quote_and_nan_nulls() {
    let v = json!({"p": (f64::INFINITY), "n": (f64::NEG_INFINITY), "q": (f64::NAN)});
    assert_eq!(
        stringify(&v),
        "{\"n\":\"-\u{221e}\",\"p\":\"\u{221e}\",\"q\":null}"
    );
}

#[test]
fn keys_are_escaped_like_strings() {
    let v = json!({"ta\tb": 1});
    assert_eq!(stringify(&v), r#"{"ta\tb":1}"#);
}

#[test]
fn escape_round_trip() {
    let original = "quote\" slash\\ nl\n cr\r tab\t bs\u{8} ff\u{c} ctl\u{1}";
    let rendered = stringify(&Value::from(original));
    let back = incjson::parse(&rendered).unwrap();
    assert_eq!(back.get_string(), original);
}

#[derive(Debug)]
struct Point {
    x: i64,
    y: i64,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl CustomValue for Point {
    fn value_type(&self) -> ValueType {
        ValueType::Object
    }
    fn to_json(&self) -> Value {
        json!({"x": (self.x), "y": (self.y)})
    }
}

#[test]
fn custom_values_render_their_projection() {
    let point = Value::custom(Point { x: 1, y: 2 });
    // the same custom value twice: projected once, rendered twice
    let doc = json!([(point.clone()), (point)]);
    assert_eq!(stringify(&doc), r#"[{"x":1,"y":2},{"x":1,"y":2}]"#);
}

#[test]
fn read_yields_bounded_chunks() {
    let v = json!({"a": [1, [2, [3]]], "b": "x"});
    let mut ser = Serializer::new(v.clone());
    let mut seen = Vec::new();
    loop {
        let chunk = ser.read().to_string();
        if chunk.is_empty() {
            break;
        }
        seen.push(chunk);
    }
    assert!(seen.len() > 2);
    assert_eq!(seen.concat(), stringify(&v));
}
