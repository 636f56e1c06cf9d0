use incjson::{binarize, json, stringify, unbinarize, BinaryParser, BinarySerializer, Value, ValueType};

fn sample() -> Value {
    json!({
        "aaa": [1, 2, 3],
        "m1": 42,
        "abcdefgewwqeq": [1, 12.3, 43.212, (1.2342312e10), (0.0), (f64::MIN_POSITIVE)],
        "missing": null,
        "subobject": {
            "abc": (-123),
            "num": (Value::number_str("123.321000000000001"))
        },
        "bool1": true,
        "bool2": false,
        "inf1": (f64::INFINITY),
        "inf2": (f64::NEG_INFINITY)
    })
}

#[test]
fn round_trip_preserves_document() {
    let data = sample();
    let bytes = binarize(&data);
    let back = unbinarize(&bytes).unwrap();
    assert_eq!(stringify(&back), stringify(&data));
    // re-encoding the decoded value reproduces the bytes exactly
    assert_eq!(binarize(&back), bytes);
}

#[test]
fn round_trip_compares_equal() {
    let v = json!({"aaa": [1, 2, 3], "m1": 42});
    let bytes = binarize(&v);
    let back = unbinarize(&bytes).unwrap();
    assert_eq!(back, v);
    assert_eq!(binarize(&back), bytes);
}

#[test]
fn top_level_undefined_round_trips() {
    let bytes = binarize(&Value::undefined());
    assert_eq!(bytes, [0x07]);
    let back = unbinarize(&bytes).unwrap();
    assert_eq!(back.value_type(), ValueType::Undefined);
}

#[test]
fn nan_round_trips_bitwise() {
    let bytes = binarize(&Value::from(f64::NAN));
    let back = unbinarize(&bytes).unwrap();
    assert!(back.get_f64().is_nan());
    assert_eq!(binarize(&back), bytes);
}

#[test]
fn concrete_layout() {
    let v = json!({"a": [true, null]});
    assert_eq!(
        binarize(&v),
        [
            0x38, 0x01, // object, 1 entry
            0x20, 0x01, b'a', // key "a"
            0x30, 0x02, // array, 2 entries
            0x01, 0x00, // true, null
        ]
    );
}

#[test]
fn chunked_decode_matches_whole_decode() {
    let bytes = binarize(&sample());
    let whole = unbinarize(&bytes).unwrap();
    for split in 0..=bytes.len() {
        let mut p = BinaryParser::new();
        p.write(&bytes[..split]);
        assert!(!p.write(&bytes[split..]), "split at {split}");
        assert!(!p.is_error(), "split at {split}");
        assert_eq!(stringify(&p.get_result()), stringify(&whole), "split at {split}");
    }
}

#[test]
fn chunked_encode_concatenates() {
    let v = sample();
    let mut ser = BinarySerializer::new(v.clone());
    let mut out = Vec::new();
    let mut chunks = 0;
    loop {
        let chunk = ser.read().to_vec();
        if chunk.is_empty() {
            break;
        }
        chunks += 1;
        out.extend_from_slice(&chunk);
    }
    assert!(chunks > 1);
    assert_eq!(out, binarize(&v));
}

#[test]
fn preprocessor_sees_decoded_values() {
    let bytes = binarize(&json!([1, "x", true]));
    let mut count = 0;
    {
        let mut p = BinaryParser::with_preprocessor(|v: Value| {
            count += 1;
            v
        });
        assert!(!p.write(&bytes));
        assert!(!p.is_error());
    }
    // three elements plus the array itself
    assert_eq!(count, 4);
}

#[test]
fn strings_must_be_utf8() {
    // string of length 2 carrying an invalid UTF-8 sequence
    assert!(unbinarize(&[0x20, 0x02, 0xFF, 0xFE]).is_err());
}

#[test]
fn rejects_unknown_headers() {
    // major 01000 is not assigned
    assert!(unbinarize(&[0x40]).is_err());
    // simple with an unassigned argument
    assert!(unbinarize(&[0x05]).is_err());
}
