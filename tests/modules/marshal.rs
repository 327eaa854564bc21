use pretty_assertions::assert_eq;
use tagbson::{
    doc, from_slice, now, to_vec, Binary, Bson, Document, ErrorKind, JavaScript, MongoTimestamp,
    RegEx, M,
};
use tagbson::spec::BinarySubtype;

#[test]
fn hello_world_is_twenty_two_bytes() {
    let expected: &[u8] = &[
        0x16, 0x00, 0x00, 0x00, 0x02, b'h', b'e', b'l', b'l', b'o', 0x00, 0x06, 0x00, 0x00, 0x00,
        b'w', b'o', b'r', b'l', b'd', 0x00, 0x00,
    ];

    let bytes = to_vec(&doc! { "hello": "world" }).unwrap();
    assert_eq!(bytes, expected);

    let mut map = M::new();
    map.insert("hello".to_owned(), Bson::String("world".to_owned()));
    assert_eq!(to_vec(&map).unwrap(), expected);
}

#[test]
fn ordered_documents_emit_in_insertion_order() {
    let bytes = to_vec(&doc! { "b": 1, "a": 2 }).unwrap();
    let expected: &[u8] = &[
        19, 0, 0, 0, 0x10, b'b', 0, 1, 0, 0, 0, 0x10, b'a', 0, 2, 0, 0, 0, 0,
    ];
    assert_eq!(bytes, expected);
}

#[test]
fn length_prefix_counts_the_whole_document() {
    for doc in [
        doc! {},
        doc! { "a": 1 },
        doc! { "nested": { "deep": { "deeper": [1, 2, 3] } } },
    ] {
        let bytes = to_vec(&doc).unwrap();
        let declared = i32::from_le_bytes(bytes[..4].try_into().unwrap());
        assert_eq!(declared as usize, bytes.len());
        assert_eq!(*bytes.last().unwrap(), 0);
    }
}

#[test]
fn every_kind_round_trips_through_a_document() {
    let doc = doc! {
        "double": 1020.123,
        "string": "text",
        "doc": { "a": 1 },
        "array": [1, "two", true],
        "binary": (Binary { subtype: BinarySubtype::Md5, bytes: b"thingies".to_vec() }),
        "undefined": (Bson::Undefined),
        "oid": (tagbson::ObjectId::from_hex("4d88e15b60f486e428412dc9").unwrap()),
        "bool": true,
        "datetime": (now()),
        "null": (Bson::Null),
        "regex": (RegEx { pattern: "s[ao]d".to_owned(), options: "i".to_owned() }),
        "code": (JavaScript { code: "function() {}".to_owned(), scope: None }),
        "scoped": (JavaScript {
            code: "function(x) { return x; }".to_owned(),
            scope: Some(doc! { "x": 1 }),
        }),
        "int32": 23,
        "timestamp": (MongoTimestamp(229999444)),
        "int64": (-55i64),
        "symbol": (Bson::Symbol("sym".to_owned())),
        "max": (Bson::MaxKey),
        "min": (Bson::MinKey),
    };

    let bytes = to_vec(&doc).unwrap();
    let mut decoded = Document::new();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn datetimes_are_truncated_to_milliseconds() {
    let sub_millisecond = chrono::DateTime::from_timestamp(1_500_000_000, 123_456_789).unwrap();
    let bytes = to_vec(&doc! { "at": (sub_millisecond) }).unwrap();

    let mut decoded = Document::new();
    from_slice(&bytes, &mut decoded).unwrap();
    let at = decoded.get("at").unwrap().as_datetime().unwrap();
    assert_eq!(at.timestamp_millis(), sub_millisecond.timestamp_millis());
    assert_eq!(at.timestamp_subsec_millis() * 1_000_000, at.timestamp_subsec_nanos());
}

#[test]
fn unordered_maps_emit_each_key_exactly_once() {
    let mut map = M::new();
    map.insert("a".to_owned(), Bson::Int32(1));
    map.insert("b".to_owned(), Bson::Int32(2));
    map.insert("c".to_owned(), Bson::Int32(3));

    let bytes = to_vec(&map).unwrap();
    let mut decoded = Document::new();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded.to_map(), map);
}

#[test]
fn array_roots_are_unsupported() {
    let err = to_vec(&vec![Bson::Int32(1)]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnsupportedRoot { .. }));
}

#[test]
fn regex_with_interior_nul_is_rejected() {
    let doc = doc! {
        "r": (RegEx { pattern: "a\0b".to_owned(), options: String::new() })
    };
    let err = to_vec(&doc).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InteriorNul));
}
