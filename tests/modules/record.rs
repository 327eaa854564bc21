use std::collections::HashMap;

use pretty_assertions::assert_eq;
use tagbson::{
    doc, from_slice, to_vec, Binary, Bson, Document, ErrorKind, MongoTimestamp, ObjectId, Record,
};

#[derive(Record, Default, Debug, PartialEq)]
struct Tagged {
    a: bool,
    #[bson("myb")]
    b: i32,
    #[bson("myc,omitempty")]
    c: String,
    #[bson(",minsize")]
    e: i64,
}

#[test]
fn tags_rename_omit_and_narrow() {
    let value = Tagged {
        a: true,
        b: 3,
        c: String::new(),
        e: 5,
    };

    let bytes = to_vec(&value).unwrap();
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();

    let keys: Vec<_> = doc.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["a", "myb", "e"]);
    assert_eq!(doc.get("a"), Some(&Bson::Boolean(true)));
    assert_eq!(doc.get("myb"), Some(&Bson::Int32(3)));
    // minsize narrowed the i64 down to an int32 element.
    assert_eq!(doc.get("e"), Some(&Bson::Int32(5)));
}

#[test]
fn minsize_keeps_large_values_wide() {
    let value = Tagged {
        e: i64::MAX,
        ..Tagged::default()
    };
    let bytes = to_vec(&value).unwrap();
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    assert_eq!(doc.get("e"), Some(&Bson::Int64(i64::MAX)));

    let mut decoded = Tagged::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded.e, i64::MAX);
}

#[derive(Record, Default, Debug, PartialEq, Clone)]
struct Everything {
    flag: bool,
    count: i32,
    total: i64,
    ratio: f64,
    name: String,
    #[bson("ids")]
    ids: Vec<i32>,
    blob: Vec<u8>,
    labels: HashMap<String, String>,
    nickname: Option<String>,
    nested: Nested,
    id: ObjectId,
    stamp: MongoTimestamp,
    at: chrono::DateTime<chrono::Utc>,
    payload: Binary,
}

#[derive(Record, Default, Debug, PartialEq, Clone)]
struct Nested {
    x: i32,
    y: String,
}

fn everything() -> Everything {
    Everything {
        flag: true,
        count: -7,
        total: 1 << 40,
        ratio: 2.5,
        name: "name".to_owned(),
        ids: vec![3, 2, 1],
        blob: vec![0, 1, 254, 255],
        labels: {
            let mut labels = HashMap::new();
            labels.insert("color".to_owned(), "green".to_owned());
            labels
        },
        nickname: Some("nick".to_owned()),
        nested: Nested {
            x: 9,
            y: "deep".to_owned(),
        },
        id: ObjectId::from_hex("4d88e15b60f486e428412dc9").unwrap(),
        stamp: MongoTimestamp(229999444),
        at: chrono::DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
        payload: Binary {
            subtype: tagbson::spec::BinarySubtype::UserDefined(0x80),
            bytes: vec![1, 2, 3],
        },
    }
}

#[test]
fn records_round_trip() {
    let value = everything();
    let bytes = to_vec(&value).unwrap();

    let mut decoded = Everything::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn byte_fields_encode_as_binary() {
    let bytes = to_vec(&everything()).unwrap();
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();

    match doc.get("blob") {
        Some(Bson::Binary(binary)) => assert_eq!(binary.bytes, [0, 1, 254, 255]),
        other => panic!("unexpected value: {other:?}"),
    }
    // A non-byte sequence stays an array.
    assert!(matches!(doc.get("ids"), Some(Bson::Array(_))));
}

#[test]
fn unknown_keys_are_ignored() {
    let bytes = to_vec(&doc! {
        "myb": 3,
        "extra": { "anything": [1, 2, 3] },
        "a": true,
    })
    .unwrap();

    let mut decoded = Tagged::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(
        decoded,
        Tagged {
            a: true,
            b: 3,
            ..Tagged::default()
        }
    );
}

#[test]
fn incompatible_elements_leave_fields_untouched() {
    #[derive(Record, Default, Debug, PartialEq)]
    struct Narrow {
        n: i32,
        f: f64,
    }

    let bytes = to_vec(&doc! { "n": (1i64 << 40), "f": 1.5 }).unwrap();
    let mut decoded = Narrow::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, Narrow { n: 0, f: 1.5 });

    let bytes = to_vec(&doc! { "n": 3.7 }).unwrap();
    let mut decoded = Narrow::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded.n, 0);

    let bytes = to_vec(&doc! { "n": 3.0 }).unwrap();
    let mut decoded = Narrow::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded.n, 3);
}

#[test]
fn decoding_resets_fields_first() {
    let mut decoded = everything();
    let bytes = to_vec(&doc! { "count": 1 }).unwrap();
    from_slice(&bytes, &mut decoded).unwrap();

    let mut expected = Everything::default();
    expected.count = 1;
    assert_eq!(decoded, expected);
}

#[derive(Record, Default, Debug, PartialEq)]
struct OmitEverything {
    #[bson(",omitempty")]
    s: String,
    #[bson(",omitempty")]
    n: i64,
    #[bson(",omitempty")]
    f: f64,
    #[bson(",omitempty")]
    b: bool,
    #[bson(",omitempty")]
    seq: Vec<i32>,
    #[bson(",omitempty")]
    map: HashMap<String, i32>,
    #[bson(",omitempty")]
    opt: Option<i32>,
    #[bson(",omitempty")]
    nested: Nested,
}

#[test]
fn omitempty_drops_empty_values_but_not_records() {
    let bytes = to_vec(&OmitEverything::default()).unwrap();
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();

    // Everything empty is gone, except the zero-valued record.
    let keys: Vec<_> = doc.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["nested"]);
    assert_eq!(doc.get_document("nested").unwrap().get_i32("x"), Ok(0));
}

#[test]
fn omitempty_keeps_populated_values() {
    let value = OmitEverything {
        s: "s".to_owned(),
        n: 1,
        f: 0.5,
        b: true,
        seq: vec![1],
        map: {
            let mut map = HashMap::new();
            map.insert("k".to_owned(), 1);
            map
        },
        opt: Some(0),
        nested: Nested::default(),
    };
    let bytes = to_vec(&value).unwrap();
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    assert_eq!(doc.len(), 8);

    let mut decoded = OmitEverything::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, value);
}

#[derive(Record, Default, Debug, PartialEq)]
struct Excluded {
    kept: i32,
    #[bson("-")]
    hidden: i32,
}

#[test]
fn dash_excludes_a_field_in_both_directions() {
    let value = Excluded { kept: 1, hidden: 2 };
    let bytes = to_vec(&value).unwrap();

    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    let keys: Vec<_> = doc.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["kept"]);

    let bytes = to_vec(&doc! { "kept": 5, "hidden": 6 }).unwrap();
    let mut decoded = Excluded::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, Excluded { kept: 5, hidden: 0 });
}

#[derive(Record, Default, Debug, PartialEq)]
struct Outer {
    #[bson("_id")]
    id: i32,
    #[bson(",inline")]
    base: Base,
    extra: String,
}

#[derive(Record, Default, Debug, PartialEq)]
struct Base {
    created: i64,
    #[bson("by")]
    author: String,
}

#[test]
fn inline_promotes_nested_fields() {
    let value = Outer {
        id: 4,
        base: Base {
            created: 100,
            author: "gopher".to_owned(),
        },
        extra: "tail".to_owned(),
    };

    let bytes = to_vec(&value).unwrap();
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    let keys: Vec<_> = doc.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["_id", "created", "by", "extra"]);

    let mut decoded = Outer::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn inline_through_an_optional_allocates_lazily() {
    #[derive(Record, Default, Debug, PartialEq)]
    struct OptionalInline {
        n: i32,
        #[bson(",inline")]
        base: Option<Base>,
    }

    // Unallocated: the inlined fields are simply absent.
    let bytes = to_vec(&OptionalInline { n: 1, base: None }).unwrap();
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    let keys: Vec<_> = doc.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["n"]);

    // No inlined element arrives: the indirection stays unallocated.
    let mut decoded = OptionalInline::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, OptionalInline { n: 1, base: None });

    // An inlined element arrives: the indirection is created to hold it.
    let bytes = to_vec(&doc! { "n": 2, "by": "gopher" }).unwrap();
    let mut decoded = OptionalInline::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(
        decoded,
        OptionalInline {
            n: 2,
            base: Some(Base {
                created: 0,
                author: "gopher".to_owned(),
            }),
        }
    );
}

#[test]
fn inline_key_collisions_are_rejected() {
    #[derive(Record, Default, Debug)]
    struct Colliding {
        created: i32,
        #[bson(",inline")]
        base: Base,
    }

    let err = to_vec(&Colliding::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey { ref key, .. } if key == "created"));
}

#[test]
fn inline_on_a_non_record_is_rejected() {
    #[derive(Record, Default, Debug)]
    struct BadInline {
        #[bson(",inline")]
        n: i32,
    }

    let err = to_vec(&BadInline::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InlineNonRecord { field: "n", .. }));
}

#[test]
fn inline_cycles_are_rejected() {
    #[derive(Record, Default, Debug)]
    struct CycleA {
        #[bson(",inline")]
        b: Box<CycleB>,
    }

    #[derive(Record, Default, Debug)]
    struct CycleB {
        #[bson(",inline")]
        a: Option<Box<CycleA>>,
        n: i32,
    }

    let err = to_vec(&CycleA::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InlineCycle { .. }));
}

#[test]
fn unknown_flags_are_rejected_at_first_use() {
    #[derive(Record, Default, Debug)]
    struct BadFlag {
        #[bson("key,frobnicate")]
        n: i32,
    }

    let err = to_vec(&BadFlag::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownFlag { ref flag, .. } if flag == "frobnicate"));
}

#[test]
fn legacy_tags_are_rejected_with_a_migration_hint() {
    #[derive(Record, Default, Debug)]
    struct Legacy {
        #[bson("old/c")]
        n: i32,
    }

    let err = to_vec(&Legacy::default()).unwrap_err();
    match err.kind {
        ErrorKind::LegacyTag {
            ref tag,
            ref replacement,
            ..
        } => {
            assert_eq!(tag, "old/c");
            assert_eq!(replacement, "old,omitempty");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn duplicate_keys_are_rejected_at_first_use() {
    #[derive(Record, Default, Debug)]
    struct Duplicated {
        #[bson("same")]
        a: i32,
        #[bson("same")]
        b: i32,
    }

    let err = to_vec(&Duplicated::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey { ref key, .. } if key == "same"));
}

#[test]
fn optional_records_allocate_lazily() {
    #[derive(Record, Default, Debug, PartialEq)]
    struct Holder {
        inner: Option<Nested>,
    }

    let bytes = to_vec(&doc! {}).unwrap();
    let mut decoded = Holder {
        inner: Some(Nested::default()),
    };
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded.inner, None);

    let bytes = to_vec(&doc! { "inner": { "x": 3, "y": "v" } }).unwrap();
    let mut decoded = Holder::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(
        decoded.inner,
        Some(Nested {
            x: 3,
            y: "v".to_owned()
        })
    );

    let bytes = to_vec(&doc! { "inner": (Bson::Null) }).unwrap();
    let mut decoded = Holder {
        inner: Some(Nested::default()),
    };
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded.inner, None);
}

#[test]
fn vectors_of_records_round_trip() {
    #[derive(Record, Default, Debug, PartialEq)]
    struct Wrapper {
        items: Vec<Nested>,
    }

    let value = Wrapper {
        items: vec![
            Nested {
                x: 1,
                y: "one".to_owned(),
            },
            Nested {
                x: 2,
                y: "two".to_owned(),
            },
        ],
    };

    let bytes = to_vec(&value).unwrap();
    let mut decoded = Wrapper::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn plans_are_stable_across_uses() {
    let first = to_vec(&everything()).unwrap();
    let second = to_vec(&everything()).unwrap();
    assert_eq!(first, second);
}
