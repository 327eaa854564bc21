use chrono::{TimeZone, Utc};
use tagbson::{doc, from_slice, to_vec, Document, ObjectId};

#[test]
fn known_hex_vector() {
    let id = ObjectId::from_hex("4d88e15b60f486e428412dc9").unwrap();
    assert_eq!(
        id.timestamp(),
        Utc.with_ymd_and_hms(2011, 3, 22, 2, 36, 43).unwrap()
    );
    assert_eq!(id.to_hex(), "4d88e15b60f486e428412dc9");
}

#[test]
fn generated_ids_are_unique_and_monotonic() {
    let first = ObjectId::new();
    let second = ObjectId::new();
    assert_ne!(first, second);

    assert_eq!(first.machine(), second.machine());
    assert_eq!(first.pid(), second.pid());
    // Counter advances by one per id, modulo 2^24.
    assert_eq!((second.counter() + 0x100_0000 - first.counter()) & 0xFF_FFFF, 1);
}

#[test]
fn ids_survive_a_document_round_trip() {
    let id = ObjectId::from_hex("ffffffff0011224455999999").unwrap();
    let bytes = to_vec(&doc! { "_id": (id) }).unwrap();

    let mut decoded = Document::new();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded.get_object_id("_id"), Ok(&id));
}

#[cfg(feature = "serde")]
#[test]
fn json_form_is_the_quoted_hex_string() {
    let id = ObjectId::from_hex("4d88e15b60f486e428412dc9").unwrap();

    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"4d88e15b60f486e428412dc9\"");
    assert_eq!(json.len(), 26);

    let back: ObjectId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);

    assert!(serde_json::from_str::<ObjectId>("\"zz\"").is_err());
}
