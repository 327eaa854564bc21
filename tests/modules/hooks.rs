use pretty_assertions::assert_eq;
use tagbson::{
    bson, doc, from_slice, impl_getter_setter, to_vec, Bson, Document, Error, ErrorKind, Getter,
    Raw, Record, Setter,
};

/// Stored on the wire as plain degrees; the struct keeps tenths.
#[derive(Default, Debug, PartialEq, Clone)]
struct Celsius {
    tenths: i64,
}

impl Getter for Celsius {
    fn get_bson(&self) -> tagbson::Result<Bson> {
        Ok(Bson::Double(self.tenths as f64 / 10.0))
    }
}

impl Setter for Celsius {
    fn set_bson(&mut self, raw: Raw) -> tagbson::Result<()> {
        let mut degrees = 0.0f64;
        raw.decode_into(&mut degrees)?;
        self.tenths = (degrees * 10.0).round() as i64;
        Ok(())
    }
}

impl_getter_setter!(Celsius);

#[derive(Record, Default, Debug, PartialEq)]
struct Reading {
    name: String,
    temperature: Celsius,
}

#[test]
fn hooks_control_the_wire_representation() {
    let reading = Reading {
        name: "office".to_owned(),
        temperature: Celsius { tenths: 215 },
    };

    let bytes = to_vec(&reading).unwrap();
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    assert_eq!(doc.get_f64("temperature"), Ok(21.5));

    let mut decoded = Reading::default();
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, reading);
}

#[test]
fn setter_fields_are_not_reset() {
    // Counts every delivery; decoding must not zero it between calls.
    #[derive(Default, Debug, PartialEq)]
    struct Deliveries {
        seen: Vec<i32>,
    }

    impl Getter for Deliveries {
        fn get_bson(&self) -> tagbson::Result<Bson> {
            Ok(Bson::Array(
                self.seen.iter().map(|&n| Bson::Int32(n)).collect(),
            ))
        }
    }

    impl Setter for Deliveries {
        fn set_bson(&mut self, raw: Raw) -> tagbson::Result<()> {
            let mut n = 0i32;
            raw.decode_into(&mut n)?;
            self.seen.push(n);
            Ok(())
        }
    }

    impl_getter_setter!(Deliveries);

    #[derive(Record, Default, Debug)]
    struct Inbox {
        messages: Deliveries,
    }

    let mut inbox = Inbox::default();
    from_slice(&to_vec(&doc! { "messages": 1 }).unwrap(), &mut inbox).unwrap();
    from_slice(&to_vec(&doc! { "messages": 2 }).unwrap(), &mut inbox).unwrap();
    assert_eq!(inbox.messages.seen, [1, 2]);
}

#[test]
fn setter_type_mismatch_skips_the_element() {
    let mut reading = Reading {
        name: "hall".to_owned(),
        temperature: Celsius { tenths: 50 },
    };

    // The string cannot become a double; the Setter reports a mismatch and
    // the element is dropped while the rest of the document still applies.
    let bytes = to_vec(&doc! { "name": "updated", "temperature": "warm" }).unwrap();
    from_slice(&bytes, &mut reading).unwrap();
    assert_eq!(reading.name, "updated");
    assert_eq!(reading.temperature, Celsius { tenths: 50 });
}

#[test]
fn setter_failures_abort_the_decode() {
    #[derive(Default, Debug)]
    struct Strict;

    impl Getter for Strict {
        fn get_bson(&self) -> tagbson::Result<Bson> {
            Ok(Bson::Null)
        }
    }

    impl Setter for Strict {
        fn set_bson(&mut self, _raw: Raw) -> tagbson::Result<()> {
            Err(Error::from(ErrorKind::Truncated {
                message: "refused".to_owned(),
            }))
        }
    }

    impl_getter_setter!(Strict);

    #[derive(Record, Default, Debug)]
    struct Holder {
        value: Strict,
    }

    let bytes = to_vec(&doc! { "value": 1 }).unwrap();
    let err = from_slice(&bytes, &mut Holder::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Truncated { .. }));
    assert_eq!(err.key.as_deref(), Some("value"));
}

#[test]
fn getter_values_replace_the_root() {
    struct Wrapper {
        inner: i32,
    }

    impl Getter for Wrapper {
        fn get_bson(&self) -> tagbson::Result<Bson> {
            Ok(bson!({ "inner": (self.inner) }))
        }
    }

    impl Setter for Wrapper {
        fn set_bson(&mut self, raw: Raw) -> tagbson::Result<()> {
            let mut doc = Document::new();
            raw.decode_into(&mut doc)?;
            self.inner = doc.get_i32("inner").unwrap_or_default();
            Ok(())
        }
    }

    impl_getter_setter!(Wrapper);

    let bytes = to_vec(&Wrapper { inner: 3 }).unwrap();
    assert_eq!(bytes, to_vec(&doc! { "inner": 3 }).unwrap());

    let mut decoded = Wrapper { inner: 0 };
    from_slice(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded.inner, 3);
}

#[test]
fn getter_producing_a_scalar_is_an_unsupported_root() {
    struct Scalar;

    impl Getter for Scalar {
        fn get_bson(&self) -> tagbson::Result<Bson> {
            Ok(Bson::Int32(5))
        }
    }

    impl Setter for Scalar {
        fn set_bson(&mut self, _raw: Raw) -> tagbson::Result<()> {
            Ok(())
        }
    }

    impl_getter_setter!(Scalar);

    let err = to_vec(&Scalar).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnsupportedRoot { .. }));
}
