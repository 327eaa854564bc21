// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>
// Copyright (c) The tagbson developers

// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Encoding of values into BSON documents.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::{
    bson::{Array, Binary, Bson, JavaScript, MongoTimestamp, Raw, RegEx},
    document::Document,
    error::{ErrorKind, Result},
    oid::ObjectId,
    record::{NestedFields, Record},
    schema::Schema,
    spec::BinarySubtype,
};

const INITIAL_BUFFER_SIZE: usize = 64;

/// A value that can be encoded into a BSON element.
///
/// Implementations exist for the primitive types, strings, byte and value
/// sequences, string-keyed maps, the BSON carrier types, and every type with
/// `#[derive(Record)]`. Custom types hook in through
/// [`Getter`](crate::Getter) and [`impl_getter_setter!`](crate::impl_getter_setter).
pub trait Encode {
    /// Converts the value into the BSON value it is written as.
    fn to_bson(&self) -> Result<Bson>;

    /// Whether this value is its type's empty value, for `omitempty`.
    fn is_empty(&self) -> bool {
        false
    }

    #[doc(hidden)]
    fn nested_fields() -> Option<NestedFields>
    where
        Self: Sized,
    {
        None
    }

    #[doc(hidden)]
    fn as_record(&self) -> Option<&dyn Record> {
        None
    }

    // Byte sequences serialize as binary data rather than arrays; the
    // element type of a sequence reports itself through this channel.
    #[doc(hidden)]
    const IS_BYTE: bool = false;

    #[doc(hidden)]
    fn to_byte(&self) -> u8 {
        0
    }
}

/// Encodes a value as a BSON document.
///
/// The root must encode as a document: a map, an ordered [`Document`], or a
/// record. Anything else fails with
/// [`UnsupportedRoot`](crate::ErrorKind::UnsupportedRoot).
///
/// ```
/// let doc = tagbson::doc! { "hello": "world" };
/// let bytes = tagbson::to_vec(&doc).unwrap();
/// assert_eq!(bytes.len(), 22);
/// ```
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    match value.to_bson()? {
        Bson::Document(doc) => {
            let mut buf = Vec::with_capacity(INITIAL_BUFFER_SIZE);
            write_document(&mut buf, &doc)?;
            Ok(buf)
        }
        other => Err(ErrorKind::UnsupportedRoot {
            kind: other.element_type(),
        }
        .into()),
    }
}

// Documents and code-with-scope payloads both start with a total length
// that is only known once their body has been written. The encoder leaves
// a four-byte hole, writes the body in place, and fills the hole in
// afterwards; the length covers the hole itself and, for documents, the
// closing NUL.
fn reserve_length(buf: &mut Vec<u8>) -> usize {
    let hole = buf.len();
    buf.resize(hole + 4, 0);
    hole
}

fn fill_length(buf: &mut Vec<u8>, hole: usize) {
    let total = (buf.len() - hole) as i32;
    buf[hole..hole + 4].copy_from_slice(&total.to_le_bytes());
}

pub(crate) fn write_document(buf: &mut Vec<u8>, doc: &Document) -> Result<()> {
    let hole = reserve_length(buf);
    for (key, value) in doc.iter() {
        write_element(buf, key, value)?;
    }
    buf.push(0);
    fill_length(buf, hole);
    Ok(())
}

pub(crate) fn write_element(buf: &mut Vec<u8>, key: &str, value: &Bson) -> Result<()> {
    buf.push(value.element_type() as u8);
    write_cstring(buf, key)?;
    write_payload(buf, value)
}

fn write_payload(buf: &mut Vec<u8>, value: &Bson) -> Result<()> {
    match value {
        Bson::Double(v) => buf.extend(v.to_le_bytes()),
        Bson::String(s) | Bson::Symbol(s) => write_string(buf, s),
        Bson::Document(doc) => write_document(buf, doc)?,
        Bson::Array(array) => {
            // An array is a document keyed by decimal indices.
            let hole = reserve_length(buf);
            for (index, item) in array.iter().enumerate() {
                write_element(buf, &index.to_string(), item)?;
            }
            buf.push(0);
            fill_length(buf, hole);
        }
        Bson::Binary(binary) => {
            buf.extend((binary.bytes.len() as i32).to_le_bytes());
            buf.push(binary.subtype.into());
            buf.extend(&binary.bytes);
        }
        Bson::Undefined | Bson::Null | Bson::MaxKey | Bson::MinKey => {}
        Bson::ObjectId(id) => buf.extend(id.bytes()),
        Bson::Boolean(v) => buf.push(*v as u8),
        Bson::DateTime(dt) => buf.extend(dt.timestamp_millis().to_le_bytes()),
        Bson::RegularExpression(regex) => {
            write_cstring(buf, &regex.pattern)?;
            write_cstring(buf, &regex.options)?;
        }
        Bson::JavaScriptCode(js) => match &js.scope {
            None => write_string(buf, &js.code),
            Some(scope) => {
                // Unlike a document, the 0x0F payload has no terminator of
                // its own; its length runs to the end of the scope.
                let hole = reserve_length(buf);
                write_string(buf, &js.code);
                write_document(buf, scope)?;
                fill_length(buf, hole);
            }
        },
        Bson::Int32(v) => buf.extend(v.to_le_bytes()),
        Bson::MongoTimestamp(ts) => buf.extend(ts.0.to_le_bytes()),
        Bson::Int64(v) => buf.extend(v.to_le_bytes()),
    }
    Ok(())
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend((s.len() as i32 + 1).to_le_bytes());
    buf.extend(s.as_bytes());
    buf.push(0);
}

fn write_cstring(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    if s.as_bytes().contains(&0) {
        return Err(ErrorKind::InteriorNul.into());
    }
    buf.extend(s.as_bytes());
    buf.push(0);
    Ok(())
}

/// Encodes a record through its cached field plan.
#[doc(hidden)]
pub fn record_to_bson(record: &dyn Record, schema: &Schema) -> Result<Bson> {
    let mut doc = Document::new();
    'fields: for plan in &schema.fields {
        let mut target: &dyn Record = record;
        for &slot in &plan.path[..plan.path.len() - 1] {
            // An unallocated optional indirection has no fields to emit.
            match target.inline_field(slot) {
                Some(inner) => target = inner,
                None => continue 'fields,
            }
        }
        let slot = *plan.path.last().expect("field paths are never empty");

        if plan.omit_empty && target.field_is_empty(slot) {
            continue;
        }
        let mut value = target
            .encode_field(slot)
            .map_err(|e| e.with_key(plan.key.as_str()))?;
        if plan.min_size {
            if let Bson::Int64(wide) = value {
                if let Ok(narrow) = i32::try_from(wide) {
                    value = Bson::Int32(narrow);
                }
            }
        }
        doc.insert(plan.key.clone(), value);
    }
    Ok(Bson::Document(doc))
}

impl Encode for bool {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::Boolean(*self))
    }

    fn is_empty(&self) -> bool {
        !*self
    }
}

macro_rules! encode_int32 {
    ($($ty:ty)*) => {$(
        impl Encode for $ty {
            fn to_bson(&self) -> Result<Bson> {
                Ok(Bson::Int32(*self as i32))
            }

            fn is_empty(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

encode_int32!(i8 i16 i32 u16);

impl Encode for i64 {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::Int64(*self))
    }

    fn is_empty(&self) -> bool {
        *self == 0
    }
}

impl Encode for isize {
    fn to_bson(&self) -> Result<Bson> {
        match i32::try_from(*self) {
            Ok(narrow) => Ok(Bson::Int32(narrow)),
            Err(_) => Ok(Bson::Int64(*self as i64)),
        }
    }

    fn is_empty(&self) -> bool {
        *self == 0
    }
}

impl Encode for u32 {
    fn to_bson(&self) -> Result<Bson> {
        match i32::try_from(*self) {
            Ok(narrow) => Ok(Bson::Int32(narrow)),
            Err(_) => Ok(Bson::Int64(*self as i64)),
        }
    }

    fn is_empty(&self) -> bool {
        *self == 0
    }
}

macro_rules! encode_uint64 {
    ($($ty:ty)*) => {$(
        impl Encode for $ty {
            fn to_bson(&self) -> Result<Bson> {
                match i64::try_from(*self) {
                    Ok(wide) => Ok(Bson::Int64(wide)),
                    Err(_) => Err(ErrorKind::IntegerOverflow {
                        value: *self as u64,
                    }
                    .into()),
                }
            }

            fn is_empty(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

encode_uint64!(u64 usize);

impl Encode for u8 {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::Int32(*self as i32))
    }

    fn is_empty(&self) -> bool {
        *self == 0
    }

    const IS_BYTE: bool = true;

    fn to_byte(&self) -> u8 {
        *self
    }
}

impl Encode for f32 {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::Double(*self as f64))
    }

    fn is_empty(&self) -> bool {
        *self == 0.0
    }
}

impl Encode for f64 {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::Double(*self))
    }

    fn is_empty(&self) -> bool {
        *self == 0.0
    }
}

impl Encode for String {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::String(self.clone()))
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

impl Encode for &str {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::String((*self).to_owned()))
    }

    fn is_empty(&self) -> bool {
        (*self).is_empty()
    }
}

fn sequence_to_bson<T: Encode>(items: &[T]) -> Result<Bson> {
    if T::IS_BYTE {
        let bytes = items.iter().map(Encode::to_byte).collect();
        return Ok(Bson::Binary(Binary::generic(bytes)));
    }
    let mut array = Array::with_capacity(items.len());
    for item in items {
        array.push(item.to_bson()?);
    }
    Ok(Bson::Array(array))
}

impl<T: Encode> Encode for Vec<T> {
    fn to_bson(&self) -> Result<Bson> {
        sequence_to_bson(self)
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn to_bson(&self) -> Result<Bson> {
        sequence_to_bson(self)
    }

    fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<T: Encode> Encode for HashMap<String, T> {
    fn to_bson(&self) -> Result<Bson> {
        let mut doc = Document::new();
        for (key, value) in self {
            doc.insert(key.clone(), value.to_bson()?);
        }
        Ok(Bson::Document(doc))
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn to_bson(&self) -> Result<Bson> {
        let mut doc = Document::new();
        for (key, value) in self {
            doc.insert(key.clone(), value.to_bson()?);
        }
        Ok(Bson::Document(doc))
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn to_bson(&self) -> Result<Bson> {
        match self {
            Some(value) => value.to_bson(),
            None => Ok(Bson::Null),
        }
    }

    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn nested_fields() -> Option<NestedFields> {
        T::nested_fields()
    }

    fn as_record(&self) -> Option<&dyn Record> {
        self.as_ref().and_then(Encode::as_record)
    }
}

impl<T: Encode> Encode for Box<T> {
    fn to_bson(&self) -> Result<Bson> {
        (**self).to_bson()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn nested_fields() -> Option<NestedFields> {
        T::nested_fields()
    }

    fn as_record(&self) -> Option<&dyn Record> {
        (**self).as_record()
    }
}

impl Encode for Document {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::Document(self.clone()))
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

impl Encode for Bson {
    fn to_bson(&self) -> Result<Bson> {
        Ok(self.clone())
    }

    fn is_empty(&self) -> bool {
        match self {
            Bson::Null => true,
            Bson::Boolean(v) => !*v,
            Bson::Double(v) => *v == 0.0,
            Bson::Int32(v) => *v == 0,
            Bson::Int64(v) => *v == 0,
            Bson::String(s) | Bson::Symbol(s) => s.is_empty(),
            Bson::Array(array) => array.is_empty(),
            Bson::Document(doc) => doc.is_empty(),
            _ => false,
        }
    }
}

impl Encode for ObjectId {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::ObjectId(*self))
    }
}

impl Encode for DateTime<Utc> {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::DateTime(*self))
    }
}

impl Encode for Binary {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::Binary(self.clone()))
    }

    fn is_empty(&self) -> bool {
        self.subtype == BinarySubtype::Generic && self.bytes.is_empty()
    }
}

impl Encode for RegEx {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::RegularExpression(self.clone()))
    }

    fn is_empty(&self) -> bool {
        self.pattern.is_empty() && self.options.is_empty()
    }
}

impl Encode for JavaScript {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::JavaScriptCode(self.clone()))
    }

    fn is_empty(&self) -> bool {
        self.code.is_empty() && self.scope.is_none()
    }
}

impl Encode for MongoTimestamp {
    fn to_bson(&self) -> Result<Bson> {
        Ok(Bson::MongoTimestamp(*self))
    }

    fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Encode for Raw {
    fn to_bson(&self) -> Result<Bson> {
        let kind = crate::spec::ElementType::from_u8(self.kind)
            .ok_or(ErrorKind::InvalidKind { kind: self.kind })?;
        crate::decoder::RawElement::new(kind, &self.data).to_bson()
    }

    fn is_empty(&self) -> bool {
        self.kind == 0 && self.data.is_empty()
    }
}
