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

//! Decoding of BSON documents into values.

use std::{
    collections::{BTreeMap, HashMap},
    str,
};

use chrono::{DateTime, Utc};

use crate::{
    bson::{Binary, Bson, JavaScript, MongoTimestamp, Raw, RegEx},
    document::Document,
    error::{Error, ErrorKind, Result},
    oid::ObjectId,
    record::Record,
    schema::Schema,
    spec::{BinarySubtype, ElementType},
};

/// A value that can be populated from a BSON element.
///
/// The target's type does not have to match the BSON kind exactly; the
/// conversions below are applied, and an element whose value cannot be
/// converted is silently skipped, leaving the target untouched:
///
/// - numeric kinds convert whenever at least the integer part of the value
///   survives exactly
/// - booleans convert to numeric types as 1 or 0, and numeric types to
///   booleans as `value != 0`
/// - string, symbol, and binary data convert to strings and byte sequences
///
/// Implementations exist for the same set of types as
/// [`Encode`](crate::Encode). Custom types hook in through
/// [`Setter`](crate::Setter) and [`impl_getter_setter!`](crate::impl_getter_setter).
pub trait Decode {
    /// Decodes one element into `self`. Returns `Ok(false)` when the
    /// element's kind cannot be coerced into this type; the element is
    /// consumed either way.
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool>;

    /// Restores `self` to its empty value.
    fn reset(&mut self);

    #[doc(hidden)]
    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }

    #[doc(hidden)]
    const IS_BYTE: bool = false;

    #[doc(hidden)]
    fn from_byte(_byte: u8) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// Decodes a BSON document into `target`.
///
/// The target is reset before elements are applied; elements whose keys are
/// unknown to the target, or whose values cannot be coerced into it, are
/// skipped. Decoding into a target that cannot accept a document fails with
/// [`TypeMismatch`](crate::ErrorKind::TypeMismatch).
///
/// ```
/// let bytes = tagbson::to_vec(&tagbson::doc! { "i": 1 }).unwrap();
/// let mut doc = tagbson::Document::new();
/// tagbson::from_slice(&bytes, &mut doc).unwrap();
/// assert_eq!(doc.get_i32("i"), Ok(1));
/// ```
pub fn from_slice<T: Decode>(data: &[u8], target: &mut T) -> Result<()> {
    let elem = RawElement::new(ElementType::EmbeddedDocument, data);
    if target.decode_value(elem)? {
        Ok(())
    } else {
        Err(Error::type_mismatch(
            ElementType::EmbeddedDocument as u8,
            std::any::type_name::<T>(),
        ))
    }
}

/// One unparsed element borrowed from a document: its kind and its payload.
#[derive(Debug, Clone, Copy)]
pub struct RawElement<'a> {
    kind: ElementType,
    data: &'a [u8],
}

impl<'a> RawElement<'a> {
    pub(crate) fn new(kind: ElementType, data: &'a [u8]) -> Self {
        RawElement { kind, data }
    }

    /// The element's kind.
    pub fn kind(&self) -> ElementType {
        self.kind
    }

    /// The element's payload bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Copies the element into an owned [`Raw`].
    pub fn to_raw(&self) -> Raw {
        Raw {
            kind: self.kind as u8,
            data: self.data.to_vec(),
        }
    }

    /// Fully decodes the element into its native BSON value.
    pub fn to_bson(&self) -> Result<Bson> {
        Ok(match self.kind {
            ElementType::Double => Bson::Double(f64_from_slice(self.data)?),
            ElementType::String => Bson::String(read_lenencoded(self.data)?.to_owned()),
            ElementType::EmbeddedDocument => Bson::Document(parse_document(self.data)?),
            ElementType::Array => Bson::Array(parse_array(self.data)?),
            ElementType::Binary => {
                let (subtype, bytes) = self.binary_parts()?;
                Bson::Binary(Binary {
                    subtype: BinarySubtype::from(subtype),
                    bytes: bytes.to_vec(),
                })
            }
            ElementType::Undefined => Bson::Undefined,
            ElementType::ObjectId => Bson::ObjectId(ObjectId::from_bytes(self.object_id_bytes()?)),
            ElementType::Boolean => Bson::Boolean(self.byte0()? != 0),
            ElementType::DateTime => {
                let millis = i64_from_slice(self.data)?;
                Bson::DateTime(datetime_from_millis(millis)?)
            }
            ElementType::Null => Bson::Null,
            ElementType::RegularExpression => {
                let pattern = read_cstr(self.data)?;
                let options = read_cstr(&self.data[pattern.len() + 1..])?;
                Bson::RegularExpression(RegEx {
                    pattern: pattern.to_owned(),
                    options: options.to_owned(),
                })
            }
            ElementType::JavaScriptCode => Bson::JavaScriptCode(JavaScript {
                code: read_lenencoded(self.data)?.to_owned(),
                scope: None,
            }),
            ElementType::JavaScriptCodeWithScope => {
                let code = read_lenencoded(
                    self.data
                        .get(4..)
                        .ok_or_else(|| Error::truncated("code with scope too short"))?,
                )?;
                let scope_start = 4 + 4 + code.len() + 1;
                let scope = parse_document(
                    self.data
                        .get(scope_start..)
                        .ok_or_else(|| Error::truncated("code with scope has no scope"))?,
                )?;
                Bson::JavaScriptCode(JavaScript {
                    code: code.to_owned(),
                    scope: Some(scope),
                })
            }
            ElementType::Int32 => Bson::Int32(i32_from_slice(self.data)?),
            ElementType::Timestamp => {
                Bson::MongoTimestamp(MongoTimestamp(i64_from_slice(self.data)?))
            }
            ElementType::Int64 => Bson::Int64(i64_from_slice(self.data)?),
            ElementType::Symbol => Bson::Symbol(read_lenencoded(self.data)?.to_owned()),
            ElementType::MaxKey => Bson::MaxKey,
            ElementType::MinKey => Bson::MinKey,
        })
    }

    /// The element's value as an integer, when at least the integer part
    /// survives exactly.
    fn as_i64(&self) -> Result<Option<i64>> {
        Ok(match self.kind {
            ElementType::Int32 => Some(i32_from_slice(self.data)? as i64),
            ElementType::Int64 | ElementType::Timestamp => Some(i64_from_slice(self.data)?),
            ElementType::Double => {
                let value = f64_from_slice(self.data)?;
                let truncated = value as i64;
                if truncated as f64 == value {
                    Some(truncated)
                } else {
                    None
                }
            }
            ElementType::Boolean => Some((self.byte0()? != 0) as i64),
            _ => None,
        })
    }

    fn as_f64(&self) -> Result<Option<f64>> {
        Ok(match self.kind {
            ElementType::Double => Some(f64_from_slice(self.data)?),
            ElementType::Int32 => Some(i32_from_slice(self.data)? as f64),
            ElementType::Int64 | ElementType::Timestamp => Some(i64_from_slice(self.data)? as f64),
            ElementType::Boolean => Some((self.byte0()? != 0) as i64 as f64),
            _ => None,
        })
    }

    fn as_bool(&self) -> Result<Option<bool>> {
        Ok(match self.kind {
            ElementType::Boolean => Some(self.byte0()? != 0),
            ElementType::Int32 => Some(i32_from_slice(self.data)? != 0),
            ElementType::Int64 | ElementType::Timestamp => Some(i64_from_slice(self.data)? != 0),
            ElementType::Double => Some(f64_from_slice(self.data)? != 0.0),
            _ => None,
        })
    }

    /// The element's content as bytes, for string and byte-sequence targets.
    fn text_bytes(&self) -> Result<Option<&'a [u8]>> {
        Ok(match self.kind {
            ElementType::String | ElementType::Symbol => {
                Some(read_lenencoded(self.data)?.as_bytes())
            }
            ElementType::Binary => Some(self.binary_parts()?.1),
            _ => None,
        })
    }

    // The walker always sizes payloads correctly; these guards exist for
    // hand-built Raw values whose data may not match their kind.
    fn byte0(&self) -> Result<u8> {
        self.data
            .first()
            .copied()
            .ok_or_else(|| Error::truncated("expected 1 byte for a boolean"))
    }

    fn binary_parts(&self) -> Result<(u8, &'a [u8])> {
        if self.data.len() < 5 {
            return Err(Error::truncated("binary payload too short"));
        }
        Ok((self.data[4], &self.data[5..]))
    }

    fn object_id_bytes(&self) -> Result<[u8; 12]> {
        self.data
            .try_into()
            .map_err(|_| Error::truncated("expected 12 bytes for an object id"))
    }
}

fn i32_from_slice(data: &[u8]) -> Result<i32> {
    let bytes: [u8; 4] = data
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| Error::truncated("expected 4 bytes for an int32"))?;
    Ok(i32::from_le_bytes(bytes))
}

fn i64_from_slice(data: &[u8]) -> Result<i64> {
    let bytes: [u8; 8] = data
        .get(..8)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| Error::truncated("expected 8 bytes for an int64"))?;
    Ok(i64::from_le_bytes(bytes))
}

fn f64_from_slice(data: &[u8]) -> Result<f64> {
    let bytes: [u8; 8] = data
        .get(..8)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| Error::truncated("expected 8 bytes for a double"))?;
    Ok(f64::from_le_bytes(bytes))
}

fn read_cstr(data: &[u8]) -> Result<&str> {
    let end = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::truncated("unterminated cstring"))?;
    str::from_utf8(&data[..end]).map_err(|_| ErrorKind::Utf8.into())
}

fn read_lenencoded(data: &[u8]) -> Result<&str> {
    let declared = i32_from_slice(data)?;
    if declared < 1 {
        return Err(Error::truncated(format!(
            "string length {declared} too small"
        )));
    }
    let declared = declared as usize;
    let bytes = data
        .get(4..4 + declared)
        .ok_or_else(|| Error::truncated("string overruns its container"))?;
    if bytes[declared - 1] != 0 {
        return Err(Error::truncated("string is not NUL terminated"));
    }
    str::from_utf8(&bytes[..declared - 1]).map_err(|_| ErrorKind::Utf8.into())
}

fn datetime_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        Error::from(ErrorKind::DatetimeOutOfRange { millis })
    })
}

/// Walks the elements of one document: `int32 length · element* · 0x00`.
pub(crate) struct Elements<'a> {
    body: &'a [u8],
    pos: usize,
}

impl<'a> Elements<'a> {
    pub(crate) fn new(doc: &'a [u8]) -> Result<Self> {
        let declared = i32_from_slice(doc)?;
        if declared < 5 {
            return Err(Error::truncated(format!(
                "document length {declared} too small"
            )));
        }
        let declared = declared as usize;
        if declared > doc.len() {
            return Err(Error::truncated(format!(
                "document length {declared} exceeds the {} available bytes",
                doc.len()
            )));
        }
        if doc[declared - 1] != 0 {
            return Err(ErrorKind::BadTerminator.into());
        }
        Ok(Elements {
            body: &doc[..declared - 1],
            pos: 4,
        })
    }

    pub(crate) fn next(&mut self) -> Result<Option<(&'a str, RawElement<'a>)>> {
        if self.pos >= self.body.len() {
            return Ok(None);
        }
        let tag = self.body[self.pos];
        let kind = ElementType::from_u8(tag).ok_or(ErrorKind::InvalidKind { kind: tag })?;
        self.pos += 1;

        let key = read_cstr(&self.body[self.pos..])?;
        self.pos += key.len() + 1;

        let rest = &self.body[self.pos..];
        let size = payload_size(kind, rest).map_err(|e| e.with_key(key))?;
        let data = rest
            .get(..size)
            .ok_or_else(|| Error::truncated("element payload overruns the document").with_key(key))?;
        self.pos += size;
        Ok(Some((key, RawElement::new(kind, data))))
    }
}

fn payload_size(kind: ElementType, data: &[u8]) -> Result<usize> {
    Ok(match kind {
        ElementType::Double
        | ElementType::Int64
        | ElementType::Timestamp
        | ElementType::DateTime => 8,
        ElementType::Int32 => 4,
        ElementType::Boolean => 1,
        ElementType::Null
        | ElementType::Undefined
        | ElementType::MinKey
        | ElementType::MaxKey => 0,
        ElementType::ObjectId => 12,
        ElementType::String | ElementType::JavaScriptCode | ElementType::Symbol => {
            let len = i32_from_slice(data)?;
            if len < 1 {
                return Err(Error::truncated(format!("string length {len} too small")));
            }
            4 + len as usize
        }
        ElementType::EmbeddedDocument | ElementType::Array => {
            let len = i32_from_slice(data)?;
            if len < 5 {
                return Err(Error::truncated(format!("document length {len} too small")));
            }
            len as usize
        }
        ElementType::Binary => {
            let len = i32_from_slice(data)?;
            if len < 0 {
                return Err(Error::truncated(format!("binary length {len} negative")));
            }
            4 + 1 + len as usize
        }
        ElementType::RegularExpression => {
            let pattern = read_cstr(data)?;
            let options = read_cstr(&data[pattern.len() + 1..])?;
            pattern.len() + 1 + options.len() + 1
        }
        ElementType::JavaScriptCodeWithScope => {
            let len = i32_from_slice(data)?;
            // At minimum: the length itself, an empty string, an empty document.
            if len < 14 {
                return Err(Error::truncated(format!(
                    "code with scope length {len} too small"
                )));
            }
            len as usize
        }
    })
}

pub(crate) fn parse_document(data: &[u8]) -> Result<Document> {
    let mut doc = Document::new();
    let mut elements = Elements::new(data)?;
    while let Some((key, elem)) = elements.next()? {
        let value = elem.to_bson().map_err(|e| e.with_key(key))?;
        doc.insert(key, value);
    }
    Ok(doc)
}

fn parse_array(data: &[u8]) -> Result<Vec<Bson>> {
    let mut array = Vec::new();
    let mut elements = Elements::new(data)?;
    while let Some((_, elem)) = elements.next()? {
        array.push(elem.to_bson()?);
    }
    Ok(array)
}

/// Decodes a document's elements into a record through its cached plan.
///
/// Unknown keys are skipped with their payload. Every field is reset before
/// any element is applied.
#[doc(hidden)]
pub fn decode_record(record: &mut dyn Record, schema: &Schema, doc: &[u8]) -> Result<()> {
    record.reset_fields();
    let mut elements = Elements::new(doc)?;
    while let Some((key, elem)) = elements.next()? {
        let Some(&index) = schema.by_key.get(key) else {
            continue;
        };
        let plan = &schema.fields[index];

        let mut target: &mut dyn Record = record;
        for &slot in &plan.path[..plan.path.len() - 1] {
            target = target
                .inline_field_mut(slot)
                .expect("inline path leads to a record field");
        }
        let slot = *plan.path.last().expect("field paths are never empty");
        target.decode_field(slot, elem).map_err(|e| e.with_key(key))?;
    }
    Ok(())
}

/// [`Decode::decode_value`] for derived records.
#[doc(hidden)]
pub fn decode_record_value(
    record: &mut dyn Record,
    schema: &Schema,
    elem: RawElement<'_>,
) -> Result<bool> {
    if elem.kind() != ElementType::EmbeddedDocument {
        return Ok(false);
    }
    decode_record(record, schema, elem.data())?;
    Ok(true)
}

pub(crate) fn raw_into<T: Decode>(raw: &Raw, out: &mut T) -> Result<()> {
    let kind = ElementType::from_u8(raw.kind).ok_or(ErrorKind::InvalidKind { kind: raw.kind })?;
    let elem = RawElement::new(kind, &raw.data);
    if out.decode_value(elem)? {
        Ok(())
    } else {
        Err(Error::type_mismatch(raw.kind, std::any::type_name::<T>()))
    }
}

impl Decode for bool {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        match elem.as_bool()? {
            Some(value) => {
                *self = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn reset(&mut self) {
        *self = false;
    }
}

macro_rules! decode_int {
    ($($ty:ty)*) => {$(
        impl Decode for $ty {
            fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
                if let Some(wide) = elem.as_i64()? {
                    if let Ok(value) = <$ty>::try_from(wide) {
                        *self = value;
                        return Ok(true);
                    }
                }
                Ok(false)
            }

            fn reset(&mut self) {
                *self = 0;
            }
        }
    )*};
}

decode_int!(i8 i16 i32 i64 isize u16 u32 u64 usize);

impl Decode for u8 {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if let Some(wide) = elem.as_i64()? {
            if let Ok(value) = u8::try_from(wide) {
                *self = value;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn reset(&mut self) {
        *self = 0;
    }

    const IS_BYTE: bool = true;

    fn from_byte(byte: u8) -> Option<Self> {
        Some(byte)
    }
}

impl Decode for f64 {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        match elem.as_f64()? {
            Some(value) => {
                *self = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn reset(&mut self) {
        *self = 0.0;
    }
}

impl Decode for f32 {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        match elem.as_f64()? {
            Some(value) => {
                *self = value as f32;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn reset(&mut self) {
        *self = 0.0;
    }
}

impl Decode for String {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        match elem.kind() {
            ElementType::String | ElementType::Symbol => {
                *self = read_lenencoded(elem.data())?.to_owned();
                Ok(true)
            }
            // Binary payloads convert only when they hold valid UTF-8.
            ElementType::Binary => match str::from_utf8(elem.binary_parts()?.1) {
                Ok(s) => {
                    *self = s.to_owned();
                    Ok(true)
                }
                Err(_) => Ok(false),
            },
            _ => Ok(false),
        }
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if T::IS_BYTE {
            return Ok(match elem.text_bytes()? {
                Some(bytes) => {
                    self.clear();
                    self.extend(bytes.iter().filter_map(|&b| T::from_byte(b)));
                    true
                }
                None => false,
            });
        }
        if elem.kind() != ElementType::Array {
            return Ok(false);
        }
        self.clear();
        let mut elements = Elements::new(elem.data())?;
        while let Some((_, item)) = elements.next()? {
            let mut value = T::default();
            if value.decode_value(item)? {
                self.push(value);
            }
        }
        Ok(true)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if T::IS_BYTE {
            return Ok(match elem.text_bytes()? {
                Some(bytes) => {
                    for slot in self.iter_mut() {
                        slot.reset();
                    }
                    for (slot, byte) in self.iter_mut().zip(bytes) {
                        if let Some(value) = T::from_byte(*byte) {
                            *slot = value;
                        }
                    }
                    true
                }
                None => false,
            });
        }
        if elem.kind() != ElementType::Array {
            return Ok(false);
        }
        for slot in self.iter_mut() {
            slot.reset();
        }
        let mut elements = Elements::new(elem.data())?;
        let mut index = 0;
        while let Some((_, item)) = elements.next()? {
            // Extra elements are consumed and dropped.
            if index < N {
                self[index].decode_value(item)?;
                index += 1;
            }
        }
        Ok(true)
    }

    fn reset(&mut self) {
        for slot in self.iter_mut() {
            slot.reset();
        }
    }
}

fn decode_map_entries<V: Decode + Default>(
    elem: RawElement<'_>,
    mut insert: impl FnMut(String, V),
) -> Result<bool> {
    if elem.kind() != ElementType::EmbeddedDocument {
        return Ok(false);
    }
    let mut elements = Elements::new(elem.data())?;
    while let Some((key, item)) = elements.next()? {
        let mut value = V::default();
        if value.decode_value(item).map_err(|e| e.with_key(key))? {
            insert(key.to_owned(), value);
        }
    }
    Ok(true)
}

impl<V: Decode + Default> Decode for HashMap<String, V> {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        self.clear();
        decode_map_entries(elem, |key, value| {
            self.insert(key, value);
        })
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<V: Decode + Default> Decode for BTreeMap<String, V> {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        self.clear();
        decode_map_entries(elem, |key, value| {
            self.insert(key, value);
        })
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<T: Decode + Default> Decode for Option<T> {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if elem.kind() == ElementType::Null {
            *self = None;
            return Ok(true);
        }
        let mut value = T::default();
        if value.decode_value(elem)? {
            *self = Some(value);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn reset(&mut self) {
        *self = None;
    }

    // Inline traversal allocates the indirection the moment an element
    // addresses a leaf underneath it.
    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        self.get_or_insert_with(T::default).as_record_mut()
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        (**self).decode_value(elem)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        (**self).as_record_mut()
    }
}

impl Decode for Document {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if elem.kind() != ElementType::EmbeddedDocument {
            return Ok(false);
        }
        *self = parse_document(elem.data())?;
        Ok(true)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl Decode for Bson {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        *self = elem.to_bson()?;
        Ok(true)
    }

    fn reset(&mut self) {
        *self = Bson::Null;
    }
}

impl Decode for ObjectId {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if elem.kind() != ElementType::ObjectId {
            return Ok(false);
        }
        *self = ObjectId::from_bytes(elem.object_id_bytes()?);
        Ok(true)
    }

    fn reset(&mut self) {
        *self = ObjectId::default();
    }
}

impl Decode for DateTime<Utc> {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if elem.kind() != ElementType::DateTime {
            return Ok(false);
        }
        *self = datetime_from_millis(i64_from_slice(elem.data())?)?;
        Ok(true)
    }

    fn reset(&mut self) {
        *self = DateTime::UNIX_EPOCH;
    }
}

impl Decode for MongoTimestamp {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        match elem.as_i64()? {
            Some(value) => {
                *self = MongoTimestamp(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn reset(&mut self) {
        *self = MongoTimestamp(0);
    }
}

impl Decode for Binary {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if elem.kind() != ElementType::Binary {
            return Ok(false);
        }
        let (subtype, bytes) = elem.binary_parts()?;
        self.subtype = BinarySubtype::from(subtype);
        self.bytes = bytes.to_vec();
        Ok(true)
    }

    fn reset(&mut self) {
        *self = Binary::default();
    }
}

impl Decode for RegEx {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        if elem.kind() != ElementType::RegularExpression {
            return Ok(false);
        }
        match elem.to_bson()? {
            Bson::RegularExpression(regex) => {
                *self = regex;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn reset(&mut self) {
        *self = RegEx::default();
    }
}

impl Decode for JavaScript {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        match elem.kind() {
            ElementType::JavaScriptCode | ElementType::JavaScriptCodeWithScope => {
                match elem.to_bson()? {
                    Bson::JavaScriptCode(js) => {
                        *self = js;
                        Ok(true)
                    }
                    _ => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    fn reset(&mut self) {
        *self = JavaScript::default();
    }
}

impl Decode for Raw {
    fn decode_value(&mut self, elem: RawElement<'_>) -> Result<bool> {
        *self = elem.to_raw();
        Ok(true)
    }

    fn reset(&mut self) {
        *self = Raw::default();
    }
}
