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

//! The closed set of BSON values and their carrier types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    document::Document,
    oid::ObjectId,
    spec::{BinarySubtype, ElementType},
};

/// A BSON array.
pub type Array = Vec<Bson>;

/// An unordered string-keyed mapping of BSON values.
///
/// Emission order of an `M` is unspecified; use [`Document`] when element
/// order matters.
pub type M = HashMap<String, Bson>;

/// A BSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Bson {
    /// 64-bit floating point number (kind 0x01).
    Double(f64),
    /// UTF-8 string (kind 0x02).
    String(String),
    /// Embedded document (kind 0x03).
    Document(Document),
    /// Array (kind 0x04).
    Array(Array),
    /// Binary data with a subtype (kind 0x05).
    Binary(Binary),
    /// The deprecated undefined value (kind 0x06).
    Undefined,
    /// 12-byte object id (kind 0x07).
    ObjectId(ObjectId),
    /// Boolean (kind 0x08).
    Boolean(bool),
    /// UTC datetime with millisecond precision (kind 0x09).
    DateTime(DateTime<Utc>),
    /// Null (kind 0x0A).
    Null,
    /// Regular expression (kind 0x0B).
    RegularExpression(RegEx),
    /// JavaScript code, with or without a scope (kinds 0x0D and 0x0F).
    JavaScriptCode(JavaScript),
    /// 32-bit integer (kind 0x10).
    Int32(i32),
    /// MongoDB's internal timestamp type (kind 0x11).
    MongoTimestamp(MongoTimestamp),
    /// 64-bit integer (kind 0x12).
    Int64(i64),
    /// Symbol (kind 0x0E).
    Symbol(String),
    /// Compares above all other values (kind 0x7F).
    MaxKey,
    /// Compares below all other values (kind 0xFF).
    MinKey,
}

impl Bson {
    /// The element kind this value is written as.
    pub fn element_type(&self) -> ElementType {
        match self {
            Bson::Double(..) => ElementType::Double,
            Bson::String(..) => ElementType::String,
            Bson::Document(..) => ElementType::EmbeddedDocument,
            Bson::Array(..) => ElementType::Array,
            Bson::Binary(..) => ElementType::Binary,
            Bson::Undefined => ElementType::Undefined,
            Bson::ObjectId(..) => ElementType::ObjectId,
            Bson::Boolean(..) => ElementType::Boolean,
            Bson::DateTime(..) => ElementType::DateTime,
            Bson::Null => ElementType::Null,
            Bson::RegularExpression(..) => ElementType::RegularExpression,
            Bson::JavaScriptCode(js) => {
                if js.scope.is_some() {
                    ElementType::JavaScriptCodeWithScope
                } else {
                    ElementType::JavaScriptCode
                }
            }
            Bson::Int32(..) => ElementType::Int32,
            Bson::MongoTimestamp(..) => ElementType::Timestamp,
            Bson::Int64(..) => ElementType::Int64,
            Bson::Symbol(..) => ElementType::Symbol,
            Bson::MaxKey => ElementType::MaxKey,
            Bson::MinKey => ElementType::MinKey,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Bson::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Bson::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Bson::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Bson::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Bson::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Bson::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Bson::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Bson::ObjectId(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Bson::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl Default for Bson {
    fn default() -> Self {
        Bson::Null
    }
}

/// Binary data paired with its subtype.
///
/// Plain `Vec<u8>` values encode as subtype 0x00; this carrier is for data
/// that must keep another subtype through a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Binary {
    pub subtype: BinarySubtype,
    pub bytes: Vec<u8>,
}

impl Binary {
    /// Wraps bytes with the generic subtype 0x00.
    pub fn generic(bytes: Vec<u8>) -> Self {
        Binary {
            subtype: BinarySubtype::Generic,
            bytes,
        }
    }
}

/// A regular expression pattern plus its option letters.
///
/// The options are individual characters controlling how the pattern is
/// applied and should be sorted; they are not validated before being written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegEx {
    pub pattern: String,
    pub options: String,
}

/// JavaScript code, optionally with a scope mapping identifiers to values
/// usable while evaluating the code.
///
/// Without a scope the value is written as kind 0x0D, with one as kind 0x0F.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JavaScript {
    pub code: String,
    pub scope: Option<Document>,
}

/// MongoDB's internal timestamp type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MongoTimestamp(pub i64);

/// One raw, unparsed element: its kind byte and its payload bytes.
///
/// A `Raw` postpones decoding; it stores an element verbatim and can decode
/// it later with [`Raw::decode_into`]. [`Setter`](crate::Setter)
/// implementations receive the pending element in this form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Raw {
    pub kind: u8,
    pub data: Vec<u8>,
}

impl Raw {
    /// Decodes the stored element into `out`.
    ///
    /// Returns a [`TypeMismatch`](crate::ErrorKind::TypeMismatch) error when
    /// the stored kind is not compatible with the target type.
    pub fn decode_into<T: crate::Decode>(&self, out: &mut T) -> crate::error::Result<()> {
        crate::decoder::raw_into(self, out)
    }
}

/// The current time, truncated to millisecond precision.
///
/// BSON stores datetimes with millisecond precision, so a value obtained
/// here survives an encode/decode round trip unchanged. `Utc::now` works
/// fine otherwise.
pub fn now() -> DateTime<Utc> {
    let millis = Utc::now().timestamp_millis();
    DateTime::from_timestamp_millis(millis).expect("current time is representable")
}

impl From<f32> for Bson {
    fn from(v: f32) -> Bson {
        Bson::Double(v as f64)
    }
}

impl From<f64> for Bson {
    fn from(v: f64) -> Bson {
        Bson::Double(v)
    }
}

impl From<i8> for Bson {
    fn from(v: i8) -> Bson {
        Bson::Int32(v as i32)
    }
}

impl From<i16> for Bson {
    fn from(v: i16) -> Bson {
        Bson::Int32(v as i32)
    }
}

impl From<i32> for Bson {
    fn from(v: i32) -> Bson {
        Bson::Int32(v)
    }
}

impl From<i64> for Bson {
    fn from(v: i64) -> Bson {
        Bson::Int64(v)
    }
}

impl From<u16> for Bson {
    fn from(v: u16) -> Bson {
        Bson::Int32(v as i32)
    }
}

impl From<u32> for Bson {
    fn from(v: u32) -> Bson {
        match i32::try_from(v) {
            Ok(n) => Bson::Int32(n),
            Err(_) => Bson::Int64(v as i64),
        }
    }
}

impl From<bool> for Bson {
    fn from(v: bool) -> Bson {
        Bson::Boolean(v)
    }
}

impl From<&str> for Bson {
    fn from(v: &str) -> Bson {
        Bson::String(v.to_owned())
    }
}

impl From<String> for Bson {
    fn from(v: String) -> Bson {
        Bson::String(v)
    }
}

impl From<Array> for Bson {
    fn from(v: Array) -> Bson {
        Bson::Array(v)
    }
}

impl From<Document> for Bson {
    fn from(v: Document) -> Bson {
        Bson::Document(v)
    }
}

impl From<ObjectId> for Bson {
    fn from(v: ObjectId) -> Bson {
        Bson::ObjectId(v)
    }
}

impl From<DateTime<Utc>> for Bson {
    fn from(v: DateTime<Utc>) -> Bson {
        Bson::DateTime(v)
    }
}

impl From<Binary> for Bson {
    fn from(v: Binary) -> Bson {
        Bson::Binary(v)
    }
}

impl From<RegEx> for Bson {
    fn from(v: RegEx) -> Bson {
        Bson::RegularExpression(v)
    }
}

impl From<JavaScript> for Bson {
    fn from(v: JavaScript) -> Bson {
        Bson::JavaScriptCode(v)
    }
}

impl From<MongoTimestamp> for Bson {
    fn from(v: MongoTimestamp) -> Bson {
        Bson::MongoTimestamp(v)
    }
}

impl<T: Into<Bson>> From<Option<T>> for Bson {
    fn from(v: Option<T>) -> Bson {
        match v {
            Some(v) => v.into(),
            None => Bson::Null,
        }
    }
}
