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

//! BSON, short for Binary JSON, is a binary-encoded serialization of
//! JSON-like documents. Like JSON, BSON supports the embedding of documents
//! and arrays within other documents and arrays, and it adds types JSON does
//! not have, such as datetimes, binary data, and object ids.
//!
//! ```text
//! // JSON equivalent
//! {"hello": "world"}
//!
//! // BSON encoding
//! \x16\x00\x00\x00                   // total document size
//! \x02                               // 0x02 = type String
//! hello\x00                          // field name
//! \x06\x00\x00\x00world\x00          // field value
//! \x00                               // 0x00 = type EOO ('end of object')
//! ```
//!
//! For more information about the format itself, see
//! [bsonspec.org](http://bsonspec.org).
//!
//! ## Documents and values
//!
//! Untyped data is handled with [`Bson`] values inside either an ordered
//! [`Document`] or an unordered map ([`M`]), built directly or with the
//! [`doc!`] and [`bson!`] macros:
//!
//! ```
//! use tagbson::{doc, from_slice, to_vec, Document};
//!
//! let doc = doc! {
//!     "hello": "world",
//!     "int": 5,
//!     "subdoc": { "cat": true },
//! };
//!
//! let bytes = to_vec(&doc).unwrap();
//!
//! let mut decoded = Document::new();
//! from_slice(&bytes, &mut decoded).unwrap();
//! assert_eq!(decoded, doc);
//! ```
//!
//! A [`Document`] preserves element order through encoding and decoding; an
//! [`M`] does not, and its emission order is unspecified.
//!
//! ## Records
//!
//! Typed data goes through `#[derive(Record)]`. Each exported field maps to
//! a document key: the key named in the field's `#[bson("...")]` tag, or
//! the lowercased field name when the tag names none. A tag may also carry
//! flags:
//!
//! - `omitempty`: skip the field when it holds its type's empty value
//!   (zero numbers, empty strings, sequences and maps, `None`). Records
//!   themselves are never skipped.
//! - `minsize`: store an `i64` as an int32 when the value fits.
//! - `inline`: splice a record-typed field's fields into the enclosing
//!   document.
//! - A tag of just `"-"` excludes the field entirely.
//!
//! ```
//! use tagbson::{from_slice, to_vec, Record};
//!
//! #[derive(Record, Default, Debug, PartialEq)]
//! struct Account {
//!     #[bson("_id")]
//!     id: String,
//!     name: String,
//!     #[bson(",omitempty")]
//!     email: String,
//!     #[bson("visits,minsize")]
//!     visits: i64,
//! }
//!
//! let account = Account {
//!     id: "a1".to_owned(),
//!     name: "Ada".to_owned(),
//!     email: String::new(),
//!     visits: 3,
//! };
//!
//! let bytes = to_vec(&account).unwrap();
//! let mut decoded = Account::default();
//! from_slice(&bytes, &mut decoded).unwrap();
//! assert_eq!(decoded, account);
//! ```
//!
//! Decoding tolerates schema drift in both directions: unknown document keys
//! are ignored, and elements whose values cannot be converted into the
//! target field (see [`Decode`]) are skipped, leaving the field at its empty
//! value.
//!
//! ## Custom conversions
//!
//! Types that need full control implement [`Getter`] and/or [`Setter`] and
//! are wired into the engine with [`impl_getter_setter!`].

extern crate self as tagbson;

pub use self::{
    bson::{now, Array, Binary, Bson, JavaScript, MongoTimestamp, Raw, RegEx, M},
    decoder::{from_slice, Decode, RawElement},
    document::{Document, ValueAccessError, ValueAccessResult},
    encoder::{to_vec, Encode},
    error::{Error, ErrorKind, Result},
    oid::ObjectId,
    record::{Getter, Record, Setter},
};

/// Derives [`Record`](crate::record::Record) (together with [`Encode`] and
/// [`Decode`]) for a struct with named fields.
#[cfg(feature = "derive")]
pub use tagbson_derive::Record;

mod bson;
pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
#[doc(hidden)]
pub mod export;
#[macro_use]
mod macros;
pub mod oid;
pub mod record;
#[doc(hidden)]
pub mod schema;
pub mod spec;
