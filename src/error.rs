use thiserror::Error;

use crate::spec::ElementType;

pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while encoding, decoding, or planning.
#[derive(Debug, Error)]
#[non_exhaustive]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,

    /// The document key associated with the error, if any.
    pub key: Option<String>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(key) = self.key.as_deref() {
            write!(f, "error at key \"{key}\": ")?;
        }
        write!(f, "{}", self.kind)
    }
}

/// The types of errors that can occur in this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The value handed to [`to_vec`](crate::to_vec) does not encode as a
    /// document. Only maps, ordered documents, and records can form the root
    /// of a BSON document.
    #[error("root value encodes as {kind:?}, not as a document")]
    UnsupportedRoot { kind: ElementType },

    /// The input ended before the advertised end of a document or payload.
    #[error("truncated document: {message}")]
    Truncated { message: String },

    /// The byte before a document's declared end was not 0x00.
    #[error("document is not terminated by 0x00")]
    BadTerminator,

    /// An element carried a tag byte outside the supported set.
    #[error("unrecognized element kind 0x{kind:02x}")]
    InvalidKind { kind: u8 },

    /// A BSON value could not be decoded into the requested type.
    ///
    /// Besides being produced by the decoder, this kind is the signal a
    /// [`Setter`](crate::Setter) returns to have an element skipped when it
    /// appears inside a document or array.
    #[error("BSON kind 0x{kind:02x} is not compatible with type {target}")]
    TypeMismatch { kind: u8, target: &'static str },

    /// A string on the wire was not valid UTF-8.
    #[error("invalid UTF-8 string")]
    Utf8,

    /// A key, regular expression pattern, or option string contained an
    /// interior NUL byte and cannot be written as a cstring.
    #[error("string contains an interior NUL byte")]
    InteriorNul,

    /// An unsigned value exceeds the range of every BSON integer kind.
    #[error("unsigned value {value} does not fit in a BSON integer")]
    IntegerOverflow { value: u64 },

    /// A datetime payload is outside the representable range.
    #[error("datetime of {millis}ms since the epoch is out of range")]
    DatetimeOutOfRange { millis: i64 },

    /// Two fields of a record (possibly through inlining) map to the same
    /// document key.
    #[error("duplicated key \"{key}\" in record {record}")]
    DuplicateKey { key: String, record: &'static str },

    /// A field tag carried a flag other than `omitempty`, `minsize`, or
    /// `inline`.
    #[error("unsupported flag \"{flag}\" in tag \"{tag}\" of record {record}")]
    UnknownFlag {
        flag: String,
        tag: String,
        record: &'static str,
    },

    /// A field tag used the retired slash-separated option syntax.
    #[error("replace tag \"{tag}\" in record {record} by \"{replacement}\"")]
    LegacyTag {
        tag: String,
        replacement: String,
        record: &'static str,
    },

    /// The `inline` flag was applied to a field whose type is not a record.
    #[error("field \"{field}\" of record {record} has the inline flag but is not a record")]
    InlineNonRecord {
        field: &'static str,
        record: &'static str,
    },

    /// A record inlines itself, directly or through other records.
    #[error("inline cycle through record {record}")]
    InlineCycle { record: &'static str },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, key: None }
    }
}

impl Error {
    pub(crate) fn with_key(mut self, key: impl Into<String>) -> Self {
        if self.key.is_none() {
            self.key = Some(key.into());
        }
        self
    }

    pub(crate) fn truncated(message: impl Into<String>) -> Self {
        ErrorKind::Truncated {
            message: message.into(),
        }
        .into()
    }

    /// Builds the incompatibility error for a BSON kind and a target type.
    ///
    /// [`Setter`](crate::Setter) implementations return this to request that
    /// an incompatible element be dropped instead of aborting the decode.
    pub fn type_mismatch(kind: u8, target: &'static str) -> Self {
        ErrorKind::TypeMismatch { kind, target }.into()
    }

    /// Whether this is a [`ErrorKind::TypeMismatch`] error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch { .. })
    }
}
