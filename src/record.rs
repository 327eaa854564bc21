//! The introspection surface behind `#[derive(Record)]`, and the user hooks.

use std::any::TypeId;

use crate::{bson::Bson, bson::Raw, decoder::RawElement, error::Result};

/// A value implementing `Getter` has [`get_bson`](Getter::get_bson) called
/// when it is encoded, and the returned value is marshalled in place of the
/// actual object. A returned error stops encoding.
///
/// Wire the hook into the encoder with
/// [`impl_getter_setter!`](crate::impl_getter_setter).
pub trait Getter {
    fn get_bson(&self) -> Result<Bson>;
}

/// A value implementing `Setter` receives each pending element through
/// [`set_bson`](Setter::set_bson) while decoding, and is otherwise left
/// alone: the decoder does not reset it first, which lets the value carry
/// state across decodes.
///
/// Returning a [`TypeMismatch`](crate::ErrorKind::TypeMismatch) error (see
/// [`Error::type_mismatch`](crate::Error::type_mismatch)) drops the element
/// when the value sits inside a document or array and decoding continues;
/// any other error aborts the decode.
///
/// Wire the hook into the decoder with
/// [`impl_getter_setter!`](crate::impl_getter_setter).
pub trait Setter {
    fn set_bson(&mut self, raw: Raw) -> Result<()>;
}

/// Implements [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for a
/// type in terms of its [`Getter`] and [`Setter`] implementations.
///
/// ```
/// use tagbson::{Bson, Getter, Raw, Setter};
///
/// #[derive(Default)]
/// struct Reversed(String);
///
/// impl Getter for Reversed {
///     fn get_bson(&self) -> tagbson::Result<Bson> {
///         Ok(Bson::String(self.0.chars().rev().collect()))
///     }
/// }
///
/// impl Setter for Reversed {
///     fn set_bson(&mut self, raw: Raw) -> tagbson::Result<()> {
///         let mut s = String::new();
///         raw.decode_into(&mut s)?;
///         self.0 = s.chars().rev().collect();
///         Ok(())
///     }
/// }
///
/// tagbson::impl_getter_setter!(Reversed);
/// ```
#[macro_export]
macro_rules! impl_getter_setter {
    ($ty:ty) => {
        impl $crate::Encode for $ty {
            fn to_bson(&self) -> $crate::Result<$crate::Bson> {
                $crate::Getter::get_bson(self)
            }
        }

        impl $crate::Decode for $ty {
            fn reset(&mut self) {
                // Setter values keep their state between decodes.
            }

            fn decode_value(&mut self, elem: $crate::RawElement<'_>) -> $crate::Result<bool> {
                match $crate::Setter::set_bson(self, elem.to_raw()) {
                    ::std::result::Result::Ok(()) => ::std::result::Result::Ok(true),
                    ::std::result::Result::Err(e) if e.is_type_mismatch() => {
                        ::std::result::Result::Ok(false)
                    }
                    ::std::result::Result::Err(e) => ::std::result::Result::Err(e),
                }
            }
        }
    };
}

/// One declared field of a record: its Rust name and its raw tag string.
///
/// Produced by `#[derive(Record)]`; the tag is parsed and validated by the
/// schema planner the first time the record type is used.
pub struct FieldDef {
    /// The Rust field name, used as the document key (lowercased) when the
    /// tag does not name one.
    pub name: &'static str,

    /// The raw contents of the field's `#[bson("...")]` attribute, or `""`.
    pub tag: &'static str,

    /// Present when the field's type is itself a record; lets the planner
    /// recurse through `inline` fields without an instance.
    pub nested: Option<NestedFields>,
}

/// Plan-time handle on a record-typed field's own field table.
pub struct NestedFields {
    pub fields: fn() -> &'static [FieldDef],
    pub type_id: fn() -> TypeId,
    pub type_name: &'static str,
}

impl NestedFields {
    pub fn of<T: Record>(type_name: &'static str) -> Self {
        NestedFields {
            fields: T::fields,
            type_id: TypeId::of::<T>,
            type_name,
        }
    }
}

/// Field-level access to a record type, implemented by `#[derive(Record)]`.
///
/// The derive exposes the declared fields and dispatches on field slots; all
/// interpretation of tags lives in the cached schema, so an invalid tag
/// surfaces as an error on the first encode or decode of the type.
pub trait Record: 'static {
    /// The declared fields, in declaration order.
    fn fields() -> &'static [FieldDef]
    where
        Self: Sized;

    /// Encodes the field at `slot` into a BSON value.
    fn encode_field(&self, slot: usize) -> Result<Bson>;

    /// Whether the field at `slot` holds its type's empty value.
    fn field_is_empty(&self, slot: usize) -> bool;

    /// Decodes one element into the field at `slot`. Returns `Ok(false)`
    /// when the element's kind cannot be coerced into the field, in which
    /// case the field is left untouched.
    fn decode_field(&mut self, slot: usize, elem: RawElement<'_>) -> Result<bool>;

    /// Resets every field to its empty value. Called once at the start of
    /// decoding a document into this record.
    fn reset_fields(&mut self);

    /// Borrows the field at `slot` as a record, for inline traversal.
    fn inline_field(&self, slot: usize) -> Option<&dyn Record>;

    /// Mutably borrows the field at `slot` as a record, for inline
    /// traversal.
    fn inline_field_mut(&mut self, slot: usize) -> Option<&mut dyn Record>;
}
