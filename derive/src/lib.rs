extern crate proc_macro;

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `tagbson::Record` for a struct with named fields, together with
/// the `Encode` and `Decode` implementations that route the struct through
/// its cached field plan.
///
/// Fields are tagged with `#[bson("[key][,flag...]")]`; the tag string is
/// interpreted when the type is first encoded or decoded, so schema problems
/// (unknown flags, duplicated keys, inline misuse) surface as errors there
/// rather than at compile time.
#[proc_macro_derive(Record, attributes(bson))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(parse_macro_input!(input as DeriveInput))
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
