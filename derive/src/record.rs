use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Error, Fields, FieldsNamed, Ident, LitStr, Result};

pub fn derive(input: DeriveInput) -> Result<TokenStream> {
    match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => derive_struct(&input, fields),
        _ => Err(Error::new(
            Span::call_site(),
            "Record can only be derived for structs with named fields",
        )),
    }
}

/// The raw contents of the field's `#[bson("...")]` attribute, or `""`.
fn tag_of_field(field: &syn::Field) -> Result<String> {
    for attr in &field.attrs {
        if attr.path().is_ident("bson") {
            let lit: LitStr = attr.parse_args().map_err(|_| {
                Error::new_spanned(attr, "expected a string tag: #[bson(\"key,flag\")]")
            })?;
            return Ok(lit.value());
        }
    }
    Ok(String::new())
}

fn derive_struct(input: &DeriveInput, fields: &FieldsNamed) -> Result<TokenStream> {
    if input.generics.lt_token.is_some() || input.generics.where_clause.is_some() {
        return Err(Error::new(
            Span::call_site(),
            "Record cannot be derived for generic structs",
        ));
    }

    let ident = &input.ident;
    let name = ident.to_string();

    let mut slots = Vec::new();
    let mut idents: Vec<&Ident> = Vec::new();
    let mut names = Vec::new();
    let mut tags = Vec::new();
    let mut types = Vec::new();
    for (slot, field) in fields.named.iter().enumerate() {
        let field_ident = field.ident.as_ref().expect("named fields have idents");
        slots.push(slot);
        idents.push(field_ident);
        names.push(field_ident.to_string());
        tags.push(tag_of_field(field)?);
        types.push(&field.ty);
    }

    Ok(quote! {
        #[doc(hidden)]
        #[allow(non_upper_case_globals, unused_qualifications)]
        const _: () = {
            use tagbson as __crate;

            impl __crate::record::Record for #ident {
                fn fields() -> &'static [__crate::record::FieldDef] {
                    static FIELDS: __crate::export::Lazy<
                        ::std::vec::Vec<__crate::record::FieldDef>,
                    > = __crate::export::Lazy::new(|| {
                        ::std::vec![
                            #(
                                __crate::record::FieldDef {
                                    name: #names,
                                    tag: #tags,
                                    nested: <#types as __crate::Encode>::nested_fields(),
                                },
                            )*
                        ]
                    });
                    &FIELDS
                }

                fn encode_field(&self, slot: usize) -> __crate::Result<__crate::Bson> {
                    match slot {
                        #( #slots => __crate::Encode::to_bson(&self.#idents), )*
                        _ => ::std::unreachable!("field slot out of range"),
                    }
                }

                fn field_is_empty(&self, slot: usize) -> bool {
                    match slot {
                        #( #slots => __crate::Encode::is_empty(&self.#idents), )*
                        _ => false,
                    }
                }

                fn decode_field(
                    &mut self,
                    slot: usize,
                    elem: __crate::RawElement<'_>,
                ) -> __crate::Result<bool> {
                    match slot {
                        #( #slots => __crate::Decode::decode_value(&mut self.#idents, elem), )*
                        _ => ::std::unreachable!("field slot out of range"),
                    }
                }

                fn reset_fields(&mut self) {
                    #( __crate::Decode::reset(&mut self.#idents); )*
                }

                fn inline_field(&self, slot: usize) -> ::std::option::Option<&dyn __crate::record::Record> {
                    match slot {
                        #( #slots => __crate::Encode::as_record(&self.#idents), )*
                        _ => ::std::option::Option::None,
                    }
                }

                fn inline_field_mut(
                    &mut self,
                    slot: usize,
                ) -> ::std::option::Option<&mut dyn __crate::record::Record> {
                    match slot {
                        #( #slots => __crate::Decode::as_record_mut(&mut self.#idents), )*
                        _ => ::std::option::Option::None,
                    }
                }
            }

            impl __crate::Encode for #ident {
                fn to_bson(&self) -> __crate::Result<__crate::Bson> {
                    let schema = __crate::schema::plan::<Self>()?;
                    __crate::encoder::record_to_bson(self, &schema)
                }

                fn nested_fields() -> ::std::option::Option<__crate::record::NestedFields> {
                    ::std::option::Option::Some(__crate::record::NestedFields::of::<Self>(#name))
                }

                fn as_record(&self) -> ::std::option::Option<&dyn __crate::record::Record> {
                    ::std::option::Option::Some(self)
                }
            }

            impl __crate::Decode for #ident {
                fn decode_value(
                    &mut self,
                    elem: __crate::RawElement<'_>,
                ) -> __crate::Result<bool> {
                    let schema = __crate::schema::plan::<Self>()?;
                    __crate::decoder::decode_record_value(self, &schema, elem)
                }

                fn reset(&mut self) {
                    __crate::record::Record::reset_fields(self);
                }

                fn as_record_mut(
                    &mut self,
                ) -> ::std::option::Option<&mut dyn __crate::record::Record> {
                    ::std::option::Option::Some(self)
                }
            }
        };
    })
}
