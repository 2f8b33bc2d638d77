use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, parse_quote};

/// Derive macro that makes a struct a record for `deepconv::convert`.
///
/// Generates `Structural` and `RecordAccess` impls. The record schema (field
/// names and parsed paths) is built once per type on first use.
///
/// The struct must implement `Default` and every field type must implement
/// `Structural`. Type parameters are bounded by `Structural + Default`.
///
/// # Example
///
/// ```ignore
/// #[derive(Convert, Default)]
/// pub struct Upload {
///     #[convert(path = "/inlined/ClientId")]
///     pub client_id: String,
///
///     #[convert(skip)]
///     pub scratch: Vec<u8>,
///
///     pub name: String,
/// }
/// ```
///
/// `path` starts with its separator character. Segments that parse as
/// integers address sequence indices and integer-keyed mappings. `path =
/// "-"` and `skip` hide the field from conversion in both directions.
///
/// `omit_empty` leaves the field out when the record is the source and the
/// field equals its type's `Default`. Such fields need `PartialEq`.
#[proc_macro_derive(Convert, attributes(convert))]
pub fn derive_convert(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Convert only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Convert only supports structs",
            ));
        }
    };

    let mut schema_tokens = Vec::new();
    let mut field_arms = Vec::new();
    let mut field_mut_arms = Vec::new();
    let mut omitted = Vec::new();
    let mut zero_arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_name.to_string();
        let field_name_str = field_name_str
            .strip_prefix("r#")
            .unwrap_or(&field_name_str)
            .to_string();

        // Parse #[convert(...)] attribute.
        let mut path: Option<String> = None;
        let mut skip = false;
        let mut omit_empty = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("convert") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("path") {
                    let value: LitStr = meta.value()?.parse()?;
                    if value.value().is_empty() {
                        return Err(meta.error("path must not be empty"));
                    }
                    path = Some(value.value());
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else if meta.path.is_ident("omit_empty") {
                    omit_empty = true;
                } else {
                    return Err(meta.error(
                        "unknown convert attribute (expected `path`, `skip` or `omit_empty`)",
                    ));
                }
                Ok(())
            })?;
        }

        if skip && path.is_some() {
            return Err(syn::Error::new_spanned(
                field_name,
                "`skip` and `path` are mutually exclusive",
            ));
        }
        if skip && omit_empty {
            return Err(syn::Error::new_spanned(
                field_name,
                "`skip` and `omit_empty` are mutually exclusive",
            ));
        }

        if omit_empty {
            let ty = &field.ty;
            omitted.push(index);
            zero_arms.push(quote! {
                #index => <#ty as ::core::cmp::PartialEq>::eq(
                    &self.#field_name,
                    &<#ty as ::core::default::Default>::default(),
                ),
            });
        }

        let annotation = match (skip, path) {
            (true, _) => quote! { Some(::deepconv::path::IGNORE) },
            (false, Some(p)) => quote! { Some(#p) },
            (false, None) => quote! { None },
        };

        schema_tokens.push(quote! { (#field_name_str, #annotation) });
        field_arms.push(quote! {
            #index => Some(&self.#field_name as &dyn ::deepconv::Structural),
        });
        field_mut_arms.push(quote! {
            #index => Some(&mut self.#field_name as &mut dyn ::deepconv::Structural),
        });
    }

    // Bound type parameters only; bounding field types directly would make
    // self-referential records (`Option<Box<Self>>`) unprovable.
    let mut generics = input.generics.clone();
    let params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    {
        let where_clause = generics.make_where_clause();
        for param in &params {
            where_clause.predicates.push(parse_quote! {
                #param: ::deepconv::Structural + ::core::default::Default
            });
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let type_name = name.to_string();

    let zero_check = if zero_arms.is_empty() {
        quote! {}
    } else {
        quote! {
            fn field_is_zero(&self, index: usize) -> bool {
                match index {
                    #(#zero_arms)*
                    _ => false,
                }
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics ::deepconv::Structural for #name #ty_generics #where_clause {
            fn view(&self) -> ::deepconv::View<'_> {
                ::deepconv::View::Record(self)
            }

            fn view_mut(&mut self) -> ::deepconv::ViewMut<'_> {
                ::deepconv::ViewMut::Record(self)
            }

            fn set_zero(&mut self) {
                *self = ::core::default::Default::default();
            }
        }

        impl #impl_generics ::deepconv::RecordAccess for #name #ty_generics #where_clause {
            fn schema(&self) -> &'static ::deepconv::RecordSchema {
                static SCHEMA: ::std::sync::OnceLock<::deepconv::RecordSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    ::deepconv::RecordSchema::new(#type_name, &[
                        #(#schema_tokens),*
                    ])
                    .omitting_empty(&[#(#omitted),*])
                })
            }

            fn field(&self, index: usize) -> Option<&dyn ::deepconv::Structural> {
                match index {
                    #(#field_arms)*
                    _ => None,
                }
            }

            fn field_mut(&mut self, index: usize) -> Option<&mut dyn ::deepconv::Structural> {
                match index {
                    #(#field_mut_arms)*
                    _ => None,
                }
            }

            #zero_check
        }
    };

    Ok(expanded)
}
