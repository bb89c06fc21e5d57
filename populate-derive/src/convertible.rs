use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::{Attribute, DataEnum, DataStruct, DeriveInput, LitStr, Result, Type};

// names listed in `#[converter(ignored = "a, b")]`
fn ignored_fields(attrs: &[Attribute]) -> Result<Vec<String>> {
    let mut ignored = vec![];
    for attr in attrs {
        if attr.path().is_ident("converter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignored") {
                    let s: LitStr = meta.value()?.parse()?;
                    ignored.extend(
                        s.value()
                            .split(',')
                            .map(|field| field.trim().to_string())
                            .filter(|field| !field.is_empty()),
                    );
                    Ok(())
                } else {
                    Err(meta.error("Unknown converter attribute"))
                }
            })?;
        }
    }
    Ok(ignored)
}

fn mapping_error(message: &str) -> proc_macro2::TokenStream {
    quote! {
        Err(populate::errors::PopulateError::new(
            #message,
            populate::errors::ErrorKind::ObjectMappingError,
        ))
    }
}

pub(crate) fn generate_convertible_for_struct(ast: &DeriveInput, data: &DataStruct) -> Result<TokenStream> {
    let ignored = ignored_fields(&ast.attrs)?;

    let fields = match &data.fields {
        syn::Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                "Only structs with named fields are supported",
            ))
        }
    };

    let mut put_idents: Vec<&Ident> = vec![];
    let mut put_names: Vec<String> = vec![];
    let mut initializers: Vec<proc_macro2::TokenStream> = vec![];

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.to_string();
        let ty: &Type = &field.ty;

        if ignored.contains(&field_name) {
            initializers.push(quote! { #ident: Default::default() });
        } else {
            initializers.push(quote! {
                #ident: populate::common::from_value::<#ty>(&doc.get(#field_name)?)?
            });
            put_idents.push(ident);
            put_names.push(field_name);
        }
    }

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let not_a_document = mapping_error("Value is not a document");

    let gen = quote! {
        impl #impl_generics populate::common::Convertible for #name #ty_generics #where_clause {
            type Output = Self;

            fn to_value(&self) -> populate::errors::PopulateResult<populate::common::Value> {
                let mut doc = populate::collection::Document::new();
                #(doc.put(#put_names, populate::common::to_value(&self.#put_idents)?)?;)*
                Ok(populate::common::Value::Document(doc))
            }

            fn from_value(value: &populate::common::Value) -> populate::errors::PopulateResult<Self::Output> {
                match value {
                    populate::common::Value::Document(doc) => Ok(#name {
                        #(#initializers,)*
                    }),
                    _ => #not_a_document,
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

/// Enums are stored as `{ variant: "Name", value: ... }`, where `value` is a document for
/// struct variants, an array for tuple variants and null for unit variants.
pub(crate) fn generate_convertible_for_enum(ast: &DeriveInput, data: &DataEnum) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let ignored = ignored_fields(&ast.attrs)?;

    let mut to_value_variants = Vec::with_capacity(data.variants.len());
    let mut from_value_variants = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        let variant_ident = &variant.ident;
        let variant_name = variant_ident.to_string();

        match &variant.fields {
            syn::Fields::Named(fields) => {
                let put_idents: Vec<&Ident> = fields
                    .named
                    .iter()
                    .filter_map(|f| f.ident.as_ref())
                    .filter(|ident| !ignored.contains(&ident.to_string()))
                    .collect();
                let put_names: Vec<String> = put_idents.iter().map(|i| i.to_string()).collect();

                to_value_variants.push(quote! {
                    #name::#variant_ident { #(ref #put_idents,)* .. } => {
                        let mut data = populate::collection::Document::new();
                        #(data.put(#put_names, populate::common::to_value(#put_idents)?)?;)*
                        let mut doc = populate::collection::Document::new();
                        doc.put("variant", #variant_name)?;
                        doc.put("value", populate::common::Value::Document(data))?;
                        Ok(populate::common::Value::Document(doc))
                    }
                });

                let initializers: Vec<proc_macro2::TokenStream> = fields
                    .named
                    .iter()
                    .filter_map(|field| field.ident.as_ref().map(|ident| (ident, &field.ty)))
                    .map(|(ident, ty)| {
                        let field_name = ident.to_string();
                        if ignored.contains(&field_name) {
                            quote! { #ident: Default::default() }
                        } else {
                            quote! { #ident: populate::common::from_value::<#ty>(&data.get(#field_name)?)? }
                        }
                    })
                    .collect();
                let not_a_document = mapping_error("Enum variant value is not a document");

                from_value_variants.push(quote! {
                    #variant_name => match doc.get("value")? {
                        populate::common::Value::Document(data) => Ok(#name::#variant_ident {
                            #(#initializers,)*
                        }),
                        _ => #not_a_document,
                    }
                });
            }
            syn::Fields::Unnamed(fields) => {
                let field_count = fields.unnamed.len();
                let field_idents: Vec<Ident> = (0..field_count)
                    .map(|i| Ident::new(&format!("field_{}", i), Span::call_site()))
                    .collect();
                let field_types: Vec<&Type> = fields.unnamed.iter().map(|f| &f.ty).collect();
                let field_indices: Vec<usize> = (0..field_count).collect();

                to_value_variants.push(quote! {
                    #name::#variant_ident(#(#field_idents),*) => {
                        let mut array = Vec::with_capacity(#field_count);
                        #(array.push(populate::common::to_value(#field_idents)?);)*
                        let mut doc = populate::collection::Document::new();
                        doc.put("variant", #variant_name)?;
                        doc.put("value", populate::common::Value::Array(array))?;
                        Ok(populate::common::Value::Document(doc))
                    }
                });

                let not_an_array = mapping_error("Enum variant value is not an array of the right length");
                from_value_variants.push(quote! {
                    #variant_name => match doc.get("value")? {
                        populate::common::Value::Array(data) if data.len() == #field_count => {
                            Ok(#name::#variant_ident(
                                #(populate::common::from_value::<#field_types>(&data[#field_indices])?,)*
                            ))
                        }
                        _ => #not_an_array,
                    }
                });
            }
            syn::Fields::Unit => {
                to_value_variants.push(quote! {
                    #name::#variant_ident => {
                        let mut doc = populate::collection::Document::new();
                        doc.put("variant", #variant_name)?;
                        doc.put("value", populate::common::Value::Null)?;
                        Ok(populate::common::Value::Document(doc))
                    }
                });

                from_value_variants.push(quote! {
                    #variant_name => Ok(#name::#variant_ident)
                });
            }
        }
    }

    let invalid_variant = mapping_error("Value is not a valid enum variant");
    let not_a_document = mapping_error("Value is not a document");

    let gen = quote! {
        impl #impl_generics populate::common::Convertible for #name #ty_generics #where_clause {
            type Output = Self;

            fn to_value(&self) -> populate::errors::PopulateResult<populate::common::Value> {
                match self {
                    #(#to_value_variants),*
                }
            }

            fn from_value(value: &populate::common::Value) -> populate::errors::PopulateResult<Self::Output> {
                match value {
                    populate::common::Value::Document(doc) => match doc.get("variant")? {
                        populate::common::Value::String(variant) => match variant.as_str() {
                            #(#from_value_variants,)*
                            _ => #invalid_variant,
                        },
                        _ => #invalid_variant,
                    },
                    _ => #not_a_document,
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}
