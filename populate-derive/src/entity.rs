use proc_macro::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, LitStr, Result};

pub(crate) fn generate_entity_for_struct(ast: &DeriveInput, data: &DataStruct) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut entity_name = name.to_string();
    let mut entity_id: Option<String> = None;

    for attr in &ast.attrs {
        if attr.path().is_ident("entity") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let s: LitStr = meta.value()?.parse()?;
                    entity_name = s.value();
                    Ok(())
                } else if meta.path.is_ident("id") {
                    if entity_id.is_some() {
                        return Err(meta.error("Multiple id attributes are not allowed"));
                    }
                    meta.parse_nested_meta(|meta| {
                        if meta.path.is_ident("field") {
                            let s: LitStr = meta.value()?.parse()?;
                            entity_id = Some(s.value());
                            Ok(())
                        } else {
                            Err(meta.error("Unknown id attribute"))
                        }
                    })
                } else {
                    Err(meta.error("Unknown entity attribute"))
                }
            })?
        }
    }

    let fields = match &data.fields {
        syn::Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                "Only structs with named fields are supported",
            ))
        }
    };

    if let Some(ref id_field_name) = entity_id {
        // `_id` is the document key and need not be a struct field
        let exists = id_field_name == "_id"
            || fields
                .iter()
                .any(|field| field.ident.as_ref().is_some_and(|ident| ident == id_field_name));
        if !exists {
            return Err(syn::Error::new_spanned(
                ast,
                format!("Field {} not found in struct", id_field_name),
            ));
        }
    }

    let entity_id_code = match entity_id {
        Some(field_name) => quote! {
            fn entity_id(&self) -> Option<populate::repository::EntityId> {
                Some(populate::repository::EntityId::new(#field_name))
            }
        },
        None => quote! {},
    };

    let gen = quote! {
        impl #impl_generics populate::repository::Entity for #name #ty_generics #where_clause {
            fn entity_name(&self) -> String {
                #entity_name.to_string()
            }

            #entity_id_code
        }
    };

    Ok(TokenStream::from(gen))
}
