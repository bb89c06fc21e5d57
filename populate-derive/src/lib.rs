#![recursion_limit = "128"]
//! # Populate Derive Macros
//!
//! Procedural macros deriving the traits of the `populate` crate.
//!
//! ## Macros
//!
//! ### `Convertible`
//!
//! Derives `Convertible` for structs with named fields and for enums, converting them to and
//! from a `Document`.
//!
//! - **Container attribute**: `#[converter(ignored = "a, b")]` leaves fields out of the
//!   document. They are restored with `Default::default()`.
//!
//! ```rust,ignore
//! use populate::populate::Reference;
//! use populate_derive::Convertible;
//!
//! #[derive(Convertible, Default)]
//! pub struct BookView {
//!     pub title: String,
//!     pub author: Reference<Author>,
//! }
//! ```
//!
//! ### `Entity`
//!
//! Derives `Entity` for structs, so they can be stored in a `Repository`.
//!
//! - **Container attribute**: `#[entity(name = "books", id(field = "isbn"))]`. The name
//!   defaults to the struct name and the id is optional.
//!
//! ```rust,ignore
//! use populate_derive::{Convertible, Entity};
//!
//! #[derive(Entity, Convertible, Default)]
//! #[entity(name = "books", id(field = "isbn"))]
//! pub struct Book {
//!     pub isbn: String,
//!     pub title: String,
//!     pub author: i64,
//! }
//! ```

extern crate proc_macro;
mod convertible;
mod entity;

use crate::convertible::{generate_convertible_for_enum, generate_convertible_for_struct};
use crate::entity::generate_entity_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives the `Convertible` trait.
///
/// Every field type must implement `Convertible` itself.
#[proc_macro_derive(Convertible, attributes(converter))]
pub fn derive_convert(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    let result = match ast.data {
        Data::Struct(ref data) => generate_convertible_for_struct(&ast, data),
        Data::Enum(ref data) => generate_convertible_for_enum(&ast, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast,
            "Cannot derive Convertible for unions",
        )),
    };

    match result {
        Ok(token_stream) => token_stream,
        Err(e) => syn::Error::new_spanned(
            &ast,
            format!("Failed to derive Convertible for '{}': {}", ast.ident, e),
        )
        .to_compile_error()
        .into(),
    }
}

/// Derives the `Entity` trait. Only structs with named fields are supported.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_entity_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => syn::Error::new_spanned(
                &ast,
                format!(
                    "Failed to derive Entity for struct '{}': {}.\n\
                     Example: #[entity(name = \"books\", id(field = \"isbn\"))]",
                    ast.ident, e
                ),
            )
            .to_compile_error()
            .into(),
        },
        _ => syn::Error::new_spanned(&ast, "Cannot derive Entity for enums or unions. Only structs are supported.")
            .to_compile_error()
            .into(),
    }
}
