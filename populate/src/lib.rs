//! # Populate - cross-collection references for document stores
//!
//! Documents often hold the key of a document in another collection: a book stores its
//! author's id, an order stores its customer's id. Populating replaces such a key by the
//! documents it refers to, following a chain of references across collections.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use populate::populate::{PopulateEngine, PopulateOptions};
//! use populate::store::Database;
//!
//! let db = Database::in_memory();
//! db.collection("authors")?.insert(doc! { _id: 7, name: "Herbert" })?;
//!
//! let engine = PopulateEngine::new(db);
//! let options = PopulateOptions::new("author", "authors", "_id");
//! let view: BookView = engine.populate(&book, &options)?;
//! assert_eq!(view.author[0].get("name")?, Value::from("Herbert"));
//! ```
//!
//! Each [PopulateOptions](populate::PopulateOptions) names a field path, the collection to
//! look in and the field to match there. Options chain with
//! [then](populate::PopulateOptions::then): every following hop resolves its path on the
//! projection populated so far.
//!
//! ## Module Organization
//!
//! - [`collection`] - The [Document](collection::Document) model and the `doc!` macro
//! - [`common`] - Values, conversion to and from Rust types, shared helpers
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Query filters used for lookups
//! - [`populate`] - Plans, path resolution, lookups and the populate engine
//! - [`populate_config`] - Populate configuration
//! - [`repository`] - Typed repositories with populate support
//! - [`store`] - Database abstraction and the in-memory backend

pub mod collection;
pub mod common;
pub mod errors;
pub mod filter;
pub mod populate;
pub mod populate_config;
pub mod repository;
pub mod store;
