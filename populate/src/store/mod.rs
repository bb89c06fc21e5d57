//! Database and collection handles.
//!
//! [Database] and [DocumentCollection] are cheap, cloneable facades over the
//! [DatabaseProvider] and [CollectionProvider] traits. Any document store can back them;
//! [InMemoryDatabase] is the bundled implementation.
//!
//! ```rust,ignore
//! use populate::store::Database;
//! use populate::filter::field;
//!
//! let db = Database::in_memory();
//! let authors = db.collection("authors")?;
//! authors.insert(doc! { _id: 10, name: "Herbert" })?;
//! let found = authors.find(field("name").eq("Herbert"))?;
//! ```

mod collection;
mod database;
mod memory;

pub use collection::*;
pub use database::*;
pub use memory::*;
