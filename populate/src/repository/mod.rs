//! Typed access to a collection, with populate on top.
//!
//! ```rust,ignore
//! use populate::repository::Repository;
//!
//! let books: Repository<Book> = Repository::new(db.clone())?;
//! books.insert(&Book { id: 1, title: "Dune".into(), author: 7 })?;
//! let view: Option<BookView> = books.populate_by_id(1, &PopulateOptions::new("author", "authors", "_id"))?;
//! ```

mod entity;
mod repository;

pub use entity::*;
pub use repository::*;
