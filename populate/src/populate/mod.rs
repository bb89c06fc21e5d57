//! Cross-collection reference resolution.
//!
//! A [PopulateOptions] chain names, for each hop, the projection field holding foreign keys,
//! the collection to query and the field of that collection the keys must equal. The
//! [PopulateEngine] maps an entity into a projection type with a [ShapeMapper], then replaces
//! each hop's keys with the documents they match, using a [LookupExecutor] per query and a
//! [PathResolver] to find the field.
//!
//! ```rust,ignore
//! use populate::populate::{PopulateEngine, PopulateOptions};
//!
//! let engine = PopulateEngine::new(db.clone());
//! let options = PopulateOptions::new("author", "authors", "_id")
//!     .then(PopulateOptions::new("publisher", "publishers", "_id"));
//! let view: BookView = engine.populate(&book, &options)?;
//! ```

mod engine;
mod foreign_key;
mod lookup;
mod mapper;
mod options;
mod path;
mod reference;

pub use engine::*;
pub use foreign_key::*;
pub use lookup::*;
pub use mapper::{DocumentShapeMapper, ShapeMapper};
pub use options::*;
pub use path::*;
pub use reference::*;
