//! Query filters used by collections and by populate lookups.
//!
//! A lookup for a foreign key is the equality filter `field(match_field).eq(key)`.
//!
//! ```rust,ignore
//! use populate::filter::{all, field};
//!
//! let by_author = field("author_id").eq(10);
//! let everything = all();
//! let drafts = field("draft").ne(false);
//! ```

mod basic_filters;
mod filter;
mod fluent;

pub use basic_filters::*;
pub use filter::*;
pub use fluent::*;
