//! The schemaless document model.
//!
//! A [Document] is an ordered map of field names to [Value](crate::common::Value)s. Collections
//! store documents, lookups return them, and populate resolves reference paths over them.
//!
//! ```rust,ignore
//! use populate::collection::Document;
//!
//! let mut doc = Document::new();
//! doc.put("title", "Dune")?;
//! doc.put("order.customer", 7)?;
//! ```

mod document;

pub use document::*;
