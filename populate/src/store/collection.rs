use crate::collection::Document;
use crate::common::Value;
use crate::errors::PopulateResult;
use crate::filter::{all, by_id, Filter};
use std::ops::Deref;
use std::sync::Arc;

/// Ids of the documents touched by a write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteResult {
    ids: Vec<Value>,
}

impl WriteResult {
    pub fn new(ids: Vec<Value>) -> Self {
        WriteResult { ids }
    }

    pub fn affected_ids(&self) -> &[Value] {
        &self.ids
    }

    pub fn affected_count(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn extend(&mut self, other: WriteResult) {
        self.ids.extend(other.ids);
    }
}

impl IntoIterator for WriteResult {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

/// Operations on one collection of documents.
///
/// # Purpose
/// Stores documents keyed by their `_id` and answers the equality queries populate issues for
/// every foreign key.
///
/// # Characteristics
/// - `find` returns matches in collection order; an empty result is not an error
/// - Every stored document has a non-null `_id`, unique within the collection
/// - `insert_many`, `update` and `remove` report the ids they touched in a [WriteResult]
///
/// # Errors
/// Errors raised while querying are reported with
/// [ErrorKind::LookupFailure](crate::errors::ErrorKind::LookupFailure), duplicate ids with
/// [ErrorKind::UniqueConstraintViolation](crate::errors::ErrorKind::UniqueConstraintViolation).
///
/// # Usage
/// ```rust,ignore
/// let authors = db.collection("authors")?;
/// authors.insert(doc! { _id: 7, name: "Frank Herbert" })?;
/// let found = authors.find(field("name").eq("Frank Herbert"))?;
/// ```
pub trait CollectionProvider: Send + Sync {
    fn name(&self) -> String;

    /// Returns every document matching `filter`, in collection order.
    fn find(&self, filter: Filter) -> PopulateResult<Vec<Document>>;

    /// Stores `document`. A document without `_id` is assigned one.
    fn insert(&self, document: Document) -> PopulateResult<WriteResult>;

    fn insert_many(&self, documents: Vec<Document>) -> PopulateResult<WriteResult> {
        let mut result = WriteResult::default();
        for document in documents {
            result.extend(self.insert(document)?);
        }
        Ok(result)
    }

    /// Replaces every document matching `filter` by `update`. Each document keeps its `_id`;
    /// an `update` carrying a different `_id` is rejected.
    fn update(&self, filter: Filter, update: &Document) -> PopulateResult<WriteResult>;

    /// Removes every document matching `filter`.
    fn remove(&self, filter: Filter) -> PopulateResult<WriteResult>;

    fn get_by_id(&self, id: &Value) -> PopulateResult<Option<Document>> {
        Ok(self.find(by_id(id.clone()))?.into_iter().next())
    }

    fn count(&self, filter: Filter) -> PopulateResult<usize> {
        Ok(self.find(filter)?.len())
    }
}

/// A shareable collection handle.
#[derive(Clone)]
pub struct DocumentCollection {
    inner: Arc<dyn CollectionProvider>,
}

impl DocumentCollection {
    pub fn new<T: CollectionProvider + 'static>(inner: T) -> Self {
        DocumentCollection {
            inner: Arc::new(inner),
        }
    }

    pub fn count_all(&self) -> PopulateResult<usize> {
        self.inner.count(all())
    }
}

impl Deref for DocumentCollection {
    type Target = Arc<dyn CollectionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
