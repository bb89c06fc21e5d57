use crate::errors::PopulateResult;
use crate::store::{DocumentCollection, InMemoryDatabase};
use std::ops::Deref;
use std::sync::Arc;

/// Access to the named collections of a document store.
///
/// # Purpose
/// The seam between populate and a concrete store. Lookups open the target collection of a
/// hop through it, repositories open the collection of their entity.
///
/// # Key Responsibilities
/// - **Collection access**: open a collection by name, creating it if needed
/// - **Registry**: list, test for and drop collections
///
/// # Implementations
/// - [InMemoryDatabase]: every collection kept in memory
///
/// # Thread Safety
/// Implementers must be `Send + Sync`, a database is shared by every engine and repository
/// built on it.
pub trait DatabaseProvider: Send + Sync {
    /// Opens the collection `name`. Opening a collection that holds no documents yet is not
    /// an error.
    ///
    /// # Returns
    /// * `Ok(DocumentCollection)` for any non-empty name
    /// * `Err(PopulateError)` with [InvalidOperation](crate::errors::ErrorKind::InvalidOperation)
    ///   for an empty name, or the backend's own error
    fn collection(&self, name: &str) -> PopulateResult<DocumentCollection>;

    /// Names of the collections that currently exist.
    fn collection_names(&self) -> PopulateResult<Vec<String>>;

    fn has_collection(&self, name: &str) -> PopulateResult<bool> {
        Ok(self.collection_names()?.iter().any(|it| it == name))
    }

    /// Removes the collection `name` with all its documents.
    fn drop_collection(&self, name: &str) -> PopulateResult<()>;
}

/// A shareable database handle.
///
/// Populate only reads through it; repositories also write.
#[derive(Clone)]
pub struct Database {
    inner: Arc<dyn DatabaseProvider>,
}

impl Database {
    pub fn new<T: DatabaseProvider + 'static>(inner: T) -> Self {
        Database {
            inner: Arc::new(inner),
        }
    }

    /// Creates a database backed by a fresh [InMemoryDatabase].
    pub fn in_memory() -> Self {
        Database::new(InMemoryDatabase::new())
    }
}

impl Deref for Database {
    type Target = Arc<dyn DatabaseProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
