use crate::collection::Document;
use crate::common::{atomic, Atomic, ReadExecutor, Value, WriteExecutor, DOC_ID};
use crate::errors::{ErrorKind, PopulateError, PopulateResult};
use crate::filter::{is_all_filter, Filter};
use crate::store::{CollectionProvider, DatabaseProvider, DocumentCollection, WriteResult};
use dashmap::DashMap;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// A database holding every collection in memory.
///
/// Collections are created on first access. Clones share the same collections.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    inner: Arc<DashMap<String, InMemoryCollection>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        InMemoryDatabase {
            inner: Arc::new(DashMap::new()),
        }
    }
}

impl DatabaseProvider for InMemoryDatabase {
    fn collection(&self, name: &str) -> PopulateResult<DocumentCollection> {
        if name.is_empty() {
            log::error!("Collection name cannot be empty");
            return Err(PopulateError::new(
                "Collection name cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }

        let collection = self
            .inner
            .entry(name.to_string())
            .or_insert_with(|| InMemoryCollection::new(name))
            .clone();
        Ok(DocumentCollection::new(collection))
    }

    fn collection_names(&self) -> PopulateResult<Vec<String>> {
        let mut names: Vec<String> = self.inner.iter().map(|it| it.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    fn has_collection(&self, name: &str) -> PopulateResult<bool> {
        Ok(self.inner.contains_key(name))
    }

    fn drop_collection(&self, name: &str) -> PopulateResult<()> {
        if let Some((_, collection)) = self.inner.remove(name) {
            collection.documents.write_with(|docs| docs.clear());
        }
        Ok(())
    }
}

/// A collection of documents kept in insertion order, keyed by `_id`.
#[derive(Clone)]
pub struct InMemoryCollection {
    name: String,
    documents: Atomic<IndexMap<Value, Document>>,
}

impl InMemoryCollection {
    pub fn new(name: &str) -> Self {
        InMemoryCollection {
            name: name.to_string(),
            documents: atomic(IndexMap::new()),
        }
    }

    fn ensure_id(document: &mut Document) -> Value {
        match document.id() {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                let id = Value::String(uuid::Uuid::new_v4().to_string());
                document.put_raw(DOC_ID, id.clone());
                id
            }
        }
    }

    fn duplicate_id(&self, id: &Value) -> PopulateError {
        log::error!("Document with id {} already exists in {}", id, self.name);
        PopulateError::new(
            &format!("Document with id {} already exists in {}", id, self.name),
            ErrorKind::UniqueConstraintViolation,
        )
    }

    fn lookup_failure(&self, filter: &Filter, cause: PopulateError) -> PopulateError {
        log::error!("Failed to evaluate {} on {}: {}", filter, self.name, cause);
        PopulateError::new_with_cause(
            &format!("Failed to evaluate {} on {}", filter, self.name),
            ErrorKind::LookupFailure,
            cause,
        )
    }

    // Ids of the documents matching `filter`, in collection order.
    fn matching_ids(
        &self,
        docs: &IndexMap<Value, Document>,
        filter: &Filter,
    ) -> PopulateResult<Vec<Value>> {
        let mut ids = Vec::new();
        for (id, doc) in docs.iter() {
            if filter.apply(doc).map_err(|e| self.lookup_failure(filter, e))? {
                ids.push(id.clone());
            }
        }
        Ok(ids)
    }
}

impl CollectionProvider for InMemoryCollection {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn find(&self, filter: Filter) -> PopulateResult<Vec<Document>> {
        self.documents.read_with(|docs| {
            if is_all_filter(&filter) {
                return Ok(docs.values().cloned().collect());
            }

            let mut result = Vec::new();
            for doc in docs.values() {
                if filter.apply(doc).map_err(|e| self.lookup_failure(&filter, e))? {
                    result.push(doc.clone());
                }
            }
            Ok(result)
        })
    }

    fn insert(&self, mut document: Document) -> PopulateResult<WriteResult> {
        let id = Self::ensure_id(&mut document);
        self.documents.write_with(|docs| {
            if docs.contains_key(&id) {
                return Err(self.duplicate_id(&id));
            }
            docs.insert(id.clone(), document);
            Ok(WriteResult::new(vec![id]))
        })
    }

    // all or nothing: ids are checked against the store and within the batch first
    fn insert_many(&self, documents: Vec<Document>) -> PopulateResult<WriteResult> {
        let mut prepared = Vec::with_capacity(documents.len());
        for mut document in documents {
            let id = Self::ensure_id(&mut document);
            prepared.push((id, document));
        }

        self.documents.write_with(|docs| {
            let mut seen = HashSet::with_capacity(prepared.len());
            for (id, _) in &prepared {
                if docs.contains_key(id) || !seen.insert(id) {
                    return Err(self.duplicate_id(id));
                }
            }

            let ids: Vec<Value> = prepared.iter().map(|(id, _)| id.clone()).collect();
            docs.extend(prepared);
            Ok(WriteResult::new(ids))
        })
    }

    fn update(&self, filter: Filter, update: &Document) -> PopulateResult<WriteResult> {
        self.documents.write_with(|docs| {
            let ids = self.matching_ids(docs, &filter)?;
            if let Some(new_id) = update.id() {
                if ids.iter().any(|id| id != new_id) {
                    log::error!("Update cannot change the _id of a document in {}", self.name);
                    return Err(PopulateError::new(
                        "Update cannot change the _id of a document",
                        ErrorKind::InvalidId,
                    ));
                }
            }

            for id in &ids {
                if let Some(doc) = docs.get_mut(id) {
                    let mut replacement = update.clone();
                    replacement.put_raw(DOC_ID, id.clone());
                    *doc = replacement;
                }
            }
            Ok(WriteResult::new(ids))
        })
    }

    fn remove(&self, filter: Filter) -> PopulateResult<WriteResult> {
        self.documents.write_with(|docs| {
            let ids = self.matching_ids(docs, &filter)?;
            for id in &ids {
                docs.shift_remove(id);
            }
            Ok(WriteResult::new(ids))
        })
    }

    fn get_by_id(&self, id: &Value) -> PopulateResult<Option<Document>> {
        Ok(self.documents.read_with(|docs| docs.get(id).cloned()))
    }

    fn count(&self, filter: Filter) -> PopulateResult<usize> {
        if is_all_filter(&filter) {
            return Ok(self.documents.read_with(|docs| docs.len()));
        }
        Ok(self.find(filter)?.len())
    }
}
