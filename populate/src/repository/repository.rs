use std::marker::PhantomData;

use crate::collection::Document;
use crate::common::{Convertible, Value, DOC_ID};
use crate::errors::{ErrorKind, PopulateError, PopulateResult};
use crate::filter::{by_id, Filter};
use crate::populate::{PopulateEngine, PopulateOptions};
use crate::populate_config::PopulateConfig;
use crate::repository::{Entity, EntityId};
use crate::store::{CollectionProvider, Database, DatabaseProvider, DocumentCollection, WriteResult};

/// A typed view over one collection.
///
/// # Purpose
/// Stores and loads entities of type `T`, and populates them into projections with a
/// [PopulateEngine] on the same database.
///
/// # Characteristics
/// - Entities are converted with [Convertible] and stored as documents
/// - When the entity declares an id field, its value is also stored as the document's `_id`,
///   so ids stay unique and can be looked up directly
/// - [update](Self::update) replaces the whole stored document of an entity
/// - Cheap to clone; clones share the collection and the engine
///
/// # Usage
/// ```rust,ignore
/// let books: Repository<Book> = Repository::new(db)?;
/// books.insert(&Book { id: 1, title: "Dune".into(), author: 7 })?;
///
/// let options = PopulateOptions::new("author", "authors", "_id");
/// let view: Option<BookView> = books.populate_by_id(1, &options)?;
/// ```
pub struct Repository<T> {
    collection: DocumentCollection,
    engine: PopulateEngine,
    entity_id: Option<EntityId>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Repository {
            collection: self.collection.clone(),
            engine: self.engine.clone(),
            entity_id: self.entity_id.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Convertible<Output = T> + Entity,
{
    /// Opens the repository on the collection named by the entity.
    pub fn new(database: Database) -> PopulateResult<Self> {
        RepositoryBuilder::new(database).build()
    }

    /// Opens the repository on the collection `name`.
    pub fn with_collection(database: Database, name: &str) -> PopulateResult<Self> {
        RepositoryBuilder::new(database).collection_name(name).build()
    }

    pub fn builder(database: Database) -> RepositoryBuilder<T> {
        RepositoryBuilder::new(database)
    }

    pub fn collection_name(&self) -> String {
        self.collection.name()
    }

    pub fn document_collection(&self) -> &DocumentCollection {
        &self.collection
    }

    pub fn engine(&self) -> &PopulateEngine {
        &self.engine
    }

    pub fn insert(&self, entity: &T) -> PopulateResult<WriteResult> {
        let document = self.to_document(entity)?;
        self.collection.insert(document)
    }

    /// Inserts all entities or none of them.
    pub fn insert_many(&self, entities: &[T]) -> PopulateResult<WriteResult> {
        let documents = entities
            .iter()
            .map(|entity| self.to_document(entity))
            .collect::<PopulateResult<Vec<_>>>()?;
        self.collection.insert_many(documents)
    }

    pub fn get_by_id(&self, id: impl Into<Value>) -> PopulateResult<Option<T>> {
        match self.collection.get_by_id(&id.into())? {
            Some(document) => Ok(Some(self.to_entity(document)?)),
            None => Ok(None),
        }
    }

    pub fn find(&self, filter: Filter) -> PopulateResult<Vec<T>> {
        self.collection
            .find(filter)?
            .into_iter()
            .map(|document| self.to_entity(document))
            .collect()
    }

    /// Like [find](Self::find), skipping `skip` matches and returning at most `limit`.
    pub fn find_page(&self, filter: Filter, skip: usize, limit: usize) -> PopulateResult<Vec<T>> {
        self.collection
            .find(filter)?
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|document| self.to_entity(document))
            .collect()
    }

    /// Replaces the stored document of `entity`, matched by its id. Fields absent from the new
    /// document form, map keys included, are gone afterwards.
    ///
    /// # Errors
    ///
    /// * [InvalidOperation](ErrorKind::InvalidOperation) if the entity has no id field.
    /// * [NotFound](ErrorKind::NotFound) if no stored entity has that id.
    pub fn update(&self, entity: &T) -> PopulateResult<WriteResult> {
        let document = self.to_document(entity)?;
        let filter = match (&self.entity_id, document.id()) {
            (Some(_), Some(id)) => by_id(id.clone()),
            _ => {
                log::error!(
                    "Entities of {} have no id field and cannot be updated",
                    self.collection_name()
                );
                return Err(PopulateError::new(
                    "Entity has no id field and cannot be updated",
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        let result = self.collection.update(filter, &document)?;
        if result.affected_count() == 0 {
            log::error!(
                "No entity with id {} found in {}",
                document.id().cloned().unwrap_or_default(),
                self.collection_name()
            );
            return Err(PopulateError::new(
                "No entity with the given id found",
                ErrorKind::NotFound,
            ));
        }
        Ok(result)
    }

    pub fn remove(&self, filter: Filter) -> PopulateResult<WriteResult> {
        self.collection.remove(filter)
    }

    pub fn count(&self, filter: Filter) -> PopulateResult<usize> {
        self.collection.count(filter)
    }

    /// Populates `entity` into a `P`. See [PopulateEngine::populate].
    pub fn populate<P>(&self, entity: &T, options: &PopulateOptions) -> PopulateResult<P>
    where
        P: Convertible<Output = P>,
    {
        self.engine.populate(entity, options)
    }

    /// Loads the entity with `id` and populates it. Returns `None` if there is no such entity.
    pub fn populate_by_id<P>(
        &self,
        id: impl Into<Value>,
        options: &PopulateOptions,
    ) -> PopulateResult<Option<P>>
    where
        P: Convertible<Output = P>,
    {
        match self.get_by_id(id)? {
            Some(entity) => Ok(Some(self.engine.populate(&entity, options)?)),
            None => Ok(None),
        }
    }

    /// Populates every entity matching `filter`, in collection order.
    pub fn find_populated<P>(&self, filter: Filter, options: &PopulateOptions) -> PopulateResult<Vec<P>>
    where
        P: Convertible<Output = P>,
    {
        let plan = self.engine.plan(options)?;
        self.find(filter)?
            .iter()
            .map(|entity| self.engine.execute(entity, &plan))
            .collect()
    }

    fn to_document(&self, entity: &T) -> PopulateResult<Document> {
        let mut document = match entity.to_value()? {
            Value::Document(document) => document,
            other => {
                log::error!(
                    "Entity of {} converted to {} instead of a document",
                    self.collection_name(),
                    other.type_name()
                );
                return Err(PopulateError::new(
                    "Entity must convert to a document",
                    ErrorKind::ObjectMappingError,
                ));
            }
        };

        if let Some(entity_id) = &self.entity_id {
            let id = document.get(entity_id.field_name())?;
            if id.is_null() {
                log::error!(
                    "Entity id field {} is null in {}",
                    entity_id.field_name(),
                    self.collection_name()
                );
                return Err(PopulateError::new(
                    &format!("Entity id field {} cannot be null", entity_id.field_name()),
                    ErrorKind::InvalidId,
                ));
            }
            if !entity_id.is_document_id() {
                document.put_raw(DOC_ID, id);
            }
        }
        Ok(document)
    }

    fn to_entity(&self, document: Document) -> PopulateResult<T> {
        T::from_value(&Value::Document(document))
    }
}

/// Builds a [Repository], collecting the first configuration error until
/// [build](RepositoryBuilder::build).
///
/// ```rust,ignore
/// let books = Repository::<Book>::builder(db)
///     .collection_name("library")
///     .field_separator("/")
///     .build()?;
/// ```
pub struct RepositoryBuilder<T> {
    database: Database,
    collection_name: Option<String>,
    config: PopulateConfig,
    error: Option<PopulateError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RepositoryBuilder<T>
where
    T: Convertible<Output = T> + Entity,
{
    pub fn new(database: Database) -> Self {
        RepositoryBuilder {
            database,
            collection_name: None,
            config: PopulateConfig::default(),
            error: None,
            _marker: PhantomData,
        }
    }

    /// Stores the entities in `name` instead of the entity's own collection name.
    pub fn collection_name(mut self, name: &str) -> Self {
        if name.trim().is_empty() {
            self.capture(PopulateError::new(
                "Collection name cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        } else {
            self.collection_name = Some(name.to_string());
        }
        self
    }

    /// Separator of the populate paths used by this repository.
    pub fn field_separator(mut self, separator: &str) -> Self {
        if let Err(err) = self.config.set_field_separator(separator) {
            self.capture(err);
        }
        self
    }

    pub fn build(self) -> PopulateResult<Repository<T>> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let prototype = T::default();
        let name = match self.collection_name {
            Some(name) => name,
            None => prototype.entity_name(),
        };
        let collection = self.database.collection(&name)?;
        let engine = PopulateEngine::new(self.database).with_config(self.config);

        Ok(Repository {
            collection,
            engine,
            entity_id: prototype.entity_id(),
            _marker: PhantomData,
        })
    }

    fn capture(&mut self, err: PopulateError) {
        log::error!("Invalid repository configuration: {}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
