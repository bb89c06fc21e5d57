use crate::common::DOC_ID;

/// Metadata of a type stored through a [Repository](crate::repository::Repository).
///
/// # Purpose
/// Tells a repository which collection holds the entities and which field, if any, identifies
/// one of them. Implemented by the `Entity` derive macro.
///
/// # Characteristics
/// - Must implement Default, repositories read the metadata from a default value
/// - The collection name defaults to the struct name unless `#[entity(name = "...")]` is given
/// - An id field other than `_id` is mirrored into `_id` when the entity is stored
///
/// # Usage
/// ```rust,ignore
/// #[derive(Entity, Convertible, Default)]
/// #[entity(name = "books", id(field = "id"))]
/// struct Book {
///     id: i64,
///     title: String,
///     author: i64,
/// }
/// ```
pub trait Entity: Default {
    /// Name of the collection holding the entities.
    ///
    /// # Behavior
    /// - Defaults to the struct name when derived
    /// - Overridden by [RepositoryBuilder::collection_name](crate::repository::RepositoryBuilder::collection_name)
    fn entity_name(&self) -> String;

    /// The field identifying an entity, if it has one. Entities without an id field are
    /// identified by the `_id` the store assigns.
    fn entity_id(&self) -> Option<EntityId> {
        None
    }
}

/// The id field of an [Entity].
///
/// # Characteristics
/// - Names a top level field of the entity's document form
/// - A field named `_id` is the document key itself and is stored as is
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct EntityId {
    field_name: String,
}

impl EntityId {
    pub fn new(field_name: &str) -> Self {
        EntityId {
            field_name: field_name.to_string(),
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Whether the id field is the document key itself.
    pub fn is_document_id(&self) -> bool {
        self.field_name == DOC_ID
    }
}
