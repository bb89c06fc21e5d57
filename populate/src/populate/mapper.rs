use crate::collection::Document;
use crate::common::{Convertible, Value};
use crate::errors::{ErrorKind, PopulateError, PopulateResult};
use crate::populate::FieldPath;

/// Copies an entity into a projection type, field by field and by name.
///
/// Fields listed in `exclude` are reset to null, the default of the projection field, instead
/// of being copied. Mapping never modifies the source and gives the same result every time.
pub trait ShapeMapper: Send + Sync {
    /// Maps the document form of an entity. Excluded paths that exist in `source` are null
    /// in the result; the others are ignored.
    fn map_document(&self, source: &Document, exclude: &[FieldPath]) -> PopulateResult<Document>;

    /// Maps `source` into `D`.
    ///
    /// # Errors
    ///
    /// [ErrorKind::ConfigurationError] if `source` is not a document-shaped type or `D` cannot
    /// be built from the mapped fields.
    fn map<S, D>(&self, source: &S, exclude: &[FieldPath]) -> PopulateResult<D>
    where
        S: Convertible,
        D: Convertible<Output = D>,
        Self: Sized,
    {
        let source = to_document(source)?;
        let mapped = self.map_document(&source, exclude)?;
        from_document::<D>(mapped)
    }
}

/// The default [ShapeMapper]: a structural copy through the document form.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentShapeMapper;

impl ShapeMapper for DocumentShapeMapper {
    fn map_document(&self, source: &Document, exclude: &[FieldPath]) -> PopulateResult<Document> {
        let mut mapped = source.clone();
        for path in exclude {
            reset(&mut mapped, path.segments());
        }
        Ok(mapped)
    }
}

fn reset(document: &mut Document, segments: &[String]) {
    match segments {
        [] => {}
        [leaf] => {
            if let Some(value) = document.get_mut(leaf) {
                *value = Value::Null;
            }
        }
        [head, rest @ ..] => {
            if let Some(Value::Document(nested)) = document.get_mut(head) {
                reset(nested, rest);
            }
        }
    }
}

/// Converts an entity or projection into its document form.
pub(crate) fn to_document<S: Convertible>(source: &S) -> PopulateResult<Document> {
    let value = source.to_value().map_err(|e| {
        log::error!("Failed to convert {} into a document: {}", std::any::type_name::<S>(), e);
        PopulateError::new_with_cause(
            &format!("Failed to convert {} into a document", std::any::type_name::<S>()),
            ErrorKind::ConfigurationError,
            e,
        )
    })?;

    match value {
        Value::Document(document) => Ok(document),
        other => {
            log::error!(
                "{} maps to {}, expected a document",
                std::any::type_name::<S>(),
                other.type_name()
            );
            Err(PopulateError::new(
                &format!(
                    "{} maps to {}, expected a document",
                    std::any::type_name::<S>(),
                    other.type_name()
                ),
                ErrorKind::ConfigurationError,
            ))
        }
    }
}

/// Builds `D` from a mapped or populated document.
pub(crate) fn from_document<D>(document: Document) -> PopulateResult<D>
where
    D: Convertible<Output = D>,
{
    D::from_value(&Value::Document(document)).map_err(|e| {
        log::error!("Cannot build {} from the mapped fields: {}", std::any::type_name::<D>(), e);
        PopulateError::new_with_cause(
            &format!("Cannot build {} from the mapped fields", std::any::type_name::<D>()),
            ErrorKind::ConfigurationError,
            e,
        )
    })
}
