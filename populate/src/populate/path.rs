use crate::collection::Document;
use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, PopulateError, PopulateResult};
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

/// A populate path split into its segments.
///
/// A path has at least one segment and no segment is empty. Every segment but the last must
/// name an embedded document at runtime; the last one names the field to populate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[String; 4]>,
    separator: String,
}

impl FieldPath {
    /// Parses a `.` separated path.
    pub fn parse(path: &str) -> PopulateResult<FieldPath> {
        Self::parse_with(path, FIELD_SEPARATOR)
    }

    /// Parses a path separated by `separator`.
    pub fn parse_with(path: &str, separator: &str) -> PopulateResult<FieldPath> {
        if path.is_empty() {
            log::error!("Populate path cannot be empty");
            return Err(PopulateError::new(
                "Populate path cannot be empty",
                ErrorKind::InvalidPlan,
            ));
        }

        let segments: SmallVec<[String; 4]> =
            path.split(separator).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            log::error!("Populate path {} has an empty segment", path);
            return Err(PopulateError::new(
                &format!("Populate path {} has an empty segment", path),
                ErrorKind::InvalidPlan,
            ));
        }

        Ok(FieldPath {
            segments,
            separator: separator.to_string(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The separator the path was parsed with.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The segments leading to the parent of the leaf.
    pub fn parent_segments(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The field to populate.
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Number of embedded documents crossed before the leaf. A field of the root has depth 0.
    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join(&self.separator))
    }
}

/// A handle on one field of a document, obtained from [PathResolver::resolve].
///
/// The field exists on its parent when the handle is created.
pub struct FieldRef<'a> {
    parent: &'a mut Document,
    name: String,
}

impl<'a> FieldRef<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value of the field.
    pub fn get(&self) -> Value {
        self.parent.get_raw(&self.name).cloned().unwrap_or_default()
    }

    /// Replaces the value of the field.
    pub fn set(&mut self, value: Value) {
        self.parent.put_raw(&self.name, value);
    }

    /// Moves the value out of the field, leaving null behind.
    pub fn take(&mut self) -> Value {
        match self.parent.get_mut(&self.name) {
            Some(value) => value.take(),
            None => Value::Null,
        }
    }

    /// The document holding the field.
    pub fn parent(&self) -> &Document {
        &*self.parent
    }

    pub fn parent_mut(&mut self) -> &mut Document {
        &mut *self.parent
    }
}

/// Walks a [FieldPath] through embedded documents.
pub struct PathResolver;

impl PathResolver {
    /// Resolves `path` on `root` into a handle on its leaf field.
    ///
    /// # Errors
    ///
    /// * [ErrorKind::BrokenPath] if a segment before the leaf is absent, null, or holds
    ///   anything other than a document.
    /// * [ErrorKind::UnknownField] if the leaf is not a field of its parent.
    pub fn resolve<'a>(root: &'a mut Document, path: &FieldPath) -> PopulateResult<FieldRef<'a>> {
        let mut current = root;
        for (depth, segment) in path.parent_segments().iter().enumerate() {
            current = match current.get_mut(segment) {
                Some(Value::Document(doc)) => doc,
                Some(Value::Null) | None => return Err(broken_path(path, depth, "null or absent")),
                Some(other) => {
                    let kind = other.type_name();
                    return Err(broken_path(path, depth, kind));
                }
            };
        }

        let leaf = path.leaf();
        if !current.contains_key(leaf) {
            log::error!("Field {} of {} does not exist", leaf, path);
            return Err(PopulateError::new(
                &format!("Field {} of {} does not exist", leaf, path),
                ErrorKind::UnknownField,
            ));
        }

        Ok(FieldRef {
            parent: current,
            name: leaf.to_string(),
        })
    }

    /// Reads the value at `path` with the same rules as [PathResolver::resolve].
    pub fn read(root: &Document, path: &FieldPath) -> PopulateResult<Value> {
        let mut current = root;
        for (depth, segment) in path.parent_segments().iter().enumerate() {
            current = match current.get_raw(segment) {
                Some(Value::Document(doc)) => doc,
                Some(Value::Null) | None => return Err(broken_path(path, depth, "null or absent")),
                Some(other) => return Err(broken_path(path, depth, other.type_name())),
            };
        }

        match current.get_raw(path.leaf()) {
            Some(value) => Ok(value.clone()),
            None => {
                log::error!("Field {} of {} does not exist", path.leaf(), path);
                Err(PopulateError::new(
                    &format!("Field {} of {} does not exist", path.leaf(), path),
                    ErrorKind::UnknownField,
                ))
            }
        }
    }

    /// Borrows the value at `path`, or `None` wherever [PathResolver::read] would fail.
    pub fn find<'a>(root: &'a Document, path: &FieldPath) -> Option<&'a Value> {
        let mut current = root;
        for segment in path.parent_segments() {
            current = current.get_raw(segment)?.as_document()?;
        }
        current.get_raw(path.leaf())
    }
}

fn broken_path(path: &FieldPath, depth: usize, found: &str) -> PopulateError {
    let segment = &path.segments()[depth];
    log::error!(
        "Segment {} of {} is {}, expected a document",
        segment,
        path,
        found
    );
    PopulateError::new(
        &format!(
            "Segment {} of {} is {}, expected a document",
            segment, path, found
        ),
        ErrorKind::BrokenPath,
    )
}
