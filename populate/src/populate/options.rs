use crate::errors::{ErrorKind, PopulateError, PopulateResult};
use crate::populate::FieldPath;
use crate::populate_config::PopulateConfig;
use std::fmt::{Display, Formatter};

/// Describes one hop of population and, through [PopulateOptions::then], the hops after it.
///
/// * `field_path` - the field of the projection holding the foreign key(s), e.g. `author`
///   or `order.customer`.
/// * `target_collection` - the collection to look the keys up in.
/// * `target_match_field` - the field of the target documents that must equal a key. It may
///   be a dotted path into the target documents.
///
/// Each descriptor owns the next one, so a chain can never loop back on itself.
///
/// ```rust,ignore
/// let options = PopulateOptions::new("author", "authors", "_id")
///     .then(PopulateOptions::new("publisher", "publishers", "_id"));
/// assert_eq!(options.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulateOptions {
    field_path: String,
    target_collection: String,
    target_match_field: String,
    next: Option<Box<PopulateOptions>>,
}

impl PopulateOptions {
    pub fn new(field_path: &str, target_collection: &str, target_match_field: &str) -> Self {
        PopulateOptions {
            field_path: field_path.to_string(),
            target_collection: target_collection.to_string(),
            target_match_field: target_match_field.to_string(),
            next: None,
        }
    }

    /// Appends `next` at the end of the chain.
    pub fn then(mut self, next: PopulateOptions) -> Self {
        let mut tail = &mut self.next;
        while let Some(node) = tail {
            tail = &mut node.next;
        }
        *tail = Some(Box::new(next));
        self
    }

    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    pub fn target_collection(&self) -> &str {
        &self.target_collection
    }

    pub fn target_match_field(&self) -> &str {
        &self.target_match_field
    }

    pub fn next(&self) -> Option<&PopulateOptions> {
        self.next.as_deref()
    }

    /// Iterates the chain starting with this descriptor.
    pub fn iter(&self) -> impl Iterator<Item = &PopulateOptions> {
        std::iter::successors(Some(self), |options| options.next())
    }

    /// Number of hops in the chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

/// One validated hop of a [PopulatePlan].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulateHop {
    path: FieldPath,
    target_collection: String,
    target_match_field: String,
}

impl PopulateHop {
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn target_collection(&self) -> &str {
        &self.target_collection
    }

    pub fn target_match_field(&self) -> &str {
        &self.target_match_field
    }
}

impl Display for PopulateHop {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}.{}",
            self.path, self.target_collection, self.target_match_field
        )
    }
}

/// A descriptor chain flattened into an ordered list of validated hops.
///
/// Plans are built per request and never change once compiled. One plan can be executed for
/// any number of entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulatePlan {
    hops: Vec<PopulateHop>,
}

impl PopulatePlan {
    /// Compiles `options` with the default `.` separator.
    pub fn compile(options: &PopulateOptions) -> PopulateResult<PopulatePlan> {
        Self::compile_with(options, &PopulateConfig::default())
    }

    /// Compiles `options`, splitting paths with the separator of `config`.
    ///
    /// # Errors
    ///
    /// [ErrorKind::InvalidPlan] if a hop has an empty path, an empty path segment, an empty
    /// target collection or an empty match field.
    pub fn compile_with(
        options: &PopulateOptions,
        config: &PopulateConfig,
    ) -> PopulateResult<PopulatePlan> {
        let mut hops = Vec::with_capacity(options.len());
        for (index, hop) in options.iter().enumerate() {
            let path = FieldPath::parse_with(hop.field_path(), config.field_separator())?;

            if hop.target_collection().trim().is_empty() {
                log::error!("Hop {} ({}) has no target collection", index, path);
                return Err(PopulateError::new(
                    &format!("Hop {} ({}) has no target collection", index, path),
                    ErrorKind::InvalidPlan,
                ));
            }

            if hop.target_match_field().trim().is_empty() {
                log::error!("Hop {} ({}) has no target match field", index, path);
                return Err(PopulateError::new(
                    &format!("Hop {} ({}) has no target match field", index, path),
                    ErrorKind::InvalidPlan,
                ));
            }

            hops.push(PopulateHop {
                path,
                target_collection: hop.target_collection().to_string(),
                target_match_field: hop.target_match_field().to_string(),
            });
        }
        Ok(PopulatePlan { hops })
    }

    pub fn hops(&self) -> &[PopulateHop] {
        &self.hops
    }

    /// The hop whose field is left out of the initial mapping.
    pub fn first(&self) -> Option<&PopulateHop> {
        self.hops.first()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}
