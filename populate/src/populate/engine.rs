use crate::collection::Document;
use crate::common::{Convertible, Value};
use crate::errors::PopulateResult;
use crate::populate::mapper::{from_document, to_document};
use crate::populate::{
    DocumentShapeMapper, FieldPath, ForeignKey, LookupExecutor, PathResolver, PopulateOptions,
    PopulatePlan, ShapeMapper,
};
use crate::populate_config::PopulateConfig;
use crate::store::Database;

/// Resolves references between collections for typed entities.
///
/// A populate call maps the entity into the projection type once, with the first hop's field
/// left out, then runs the hops in order. Every hop:
///
/// 1. resolves its path on the projection;
/// 2. reads the foreign key, from the source entity for the first hop (its projection slot
///    was reset by the mapping) and from the projection for the others;
/// 3. looks the key up, once per key for an array of keys;
/// 4. replaces the field with the array of documents found.
///
/// The engine keeps no state between calls and can be shared across threads.
///
/// ```rust,ignore
/// let engine = PopulateEngine::new(db);
/// let options = PopulateOptions::new("author", "authors", "_id");
/// let view: BookView = engine.populate(&book, &options)?;
/// ```
#[derive(Clone)]
pub struct PopulateEngine<M: ShapeMapper = DocumentShapeMapper> {
    lookup: LookupExecutor,
    mapper: M,
    config: PopulateConfig,
}

impl PopulateEngine<DocumentShapeMapper> {
    pub fn new(database: Database) -> Self {
        PopulateEngine::with_mapper(database, DocumentShapeMapper)
    }
}

impl<M: ShapeMapper> PopulateEngine<M> {
    pub fn with_mapper(database: Database, mapper: M) -> Self {
        PopulateEngine {
            lookup: LookupExecutor::new(database),
            mapper,
            config: PopulateConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PopulateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PopulateConfig {
        &self.config
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Compiles `options` with this engine's configuration.
    pub fn plan(&self, options: &PopulateOptions) -> PopulateResult<PopulatePlan> {
        PopulatePlan::compile_with(options, &self.config)
    }

    /// Populates `entity` into a `D` following the descriptor chain `options`.
    ///
    /// # Errors
    ///
    /// * [InvalidPlan](crate::errors::ErrorKind::InvalidPlan) if `options` fails validation.
    /// * [ConfigurationError](crate::errors::ErrorKind::ConfigurationError) if `D` cannot be
    ///   built from the entity or from the populated fields.
    /// * [BrokenPath](crate::errors::ErrorKind::BrokenPath) or
    ///   [UnknownField](crate::errors::ErrorKind::UnknownField) if a hop's path does not
    ///   resolve on the projection. Later hops are not attempted.
    /// * Any error of the database, usually
    ///   [LookupFailure](crate::errors::ErrorKind::LookupFailure), unchanged.
    pub fn populate<S, D>(&self, entity: &S, options: &PopulateOptions) -> PopulateResult<D>
    where
        S: Convertible,
        D: Convertible<Output = D>,
    {
        let plan = self.plan(options)?;
        self.execute(entity, &plan)
    }

    /// Populates `entity` with an already compiled plan.
    pub fn execute<S, D>(&self, entity: &S, plan: &PopulatePlan) -> PopulateResult<D>
    where
        S: Convertible,
        D: Convertible<Output = D>,
    {
        let source = to_document(entity)?;
        let mapped = self.mapper.map_document(&source, &excluded(plan))?;
        // round trip through D so the projection has exactly D's fields
        let projection: D = from_document(mapped)?;
        let mut projection = to_document(&projection)?;

        self.run_hops(&source, &mut projection, plan)?;
        from_document(projection)
    }

    /// Populates every entity with one compiled plan, stopping at the first failure.
    pub fn populate_all<S, D>(&self, entities: &[S], options: &PopulateOptions) -> PopulateResult<Vec<D>>
    where
        S: Convertible,
        D: Convertible<Output = D>,
    {
        let plan = self.plan(options)?;
        entities
            .iter()
            .map(|entity| self.execute(entity, &plan))
            .collect()
    }

    /// Runs `plan` on a schemaless document. The result has the fields of `source`.
    pub fn populate_document(&self, source: &Document, plan: &PopulatePlan) -> PopulateResult<Document> {
        let mut projection = self.mapper.map_document(source, &excluded(plan))?;
        self.run_hops(source, &mut projection, plan)?;
        Ok(projection)
    }

    fn run_hops(
        &self,
        source: &Document,
        projection: &mut Document,
        plan: &PopulatePlan,
    ) -> PopulateResult<()> {
        for (index, hop) in plan.hops().iter().enumerate() {
            let mut field = PathResolver::resolve(projection, hop.path())?;
            let raw = if index == 0 {
                PathResolver::find(source, hop.path())
                    .cloned()
                    .unwrap_or_default()
            } else {
                field.get()
            };

            let key = ForeignKey::from(raw);
            let documents = self.lookup.resolve(&key, hop)?;
            log::debug!(
                "Hop {} ({}) resolved {} key(s) into {} document(s)",
                index,
                hop,
                key.len(),
                documents.len()
            );

            field.set(Value::Array(
                documents.into_iter().map(Value::Document).collect(),
            ));
        }
        Ok(())
    }
}

// only the first hop's field is left out of the mapping
fn excluded(plan: &PopulatePlan) -> Vec<FieldPath> {
    plan.first().map(|hop| hop.path().clone()).into_iter().collect()
}
