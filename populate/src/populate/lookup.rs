use crate::collection::Document;
use crate::common::Value;
use crate::errors::PopulateResult;
use crate::filter::field;
use crate::populate::{ForeignKey, PopulateHop};
use crate::store::{CollectionProvider, Database, DatabaseProvider};

/// Runs the equality queries behind a hop.
#[derive(Clone)]
pub struct LookupExecutor {
    database: Database,
}

impl LookupExecutor {
    pub fn new(database: Database) -> Self {
        LookupExecutor { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Returns the documents of the hop's target collection whose match field equals `key`,
    /// in collection order. No match is an empty result, not an error. Database errors are
    /// returned as they are.
    pub fn find_many(&self, key: &Value, hop: &PopulateHop) -> PopulateResult<Vec<Document>> {
        let collection = self.database.collection(hop.target_collection())?;
        collection.find(field(hop.target_match_field()).eq(key.clone()))
    }

    /// Looks up every key in order, one query per key, and concatenates the results.
    pub fn resolve(&self, key: &ForeignKey, hop: &PopulateHop) -> PopulateResult<Vec<Document>> {
        let mut documents = Vec::new();
        for key in key.keys() {
            documents.extend(self.find_many(key, hop)?);
        }
        Ok(documents)
    }
}
