use populate::collection::Document;
use populate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use populate::doc;
use populate::errors::{ErrorKind, PopulateError, PopulateResult};
use populate::filter::Filter;
use populate::store::{
    CollectionProvider, Database, DatabaseProvider, DocumentCollection, WriteResult,
};
use std::backtrace::Backtrace;

/// Runs a test between a setup and a teardown step. The teardown also runs when the test
/// fails, and a failure of any step panics with its error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> PopulateResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> PopulateResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> PopulateResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => after(ctx).map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    match result {
        Ok(Ok(_)) => {}
        Ok(Err((e, bt))) => {
            if !bt.is_empty() && !bt.contains("disabled") {
                eprintln!("\nBacktrace:\n{}", bt);
            }
            panic!("{}", e);
        }
        Err(panic_err) => std::panic::resume_unwind(panic_err),
    }
}

/// The databases a test works with. `db` is the counting view over `store`, so every
/// lookup made through it is recorded.
#[derive(Clone)]
pub struct TestContext {
    store: Database,
    counter: CountingDatabase,
    db: Database,
}

impl TestContext {
    pub fn new(store: Database) -> Self {
        let counter = CountingDatabase::new(store.clone());
        let db = Database::new(counter.clone());
        Self { store, counter, db }
    }

    pub fn db(&self) -> Database {
        self.db.clone()
    }

    /// The underlying store, bypassing the query counter.
    pub fn store(&self) -> Database {
        self.store.clone()
    }

    pub fn counter(&self) -> &CountingDatabase {
        &self.counter
    }
}

/// A fresh in-memory database seeded with [seed_library].
pub fn create_test_context() -> PopulateResult<TestContext> {
    let store = Database::in_memory();
    seed_library(&store)?;
    Ok(TestContext::new(store))
}

pub fn cleanup(ctx: TestContext) -> PopulateResult<()> {
    let store = ctx.store();
    for name in store.collection_names()? {
        store.drop_collection(&name)?;
    }
    Ok(())
}

/// Authors, publishers, reviews and customers shared by the integration tests.
pub fn seed_library(db: &Database) -> PopulateResult<()> {
    db.collection("publishers")?.insert_many(vec![
        doc! { _id: 100, name: "Chilton Books", city: "Philadelphia" },
        doc! { _id: 101, name: "Wydawnictwo Literackie", city: "Krakow" },
    ])?;
    db.collection("authors")?.insert_many(vec![
        doc! { _id: 7, name: "Frank Herbert", publisher: 100 },
        doc! { _id: 8, name: "Stanislaw Lem", publisher: 101 },
        doc! { _id: 9, name: "Ursula K. Le Guin", publisher: 100 },
    ])?;
    db.collection("reviews")?.insert_many(vec![
        doc! { _id: 1, book: 1, stars: 5, text: "A classic" },
        doc! { _id: 2, book: 1, stars: 4, text: "Dense but rewarding" },
        doc! { _id: 3, book: 2, stars: 3, text: "Strange" },
        doc! { _id: 4, book: 3, stars: 5, text: "Wonderful" },
    ])?;
    db.collection("customers")?.insert_many(vec![
        doc! { _id: "c1", name: "Alice", tier: "gold" },
        doc! { _id: "c2", name: "Bob", tier: "silver" },
    ])?;
    Ok(())
}

/// A database recording every `find` issued through the collections it opens.
#[derive(Clone)]
pub struct CountingDatabase {
    inner: Database,
    queries: Atomic<Vec<String>>,
}

impl CountingDatabase {
    pub fn new(inner: Database) -> Self {
        CountingDatabase {
            inner,
            queries: atomic(Vec::new()),
        }
    }

    /// Queries issued so far, as `collection: filter`.
    pub fn queries(&self) -> Vec<String> {
        self.queries.read_with(|queries| queries.clone())
    }

    pub fn query_count(&self) -> usize {
        self.queries.read_with(|queries| queries.len())
    }

    pub fn reset(&self) {
        self.queries.write_with(|queries| queries.clear());
    }
}

impl DatabaseProvider for CountingDatabase {
    fn collection(&self, name: &str) -> PopulateResult<DocumentCollection> {
        let inner = self.inner.collection(name)?;
        Ok(DocumentCollection::new(CountingCollection {
            inner,
            queries: self.queries.clone(),
        }))
    }

    fn collection_names(&self) -> PopulateResult<Vec<String>> {
        self.inner.collection_names()
    }

    fn drop_collection(&self, name: &str) -> PopulateResult<()> {
        self.inner.drop_collection(name)
    }
}

struct CountingCollection {
    inner: DocumentCollection,
    queries: Atomic<Vec<String>>,
}

impl CollectionProvider for CountingCollection {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn find(&self, filter: Filter) -> PopulateResult<Vec<Document>> {
        let query = format!("{}: {}", self.inner.name(), filter);
        self.queries.write_with(|queries| queries.push(query));
        self.inner.find(filter)
    }

    fn insert(&self, document: Document) -> PopulateResult<WriteResult> {
        self.inner.insert(document)
    }

    fn update(&self, filter: Filter, update: &Document) -> PopulateResult<WriteResult> {
        self.inner.update(filter, update)
    }

    fn remove(&self, filter: Filter) -> PopulateResult<WriteResult> {
        self.inner.remove(filter)
    }
}

/// A database whose queries on one collection always fail, as an unreachable backend would.
pub struct FailingDatabase {
    inner: Database,
    failing: String,
}

impl FailingDatabase {
    pub const MESSAGE: &'static str = "connection refused by backend";

    pub fn new(inner: Database, failing: &str) -> Self {
        FailingDatabase {
            inner,
            failing: failing.to_string(),
        }
    }
}

impl DatabaseProvider for FailingDatabase {
    fn collection(&self, name: &str) -> PopulateResult<DocumentCollection> {
        if name == self.failing {
            Ok(DocumentCollection::new(FailingCollection {
                name: name.to_string(),
            }))
        } else {
            self.inner.collection(name)
        }
    }

    fn collection_names(&self) -> PopulateResult<Vec<String>> {
        self.inner.collection_names()
    }

    fn drop_collection(&self, name: &str) -> PopulateResult<()> {
        self.inner.drop_collection(name)
    }
}

struct FailingCollection {
    name: String,
}

impl FailingCollection {
    fn failure<T>(&self) -> PopulateResult<T> {
        log::error!("Query on {} failed: {}", self.name, FailingDatabase::MESSAGE);
        Err(PopulateError::new(FailingDatabase::MESSAGE, ErrorKind::LookupFailure))
    }
}

impl CollectionProvider for FailingCollection {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn find(&self, _filter: Filter) -> PopulateResult<Vec<Document>> {
        self.failure()
    }

    fn insert(&self, _document: Document) -> PopulateResult<WriteResult> {
        self.failure()
    }

    fn update(&self, _filter: Filter, _update: &Document) -> PopulateResult<WriteResult> {
        self.failure()
    }

    fn remove(&self, _filter: Filter) -> PopulateResult<WriteResult> {
        self.failure()
    }
}
