use crate::models::{Book, BookView, NumberedView, Order, OrderView, TitleView};
use populate::common::Value;
use populate::doc;
use populate::errors::ErrorKind;
use populate::populate::{PopulateEngine, PopulateOptions, PopulatePlan};
use populate::store::Database;
use populate_int_test::test_util::{cleanup, create_test_context, run_test, FailingDatabase};

#[test]
fn test_null_intermediate_segment_is_broken_path() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let order = Order { id: 1, shipping: None };
            let options = PopulateOptions::new("shipping.customer", "customers", "_id");

            let result: Result<OrderView, _> = engine.populate(&order, &options);
            assert_eq!(result.err().map(|e| e.kind().clone()), Some(ErrorKind::BrokenPath));
            assert_eq!(ctx.counter().query_count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_broken_path_stops_later_hops() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let options = PopulateOptions::new("author", "authors", "_id")
                .then(PopulateOptions::new("order.customer", "customers", "_id"))
                .then(PopulateOptions::new("editor", "authors", "_id"));
            let plan = PopulatePlan::compile(&options)?;
            let source = doc! { _id: 1, author: 7, order: (Value::Null), editor: 8 };

            let err = engine.populate_document(&source, &plan).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::BrokenPath));
            // only the first hop ran
            assert_eq!(ctx.counter().queries(), vec!["authors: (_id == 7)".to_string()]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_scalar_intermediate_segment_is_broken_path() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let plan = PopulatePlan::compile(&PopulateOptions::new("order.customer", "customers", "_id"))?;
            let source = doc! { _id: 1, order: 5 };

            let err = engine.populate_document(&source, &plan).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::BrokenPath));
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_missing_leaf_is_unknown_field() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());

            let result: Result<TitleView, _> =
                engine.populate(&Book::new(1, "Dune", 7), &PopulateOptions::new("author", "authors", "_id"));
            assert_eq!(result.err().map(|e| e.kind().clone()), Some(ErrorKind::UnknownField));

            let plan = PopulatePlan::compile(&PopulateOptions::new("order.customer", "customers", "_id"))?;
            let err = engine.populate_document(&doc! { _id: 1, order: { number: 3 } }, &plan).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::UnknownField));

            assert_eq!(ctx.counter().query_count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_lookup_failure_is_propagated_unchanged() {
    run_test(
        || create_test_context(),
        |ctx| {
            let db = Database::new(FailingDatabase::new(ctx.store(), "authors"));
            let engine = PopulateEngine::new(db);

            let result: Result<BookView, _> =
                engine.populate(&Book::new(1, "Dune", 7), &PopulateOptions::new("author", "authors", "_id"));
            let err = result.err();
            assert_eq!(err.as_ref().map(|e| e.kind().clone()), Some(ErrorKind::LookupFailure));
            assert_eq!(err.as_ref().map(|e| e.message()), Some(FailingDatabase::MESSAGE));
            assert!(err.as_ref().and_then(|e| e.cause()).is_none());
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_lookup_failure_on_later_hop() {
    run_test(
        || create_test_context(),
        |ctx| {
            let db = Database::new(FailingDatabase::new(ctx.store(), "customers"));
            let engine = PopulateEngine::new(db);
            let options = PopulateOptions::new("author", "authors", "_id")
                .then(PopulateOptions::new("buyer", "customers", "_id"));
            let plan = PopulatePlan::compile(&options)?;

            let err = engine
                .populate_document(&doc! { _id: 1, author: 7, buyer: "c1" }, &plan)
                .err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::LookupFailure));
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_unmappable_destination_is_configuration_error() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());

            let result: Result<NumberedView, _> =
                engine.populate(&Book::new(1, "Dune", 7), &PopulateOptions::new("author", "authors", "_id"));
            let err = result.err();
            assert_eq!(err.as_ref().map(|e| e.kind().clone()), Some(ErrorKind::ConfigurationError));
            assert!(err.as_ref().and_then(|e| e.cause()).is_some());
            assert_eq!(ctx.counter().query_count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_invalid_options_are_rejected_before_mapping() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let book = Book::new(1, "Dune", 7);

            for options in [
                PopulateOptions::new("", "authors", "_id"),
                PopulateOptions::new("author..name", "authors", "_id"),
                PopulateOptions::new("author", "", "_id"),
                PopulateOptions::new("author", "authors", " "),
                PopulateOptions::new("author", "authors", "_id").then(PopulateOptions::new("editor", "", "_id")),
            ] {
                let result: Result<BookView, _> = engine.populate(&book, &options);
                assert_eq!(result.err().map(|e| e.kind().clone()), Some(ErrorKind::InvalidPlan));
            }
            assert_eq!(ctx.counter().query_count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}
