use crate::models::{Author, Book, BookView, TypedBookView};
use populate::collection::Document;
use populate::common::{from_value, Value};
use populate::doc;
use populate::populate::{PopulateEngine, PopulateOptions, PopulatePlan};
use populate_int_test::test_util::{cleanup, create_test_context, run_test};

fn author_options() -> PopulateOptions {
    PopulateOptions::new("author", "authors", "_id")
}

#[test]
fn test_book_author_is_replaced_by_documents() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let view: BookView = engine.populate(&Book::new(1, "Dune", 7), &author_options())?;

            assert_eq!(
                view,
                BookView {
                    id: 1,
                    title: "Dune".to_string(),
                    author: vec![doc! { _id: 7, name: "Frank Herbert", publisher: 100 }],
                }
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_other_fields_are_copied() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let book = Book::new(2, "Solaris", 8);
            let view: TypedBookView = engine.populate(&book, &author_options())?;

            assert_eq!(view.id, book.id);
            assert_eq!(view.title, book.title);
            assert_eq!(
                view.author.resolved(),
                Some(
                    &[Author {
                        name: "Stanislaw Lem".to_string(),
                        publisher: 101,
                    }][..]
                )
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_single_hop_issues_one_query() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let _: BookView = engine.populate(&Book::new(1, "Dune", 7), &author_options())?;

            assert_eq!(ctx.counter().queries(), vec!["authors: (_id == 7)".to_string()]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_no_match_gives_empty_sequence() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let view: BookView = engine.populate(&Book::new(3, "Unknown", 99), &author_options())?;

            assert!(view.author.is_empty());
            assert_eq!(ctx.counter().query_count(), 1);

            let typed: TypedBookView = engine.populate(&Book::new(3, "Unknown", 99), &author_options())?;
            assert!(typed.author.is_resolved());
            assert!(typed.author.into_resolved().is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_populate_is_idempotent() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let book = Book::new(1, "Dune", 7);

            let first: BookView = engine.populate(&book, &author_options())?;
            let second: BookView = engine.populate(&book, &author_options())?;
            assert_eq!(first, second);
            // no caching between calls
            assert_eq!(ctx.counter().query_count(), 2);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_null_key_matches_nothing() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let plan = PopulatePlan::compile(&author_options())?;
            let source = doc! { id: 4, title: "Anonymous", author: (Value::Null) };

            let populated = engine.populate_document(&source, &plan)?;
            assert_eq!(populated.get("author")?, Value::Array(vec![]));
            assert_eq!(populated.get("title")?, Value::from("Anonymous"));
            assert_eq!(ctx.counter().query_count(), 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_match_on_non_key_field() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let plan = PopulatePlan::compile(&PopulateOptions::new("reviews", "reviews", "book"))?;
            let source = doc! { _id: 1, title: "Dune", reviews: 1 };

            let populated = engine.populate_document(&source, &plan)?;
            let reviews = from_value::<Vec<Document>>(&populated.get("reviews")?)?;
            assert_eq!(reviews.len(), 2);
            assert_eq!(reviews[0].get("stars")?, Value::I32(5));
            assert_eq!(reviews[1].get("stars")?, Value::I32(4));

            // the source document is left alone
            assert_eq!(source.get("reviews")?, Value::I32(1));
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}
