use crate::models::{Anthology, AnthologyView};
use populate::collection::Document;
use populate::common::{from_value, Value};
use populate::doc;
use populate::populate::{PopulateEngine, PopulateOptions, PopulatePlan};
use populate_int_test::test_util::{cleanup, create_test_context, run_test};

fn authors_options() -> PopulateOptions {
    PopulateOptions::new("authors", "authors", "_id")
}

fn anthology(authors: Vec<i64>) -> Anthology {
    Anthology {
        id: 10,
        title: "Collected Stories".to_string(),
        authors,
    }
}

fn names(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .filter_map(|doc| doc.get("name").ok())
        .filter_map(|name| name.as_string().cloned())
        .collect()
}

#[test]
fn test_results_are_concatenated_in_key_order() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let view: AnthologyView = engine.populate(&anthology(vec![8, 7]), &authors_options())?;

            assert_eq!(view.id, 10);
            assert_eq!(view.title, "Collected Stories");
            assert_eq!(names(&view.authors), vec!["Stanislaw Lem", "Frank Herbert"]);
            assert_eq!(
                ctx.counter().queries(),
                vec!["authors: (_id == 8)".to_string(), "authors: (_id == 7)".to_string()]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_each_key_is_looked_up_separately() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let view: AnthologyView = engine.populate(&anthology(vec![7, 99, 9]), &authors_options())?;

            assert_eq!(names(&view.authors), vec!["Frank Herbert", "Ursula K. Le Guin"]);
            assert_eq!(ctx.counter().query_count(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_repeated_keys_repeat_results() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let view: AnthologyView = engine.populate(&anthology(vec![7, 7]), &authors_options())?;

            assert_eq!(names(&view.authors), vec!["Frank Herbert", "Frank Herbert"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_empty_key_list_issues_no_query() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let view: AnthologyView = engine.populate(&anthology(vec![]), &authors_options())?;

            assert!(view.authors.is_empty());
            assert_eq!(ctx.counter().query_count(), 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_plural_key_with_many_matches_per_key() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let plan = PopulatePlan::compile(&PopulateOptions::new("reviews", "reviews", "book"))?;
            let shelf = doc! { _id: "shelf-1", reviews: [2, 1] };

            let populated = engine.populate_document(&shelf, &plan)?;
            let reviews = from_value::<Vec<Document>>(&populated.get("reviews")?)?;
            let ids: Vec<Value> = reviews.iter().filter_map(|r| r.id().cloned()).collect();
            assert_eq!(ids, vec![Value::I32(3), Value::I32(1), Value::I32(2)]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_populate_all() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let anthologies = vec![anthology(vec![7]), anthology(vec![8, 9]), anthology(vec![])];

            let views: Vec<AnthologyView> = engine.populate_all(&anthologies, &authors_options())?;
            assert_eq!(views.len(), 3);
            assert_eq!(names(&views[0].authors), vec!["Frank Herbert"]);
            assert_eq!(names(&views[1].authors), vec!["Stanislaw Lem", "Ursula K. Le Guin"]);
            assert!(views[2].authors.is_empty());
            assert_eq!(ctx.counter().query_count(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}
