use crate::models::{
    Author, EditedBook, EditedBookView, Order, OrderView, Shipping, StrictEditedBookView,
};
use populate::collection::Document;
use populate::common::{from_value, Value};
use populate::doc;
use populate::errors::ErrorKind;
use populate::populate::{PopulateEngine, PopulateOptions, PopulatePlan};
use populate::populate_config::PopulateConfig;
use populate_int_test::test_util::{cleanup, create_test_context, run_test};

fn edited_book() -> EditedBook {
    EditedBook {
        id: 1,
        title: "Dune".to_string(),
        author: 7,
        editor: 8,
    }
}

fn author_then_editor() -> PopulateOptions {
    PopulateOptions::new("author", "authors", "_id")
        .then(PopulateOptions::new("editor", "authors", "_id"))
}

#[test]
fn test_two_hop_chain() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let view: EditedBookView = engine.populate(&edited_book(), &author_then_editor())?;

            assert_eq!(view.author, vec![doc! { _id: 7, name: "Frank Herbert", publisher: 100 }]);
            assert_eq!(
                view.editor.into_resolved(),
                vec![Author {
                    name: "Stanislaw Lem".to_string(),
                    publisher: 101,
                }]
            );
            assert_eq!(
                ctx.counter().queries(),
                vec!["authors: (_id == 7)".to_string(), "authors: (_id == 8)".to_string()]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_only_first_hop_field_is_excluded_from_mapping() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());

            // `editor` is copied with its raw key, which a sequence field cannot hold
            let result: Result<StrictEditedBookView, _> =
                engine.populate(&edited_book(), &author_then_editor());
            let err = result.err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::ConfigurationError));
            assert_eq!(ctx.counter().query_count(), 0);

            // with `editor` first, `author` is the field copied raw
            let swapped = PopulateOptions::new("editor", "authors", "_id")
                .then(PopulateOptions::new("author", "authors", "_id"));
            let result: Result<StrictEditedBookView, _> = engine.populate(&edited_book(), &swapped);
            assert_eq!(result.err().map(|e| e.kind().clone()), Some(ErrorKind::ConfigurationError));
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_one_query_per_key_across_hops() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let options = PopulateOptions::new("authors", "authors", "_id")
                .then(PopulateOptions::new("editor", "authors", "_id"))
                .then(PopulateOptions::new("publisher", "publishers", "_id"));
            let plan = PopulatePlan::compile(&options)?;
            assert_eq!(plan.len(), 3);

            let source = doc! { _id: 1, authors: [8, 7], editor: 9, publisher: 101 };
            let populated = engine.populate_document(&source, &plan)?;

            assert_eq!(ctx.counter().query_count(), 4);
            assert_eq!(from_value::<Vec<Document>>(&populated.get("authors")?)?.len(), 2);
            assert_eq!(from_value::<Vec<Document>>(&populated.get("editor")?)?.len(), 1);
            assert_eq!(
                from_value::<Vec<Document>>(&populated.get("publisher")?)?,
                vec![doc! { _id: 101, name: "Wydawnictwo Literackie", city: "Krakow" }]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_nested_path() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let order = Order {
                id: 42,
                shipping: Some(Shipping {
                    customer: "c1".to_string(),
                    city: "Paris".to_string(),
                }),
            };
            let options = PopulateOptions::new("shipping.customer", "customers", "_id");

            let view: OrderView = engine.populate(&order, &options)?;
            let shipping = view.shipping.unwrap_or_default();
            assert_eq!(shipping.city, "Paris");
            assert_eq!(shipping.customer, vec![doc! { _id: "c1", name: "Alice", tier: "gold" }]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_nested_hop_after_top_level_hop() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let options = PopulateOptions::new("author", "authors", "_id")
                .then(PopulateOptions::new("order.customer", "customers", "_id"));
            let plan = PopulatePlan::compile(&options)?;
            let source = doc! { _id: 1, author: 8, order: { number: 5, customer: "c2" } };

            let populated = engine.populate_document(&source, &plan)?;
            assert_eq!(populated.get("order.number")?, Value::I32(5));
            let customers = from_value::<Vec<Document>>(&populated.get("order.customer")?)?;
            assert_eq!(customers[0].get("name")?, Value::from("Bob"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_custom_field_separator() {
    run_test(
        || create_test_context(),
        |ctx| {
            let mut config = PopulateConfig::default();
            config.set_field_separator("/")?;
            let engine = PopulateEngine::new(ctx.db()).with_config(config);
            let order = Order {
                id: 7,
                shipping: Some(Shipping {
                    customer: "c2".to_string(),
                    city: "Oslo".to_string(),
                }),
            };

            let options = PopulateOptions::new("shipping/customer", "customers", "_id");
            let view: OrderView = engine.populate(&order, &options)?;
            let shipping = view.shipping.unwrap_or_default();
            assert_eq!(shipping.customer.len(), 1);
            assert_eq!(shipping.customer[0].get("tier")?, Value::from("silver"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}
