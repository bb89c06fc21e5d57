use crate::models::{Book, BookView, Order, OrderView, Shipping, TypedBookView};
use populate::common::Value;
use populate::errors::ErrorKind;
use populate::filter::{all, field};
use populate::populate::PopulateOptions;
use populate::repository::Repository;
use populate_int_test::test_util::{cleanup, create_test_context, run_test};

fn author_options() -> PopulateOptions {
    PopulateOptions::new("author", "authors", "_id")
}

#[test]
fn test_populate_entity() {
    run_test(
        || create_test_context(),
        |ctx| {
            let repo: Repository<Book> = Repository::new(ctx.db())?;
            let view: TypedBookView = repo.populate(&Book::new(1, "Dune", 7), &author_options())?;

            let authors = view.author.into_resolved();
            assert_eq!(authors.len(), 1);
            assert_eq!(authors[0].name, "Frank Herbert");
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_populate_by_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            let repo: Repository<Book> = Repository::new(ctx.db())?;
            repo.insert(&Book::new(2, "Solaris", 8))?;

            let view: Option<BookView> = repo.populate_by_id(2, &author_options())?;
            let view = view.unwrap_or_default();
            assert_eq!(view.title, "Solaris");
            assert_eq!(view.author[0].get("name")?, Value::from("Stanislaw Lem"));

            let missing: Option<BookView> = repo.populate_by_id(5, &author_options())?;
            assert!(missing.is_none());
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_find_populated() {
    run_test(
        || create_test_context(),
        |ctx| {
            let repo: Repository<Book> = Repository::new(ctx.db())?;
            repo.insert_many(&[Book::new(1, "Dune", 7), Book::new(2, "Solaris", 8), Book::new(3, "Lost", 42)])?;
            ctx.counter().reset();

            let views: Vec<BookView> = repo.find_populated(field("id").ne(2), &author_options())?;
            assert_eq!(views.len(), 2);
            assert_eq!(views[0].author.len(), 1);
            assert!(views[1].author.is_empty());
            // the filter query plus one lookup per book
            assert_eq!(ctx.counter().query_count(), 3);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_repository_separator_applies_to_populate() {
    run_test(
        || create_test_context(),
        |ctx| {
            let repo = Repository::<Order>::builder(ctx.db()).field_separator("/").build()?;
            repo.insert(&Order {
                id: 9,
                shipping: Some(Shipping {
                    customer: "c2".to_string(),
                    city: "Bergen".to_string(),
                }),
            })?;

            let options = PopulateOptions::new("shipping/customer", "customers", "_id");
            let views: Vec<OrderView> = repo.find_populated(all(), &options)?;
            let shipping = views.into_iter().next().and_then(|v| v.shipping).unwrap_or_default();
            assert_eq!(shipping.customer.len(), 1);

            // with "/" as separator this names one top-level field, so nothing is excluded and
            // the raw customer key does not fit the view
            let dotted = PopulateOptions::new("shipping.customer", "customers", "_id");
            let err = repo.find_populated::<OrderView>(all(), &dotted).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::ConfigurationError));
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}
