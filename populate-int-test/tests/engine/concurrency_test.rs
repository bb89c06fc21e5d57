use crate::models::{Anthology, AnthologyView, Book, BookView};
use populate::populate::{PopulateEngine, PopulateOptions};
use populate_int_test::test_util::{cleanup, create_test_context, run_test};
use populate::store::{CollectionProvider, DatabaseProvider};
use std::thread;

#[test]
fn test_concurrent_populate_calls_are_independent() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let options = PopulateOptions::new("author", "authors", "_id");

            thread::scope(|scope| {
                let handles: Vec<_> = (0..8i64)
                    .map(|i| {
                        let engine = engine.clone();
                        let options = options.clone();
                        scope.spawn(move || {
                            let author = 7 + i % 3;
                            let book = Book::new(i, &format!("Book {}", i), author);
                            let view: BookView = engine.populate(&book, &options)?;
                            Ok::<_, populate::errors::PopulateError>((i, author, view))
                        })
                    })
                    .collect();

                for handle in handles {
                    let (i, author, view) = match handle.join() {
                        Ok(result) => result?,
                        Err(panic) => std::panic::resume_unwind(panic),
                    };
                    assert_eq!(view.id, i);
                    assert_eq!(view.author.len(), 1);
                    assert_eq!(view.author[0].id().and_then(|id| id.as_i64()), Some(author));
                }
                Ok::<_, populate::errors::PopulateError>(())
            })?;

            assert_eq!(ctx.counter().query_count(), 8);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}

#[test]
fn test_populate_while_collection_is_written() {
    run_test(
        || create_test_context(),
        |ctx| {
            let engine = PopulateEngine::new(ctx.db());
            let options = PopulateOptions::new("authors", "authors", "_id");
            let anthology = Anthology {
                id: 1,
                title: "Growing".to_string(),
                authors: (1000..1050).collect(),
            };

            thread::scope(|scope| {
                let writer = scope.spawn(|| -> populate::errors::PopulateResult<()> {
                    let authors = ctx.store().collection("authors")?;
                    for id in 1000..1050i64 {
                        authors.insert(populate::doc! { _id: id, name: (format!("Author {}", id)) })?;
                    }
                    Ok(())
                });

                let view: AnthologyView = engine.populate(&anthology, &options)?;
                assert!(view.authors.len() <= 50);

                match writer.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            })?;

            let view: AnthologyView = engine.populate(&anthology, &options)?;
            assert_eq!(view.authors.len(), 50);
            Ok(())
        },
        |ctx| cleanup(ctx),
    );
}
