#![allow(dead_code)]

use populate::collection::Document;
use populate::populate::Reference;
use populate_derive::{Convertible, Entity};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Convertible, Entity)]
#[entity(name = "books", id(field = "id"))]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: i64,
}

impl Book {
    pub fn new(id: i64, title: &str, author: i64) -> Self {
        Book {
            id,
            title: title.to_string(),
            author,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub author: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct Author {
    pub name: String,
    pub publisher: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct TypedBookView {
    pub id: i64,
    pub title: String,
    pub author: Reference<Author>,
}

/// A view without the `author` field.
#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct TitleView {
    pub id: i64,
    pub title: String,
}

/// A view whose `title` cannot be read from a book.
#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct NumberedView {
    pub id: i64,
    pub title: i64,
    pub author: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible, Entity)]
#[entity(name = "anthologies", id(field = "id"))]
pub struct Anthology {
    pub id: i64,
    pub title: String,
    pub authors: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct AnthologyView {
    pub id: i64,
    pub title: String,
    pub authors: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible, Entity)]
#[entity(name = "edited_books", id(field = "id"))]
pub struct EditedBook {
    pub id: i64,
    pub title: String,
    pub author: i64,
    pub editor: i64,
}

/// `editor` keeps its raw key through the mapping, so it is read as a [Reference].
#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct EditedBookView {
    pub id: i64,
    pub title: String,
    pub author: Vec<Document>,
    pub editor: Reference<Author>,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct StrictEditedBookView {
    pub id: i64,
    pub title: String,
    pub author: Vec<Document>,
    pub editor: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible, Entity)]
#[entity(name = "orders", id(field = "id"))]
pub struct Order {
    pub id: i64,
    pub shipping: Option<Shipping>,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct Shipping {
    pub customer: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct OrderView {
    pub id: i64,
    pub shipping: Option<ShippingView>,
}

#[derive(Debug, Clone, Default, PartialEq, Convertible)]
pub struct ShippingView {
    pub customer: Vec<Document>,
    pub city: String,
}

/// Stock counts per shelf slot.
#[derive(Debug, Clone, Default, PartialEq, Convertible, Entity)]
#[entity(name = "shelves", id(field = "id"))]
pub struct Shelf {
    pub id: i64,
    pub counts: BTreeMap<String, i64>,
}

impl Shelf {
    pub fn new(id: i64, counts: &[(&str, i64)]) -> Self {
        Shelf {
            id,
            counts: counts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}
