use im::OrdMap;
use itertools::Itertools;

use crate::common::{Value, DOC_ID, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, PopulateError, PopulateResult};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

/// A schemaless document: an ordered map from field name to [Value].
///
/// Documents are what collections store and what lookups return. Populate also works on them:
/// entities and projections are converted to documents, and a reference path such as
/// `order.customer` is resolved by walking embedded documents.
///
/// Keys passed to [Document::put] and [Document::get] may address embedded
/// fields with the field separator (`.`). `get` also understands numeric segments as array
/// indexes, and decomposes arrays of documents when the segment is a field name.
///
/// The map is an `im::OrdMap`, so clones are cheap and share structure. A projection can be
/// cloned per hop without copying its nested documents.
#[derive(Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of top level fields.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `key`, creating embedded documents for a dotted key.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidOperation] if the key, or any segment of a dotted key,
    /// is empty.
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("customer.name", "Alice")?;
    /// assert_eq!(doc.get("customer.name")?, Value::from("Alice"));
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> PopulateResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(PopulateError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();
        if self.is_embedded(key) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Associates `value` with `key` verbatim, without splitting on the field separator.
    pub(crate) fn put_raw(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    /// Returns the value at `key`, or [Value::Null] if there is none.
    ///
    /// A key present verbatim at the top level wins over its embedded interpretation.
    pub fn get(&self, key: &str) -> PopulateResult<Value> {
        match self.data.get(key) {
            Some(value) => Ok(value.clone()),
            None if self.is_embedded(key) => self.get_by_embedded_key(key),
            None => Ok(Value::Null),
        }
    }

    /// Borrows the value of a top level field. The key is never split.
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Mutably borrows the value of a top level field. The key is never split.
    ///
    /// Nested documents shared with other clones are copied on write.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Returns the `_id` field, if the document has one.
    pub fn id(&self) -> Option<&Value> {
        self.data.get(DOC_ID)
    }

    /// Checks for a top level field.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let mut json_string = String::with_capacity(self.data.len() * 30 + indent * 2);
        json_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for (key, value) in self.data.iter() {
            json_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                key,
                value.to_pretty_json(indent + 2)
            ));
        }

        json_string.pop();
        json_string.pop();
        json_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        json_string
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let mut debug_string = String::new();
        debug_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for (key, value) in self.data.iter() {
            debug_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                key,
                value.to_debug_string(indent + 2)
            ));
        }

        debug_string.pop();
        debug_string.pop();
        debug_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        debug_string
    }

    fn is_embedded(&self, key: &str) -> bool {
        key.contains(FIELD_SEPARATOR)
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> PopulateResult<()> {
        let Some((&key, remaining)) = splits.split_first() else {
            log::error!("Empty embedded key");
            return Err(PopulateError::new(
                "Empty embedded key",
                ErrorKind::InvalidOperation,
            ));
        };

        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(PopulateError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        if remaining.is_empty() {
            self.data.insert(key.to_string(), value);
            return Ok(());
        }

        // anything that is not a document on the way is replaced by one
        let mut nested = match self.data.get(key) {
            Some(Value::Document(doc)) => doc.clone(),
            _ => Document::new(),
        };
        let result = nested.deep_put(remaining, value);
        self.data.insert(key.to_string(), Value::Document(nested));
        result
    }

    fn get_by_embedded_key(&self, key: &str) -> PopulateResult<Value> {
        let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
        match splits.split_first() {
            Some((first, _)) if first.is_empty() => {
                log::error!("Document does not support empty key");
                Err(PopulateError::new(
                    "Document does not support empty key",
                    ErrorKind::InvalidOperation,
                ))
            }
            Some((first, remaining)) => recursive_get(self.data.get(*first), remaining),
            None => Ok(Value::Null),
        }
    }
}

fn recursive_get(value: Option<&Value>, splits: &[&str]) -> PopulateResult<Value> {
    let Some(value) = value else {
        return Ok(Value::Null);
    };

    let Some((&key, remaining)) = splits.split_first() else {
        return Ok(value.clone());
    };

    if key.is_empty() {
        log::error!("Document does not support empty key");
        return Err(PopulateError::new(
            "Document does not support empty key",
            ErrorKind::InvalidOperation,
        ));
    }

    match value {
        Value::Document(doc) => recursive_get(doc.data.get(key), remaining),
        Value::Array(array) => match key.parse::<usize>() {
            // an out of bound index reads as null
            Ok(index) => recursive_get(array.get(index), remaining),
            Err(_) => decompose(array, splits),
        },
        _ => Ok(Value::Null),
    }
}

// Collects the value of `splits` from every element of an array, flattening nested
// arrays and dropping duplicates.
fn decompose(array: &[Value], splits: &[&str]) -> PopulateResult<Value> {
    let mut items: Vec<Value> = Vec::with_capacity(array.len());
    for item in array {
        match recursive_get(Some(item), splits)? {
            Value::Array(values) => items.extend(values),
            Value::Null => {}
            value => items.push(value),
        }
    }
    Ok(Value::Array(items.into_iter().unique().collect()))
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Document {
            data: map.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

/// Strips the quotes `stringify!` leaves around string literal keys in [doc!].
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Keys may be identifiers or string literals; a dotted string key creates embedded
/// documents. Values may be literals, parenthesized expressions, nested `{ .. }` documents
/// or `[ .. ]` arrays.
///
/// ```rust,ignore
/// use populate::doc;
///
/// let book = doc! {
///     _id: 1,
///     title: "Dune",
///     author: 10,
///     tags: ["classic", "sf"],
///     meta: { pages: 412 },
/// };
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                    .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Converts a single `doc!` value into a [Value](crate::common::Value).
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
