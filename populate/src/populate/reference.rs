use crate::common::{Convertible, Value};
use crate::errors::PopulateResult;

/// A projection field that holds either raw foreign keys or the documents they resolve to.
///
/// Useful when the same type is read before and after population:
///
/// ```rust,ignore
/// #[derive(Convertible, Default)]
/// struct BookView {
///     title: String,
///     author: Reference<Author>,
/// }
/// ```
///
/// Reading a value: null is `Resolved` with nothing in it, an array of documents (empty
/// arrays included) is `Resolved`, any other array is `Keys`, anything else is `Key`.
#[derive(Clone, Debug, PartialEq)]
pub enum Reference<T> {
    Key(Value),
    Keys(Vec<Value>),
    Resolved(Vec<T>),
}

impl<T> Default for Reference<T> {
    fn default() -> Self {
        Reference::Resolved(Vec::new())
    }
}

impl<T> Reference<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Reference::Resolved(_))
    }

    /// The raw keys, empty once resolved.
    pub fn keys(&self) -> Vec<Value> {
        match self {
            Reference::Key(key) => vec![key.clone()],
            Reference::Keys(keys) => keys.clone(),
            Reference::Resolved(_) => Vec::new(),
        }
    }

    pub fn resolved(&self) -> Option<&[T]> {
        match self {
            Reference::Resolved(items) => Some(items),
            _ => None,
        }
    }

    /// The resolved items, empty if the reference still holds keys.
    pub fn into_resolved(self) -> Vec<T> {
        match self {
            Reference::Resolved(items) => items,
            _ => Vec::new(),
        }
    }
}

impl<T> Convertible for Reference<T>
where
    T: Convertible<Output = T>,
{
    type Output = Reference<T>;

    fn to_value(&self) -> PopulateResult<Value> {
        match self {
            Reference::Key(key) => Ok(key.clone()),
            Reference::Keys(keys) => Ok(Value::Array(keys.clone())),
            Reference::Resolved(items) => items.to_value(),
        }
    }

    fn from_value(value: &Value) -> PopulateResult<Self::Output> {
        match value {
            Value::Null => Ok(Reference::default()),
            Value::Array(items) if items.iter().all(Value::is_document) => {
                Ok(Reference::Resolved(Vec::<T>::from_value(value)?))
            }
            Value::Array(items) => Ok(Reference::Keys(items.clone())),
            key => Ok(Reference::Key(key.clone())),
        }
    }
}
