use crate::collection::Document;
use crate::common::{Value, DOC_ID};
use crate::errors::PopulateResult;
use std::any::Any;
use std::fmt::Display;
use std::ops::Deref;
use std::sync::Arc;

use super::{AllFilter, EqualsFilter};

/// A predicate over documents.
///
/// Backends evaluate filters document by document through [FilterProvider::apply]. A backend
/// able to push a filter down to its own query language can inspect it through
/// [FilterProvider::field_name] and [FilterProvider::field_value], or downcast it with
/// [FilterProvider::as_any].
pub trait FilterProvider: Any + Send + Sync + Display {
    fn apply(&self, entry: &Document) -> PopulateResult<bool>;

    /// The field a single-field filter tests.
    #[inline]
    fn field_name(&self) -> Option<&str> {
        None
    }

    /// The value a single-field filter compares against.
    #[inline]
    fn field_value(&self) -> Option<&Value> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// A shareable handle to a [FilterProvider].
#[derive(Clone)]
pub struct Filter {
    inner: Arc<dyn FilterProvider>,
}

impl Filter {
    pub fn new<T: FilterProvider + 'static>(inner: T) -> Self {
        Filter {
            inner: Arc::new(inner),
        }
    }
}

impl Display for Filter {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Deref for Filter {
    type Target = Arc<dyn FilterProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Matches every document.
pub fn all() -> Filter {
    Filter::new(AllFilter)
}

/// Matches the document whose `_id` equals `id`.
pub fn by_id<T: Into<Value>>(id: T) -> Filter {
    Filter::new(EqualsFilter::new(DOC_ID.to_string(), id.into()))
}

pub(crate) fn is_all_filter(filter: &Filter) -> bool {
    filter.as_any().is::<AllFilter>()
}
