use crate::common::Value;
use std::slice;

/// The raw reference stored in a field before population.
///
/// An array is a plural key: every element is looked up on its own and the results are
/// concatenated in key order. Any other value, null included, is a single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForeignKey {
    Single(Value),
    Many(Vec<Value>),
}

impl ForeignKey {
    /// The keys to look up, in order. A single key yields one element.
    pub fn keys(&self) -> &[Value] {
        match self {
            ForeignKey::Single(key) => slice::from_ref(key),
            ForeignKey::Many(keys) => keys,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, ForeignKey::Many(_))
    }

    /// Number of lookups the key needs.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

impl From<Value> for ForeignKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(keys) => ForeignKey::Many(keys),
            key => ForeignKey::Single(key),
        }
    }
}
