use crate::collection::Document;
use crate::common::Value;
use crate::errors::PopulateResult;
use crate::filter::FilterProvider;
use std::any::Any;
use std::fmt::Display;

pub(crate) struct AllFilter;

impl FilterProvider for AllFilter {
    fn apply(&self, _entry: &Document) -> PopulateResult<bool> {
        Ok(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for AllFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllFilter")
    }
}

/// Matches documents whose field equals a value.
///
/// The field name may be a dotted path. A missing field reads as null, so a null value matches
/// documents where the field is absent or null. When the field holds an array and the value is
/// not one, the filter matches if any element equals the value.
pub(crate) struct EqualsFilter {
    field_name: String,
    field_value: Value,
}

impl EqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        EqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for EqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} == {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for EqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> PopulateResult<bool> {
        let value = entry.get(&self.field_name)?;
        if value == self.field_value {
            return Ok(true);
        }

        match (&value, &self.field_value) {
            (Value::Array(_), Value::Array(_)) => Ok(false),
            (Value::Array(items), expected) => Ok(items.contains(expected)),
            _ => Ok(false),
        }
    }

    fn field_name(&self) -> Option<&str> {
        Some(&self.field_name)
    }

    fn field_value(&self) -> Option<&Value> {
        Some(&self.field_value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matches documents whose field does not equal a value.
pub(crate) struct NotEqualsFilter {
    field_name: String,
    field_value: Value,
}

impl NotEqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        NotEqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for NotEqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} != {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for NotEqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> PopulateResult<bool> {
        let value = entry.get(&self.field_name)?;
        Ok(value != self.field_value)
    }

    fn field_name(&self) -> Option<&str> {
        Some(&self.field_name)
    }

    fn field_value(&self) -> Option<&Value> {
        Some(&self.field_value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
