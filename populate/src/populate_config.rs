use crate::common::FIELD_SEPARATOR;
use crate::errors::{ErrorKind, PopulateError, PopulateResult};

/// Settings shared by populate plans compiled from [PopulateOptions](crate::populate::PopulateOptions).
///
/// The field separator splits a populate path such as `order.customer` into segments. It
/// defaults to `.`; a different separator lets field names that contain dots be addressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulateConfig {
    field_separator: String,
}

impl Default for PopulateConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PopulateConfig {
    pub fn new() -> Self {
        PopulateConfig {
            field_separator: FIELD_SEPARATOR.to_string(),
        }
    }

    pub fn field_separator(&self) -> &str {
        &self.field_separator
    }

    pub fn set_field_separator(&mut self, separator: &str) -> PopulateResult<()> {
        if separator.is_empty() {
            log::error!("Field separator cannot be empty");
            return Err(PopulateError::new(
                "Field separator cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }

        self.field_separator = separator.to_string();
        Ok(())
    }
}
