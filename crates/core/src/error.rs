use std::fmt;

use thiserror::Error;

/// Required form fields that were left blank.
///
/// Blocks submission; the field names are meant to be shown inline next to the form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct ValidationError {
    missing: Vec<String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(missing: Vec<String>) -> Self {
        Self { missing }
    }

    #[must_use]
    pub fn missing(&self) -> &[String] {
        &self.missing
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "required fields are empty: {}", self.missing.join(", "))
    }
}

/// Collects blank required fields and turns them into a `ValidationError`.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as missing when `value` is blank after trimming.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing.push(name.to_owned());
        }
        self
    }

    /// Record `name` as missing when `present` is false.
    #[must_use]
    pub fn present(mut self, name: &str, present: bool) -> Self {
        if !present {
            self.missing.push(name.to_owned());
        }
        self
    }

    /// # Errors
    ///
    /// Returns `ValidationError` listing every recorded field, if any.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.missing))
        }
    }
}
