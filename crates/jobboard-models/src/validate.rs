//! Structured validation errors.
//!
//! Every entity exposes a construct-and-validate operation that checks all
//! required fields up front and reports every failure at once, rather than
//! bailing on the first missing field.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON field path, e.g. "salaryRange.min"
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for the most common failure.
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The full set of field errors for one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Return `Ok(value)` only when no field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "validation failed: {}", joined.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_errors_pass_through() {
        let errors = ValidationErrors::new();
        assert_eq!(errors.into_result(42), Ok(42));
    }

    #[test]
    fn test_errors_are_collected_in_order() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required("jobTitle"));
        errors.push(FieldError::new("saveDraft", "must be a boolean"));

        let result = errors.into_result(());
        let errors = result.unwrap_err();
        assert_eq!(errors.errors.len(), 2);
        assert_eq!(errors.errors[0].field, "jobTitle");
    }

    #[test]
    fn test_display_joins_all_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required("companyName"));
        errors.push(FieldError::required("jobDescription"));

        let message = errors.to_string();
        assert!(message.contains("companyName: is required"));
        assert!(message.contains("jobDescription: is required"));
    }
}
