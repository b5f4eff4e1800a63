//! Field-keyed validation error maps.
//!
//! Form submissions report every failing field at once instead of stopping at
//! the first problem. The map is surfaced to clients under
//! `details.fields` of an `invalid_request` error.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use super::Error;

/// Accumulates validation messages keyed by request field name.
///
/// # Examples
/// ```
/// use gratitude::domain::FieldErrors;
///
/// let mut errors = FieldErrors::default();
/// errors.push("text", "Your entry must be at least 10 characters long.");
/// assert!(errors.into_result().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Record a message against `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Record the error of a fallible parse, returning the parsed value.
    pub fn capture<T, E: std::fmt::Display>(
        &mut self,
        field: &str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(field, err.to_string());
                None
            }
        }
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Convert into `Ok(())` or an `invalid_request` error carrying the map.
    ///
    /// # Errors
    /// Returns [`Error`] with code `invalid_request` when any field failed.
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            return Ok(());
        }
        Err(Error::invalid_request("validation failed").with_details(json!({ "fields": self })))
    }
}
