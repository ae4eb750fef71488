//! Accumulated field validation failures.
//!
//! Boundary constructors collect every failing field rather than stopping at
//! the first, so a single response can report them all. Converting into a
//! domain [`Error`] joins the messages with `", "`.

use serde::Serialize;
use serde_json::json;

use super::Error;

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    field: &'static str,
    message: String,
}

impl FieldError {
    /// Name of the offending field, as clients spell it.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Human-readable reason.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Ordered collection of field failures.
///
/// # Examples
/// ```
/// use ecowaste::domain::{ErrorCode, ValidationErrors};
///
/// let mut errors = ValidationErrors::default();
/// errors.push("name", "Please add a name");
/// errors.push("city", "Please add a city");
/// let err = errors.into_result(()).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.message(), "Please add a name, Please add a city");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Record a failure for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the error of `result`, if any, and hand back the success value.
    pub fn check<T, E: std::fmt::Display>(
        &mut self,
        field: &'static str,
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

    /// Whether no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded failures in insertion order.
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Messages joined with `", "`.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(FieldError::message)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `Ok(value)` when nothing failed, otherwise the combined domain error.
    pub fn into_result<T>(self, value: T) -> Result<T, Error> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self.into())
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let message = if errors.is_empty() {
            "invalid request".to_owned()
        } else {
            errors.joined()
        };
        Error::invalid_request(message).with_details(json!({ "fields": errors.0 }))
    }
}
