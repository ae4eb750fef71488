//! HTTP mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! failure the same wire shape:
//!
//! ```json
//! { "success": false, "error": "<message>" }
//! ```
//!
//! with an extra `"stack"` string when diagnostics are exposed (development
//! mode). Internal errors are always reported as `Server Error`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned in place of any internal error.
pub const SERVER_ERROR: &str = "Server Error";

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Not authorized, no token")]
    pub error: String,
    /// Diagnostic text; development mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::Duplicate => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(error: &Error) -> &str {
    match error.code() {
        ErrorCode::InternalError => SERVER_ERROR,
        _ => error.message(),
    }
}

fn stack_for(error: &Error) -> String {
    let mut lines = vec![format!("{:?}: {}", error.code(), error.message())];
    if let Some(diagnostic) = error.diagnostic() {
        lines.push(format!("    caused by: {diagnostic}"));
    }
    if let Some(details) = error.details() {
        lines.push(format!("    details: {details}"));
    }
    if let Some(trace_id) = error.trace_id() {
        lines.push(format!("    trace-id: {trace_id}"));
    }
    lines.join("\n")
}

impl ErrorEnvelope {
    /// Envelope for `error`, with a stack when `expose_stack` is set.
    ///
    /// # Examples
    /// ```
    /// use ecowaste::domain::Error;
    /// use ecowaste::inbound::http::error::ErrorEnvelope;
    ///
    /// let envelope = ErrorEnvelope::from_error(&Error::internal("db down"), false);
    /// assert!(!envelope.success);
    /// assert_eq!(envelope.error, "Server Error");
    /// assert!(envelope.stack.is_none());
    /// ```
    pub fn from_error(error: &Error, expose_stack: bool) -> Self {
        Self {
            success: false,
            error: public_message(error).to_owned(),
            stack: expose_stack.then(|| stack_for(error)),
        }
    }
}

/// Build the envelope response for `error` with an explicit status.
pub(crate) fn envelope_response(
    error: &Error,
    status: StatusCode,
    expose_stack: bool,
) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    builder.json(ErrorEnvelope::from_error(error, expose_stack))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        envelope_response(self, self.status_code(), false)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("framework error").with_diagnostic(err.to_string())
    }
}
