//! Error-normalizing middleware.
//!
//! Every error response produced further down the pipeline (domain errors
//! returned by handlers, extractor failures raised by actix, errors from
//! inner middleware) is rewritten into the JSON envelope
//! `{ "success": false, "error": ... }`.
//!
//! | source                         | status | message                      |
//! |--------------------------------|--------|------------------------------|
//! | domain error                   | by code| domain message               |
//! | malformed path segment         | 404    | `Resource not found`         |
//! | malformed JSON / query / form  | 400    | framework message            |
//! | oversized JSON / form payload  | 413    | framework message            |
//! | anything else 4xx              | same   | framework message            |
//! | anything else                  | 500    | `Server Error`               |

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::{InternalError, PathError};
use actix_web::http::StatusCode;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::error::{envelope_response, status_for};

/// Map a framework error onto a domain error and the status to answer with.
pub(crate) fn normalize(err: &actix_web::Error) -> (StatusCode, Error) {
    if let Some(domain) = err.as_error::<Error>() {
        return (status_for(domain.code()), domain.clone());
    }
    // `web::Path` reports parse failures wrapped as `InternalError<PathError>`.
    if err.as_error::<PathError>().is_some()
        || err.as_error::<InternalError<PathError>>().is_some()
    {
        return (StatusCode::NOT_FOUND, Error::malformed_id(err.to_string()));
    }

    // Payload extractors (JSON, query, form) keep the status actix chose:
    // 400 for malformed bodies, 413 for oversized ones.
    let status = err.as_response_error().status_code();
    let message = err.to_string();
    let message = if message.trim().is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_owned()
    } else {
        message
    };
    let code = match status {
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
        StatusCode::FORBIDDEN => ErrorCode::Forbidden,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        s if s.is_client_error() => ErrorCode::InvalidRequest,
        _ => ErrorCode::InternalError,
    };
    if code == ErrorCode::InternalError {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Error::internal("unhandled error").with_diagnostic(message),
        )
    } else {
        (status, Error::new(code, message))
    }
}

fn log_failure(method: &str, path: &str, status: StatusCode, error: &Error) {
    if status.is_server_error() {
        error!(
            %method,
            %path,
            status = status.as_u16(),
            message = error.message(),
            diagnostic = error.diagnostic().unwrap_or_default(),
            "request failed"
        );
    } else {
        warn!(
            %method,
            %path,
            status = status.as_u16(),
            message = error.message(),
            "request rejected"
        );
    }
}

/// Middleware rewriting every error response into the JSON envelope.
///
/// Wrap it inside [`Trace`](crate::Trace) so normalized errors carry the
/// request's trace identifier.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use ecowaste::{NormalizeErrors, Trace};
///
/// let app = App::new().wrap(NormalizeErrors::production()).wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NormalizeErrors {
    expose_stack: bool,
}

impl NormalizeErrors {
    pub fn new(expose_stack: bool) -> Self {
        Self { expose_stack }
    }

    /// Envelope without the `stack` field.
    pub fn production() -> Self {
        Self::new(false)
    }

    /// Envelope with a diagnostic `stack` field.
    pub fn development() -> Self {
        Self::new(true)
    }
}

impl<S, B> Transform<S, ServiceRequest> for NormalizeErrors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = NormalizeErrorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(NormalizeErrorsMiddleware {
            service: Rc::new(service),
            expose_stack: self.expose_stack,
        }))
    }
}

/// Service wrapper produced by [`NormalizeErrors`].
pub struct NormalizeErrorsMiddleware<S> {
    service: Rc<S>,
    expose_stack: bool,
}

impl<S, B> Service<ServiceRequest> for NormalizeErrorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let expose_stack = self.expose_stack;
        // Owned copies only: cloning the `HttpRequest` here would stop the
        // router from taking `match_info_mut` further down.
        let method = req.method().clone();
        let path = req.path().to_owned();
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match service.call(req).await {
                Ok(res) => {
                    let Some((status, error)) = res.response().error().map(normalize) else {
                        return Ok(res.map_into_left_body());
                    };
                    log_failure(method.as_str(), &path, status, &error);
                    let (http_req, _) = res.into_parts();
                    let response = envelope_response(&error, status, expose_stack);
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                Err(err) => {
                    let (status, error) = normalize(&err);
                    log_failure(method.as_str(), &path, status, &error);
                    let response = envelope_response(&error, status, expose_stack);
                    Err(InternalError::from_response(error.message().to_owned(), response).into())
                }
            }
        })
    }
}
