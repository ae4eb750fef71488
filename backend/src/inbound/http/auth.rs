//! Bearer authentication for guarded routes.
//!
//! [`RequireAuth`] runs the domain [`AuthGuard`] before the wrapped service.
//! On success the principal is stored in the request extensions and handlers
//! read it back through the [`AuthenticatedPrincipal`] extractor; nothing
//! outlives the request. Refusals are returned as error responses rather
//! than service errors so the outer middleware still sees the request.

use std::ops::Deref;
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::{AuthError, AuthGuard, Error, Principal};

/// The principal resolved for the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(Principal);

impl AuthenticatedPrincipal {
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

impl Deref for AuthenticatedPrincipal {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Only reachable without a principal when a route was mounted outside
        // `RequireAuth`; refuse rather than serve anonymously.
        ready(
            req.extensions()
                .get::<Self>()
                .cloned()
                .ok_or_else(|| AuthError::MissingToken.into()),
        )
    }
}

/// Middleware rejecting requests without a valid bearer token.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use ecowaste::domain::AuthGuard;
/// use ecowaste::inbound::http::auth::RequireAuth;
///
/// fn mount(guard: AuthGuard) {
///     let _app = App::new().service(web::scope("/api/waste").wrap(RequireAuth::new(guard)));
/// }
/// ```
#[derive(Clone)]
pub struct RequireAuth {
    guard: AuthGuard,
}

impl RequireAuth {
    pub fn new(guard: AuthGuard) -> Self {
        Self { guard }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
            guard: self.guard.clone(),
        }))
    }
}

/// Service wrapper produced by [`RequireAuth`].
pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
    guard: AuthGuard,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
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
        // A header that is not visible ASCII cannot carry the bearer prefix.
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let guard = self.guard.clone();
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match guard.authenticate(header.as_deref()).await {
                Ok(principal) => {
                    req.extensions_mut()
                        .insert(AuthenticatedPrincipal(principal));
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req.error_response(Error::from(err)).map_into_right_body()),
            }
        })
    }
}
