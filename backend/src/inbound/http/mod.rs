//! HTTP inbound adapter exposing REST endpoints.
//!
//! ```text
//! /api/auth/register, /api/auth/login        open
//! /api/auth/me, /api/waste/*, /api/pickups*  bearer token required
//! /health/ready, /health/live                open
//! ```

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod pickups;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod waste;

use actix_web::{HttpResponse, web};

use crate::domain::{AuthGuard, Error, RESOURCE_NOT_FOUND};

pub use error::ApiResult;

use self::auth::RequireAuth;

/// Fallback for unknown routes.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found(RESOURCE_NOT_FOUND))
}

/// Register the API routes, guarding everything except registration, login
/// and the probes.
///
/// Handlers expect `web::Data<HttpState>` and, for the probes,
/// `web::Data<HealthState>` in the application data.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use ecowaste::inbound::http::configure;
/// use ecowaste::inbound::http::state::HttpState;
///
/// fn app(state: HttpState) {
///     let guard = state.guard.clone();
///     let _app = App::new()
///         .app_data(web::Data::new(state))
///         .configure(configure(guard));
/// }
/// ```
pub fn configure(guard: AuthGuard) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(accounts::register)
                        .service(accounts::login)
                        .service(
                            web::resource("/me")
                                .wrap(RequireAuth::new(guard.clone()))
                                .route(web::get().to(accounts::me))
                                .default_service(web::to(not_found)),
                        ),
                )
                .service(
                    web::scope("/waste")
                        .wrap(RequireAuth::new(guard.clone()))
                        .service(waste::classify)
                        .service(waste::history)
                        .service(waste::categories),
                )
                .service(
                    web::scope("/pickups")
                        .wrap(RequireAuth::new(guard))
                        .service(pickups::schedule)
                        .service(pickups::list)
                        .service(pickups::cancel),
                )
                .default_service(web::to(not_found)),
        )
        .service(health::ready)
        .service(health::live);
    }
}
