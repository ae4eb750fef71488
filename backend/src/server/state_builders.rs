//! Builders for HTTP state over the in-memory adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use ecowaste::domain::Error;
use ecowaste::domain::ports::FixtureOtpVerifier;
use ecowaste::inbound::http::state::{HttpState, HttpStatePorts};
use ecowaste::outbound::jwt::JwtTokenService;
use ecowaste::outbound::memory::{
    InMemoryClassificationHistory, InMemoryPickupRepository, InMemoryPrincipalRepository,
};
use ecowaste::settings::RuntimeSettings;

/// Build the shared HTTP state from validated settings.
pub(crate) fn build_http_state(settings: &RuntimeSettings) -> web::Data<HttpState> {
    let tokens = Arc::new(JwtTokenService::new(&settings.jwt_secret, settings.token_ttl));
    let ports = HttpStatePorts {
        principals: Arc::new(InMemoryPrincipalRepository::new()),
        history: Arc::new(InMemoryClassificationHistory::new()),
        pickups: Arc::new(InMemoryPickupRepository::new()),
        token_issuer: tokens.clone(),
        token_verifier: tokens,
        otp: Arc::new(FixtureOtpVerifier),
        clock: Arc::new(DefaultClock),
    };
    web::Data::new(HttpState::new(ports, settings.fallback))
}

/// Create the demo household and, on first creation, its pickup schedule.
pub(crate) async fn seed_demo_data(state: &HttpState) -> Result<(), Error> {
    let (principal, created) = state.accounts.seed_demo().await?;
    if created {
        state.pickups.seed_demo(principal.id()).await?;
        info!(principal_id = %principal.id(), "demo pickups seeded");
    }
    Ok(())
}
