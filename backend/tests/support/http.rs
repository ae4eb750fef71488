//! In-process application wiring shared by the HTTP integration suites.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::TimeDelta;
use ecowaste::domain::FallbackPolicy;
use ecowaste::domain::ports::FixtureOtpVerifier;
use ecowaste::inbound::http::state::{HttpState, HttpStatePorts};
use ecowaste::inbound::http::{configure, not_found};
use ecowaste::outbound::jwt::JwtTokenService;
use ecowaste::outbound::memory::{
    InMemoryClassificationHistory, InMemoryPickupRepository, InMemoryPrincipalRepository,
};
use ecowaste::{NormalizeErrors, Trace};
use mockable::DefaultClock;
use zeroize::Zeroizing;

pub(crate) const SECRET: &[u8] = b"integration-secret-long-enough-for-hs256";

/// Domain state plus handles the suites poke at directly.
#[derive(Clone)]
pub(crate) struct Backend {
    pub(crate) state: HttpState,
    pub(crate) principals: Arc<InMemoryPrincipalRepository>,
    pub(crate) tokens: Arc<JwtTokenService>,
}

impl Backend {
    pub(crate) fn new() -> Self {
        let principals = Arc::new(InMemoryPrincipalRepository::new());
        let tokens = Arc::new(JwtTokenService::new(
            &Zeroizing::new(SECRET.to_vec()),
            TimeDelta::hours(1),
        ));
        let state = HttpState::new(
            HttpStatePorts {
                principals: principals.clone(),
                history: Arc::new(InMemoryClassificationHistory::new()),
                pickups: Arc::new(InMemoryPickupRepository::new()),
                token_issuer: tokens.clone(),
                token_verifier: tokens.clone(),
                otp: Arc::new(FixtureOtpVerifier),
                clock: Arc::new(DefaultClock),
            },
            FallbackPolicy::Unclassified,
        );
        Self {
            state,
            principals,
            tokens,
        }
    }

    /// The application as the server mounts it.
    pub(crate) fn app(
        &self,
        expose_stack: bool,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(NormalizeErrors::new(expose_stack))
            .wrap(Trace)
            .configure(configure(self.state.guard.clone()))
            .default_service(web::to(not_found))
    }
}
