//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services built over ports, and remain testable without
//! I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ClassificationHistory, OtpVerifier, PickupRepository, PrincipalRepository, TokenIssuer,
    TokenVerifier,
};
use crate::domain::{
    AccountService, AuthGuard, ClassificationLookup, ClassificationService, FallbackPolicy,
    PickupService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub principals: Arc<dyn PrincipalRepository>,
    pub history: Arc<dyn ClassificationHistory>,
    pub pickups: Arc<dyn PickupRepository>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub otp: Arc<dyn OtpVerifier>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub classification: ClassificationService,
    pub pickups: PickupService,
    pub guard: AuthGuard,
}

impl HttpState {
    /// Wire the domain services over `ports`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use chrono::TimeDelta;
    /// use ecowaste::domain::FallbackPolicy;
    /// use ecowaste::domain::ports::FixtureOtpVerifier;
    /// use ecowaste::inbound::http::state::{HttpState, HttpStatePorts};
    /// use ecowaste::outbound::jwt::JwtTokenService;
    /// use ecowaste::outbound::memory::{
    ///     InMemoryClassificationHistory, InMemoryPickupRepository, InMemoryPrincipalRepository,
    /// };
    /// use mockable::DefaultClock;
    /// use zeroize::Zeroizing;
    ///
    /// let secret = Zeroizing::new(b"an example secret of adequate length".to_vec());
    /// let tokens = Arc::new(JwtTokenService::new(&secret, TimeDelta::hours(1)));
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         principals: Arc::new(InMemoryPrincipalRepository::new()),
    ///         history: Arc::new(InMemoryClassificationHistory::new()),
    ///         pickups: Arc::new(InMemoryPickupRepository::new()),
    ///         token_issuer: tokens.clone(),
    ///         token_verifier: tokens,
    ///         otp: Arc::new(FixtureOtpVerifier),
    ///         clock: Arc::new(DefaultClock),
    ///     },
    ///     FallbackPolicy::Unclassified,
    /// );
    /// let _guard = state.guard.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, fallback: FallbackPolicy) -> Self {
        let HttpStatePorts {
            principals,
            history,
            pickups,
            token_issuer,
            token_verifier,
            otp,
            clock,
        } = ports;
        Self {
            accounts: AccountService::new(principals.clone(), token_issuer, otp, clock.clone()),
            classification: ClassificationService::new(
                ClassificationLookup::new(fallback),
                history,
                clock.clone(),
            ),
            pickups: PickupService::new(pickups, clock),
            guard: AuthGuard::new(token_verifier, principals),
        }
    }
}
