//! Account use-cases: registration, phone login and token issue.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use super::ports::{
    IssuedToken, OtpVerifier, PrincipalRepository, PrincipalStoreError, TokenError, TokenIssuer,
};
use super::{
    Error, LoginCredentials, Principal, PrincipalId, Registration, RegistrationParts,
};

/// Demo household seeded on request.
pub const DEMO_PRINCIPAL: RegistrationParts<'static> = RegistrationParts {
    name: "Priya Sharma",
    email: "priya.sharma@example.com",
    phone: "+91 98765 43210",
    city: "Mumbai",
    display_icon: None,
};

const LOGIN_FAILED: &str = "Invalid phone number or code";

/// A principal together with a fresh bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub token: IssuedToken,
    pub principal: Principal,
}

fn map_store_error(error: PrincipalStoreError) -> Error {
    match error {
        PrincipalStoreError::Duplicate { field } => Error::duplicate(field),
        PrincipalStoreError::MalformedId { value } => Error::malformed_id(value),
        PrincipalStoreError::Connection { message } => {
            Error::internal("principal store unavailable").with_diagnostic(message)
        }
        PrincipalStoreError::Query { message } => {
            Error::internal("principal store error").with_diagnostic(message)
        }
    }
}

fn map_token_error(error: TokenError) -> Error {
    Error::internal("could not issue token").with_diagnostic(error.to_string())
}

#[derive(Clone)]
pub struct AccountService {
    principals: Arc<dyn PrincipalRepository>,
    tokens: Arc<dyn TokenIssuer>,
    otp: Arc<dyn OtpVerifier>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        principals: Arc<dyn PrincipalRepository>,
        tokens: Arc<dyn TokenIssuer>,
        otp: Arc<dyn OtpVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            principals,
            tokens,
            otp,
            clock,
        }
    }

    fn session_for(&self, principal: Principal) -> Result<AuthenticatedSession, Error> {
        let token = self
            .tokens
            .issue(principal.id(), self.clock.utc())
            .map_err(map_token_error)?;
        Ok(AuthenticatedSession { token, principal })
    }

    /// Create a principal and sign them in.
    pub async fn register(&self, registration: Registration) -> Result<AuthenticatedSession, Error> {
        let principal = Principal::register(PrincipalId::random(), registration);
        self.principals
            .insert(&principal)
            .await
            .map_err(map_store_error)?;
        info!(principal_id = %principal.id(), "principal registered");
        self.session_for(principal)
    }

    /// Sign in with a phone number and one-time code.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        if !self.otp.verify(credentials.phone(), credentials.code()) {
            warn!("login rejected: wrong code");
            return Err(Error::unauthorized(LOGIN_FAILED));
        }
        let principal = self
            .principals
            .find_by_phone(credentials.phone())
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| {
                warn!("login rejected: unknown phone");
                Error::unauthorized(LOGIN_FAILED)
            })?;
        info!(principal_id = %principal.id(), "principal logged in");
        self.session_for(principal)
    }

    /// Ensure the demo principal exists; returns it with `true` when it was
    /// created by this call.
    pub async fn seed_demo(&self) -> Result<(Principal, bool), Error> {
        let registration = Registration::try_from_parts(DEMO_PRINCIPAL).map_err(Error::from)?;
        if let Some(existing) = self
            .principals
            .find_by_phone(registration.phone())
            .await
            .map_err(map_store_error)?
        {
            return Ok((existing, false));
        }
        let principal = Principal::register(PrincipalId::random(), registration);
        self.principals
            .insert(&principal)
            .await
            .map_err(map_store_error)?;
        info!(principal_id = %principal.id(), "demo principal seeded");
        Ok((principal, true))
    }
}
