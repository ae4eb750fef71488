//! Ports for issuing and verifying bearer tokens.
//!
//! The domain never sees the signing secret or the token format; it hands a
//! principal identifier to a [`TokenIssuer`] and gets one back from a
//! [`TokenVerifier`].

use chrono::{DateTime, Utc};

use crate::domain::PrincipalId;

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// Empty, undecodable, badly signed or otherwise unusable token.
        Malformed { message: String } => "token rejected: {message}",
        /// Signature is valid but the token has expired.
        Expired => "token expired",
        /// The adapter could not produce a token.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// A freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues bearer tokens for a principal.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `subject`, valid from `issued_at`.
    fn issue(
        &self,
        subject: &PrincipalId,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError>;
}

/// Verifies bearer tokens and yields the embedded principal identifier.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<PrincipalId, TokenError>;
}
