//! Authentication: bearer extraction, the auth guard and login credentials.
//!
//! The guard turns a raw `Authorization` header into a [`Principal`] or one
//! of three fixed failures. It holds only shared handles to its ports and
//! keeps nothing between calls.

use std::sync::Arc;

use tracing::debug;
use zeroize::Zeroizing;

use super::ports::{PrincipalRepository, PrincipalStoreError, TokenVerifier};
use super::{Error, PhoneNumber, Principal, PrincipalValidationError};

/// Scheme prefix expected on the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Why a request could not be authenticated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or one without the bearer scheme.
    #[error("Not authorized, no token")]
    MissingToken,
    /// The token is empty, malformed, badly signed or expired.
    #[error("Not authorized, token failed")]
    InvalidToken,
    /// The token is valid but its principal no longer exists.
    #[error("Not authorized, user not found")]
    PrincipalNotFound,
    /// The principal store failed; not an authentication verdict.
    #[error(transparent)]
    Store(#[from] PrincipalStoreError),
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(store) => {
                Error::internal("principal lookup failed").with_diagnostic(store.to_string())
            }
            verdict => Error::unauthorized(verdict.to_string()),
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// # Examples
/// ```
/// use ecowaste::domain::{AuthError, extract_bearer};
///
/// assert_eq!(extract_bearer(Some("Bearer abc")), Ok("abc"));
/// assert_eq!(extract_bearer(Some("Basic abc")), Err(AuthError::MissingToken));
/// assert_eq!(extract_bearer(Some("Bearer   ")), Err(AuthError::InvalidToken));
/// assert_eq!(extract_bearer(None), Err(AuthError::MissingToken));
/// ```
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let token = header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingToken)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}

/// Resolves bearer tokens to principals.
#[derive(Clone)]
pub struct AuthGuard {
    tokens: Arc<dyn TokenVerifier>,
    principals: Arc<dyn PrincipalRepository>,
}

impl AuthGuard {
    pub fn new(tokens: Arc<dyn TokenVerifier>, principals: Arc<dyn PrincipalRepository>) -> Self {
        Self { tokens, principals }
    }

    /// Authenticate a request from its raw `Authorization` header.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let token = extract_bearer(header)?;
        let principal_id = self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            AuthError::InvalidToken
        })?;
        match self.principals.find_by_id(&principal_id).await? {
            Some(principal) => Ok(principal),
            None => {
                debug!(principal_id = %principal_id, "token subject no longer exists");
                Err(AuthError::PrincipalNotFound)
            }
        }
    }
}

/// One-time code entered at login. Zeroed on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode(Zeroizing<String>);

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("{0}")]
    Phone(#[from] PrincipalValidationError),
    #[error("Please enter the 4-digit code")]
    MalformedCode,
}

impl OneTimeCode {
    /// Accept exactly four ASCII digits.
    pub fn new(raw: &str) -> Result<Self, LoginValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LoginValidationError::MalformedCode);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated phone + code login credentials.
///
/// # Examples
/// ```
/// use ecowaste::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("+91 98765 43210", "1234").unwrap();
/// assert_eq!(creds.phone().digits(), "919876543210");
/// assert_eq!(creds.code().as_str(), "1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    phone: PhoneNumber,
    code: OneTimeCode,
}

impl LoginCredentials {
    pub fn try_from_parts(phone: &str, code: &str) -> Result<Self, LoginValidationError> {
        let phone = PhoneNumber::new(phone)?;
        let code = OneTimeCode::new(code)?;
        Ok(Self { phone, code })
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn code(&self) -> &OneTimeCode {
        &self.code
    }
}
