//! HS256 JWT adapter for the token ports.
//!
//! Claims are `{ sub, iat, exp }` with `sub` holding the principal UUID.
//! Expiry is checked by `jsonwebtoken` against the system clock with its
//! default leeway.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::PrincipalId;
use crate::domain::ports::{IssuedToken, TokenError, TokenIssuer, TokenVerifier};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Principal identifier.
    sub: String,
    /// Issued at (Unix timestamp).
    iat: i64,
    /// Expiration time (Unix timestamp).
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: TimeDelta,
}

impl JwtTokenService {
    /// Build the service from the shared secret. The caller's copy of the
    /// secret is zeroed when it drops.
    pub fn new(secret: &Zeroizing<Vec<u8>>, ttl: TimeDelta) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(
        &self,
        subject: &PrincipalId,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::signing("token lifetime overflows"))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }
}

impl TokenVerifier for JwtTokenService {
    fn verify(&self, token: &str) -> Result<PrincipalId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation()).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::malformed(err.to_string()),
            },
        )?;
        PrincipalId::new(&data.claims.sub)
            .map_err(|_| TokenError::malformed("subject is not a principal id"))
    }
}
