//! Domain ports defining the edges of the hexagon.
//!
//! Each trait exposes a typed error built with `define_port_error!` so
//! adapters map their failures into predictable variants. Services translate
//! those into domain [`Error`](crate::domain::Error)s in one place per port.

mod macros;
pub(crate) use macros::define_port_error;

mod classification_history;
mod otp_verifier;
mod pickup_repository;
mod principal_repository;
mod token_service;

#[cfg(test)]
pub use classification_history::MockClassificationHistory;
pub use classification_history::{ClassificationHistory, HistoryStoreError};
#[cfg(test)]
pub use otp_verifier::MockOtpVerifier;
pub use otp_verifier::{DEMO_OTP, FixtureOtpVerifier, OtpVerifier};
#[cfg(test)]
pub use pickup_repository::MockPickupRepository;
pub use pickup_repository::{PickupRepository, PickupStoreError};
#[cfg(test)]
pub use principal_repository::MockPrincipalRepository;
pub use principal_repository::{PrincipalRepository, PrincipalStoreError};
#[cfg(test)]
pub use token_service::{MockTokenIssuer, MockTokenVerifier};
pub use token_service::{IssuedToken, TokenError, TokenIssuer, TokenVerifier};
