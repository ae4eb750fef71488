//! Driven port checking one-time codes sent to a phone.
//!
//! No SMS gateway is wired up yet; [`FixtureOtpVerifier`] accepts the fixed
//! demo code so the login flow can be exercised end to end.

use crate::domain::{OneTimeCode, PhoneNumber};

/// Code accepted by [`FixtureOtpVerifier`] for every phone number.
pub const DEMO_OTP: &str = "1234";

#[cfg_attr(test, mockall::automock)]
pub trait OtpVerifier: Send + Sync {
    /// Whether `code` is the current code for `phone`.
    fn verify(&self, phone: &PhoneNumber, code: &OneTimeCode) -> bool;
}

/// Accepts [`DEMO_OTP`] for any phone.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOtpVerifier;

impl OtpVerifier for FixtureOtpVerifier {
    fn verify(&self, _phone: &PhoneNumber, code: &OneTimeCode) -> bool {
        code.as_str() == DEMO_OTP
    }
}
