//! Port abstraction for principal persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{PhoneNumber, Principal, PrincipalId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by principal store adapters.
    pub enum PrincipalStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "principal store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "principal store query failed: {message}",
        /// A unique field is already taken by another principal.
        Duplicate { field: String } => "principal {field} already registered",
        /// The store could not interpret an identifier it was handed.
        MalformedId { value: String } => "malformed principal id: {value}",
    }
}

/// Principal store.
///
/// Lookups return the public identity record only; secret material never
/// crosses this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Insert a new principal.
    ///
    /// Fails with [`PrincipalStoreError::Duplicate`] when the email or phone
    /// already belongs to someone else.
    async fn insert(&self, principal: &Principal) -> Result<(), PrincipalStoreError>;

    /// Find a principal by identifier.
    async fn find_by_id(&self, id: &PrincipalId)
    -> Result<Option<Principal>, PrincipalStoreError>;

    /// Find a principal by phone number (compared by digits).
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<Principal>, PrincipalStoreError>;
}
