//! Port for scheduled pickup persistence.
use async_trait::async_trait;

use crate::domain::{Pickup, PickupId, PrincipalId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pickup store adapters.
    pub enum PickupStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "pickup store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pickup store query failed: {message}",
        /// The pickup to update does not exist for this principal.
        Missing { id: String } => "pickup {id} not found",
    }
}

/// Pickups are always scoped to the owning principal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PickupRepository: Send + Sync {
    /// Store a new pickup.
    async fn insert(&self, owner: &PrincipalId, pickup: &Pickup) -> Result<(), PickupStoreError>;

    /// Replace an existing pickup.
    async fn update(&self, owner: &PrincipalId, pickup: &Pickup) -> Result<(), PickupStoreError>;

    async fn find(
        &self,
        owner: &PrincipalId,
        id: &PickupId,
    ) -> Result<Option<Pickup>, PickupStoreError>;

    /// All pickups of the owner, in insertion order.
    async fn list(&self, owner: &PrincipalId) -> Result<Vec<Pickup>, PickupStoreError>;
}
