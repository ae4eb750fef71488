//! Pickup store kept in process memory.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::POISONED;
use crate::domain::ports::{PickupRepository, PickupStoreError};
use crate::domain::{Pickup, PickupId, PrincipalId};

#[derive(Debug, Default)]
pub struct InMemoryPickupRepository {
    pickups: RwLock<HashMap<PrincipalId, Vec<Pickup>>>,
}

impl InMemoryPickupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PickupRepository for InMemoryPickupRepository {
    async fn insert(&self, owner: &PrincipalId, pickup: &Pickup) -> Result<(), PickupStoreError> {
        let mut guard = self
            .pickups
            .write()
            .map_err(|_| PickupStoreError::connection(POISONED))?;
        guard.entry(*owner).or_default().push(pickup.clone());
        Ok(())
    }

    async fn update(&self, owner: &PrincipalId, pickup: &Pickup) -> Result<(), PickupStoreError> {
        let mut guard = self
            .pickups
            .write()
            .map_err(|_| PickupStoreError::connection(POISONED))?;
        let slot = guard
            .get_mut(owner)
            .and_then(|pickups| pickups.iter_mut().find(|p| p.id == pickup.id))
            .ok_or_else(|| PickupStoreError::missing(pickup.id.to_string()))?;
        *slot = pickup.clone();
        Ok(())
    }

    async fn find(
        &self,
        owner: &PrincipalId,
        id: &PickupId,
    ) -> Result<Option<Pickup>, PickupStoreError> {
        let guard = self
            .pickups
            .read()
            .map_err(|_| PickupStoreError::connection(POISONED))?;
        Ok(guard
            .get(owner)
            .and_then(|pickups| pickups.iter().find(|p| p.id == *id))
            .cloned())
    }

    async fn list(&self, owner: &PrincipalId) -> Result<Vec<Pickup>, PickupStoreError> {
        let guard = self
            .pickups
            .read()
            .map_err(|_| PickupStoreError::connection(POISONED))?;
        Ok(guard.get(owner).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_PICKUP_ADDRESS, PickupStatus, TimeSlot, WasteType};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn pickup() -> Pickup {
        Pickup {
            id: PickupId::random(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).expect("date"),
            time_slot: TimeSlot::ElevenAm,
            waste_type: WasteType::Hazardous,
            address: DEFAULT_PICKUP_ADDRESS.to_owned(),
            status: PickupStatus::Scheduled,
            estimated_weight_kg: 4,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn pickups_are_scoped_to_their_owner() {
        let repo = InMemoryPickupRepository::new();
        let owner = PrincipalId::random();
        let stored = pickup();
        repo.insert(&owner, &stored).await.expect("insert");

        let stranger = PrincipalId::random();
        assert_eq!(repo.find(&stranger, &stored.id).await.expect("find"), None);
        assert_eq!(repo.list(&owner).await.expect("list"), vec![stored]);
    }

    #[rstest]
    #[tokio::test]
    async fn updates_replace_in_place() {
        let repo = InMemoryPickupRepository::new();
        let owner = PrincipalId::random();
        let mut stored = pickup();
        repo.insert(&owner, &stored).await.expect("insert");
        stored.status = PickupStatus::Cancelled;
        repo.update(&owner, &stored).await.expect("update");

        let found = repo.find(&owner, &stored.id).await.expect("find");
        assert_eq!(found.map(|p| p.status), Some(PickupStatus::Cancelled));
    }

    #[rstest]
    #[tokio::test]
    async fn updating_unknown_pickups_fails() {
        let repo = InMemoryPickupRepository::new();
        let err = repo
            .update(&PrincipalId::random(), &pickup())
            .await
            .expect_err("missing");
        assert!(matches!(err, PickupStoreError::Missing { .. }));
    }
}
