//! Principal store kept in process memory.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::POISONED;
use crate::domain::ports::{PrincipalRepository, PrincipalStoreError};
use crate::domain::{PhoneNumber, Principal, PrincipalId};

/// Principals keyed by id; email and phone uniqueness checked on insert.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalRepository {
    principals: RwLock<HashMap<PrincipalId, Principal>>,
}

impl InMemoryPrincipalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a principal. Tokens already issued for it stop resolving.
    pub fn remove(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalStoreError> {
        let mut guard = self
            .principals
            .write()
            .map_err(|_| PrincipalStoreError::connection(POISONED))?;
        Ok(guard.remove(id))
    }
}

#[async_trait]
impl PrincipalRepository for InMemoryPrincipalRepository {
    async fn insert(&self, principal: &Principal) -> Result<(), PrincipalStoreError> {
        let mut guard = self
            .principals
            .write()
            .map_err(|_| PrincipalStoreError::connection(POISONED))?;
        if guard.contains_key(principal.id()) {
            return Err(PrincipalStoreError::duplicate("id"));
        }
        for existing in guard.values() {
            if existing.email() == principal.email() {
                return Err(PrincipalStoreError::duplicate("email"));
            }
            if existing.phone() == principal.phone() {
                return Err(PrincipalStoreError::duplicate("phone"));
            }
        }
        guard.insert(*principal.id(), principal.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PrincipalId,
    ) -> Result<Option<Principal>, PrincipalStoreError> {
        let guard = self
            .principals
            .read()
            .map_err(|_| PrincipalStoreError::connection(POISONED))?;
        Ok(guard.get(id).cloned())
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<Principal>, PrincipalStoreError> {
        let guard = self
            .principals
            .read()
            .map_err(|_| PrincipalStoreError::connection(POISONED))?;
        Ok(guard.values().find(|p| p.phone() == phone).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Registration, RegistrationParts};
    use rstest::rstest;

    fn principal(email: &str, phone: &str) -> Principal {
        let registration = Registration::try_from_parts(RegistrationParts {
            name: "Asha",
            email,
            phone,
            city: "Pune",
            display_icon: None,
        })
        .expect("valid registration");
        Principal::register(PrincipalId::random(), registration)
    }

    #[rstest]
    #[case("asha@example.com", "+91 90000 00002", "email")]
    #[case("other@example.com", "+919000000001", "phone")]
    #[tokio::test]
    async fn duplicates_are_rejected(
        #[case] email: &str,
        #[case] phone: &str,
        #[case] field: &str,
    ) {
        let repo = InMemoryPrincipalRepository::new();
        repo.insert(&principal("asha@example.com", "+91 90000 00001"))
            .await
            .expect("first insert");
        let err = repo
            .insert(&principal(email, phone))
            .await
            .expect_err("duplicate");
        assert_eq!(err, PrincipalStoreError::duplicate(field));
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_find_inserted_principals() {
        let repo = InMemoryPrincipalRepository::new();
        let stored = principal("asha@example.com", "+91 90000 00001");
        repo.insert(&stored).await.expect("insert");

        let by_id = repo.find_by_id(stored.id()).await.expect("lookup");
        let phone = PhoneNumber::new("+919000000001").expect("phone");
        let by_phone = repo.find_by_phone(&phone).await.expect("lookup");
        assert_eq!(by_id.as_ref(), Some(&stored));
        assert_eq!(by_phone.as_ref(), Some(&stored));
    }

    #[rstest]
    #[tokio::test]
    async fn removed_principals_are_gone() {
        let repo = InMemoryPrincipalRepository::new();
        let stored = principal("asha@example.com", "+91 90000 00001");
        repo.insert(&stored).await.expect("insert");
        repo.remove(stored.id()).expect("remove");
        assert_eq!(repo.find_by_id(stored.id()).await.expect("lookup"), None);
    }
}
