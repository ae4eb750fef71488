//! Classification history kept in process memory.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use async_trait::async_trait;

use super::POISONED;
use crate::domain::ports::{ClassificationHistory, HistoryStoreError};
use crate::domain::{ClassificationRecord, PrincipalId};

#[derive(Debug, Default)]
pub struct InMemoryClassificationHistory {
    records: RwLock<HashMap<PrincipalId, VecDeque<ClassificationRecord>>>,
}

impl InMemoryClassificationHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClassificationHistory for InMemoryClassificationHistory {
    async fn append(
        &self,
        principal: &PrincipalId,
        record: ClassificationRecord,
        keep: usize,
    ) -> Result<(), HistoryStoreError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| HistoryStoreError::connection(POISONED))?;
        let entries = guard.entry(*principal).or_default();
        entries.push_front(record);
        entries.truncate(keep);
        Ok(())
    }

    async fn recent(
        &self,
        principal: &PrincipalId,
    ) -> Result<Vec<ClassificationRecord>, HistoryStoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| HistoryStoreError::connection(POISONED))?;
        Ok(guard
            .get(principal)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default())
    }
}
