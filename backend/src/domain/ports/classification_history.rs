//! Port for the per-principal classification history.
use async_trait::async_trait;

use crate::domain::{ClassificationRecord, PrincipalId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by history store adapters.
    pub enum HistoryStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "history store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "history store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassificationHistory: Send + Sync {
    /// Prepend `record` to the principal's history, keeping at most `keep`
    /// entries.
    async fn append(
        &self,
        principal: &PrincipalId,
        record: ClassificationRecord,
        keep: usize,
    ) -> Result<(), HistoryStoreError>;

    /// Records for the principal, newest first.
    async fn recent(
        &self,
        principal: &PrincipalId,
    ) -> Result<Vec<ClassificationRecord>, HistoryStoreError>;
}
