//! Classification use-case: look a label up and remember the result.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use super::{ClassificationLookup, ClassificationRecord};
use crate::domain::ports::{ClassificationHistory, HistoryStoreError};
use crate::domain::{Error, PrincipalId, ValidationErrors};

/// Records kept per principal.
pub const HISTORY_LIMIT: usize = 10;

const MAX_LABEL_LEN: usize = 255;

fn map_history_error(error: HistoryStoreError) -> Error {
    match error {
        HistoryStoreError::Connection { message } => {
            Error::internal("history store unavailable").with_diagnostic(message)
        }
        HistoryStoreError::Query { message } => {
            Error::internal("history store error").with_diagnostic(message)
        }
    }
}

fn validate_label(raw: &str) -> Result<String, Error> {
    let label = raw.trim();
    let mut errors = ValidationErrors::default();
    if label.is_empty() {
        errors.push("label", "Please provide an item label");
    } else if label.chars().count() > MAX_LABEL_LEN {
        errors.push(
            "label",
            format!("Label must be at most {MAX_LABEL_LEN} characters"),
        );
    }
    errors.into_result(label.to_owned())
}

#[derive(Clone)]
pub struct ClassificationService {
    lookup: ClassificationLookup,
    history: Arc<dyn ClassificationHistory>,
    clock: Arc<dyn Clock>,
}

impl ClassificationService {
    pub fn new(
        lookup: ClassificationLookup,
        history: Arc<dyn ClassificationHistory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lookup,
            history,
            clock,
        }
    }

    /// Classify `label` for `principal` and prepend it to their history.
    pub async fn classify(
        &self,
        principal: &PrincipalId,
        label: &str,
    ) -> Result<ClassificationRecord, Error> {
        let label = validate_label(label)?;
        let result = self.lookup.lookup(&label);
        let record = ClassificationRecord {
            id: Uuid::new_v4(),
            label,
            result,
            classified_at: self.clock.utc(),
        };
        self.history
            .append(principal, record.clone(), HISTORY_LIMIT)
            .await
            .map_err(map_history_error)?;
        info!(
            principal_id = %principal,
            key = record.result.key.as_str(),
            eco_points = record.result.eco_points,
            "item classified"
        );
        Ok(record)
    }

    /// The principal's recent classifications, newest first.
    pub async fn history(&self, principal: &PrincipalId) -> Result<Vec<ClassificationRecord>, Error> {
        let mut records = self
            .history
            .recent(principal)
            .await
            .map_err(map_history_error)?;
        records.truncate(HISTORY_LIMIT);
        Ok(records)
    }
}
