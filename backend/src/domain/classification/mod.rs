//! Waste classification by label.
//!
//! A label (typically an uploaded filename) is matched against the keyword
//! rules in [`catalogue`]; the first rule whose keyword appears in the
//! lower-cased label selects the result record. Nothing here inspects image
//! content.

mod catalogue;
mod service;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub use catalogue::{ClassificationKey, WasteCategory};
pub use service::{ClassificationService, HISTORY_LIMIT};

use catalogue::KEYWORD_RULES;

/// What to do with a label no keyword matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Return the dedicated `unclassified` record.
    #[default]
    Unclassified,
    /// Pick a matchable key uniformly at random.
    Random,
}

/// Error for unknown [`FallbackPolicy`] names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fallback policy `{0}` (expected `unclassified` or `random`)")]
pub struct UnknownFallbackPolicy(pub String);

impl FromStr for FallbackPolicy {
    type Err = UnknownFallbackPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unclassified" => Ok(Self::Unclassified),
            "random" => Ok(Self::Random),
            other => Err(UnknownFallbackPolicy(other.to_owned())),
        }
    }
}

/// Immutable classification outcome for a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub key: ClassificationKey,
    pub category: WasteCategory,
    #[schema(maximum = 100, example = 94)]
    pub confidence_percent: u8,
    pub instructions: String,
    pub tips: Vec<String>,
    #[schema(example = 10)]
    pub eco_points: u32,
}

impl From<ClassificationKey> for ClassificationResult {
    fn from(key: ClassificationKey) -> Self {
        let spec = key.spec();
        Self {
            key,
            category: spec.category,
            confidence_percent: spec.confidence_percent,
            instructions: spec.instructions.to_owned(),
            tips: spec.tips.iter().map(|tip| (*tip).to_owned()).collect(),
            eco_points: spec.eco_points,
        }
    }
}

/// A classification stored in a principal's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRecord {
    pub id: Uuid,
    #[schema(example = "plastic_bottle.jpg")]
    pub label: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub classified_at: DateTime<Utc>,
}

/// First keyword rule matching `label`, if any.
///
/// # Examples
/// ```
/// use ecowaste::domain::{ClassificationKey, match_label};
///
/// assert_eq!(match_label("IMG_Bottle_01.jpg"), Some(ClassificationKey::Plastic));
/// assert_eq!(match_label("wine-glass.png"), Some(ClassificationKey::Glass));
/// assert_eq!(match_label("holiday.jpg"), None);
/// ```
pub fn match_label(label: &str) -> Option<ClassificationKey> {
    let label = label.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| label.contains(keyword)))
        .map(|(key, _)| *key)
}

/// Label lookup with a configured fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationLookup {
    fallback: FallbackPolicy,
}

impl ClassificationLookup {
    pub fn new(fallback: FallbackPolicy) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Select the key for `label`.
    pub fn select<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> ClassificationKey {
        match (match_label(label), self.fallback) {
            (Some(key), _) => key,
            (None, FallbackPolicy::Unclassified) => ClassificationKey::Unclassified,
            (None, FallbackPolicy::Random) => ClassificationKey::MATCHABLE
                .choose(rng)
                .copied()
                .unwrap_or(ClassificationKey::Unclassified),
        }
    }

    /// Classify `label` using the thread-local generator for the random
    /// fallback.
    pub fn lookup(&self, label: &str) -> ClassificationResult {
        self.select(label, &mut rand::thread_rng()).into()
    }
}
