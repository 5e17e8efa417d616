//! Coarse-grained page changes and their classification.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ChangeId, CompetitorId, SnapshotId};

/// What kind of change was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// New products or features.
    Product,
    /// Price movements.
    Pricing,
    /// Anything else.
    Other,
}

impl ChangeType {
    /// Returns the wire name of the change type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Pricing => "pricing",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgent a change is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor.
    Low,
    /// Significant.
    Medium,
    /// Critical impact.
    High,
}

impl Severity {
    /// Returns the wire name of the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification returned by the enrichment collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Change type chosen by the classifier.
    pub change_type: ChangeType,
    /// Severity chosen by the classifier.
    pub severity: Severity,
    /// One or two sentences on why the change matters.
    pub rationale: String,
    /// Suggested follow-up actions.
    pub recommended_actions: Vec<String>,
}

/// One change between two whole-page snapshots.
///
/// Only produced when the similarity of the two snapshots is strictly
/// below the detector threshold and their content hashes differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectedChange {
    /// Change identifier.
    pub id: ChangeId,
    /// Competitor the pages belong to.
    pub competitor_id: CompetitorId,
    /// Page URL.
    pub url: String,
    /// Earlier snapshot.
    pub old_snapshot_id: SnapshotId,
    /// Later snapshot.
    pub new_snapshot_id: SnapshotId,
    /// Heuristic or enriched change type.
    pub change_type: ChangeType,
    /// Heuristic or enriched severity.
    pub severity: Severity,
    /// Normalised text of the earlier snapshot.
    pub before_excerpt: String,
    /// Normalised text of the later snapshot.
    pub after_excerpt: String,
    /// Jaccard similarity in `[0, 1]`.
    pub similarity_score: f64,
    /// Human-readable one-line summary. Advisory only.
    pub diff_summary: String,
    /// Enrichment rationale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// Enrichment recommendations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_actions: Option<Vec<String>>,
    /// Detection timestamp.
    pub detected_at: DateTime<Utc>,
}

impl DetectedChange {
    /// Returns a new record with the enrichment classification applied.
    ///
    /// Type and severity are overwritten unconditionally; the receiver is
    /// left untouched.
    #[must_use]
    pub fn with_classification(&self, classification: Classification) -> Self {
        Self {
            change_type: classification.change_type,
            severity: classification.severity,
            rationale: Some(classification.rationale),
            recommended_actions: Some(classification.recommended_actions),
            ..self.clone()
        }
    }
}
