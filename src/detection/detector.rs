//! Whole-page change detection between two snapshots.

use std::sync::Arc;

use chrono::Utc;

use super::classifier::{ChangeClassifier, KeywordClassifier};
use super::text::similarity;
use crate::domain::{ChangeId, DetectedChange, Snapshot};

/// Similarity at or above which two snapshots are considered unchanged.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Compares snapshots and emits a [`DetectedChange`] for significant
/// differences.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    threshold: f64,
    classifier: Arc<dyn ChangeClassifier>,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl ChangeDetector {
    /// Creates a detector with a custom classifier.
    #[must_use]
    pub fn new(threshold: f64, classifier: Arc<dyn ChangeClassifier>) -> Self {
        Self {
            threshold,
            classifier,
        }
    }

    /// Creates a detector with the default [`KeywordClassifier`].
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self::new(threshold, Arc::new(KeywordClassifier::default()))
    }

    /// Returns the similarity threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compares `old` with `new`.
    ///
    /// Returns `None` when the content hashes match or when the similarity
    /// of the normalised texts is at or above the threshold.
    #[must_use]
    pub fn detect(&self, old: &Snapshot, new: &Snapshot) -> Option<DetectedChange> {
        if old.content_hash == new.content_hash {
            tracing::debug!(url = %new.url, "content hash unchanged");
            return None;
        }

        let score = similarity(&old.normalized_text, &new.normalized_text);
        if score >= self.threshold {
            tracing::debug!(
                url = %new.url,
                similarity = score,
                threshold = self.threshold,
                "similarity above threshold"
            );
            return None;
        }

        let before = old.normalized_text.as_str();
        let after = new.normalized_text.as_str();
        let change_type = self.classifier.classify(before, after);
        let severity = self.classifier.severity(change_type, score);
        let diff_summary = self.classifier.summarize(change_type, before, after, score);

        tracing::info!(
            competitor_id = %old.competitor_id,
            url = %old.url,
            similarity = score,
            %change_type,
            %severity,
            "change detected"
        );

        Some(DetectedChange {
            id: ChangeId::new(),
            competitor_id: old.competitor_id.clone(),
            url: old.url.clone(),
            old_snapshot_id: old.id,
            new_snapshot_id: new.id,
            change_type,
            severity,
            before_excerpt: before.to_string(),
            after_excerpt: after.to_string(),
            similarity_score: score,
            diff_summary,
            rationale: None,
            recommended_actions: None,
            detected_at: Utc::now(),
        })
    }
}

/// Compares two snapshots with the default classifier.
#[must_use]
pub fn detect_change(old: &Snapshot, new: &Snapshot, threshold: f64) -> Option<DetectedChange> {
    ChangeDetector::with_threshold(threshold).detect(old, new)
}
