//! Optional classification enrichment.
//!
//! After the heuristic detector has typed a change, an [`Enricher`] may
//! replace its type and severity and add a rationale and recommended
//! actions. Enrichment is best effort: [`enrich`] never fails and hands
//! back the heuristic record untouched when the collaborator errors.

pub mod openai;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Classification, DetectedChange};
use crate::error::EnrichmentError;

pub use openai::OpenAiEnricher;

/// Characters of each excerpt sent to the classifier.
pub const EXCERPT_CHARS: usize = 500;

/// Input to a classification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequest {
    /// Start of the earlier text, at most [`EXCERPT_CHARS`] characters.
    pub before_excerpt: String,
    /// Start of the later text, at most [`EXCERPT_CHARS`] characters.
    pub after_excerpt: String,
    /// Page URL.
    pub url: String,
}

impl EnrichmentRequest {
    /// Builds a request from a detected change, truncating the excerpts.
    #[must_use]
    pub fn from_change(change: &DetectedChange) -> Self {
        Self {
            before_excerpt: truncate_chars(&change.before_excerpt, EXCERPT_CHARS),
            after_excerpt: truncate_chars(&change.after_excerpt, EXCERPT_CHARS),
            url: change.url.clone(),
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Classification collaborator.
#[async_trait]
pub trait Enricher: Send + Sync + fmt::Debug {
    /// Classifies a change.
    ///
    /// # Errors
    ///
    /// Returns an [`EnrichmentError`] when the collaborator is disabled,
    /// unreachable, or answers with something that is not a
    /// classification.
    async fn classify(&self, request: &EnrichmentRequest)
    -> Result<Classification, EnrichmentError>;
}

/// Enricher used when no classification service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEnricher;

#[async_trait]
impl Enricher for DisabledEnricher {
    async fn classify(
        &self,
        _request: &EnrichmentRequest,
    ) -> Result<Classification, EnrichmentError> {
        Err(EnrichmentError::Disabled)
    }
}

/// Applies `enricher` to `change`.
///
/// On success returns a new record carrying the enriched classification.
/// On failure logs and returns `change` unchanged.
pub async fn enrich(enricher: &dyn Enricher, change: DetectedChange) -> DetectedChange {
    let request = EnrichmentRequest::from_change(&change);
    match enricher.classify(&request).await {
        Ok(classification) => {
            tracing::info!(
                change_id = %change.id,
                change_type = %classification.change_type,
                severity = %classification.severity,
                "change enriched"
            );
            change.with_classification(classification)
        }
        Err(EnrichmentError::Disabled) => change,
        Err(e) => {
            tracing::warn!(
                change_id = %change.id,
                error = %e,
                "enrichment failed, keeping heuristic classification"
            );
            change
        }
    }
}
