//! Monitored competitor.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CompetitorId;

/// A competitor whose website is monitored.
///
/// `domain` is either a bare host (`acme.com`) or a full URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Competitor {
    /// Competitor identifier.
    pub id: CompetitorId,
    /// Display name.
    pub name: String,
    /// Website host or URL.
    pub domain: String,
}

impl Competitor {
    /// Creates a competitor without validating the id.
    ///
    /// Used for configured defaults; request input goes through
    /// [`CompetitorId::parse`].
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            id: CompetitorId(id.into()),
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// Returns the page URL to monitor, defaulting the scheme to `https`.
    #[must_use]
    pub fn url(&self) -> String {
        let domain = self.domain.trim();
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }
}
