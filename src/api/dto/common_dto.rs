//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Competitor, CompetitorId};
use crate::error::WatchError;

/// Competitor reference as supplied by clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitorDto {
    /// Competitor slug.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Website host or URL.
    pub domain: String,
}

impl TryFrom<CompetitorDto> for Competitor {
    type Error = WatchError;

    fn try_from(dto: CompetitorDto) -> Result<Self, Self::Error> {
        let id = CompetitorId::parse(dto.id)?;
        let name = if dto.name.trim().is_empty() {
            id.to_string()
        } else {
            dto.name
        };
        Ok(Self {
            id,
            name,
            domain: dto.domain,
        })
    }
}

/// Optional competitor filter for list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CompetitorFilter {
    /// Restrict results to this competitor.
    #[serde(default)]
    pub competitor_id: Option<String>,
}

impl CompetitorFilter {
    /// Parses the filter, treating a blank value as absent.
    #[must_use]
    pub fn parse(self) -> Option<CompetitorId> {
        self.competitor_id
            .and_then(|raw| CompetitorId::parse(raw).ok())
    }
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Always `true` for successful operations.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Creates a successful acknowledgement.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn competitor_dto_defaults_name_to_id() {
        let dto = CompetitorDto {
            id: "acme".to_string(),
            name: "  ".to_string(),
            domain: "acme.com".to_string(),
        };
        let Ok(competitor) = Competitor::try_from(dto) else {
            panic!("valid dto rejected");
        };
        assert_eq!(competitor.name, "acme");
        assert_eq!(competitor.url(), "https://acme.com");
    }

    #[test]
    fn competitor_dto_rejects_blank_id() {
        let dto = CompetitorDto {
            id: " ".to_string(),
            name: "Acme".to_string(),
            domain: "acme.com".to_string(),
        };
        assert!(matches!(
            Competitor::try_from(dto),
            Err(WatchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn blank_filter_is_absent() {
        let filter = CompetitorFilter {
            competitor_id: Some(String::new()),
        };
        assert!(filter.parse().is_none());
    }
}
