//! Point-in-time page captures and the menu items parsed from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CompetitorId, SnapshotId};

/// One structured product line parsed from a menu page.
///
/// `key` is the join key used when diffing two menus: `id-<productId>`
/// when the page carries a product id, otherwise a slug of the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Stable identity across snapshots.
    pub key: String,
    /// Display name as shown on the page.
    pub name: String,
    /// Price rounded to two decimals. Always positive.
    pub price: f64,
    /// Optional description text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Page-native product id, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

/// Immutable capture of one competitor page.
///
/// `content_hash` is the SHA-256 of `normalized_text`, so two snapshots
/// with equal normalised text always carry equal hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Snapshot identifier.
    pub id: SnapshotId,
    /// Owning competitor.
    pub competitor_id: CompetitorId,
    /// Source URL.
    pub url: String,
    /// Contents of the page `<title>`.
    pub title: String,
    /// Normalised comparison text.
    pub normalized_text: String,
    /// Hex-encoded SHA-256 of `normalized_text`.
    pub content_hash: String,
    /// Parsed menu items, only for structured-menu pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_items: Option<Vec<MenuItem>>,
    /// Capture timestamp.
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    /// Returns `true` if the snapshot carries parsed menu items.
    #[must_use]
    pub const fn has_menu(&self) -> bool {
        self.menu_items.is_some()
    }
}
