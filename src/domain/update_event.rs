//! Fine-grained menu update events.
//!
//! The menu differ emits one [`UpdateEvent`] per newly appearing item and
//! one per item whose price moved by more than a cent.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CompetitorId, EventId, MenuItem};

/// Discriminator for [`UpdateEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateEventType {
    /// An item key appeared that the previous menu did not have.
    ProductAdded,
    /// An existing item changed price.
    PriceChanged,
}

impl UpdateEventType {
    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductAdded => "PRODUCT_ADDED",
            Self::PriceChanged => "PRICE_CHANGED",
        }
    }
}

impl fmt::Display for UpdateEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item details carried by an [`UpdateEvent`].
///
/// Additions carry `price`; price changes carry `old_price`/`new_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    /// Menu item key.
    pub item_key: String,
    /// Menu item display name.
    pub item_name: String,
    /// Current price of an added item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Previous price of a repriced item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<f64>,
    /// New price of a repriced item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_price: Option<f64>,
    /// Item description, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One item-level event from menu diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    /// Event identifier.
    pub id: EventId,
    /// Competitor the menu belongs to.
    pub competitor_id: CompetitorId,
    /// Competitor display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_name: Option<String>,
    /// Menu page URL.
    pub url: String,
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: UpdateEventType,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Item details.
    pub payload: UpdatePayload,
}

/// Where an event came from: competitor, name, and page.
#[derive(Debug, Clone, Copy)]
pub struct EventSource<'a> {
    /// Competitor identifier.
    pub competitor_id: &'a CompetitorId,
    /// Competitor display name.
    pub competitor_name: &'a str,
    /// Menu page URL.
    pub url: &'a str,
}

impl UpdateEvent {
    /// Builds a `PRODUCT_ADDED` event for `item`.
    #[must_use]
    pub fn product_added(source: EventSource<'_>, item: &MenuItem) -> Self {
        Self::new(
            source,
            UpdateEventType::ProductAdded,
            UpdatePayload {
                item_key: item.key.clone(),
                item_name: item.name.clone(),
                price: Some(item.price),
                old_price: None,
                new_price: None,
                description: item.description.clone(),
            },
        )
    }

    /// Builds a `PRICE_CHANGED` event from the old and new versions of an item.
    #[must_use]
    pub fn price_changed(source: EventSource<'_>, old: &MenuItem, new: &MenuItem) -> Self {
        Self::new(
            source,
            UpdateEventType::PriceChanged,
            UpdatePayload {
                item_key: new.key.clone(),
                item_name: new.name.clone(),
                price: None,
                old_price: Some(old.price),
                new_price: Some(new.price),
                description: new.description.clone(),
            },
        )
    }

    fn new(source: EventSource<'_>, event_type: UpdateEventType, payload: UpdatePayload) -> Self {
        Self {
            id: EventId::new(),
            competitor_id: source.competitor_id.clone(),
            competitor_name: Some(source.competitor_name.to_string()),
            url: source.url.to_string(),
            event_type,
            created_at: Utc::now(),
            payload,
        }
    }
}

/// Returns the events of the given type, preserving order.
#[must_use]
pub fn filter_events_by_type(
    events: &[UpdateEvent],
    event_type: UpdateEventType,
) -> Vec<UpdateEvent> {
    events
        .iter()
        .filter(|e| e.event_type == event_type)
        .cloned()
        .collect()
}
