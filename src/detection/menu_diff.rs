//! Item-level diffing of two parsed menus.

use std::collections::HashMap;

use crate::domain::{EventSource, MenuItem, UpdateEvent};

/// Price movements at or below this amount are ignored.
pub const PRICE_TOLERANCE: f64 = 0.01;

/// Compares two menus and emits one event per added item and one per
/// repriced item.
///
/// Additions come first, in `new_items` order, followed by price changes,
/// also in `new_items` order. Items that disappeared produce no event.
#[must_use]
pub fn diff_menus(
    old_items: &[MenuItem],
    new_items: &[MenuItem],
    source: EventSource<'_>,
) -> Vec<UpdateEvent> {
    let previous: HashMap<&str, &MenuItem> =
        old_items.iter().map(|item| (item.key.as_str(), item)).collect();

    let added = new_items
        .iter()
        .filter(|item| !previous.contains_key(item.key.as_str()))
        .map(|item| UpdateEvent::product_added(source, item));

    let repriced = new_items.iter().filter_map(|item| {
        let old = previous.get(item.key.as_str())?;
        ((item.price - old.price).abs() > PRICE_TOLERANCE)
            .then(|| UpdateEvent::price_changed(source, old, item))
    });

    let events: Vec<UpdateEvent> = added.chain(repriced).collect();
    tracing::debug!(
        competitor_id = %source.competitor_id,
        old_items = old_items.len(),
        new_items = new_items.len(),
        events = events.len(),
        "menus diffed"
    );
    events
}
