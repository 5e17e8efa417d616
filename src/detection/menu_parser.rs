//! Structured menu extraction from product-listing markup.
//!
//! The primary strategy matches one `<div class="product">` container per
//! item and reads the name, price (with an optional `data-product-id`),
//! and description from inside it. When no container is found the parser
//! falls back to collecting names, prices, and descriptions independently
//! in document order and zipping them by position.

use regex::Captures;

use super::patterns::{
    PRICE_NUMBER, PRODUCT_BLOCK, PRODUCT_DESCRIPTION, PRODUCT_ID_ATTR, PRODUCT_NAME,
    PRODUCT_PRICE, PRODUCT_PRICE_WITH_ID, PUNCTUATION, WHITESPACE,
};
use crate::domain::MenuItem;

/// Bytes searched before a fallback price element for its product id.
const ID_WINDOW_BEFORE: usize = 100;
/// Bytes searched after the start of a fallback price element.
const ID_WINDOW_AFTER: usize = 200;

/// Parses menu items out of a page.
///
/// Items without a name or with a non-positive price are skipped. Never
/// fails: markup that yields nothing produces an empty list and a warning.
#[must_use]
pub fn parse_menu(html: &str) -> Vec<MenuItem> {
    let blocks: Vec<&str> = PRODUCT_BLOCK.find_iter(html).map(|m| m.as_str()).collect();

    let items = if blocks.is_empty() {
        tracing::warn!("no product blocks found, using positional fallback");
        parse_positional(html)
    } else {
        tracing::debug!(blocks = blocks.len(), "found product blocks");
        blocks
            .iter()
            .enumerate()
            .filter_map(|(index, block)| parse_block(index, block))
            .collect()
    };

    if items.is_empty() {
        tracing::warn!("menu parser produced no items");
    } else {
        tracing::debug!(items = items.len(), "parsed menu items");
    }
    items
}

fn parse_block(index: usize, block: &str) -> Option<MenuItem> {
    let name = PRODUCT_NAME.captures(block).and_then(|c| group(&c, 1));
    let (raw_price, product_id) = match PRODUCT_PRICE_WITH_ID.captures(block) {
        Some(caps) => (group(&caps, 2), group(&caps, 1)),
        None => (
            PRODUCT_PRICE.captures(block).and_then(|c| group(&c, 1)),
            None,
        ),
    };
    let description = PRODUCT_DESCRIPTION.captures(block).and_then(|c| group(&c, 1));

    let (Some(name), Some(raw_price)) = (name, raw_price) else {
        tracing::warn!(block = index, "product block is missing a name or price");
        return None;
    };
    build_item(name, &raw_price, description, product_id)
}

fn parse_positional(html: &str) -> Vec<MenuItem> {
    let names: Vec<String> = PRODUCT_NAME
        .captures_iter(html)
        .filter_map(|c| group(&c, 1))
        .collect();
    let prices: Vec<(usize, String)> = PRODUCT_PRICE
        .captures_iter(html)
        .filter_map(|c| {
            let start = c.get(0)?.start();
            Some((start, group(&c, 1)?))
        })
        .collect();
    let mut descriptions = PRODUCT_DESCRIPTION
        .captures_iter(html)
        .map(|c| group(&c, 1));

    names
        .into_iter()
        .zip(prices)
        .filter_map(|(name, (start, raw_price))| {
            let description = descriptions.next().flatten();
            let product_id = nearby_product_id(html, start);
            build_item(name, &raw_price, description, product_id)
        })
        .collect()
}

/// Looks for a `data-product-id` attribute in a window around `start`.
fn nearby_product_id(html: &str, start: usize) -> Option<String> {
    let from = floor_boundary(html, start.saturating_sub(ID_WINDOW_BEFORE));
    let to = floor_boundary(html, start.saturating_add(ID_WINDOW_AFTER).min(html.len()));
    let window = html.get(from..to)?;
    PRODUCT_ID_ATTR.captures(window).and_then(|c| group(&c, 1))
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn group(caps: &Captures<'_>, index: usize) -> Option<String> {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn build_item(
    name: String,
    raw_price: &str,
    description: Option<String>,
    product_id: Option<String>,
) -> Option<MenuItem> {
    let price = normalize_price(raw_price);
    if price <= 0.0 {
        tracing::warn!(%name, raw_price, "skipping item without a usable price");
        return None;
    }
    Some(MenuItem {
        key: generate_item_key(&name, product_id.as_deref()),
        name,
        price,
        description,
        product_id,
    })
}

/// Converts a displayed price into a number rounded to two decimals.
///
/// Currency symbols, thousands separators, and whitespace are removed
/// and the leading numeric part is parsed. Anything unparsable yields
/// `0.0` and a warning.
#[must_use]
pub fn normalize_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',') && !c.is_whitespace())
        .collect();

    let parsed = PRICE_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite());

    match parsed {
        Some(value) => (value * 100.0).round() / 100.0,
        None => {
            if !raw.trim().is_empty() {
                tracing::warn!(raw, "failed to parse price");
            }
            0.0
        }
    }
}

/// Derives the diff join key for a menu item.
///
/// `id-<product_id>` when the page supplies an id, otherwise a slug of the
/// name: lowercased, punctuation removed, whitespace runs turned into `-`.
#[must_use]
pub fn generate_item_key(name: &str, product_id: Option<&str>) -> String {
    if let Some(id) = product_id {
        return format!("id-{id}");
    }
    let lowered = name.to_lowercase();
    let collapsed = WHITESPACE.replace_all(lowered.trim(), " ");
    let stripped = PUNCTUATION.replace_all(&collapsed, "");
    WHITESPACE.replace_all(&stripped, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK_MENU: &str = r#"
<html><head><title>Slice &amp; Wood</title></head><body>
<div class="menu">
    <div class="product">
      <div class="product-image" style="background-image: url('a.jpg');"></div>
      <div class="product-info">
        <div class="product-header">
          <h3 class="product-name">Margherita</h3>
          <span class="product-price clickable-price" onclick="changePrice(1)" data-product-id="1">$14</span>
        </div>
        <p class="product-description">San Marzano tomato, buffalo mozzarella</p>
        <button class="product-button">Add to Cart</button>
      </div>
    </div>
    <div class="product">
      <div class="product-image"></div>
      <div class="product-info">
        <div class="product-header">
          <h3 class="product-name">Pepperoni</h3>
          <span class="product-price" data-product-id="2">$15.40</span>
        </div>
        <p class="product-description">Double layer pepperoni</p>
      </div>
    </div>
    <div class="product">
      <div class="product-info">
        <h3 class="product-name">Ghost Pie</h3>
        <span class="product-price">market price</span>
      </div>
    </div>
</div>
</body></html>
"#;

    #[test]
    fn normalize_price_handles_common_formats() {
        assert!((normalize_price("$14") - 14.0).abs() < f64::EPSILON);
        assert!((normalize_price("$15.40") - 15.4).abs() < f64::EPSILON);
        assert!((normalize_price("14.00") - 14.0).abs() < f64::EPSILON);
        assert!((normalize_price(" $1,250.5 ") - 1250.5).abs() < f64::EPSILON);
        assert!((normalize_price("€9.999") - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_price_takes_numeric_prefix() {
        assert!((normalize_price("$12.50/slice") - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_price_unparsable_is_zero() {
        assert!(normalize_price("free").abs() < f64::EPSILON);
        assert!(normalize_price("").abs() < f64::EPSILON);
    }

    #[test]
    fn item_key_prefers_product_id() {
        assert_eq!(generate_item_key("The Margherita", Some("1")), "id-1");
        assert_eq!(
            generate_item_key("The Margherita", Some("1")),
            generate_item_key("The Margherita", Some("1"))
        );
        assert_ne!(
            generate_item_key("The Margherita", Some("1")),
            generate_item_key("The Margherita", Some("2"))
        );
    }

    #[test]
    fn item_key_slugifies_name() {
        assert_eq!(generate_item_key("  The   Margherita! ", None), "the-margherita");
        assert_eq!(generate_item_key("Mac & Cheese", None), "mac-cheese");
        assert_eq!(generate_item_key("BBQ Chicken", None), generate_item_key("bbq  chicken", None));
    }

    #[test]
    fn parses_product_blocks() {
        let items = parse_menu(BLOCK_MENU);
        let summary: Vec<(&str, &str, f64)> = items
            .iter()
            .map(|i| (i.key.as_str(), i.name.as_str(), i.price))
            .collect();
        assert_eq!(
            summary,
            vec![("id-1", "Margherita", 14.0), ("id-2", "Pepperoni", 15.4)]
        );
        assert_eq!(
            items.first().and_then(|i| i.description.as_deref()),
            Some("San Marzano tomato, buffalo mozzarella")
        );
        assert_eq!(items.first().and_then(|i| i.product_id.as_deref()), Some("1"));
    }

    #[test]
    fn falls_back_to_positional_extraction() {
        let html = r#"
<ul>
  <li><h3 class="product-name">Margherita</h3></li>
  <li><h3 class="product-name">Funghi</h3></li>
</ul>
<p class="product-description">Classic</p>
<p class="product-description">Wild mushrooms</p>
<span class="product-price" data-product-id="7">$14</span>
<span class="product-price">$16.50</span>
"#;
        let items = parse_menu(html);
        let summary: Vec<(&str, f64, Option<&str>)> = items
            .iter()
            .map(|i| (i.name.as_str(), i.price, i.description.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Margherita", 14.0, Some("Classic")),
                ("Funghi", 16.5, Some("Wild mushrooms")),
            ]
        );
        assert_eq!(items.first().map(|i| i.key.as_str()), Some("id-7"));
    }

    #[test]
    fn fallback_window_respects_char_boundaries() {
        let padding = "é".repeat(120);
        let html = format!(
            r#"<h3 class="product-name">Crème</h3>{padding}<span class="product-price">$9</span>"#
        );
        let items = parse_menu(&html);
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|i| i.key.as_str()), Some("crème"));
    }

    #[test]
    fn unrecognised_markup_yields_empty_list() {
        assert!(parse_menu("<html><body><p>Closed for renovation</p></body></html>").is_empty());
        assert!(parse_menu("").is_empty());
    }
}
