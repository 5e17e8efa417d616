//! Text extraction from raw markup.

use crate::detection::patterns::{
    ANY_TAG, PRODUCT_DESCRIPTION, PRODUCT_NAME, PRODUCT_PRICE, SCRIPT_BLOCK, STYLE_BLOCK, TITLE,
    WHITESPACE,
};

/// Contents of the first `<title>` element, trimmed. Empty if absent.
#[must_use]
pub fn extract_title(html: &str) -> String {
    TITLE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Visible text: scripts and styles removed, tags replaced by spaces,
/// whitespace collapsed.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    let text = ANY_TAG.replace_all(&without_styles, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Comparison text for a structured menu page.
///
/// Product names, then descriptions, then prices, each group in document
/// order. Returns `None` when the page has no product names.
#[must_use]
pub fn flatten_menu_text(html: &str) -> Option<String> {
    let collect = |re: &regex::Regex| -> Vec<String> {
        re.captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect()
    };

    let names = collect(&PRODUCT_NAME);
    if names.is_empty() {
        return None;
    }
    let descriptions = collect(&PRODUCT_DESCRIPTION);
    let prices = collect(&PRODUCT_PRICE);

    let text = format!(
        "{} {} {}",
        names.join(" "),
        descriptions.join(" "),
        prices.join(" ")
    );
    Some(text.trim().to_string())
}
