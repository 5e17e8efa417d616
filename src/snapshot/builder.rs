//! Snapshot construction: fetch, extract, normalise, hash.

use std::sync::Arc;

use chrono::Utc;

use super::extract::{extract_title, flatten_menu_text, strip_markup};
use super::fetcher::PageFetcher;
use crate::detection::{content_hash, normalize_text, parse_menu};
use crate::domain::{CompetitorId, Snapshot, SnapshotId};
use crate::error::FetchError;

/// Default extraction budget, in characters.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 50_000;

/// Default URL substring that marks a structured menu page.
pub const DEFAULT_MENU_URL_MARKER: &str = "pizza-website";

/// Tunables for [`SnapshotBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Extracted text is truncated to this many characters before
    /// normalisation.
    pub max_text_chars: usize,
    /// URLs containing this substring are parsed as structured menus.
    pub menu_url_marker: String,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            menu_url_marker: DEFAULT_MENU_URL_MARKER.to_string(),
        }
    }
}

/// Fetches pages and packages them into immutable [`Snapshot`]s.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    fetcher: Arc<dyn PageFetcher>,
    options: SnapshotOptions,
}

impl SnapshotBuilder {
    /// Creates a builder on top of `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: SnapshotOptions) -> Self {
        Self { fetcher, options }
    }

    /// Returns the builder options.
    #[must_use]
    pub const fn options(&self) -> &SnapshotOptions {
        &self.options
    }

    /// Returns `true` if `url` is treated as a structured menu page.
    #[must_use]
    pub fn is_menu_url(&self, url: &str) -> bool {
        !self.options.menu_url_marker.is_empty() && url.contains(&self.options.menu_url_marker)
    }

    /// Fetches `url` and builds a snapshot of it.
    ///
    /// # Errors
    ///
    /// Propagates the [`FetchError`] of the underlying fetcher unchanged.
    pub async fn create_snapshot(
        &self,
        competitor_id: &CompetitorId,
        url: &str,
    ) -> Result<Snapshot, FetchError> {
        let html = self.fetcher.fetch(url).await?;
        Ok(self.build_snapshot(competitor_id, url, &html))
    }

    /// Builds a snapshot from markup that has already been retrieved.
    #[must_use]
    pub fn build_snapshot(&self, competitor_id: &CompetitorId, url: &str, html: &str) -> Snapshot {
        let title = extract_title(html);

        let (text, menu_items) = if self.is_menu_url(url) {
            let items = parse_menu(html);
            let text = flatten_menu_text(html).unwrap_or_else(|| strip_markup(html));
            (text, Some(items))
        } else {
            (strip_markup(html), None)
        };

        let truncated: String = text.chars().take(self.options.max_text_chars).collect();
        let normalized_text = normalize_text(&truncated);
        let content_hash = content_hash(&normalized_text);

        tracing::info!(
            %competitor_id,
            url,
            hash = %content_hash,
            menu_items = menu_items.as_ref().map_or(0, Vec::len),
            "snapshot built"
        );

        Snapshot {
            id: SnapshotId::new(),
            competitor_id: competitor_id.clone(),
            url: url.to_string(),
            title,
            normalized_text,
            content_hash,
            menu_items,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;

    #[derive(Debug, Default)]
    struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    const MENU_PAGE: &str = r#"<html><head><title>Slice &amp; Wood</title></head><body>
<div class="product">
  <div class="product-info">
    <h3 class="product-name">Margherita</h3>
    <span class="product-price" data-product-id="1">$14</span>
    <p class="product-description">Classic</p>
  </div>
</div>
</body></html>"#;

    fn builder(pages: &[(&str, &str)], options: SnapshotOptions) -> SnapshotBuilder {
        let fetcher = StaticFetcher {
            pages: pages
                .iter()
                .map(|(u, b)| ((*u).to_string(), (*b).to_string()))
                .collect(),
        };
        SnapshotBuilder::new(Arc::new(fetcher), options)
    }

    fn acme() -> CompetitorId {
        CompetitorId("acme".to_string())
    }

    #[tokio::test]
    async fn plain_page_snapshot() {
        let url = "https://acme.test/pricing";
        let b = builder(
            &[(url, "<title>Acme</title><p>Enterprise plan $5,000 / month</p><p>Privacy</p>")],
            SnapshotOptions::default(),
        );
        let Ok(snapshot) = b.create_snapshot(&acme(), url).await else {
            panic!("snapshot should build");
        };
        assert_eq!(snapshot.title, "Acme");
        assert_eq!(snapshot.normalized_text, "acme enterprise plan $5,000 / month");
        assert_eq!(snapshot.content_hash, content_hash(&snapshot.normalized_text));
        assert!(snapshot.menu_items.is_none());
    }

    #[tokio::test]
    async fn menu_page_snapshot_carries_items() {
        let url = "http://localhost:3000/api/demo/pizza-website";
        let b = builder(&[(url, MENU_PAGE)], SnapshotOptions::default());
        let Ok(snapshot) = b.create_snapshot(&acme(), url).await else {
            panic!("snapshot should build");
        };
        assert_eq!(snapshot.normalized_text, "margherita classic $14");
        let Some(items) = snapshot.menu_items else {
            panic!("menu page should carry items");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|i| i.key.as_str()), Some("id-1"));
    }

    #[tokio::test]
    async fn menu_page_without_products_has_empty_item_list() {
        let url = "http://localhost/pizza-website";
        let b = builder(&[(url, "<p>Closed today</p>")], SnapshotOptions::default());
        let Ok(snapshot) = b.create_snapshot(&acme(), url).await else {
            panic!("snapshot should build");
        };
        assert_eq!(snapshot.menu_items, Some(Vec::new()));
        assert_eq!(snapshot.normalized_text, "closed today");
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        let b = builder(&[], SnapshotOptions::default());
        let result = b.create_snapshot(&acme(), "https://acme.test/missing").await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }

    #[test]
    fn text_is_truncated_before_normalisation() {
        let b = builder(
            &[],
            SnapshotOptions {
                max_text_chars: 10,
                ..SnapshotOptions::default()
            },
        );
        let snapshot = b.build_snapshot(&acme(), "https://acme.test", "<p>abcdefghij klmnop</p>");
        assert_eq!(snapshot.normalized_text, "abcdefghij");
    }

    #[test]
    fn identical_pages_hash_identically() {
        let b = builder(&[], SnapshotOptions::default());
        let a = b.build_snapshot(&acme(), "https://acme.test", "<p>Same</p>");
        let c = b.build_snapshot(&acme(), "https://acme.test", "<div>same </div>");
        assert_eq!(a.content_hash, c.content_hash);
        assert_ne!(a.id, c.id);
    }
}
