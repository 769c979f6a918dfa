//! Fixed-catalog fallback source.
//!
//! One bounded GET against the public catalog endpoint, normalised to the
//! shared record shape. This source IS the fallback, so it does not degrade
//! further: any transport problem is the caller's to handle.

use crate::config::ScrapeConfig;
use crate::error::{Result, ScoutError};
use crate::http;
use crate::types::Product;
use serde::Deserialize;
use std::time::Duration;

/// Raw catalog item as served by the endpoint.
#[derive(Debug, Deserialize)]
struct CatalogItem {
    id: u64,
    title: String,
    price: f64,
    #[serde(default)]
    rating: Option<CatalogRating>,
}

#[derive(Debug, Deserialize)]
struct CatalogRating {
    rate: f64,
}

/// Catalog-backed product source.
pub struct FakeStoreSource {
    config: ScrapeConfig,
}

impl FakeStoreSource {
    /// Create a source over the given scrape settings.
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// Fetch the first `limit` catalog items as product records.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Http`] when the request cannot complete,
    /// [`ScoutError::Transport`] on a non-success status, and
    /// [`ScoutError::Shape`] when the body is not the expected item array.
    pub async fn acquire(&self, limit: usize) -> Result<Vec<Product>> {
        let client = http::build_client(
            Duration::from_secs(self.config.catalog_timeout_seconds),
            self.config.user_agent.as_deref(),
        )?;

        let response = client
            .get(&self.config.catalog_url)
            .send()
            .await
            .map_err(|e| ScoutError::Http(format!("catalog request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScoutError::Http(format!("catalog read failed: {e}")))?;

        if !status.is_success() {
            return Err(ScoutError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let items: Vec<CatalogItem> =
            serde_json::from_str(&body).map_err(|_| ScoutError::Shape(body))?;
        tracing::debug!(count = items.len(), "catalog items fetched");

        Ok(normalize(items, limit, &self.config.catalog_url))
    }
}

/// Convert catalog items to the shared record shape.
///
/// Prices arrive as bare numbers and leave as two-decimal dollar strings;
/// the listing URL is synthesised from the item id.
fn normalize(items: Vec<CatalogItem>, limit: usize, base_url: &str) -> Vec<Product> {
    items
        .into_iter()
        .take(limit)
        .map(|item| {
            Product::new(
                item.title,
                Some(format!("${:.2}", item.price)),
                item.rating.map(|r| r.rate),
                format!("{}/{}", base_url.trim_end_matches('/'), item.id),
            )
        })
        .collect()
}
