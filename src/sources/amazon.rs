//! Amazon search-results source.
//!
//! Renders a query-specific results page through a [`SessionFactory`] and
//! extracts one record per result card. Transient faults (render timeouts,
//! session crashes) are consumed by a fixed retry budget; exhausting it
//! yields `None` rather than an error, because the caller holds a fallback.

use crate::config::ScrapeConfig;
use crate::error::{Result, ScoutError};
use crate::render::{PageElement, RenderSession, SessionFactory};
use crate::types::Product;
use std::time::Duration;
use url::Url;

/// CSS selector matching one result card on the search page.
const RESULT_CARD: &str = "[data-component-type='s-search-result']";
/// Primary heading link inside a card; yields both title and href.
const TITLE_LINK: &str = "h2 a.a-link-normal";
/// Screen-reader price text. Not every listing shows a price.
const PRICE_TEXT: &str = "span.a-price > span.a-offscreen";
/// Rating label of the form "4.5 out of 5 stars".
const RATING_LABEL: &str = "span.a-icon-alt";

/// Session-open attempts per acquisition before giving up on the live page.
const SEARCH_ATTEMPTS: u32 = 2;

/// Live search-results source.
///
/// Opens a fresh rendering session per attempt and closes it before the
/// attempt returns, whatever the outcome.
pub struct AmazonSource<F> {
    factory: F,
    config: ScrapeConfig,
}

impl<F: SessionFactory> AmazonSource<F> {
    /// Create a source over a session factory and scrape settings.
    pub fn new(factory: F, config: ScrapeConfig) -> Self {
        Self { factory, config }
    }

    /// Scrape up to `limit` products for `query`.
    ///
    /// Returns `None` when every attempt failed or parsed nothing — an
    /// explicit "no result", distinct from an empty list. An attempt that
    /// parses at least one record wins immediately; remaining attempts are
    /// not spent.
    pub async fn acquire(&self, query: &str, limit: usize) -> Option<Vec<Product>> {
        let url = match self.search_url(query) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(error = %err, "could not build search URL");
                return None;
            }
        };

        for attempt in 1..=SEARCH_ATTEMPTS {
            let mut session = match self.factory.open().await {
                Ok(session) => session,
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "session open failed");
                    continue;
                }
            };

            let outcome = self.scrape_once(&mut session, &url, limit).await;
            // The session belongs to this attempt alone; release it before
            // deciding anything else.
            session.close().await;

            match outcome {
                Ok(products) if !products.is_empty() => {
                    tracing::debug!(count = products.len(), attempt, "live page yielded products");
                    return Some(products);
                }
                Ok(_) => tracing::warn!(attempt, "no parseable result cards"),
                Err(err) => tracing::warn!(attempt, error = %err, "search attempt failed"),
            }
        }

        None
    }

    async fn scrape_once<S: RenderSession>(
        &self,
        session: &mut S,
        url: &str,
        limit: usize,
    ) -> Result<Vec<Product>> {
        session.goto(url).await?;
        session
            .wait_for(
                RESULT_CARD,
                Duration::from_secs(self.config.render_wait_seconds),
            )
            .await?;

        let cards = session.elements(RESULT_CARD).await?;
        let mut products = Vec::new();
        for card in cards.iter().take(limit) {
            if let Some(product) = parse_card(card).await {
                products.push(product);
            }
        }
        Ok(products)
    }

    fn search_url(&self, query: &str) -> Result<String> {
        Url::parse_with_params(&self.config.search_base, &[("k", query)])
            .map(String::from)
            .map_err(|e| ScoutError::Config(format!("invalid search base URL: {e}")))
    }
}

/// Extract one record from a result card.
///
/// Title and URL are load-bearing: a card that cannot produce a non-empty
/// title is discarded. Price and rating are taken when present and dropped
/// without complaint when not.
pub(crate) async fn parse_card<E: PageElement>(card: &E) -> Option<Product> {
    let raw_title = card.text(TITLE_LINK).await.ok()?;
    let title = raw_title.trim();
    if title.is_empty() {
        return None;
    }
    let url = card.attr(TITLE_LINK, "href").await.ok()?.unwrap_or_default();

    let price = match card.text(PRICE_TEXT).await {
        Ok(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Err(_) => None,
    };

    let rating = match card.text(RATING_LABEL).await {
        Ok(label) => parse_rating(&label),
        Err(_) => None,
    };

    Some(Product::new(title, price, rating, url))
}

/// Parse the leading numeric token of a rating label like
/// "4.5 out of 5 stars".
pub(crate) fn parse_rating(label: &str) -> Option<f64> {
    label.split_whitespace().next()?.parse().ok()
}
