//! Core record type shared by the acquisition sources and the enricher.

use serde::{Deserialize, Serialize};

/// A single scraped product listing.
///
/// Produced fresh by either acquisition source and never mutated by the
/// sources afterwards; the enricher adds the two `ai_*` annotations in
/// place. Position in the batch is the only correlation between a product
/// and its annotations, so batch order is preserved end-to-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Listing title. Non-empty; cards without a usable title are discarded
    /// before a record exists.
    pub title: String,
    /// Currency-formatted display price (for example `"$29.99"`), when the
    /// listing shows one.
    pub price: Option<String>,
    /// Star rating on a 0.0–5.0 scale, when the listing shows one.
    pub rating: Option<f64>,
    /// Absolute link to the listing. May be empty when the card carries no
    /// usable href.
    pub url: String,
    /// AI-assigned category — one of [`crate::enrich::CATEGORIES`] — or a
    /// degraded-mode sentinel. Absent until enrichment runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_category: Option<String>,
    /// AI-generated one-sentence sentiment summary, or a degraded-mode
    /// sentinel. Absent until enrichment runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_sentiment: Option<String>,
}

impl Product {
    /// Create an unannotated record.
    pub fn new(
        title: impl Into<String>,
        price: Option<String>,
        rating: Option<f64>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price,
            rating,
            url: url.into(),
            ai_category: None,
            ai_sentiment: None,
        }
    }
}
