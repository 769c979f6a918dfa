//! AI enrichment: two sequential annotation passes over an acquired batch.
//!
//! Enrichment is additive metadata, never critical-path data, so every
//! failure mode resolves to the batch coming back whole: a missing
//! credential short-circuits to sentinels, unusable model output becomes
//! documented defaults, and a failed call leaves that pass's field unset
//! while the other pass still runs.

use crate::error::{Result, ScoutError};
use crate::llm::CompletionClient;
use crate::types::Product;
use serde::Serialize;

/// Categories the classifier may assign.
pub const CATEGORIES: &[&str] = &["budget", "gaming", "professional", "general"];

/// Category applied to the whole batch when the model's output is unusable.
pub const CATEGORY_DEFAULT: &str = "general";

/// Sentiment applied to the whole batch when the model's output is unusable.
pub const SENTIMENT_DEFAULT: &str = "No sentiment available.";

/// Category sentinel when no credential is configured.
pub const CATEGORY_DISABLED: &str = "unknown (no API key)";

/// Sentiment sentinel when no credential is configured.
pub const SENTIMENT_DISABLED: &str = "unavailable (no API key)";

const CATEGORY_SYSTEM_PROMPT: &str = "You are a product classifier. For each product title, \
     assign exactly one category from: budget, gaming, professional, general. \
     Respond with a JSON object: {\"categories\": [\"cat1\", \"cat2\", ...]} \
     one category per title, same order.";

const SENTIMENT_SYSTEM_PROMPT: &str = "For each product, generate a concise one-sentence \
     sentiment summary based on its rating (out of 5) and title. \
     Respond with a JSON object: {\"sentiments\": [\"sentence1\", \"sentence2\", ...]} \
     one per product, same order.";

const CATEGORY_MAX_TOKENS: u32 = 300;
const SENTIMENT_MAX_TOKENS: u32 = 500;

/// Sentiment-pass request entry: the model sees title and rating together.
#[derive(Serialize)]
struct RatingEntry<'a> {
    title: &'a str,
    rating: Option<f64>,
}

/// Runs the annotation passes over a product batch.
pub struct Enricher<C> {
    client: C,
}

impl<C: CompletionClient> Enricher<C> {
    /// Create an enricher over a completion client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Annotate the batch in place and hand it back.
    ///
    /// The returned batch always has the same length and order as the
    /// input, whatever the model did or did not do. Without a credential no
    /// network call is made and both fields carry the disabled sentinels.
    pub async fn annotate(&self, mut products: Vec<Product>) -> Vec<Product> {
        if !self.client.has_credential() {
            tracing::warn!("no API credential configured, skipping enrichment");
            for product in &mut products {
                product.ai_category = Some(CATEGORY_DISABLED.to_string());
                product.ai_sentiment = Some(SENTIMENT_DISABLED.to_string());
            }
            return products;
        }

        match self.classify(&products).await {
            Ok(categories) => {
                // Positional zip is the only correlation; a short response
                // leaves the tail unannotated rather than guessing.
                for (product, category) in products.iter_mut().zip(categories) {
                    product.ai_category = Some(category);
                }
                tracing::debug!("category pass complete");
            }
            Err(err) => tracing::warn!(error = %err, "category pass failed"),
        }

        match self.summarize(&products).await {
            Ok(sentiments) => {
                for (product, sentiment) in products.iter_mut().zip(sentiments) {
                    product.ai_sentiment = Some(sentiment);
                }
                tracing::debug!("sentiment pass complete");
            }
            Err(err) => tracing::warn!(error = %err, "sentiment pass failed"),
        }

        products
    }

    /// Category pass. `Err` means the completion call itself failed;
    /// unusable output is already resolved to [`CATEGORY_DEFAULT`] here.
    async fn classify(&self, products: &[Product]) -> Result<Vec<String>> {
        let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
        let user = serde_json::to_string(&titles)
            .map_err(|e| ScoutError::Parse(format!("title list serialization failed: {e}")))?;

        let raw = self
            .client
            .complete(CATEGORY_SYSTEM_PROMPT, &user, CATEGORY_MAX_TOKENS)
            .await?;

        Ok(parse_annotation_list(&raw, "categories")
            .unwrap_or_else(|| vec![CATEGORY_DEFAULT.to_string(); products.len()]))
    }

    /// Sentiment pass; same outcome contract as [`Self::classify`].
    async fn summarize(&self, products: &[Product]) -> Result<Vec<String>> {
        let entries: Vec<RatingEntry<'_>> = products
            .iter()
            .map(|p| RatingEntry {
                title: &p.title,
                rating: p.rating,
            })
            .collect();
        let user = serde_json::to_string(&entries)
            .map_err(|e| ScoutError::Parse(format!("rating list serialization failed: {e}")))?;

        let raw = self
            .client
            .complete(SENTIMENT_SYSTEM_PROMPT, &user, SENTIMENT_MAX_TOKENS)
            .await?;

        Ok(parse_annotation_list(&raw, "sentiments")
            .unwrap_or_else(|| vec![SENTIMENT_DEFAULT.to_string(); products.len()]))
    }
}

/// Read a list of strings out of model output.
///
/// Accepts the prompted `{"<key>": [...]}` object or a bare top-level array
/// (the model's own revisions disagree on which they emit). Anything else
/// is unusable and the caller substitutes its documented default.
pub(crate) fn parse_annotation_list(raw: &str, key: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let items = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map.get(key)?.as_array()?,
        _ => return None,
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}
