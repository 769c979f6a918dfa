//! # shopscout
//!
//! Product-listing scraper with a guaranteed fallback and AI-assisted
//! enrichment.
//!
//! Acquisition is two-tier: a live search-results page rendered through a
//! pluggable session backend and retried on transient failure, with a fixed
//! catalog API behind it so a run always has data to hand back. Enrichment
//! then runs two model-backed annotation passes (category, sentiment) that
//! degrade to documented defaults instead of taking the batch down with
//! them.
//!
//! ## Design
//!
//! - One search-results page shape, one catalog endpoint — no crawling
//!   framework, pagination, or persistence
//! - Rendering is a consumed capability behind [`render::SessionFactory`];
//!   a static HTTP backend and an optional headless Chrome backend ship
//!   in-tree
//! - Acquisition failures are fatal to a run; enrichment failures never are
//! - Batch order is preserved end-to-end: annotation `i` belongs to
//!   product `i`

pub mod acquire;
pub mod config;
pub mod enrich;
pub mod error;
pub mod http;
pub mod llm;
pub mod render;
pub mod selector;
pub mod sources;
pub mod types;

pub use acquire::Acquisition;
pub use config::{LlmConfig, ScoutConfig, ScrapeConfig};
pub use enrich::Enricher;
pub use error::{Result, ScoutError};
pub use llm::{CompletionClient, LlmClient};
pub use render::SessionFactory;
pub use types::Product;

/// Acquire a product batch for `query`, trying the live page before the
/// catalog fallback.
///
/// # Errors
///
/// Returns [`ScoutError::Config`] for invalid configuration; otherwise only
/// a catalog failure propagates, since the live source absorbs its own.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> shopscout::Result<()> {
/// let config = shopscout::ScoutConfig::from_env();
/// let factory = shopscout::render::StaticHttpFactory::new(config.scrape.clone());
/// let products = shopscout::scrape("laptops", 5, factory, &config).await?;
/// for product in &products {
///     println!("{}: {:?}", product.title, product.price);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn scrape<F: SessionFactory>(
    query: &str,
    limit: usize,
    factory: F,
    config: &ScoutConfig,
) -> Result<Vec<Product>> {
    config.validate()?;
    Acquisition::new(factory, config.scrape.clone())
        .run(query, limit)
        .await
}

/// Annotate an already-acquired batch with AI category and sentiment.
///
/// Never fails for model reasons: a missing credential or a broken model
/// degrades to documented sentinels and defaults.
///
/// # Errors
///
/// Only client construction can fail.
pub async fn enrich(products: Vec<Product>, config: &LlmConfig) -> Result<Vec<Product>> {
    let client = LlmClient::new(config.clone())?;
    Ok(Enricher::new(client).annotate(products).await)
}

/// Full pipeline: scrape, then enrich.
///
/// # Errors
///
/// Same as [`scrape`] and [`enrich`].
pub async fn run<F: SessionFactory>(
    query: &str,
    limit: usize,
    factory: F,
    config: &ScoutConfig,
) -> Result<Vec<Product>> {
    let products = scrape(query, limit, factory, config).await?;
    enrich(products, &config.llm).await
}
