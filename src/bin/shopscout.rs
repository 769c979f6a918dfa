//! CLI entry point: scrape product listings and print them enriched.

use clap::Parser;
use shopscout::ScoutConfig;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "headless")]
use shopscout::render::HeadlessFactory;
#[cfg(not(feature = "headless"))]
use shopscout::render::StaticHttpFactory;

/// Scrape products from a live search page (or the catalog fallback) and
/// enrich them with AI metadata.
#[derive(Parser)]
#[command(name = "shopscout", version, about)]
struct Cli {
    /// Search keyword.
    #[arg(long, default_value = "laptops")]
    query: String,

    /// Maximum number of products to scrape.
    #[arg(long, default_value_t = 5)]
    max: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shopscout=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ScoutConfig::from_env();

    #[cfg(feature = "headless")]
    let factory = HeadlessFactory::new(config.scrape.clone());
    #[cfg(not(feature = "headless"))]
    let factory = StaticHttpFactory::new(config.scrape.clone());

    let products = shopscout::scrape(&cli.query, cli.max, factory, &config).await?;
    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    println!("Scraped data:");
    println!("{}", serde_json::to_string_pretty(&products)?);

    let enriched = shopscout::enrich(products, &config.llm).await?;
    println!("Enriched data:");
    println!("{}", serde_json::to_string_pretty(&enriched)?);

    Ok(())
}
