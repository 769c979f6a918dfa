//! Integration tests for the acquisition → enrichment pipeline.
//!
//! These tests drive the public API end-to-end with a replayed results page
//! and mock HTTP collaborators (catalog, completions endpoint) — no live
//! network. Live tests are marked `#[ignore]` for manual validation.

use shopscout::render::{RenderSession, SessionFactory, StaticSession};
use shopscout::{LlmConfig, Result, ScoutConfig, ScrapeConfig};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A saved search-results page with three cards: one complete, one without
/// a price, one with no usable title (discarded by the parser).
const RESULTS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
<div data-component-type="s-search-result">
    <h2><a class="a-link-normal" href="https://www.example.com/dp/B001">Laptop Pro 15</a></h2>
    <span class="a-price"><span class="a-offscreen">$599.00</span></span>
    <span class="a-icon-alt">4.5 out of 5 stars</span>
</div>
<div data-component-type="s-search-result">
    <h2><a class="a-link-normal" href="https://www.example.com/dp/B002">Budget Notebook</a></h2>
    <span class="a-icon-alt">3.9 out of 5 stars</span>
</div>
<div data-component-type="s-search-result">
    <h2><a class="a-link-normal" href="https://www.example.com/dp/B003">   </a></h2>
    <span class="a-price"><span class="a-offscreen">$10.00</span></span>
</div>
</body>
</html>"#;

/// Factory replaying a fixed document for every session.
struct ReplayFactory {
    html: &'static str,
}

impl SessionFactory for ReplayFactory {
    type Session = StaticSession;

    async fn open(&self) -> Result<StaticSession> {
        Ok(StaticSession::from_html(self.html))
    }
}

/// Factory whose sessions never see a result card.
struct EmptyPageFactory;

impl SessionFactory for EmptyPageFactory {
    type Session = StaticSession;

    async fn open(&self) -> Result<StaticSession> {
        Ok(StaticSession::from_html("<html><body></body></html>"))
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [ { "message": { "role": "assistant", "content": content } } ]
    })
}

async fn mount_llm(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(body_string_contains("categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"categories": ["professional", "budget"]}"#,
        )))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(body_string_contains("sentiments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"sentiments": ["Strong reviews.", "Mixed reviews."]}"#,
        )))
        .mount(server)
        .await;
}

fn test_config(server: &MockServer, api_key: &str) -> ScoutConfig {
    ScoutConfig {
        scrape: ScrapeConfig {
            catalog_url: format!("{}/products", server.uri()),
            user_agent: Some("TestBot/1.0".into()),
            ..Default::default()
        },
        llm: LlmConfig {
            api_key: api_key.into(),
            api_url: format!("{}/v1/chat/completions", server.uri()),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn live_page_batch_is_scraped_and_enriched() {
    let server = MockServer::start().await;
    mount_llm(&server).await;

    let config = test_config(&server, "sk-test-key");
    let factory = ReplayFactory { html: RESULTS_PAGE };

    let products = shopscout::run("laptops", 5, factory, &config)
        .await
        .expect("pipeline");

    // The blank-title card was discarded; order matches the page.
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].title, "Laptop Pro 15");
    assert_eq!(products[0].price.as_deref(), Some("$599.00"));
    assert_eq!(products[0].rating, Some(4.5));
    assert_eq!(products[0].url, "https://www.example.com/dp/B001");
    assert_eq!(products[1].title, "Budget Notebook");
    assert!(products[1].price.is_none());

    // Annotations are positional.
    assert_eq!(products[0].ai_category.as_deref(), Some("professional"));
    assert_eq!(products[1].ai_category.as_deref(), Some("budget"));
    assert_eq!(products[0].ai_sentiment.as_deref(), Some("Strong reviews."));
    assert_eq!(products[1].ai_sentiment.as_deref(), Some("Mixed reviews."));
}

#[tokio::test]
async fn empty_live_page_falls_back_to_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id": 1, "title": "Catalog Backpack", "price": 29.99, "rating": {"rate": 4.1}}]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    // No credential: enrichment degrades to sentinels, still no failure.
    let config = test_config(&server, "");

    let products = shopscout::run("laptops", 5, EmptyPageFactory, &config)
        .await
        .expect("pipeline");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Catalog Backpack");
    assert_eq!(products[0].price.as_deref(), Some("$29.99"));
    assert_eq!(products[0].rating, Some(4.1));
    assert!(products[0].url.ends_with("/products/1"));
    assert_eq!(
        products[0].ai_category.as_deref(),
        Some("unknown (no API key)")
    );
    assert_eq!(
        products[0].ai_sentiment.as_deref(),
        Some("unavailable (no API key)")
    );
}

#[tokio::test]
async fn catalog_failure_fails_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let config = test_config(&server, "");
    let result = shopscout::run("laptops", 5, EmptyPageFactory, &config).await;

    match result {
        Err(shopscout::ScoutError::Transport { status, .. }) => assert_eq!(status, 502),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn broken_model_output_degrades_but_keeps_scraped_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("this is not a JSON list")),
        )
        .mount(&server)
        .await;

    let config = test_config(&server, "sk-test-key");
    let factory = ReplayFactory { html: RESULTS_PAGE };

    let products = shopscout::run("laptops", 5, factory, &config)
        .await
        .expect("pipeline");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].title, "Laptop Pro 15");
    for product in &products {
        assert_eq!(product.ai_category.as_deref(), Some("general"));
        assert_eq!(
            product.ai_sentiment.as_deref(),
            Some("No sentiment available.")
        );
    }
}

#[tokio::test]
async fn replayed_session_queries_like_a_browser() {
    // Sanity-check the replay backend against the same selectors the
    // scraper uses, so fixture drift shows up here first.
    let mut session = StaticSession::from_html(RESULTS_PAGE);
    session.goto("https://www.example.com/s?k=laptops").await.expect("goto");
    let cards = session
        .elements("[data-component-type='s-search-result']")
        .await
        .expect("cards");
    assert_eq!(cards.len(), 3);
    session.close().await;
}

// ── Live tests (require network) ────────────────────────────────────────
// Run with: cargo test --test pipeline_integration -- --ignored

#[tokio::test]
#[ignore]
async fn live_catalog_fallback_round_trip() {
    let config = ScoutConfig::from_env();
    let products = shopscout::run("laptops", 3, EmptyPageFactory, &config).await;
    match products {
        Ok(products) => {
            assert!(!products.is_empty());
            for p in &products {
                assert!(!p.title.is_empty());
                assert!(p.ai_category.is_some() || p.ai_sentiment.is_some() || !p.url.is_empty());
            }
        }
        Err(e) => eprintln!("Live fallback run failed (acceptable in CI): {e}"),
    }
}

#[tokio::test]
#[ignore]
async fn live_static_scrape_attempt() {
    use shopscout::render::StaticHttpFactory;

    let config = ScoutConfig::from_env();
    let factory = StaticHttpFactory::new(config.scrape.clone());
    // The live page may block static fetches; the catalog keeps this Ok.
    match shopscout::scrape("laptops", 3, factory, &config).await {
        Ok(products) => assert!(!products.is_empty()),
        Err(e) => eprintln!("Live scrape failed (acceptable in CI): {e}"),
    }
}
