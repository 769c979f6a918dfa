//! Acquisition orchestration: live page first, fixed catalog second.

use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::render::SessionFactory;
use crate::sources::{AmazonSource, FakeStoreSource};
use crate::types::Product;

/// Two-tier product acquisition.
///
/// The live source absorbs its own transient failures; by the time control
/// reaches the catalog there is nothing left to retry, so catalog failures
/// propagate.
pub struct Acquisition<F> {
    primary: AmazonSource<F>,
    fallback: FakeStoreSource,
}

impl<F: SessionFactory> Acquisition<F> {
    /// Build both sources over a shared configuration.
    pub fn new(factory: F, config: ScrapeConfig) -> Self {
        Self {
            primary: AmazonSource::new(factory, config.clone()),
            fallback: FakeStoreSource::new(config),
        }
    }

    /// Produce a product batch for `query`.
    ///
    /// Source unavailability is not an error here — the live page failing is
    /// what the catalog exists for. A non-empty live result returns
    /// immediately and the catalog is never contacted.
    ///
    /// # Errors
    ///
    /// Only a catalog failure (the end of the line) propagates.
    pub async fn run(&self, query: &str, limit: usize) -> Result<Vec<Product>> {
        if let Some(products) = self.primary.acquire(query, limit).await {
            if !products.is_empty() {
                return Ok(products);
            }
        }

        tracing::debug!("live page yielded nothing, using catalog fallback");
        self.fallback.acquire(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ScoutError};
    use crate::render::{PageElement, RenderSession};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Session scripted to either time out or serve one fixed card.
    struct StubSession {
        yields_card: bool,
    }

    struct StubCard;

    struct StubFactory {
        yields_card: bool,
    }

    impl crate::render::SessionFactory for StubFactory {
        type Session = StubSession;

        async fn open(&self) -> Result<StubSession> {
            Ok(StubSession {
                yields_card: self.yields_card,
            })
        }
    }

    impl RenderSession for StubSession {
        type Element = StubCard;

        async fn goto(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
            if self.yields_card {
                Ok(())
            } else {
                Err(ScoutError::Timeout(format!(
                    "selector {selector:?} never appeared"
                )))
            }
        }

        async fn elements(&mut self, _selector: &str) -> Result<Vec<StubCard>> {
            Ok(vec![StubCard])
        }

        async fn close(self) {}
    }

    impl PageElement for StubCard {
        async fn text(&self, selector: &str) -> Result<String> {
            match selector {
                "h2 a.a-link-normal" => Ok("Live Page Laptop".into()),
                "span.a-price > span.a-offscreen" => Ok("$899.00".into()),
                "span.a-icon-alt" => Ok("4.7 out of 5 stars".into()),
                other => Err(ScoutError::Session(format!(
                    "no descendant matches {other:?}"
                ))),
            }
        }

        async fn attr(&self, _selector: &str, _attr: &str) -> Result<Option<String>> {
            Ok(Some("https://www.example.com/dp/B010".into()))
        }
    }

    const CATALOG_JSON: &str = r#"[
        {"id": 7, "title": "Catalog Monitor", "price": 120.0, "rating": {"rate": 4.4}}
    ]"#;

    #[tokio::test]
    async fn live_result_skips_the_catalog() {
        // A catalog that answers 500 on contact: reaching it would fail the
        // run, so success proves it was never consulted.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = ScrapeConfig {
            catalog_url: format!("{}/products", server.uri()),
            ..Default::default()
        };
        let acquisition = Acquisition::new(StubFactory { yields_card: true }, config);

        let products = acquisition.run("laptops", 5).await.expect("live batch");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Live Page Laptop");
    }

    #[tokio::test]
    async fn exhausted_live_source_falls_back_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(CATALOG_JSON, "application/json"),
            )
            .mount(&server)
            .await;

        let config = ScrapeConfig {
            catalog_url: format!("{}/products", server.uri()),
            ..Default::default()
        };
        let acquisition = Acquisition::new(StubFactory { yields_card: false }, config);

        let products = acquisition.run("laptops", 5).await.expect("catalog batch");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Catalog Monitor");
        assert_eq!(products[0].price.as_deref(), Some("$120.00"));
    }

    #[tokio::test]
    async fn catalog_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let config = ScrapeConfig {
            catalog_url: format!("{}/products", server.uri()),
            ..Default::default()
        };
        let acquisition = Acquisition::new(StubFactory { yields_card: false }, config);

        let err = acquisition.run("laptops", 5).await.unwrap_err();
        assert!(matches!(err, ScoutError::Transport { status: 503, .. }));
    }
}
