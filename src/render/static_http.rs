//! Static HTTP rendering backend.
//!
//! Fetches the results page once with the shared client and answers element
//! queries from the parsed document. No JavaScript runs, so waits resolve
//! immediately: the content either arrived with the document or it never
//! will.

use crate::config::ScrapeConfig;
use crate::error::{Result, ScoutError};
use crate::http;
use crate::render::{PageElement, RenderSession, SessionFactory};
use scraper::{Html, Selector};
use std::time::Duration;

/// Factory for [`StaticSession`]s backed by plain HTTP fetches.
#[derive(Debug, Clone)]
pub struct StaticHttpFactory {
    config: ScrapeConfig,
}

impl StaticHttpFactory {
    /// Create a factory over the given scrape settings.
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }
}

impl SessionFactory for StaticHttpFactory {
    type Session = StaticSession;

    async fn open(&self) -> Result<StaticSession> {
        let client = http::build_client(
            Duration::from_secs(self.config.http_timeout_seconds),
            self.config.user_agent.as_deref(),
        )?;
        Ok(StaticSession {
            client: Some(client),
            html: None,
        })
    }
}

/// A fetched document posing as a browsing session.
pub struct StaticSession {
    client: Option<reqwest::Client>,
    html: Option<String>,
}

impl StaticSession {
    /// Build a session over an already-rendered document, for replaying
    /// saved pages. Replay sessions ignore navigation and keep answering
    /// from the supplied document.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            client: None,
            html: Some(html.into()),
        }
    }

    fn document(&self) -> Result<&str> {
        self.html
            .as_deref()
            .ok_or_else(|| ScoutError::Session("no document loaded".into()))
    }
}

impl RenderSession for StaticSession {
    type Element = StaticElement;

    async fn goto(&mut self, url: &str) -> Result<()> {
        let Some(client) = self.client.as_ref() else {
            // Replay session: the document is already here.
            return Ok(());
        };

        let response = client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| ScoutError::Session(format!("navigation failed: {e}")))?
            .error_for_status()
            .map_err(|e| ScoutError::Session(format!("navigation rejected: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| ScoutError::Session(format!("document read failed: {e}")))?;

        tracing::trace!(bytes = body.len(), url, "document fetched");
        self.html = Some(body);
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
        // A static document cannot gain content later; the wait degenerates
        // to a presence check.
        if self.elements(selector).await?.is_empty() {
            return Err(ScoutError::Timeout(format!(
                "selector {selector:?} never appeared"
            )));
        }
        Ok(())
    }

    async fn elements(&mut self, selector: &str) -> Result<Vec<StaticElement>> {
        let sel = parse_selector(selector)?;
        let document = Html::parse_document(self.document()?);
        Ok(document
            .select(&sel)
            .map(|el| StaticElement { html: el.html() })
            .collect())
    }

    async fn close(self) {}
}

/// Snapshot of one matched element's outer HTML.
pub struct StaticElement {
    html: String,
}

impl PageElement for StaticElement {
    async fn text(&self, selector: &str) -> Result<String> {
        let sel = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.html);
        let el = fragment.select(&sel).next().ok_or_else(|| {
            ScoutError::Session(format!("no descendant matches {selector:?}"))
        })?;
        Ok(el.text().collect::<String>())
    }

    async fn attr(&self, selector: &str, attr: &str) -> Result<Option<String>> {
        let sel = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.html);
        let el = fragment.select(&sel).next().ok_or_else(|| {
            ScoutError::Session(format!("no descendant matches {selector:?}"))
        })?;
        Ok(el.value().attr(attr).map(str::to_owned))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScoutError::Parse(format!("invalid selector {selector:?}: {e:?}")))
}
