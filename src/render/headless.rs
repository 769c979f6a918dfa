//! Headless Chrome rendering backend (Chrome DevTools Protocol).
//!
//! Runs a real browser so JavaScript-rendered listings still produce a DOM.
//! Launched with automation-suppression flags and a fixed desktop
//! User-Agent. Requires a local Chrome or Chromium install.

use crate::config::ScrapeConfig;
use crate::error::{Result, ScoutError};
use crate::render::{PageElement, RenderSession, SessionFactory};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// How often presence waits re-query the live DOM.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Factory for Chrome-backed sessions. Each [`open`](SessionFactory::open)
/// launches a fresh browser process.
#[derive(Debug, Clone)]
pub struct HeadlessFactory {
    config: ScrapeConfig,
}

impl HeadlessFactory {
    /// Create a factory over the given scrape settings.
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }
}

impl SessionFactory for HeadlessFactory {
    type Session = HeadlessSession;

    async fn open(&self) -> Result<HeadlessSession> {
        let user_agent = self
            .config
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);
        let args = vec![
            "--headless=new".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            format!("--user-agent={user_agent}"),
        ];

        let browser_config = BrowserConfig::builder()
            .args(args)
            .build()
            .map_err(|e| ScoutError::Session(format!("browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScoutError::Session(format!("failed to launch browser: {e}")))?;

        // Drive the CDP websocket until the session closes.
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScoutError::Session(format!("failed to create page: {e}")))?;

        Ok(HeadlessSession {
            browser,
            page,
            handler_task,
        })
    }
}

/// One live browser tab.
pub struct HeadlessSession {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
}

impl RenderSession for HeadlessSession {
    type Element = HeadlessElement;

    async fn goto(&mut self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScoutError::Session(format!("navigation failed: {e}")))?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScoutError::Timeout(format!(
                    "selector {selector:?} never appeared"
                )));
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    async fn elements(&mut self, selector: &str) -> Result<Vec<HeadlessElement>> {
        let found = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| ScoutError::Session(format!("element query failed: {e}")))?;
        Ok(found.into_iter().map(HeadlessElement).collect())
    }

    async fn close(mut self) {
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

/// Handle to one element in the live DOM.
pub struct HeadlessElement(Element);

impl PageElement for HeadlessElement {
    async fn text(&self, selector: &str) -> Result<String> {
        let el = self.0.find_element(selector).await.map_err(|e| {
            ScoutError::Session(format!("no descendant matches {selector:?}: {e}"))
        })?;
        let text = el
            .inner_text()
            .await
            .map_err(|e| ScoutError::Session(format!("text read failed: {e}")))?;
        Ok(text.unwrap_or_default())
    }

    async fn attr(&self, selector: &str, attr: &str) -> Result<Option<String>> {
        let el = self.0.find_element(selector).await.map_err(|e| {
            ScoutError::Session(format!("no descendant matches {selector:?}: {e}"))
        })?;
        el.attribute(attr)
            .await
            .map_err(|e| ScoutError::Session(format!("attribute read failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Live test — needs a local Chrome. Run with `cargo test --features headless -- --ignored`
    async fn live_session_renders_example_com() {
        let factory = HeadlessFactory::new(ScrapeConfig::default());
        let mut session = factory.open().await.expect("browser should launch");
        session.goto("https://example.com").await.expect("goto");
        session
            .wait_for("h1", Duration::from_secs(12))
            .await
            .expect("h1 should appear");
        let headings = session.elements("h1").await.expect("query");
        assert!(!headings.is_empty());
        session.close().await;
    }
}
