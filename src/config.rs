//! Process-wide configuration, resolved once at startup and read-only
//! afterwards.
//!
//! Scrape settings are plain defaults; LLM settings overlay environment
//! variables (`OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_URL`). An empty
//! credential is a legal configuration — it puts enrichment into degraded
//! mode rather than failing validation.

use crate::error::{Result, ScoutError};

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Environment variable overriding the completions endpoint.
pub const API_URL_VAR: &str = "OPENAI_URL";

/// Configuration for product acquisition.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Base URL of the search-results page; the query is appended as the
    /// `k` parameter.
    pub search_base: String,
    /// Catalog endpoint used when the live page yields nothing.
    pub catalog_url: String,
    /// How long one attempt waits for result cards to appear, in seconds.
    pub render_wait_seconds: u64,
    /// General HTTP timeout for page fetches, in seconds.
    pub http_timeout_seconds: u64,
    /// Timeout for the catalog fetch specifically, in seconds.
    pub catalog_timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            search_base: "https://www.amazon.com/s".into(),
            catalog_url: "https://fakestoreapi.com/products".into(),
            render_wait_seconds: 12,
            http_timeout_seconds: 30,
            catalog_timeout_seconds: 10,
            user_agent: None,
        }
    }
}

impl ScrapeConfig {
    /// Validates this configuration, returning an error if any field is
    /// invalid.
    pub fn validate(&self) -> Result<()> {
        if self.search_base.trim().is_empty() {
            return Err(ScoutError::Config("search_base must not be empty".into()));
        }
        if self.catalog_url.trim().is_empty() {
            return Err(ScoutError::Config("catalog_url must not be empty".into()));
        }
        if self.render_wait_seconds == 0 {
            return Err(ScoutError::Config(
                "render_wait_seconds must be greater than 0".into(),
            ));
        }
        if self.http_timeout_seconds == 0 {
            return Err(ScoutError::Config(
                "http_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.catalog_timeout_seconds == 0 {
            return Err(ScoutError::Config(
                "catalog_timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the completion client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API credential. Empty means absent: enrichment runs in degraded mode
    /// and makes no network calls.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Chat-completions endpoint.
    pub api_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o-mini".into(),
            api_url: "https://api.openai.com/v1/chat/completions".into(),
        }
    }
}

impl LlmConfig {
    /// Resolve LLM settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve LLM settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup(API_KEY_VAR).unwrap_or(defaults.api_key),
            model: lookup(MODEL_VAR).unwrap_or(defaults.model),
            api_url: lookup(API_URL_VAR).unwrap_or(defaults.api_url),
        }
    }

    /// True when a credential is configured.
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Validates this configuration. An absent credential is valid.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ScoutError::Config("model must not be empty".into()));
        }
        if self.api_url.trim().is_empty() {
            return Err(ScoutError::Config("api_url must not be empty".into()));
        }
        Ok(())
    }
}

/// Top-level configuration for a run.
#[derive(Debug, Clone, Default)]
pub struct ScoutConfig {
    /// Acquisition settings.
    pub scrape: ScrapeConfig,
    /// Enrichment settings.
    pub llm: LlmConfig,
}

impl ScoutConfig {
    /// Defaults for scraping plus LLM settings from the environment.
    pub fn from_env() -> Self {
        Self {
            scrape: ScrapeConfig::default(),
            llm: LlmConfig::from_env(),
        }
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        self.scrape.validate()?;
        self.llm.validate()
    }
}
