//! Error types for the shopscout crate.
//!
//! Failure kinds stay distinct where callers behave differently: a missing
//! credential must be tellable from a broken endpoint, and an HTTP-level
//! failure from a well-formed response whose body has the wrong shape.

/// Errors that can occur while acquiring or enriching product listings.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// A rendering session could not be opened, navigated, or queried.
    #[error("render session fault: {0}")]
    Session(String),

    /// Waiting for page content exceeded the configured deadline.
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// An HTTP request failed before any response was received.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Transport {
        /// Response status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// A response decoded, but the expected fields were not where the pinned
    /// wire contract puts them. Carries the raw body for diagnosis.
    #[error("unexpected response shape: {0}")]
    Shape(String),

    /// No API credential is configured. Raised before any network attempt,
    /// so callers can tell "feature disabled" from "feature broken".
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// Failed to parse a CSS selector or an HTML document.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for shopscout results.
pub type Result<T> = std::result::Result<T, ScoutError>;
