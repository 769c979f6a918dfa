//! Rendering collaborator seam: open a browsing session, render a results
//! page, and query its DOM.
//!
//! The acquisition pipeline consumes this capability; it does not own the
//! mechanics of rendering. Two backends ship with the crate: a static HTTP
//! fetcher ([`StaticHttpFactory`]) and, behind the `headless` cargo feature,
//! a Chrome DevTools session ([`headless::HeadlessFactory`]).

pub mod static_http;

#[cfg(feature = "headless")]
pub mod headless;

pub use static_http::{StaticHttpFactory, StaticSession};

#[cfg(feature = "headless")]
pub use headless::HeadlessFactory;

use crate::error::Result;
use std::future::Future;
use std::time::Duration;

/// Opens fresh rendering sessions.
///
/// Each acquisition attempt opens its own session and closes it before the
/// attempt returns, so a factory must stay usable across attempts.
pub trait SessionFactory: Send + Sync {
    /// The session type this factory produces.
    type Session: RenderSession;

    /// Open a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScoutError::Session`] when the underlying backend
    /// cannot be brought up (browser missing, client build failure, ...).
    fn open(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// One exclusively-owned browsing session.
///
/// Sessions are single-use: navigate once, query, then [`close`] — which
/// consumes the session so no query can outlive the underlying resource.
///
/// [`close`]: RenderSession::close
pub trait RenderSession: Send {
    /// Opaque handle to one element of the rendered page.
    type Element: PageElement;

    /// Navigate to `url`.
    fn goto(&mut self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Wait until at least one element matches `selector`, up to `timeout`.
    fn wait_for(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    /// All elements currently matching `selector`, in document order.
    fn elements(&mut self, selector: &str) -> impl Future<Output = Result<Vec<Self::Element>>> + Send;

    /// Release the session's resources.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Opaque handle to a rendered element, queried by descendant CSS selector.
pub trait PageElement: Send + Sync {
    /// Text content of the first descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// Fails when no descendant matches or the backend cannot read it.
    fn text(&self, selector: &str) -> impl Future<Output = Result<String>> + Send;

    /// Value of attribute `attr` on the first descendant matching
    /// `selector`. `Ok(None)` when the element matches but lacks the
    /// attribute.
    ///
    /// # Errors
    ///
    /// Fails when no descendant matches or the backend cannot read it.
    fn attr(&self, selector: &str, attr: &str)
        -> impl Future<Output = Result<Option<String>>> + Send;
}
