//! The browser capability the scraper drives, independent of any automation protocol.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod webdriver;

pub use webdriver::{WebDriverFactory, WebDriverSession};

/// Browser automation errors
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Timed out after {timeout:?} waiting for {selector}")]
    Timeout { selector: String, timeout: Duration },

    #[error("No element matches {0}")]
    NoSuchElement(String),

    /// The page replaced a node between lookup and use.
    #[error("Stale node: {0}")]
    StaleNode(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Browser command failed: {0}")]
    Command(String),
}

impl BrowserError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Stale nodes are a race with the page's own scripts and clear up on a fresh attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::StaleNode(_))
    }
}

pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// One isolated browser session (a tab with its own state).
///
/// Every wait takes its own deadline and fails with [`BrowserError::Timeout`] when it expires.
/// Callers decide whether an expired wait means "nothing there" or a failure.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Handle to an element found by [`Browser::query_nodes`].
    type Node: Clone + Send + Sync;

    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Waits for `selector` to be visible, then clicks the first match.
    async fn click(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    async fn click_node(&self, node: &Self::Node) -> BrowserResult<()>;

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    async fn wait_present(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    async fn wait_absent(&self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Every element matching `selector`, in document order. No waiting.
    async fn query_nodes(&self, selector: &str) -> BrowserResult<Vec<Self::Node>>;

    async fn node_attribute(&self, node: &Self::Node, name: &str) -> BrowserResult<Option<String>>;

    /// Outer HTML of the first element matching `selector`.
    async fn outer_html(&self, selector: &str) -> BrowserResult<String>;

    /// Attribute of the first element matching `selector`. `None` when either is missing.
    async fn attribute_value(&self, selector: &str, name: &str) -> BrowserResult<Option<String>>;

    /// Ends the session. Further calls fail.
    async fn close(&self) -> BrowserResult<()>;
}

/// Opens one fresh browser session per call.
#[async_trait]
pub trait SessionFactory: Send + Sync + 'static {
    type Session: Browser + 'static;

    async fn open(&self) -> BrowserResult<Self::Session>;
}
