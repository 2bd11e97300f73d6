//! [`Browser`] over the W3C WebDriver protocol, backed by `fantoccini` and chromedriver.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};
use tokio::time::Instant;

use slotwatch_core::config::BrowserConfig;

use super::{Browser, BrowserError, BrowserResult, SessionFactory};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn is_no_such_element(err: &CmdError) -> bool {
    matches!(err, CmdError::Standard(wd) if matches!(wd.error, ErrorStatus::NoSuchElement))
}

fn map_cmd_error(context: &str, err: CmdError) -> BrowserError {
    match err {
        ref missing if is_no_such_element(missing) => {
            BrowserError::NoSuchElement(context.to_owned())
        }
        CmdError::Standard(ref wd) if matches!(wd.error, ErrorStatus::StaleElementReference) => {
            BrowserError::StaleNode(format!("{context}: {err}"))
        }
        other => BrowserError::Command(format!("{context}: {other}")),
    }
}

/// Opens chromedriver sessions configured from [`BrowserConfig`].
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    webdriver_url: String,
    chrome_args: Vec<String>,
}

impl WebDriverFactory {
    #[must_use]
    pub fn new(config: &BrowserConfig) -> Self {
        let mut chrome_args = Vec::new();
        if config.headless {
            chrome_args.push("--headless=new".to_owned());
        }
        if config.disable_gpu {
            chrome_args.push("--disable-gpu".to_owned());
        }
        Self {
            webdriver_url: config.webdriver_url.clone(),
            chrome_args,
        }
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        caps.insert(
            "goog:chromeOptions".to_owned(),
            serde_json::json!({ "args": self.chrome_args }),
        );
        caps
    }
}

#[async_trait]
impl SessionFactory for WebDriverFactory {
    type Session = WebDriverSession;

    #[tracing::instrument(skip(self), fields(webdriver_url = %self.webdriver_url))]
    async fn open(&self) -> BrowserResult<WebDriverSession> {
        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| BrowserError::Session(e.to_string()))?;
        tracing::debug!("WebDriver session opened");
        Ok(WebDriverSession { client })
    }
}

/// One chromedriver session.
#[derive(Debug, Clone)]
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    async fn first(&self, selector: &str) -> BrowserResult<Option<Element>> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => Ok(Some(element)),
            Err(err) if is_no_such_element(&err) => Ok(None),
            Err(err) => Err(map_cmd_error(selector, err)),
        }
    }

    async fn is_visible(&self, selector: &str) -> BrowserResult<bool> {
        let Some(element) = self.first(selector).await? else {
            return Ok(false);
        };
        match element.is_displayed().await {
            Ok(displayed) => Ok(displayed),
            Err(err) => match map_cmd_error(selector, err) {
                // Replaced while we looked; the next poll sees the new node.
                BrowserError::StaleNode(_) | BrowserError::NoSuchElement(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn poll_until<F, Fut>(
        &self,
        selector: &str,
        timeout: Duration,
        mut condition: F,
    ) -> BrowserResult<()>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = BrowserResult<bool>> + Send,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if condition().await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    selector: selector.to_owned(),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl Browser for WebDriverSession {
    type Node = Element;

    #[tracing::instrument(skip(self))]
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.client
            .goto(url)
            .await
            .map_err(|e| map_cmd_error(url, e))
    }

    async fn click(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        self.wait_visible(selector, timeout).await?;
        let element = self
            .first(selector)
            .await?
            .ok_or_else(|| BrowserError::NoSuchElement(selector.to_owned()))?;
        element.click().await.map_err(|e| map_cmd_error(selector, e))
    }

    async fn click_node(&self, node: &Element) -> BrowserResult<()> {
        node.click().await.map_err(|e| map_cmd_error("node", e))
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        self.poll_until(selector, timeout, move || self.is_visible(selector))
            .await
    }

    async fn wait_present(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        self.poll_until(selector, timeout, move || async move {
            Ok(self.first(selector).await?.is_some())
        })
        .await
    }

    async fn wait_absent(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        self.poll_until(selector, timeout, move || async move {
            Ok(self.first(selector).await?.is_none())
        })
        .await
    }

    async fn query_nodes(&self, selector: &str) -> BrowserResult<Vec<Element>> {
        self.client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| map_cmd_error(selector, e))
    }

    async fn node_attribute(&self, node: &Element, name: &str) -> BrowserResult<Option<String>> {
        node.attr(name).await.map_err(|e| map_cmd_error(name, e))
    }

    async fn outer_html(&self, selector: &str) -> BrowserResult<String> {
        let element = self
            .first(selector)
            .await?
            .ok_or_else(|| BrowserError::NoSuchElement(selector.to_owned()))?;
        element
            .html(false)
            .await
            .map_err(|e| map_cmd_error(selector, e))
    }

    async fn attribute_value(&self, selector: &str, name: &str) -> BrowserResult<Option<String>> {
        let Some(element) = self.first(selector).await? else {
            return Ok(None);
        };
        element.attr(name).await.map_err(|e| map_cmd_error(selector, e))
    }

    async fn close(&self) -> BrowserResult<()> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::Session(e.to_string()))
    }
}
