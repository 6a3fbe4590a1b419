use anyhow::{anyhow, Result};
use async_trait::async_trait;
use headless_chrome::browser::tab::RequestPausedDecision;
use headless_chrome::browser::transport::{SessionId, Transport};
use headless_chrome::protocol::cdp::Fetch::events::RequestPausedEvent;
use headless_chrome::protocol::cdp::Fetch::FailRequest;
use headless_chrome::protocol::cdp::Network::ErrorReason;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ScraperConfig;

/// Settings applied to every page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub user_agent: String,
    pub timeout: Duration,
}

/// Outcome of a navigation as seen by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationResponse {
    /// Status of the main document, when the browser reports one.
    pub status: Option<u16>,
}

impl NavigationResponse {
    pub fn ok(&self) -> bool {
        self.status.is_none_or(|status| (200..400).contains(&status))
    }
}

/// Transport kinds a session may refuse to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Image,
    Font,
    Media,
    Stylesheet,
}

impl ResourceKind {
    /// Name used by the DevTools protocol for this resource type.
    pub fn protocol_name(&self) -> &'static str {
        match self {
            ResourceKind::Image => "Image",
            ResourceKind::Font => "Font",
            ResourceKind::Media => "Media",
            ResourceKind::Stylesheet => "Stylesheet",
        }
    }
}

/// Request predicate installed on a session before navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    blocked: Vec<ResourceKind>,
}

impl RequestFilter {
    pub fn blocking(blocked: impl IntoIterator<Item = ResourceKind>) -> Self {
        Self {
            blocked: blocked.into_iter().collect(),
        }
    }

    /// Whether a request of the given protocol resource type may proceed.
    pub fn allows(&self, resource_type: &str) -> bool {
        !self
            .blocked
            .iter()
            .any(|kind| kind.protocol_name().eq_ignore_ascii_case(resource_type))
    }
}

/// One open page, exclusively owned by a single scrape attempt.
#[async_trait]
pub trait PageSession: Send + Sync {
    async fn set_request_filter(&mut self, filter: RequestFilter) -> Result<()>;

    /// Navigate and wait for the document to be minimally ready.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResponse>;

    async fn current_url(&self) -> Result<String>;

    /// Wait until any selector is present; `false` on timeout, never an error.
    async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> bool;

    /// Scroll down by `distance` pixels and report the document scroll height.
    async fn scroll_by(&self, distance: u32) -> Result<u64>;

    /// Serialized DOM of the current page.
    async fn content(&self) -> Result<String>;

    async fn close(&mut self) -> Result<()>;
}

/// Source of page sessions (the browser).
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: PageSession;

    async fn open_session(&self, options: &SessionOptions) -> Result<Self::Session>;
}

/// Single headless Chrome process handing out one tab per session.
pub struct ChromeSessionProvider {
    browser: Arc<Browser>,
}

impl ChromeSessionProvider {
    pub fn launch(config: &ScraperConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false) // Often needed in containerized environments
            .idle_browser_timeout(Duration::from_secs(300))
            .args(vec![
                std::ffi::OsStr::new("--no-sandbox"),
                std::ffi::OsStr::new("--disable-dev-shm-usage"),
                std::ffi::OsStr::new("--disable-gpu"),
                std::ffi::OsStr::new("--disable-extensions"),
                std::ffi::OsStr::new("--disable-blink-features=AutomationControlled"),
            ])
            .build()
            .map_err(|e| anyhow!("Failed to create launch options: {}", e))?;

        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser =
            Browser::new(launch_options).map_err(|e| anyhow!("Failed to launch browser: {}", e))?;

        Ok(Self {
            browser: Arc::new(browser),
        })
    }
}

#[async_trait]
impl SessionProvider for ChromeSessionProvider {
    type Session = ChromeSession;

    async fn open_session(&self, options: &SessionOptions) -> Result<ChromeSession> {
        let browser = Arc::clone(&self.browser);
        let options = options.clone();

        let tab = tokio::task::spawn_blocking(move || -> Result<Arc<Tab>> {
            let tab = browser
                .new_tab()
                .map_err(|e| anyhow!("Failed to create tab: {}", e))?;
            tab.set_user_agent(&options.user_agent, None, None)
                .map_err(|e| anyhow!("Failed to set user agent: {}", e))?;
            tab.set_default_timeout(options.timeout);
            Ok(tab)
        })
        .await??;

        Ok(ChromeSession { tab, closed: false })
    }
}

/// A browser tab. Dropping an unclosed session closes the tab.
pub struct ChromeSession {
    tab: Arc<Tab>,
    closed: bool,
}

impl ChromeSession {
    /// Run a blocking DevTools call off the async executor.
    async fn with_tab<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Tab) -> Result<T> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || f(tab.as_ref())).await?
    }
}

const NAVIGATION_STATUS_JS: &str =
    "(() => { const entry = performance.getEntriesByType('navigation')[0]; \
     return entry && entry.responseStatus ? entry.responseStatus : 0; })()";

#[async_trait]
impl PageSession for ChromeSession {
    async fn set_request_filter(&mut self, filter: RequestFilter) -> Result<()> {
        self.with_tab(move |tab| {
            tab.enable_fetch(None, None)?;
            tab.enable_request_interception(Arc::new(
                move |_transport: Arc<Transport>,
                      _session_id: SessionId,
                      event: RequestPausedEvent|
                      -> RequestPausedDecision {
                    let resource_type = format!("{:?}", event.params.resource_Type);

                    if filter.allows(&resource_type) {
                        RequestPausedDecision::Continue(None)
                    } else {
                        RequestPausedDecision::Fail(FailRequest {
                            request_id: event.params.request_id,
                            error_reason: ErrorReason::BlockedByClient,
                        })
                    }
                },
            ))?;
            Ok(())
        })
        .await
    }

    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResponse> {
        let url = url.to_string();
        self.with_tab(move |tab| {
            tab.set_default_timeout(timeout);
            tab.navigate_to(&url)
                .map_err(|e| anyhow!("Navigation failed: {}", e))?
                .wait_until_navigated()
                .map_err(|e| anyhow!("Page load failed: {}", e))?;

            let status = tab
                .evaluate(NAVIGATION_STATUS_JS, false)
                .ok()
                .and_then(|remote| remote.value)
                .and_then(|value| value.as_u64())
                .filter(|status| *status > 0)
                .and_then(|status| u16::try_from(status).ok());

            Ok(NavigationResponse { status })
        })
        .await
    }

    async fn current_url(&self) -> Result<String> {
        self.with_tab(|tab| Ok(tab.get_url())).await
    }

    async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> bool {
        // A selector list matches as soon as any member does.
        let combined = selectors.join(", ");
        let found = self
            .with_tab(move |tab| {
                tab.wait_for_element_with_custom_timeout(&combined, timeout)
                    .map(|_| ())
            })
            .await;

        if let Err(e) = &found {
            debug!(error = %e, "Ready signals not seen before timeout");
        }
        found.is_ok()
    }

    async fn scroll_by(&self, distance: u32) -> Result<u64> {
        let script = format!(
            "(() => {{ window.scrollBy(0, {}); return document.body ? document.body.scrollHeight : 0; }})()",
            distance
        );
        self.with_tab(move |tab| {
            let height = tab
                .evaluate(&script, false)?
                .value
                .and_then(|value| value.as_u64())
                .unwrap_or(0);
            Ok(height)
        })
        .await
    }

    async fn content(&self) -> Result<String> {
        self.with_tab(|tab| {
            tab.get_content()
                .map_err(|e| anyhow!("Failed to get page content: {}", e))
        })
        .await
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.with_tab(|tab| {
            tab.close(true)?;
            Ok(())
        })
        .await
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.tab.close(false) {
                warn!(error = %e, "Failed to close tab on drop");
            }
        }
    }
}
