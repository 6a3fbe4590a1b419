// Integration tests for Buybox Scout
// These tests drive the full pipeline against a scripted browser

pub mod report_tests;

use anyhow::anyhow;
use async_trait::async_trait;
use buybox_scout::{
    batch::{BatchRunner, Pacing},
    browser::{NavigationResponse, PageSession, RequestFilter, SessionOptions, SessionProvider},
    config::ScraperConfig,
    retry::{RetryController, RetryPolicy},
    scraper::ProductScraper,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake browser does for one navigation.
#[derive(Debug, Clone)]
pub enum Step {
    Load {
        status: Option<u16>,
        final_url: String,
        html: String,
    },
    NavigationError(String),
}

impl Step {
    pub fn page(final_url: &str, html: &str) -> Self {
        Step::Load {
            status: Some(200),
            final_url: final_url.to_string(),
            html: html.to_string(),
        }
    }
}

#[derive(Default)]
struct ScriptState {
    steps: HashMap<String, VecDeque<Step>>,
    navigations: HashMap<String, usize>,
    order: Vec<String>,
    opened: usize,
    closed: usize,
}

/// Session provider whose pages follow a per-URL script.
///
/// Each navigation to a URL consumes the next step for that URL; once the
/// script runs out the last step repeats. Unscripted URLs fail to navigate.
#[derive(Clone, Default)]
pub struct ScriptedBrowser {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, url: &str, steps: Vec<Step>) -> Self {
        self.state
            .lock()
            .unwrap()
            .steps
            .insert(url.to_string(), steps.into());
        self
    }

    pub fn navigations(&self, url: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .navigations
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    /// URLs in the order they were navigated, retries included.
    pub fn navigation_order(&self) -> Vec<String> {
        self.state.lock().unwrap().order.clone()
    }

    pub fn open_sessions(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.opened - state.closed
    }

    fn next_step(&self, url: &str) -> Step {
        let mut state = self.state.lock().unwrap();
        *state.navigations.entry(url.to_string()).or_default() += 1;
        state.order.push(url.to_string());

        match state.steps.get_mut(url) {
            Some(steps) if steps.len() > 1 => steps.pop_front().unwrap(),
            Some(steps) => steps
                .front()
                .cloned()
                .unwrap_or_else(|| Step::NavigationError("empty script".into())),
            None => Step::NavigationError("net::ERR_NAME_NOT_RESOLVED".into()),
        }
    }
}

pub struct ScriptedSession {
    browser: ScriptedBrowser,
    loaded: Option<(String, String)>,
}

#[async_trait]
impl SessionProvider for ScriptedBrowser {
    type Session = ScriptedSession;

    async fn open_session(&self, _options: &SessionOptions) -> anyhow::Result<ScriptedSession> {
        self.state.lock().unwrap().opened += 1;
        Ok(ScriptedSession {
            browser: self.clone(),
            loaded: None,
        })
    }
}

#[async_trait]
impl PageSession for ScriptedSession {
    async fn set_request_filter(&mut self, _filter: RequestFilter) -> anyhow::Result<()> {
        Ok(())
    }

    async fn navigate(&mut self, url: &str, _timeout: Duration) -> anyhow::Result<NavigationResponse> {
        match self.browser.next_step(url) {
            Step::Load {
                status,
                final_url,
                html,
            } => {
                self.loaded = Some((final_url, html));
                Ok(NavigationResponse { status })
            }
            Step::NavigationError(message) => Err(anyhow!(message)),
        }
    }

    async fn current_url(&self) -> anyhow::Result<String> {
        Ok(self
            .loaded
            .as_ref()
            .map(|(url, _)| url.clone())
            .unwrap_or_default())
    }

    async fn wait_for_any(&self, _selectors: &[&str], _timeout: Duration) -> bool {
        self.loaded.is_some()
    }

    async fn scroll_by(&self, _distance: u32) -> anyhow::Result<u64> {
        Ok(800)
    }

    async fn content(&self) -> anyhow::Result<String> {
        self.loaded
            .as_ref()
            .map(|(_, html)| html.clone())
            .ok_or_else(|| anyhow!("no page loaded"))
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.browser.state.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// Scraper settings with every wait collapsed to zero.
pub fn get_test_config(max_retries: u32) -> ScraperConfig {
    ScraperConfig {
        max_retries,
        base_delay_ms: 0,
        max_delay_ms: 0,
        scroll_interval_ms: 0,
        ..ScraperConfig::default()
    }
}

pub fn create_test_runner(
    browser: ScriptedBrowser,
    max_retries: u32,
) -> BatchRunner<ProductScraper<ScriptedBrowser>> {
    let config = get_test_config(max_retries);
    let policy = RetryPolicy::from_config(&config);
    let scraper = ProductScraper::new(browser, config);
    BatchRunner::new(RetryController::new(scraper, policy), Pacing::none())
}

pub fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|url| url.to_string()).collect()
}

pub const ECHO_DOT_URL: &str = "https://www.amazon.in/dp/B09G9BL5CP";
pub const KINDLE_URL: &str = "https://www.amazon.in/gp/product/B0BDK62PDX?th=1";

/// Product page with a ₹1,299.00 price and a 10% coupon, no bank offer.
pub const COUPON_PAGE: &str = r#"
<html><body>
    <span id="productTitle"> Echo Dot (5th Gen) </span>
    <span id="priceblock_ourprice">₹1,299.00</span>
    <span id="acrPopover"><span class="a-icon-alt">4.4 out of 5 stars</span></span>
    <span id="acrCustomerReviewText">2,310 ratings</span>
    <div id="couponBadgeRegularVpc">Apply 10% coupon</div>
</body></html>
"#;

/// Product page with a currency coupon and an instant bank discount.
pub const BANK_OFFER_PAGE: &str = r#"
<html><body>
    <span id="productTitle">Kindle Paperwhite</span>
    <div id="corePriceDisplay_desktop_feature_div">
        <span class="a-price"><span class="a-offscreen">₹13,999</span></span>
    </div>
    <span data-hook="rating-out-of-text">4.5 out of 5</span>
    <label id="couponText7">Apply ₹500 coupon</label>
    <div id="itembox-InstantBankDiscount">Upto ₹1,500.00 Instant Discount on SBI Credit Card</div>
</body></html>
"#;
