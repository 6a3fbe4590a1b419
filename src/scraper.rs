use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::browser::{PageSession, SessionProvider};
use crate::config::ScraperConfig;
use crate::extractor::{PageExtractor, PageSnapshot};
use crate::models::ProductRecord;
use crate::selectors::READY_SIGNALS;
use crate::utils::error::AttemptError;

/// Status tolerated after navigation; some product pages return it spuriously.
const TOLERATED_STATUS: u16 = 404;

/// A single fetch-and-extract attempt for one URL.
#[async_trait]
pub trait ScrapeAttempt: Send + Sync {
    async fn attempt(&self, url: &str) -> Result<ProductRecord, AttemptError>;
}

/// Runs one scrape attempt per call against sessions from `P`.
pub struct ProductScraper<P> {
    provider: P,
    config: ScraperConfig,
    extractor: PageExtractor,
}

impl<P: SessionProvider> ProductScraper<P> {
    pub fn new(provider: P, config: ScraperConfig) -> Self {
        Self {
            provider,
            config,
            extractor: PageExtractor::new(),
        }
    }

    /// Open a session, scrape `url`, and close the session on every exit path.
    pub async fn scrape_once(&self, url: &str) -> Result<ProductRecord, AttemptError> {
        let start_time = Instant::now();

        let mut session = self
            .provider
            .open_session(&self.config.session_options())
            .await
            .map_err(|e| AttemptError::Session {
                url: url.to_string(),
                message: format!("{:#}", e),
            })?;

        let result = self.scrape_in_session(&mut session, url).await;

        if let Err(e) = session.close().await {
            warn!(url, error = %e, "Failed to close page session");
        }

        if let Ok(record) = &result {
            info!(
                url,
                final_asin = %record.final_asin,
                redirected = %record.redirected,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Scraped product page"
            );
        }
        result
    }

    async fn scrape_in_session(
        &self,
        session: &mut P::Session,
        url: &str,
    ) -> Result<ProductRecord, AttemptError> {
        // Blocking heavy resources only speeds things up; the page still loads without it.
        if let Err(e) = session.set_request_filter(self.config.request_filter()).await {
            warn!(url, error = %e, "Failed to install request filter");
        }

        let response = session
            .navigate(url, self.config.timeout())
            .await
            .map_err(|e| AttemptError::navigation(url, format!("{:#}", e)))?;

        if let Some(status) = response.status {
            if !response.ok() && status != TOLERATED_STATUS {
                return Err(AttemptError::HttpStatus {
                    url: url.to_string(),
                    status,
                });
            }
        }

        // Get final URL after redirects
        let final_url = match session.current_url().await {
            Ok(current) if !current.is_empty() => current,
            Ok(_) => url.to_string(),
            Err(e) => return Err(AttemptError::navigation(url, format!("{:#}", e))),
        };

        let ready = session
            .wait_for_any(READY_SIGNALS, self.config.ready_timeout())
            .await;
        debug!(url, ready, "Readiness check finished");

        self.reveal_lazy_content(session)
            .await
            .map_err(|e| AttemptError::extraction(url, format!("{:#}", e)))?;

        let html = session
            .content()
            .await
            .map_err(|e| AttemptError::extraction(url, format!("{:#}", e)))?;

        let fields = {
            let page = PageSnapshot::parse(&html);
            self.extractor.extract(&page)
        };

        Ok(ProductRecord::from_page(url, &final_url, fields))
    }

    /// Scroll towards the bottom in fixed steps until the full scroll height or
    /// the configured maximum distance is reached, whichever comes first.
    async fn reveal_lazy_content(&self, session: &P::Session) -> anyhow::Result<()> {
        let step = self.config.scroll_step_px;
        let mut scrolled: u64 = 0;

        loop {
            let height = session.scroll_by(step).await?;
            scrolled += u64::from(step);

            if scrolled >= height || scrolled >= self.config.max_scroll_px {
                debug!(scrolled, height, "Finished lazy-content scroll");
                return Ok(());
            }
            tokio::time::sleep(self.config.scroll_interval()).await;
        }
    }
}

#[async_trait]
impl<P: SessionProvider> ScrapeAttempt for ProductScraper<P> {
    async fn attempt(&self, url: &str) -> Result<ProductRecord, AttemptError> {
        self.scrape_once(url).await
    }
}
