use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::BatchConfig;
use crate::models::RunStatistics;
use crate::report::ReportSink;
use crate::retry::RetryController;
use crate::scraper::ScrapeAttempt;
use crate::utils::error::Result;

/// Randomized wait between consecutive URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub min: Duration,
    pub max: Duration,
}

impl Pacing {
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            min: Duration::from_millis(config.min_delay_ms),
            max: Duration::from_millis(config.max_delay_ms),
        }
    }

    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Uniform draw from `[min, max]` at millisecond resolution.
    pub fn next_delay(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if min >= max {
            return self.min;
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

/// Processes URLs strictly one after another and streams each record to the sink.
pub struct BatchRunner<A> {
    retry: RetryController<A>,
    pacing: Pacing,
}

impl<A: ScrapeAttempt> BatchRunner<A> {
    pub fn new(retry: RetryController<A>, pacing: Pacing) -> Self {
        Self { retry, pacing }
    }

    /// Scrape every URL in order, writing one record per URL as it completes.
    ///
    /// Individual URL failures become sentinel records; only a sink write
    /// failure stops the run.
    pub async fn run_batch<S>(&self, urls: &[String], sink: &mut S) -> Result<RunStatistics>
    where
        S: ReportSink + ?Sized,
    {
        let mut stats = RunStatistics::default();
        let total = urls.len();

        for (index, url) in urls.iter().enumerate() {
            info!(position = index + 1, total, url = %url, "Scraping product");

            let record = self.retry.scrape_with_retry(url).await;
            stats.record(&record);
            sink.write_record(&record)?;

            if index + 1 < total {
                let delay = self.pacing.next_delay();
                debug!(delay_ms = delay.as_millis() as u64, "Pacing before next URL");
                tokio::time::sleep(delay).await;
            }
        }

        info!(
            total = stats.total,
            success = stats.success,
            failure = stats.failure,
            "Batch complete"
        );
        Ok(stats)
    }
}
