use serde::{Deserialize, Serialize};

use crate::models::{ProductRecord, Redirected};

/// Counters accumulated over one batch run.
///
/// `success + failure == total`; the redirect/coupon/bank counters only ever
/// count successful records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub redirected: u64,
    pub with_coupons: u64,
    pub with_bank_discounts: u64,
}

impl RunStatistics {
    pub fn record(&mut self, record: &ProductRecord) {
        self.total += 1;

        if record.is_failure() {
            self.failure += 1;
            return;
        }

        self.success += 1;
        if record.redirected == Redirected::Yes {
            self.redirected += 1;
        }
        if record.has_coupon() {
            self.with_coupons += 1;
        }
        if record.has_bank_discount() {
            self.with_bank_discounts += 1;
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.success as f64 / self.total as f64 * 100.0
        }
    }

    /// Human-readable multi-line summary for the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "Scrape summary\n\
             \x20 Total URLs:          {}\n\
             \x20 Successful:          {}\n\
             \x20 Failed:              {}\n\
             \x20 Success rate:        {:.1}%\n\
             \x20 Redirected:          {}\n\
             \x20 With coupons:        {}\n\
             \x20 With bank discounts: {}",
            self.total,
            self.success,
            self.failure,
            self.success_rate(),
            self.redirected,
            self.with_coupons,
            self.with_bank_discounts,
        )
    }
}
