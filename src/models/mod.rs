use serde::{Deserialize, Serialize};
use std::fmt;

pub mod product_record;
pub mod run_stats;

// Re-exports for convenience
pub use product_record::*;
pub use run_stats::*;

/// Sentinel written into identity and title fields when every attempt failed.
pub const SCRAPING_FAILED: &str = "SCRAPING_FAILED";

/// Whether navigation settled on a different product than requested.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Redirected {
    Yes,
    No,
    /// Identity could not be determined (terminal failure).
    Unknown,
}

impl Redirected {
    pub fn between(original_asin: &str, final_asin: &str) -> Self {
        if original_asin == SCRAPING_FAILED || final_asin == SCRAPING_FAILED {
            Redirected::Unknown
        } else if original_asin != final_asin {
            Redirected::Yes
        } else {
            Redirected::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Redirected::Yes => "Yes",
            Redirected::No => "No",
            Redirected::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Redirected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
