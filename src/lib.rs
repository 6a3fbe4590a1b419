pub mod batch;
pub mod browser;
pub mod config;
pub mod extractor;
pub mod identifier;
pub mod input;
pub mod models;
pub mod normalizer;
pub mod report;
pub mod retry;
pub mod scraper;
pub mod selectors;
pub mod utils;

// Re-export commonly used types
pub use batch::{BatchRunner, Pacing};
pub use browser::{ChromeSessionProvider, PageSession, SessionProvider};
pub use config::AppConfig;
pub use models::{ProductRecord, RunStatistics};
pub use report::{CsvReportWriter, ReportSink};
pub use retry::{RetryController, RetryPolicy};
pub use scraper::{ProductScraper, ScrapeAttempt};
pub use utils::error::{AppError, AttemptError};

pub type Result<T> = std::result::Result<T, AppError>;
