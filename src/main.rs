use anyhow::{Context, Result};
use buybox_scout::batch::{BatchRunner, Pacing};
use buybox_scout::browser::ChromeSessionProvider;
use buybox_scout::config::AppConfig;
use buybox_scout::input::load_urls;
use buybox_scout::report::{report_path, CsvReportWriter};
use buybox_scout::retry::{RetryController, RetryPolicy};
use buybox_scout::scraper::ProductScraper;
use buybox_scout::AppError;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Scrape product pages into a CSV report.
#[derive(Debug, Parser)]
#[command(name = "buybox-scout", version, about)]
struct Cli {
    /// File with one product URL per line
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory for the CSV report and log file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Retries per URL after the first attempt
    #[arg(long)]
    max_retries: Option<u32>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Path to the Chrome/Chromium binary
    #[arg(long)]
    chrome_path: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        if let Some(input) = self.input {
            config.batch.input_file = input;
        }
        if let Some(output_dir) = self.output_dir {
            config.batch.output_dir = output_dir;
        }
        if let Some(max_retries) = self.max_retries {
            config.scraper.max_retries = max_retries;
        }
        if self.headful {
            config.scraper.headless = false;
        }
        if let Some(chrome_path) = self.chrome_path {
            config.scraper.chrome_path = Some(chrome_path);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate()?;

    std::fs::create_dir_all(&config.batch.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.batch.output_dir.display()
        )
    })?;

    // Initialize tracing: console plus a plain-text copy in the output directory
    let file_appender = tracing_appender::rolling::never(&config.batch.output_dir, "scrape.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("buybox_scout=info")),
        )
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    info!("Starting Buybox Scout...");

    let urls = load_urls(&config.batch.input_file)?;
    info!(
        count = urls.len(),
        input = %config.batch.input_file.display(),
        "Loaded product URLs"
    );

    let provider = ChromeSessionProvider::launch(&config.scraper)
        .map_err(|e| AppError::Browser(format!("{:#}", e)))?;
    let scraper = ProductScraper::new(provider, config.scraper.clone());
    let retry = RetryController::new(scraper, RetryPolicy::from_config(&config.scraper));
    let runner = BatchRunner::new(retry, Pacing::from_config(&config.batch));

    let path = report_path(&config.batch.output_dir, &chrono::Local::now());
    let mut report = CsvReportWriter::create(&path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;

    let stats = runner.run_batch(&urls, &mut report).await?;

    let summary = stats.summary();
    info!(report = %path.display(), rows = report.rows_written(), "Report written");
    info!("{}", summary);
    println!("{}", summary);
    println!("Report: {}", path.display());

    Ok(())
}
