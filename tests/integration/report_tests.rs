use super::*;
use buybox_scout::models::REPORT_HEADER;
use buybox_scout::report::{report_path, CsvReportWriter, ReportSink};
use chrono::{TimeZone, Utc};

#[tokio::test]
async fn test_batch_writes_csv_report() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = report_path(dir.path(), &Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap());
    assert!(path.ends_with("products_20240601_093000.csv"));

    let unreachable = "https://unreachable.example/item";
    let browser = ScriptedBrowser::new()
        .script(ECHO_DOT_URL, vec![Step::page(ECHO_DOT_URL, COUPON_PAGE)]);
    let runner = create_test_runner(browser, 0);

    let mut report = CsvReportWriter::create(&path)?;
    let stats = runner
        .run_batch(&urls(&[ECHO_DOT_URL, unreachable]), &mut report)
        .await?;
    assert_eq!(report.rows_written(), 2);
    drop(report);

    let mut reader = csv::Reader::from_path(&path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    assert_eq!(headers, REPORT_HEADER.to_vec());

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len() as u64, stats.total);

    assert_eq!(&rows[0][0], ECHO_DOT_URL);
    assert_eq!(&rows[0][4], "No");
    assert_eq!(&rows[0][6], "₹1299.00");
    assert_eq!(&rows[0][7], "1299");
    assert_eq!(&rows[0][10], "10%");
    assert_eq!(&rows[0][12], "₹0");
    assert_eq!(&rows[0][14], "₹1289");
    assert_eq!(&rows[0][15], "1289");

    assert_eq!(&rows[1][0], unreachable);
    assert_eq!(&rows[1][2], "SCRAPING_FAILED");
    assert_eq!(&rows[1][4], "Unknown");
    Ok(())
}

#[tokio::test]
async fn test_completed_rows_survive_an_aborted_run() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("partial.csv");

    let browser = ScriptedBrowser::new()
        .script(ECHO_DOT_URL, vec![Step::page(ECHO_DOT_URL, COUPON_PAGE)]);
    let runner = create_test_runner(browser, 0);

    let mut report = CsvReportWriter::create(&path)?;
    runner.run_batch(&urls(&[ECHO_DOT_URL]), &mut report).await?;

    // The writer is still open; its rows are already on disk.
    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents.lines().count(), 2);

    report.write_record(&buybox_scout::ProductRecord::terminal_failure(ECHO_DOT_URL))?;
    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents.lines().count(), 3);
    Ok(())
}
