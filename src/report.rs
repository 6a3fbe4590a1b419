use chrono::{DateTime, TimeZone};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::{ProductRecord, REPORT_HEADER};
use crate::utils::error::Result;

/// Append-only destination for completed records.
#[cfg_attr(test, mockall::automock)]
pub trait ReportSink {
    fn write_record(&mut self, record: &ProductRecord) -> Result<()>;
}

/// CSV report; the header is written on creation and every row is flushed
/// as soon as it is written, so an interrupted run keeps completed rows.
pub struct CsvReportWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvReportWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvReportWriter<W> {
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(REPORT_HEADER)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::AppError::Io(e.into_error()))
    }
}

impl<W: Write> ReportSink for CsvReportWriter<W> {
    fn write_record(&mut self, record: &ProductRecord) -> Result<()> {
        self.writer.write_record(record.to_csv_record())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}

/// In-memory sink, handy for callers that post-process records themselves.
impl ReportSink for Vec<ProductRecord> {
    fn write_record(&mut self, record: &ProductRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// `products_<YYYYmmdd_HHMMSS>.csv` inside `output_dir`.
pub fn report_path<Tz: TimeZone>(output_dir: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    output_dir.join(format!("products_{}.csv", now.format("%Y%m%d_%H%M%S")))
}
