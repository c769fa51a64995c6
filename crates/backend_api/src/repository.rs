use async_trait::async_trait;
use models::Report;
use std::path::{Path, PathBuf};

use crate::error::{ApiError, Result};

/// Repository trait for loading the report document.
/// This abstraction allows swapping between file-based and database-backed implementations.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn fetch_report(&self) -> Result<Report>;
}

/// File-based implementation that reads from report.json.
///
/// Reads are fresh on every fetch: the report is a per-request snapshot,
/// so regenerating report.json is picked up without a restart and there
/// is no cache to invalidate.
pub struct FileReportRepository {
    report_path: PathBuf,
}

impl FileReportRepository {
    pub fn new<P: AsRef<Path>>(report_path: P) -> Self {
        Self {
            report_path: report_path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ReportRepository for FileReportRepository {
    async fn fetch_report(&self) -> Result<Report> {
        if !self.report_path.exists() {
            return Err(ApiError::ReportNotFound);
        }
        let content = tokio::fs::read_to_string(&self.report_path).await?;
        let report: Report = serde_json::from_str(&content)?;
        Ok(report)
    }
}
