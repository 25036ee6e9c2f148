//! Per-chart PNG snapshot export with best-effort batch semantics.
//!
//! Batch export is a sequential, cooperatively-paced loop: the rasterizing
//! collaborator is issued one chart at a time with a small inter-item delay,
//! never a parallel fan-out. A failure on one item is recorded and the batch
//! continues.

use crate::models::RawChartRecord;
use crate::present::{Prepared, prepare};
use crate::render;
use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Pause between batch items so the rasterizer is not overwhelmed.
const ITEM_DELAY: Duration = Duration::from_millis(150);

// The pattern is static; compile failure would be a programming error.
static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());

/// Why one batch item failed to export.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("record carries an upstream error{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    UpstreamError(Option<String>),
    #[error("no data points to render")]
    NoData,
    #[error("rasterization failed: {0}")]
    Render(#[from] anyhow::Error),
}

/// One failed item in a batch export.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub title: String,
    pub error: SnapshotError,
}

/// Result of a best-effort batch export.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub saved: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
}

/// Deterministic PNG file name: the chart title stripped of non-alphanumeric
/// characters, suffixed with the given date.
pub fn snapshot_file_name(title: &str, date: NaiveDate) -> String {
    let mut stem = NON_ALNUM.replace_all(title, "").to_string();
    if stem.is_empty() {
        stem = "chart".to_string();
    }
    format!("{}_{}.png", stem, date.format("%Y%m%d"))
}

/// Export one record as a PNG in `dir`, named from its title and today's date.
pub fn export_png(
    record: &RawChartRecord,
    dir: &Path,
    width: u32,
    height: u32,
) -> Result<PathBuf, SnapshotError> {
    let path = dir.join(snapshot_file_name(
        record.title(),
        chrono::Local::now().date_naive(),
    ));
    match prepare(record) {
        Prepared::UpstreamError { message, .. } => Err(SnapshotError::UpstreamError(message)),
        Prepared::NoData => Err(SnapshotError::NoData),
        Prepared::Chart { series, plan } => {
            render::render_chart(&series, &plan, record.title(), &path, width, height)?;
            Ok(path)
        }
    }
}

/// Export a batch of records as PNGs, one by one with pacing.
///
/// Best-effort: each item's failure is captured in the outcome while the
/// remaining items continue. Cancellation is not supported.
pub fn export_batch(
    records: &[RawChartRecord],
    dir: &Path,
    width: u32,
    height: u32,
) -> BatchOutcome {
    export_batch_with(records, |record| export_png(record, dir, width, height))
}

/// Batch loop with the rasterizing collaborator injected.
///
/// `export_batch` passes the plotters-backed renderer; tests pass a closure
/// so per-item failures can be provoked without a real backend.
pub fn export_batch_with<F>(records: &[RawChartRecord], mut rasterize: F) -> BatchOutcome
where
    F: FnMut(&RawChartRecord) -> Result<PathBuf, SnapshotError>,
{
    let mut outcome = BatchOutcome::default();
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            thread::sleep(ITEM_DELAY);
        }
        match rasterize(record) {
            Ok(path) => {
                log::debug!("exported {:?}", path);
                outcome.saved.push(path);
            }
            Err(error) => {
                log::warn!("snapshot {} ({}) failed: {}", index, record.title(), error);
                outcome.failures.push(BatchFailure {
                    index,
                    title: record.title().to_string(),
                    error,
                });
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_non_alphanumerics() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            snapshot_file_name("Sales: Q1/Q2 (2026)!", date),
            "SalesQ1Q22026_20260830.png"
        );
        assert_eq!(snapshot_file_name("///", date), "chart_20260830.png");
    }

    #[test]
    fn file_name_is_stable_across_batch_sized_call_counts() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let first = snapshot_file_name("Batch Chart #1", date);
        for _ in 0..100 {
            assert_eq!(snapshot_file_name("Batch Chart #1", date), first);
        }
    }
}
