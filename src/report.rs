use chrono::NaiveDate;
use itertools::Itertools;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scores::ScoreRecord;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no scores recorded yet")]
    NoData,
    #[error("failed to write export {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to encode export: {0}")]
    Csv(#[from] csv::Error),
}

/// Daily bests as shown on the progress screen
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    /// Newest date first
    pub entries: Vec<(NaiveDate, u32)>,
    pub average: f64,
    pub best_day: (NaiveDate, u32),
}

impl ProgressSummary {
    pub fn from_record(record: &ScoreRecord) -> Result<Self, ReportError> {
        if record.daily_best.is_empty() {
            return Err(ReportError::NoData);
        }
        let total: f64 = record.daily_best.values().map(|&s| f64::from(s)).sum();
        let average = total / record.daily_best.len() as f64;

        // Earliest date wins a tie
        let best_day = record
            .daily_best
            .iter()
            .map(|(&date, &score)| (date, score))
            .rev()
            .max_by_key(|&(_, score)| score)
            .ok_or(ReportError::NoData)?;

        let entries = record
            .daily_best
            .iter()
            .map(|(&date, &score)| (date, score))
            .sorted_by(|a, b| b.0.cmp(&a.0))
            .collect();

        Ok(Self {
            entries,
            average,
            best_day,
        })
    }

    pub fn stats_line(&self) -> String {
        format!(
            "Average Score: {:.1} | Best Day: {} ({} digits)",
            self.average, self.best_day.0, self.best_day.1
        )
    }
}

/// A chart point: x is the position in date order, y the day's best
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
    pub label: String,
}

pub fn chart_series(record: &ScoreRecord) -> Result<Vec<ChartPoint>, ReportError> {
    if record.daily_best.is_empty() {
        return Err(ReportError::NoData);
    }
    Ok(record
        .daily_best
        .iter()
        .enumerate()
        .map(|(i, (&date, &score))| ChartPoint {
            x: i as f64,
            y: f64::from(score),
            date,
            label: score.to_string(),
        })
        .collect())
}

/// Write `Date,Score` rows in date order and return the absolute path of
/// the written file.
pub fn export_csv(record: &ScoreRecord, path: &Path) -> Result<PathBuf, ReportError> {
    if record.daily_best.is_empty() {
        return Err(ReportError::NoData);
    }

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["Date", "Score"])?;
    for (date, score) in &record.daily_best {
        writer.write_record([date.to_string(), score.to_string()])?;
    }
    let bytes = writer.into_inner().map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;

    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    crate::scores::write_replace(path, &bytes).map_err(io_err)?;
    let absolute = path.canonicalize().map_err(io_err)?;
    tracing::info!(path = %absolute.display(), rows = record.daily_best.len(), "exported scores");
    Ok(absolute)
}
