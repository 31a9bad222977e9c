use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HIGH_SCORE_FILE: &str = "high_score.txt";
pub const DAILY_SCORES_FILE: &str = "daily_scores.txt";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Best streaks: one all-time value plus one value per calendar date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreRecord {
    pub all_time_best: u32,
    pub daily_best: BTreeMap<NaiveDate, u32>,
}

impl ScoreRecord {
    /// Apply a finished streak in memory. Each field only moves when the
    /// streak is strictly greater than what is there.
    pub fn apply(&mut self, date: NaiveDate, streak: u32) -> RecordChange {
        let daily_best_changed = match self.daily_best.get(&date) {
            Some(&existing) if streak <= existing => false,
            _ => {
                self.daily_best.insert(date, streak);
                true
            }
        };

        let all_time_best_changed = streak > self.all_time_best;
        if all_time_best_changed {
            self.all_time_best = streak;
        }

        RecordChange {
            all_time_best_changed,
            daily_best_changed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordChange {
    pub all_time_best_changed: bool,
    pub daily_best_changed: bool,
}

impl RecordChange {
    pub fn any(&self) -> bool {
        self.all_time_best_changed || self.daily_best_changed
    }
}

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("failed to create score directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

pub trait ScoreStore {
    /// Re-read the persisted scores, replacing the cached record
    fn load(&mut self) -> &ScoreRecord;

    /// The record as last loaded or updated
    fn record(&self) -> &ScoreRecord;

    /// Store a finished streak if it beats today's best and/or the all-time
    /// best. The cached record is updated even if persisting fails.
    fn record_if_best(
        &mut self,
        date: NaiveDate,
        streak: u32,
    ) -> Result<RecordChange, ScoreStoreError>;
}

/// Two flat text files in one directory: `high_score.txt` holds a single
/// integer and `daily_scores.txt` holds `YYYY-MM-DD:SCORE` lines.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    dir: PathBuf,
    record: ScoreRecord,
}

impl FileScoreStore {
    /// Open the store rooted at `dir` and load whatever is there
    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        let mut store = Self {
            dir: dir.as_ref().to_path_buf(),
            record: ScoreRecord::default(),
        };
        store.load();
        store
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn high_score_path(&self) -> PathBuf {
        self.dir.join(HIGH_SCORE_FILE)
    }

    pub fn daily_scores_path(&self) -> PathBuf {
        self.dir.join(DAILY_SCORES_FILE)
    }

    fn save_high_score(&self) -> Result<(), ScoreStoreError> {
        let contents = format!("{}\n", self.record.all_time_best);
        self.write_file(&self.high_score_path(), &contents)
    }

    fn save_daily_scores(&self) -> Result<(), ScoreStoreError> {
        let contents: String = self
            .record
            .daily_best
            .iter()
            .map(|(date, score)| format!("{}:{}\n", date.format(DATE_FORMAT), score))
            .collect();
        self.write_file(&self.daily_scores_path(), &contents)
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), ScoreStoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| ScoreStoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        write_replace(path, contents.as_bytes()).map_err(|source| ScoreStoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&mut self) -> &ScoreRecord {
        self.record = ScoreRecord {
            all_time_best: read_high_score(&self.high_score_path()),
            daily_best: read_daily_scores(&self.daily_scores_path()),
        };
        tracing::info!(
            all_time_best = self.record.all_time_best,
            days = self.record.daily_best.len(),
            "loaded scores"
        );
        &self.record
    }

    fn record(&self) -> &ScoreRecord {
        &self.record
    }

    fn record_if_best(
        &mut self,
        date: NaiveDate,
        streak: u32,
    ) -> Result<RecordChange, ScoreStoreError> {
        let change = self.record.apply(date, streak);
        // Both files are attempted; the first failure is reported
        let daily = if change.daily_best_changed {
            self.save_daily_scores()
        } else {
            Ok(())
        };
        let high = if change.all_time_best_changed {
            self.save_high_score()
        } else {
            Ok(())
        };
        daily.and(high)?;
        tracing::info!(%date, streak, ?change, "recorded finished run");
        Ok(change)
    }
}

/// Write to a sibling temporary file, then rename over the target
pub(crate) fn write_replace(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    let mut file = File::create(&tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path)
}

fn read_high_score(path: &Path) -> u32 {
    let Ok(contents) = fs::read_to_string(path) else {
        return 0;
    };
    match contents.trim().parse() {
        Ok(score) => score,
        Err(_) => {
            tracing::debug!(path = %path.display(), "unparsable high score, using 0");
            0
        }
    }
}

fn read_daily_scores(path: &Path) -> BTreeMap<NaiveDate, u32> {
    let Ok(contents) = fs::read(path) else {
        return BTreeMap::new();
    };
    let mut scores = BTreeMap::new();
    for raw in contents.split(|&b| b == b'\n') {
        let Ok(line) = std::str::from_utf8(raw) else {
            tracing::debug!(path = %path.display(), "skipping non-utf8 daily score line");
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_daily_line(line) {
            Some((date, score)) => {
                scores.insert(date, score);
            }
            None => tracing::debug!(line, "skipping malformed daily score line"),
        }
    }
    scores
}

fn parse_daily_line(line: &str) -> Option<(NaiveDate, u32)> {
    let (date, score) = line.trim().split_once(':')?;
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    let score = score.trim().parse().ok()?;
    Some((date, score))
}
