use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "pimem.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory holding the score files and the log
    pub fn data_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("pimem"))
        } else {
            ProjectDirs::from("", "", "pimem")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    /// Pick the data dir: an explicit choice wins, then the platform default,
    /// then the working directory.
    pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(Self::data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Send tracing output to `pimem.log` in `dir`, since the terminal belongs to
/// the UI. Filter with `RUST_LOG`, defaulting to `info`. Logging is skipped if
/// the file cannot be opened.
pub fn init_logging(dir: &Path) {
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_wins() {
        let dir = AppDirs::resolve_data_dir(Some(Path::new("/tmp/pimem-scores")));
        assert_eq!(dir, PathBuf::from("/tmp/pimem-scores"));
    }

    #[test]
    fn default_data_dir_is_named_for_the_app() {
        let dir = AppDirs::resolve_data_dir(None);
        if dir != Path::new(".") {
            assert!(dir.ends_with("pimem"), "{}", dir.display());
        }
    }

    #[test]
    fn logging_creates_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        init_logging(dir.path());
        assert!(dir.path().join(LOG_FILE).exists());
    }
}
