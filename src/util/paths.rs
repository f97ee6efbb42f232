//! Layout of the graft data directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_DIR_NAME: &str = ".graft";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "graft.log";

/// Root of everything graft writes: config, logs and captured tests
///
/// Resolved once at startup from `--data-dir` or the home directory and
/// then passed around with the [`Config`](crate::config::Config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `custom` when given, otherwise `~/.graft` (`./.graft` without a home)
    pub fn resolve(custom: Option<PathBuf>) -> Self {
        match custom {
            Some(root) => Self::new(root),
            None => Self::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE)
    }

    /// Default target for captured tests
    pub fn captures_dir(&self) -> PathBuf {
        self.root.join("captures")
    }

    /// Create the logs directory and return the log file path
    pub fn prepare_log_file(&self) -> io::Result<PathBuf> {
        fs::create_dir_all(self.logs_dir())?;
        Ok(self.log_file())
    }
}

impl Default for DataDir {
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join(DEFAULT_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_NAME));
        Self { root }
    }
}
