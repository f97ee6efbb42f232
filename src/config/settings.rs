use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::client::RetryPolicy;
use crate::util::DataDir;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the config file, logs and default captures live
    pub data_dir: DataDir,
    pub server: ServerConfig,
    pub retry: RetryConfig,
    pub session: SessionConfig,
    pub captures: CapturesConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Root URL of the debugger server
    pub root: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub default_max_superstep: i64,
    pub enforce_bounds: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturesConfig {
    /// Where captured tests are written (None = data dir default)
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: DataDir::default(),
            server: ServerConfig {
                root: "http://localhost:8000".to_string(),
                timeout_secs: 30,
            },
            retry: RetryConfig {
                max_attempts: 5,
                delay_ms: 2000,
            },
            session: SessionConfig {
                default_max_superstep: 15,
                enforce_bounds: true,
            },
            captures: CapturesConfig { dir: None },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlServerConfig {
    pub root: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlRetryConfig {
    pub max_attempts: Option<u32>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSessionConfig {
    pub default_max_superstep: Option<i64>,
    pub enforce_bounds: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlCapturesConfig {
    pub dir: Option<PathBuf>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub server: Option<TomlServerConfig>,
    pub retry: Option<TomlRetryConfig>,
    pub session: Option<TomlSessionConfig>,
    pub captures: Option<TomlCapturesConfig>,
}

impl Config {
    /// Load `config.toml` from `data_dir`, merging with defaults
    pub fn load(data_dir: DataDir) -> Self {
        let config_file = data_dir.config_file();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file).with_data_dir(data_dir)
    }

    /// Load configuration from `path`, merging with defaults.
    ///
    /// A missing or unparsable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No config file loaded");
                return config;
            }
        };

        match toml::from_str::<TomlConfig>(&contents) {
            Ok(toml_config) => config.merge(toml_config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
            }
        }

        config
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(server) = toml_config.server {
            if let Some(root) = server.root {
                self.server.root = root;
            }
            if let Some(timeout_secs) = server.timeout_secs {
                self.server.timeout_secs = timeout_secs;
            }
        }

        if let Some(retry) = toml_config.retry {
            if let Some(max_attempts) = retry.max_attempts {
                self.retry.max_attempts = max_attempts;
            }
            if let Some(delay_ms) = retry.delay_ms {
                self.retry.delay_ms = delay_ms;
            }
        }

        if let Some(session) = toml_config.session {
            if let Some(default_max_superstep) = session.default_max_superstep {
                self.session.default_max_superstep = default_max_superstep;
            }
            if let Some(enforce_bounds) = session.enforce_bounds {
                self.session.enforce_bounds = enforce_bounds;
            }
        }

        if let Some(captures) = toml_config.captures {
            if captures.dir.is_some() {
                self.captures.dir = captures.dir;
            }
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(path = %parent.display(), error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write default config");
        }
    }

    pub fn with_data_dir(mut self, data_dir: DataDir) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn with_server_root(mut self, root: impl Into<String>) -> Self {
        self.server.root = root.into();
        self
    }

    pub fn server_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.delay_ms),
        )
    }

    /// Directory captured tests are written to
    pub fn captures_dir(&self) -> PathBuf {
        self.captures
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir.captures_dir())
    }
}
