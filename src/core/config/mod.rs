//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! The gate has exactly one tunable: whether a stale first parent is a
//! warning or a rejection (`reject_parent_not_head`). It is read once at
//! startup and handed to the validator as an immutable [`Policy`].
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default (`false`)
//! 2. Global config file
//! 3. Git config `commitcheck.rejectParentNotHead` of the repository
//! 4. Repo config file
//! 5. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$PARENT_GATE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/parent-gate/config.toml`
//! 3. `~/.parent-gate/config.toml`
//!
//! # Repo Config Location
//!
//! `<git-dir>/parent-gate/config.toml`. For a bare server repository the
//! git dir is the repository directory itself.
//!
//! # Example
//!
//! ```no_run
//! use parentgate::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/srv/git/project.git"))).unwrap();
//! let (policy, source) = config.policy(None);
//! println!("reject_parent_not_head = {} ({})", policy.reject_parent_not_head, source);
//! ```

pub mod schema;

pub use schema::{CommitCheckConfig, GateConfig, KEYS, REJECT_PARENT_NOT_HEAD_KEY};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::gate::Policy;

/// Git config key read from the repository (`[commitcheck] rejectParentNotHead`).
pub const GIT_CONFIG_KEY: &str = "commitcheck.rejectParentNotHead";

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "PARENT_GATE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Where the effective policy value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicySource {
    /// Nothing configured
    Default,
    /// The global config file
    GlobalFile(PathBuf),
    /// The repository's Git config
    GitConfig,
    /// The repository config file
    RepoFile(PathBuf),
    /// A command-line flag
    CommandLine,
}

impl std::fmt::Display for PolicySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicySource::Default => write!(f, "default"),
            PolicySource::GlobalFile(path) => write!(f, "{}", path.display()),
            PolicySource::GitConfig => write!(f, "git config {}", GIT_CONFIG_KEY),
            PolicySource::RepoFile(path) => write!(f, "{}", path.display()),
            PolicySource::CommandLine => write!(f, "command line"),
        }
    }
}

/// Merged configuration from all sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GateConfig,
    /// Repository configuration (if a repo file exists)
    pub repo: Option<GateConfig>,
    /// Value of `commitcheck.rejectParentNotHead` in Git config, if set
    pub git_reject_parent_not_head: Option<bool>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// If `git_dir` is provided, the repository file is loaded as well.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed. Missing files are not an error (defaults are used).
    pub fn load(git_dir: Option<&Path>) -> Result<Config, ConfigError> {
        Self::load_with(&Self::global_candidates(), git_dir)
    }

    /// Load configuration with an explicit list of global candidates.
    ///
    /// The first candidate that exists is used.
    pub fn load_with(
        global_candidates: &[PathBuf],
        git_dir: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        let (global, global_path) = match global_candidates.iter().find(|p| p.exists()) {
            Some(path) => (Self::read_config(path)?, Some(path.clone())),
            None => (GateConfig::default(), None),
        };

        let (repo, repo_path) = match git_dir.map(Self::repo_config_path) {
            Some(path) if path.exists() => (Some(Self::read_config(&path)?), Some(path)),
            _ => (None, None),
        };

        Ok(Config {
            global,
            repo,
            git_reject_parent_not_head: None,
            global_path,
            repo_path,
        })
    }

    /// Set the value read from the repository's Git config.
    pub fn with_git_config(mut self, value: Option<bool>) -> Self {
        self.git_reject_parent_not_head = value;
        self
    }

    /// Global config locations, in search order.
    pub fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("parent-gate/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".parent-gate/config.toml"));
        }

        candidates
    }

    /// Get the canonical path for repo config.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("parent-gate/config.toml")
    }

    /// Write the repo config file atomically.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames over the target.
    pub fn write_repo(git_dir: &Path, config: &GateConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::repo_config_path(git_dir);
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    fn write_config_atomic(path: &Path, config: &GateConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    fn read_config(path: &Path) -> Result<GateConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Resolve the effective policy.
    ///
    /// `cli_override` is the value of `--reject` / `--no-reject`, if given.
    pub fn policy(&self, cli_override: Option<bool>) -> (Policy, PolicySource) {
        let (reject, source) = if let Some(value) = cli_override {
            (value, PolicySource::CommandLine)
        } else if let Some(value) = self.repo.as_ref().and_then(|r| r.reject_parent_not_head()) {
            (
                value,
                PolicySource::RepoFile(self.repo_path.clone().unwrap_or_default()),
            )
        } else if let Some(value) = self.git_reject_parent_not_head {
            (value, PolicySource::GitConfig)
        } else if let Some(value) = self.global.reject_parent_not_head() {
            (
                value,
                PolicySource::GlobalFile(self.global_path.clone().unwrap_or_default()),
            )
        } else {
            (false, PolicySource::Default)
        };

        (Policy::new(reject), source)
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
