//! cli
//!
//! Command-line interface layer for parent-gate.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialize logging
//! - Open the repository, load the policy once, build the validator
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! [`commands`]. The decision itself lives in [`crate::gate`]; the push
//! pipeline around it lives in [`crate::hook`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::{Config, PolicySource, GIT_CONFIG_KEY};
use crate::gate::{ParentHeadValidator, Policy};
use crate::git::Git;
use crate::ui::output::Verbosity;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "PARENT_GATE_LOG";

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Policy override from `--reject` / `--no-reject`.
    pub reject: Option<bool>,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Open the repository for an interactive command.
    pub fn open_repo(&self) -> Result<Git> {
        let cwd = match &self.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        Git::open(&cwd).context("Failed to open repository")
    }

    /// Open the repository for a hook invocation.
    ///
    /// Without `--cwd`, the Git environment decides (`GIT_DIR`, quarantine
    /// object directories).
    pub fn open_hook_repo(&self) -> Result<Git> {
        match &self.cwd {
            Some(_) => self.open_repo(),
            None => Git::open_from_env().context("Failed to open repository from environment"),
        }
    }

    /// Load the policy once and resolve where it came from.
    pub fn load_policy(&self, git: &Git) -> Result<(Policy, PolicySource)> {
        let git_value = git
            .config_bool(GIT_CONFIG_KEY)
            .with_context(|| format!("Failed to read git config {}", GIT_CONFIG_KEY))?;
        let config = Config::load(Some(git.git_dir()))
            .context("Failed to load config")?
            .with_git_config(git_value);

        Ok(config.policy(self.reject))
    }

    /// Build the validator for this invocation.
    pub fn validator(&self, git: &Git) -> Result<ParentHeadValidator> {
        let (policy, source) = self.load_policy(git)?;
        tracing::debug!(
            reject_parent_not_head = policy.reject_parent_not_head,
            source = %source,
            "policy loaded"
        );
        Ok(ParentHeadValidator::new(policy))
    }
}

/// Initialize `tracing` output on stderr.
///
/// `PARENT_GATE_LOG` wins if set. Otherwise only errors are logged, or
/// everything from this crate at debug level with `--debug`. The default is
/// quiet because a hook's stderr goes to the pushing client, who already
/// gets the diagnostics.
pub fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("parentgate=debug")
        } else {
            EnvFilter::new("error")
        }
    });

    // A second initialization (tests driving `run` twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        reject: cli.reject_override(),
    };

    commands::dispatch(cli.command, &ctx)
}
