//! config command - Get, set, or list configuration values
//!
//! `get` and `set` work on the repository file
//! (`<git-dir>/parent-gate/config.toml`). `list` shows every layer and the
//! effective policy.

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, GIT_CONFIG_KEY, REJECT_PARENT_NOT_HEAD_KEY};
use crate::ui::output;

/// Print a value from the repository file. Prints nothing if unset.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let git = ctx.open_repo()?;
    let config = Config::load(Some(git.git_dir())).context("Failed to load config")?;

    let repo = config.repo.unwrap_or_default();
    if let Some(value) = repo.get(key)? {
        println!("{}", value);
    }
    Ok(())
}

/// Set a value in the repository file.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let git = ctx.open_repo()?;
    let git_dir = git.git_dir();
    let config = Config::load(Some(git_dir)).context("Failed to load config")?;

    let mut repo = config.repo.unwrap_or_default();
    repo.set(key, value)?;

    let path = Config::write_repo(git_dir, &repo).context("Failed to write config")?;
    tracing::debug!(path = %path.display(), key, "config written");

    output::print(format!("Set {} = {}", key, value), ctx.verbosity());
    Ok(())
}

/// Show every configuration layer and the effective policy.
pub fn list(ctx: &Context) -> Result<()> {
    let git = ctx.open_repo()?;
    let git_value = git.config_bool(GIT_CONFIG_KEY)?;
    let config = Config::load(Some(git.git_dir()))
        .context("Failed to load config")?
        .with_git_config(git_value);

    let show = |value: Option<bool>| match value {
        Some(v) => v.to_string(),
        None => "(not set)".to_string(),
    };

    println!("# Global file");
    match config.global_config_loaded_from() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (none)"),
    }
    println!(
        "{} = {}",
        REJECT_PARENT_NOT_HEAD_KEY,
        show(config.global.reject_parent_not_head())
    );

    println!();
    println!("# Git config");
    println!("{} = {}", GIT_CONFIG_KEY, show(git_value));

    println!();
    println!("# Repository file");
    match config.repo_config_loaded_from() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (none)"),
    }
    println!(
        "{} = {}",
        REJECT_PARENT_NOT_HEAD_KEY,
        show(config.repo.as_ref().and_then(|r| r.reject_parent_not_head()))
    );

    let (policy, source) = config.policy(ctx.reject);
    println!();
    println!("# Effective ({})", source);
    println!(
        "{} = {}",
        REJECT_PARENT_NOT_HEAD_KEY, policy.reject_parent_not_head
    );

    Ok(())
}
