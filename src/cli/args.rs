//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output (diagnostics are still shown)
//! - `--reject` / `--no-reject`: Override the configured policy

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// parent-gate - reject pushes built on a stale branch head
#[derive(Parser, Debug)]
#[command(name = "parent-gate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if parent-gate was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; diagnostics for the pushing client are still printed
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Reject commits whose first parent is not the branch head
    #[arg(long, global = true, conflicts_with = "no_reject")]
    pub reject: bool,

    /// Only warn about commits whose first parent is not the branch head
    #[arg(long, global = true)]
    pub no_reject: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Policy override from `--reject` / `--no-reject`, if either was given.
    pub fn reject_override(&self) -> Option<bool> {
        if self.reject {
            Some(true)
        } else if self.no_reject {
            Some(false)
        } else {
            None
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check one commit against the current tip of a ref
    #[command(
        name = "check",
        long_about = "Check one commit against the current tip of a ref.\n\n\
            Compares the commit's first parent with the commit the ref points at \
            right now. A mismatch is reported as a warning, or as a rejection when \
            the policy says so. Exits non-zero only on rejection.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Would HEAD be accepted on top of origin's main?
    parent-gate check --ref refs/remotes/origin/main HEAD

    # Same, treating a stale parent as fatal, machine-readable
    parent-gate --reject check --ref main --json HEAD"
    )]
    Check {
        /// Ref the commit would be pushed to
        #[arg(long = "ref", value_name = "REF")]
        refname: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,

        /// Commit to check
        #[arg(default_value = "HEAD")]
        rev: String,
    },

    /// Run as a Git pre-receive hook (reads ref updates from stdin)
    #[command(
        name = "pre-receive",
        long_about = "Run as a Git pre-receive hook.\n\n\
            Reads '<old> <new> <ref>' lines from stdin, checks every updated branch \
            and prints diagnostics to stderr, which Git relays to the pushing client. \
            Exits non-zero (blocking the whole push) if any update is rejected.",
        after_help = "\
INSTALLATION:
    # In the bare repository on the server
    printf '#!/bin/sh\\nexec parent-gate pre-receive\\n' > hooks/pre-receive
    chmod +x hooks/pre-receive"
    )]
    PreReceive,

    /// Run as a Git update hook (one ref per invocation)
    #[command(name = "update")]
    Update {
        /// Ref being updated
        refname: String,
        /// Old tip (null id for a new ref)
        old: String,
        /// New tip (null id for a deletion)
        new: String,
    },

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        after_help = "\
WORKFLOW EXAMPLES:
    # Show the effective policy and where it comes from
    parent-gate config list

    # Make stale parents fatal for this repository
    parent-gate config set commitcheck.reject_parent_not_head true"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    parent-gate completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    parent-gate completion zsh >> ~/.zshrc"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value from the repository file
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value in the repository file
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// Show the effective policy and its source
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
