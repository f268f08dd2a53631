//! cli::commands
//!
//! Command handlers and dispatch.
//!
//! Each handler opens the repository it needs, loads the policy through
//! [`Context`], and leaves the decision to [`crate::gate`].

mod check;
mod completion;
mod config_cmd;
mod hook;

use anyhow::Result;

use super::args::{Command, ConfigAction};
use super::Context;

pub use check::check;
pub use completion::completion;
pub use hook::{pre_receive, update};

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Check { refname, json, rev } => check(ctx, &refname, &rev, json),
        Command::PreReceive => pre_receive(ctx),
        Command::Update { refname, old, new } => update(ctx, &refname, &old, &new),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion(shell),
    }
}
