//! hook commands - Run as a Git pre-receive or update hook
//!
//! Diagnostics go to stderr, which Git relays to the pushing client as
//! `remote:` lines. A non-zero exit blocks the push, so only a rejected
//! update may cause one. A policy that cannot be loaded is reported as an
//! infrastructure diagnostic and the push is checked with the default
//! (warn-only) policy instead.

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::gate::{Diagnostic, ParentHeadValidator, Policy};
use crate::git::Git;
use crate::hook::{self, parse_updates, HookReport, RefUpdate};
use crate::ui::output;

/// Handle a pre-receive invocation: one update per stdin line.
pub fn pre_receive(ctx: &Context) -> Result<()> {
    let updates = parse_updates(std::io::stdin().lock()).context("Failed to read ref updates")?;
    tracing::debug!(count = updates.len(), "pre-receive input parsed");
    run_updates(ctx, &updates)
}

/// Handle an update-hook invocation: `<ref> <old> <new>` as arguments.
pub fn update(ctx: &Context, refname: &str, old: &str, new: &str) -> Result<()> {
    let update = RefUpdate::from_args(refname, old, new)?;
    run_updates(ctx, &[update])
}

fn run_updates(ctx: &Context, updates: &[RefUpdate]) -> Result<()> {
    if updates.is_empty() {
        return Ok(());
    }

    let git = ctx.open_hook_repo()?;
    let validator = hook_validator(ctx, &git);

    let report = hook::run(&git, &validator, updates);
    print_report(&report);

    report.enforce()?;
    Ok(())
}

/// The configured validator, or the default policy if loading it failed.
///
/// `--reject` / `--no-reject` still apply in the fallback.
fn hook_validator(ctx: &Context, git: &Git) -> ParentHeadValidator {
    match ctx.validator(git) {
        Ok(validator) => validator,
        Err(err) => {
            let policy = Policy::new(ctx.reject.unwrap_or_default());
            tracing::warn!(
                error = %format!("{:#}", err),
                reject_parent_not_head = policy.reject_parent_not_head,
                "policy could not be loaded, using fallback"
            );
            output::diagnostic(
                None,
                &Diagnostic::infrastructure(format!(
                    "{:#}; checking with reject_parent_not_head = {}",
                    err, policy.reject_parent_not_head
                )),
            );
            ParentHeadValidator::new(policy)
        }
    }
}

fn print_report(report: &HookReport) {
    for result in &report.results {
        for diagnostic in result.outcome.diagnostics() {
            output::diagnostic(Some(result.update.refname.as_str()), diagnostic);
        }
    }
}
