//! check command - Validate one commit against the current tip of a ref

use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::cli::Context;
use crate::core::types::RefName;
use crate::gate::{enforce, Policy, ValidationOutcome};
use crate::ui::output;

/// JSON shape of `check --json`.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    commit: &'a str,
    target: &'a str,
    policy: Policy,
    #[serde(flatten)]
    outcome: &'a ValidationOutcome,
}

/// Check `rev` as if it were pushed to `refname`.
///
/// Exits non-zero only when the outcome is a rejection. A revision that
/// does not name a commit is a usage error, not an infrastructure warning.
pub fn check(ctx: &Context, refname: &str, rev: &str, json: bool) -> Result<()> {
    let git = ctx.open_repo()?;
    let validator = ctx.validator(&git)?;

    let target = RefName::new(refname).context("Invalid ref name")?;
    let id = git
        .resolve_commit(rev)
        .with_context(|| format!("Failed to resolve '{}'", rev))?;
    let incoming = git
        .incoming_commit(&id, &target)
        .with_context(|| format!("Failed to read commit {}", id))?;

    let outcome = validator.validate(&git, &target, &incoming);

    if json {
        let report = CheckReport {
            commit: id.as_str(),
            target: target.as_str(),
            policy: validator.policy(),
            outcome: &outcome,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize outcome")?
        );
    } else {
        for diagnostic in outcome.diagnostics() {
            output::diagnostic(None, diagnostic);
        }
        output::print(
            format!("{} onto {}: {}", id, target, outcome.verdict()),
            ctx.verbosity(),
        );
    }

    enforce(outcome)?;
    Ok(())
}
