//! hook
//!
//! Receive-hook adapter: the push pipeline around the validator.
//!
//! # Flow
//!
//! For every ref update of a push:
//!
//! 1. Skip deletions and refs outside `refs/heads/`.
//! 2. Materialize the pushed commit (id + parents) from the repository.
//! 3. Run the [`ParentHeadValidator`] against the ref's current tip.
//!
//! A commit that cannot be materialized is reported the same way a failed
//! ref lookup is: one infrastructure diagnostic, push allowed.
//!
//! The adapter does not update refs. Git performs the actual ref
//! transaction after the hook exits successfully, with its own
//! old-value check.
//!
//! # Example
//!
//! ```ignore
//! use parentgate::gate::{ParentHeadValidator, Policy};
//! use parentgate::git::Git;
//! use parentgate::hook;
//!
//! let git = Git::open_from_env()?;
//! let updates = hook::parse_updates(std::io::stdin().lock())?;
//! let report = hook::run(&git, &ParentHeadValidator::new(Policy::new(true)), &updates);
//! report.enforce()?;
//! ```

pub mod update;

pub use update::{parse_updates, RefUpdate};

use thiserror::Error;

use crate::core::types::RefName;
use crate::gate::{
    enforce, CommitSource, ParentHeadValidator, PushRejected, RefResolver, ValidationOutcome,
    Verdict,
};

/// Errors from the hook adapter.
#[derive(Debug, Error)]
pub enum HookError {
    /// A ref-update command could not be parsed.
    #[error("malformed ref update '{line}': {message}")]
    MalformedLine { line: String, message: String },

    /// Reading hook input failed.
    #[error("failed to read hook input")]
    Io(#[from] std::io::Error),

    /// An update was rejected by the parent check.
    #[error("{refname}: {rejection}")]
    Rejected {
        refname: RefName,
        rejection: PushRejected,
    },
}

impl HookError {
    fn malformed(line: &str, cause: impl std::fmt::Display) -> Self {
        HookError::MalformedLine {
            line: line.to_string(),
            message: cause.to_string(),
        }
    }
}

/// The outcome for one checked update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    pub update: RefUpdate,
    pub outcome: ValidationOutcome,
}

/// Outcomes of every checked update of a push, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookReport {
    pub results: Vec<UpdateResult>,
    /// Updates that were not checked (deletions, non-branch refs)
    pub skipped: Vec<RefUpdate>,
}

impl HookReport {
    /// Whether every checked update may proceed.
    pub fn allows_push(&self) -> bool {
        self.results.iter().all(|r| r.outcome.verdict().allows_push())
    }

    /// Updates that were rejected.
    pub fn rejected(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results
            .iter()
            .filter(|r| r.outcome.verdict() == Verdict::Rejected)
    }

    /// Fail with the first rejected update, if any.
    ///
    /// The error carries every diagnostic of that update, in order.
    pub fn enforce(&self) -> Result<(), HookError> {
        for result in &self.results {
            if let Err(rejection) = enforce(result.outcome.clone()) {
                return Err(HookError::Rejected {
                    refname: result.update.refname.clone(),
                    rejection,
                });
            }
        }
        Ok(())
    }
}

/// Check a single update.
///
/// Returns `None` for updates the gate does not apply to.
pub fn check_update<R>(
    repo: &R,
    validator: &ParentHeadValidator,
    update: &RefUpdate,
) -> Option<ValidationOutcome>
where
    R: RefResolver + CommitSource + ?Sized,
{
    if update.is_delete() {
        tracing::info!(refname = %update.refname, "skipping ref deletion");
        return None;
    }
    if !update.refname.is_branch_ref() {
        tracing::info!(refname = %update.refname, "skipping non-branch ref");
        return None;
    }

    let outcome = match repo.incoming_commit(&update.new, &update.refname) {
        Ok(incoming) => validator.validate(repo, &update.refname, &incoming),
        Err(err) => {
            tracing::warn!(
                refname = %update.refname,
                commit = %update.new,
                error = %err,
                "could not inspect pushed commit"
            );
            ValidationOutcome::infrastructure(err)
        }
    };

    Some(outcome)
}

/// Check every update of a push.
pub fn run<R>(repo: &R, validator: &ParentHeadValidator, updates: &[RefUpdate]) -> HookReport
where
    R: RefResolver + CommitSource + ?Sized,
{
    let mut report = HookReport::default();

    for update in updates {
        match check_update(repo, validator, update) {
            Some(outcome) => report.results.push(UpdateResult {
                update: update.clone(),
                outcome,
            }),
            None => report.skipped.push(update.clone()),
        }
    }

    tracing::debug!(
        checked = report.results.len(),
        skipped = report.skipped.len(),
        allowed = report.allows_push(),
        "receive hook finished"
    );

    report
}
