//! gate::validator
//!
//! The parent/head check.
//!
//! # Algorithm
//!
//! 1. Resolve the target ref to its current tip.
//! 2. Take the incoming commit's first parent.
//! 3. Compare by identifier equality.
//!
//! | Step outcome                 | Verdict                                  |
//! |------------------------------|------------------------------------------|
//! | tip == first parent          | `Accepted`, no diagnostics               |
//! | tip != first parent          | `Rejected` under policy, else warning    |
//! | ref lookup failed            | `AcceptedWithWarning`, one `(W2)` line   |
//! | commit has no parent         | `AcceptedWithWarning`, one `(W2)` line   |
//!
//! The last two rows never reject, whatever the policy says: a failed
//! lookup or a root commit says nothing about parent staleness.
//!
//! # Concurrency
//!
//! [`ParentHeadValidator`] holds only an immutable [`Policy`]; it is `Send`,
//! `Sync` and `Copy`, and any number of pushes may call
//! [`ParentHeadValidator::validate`] at once. The tip read in step 1 may be
//! stale by the time the push lands. Closing that race is the job of the
//! ref-update transaction that follows, not of this check.

use serde::Serialize;
use thiserror::Error;

use super::outcome::ValidationOutcome;
use super::traits::RefResolver;
use crate::core::types::{CommitId, RefName};
use crate::git::GitError;

/// Validator configuration, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Policy {
    /// Reject (instead of warn about) commits whose first parent is not the
    /// current branch head.
    pub reject_parent_not_head: bool,
}

impl Policy {
    pub const fn new(reject_parent_not_head: bool) -> Self {
        Self {
            reject_parent_not_head,
        }
    }
}

/// A commit being pushed, already materialized by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCommit {
    /// The commit's own id
    pub id: CommitId,
    /// Parent ids in commit order; index 0 is the first parent
    pub parents: Vec<CommitId>,
    /// The ref the commit is being pushed to
    pub target: RefName,
}

impl IncomingCommit {
    pub fn new(id: CommitId, parents: Vec<CommitId>, target: RefName) -> Self {
        Self {
            id,
            parents,
            target,
        }
    }

    /// The first parent, or `None` for a root commit.
    pub fn first_parent(&self) -> Option<&CommitId> {
        self.parents.first()
    }
}

/// Why the comparison could not be made.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The target ref could not be resolved.
    #[error(transparent)]
    Resolve(#[from] GitError),

    /// The incoming commit is a root commit.
    #[error("commit {commit} has no parent to compare with {target}")]
    NoParent { commit: CommitId, target: RefName },
}

/// Compares an incoming commit's first parent against the branch tip.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentHeadValidator {
    policy: Policy,
}

impl ParentHeadValidator {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Validate `incoming` against the current tip of `target`.
    ///
    /// Never fails: every error path is folded into the returned outcome.
    pub fn validate<R>(
        &self,
        repo: &R,
        target: &RefName,
        incoming: &IncomingCommit,
    ) -> ValidationOutcome
    where
        R: RefResolver + ?Sized,
    {
        match compare(repo, target, incoming) {
            Ok((head, parent)) if head == parent => {
                tracing::debug!(
                    target_ref = %target,
                    commit = %incoming.id,
                    head = %head,
                    "first parent is the branch head"
                );
                ValidationOutcome::accepted()
            }
            Ok((head, parent)) => {
                tracing::warn!(
                    target_ref = %target,
                    commit = %incoming.id,
                    head = %head,
                    parent = %parent,
                    reject = self.policy.reject_parent_not_head,
                    "first parent is not the branch head"
                );
                ValidationOutcome::stale_parent(
                    &head,
                    &parent,
                    self.policy.reject_parent_not_head,
                )
            }
            Err(err) => {
                tracing::warn!(
                    target_ref = %target,
                    commit = %incoming.id,
                    error = %err,
                    "parent check could not run"
                );
                ValidationOutcome::infrastructure(err)
            }
        }
    }

    /// Validate `incoming` against its own target ref.
    pub fn validate_incoming<R>(&self, repo: &R, incoming: &IncomingCommit) -> ValidationOutcome
    where
        R: RefResolver + ?Sized,
    {
        self.validate(repo, &incoming.target, incoming)
    }
}

/// Resolve the head, then the first parent, in that order.
fn compare<R>(
    repo: &R,
    target: &RefName,
    incoming: &IncomingCommit,
) -> Result<(CommitId, CommitId), CheckError>
where
    R: RefResolver + ?Sized,
{
    let head = repo.resolve_ref(target)?;
    let parent = incoming
        .first_parent()
        .cloned()
        .ok_or_else(|| CheckError::NoParent {
            commit: incoming.id.clone(),
            target: target.clone(),
        })?;
    Ok((head, parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::mock::MockRefs;
    use crate::gate::outcome::{Severity, Verdict};

    const MAIN: &str = "refs/heads/main";

    fn id(s: &str) -> CommitId {
        CommitId::new(s).unwrap()
    }

    fn main_ref() -> RefName {
        RefName::new(MAIN).unwrap()
    }

    fn commit(parents: &[&str]) -> IncomingCommit {
        IncomingCommit::new(
            id("fff999"),
            parents.iter().map(|p| id(p)).collect(),
            main_ref(),
        )
    }

    fn validator(reject: bool) -> ParentHeadValidator {
        ParentHeadValidator::new(Policy::new(reject))
    }

    #[test]
    fn matching_parent_is_accepted() {
        let refs = MockRefs::new().with_ref(MAIN, id("abc123"));
        let outcome = validator(false).validate(&refs, &main_ref(), &commit(&["abc123"]));

        assert_eq!(outcome.verdict(), Verdict::Accepted);
        assert!(outcome.diagnostics().is_empty());
    }

    #[test]
    fn matching_parent_is_accepted_under_reject_policy() {
        let refs = MockRefs::new().with_ref(MAIN, id("abc123"));
        let outcome = validator(true).validate(&refs, &main_ref(), &commit(&["abc123"]));

        assert_eq!(outcome.verdict(), Verdict::Accepted);
        assert!(outcome.diagnostics().is_empty());
    }

    #[test]
    fn stale_parent_warns_by_default() {
        let refs = MockRefs::new().with_ref(MAIN, id("abc123"));
        let outcome = validator(false).validate(&refs, &main_ref(), &commit(&["def456"]));

        assert_eq!(outcome.verdict(), Verdict::AcceptedWithWarning);
        assert_eq!(outcome.diagnostics().len(), 2);
        assert!(outcome.diagnostics()[0].text.contains("REBASE"));
        let detail = &outcome.diagnostics()[1].text;
        assert!(detail.contains("abc123"));
        assert!(detail.contains("def456"));
    }

    #[test]
    fn stale_parent_rejected_under_policy() {
        let refs = MockRefs::new().with_ref(MAIN, id("abc123"));
        let outcome = validator(true).validate(&refs, &main_ref(), &commit(&["def456"]));

        assert_eq!(outcome.verdict(), Verdict::Rejected);
        assert_eq!(outcome.diagnostics().len(), 2);
    }

    #[test]
    fn only_first_parent_is_compared() {
        let refs = MockRefs::new().with_ref(MAIN, id("abc123"));

        let merge_onto_head = commit(&["abc123", "def456"]);
        let outcome = validator(true).validate(&refs, &main_ref(), &merge_onto_head);
        assert_eq!(outcome.verdict(), Verdict::Accepted);

        let head_as_second_parent = commit(&["def456", "abc123"]);
        let outcome = validator(true).validate(&refs, &main_ref(), &head_as_second_parent);
        assert_eq!(outcome.verdict(), Verdict::Rejected);
    }

    #[test]
    fn missing_ref_is_infrastructure_warning() {
        let refs = MockRefs::new();
        let outcome = validator(true).validate(&refs, &main_ref(), &commit(&["abc123"]));

        assert_eq!(outcome.verdict(), Verdict::AcceptedWithWarning);
        assert_eq!(outcome.diagnostics().len(), 1);
        assert_eq!(outcome.diagnostics()[0].severity, Severity::Infrastructure);
        assert!(outcome.diagnostics()[0].text.contains("ref not found"));
    }

    #[test]
    fn repository_failure_never_rejects() {
        let refs = MockRefs::new().failing("disk on fire");
        let outcome = validator(true).validate(&refs, &main_ref(), &commit(&["abc123"]));

        assert_eq!(outcome.verdict(), Verdict::AcceptedWithWarning);
        assert_eq!(
            outcome.messages(),
            vec!["(W2) repository access error: disk on fire".to_string()]
        );
    }

    #[test]
    fn root_commit_is_infrastructure_warning() {
        let refs = MockRefs::new().with_ref(MAIN, id("abc123"));
        let outcome = validator(true).validate(&refs, &main_ref(), &commit(&[]));

        assert_eq!(outcome.verdict(), Verdict::AcceptedWithWarning);
        assert_eq!(outcome.diagnostics().len(), 1);
        assert_eq!(outcome.diagnostics()[0].severity, Severity::Infrastructure);
        assert!(outcome.diagnostics()[0].text.contains("has no parent"));
        assert!(outcome.diagnostics()[0].text.contains("fff999"));
    }

    #[test]
    fn ref_is_resolved_before_parent_is_inspected() {
        let refs = MockRefs::new();
        let outcome = validator(false).validate(&refs, &main_ref(), &commit(&[]));

        assert_eq!(refs.lookups(), 1);
        assert!(outcome.diagnostics()[0].text.contains("ref not found"));
    }

    #[test]
    fn validate_incoming_uses_commit_target() {
        let refs = MockRefs::new()
            .with_ref(MAIN, id("abc123"))
            .with_ref("refs/heads/dev", id("def456"));
        let mut incoming = commit(&["def456"]);
        incoming.target = RefName::new("refs/heads/dev").unwrap();

        let outcome = validator(true).validate_incoming(&refs, &incoming);
        assert_eq!(outcome.verdict(), Verdict::Accepted);
    }

    #[test]
    fn validation_is_idempotent() {
        let refs = MockRefs::new().with_ref(MAIN, id("abc123"));
        let v = validator(true);
        let incoming = commit(&["def456"]);

        let first = v.validate(&refs, &main_ref(), &incoming);
        let second = v.validate(&refs, &main_ref(), &incoming);
        assert_eq!(first, second);
    }

    #[test]
    fn validator_is_shareable_across_threads() {
        let refs = MockRefs::new().with_ref(MAIN, id("abc123"));
        let v = validator(true);

        let verdicts: Vec<Verdict> = std::thread::scope(|s| {
            let handles: Vec<_> = ["abc123", "def456", "abc123", "def456"]
                .into_iter()
                .map(|parent| {
                    let refs = &refs;
                    s.spawn(move || {
                        v.validate(refs, &main_ref(), &commit(&[parent]))
                            .verdict()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(
            verdicts,
            vec![
                Verdict::Accepted,
                Verdict::Rejected,
                Verdict::Accepted,
                Verdict::Rejected
            ]
        );
        assert_eq!(refs.lookups(), 4);
    }
}
