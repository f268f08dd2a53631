//! gate::traits
//!
//! Seam between the validator and the repository.
//!
//! The validator only ever asks one question of a repository: what does
//! this ref point at right now? [`RefResolver`] is that question.
//! [`CommitSource`] is the other collaborator of a push pipeline: it turns a
//! pushed id into an [`IncomingCommit`] before the validator runs.
//!
//! The production implementation of both is [`crate::git::Git`]; tests use
//! [`super::mock::MockRefs`].

use super::validator::IncomingCommit;
use crate::core::types::{CommitId, RefName};
use crate::git::GitError;

/// Resolve a ref name to the commit it currently points at.
///
/// Implementations must be read-only. Any failure (missing ref, I/O error,
/// corrupt repository, timeout enforced below this layer) is reported as a
/// [`GitError`] and becomes an infrastructure diagnostic upstream.
pub trait RefResolver {
    fn resolve_ref(&self, refname: &RefName) -> Result<CommitId, GitError>;
}

impl<T: RefResolver + ?Sized> RefResolver for &T {
    fn resolve_ref(&self, refname: &RefName) -> Result<CommitId, GitError> {
        (**self).resolve_ref(refname)
    }
}

/// Materialize a pushed commit (its id and ordered parents).
pub trait CommitSource {
    fn incoming_commit(&self, id: &CommitId, target: &RefName)
        -> Result<IncomingCommit, GitError>;
}

impl<T: CommitSource + ?Sized> CommitSource for &T {
    fn incoming_commit(
        &self,
        id: &CommitId,
        target: &RefName,
    ) -> Result<IncomingCommit, GitError> {
        (**self).incoming_commit(id, target)
    }
}
