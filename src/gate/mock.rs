//! gate::mock
//!
//! In-memory repository for tests: refs plus commit parent lists.
//!
//! # Example
//!
//! ```
//! use parentgate::core::types::{CommitId, RefName};
//! use parentgate::gate::mock::MockRefs;
//! use parentgate::gate::RefResolver;
//!
//! let tip = CommitId::new("abc123").unwrap();
//! let refs = MockRefs::new().with_ref("refs/heads/main", tip.clone());
//! let main = RefName::new("refs/heads/main").unwrap();
//! assert_eq!(refs.resolve_ref(&main).unwrap(), tip);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::traits::{CommitSource, RefResolver};
use super::validator::IncomingCommit;
use crate::core::types::{CommitId, RefName};
use crate::git::GitError;

/// A fixed set of refs and commits, optionally failing every ref lookup.
#[derive(Debug, Default)]
pub struct MockRefs {
    refs: HashMap<String, CommitId>,
    commits: HashMap<CommitId, Vec<CommitId>>,
    failure: Option<String>,
    lookups: AtomicUsize,
}

impl MockRefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ref pointing at `id`.
    pub fn with_ref(mut self, refname: &str, id: CommitId) -> Self {
        self.refs.insert(refname.to_string(), id);
        self
    }

    /// Add a commit with the given parents, in order.
    pub fn with_commit(mut self, id: CommitId, parents: Vec<CommitId>) -> Self {
        self.commits.insert(id, parents);
        self
    }

    /// Make every ref lookup fail with an access error carrying `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Number of lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl RefResolver for MockRefs {
    fn resolve_ref(&self, refname: &RefName) -> Result<CommitId, GitError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(GitError::AccessError {
                message: message.clone(),
            });
        }

        self.refs
            .get(refname.as_str())
            .cloned()
            .ok_or_else(|| GitError::RefNotFound {
                refname: refname.to_string(),
            })
    }
}

impl CommitSource for MockRefs {
    fn incoming_commit(
        &self,
        id: &CommitId,
        target: &RefName,
    ) -> Result<IncomingCommit, GitError> {
        let parents = self
            .commits
            .get(id)
            .cloned()
            .ok_or_else(|| GitError::ObjectNotFound {
                oid: id.to_string(),
            })?;
        Ok(IncomingCommit::new(id.clone(), parents, target.clone()))
    }
}
