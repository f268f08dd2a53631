//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! parent-gate. All repository reads flow through this interface, which
//! returns strong types and normalizes errors into typed failure categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::ObjectNotFound`]: Requested object does not exist
//! - [`GitError::NotACommit`]: Object exists but is not a commit
//! - [`GitError::AccessError`]: Locked or unreadable repository
//!
//! The validator never sees a raw `git2::Error`; whatever reaches it is
//! one of these variants, rendered into an infrastructure diagnostic.
//!
//! # Example
//!
//! ```ignore
//! use parentgate::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("/srv/git/project.git"))?;
//! let tip = git.resolve_ref("refs/heads/main")?;
//! println!("main is at {}", tip);
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{CommitId, RefName, TypeError};
use crate::gate::{CommitSource, IncomingCommit, RefResolver};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The id or revision that was not found
        oid: String,
    },

    /// Object exists but does not peel to a commit.
    #[error("not a commit: {oid}")]
    NotACommit {
        /// The id or ref that was inspected
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid id string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Classify a git2 error raised while looking up a ref.
    fn for_ref(err: git2::Error, refname: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RefNotFound {
                refname: refname.to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidRefName {
                message: format!("{}: {}", refname, err.message()),
            },
            _ => Self::other(err, refname),
        }
    }

    /// Classify a git2 error raised while looking up an object.
    fn for_object(err: git2::Error, oid: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: oid.to_string(),
            },
            git2::ErrorCode::InvalidSpec | git2::ErrorCode::Ambiguous => GitError::InvalidOid {
                oid: oid.to_string(),
            },
            _ => Self::other(err, oid),
        }
    }

    fn other(err: git2::Error, context: &str) -> Self {
        match (err.code(), err.class()) {
            (git2::ErrorCode::Locked, _) => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            (_, git2::ErrorClass::Os) | (_, git2::ErrorClass::Filesystem) => {
                GitError::AccessError {
                    message: format!("{}: {}", context, err.message()),
                }
            }
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidCommitId(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg) => GitError::InvalidRefName { message: msg },
        }
    }
}

/// The Git interface.
///
/// Read-only: the gate inspects refs and commits, it never writes. Bare
/// repositories are accepted since that is what a server hosts.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within a work tree, or the bare repository directory itself.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    /// Open the repository described by the Git environment.
    ///
    /// Inside a receive hook Git exports `GIT_DIR`, and while the push is
    /// still pending it also points `GIT_OBJECT_DIRECTORY` at the quarantine
    /// with the real object store as an alternate. Opening through the
    /// environment is the only way to see the pushed commits at that point.
    pub fn open_from_env() -> Result<Self, GitError> {
        let repo = git2::Repository::open_from_env().map_err(|_| GitError::NotARepo {
            path: std::env::var_os("GIT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        })?;

        Ok(Self { repo })
    }

    /// Path to the git directory (the repository itself when bare).
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    // =========================================================================
    // Ref Resolution
    // =========================================================================

    /// Resolve a ref to the commit it points at.
    ///
    /// Full names (`refs/...`) are looked up as given. Anything else goes
    /// through Git's short-name rules, so `main` finds `refs/heads/main` and
    /// `HEAD` finds `HEAD`. Symbolic refs and annotated tags are peeled to
    /// the commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the ref doesn't exist
    /// - [`GitError::NotACommit`] if the ref doesn't peel to a commit
    pub fn resolve_ref(&self, refname: &str) -> Result<CommitId, GitError> {
        let reference = if refname.starts_with("refs/") {
            self.repo
                .find_reference(refname)
                .map_err(|e| GitError::for_ref(e, refname))?
        } else {
            // libgit2 answers InvalidSpec for a one-level name it could not
            // expand; for a short name that means "no such ref".
            self.repo
                .resolve_reference_from_short_name(refname)
                .map_err(|e| match e.code() {
                    git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec => {
                        GitError::RefNotFound {
                            refname: refname.to_string(),
                        }
                    }
                    _ => GitError::other(e, refname),
                })?
        };

        let commit = reference.peel_to_commit().map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::RefNotFound {
                refname: refname.to_string(),
            },
            git2::ErrorCode::Peel | git2::ErrorCode::InvalidSpec => GitError::NotACommit {
                oid: refname.to_string(),
            },
            _ => GitError::other(e, refname),
        })?;

        Ok(CommitId::new(commit.id().to_string())?)
    }

    /// Resolve a revision expression (`HEAD~1`, an id, a branch) to a commit.
    pub fn resolve_commit(&self, rev: &str) -> Result<CommitId, GitError> {
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|e| GitError::for_object(e, rev))?;

        let commit = object.peel_to_commit().map_err(|_| GitError::NotACommit {
            oid: rev.to_string(),
        })?;

        Ok(CommitId::new(commit.id().to_string())?)
    }

    // =========================================================================
    // Commit Information
    // =========================================================================

    /// Get the parent ids of a commit, in commit order.
    ///
    /// Returns an empty vec for root commits.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidOid`] if `id` is not a hex object id
    /// - [`GitError::ObjectNotFound`] if the commit doesn't exist
    pub fn commit_parents(&self, id: &CommitId) -> Result<Vec<CommitId>, GitError> {
        let git_oid = git2::Oid::from_str(id.as_str()).map_err(|_| GitError::InvalidOid {
            oid: id.to_string(),
        })?;

        let commit = self.repo.find_commit(git_oid).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: id.to_string(),
            },
            _ => GitError::NotACommit {
                oid: id.to_string(),
            },
        })?;

        commit
            .parent_ids()
            .map(|p| CommitId::new(p.to_string()).map_err(GitError::from))
            .collect()
    }

    /// Materialize a pushed commit for validation against `target`.
    pub fn incoming_commit(
        &self,
        id: &CommitId,
        target: &RefName,
    ) -> Result<IncomingCommit, GitError> {
        let parents = self.commit_parents(id)?;
        Ok(IncomingCommit::new(id.clone(), parents, target.clone()))
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Read a boolean from the repository's Git config.
    ///
    /// All config levels apply (system, global, repository). Returns
    /// `None` if the key is not set.
    pub fn config_bool(&self, key: &str) -> Result<Option<bool>, GitError> {
        let config = self
            .repo
            .config()
            .map_err(|e| GitError::other(e, "config"))?;

        match config.get_bool(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Internal {
                message: format!("{}: {}", key, e.message()),
            }),
        }
    }
}

impl RefResolver for Git {
    fn resolve_ref(&self, refname: &RefName) -> Result<CommitId, GitError> {
        Git::resolve_ref(self, refname.as_str())
    }
}

impl CommitSource for Git {
    fn incoming_commit(
        &self,
        id: &CommitId,
        target: &RefName,
    ) -> Result<IncomingCommit, GitError> {
        Git::incoming_commit(self, id, target)
    }
}
