//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads flow
//! through this interface. No other module should import `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening (bare and hook environments included)
//! - Ref resolution (the validator's `ResolveRef`)
//! - Commit inspection (parent lists)
//! - Git config lookups
//!
//! # Invariants
//!
//! - Read-only: nothing here writes refs or objects
//! - All operations return strong types (CommitId, RefName)
//!
//! # Example
//!
//! ```ignore
//! use parentgate::git::Git;
//!
//! let git = Git::open_from_env()?;
//! let tip = git.resolve_ref("refs/heads/main")?;
//! ```

mod interface;

pub use interface::{Git, GitError};
