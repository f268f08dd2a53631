//! gate
//!
//! The commit-acceptance gate.
//!
//! # Architecture
//!
//! ```text
//! RefResolver ──► ParentHeadValidator ──► ValidationOutcome ──► enforce
//!  (git, mock)      (policy fixed)        (verdict + diags)     (Ok | PushRejected)
//! ```
//!
//! - [`validator`] - the parent/head comparison
//! - [`outcome`] - verdicts and diagnostics
//! - [`enforce`] - turns a rejection into a push-blocking error
//! - [`traits`] - the repository seams (ref resolution, commit inspection)
//! - [`mock`] - in-memory resolver for tests
//!
//! # Invariants
//!
//! - Validation is read-only and never fails; errors become diagnostics
//! - Only a stale first parent under a rejecting policy blocks a push
//! - The same inputs against the same repository state give the same outcome
//!
//! # Example
//!
//! ```
//! use parentgate::core::types::{CommitId, RefName};
//! use parentgate::gate::mock::MockRefs;
//! use parentgate::gate::{enforce, IncomingCommit, ParentHeadValidator, Policy, Verdict};
//!
//! let head = CommitId::new("abc123").unwrap();
//! let refs = MockRefs::new().with_ref("refs/heads/main", head);
//! let main = RefName::new("refs/heads/main").unwrap();
//! let incoming = IncomingCommit::new(
//!     CommitId::new("fff999").unwrap(),
//!     vec![CommitId::new("def456").unwrap()],
//!     main.clone(),
//! );
//!
//! let validator = ParentHeadValidator::new(Policy::new(true));
//! let outcome = validator.validate(&refs, &main, &incoming);
//! assert_eq!(outcome.verdict(), Verdict::Rejected);
//!
//! let rejected = enforce(outcome).unwrap_err();
//! assert_eq!(rejected.diagnostics.len(), 2);
//! ```

pub mod enforce;
pub mod mock;
pub mod outcome;
pub mod traits;
pub mod validator;

pub use enforce::{enforce, PushRejected};
pub use outcome::{Diagnostic, Severity, ValidationOutcome, Verdict, REBASE_INSTRUCTION};
pub use traits::{CommitSource, RefResolver};
pub use validator::{CheckError, IncomingCommit, ParentHeadValidator, Policy};
