//! parent-gate - server-side check that pushed commits build on the branch head
//!
//! When a commit is pushed to a branch, its first parent should be the
//! commit the branch currently points at. If it is not, the pusher built
//! on a stale view of the branch. parent-gate detects that and, depending
//! on policy, warns or blocks the push.
//!
//! # Architecture
//!
//! - [`gate`] - The validator, its verdicts and diagnostics (no I/O)
//! - [`git`] - Single interface for all Git operations
//! - [`hook`] - Pre-receive / update hook adapter around the validator
//! - [`core`] - Domain types and configuration
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - Output formatting
//!
//! # Guarantees
//!
//! 1. A push is only blocked when the policy is enabled and the parent
//!    check actually ran and found a mismatch
//! 2. A failed lookup never blocks a push; it is reported as a warning
//! 3. Every outcome carries the diagnostics that explain it

pub mod cli;
pub mod core;
pub mod gate;
pub mod git;
pub mod hook;
pub mod ui;
