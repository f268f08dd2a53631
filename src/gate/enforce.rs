//! gate::enforce
//!
//! Policy layer above the validator.
//!
//! The validator only reports. This layer turns a `Rejected` outcome into a
//! push-blocking error that still carries every diagnostic, in order, so
//! the pushing client sees the exact cause.

use thiserror::Error;

use super::outcome::{Diagnostic, ValidationOutcome, Verdict};

/// A push blocked by the parent check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Commit parent validation failed")]
pub struct PushRejected {
    /// Every diagnostic collected for the rejected commit, in order
    pub diagnostics: Vec<Diagnostic>,
}

impl PushRejected {
    /// Diagnostics rendered the way the pushing client sees them.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }
}

/// Translate an outcome into push success or failure.
///
/// `Accepted` and `AcceptedWithWarning` yield the advisory diagnostics
/// (empty for `Accepted`); `Rejected` yields [`PushRejected`].
pub fn enforce(outcome: ValidationOutcome) -> Result<Vec<Diagnostic>, PushRejected> {
    match outcome.verdict() {
        Verdict::Rejected => Err(PushRejected {
            diagnostics: outcome.into_diagnostics(),
        }),
        Verdict::Accepted | Verdict::AcceptedWithWarning => Ok(outcome.into_diagnostics()),
    }
}
