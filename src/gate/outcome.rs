//! gate::outcome
//!
//! The result of one validation call.
//!
//! An outcome is a [`Verdict`] plus an ordered list of [`Diagnostic`]s. Each
//! diagnostic carries a [`Severity`] that decides its rendered prefix:
//!
//! | Severity         | Rendered as    |
//! |------------------|----------------|
//! | `Warning`        | `(W) <text>`   |
//! | `Infrastructure` | `(W2) <text>`  |
//!
//! Pushing clients see the rendered form verbatim, so the prefixes are part
//! of the user-visible contract.

use serde::Serialize;

use crate::core::types::CommitId;

/// First line of a stale-parent report.
pub const REBASE_INSTRUCTION: &str = "!!! PLEASE UPDATE REPO AND REBASE YOUR COMMIT !!!";

/// Three-way decision for a pushed commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// First parent matches the branch head.
    Accepted,
    /// Push may proceed; diagnostics are advisory.
    AcceptedWithWarning,
    /// Push must be blocked.
    Rejected,
}

impl Verdict {
    /// Whether the push may proceed.
    pub fn allows_push(self) -> bool {
        !matches!(self, Verdict::Rejected)
    }

    /// Human-readable name.
    pub fn description(self) -> &'static str {
        match self {
            Verdict::Accepted => "accepted",
            Verdict::AcceptedWithWarning => "accepted with warning",
            Verdict::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Severity tag of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The pushed commit is built on a stale head.
    Warning,
    /// The check itself could not run (missing ref, I/O, malformed input).
    Infrastructure,
}

impl Severity {
    /// Prefix used when rendering a diagnostic for the pushing client.
    pub fn prefix(self) -> &'static str {
        match self {
            Severity::Warning => "(W)",
            Severity::Infrastructure => "(W2)",
        }
    }
}

/// One diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub text: String,
}

impl Diagnostic {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }

    pub fn infrastructure(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Infrastructure,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.severity.prefix(), self.text)
    }
}

/// Result of one validation call.
///
/// Always produced, even when the check could not run; in that case the
/// verdict is [`Verdict::AcceptedWithWarning`] and the single diagnostic
/// explains why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    verdict: Verdict,
    diagnostics: Vec<Diagnostic>,
}

impl ValidationOutcome {
    /// First parent matches the head. No diagnostics.
    pub fn accepted() -> Self {
        Self {
            verdict: Verdict::Accepted,
            diagnostics: Vec::new(),
        }
    }

    /// The check could not run. Never a rejection: a failed lookup says
    /// nothing about whether the parent is stale.
    pub fn infrastructure(cause: impl std::fmt::Display) -> Self {
        Self {
            verdict: Verdict::AcceptedWithWarning,
            diagnostics: vec![Diagnostic::infrastructure(cause.to_string())],
        }
    }

    /// First parent differs from the head.
    pub fn stale_parent(head: &CommitId, parent: &CommitId, reject: bool) -> Self {
        let verdict = if reject {
            Verdict::Rejected
        } else {
            Verdict::AcceptedWithWarning
        };

        Self {
            verdict,
            diagnostics: vec![
                Diagnostic::warning(REBASE_INSTRUCTION),
                Diagnostic::warning(format!(
                    "Server-side HEAD-Id ({}) != Parent-Id for this commit ({})",
                    head, parent
                )),
            ],
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Diagnostics rendered the way the pushing client sees them.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }
}
