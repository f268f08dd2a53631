//! hook::update
//!
//! Ref-update commands as Git hands them to receive hooks.
//!
//! `pre-receive` reads one command per stdin line:
//!
//! ```text
//! <old-id> SP <new-id> SP <refname> LF
//! ```
//!
//! `update` receives the same three values as arguments, in the order
//! `<refname> <old-id> <new-id>`.

use std::io::BufRead;

use super::HookError;
use crate::core::types::{CommitId, RefName};

/// One ref update of a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    /// Tip before the push (null id for a new ref)
    pub old: CommitId,
    /// Tip requested by the push (null id for a deletion)
    pub new: CommitId,
    /// The ref being updated
    pub refname: RefName,
}

impl RefUpdate {
    pub fn new(old: CommitId, new: CommitId, refname: RefName) -> Self {
        Self { old, new, refname }
    }

    /// Parse the arguments of an `update` hook.
    pub fn from_args(refname: &str, old: &str, new: &str) -> Result<Self, HookError> {
        let line = format!("{} {} {}", old, new, refname);
        Ok(Self {
            old: CommitId::new(old).map_err(|e| HookError::malformed(&line, e))?,
            new: CommitId::new(new).map_err(|e| HookError::malformed(&line, e))?,
            refname: RefName::new(refname).map_err(|e| HookError::malformed(&line, e))?,
        })
    }

    /// Parse one `pre-receive` line.
    ///
    /// # Example
    ///
    /// ```
    /// use parentgate::hook::RefUpdate;
    ///
    /// let update = RefUpdate::parse("abc123 def456 refs/heads/main").unwrap();
    /// assert_eq!(update.refname.as_str(), "refs/heads/main");
    /// assert!(RefUpdate::parse("abc123 refs/heads/main").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self, HookError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [old, new, refname] => Self::from_args(refname, old, new),
            _ => Err(HookError::MalformedLine {
                line: line.to_string(),
                message: format!("expected 3 fields, found {}", fields.len()),
            }),
        }
    }

    /// The push deletes the ref.
    pub fn is_delete(&self) -> bool {
        self.new.is_null()
    }

    /// The push creates the ref.
    pub fn is_create(&self) -> bool {
        self.old.is_null()
    }
}

impl std::fmt::Display for RefUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.old, self.new, self.refname)
    }
}

/// Read every non-blank `pre-receive` line from `reader`.
pub fn parse_updates<R: BufRead>(reader: R) -> Result<Vec<RefUpdate>, HookError> {
    let mut updates = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        updates.push(RefUpdate::parse(&line)?);
    }
    Ok(updates)
}
