//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`CommitId`] - Opaque commit identifier (content hash)
//! - [`RefName`] - Validated Git reference name
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so the gate never has to reason about an empty
//! identifier or a ref name Git itself would refuse.
//!
//! # Examples
//!
//! ```
//! use parentgate::core::types::{CommitId, RefName};
//!
//! let head = CommitId::new("abc123").unwrap();
//! let refname = RefName::new("refs/heads/main").unwrap();
//! assert!(refname.is_branch_ref());
//!
//! assert!(CommitId::new("").is_err());
//! assert!(RefName::new("bad..name").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),
}

/// An opaque commit identifier.
///
/// The gate never interprets the identifier: it is compared byte for byte
/// and rendered in full. Case is preserved, so `ABC` and `abc` are
/// different commits as far as [`PartialEq`] is concerned.
///
/// The only structural rules are that the identifier is non-empty and
/// contains no whitespace (hook input is whitespace-separated).
///
/// # Example
///
/// ```
/// use parentgate::core::types::CommitId;
///
/// let a = CommitId::new("abc123").unwrap();
/// let b = CommitId::new("abc123").unwrap();
/// assert_eq!(a, b);
/// assert_ne!(a, CommitId::new("ABC123").unwrap());
///
/// assert!(CommitId::new("0000000000000000000000000000000000000000")
///     .unwrap()
///     .is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(String);

impl CommitId {
    /// Create a new commit identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitId` if the identifier is empty or
    /// contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        if id.is_empty() {
            return Err(TypeError::InvalidCommitId(
                "commit id cannot be empty".into(),
            ));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::InvalidCommitId(format!(
                "commit id cannot contain whitespace: {:?}",
                id
            )));
        }
        Ok(())
    }

    /// Check if this is Git's null id (all zeros).
    ///
    /// Receive hooks use the null id for "ref does not exist yet" (old side)
    /// and "ref is being deleted" (new side).
    pub fn is_null(&self) -> bool {
        self.0.chars().all(|c| c == '0')
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.0
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git reference name.
///
/// Reference names must conform to Git's refname rules (see
/// `git check-ref-format`). Both full names (`refs/heads/main`) and short
/// names (`main`) are representable; resolution of short names is left to
/// the repository layer.
///
/// # Example
///
/// ```
/// use parentgate::core::types::RefName;
///
/// let refname = RefName::new("refs/heads/feature/foo").unwrap();
/// assert!(refname.is_branch_ref());
/// assert!(RefName::new("main").is_ok());
///
/// assert!(!RefName::new("refs/tags/v1").unwrap().is_branch_ref());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(String);

/// Substrings Git never allows in a ref name.
const FORBIDDEN_IN_REFNAME: &[&str] = &[
    "..", "@{", "//", " ", "~", "^", ":", "\\", "?", "*", "[",
];

impl RefName {
    /// Create a new validated ref name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if Git would refuse the name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_refname(&name).map_err(|why| {
            TypeError::InvalidRefName(format!("{:?}: {}", name, why))
        })?;
        Ok(Self(name))
    }

    /// Whether the ref lives under `refs/heads/`.
    pub fn is_branch_ref(&self) -> bool {
        self.0.starts_with("refs/heads/")
    }

    /// Get the ref name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RefName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RefName> for String {
    fn from(name: RefName) -> Self {
        name.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the first rule `name` breaks.
fn check_refname(name: &str) -> Result<(), String> {
    if name.is_empty() || name == "@" {
        return Err("empty or reserved".to_string());
    }
    if name.starts_with('/') || name.ends_with('/') || name.ends_with('.') {
        return Err("bad leading or trailing character".to_string());
    }
    if let Some(bad) = FORBIDDEN_IN_REFNAME.iter().find(|bad| name.contains(**bad)) {
        return Err(format!("contains {:?}", bad));
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Err("contains a control character".to_string());
    }
    match name
        .split('/')
        .find(|part| part.starts_with('.') || part.ends_with(".lock"))
    {
        Some(part) => Err(format!("component {:?} is not allowed", part)),
        None => Ok(()),
    }
}
