//! core::config::schema
//!
//! Configuration schema types.
//!
//! Both the global file and the repository file share one schema. The
//! repository file wins wherever it sets a value.
//!
//! # Example
//!
//! ```toml
//! [commitcheck]
//! reject_parent_not_head = true
//! ```

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Dotted key of the only setting.
pub const REJECT_PARENT_NOT_HEAD_KEY: &str = "commitcheck.reject_parent_not_head";

/// Every known dotted key.
pub const KEYS: &[&str] = &[REJECT_PARENT_NOT_HEAD_KEY];

/// Parse a boolean the way Git config does.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::UnknownKey(format!("{} (known keys: {})", key, KEYS.join(", ")))
}

/// A parent-gate configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Commit check settings
    pub commitcheck: Option<CommitCheckConfig>,
}

impl GateConfig {
    /// Get a value by dotted key. `None` if the key is known but unset.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match key {
            REJECT_PARENT_NOT_HEAD_KEY => {
                Ok(self.reject_parent_not_head().map(|v| v.to_string()))
            }
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a value by dotted key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            REJECT_PARENT_NOT_HEAD_KEY => {
                let parsed = parse_bool(value).ok_or_else(|| {
                    ConfigError::InvalidValue(format!(
                        "{} expects a boolean, got '{}'",
                        key, value
                    ))
                })?;
                self.commitcheck
                    .get_or_insert_with(CommitCheckConfig::default)
                    .reject_parent_not_head = Some(parsed);
                Ok(())
            }
            _ => Err(unknown_key(key)),
        }
    }

    /// The `reject_parent_not_head` value, if this file sets it.
    pub fn reject_parent_not_head(&self) -> Option<bool> {
        self.commitcheck
            .as_ref()
            .and_then(|c| c.reject_parent_not_head)
    }
}

/// The `[commitcheck]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CommitCheckConfig {
    /// Reject pushes whose first parent is not the current branch head
    pub reject_parent_not_head: Option<bool>,
}
