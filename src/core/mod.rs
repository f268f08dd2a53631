//! core
//!
//! Core domain types and configuration for parent-gate.
//!
//! # Modules
//!
//! - [`types`] - Strong types: CommitId, RefName
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Configuration is read once and never mutated afterwards

pub mod config;
pub mod types;
