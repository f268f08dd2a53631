//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All user-facing text goes through this module. Inside a receive hook,
//! stderr is relayed to the pushing client, so diagnostics are written
//! there and always shown; other chatter respects the quiet flag.

pub mod output;
