//! Shared plumbing for the recurrence adapter crates: errors, configuration,
//! constants and tracing setup.

pub mod config;
pub mod constants;
pub mod error;
pub mod tracing;
