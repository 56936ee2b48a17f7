//! Utility modules for the Rollbook API.
//!
//! - [`errors`]: Application error type shared with the workspace crates
//! - [`tracing`]: Span macros and span-recording helpers
pub mod errors;
pub mod tracing;
