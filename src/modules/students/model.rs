//! Student data models and DTOs.
//!
//! Re-exports the student models from the `rollbook-models` crate so the
//! module reads the same as the rest of the feature.

pub use rollbook_models::students::*;
