//! # Rollbook Core
//!
//! Core types, errors, and utilities for the Rollbook API.
//!
//! This crate provides foundational types used throughout the Rollbook application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page-based pagination parameters and metadata
//! - [`serde`]: Custom serde deserialization helpers for query strings and forms
//!
//! # Example
//!
//! ```ignore
//! use rollbook_core::errors::AppError;
//! use rollbook_core::pagination::{PageMeta, PageParams};
//!
//! // Create an error
//! let error = AppError::not_found(anyhow::anyhow!("Student not found"));
//!
//! // Use pagination
//! let params = PageParams::default();
//! let meta = PageMeta::new(params.page(), params.size(), 25);
//! assert_eq!(meta.total_pages, 3);
//! ```

pub mod errors;
pub mod pagination;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PageMeta, PageParams, PageRequestError};
