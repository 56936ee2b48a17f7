//! # Rollbook Models
//!
//! Domain models and DTOs for the Rollbook API.
//!
//! This crate provides the data structures used throughout the Rollbook
//! application, including the database entity, request/response DTOs,
//! the validation rules, and the listing query specification.
//!
//! # Modules
//!
//! - [`students`]: Student entity, form validation, and listing query types
//!
//! # Example
//!
//! ```ignore
//! use rollbook_models::students::{StudentForm, StudentQuery, SortField};
//!
//! let form = StudentForm::new("Ann", 20, "Math");
//! let draft = form.into_draft().expect("valid student");
//!
//! let query = StudentQuery::default()
//!     .with_name("ann")
//!     .sorted_by(SortField::Age);
//! ```

pub mod students;

// Re-export commonly used types at crate root for convenience
pub use students::{
    FieldViolation, ListStudentsParams, ListingParamsError, MessageResponse, SortField, Student,
    StudentConfirmation, StudentDraft, StudentForm, StudentListing, StudentPage, StudentQuery,
    UnknownSortField,
};
