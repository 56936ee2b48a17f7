//! Fake data seeding for the `students` table.
//!
//! - [`models`]: Seed configuration
//! - [`students`]: Generation and batch insertion

pub mod models;
pub mod students;

pub use models::{DEFAULT_COURSES, SeedConfig};
pub use students::{clear_students, generate_students, insert_students_batch, seed_students};
