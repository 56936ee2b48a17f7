//! Storage abstraction for student records.
//!
//! [`StudentRepository`] is the only way the service layer touches storage.
//! Two implementations are provided:
//!
//! - [`PgStudentRepository`]: PostgreSQL via SQLx, used by the server
//! - [`InMemoryStudentRepository`]: process-local map, used by tests and demos

mod memory;
mod postgres;

pub use memory::InMemoryStudentRepository;
pub use postgres::PgStudentRepository;

use async_trait::async_trait;
use thiserror::Error;

use crate::modules::students::model::{Student, StudentDraft, StudentPage, StudentQuery};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Student not found with ID: {id}")]
    NotFound { id: i64 },

    #[error("a student with email {email} already exists")]
    DuplicateEmail { email: String },

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Student>>;

    /// Inserts when `draft.id` is `None`, otherwise replaces every field of
    /// the existing row. Updating an id that does not exist is `NotFound`.
    async fn save(&self, draft: StudentDraft) -> RepositoryResult<Student>;

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;

    /// Distinct course names in alphabetical order.
    async fn list_distinct_courses(&self) -> RepositoryResult<Vec<String>>;

    /// Filters, sorts, and pages students.
    async fn query(&self, query: &StudentQuery) -> RepositoryResult<StudentPage>;
}
