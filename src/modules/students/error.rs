use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::modules::students::model::{FieldViolation, StudentForm};

/// Failure outcome of a student operation.
///
/// Every message is a single line suitable for showing to the user.
#[derive(Debug, Error)]
pub enum StudentError {
    /// The submitted form broke one or more rules; nothing was persisted.
    #[error("Validation failed: {}", join_violations(.violations))]
    Invalid {
        /// Path id for updates, `None` for creates.
        id: Option<i64>,
        form: Box<StudentForm>,
        violations: Vec<FieldViolation>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Listing(String),

    #[error("{0}")]
    Failed(String),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl StudentError {
    pub fn status(&self) -> StatusCode {
        match self {
            StudentError::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            StudentError::NotFound(_) => StatusCode::NOT_FOUND,
            StudentError::Conflict(_) => StatusCode::CONFLICT,
            StudentError::Listing(_) | StudentError::Failed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for StudentError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = match self {
            StudentError::Invalid {
                id,
                form,
                violations,
            } => json!({
                "error": message,
                "violations": violations,
                "student": form,
                "id": id,
            }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}
