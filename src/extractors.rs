//! Request extractors with JSON error bodies.
//!
//! axum's built-in `Json`, `Path` and `Query` reject with plain-text bodies.
//! These wrappers turn the rejection into an [`AppError`] or a listing
//! [`StudentError`] so every failure the API returns has the same
//! `{"error": ...}` shape. Field rules are not checked
//! here; the student service validates forms so it can report every
//! violation at once.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::modules::students::error::StudentError;
use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct FormJson<T>(pub T);

impl<T, S> FromRequest<S> for FormJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    ));
                }

                let error_msg = rejection.body_text();
                if error_msg.contains("invalid type") || error_msg.contains("invalid digit") {
                    return AppError::bad_request(anyhow!("Invalid field type in request"));
                }

                AppError::bad_request(anyhow!("Invalid request body"))
            })?;

        Ok(FormJson(value))
    }
}

/// Numeric `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentId(pub i64);

impl<S> FromRequestParts<S> for StudentId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(anyhow!("Missing student id")))?;

        raw.parse::<i64>()
            .map(StudentId)
            .map_err(|_| AppError::bad_request(anyhow!("Invalid student id: {}", raw)))
    }
}

/// Listing query string. A value that does not parse fails the listing.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ListingQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = StudentError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                let detail = rejection.body_text();
                let reason = detail
                    .strip_prefix("Failed to deserialize query string: ")
                    .unwrap_or(detail.as_str());
                warn!(error = %reason, "Rejected listing query string");
                StudentError::Listing(format!("Error loading students: {}", reason))
            })?;

        Ok(ListingQuery(value))
    }
}
