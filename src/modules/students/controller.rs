use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::extractors::{FormJson, ListingQuery, StudentId};
use crate::modules::students::error::StudentError;
use crate::modules::students::model::{
    FieldViolation, ListStudentsParams, MessageResponse, Student, StudentConfirmation,
    StudentForm, StudentListing,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body returned when a submitted form breaks field rules.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub violations: Vec<FieldViolation>,
    /// The form as submitted, for re-display
    pub student: StudentForm,
    /// Path id on update, null on create
    pub id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(ListStudentsParams),
    responses(
        (status = 200, description = "One page of students with the course list", body = StudentListing),
        (status = 500, description = "Listing could not be loaded", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
    ListingQuery(params): ListingQuery<ListStudentsParams>,
) -> Result<Json<StudentListing>, StudentError> {
    let listing = StudentService::list_students(state.students.as_ref(), &params).await?;
    Ok(Json(listing))
}

#[utoipa::path(
    get,
    path = "/api/students/new",
    responses(
        (status = 200, description = "Blank student form", body = StudentForm)
    ),
    tag = "Students"
)]
pub async fn new_student_form() -> Json<StudentForm> {
    Json(StudentService::new_student_form())
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentForm,
    responses(
        (status = 201, description = "Student added", body = StudentConfirmation),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, form))]
pub async fn create_student(
    State(state): State<AppState>,
    FormJson(form): FormJson<StudentForm>,
) -> Result<(StatusCode, Json<StudentConfirmation>), StudentError> {
    let confirmation = StudentService::create_student(state.students.as_ref(), form).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 400, description = "Invalid student id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    StudentId(id): StudentId,
) -> Result<Json<Student>, StudentError> {
    let student = StudentService::get_student_for_edit(state.students.as_ref(), id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    request_body = StudentForm,
    responses(
        (status = 200, description = "Student updated", body = StudentConfirmation),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, form))]
pub async fn update_student(
    State(state): State<AppState>,
    StudentId(id): StudentId,
    FormJson(form): FormJson<StudentForm>,
) -> Result<Json<StudentConfirmation>, StudentError> {
    let confirmation = StudentService::update_student(state.students.as_ref(), id, form).await?;
    Ok(Json(confirmation))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 400, description = "Invalid student id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    StudentId(id): StudentId,
) -> Result<Json<MessageResponse>, StudentError> {
    let response = StudentService::delete_student(state.students.as_ref(), id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/students/courses",
    responses(
        (status = 200, description = "Distinct course names in alphabetical order", body = Vec<String>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, StudentError> {
    let courses = StudentService::list_courses(state.students.as_ref()).await?;
    Ok(Json(courses))
}
