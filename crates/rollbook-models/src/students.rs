//! Student domain models and DTOs.
//!
//! This module contains all data structures related to student management:
//! the persisted entity, the submitted form with its validation rules, the
//! validated draft handed to storage, and the listing query specification.
//!
//! # Lifecycle
//!
//! ```text
//! StudentForm ──into_draft()──▶ StudentDraft ──save()──▶ Student
//!  (unvalidated)                 (validated)              (persisted)
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rollbook_core::pagination::{PageMeta, PageParams, PageRequestError};
use rollbook_core::serde::{
    deserialize_blank_as_none, deserialize_lenient_i32, deserialize_null_as_empty,
    deserialize_optional_i64,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

/// Order in which violations are reported, matching the form layout.
const FIELD_ORDER: [&str; 5] = ["name", "age", "course", "email", "phone"];

/// A student in the system.
///
/// This struct represents the row stored in the `students` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub course: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submitted student data, before validation.
///
/// Every field is lenient so that a partially filled submission still binds
/// and can be answered with field-level violations instead of a parse error.
/// Blank `email` and `phone` values bind as absent; a null `name` or
/// `course` binds as blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(default)]
pub struct StudentForm {
    /// Ignored on create; replaced by the path id on update.
    pub id: Option<i64>,
    #[serde(deserialize_with = "deserialize_null_as_empty")]
    #[validate(
        custom(function = "validate_name_present"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    pub name: String,
    #[serde(deserialize_with = "deserialize_lenient_i32")]
    #[validate(
        required(message = "Age is required"),
        custom(function = "validate_age")
    )]
    pub age: Option<i32>,
    #[serde(deserialize_with = "deserialize_null_as_empty")]
    #[validate(
        custom(function = "validate_course_present"),
        length(min = 2, max = 100, message = "Course must be between 2 and 100 characters")
    )]
    pub course: String,
    #[serde(deserialize_with = "deserialize_blank_as_none")]
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
    #[serde(deserialize_with = "deserialize_blank_as_none")]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

fn validate_name_present(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("Name is required")));
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), ValidationError> {
    if age < 16 {
        return Err(ValidationError::new("min")
            .with_message(Cow::Borrowed("Age must be at least 16")));
    }
    if age > 100 {
        return Err(ValidationError::new("max")
            .with_message(Cow::Borrowed("Age must not exceed 100")));
    }
    Ok(())
}

fn validate_course_present(course: &str) -> Result<(), ValidationError> {
    if course.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message(Cow::Borrowed("Course is required"))
        );
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(());
    }
    Err(ValidationError::new("phone")
        .with_message(Cow::Borrowed("Phone number must be 10 digits")))
}

/// A single failed rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    /// Flattens `validator` errors into a list ordered by form layout.
    pub fn from_errors(errors: &ValidationErrors) -> Vec<Self> {
        let mut violations: Vec<Self> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| Self {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();

        violations.sort_by_key(|v| {
            FIELD_ORDER
                .iter()
                .position(|f| *f == v.field)
                .unwrap_or(FIELD_ORDER.len())
        });
        violations
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl StudentForm {
    pub fn new(name: impl Into<String>, age: i32, course: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: Some(age),
            course: course.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Maps blank optional contact fields to `None`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.email = self.email.filter(|e| !e.trim().is_empty());
        self.phone = self.phone.filter(|p| !p.trim().is_empty());
        self
    }

    /// Runs every rule and returns all violations; empty when valid.
    pub fn validate_fields(&self) -> Vec<FieldViolation> {
        match self.clone().normalized().validate() {
            Ok(()) => Vec::new(),
            Err(errors) => FieldViolation::from_errors(&errors),
        }
    }

    /// Validates the form and converts it into a draft ready for storage.
    pub fn into_draft(self) -> Result<StudentDraft, Vec<FieldViolation>> {
        let form = self.normalized();
        if let Err(errors) = form.validate() {
            return Err(FieldViolation::from_errors(&errors));
        }

        let Some(age) = form.age else {
            return Err(vec![FieldViolation {
                field: "age".to_string(),
                message: "Age is required".to_string(),
            }]);
        };

        Ok(StudentDraft {
            id: form.id,
            name: form.name,
            age,
            course: form.course,
            email: form.email,
            phone: form.phone,
        })
    }
}

impl From<&Student> for StudentForm {
    fn from(student: &Student) -> Self {
        Self {
            id: Some(student.id),
            name: student.name.clone(),
            age: Some(student.age),
            course: student.course.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
        }
    }
}

/// A validated student, ready to be inserted (no id) or updated (with id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
    pub course: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Columns a listing may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    #[default]
    Name,
    Age,
    Course,
    Email,
    Phone,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::Name,
        SortField::Age,
        SortField::Course,
        SortField::Email,
        SortField::Phone,
    ];

    /// Column name in the `students` table.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Age => "age",
            SortField::Course => "course",
            SortField::Email => "email",
            SortField::Phone => "phone",
        }
    }

    /// Ascending comparison on this field. Absent values sort last and ties
    /// fall back to the id so page boundaries are deterministic.
    pub fn compare(self, a: &Student, b: &Student) -> Ordering {
        let primary = match self {
            SortField::Id => Ordering::Equal,
            SortField::Name => a.name.cmp(&b.name),
            SortField::Age => a.age.cmp(&b.age),
            SortField::Course => a.course.cmp(&b.course),
            SortField::Email => nulls_last(a.email.as_deref(), b.email.as_deref()),
            SortField::Phone => nulls_last(a.phone.as_deref(), b.phone.as_deref()),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

fn nulls_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Returned when a sort parameter names no student property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortField(pub String);

impl fmt::Display for UnknownSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No property '{}' found for type 'Student'", self.0)
    }
}

impl std::error::Error for UnknownSortField {}

/// Listing parameters that cannot be turned into a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingParamsError {
    Page(PageRequestError),
    Sort(UnknownSortField),
}

impl fmt::Display for ListingParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingParamsError::Page(e) => e.fmt(f),
            ListingParamsError::Sort(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ListingParamsError {}

impl From<PageRequestError> for ListingParamsError {
    fn from(err: PageRequestError) -> Self {
        ListingParamsError::Page(err)
    }
}

impl From<UnknownSortField> for ListingParamsError {
    fn from(err: UnknownSortField) -> Self {
        ListingParamsError::Sort(err)
    }
}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.column() == s)
            .ok_or_else(|| UnknownSortField(s.to_string()))
    }
}

/// Specification for one listing read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentQuery {
    /// Case-insensitive substring of `name`.
    pub name: Option<String>,
    /// Exact value of `course`.
    pub course: Option<String>,
    pub sort: SortField,
    /// 0-indexed page.
    pub page: i64,
    pub size: i64,
}

impl Default for StudentQuery {
    fn default() -> Self {
        let pagination = PageParams::default();
        Self {
            name: None,
            course: None,
            sort: SortField::default(),
            page: pagination.page(),
            size: pagination.size(),
        }
    }
}

impl StudentQuery {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, sort: SortField) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn page(mut self, page: i64, size: i64) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    pub fn is_filtered(&self) -> bool {
        self.name.is_some() || self.course.is_some()
    }

    /// Whether a student satisfies both filters.
    pub fn matches(&self, student: &Student) -> bool {
        let name_ok = self.name.as_ref().is_none_or(|needle| {
            student
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let course_ok = self
            .course
            .as_ref()
            .is_none_or(|course| student.course == *course);
        name_ok && course_ok
    }
}

/// One page of a listing read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentPage {
    pub data: Vec<Student>,
    pub meta: PageMeta,
}

/// Query parameters for the student listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListStudentsParams {
    /// Page index (0-indexed, default: 0)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (at least 1, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub size: Option<i64>,
    /// Field to sort by (default: name)
    #[serde(
        default,
        rename = "sortBy",
        alias = "sort_by",
        deserialize_with = "deserialize_blank_as_none"
    )]
    pub sort_by: Option<String>,
    /// Case-insensitive name fragment
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub search: Option<String>,
    /// Exact course name
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub course: Option<String>,
}

impl ListStudentsParams {
    pub fn pagination(&self) -> PageParams {
        PageParams {
            page: self.page,
            size: self.size,
        }
    }

    pub fn sort_by(&self) -> &str {
        self.sort_by
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("name")
    }

    /// Search text, or `None` when blank.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Course filter, or `None` when blank.
    pub fn course(&self) -> Option<&str> {
        self.course.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Builds the query specification for this request.
    ///
    /// Page bounds are checked before the sort field.
    pub fn to_query(&self) -> Result<StudentQuery, ListingParamsError> {
        let (page, size) = self.pagination().checked()?;
        Ok(StudentQuery {
            name: self.search().map(str::to_string),
            course: self.course().map(str::to_string),
            sort: self.sort_by().parse()?,
            page,
            size,
        })
    }
}

/// Everything needed to render a listing view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentListing {
    pub students: Vec<Student>,
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub sort_by: String,
    pub search: Option<String>,
    pub selected_course: Option<String>,
    /// Distinct course names for the filter dropdown
    pub courses: Vec<String>,
}

/// Success response for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentConfirmation {
    pub message: String,
    pub data: Student,
}

/// Success response carrying only a message, used by delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
