use tracing::{debug, error, info, instrument, warn};

use crate::audit_event;
use crate::metrics;
use crate::modules::students::error::StudentError;
use crate::modules::students::model::{
    ListStudentsParams, MessageResponse, Student, StudentConfirmation, StudentForm,
    StudentListing,
};
use crate::modules::students::repository::{RepositoryError, StudentRepository};
use crate::utils::tracing::record_error;

/// Shown in place of infrastructure details, which are only logged.
const STORAGE_FAILURE_REASON: &str = "something went wrong, please try again later";

fn reason(err: &RepositoryError) -> String {
    match err {
        RepositoryError::Storage(_) => STORAGE_FAILURE_REASON.to_string(),
        other => other.to_string(),
    }
}

pub struct StudentService;

impl StudentService {
    /// Reads one page of students plus the course list for the filter.
    ///
    /// Both reads must succeed; any failure (including an unknown sort
    /// field) is reported as a single listing error.
    #[instrument(
        skip(repo, params),
        fields(
            sort_by = %params.sort_by(),
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty
        )
    )]
    pub async fn list_students(
        repo: &dyn StudentRepository,
        params: &ListStudentsParams,
    ) -> Result<StudentListing, StudentError> {
        let query = params.to_query().map_err(|e| {
            warn!(error = %e, "Rejected listing parameters");
            record_error(&e.to_string());
            StudentError::Listing(format!("Error loading students: {}", e))
        })?;

        debug!(
            page = query.page,
            size = query.size,
            filter.name = ?query.name,
            filter.course = ?query.course,
            "Listing students"
        );

        let listing_failed = |e: RepositoryError| {
            error!(error = %e, "Failed to load students");
            record_error(&e.to_string());
            StudentError::Listing(format!("Error loading students: {}", reason(&e)))
        };

        let page = repo.query(&query).await.map_err(listing_failed)?;
        let courses = repo.list_distinct_courses().await.map_err(listing_failed)?;

        Ok(StudentListing {
            students: page.data,
            current_page: page.meta.page,
            page_size: page.meta.size,
            total_pages: page.meta.total_pages,
            total_items: page.meta.total_items,
            sort_by: query.sort.to_string(),
            search: query.name,
            selected_course: query.course,
            courses,
        })
    }

    /// A blank form for the create view.
    pub fn new_student_form() -> StudentForm {
        StudentForm::default()
    }

    #[instrument(
        skip(repo, form),
        fields(
            student.name = %form.name,
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty
        )
    )]
    pub async fn create_student(
        repo: &dyn StudentRepository,
        mut form: StudentForm,
    ) -> Result<StudentConfirmation, StudentError> {
        form.id = None;

        let draft = form.clone().into_draft().map_err(|violations| {
            warn!(violations = violations.len(), "Student form rejected");
            metrics::track_validation_failure("create");
            StudentError::Invalid {
                id: None,
                form: Box::new(form),
                violations,
            }
        })?;

        let student = repo.save(draft).await.map_err(|e| {
            error!(error = %e, "Failed to add student");
            record_error(&e.to_string());
            let message = format!("Error adding student: {}", reason(&e));
            match e {
                RepositoryError::DuplicateEmail { .. } => StudentError::Conflict(message),
                _ => StudentError::Failed(message),
            }
        })?;

        metrics::track_student_created();
        audit_event!("create", "student", student.id = student.id, "Student added");

        Ok(StudentConfirmation {
            message: format!("Student '{}' added successfully!", student.name),
            data: student,
        })
    }

    /// Loads a student for the edit view.
    #[instrument(
        skip(repo),
        fields(otel.status_code = tracing::field::Empty, error.message = tracing::field::Empty)
    )]
    pub async fn get_student_for_edit(
        repo: &dyn StudentRepository,
        id: i64,
    ) -> Result<Student, StudentError> {
        match repo.find_by_id(id).await {
            Ok(Some(student)) => Ok(student),
            Ok(None) => {
                warn!(student.id = id, "Student not found for edit");
                Err(StudentError::NotFound("Student not found!".to_string()))
            }
            Err(e) => {
                error!(error = %e, student.id = id, "Failed to load student");
                record_error(&e.to_string());
                Err(StudentError::Failed(format!(
                    "Error loading student: {}",
                    reason(&e)
                )))
            }
        }
    }

    /// Replaces every field of student `id`. The id in `form` is ignored.
    #[instrument(
        skip(repo, form),
        fields(
            student.name = %form.name,
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty
        )
    )]
    pub async fn update_student(
        repo: &dyn StudentRepository,
        id: i64,
        mut form: StudentForm,
    ) -> Result<StudentConfirmation, StudentError> {
        form.id = Some(id);

        let draft = form.clone().into_draft().map_err(|violations| {
            warn!(student.id = id, violations = violations.len(), "Student form rejected");
            metrics::track_validation_failure("update");
            StudentError::Invalid {
                id: Some(id),
                form: Box::new(form),
                violations,
            }
        })?;

        let student = repo.save(draft).await.map_err(|e| match e {
            RepositoryError::NotFound { id } => {
                warn!(student.id = id, "Student not found for update");
                StudentError::NotFound(format!("Student not found with ID: {}", id))
            }
            RepositoryError::DuplicateEmail { .. } => {
                warn!(student.id = id, error = %e, "Duplicate email on update");
                StudentError::Conflict(format!("Error updating student: {}", e))
            }
            RepositoryError::Storage(_) => {
                error!(error = %e, student.id = id, "Failed to update student");
                record_error(&e.to_string());
                StudentError::Failed(format!("Error updating student: {}", reason(&e)))
            }
        })?;

        metrics::track_student_updated();
        audit_event!("update", "student", student.id = student.id, "Student updated");

        Ok(StudentConfirmation {
            message: format!("Student '{}' updated successfully!", student.name),
            data: student,
        })
    }

    /// Removes student `id`, naming it in the confirmation.
    #[instrument(
        skip(repo),
        fields(otel.status_code = tracing::field::Empty, error.message = tracing::field::Empty)
    )]
    pub async fn delete_student(
        repo: &dyn StudentRepository,
        id: i64,
    ) -> Result<MessageResponse, StudentError> {
        let not_found = || StudentError::NotFound(format!("Student not found with ID: {}", id));
        let failed = |e: RepositoryError| {
            error!(error = %e, student.id = id, "Failed to delete student");
            record_error(&e.to_string());
            StudentError::Failed(format!("Error deleting student: {}", reason(&e)))
        };

        let student = repo.find_by_id(id).await.map_err(failed)?.ok_or_else(|| {
            warn!(student.id = id, "Student not found for delete");
            not_found()
        })?;

        match repo.delete_by_id(id).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound { .. }) => {
                warn!(student.id = id, "Student removed before delete completed");
                return Err(not_found());
            }
            Err(e) => return Err(failed(e)),
        }

        metrics::track_student_deleted();
        audit_event!("delete", "student", student.id = id, "Student deleted");
        info!(student.id = id, "Student deleted");

        Ok(MessageResponse {
            message: format!("Student '{}' deleted successfully!", student.name),
        })
    }

    #[instrument(
        skip(repo),
        fields(otel.status_code = tracing::field::Empty, error.message = tracing::field::Empty)
    )]
    pub async fn list_courses(repo: &dyn StudentRepository) -> Result<Vec<String>, StudentError> {
        repo.list_distinct_courses().await.map_err(|e| {
            error!(error = %e, "Failed to load courses");
            record_error(&e.to_string());
            StudentError::Failed(format!("Error loading courses: {}", reason(&e)))
        })
    }
}
