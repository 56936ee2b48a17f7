use utoipa::OpenApi;

use crate::modules::students::controller::{ErrorResponse, ValidationErrorResponse};
use crate::modules::students::model::{
    FieldViolation, MessageResponse, SortField, Student, StudentConfirmation, StudentForm,
    StudentListing,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::new_student_form,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::list_courses,
    ),
    components(
        schemas(
            Student,
            StudentForm,
            StudentListing,
            StudentConfirmation,
            MessageResponse,
            FieldViolation,
            SortField,
            ErrorResponse,
            ValidationErrorResponse,
        )
    ),
    tags(
        (name = "Students", description = "Student record management")
    ),
    info(
        title = "Rollbook API",
        version = "0.1.0",
        description = "Student records with search, course filtering, sorting and pagination.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
