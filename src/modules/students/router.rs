use axum::{Router, routing::get};

use crate::modules::students::controller::{
    create_student, delete_student, get_student, list_courses, list_students, new_student_form,
    update_student,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/new", get(new_student_form))
        .route("/courses", get(list_courses))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
