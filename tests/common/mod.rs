#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rollbook::config::cors::CorsConfig;
use rollbook::modules::students::model::StudentForm;
use rollbook::modules::students::repository::{InMemoryStudentRepository, StudentRepository};
use rollbook::router::init_router;
use rollbook::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryStudentRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryStudentRepository::new());
        let state = AppState::new(repo.clone(), CorsConfig::default());
        Self {
            router: init_router(state),
            repo,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap();
        self.request(request).await
    }

    /// Inserts a student directly through the repository and returns its id.
    pub async fn seed(&self, form: StudentForm) -> i64 {
        let draft = form.into_draft().unwrap();
        self.repo.save(draft).await.unwrap().id
    }
}

pub fn student(name: &str, age: i32, course: &str) -> StudentForm {
    StudentForm::new(name, age, course)
}
