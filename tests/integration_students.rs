mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{TestApp, student};
use serde_json::json;
use tower::ServiceExt;

fn names(body: &serde_json::Value) -> Vec<String> {
    body["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_empty() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/students").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"], json!([]));
    assert_eq!(body["total_items"], 0);
    assert_eq!(body["total_pages"], 0);
    assert_eq!(body["current_page"], 0);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["sort_by"], "name");
    assert_eq!(body["courses"], json!([]));
}

#[tokio::test]
async fn test_list_pagination_last_page() {
    let app = TestApp::new();
    for i in 0..25 {
        app.seed(student(&format!("Student {:02}", i), 20, "Math"))
            .await;
    }

    let (status, body) = app.get("/api/students?page=2&size=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"].as_array().unwrap().len(), 5);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["total_items"], 25);
    assert_eq!(body["current_page"], 2);
}

#[tokio::test]
async fn test_list_total_is_stable_across_page_sizes() {
    let app = TestApp::new();
    for i in 0..13 {
        app.seed(student(&format!("Student {:02}", i), 20, "Math"))
            .await;
    }

    let mut seen = Vec::new();
    for page in 0..5 {
        let (_, body) = app
            .get(&format!("/api/students?page={}&size=3&sortBy=id", page))
            .await;
        assert_eq!(body["total_items"], 13);
        seen.extend(names(&body));
    }
    assert_eq!(seen.len(), 13);

    let (_, body) = app.get("/api/students?size=100").await;
    assert_eq!(body["total_items"], 13);
    assert_eq!(body["total_pages"], 1);
}

#[tokio::test]
async fn test_list_honors_large_page_size() {
    let app = TestApp::new();
    for i in 0..120 {
        app.seed(student(&format!("Student {:03}", i), 20, "Math"))
            .await;
    }

    let (status, body) = app.get("/api/students?size=150").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"].as_array().unwrap().len(), 120);
    assert_eq!(body["page_size"], 150);
    assert_eq!(body["total_pages"], 1);
}

#[tokio::test]
async fn test_list_rejects_negative_page() {
    let app = TestApp::new();
    app.seed(student("Ann", 20, "Math")).await;

    let (status, body) = app.get("/api/students?page=-1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Error loading students: Page index must not be less than zero"
    );
}

#[tokio::test]
async fn test_list_rejects_size_below_one() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/students?size=0").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Error loading students: Page size must not be less than one"
    );
}

#[tokio::test]
async fn test_list_malformed_page_is_listing_error() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/students?page=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["content-type"], "application/json");

    let (_, body) = app.get("/api/students?page=abc").await;
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Error loading students: "), "{}", error);
    assert!(error.contains("page"), "{}", error);
}

#[tokio::test]
async fn test_list_search_is_case_insensitive_substring() {
    let app = TestApp::new();
    for name in ["Ann", "ANNE", "susann", "bob"] {
        app.seed(student(name, 20, "Math")).await;
    }

    let (status, body) = app.get("/api/students?search=ann").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 3);
    let found = names(&body);
    assert!(!found.contains(&"bob".to_string()));
    assert_eq!(body["search"], "ann");
}

#[tokio::test]
async fn test_list_search_treats_wildcards_literally() {
    let app = TestApp::new();
    app.seed(student("Ann", 20, "Math")).await;
    app.seed(student("100% Bob", 20, "Math")).await;

    let (_, body) = app.get("/api/students?search=%25").await;

    assert_eq!(names(&body), vec!["100% Bob"]);
}

#[tokio::test]
async fn test_list_course_filter_is_exact() {
    let app = TestApp::new();
    app.seed(student("Ann", 20, "Math")).await;
    app.seed(student("Bob", 20, "Mathematics")).await;

    let (_, body) = app.get("/api/students?course=Math").await;

    assert_eq!(names(&body), vec!["Ann"]);
    assert_eq!(body["selected_course"], "Math");
    assert_eq!(body["courses"], json!(["Math", "Mathematics"]));
}

#[tokio::test]
async fn test_list_filters_combine() {
    let app = TestApp::new();
    app.seed(student("Dan", 20, "Art")).await;
    app.seed(student("Dana", 20, "Math")).await;
    app.seed(student("Bob", 20, "Art")).await;

    let (_, body) = app.get("/api/students?search=dan&course=Art").await;

    assert_eq!(names(&body), vec!["Dan"]);
}

#[tokio::test]
async fn test_list_blank_filters_are_ignored() {
    let app = TestApp::new();
    app.seed(student("Ann", 20, "Math")).await;
    app.seed(student("Bob", 20, "Art")).await;

    let (status, body) = app.get("/api/students?search=&course=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 2);
    assert_eq!(body["search"], serde_json::Value::Null);
    assert_eq!(body["selected_course"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_list_sort_by_age() {
    let app = TestApp::new();
    app.seed(student("Old", 60, "Math")).await;
    app.seed(student("Young", 17, "Math")).await;
    app.seed(student("Middle", 30, "Math")).await;

    let (_, body) = app.get("/api/students?sortBy=age").await;

    assert_eq!(names(&body), vec!["Young", "Middle", "Old"]);
    assert_eq!(body["sort_by"], "age");
}

#[tokio::test]
async fn test_list_unknown_sort_is_listing_failure() {
    let app = TestApp::new();
    app.seed(student("Ann", 20, "Math")).await;

    let (status, body) = app.get("/api/students?sortBy=salary").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Error loading students: No property 'salary' found for type 'Student'"
    );
}

#[tokio::test]
async fn test_list_storage_failure() {
    let app = TestApp::new();
    app.repo.set_unavailable(true);

    let (status, body) = app.get("/api/students").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Error loading students: ")
    );
    assert!(body.get("students").is_none());
}

#[tokio::test]
async fn test_new_form_is_blank() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/students/new").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "");
    assert_eq!(body["age"], serde_json::Value::Null);
    assert_eq!(body["id"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_create_student() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json(
            "POST",
            "/api/students",
            &json!({
                "name": "Ann Smith",
                "age": 20,
                "course": "Mathematics",
                "email": "ann@example.com",
                "phone": "0123456789"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Student 'Ann Smith' added successfully!");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["email"], "ann@example.com");

    let (status, body) = app.get("/api/students/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann Smith");
}

#[tokio::test]
async fn test_create_with_blank_contacts_stores_absent_values() {
    let app = TestApp::new();

    for name in ["Ann", "Bob"] {
        let (status, body) = app
            .send_json(
                "POST",
                "/api/students",
                &json!({"name": name, "age": "21", "course": "Art", "email": "", "phone": ""}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["email"], serde_json::Value::Null);
        assert_eq!(body["data"]["phone"], serde_json::Value::Null);
    }

    assert_eq!(app.repo.len().await, 2);
}

#[tokio::test]
async fn test_create_short_name_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json(
            "POST",
            "/api/students",
            &json!({"name": "A", "age": 20, "course": "Math"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"][0]["field"], "name");
    assert_eq!(
        body["violations"][0]["message"],
        "Name must be between 2 and 100 characters"
    );
    assert_eq!(body["student"]["name"], "A");
    assert_eq!(body["id"], serde_json::Value::Null);
    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn test_create_null_name_reports_required() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json(
            "POST",
            "/api/students",
            &json!({"name": null, "age": 20, "course": null}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let messages: Vec<&str> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["message"].as_str().unwrap())
        .collect();
    assert!(messages.contains(&"Name is required"));
    assert!(messages.contains(&"Course is required"));
    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn test_create_reports_every_violation() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json(
            "POST",
            "/api/students",
            &json!({"name": "", "course": "", "email": "nope", "phone": "123"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    for field in ["name", "age", "course", "email", "phone"] {
        assert!(fields.contains(&field), "missing {}", field);
    }
    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let app = TestApp::new();
    let payload = json!({"name": "Ann", "age": 20, "course": "Math", "email": "a@example.com"});

    let (status, _) = app.send_json("POST", "/api/students", &payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let second = json!({"name": "Bob", "age": 22, "course": "Art", "email": "a@example.com"});
    let (status, body) = app.send_json("POST", "/api/students", &second).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Error adding student: ")
    );

    let (status, body) = app.get("/api/students/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann");
    assert_eq!(app.repo.len().await, 1);
}

#[tokio::test]
async fn test_create_malformed_body() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/students")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.request(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_without_content_type() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/students")
        .body(Body::from(r#"{"name":"Ann"}"#))
        .unwrap();
    let (status, body) = app.request(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing 'Content-Type: application/json' header"
    );
}

#[tokio::test]
async fn test_get_missing_student() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/students/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found!");
}

#[tokio::test]
async fn test_get_with_non_numeric_id() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/students/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid student id: abc");
}

#[tokio::test]
async fn test_update_keeps_path_id() {
    let app = TestApp::new();
    let first = app.seed(student("Ann", 20, "Math")).await;
    let second = app.seed(student("Bob", 21, "Art")).await;

    let (status, body) = app
        .send_json(
            "PUT",
            &format!("/api/students/{}", first),
            &json!({"id": second, "name": "Annie", "age": 23, "course": "Physics"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student 'Annie' updated successfully!");
    assert_eq!(body["data"]["id"], first);
    assert_eq!(body["data"]["course"], "Physics");

    let (_, body) = app.get(&format!("/api/students/{}", second)).await;
    assert_eq!(body["name"], "Bob");
}

#[tokio::test]
async fn test_update_invalid_carries_id() {
    let app = TestApp::new();
    let id = app.seed(student("Ann", 20, "Math")).await;

    let (status, body) = app
        .send_json(
            "PUT",
            &format!("/api/students/{}", id),
            &json!({"name": "Ann", "age": 15, "course": "Math"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["id"], id);
    assert_eq!(body["violations"][0]["field"], "age");
    assert_eq!(
        body["violations"][0]["message"],
        "Age must be at least 16"
    );

    let (_, body) = app.get(&format!("/api/students/{}", id)).await;
    assert_eq!(body["age"], 20);
}

#[tokio::test]
async fn test_update_missing_student() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json(
            "PUT",
            "/api/students/9",
            &json!({"name": "Ann", "age": 20, "course": "Math"}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found with ID: 9");
    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn test_update_to_taken_email_conflicts() {
    let app = TestApp::new();
    app.seed(student("Ann", 20, "Math").with_email("ann@example.com"))
        .await;
    let bob = app
        .seed(student("Bob", 20, "Math").with_email("bob@example.com"))
        .await;

    let (status, body) = app
        .send_json(
            "PUT",
            &format!("/api/students/{}", bob),
            &json!({"name": "Bob", "age": 20, "course": "Math", "email": "ann@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Error updating student: ")
    );
}

#[tokio::test]
async fn test_delete_student() {
    let app = TestApp::new();
    let id = app.seed(student("Ann", 20, "Math")).await;

    let (status, body) = app.delete(&format!("/api/students/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student 'Ann' deleted successfully!");

    let (status, _) = app.get(&format!("/api/students/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_student() {
    let app = TestApp::new();

    let (status, body) = app.delete("/api/students/77").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found with ID: 77");
}

#[tokio::test]
async fn test_distinct_courses_listed_once() {
    let app = TestApp::new();
    for i in 0..100 {
        app.seed(student(&format!("Physicist {}", i), 20, "Physics"))
            .await;
    }
    app.seed(student("Ann", 20, "Art")).await;

    let (status, body) = app.get("/api/students/courses").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Art", "Physics"]));
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = TestApp::new();

    let (status, body) = app.get("/nowhere").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "The page you're looking for doesn't exist.");
}

#[tokio::test]
async fn test_openapi_document_lists_student_paths() {
    let app = TestApp::new();

    let (status, body) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/students"].is_object());
    assert!(body["paths"]["/api/students/{id}"].is_object());
    assert!(body["paths"]["/api/students/courses"].is_object());
}
