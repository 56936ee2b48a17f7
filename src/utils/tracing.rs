//! Tracing utilities and helper macros for observability
//!
//! Consistent span shapes for HTTP requests and database calls, helpers to
//! mark the current span as failed, and an audit macro for record changes.
//!
//! `record_error` and `record_http_status` only write fields the current
//! span declared, so spans that use them declare `otel.status_code`,
//! `error.message` and, for requests, `http.status_code` as empty.

use tracing::Span;

/// Create the server span for one incoming HTTP request
///
/// # Example
/// ```ignore
/// let span = http_request_span!(req.method(), "/api/students/{id}", request_id);
/// next.run(req).instrument(span).await
/// ```
#[macro_export]
macro_rules! http_request_span {
    ($method:expr, $route:expr, $request_id:expr) => {
        tracing::info_span!(
            "http.request",
            http.method = %$method,
            http.route = %$route,
            http.status_code = tracing::field::Empty,
            request_id = %$request_id,
            otel.kind = "server",
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty
        )
    };
}

/// Create a span for database operations with semantic conventions
///
/// # Example
/// ```ignore
/// let span = db_operation_span!("SELECT", "students", db.student_id = id);
/// async {
///     // database operation
/// }.instrument(span).await;
/// ```
#[macro_export]
macro_rules! db_operation_span {
    ($operation:expr, $table:expr) => {
        tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = $operation,
            db.sql.table = $table,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty
        )
    };
    ($operation:expr, $table:expr, $($field:tt)*) => {
        tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = $operation,
            db.sql.table = $table,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Log an audit event at INFO level
///
/// Use this for tracking changes to student records.
#[macro_export]
macro_rules! audit_event {
    ($action:expr, $resource:expr, $($field:tt)*) => {
        tracing::info!(
            audit.action = $action,
            audit.resource = $resource,
            $($field)*
        )
    };
}

/// Record a failed operation on the current span with an error message
pub fn record_error(message: &str) {
    let span = Span::current();
    span.record("otel.status_code", "ERROR");
    span.record("error.message", message);
}

/// Record HTTP status code on the current span
pub fn record_http_status(status: u16) {
    let span = Span::current();
    span.record("http.status_code", status);
    if status >= 400 {
        span.record("otel.status_code", "ERROR");
    } else {
        span.record("otel.status_code", "OK");
    }
}
