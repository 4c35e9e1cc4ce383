//! Axum router definition and handler functions.
//!
//! Each handler calls the corresponding `api::*_payload` function.
//! Evaluation is CPU-bound and offloaded to a blocking thread via
//! `tokio::task::spawn_blocking` so the async runtime stays responsive.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use crate::server::api;

struct JsonResponse {
    status: StatusCode,
    body: String,
}

impl IntoResponse for JsonResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        (self.status, headers, self.body).into_response()
    }
}

fn ok_json(body: String) -> JsonResponse {
    JsonResponse {
        status: StatusCode::OK,
        body,
    }
}

fn error_json(status: StatusCode, message: &str) -> JsonResponse {
    let body = format!(
        "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
        serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    JsonResponse { status, body }
}

pub fn build_router() -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/data/version", get(handle_data_version))
        .route("/api/evaluate", post(handle_evaluate))
}

async fn handle_health() -> JsonResponse {
    ok_json(api::health_payload())
}

async fn handle_data_version() -> JsonResponse {
    ok_json(api::data_version_payload())
}

async fn handle_evaluate(body: String) -> JsonResponse {
    let result = tokio::task::spawn_blocking(move || api::evaluate_payload(&body)).await;
    match result {
        Ok(Ok(payload)) => ok_json(payload),
        Ok(Err(err)) => error_json(StatusCode::BAD_REQUEST, &err.to_string()),
        Err(err) => error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("evaluation task failed: {err}"),
        ),
    }
}
