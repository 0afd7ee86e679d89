use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Liveness probe; deliberately unauthenticated.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
