use axum::response::IntoResponse;

/// Liveness probe for container health checks
pub async fn health_check() -> impl IntoResponse {
    "OK"
}
