//! Liveness endpoint.

use axum::Json;

use crate::api::models::health::HealthResponse;

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    summary = "Health check",
    description = "Confirms the service is running. Takes no input and never fails.",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, create_test_config};
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_health_check_payload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = create_test_app(create_test_config(temp_dir.path()));

        let response = app.get("/").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(
            body,
            json!({
                "status": "success",
                "message": "ResumeForge Parser Service is online and ready!"
            })
        );
    }

    #[tokio::test]
    async fn test_health_check_allows_any_origin() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = create_test_app(create_test_config(temp_dir.path()));

        let response = app.get("/").add_header("origin", "https://resumeforge.example.com").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
    }
}
