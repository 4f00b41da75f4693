use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const HEALTH_MESSAGE: &str = "ResumeForge Parser Service is online and ready!";

/// Liveness payload returned by `GET /`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "success"
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "ResumeForge Parser Service is online and ready!")]
    pub message: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "success".to_string(),
            message: HEALTH_MESSAGE.to_string(),
        }
    }
}
