//! OpenAPI documentation for the HTTP surface.
//!
//! The document is served raw at `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::OpenApi;

use crate::api;
use crate::errors::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::extract::extract_text,
    ),
    components(
        schemas(
            api::models::health::HealthResponse,
            api::models::extract::ExtractTextForm,
            api::models::extract::ExtractTextResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "extraction", description = "Plain text extraction from uploaded PDF and DOCX documents"),
    ),
    info(
        title = "ResumeForge Parser API",
        version = "1.0.0",
        description = "Turns uploaded resumes into clean plain text.

## Errors

Every error response has the same shape:

```json
{
  \"error\": \"Unsupported file type: .txt\"
}
```",
    ),
)]
pub struct ApiDoc;
