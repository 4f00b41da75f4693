//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Response data structures
//!
//! # Endpoints
//!
//! - `GET /`: liveness check
//! - `POST /extract-text`: upload a PDF or DOCX (multipart field `file`) and get its text back
//!
//! All endpoints are documented with `utoipa`; the rendered reference is served at `/docs` and
//! the raw document at `/api-docs/openapi.json`.

pub mod handlers;
pub mod models;
