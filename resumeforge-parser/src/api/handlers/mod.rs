//! HTTP request handlers.
//!
//! - [`health`]: `GET /` liveness check
//! - [`extract`]: `POST /extract-text` document upload and text extraction
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Result`]; every error is rendered as a JSON
//! `{"error": "..."}` body with the matching status code.

pub mod extract;
pub mod health;
