//! API response data models.
//!
//! These define the JSON contract of the service and are annotated with `utoipa` for the
//! generated API docs. Error bodies share [`crate::errors::ErrorResponse`].
//!
//! - [`health`]: Liveness payload
//! - [`extract`]: Text extraction result

pub mod extract;
pub mod health;
