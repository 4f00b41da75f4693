//! # resumeforge-parser: text extraction service for ResumeForge
//!
//! `resumeforge-parser` is a small HTTP service that turns uploaded resumes into plain text. A
//! client posts a PDF or DOCX document as multipart form data and gets back the document's text
//! with all whitespace collapsed, ready for downstream analysis.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) and keeps no state
//! between requests. Each upload is checked, written to a uniquely named temporary file, parsed
//! on the blocking thread pool and deleted again before the response is sent.
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) holds the two endpoints: a liveness check at `GET /` and the
//! extraction endpoint at `POST /extract-text`.
//!
//! The **extraction layer** ([`extract`]) picks a parser from the file extension. PDFs are read
//! page by page with `lopdf`; DOCX files are opened as zip archives and their body paragraphs
//! read from `word/document.xml`.
//!
//! The **normalizer** ([`normalize`]) collapses runs of whitespace to single spaces.
//!
//! Failures of any kind are mapped onto HTTP responses by [`errors::Error`], which always renders
//! a JSON `{"error": "..."}` body.
//!
//! ## Configuration
//!
//! Configuration is loaded from a YAML file with environment variable overrides. See [`config`]
//! for all options. Every option has a default, so the service starts without a config file and
//! listens on `127.0.0.1:5001`.
//!
//! ## Getting Started
//!
//! ```no_run
//! use resumeforge_parser::{Application, Config, telemetry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.ok();
//!     })
//!     .await
//! }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod extract;
pub mod normalize;
mod openapi;
pub mod telemetry;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::{
    Json, Router,
    routing::{get, post},
};
pub use config::Config;
use config::CorsOrigin;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::openapi::ApiDoc;

/// Headroom on top of `uploads.max_file_size` for multipart boundaries, part headers and any
/// small form fields sent alongside the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across all request handlers.
///
/// The service is stateless between requests, so this only carries the configuration handlers
/// need (upload limits and the scratch directory).
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;
    let wildcard = cors_config.allowed_origins.contains(&CorsOrigin::Wildcard);

    // tower-http panics on this combination when the layer is built, so refuse it here
    if wildcard && cors_config.allow_credentials {
        anyhow::bail!("CORS credentials cannot be allowed for a wildcard origin");
    }

    let allow_origin = if wildcard {
        AllowOrigin::any()
    } else {
        let mut origins: Vec<HeaderValue> = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Browsers send the bare origin, without path or trailing slash
                origins.push(url.origin().ascii_serialization().parse()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// - `GET /` liveness check
/// - `POST /extract-text`; the file itself is checked against `uploads.max_file_size` by the
///   handler, the request body as a whole is capped a little above that
/// - `GET /api-docs/openapi.json` and the rendered docs at `/docs`
/// - CORS and request tracing on every route
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let body_limit = usize::try_from(state.config.uploads.max_file_size)?.saturating_add(MULTIPART_OVERHEAD);
    let cors = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/", get(api::handlers::health::health_check))
        .route(
            "/extract-text",
            post(api::handlers::extract::extract_text).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let router = router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(cors),
    );

    Ok(router)
}

/// The HTTP service and its lifecycle.
///
/// 1. **Create**: [`Application::new`] builds the router from the configuration
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown future resolves, in-flight requests finish and telemetry is
///    flushed
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting parser service with configuration: {:#?}", config);

        let state = AppState { config: config.clone() };
        let router = build_router(state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Parser service listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{create_test_app, create_test_config};
    use axum::http::{Method, StatusCode};
    use serde_json::Value;
    use url::Url;

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = create_test_app(create_test_config(temp_dir.path()));

        let response = app.get("/api-docs/openapi.json").await;

        response.assert_status(StatusCode::OK);
        let doc: Value = response.json();
        assert!(doc["paths"]["/extract-text"]["post"].is_object());
        assert!(doc["paths"]["/"]["get"].is_object());
    }

    #[tokio::test]
    async fn test_docs_page_is_served() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = create_test_app(create_test_config(temp_dir.path()));

        let response = app.get("/docs").await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("ResumeForge Parser API"));
    }

    #[tokio::test]
    async fn test_preflight_is_permissive_by_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = create_test_app(create_test_config(temp_dir.path()));

        let response = app
            .method(Method::OPTIONS, "/extract-text")
            .add_header("origin", "https://anywhere.example.net")
            .add_header("access-control-request-method", "POST")
            .add_header("access-control-request-headers", "x-requested-with")
            .await;

        response.assert_status(StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(headers.get("access-control-allow-methods").unwrap(), "POST");
        assert_eq!(headers.get("access-control-allow-headers").unwrap(), "x-requested-with");
    }

    #[tokio::test]
    async fn test_explicit_origins_only_allow_listed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = create_test_config(temp_dir.path());
        config.cors.allowed_origins = vec![CorsOrigin::Url(Url::parse("https://app.resumeforge.example/").unwrap())];
        config.cors.allow_credentials = true;
        let app = create_test_app(config);

        let allowed = app.get("/").add_header("origin", "https://app.resumeforge.example").await;
        assert_eq!(
            allowed.headers().get("access-control-allow-origin").unwrap(),
            "https://app.resumeforge.example"
        );
        assert_eq!(allowed.headers().get("access-control-allow-credentials").unwrap(), "true");

        let other = app.get("/").add_header("origin", "https://evil.example").await;
        other.assert_status(StatusCode::OK);
        assert!(other.headers().get("access-control-allow-origin").is_none());
    }

    #[test]
    fn test_wildcard_with_credentials_is_rejected() {
        let mut config = Config::default();
        config.cors.allow_credentials = true;

        assert!(create_cors_layer(&config).is_err());
        assert!(Application::new(config).is_err());
    }

    #[test]
    fn test_max_age_is_accepted() {
        let mut config = Config::default();
        config.cors.max_age = Some(600);
        assert!(create_cors_layer(&config).is_ok());
    }
}
