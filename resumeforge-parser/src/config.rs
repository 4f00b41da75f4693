//! Application configuration management.
//!
//! Configuration is loaded from an optional YAML file with environment variable overrides. The
//! configuration file path defaults to `config.yaml` but can be specified via `-f` flag or
//! `RFPARSE_CONFIG` environment variable. A missing file is fine: every field has a default.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **Defaults** - [`Config::default`]
//! 2. **YAML config file** - (default: `config.yaml`)
//! 3. **Environment variables** - Variables prefixed with `RFPARSE_` override YAML values
//! 4. **PORT / FLASK_RUN_PORT** - Special case: overrides `port` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `RFPARSE_UPLOADS__MAX_FILE_SIZE=1048576` sets the `uploads.max_file_size` field.
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! RFPARSE_PORT=8080
//!
//! # Listen on all interfaces
//! RFPARSE_HOST=0.0.0.0
//!
//! # Write uploads somewhere other than the system temp dir
//! RFPARSE_UPLOADS__TEMP_DIR=/var/tmp/resumeforge
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "RFPARSE_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Cross-origin settings. Every origin is allowed by default.
    pub cors: CorsConfig,
    /// Upload handling
    pub uploads: UploadConfig,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub allowed_origins: Vec<CorsOrigin>,
    /// Not allowed together with a wildcard origin
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard", serialize_with = "serialize_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn serialize_wildcard<S>(serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("*")
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Largest accepted request body, in bytes
    pub max_file_size: u64,
    /// Directory for the per-request scratch file. System temp dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            cors: CorsConfig::default(),
            uploads: UploadConfig::default(),
            enable_otel_export: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 16 * 1024 * 1024, // 16 MiB
            temp_dir: None,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(figment::Error::from)?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.cors.allowed_origins.is_empty() {
            return Err("Config validation: cors.allowed_origins must list at least one origin (use \"*\" for any)".to_string());
        }

        if self.cors.allow_credentials && self.cors.allowed_origins.contains(&CorsOrigin::Wildcard) {
            return Err("Config validation: cors.allow_credentials cannot be combined with a wildcard origin".to_string());
        }

        if self.uploads.max_file_size == 0 {
            return Err("Config validation: uploads.max_file_size must be greater than 0".to_string());
        }

        if usize::try_from(self.uploads.max_file_size).is_err() {
            return Err(format!(
                "Config validation: uploads.max_file_size ({}) does not fit in memory on this platform",
                self.uploads.max_file_size
            ));
        }

        if let Some(dir) = &self.uploads.temp_dir
            && !dir.is_dir()
        {
            return Err(format!(
                "Config validation: uploads.temp_dir ({}) is not an existing directory",
                dir.display()
            ));
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("RFPARSE_").ignore(&["CONFIG"]).split("__"))
            // Plain PORT, plus the variable older deployments of this service set
            .merge(Env::raw().only(&["FLASK_RUN_PORT"]).map(|_| "port".into()))
            .merge(Env::raw().only(&["PORT"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Where upload scratch files are written
    pub fn scratch_dir(&self) -> PathBuf {
        self.uploads.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
