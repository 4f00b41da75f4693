use clap::Parser;
use resumeforge_parser::{Application, Config, telemetry};

/// Resolves on SIGTERM or Ctrl+C. In-flight extractions are allowed to finish, so their scratch
/// files are still cleaned up.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = resumeforge_parser::config::Args::parse();

    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        println!(
            "Configuration is valid: {} (listening on {}, uploads up to {} bytes).",
            args.config,
            config.bind_address(),
            config.uploads.max_file_size
        );
        return Ok(());
    }

    telemetry::init_telemetry(config.enable_otel_export)?;

    tracing::info!(
        config_file = %args.config,
        bind_address = %config.bind_address(),
        max_file_size = config.uploads.max_file_size,
        scratch_dir = %config.scratch_dir().display(),
        otel_export = config.enable_otel_export,
        "Starting ResumeForge parser {}",
        env!("CARGO_PKG_VERSION")
    );

    let shutdown = shutdown_signal();
    Application::new(config)?.serve(shutdown).await
}
