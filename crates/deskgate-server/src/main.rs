use std::env;

use deskgate_server::{build_app, init_tracing, load_config};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From DESKGATE_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (deskgate.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (DESKGATE_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env if present; purely optional for local development.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    init_tracing();

    let (config_path, source) = resolve_config_path();

    // Configuration problems are fatal before the listener binds.
    let config = match load_config(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    let app = match build_app(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Startup error: {e}");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(&config.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {}: {e}", config.listen);
            std::process::exit(1);
        }
    };

    tracing::info!(listen = %config.listen, "Deskgate support SSO listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Resolve the config path from CLI, environment, or the default.
fn resolve_config_path() -> (String, ConfigSource) {
    let args: Vec<String> = env::args().collect();
    if let Some(position) = args.iter().position(|a| a == "--config") {
        if let Some(path) = args.get(position + 1) {
            return (path.clone(), ConfigSource::CliArgument);
        }
    }
    if let Ok(path) = env::var("DESKGATE_CONFIG") {
        return (path, ConfigSource::EnvironmentVariable);
    }
    ("deskgate.toml".to_string(), ConfigSource::Default)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install shutdown signal handler");
    }
}
