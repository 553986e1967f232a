mod error;
mod routes;

use crate::routes::{router, AppState};
use promptsd_core::{CoreError, GuardedResolver, LoggingConfig, PromptsdConfig};
use promptsd_suno::SunoResolver;
use promptsd_supabase::SupabaseSource;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let logging = LoggingConfig::peek_file(&PromptsdConfig::config_path());
    if let Some(log_path) = init_tracing(&logging) {
        info!("Appending logs to {}", log_path.display());
    }

    let config = match PromptsdConfig::load_or_create() {
        Ok(config) => config,
        Err(e @ CoreError::ConfigNotFound { .. }) => {
            info!("{e}");
            std::process::exit(0);
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("{e} (edit {})", PromptsdConfig::config_path().display());
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_token.cancel();
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    if let Err(e) = runtime.block_on(serve(&config, cancel_token)) {
        error!("{e}");
        std::process::exit(1);
    }

    info!("Shutdown complete");
}

/// Build the services and run the HTTP server until `cancel_token` fires
async fn serve(config: &PromptsdConfig, cancel_token: CancellationToken) -> Result<(), String> {
    let resolver = SunoResolver::new(&config.resolver).map_err(|e| e.to_string())?;
    let patterns = resolver.patterns().clone();
    let source = SupabaseSource::new(&config.supabase).map_err(|e| e.to_string())?;
    info!("Reading gallery content from {}", source.endpoint());

    let state = AppState {
        resolver: Arc::new(GuardedResolver::new(resolver)),
        source: Arc::new(source),
        patterns: Arc::new(patterns),
        gallery: config.gallery.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .map_err(|e| format!("Failed to bind to {}: {e}", config.server.bind))?;
    info!(
        "PromptSD listening on http://{}",
        listener
            .local_addr()
            .map_or_else(|_| config.server.bind.clone(), |addr| addr.to_string())
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel_token.cancelled().await })
        .await
        .map_err(|e| format!("Server error: {e}"))
}

/// Install the console layer and, when enabled, an appending file layer.
///
/// `RUST_LOG` wins over `logging.level`. Returns the log file path when file
/// logging is active.
fn init_tracing(logging: &LoggingConfig) -> Option<PathBuf> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(logging.filter_directives()))
        .unwrap_or_else(|e| {
            eprintln!("Ignoring invalid logging.level: {e}");
            EnvFilter::new(promptsd_core::DEFAULT_LOG_FILTER)
        });

    let file_layer = logging.enabled.then(open_log_file).flatten().map(|(path, file)| {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_target(true);
        (path, layer)
    });
    let (log_path, file_layer) = file_layer.unzip();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    log_path
}

/// Open the log file for appending, creating its directory first
fn open_log_file() -> Option<(PathBuf, std::fs::File)> {
    let log_path = promptsd_core::log_file_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {}: {e}", parent.display());
            return None;
        }
    }

    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some((log_path, file)),
        Err(e) => {
            eprintln!("Failed to open log file at {}: {e}", log_path.display());
            None
        }
    }
}
