/*
newsflow - single-binary main.rs
This binary starts the Rocket HTTP server; each accepted article is processed
by an independently spawned background unit inside the same process.
*/

use anyhow::Result;
use clap::Parser;
use common::{init_db_pool, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newsflow::classifier::{remote::RemoteClassifier, Classifier, DEFAULT_PREDICT_URL};
use newsflow::server;
use newsflow::storage;

#[derive(Parser, Debug)]
#[command(name = "newsflow", about = "Newsflow article ingestion server")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    // Load configuration with defaults
    let config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    // Initialize DB pool - resolve and log the absolute DB path before connecting
    let db_path_abs = match tokio::fs::canonicalize(&config.database.path).await {
        Ok(p) => p.to_string_lossy().to_string(),
        Err(_) => config.database.path.clone(),
    };
    info!(db_path = %db_path_abs, "resolved DB path");

    let db_pool = match init_db_pool(&db_path_abs).await {
        Ok(p) => p,
        Err(e) => {
            error!(%e, db_path = %db_path_abs, "failed to initialize database pool");
            return Err(e);
        }
    };
    let db_pool = Arc::new(db_pool);

    // The persistence gateway owns the table shape; creation is idempotent.
    storage::ensure_schema(&db_pool).await?;

    // Initialize the classifier client once during startup; request handlers
    // consume it read-only afterwards.
    let classifier = build_classifier(&config);

    // Launch the Rocket server (blocking until Rocket shuts down)
    info!("Launching Rocket HTTP server");
    if let Err(e) = server::launch(db_pool, Some(Arc::new(config)), classifier).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

/// Create the classifier client from configuration, falling back to the
/// conventional local service address and a 10 second timeout.
fn build_classifier(config: &Config) -> Arc<dyn Classifier> {
    let (url, timeout_secs) = match &config.classifier {
        Some(c) => (
            c.url.clone().unwrap_or_else(|| DEFAULT_PREDICT_URL.to_string()),
            c.timeout_seconds.unwrap_or(10),
        ),
        None => (DEFAULT_PREDICT_URL.to_string(), 10),
    };

    info!(classifier_url = %url, timeout_seconds = timeout_secs, "classifier client initialized");
    Arc::new(RemoteClassifier::new(url).with_timeout(timeout_secs))
}
