use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use common::Config;

use crate::classifier::Classifier;
use crate::pipeline::{self, Article, DEFAULT_SOURCE};

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub config: Option<Arc<Config>>,
    pub db: SqlitePool,
    pub classifier: Arc<dyn Classifier>,
}

/// Request body for `POST /ingest`. `source` and `published_at` are optional;
/// defaults are filled in at this boundary before the pipeline sees the article.
#[derive(Deserialize)]
pub struct IngestRequest {
    title: String,
    content: String,
    source: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    classifier_url: Option<String>,
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

/// Status endpoint returning simple JSON with uptime and basic config info.
#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let now = Utc::now();
    let uptime = (now - state.started_at).num_seconds();

    let classifier_url = state
        .config
        .as_ref()
        .and_then(|c| c.classifier.as_ref())
        .and_then(|c| c.url.clone());

    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        classifier_url,
    })
}

/// Receive an article and schedule it for background processing.
///
/// Validation happens here and only here: missing or ill-typed fields are
/// rejected by the JSON data guard, present-but-blank title/content get a 422
/// before anything is scheduled. For well-formed input the response is always
/// Accepted, regardless of what later happens downstream.
#[post("/ingest", data = "<body>")]
async fn ingest(
    state: &State<AppState>,
    body: Json<IngestRequest>,
) -> Result<Json<serde_json::Value>, Status> {
    let req = body.into_inner();

    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        tracing::warn!("ingest: rejected payload with blank title or content");
        return Err(Status::UnprocessableEntity);
    }

    let article = Article {
        title: req.title,
        content: req.content,
        source: req.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        published_at: req.published_at.unwrap_or_else(Utc::now),
    };

    // Fire and forget: the handle is dropped here. Completion is observable
    // only via the store or the logs.
    pipeline::submit(state.db.clone(), state.classifier.clone(), article);

    Ok(Json(serde_json::json!({
        "status": "Accepted",
        "message": "Article is being processed in background"
    })))
}

/// Build the Rocket instance with managed state and mounted routes, applying
/// `[server] bind/port` from a config file if present. Split from `launch` so
/// tests can drive it with Rocket's local client.
pub fn build_rocket(state: AppState) -> Rocket<Build> {
    // Determine config path: env CONFIG_PATH -> /config/config.toml -> ./config.toml
    let mut fig = rocket::Config::figment();
    let cfg_path_env =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "/config/config.toml".to_string());
    let cfg_path = if std::path::Path::new(&cfg_path_env).exists() {
        cfg_path_env
    } else if std::path::Path::new("config.toml").exists() {
        "config.toml".to_string()
    } else {
        String::new()
    };

    if !cfg_path.is_empty() {
        // Read config file and extract [server] bind/port if present (failure here is non-fatal)
        if let Ok(cfg_contents) = std::fs::read_to_string(&cfg_path) {
            if let Ok(toml_val) = toml::from_str::<toml::Value>(&cfg_contents) {
                if let Some(server_val) = toml_val.get("server") {
                    if let Some(bind) = server_val.get("bind").and_then(|v| v.as_str()) {
                        fig = fig.merge(("address", bind.to_string()));
                    }
                    if let Some(port) = server_val.get("port").and_then(|v| v.as_integer()) {
                        fig = fig.merge(("port", port as u16));
                    }
                }
            }
        }
    }

    rocket::custom(fig)
        .manage(state)
        .mount("/", routes![health, status, ingest])
}

/// Build and launch the Rocket server.
///
/// The DB pool, optional application config and classifier client are provided
/// by the caller; pool creation and schema setup are the responsibility of the
/// process startup code (main). This function blocks until Rocket shuts down.
pub async fn launch(
    db_pool: Arc<SqlitePool>,
    config: Option<Arc<Config>>,
    classifier: Arc<dyn Classifier>,
) -> Result<()> {
    let state = AppState {
        started_at: Utc::now(),
        config,
        db: db_pool.as_ref().clone(), // Unwrap Arc since SqlitePool is already ref-counted
        classifier,
    };

    tracing::info!("Starting Rocket HTTP server");
    build_rocket(state)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
