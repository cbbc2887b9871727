use crate::config::ServerConfig;
use crate::errors::BundleError;
use crate::fetcher::read_content;
use crate::ignore::ExclusionPolicy;
use crate::reader::read_directory;
use crate::tree::DirectoryEntry;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct ServerState {
    base: PathBuf,
    default_dir: String,
    policy: Arc<ExclusionPolicy>,
}

impl ServerState {
    pub fn new(base: PathBuf, default_dir: impl Into<String>, policy: ExclusionPolicy) -> Self {
        ServerState {
            base,
            default_dir: default_dir.into(),
            policy: Arc::new(policy),
        }
    }

    fn resolve_dir(&self, dir: Option<&str>) -> PathBuf {
        match dir {
            Some(dir) if !dir.is_empty() => self.base.join(dir),
            _ => self.base.join(&self.default_dir),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FilesQuery {
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub file: Option<String>,
    pub dir: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for BundleError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        debug!("Error response {}: {}", status_code, self);
        let error_response = ErrorResponse {
            error: self.to_string(),
        };
        (status_code, Json(error_response)).into_response()
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/files", get(list_files))
        .route("/content", get(file_content))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lists the requested directory. Read failures answer with an empty array,
/// never an error status.
async fn list_files(
    State(state): State<ServerState>,
    query: Result<Query<FilesQuery>, QueryRejection>,
) -> Json<Vec<DirectoryEntry>> {
    let dir = query.ok().and_then(|Query(q)| q.dir);
    let root = state.resolve_dir(dir.as_deref());
    if !root.is_dir() {
        warn!(
            "{} is not a readable directory, answering with an empty tree",
            root.display()
        );
    }

    let policy = state.policy.clone();
    let entries = tokio::task::spawn_blocking(move || read_directory(&root, &policy))
        .await
        .unwrap_or_else(|e| {
            warn!("Directory listing task failed: {}", e);
            Vec::new()
        });
    Json(entries)
}

async fn file_content(
    State(state): State<ServerState>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<String, BundleError> {
    let Query(query) = query.map_err(|e| BundleError::InvalidPath(e.body_text()))?;
    let file = match query.file {
        Some(file) if !file.trim().is_empty() => file,
        _ => return Err(BundleError::InvalidPath("missing file".to_owned())),
    };

    let root = state.resolve_dir(query.dir.as_deref());
    read_content(&root, &file).await
}

/// Binds the configured address and serves until the process is stopped.
pub async fn run_server(config: ServerConfig) -> Result<(), BundleError> {
    let base = config
        .base
        .canonicalize()
        .map_err(|e| BundleError::ConfigError(format!("{}: {}", config.base.display(), e)))?;
    let policy = ExclusionPolicy::new(Some(config.ignore_patterns.clone()));
    let app = router(ServerState::new(base.clone(), config.default_dir.clone(), policy));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Serving {} on http://{} (default dir '{}')",
        base.display(),
        addr,
        config.default_dir
    );

    axum::serve(listener, app).await?;
    Ok(())
}
