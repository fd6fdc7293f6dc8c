//! JSON-over-HTTP surface for the project store.
//!
//! Handlers run their store work synchronously while holding the database
//! lock; none of them await while the guard is live.

pub mod error;
pub mod projects;
pub mod stats;
pub mod timeline;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::db::Database;
use crate::models::Project;
use crate::settings::Settings;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    page_size: usize,
}

impl AppState {
    pub fn new(db: Database, page_size: usize) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            page_size,
        }
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal(anyhow::anyhow!("database lock poisoned")))
    }
}

/// A stored record plus the fields derived from it at response time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub duration: i64,
    pub completion_percentage: f64,
}

impl ProjectView {
    pub fn at(project: Project, now: DateTime<Utc>) -> Self {
        Self {
            duration: project.duration_days(),
            completion_percentage: project.completion_percentage(now),
            project,
        }
    }

    pub fn all(projects: Vec<Project>, now: DateTime<Utc>) -> Vec<Self> {
        projects.into_iter().map(|p| Self::at(p, now)).collect()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/projects", get(projects::list).post(projects::create))
        .route("/projects/clear-all", delete(projects::clear_all))
        .route("/projects/seed", post(projects::seed))
        .route("/projects/stats/dashboard", get(stats::dashboard))
        .route("/projects/stats/budget", get(stats::budget))
        .route("/projects/stage/{stage}", get(projects::list_by_stage))
        .route("/projects/timeline", get(timeline::page))
        .route(
            "/projects/{id}",
            get(projects::get).put(projects::update).delete(projects::remove),
        )
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Portfolio dashboard API is running normally",
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Binds `addr` (or the configured listen address) and serves until the
/// process is interrupted.
pub async fn serve(settings: &Settings, addr: Option<String>) -> Result<()> {
    let db = Database::open_default(settings)?;
    let state = AppState::new(db, settings.page_size());

    let addr: SocketAddr = addr
        .unwrap_or_else(|| settings.listen_addr())
        .parse()
        .context("invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %addr, "portfolio API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    tracing::info!("portfolio API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
