//! REST API for the auscultation database
//!
//! All endpoints are GET: exact record fetch, filtered random selection, and
//! pass-through static serving of the dataset files.

pub mod breath;
pub mod heart;
mod params;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::breath::BreathRepository;
use crate::heart::HeartRepository;

/// Application state shared across handlers
///
/// The repositories are loaded once at startup and never mutated, so the
/// handlers share them without locking.
#[derive(Clone)]
pub struct AppState {
    pub heart: Arc<HeartRepository>,
    pub breath: Arc<BreathRepository>,
    /// Folder served under /heart-data
    pub heart_data_dir: PathBuf,
    /// Folder served under /breath-data
    pub breath_data_dir: PathBuf,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .route("/heart/patient", get(heart::get_patient))
                .route("/heart/patient/random", get(heart::get_random_patient))
                .route("/breath/case", get(breath::get_case))
                .route("/breath/case/random", get(breath::get_random_case)),
        )
        // Audio and raw annotation files are served as-is from the dataset
        // folders; the filenames are carried by each track record
        .nest_service("/heart-data", ServeDir::new(&state.heart_data_dir))
        .nest_service("/breath-data", ServeDir::new(&state.breath_data_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// GET /health - Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "ausdb-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
