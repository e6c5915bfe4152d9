pub mod api_types;
pub mod config;
pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use kinematics_core::stats::Stats;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<Stats>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            stats: Arc::new(Stats::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

/// Build the full router, with `timeout` wrapping every route (the §5
/// wall-clock cap). Tests build a router directly from `AppState` without
/// the timeout layer to keep assertions deterministic.
pub fn build_router(state: AppState, timeout: Duration) -> Router {
    bare_router(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
}

/// The router without the timeout/CORS layers, used directly in tests.
pub fn bare_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/v1/kinematics/chains",
            get(handlers::chains::list_chains),
        )
        .route("/api/v1/kinematics/stats", get(handlers::stats::get_stats))
        .route(
            "/api/v1/kinematics/solve-fk",
            post(handlers::solve_fk::solve_fk),
        )
        .route(
            "/api/v1/kinematics/solve-ik",
            post(handlers::solve_ik::solve_ik),
        )
        .route(
            "/api/v1/kinematics/compress-intent",
            post(handlers::compress_intent::compress_intent),
        )
        .route(
            "/api/v1/kinematics/optimize-trajectory",
            post(handlers::optimize_trajectory::optimize_trajectory),
        )
        .with_state(state)
}
