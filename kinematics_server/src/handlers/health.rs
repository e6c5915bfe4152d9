use crate::api_types::HealthResponse;
use crate::AppState;
use axum::extract::State;
use axum::Json;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.stats.snapshot().uptime_seconds,
    })
}
