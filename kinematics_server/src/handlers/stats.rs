use crate::AppState;
use axum::extract::State;
use axum::Json;
use kinematics_core::stats::StatsSnapshot;

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}
