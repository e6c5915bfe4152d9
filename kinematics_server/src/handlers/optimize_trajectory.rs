use crate::api_types::{OptimizeTrajectoryRequest, OptimizeTrajectoryResponse};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use kinematics_core::trajectory;
use std::time::Instant;

pub async fn optimize_trajectory(
    State(state): State<AppState>,
    Json(request): Json<OptimizeTrajectoryRequest>,
) -> Result<Json<OptimizeTrajectoryResponse>, ApiError> {
    let start = Instant::now();
    let result = (|| {
        let output = trajectory::optimize(&request.waypoints, request.max_velocity)?;
        Ok::<_, ApiError>(OptimizeTrajectoryResponse {
            segments: output.segments,
            total_time: output.total_time,
            total_distance: output.total_distance,
            max_velocity_reached: output.max_velocity_reached,
            elapsed_us: start.elapsed().as_micros() as u64,
        })
    })();

    state.stats.record(
        "optimize_trajectory",
        result.is_ok(),
        start.elapsed().as_micros() as u64,
    );
    result.map(Json)
}
