use crate::api_types::{SolveFkRequest, SolveFkResponse};
use crate::error::ApiError;
use crate::handlers::resolve_chain;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use kinematics_core::fk;
use std::time::Instant;

pub async fn solve_fk(
    State(state): State<AppState>,
    Json(request): Json<SolveFkRequest>,
) -> Result<Json<SolveFkResponse>, ApiError> {
    let start = Instant::now();
    let result = (|| {
        let chain = resolve_chain(&request.chain_spec)?;
        let output = fk::evaluate(&chain, &request.joint_angles)?;
        Ok::<_, ApiError>(SolveFkResponse {
            end_effector_position: output.end_effector_position,
            end_effector_orientation: output.end_effector_orientation,
            joint_positions: output.joint_positions,
            elapsed_us: start.elapsed().as_micros() as u64,
        })
    })();

    state
        .stats
        .record("solve_fk", result.is_ok(), start.elapsed().as_micros() as u64);
    result.map(Json)
}
