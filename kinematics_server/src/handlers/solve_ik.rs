use crate::api_types::{SolveIkRequest, SolveIkResponse};
use crate::error::ApiError;
use crate::handlers::resolve_chain;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use kinematics_core::ik;
use std::time::{Duration, Instant};

/// Per-request solver budget, independent of the server's wall-clock
/// `TimeoutLayer` — this is the cooperative deadline the solver itself
/// checks between iterations.
const SOLVE_DEADLINE: Duration = Duration::from_secs(3);

pub async fn solve_ik(
    State(state): State<AppState>,
    Json(request): Json<SolveIkRequest>,
) -> Result<Json<SolveIkResponse>, ApiError> {
    let start = Instant::now();
    let result = (|| {
        let chain = resolve_chain(&request.chain_spec)?;
        let deadline = Instant::now() + SOLVE_DEADLINE;
        let output = ik::solve(
            &chain,
            request.target_position,
            request.target_orientation,
            &request.constraints,
            Some(deadline),
        )?;
        let solution_id = uuid::Uuid::new_v4().to_string();
        Ok::<_, ApiError>(SolveIkResponse::from_output(solution_id, output))
    })();

    state
        .stats
        .record("solve_ik", result.is_ok(), start.elapsed().as_micros() as u64);
    result.map(Json)
}
