//! Request/response DTOs for the HTTP surface. Kept separate from
//! `kinematics_core`'s types so the wire format can evolve independently of
//! the solver internals.

use kinematics_core::ik::{IkConstraints, IkOutput};
use kinematics_core::{Quaternion, Vec3};
use serde::{Deserialize, Serialize};

/// How a request identifies the chain to operate on: a named preset, an
/// explicit set of link lengths (builds the implicit chain), or — for IK
/// only — a bare joint count (uniform 0.3 m links).
#[derive(Debug, Deserialize)]
pub struct ChainSpec {
    pub chain_id: Option<String>,
    pub link_lengths: Option<Vec<f64>>,
    pub joint_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SolveFkRequest {
    #[serde(flatten)]
    pub chain_spec: ChainSpec,
    pub joint_angles: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct SolveFkResponse {
    pub end_effector_position: Vec3,
    pub end_effector_orientation: Quaternion,
    pub joint_positions: Vec<Vec3>,
    pub elapsed_us: u64,
}

#[derive(Debug, Deserialize)]
pub struct SolveIkRequest {
    #[serde(flatten)]
    pub chain_spec: ChainSpec,
    pub target_position: Vec3,
    pub target_orientation: Option<Quaternion>,
    #[serde(default)]
    pub constraints: IkConstraints,
}

#[derive(Debug, Serialize)]
pub struct SolveIkResponse {
    pub solution_id: String,
    pub joint_angles: Vec<f64>,
    pub iterations: u32,
    pub converged: bool,
    pub error_distance: f64,
    pub elapsed_us: u64,
}

impl SolveIkResponse {
    pub fn from_output(solution_id: String, output: IkOutput) -> Self {
        SolveIkResponse {
            solution_id,
            joint_angles: output.joint_angles,
            iterations: output.iterations,
            converged: output.converged,
            error_distance: output.error_distance,
            elapsed_us: output.elapsed_us,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MotionSampleDto {
    pub timestamp: f64,
    pub position: Vec3,
    #[serde(default)]
    pub velocity: Option<Vec3>,
}

#[derive(Debug, Deserialize)]
pub struct CompressIntentRequest {
    pub samples: Vec<MotionSampleDto>,
    pub sample_rate_hz: f64,
}

#[derive(Debug, Serialize)]
pub struct CompressIntentResponse {
    pub intent_id: String,
    pub intent_type: kinematics_core::intent::IntentClass,
    pub direction: Vec3,
    pub magnitude: f32,
    pub compressed_bytes: usize,
    pub original_samples: usize,
    pub compression_ratio: f64,
    pub packed_hex: String,
    pub elapsed_us: u64,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeTrajectoryRequest {
    pub waypoints: Vec<Vec3>,
    pub max_velocity: f64,
}

#[derive(Debug, Serialize)]
pub struct OptimizeTrajectoryResponse {
    pub segments: Vec<kinematics_core::trajectory::SegmentProfile>,
    pub total_time: f64,
    pub total_distance: f64,
    pub max_velocity_reached: f64,
    pub elapsed_us: u64,
}

#[derive(Debug, Serialize)]
pub struct ChainPresetSummary {
    pub id: String,
    pub name: String,
    pub dof: usize,
    pub joint_type_summary: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
