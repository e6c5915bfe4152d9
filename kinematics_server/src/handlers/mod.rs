pub mod chains;
pub mod compress_intent;
pub mod health;
pub mod optimize_trajectory;
pub mod solve_fk;
pub mod solve_ik;
pub mod stats;

use crate::error::ApiError;
use kinematics_core::chain::{implicit_chain, uniform_chain};
use kinematics_core::{presets, Chain};

/// Shared chain-resolution logic: a named preset takes priority, then
/// explicit link lengths, then (IK-only) a bare joint count with the
/// default 0.3 m uniform link length.
pub(crate) fn resolve_chain(spec: &crate::api_types::ChainSpec) -> Result<Chain, ApiError> {
    if let Some(id) = &spec.chain_id {
        return presets::get(id)
            .map(|preset| preset.chain.clone())
            .ok_or_else(|| {
                kinematics_core::KinematicsError::validation(format!("unknown chain_id '{id}'"))
                    .into()
            });
    }
    if let Some(lengths) = &spec.link_lengths {
        return Ok(implicit_chain(lengths)?);
    }
    if let Some(count) = spec.joint_count {
        return Ok(uniform_chain(count, 0.3)?);
    }
    Err(kinematics_core::KinematicsError::validation(
        "request must supply one of chain_id, link_lengths, or joint_count",
    )
    .into())
}
