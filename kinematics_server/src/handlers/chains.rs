use crate::api_types::ChainPresetSummary;
use axum::Json;
use kinematics_core::presets;

pub async fn list_chains() -> Json<Vec<ChainPresetSummary>> {
    let summaries = presets::all()
        .iter()
        .map(|preset| ChainPresetSummary {
            id: preset.id.clone(),
            name: preset.name.clone(),
            dof: preset.dof,
            joint_type_summary: preset.joint_type_summary.clone(),
            description: preset.description.clone(),
        })
        .collect();
    Json(summaries)
}
