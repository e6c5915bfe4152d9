//! Read-only chain preset registry. Built once, safe for concurrent readers
//! without synchronization — no writer ever touches it after startup.

use crate::chain::{Chain, Joint};
use crate::math::Vec3;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainPreset {
    pub id: String,
    pub name: String,
    pub dof: usize,
    pub joint_type_summary: String,
    pub description: String,
    pub chain: Chain,
}

fn axis_z() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}
fn axis_y() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}
fn axis_x() -> Vec3 {
    Vec3::new(1.0, 0.0, 0.0)
}

fn human_arm() -> ChainPreset {
    let lengths = [0.15, 0.30, 0.05, 0.25, 0.05, 0.08, 0.12];
    let axes = [
        axis_z(),
        axis_y(),
        axis_x(),
        axis_y(),
        axis_z(),
        axis_y(),
        axis_x(),
    ];
    let joints = lengths
        .into_iter()
        .zip(axes)
        .map(|(len, axis)| Joint::revolute(axis, len))
        .collect();
    ChainPreset {
        id: "human_arm".to_string(),
        name: "Human Arm".to_string(),
        dof: 7,
        joint_type_summary: "7 revolute".to_string(),
        description: "Anthropomorphic 7-DOF arm: shoulder (3), elbow (1), wrist (3).".to_string(),
        chain: Chain::new(joints),
    }
}

fn human_leg() -> ChainPreset {
    let lengths = [0.10, 0.45, 0.40, 0.05, 0.10, 0.15];
    let axes = [axis_z(), axis_y(), axis_y(), axis_x(), axis_y(), axis_z()];
    let joints = lengths
        .into_iter()
        .zip(axes)
        .map(|(len, axis)| Joint::revolute(axis, len))
        .collect();
    ChainPreset {
        id: "human_leg".to_string(),
        name: "Human Leg".to_string(),
        dof: 6,
        joint_type_summary: "6 revolute".to_string(),
        description: "Anthropomorphic 6-DOF leg: hip (3), knee (1), ankle (2).".to_string(),
        chain: Chain::new(joints),
    }
}

fn robotic_arm_6dof() -> ChainPreset {
    let lengths = [0.10, 0.40, 0.35, 0.10, 0.10, 0.08];
    let axes = [axis_z(), axis_y(), axis_y(), axis_z(), axis_y(), axis_z()];
    let joints = lengths
        .into_iter()
        .zip(axes)
        .map(|(len, axis)| Joint::revolute(axis, len))
        .collect();
    ChainPreset {
        id: "robotic_arm_6dof".to_string(),
        name: "Robotic Arm (6-DOF)".to_string(),
        dof: 6,
        joint_type_summary: "6 revolute".to_string(),
        description: "Industrial 6-axis articulated arm, common in pick-and-place cells."
            .to_string(),
        chain: Chain::new(joints),
    }
}

fn delta_robot() -> ChainPreset {
    let axes = [axis_z(), axis_z(), axis_z()];
    let joints = axes
        .into_iter()
        .map(|axis| Joint::prismatic(axis, 0.20).with_limits(0.0, 0.35))
        .collect();
    ChainPreset {
        id: "delta_robot".to_string(),
        name: "Delta Robot".to_string(),
        dof: 3,
        joint_type_summary: "3 prismatic".to_string(),
        description: "Parallel delta manipulator modeled as three independent prismatic legs."
            .to_string(),
        chain: Chain::new(joints),
    }
}

fn scara() -> ChainPreset {
    let joints = vec![
        Joint::revolute(axis_z(), 0.25),
        Joint::revolute(axis_z(), 0.20),
        Joint::revolute(axis_z(), 0.0),
        Joint::prismatic(axis_z(), 0.0).with_limits(-0.15, 0.0),
    ];
    ChainPreset {
        id: "scara".to_string(),
        name: "SCARA".to_string(),
        dof: 4,
        joint_type_summary: "3 revolute + 1 prismatic".to_string(),
        description: "Selective Compliance Assembly Robot Arm: two revolute links, a wrist roll, and a vertical plunge.".to_string(),
        chain: Chain::new(joints),
    }
}

pub static PRESETS: Lazy<Vec<ChainPreset>> = Lazy::new(|| {
    vec![
        human_arm(),
        human_leg(),
        robotic_arm_6dof(),
        delta_robot(),
        scara(),
    ]
});

pub fn all() -> &'static [ChainPreset] {
    &PRESETS
}

pub fn get(id: &str) -> Option<&'static ChainPreset> {
    PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_five_presets_in_order() {
        let ids: Vec<_> = all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["human_arm", "human_leg", "robotic_arm_6dof", "delta_robot", "scara"]
        );
    }

    #[test]
    fn preset_dof_matches_chain_length() {
        for preset in all() {
            assert_eq!(preset.dof, preset.chain.dof());
            preset.chain.validate().unwrap();
        }
    }

    #[test]
    fn lookup_is_case_sensitive_and_total() {
        assert!(get("scara").is_some());
        assert!(get("unknown_chain").is_none());
    }
}
