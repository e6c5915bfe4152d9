//! Serial kinematic chain model: joints, limits, and the implicit-chain
//! construction used when a request supplies only `joint_angles` /
//! `link_lengths` without a named preset.

use crate::error::{KinematicsError, KinematicsResult};
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Maximum degrees of freedom accepted by any chain (§5 resource bound).
pub const MAX_DOF: usize = 64;

/// Local link direction convention: after a joint's rotation is applied, the
/// link extends along local +X.
pub const LINK_AXIS: Vec3 = Vec3(1.0, 0.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    Revolute,
    Prismatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    pub lo: f64,
    pub hi: f64,
}

impl JointLimits {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lo.min(self.hi), self.lo.max(self.hi))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    #[serde(rename = "type")]
    pub joint_type: JointType,
    pub axis: Vec3,
    pub link_length: f64,
    pub limits: Option<JointLimits>,
}

impl Joint {
    pub fn revolute(axis: Vec3, link_length: f64) -> Self {
        Joint {
            joint_type: JointType::Revolute,
            axis,
            link_length,
            limits: None,
        }
    }

    pub fn prismatic(axis: Vec3, link_length: f64) -> Self {
        Joint {
            joint_type: JointType::Prismatic,
            axis,
            link_length,
            limits: None,
        }
    }

    pub fn with_limits(mut self, lo: f64, hi: f64) -> Self {
        self.limits = Some(JointLimits { lo, hi });
        self
    }

    fn validate(&self) -> KinematicsResult<()> {
        self.axis.validate()?;
        let norm = self.axis.norm();
        if (norm - 1.0).abs() > 1e-6 {
            return Err(KinematicsError::validation(
                "joint axis must be a unit vector",
            ));
        }
        if !self.link_length.is_finite() || self.link_length < 0.0 {
            return Err(KinematicsError::validation(
                "link_length must be finite and non-negative",
            ));
        }
        if let Some(limits) = &self.limits {
            if !limits.lo.is_finite() || !limits.hi.is_finite() {
                return Err(KinematicsError::validation("joint limits must be finite"));
            }
        }
        Ok(())
    }
}

/// An ordered sequence of joints. `joint_count = len(joints)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub joints: Vec<Joint>,
}

impl Chain {
    pub fn new(joints: Vec<Joint>) -> Self {
        Chain { joints }
    }

    pub fn dof(&self) -> usize {
        self.joints.len()
    }

    pub fn validate(&self) -> KinematicsResult<()> {
        if self.joints.is_empty() {
            return Err(KinematicsError::validation("chain must have at least one joint"));
        }
        if self.joints.len() > MAX_DOF {
            return Err(KinematicsError::capability(format!(
                "chain has {} joints, exceeding the {} DOF ceiling",
                self.joints.len(),
                MAX_DOF
            )));
        }
        for joint in &self.joints {
            joint.validate()?;
        }
        Ok(())
    }
}

/// Build an implicit chain of `link_lengths.len()` revolute joints using the
/// documented default axis convention: joint 0 rotates about `Z`, every
/// subsequent joint about `Y`.
pub fn implicit_chain(link_lengths: &[f64]) -> KinematicsResult<Chain> {
    if link_lengths.is_empty() {
        return Err(KinematicsError::validation("link_lengths must not be empty"));
    }
    if link_lengths.len() > MAX_DOF {
        return Err(KinematicsError::capability(format!(
            "{} links exceeds the {} DOF ceiling",
            link_lengths.len(),
            MAX_DOF
        )));
    }
    let joints = link_lengths
        .iter()
        .enumerate()
        .map(|(i, &len)| {
            let axis = if i == 0 {
                Vec3::new(0.0, 0.0, 1.0)
            } else {
                Vec3::new(0.0, 1.0, 0.0)
            };
            Joint::revolute(axis, len)
        })
        .collect();
    let chain = Chain::new(joints);
    chain.validate()?;
    Ok(chain)
}

/// An implicit chain of `dof` revolute joints sharing a uniform link length,
/// used by IK when only a `joint_count` is given (no named chain, no
/// explicit link lengths).
pub fn uniform_chain(dof: usize, link_length: f64) -> KinematicsResult<Chain> {
    if dof == 0 || dof > MAX_DOF {
        return Err(KinematicsError::capability(format!(
            "joint_count must be in [1, {}]",
            MAX_DOF
        )));
    }
    implicit_chain(&vec![link_length; dof])
}
