//! Forward kinematics: composes per-joint transforms along a serial chain
//! into per-joint world positions and an end-effector pose.

use crate::chain::{Chain, JointType, LINK_AXIS};
use crate::error::{KinematicsError, KinematicsResult};
use crate::math::{Quaternion, Vec3};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

const NUMERIC_JACOBIAN_STEP: f64 = 1e-6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkOutput {
    pub end_effector_position: Vec3,
    pub end_effector_orientation: Quaternion,
    pub joint_positions: Vec<Vec3>,
}

/// One joint's frame during the base-to-tip walk: the axis and position the
/// Jacobian needs (as of just before the joint's own motion is applied), and
/// the frame after its motion is applied (feeding the next joint).
pub(crate) struct JointFrame {
    pub(crate) axis_world: Vec3,
    pub(crate) position_before: Vec3,
    pub(crate) orientation_after: Quaternion,
    pub(crate) position_after: Vec3,
}

pub(crate) fn validate_coordinates(chain: &Chain, q: &[f64]) -> KinematicsResult<()> {
    chain.validate()?;
    if q.len() != chain.dof() {
        return Err(KinematicsError::validation(format!(
            "expected {} joint coordinates, got {}",
            chain.dof(),
            q.len()
        )));
    }
    if q.iter().any(|v| !v.is_finite()) {
        return Err(KinematicsError::validation(
            "joint coordinates must be finite",
        ));
    }
    Ok(())
}

/// Walk the chain from base to tip, recording each joint's pre-motion axis
/// and position (for the Jacobian) and post-motion frame (for the next
/// joint and the final pose).
pub(crate) fn walk(chain: &Chain, q: &[f64]) -> Vec<JointFrame> {
    let mut orientation = Quaternion::IDENTITY;
    let mut position = Vec3::ZERO;
    let mut frames = Vec::with_capacity(chain.dof());

    for (joint, &qi) in chain.joints.iter().zip(q) {
        let axis_world = orientation.rotate(joint.axis);
        let position_before = position;

        match joint.joint_type {
            JointType::Revolute => {
                let delta = Quaternion::from_axis_angle(joint.axis, qi);
                orientation = orientation.mul(&delta);
                position = position + orientation.rotate(LINK_AXIS.scale(joint.link_length));
            }
            JointType::Prismatic => {
                position = position + axis_world.scale(joint.link_length + qi);
            }
        }

        frames.push(JointFrame {
            axis_world,
            position_before,
            orientation_after: orientation,
            position_after: position,
        });
    }

    frames
}

/// Evaluate forward kinematics for `chain` at joint coordinates `q`.
pub fn evaluate(chain: &Chain, q: &[f64]) -> KinematicsResult<FkOutput> {
    validate_coordinates(chain, q)?;
    let frames = walk(chain, q);

    let mut joint_positions = Vec::with_capacity(frames.len() + 1);
    joint_positions.push(Vec3::ZERO);
    joint_positions.extend(frames.iter().map(|f| f.position_after));

    let (end_effector_position, end_effector_orientation) = match frames.last() {
        Some(last) => (last.position_after, last.orientation_after.normalize()),
        None => (Vec3::ZERO, Quaternion::IDENTITY),
    };

    Ok(FkOutput {
        end_effector_position,
        end_effector_orientation,
        joint_positions,
    })
}

/// Analytical 3xN position Jacobian: cross-product form for revolute joints,
/// the axis itself for prismatic joints.
pub fn jacobian_analytic(chain: &Chain, q: &[f64]) -> KinematicsResult<DMatrix<f64>> {
    validate_coordinates(chain, q)?;
    let frames = walk(chain, q);
    let tip = frames
        .last()
        .map(|f| f.position_after)
        .unwrap_or(Vec3::ZERO);

    let mut jac = DMatrix::<f64>::zeros(3, chain.dof());
    for (i, (joint, frame)) in chain.joints.iter().zip(&frames).enumerate() {
        let column = match joint.joint_type {
            JointType::Revolute => frame.axis_world.cross(&(tip - frame.position_before)),
            JointType::Prismatic => frame.axis_world,
        };
        jac.set_column(i, &column.to_nalgebra());
    }
    Ok(jac)
}

/// 3xN (position-only) or 6xN (position + small-angle orientation) geometric
/// Jacobian, built from the same base-to-tip walk as [`evaluate`]. Used by
/// the IK solver's damped-least-squares step.
pub(crate) fn jacobian_geometric(
    chain: &Chain,
    q: &[f64],
    include_orientation: bool,
) -> KinematicsResult<DMatrix<f64>> {
    validate_coordinates(chain, q)?;
    let frames = walk(chain, q);
    let tip = frames
        .last()
        .map(|f| f.position_after)
        .unwrap_or(Vec3::ZERO);

    let rows = if include_orientation { 6 } else { 3 };
    let mut jac = DMatrix::<f64>::zeros(rows, chain.dof());

    for (i, (joint, frame)) in chain.joints.iter().zip(&frames).enumerate() {
        let position_column = match joint.joint_type {
            JointType::Revolute => frame.axis_world.cross(&(tip - frame.position_before)),
            JointType::Prismatic => frame.axis_world,
        };
        jac[(0, i)] = position_column.x();
        jac[(1, i)] = position_column.y();
        jac[(2, i)] = position_column.z();

        if include_orientation {
            let angular_column = match joint.joint_type {
                JointType::Revolute => frame.axis_world,
                JointType::Prismatic => Vec3::ZERO,
            };
            jac[(3, i)] = angular_column.x();
            jac[(4, i)] = angular_column.y();
            jac[(5, i)] = angular_column.z();
        }
    }

    Ok(jac)
}

/// Numerical 3xN position Jacobian via central differences, used to
/// cross-check the analytical form.
pub fn jacobian_numeric(chain: &Chain, q: &[f64]) -> KinematicsResult<DMatrix<f64>> {
    validate_coordinates(chain, q)?;
    let mut jac = DMatrix::<f64>::zeros(3, chain.dof());
    let mut probe = q.to_vec();

    for i in 0..chain.dof() {
        let original = probe[i];

        probe[i] = original + NUMERIC_JACOBIAN_STEP;
        let plus = evaluate(chain, &probe)?.end_effector_position;

        probe[i] = original - NUMERIC_JACOBIAN_STEP;
        let minus = evaluate(chain, &probe)?.end_effector_position;

        probe[i] = original;

        let derivative = (plus - minus).scale(1.0 / (2.0 * NUMERIC_JACOBIAN_STEP));
        jac.set_column(i, &derivative.to_nalgebra());
    }

    Ok(jac)
}
