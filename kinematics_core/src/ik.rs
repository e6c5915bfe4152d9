//! Damped least-squares (Levenberg-Marquardt) inverse kinematics over the
//! position (and optional orientation) Jacobian, with a cyclic-coordinate
//! descent fallback when the damped step stalls.

use crate::chain::Chain;
use crate::error::{KinematicsError, KinematicsResult};
use crate::fk::{self, JointFrame};
use crate::math::{Quaternion, Vec3};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const MAX_MAX_ITERATIONS: u32 = 10_000;
pub const MIN_TOLERANCE: f64 = 1e-12;

const LAMBDA_INIT: f64 = 0.01;
const LAMBDA_MAX: f64 = 1.0;
const LAMBDA_MIN: f64 = 1e-6;
const STALL_LIMIT: u32 = 5;
const STALL_IMPROVEMENT_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IkConstraints {
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for IkConstraints {
    fn default() -> Self {
        IkConstraints {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl IkConstraints {
    fn validate(&self) -> KinematicsResult<()> {
        if self.max_iterations == 0 || self.max_iterations > MAX_MAX_ITERATIONS {
            return Err(KinematicsError::capability(format!(
                "max_iterations must be in (0, {}]",
                MAX_MAX_ITERATIONS
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < MIN_TOLERANCE {
            return Err(KinematicsError::validation(format!(
                "tolerance must be finite and >= {}",
                MIN_TOLERANCE
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IkOutput {
    pub joint_angles: Vec<f64>,
    pub iterations: u32,
    pub converged: bool,
    pub error_distance: f64,
    pub elapsed_us: u64,
}

/// Solve for `target_position` (and optionally `target_orientation`) along
/// `chain`, cooperatively honoring `deadline` if one is supplied.
pub fn solve(
    chain: &Chain,
    target_position: Vec3,
    target_orientation: Option<Quaternion>,
    constraints: &IkConstraints,
    deadline: Option<Instant>,
) -> KinematicsResult<IkOutput> {
    chain.validate()?;
    constraints.validate()?;
    target_position.validate()?;
    if let Some(q) = target_orientation {
        q.validate()?;
    }

    let start = Instant::now();
    let dof = chain.dof();
    let mut q = initial_guess(chain);
    let mut lambda = LAMBDA_INIT;
    let mut stall_count = 0u32;
    let mut iterations = 0u32;
    let mut converged = false;
    let mut use_ccd = false;

    let mut best_q = q.clone();
    let mut best_position_error = position_error(chain, &q, target_position)?.norm();

    while iterations < constraints.max_iterations {
        let full_err = residual(chain, &q, target_position, target_orientation)?;
        let pos_err_norm = full_err.position_error.norm();
        if pos_err_norm < best_position_error {
            best_position_error = pos_err_norm;
            best_q = q.clone();
        }
        if full_err.vector.norm() <= constraints.tolerance {
            converged = true;
            break;
        }
        if let Some(dl) = deadline {
            if Instant::now() >= dl {
                break;
            }
        }

        iterations += 1;

        if use_ccd {
            q = ccd_sweep(chain, &q, target_position, target_orientation);
            continue;
        }

        let jac = fk::jacobian_geometric(chain, &q, target_orientation.is_some())?;
        let delta_q = match damped_solve(&jac, &full_err.vector, lambda, dof) {
            Some(d) => d,
            None => {
                lambda = (lambda * 10.0).min(LAMBDA_MAX);
                stall_count += 1;
                if lambda >= LAMBDA_MAX && stall_count >= STALL_LIMIT {
                    use_ccd = true;
                }
                continue;
            }
        };

        let candidate_q = apply_and_clamp(chain, &q, &delta_q);
        let candidate_err_norm =
            residual(chain, &candidate_q, target_position, target_orientation)?
                .vector
                .norm();
        let prior_err_norm = full_err.vector.norm();

        if candidate_err_norm < prior_err_norm {
            let improvement = (prior_err_norm - candidate_err_norm) / prior_err_norm.max(1e-12);
            q = candidate_q;
            lambda = (lambda * 0.5).max(LAMBDA_MIN);
            stall_count = if improvement < STALL_IMPROVEMENT_THRESHOLD {
                stall_count + 1
            } else {
                0
            };
        } else {
            lambda = (lambda * 10.0).min(LAMBDA_MAX);
            stall_count += 1;
        }

        if stall_count >= STALL_LIMIT && lambda >= LAMBDA_MAX {
            tracing::debug!("ik solver switching to CCD fallback after {stall_count} stalled steps");
            use_ccd = true;
        }
    }

    let last_pos_err = position_error(chain, &q, target_position)?.norm();
    if last_pos_err < best_position_error {
        best_position_error = last_pos_err;
        best_q = q;
    }

    let wrapped = wrap_revolute_for_reporting(chain, &best_q);

    Ok(IkOutput {
        joint_angles: wrapped,
        iterations,
        converged,
        error_distance: best_position_error,
        elapsed_us: start.elapsed().as_micros() as u64,
    })
}

fn initial_guess(chain: &Chain) -> Vec<f64> {
    chain
        .joints
        .iter()
        .map(|joint| match &joint.limits {
            Some(limits) => (limits.lo + limits.hi) / 2.0,
            None => 0.0,
        })
        .collect()
}

struct Residual {
    vector: DVector<f64>,
    position_error: Vec3,
}

fn position_error(chain: &Chain, q: &[f64], target_position: Vec3) -> KinematicsResult<Vec3> {
    let out = fk::evaluate(chain, q)?;
    Ok(target_position - out.end_effector_position)
}

fn orientation_error(target: Quaternion, current: Quaternion) -> Vec3 {
    let diff = target.mul(&current.inverse());
    Vec3::new(diff.x, diff.y, diff.z).scale(2.0)
}

fn residual(
    chain: &Chain,
    q: &[f64],
    target_position: Vec3,
    target_orientation: Option<Quaternion>,
) -> KinematicsResult<Residual> {
    let out = fk::evaluate(chain, q)?;
    let pos_err = target_position - out.end_effector_position;

    let vector = match target_orientation {
        Some(target_q) => {
            let orient_err = orientation_error(target_q, out.end_effector_orientation);
            DVector::from_vec(vec![
                pos_err.x(),
                pos_err.y(),
                pos_err.z(),
                orient_err.x(),
                orient_err.y(),
                orient_err.z(),
            ])
        }
        None => DVector::from_vec(vec![pos_err.x(), pos_err.y(), pos_err.z()]),
    };

    Ok(Residual {
        vector,
        position_error: pos_err,
    })
}

/// Solve `(JᵀJ + λ²I) Δq = Jᵀe`. Returns `None` if the damped normal matrix
/// is not positive-definite (irrecoverably singular at this damping level).
fn damped_solve(jac: &DMatrix<f64>, e: &DVector<f64>, lambda: f64, dof: usize) -> Option<Vec<f64>> {
    let jt = jac.transpose();
    let mut normal = &jt * jac;
    for i in 0..dof {
        normal[(i, i)] += lambda * lambda;
    }
    let rhs = &jt * e;
    normal
        .cholesky()
        .map(|chol| chol.solve(&rhs).iter().copied().collect())
}

fn apply_and_clamp(chain: &Chain, q: &[f64], delta: &[f64]) -> Vec<f64> {
    chain
        .joints
        .iter()
        .zip(q)
        .zip(delta)
        .map(|((joint, &qi), &di)| {
            let updated = qi + di;
            match &joint.limits {
                Some(limits) => limits.clamp(updated),
                None => updated,
            }
        })
        .collect()
}

/// One CCD sweep, tip to base: each joint picks the closed-form 1-DOF
/// adjustment that minimizes position error, holding all other joints fixed.
fn ccd_sweep(
    chain: &Chain,
    q: &[f64],
    target_position: Vec3,
    _target_orientation: Option<Quaternion>,
) -> Vec<f64> {
    let mut q = q.to_vec();

    for i in (0..chain.dof()).rev() {
        let frames = fk::walk(chain, &q);
        let frame: &JointFrame = &frames[i];
        let tip = frames.last().unwrap().position_after;
        let joint = &chain.joints[i];

        let new_qi = match joint.joint_type {
            crate::chain::JointType::Revolute => {
                let axis = frame.axis_world;
                let pivot = frame.position_before;
                let v1 = tip - pivot;
                let v2 = target_position - pivot;
                let v1_perp = v1 - axis.scale(axis.dot(&v1));
                let v2_perp = v2 - axis.scale(axis.dot(&v2));
                if v1_perp.norm() < 1e-9 || v2_perp.norm() < 1e-9 {
                    q[i]
                } else {
                    let cross = v1_perp.cross(&v2_perp);
                    let angle = axis.dot(&cross).atan2(v1_perp.dot(&v2_perp));
                    q[i] + angle
                }
            }
            crate::chain::JointType::Prismatic => {
                let axis = frame.axis_world;
                q[i] + axis.dot(&(target_position - tip))
            }
        };

        q[i] = match &joint.limits {
            Some(limits) => limits.clamp(new_qi),
            None => new_qi,
        };
    }

    q
}

/// Wrap revolute joint coordinates into `(-π, π]` for reporting only — this
/// never feeds back into the solve.
fn wrap_revolute_for_reporting(chain: &Chain, q: &[f64]) -> Vec<f64> {
    use std::f64::consts::PI;
    chain
        .joints
        .iter()
        .zip(q)
        .map(|(joint, &qi)| match joint.joint_type {
            crate::chain::JointType::Revolute => {
                let mut wrapped = (qi + PI).rem_euclid(2.0 * PI) - PI;
                if wrapped <= -PI {
                    wrapped = PI;
                }
                wrapped
            }
            crate::chain::JointType::Prismatic => qi,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::uniform_chain;
    use crate::presets;

    #[test]
    fn reaches_nearby_target_on_seven_dof_arm() {
        let preset = presets::get("human_arm").unwrap();
        let constraints = IkConstraints::default();
        let out = solve(
            &preset.chain,
            Vec3::new(0.3, 0.2, 0.1),
            None,
            &constraints,
            None,
        )
        .unwrap();

        assert!(out.converged, "expected convergence, got {out:?}");
        assert!(out.error_distance <= constraints.tolerance + 1e-9);
        assert_eq!(out.joint_angles.len(), preset.chain.dof());
    }

    #[test]
    fn fk_of_ik_solution_matches_target_within_tolerance() {
        let chain = uniform_chain(6, 0.3).unwrap();
        let constraints = IkConstraints::default();
        let target = Vec3::new(0.4, 0.3, 0.2);
        let out = solve(&chain, target, None, &constraints, None).unwrap();

        if out.converged {
            let fk_out = fk::evaluate(&chain, &out.joint_angles).unwrap();
            let err = (target - fk_out.end_effector_position).norm();
            assert!(err <= constraints.tolerance + 1e-9, "round-trip error {err}");
        }
    }

    #[test]
    fn unreachable_target_reports_non_convergence() {
        let chain = uniform_chain(3, 0.3).unwrap();
        let constraints = IkConstraints {
            max_iterations: 100,
            tolerance: 1e-6,
        };
        let out = solve(
            &chain,
            Vec3::new(100.0, 0.0, 0.0),
            None,
            &constraints,
            None,
        )
        .unwrap();

        assert!(!out.converged);
        assert!(out.error_distance > 0.1);
        assert_eq!(out.iterations, constraints.max_iterations);
    }

    #[test]
    fn rejects_non_finite_target() {
        let chain = uniform_chain(3, 0.3).unwrap();
        let constraints = IkConstraints::default();
        let result = solve(
            &chain,
            Vec3::new(f64::INFINITY, 0.0, 0.0),
            None,
            &constraints,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_excessive_max_iterations() {
        let chain = uniform_chain(3, 0.3).unwrap();
        let constraints = IkConstraints {
            max_iterations: MAX_MAX_ITERATIONS + 1,
            tolerance: 1e-6,
        };
        let result = solve(&chain, Vec3::new(0.1, 0.1, 0.1), None, &constraints, None);
        assert!(result.is_err());
    }
}
