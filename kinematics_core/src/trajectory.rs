//! Waypoint trajectory optimization: per-segment trapezoidal (or triangular,
//! when the segment is too short to reach cruise speed) velocity profiles
//! under a global velocity ceiling and a fixed acceleration constant.

use crate::error::{KinematicsError, KinematicsResult};
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Fixed acceleration/deceleration magnitude (m/s^2) applied to every
/// segment; not user-configurable.
pub const DEFAULT_ACCELERATION: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentProfile {
    pub from: Vec3,
    pub to: Vec3,
    pub distance: f64,
    pub peak_velocity: f64,
    pub accel_time: f64,
    pub cruise_time: f64,
    pub decel_time: f64,
    pub duration: f64,
    pub is_triangular: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryOutput {
    pub segments: Vec<SegmentProfile>,
    pub total_time: f64,
    pub total_distance: f64,
    pub max_velocity_reached: f64,
}

/// Build a trapezoidal/triangular velocity profile for each consecutive
/// pair of `waypoints`, capped by `max_velocity` and using a fixed
/// acceleration of [`DEFAULT_ACCELERATION`].
pub fn optimize(waypoints: &[Vec3], max_velocity: f64) -> KinematicsResult<TrajectoryOutput> {
    if waypoints.len() < 2 {
        return Err(KinematicsError::validation(
            "trajectory optimization requires at least 2 waypoints",
        ));
    }
    if !max_velocity.is_finite() || max_velocity <= 0.0 {
        return Err(KinematicsError::validation(
            "max_velocity must be finite and positive",
        ));
    }
    for wp in waypoints {
        wp.validate()?;
    }

    let accel = DEFAULT_ACCELERATION;
    let mut segments = Vec::with_capacity(waypoints.len() - 1);
    let mut total_time = 0.0;
    let mut total_distance = 0.0;
    let mut max_velocity_reached = 0.0_f64;

    for pair in waypoints.windows(2) {
        let from = pair[0];
        let to = pair[1];
        let distance = (to - from).norm();

        // Distance needed to accelerate to max_velocity and immediately
        // decelerate back to 0: the trapezoid degenerates to a triangle
        // when the segment is shorter than this.
        let accel_distance_at_cap = max_velocity * max_velocity / accel;

        let (peak_velocity, is_triangular) = if distance >= accel_distance_at_cap {
            (max_velocity, false)
        } else {
            ((distance * accel).sqrt(), true)
        };

        let accel_time = peak_velocity / accel;
        let decel_time = accel_time;
        let accel_distance = 0.5 * accel * accel_time * accel_time;
        let decel_distance = accel_distance;
        let cruise_distance = (distance - accel_distance - decel_distance).max(0.0);
        let cruise_time = if peak_velocity > 1e-12 {
            cruise_distance / peak_velocity
        } else {
            0.0
        };

        let duration = accel_time + cruise_time + decel_time;
        total_time += duration;
        total_distance += distance;
        max_velocity_reached = max_velocity_reached.max(peak_velocity);

        segments.push(SegmentProfile {
            from,
            to,
            distance,
            peak_velocity,
            accel_time,
            cruise_time,
            decel_time,
            duration,
            is_triangular,
        });
    }

    Ok(TrajectoryOutput {
        segments,
        total_time,
        total_distance,
        max_velocity_reached,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn long_segment_reaches_cruise_speed() {
        let waypoints = vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)];
        let out = optimize(&waypoints, 1.0).unwrap();
        let seg = &out.segments[0];
        assert!(!seg.is_triangular);
        assert_relative_eq!(seg.peak_velocity, 1.0, epsilon = 1e-9);
        assert!(seg.cruise_time > 0.0);
    }

    #[test]
    fn short_segment_never_exceeds_cap_and_is_triangular() {
        let waypoints = vec![Vec3::ZERO, Vec3::new(0.05, 0.0, 0.0)];
        let out = optimize(&waypoints, 5.0).unwrap();
        let seg = &out.segments[0];
        assert!(seg.is_triangular);
        assert!(seg.peak_velocity < 5.0);
        assert_relative_eq!(seg.cruise_time, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn multi_segment_durations_sum_to_total() {
        let waypoints = vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let out = optimize(&waypoints, 2.0).unwrap();
        let summed: f64 = out.segments.iter().map(|s| s.duration).sum();
        assert_relative_eq!(summed, out.total_time, epsilon = 1e-9);
        assert_eq!(out.segments.len(), 3);
    }

    #[test]
    fn max_velocity_reached_is_the_highest_segment_peak() {
        let waypoints = vec![
            Vec3::ZERO,
            Vec3::new(0.05, 0.0, 0.0),
            Vec3::new(10.05, 0.0, 0.0),
        ];
        let out = optimize(&waypoints, 1.0).unwrap();
        assert_relative_eq!(out.max_velocity_reached, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_single_waypoint() {
        assert!(optimize(&[Vec3::ZERO], 1.0).is_err());
    }

    #[test]
    fn rejects_non_positive_velocity_cap() {
        let waypoints = vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)];
        assert!(optimize(&waypoints, 0.0).is_err());
    }
}
