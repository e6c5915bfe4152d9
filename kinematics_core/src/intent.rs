//! Motion-intent compression: classifies a window of position samples into
//! a coarse intent class and packs it into a fixed 8-byte wire record.

use crate::error::{KinematicsError, KinematicsResult};
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Below this mean speed (m/s) *and* path length (meters) combined, a window
/// reads as stationary rather than any deliberate motion.
const IDLE_SPEED_THRESHOLD: f64 = 0.01;
const IDLE_PATH_THRESHOLD: f64 = 0.005;
/// Net displacement under this fraction of path length implies the motion
/// doubled back on itself (grasp/release) rather than traversing point to
/// point.
const RETRACE_RATIO_THRESHOLD: f64 = 0.3;
/// Net displacement at or above this fraction of path length is a near-
/// straight-line reach, independent of speed.
const REACH_RATIO_THRESHOLD: f64 = 0.7;
/// A retrace motion is a grasp (closing) when it ends slower than this
/// fraction of its own peak speed; otherwise it's a release (opening).
const GRASP_TERMINAL_PEAK_RATIO: f64 = 0.1;

/// Uncompressed per-sample wire cost: an 8-byte timestamp plus a 24-byte
/// (3 x f64) position, used to compute `compression_ratio`.
const ORIGINAL_BYTES_PER_SAMPLE: usize = 32;
pub const PACKED_RECORD_BYTES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentClass {
    Idle,
    Grasp,
    Release,
    Traverse,
    Reach,
}

impl IntentClass {
    fn tag(self) -> u8 {
        match self {
            IntentClass::Idle => 0,
            IntentClass::Grasp => 1,
            IntentClass::Release => 2,
            IntentClass::Traverse => 3,
            IntentClass::Reach => 4,
        }
    }

    fn from_tag(tag: u8) -> KinematicsResult<Self> {
        match tag {
            0 => Ok(IntentClass::Idle),
            1 => Ok(IntentClass::Grasp),
            2 => Ok(IntentClass::Release),
            3 => Ok(IntentClass::Traverse),
            4 => Ok(IntentClass::Reach),
            other => Err(KinematicsError::validation(format!(
                "unknown intent class tag {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionSample {
    pub timestamp: f64,
    pub position: Vec3,
    #[serde(default)]
    pub velocity: Option<Vec3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedIntent {
    pub class: IntentClass,
    pub direction: Vec3,
    pub magnitude: f32,
    pub compression_ratio: f64,
    /// The packed 8-byte record, base64-free: callers needing the wire bytes
    /// call [`pack`] directly.
    pub packed: [u8; PACKED_RECORD_BYTES],
}

/// Classify and compress a window of samples (chronological order assumed),
/// sampled at `sample_rate_hz`.
pub fn compress(samples: &[MotionSample], sample_rate_hz: f64) -> KinematicsResult<CompressedIntent> {
    if samples.len() < 2 {
        return Err(KinematicsError::validation(
            "intent compression requires at least 2 samples",
        ));
    }
    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(KinematicsError::validation(
            "sample_rate_hz must be finite and positive",
        ));
    }
    for sample in samples {
        sample.position.validate()?;
        if let Some(velocity) = sample.velocity {
            velocity.validate()?;
        }
        if !sample.timestamp.is_finite() {
            return Err(KinematicsError::validation("sample timestamp must be finite"));
        }
    }
    for pair in samples.windows(2) {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(KinematicsError::validation(
                "sample timestamps must be non-decreasing",
            ));
        }
    }

    let first = samples.first().unwrap();
    let last = samples.last().unwrap();

    let net_displacement = last.position - first.position;
    let net_distance = net_displacement.norm();

    let mut path_length = 0.0;
    for pair in samples.windows(2) {
        path_length += (pair[1].position - pair[0].position).norm();
    }

    let speeds = sample_speeds(samples);
    let average_speed = speeds.iter().sum::<f64>() / speeds.len() as f64;
    let peak_speed = speeds.iter().cloned().fold(0.0_f64, f64::max);
    let terminal_speed = *speeds.last().unwrap();

    let class = classify(net_distance, path_length, average_speed, peak_speed, terminal_speed);

    let direction = if net_distance > 1e-9 {
        net_displacement.scale(1.0 / net_distance)
    } else {
        Vec3::ZERO
    };

    let magnitude = net_distance as f32;
    let packed = pack(class, direction, magnitude);

    let original_bytes = samples.len() * ORIGINAL_BYTES_PER_SAMPLE;
    let compression_ratio = original_bytes as f64 / PACKED_RECORD_BYTES as f64;

    Ok(CompressedIntent {
        class,
        direction,
        magnitude,
        compression_ratio,
        packed,
    })
}

/// Per-sample speed: the supplied velocity's magnitude when present,
/// otherwise a finite difference against the previous position (the first
/// sample, having no predecessor, is assigned speed 0).
fn sample_speeds(samples: &[MotionSample]) -> Vec<f64> {
    if samples.iter().all(|s| s.velocity.is_some()) {
        return samples
            .iter()
            .map(|s| s.velocity.unwrap().norm())
            .collect();
    }
    let mut speeds = Vec::with_capacity(samples.len());
    speeds.push(0.0);
    for pair in samples.windows(2) {
        let dt = (pair[1].timestamp - pair[0].timestamp).max(1e-9);
        let distance = (pair[1].position - pair[0].position).norm();
        speeds.push(distance / dt);
    }
    speeds
}

/// Top-down decision table: the first matching row wins.
fn classify(
    net_distance: f64,
    path_length: f64,
    average_speed: f64,
    peak_speed: f64,
    terminal_speed: f64,
) -> IntentClass {
    if average_speed < IDLE_SPEED_THRESHOLD && path_length < IDLE_PATH_THRESHOLD {
        return IntentClass::Idle;
    }

    let retrace_ratio = net_distance / path_length.max(1e-9);

    if retrace_ratio < RETRACE_RATIO_THRESHOLD {
        return if terminal_speed < GRASP_TERMINAL_PEAK_RATIO * peak_speed {
            IntentClass::Grasp
        } else {
            IntentClass::Release
        };
    }

    if retrace_ratio >= REACH_RATIO_THRESHOLD {
        return IntentClass::Reach;
    }

    IntentClass::Traverse
}

/// Pack a classified intent into the 8-byte wire record: tag byte, 3 signed
/// int8 direction components scaled by 127, little-endian f32 magnitude.
pub fn pack(class: IntentClass, direction: Vec3, magnitude: f32) -> [u8; PACKED_RECORD_BYTES] {
    let mut buf = [0u8; PACKED_RECORD_BYTES];
    buf[0] = class.tag();
    buf[1] = quantize_component(direction.x());
    buf[2] = quantize_component(direction.y());
    buf[3] = quantize_component(direction.z());
    buf[4..8].copy_from_slice(&magnitude.to_le_bytes());
    buf
}

fn quantize_component(v: f64) -> u8 {
    (v.clamp(-1.0, 1.0) * 127.0).round() as i8 as u8
}

fn dequantize_component(b: u8) -> f64 {
    (b as i8) as f64 / 127.0
}

/// Unpack a wire record back into its class, direction, and magnitude.
pub fn unpack(buf: &[u8; PACKED_RECORD_BYTES]) -> KinematicsResult<(IntentClass, Vec3, f32)> {
    let class = IntentClass::from_tag(buf[0])?;
    let direction = Vec3::new(
        dequantize_component(buf[1]),
        dequantize_component(buf[2]),
        dequantize_component(buf[3]),
    );
    let magnitude = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    Ok((class, direction, magnitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64, x: f64, y: f64, z: f64) -> MotionSample {
        MotionSample {
            timestamp: t,
            position: Vec3::new(x, y, z),
            velocity: None,
        }
    }

    fn sample_with_velocity(t: f64, x: f64, y: f64, z: f64, vx: f64, vy: f64, vz: f64) -> MotionSample {
        MotionSample {
            timestamp: t,
            position: Vec3::new(x, y, z),
            velocity: Some(Vec3::new(vx, vy, vz)),
        }
    }

    #[test]
    fn stationary_window_classifies_idle() {
        let samples = vec![sample(0.0, 1.0, 1.0, 1.0), sample(0.1, 1.0005, 1.0, 1.0)];
        let out = compress(&samples, 10.0).unwrap();
        assert_eq!(out.class, IntentClass::Idle);
    }

    #[test]
    fn long_straight_fast_motion_classifies_reach() {
        let samples: Vec<_> = (0..10)
            .map(|i| sample(i as f64 * 0.01, i as f64 * 0.1, 0.0, 0.0))
            .collect();
        let out = compress(&samples, 100.0).unwrap();
        assert_eq!(out.class, IntentClass::Reach);
    }

    #[test]
    fn long_straight_slow_motion_still_classifies_reach() {
        // A straight-line displacement is a reach regardless of how slowly
        // it's traversed: ‖d‖/L is speed-independent.
        let samples: Vec<_> = (0..10)
            .map(|i| sample(i as f64 * 1.0, i as f64 * 0.1, 0.0, 0.0))
            .collect();
        let out = compress(&samples, 1.0).unwrap();
        assert_eq!(out.class, IntentClass::Reach);
    }

    #[test]
    fn zigzag_path_with_partial_retrace_classifies_traverse() {
        let samples = vec![
            sample(0.0, 0.0, 0.0, 0.0),
            sample(0.1, 1.0, 0.0, 0.0),
            sample(0.2, 0.6, 0.0, 0.0),
        ];
        let out = compress(&samples, 10.0).unwrap();
        assert_eq!(out.class, IntentClass::Traverse);
    }

    #[test]
    fn decelerating_retrace_classifies_grasp() {
        let samples = vec![
            sample_with_velocity(0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            sample_with_velocity(0.1, 0.2, 0.0, 0.0, 1.0, 0.0, 0.0),
            sample_with_velocity(0.2, 0.05, 0.0, 0.0, 0.05, 0.0, 0.0),
        ];
        let out = compress(&samples, 10.0).unwrap();
        assert_eq!(out.class, IntentClass::Grasp);
    }

    #[test]
    fn fast_ending_retrace_classifies_release() {
        let samples = vec![
            sample_with_velocity(0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            sample_with_velocity(0.1, 0.2, 0.0, 0.0, 1.0, 0.0, 0.0),
            sample_with_velocity(0.2, 0.05, 0.0, 0.0, 0.5, 0.0, 0.0),
        ];
        let out = compress(&samples, 10.0).unwrap();
        assert_eq!(out.class, IntentClass::Release);
    }

    #[test]
    fn pack_unpack_round_trips_within_quantization_error() {
        let direction = Vec3::new(0.6, -0.8, 0.0);
        let packed = pack(IntentClass::Grasp, direction, 0.25);
        let (class, unpacked_dir, magnitude) = unpack(&packed).unwrap();
        assert_eq!(class, IntentClass::Grasp);
        assert!((unpacked_dir.x() - direction.x()).abs() < 0.01);
        assert!((unpacked_dir.y() - direction.y()).abs() < 0.01);
        assert_eq!(magnitude, 0.25_f32);
    }

    #[test]
    fn compression_ratio_matches_sample_count_formula() {
        let samples = vec![sample(0.0, 0.0, 0.0, 0.0), sample(0.1, 0.1, 0.0, 0.0)];
        let out = compress(&samples, 10.0).unwrap();
        assert_eq!(out.compression_ratio, (2 * 32) as f64 / 8.0);
    }

    #[test]
    fn rejects_single_sample_window() {
        let samples = vec![sample(0.0, 0.0, 0.0, 0.0)];
        assert!(compress(&samples, 10.0).is_err());
    }

    #[test]
    fn rejects_non_positive_sample_rate() {
        let samples = vec![sample(0.0, 0.0, 0.0, 0.0), sample(0.1, 0.1, 0.0, 0.0)];
        assert!(compress(&samples, 0.0).is_err());
    }

    #[test]
    fn rejects_non_monotonic_timestamps() {
        let samples = vec![sample(0.1, 0.0, 0.0, 0.0), sample(0.0, 0.1, 0.0, 0.0)];
        assert!(compress(&samples, 10.0).is_err());
    }

    #[test]
    fn rejects_unknown_tag_on_unpack() {
        let mut buf = [0u8; PACKED_RECORD_BYTES];
        buf[0] = 99;
        assert!(unpack(&buf).is_err());
    }
}
