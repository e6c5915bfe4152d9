//! Pure numerics for the kinematics engine: forward/inverse kinematics,
//! motion-intent compression, and waypoint trajectory optimization.
//!
//! This crate performs no I/O; `kinematics_server` wraps it behind HTTP.

pub mod chain;
pub mod error;
pub mod fk;
pub mod ik;
pub mod intent;
pub mod math;
pub mod presets;
pub mod stats;
pub mod trajectory;

pub use chain::{Chain, Joint, JointLimits, JointType};
pub use error::{KinematicsError, KinematicsResult};
pub use math::{Quaternion, Vec3};
