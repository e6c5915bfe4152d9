//! Error taxonomy for the kinematics engine core.
//!
//! Convergence failures and cooperative timeouts are *not* errors — both are
//! reported as `converged: false` inside a normal `Ok` solver output, per the
//! engine's error-handling design. This enum only covers validation,
//! capability, and genuinely internal failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KinematicsError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("capability error: {0}")]
    Capability(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type KinematicsResult<T> = Result<T, KinematicsError>;

impl KinematicsError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn capability(msg: impl Into<String>) -> Self {
        Self::Capability(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
