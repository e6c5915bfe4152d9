//! Vector and quaternion primitives shared by the FK/IK/trajectory modules.
//!
//! `Vec3` and `Quaternion` are the validated, serializable wire types; the
//! solvers convert to `nalgebra` types internally for the Jacobian and
//! damped-least-squares linear algebra.

use crate::error::{KinematicsError, KinematicsResult};
use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A 3-component vector in meters (position) or m/s (velocity).
///
/// Serializes as a 3-element JSON array, e.g. `[0.5, 0.3, 0.2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3(pub f64, pub f64, pub f64);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3(0.0, 0.0, 0.0);

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3(x, y, z)
    }

    pub fn x(&self) -> f64 {
        self.0
    }
    pub fn y(&self) -> f64 {
        self.1
    }
    pub fn z(&self) -> f64 {
        self.2
    }

    /// Reject NaN/Inf components.
    pub fn validate(&self) -> KinematicsResult<()> {
        if !self.0.is_finite() || !self.1.is_finite() || !self.2.is_finite() {
            return Err(KinematicsError::validation(
                "vector components must be finite",
            ));
        }
        Ok(())
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.0 * other.0 + self.1 * other.1 + self.2 * other.2
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3(
            self.1 * other.2 - self.2 * other.1,
            self.2 * other.0 - self.0 * other.2,
            self.0 * other.1 - self.1 * other.0,
        )
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn scale(&self, s: f64) -> Vec3 {
        Vec3(self.0 * s, self.1 * s, self.2 * s)
    }

    /// Unit vector, or `None` if the vector is (near) zero.
    pub fn normalized(&self) -> Option<Vec3> {
        let n = self.norm();
        if n < 1e-12 {
            None
        } else {
            Some(self.scale(1.0 / n))
        }
    }

    pub fn to_nalgebra(self) -> Vector3<f64> {
        Vector3::new(self.0, self.1, self.2)
    }

    pub fn from_nalgebra(v: Vector3<f64>) -> Self {
        Vec3(v.x, v.y, v.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3(self.0 - rhs.0, self.1 - rhs.1, self.2 - rhs.2)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3(-self.0, -self.1, -self.2)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        self.scale(rhs)
    }
}

/// A unit quaternion orientation `(x, y, z, w)`. Identity is `(0, 0, 0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn validate(&self) -> KinematicsResult<()> {
        if ![self.x, self.y, self.z, self.w].iter().all(|v| v.is_finite()) {
            return Err(KinematicsError::validation(
                "quaternion components must be finite",
            ));
        }
        Ok(())
    }

    /// Rotation of `angle` radians about `axis` (need not be pre-normalized).
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let axis = axis.normalized().unwrap_or(Vec3(0.0, 0.0, 1.0));
        let half = angle / 2.0;
        let s = half.sin();
        Quaternion {
            x: axis.0 * s,
            y: axis.1 * s,
            z: axis.2 * s,
            w: half.cos(),
        }
    }

    /// Standard Hamilton product `self * rhs`. Composing rotations this way,
    /// `a.mul(&b)` applies `b` first (in `a`'s frame) then `a` — the usual
    /// "world = parent * local" convention for chaining joint frames.
    pub fn mul(&self, rhs: &Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }

    pub fn normalize(&self) -> Quaternion {
        let n = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if n < 1e-12 {
            return Quaternion::IDENTITY;
        }
        Quaternion {
            x: self.x / n,
            y: self.y / n,
            z: self.z / n,
            w: self.w / n,
        }
    }

    /// Conjugate, equal to the inverse for a unit quaternion.
    pub fn inverse(&self) -> Quaternion {
        Quaternion {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let uq = self.to_nalgebra();
        Vec3::from_nalgebra(uq * v.to_nalgebra())
    }

    pub fn to_nalgebra(self) -> UnitQuaternion<f64> {
        UnitQuaternion::new_normalize(nalgebra::Quaternion::new(self.w, self.x, self.y, self.z))
    }

    pub fn from_nalgebra(q: UnitQuaternion<f64>) -> Self {
        let q = q.into_inner();
        Quaternion {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}

/// A 3x3 rotation matrix, used internally while walking a chain.
pub(crate) fn rotation_matrix(q: Quaternion) -> Matrix3<f64> {
    q.to_nalgebra().to_rotation_matrix().into_inner()
}
