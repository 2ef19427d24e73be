//! Quaternion — представление ориентации (f64)
//!
//! Здесь используется только как read-only source для конвертации в Euler.

use std::f64::consts::FRAC_PI_2;

use bevy::math::DQuat;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::Vector3;

/// Порог gimbal lock для `test = x*y + z*w`.
///
/// 0.499, а не 0.5: запас, чтобы asin/atan2 не выходили из домена около
/// точной сингулярности.
pub const GIMBAL_LOCK_THRESHOLD: f64 = 0.499;

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Кватернион из Euler углов (pitch=x, yaw=y, roll=z)
    ///
    /// Обратная операция к `to_euler` вне зоны gimbal lock.
    pub fn from_euler(pitch: f64, yaw: f64, roll: f64) -> Self {
        let (s1, c1) = (yaw * 0.5).sin_cos();
        let (s2, c2) = (pitch * 0.5).sin_cos();
        let (s3, c3) = (roll * 0.5).sin_cos();

        Self::new(
            s1 * s2 * c3 + c1 * c2 * s3,
            s1 * c2 * c3 + c1 * s2 * s3,
            c1 * s2 * c3 - s1 * c2 * s3,
            c1 * c2 * c3 - s1 * s2 * s3,
        )
    }

    /// Euler углы: `Vector3 { x: pitch, y: yaw, z: roll }`
    ///
    /// Gimbal-aware:
    /// - test > 0.499 (north pole): y = 2·atan2(x, w), z = π/2, x = 0
    /// - test < -0.499 (south pole): y = -2·atan2(x, w), x = -π/2, z = 0
    pub fn to_euler(self) -> Vector3 {
        let q = self;
        let test = q.x * q.y + q.z * q.w;

        if test > GIMBAL_LOCK_THRESHOLD {
            return Vector3::new(0.0, 2.0 * q.x.atan2(q.w), FRAC_PI_2);
        }
        if test < -GIMBAL_LOCK_THRESHOLD {
            return Vector3::new(-FRAC_PI_2, -2.0 * q.x.atan2(q.w), 0.0);
        }

        let sqx = q.x * q.x;
        let sqy = q.y * q.y;
        let sqz = q.z * q.z;

        let yaw = (2.0 * q.y * q.w - 2.0 * q.x * q.z).atan2(1.0 - 2.0 * sqy - 2.0 * sqz);
        let pitch = (2.0 * test).asin();
        let roll = (2.0 * q.x * q.w - 2.0 * q.y * q.z).atan2(1.0 - 2.0 * sqx - 2.0 * sqz);

        Vector3::new(pitch, yaw, roll)
    }
}

impl From<DQuat> for Quaternion {
    fn from(q: DQuat) -> Self {
        Self::new(q.x, q.y, q.z, q.w)
    }
}

impl From<Quaternion> for DQuat {
    fn from(q: Quaternion) -> Self {
        DQuat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}
