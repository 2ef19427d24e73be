//! Vector3 — displacement/direction в 3-space (f64)
//!
//! Mutable value type: вызывающий владеет экземпляром напрямую.
//! Если вектор помечен как "normal", вызывающий сам держит ‖v‖≈1 —
//! автоматической ренормализации нет (только явный normalize).

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use bevy::math::{DVec3, Vec3};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Quaternion, VecMathError};

/// 3-элементный вектор двойной точности
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const X_UNIT: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y_UNIT: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z_UNIT: Self = Self::new(0.0, 0.0, 1.0);
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn set(&mut self, x: f64, y: f64, z: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// a × b
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Записывает `a × b` в `self`.
    ///
    /// Aliasing-safe: все три компоненты считаются до записи, поэтому
    /// `r.set_cross(r, b)` даёт то же, что `a.cross(b)` в отдельный буфер.
    pub fn set_cross(&mut self, a: Self, b: Self) {
        let result = a.cross(b);
        *self = result;
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// То же, что `dot` (исторический alias из vecmath API)
    pub fn inner_product(self, other: Self) -> f64 {
        self.dot(other)
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Нормализованная копия вектора
    ///
    /// Нулевой вектор → `VecMathError::ZeroLengthVector` (не NaN).
    pub fn normalize(self) -> Result<Self, VecMathError> {
        let d = self.length();
        if d == 0.0 {
            return Err(VecMathError::ZeroLengthVector);
        }

        Ok(Self::new(self.x / d, self.y / d, self.z / d))
    }

    /// Нормализует in place. При ошибке `self` не меняется.
    pub fn normalize_in_place(&mut self) -> Result<(), VecMathError> {
        *self = self.normalize()?;
        Ok(())
    }

    /// Записывает нормализацию `v` в `self`. При ошибке `self` не меняется.
    pub fn set_normalized(&mut self, v: Self) -> Result<(), VecMathError> {
        *self = v.normalize()?;
        Ok(())
    }

    /// Угол между векторами в радианах, всегда в [0, π]
    ///
    /// `|atan2(‖a×b‖, a·b)|` вместо `acos(a·b / |a||b|)`:
    /// у acos производная → ∞ около 0 и π, atan2 стабилен на всём диапазоне.
    pub fn angle(self, other: Self) -> f64 {
        let xx = self.y * other.z - self.z * other.y;
        let yy = self.z * other.x - self.x * other.z;
        let zz = self.x * other.y - self.y * other.x;
        let cross = (xx * xx + yy * yy + zz * zz).sqrt();

        cross.atan2(self.dot(other)).abs()
    }

    /// Евклидово расстояние между точками (== `(a - b).length()`)
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Записывает в `self` Euler углы кватерниона (yaw=y, pitch=x, roll=z)
    pub fn set_euler(&mut self, q: Quaternion) {
        *self = q.to_euler();
    }

    /// f32 версия для Bevy `Transform`
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<DVec3> for Vector3 {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for DVec3 {
    fn from(v: Vector3) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}
