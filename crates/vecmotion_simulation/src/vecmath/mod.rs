//! Vecmath — double-precision 3D векторы и кватернионы
//!
//! Содержит:
//! - Vector3 (cross/dot/length/normalize/angle/distance, in-place формы)
//! - Quaternion (source для конвертации в Euler углы)
//! - VecMathError (единственный failure case: нормализация нулевого вектора)
//!
//! Все in-place операции aliasing-safe: сначала считаем все компоненты
//! во временные, потом пишем в `self`.

mod error;
mod quaternion;
mod vector3;

pub use error::*;
pub use quaternion::*;
pub use vector3::*;
