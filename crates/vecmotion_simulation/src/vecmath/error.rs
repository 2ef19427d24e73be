//! Ошибки vecmath

use thiserror::Error;

/// Ошибки векторной арифметики
///
/// Вся остальная арифметика тотальна по построению (stable angle,
/// gimbal-aware Euler), поэтому вариант один.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VecMathError {
    /// normalize() на векторе длины 0 (иначе получили бы NaN/Inf)
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,
}
