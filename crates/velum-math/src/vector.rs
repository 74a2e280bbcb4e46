//! Guarded vector helpers.

use glam::Vec3;
use velum_types::constants::{COLLINEAR_EPSILON, EPSILON};
use velum_types::Scalar;

/// Normalizes `v`, returning `v` unchanged when its length is zero.
#[inline]
pub fn normalize_or_self(v: Vec3) -> Vec3 {
    let len = v.length();
    if len == 0.0 {
        v
    } else {
        v / len
    }
}

/// Splits `d` into a unit direction and its length.
///
/// A zero-length `d` yields a zero direction, so any magnitude applied
/// along it has no effect.
#[inline]
pub fn direction_and_length(d: Vec3) -> (Vec3, Scalar) {
    let len = d.length();
    if len <= EPSILON {
        (Vec3::ZERO, len)
    } else {
        (d / len, len)
    }
}

/// Returns true if `a` and `b` are parallel or anti-parallel, or if either
/// is too short to define a direction.
pub fn is_collinear(a: Vec3, b: Vec3) -> bool {
    let la = a.length();
    let lb = b.length();
    if la <= EPSILON || lb <= EPSILON {
        return true;
    }
    let cos = a.dot(b) / (la * lb);
    (cos.abs() - 1.0).abs() < COLLINEAR_EPSILON
}
