mod vector;
mod matrix;
mod transform;
mod rotation;

pub use vector::Vector3;
pub use matrix::Matrix3;
pub use transform::Transform;
pub use rotation::{Quaternion, Rotation};

use std::f32::consts::{PI, TAU};

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Wraps an angle in radians into `(-PI, PI]`
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Signed angle in `(-PI, PI]` rotating `from` onto `to`, measured about `axis`
/// with the right-hand rule. Both vectors are projected onto the plane
/// perpendicular to `axis` by construction of the formula.
#[inline]
pub fn signed_angle_about_axis(from: Vector3, to: Vector3, axis: Vector3) -> f32 {
    from.cross(&to).dot(&axis).atan2(from.dot(&to))
}

/// Returns two unit vectors `(p, q)` such that `(p, q, n)` is a right-handed
/// orthonormal basis. `n` must be unit length.
pub fn plane_space(n: Vector3) -> (Vector3, Vector3) {
    let p = if n.z.abs() > std::f32::consts::FRAC_1_SQRT_2 {
        let len = (n.y * n.y + n.z * n.z).sqrt();
        Vector3::new(0.0, -n.z / len, n.y / len)
    } else {
        let len = (n.x * n.x + n.y * n.y).sqrt();
        Vector3::new(-n.y / len, n.x / len, 0.0)
    };

    (p, n.cross(&p))
}
