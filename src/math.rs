//! Closed-form polynomial solvers and numeric comparison helpers.
//!
//! The solvers return complex candidates even for degrees whose physical
//! roots are real: the cubic and quartic go through depressed/resolvent
//! forms that surface complex intermediates, and a uniform `Complex64`
//! result keeps the interface identical across degrees 1 through 4.
//! Callers filter to roots with a zero imaginary part.

use bevy::log::{debug, warn};
use num_complex::Complex64;

/// Relative comparison tolerance for `f64` values.
pub const EPSILON_F64: f64 = 1e-7;

/// Relative comparison tolerance for `f32` values.
pub const EPSILON_F32: f32 = 1e-5;

/// Scale-aware approximate equality for `f64` values.
///
/// Two values compare equal when `|a - b| <= ε · max(|a|, |b|, 1)`. The
/// floor of 1 keeps the tolerance absolute near zero and relative at
/// larger magnitudes.
pub fn approx_eq(a: f64, b: f64) -> bool {
    let magnitude = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= EPSILON_F64 * magnitude
}

/// Scale-aware approximate equality for `f32` values.
pub fn approx_eq_f32(a: f32, b: f32) -> bool {
    let magnitude = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= EPSILON_F32 * magnitude
}

/// Component-wise approximate equality for vectors.
pub fn approx_eq_vec3(a: bevy::math::Vec3, b: bevy::math::Vec3) -> bool {
    approx_eq_f32(a.x, b.x) && approx_eq_f32(a.y, b.y) && approx_eq_f32(a.z, b.z)
}

/// `val <= limit`, treating values within tolerance of the limit as equal.
pub fn less_than_or_equal(val: f32, limit: f32) -> bool {
    val <= limit || approx_eq_f32(val, limit)
}

/// `val >= limit`, treating values within tolerance of the limit as equal.
pub fn greater_than_or_equal(val: f32, limit: f32) -> bool {
    val >= limit || approx_eq_f32(val, limit)
}

/// Floors a value to the nearest multiple of `increment`.
pub fn to_incremental_floor(value: f32, increment: f32) -> f32 {
    (value / increment).floor() * increment
}

/// Ceils a value to the nearest multiple of `increment`.
pub fn to_incremental_ceil(value: f32, increment: f32) -> f32 {
    (value / increment).ceil() * increment
}

/// Solves `a·x² + b·x + c = 0`.
///
/// Returns both roots as complex numbers; real roots carry a zero imaginary
/// part. When `a` is approximately zero the equation is treated as linear
/// and a single root `-c/b` is returned.
pub fn quadratic(a: f64, b: f64, c: f64) -> Vec<Complex64> {
    if approx_eq(a, 0.0) {
        return vec![Complex64::new(-c / b, 0.0)];
    }

    let discriminant = b * b - 4.0 * a * c;

    if discriminant >= 0.0 {
        let sqrt = discriminant.sqrt();
        let denominator = 2.0 * a;

        vec![
            Complex64::new((-b + sqrt) / denominator, 0.0),
            Complex64::new((-b - sqrt) / denominator, 0.0),
        ]
    } else {
        let sqrt = Complex64::new(discriminant, 0.0).sqrt();
        let denominator = Complex64::new(2.0 * a, 0.0);

        vec![
            Complex64::new(-b + sqrt.re, sqrt.im) / denominator,
            Complex64::new(-b - sqrt.re, -sqrt.im) / denominator,
        ]
    }
}

/// Solves `a·x³ + b·x² + c·x + d = 0`.
///
/// Degenerates to [`quadratic`] when `a` is approximately zero. Otherwise
/// the cubic is depressed to `t³ + qt + r = 0` and one of three closed
/// forms applies depending on the sign of the discriminant. Each branch
/// keeps its own closed form so real-rooted cases never route through
/// complex intermediate arithmetic.
pub fn cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<Complex64> {
    if approx_eq(a, 0.0) {
        return quadratic(b, c, d);
    }

    let q = (3.0 * a * c - b * b) / (3.0 * a * a);
    let r = (2.0 * b * b * b - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a * a * a);
    let discriminant = r * r / 4.0 + q * q * q / 27.0;

    if discriminant > 0.0 {
        // One real root, Cardano with real cube roots.
        let s = (-r / 2.0 + discriminant.sqrt()).cbrt();
        let u = (-r / 2.0 - discriminant.sqrt()).cbrt();
        let shift = b / (3.0 * a);

        vec![
            Complex64::new(s + u - shift, 0.0),
            Complex64::new(-(s + u) / 2.0 - shift, (s - u) * 3.0_f64.sqrt() / 2.0),
            Complex64::new(-(s + u) / 2.0 - shift, -(s - u) * 3.0_f64.sqrt() / 2.0),
        ]
    } else if discriminant == 0.0 {
        // Two real roots, one duplicated.
        let crt = (-r / 2.0).cbrt();
        let shift = -b / (3.0 * a);

        vec![
            Complex64::new(2.0 * crt + shift, 0.0),
            Complex64::new(-crt + shift, 0.0),
        ]
    } else {
        // Three real roots, trigonometric form.
        let i = (r * r / 4.0 - discriminant).sqrt();
        let j = i.cbrt();
        let k = (-r / (2.0 * i)).acos();
        let l = -j;
        let m = (k / 3.0).cos();
        let n = 3.0_f64.sqrt() * (k / 3.0).sin();
        let p = -b / (3.0 * a);

        vec![
            Complex64::new(2.0 * j * (k / 3.0).cos() - b / (3.0 * a), 0.0),
            Complex64::new(l * (m + n) + p, 0.0),
            Complex64::new(l * (m - n) + p, 0.0),
        ]
    }
}

/// Solves `a·x⁴ + b·x³ + c·x² + d·x + e = 0`.
///
/// Degenerates to [`cubic`] when `a` is approximately zero. Otherwise the
/// quartic is normalized to monic form and factored into two quadratics
/// through a real root of its resolvent cubic. The factorization requires
/// two non-negative discriminants; the cross-term check
/// `p1·q2 + p2·q1 ≈ d` selects which constant pairs with which linear
/// coefficient.
///
/// When no resolvent root admits a valid factorization the quartic is
/// unsolvable in this scheme and an empty set is returned; callers must
/// treat that as "no solution", the same as having no real roots. This is
/// a routine runtime case near the edge of numerical precision, not a
/// programming error.
pub fn quartic(a: f64, b: f64, c: f64, d: f64, e: f64) -> Vec<Complex64> {
    if approx_eq(a, 0.0) {
        return cubic(b, c, d, e);
    }

    // Normalize to a monic quartic and solve its resolvent cubic.
    let e = e / a;
    let d = d / a;
    let c = c / a;
    let b = b / a;

    let b3 = 1.0;
    let b2 = -c;
    let b1 = d * b - 4.0 * e;
    let b0 = 4.0 * e * c - d * d - e * b * b;

    for root in cubic(b3, b2, b1, b0) {
        if root.im != 0.0 {
            continue;
        }

        let q_disc = root.re * root.re / 4.0 - e;
        if q_disc < 0.0 {
            continue;
        }

        let p_disc = b * b / 4.0 + root.re - c;
        if p_disc < 0.0 {
            continue;
        }

        let p_sqrt = p_disc.sqrt();
        let p1 = b / 2.0 + p_sqrt;
        let p2 = b / 2.0 - p_sqrt;

        let q_sqrt = q_disc.sqrt();
        let q1 = root.re / 2.0 + q_sqrt;
        let q2 = root.re / 2.0 - q_sqrt;

        // The pairing whose cross terms rebuild the cubic coefficient is
        // the correct split; the alternate pairing is taken on trust when
        // the check fails near the precision boundary.
        let paired = approx_eq(p1 * q2 + p2 * q1, d);
        if !paired {
            debug!(
                "quartic factor pairing check failed, using alternate pairing: \
                 b={b}, c={c}, d={d}, e={e}, resolvent root={}",
                root.re
            );
        }

        let mut roots = quadratic(1.0, p1, if paired { q1 } else { q2 });
        roots.extend(quadratic(1.0, p2, if paired { q2 } else { q1 }));
        return roots;
    }

    warn!("unable to solve quartic: a={a}, b={b}, c={c}, d={d}, e={e}");
    Vec::new()
}
