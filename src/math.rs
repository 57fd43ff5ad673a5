//! 3-vector helpers and the equinoctial Kepler solve.

use crate::constants::TAU;

/// Vectors shorter than this are treated as degenerate.
const SMALL: f64 = 1.0e-8;

/// Magnitude of a 3-vector.
pub fn mag(x: &[f64; 3]) -> f64 {
    (x[0] * x[0] + x[1] * x[1] + x[2] * x[2]).sqrt()
}

/// Cross product `a × b`.
pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Dot product.
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Angle between two vectors in `[0, π]`, or `None` if either is degenerate.
pub fn angle(a: &[f64; 3], b: &[f64; 3]) -> Option<f64> {
    let magnitudes = mag(a) * mag(b);
    if magnitudes <= SMALL * SMALL {
        return None;
    }
    let cos = (dot(a, b) / magnitudes).clamp(-1.0, 1.0);
    Some(cos.acos())
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_two_pi(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 { a + TAU } else { a }
}

/// Solve the equinoctial form of Kepler's equation.
///
/// Finds `E` with `u = E - axnl·sin E + aynl·cos E`, where `(axnl, aynl)` are
/// the eccentricity-vector components in the argument-of-perigee frame.
/// Newton iteration, at most 10 steps, each step clamped to ±0.95 rad so high
/// eccentricities still converge. If the residual never drops below 1e-12
/// the last iterate is returned unflagged.
pub fn solve_kepler(u: f64, axnl: f64, aynl: f64) -> f64 {
    let mut eo1 = u;
    let mut step: f64 = 9999.9;
    let mut iterations = 1;

    while step.abs() >= 1.0e-12 && iterations <= 10 {
        let (sin_e, cos_e) = eo1.sin_cos();
        step = (u - aynl * cos_e + axnl * sin_e - eo1) / (1.0 - cos_e * axnl - sin_e * aynl);
        if step.abs() >= 0.95 {
            step = 0.95_f64.copysign(step);
        }
        eo1 += step;
        iterations += 1;
    }

    eo1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cross_dot() {
        let x = [1.0, 0.0, 0.0];
        let y = [0.0, 1.0, 0.0];
        assert_eq!(cross(&x, &y), [0.0, 0.0, 1.0]);
        assert_eq!(dot(&x, &y), 0.0);
        assert_relative_eq!(mag(&[3.0, 4.0, 12.0]), 13.0);
    }

    #[test]
    fn test_angle() {
        let a = angle(&[1.0, 0.0, 0.0], &[1.0, 1.0, 0.0]).unwrap();
        assert_relative_eq!(a, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        let a = angle(&[1.0, 0.0, 0.0], &[-2.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(a, std::f64::consts::PI);
        assert!(angle(&[0.0; 3], &[1.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn test_wrap_two_pi() {
        assert_relative_eq!(wrap_two_pi(-0.5), TAU - 0.5);
        assert_relative_eq!(wrap_two_pi(TAU + 0.25), 0.25, epsilon = 1e-12);
        assert_eq!(wrap_two_pi(0.0), 0.0);
    }

    #[test]
    fn test_kepler_circular() {
        assert_relative_eq!(solve_kepler(1.234, 0.0, 0.0), 1.234, epsilon = 1e-12);
    }

    #[test]
    fn test_kepler_satisfies_equation() {
        for &(u, axnl, aynl) in &[(0.3, 0.1, 0.05), (2.5, 0.6, -0.2), (5.9, 0.0, 0.7)] {
            let e = solve_kepler(u, axnl, aynl);
            let residual = e - axnl * e.sin() + aynl * e.cos() - u;
            assert!(residual.abs() < 1e-10, "residual {residual} for u={u}");
        }
    }

    #[test]
    fn test_kepler_high_eccentricity_stays_bounded() {
        // Step clamping keeps the iterate finite even when Newton overshoots.
        let e = solve_kepler(0.01, 0.99, 0.0);
        assert!(e.is_finite());
        let residual = e - 0.99 * e.sin() - 0.01;
        assert!(residual.abs() < 1e-6);
    }
}
