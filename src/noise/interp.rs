//! Scalar interpolation and easing curves used by the lattice noise.

/// Linear interpolation between `n0` (at `a = 0`) and `n1` (at `a = 1`).
///
/// `a` is not clamped; values outside `[0, 1]` extrapolate.
#[inline]
pub fn linear(n0: f64, n1: f64, a: f64) -> f64 {
    (1.0 - a) * n0 + a * n1
}

/// Cubic interpolation through `n1` (at `a = 0`) and `n2` (at `a = 1`),
/// using `n0` and `n3` as the surrounding samples.
#[inline]
pub fn cubic(n0: f64, n1: f64, n2: f64, n3: f64, a: f64) -> f64 {
    let p = (n3 - n2) - (n0 - n1);
    let q = (n0 - n1) - p;
    let r = n2 - n0;
    let s = n1;
    p * a * a * a + q * a * a + r * a + s
}

/// Maps `a` onto a cubic S-curve (`3a² - 2a³`).
///
/// First derivative is zero at both ends.
#[inline]
pub fn cubic_s_curve(a: f64) -> f64 {
    a * a * (3.0 - 2.0 * a)
}

/// Maps `a` onto a quintic S-curve (`6a⁵ - 15a⁴ + 10a³`).
///
/// First and second derivatives are zero at both ends.
#[inline]
pub fn quintic_s_curve(a: f64) -> f64 {
    let a3 = a * a * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    (6.0 * a5) - (15.0 * a4) + (10.0 * a3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let pairs = [(0.0, 1.0), (-3.5, 12.25), (1e6, -1e-6), (0.3, 0.3)];
        for (n0, n1) in pairs {
            assert_eq!(linear(n0, n1, 0.0), n0);
            assert_eq!(linear(n0, n1, 1.0), n1);
        }
        assert_eq!(linear(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn test_linear_extrapolates() {
        assert_eq!(linear(0.0, 1.0, 2.0), 2.0);
        assert_eq!(linear(0.0, 1.0, -1.0), -1.0);
    }

    #[test]
    fn test_cubic_passes_through_inner_points() {
        assert_eq!(cubic(5.0, 1.0, 2.0, -7.0, 0.0), 1.0);
        assert!((cubic(5.0, 1.0, 2.0, -7.0, 1.0) - 2.0).abs() < 1e-12);
        // Collinear samples reproduce the line
        assert!((cubic(0.0, 1.0, 2.0, 3.0, 0.5) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_s_curve_endpoints() {
        assert_eq!(cubic_s_curve(0.0), 0.0);
        assert_eq!(cubic_s_curve(1.0), 1.0);
        assert_eq!(quintic_s_curve(0.0), 0.0);
        assert_eq!(quintic_s_curve(1.0), 1.0);
        assert_eq!(cubic_s_curve(0.5), 0.5);
        assert_eq!(quintic_s_curve(0.5), 0.5);
    }

    #[test]
    fn test_s_curves_monotonic() {
        let mut prev_cubic = cubic_s_curve(0.0);
        let mut prev_quintic = quintic_s_curve(0.0);
        for i in 1..=1000 {
            let a = i as f64 / 1000.0;
            let c = cubic_s_curve(a);
            let q = quintic_s_curve(a);
            assert!(c >= prev_cubic, "cubic decreased at {}", a);
            assert!(q >= prev_quintic, "quintic decreased at {}", a);
            assert!((0.0..=1.0).contains(&c));
            assert!((0.0..=1.0).contains(&q));
            prev_cubic = c;
            prev_quintic = q;
        }
    }
}
