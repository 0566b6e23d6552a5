/// Value reported when an estimate has no intersections to divide by.
pub const UNDEFINED_ESTIMATE: f64 = f64::INFINITY;

/// Constant the experiment converges to, used for display deltas.
pub const REFERENCE_PI: f64 = std::f64::consts::PI;

/// Ratio estimate `trials / intersections`.
///
/// Returns [`UNDEFINED_ESTIMATE`] instead of dividing by zero.
#[inline]
pub fn ratio_estimate(intersections: u64, trials: u64) -> f64 {
    if intersections > 0 {
        trials as f64 / intersections as f64
    } else {
        UNDEFINED_ESTIMATE
    }
}

#[inline]
pub fn is_undefined(estimate: f64) -> bool {
    estimate.is_infinite() && estimate.is_sign_positive()
}

/// Absolute distance from [`REFERENCE_PI`]; infinite for an undefined estimate.
#[inline]
pub fn difference_from_pi(estimate: f64) -> f64 {
    (estimate - REFERENCE_PI).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ratio() {
        assert_eq!(ratio_estimate(5, 20), 4.0);
        assert_eq!(ratio_estimate(3, 10), 10.0 / 3.0);
    }

    #[test]
    fn zero_intersections_yields_sentinel() {
        let e = ratio_estimate(0, 20);
        assert!(is_undefined(e));
        assert!(is_undefined(ratio_estimate(0, 0)));
    }

    #[test]
    fn sentinel_distance_is_infinite() {
        assert!(difference_from_pi(UNDEFINED_ESTIMATE).is_infinite());
        assert!((difference_from_pi(3.0) - (REFERENCE_PI - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn finite_values_are_not_undefined() {
        assert!(!is_undefined(4.0));
        assert!(!is_undefined(f64::NEG_INFINITY));
        assert!(!is_undefined(f64::NAN));
    }
}
