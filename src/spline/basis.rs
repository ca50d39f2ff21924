//! Centered cardinal B-spline basis functions and their recursive-filter poles.
use smallvec::smallvec;

use crate::{Real, ShortVec};

/// Poles of the B-spline interpolation prefilter of the given order.
///
/// Orders 0 and 1 interpolate directly and have no poles.
pub(crate) fn poles<F: Real>(order: usize) -> ShortVec<F> {
    match order {
        2 => smallvec![F::lit(8f64.sqrt() - 3.0)],
        3 => smallvec![F::lit(3f64.sqrt() - 2.0)],
        4 => smallvec![
            F::lit((664.0 - 438976f64.sqrt()).sqrt() + 304f64.sqrt() - 19.0),
            F::lit((664.0 + 438976f64.sqrt()).sqrt() - 304f64.sqrt() - 19.0),
        ],
        5 => smallvec![
            F::lit((67.5 - (17745.0f64 / 4.0).sqrt()).sqrt() + (105.0f64 / 4.0).sqrt() - 6.5),
            F::lit((67.5 + (17745.0f64 / 4.0).sqrt()).sqrt() - (105.0f64 / 4.0).sqrt() - 6.5),
        ],
        _ => smallvec![],
    }
}

/// Value of the centered B-spline of the given order at offset `t` from its centre.
pub(crate) fn weight<F: Real>(order: usize, t: F) -> F {
    let t = t.abs();
    let c = F::lit;
    match order {
        // single tap, picked by `first_tap`
        0 => F::one(),
        1 => {
            if t < F::one() {
                F::one() - t
            } else {
                F::zero()
            }
        }
        2 => {
            if t < c(0.5) {
                c(0.75) - t * t
            } else if t < c(1.5) {
                let u = c(1.5) - t;
                u * u * c(0.5)
            } else {
                F::zero()
            }
        }
        3 => {
            if t < F::one() {
                c(2.0 / 3.0) - t * t + t * t * t * c(0.5)
            } else if t < c(2.0) {
                let u = c(2.0) - t;
                u * u * u / c(6.0)
            } else {
                F::zero()
            }
        }
        4 => {
            let t2 = t * t;
            if t < c(0.5) {
                c(115.0 / 192.0) - t2 * c(0.625) + t2 * t2 * c(0.25)
            } else if t < c(1.5) {
                (c(55.0) + c(20.0) * t - c(120.0) * t2 + c(80.0) * t2 * t - c(16.0) * t2 * t2)
                    / c(96.0)
            } else if t < c(2.5) {
                let u = c(5.0) - c(2.0) * t;
                let u2 = u * u;
                u2 * u2 / c(384.0)
            } else {
                F::zero()
            }
        }
        5 => {
            let t2 = t * t;
            if t < F::one() {
                c(11.0 / 20.0) - t2 * c(0.5) + t2 * t2 * c(0.25) - t2 * t2 * t / c(12.0)
            } else if t < c(2.0) {
                (c(51.0) + c(75.0) * t - c(210.0) * t2 + c(150.0) * t2 * t
                    - c(45.0) * t2 * t2
                    + c(5.0) * t2 * t2 * t)
                    / c(120.0)
            } else if t < c(3.0) {
                let u = c(3.0) - t;
                let u2 = u * u;
                u2 * u2 * u / c(120.0)
            } else {
                F::zero()
            }
        }
        _ => F::nan(),
    }
}

/// Index of the first coefficient contributing to a sample at `x`.
///
/// Order 0 rounds half-way positions down, so ties go to the lower index.
pub(crate) fn first_tap<F: Real>(order: usize, x: F) -> i64 {
    let base = if order == 0 {
        (x - F::lit(0.5)).ceil()
    } else if order % 2 == 1 {
        x.floor()
    } else {
        (x + F::lit(0.5)).floor()
    };
    base.to_i64()
        .unwrap_or(if base.is_sign_negative() { i64::MIN } else { i64::MAX })
        .saturating_sub((order / 2) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_of_unity() {
        for order in 1..=5 {
            for step in 0..20 {
                let x = 3.0 + step as f64 / 20.0;
                let start = first_tap(order, x);
                let total: f64 = (0..=order as i64)
                    .map(|k| weight(order, x - (start + k) as f64))
                    .sum();
                approx::assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_weights_continuous() {
        for order in 2..=5 {
            let half = (order + 1) as f64 / 2.0;
            for knot in 0..=(order + 1) {
                let t = -half + knot as f64;
                approx::assert_abs_diff_eq!(
                    weight(order, t - 1e-9),
                    weight(order, t + 1e-9),
                    epsilon = 1e-7
                );
            }
        }
    }

    #[test]
    fn test_nearest_tie_goes_down() {
        assert_eq!(first_tap(0, 1.5), 1);
        assert_eq!(first_tap(0, 1.51), 2);
        assert_eq!(first_tap(0, -0.5), -1);
        assert_eq!(first_tap(0, 0.49), 0);
    }

    #[test]
    fn test_poles() {
        let p3: ShortVec<f64> = poles(3);
        approx::assert_abs_diff_eq!(p3[0], -0.267949192431123, epsilon = 1e-12);
        let p5: ShortVec<f64> = poles(5);
        approx::assert_abs_diff_eq!(p5[0], -0.430575347099973, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(p5[1], -0.0430962882032647, epsilon = 1e-12);
        assert!(poles::<f64>(1).is_empty());
    }
}
