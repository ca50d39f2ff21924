//! Conversion of grid samples into interpolating B-spline coefficients.
//!
//! Each axis is filtered in turn with a causal and an anticausal first-order
//! recursive filter per pole of the spline order.
use crate::{
    Real,
    layout::{NdBuffer, RowMajor},
    spline::{BoundaryMode, basis::poles},
};

/// Number of virtual samples added to each side of every axis
/// when the boundary mode has no periodic extension.
pub(crate) const PADDING: usize = 12;

/// Compute B-spline coefficients for `values` laid out with `shape`.
///
/// Returns the coefficient array and the padding added to each side of every axis.
/// Orders below 2 need no filtering and return the samples unchanged.
pub(crate) fn coefficients<F: Real>(
    values: &[F],
    shape: &[usize],
    order: usize,
    mode: BoundaryMode,
    cval: F,
) -> (NdBuffer<F>, usize) {
    let zs = poles::<F>(order);
    if zs.is_empty() {
        return (
            NdBuffer::new_unchecked(values.to_vec(), RowMajor::new(shape)),
            0,
        );
    }

    let (mut coeffs, pad, filter_mode) = match mode {
        BoundaryMode::Mirror | BoundaryMode::Reflect | BoundaryMode::Wrap => (
            NdBuffer::new_unchecked(values.to_vec(), RowMajor::new(shape)),
            0,
            mode,
        ),
        BoundaryMode::Nearest | BoundaryMode::Constant => (
            pad_with_mode(values, shape, mode, cval, PADDING),
            PADDING,
            BoundaryMode::Mirror,
        ),
    };

    log::trace!(
        "Prefiltering {:?} grid for order {order} spline in {mode} mode",
        coeffs.shape()
    );

    for axis in 0..coeffs.layout().ndim() {
        coeffs.for_each_line_mut(axis, |line| filter_line(line, &zs, filter_mode));
    }
    (coeffs, pad)
}

/// Surround the array with `pad` virtual samples per side, as defined by `mode`.
fn pad_with_mode<F: Real>(
    values: &[F],
    shape: &[usize],
    mode: BoundaryMode,
    cval: F,
    pad: usize,
) -> NdBuffer<F> {
    let src = RowMajor::new(shape);
    let padded_shape: Vec<usize> = shape.iter().map(|s| s + 2 * pad).collect();
    let dst = RowMajor::new(&padded_shape);

    let mut data = Vec::with_capacity(dst.numel());
    let mut dst_idx = vec![0usize; shape.len()];
    let mut src_idx = vec![0usize; shape.len()];

    for _ in 0..dst.numel() {
        let mut inside = true;
        for ((s, d), len) in src_idx.iter_mut().zip(dst_idx.iter()).zip(shape.iter()) {
            match mode.map_index(*d as i64 - pad as i64, *len) {
                Some(mapped) => *s = mapped,
                None => inside = false,
            }
        }
        let val = if inside {
            // mapped indices are always in bounds
            src.linear_idx(&src_idx).map_or(cval, |i| values[i])
        } else {
            cval
        };
        data.push(val);

        for (d, max) in dst_idx.iter_mut().zip(padded_shape.iter()).rev() {
            *d += 1;
            if *d < *max {
                break;
            }
            *d = 0;
        }
    }
    NdBuffer::new_unchecked(data, dst)
}

/// Replace samples along one line with their B-spline coefficients,
/// treating the line as one part of the periodic extension defined by `mode`.
fn filter_line<F: Real>(line: &mut [F], poles: &[F], mode: BoundaryMode) {
    let n = line.len();
    if n < 2 {
        return;
    }
    let Some(period) = mode.period(n) else {
        return;
    };

    let mut ext: Vec<F> = (0..period)
        .map(|i| line[mode.map_index(i as i64, n).unwrap_or(0)])
        .collect();

    let gain = poles.iter().fold(F::one(), |acc, z| {
        acc * (F::one() - *z) * (F::one() - z.recip())
    });
    for v in ext.iter_mut() {
        *v = *v * gain;
    }

    let mut causal = vec![F::zero(); period];
    for z in poles.iter().copied() {
        filter_periodic(&mut ext, &mut causal, z);
    }
    line.copy_from_slice(&ext[..n]);
}

/// One causal and one anticausal pass of a single pole over a periodic signal,
/// with exact initial conditions.
fn filter_periodic<F: Real>(signal: &mut [F], causal: &mut [F], z: F) {
    let len = signal.len();
    let norm = F::one() / (F::one() - z.powi(len as i32));

    let mut zk = F::one();
    let mut acc = F::zero();
    for k in 0..len {
        acc = acc + zk * signal[(len - k) % len];
        zk = zk * z;
    }
    causal[0] = acc * norm;
    for k in 1..len {
        causal[k] = signal[k] + z * causal[k - 1];
    }

    let mut zk = F::one();
    let mut acc = F::zero();
    for k in 0..len {
        acc = acc + zk * causal[(len - 1 + k) % len];
        zk = zk * z;
    }
    signal[len - 1] = -z * norm * acc;
    for k in (0..len - 1).rev() {
        signal[k] = z * (signal[k + 1] - causal[k]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::basis::{first_tap, weight};

    /// Evaluate the 1D spline at an integer node.
    fn at_node(coeffs: &[f64], order: usize, mode: BoundaryMode, node: usize) -> f64 {
        let x = node as f64;
        let start = first_tap(order, x);
        (0..=order as i64)
            .map(|k| {
                let idx = mode.map_index(start + k, coeffs.len()).unwrap();
                coeffs[idx] * weight(order, x - (start + k) as f64)
            })
            .sum()
    }

    #[test]
    fn test_interpolates_nodes() {
        let samples = vec![1.0, -2.0, 0.5, 3.0, 3.0, -1.0, 0.0];
        for order in 2..=5 {
            for mode in [BoundaryMode::Mirror, BoundaryMode::Reflect, BoundaryMode::Wrap] {
                let (coeffs, pad) = coefficients(&samples, &[samples.len()], order, mode, 0.0);
                assert_eq!(pad, 0);
                for (node, expected) in samples.iter().enumerate() {
                    approx::assert_abs_diff_eq!(
                        at_node(coeffs.data(), order, mode, node),
                        *expected,
                        epsilon = 1e-10
                    );
                }
            }
        }
    }

    #[test]
    fn test_constant_signal() {
        let samples = vec![2.5; 6];
        for mode in BoundaryMode::ALL {
            let (coeffs, _) = coefficients(&samples, &[6], 3, mode, 2.5);
            for c in coeffs.data() {
                approx::assert_abs_diff_eq!(*c, 2.5, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_padding() {
        let padded = pad_with_mode(&[1.0, 2.0], &[2], BoundaryMode::Constant, 9.0, 2);
        assert_eq!(padded.data(), &[9.0, 9.0, 1.0, 2.0, 9.0, 9.0]);
        let padded = pad_with_mode(&[1.0, 2.0], &[2], BoundaryMode::Nearest, 9.0, 2);
        assert_eq!(padded.data(), &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
        let padded = pad_with_mode(&[1.0, 2.0, 3.0, 4.0], &[2, 2], BoundaryMode::Nearest, 0.0, 1);
        assert_eq!(padded.shape(), &[4, 4]);
        assert_eq!(
            padded.data(),
            &[1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 3.0, 3.0, 4.0, 4.0]
        );
    }

    #[test]
    fn test_low_orders_unfiltered() {
        let samples = vec![1.0, 4.0, 2.0];
        for order in 0..2 {
            let (coeffs, pad) = coefficients(&samples, &[3], order, BoundaryMode::Constant, 7.0);
            assert_eq!(pad, 0);
            assert_eq!(coeffs.data(), samples.as_slice());
        }
    }
}
