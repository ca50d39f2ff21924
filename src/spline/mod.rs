//! Evaluation of tensor-product B-splines fitted to regularly sampled arrays.
//!
//! A [SplineSampler] interpolates an N-dimensional array at fractional index
//! coordinates. With order >= 1 it reproduces the stored samples exactly at
//! integer positions; order 0 returns the nearest sample, rounding half-way
//! positions towards the lower index. Positions outside the array are resolved
//! through a [BoundaryMode].
mod basis;
mod boundary;
mod prefilter;

pub use boundary::BoundaryMode;
use smallvec::smallvec;

use crate::{BSplineError, Real, ShortVec, error::Result, layout::NdBuffer};

/// Highest supported spline order.
pub const MAX_ORDER: usize = 5;

/// Validate a spline order, which may have been given as a negative number.
pub fn check_order(order: i64) -> Result<usize> {
    usize::try_from(order)
        .ok()
        .filter(|o| *o <= MAX_ORDER)
        .ok_or(BSplineError::InvalidOrder(order))
}

/// Read values from an array at real-valued coordinates.
pub trait Interpolate<F: Real> {
    /// Sample a single coordinate of length [Interpolate::ndim].
    fn get(&self, coord: &[F]) -> F;

    fn bulk_get_into(&self, coords: &[&[F]], buf: &mut [F]) {
        for (c, b) in coords.iter().zip(buf.iter_mut()) {
            *b = self.get(c);
        }
    }

    /// Sample coordinates given as one slice per dimension.
    fn column_get_into(&self, columns: &[&[F]], buf: &mut [F]) {
        let mut coord: ShortVec<F> = smallvec![F::nan(); columns.len()];
        for (idx, b) in buf.iter_mut().enumerate() {
            for (c, col) in coord.iter_mut().zip(columns.iter()) {
                *c = col[idx];
            }
            *b = self.get(&coord);
        }
    }

    fn ndim(&self) -> usize;
}

/// A B-spline of fixed order fitted to an N-dimensional array.
///
/// Coefficients are computed once on construction; sampling is read-only.
#[derive(Debug, Clone)]
pub struct SplineSampler<F: Real> {
    coefficients: NdBuffer<F>,
    order: usize,
    mode: BoundaryMode,
    cval: F,
    /// Virtual samples added before index 0 of every axis.
    pad: usize,
}

impl<F: Real> SplineSampler<F> {
    /// Fit a spline to the C-ordered `values` of an array with the given `shape`.
    pub fn try_new(
        values: &[F],
        shape: &[usize],
        order: i64,
        mode: BoundaryMode,
        cval: F,
    ) -> Result<Self> {
        let order = check_order(order)?;
        let numel: usize = shape.iter().product();
        if values.len() != numel {
            return Err(BSplineError::GridSize {
                shape: shape.to_vec(),
                expected: numel,
                actual: values.len(),
            });
        }
        if shape.is_empty() || numel == 0 {
            return Err(BSplineError::EmptyGrid {
                shape: shape.to_vec(),
            });
        }
        let (coefficients, pad) = prefilter::coefficients(values, shape, order, mode, cval);
        Ok(Self {
            coefficients,
            order,
            mode,
            cval,
            pad,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn mode(&self) -> BoundaryMode {
        self.mode
    }

    pub fn cval(&self) -> F {
        self.cval
    }

    /// Shape of the array the spline was fitted to.
    pub fn shape(&self) -> ShortVec<usize> {
        self.coefficients
            .shape()
            .iter()
            .map(|s| s - 2 * self.pad)
            .collect()
    }
}

impl<F: Real> Interpolate<F> for SplineSampler<F> {
    fn get(&self, coord: &[F]) -> F {
        if coord.iter().any(|c| !c.is_finite()) {
            return F::nan();
        }
        let n_taps = self.order + 1;
        let layout = self.coefficients.layout();
        let pad = F::from_usize(self.pad).unwrap_or_else(F::zero);

        // per axis: linear offset of each tap (None for the constant fill) and its weight
        let mut offsets: ShortVec<Option<usize>> = ShortVec::with_capacity(n_taps * coord.len());
        let mut weights: ShortVec<F> = ShortVec::with_capacity(n_taps * coord.len());
        for ((c, len), stride) in coord
            .iter()
            .zip(layout.shape().iter())
            .zip(layout.strides().iter())
        {
            let x = self.mode.fold_coordinate(*c + pad, *len, self.order);
            let start = basis::first_tap(self.order, x);
            for k in 0..n_taps as i64 {
                let tap = start.saturating_add(k);
                offsets.push(self.mode.map_index(tap, *len).map(|i| i * stride));
                let t = x - F::from_i64(tap).unwrap_or_else(F::nan);
                weights.push(basis::weight(self.order, t));
            }
        }

        let data = self.coefficients.data();
        let mut counter: ShortVec<usize> = smallvec![0; coord.len()];
        let mut total = F::zero();
        'outer: loop {
            let mut w = F::one();
            let mut linear = Some(0);
            for (dim, k) in counter.iter().enumerate() {
                let i = dim * n_taps + k;
                w = w * weights[i];
                linear = linear.zip(offsets[i]).map(|(a, b)| a + b);
            }
            let val = linear.map_or(self.cval, |l| data[l]);
            total = total + w * val;

            for c in counter.iter_mut().rev() {
                *c += 1;
                if *c < n_taps {
                    continue 'outer;
                }
                *c = 0;
            }
            break;
        }
        total
    }

    fn ndim(&self) -> usize {
        self.coefficients.layout().ndim()
    }
}
