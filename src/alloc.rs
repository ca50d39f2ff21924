//! Allocating wrappers for coordinate transformations.
//!
//! Coordinate transformations try to minimise allocations
//! so that they can be called in tight loops in a variety of situations.
//! But writing the same boilerplate to pre-allocate output buffers is annoying,
//! so this extension trait handles that for every [Transformation].
use crate::{BSplineError, Real, Transformation, as_muts, error::Result};

pub trait TransformExt<F: Real>: Transformation<F> {
    /// Transform a given point into a newly-allocated buffer.
    fn transform(&self, pt: &[F]) -> Vec<F> {
        let mut out = vec![F::nan(); self.ndim()];
        self.transform_into(pt, &mut out);
        out
    }

    fn bulk_transform(&self, pts: &[&[F]]) -> Vec<Vec<F>> {
        let mut out = vec![vec![F::nan(); self.ndim()]; pts.len()];
        self.bulk_transform_into(pts, &mut as_muts(&mut out));
        out
    }

    fn column_transform(&self, columns: &[&[F]]) -> Vec<Vec<F>> {
        let Some(n_pts) = columns.first().map(|p| p.len()) else {
            return vec![];
        };
        let mut out = vec![vec![F::nan(); n_pts]; self.ndim()];
        self.column_transform_into(columns, &mut as_muts(&mut out));
        out
    }

    /// Transform columns of points given in some other unit.
    ///
    /// Each axis is divided by its `scale` into the normalized domain,
    /// transformed, and multiplied back.
    /// A single scale value applies to every axis; an empty `scale` leaves points unscaled.
    fn transform_scaled(&self, columns: &[&[F]], scale: &[F]) -> Result<Vec<Vec<F>>> {
        let ndim = self.ndim();
        if columns.len() != ndim {
            return Err(BSplineError::Dimension {
                expected: ndim,
                actual: columns.len(),
            });
        }
        let factors: Vec<F> = match scale.len() {
            0 => vec![F::one(); ndim],
            1 => vec![scale[0]; ndim],
            n if n == ndim => scale.to_vec(),
            n => {
                return Err(BSplineError::Dimension {
                    expected: ndim,
                    actual: n,
                });
            }
        };
        let n_pts = columns[0].len();
        if let Some(bad) = columns.iter().find(|c| c.len() != n_pts) {
            return Err(BSplineError::ColumnLength {
                expected: n_pts,
                actual: bad.len(),
            });
        }

        let normalized: Vec<Vec<F>> = columns
            .iter()
            .zip(factors.iter())
            .map(|(col, s)| col.iter().map(|v| *v / *s).collect())
            .collect();
        let normalized_refs: Vec<&[F]> = normalized.iter().map(|c| c.as_slice()).collect();

        let mut out = vec![vec![F::nan(); n_pts]; ndim];
        self.column_transform_into(&normalized_refs, &mut as_muts(&mut out));
        for (col, s) in out.iter_mut().zip(factors.iter()) {
            for v in col.iter_mut() {
                *v = *v * *s;
            }
        }
        Ok(out)
    }
}

impl<F: Real, T: Transformation<F> + ?Sized> TransformExt<F> for T {}
