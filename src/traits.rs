use crate::Real;

/// Core point transformation interface.
///
/// All transformations map `ndim`-dimensional points onto `ndim`-dimensional points
/// of the same precision `F`, in the normalized `[0, 1)^ndim` domain.
///
/// Implementations may not perform any bounds checks on the input,
/// as these transformations generally happen in performance-critical hot loops.
/// Therefore, they may panic if coordinates or output buffers of incorrect length are given.
pub trait Transformation<F: Real>: std::fmt::Debug + std::fmt::Display + Send + Sync {
    /// Transform a single point, writing to a pre-allocated output buffer.
    fn transform_into(&self, pt: &[F], buf: &mut [F]);

    /// Transform multiple points, writing to pre-allocated output buffers.
    ///
    /// The trait default implementation simply calls [Transformation::transform_into] in turn;
    /// specific transforms may override it.
    fn bulk_transform_into(&self, pts: &[&[F]], bufs: &mut [&mut [F]]) {
        for (pt, buf) in pts.iter().zip(bufs.iter_mut()) {
            self.transform_into(pt, buf);
        }
    }

    /// Transform multiple points given as one slice per dimension.
    ///
    /// The trait implementation is inefficient,
    /// simply wrapping [Transformation::transform_into],
    /// and should be overridden by implementors where optimisations are available.
    fn column_transform_into(&self, columns: &[&[F]], bufs: &mut [&mut [F]]) {
        let Some(n_pts) = columns.first().map(|c| c.len()) else {
            return;
        };
        let ndim = self.ndim();
        let mut in_pt = vec![F::nan(); ndim];
        let mut out_pt = vec![F::nan(); ndim];
        for pt_idx in 0..n_pts {
            for (p, col) in in_pt.iter_mut().zip(columns.iter()) {
                *p = col[pt_idx];
            }
            self.transform_into(&in_pt, &mut out_pt);
            for (out_col, p) in bufs.iter_mut().zip(out_pt.iter()) {
                out_col[pt_idx] = *p;
            }
        }
    }

    /// Whether this transformation is definitely the identity.
    ///
    /// `false` is not definitive, as checking may be expensive.
    fn is_identity(&self) -> bool {
        false
    }

    /// Number of dimensions of the points this transformation maps.
    fn ndim(&self) -> usize;
}
