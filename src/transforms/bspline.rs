use std::{fmt::Display, sync::OnceLock};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use smallvec::smallvec;

use crate::{
    BSplineError, ControlGrid, Real, ShortVec, Transformation,
    error::Result,
    real::convert,
    spline::{BoundaryMode, Interpolate, SplineSampler},
};

pub const DEFAULT_ORDER: i64 = 3;

/// Free-form deformation defined by displacement vectors on a B-spline control grid.
///
/// Points in the normalized `[0, 1)^ndim` domain are scaled onto the control grid,
/// so that 0 coincides with the first control point and 1 with the last, whatever the resolution.
/// The displacement field is interpolated there with a spline of the configured order
/// and added to the point.
///
/// The spline order and boundary mode are only checked when points are mapped.
#[derive(Debug, Clone)]
pub struct BSplineTransformation<F: Real> {
    grid: ControlGrid<F>,
    order: i64,
    mode: BoundaryMode,
    cval: F,
    /// One spline per displacement component, fitted on first use.
    samplers: OnceLock<Vec<SplineSampler<F>>>,
}

impl<F: Real> BSplineTransformation<F> {
    /// Copy a C-ordered grid of shape `[ndim, N1, ..., Nndim]`,
    /// using a cubic spline in mirror mode.
    pub fn try_new(values: &[F], full_shape: &[usize]) -> Result<Self> {
        ControlGrid::try_new(values, full_shape).map(Self::from_grid)
    }

    pub fn from_grid(grid: ControlGrid<F>) -> Self {
        Self {
            grid,
            order: DEFAULT_ORDER,
            mode: BoundaryMode::default(),
            cval: F::zero(),
            samplers: OnceLock::new(),
        }
    }

    /// Set the spline order: 0 for nearest neighbour, 1 for linear, up to 5.
    pub fn with_order(self, order: i64) -> Self {
        Self {
            order,
            samplers: OnceLock::new(),
            ..self
        }
    }

    pub fn with_mode(self, mode: BoundaryMode) -> Self {
        Self {
            mode,
            samplers: OnceLock::new(),
            ..self
        }
    }

    /// Set the fill value used beyond the grid in [BoundaryMode::Constant].
    pub fn with_cval(self, cval: F) -> Self {
        Self {
            cval,
            samplers: OnceLock::new(),
            ..self
        }
    }

    pub fn grid(&self) -> &ControlGrid<F> {
        &self.grid
    }

    /// Number of control points along each axis.
    pub fn shape(&self) -> &[usize] {
        self.grid.shape()
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn mode(&self) -> BoundaryMode {
        self.mode
    }

    pub fn cval(&self) -> F {
        self.cval
    }

    fn samplers(&self) -> Result<&[SplineSampler<F>]> {
        if let Some(s) = self.samplers.get() {
            return Ok(s);
        }
        let shape = self.grid.shape();
        let built = self
            .grid
            .components()
            .map(|c| SplineSampler::try_new(c, shape, self.order, self.mode, self.cval))
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "Fitted order {} splines in {} mode to {}",
            self.order,
            self.mode,
            self
        );
        Ok(self.samplers.get_or_init(|| built))
    }

    /// Factor scaling each normalized axis onto control point indices.
    fn index_scale(&self) -> ShortVec<F> {
        self.shape()
            .iter()
            .map(|n| F::from_usize(n - 1).unwrap_or_else(F::nan))
            .collect()
    }

    /// Convert and rescale columns into control point index space.
    fn check_and_rescale<P: Real>(&self, columns: &[&[P]]) -> Result<Vec<Vec<F>>> {
        if P::PRECISION != F::PRECISION {
            return Err(BSplineError::Precision {
                expected: F::PRECISION,
                actual: P::PRECISION,
            });
        }
        if columns.len() != self.ndim() {
            return Err(BSplineError::Dimension {
                expected: self.ndim(),
                actual: columns.len(),
            });
        }
        let n_pts = columns[0].len();
        if let Some(bad) = columns.iter().find(|c| c.len() != n_pts) {
            return Err(BSplineError::ColumnLength {
                expected: n_pts,
                actual: bad.len(),
            });
        }
        Ok(columns
            .iter()
            .zip(self.index_scale())
            .map(|(col, s)| col.iter().map(|p| convert::<P, F>(*p) * s).collect())
            .collect())
    }

    /// Sample every displacement component at every point in index space.
    fn sample_columns(samplers: &[SplineSampler<F>], scaled: &[&[F]]) -> Vec<Vec<F>> {
        let n_pts = scaled.first().map_or(0, |c| c.len());

        #[cfg(feature = "parallel")]
        let iter = samplers.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = samplers.iter();

        iter.map(|s| {
            let mut buf = vec![F::nan(); n_pts];
            s.column_get_into(scaled, &mut buf);
            buf
        })
        .collect()
    }

    /// Interpolate the displacement field at points given as one column per axis.
    pub fn displacement<P: Real>(&self, columns: &[&[P]]) -> Result<Vec<Vec<P>>> {
        let scaled = self.check_and_rescale(columns)?;
        let samplers = self.samplers()?;
        let scaled_refs: Vec<&[F]> = scaled.iter().map(|c| c.as_slice()).collect();
        Ok(Self::sample_columns(samplers, &scaled_refs)
            .into_iter()
            .map(|col| col.into_iter().map(convert::<F, P>).collect())
            .collect())
    }

    /// Map points given as one column per axis, each in the transform's precision.
    ///
    /// Returns one column per axis, each the same length as the input columns.
    pub fn map_points<P: Real>(&self, columns: &[&[P]]) -> Result<Vec<Vec<P>>> {
        let mut out = self.displacement(columns)?;
        for (out_col, col) in out.iter_mut().zip(columns.iter()) {
            for (o, p) in out_col.iter_mut().zip(col.iter()) {
                *o = *o + *p;
            }
        }
        log::trace!("Mapped {} points through {}", columns[0].len(), self);
        Ok(out)
    }
}

impl<F: Real> Display for BSplineTransformation<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shape: Vec<String> = self.shape().iter().map(|n| n.to_string()).collect();
        write!(
            f,
            "BSplineTransformation({}D, {})",
            self.ndim(),
            shape.join("x")
        )
    }
}

/// Invalid spline configurations map every point to NaN;
/// use [BSplineTransformation::map_points] to get the error instead.
impl<F: Real> Transformation<F> for BSplineTransformation<F> {
    fn transform_into(&self, pt: &[F], buf: &mut [F]) {
        let samplers = match self.samplers() {
            Ok(s) => s,
            Err(e) => {
                log::error!("Cannot transform points with {self}: {e}");
                buf.fill(F::nan());
                return;
            }
        };
        let mut scaled: ShortVec<F> = smallvec![F::nan(); pt.len()];
        for ((s, p), factor) in scaled.iter_mut().zip(pt.iter()).zip(self.index_scale()) {
            *s = *p * factor;
        }
        for ((o, p), sampler) in buf.iter_mut().zip(pt.iter()).zip(samplers.iter()) {
            *o = *p + sampler.get(&scaled);
        }
    }

    fn column_transform_into(&self, columns: &[&[F]], bufs: &mut [&mut [F]]) {
        let mapped = match self.map_points(columns) {
            Ok(m) => m,
            Err(e) => {
                log::error!("Cannot transform points with {self}: {e}");
                for b in bufs.iter_mut() {
                    b.fill(F::nan());
                }
                return;
            }
        };
        for (b, m) in bufs.iter_mut().zip(mapped.iter()) {
            b.copy_from_slice(m);
        }
    }

    fn is_identity(&self) -> bool {
        self.grid.values().iter().all(|v| v.is_zero())
            && (self.mode != BoundaryMode::Constant || self.cval.is_zero())
            && crate::spline::check_order(self.order).is_ok()
    }

    fn ndim(&self) -> usize {
        self.grid.ndim()
    }
}
