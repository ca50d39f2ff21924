use rand::Rng;
use smallvec::ToSmallVec;

use crate::{BSplineError, Real, ShortVec, error::Result, layout::RowMajor};

/// Displacement vectors on a regular lattice of control points.
///
/// Values are held C-ordered with logical shape `[ndim, N1, ..., Nndim]`,
/// so `values[d, i1, ..., indim]` is the displacement along axis `d`
/// at control point `(i1, ..., indim)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlGrid<F: Real> {
    values: Vec<F>,
    layout: RowMajor,
}

impl<F: Real> ControlGrid<F> {
    /// Copy a C-ordered buffer with the full shape `[ndim, N1, ..., Nndim]`.
    ///
    /// The length of the first axis must equal the number of remaining axes.
    pub fn try_new(values: &[F], full_shape: &[usize]) -> Result<Self> {
        let Some((&leading, spatial)) = full_shape.split_first() else {
            return Err(BSplineError::EmptyGrid { shape: vec![] });
        };
        if leading != spatial.len() {
            return Err(BSplineError::Shape {
                expected: spatial.len(),
                actual: leading,
            });
        }
        if spatial.is_empty() || spatial.contains(&0) {
            return Err(BSplineError::EmptyGrid {
                shape: full_shape.to_vec(),
            });
        }
        let numel: usize = full_shape.iter().product();
        if values.len() != numel {
            return Err(BSplineError::GridSize {
                shape: full_shape.to_vec(),
                expected: numel,
                actual: values.len(),
            });
        }
        log::debug!("Creating {}D control grid of shape {:?}", leading, spatial);
        Ok(Self {
            values: values.to_vec(),
            layout: RowMajor::new(full_shape),
        })
    }

    /// A grid with no displacement at the given spatial `shape`.
    pub fn zeros(shape: &[usize]) -> Result<Self> {
        Self::from_axis_constants(shape, &vec![F::zero(); shape.len()])
    }

    /// A grid displacing every control point by the same vector.
    pub fn from_axis_constants(shape: &[usize], displacement: &[F]) -> Result<Self> {
        if displacement.len() != shape.len() {
            return Err(BSplineError::Dimension {
                expected: shape.len(),
                actual: displacement.len(),
            });
        }
        let n_points: usize = shape.iter().product();
        let mut values = Vec::with_capacity(n_points * shape.len());
        for d in displacement {
            values.extend(std::iter::repeat_n(*d, n_points));
        }
        Self::try_new(&values, &full_shape(shape))
    }

    /// A grid of displacements drawn uniformly from `[-scale[d], scale[d])` for each axis `d`.
    ///
    /// See [max_no_fold_scale] for a scale which cannot fold the deformation.
    pub fn random_uniform<R: Rng>(shape: &[usize], scale: &[F], rng: &mut R) -> Result<Self> {
        if scale.len() != shape.len() {
            return Err(BSplineError::Dimension {
                expected: shape.len(),
                actual: scale.len(),
            });
        }
        if scale.iter().any(|s| !s.is_finite()) {
            return Err(BSplineError::NonFinite { what: "scale" });
        }
        let n_points: usize = shape.iter().product();
        let mut values = Vec::with_capacity(n_points * shape.len());
        for s in scale {
            values.extend(std::iter::repeat_with(|| {
                let u = F::lit(rng.random::<f64>());
                *s * (F::lit(2.0) * u - F::one())
            })
            .take(n_points));
        }
        Self::try_new(&values, &full_shape(shape))
    }

    /// Number of spatial dimensions.
    pub fn ndim(&self) -> usize {
        self.layout.ndim() - 1
    }

    /// Number of control points along each spatial axis.
    pub fn shape(&self) -> &[usize] {
        &self.layout.shape()[1..]
    }

    /// Shape including the leading component axis.
    pub fn full_shape(&self) -> &[usize] {
        self.layout.shape()
    }

    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Displacements along axis `d` for every control point, C-ordered with [ControlGrid::shape].
    ///
    /// Panics if `d` is not less than [ControlGrid::ndim].
    pub fn component(&self, d: usize) -> &[F] {
        let stride = self.layout.strides()[0];
        &self.values[d * stride..(d + 1) * stride]
    }

    pub fn components(&self) -> impl Iterator<Item = &[F]> {
        self.values.chunks_exact(self.layout.strides()[0])
    }

    /// Displacement vector at a control point.
    pub fn get(&self, index: &[usize]) -> Option<ShortVec<F>> {
        if index.len() != self.ndim() {
            return None;
        }
        let spatial = RowMajor::new(self.shape());
        let offset = spatial.linear_idx(index)?;
        Some(self.components().map(|c| c[offset]).collect())
    }
}

#[cfg(feature = "ndarray")]
impl<F: Real> ControlGrid<F> {
    /// Copy an array of shape `[ndim, N1, ..., Nndim]`, in any memory order.
    pub fn from_ndarray<S: ndarray::Data<Elem = F>>(
        array: &ndarray::ArrayBase<S, ndarray::IxDyn>,
    ) -> Result<Self> {
        let values: Vec<F> = array.iter().copied().collect();
        Self::try_new(&values, array.shape())
    }
}

fn full_shape(shape: &[usize]) -> ShortVec<usize> {
    let mut full: ShortVec<usize> = shape.to_smallvec();
    full.insert(0, shape.len());
    full
}

/// Largest per-axis displacement scale for [ControlGrid::random_uniform]
/// which cannot fold a grid of the given spatial `shape`.
///
/// Axes with a single control point cannot be displaced and get a scale of 0.
pub fn max_no_fold_scale<F: Real>(shape: &[usize]) -> ShortVec<F> {
    shape
        .iter()
        .map(|n| match n {
            0 | 1 => F::zero(),
            n => F::lit(0.5 / (4.0 * (n - 1) as f64)),
        })
        .collect()
}
