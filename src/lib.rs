//! Free-form deformation of point coordinates by a B-spline control grid.
//!
//! A [BSplineTransformation] holds a [ControlGrid] of displacement vectors
//! spanning the normalized domain `[0, 1)^ndim`.
//! Query points are scaled onto the grid, the displacement field is interpolated there
//! by a [SplineSampler] of configurable order and [BoundaryMode],
//! and the interpolated displacement is added to each point.
use smallvec::SmallVec;

mod error;
pub use error::{BSplineError, ErrorKind, Result};

mod real;
pub use real::{Precision, Real};

mod layout;

pub mod spline;
pub use spline::{BoundaryMode, Interpolate, SplineSampler};

mod grid;
pub use grid::{ControlGrid, max_no_fold_scale};

pub mod transforms;
pub use transforms::{
    BSplineTransformation, Identity, Sequence, SequenceBuilder, Translate,
};

mod alloc;
pub use alloc::TransformExt;

mod traits;
pub use traits::Transformation;

pub const COORD_SIZE: usize = 6;

/// A short vector type alias for convenience,
/// sized to hold a point of typical dimensionality on the stack.
type ShortVec<T> = SmallVec<[T; COORD_SIZE]>;

/// Convenience function for turning a slice of sliceables into a vec of slices.
/// Allocates a new vec.
pub(crate) fn as_refs<T, Inner: AsRef<[T]>>(input: &[Inner]) -> Vec<&[T]> {
    input.iter().map(|v| v.as_ref()).collect()
}

/// Convenience function for turning a mut slice of sliceables into a vec of mut slices.
/// Allocates a new vec.
pub(crate) fn as_muts<T, Inner: AsMut<[T]>>(input: &mut [Inner]) -> Vec<&mut [T]> {
    input.iter_mut().map(|v| v.as_mut()).collect()
}
