//! Point transformations in the normalized `[0, 1)^ndim` domain.
mod bspline;
pub use bspline::{BSplineTransformation, DEFAULT_ORDER};

mod identity;
pub use identity::Identity;

mod sequence;
pub use sequence::{Sequence, SequenceBuilder};

mod translate;
pub use translate::Translate;
