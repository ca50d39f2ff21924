//! Error types for grid construction and point mapping.

use thiserror::Error;

use crate::Precision;

/// Broad category of a [BSplineError].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The control-point grid is malformed.
    Shape,
    /// Points do not use the transform's floating-point precision.
    Precision,
    /// Spline order, boundary mode or a transform parameter is unusable.
    Config,
    /// Points or transforms disagree on dimensionality.
    Dimension,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BSplineError {
    /// Leading axis of the grid does not match its spatial rank.
    #[error("first axis of grid should equal the transform's ndim {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    /// Flat grid buffer does not hold as many values as its shape describes.
    #[error("grid shape {shape:?} requires {expected} values, got {actual}")]
    GridSize {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Grid has no spatial axes, or a spatial axis has no control points.
    #[error("grid shape {shape:?} has no control points")]
    EmptyGrid { shape: Vec<usize> },

    #[error("points are {actual} precision but the transform uses {expected} precision")]
    Precision {
        expected: Precision,
        actual: Precision,
    },

    #[error("unsupported boundary mode {0:?}")]
    UnsupportedMode(String),

    #[error(
        "spline order {0} is not supported, expected 0 to {max}",
        max = crate::spline::MAX_ORDER
    )]
    InvalidOrder(i64),

    #[error("{what} is not finite")]
    NonFinite { what: &'static str },

    #[error("dimension mismatch: expected {expected}D, got {actual}D")]
    Dimension { expected: usize, actual: usize },

    #[error("a sequence needs at least one transformation")]
    EmptySequence,

    /// Point columns of one batch have different lengths.
    #[error("point columns should all have length {expected}, got {actual}")]
    ColumnLength { expected: usize, actual: usize },
}

impl BSplineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Shape { .. } | Self::GridSize { .. } | Self::EmptyGrid { .. } => ErrorKind::Shape,
            Self::Precision { .. } => ErrorKind::Precision,
            Self::UnsupportedMode(_) | Self::InvalidOrder(_) | Self::NonFinite { .. } => {
                ErrorKind::Config
            }
            Self::Dimension { .. } | Self::ColumnLength { .. } | Self::EmptySequence => {
                ErrorKind::Dimension
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BSplineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            BSplineError::Shape {
                expected: 2,
                actual: 3
            }
            .kind(),
            ErrorKind::Shape
        );
        assert_eq!(BSplineError::InvalidOrder(-1).kind(), ErrorKind::Config);
        assert_eq!(
            BSplineError::UnsupportedMode("foo".into()).kind(),
            ErrorKind::Config
        );
        assert_eq!(BSplineError::EmptySequence.kind(), ErrorKind::Dimension);
    }

    #[test]
    fn test_shape_message() {
        let msg = BSplineError::Shape {
            expected: 2,
            actual: 3,
        }
        .to_string();
        assert_eq!(
            msg,
            "first axis of grid should equal the transform's ndim 2, got 3"
        );
    }
}
