use std::fmt::Display;

use crate::{Real, Transformation};

/// A no-op transform which returns the input point as the output point.
///
/// Defined for one dimensionality.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity(usize);

impl Identity {
    pub fn new(ndim: usize) -> Self {
        Self(ndim)
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Identity({}D)", self.0)
    }
}

impl<F: Real> Transformation<F> for Identity {
    fn transform_into(&self, pt: &[F], buf: &mut [F]) {
        buf.copy_from_slice(pt);
    }

    fn column_transform_into(&self, columns: &[&[F]], bufs: &mut [&mut [F]]) {
        for (c, b) in columns.iter().zip(bufs.iter_mut()) {
            b.copy_from_slice(c);
        }
    }

    fn is_identity(&self) -> bool {
        true
    }

    fn ndim(&self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Identity;
    use crate::tests::{check_transform_bulk, check_transform_col};

    #[test]
    fn test_bulk() {
        check_transform_bulk::<f64, _>(Identity::new(3));
    }

    #[test]
    fn test_columns() {
        check_transform_col::<f32, _>(Identity::new(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(Identity::new(2).to_string(), "Identity(2D)");
    }
}
