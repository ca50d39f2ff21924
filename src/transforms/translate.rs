use std::fmt::Display;

use smallvec::ToSmallVec;

use crate::{BSplineError, Real, ShortVec, Transformation, error::Result};

/// Translate each coordinate by adding a constant value.
#[derive(Debug, Clone)]
pub struct Translate<F: Real>(ShortVec<F>);

impl<F: Real> Translate<F> {
    pub fn try_new(translate: &[F]) -> Result<Self> {
        if translate.iter().any(|t| !t.is_finite()) {
            return Err(BSplineError::NonFinite {
                what: "translation",
            });
        }
        Ok(Self(translate.to_smallvec()))
    }

    pub fn translation(&self) -> &[F] {
        &self.0
    }
}

impl<F: Real> Display for Translate<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Translate({}D)", self.0.len())
    }
}

impl<F: Real> Transformation<F> for Translate<F> {
    fn transform_into(&self, pt: &[F], buf: &mut [F]) {
        for ((o, p), t) in buf.iter_mut().zip(pt.iter()).zip(self.0.iter()) {
            *o = *t + *p;
        }
    }

    fn column_transform_into(&self, columns: &[&[F]], bufs: &mut [&mut [F]]) {
        for ((col_in, buf_in), t) in columns.iter().zip(bufs.iter_mut()).zip(self.0.iter()) {
            for (c, b) in col_in.iter().zip(buf_in.iter_mut()) {
                *b = *c + *t;
            }
        }
    }

    fn is_identity(&self) -> bool {
        self.0.iter().all(|t| t.is_zero())
    }

    fn ndim(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Translate;
    use crate::{
        BSplineError, Transformation,
        tests::{check_transform_bulk, check_transform_col},
    };

    fn make_transform() -> Translate<f64> {
        Translate::try_new(&[0.1, 0.05, -0.2]).unwrap()
    }

    #[test]
    fn test_bulk() {
        check_transform_bulk(make_transform());
    }

    #[test]
    fn test_columns() {
        check_transform_col(make_transform());
    }

    #[test]
    fn test_non_finite() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                Translate::try_new(&[0.0, bad]).unwrap_err(),
                BSplineError::NonFinite {
                    what: "translation"
                }
            );
        }
    }

    #[test]
    fn test_identity() {
        assert!(Translate::try_new(&[0.0f32, 0.0]).unwrap().is_identity());
        assert!(!make_transform().is_identity());
    }
}
