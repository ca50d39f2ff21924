use std::{fmt::Display, sync::Arc};

use smallvec::smallvec;

use crate::{BSplineError, Real, ShortVec, Transformation, as_muts, as_refs, error::Result};

/// Apply a sequence of transforms of the same dimensionality in order.
#[derive(Debug, Clone)]
pub struct Sequence<F: Real> {
    transforms: Vec<Arc<dyn Transformation<F>>>,
    ndim: usize,
}

impl<F: Real> Sequence<F> {
    pub fn try_new(transforms: Vec<Arc<dyn Transformation<F>>>) -> Result<Self> {
        let Some(ndim) = transforms.first().map(|t| t.ndim()) else {
            return Err(BSplineError::EmptySequence);
        };
        if let Some(bad) = transforms.iter().find(|t| t.ndim() != ndim) {
            return Err(BSplineError::Dimension {
                expected: ndim,
                actual: bad.ndim(),
            });
        }
        Ok(Self { transforms, ndim })
    }

    pub fn builder() -> SequenceBuilder<F> {
        SequenceBuilder(vec![])
    }

    pub fn transforms(&self) -> &[Arc<dyn Transformation<F>>] {
        &self.transforms
    }

    fn transform_into_inner(
        &self,
        pt: &[F],
        out_buf: &mut [F],
        mut buf0: ShortVec<F>,
        mut buf1: ShortVec<F>,
    ) -> (ShortVec<F>, ShortVec<F>) {
        let last_idx = self.transforms.len() - 1;
        for (idx, t) in self.transforms.iter().enumerate() {
            match (idx == 0, idx == last_idx) {
                (true, true) => t.transform_into(pt, out_buf),
                (true, false) => t.transform_into(pt, &mut buf1),
                (false, true) => t.transform_into(&buf0, out_buf),
                (false, false) => t.transform_into(&buf0, &mut buf1),
            }
            (buf0, buf1) = (buf1, buf0);
        }
        (buf0, buf1)
    }
}

impl<F: Real> Display for Sequence<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner: Vec<String> = self.transforms.iter().map(|t| t.to_string()).collect();
        write!(f, "Sequence({}D, {})", self.ndim, inner.join("∘"))
    }
}

impl<F: Real> Transformation<F> for Sequence<F> {
    fn transform_into(&self, pt: &[F], buf: &mut [F]) {
        self.transform_into_inner(
            pt,
            buf,
            smallvec![F::nan(); self.ndim],
            smallvec![F::nan(); self.ndim],
        );
    }

    fn bulk_transform_into(&self, pts: &[&[F]], bufs: &mut [&mut [F]]) {
        let mut buf0: ShortVec<F> = smallvec![F::nan(); self.ndim];
        let mut buf1: ShortVec<F> = smallvec![F::nan(); self.ndim];

        for (pt, buf) in pts.iter().zip(bufs.iter_mut()) {
            (buf0, buf1) = self.transform_into_inner(pt, buf, buf0, buf1);
        }
    }

    fn column_transform_into(&self, columns: &[&[F]], bufs: &mut [&mut [F]]) {
        let Some(n_pts) = columns.first().map(|c| c.len()) else {
            return;
        };
        let (first, rest) = match self.transforms.split_first() {
            Some((first, rest)) if !rest.is_empty() => (first, rest),
            _ => {
                self.transforms[0].column_transform_into(columns, bufs);
                return;
            }
        };

        let mut input = vec![vec![F::nan(); n_pts]; self.ndim];
        let mut output = vec![vec![F::nan(); n_pts]; self.ndim];
        first.column_transform_into(columns, &mut as_muts(&mut input));

        let last_idx = rest.len() - 1;
        for (idx, t) in rest.iter().enumerate() {
            if idx == last_idx {
                t.column_transform_into(&as_refs(&input), bufs);
            } else {
                t.column_transform_into(&as_refs(&input), &mut as_muts(&mut output));
                std::mem::swap(&mut input, &mut output);
            }
        }
    }

    fn is_identity(&self) -> bool {
        self.transforms.iter().all(|t| t.is_identity())
    }

    fn ndim(&self) -> usize {
        self.ndim
    }
}

#[derive(Debug, Default)]
pub struct SequenceBuilder<F: Real>(Vec<Arc<dyn Transformation<F>>>);

impl<F: Real> SequenceBuilder<F> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn add_arced(&mut self, t: Arc<dyn Transformation<F>>) -> Result<()> {
        if let Some(last_ndim) = self.0.last().map(|prev| prev.ndim()) {
            if t.ndim() != last_ndim {
                return Err(BSplineError::Dimension {
                    expected: last_ndim,
                    actual: t.ndim(),
                });
            }
        }
        self.0.push(t);
        Ok(())
    }

    pub fn add_transform<T: Transformation<F> + 'static>(&mut self, t: T) -> Result<()> {
        self.add_arced(Arc::new(t))
    }

    pub fn build(self) -> Result<Sequence<F>> {
        Sequence::try_new(self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Sequence;
    use crate::{
        BSplineError, BSplineTransformation, ControlGrid, Identity, Transformation, Translate,
        tests::{check_transform_bulk, check_transform_col, init_logger},
    };

    fn make_transform() -> Sequence<f64> {
        let values: Vec<f64> = (0..3 * 27).map(|i| 0.02 * (i % 5) as f64 - 0.04).collect();
        Sequence::try_new(vec![
            Arc::new(Translate::<f64>::try_new(&[0.1, -0.05, 0.2]).unwrap()),
            Arc::new(BSplineTransformation::try_new(&values, &[3, 3, 3, 3]).unwrap()),
            Arc::new(Translate::<f64>::try_new(&[-0.1, 0.05, 0.0]).unwrap()),
        ])
        .unwrap()
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
    fn test_single_columns() {
        let s = Sequence::<f32>::try_new(vec![Arc::new(Identity::new(3))]).unwrap();
        check_transform_col(s);
    }

    #[test]
    fn test_order_of_application() {
        init_logger();
        let grid = ControlGrid::<f64>::from_axis_constants(&[3, 3], &[0.1, -0.1]).unwrap();
        let mut builder = Sequence::<f64>::builder();
        builder
            .add_transform(Translate::try_new(&[0.25, 0.0]).unwrap())
            .unwrap();
        builder
            .add_transform(BSplineTransformation::from_grid(grid).with_order(1))
            .unwrap();
        let s = builder.build().unwrap();
        assert_eq!(
            s.to_string(),
            "Sequence(2D, Translate(2D)∘BSplineTransformation(2D, 3x3))"
        );
        let mut out = [0.0; 2];
        s.transform_into(&[0.25, 0.5], &mut out);
        approx::assert_abs_diff_eq!(out.as_slice(), [0.6, 0.4].as_slice(), epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_errors() {
        assert_eq!(
            Sequence::<f64>::try_new(vec![]).unwrap_err(),
            BSplineError::EmptySequence
        );
        let mut builder = Sequence::<f64>::builder();
        builder.add_transform(Identity::new(2)).unwrap();
        assert_eq!(
            builder.add_transform(Identity::new(3)).unwrap_err(),
            BSplineError::Dimension {
                expected: 2,
                actual: 3
            }
        );
        assert!(Sequence::<f64>::try_new(vec![
            Arc::new(Identity::new(2)),
            Arc::new(Identity::new(3))
        ])
        .is_err());
    }

    #[test]
    fn test_identity() {
        let s = Sequence::<f64>::try_new(vec![
            Arc::new(Identity::new(2)),
            Arc::new(Translate::<f64>::try_new(&[0.0, 0.0]).unwrap()),
        ])
        .unwrap();
        assert!(s.is_identity());
        assert!(!make_transform().is_identity());
    }
}
