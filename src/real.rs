use std::fmt::{Debug, Display};

use num_traits::{Float, FromPrimitive, NumCast};

/// Floating-point precision of grids and points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
}

impl Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::Single => write!(f, "single (f32)"),
            Precision::Double => write!(f, "double (f64)"),
        }
    }
}

/// Scalar type of control-point grids and points.
///
/// Implemented for [f32] and [f64] only.
pub trait Real:
    Float + FromPrimitive + NumCast + Default + Debug + Display + Send + Sync + 'static
{
    const PRECISION: Precision;

    /// Lossy conversion from an [f64] literal.
    fn lit(v: f64) -> Self;
}

impl Real for f32 {
    const PRECISION: Precision = Precision::Single;

    fn lit(v: f64) -> Self {
        v as f32
    }
}

impl Real for f64 {
    const PRECISION: Precision = Precision::Double;

    fn lit(v: f64) -> Self {
        v
    }
}

/// Convert between two [Real] types of the same precision.
///
/// Values are copied exactly; callers check precision beforehand.
pub(crate) fn convert<P: Real, F: Real>(v: P) -> F {
    <F as NumCast>::from(v).unwrap_or_else(F::nan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision() {
        assert_eq!(f32::PRECISION, Precision::Single);
        assert_eq!(f64::PRECISION, Precision::Double);
        assert_ne!(f32::PRECISION, f64::PRECISION);
    }

    #[test]
    fn test_convert_exact() {
        let v = 0.1f64;
        assert_eq!(convert::<f64, f64>(v), v);
        assert!(convert::<f64, f64>(f64::NAN).is_nan());
        assert_eq!(convert::<f32, f32>(f32::INFINITY), f32::INFINITY);
    }
}
