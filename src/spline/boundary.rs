use std::{fmt::Display, str::FromStr};

use crate::{BSplineError, Real};

/// How virtual samples beyond the extent of a grid axis are defined.
///
/// For an axis of length 4 holding `a b c d`:
///
/// | mode     | extension           |
/// |----------|---------------------|
/// | Constant | `k k k \| a b c d \| k k k` |
/// | Nearest  | `a a a \| a b c d \| d d d` |
/// | Mirror   | `d c b \| a b c d \| c b a` |
/// | Reflect  | `c b a \| a b c d \| d c b` |
/// | Wrap     | `b c d \| a b c d \| a b c` |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryMode {
    /// Fill with a constant value.
    Constant,
    /// Repeat the edge sample.
    Nearest,
    /// Reflect about the edge sample, without repeating it.
    #[default]
    Mirror,
    /// Reflect about the edge of the sample, repeating the edge sample.
    Reflect,
    /// Periodic extension.
    Wrap,
}

impl BoundaryMode {
    pub const ALL: [BoundaryMode; 5] = [
        BoundaryMode::Constant,
        BoundaryMode::Nearest,
        BoundaryMode::Mirror,
        BoundaryMode::Reflect,
        BoundaryMode::Wrap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryMode::Constant => "constant",
            BoundaryMode::Nearest => "nearest",
            BoundaryMode::Mirror => "mirror",
            BoundaryMode::Reflect => "reflect",
            BoundaryMode::Wrap => "wrap",
        }
    }

    /// Map a possibly out-of-range sample index onto an axis of length `len`.
    ///
    /// `None` means the sample takes the constant fill value.
    /// `len` must be non-zero.
    pub fn map_index(&self, idx: i64, len: usize) -> Option<usize> {
        let n = len as i64;
        let mapped = match self {
            BoundaryMode::Constant => {
                if idx < 0 || idx >= n {
                    return None;
                }
                idx
            }
            BoundaryMode::Nearest => idx.clamp(0, n - 1),
            BoundaryMode::Mirror => {
                if n == 1 {
                    return Some(0);
                }
                let period = 2 * (n - 1);
                let m = idx.rem_euclid(period);
                if m >= n { period - m } else { m }
            }
            BoundaryMode::Reflect => {
                let period = 2 * n;
                let m = idx.rem_euclid(period);
                if m >= n { period - 1 - m } else { m }
            }
            BoundaryMode::Wrap => idx.rem_euclid(n),
        };
        Some(mapped as usize)
    }

    /// Length of one period of the extended signal, for the periodic modes.
    pub(crate) fn period(&self, len: usize) -> Option<usize> {
        match self {
            BoundaryMode::Mirror => Some(2 * len.saturating_sub(1)),
            BoundaryMode::Reflect => Some(2 * len),
            BoundaryMode::Wrap => Some(len),
            BoundaryMode::Constant | BoundaryMode::Nearest => None,
        }
    }

    /// Move a sample position on an axis of `len` coefficients into a bounded range
    /// without changing the value a spline of `order` takes there.
    ///
    /// Keeps tap indices exact for very large coordinates.
    pub(crate) fn fold_coordinate<F: Real>(&self, x: F, len: usize, order: usize) -> F {
        let last = F::lit(len.saturating_sub(1) as f64);
        match self {
            // the extension is flat beyond the edge samples
            BoundaryMode::Nearest => x.max(F::zero()).min(last),
            BoundaryMode::Constant => {
                let margin = F::lit((order + 2) as f64);
                x.max(-margin).min(last + margin)
            }
            BoundaryMode::Mirror | BoundaryMode::Reflect | BoundaryMode::Wrap => {
                match self.period(len) {
                    Some(p) if p > 0 => {
                        let p = F::lit(p as f64);
                        let r = x % p;
                        if r < F::zero() { r + p } else { r }
                    }
                    _ => F::zero(),
                }
            }
        }
    }
}

impl Display for BoundaryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryMode {
    type Err = BSplineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| BSplineError::UnsupportedMode(s.to_string()))
    }
}
