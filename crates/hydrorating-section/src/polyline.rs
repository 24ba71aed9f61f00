//! Bottom profile polyline with validation guarantees.

use std::ops::RangeInclusive;

use crate::error::SectionError;

/// Owned, validated bottom polyline of `(x, y)` points.
///
/// Guaranteed to hold at least two points, all finite, with non-decreasing
/// chainage `x`. Elevations `y` are unconstrained.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Polyline {
    /// Create a new polyline from parallel chainage and elevation vectors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SectionError::LengthMismatch`] | `xs.len() != ys.len()` |
    /// | [`SectionError::TooFewPoints`] | Fewer than two points |
    /// | [`SectionError::NonFiniteCoordinate`] | Any coordinate is NaN or infinite |
    /// | [`SectionError::DecreasingChainage`] | `xs` decreases anywhere |
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, SectionError> {
        if xs.len() != ys.len() {
            return Err(SectionError::LengthMismatch { n_x: xs.len(), n_y: ys.len() });
        }
        if xs.len() < 2 {
            return Err(SectionError::TooFewPoints { n_points: xs.len() });
        }
        if let Some(index) = xs
            .iter()
            .zip(&ys)
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(SectionError::NonFiniteCoordinate { index });
        }
        if let Some(index) = (1..xs.len()).find(|&i| xs[i] < xs[i - 1]) {
            return Err(SectionError::DecreasingChainage {
                index,
                x: xs[index],
                previous: xs[index - 1],
            });
        }
        Ok(Self { xs, ys })
    }

    /// Return the chainage coordinates.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Return the elevation coordinates.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Return true if the polyline has no points.
    ///
    /// A [`Polyline`] constructed via [`Polyline::new`] always has at least
    /// two points. Provided to satisfy the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Return the index of the lowest point. Ties resolve to the first one.
    #[must_use]
    pub fn min_index(&self) -> usize {
        let mut best = 0;
        for (i, &y) in self.ys.iter().enumerate().skip(1) {
            if y < self.ys[best] {
                best = i;
            }
        }
        best
    }

    /// Return the lowest elevation.
    #[must_use]
    pub fn min_elevation(&self) -> f64 {
        self.ys[self.min_index()]
    }

    /// Return the highest elevation.
    #[must_use]
    pub fn max_elevation(&self) -> f64 {
        self.ys.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Return the horizontal extent `x_last - x_first`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.xs[self.xs.len() - 1] - self.xs[0]
    }

    /// Return the highest elevation of the left and right halves.
    ///
    /// The left half holds the first `ceil(n / 2)` points and the right half
    /// the rest. These are the ridges water must top before spilling into the
    /// neighbouring sector on that side.
    #[must_use]
    pub fn half_maxima(&self) -> (f64, f64) {
        let mid = self.ys.len().div_ceil(2);
        let max = |s: &[f64]| s.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (max(&self.ys[..mid]), max(&self.ys[mid..]))
    }

    /// Copy the points in `range` into a new polyline.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::TooFewPoints`] if the range covers fewer than
    /// two points, or [`SectionError::StartOutOfBounds`] if it ends past the
    /// last point.
    pub fn slice(&self, range: RangeInclusive<usize>) -> Result<Self, SectionError> {
        let (start, end) = (*range.start(), *range.end());
        if end >= self.len() {
            return Err(SectionError::StartOutOfBounds { index: end, n_points: self.len() });
        }
        if end <= start {
            return Err(SectionError::TooFewPoints { n_points: end.saturating_sub(start) + 1 });
        }
        Ok(Self {
            xs: self.xs[start..=end].to_vec(),
            ys: self.ys[start..=end].to_vec(),
        })
    }
}
