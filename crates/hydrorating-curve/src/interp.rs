//! Piecewise-linear interpolation over monotonic curves.

use crate::error::OutOfDomain;

/// Piecewise-linear function through points with strictly increasing `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Build an interpolator from points taken in order.
    ///
    /// A point whose `x` does not exceed the last kept `x` is dropped, so a
    /// curve with plateaus or dips keeps its monotonic envelope. Returns
    /// `None` when no point has a finite `x`.
    #[must_use]
    pub fn monotonic(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut xs: Vec<f64> = Vec::new();
        let mut ys: Vec<f64> = Vec::new();
        for (x, y) in points {
            if !x.is_finite() {
                continue;
            }
            if xs.last().is_none_or(|&last| x > last) {
                xs.push(x);
                ys.push(y);
            }
        }
        if xs.is_empty() { None } else { Some(Self { xs, ys }) }
    }

    /// Return the `(min, max)` abscissa.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Return the number of nodes kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false; an interpolator holds at least one node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Evaluate at `x`. Nodes return their stored value exactly.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfDomain`] when `x` is outside the node range or NaN.
    pub fn evaluate(&self, x: f64) -> Result<f64, OutOfDomain> {
        let (min, max) = self.domain();
        if !(min..=max).contains(&x) {
            return Err(OutOfDomain { value: x, min, max });
        }
        let i = self.xs.partition_point(|&v| v < x);
        if self.xs[i] == x {
            return Ok(self.ys[i]);
        }
        let (x0, x1) = (self.xs[i - 1], self.xs[i]);
        let (y0, y1) = (self.ys[i - 1], self.ys[i]);
        Ok(y0 + (x - x0) * (y1 - y0) / (x1 - x0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> LinearInterpolator {
        LinearInterpolator::monotonic([(0.0, 10.0), (2.0, 14.0), (4.0, 15.0)]).unwrap()
    }

    #[test]
    fn exact_at_nodes() {
        let f = line();
        assert_eq!(f.evaluate(0.0).unwrap(), 10.0);
        assert_eq!(f.evaluate(2.0).unwrap(), 14.0);
        assert_eq!(f.evaluate(4.0).unwrap(), 15.0);
    }

    #[test]
    fn linear_between_nodes() {
        assert!((line().evaluate(1.0).unwrap() - 12.0).abs() < 1e-12);
        assert!((line().evaluate(3.0).unwrap() - 14.5).abs() < 1e-12);
    }

    #[test]
    fn outside_domain_fails() {
        let err = line().evaluate(4.5).unwrap_err();
        assert_eq!(err, OutOfDomain { value: 4.5, min: 0.0, max: 4.0 });
        assert!(line().evaluate(-0.1).is_err());
        assert!(line().evaluate(f64::NAN).is_err());
    }

    #[test]
    fn plateaus_and_dips_are_dropped() {
        let f = LinearInterpolator::monotonic([(0.0, 0.0), (1.0, 1.0), (1.0, 2.0), (0.5, 3.0), (2.0, 4.0)])
            .unwrap();
        assert_eq!(f.len(), 3);
        assert_eq!(f.evaluate(1.0).unwrap(), 1.0);
        assert!((f.evaluate(1.5).unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn empty_input_has_no_interpolator() {
        assert!(LinearInterpolator::monotonic(std::iter::empty()).is_none());
        assert!(LinearInterpolator::monotonic([(f64::NAN, 1.0)]).is_none());
    }

    #[test]
    fn single_node_resolves_only_itself() {
        let f = LinearInterpolator::monotonic([(3.0, 7.0)]).unwrap();
        assert_eq!(f.evaluate(3.0).unwrap(), 7.0);
        assert!(f.evaluate(3.1).is_err());
    }
}
