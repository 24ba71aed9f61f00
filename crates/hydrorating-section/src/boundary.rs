//! Location of the points where a water surface meets the bottom profile.

use tracing::instrument;

use crate::error::{SectionError, Side};
use crate::polyline::Polyline;

/// One end of a wetted section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPoint {
    /// Chainage where the water surface meets the bottom.
    pub x: f64,
    /// Index of the bottom vertex immediately inside the boundary.
    pub vertex: usize,
    /// True when the search ran off the end of the polyline and the boundary
    /// was placed on the end vertex instead of an interpolated crossing.
    pub clamped: bool,
}

/// Left and right water-surface boundaries of one wetted body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    /// Water level the boundary was located for.
    pub level: f64,
    /// Boundary towards decreasing chainage.
    pub left: BoundaryPoint,
    /// Boundary towards increasing chainage.
    pub right: BoundaryPoint,
}

impl Boundary {
    /// Return the water surface width `x_right - x_left`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right.x - self.left.x
    }
}

/// Chainage where the level crosses segment `(x1, y1) - (x2, y2)`.
///
/// `x` is interpolated as a function of `y`. A horizontal segment lying on
/// the water surface resolves to `inner_x`, the end nearest the wetted body.
fn crossing_x(x1: f64, y1: f64, x2: f64, y2: f64, level: f64, inner_x: f64) -> f64 {
    if y1 == y2 {
        return inner_x;
    }
    x1 + (level - y1) * (x2 - x1) / (y2 - y1)
}

/// Locate the wetted-section boundaries around `start` for `level`.
///
/// The search walks from `start` towards index 0 until a segment straddles
/// the level, then mirrors the walk towards the last index. A walk that
/// reaches the end of the polyline without a crossing places the boundary on
/// the end vertex. `start` defaults to the lowest point of the polyline.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SectionError::NonFiniteLevel`] | `level` is NaN or infinite |
/// | [`SectionError::LevelBelowBottom`] | `level` is below the lowest point |
/// | [`SectionError::StartOutOfBounds`] | `start` is past the last point |
/// | [`SectionError::DryStartPoint`] | The start vertex lies above `level` |
/// | [`SectionError::BoundaryNotFound`] | No crossing on one side |
#[instrument(level = "trace", skip(polyline), fields(n_points = polyline.len()))]
pub fn locate_boundary(
    polyline: &Polyline,
    level: f64,
    start: Option<usize>,
) -> Result<Boundary, SectionError> {
    if !level.is_finite() {
        return Err(SectionError::NonFiniteLevel { level });
    }
    let bottom = polyline.min_elevation();
    if level < bottom {
        return Err(SectionError::LevelBelowBottom { level, bottom });
    }

    let (xs, ys) = (polyline.xs(), polyline.ys());
    let n = polyline.len();
    let start = start.unwrap_or_else(|| polyline.min_index());
    if start >= n {
        return Err(SectionError::StartOutOfBounds { index: start, n_points: n });
    }
    if ys[start] > level {
        return Err(SectionError::DryStartPoint { index: start, elevation: ys[start], level });
    }

    let left = search_left(xs, ys, level, start)
        .ok_or(SectionError::BoundaryNotFound { side: Side::Left, level })?;
    let right = search_right(xs, ys, level, start)
        .ok_or(SectionError::BoundaryNotFound { side: Side::Right, level })?;

    Ok(Boundary { level, left, right })
}

fn search_left(xs: &[f64], ys: &[f64], level: f64, start: usize) -> Option<BoundaryPoint> {
    if start == 0 {
        return Some(BoundaryPoint { x: xs[0], vertex: 0, clamped: true });
    }
    for i in (1..=start).rev() {
        if ys[i - 1] >= level && ys[i] <= level {
            let x = crossing_x(xs[i - 1], ys[i - 1], xs[i], ys[i], level, xs[i]);
            return Some(BoundaryPoint { x, vertex: i, clamped: false });
        }
        if i - 1 == 0 && ys[0] <= level {
            return Some(BoundaryPoint { x: xs[0], vertex: 0, clamped: true });
        }
    }
    None
}

fn search_right(xs: &[f64], ys: &[f64], level: f64, start: usize) -> Option<BoundaryPoint> {
    let last = xs.len() - 1;
    if start == last {
        return Some(BoundaryPoint { x: xs[last], vertex: last, clamped: true });
    }
    for i in start..last {
        if ys[i] <= level && ys[i + 1] >= level {
            let x = crossing_x(xs[i], ys[i], xs[i + 1], ys[i + 1], level, xs[i]);
            return Some(BoundaryPoint { x, vertex: i, clamped: false });
        }
        if i + 1 == last && ys[last] <= level {
            return Some(BoundaryPoint { x: xs[last], vertex: last, clamped: true });
        }
    }
    None
}
