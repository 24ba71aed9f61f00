//! Geometric and hydraulic metrics of a wetted cross-section.

use crate::boundary::{locate_boundary, Boundary};
use crate::error::SectionError;
use crate::polyline::Polyline;

/// Floor substituted for a zero average depth or hydraulic radius.
///
/// Keeps the depth-dependent coefficient formulas defined when a section is
/// wetted to zero depth. It is a numerical stabilizer, not a physical depth.
pub const DEPTH_FLOOR: f64 = 1e-5;

/// Area of a simple polygon by the shoelace formula. The polygon is closed
/// implicitly from the last vertex back to the first.
#[must_use]
pub fn polygon_area(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            xs[i] * ys[j] - xs[j] * ys[i]
        })
        .sum();
    0.5 * twice.abs()
}

/// One contiguous wetted body between a pair of water boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct WettedBody {
    /// The boundaries the body was measured between.
    pub boundary: Boundary,
    /// Chainage of the wetted polyline, boundary points included.
    pub xs: Vec<f64>,
    /// Elevation of the wetted polyline, boundary points included.
    pub ys: Vec<f64>,
    /// Water surface width.
    pub width: f64,
    /// Wetted area.
    pub area: f64,
    /// Area over width, floored at [`DEPTH_FLOOR`].
    pub average_depth: f64,
    /// Deepest point below the water surface.
    pub max_depth: f64,
    /// Summed horizontal extent of the wetted polyline segments.
    pub wet_perimeter: f64,
    /// Area over wetted perimeter, floored at [`DEPTH_FLOOR`].
    pub r_hydraulic: f64,
}

impl WettedBody {
    /// Measure the body enclosed by `boundary` on `polyline`.
    ///
    /// The wetted polyline runs from the left boundary point along every
    /// bottom vertex between the two inner vertices to the right boundary
    /// point. A boundary clamped to a profile end keeps that end vertex in
    /// the polyline, so when the surface stands above the end of the profile
    /// the polygon follows the bank down rather than cutting across it.
    #[must_use]
    pub fn measure(polyline: &Polyline, boundary: Boundary) -> Self {
        let level = boundary.level;
        let (first, last) = (boundary.left.vertex, boundary.right.vertex);

        let mut xs = Vec::with_capacity(last.saturating_sub(first) + 3);
        let mut ys = Vec::with_capacity(xs.capacity());
        xs.push(boundary.left.x);
        ys.push(level);
        if first <= last {
            xs.extend_from_slice(&polyline.xs()[first..=last]);
            ys.extend_from_slice(&polyline.ys()[first..=last]);
        }
        xs.push(boundary.right.x);
        ys.push(level);

        let width = boundary.width();
        let area = polygon_area(&xs, &ys);
        let average_depth = if area > 0.0 && width > 0.0 { area / width } else { DEPTH_FLOOR };
        let max_depth = ys.iter().map(|y| level - y).fold(0.0, f64::max);
        // Horizontal span only; slope length of the bank segments is not counted.
        let wet_perimeter: f64 = xs.windows(2).map(|w| w[1] - w[0]).sum();
        let r_hydraulic = if area > 0.0 && wet_perimeter > 0.0 {
            area / wet_perimeter
        } else {
            DEPTH_FLOOR
        };

        Self {
            boundary,
            xs,
            ys,
            width,
            area,
            average_depth,
            max_depth,
            wet_perimeter,
            r_hydraulic,
        }
    }
}

/// Wetted section of a polyline at one water level.
///
/// Holds one [`WettedBody`] per disjoint wetted region and the combined
/// metrics: width, area, perimeter and hydraulic radius are summed over the
/// bodies, average depth is their unweighted mean and max depth their maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterSection {
    /// Water level.
    pub level: f64,
    /// Disjoint wetted bodies, in the order their start points were given.
    pub bodies: Vec<WettedBody>,
    /// Total water surface width.
    pub width: f64,
    /// Total wetted area.
    pub area: f64,
    /// Mean of the bodies' average depths.
    pub average_depth: f64,
    /// Maximum depth over all bodies.
    pub max_depth: f64,
    /// Total wetted perimeter.
    pub wet_perimeter: f64,
    /// Summed hydraulic radius.
    pub r_hydraulic: f64,
}

impl WaterSection {
    /// Compute the wetted section around `start` (default: the lowest point).
    ///
    /// # Errors
    ///
    /// Propagates any [`SectionError`] from [`locate_boundary`].
    pub fn compute(polyline: &Polyline, level: f64, start: Option<usize>) -> Result<Self, SectionError> {
        let boundary = locate_boundary(polyline, level, start)?;
        Ok(Self::from_bodies(level, vec![WettedBody::measure(polyline, boundary)]))
    }

    /// Compute a wetted section made of the bodies around each start vertex.
    ///
    /// Start vertices that fall in an already measured body are skipped.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SectionError::NoStartPoints`] | `starts` is empty |
    /// | any from [`locate_boundary`] | A body cannot be located |
    pub fn from_starts(polyline: &Polyline, level: f64, starts: &[usize]) -> Result<Self, SectionError> {
        if starts.is_empty() {
            return Err(SectionError::NoStartPoints);
        }
        let mut bodies: Vec<WettedBody> = Vec::with_capacity(starts.len());
        for &start in starts {
            let boundary = locate_boundary(polyline, level, Some(start))?;
            if bodies.iter().any(|b| b.boundary == boundary) {
                continue;
            }
            bodies.push(WettedBody::measure(polyline, boundary));
        }
        Ok(Self::from_bodies(level, bodies))
    }

    fn from_bodies(level: f64, bodies: Vec<WettedBody>) -> Self {
        let n = bodies.len().max(1) as f64;
        let width = bodies.iter().map(|b| b.width).sum();
        let area = bodies.iter().map(|b| b.area).sum();
        let average_depth = bodies.iter().map(|b| b.average_depth).sum::<f64>() / n;
        let max_depth = bodies.iter().map(|b| b.max_depth).fold(0.0, f64::max);
        let wet_perimeter = bodies.iter().map(|b| b.wet_perimeter).sum();
        let r_hydraulic = bodies.iter().map(|b| b.r_hydraulic).sum();
        Self {
            level,
            bodies,
            width,
            area,
            average_depth,
            max_depth,
            wet_perimeter,
            r_hydraulic,
        }
    }
}
