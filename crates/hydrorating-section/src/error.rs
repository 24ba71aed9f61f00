//! Error types for profile geometry and wetted-section computation.

use std::fmt;

/// Which side of a wetted section a boundary search runs towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Towards decreasing chainage (index 0).
    Left,
    /// Towards increasing chainage (last index).
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// A sector parameter that must be a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorParameter {
    /// Roughness coefficient n.
    Roughness,
    /// Slope i, per mille.
    Slope,
}

impl fmt::Display for SectorParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roughness => f.write_str("roughness n"),
            Self::Slope => f.write_str("slope i"),
        }
    }
}

/// Errors from profile validation and wetted-section location.
#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    /// Returned when a polyline has fewer than two vertices.
    #[error("profile must contain at least 2 points, got {n_points}")]
    TooFewPoints {
        /// Number of points provided.
        n_points: usize,
    },

    /// Returned when the x and y coordinate arrays differ in length.
    #[error("x and y coordinates differ in length: {n_x} vs {n_y}")]
    LengthMismatch {
        /// Number of x coordinates.
        n_x: usize,
        /// Number of y coordinates.
        n_y: usize,
    },

    /// Returned when a coordinate is NaN or infinite.
    #[error("profile contains non-finite coordinate at point {index}")]
    NonFiniteCoordinate {
        /// Index of the first offending point.
        index: usize,
    },

    /// Returned when chainage decreases between consecutive points.
    #[error("chainage must be non-decreasing: x[{index}] = {x} follows {previous}")]
    DecreasingChainage {
        /// Index of the offending point.
        index: usize,
        /// Chainage of the offending point.
        x: f64,
        /// Chainage of the preceding point.
        previous: f64,
    },

    /// Returned when the requested water level lies below the lowest bottom point.
    #[error("water level {level:.3} is below the lowest bottom point {bottom:.3}")]
    LevelBelowBottom {
        /// Requested water level.
        level: f64,
        /// Minimum bottom elevation.
        bottom: f64,
    },

    /// Returned when a water level is NaN or infinite.
    #[error("water level must be finite, got {level}")]
    NonFiniteLevel {
        /// Requested water level.
        level: f64,
    },

    /// Returned when the start vertex index is past the end of the polyline.
    #[error("start point {index} is out of bounds for a profile of {n_points} points")]
    StartOutOfBounds {
        /// Requested start vertex.
        index: usize,
        /// Number of points in the polyline.
        n_points: usize,
    },

    /// Returned when the start vertex lies above the water surface.
    #[error("start point {index} at elevation {elevation:.3} is dry at water level {level:.3}")]
    DryStartPoint {
        /// Start vertex index.
        index: usize,
        /// Elevation of the start vertex.
        elevation: f64,
        /// Requested water level.
        level: f64,
    },

    /// Returned when no crossing between water surface and bottom is found.
    #[error("no {side} water boundary found for level {level:.3}")]
    BoundaryNotFound {
        /// Direction of the failed search.
        side: Side,
        /// Requested water level.
        level: f64,
    },

    /// Returned when a measurement is requested with no start points.
    #[error("at least one start point is required to measure a water section")]
    NoStartPoints,

    /// Returned when a cross-section is built without sectors.
    #[error("cross-section must contain at least one sector")]
    NoSectors,

    /// Returned when a sector does not span at least two points.
    #[error("sector {id} «{name}»: start point {start} must be less than end point {end}")]
    InvalidSectorRange {
        /// Sector number.
        id: usize,
        /// Sector name.
        name: String,
        /// First point index.
        start: usize,
        /// Last point index.
        end: usize,
    },

    /// Returned when a sector ends past the last profile point.
    #[error("sector {id} «{name}» ends at point {end}, profile has {n_points} points")]
    SectorOutOfBounds {
        /// Sector number.
        id: usize,
        /// Sector name.
        name: String,
        /// Last point index.
        end: usize,
        /// Number of profile points.
        n_points: usize,
    },

    /// Returned when a sector starts before the previous sector ends.
    #[error("sector {id} «{name}» starts at point {start}, before the previous sector ends at {previous_end}")]
    OverlappingSectors {
        /// Sector number.
        id: usize,
        /// Sector name.
        name: String,
        /// First point index.
        start: usize,
        /// Last point index of the preceding sector.
        previous_end: usize,
    },

    /// Returned when a sector starts after the previous sector ends,
    /// leaving profile points outside every sector.
    #[error("sector {id} «{name}» starts at point {start}, leaving a gap after the previous sector ends at {previous_end}")]
    SectorGap {
        /// Sector number.
        id: usize,
        /// Sector name.
        name: String,
        /// First point index.
        start: usize,
        /// Last point index of the preceding sector.
        previous_end: usize,
    },

    /// Returned when the first sector does not start at the first profile point.
    #[error("first sector «{name}» starts at point {start}, expected 0")]
    ProfileStartUncovered {
        /// Sector name.
        name: String,
        /// First point index.
        start: usize,
    },

    /// Returned when the last sector does not end at the last profile point.
    #[error("last sector {id} «{name}» ends at point {end}, expected {last}")]
    ProfileEndUncovered {
        /// Sector number.
        id: usize,
        /// Sector name.
        name: String,
        /// Last point index of the sector.
        end: usize,
        /// Index of the last profile point.
        last: usize,
    },

    /// Returned when roughness or slope is missing or not a finite number.
    #[error("sector {id} «{name}» has no valid {parameter}")]
    InvalidParameter {
        /// Sector number.
        id: usize,
        /// Sector name.
        name: String,
        /// The offending parameter.
        parameter: SectorParameter,
    },
}

impl SectionError {
    /// Return true when the error concerns a water level rather than the input data.
    ///
    /// Level errors are raised while locating a wetted section; all other
    /// variants are raised while validating the profile and its sectors.
    #[must_use]
    pub fn is_level_error(&self) -> bool {
        matches!(
            self,
            Self::LevelBelowBottom { .. }
                | Self::NonFiniteLevel { .. }
                | Self::DryStartPoint { .. }
                | Self::BoundaryNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_errors_are_classified() {
        let err = SectionError::LevelBelowBottom { level: 1.0, bottom: 2.0 };
        assert!(err.is_level_error());
        let err = SectionError::BoundaryNotFound { side: Side::Right, level: 1.0 };
        assert!(err.is_level_error());
    }

    #[test]
    fn data_errors_are_not_level_errors() {
        assert!(!SectionError::NoSectors.is_level_error());
        assert!(!SectionError::TooFewPoints { n_points: 1 }.is_level_error());
    }

    #[test]
    fn message_names_sector_and_parameter() {
        let err = SectionError::InvalidParameter {
            id: 2,
            name: "пойма".to_string(),
            parameter: SectorParameter::Slope,
        };
        assert_eq!(err.to_string(), "sector 2 «пойма» has no valid slope i");
    }
}
