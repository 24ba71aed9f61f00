//! Profile sectors: contiguous stretches of the cross-section with their own
//! roughness and slope.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{SectionError, SectorParameter};
use crate::polyline::Polyline;

/// Typical range of the roughness coefficient n.
pub const ROUGHNESS_RANGE: RangeInclusive<f64> = 0.02..=0.2;

/// Largest typical slope, per mille. Slopes must also be strictly positive.
pub const MAX_SLOPE: f64 = 900.0;

/// Sector definition as supplied by the survey, before it is attached to a
/// profile.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSpec {
    /// Sector name (main channel, floodplain, ...).
    pub name: String,
    /// Roughness coefficient n.
    pub roughness: f64,
    /// Slope i, per mille.
    pub slope: f64,
    /// Index of the first profile point.
    pub start_point: usize,
    /// Index of the last profile point.
    pub end_point: usize,
}

/// A parameter outside its typical range. Not fatal on its own; callers
/// decide whether to continue.
#[derive(Debug, Clone, PartialEq)]
pub enum SectorWarning {
    /// Roughness outside [`ROUGHNESS_RANGE`].
    SuspiciousRoughness {
        /// Sector number.
        id: usize,
        /// Sector name.
        name: String,
        /// Supplied roughness.
        roughness: f64,
    },
    /// Slope not in `(0, MAX_SLOPE]`.
    SuspiciousSlope {
        /// Sector number.
        id: usize,
        /// Sector name.
        name: String,
        /// Supplied slope, per mille.
        slope: f64,
    },
}

impl fmt::Display for SectorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuspiciousRoughness { id, name, roughness } => {
                write!(f, "suspicious roughness in sector {id} «{name}»: {roughness}")
            }
            Self::SuspiciousSlope { id, name, slope } => {
                write!(f, "suspicious slope in sector {id} «{name}»: {slope}‰")
            }
        }
    }
}

/// A sector attached to its profile, owning a copy of its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSector {
    id: usize,
    name: String,
    start_point: usize,
    end_point: usize,
    roughness: f64,
    slope: f64,
    coord: Polyline,
}

impl ProfileSector {
    /// Attach `spec` to `profile` as sector number `id`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SectionError::InvalidParameter`] | Roughness or slope is not finite |
    /// | [`SectionError::InvalidSectorRange`] | `start_point >= end_point` |
    /// | [`SectionError::SectorOutOfBounds`] | `end_point` is past the last profile point |
    pub fn new(id: usize, spec: SectorSpec, profile: &Polyline) -> Result<Self, SectionError> {
        let SectorSpec { name, roughness, slope, start_point, end_point } = spec;
        if !roughness.is_finite() {
            return Err(SectionError::InvalidParameter {
                id,
                name,
                parameter: SectorParameter::Roughness,
            });
        }
        if !slope.is_finite() {
            return Err(SectionError::InvalidParameter { id, name, parameter: SectorParameter::Slope });
        }
        if start_point >= end_point {
            return Err(SectionError::InvalidSectorRange { id, name, start: start_point, end: end_point });
        }
        if end_point >= profile.len() {
            return Err(SectionError::SectorOutOfBounds {
                id,
                name,
                end: end_point,
                n_points: profile.len(),
            });
        }
        let coord = profile.slice(start_point..=end_point)?;
        Ok(Self { id, name, start_point, end_point, roughness, slope, coord })
    }

    /// Return the sector number (1-based, in profile order).
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Return the sector name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the index of the first profile point.
    #[must_use]
    pub fn start_point(&self) -> usize {
        self.start_point
    }

    /// Return the index of the last profile point.
    #[must_use]
    pub fn end_point(&self) -> usize {
        self.end_point
    }

    /// Return the roughness coefficient n.
    #[must_use]
    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    /// Return the slope i, per mille.
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Return the sector's own coordinates.
    #[must_use]
    pub fn coord(&self) -> &Polyline {
        &self.coord
    }

    /// Return the horizontal length of the sector.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.coord.length()
    }

    /// Return the lowest bottom elevation in the sector.
    #[must_use]
    pub fn min_elevation(&self) -> f64 {
        self.coord.min_elevation()
    }

    /// Return the ridge elevations towards the left and right neighbours.
    #[must_use]
    pub fn ridges(&self) -> (f64, f64) {
        self.coord.half_maxima()
    }

    /// Return warnings for parameters outside their typical ranges.
    #[must_use]
    pub fn warnings(&self) -> Vec<SectorWarning> {
        let mut warnings = Vec::new();
        if !ROUGHNESS_RANGE.contains(&self.roughness) {
            warnings.push(SectorWarning::SuspiciousRoughness {
                id: self.id,
                name: self.name.clone(),
                roughness: self.roughness,
            });
        }
        if self.slope <= 0.0 || self.slope > MAX_SLOPE {
            warnings.push(SectorWarning::SuspiciousSlope {
                id: self.id,
                name: self.name.clone(),
                slope: self.slope,
            });
        }
        warnings
    }
}
