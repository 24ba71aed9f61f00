//! Target discharges by exceedance probability and their resolution into
//! water levels on the aggregate rating curve.

use tracing::{debug, instrument, warn};

use crate::error::{OutOfDomain, RatingError};
use crate::interp::LinearInterpolator;
use crate::table::{HydraulicValues, RatingTable};

/// A target discharge for one exceedance probability.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityLevel {
    /// Probability label, e.g. `"1%"`.
    pub label: String,
    /// Target discharge, m³/s.
    pub discharge: f64,
}

impl ProbabilityLevel {
    /// Create a probability level.
    #[must_use]
    pub fn new(label: impl Into<String>, discharge: f64) -> Self {
        Self { label: label.into(), discharge }
    }
}

/// Validated, non-empty list of target discharges with one design entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilitySet {
    levels: Vec<ProbabilityLevel>,
    design_index: usize,
}

impl ProbabilitySet {
    /// Create a probability set. `design_index` defaults to the first entry.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RatingError::NoProbabilities`] | `levels` is empty |
    /// | [`RatingError::InvalidDischarge`] | A discharge is NaN or infinite |
    /// | [`RatingError::InvalidDesignIndex`] | `design_index` is out of range |
    pub fn new(levels: Vec<ProbabilityLevel>, design_index: Option<usize>) -> Result<Self, RatingError> {
        if levels.is_empty() {
            return Err(RatingError::NoProbabilities);
        }
        if let Some(bad) = levels.iter().find(|p| !p.discharge.is_finite()) {
            return Err(RatingError::InvalidDischarge {
                label: bad.label.clone(),
                discharge: bad.discharge,
            });
        }
        let design_index = design_index.unwrap_or(0);
        if design_index >= levels.len() {
            return Err(RatingError::InvalidDesignIndex { index: design_index, n_levels: levels.len() });
        }
        Ok(Self { levels, design_index })
    }

    /// Return the probability levels in input order.
    #[must_use]
    pub fn levels(&self) -> &[ProbabilityLevel] {
        &self.levels
    }

    /// Return the index of the design level.
    #[must_use]
    pub fn design_index(&self) -> usize {
        self.design_index
    }

    /// Return the design level.
    #[must_use]
    pub fn design(&self) -> &ProbabilityLevel {
        &self.levels[self.design_index]
    }

    /// Return the largest target discharge.
    #[must_use]
    pub fn max_discharge(&self) -> f64 {
        self.levels.iter().map(|p| p.discharge).fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Water level and flow characteristics for one target discharge.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignLevelRow {
    /// Probability label.
    pub label: String,
    /// Target discharge, m³/s.
    pub discharge: f64,
    /// Water level, m.
    pub level: f64,
    /// Aggregate mean velocity, m/s.
    pub velocity: f64,
    /// Aggregate flow area, m².
    pub area: f64,
}

/// Resolution of every target discharge, in input order.
#[derive(Debug)]
pub struct DesignLevels {
    /// One entry per probability: the resolved row, or why it failed.
    pub rows: Vec<Result<DesignLevelRow, RatingError>>,
    /// Index of the design level in `rows`.
    pub design_index: usize,
}

impl DesignLevels {
    /// Return the design row, if it was resolved.
    #[must_use]
    pub fn design(&self) -> Option<&DesignLevelRow> {
        self.rows.get(self.design_index).and_then(|r| r.as_ref().ok())
    }

    /// Return the rows that were resolved.
    pub fn resolved(&self) -> impl Iterator<Item = &DesignLevelRow> {
        self.rows.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Return the errors of rows that failed.
    pub fn failures(&self) -> impl Iterator<Item = &RatingError> {
        self.rows.iter().filter_map(|r| r.as_ref().err())
    }
}

/// Aggregate curves with discharge as the abscissa.
struct DischargeCurves {
    level: Option<LinearInterpolator>,
    velocity: Option<LinearInterpolator>,
    area: Option<LinearInterpolator>,
}

impl DischargeCurves {
    fn new(table: &RatingTable) -> Self {
        let curve = |value: fn(f64, &HydraulicValues) -> f64| {
            LinearInterpolator::monotonic(
                table.aggregate_curve().map(|(level, v)| (v.discharge, value(level, v))),
            )
        };
        Self {
            level: curve(|level, _| level),
            velocity: curve(|_, v| v.velocity),
            area: curve(|_, v| v.area),
        }
    }

    fn resolve(&self, target: &ProbabilityLevel) -> Result<DesignLevelRow, RatingError> {
        let at = |curve: &Option<LinearInterpolator>| {
            let result = match curve {
                Some(f) => f.evaluate(target.discharge),
                None => Err(OutOfDomain { value: target.discharge, min: f64::NAN, max: f64::NAN }),
            };
            result.map_err(|source| RatingError::InterpolationDomain { label: target.label.clone(), source })
        };
        Ok(DesignLevelRow {
            label: target.label.clone(),
            discharge: target.discharge,
            level: at(&self.level)?,
            velocity: at(&self.velocity)?,
            area: at(&self.area)?,
        })
    }
}

/// Interpolate level, velocity and area for each target discharge on the
/// aggregate curve of `table`.
///
/// The curve is restricted to the levels at which the aggregate discharge
/// strictly increases. A target outside that range yields
/// [`RatingError::InterpolationDomain`] in its row; other rows are still
/// resolved.
#[instrument(skip_all, fields(n_targets = probabilities.levels().len()))]
pub fn resolve_design_levels(table: &RatingTable, probabilities: &ProbabilitySet) -> DesignLevels {
    let curves = DischargeCurves::new(table);
    let rows = probabilities
        .levels()
        .iter()
        .map(|p| {
            let row = curves.resolve(p);
            match &row {
                Ok(r) => debug!(label = %r.label, level = r.level, "target resolved"),
                Err(e) => warn!(label = %p.label, error = %e, "target not resolved"),
            }
            row
        })
        .collect();

    DesignLevels { rows, design_index: probabilities.design_index() }
}
