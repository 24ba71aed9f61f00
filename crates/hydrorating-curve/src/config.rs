//! Configuration builder for rating-curve computation.

use hydrorating_section::CrossSection;
use tracing::{info, instrument, warn};

use crate::breakdown::sector_breakdown;
use crate::error::{ConfigError, RatingError};
use crate::probability::{resolve_design_levels, ProbabilitySet};
use crate::regime::{ChezyFormula, FlowRegime};
use crate::result::HydraulicResult;
use crate::table::RatingTable;

/// Water-level increment between rating-table rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStep(f64);

impl LevelStep {
    /// Step used when none is configured, in centimetres.
    pub const DEFAULT_CM: f64 = 5.0;

    /// Step substituted for a malformed one, in centimetres.
    pub const FALLBACK_CM: f64 = 1.0;

    /// Create a step from centimetres. A zero, negative or non-finite value
    /// falls back to [`LevelStep::FALLBACK_CM`].
    #[must_use]
    pub fn from_centimeters(cm: f64) -> Self {
        if cm.is_finite() && cm > 0.0 {
            Self(cm / 100.0)
        } else {
            warn!(cm, fallback_cm = Self::FALLBACK_CM, "invalid level step, using fallback");
            Self(Self::FALLBACK_CM / 100.0)
        }
    }

    /// Parse a step in centimetres from free text. Text that is not a number
    /// falls back to [`LevelStep::FALLBACK_CM`].
    #[must_use]
    pub fn parse_centimeters(raw: &str) -> Self {
        match raw.trim().replace(',', ".").parse::<f64>() {
            Ok(cm) => Self::from_centimeters(cm),
            Err(_) => {
                warn!(raw, fallback_cm = Self::FALLBACK_CM, "non-numeric level step, using fallback");
                Self(Self::FALLBACK_CM / 100.0)
            }
        }
    }

    /// Return the step in metres.
    #[must_use]
    pub fn meters(self) -> f64 {
        self.0
    }

    /// Return the step in centimetres.
    #[must_use]
    pub fn centimeters(self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for LevelStep {
    fn default() -> Self {
        Self(Self::DEFAULT_CM / 100.0)
    }
}

/// Configuration for rating-curve computation.
///
/// Construct via [`RatingConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter        | Default                       |
/// |------------------|-------------------------------|
/// | `regime`         | `FlowRegime::Water`           |
/// | `formula`        | `ChezyFormula::DepthBanded`   |
/// | `overflow`       | true                          |
/// | `level_step`     | 5 cm                          |
/// | `ceiling_factor` | 1.2                           |
/// | `max_steps`      | 100 000                       |
#[derive(Debug, Clone)]
pub struct RatingConfig {
    pub(crate) regime: FlowRegime,
    pub(crate) formula: ChezyFormula,
    pub(crate) overflow: bool,
    pub(crate) level_step: LevelStep,
    pub(crate) ceiling_factor: f64,
    pub(crate) max_steps: usize,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regime: FlowRegime::Water,
            formula: ChezyFormula::DepthBanded,
            overflow: true,
            level_step: LevelStep::default(),
            ceiling_factor: 1.2,
            max_steps: 100_000,
        }
    }

    /// Set the flow regime.
    #[must_use]
    pub fn with_regime(mut self, regime: FlowRegime) -> Self {
        self.regime = regime;
        self
    }

    /// Set the Chezy coefficient formula.
    #[must_use]
    pub fn with_formula(mut self, formula: ChezyFormula) -> Self {
        self.formula = formula;
        self
    }

    /// Enable or disable overflow mode.
    ///
    /// In overflow mode filling starts in the sector holding the profile
    /// minimum, and a neighbour joins once the level tops the ridge between
    /// them. Otherwise every sector whose own bottom is below the level is
    /// computed from its own minimum.
    #[must_use]
    pub fn with_overflow(mut self, overflow: bool) -> Self {
        self.overflow = overflow;
        self
    }

    /// Set the level step.
    #[must_use]
    pub fn with_level_step(mut self, level_step: LevelStep) -> Self {
        self.level_step = level_step;
        self
    }

    /// Set the factor applied to the largest target discharge to get the
    /// aggregate discharge at which level stepping stops.
    #[must_use]
    pub fn with_ceiling_factor(mut self, ceiling_factor: f64) -> Self {
        self.ceiling_factor = ceiling_factor;
        self
    }

    /// Set the maximum number of level steps.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Return the flow regime.
    #[must_use]
    pub fn regime(&self) -> FlowRegime {
        self.regime
    }

    /// Return the Chezy coefficient formula.
    #[must_use]
    pub fn formula(&self) -> ChezyFormula {
        self.formula
    }

    /// Return whether overflow mode is enabled.
    #[must_use]
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    /// Return the level step.
    #[must_use]
    pub fn level_step(&self) -> LevelStep {
        self.level_step
    }

    /// Return the discharge ceiling factor.
    #[must_use]
    pub fn ceiling_factor(&self) -> f64 {
        self.ceiling_factor
    }

    /// Return the maximum number of level steps.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ceiling_factor.is_finite() && self.ceiling_factor > 0.0) {
            return Err(ConfigError::InvalidCeilingFactor { factor: self.ceiling_factor });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroStepLimit);
        }
        Ok(())
    }

    /// Build the rating table of `section` up to aggregate discharge
    /// `ceiling`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RatingError::Config`] | The configuration is invalid |
    /// | [`RatingError::InvalidLevel`] | A sector section cannot be computed |
    /// | [`RatingError::NonFiniteFlow`] | The flow model yields NaN or infinity |
    /// | [`RatingError::StepLimitExceeded`] | `ceiling` is not reached within `max_steps` |
    pub fn build_table(&self, section: &CrossSection, ceiling: f64) -> Result<RatingTable, RatingError> {
        self.validate()?;
        crate::builder::build_rating_table(section, self, ceiling)
    }

    /// Compute the full hydraulic result for `section` and the target
    /// discharges in `probabilities`.
    ///
    /// The table is built up to `ceiling_factor` times the largest target
    /// discharge. Each target is then resolved on the aggregate curve; a
    /// target that cannot be resolved is reported in its own row. The sector
    /// breakdown is computed at the design level, and is `None` when the
    /// design target could not be resolved.
    ///
    /// # Errors
    ///
    /// Any error from [`RatingConfig::build_table`].
    #[instrument(skip_all, fields(regime = %self.regime, formula = %self.formula, overflow = self.overflow))]
    pub fn fit(
        &self,
        section: &CrossSection,
        probabilities: &ProbabilitySet,
    ) -> Result<HydraulicResult, RatingError> {
        let ceiling = self.ceiling_factor * probabilities.max_discharge();
        let table = self.build_table(section, ceiling)?;
        let design_levels = resolve_design_levels(&table, probabilities);

        let breakdown = match design_levels.design() {
            Some(row) => Some(sector_breakdown(&table, section, row.level)),
            None => {
                warn!(
                    design_index = probabilities.design_index(),
                    "design discharge could not be resolved, sector breakdown skipped"
                );
                None
            }
        };

        info!(
            n_levels = table.len(),
            n_resolved = design_levels.resolved().count(),
            "hydraulic result computed"
        );
        Ok(HydraulicResult { table, design_levels, breakdown })
    }
}
