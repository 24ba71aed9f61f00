//! Error types for the flow model, rating-curve builder and resolvers.

use hydrorating_section::SectionError;

/// Broad error classes, used by drivers to pick a distinct exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A water level is below the bottom or its boundaries cannot be located.
    InvalidLevel,
    /// An option value is not recognized or out of range.
    Configuration,
    /// Profile, sector or probability data is missing or malformed.
    InputData,
    /// A target lies outside the range covered by a rating curve.
    InterpolationDomain,
}

/// Errors from parsing and validating computation options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Returned when a flow regime name is not recognized.
    #[error("unknown flow regime: {value} (expected water, sediment_flow or mudrock_flow)")]
    UnknownRegime {
        /// The rejected value.
        value: String,
    },

    /// Returned when a Chezy formula name is not recognized.
    #[error("unknown Chezy formula: {value} (expected depth_banded, manning or zheleznyakov)")]
    UnknownFormula {
        /// The rejected value.
        value: String,
    },

    /// Returned when the discharge ceiling factor is not a positive number.
    #[error("ceiling factor must be positive and finite, got {factor}")]
    InvalidCeilingFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// Returned when the level step limit is zero.
    #[error("step limit must be at least 1")]
    ZeroStepLimit,
}

/// A target discharge or level outside the range of an interpolated curve.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{value} is outside the curve range [{min}, {max}]")]
pub struct OutOfDomain {
    /// The requested abscissa.
    pub value: f64,
    /// Smallest abscissa of the curve.
    pub min: f64,
    /// Largest abscissa of the curve.
    pub max: f64,
}

/// Errors from rating-curve computation and design-level resolution.
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    /// Returned when a wetted section cannot be computed for a sector and level.
    #[error("water level {level:.3} in sector «{sector}»: {source}")]
    InvalidLevel {
        /// The level being computed.
        level: f64,
        /// Name of the sector being computed.
        sector: String,
        /// Underlying geometry error.
        source: SectionError,
    },

    /// Wraps an option error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Returned when the flow model yields a non-finite discharge.
    #[error("non-finite discharge at level {level:.3} in sector «{sector}» (check roughness and slope)")]
    NonFiniteFlow {
        /// The level being computed.
        level: f64,
        /// Name of the sector being computed.
        sector: String,
    },

    /// Returned when no target discharges are supplied.
    #[error("at least one probability discharge is required")]
    NoProbabilities,

    /// Returned when a target discharge is NaN or infinite.
    #[error("discharge for probability «{label}» must be finite, got {discharge}")]
    InvalidDischarge {
        /// Probability label.
        label: String,
        /// The rejected discharge.
        discharge: f64,
    },

    /// Returned when the design level index does not point at a probability.
    #[error("design level index {index} is out of range for {n_levels} probabilities")]
    InvalidDesignIndex {
        /// The rejected index.
        index: usize,
        /// Number of probabilities supplied.
        n_levels: usize,
    },

    /// Returned when a target falls outside the rating curve.
    #[error("probability «{label}»: {source}")]
    InterpolationDomain {
        /// Probability label, or the quantity being resolved.
        label: String,
        /// Range details.
        source: OutOfDomain,
    },

    /// Returned when the discharge ceiling is not reached within the step limit.
    #[error("discharge ceiling {ceiling:.3} not reached within {max_steps} level steps (last level {level:.3}, Q = {discharge:.3})")]
    StepLimitExceeded {
        /// Target aggregate discharge.
        ceiling: f64,
        /// The configured step limit.
        max_steps: usize,
        /// Last level computed.
        level: f64,
        /// Aggregate discharge at the last level.
        discharge: f64,
    },
}

impl RatingError {
    /// Return the broad class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidLevel { .. } => ErrorClass::InvalidLevel,
            Self::Config(_) => ErrorClass::Configuration,
            Self::InterpolationDomain { .. } => ErrorClass::InterpolationDomain,
            Self::NonFiniteFlow { .. }
            | Self::NoProbabilities
            | Self::InvalidDischarge { .. }
            | Self::InvalidDesignIndex { .. }
            | Self::StepLimitExceeded { .. } => ErrorClass::InputData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_class() {
        let err = RatingError::InvalidLevel {
            level: 1.0,
            sector: "русло".into(),
            source: SectionError::LevelBelowBottom { level: 1.0, bottom: 2.0 },
        };
        assert_eq!(err.class(), ErrorClass::InvalidLevel);
        assert!(err.to_string().contains("«русло»"));
    }

    #[test]
    fn data_errors_are_input_class() {
        let err = RatingError::NonFiniteFlow { level: 1.0, sector: "пойма".into() };
        assert_eq!(err.class(), ErrorClass::InputData);
        assert_eq!(RatingError::NoProbabilities.class(), ErrorClass::InputData);
    }

    #[test]
    fn config_and_domain_classes() {
        let cfg = RatingError::from(ConfigError::ZeroStepLimit);
        assert_eq!(cfg.class(), ErrorClass::Configuration);
        let domain = RatingError::InterpolationDomain {
            label: "1%".into(),
            source: OutOfDomain { value: 5.0, min: 0.0, max: 4.0 },
        };
        assert_eq!(domain.class(), ErrorClass::InterpolationDomain);
    }
}
