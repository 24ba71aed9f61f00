//! Rating curves for surveyed open-channel cross-sections.
//!
//! Computes the Chezy coefficient, velocity and discharge of each wetted
//! sector as the water level is stepped up from the channel bottom,
//! aggregates them per level into a stage–discharge table, and resolves the
//! water levels reached by target discharges of given exceedance
//! probability.
//!
//! ```no_run
//! use hydrorating_curve::{ProbabilityLevel, ProbabilitySet, RatingConfig};
//! # fn run(section: &hydrorating_section::CrossSection) -> Result<(), hydrorating_curve::RatingError> {
//! let targets = ProbabilitySet::new(vec![ProbabilityLevel::new("1%", 120.0)], None)?;
//! let result = RatingConfig::new().fit(section, &targets)?;
//! # Ok(()) }
//! ```

mod breakdown;
mod builder;
mod config;
mod error;
mod flow;
mod interp;
mod probability;
mod regime;
mod result;
mod table;

pub use breakdown::{sector_breakdown, SectionSummary, SectorBreakdown, SectorResult, TOTAL_LABEL};
pub use config::{LevelStep, RatingConfig};
pub use error::{ConfigError, ErrorClass, OutOfDomain, RatingError};
pub use flow::{
    chezy_coefficient, pavlovsky_exponent, pavlovsky_zheleznyakov_exponent, velocity,
    zheleznyakov_coefficient, CoefficientMethod, FlowCalculation, GRAVITY, PAVLOVSKY_MAX_DEPTH,
};
pub use interp::LinearInterpolator;
pub use probability::{
    resolve_design_levels, DesignLevelRow, DesignLevels, ProbabilityLevel, ProbabilitySet,
};
pub use regime::{ChezyFormula, FlowRegime};
pub use result::HydraulicResult;
pub use table::{
    Column, HydraulicValues, LevelEntry, RatingRow, RatingTable, RowLabel, SectorRow,
    AGGREGATE_LABEL,
};
