//! Result type of a full rating computation.

use crate::breakdown::SectorBreakdown;
use crate::probability::DesignLevels;
use crate::table::RatingTable;

/// Rating table, resolved target levels and design-level sector breakdown.
#[derive(Debug)]
pub struct HydraulicResult {
    /// Per-level, per-sector values with aggregate rows.
    pub table: RatingTable,
    /// One row per target discharge.
    pub design_levels: DesignLevels,
    /// Sector values at the design level; `None` if the design target could
    /// not be resolved.
    pub breakdown: Option<SectorBreakdown>,
}
