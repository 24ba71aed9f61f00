//! Per-sector hydraulic values at the design water level.

use hydrorating_section::CrossSection;
use tracing::debug;

use crate::interp::LinearInterpolator;
use crate::table::{Column, HydraulicValues, RatingTable};

/// Values of one sector at the design level. Fields are `None` when the
/// design level lies outside the range of levels the sector was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorResult {
    /// Sector name.
    pub name: String,
    /// Roughness coefficient n.
    pub roughness: f64,
    /// Slope i, per mille.
    pub slope: f64,
    /// Discharge Q, m³/s.
    pub discharge: Option<f64>,
    /// Mean velocity V, m/s.
    pub velocity: Option<f64>,
    /// Average depth Hср, m.
    pub average_depth: Option<f64>,
    /// Surface width B, m.
    pub width: Option<f64>,
    /// Flow area F, m².
    pub area: Option<f64>,
}

/// Cross-section totals at the design level, rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSummary {
    /// Discharge Q, m³/s.
    pub discharge: f64,
    /// Mean velocity V, m/s.
    pub velocity: f64,
    /// Average depth Hср, m.
    pub average_depth: f64,
    /// Surface width B, m.
    pub width: f64,
    /// Flow area F, m².
    pub area: f64,
}

/// Per-sector values at the design level plus the whole-section summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorBreakdown {
    /// Design water level, m.
    pub level: f64,
    /// One entry per sector, in profile order.
    pub sectors: Vec<SectorResult>,
    /// Whole-section summary, labelled «Все участки» in reports.
    pub total: SectionSummary,
}

/// Label of the whole-section summary row.
pub const TOTAL_LABEL: &str = "Все участки";

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn interpolate(curve: &[(f64, HydraulicValues)], column: Column, level: f64) -> Option<f64> {
    LinearInterpolator::monotonic(curve.iter().map(|(l, v)| (*l, column.get(v))))?
        .evaluate(level)
        .ok()
}

/// Interpolate every sector's curve of `table` at `level`.
///
/// The summary is interpolated on the aggregate curve; a summary field that
/// cannot be interpolated is NaN.
#[must_use]
pub fn sector_breakdown(table: &RatingTable, section: &CrossSection, level: f64) -> SectorBreakdown {
    let sectors = section
        .sectors()
        .iter()
        .enumerate()
        .map(|(i, sector)| {
            let curve: Vec<(f64, HydraulicValues)> =
                table.sector_curve(i).map(|(l, v)| (l, *v)).collect();
            let at = |column| interpolate(&curve, column, level);
            let result = SectorResult {
                name: sector.name().to_string(),
                roughness: sector.roughness(),
                slope: sector.slope(),
                discharge: at(Column::Discharge),
                velocity: at(Column::Velocity),
                average_depth: at(Column::AverageDepth),
                width: at(Column::Width),
                area: at(Column::Area),
            };
            debug!(sector = sector.name(), wetted = result.discharge.is_some(), "sector interpolated");
            result
        })
        .collect();

    let aggregate: Vec<(f64, HydraulicValues)> = table.aggregate_curve().map(|(l, v)| (l, *v)).collect();
    let total_at = |column| interpolate(&aggregate, column, level).map_or(f64::NAN, round3);
    let total = SectionSummary {
        discharge: total_at(Column::Discharge),
        velocity: total_at(Column::Velocity),
        average_depth: total_at(Column::AverageDepth),
        width: total_at(Column::Width),
        area: total_at(Column::Area),
    };

    SectorBreakdown { level, sectors, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_three_decimals() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(-0.0004), -0.0);
        assert_eq!(round3(17.5), 17.5);
    }

    #[test]
    fn interpolate_outside_range_is_none() {
        let v = HydraulicValues { discharge: 2.0, ..HydraulicValues::default() };
        let w = HydraulicValues { discharge: 4.0, ..HydraulicValues::default() };
        let curve = [(1.0, v), (2.0, w)];
        assert_eq!(interpolate(&curve, Column::Discharge, 1.5), Some(3.0));
        assert_eq!(interpolate(&curve, Column::Discharge, 2.5), None);
        assert_eq!(interpolate(&[], Column::Discharge, 1.0), None);
    }
}
