//! Level stepping: the rating table is grown one level at a time until the
//! aggregate discharge reaches the ceiling.

use rayon::prelude::*;
use tracing::{debug, info, instrument, trace};

use hydrorating_section::{CrossSection, WaterSection};

use crate::config::RatingConfig;
use crate::error::RatingError;
use crate::flow::FlowCalculation;
use crate::table::{HydraulicValues, LevelEntry, RatingTable, SectorRow};

// ── sector evaluation ─────────────────────────────────────────────────────────

/// Where the wetted-section search of a sector starts.
#[derive(Debug, Clone, Copy)]
enum Start {
    /// The sector's own lowest point.
    Minimum,
    /// The sector's first point (water enters from the left).
    First,
    /// The sector's last point (water enters from the right).
    Last,
}

fn evaluate_sector(
    section: &CrossSection,
    index: usize,
    start: Start,
    level: f64,
    config: &RatingConfig,
) -> Result<SectorRow, RatingError> {
    let sector = &section.sectors()[index];
    let start = match start {
        Start::Minimum => None,
        Start::First => Some(0),
        Start::Last => Some(sector.coord().len() - 1),
    };
    let water = WaterSection::compute(sector.coord(), level, start).map_err(|source| {
        RatingError::InvalidLevel { level, sector: sector.name().to_string(), source }
    })?;
    let flow = FlowCalculation::compute(
        sector.roughness(),
        sector.slope(),
        water.average_depth,
        water.area,
        config.regime,
        config.formula,
    );
    if !flow.discharge.is_finite() {
        return Err(RatingError::NonFiniteFlow { level, sector: sector.name().to_string() });
    }
    trace!(sector = sector.name(), level, discharge = flow.discharge, "sector computed");
    Ok(SectorRow {
        sector: index,
        values: HydraulicValues {
            area: water.area,
            width: water.width,
            average_depth: water.average_depth,
            max_depth: water.max_depth,
            velocity: flow.velocity,
            discharge: flow.discharge,
            chezy: flow.chezy,
        },
        method: flow.method,
    })
}

/// Evaluate `sectors` at `level` in parallel, returning rows in sector order.
fn evaluate_level(
    section: &CrossSection,
    sectors: &[(usize, Start)],
    level: f64,
    config: &RatingConfig,
) -> Result<LevelEntry, RatingError> {
    let mut ordered = sectors.to_vec();
    ordered.sort_by_key(|&(i, _)| i);
    let rows: Vec<SectorRow> = ordered
        .par_iter()
        .map(|&(i, start)| evaluate_sector(section, i, start, level, config))
        .collect::<Result<_, _>>()?;
    Ok(LevelEntry::new(level, rows))
}

// ── sector selection ──────────────────────────────────────────────────────────

/// Start rule for a sector in overflow mode, relative to the filling sector.
fn overflow_start(index: usize, min_sector: usize) -> Start {
    match index.cmp(&min_sector) {
        std::cmp::Ordering::Equal => Start::Minimum,
        std::cmp::Ordering::Less => Start::Last,
        std::cmp::Ordering::Greater => Start::First,
    }
}

/// Neighbours of the active sectors whose separating ridge is at or below
/// `level`. They join from the next level on.
fn spilled_neighbours(section: &CrossSection, active: &[usize], level: f64) -> Vec<usize> {
    let n = section.sectors().len();
    let mut joined: Vec<usize> = Vec::new();
    for &i in active {
        let (left_ridge, right_ridge) = section.sectors()[i].ridges();
        let mut consider = |j: usize| {
            if !active.contains(&j) && !joined.contains(&j) {
                joined.push(j);
            }
        };
        if i > 0 && level >= left_ridge {
            consider(i - 1);
        }
        if i + 1 < n && level >= right_ridge {
            consider(i + 1);
        }
    }
    joined
}

// ── build ─────────────────────────────────────────────────────────────────────

/// Step the level from the profile bottom until the aggregate discharge
/// reaches `ceiling`.
///
/// The first entry is the dry bottom. Level `k` is `bottom + k·Δh`.
///
/// # Errors
///
/// See [`RatingConfig::build_table`].
#[instrument(skip_all, fields(
    n_sectors = section.sectors().len(),
    overflow = config.overflow,
    step_m = config.level_step.meters(),
    ceiling,
))]
pub(crate) fn build_rating_table(
    section: &CrossSection,
    config: &RatingConfig,
    ceiling: f64,
) -> Result<RatingTable, RatingError> {
    let bottom = section.min_elevation();
    let dh = config.level_step.meters();
    let min_sector = section.min_sector();
    let mut active = vec![min_sector];
    let mut entries = vec![LevelEntry::dry(bottom)];

    for step in 1..=config.max_steps {
        let level = bottom + step as f64 * dh;

        let wet: Vec<(usize, Start)> = if config.overflow {
            active.iter().map(|&i| (i, overflow_start(i, min_sector))).collect()
        } else {
            section
                .sectors()
                .iter()
                .enumerate()
                .filter(|(_, s)| s.min_elevation() < level)
                .map(|(i, _)| (i, Start::Minimum))
                .collect()
        };

        let entry = evaluate_level(section, &wet, level, config)?;
        let discharge = entry.aggregate.discharge;
        debug!(step, level, discharge, n_sectors = entry.sectors.len(), "level computed");
        entries.push(entry);

        if discharge >= ceiling {
            info!(n_levels = entries.len(), top_level = level, discharge, "rating table built");
            let names = section.sectors().iter().map(|s| s.name().to_string()).collect();
            return Ok(RatingTable::new(names, entries));
        }

        if config.overflow {
            let joined = spilled_neighbours(section, &active, level);
            if !joined.is_empty() {
                debug!(level, ?joined, "water spills into neighbouring sectors");
                active.extend(joined);
            }
        }
    }

    let last = entries.last().map_or(HydraulicValues::default(), |e| e.aggregate);
    Err(RatingError::StepLimitExceeded {
        ceiling,
        max_steps: config.max_steps,
        level: bottom + config.max_steps as f64 * dh,
        discharge: last.discharge,
    })
}
