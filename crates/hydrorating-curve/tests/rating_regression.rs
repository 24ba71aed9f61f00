//! Regression tests for hydrorating-curve.
//!
//! These tests check the structural properties of the rating table on small
//! hand-built cross-sections: aggregate rows, level ordering, overflow into
//! neighbouring sectors, design-level resolution and determinism.

use hydrorating_curve::{
    resolve_design_levels, ChezyFormula, FlowCalculation, FlowRegime, LevelStep, ProbabilityLevel,
    ProbabilitySet, RatingConfig, RatingError,
};
use hydrorating_section::{CrossSection, Polyline, SectorSpec};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TOL: f64 = 1e-6;

fn spec(name: &str, roughness: f64, slope: f64, start_point: usize, end_point: usize) -> SectorSpec {
    SectorSpec { name: name.to_string(), roughness, slope, start_point, end_point }
}

/// Two pools separated by a ridge at 3.0; the left pool holds the minimum.
fn two_pools() -> CrossSection {
    let profile = Polyline::new(
        vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0],
        vec![6.0, 0.0, 2.0, 3.0, 1.0, 2.0, 6.0],
    )
    .unwrap();
    CrossSection::new(
        profile,
        vec![spec("русло", 0.03, 2.0, 0, 3), spec("пойма", 0.05, 2.0, 3, 6)],
    )
    .unwrap()
}

/// Channel with a floodplain on each side.
fn channel_with_floodplains() -> CrossSection {
    let profile = Polyline::new(
        vec![0.0, 5.0, 20.0, 24.0, 26.0, 30.0, 45.0, 50.0],
        vec![104.0, 102.0, 101.5, 98.0, 98.2, 101.4, 101.8, 104.5],
    )
    .unwrap();
    CrossSection::new(
        profile,
        vec![
            spec("левая пойма", 0.06, 1.2, 0, 2),
            spec("русло", 0.035, 1.2, 2, 5),
            spec("правая пойма", 0.07, 1.2, 5, 7),
        ],
    )
    .unwrap()
}

fn step(cm: f64) -> LevelStep {
    LevelStep::from_centimeters(cm)
}

// ---------------------------------------------------------------------------
// a) aggregate rows
// ---------------------------------------------------------------------------

/// Every aggregate row must equal the sums and ratios of its sector rows.
#[test]
fn aggregate_rows_match_sector_rows() {
    let cs = channel_with_floodplains();
    let table = RatingConfig::new().with_level_step(step(10.0)).build_table(&cs, 400.0).unwrap();

    for entry in table.entries().iter().skip(1) {
        let rows: Vec<_> = entry.sectors.iter().map(|r| r.values).collect();
        let area: f64 = rows.iter().map(|v| v.area).sum();
        let width: f64 = rows.iter().map(|v| v.width).sum();
        let discharge: f64 = rows.iter().map(|v| v.discharge).sum();
        let max_depth = rows.iter().map(|v| v.max_depth).fold(0.0, f64::max);
        let agg = entry.aggregate;

        assert!((agg.area - area).abs() < TOL, "level {}", entry.level);
        assert!((agg.width - width).abs() < TOL, "level {}", entry.level);
        assert!((agg.discharge - discharge).abs() < TOL, "level {}", entry.level);
        assert!((agg.max_depth - max_depth).abs() < TOL, "level {}", entry.level);
        assert!((agg.average_depth - area / width).abs() < TOL, "level {}", entry.level);
        assert!((agg.velocity - discharge / area).abs() < TOL, "level {}", entry.level);
    }
}

// ---------------------------------------------------------------------------
// b) level ordering
// ---------------------------------------------------------------------------

/// Levels start at the dry bottom and increase by exactly one step.
#[test]
fn levels_increase_by_step_from_bottom() {
    let cs = channel_with_floodplains();
    let table = RatingConfig::new().with_level_step(step(5.0)).build_table(&cs, 100.0).unwrap();
    let entries = table.entries();

    assert_eq!(entries[0].level, 98.0);
    assert!(entries[0].sectors.is_empty());
    assert_eq!(entries[0].aggregate.discharge, 0.0);
    for (k, entry) in entries.iter().enumerate().skip(1) {
        assert!((entry.level - (98.0 + k as f64 * 0.05)).abs() < 1e-9);
        assert!(!entry.sectors.is_empty());
        assert!(entry.level > entries[k - 1].level);
    }
    assert!(table.last().unwrap().aggregate.discharge >= 100.0);
}

// ---------------------------------------------------------------------------
// c) overflow
// ---------------------------------------------------------------------------

/// With a 25 cm step the neighbour first appears one step after the level
/// reaches the 3.0 ridge.
#[test]
fn neighbour_appears_one_step_after_ridge() {
    let cs = two_pools();
    let table = RatingConfig::new().with_level_step(step(25.0)).build_table(&cs, 200.0).unwrap();

    let first = table.sector_curve(1).next().expect("neighbour never wetted").0;
    assert!((first - 3.25).abs() < 1e-12, "neighbour first wetted at {first}");
    for entry in table.entries().iter().filter(|e| e.level <= 3.0) {
        assert!(entry.sector(1).is_none(), "neighbour wetted at {}", entry.level);
    }
}

/// The minimum lies in the right sector; the left sector is entered over the
/// 3.0 ridge and filled from its last point, not from its own low point.
#[test]
fn left_neighbour_fills_from_shared_boundary() {
    let profile = Polyline::new(
        vec![0.0, 4.0, 6.0, 8.0, 10.0],
        vec![6.0, 2.0, 3.0, 0.0, 6.0],
    )
    .unwrap();
    let cs = CrossSection::new(
        profile,
        vec![spec("пойма", 0.05, 2.0, 0, 2), spec("русло", 0.03, 2.0, 2, 4)],
    )
    .unwrap();
    let table = RatingConfig::new().with_level_step(step(50.0)).build_table(&cs, 50.0).unwrap();

    for entry in table.entries().iter().filter(|e| e.level <= 3.0) {
        assert!(entry.sector(0).is_none(), "left sector wetted at {}", entry.level);
    }
    let (level, values) = table.sector_curve(0).next().expect("left sector never wetted");
    assert!((level - 3.5).abs() < 1e-12, "left sector first wetted at {level}");

    // The right sector was active first, yet rows stay in profile order.
    for entry in table.entries().iter().filter(|e| e.level > 3.0) {
        let order: Vec<usize> = entry.sectors.iter().map(|row| row.sector).collect();
        assert_eq!(order, [0, 1], "row order at {}", entry.level);
    }

    // Surface from x = 2.5 to the shared boundary x = 6: a triangle of 1.125
    // down to (4, 2) plus a trapezoid of 2.0 up to (6, 3).
    assert!((values.area - 3.125).abs() < TOL);
    assert!((values.width - 3.5).abs() < TOL);
    assert!((values.max_depth - 1.5).abs() < TOL);
}

/// Without overflow each sector is wetted as soon as the level exceeds its
/// own bottom.
#[test]
fn independent_sectors_wet_from_own_bottom() {
    let cs = two_pools();
    let table = RatingConfig::new()
        .with_overflow(false)
        .with_level_step(step(25.0))
        .build_table(&cs, 200.0)
        .unwrap();

    let first = table.sector_curve(1).next().unwrap().0;
    assert!((first - 1.25).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// d) flow model
// ---------------------------------------------------------------------------

/// Single trapezoidal sector at one metre above the bottom, checked against
/// the Pavlovsky formula evaluated by hand.
#[test]
fn trapezoid_matches_pavlovsky_by_hand() {
    let profile = Polyline::new(vec![0.0, 5.0, 10.0, 15.0], vec![10.0, 8.0, 8.0, 10.0]).unwrap();
    let cs = CrossSection::new(profile, vec![spec("русло", 0.03, 2.0, 0, 3)]).unwrap();
    let table = RatingConfig::new().with_level_step(step(100.0)).build_table(&cs, 0.1).unwrap();

    let entry = &table.entries()[1];
    assert!((entry.level - 9.0).abs() < 1e-12);
    let v = entry.aggregate;
    assert!((v.area - 7.5).abs() < 1e-12);
    assert!((v.width - 10.0).abs() < 1e-12);
    assert!((v.average_depth - 0.75).abs() < 1e-12);

    let h: f64 = 0.75;
    let y = 2.5 * 0.03_f64.sqrt() - 0.13 - 0.75 * h.sqrt() * (0.03_f64.sqrt() - 0.10);
    let c = h.powf(y) / 0.03;
    let velocity = c * (h * 0.002).sqrt();
    assert!((v.chezy - c).abs() < 1e-9);
    assert!((v.velocity - velocity).abs() < 1e-9);
    assert!((v.discharge - 7.5 * velocity).abs() < 1e-9);
}

/// The flow model on its own, with the depth and area of the trapezoid
/// filled to 1.75 m average depth.
#[test]
fn flow_model_reference_values() {
    let flow = FlowCalculation::compute(0.04, 2.0, 1.75, 17.5, FlowRegime::Water, ChezyFormula::DepthBanded);
    let h: f64 = 1.75;
    let y = 2.5 * 0.2 - 0.13 - 0.75 * h.sqrt() * 0.1;
    let c = h.powf(y) / 0.04;
    assert!((flow.chezy - c).abs() < 1e-9);
    assert!((flow.discharge - 17.5 * c * (h * 0.002).sqrt()).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// e) design-level resolution
// ---------------------------------------------------------------------------

/// Resolving an aggregate discharge node returns that node's level.
#[test]
fn resolving_node_discharge_returns_node_level() {
    let cs = channel_with_floodplains();
    let table = RatingConfig::new().with_level_step(step(10.0)).build_table(&cs, 300.0).unwrap();

    let mut running = f64::NEG_INFINITY;
    let mut targets = Vec::new();
    let mut expected = Vec::new();
    for (level, v) in table.aggregate_curve() {
        if v.discharge > running {
            running = v.discharge;
            targets.push(ProbabilityLevel::new(format!("{level:.2}"), v.discharge));
            expected.push(level);
        }
    }
    let set = ProbabilitySet::new(targets, None).unwrap();
    let resolved = resolve_design_levels(&table, &set);

    for (row, level) in resolved.rows.iter().zip(&expected) {
        let row = row.as_ref().unwrap();
        assert!((row.level - level).abs() < 1e-9, "{} resolved to {}", level, row.level);
    }
}

/// A target beyond the table reports a domain error in its own row only.
#[test]
fn out_of_range_target_fails_alone() {
    let cs = two_pools();
    let table = RatingConfig::new().with_level_step(step(25.0)).build_table(&cs, 20.0).unwrap();
    let top = table.last().unwrap().aggregate.discharge;
    let set = ProbabilitySet::new(
        vec![
            ProbabilityLevel::new("10%", 5.0),
            ProbabilityLevel::new("0.1%", top * 10.0),
            ProbabilityLevel::new("dry", -1.0),
        ],
        None,
    )
    .unwrap();
    let resolved = resolve_design_levels(&table, &set);

    assert!(resolved.rows[0].is_ok());
    assert!(matches!(resolved.rows[1], Err(RatingError::InterpolationDomain { ref label, .. }) if label == "0.1%"));
    assert!(matches!(resolved.rows[2], Err(RatingError::InterpolationDomain { .. })));
    assert_eq!(resolved.resolved().count(), 1);
    assert_eq!(resolved.failures().count(), 2);
}

// ---------------------------------------------------------------------------
// f) full fit
// ---------------------------------------------------------------------------

/// The breakdown at a design level below the ridge only wets the first pool.
#[test]
fn breakdown_marks_dry_sectors() {
    let cs = two_pools();
    let set = ProbabilitySet::new(
        vec![ProbabilityLevel::new("10%", 5.0), ProbabilityLevel::new("1%", 30.0)],
        Some(0),
    )
    .unwrap();
    let result = RatingConfig::new().with_level_step(step(25.0)).fit(&cs, &set).unwrap();

    let design = result.design_levels.design().unwrap();
    assert!(design.level < 3.0);
    let breakdown = result.breakdown.unwrap();
    assert_eq!(breakdown.level, design.level);
    assert_eq!(breakdown.sectors.len(), 2);
    assert!((breakdown.sectors[0].discharge.unwrap() - 5.0).abs() < TOL);
    assert_eq!(breakdown.sectors[1].discharge, None);
    assert_eq!(breakdown.sectors[1].area, None);
    assert!((breakdown.total.discharge - 5.0).abs() < 1e-3);
    assert!(result.table.last().unwrap().aggregate.discharge >= 35.999);
}

/// An unresolved design target leaves the breakdown out but keeps the rest.
#[test]
fn unresolved_design_skips_breakdown() {
    let cs = two_pools();
    let set = ProbabilitySet::new(
        vec![ProbabilityLevel::new("dry", -1.0), ProbabilityLevel::new("1%", 30.0)],
        None,
    )
    .unwrap();
    let result = RatingConfig::new().with_level_step(step(25.0)).fit(&cs, &set).unwrap();

    assert!(result.design_levels.design().is_none());
    assert!(result.breakdown.is_none());
    assert!(result.design_levels.rows[1].is_ok());
}

/// Two runs on the same input produce identical results.
#[test]
fn fit_is_deterministic() {
    let cs = channel_with_floodplains();
    let set = ProbabilitySet::new(
        vec![ProbabilityLevel::new("1%", 150.0), ProbabilityLevel::new("5%", 90.0)],
        None,
    )
    .unwrap();
    let cfg = RatingConfig::new().with_level_step(step(5.0));
    let a = cfg.fit(&cs, &set).unwrap();
    let b = cfg.fit(&cs, &set).unwrap();

    assert_eq!(a.table, b.table);
    assert_eq!(a.breakdown, b.breakdown);
    let rows = |r: &hydrorating_curve::HydraulicResult| {
        r.design_levels.resolved().cloned().collect::<Vec<_>>()
    };
    assert_eq!(rows(&a), rows(&b));
}
