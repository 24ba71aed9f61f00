//! The rating table: per-level, per-sector hydraulic values plus the
//! aggregate row of every level.

use std::fmt;

use crate::flow::CoefficientMethod;

/// Label of the aggregate row.
pub const AGGREGATE_LABEL: &str = "Сумма";

/// Hydraulic quantities of one wetted section, or of a whole level.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HydraulicValues {
    /// Flow area F, m².
    pub area: f64,
    /// Surface width B, m.
    pub width: f64,
    /// Average depth Hср, m.
    pub average_depth: f64,
    /// Maximum depth Hмакс, m.
    pub max_depth: f64,
    /// Mean velocity V, m/s.
    pub velocity: f64,
    /// Discharge Q, m³/s.
    pub discharge: f64,
    /// Chezy coefficient C.
    pub chezy: f64,
}

impl HydraulicValues {
    /// Combine sector rows into the aggregate row of one level.
    ///
    /// Area, width and discharge are sums; the average depth is `ΣF/ΣB`; the
    /// maximum depth is the largest; the velocity is `ΣQ/ΣF`; the Chezy
    /// coefficient is the mean over sectors. Undefined ratios are zero.
    #[must_use]
    pub fn aggregate<'a>(rows: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut total = Self::default();
        let mut chezy_sum = 0.0;
        let mut count = 0usize;
        for row in rows {
            total.area += row.area;
            total.width += row.width;
            total.discharge += row.discharge;
            total.max_depth = total.max_depth.max(row.max_depth);
            chezy_sum += row.chezy;
            count += 1;
        }
        total.average_depth = ratio(total.area, total.width);
        total.velocity = ratio(total.discharge, total.area);
        total.chezy = if count == 0 { 0.0 } else { chezy_sum / count as f64 };
        total
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    let r = num / den;
    if r.is_finite() { r } else { 0.0 }
}

/// One hydraulic quantity, used to pick a column out of [`HydraulicValues`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Flow area F.
    Area,
    /// Surface width B.
    Width,
    /// Average depth Hср.
    AverageDepth,
    /// Maximum depth Hмакс.
    MaxDepth,
    /// Mean velocity V.
    Velocity,
    /// Discharge Q.
    Discharge,
    /// Chezy coefficient.
    Chezy,
}

impl Column {
    /// All columns in table order.
    pub const ALL: [Self; 7] = [
        Self::Area,
        Self::Width,
        Self::AverageDepth,
        Self::MaxDepth,
        Self::Velocity,
        Self::Discharge,
        Self::Chezy,
    ];

    /// Return this column's value in `values`.
    #[must_use]
    pub fn get(self, values: &HydraulicValues) -> f64 {
        match self {
            Self::Area => values.area,
            Self::Width => values.width,
            Self::AverageDepth => values.average_depth,
            Self::MaxDepth => values.max_depth,
            Self::Velocity => values.velocity,
            Self::Discharge => values.discharge,
            Self::Chezy => values.chezy,
        }
    }

    /// Return the table header.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Area => "F",
            Self::Width => "B",
            Self::AverageDepth => "Hср",
            Self::MaxDepth => "Hмакс",
            Self::Velocity => "V",
            Self::Discharge => "Q",
            Self::Chezy => "Shezi",
        }
    }
}

/// Values of one sector at one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorRow {
    /// Position of the sector in the cross-section (0-based).
    pub sector: usize,
    /// Computed quantities.
    pub values: HydraulicValues,
    /// Formula that produced the Chezy coefficient.
    pub method: CoefficientMethod,
}

/// All rows computed for one water level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEntry {
    /// Water level, m.
    pub level: f64,
    /// Rows of the sectors wetted at this level, in sector order.
    pub sectors: Vec<SectorRow>,
    /// Aggregate over `sectors`.
    pub aggregate: HydraulicValues,
}

impl LevelEntry {
    /// Build an entry and its aggregate row.
    #[must_use]
    pub fn new(level: f64, sectors: Vec<SectorRow>) -> Self {
        let aggregate = HydraulicValues::aggregate(sectors.iter().map(|r| &r.values));
        Self { level, sectors, aggregate }
    }

    /// The dry entry at the profile bottom: no sectors, all-zero aggregate.
    #[must_use]
    pub fn dry(level: f64) -> Self {
        Self::new(level, Vec::new())
    }

    /// Return the row of sector `sector`, if it was wetted at this level.
    #[must_use]
    pub fn sector(&self, sector: usize) -> Option<&SectorRow> {
        self.sectors.iter().find(|r| r.sector == sector)
    }
}

/// Label of a row in the flattened table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLabel<'a> {
    /// A sector row.
    Sector {
        /// Position of the sector (0-based).
        index: usize,
        /// Sector name.
        name: &'a str,
    },
    /// The aggregate row.
    Aggregate,
}

impl fmt::Display for RowLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sector { name, .. } => f.write_str(name),
            Self::Aggregate => f.write_str(AGGREGATE_LABEL),
        }
    }
}

/// One row of the flattened table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRow<'a> {
    /// Water level, m.
    pub level: f64,
    /// Sector or aggregate label.
    pub label: RowLabel<'a>,
    /// Computed quantities.
    pub values: &'a HydraulicValues,
    /// Chezy formula, for sector rows.
    pub method: Option<CoefficientMethod>,
}

/// Rating table ordered by strictly increasing level.
///
/// The first entry is the dry bottom; every later entry holds at least one
/// sector row.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingTable {
    sector_names: Vec<String>,
    entries: Vec<LevelEntry>,
}

impl RatingTable {
    pub(crate) fn new(sector_names: Vec<String>, entries: Vec<LevelEntry>) -> Self {
        Self { sector_names, entries }
    }

    /// Return the level entries.
    #[must_use]
    pub fn entries(&self) -> &[LevelEntry] {
        &self.entries
    }

    /// Return the number of levels, including the dry bottom.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if the table has no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the name of sector `index`.
    #[must_use]
    pub fn sector_name(&self, index: usize) -> Option<&str> {
        self.sector_names.get(index).map(String::as_str)
    }

    /// Return the number of sectors of the cross-section.
    #[must_use]
    pub fn n_sectors(&self) -> usize {
        self.sector_names.len()
    }

    /// Return the last (highest) entry.
    #[must_use]
    pub fn last(&self) -> Option<&LevelEntry> {
        self.entries.last()
    }

    /// Flatten into rows: the sector rows of each level followed by its
    /// aggregate row. The dry bottom contributes only its aggregate row.
    pub fn rows(&self) -> impl Iterator<Item = RatingRow<'_>> {
        self.entries.iter().flat_map(move |entry| {
            entry
                .sectors
                .iter()
                .map(move |row| RatingRow {
                    level: entry.level,
                    label: RowLabel::Sector {
                        index: row.sector,
                        name: self.sector_names.get(row.sector).map_or("", String::as_str),
                    },
                    values: &row.values,
                    method: Some(row.method),
                })
                .chain(std::iter::once(RatingRow {
                    level: entry.level,
                    label: RowLabel::Aggregate,
                    values: &entry.aggregate,
                    method: None,
                }))
        })
    }

    /// Return `(level, aggregate)` for every level.
    pub fn aggregate_curve(&self) -> impl Iterator<Item = (f64, &HydraulicValues)> {
        self.entries.iter().map(|e| (e.level, &e.aggregate))
    }

    /// Return `(level, values)` for the levels at which sector `index` was
    /// computed.
    pub fn sector_curve(&self, index: usize) -> impl Iterator<Item = (f64, &HydraulicValues)> {
        self.entries
            .iter()
            .filter_map(move |e| e.sector(index).map(|r| (e.level, &r.values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(area: f64, width: f64, max_depth: f64, discharge: f64, chezy: f64) -> HydraulicValues {
        HydraulicValues {
            area,
            width,
            average_depth: area / width,
            max_depth,
            velocity: discharge / area,
            discharge,
            chezy,
        }
    }

    fn row(sector: usize, values: HydraulicValues) -> SectorRow {
        SectorRow { sector, values, method: CoefficientMethod::Pavlovsky }
    }

    #[test]
    fn aggregate_sums_and_ratios() {
        let a = values(10.0, 5.0, 3.0, 20.0, 30.0);
        let b = values(2.0, 4.0, 1.0, 1.0, 20.0);
        let agg = HydraulicValues::aggregate([&a, &b]);
        assert_eq!(agg.area, 12.0);
        assert_eq!(agg.width, 9.0);
        assert_eq!(agg.discharge, 21.0);
        assert_eq!(agg.max_depth, 3.0);
        assert!((agg.average_depth - 12.0 / 9.0).abs() < 1e-12);
        assert!((agg.velocity - 21.0 / 12.0).abs() < 1e-12);
        assert_eq!(agg.chezy, 25.0);
    }

    #[test]
    fn empty_aggregate_is_zero() {
        let entry = LevelEntry::dry(100.0);
        assert_eq!(entry.aggregate, HydraulicValues::default());
        assert!(entry.sectors.is_empty());
    }

    #[test]
    fn zero_width_ratios_are_zero() {
        let agg = HydraulicValues::aggregate([&HydraulicValues::default()]);
        assert_eq!(agg.average_depth, 0.0);
        assert_eq!(agg.velocity, 0.0);
    }

    #[test]
    fn rows_end_each_level_with_aggregate() {
        let table = RatingTable::new(
            vec!["пойма".into(), "русло".into()],
            vec![
                LevelEntry::dry(0.0),
                LevelEntry::new(0.5, vec![row(1, values(1.0, 2.0, 0.5, 1.0, 30.0))]),
                LevelEntry::new(
                    1.0,
                    vec![row(0, values(0.5, 1.0, 0.2, 0.1, 20.0)), row(1, values(3.0, 4.0, 1.0, 4.0, 35.0))],
                ),
            ],
        );
        let labels: Vec<String> = table.rows().map(|r| format!("{}@{}", r.label, r.level)).collect();
        assert_eq!(
            labels,
            ["Сумма@0", "русло@0.5", "Сумма@0.5", "пойма@1", "русло@1", "Сумма@1"]
        );
        assert_eq!(table.sector_curve(0).count(), 1);
        assert_eq!(table.sector_curve(1).count(), 2);
        assert_eq!(table.aggregate_curve().count(), 3);
        assert_eq!(table.n_sectors(), 2);
    }

    #[test]
    fn column_selects_field() {
        let v = values(10.0, 5.0, 3.0, 20.0, 30.0);
        assert_eq!(Column::Discharge.get(&v), 20.0);
        assert_eq!(Column::AverageDepth.get(&v), 2.0);
        assert_eq!(Column::ALL.map(Column::header)[2], "Hср");
    }
}
