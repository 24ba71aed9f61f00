//! CSV survey reader: bottom profile, sectors and situation markup.

use std::path::{Path, PathBuf};

use hydrorating_section::{CrossSection, Polyline, SectorParameter, SectorSpec};
use tracing::{debug, info, instrument};

use crate::domain::{SituationBorder, SituationSegment, Survey};
use crate::IoError;

/// Parse a number written with either a decimal point or a decimal comma.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Column positions found in the header.
struct Columns {
    x: usize,
    y: usize,
    sector: usize,
    roughness: usize,
    slope: usize,
    situation: Option<usize>,
}

impl Columns {
    fn locate(header: &csv::StringRecord, path: &Path) -> Result<Self, IoError> {
        let find = |name: &str| header.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let require = |column: &'static str| {
            find(column).ok_or(IoError::MissingColumn { path: path.to_path_buf(), column })
        };
        Ok(Self {
            x: require("x")?,
            y: require("y")?,
            sector: require("sector")?,
            roughness: require("roughness")?,
            slope: require("slope")?,
            situation: find("situation"),
        })
    }
}

/// One data row, with the sector cells kept raw until the sector is known.
struct SurveyRow {
    x: f64,
    y: f64,
    sector: String,
    roughness: String,
    slope: String,
    situation: String,
}

/// Reads a survey from a CSV file.
///
/// Expected CSV format:
/// - Header row with `x,y,sector,roughness,slope` and optionally `situation`
///   (any order, case-insensitive)
/// - One row per profile point, in increasing chainage
/// - A sector spans consecutive rows with the same name (case-insensitive);
///   a blank name continues the current sector. Roughness and slope are read
///   from the sector's first row. Adjacent sectors share their boundary
///   point and the last sector ends at the last point.
/// - A `situation` cell holds a land-cover kind, optionally followed by
///   `, <border kind>` to mark a border at that point.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingColumn`] | A required column is absent |
/// | [`IoError::EmptySurvey`] | Zero data rows after header |
/// | [`IoError::MalformedCell`] | A coordinate, roughness or slope is not a finite number |
/// | [`IoError::MissingParameter`] | A sector's first row has no roughness or slope |
/// | [`IoError::Section`] | The profile or sectors are invalid |
pub struct SurveyReader {
    path: PathBuf,
}

impl SurveyReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    /// Read and validate the CSV file, returning a [`Survey`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Survey, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let columns = Columns::locate(&header, &self.path)?;
        debug!(n_columns = header.len(), has_situation = columns.situation.is_some(), "read CSV header");

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            let cell = |i: usize| record.get(i).unwrap_or("");
            if cell(columns.x).is_empty() && cell(columns.y).is_empty() {
                continue;
            }
            let number = |i: usize, column: &'static str| {
                parse_number(cell(i)).ok_or_else(|| IoError::MalformedCell {
                    path: self.path.clone(),
                    row_index,
                    column,
                    raw: cell(i).to_string(),
                })
            };
            rows.push(SurveyRow {
                x: number(columns.x, "x")?,
                y: number(columns.y, "y")?,
                sector: cell(columns.sector).to_string(),
                roughness: cell(columns.roughness).to_string(),
                slope: cell(columns.slope).to_string(),
                situation: columns.situation.map_or("", cell).to_string(),
            });
        }

        if rows.is_empty() {
            return Err(IoError::EmptySurvey { path: self.path.clone() });
        }

        let specs = self.sector_specs(&rows)?;
        let (situation, borders) = situation(&rows);
        let profile = Polyline::new(rows.iter().map(|r| r.x).collect(), rows.iter().map(|r| r.y).collect())
            .map_err(|source| IoError::Section { path: self.path.clone(), source })?;
        let section = CrossSection::new(profile, specs)
            .map_err(|source| IoError::Section { path: self.path.clone(), source })?;

        info!(
            n_points = rows.len(),
            n_sectors = section.sectors().len(),
            n_situation = situation.len(),
            "survey loaded"
        );
        Ok(Survey { section, situation, borders })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    fn sector_specs(&self, rows: &[SurveyRow]) -> Result<Vec<SectorSpec>, IoError> {
        // First row index of each sector.
        let mut starts: Vec<usize> = vec![0];
        for (i, row) in rows.iter().enumerate().skip(1) {
            let current = &rows[starts[starts.len() - 1]].sector;
            if !row.sector.is_empty() && row.sector.to_lowercase() != current.to_lowercase() {
                starts.push(i);
            }
        }

        let last = rows.len() - 1;
        let mut specs = Vec::with_capacity(starts.len());
        for (k, &start) in starts.iter().enumerate() {
            let first = &rows[start];
            let id = k + 1;
            let parameter = |raw: &str, parameter: SectorParameter, column: &'static str| {
                if raw.is_empty() {
                    return Err(IoError::MissingParameter {
                        path: self.path.clone(),
                        id,
                        name: first.sector.clone(),
                        parameter,
                    });
                }
                parse_number(raw).ok_or_else(|| IoError::MalformedCell {
                    path: self.path.clone(),
                    row_index: start,
                    column,
                    raw: raw.to_string(),
                })
            };
            specs.push(SectorSpec {
                name: first.sector.clone(),
                roughness: parameter(&first.roughness, SectorParameter::Roughness, "roughness")?,
                slope: parameter(&first.slope, SectorParameter::Slope, "slope")?,
                start_point: start,
                end_point: starts.get(k + 1).copied().unwrap_or(last),
            });
        }
        Ok(specs)
    }
}

/// Group the situation column into land-cover segments and border markers.
fn situation(rows: &[SurveyRow]) -> (Vec<SituationSegment>, Vec<SituationBorder>) {
    if rows.iter().all(|r| r.situation.is_empty()) {
        return (Vec::new(), Vec::new());
    }

    let mut segments: Vec<SituationSegment> = Vec::new();
    let mut borders = Vec::new();
    for (point, row) in rows.iter().enumerate() {
        let (kind, border) = match row.situation.split_once(',') {
            Some((kind, border)) => (kind.trim(), Some(border.trim())),
            None => (row.situation.trim(), None),
        };
        if let Some(border) = border {
            borders.push(SituationBorder { id: borders.len() + 1, kind: border.to_lowercase(), point });
        }
        match segments.last_mut() {
            Some(current) if current.kind == kind => {}
            Some(current) => {
                current.end_point = point;
                segments.push(SituationSegment {
                    id: segments.len() + 1,
                    kind: kind.to_string(),
                    start_point: point,
                    end_point: point,
                });
            }
            None => segments.push(SituationSegment {
                id: 1,
                kind: kind.to_string(),
                start_point: point,
                end_point: point,
            }),
        }
    }
    if let Some(current) = segments.last_mut() {
        current.end_point = rows.len() - 1;
    }
    segments.retain(|s| !s.kind.is_empty());
    (segments, borders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    const HEADER: &str = "x,y,sector,roughness,slope,situation\n";

    #[test]
    fn groups_sectors_sharing_boundary_points() {
        let csv = format!(
            "{HEADER}0,6,пойма,0.06,1.5,луг\n2,4,Пойма,,,луг\n4,1,русло,0.03,1.5,\"вода, урез левый\"\n6,0,русло,,,вода\n8,2,пойма правая,0.07,1.5,\"лес, урез правый\"\n10,5,пойма правая,,,лес\n"
        );
        let f = write_csv(&csv);
        let survey = SurveyReader::new(f.path()).read().unwrap();
        let sectors = survey.section.sectors();
        assert_eq!(sectors.len(), 3);
        assert_eq!((sectors[0].start_point(), sectors[0].end_point()), (0, 2));
        assert_eq!((sectors[1].start_point(), sectors[1].end_point()), (2, 4));
        assert_eq!((sectors[2].start_point(), sectors[2].end_point()), (4, 5));
        assert_eq!(sectors[0].name(), "пойма");
        assert_eq!(sectors[1].roughness(), 0.03);
        assert_eq!(sectors[2].slope(), 1.5);
    }

    #[test]
    fn reads_situation_segments_and_borders() {
        let csv = format!(
            "{HEADER}0,6,a,0.06,1.5,луг\n2,4,a,,,луг\n4,1,b,0.03,1.5,\"вода, Урез левый\"\n6,0,b,,,вода\n8,2,b,,,\"лес, урез правый\"\n10,5,b,,,лес\n"
        );
        let f = write_csv(&csv);
        let survey = SurveyReader::new(f.path()).read().unwrap();
        let kinds: Vec<(&str, usize, usize)> = survey
            .situation
            .iter()
            .map(|s| (s.kind.as_str(), s.start_point, s.end_point))
            .collect();
        assert_eq!(kinds, [("луг", 0, 2), ("вода", 2, 4), ("лес", 4, 5)]);
        assert_eq!(survey.borders.len(), 2);
        assert_eq!(survey.borders[0].kind, "урез левый");
        assert_eq!(survey.borders[0].point, 2);
        assert_eq!(survey.borders[1].id, 2);
    }

    #[test]
    fn situation_column_is_optional() {
        let csv = "x,y,sector,roughness,slope\n0,2,русло,0.03,1\n1,0,русло,,\n2,2,русло,,\n";
        let f = write_csv(csv);
        let survey = SurveyReader::new(f.path()).read().unwrap();
        assert!(survey.situation.is_empty());
        assert!(survey.borders.is_empty());
        assert_eq!(survey.section.sectors()[0].end_point(), 2);
    }

    #[test]
    fn parse_number_accepts_decimal_comma() {
        assert_eq!(parse_number(" 0,035 "), Some(0.035));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn missing_slope_names_sector() {
        let csv = format!("{HEADER}0,2,русло,0.03,1,\n1,0,русло,,,\n2,1,пойма,0.05,,\n3,3,пойма,,,\n");
        let f = write_csv(&csv);
        let err = SurveyReader::new(f.path()).read().unwrap_err();
        assert!(matches!(
            err,
            IoError::MissingParameter { id: 2, ref name, parameter: SectorParameter::Slope, .. } if name == "пойма"
        ));
    }

    #[test]
    fn malformed_coordinate_is_reported() {
        let csv = format!("{HEADER}0,2,русло,0.03,1,\nabc,0,русло,,,\n");
        let f = write_csv(&csv);
        let err = SurveyReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::MalformedCell { row_index: 1, column: "x", .. }));
    }

    #[test]
    fn missing_column_is_reported() {
        let f = write_csv("x,y,sector,slope\n0,1,a,1\n");
        let err = SurveyReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { column: "roughness", .. }));
    }

    #[test]
    fn empty_survey_is_reported() {
        let f = write_csv(HEADER);
        assert!(matches!(SurveyReader::new(f.path()).read(), Err(IoError::EmptySurvey { .. })));
    }

    #[test]
    fn decreasing_chainage_is_a_section_error() {
        let csv = format!("{HEADER}0,2,русло,0.03,1,\n2,0,русло,,,\n1,2,русло,,,\n");
        let f = write_csv(&csv);
        let err = SurveyReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::Section { .. }));
    }

    #[test]
    fn file_not_found() {
        let result = SurveyReader::new(Path::new("/nonexistent/survey.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }
}
