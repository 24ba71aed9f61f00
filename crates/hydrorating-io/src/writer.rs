//! Rating table CSV and summary JSON writers.

use std::fs;
use std::path::{Path, PathBuf};

use hydrorating_curve::{Column, HydraulicResult, RatingConfig, RatingTable, TOTAL_LABEL};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{ProjectMetadata, ProjectName, Survey};
use crate::IoError;

/// Writes computation results for one project.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{project}_rating.csv` and
/// `{project}_summary.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    project: ProjectName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and project name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), project = %project))]
    pub fn new(output_dir: &Path, project: ProjectName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self { output_dir: output_dir.to_path_buf(), project })
    }

    /// Return the path of the rating table, `{output_dir}/{project}_rating.csv`.
    #[must_use]
    pub fn rating_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_rating.csv", self.project.as_str()))
    }

    /// Return the path of the summary, `{output_dir}/{project}_summary.json`.
    #[must_use]
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_summary.json", self.project.as_str()))
    }

    /// Return the path of the cross-section report,
    /// `{output_dir}/{project}_sections.json`.
    #[must_use]
    pub fn sections_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_sections.json", self.project.as_str()))
    }

    /// Return a writer for cross-section `number` of a multi-section run,
    /// writing `{project}_{number}_*` files into the same directory.
    #[must_use]
    pub fn section(&self, number: usize) -> Self {
        Self {
            output_dir: self.output_dir.clone(),
            project: self.project.numbered(number),
        }
    }

    /// Write the rating table: one row per computed sector per level, each
    /// level closed by its aggregate row.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::WriteFile`] | The file cannot be created |
    /// | [`IoError::CsvWrite`] | A record cannot be written |
    #[instrument(skip_all, fields(n_levels = table.len()))]
    pub fn write_rating(&self, table: &RatingTable) -> Result<(), IoError> {
        let path = self.rating_path();
        let file = fs::File::create(&path).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        let mut wtr = csv::Writer::from_writer(file);
        let csv_err = |source: csv::Error| IoError::CsvWrite { path: path.clone(), source };

        let mut header = vec!["H", "sector"];
        header.extend(Column::ALL.map(Column::header));
        header.push("method");
        wtr.write_record(&header).map_err(csv_err)?;

        let mut n_rows = 0usize;
        for row in table.rows() {
            let mut record = vec![format!("{:.3}", row.level), row.label.to_string()];
            record.extend(Column::ALL.map(|c| format!("{:.3}", c.get(row.values))));
            record.push(row.method.map_or_else(String::new, |m| m.to_string()));
            wtr.write_record(&record).map_err(csv_err)?;
            n_rows += 1;
        }
        wtr.flush().map_err(|e| IoError::WriteFile { path: path.clone(), source: e })?;

        info!(path = %path.display(), n_rows, "rating table written");
        Ok(())
    }

    /// Write the summary: site metadata, settings, the level resolved for
    /// every probability, the design-level sector breakdown and the
    /// situation markup.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The summary cannot be serialized |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_summary(
        &self,
        metadata: &ProjectMetadata,
        survey: &Survey,
        config: &RatingConfig,
        result: &HydraulicResult,
    ) -> Result<(), IoError> {
        let path = self.summary_path();
        let xs = survey.section.profile().xs();
        let x_at = |i: usize| xs.get(i).copied();

        let design_levels = result
            .design_levels
            .rows
            .iter()
            .zip(metadata.probabilities.levels())
            .map(|(row, target)| match row {
                Ok(r) => DesignLevelEntry {
                    label: &r.label,
                    discharge: r.discharge,
                    level: Some(r.level),
                    velocity: Some(r.velocity),
                    area: Some(r.area),
                    error: None,
                },
                Err(e) => DesignLevelEntry {
                    label: &target.label,
                    discharge: target.discharge,
                    level: None,
                    velocity: None,
                    area: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let breakdown = result.breakdown.as_ref().map(|b| BreakdownEntry {
            level: b.level,
            sectors: b
                .sectors
                .iter()
                .map(|s| SectorEntry {
                    name: &s.name,
                    roughness: s.roughness,
                    slope: s.slope,
                    discharge: s.discharge,
                    velocity: s.velocity,
                    average_depth: s.average_depth,
                    width: s.width,
                    area: s.area,
                })
                .collect(),
            total: TotalEntry {
                label: TOTAL_LABEL,
                discharge: b.total.discharge,
                velocity: b.total.velocity,
                average_depth: b.total.average_depth,
                width: b.total.width,
                area: b.total.area,
            },
        });

        let site = &metadata.survey;
        let top = result.table.last();
        let artifact = SummaryArtifact {
            project: self.project.as_str(),
            title: &site.title,
            date: &site.date,
            waterline: site.waterline,
            coords: site.coords.as_deref(),
            erosion_limit: site.erosion_limit.as_ref().map(|e| ErosionEntry {
                elevation: e.elevation,
                coords: &e.coords,
            }),
            top_limit: site.top_limit.as_ref().map(|t| TopLimitEntry {
                elevation: t.elevation,
                description: &t.description,
            }),
            settings: SettingsEntry {
                regime: config.regime().to_string(),
                chezy_formula: config.formula().to_string(),
                overflow: config.overflow(),
                level_step_cm: config.level_step().centimeters(),
                ceiling_factor: config.ceiling_factor(),
            },
            bottom: survey.section.min_elevation(),
            n_levels: result.table.len(),
            top_level: top.map(|e| e.level),
            top_discharge: top.map(|e| e.aggregate.discharge),
            design_index: result.design_levels.design_index,
            design_levels,
            breakdown,
            sectors: survey
                .section
                .sectors()
                .iter()
                .map(|s| SectorGeometryEntry {
                    id: s.id(),
                    name: s.name(),
                    start_point: s.start_point(),
                    end_point: s.end_point(),
                    roughness: s.roughness(),
                    slope: s.slope(),
                    warnings: s.warnings().iter().map(ToString::to_string).collect(),
                })
                .collect(),
            situation: survey
                .situation
                .iter()
                .map(|s| SituationEntry {
                    kind: &s.kind,
                    category: s.category().as_str(),
                    start_point: s.start_point,
                    end_point: s.end_point,
                    start_x: x_at(s.start_point),
                    end_x: x_at(s.end_point),
                })
                .collect(),
            situation_borders: survey
                .borders
                .iter()
                .map(|b| BorderEntry { kind: &b.kind, point: b.point, x: x_at(b.point) })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&artifact)
            .map_err(|source| IoError::Serialize { path: path.clone(), source })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile { path: path.clone(), source: e })?;

        info!(path = %path.display(), "summary written");
        Ok(())
    }
}

/// One fitted cross-section, as passed to [`ResultWriter::write_sections`].
#[derive(Debug, Clone, Copy)]
pub struct FittedSection<'a> {
    /// Site metadata and targets of the section.
    pub metadata: &'a ProjectMetadata,
    /// The surveyed section.
    pub survey: &'a Survey,
    /// Rating result of the section.
    pub result: &'a HydraulicResult,
}

impl ResultWriter {
    /// Write the cross-section report: the design discharge, level,
    /// velocity and area of every section, in input order.
    ///
    /// A section whose design target was not resolved has null values and
    /// an `error` message.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The report cannot be serialized |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(n_sections = sections.len()))]
    pub fn write_sections(&self, sections: &[FittedSection<'_>]) -> Result<(), IoError> {
        let path = self.sections_path();
        let rows: Vec<SectionRowEntry<'_>> = sections
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let target = s.metadata.probabilities.design();
                let design = s.result.design_levels.design();
                let error = match s.result.design_levels.rows.get(s.result.design_levels.design_index) {
                    Some(Err(e)) => Some(e.to_string()),
                    _ => None,
                };
                SectionRowEntry {
                    section: i + 1,
                    title: &s.metadata.survey.title,
                    bottom: s.survey.section.min_elevation(),
                    label: &target.label,
                    discharge: target.discharge,
                    level: design.map(|r| r.level),
                    velocity: design.map(|r| r.velocity),
                    area: design.map(|r| r.area),
                    error,
                }
            })
            .collect();

        let artifact = SectionsArtifact { project: self.project.as_str(), sections: rows };
        let json = serde_json::to_string_pretty(&artifact)
            .map_err(|source| IoError::Serialize { path: path.clone(), source })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile { path: path.clone(), source: e })?;

        info!(path = %path.display(), n_sections = sections.len(), "cross-section report written");
        Ok(())
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct SummaryArtifact<'a> {
    project: &'a str,
    title: &'a str,
    date: &'a str,
    waterline: Option<f64>,
    coords: Option<&'a str>,
    erosion_limit: Option<ErosionEntry<'a>>,
    top_limit: Option<TopLimitEntry<'a>>,
    settings: SettingsEntry,
    bottom: f64,
    n_levels: usize,
    top_level: Option<f64>,
    top_discharge: Option<f64>,
    design_index: usize,
    design_levels: Vec<DesignLevelEntry<'a>>,
    breakdown: Option<BreakdownEntry<'a>>,
    sectors: Vec<SectorGeometryEntry<'a>>,
    situation: Vec<SituationEntry<'a>>,
    situation_borders: Vec<BorderEntry<'a>>,
}

#[derive(Serialize)]
struct ErosionEntry<'a> {
    elevation: f64,
    coords: &'a [(f64, f64)],
}

#[derive(Serialize)]
struct TopLimitEntry<'a> {
    elevation: f64,
    description: &'a str,
}

#[derive(Serialize)]
struct SettingsEntry {
    regime: String,
    chezy_formula: String,
    overflow: bool,
    level_step_cm: f64,
    ceiling_factor: f64,
}

#[derive(Serialize)]
struct DesignLevelEntry<'a> {
    label: &'a str,
    discharge: f64,
    level: Option<f64>,
    velocity: Option<f64>,
    area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BreakdownEntry<'a> {
    level: f64,
    sectors: Vec<SectorEntry<'a>>,
    total: TotalEntry,
}

#[derive(Serialize)]
struct SectorEntry<'a> {
    name: &'a str,
    roughness: f64,
    slope: f64,
    discharge: Option<f64>,
    velocity: Option<f64>,
    average_depth: Option<f64>,
    width: Option<f64>,
    area: Option<f64>,
}

#[derive(Serialize)]
struct TotalEntry {
    label: &'static str,
    discharge: f64,
    velocity: f64,
    average_depth: f64,
    width: f64,
    area: f64,
}

#[derive(Serialize)]
struct SectorGeometryEntry<'a> {
    id: usize,
    name: &'a str,
    start_point: usize,
    end_point: usize,
    roughness: f64,
    slope: f64,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct SituationEntry<'a> {
    kind: &'a str,
    category: &'static str,
    start_point: usize,
    end_point: usize,
    start_x: Option<f64>,
    end_x: Option<f64>,
}

#[derive(Serialize)]
struct BorderEntry<'a> {
    kind: &'a str,
    point: usize,
    x: Option<f64>,
}

#[derive(Serialize)]
struct SectionsArtifact<'a> {
    project: &'a str,
    sections: Vec<SectionRowEntry<'a>>,
}

#[derive(Serialize)]
struct SectionRowEntry<'a> {
    section: usize,
    title: &'a str,
    bottom: f64,
    label: &'a str,
    discharge: f64,
    level: Option<f64>,
    velocity: Option<f64>,
    area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SituationBorder, SituationSegment, SurveyMetadata};
    use hydrorating_curve::{LevelStep, ProbabilityLevel, ProbabilitySet};
    use hydrorating_section::{CrossSection, Polyline, SectorSpec};
    use tempfile::TempDir;

    fn survey() -> Survey {
        let profile = Polyline::new(
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0],
            vec![6.0, 0.0, 2.0, 3.0, 1.0, 2.0, 6.0],
        )
        .unwrap();
        let spec = |name: &str, start_point, end_point| SectorSpec {
            name: name.to_string(),
            roughness: 0.04,
            slope: 2.0,
            start_point,
            end_point,
        };
        Survey {
            section: CrossSection::new(profile, vec![spec("русло", 0, 3), spec("пойма", 3, 6)]).unwrap(),
            situation: vec![SituationSegment { id: 1, kind: "луг".into(), start_point: 0, end_point: 6 }],
            borders: vec![SituationBorder { id: 1, kind: "урез левый".into(), point: 1 }],
        }
    }

    fn metadata(targets: Vec<ProbabilityLevel>) -> ProjectMetadata {
        ProjectMetadata {
            survey: SurveyMetadata { title: "створ".into(), waterline: Some(0.5), ..SurveyMetadata::default() },
            probabilities: ProbabilitySet::new(targets, None).unwrap(),
        }
    }

    fn config() -> RatingConfig {
        RatingConfig::new().with_level_step(LevelStep::from_centimeters(25.0))
    }

    #[test]
    fn creates_output_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let writer = ResultWriter::new(&nested, ProjectName::new("p".into()).unwrap()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(writer.rating_path(), nested.join("p_rating.csv"));
        assert_eq!(writer.summary_path(), nested.join("p_summary.json"));
        assert_eq!(writer.sections_path(), nested.join("p_sections.json"));
        assert_eq!(writer.section(2).rating_path(), nested.join("p_2_rating.csv"));
    }

    #[test]
    fn rating_csv_has_one_row_per_sector_and_level() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(dir.path(), ProjectName::new("rt".into()).unwrap()).unwrap();
        let s = survey();
        let table = config().build_table(&s.section, 10.0).unwrap();
        writer.write_rating(&table).unwrap();

        let mut rdr = csv::Reader::from_path(writer.rating_path()).unwrap();
        let header: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, ["H", "sector", "F", "B", "Hср", "Hмакс", "V", "Q", "Shezi", "method"]);
        let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), table.rows().count());
        assert_eq!(&records[0][1], "Сумма");
        assert_eq!(&records[0][0], "0.000");
        assert_eq!(&records[1][1], "русло");
        assert_eq!(&records[1][9], "pavlovsky");
    }

    #[test]
    fn summary_reports_failed_targets() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(dir.path(), ProjectName::new("sm".into()).unwrap()).unwrap();
        let s = survey();
        let meta = metadata(vec![ProbabilityLevel::new("10%", 4.0), ProbabilityLevel::new("dry", -1.0)]);
        let cfg = config();
        let result = cfg.fit(&s.section, &meta.probabilities).unwrap();
        writer.write_summary(&meta, &s, &cfg, &result).unwrap();

        let content: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(writer.summary_path()).unwrap()).unwrap();
        assert_eq!(content["project"], "sm");
        assert_eq!(content["title"], "створ");
        assert_eq!(content["settings"]["regime"], "water");
        assert_eq!(content["settings"]["level_step_cm"], 25.0);
        let rows = content["design_levels"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0]["level"].is_number());
        assert!(rows[0].get("error").is_none());
        assert!(rows[1]["level"].is_null());
        assert!(rows[1]["error"].as_str().unwrap().contains("dry"));
        assert_eq!(content["breakdown"]["total"]["label"], "Все участки");
        assert!(content["breakdown"]["sectors"][1]["discharge"].is_null());
        assert_eq!(content["situation"][0]["end_x"], 12.0);
        assert_eq!(content["situation"][0]["category"], "grass");
        assert_eq!(content["situation_borders"][0]["x"], 2.0);
        assert_eq!(content["sectors"].as_array().unwrap().len(), 2);
    }
}
