//! JSON metadata reader: site description, level step and target discharges.

use std::path::{Path, PathBuf};

use hydrorating_curve::{LevelStep, ProbabilityLevel, ProbabilitySet};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::domain::{ErosionLimit, ProjectMetadata, SurveyMetadata, TopLimit};
use crate::IoError;

/// Suffix marking the design probability in a label.
const DESIGN_MARK: char = '*';

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawStep {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawErosionLimit {
    elevation: f64,
    #[serde(default)]
    coords: Vec<(f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct RawTopLimit {
    elevation: f64,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawProbability {
    label: String,
    discharge: f64,
    #[serde(default)]
    design: bool,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: String,
    waterline: Option<f64>,
    coords: Option<String>,
    erosion_limit: Option<RawErosionLimit>,
    top_limit: Option<RawTopLimit>,
    level_step_cm: Option<RawStep>,
    #[serde(default)]
    probabilities: Vec<RawProbability>,
}

/// Reads project metadata from a JSON file.
///
/// Expected document:
///
/// ```json
/// {
///   "title": "р. Уса, створ 2",
///   "date": "2023-08-14",
///   "waterline": 101.2,
///   "coords": "67.1 N, 63.4 E",
///   "level_step_cm": 5,
///   "erosion_limit": { "elevation": 97.5, "coords": [[20.0, 97.5], [30.0, 97.5]] },
///   "top_limit": { "elevation": 106.0, "description": "низ пролётного строения" },
///   "probabilities": [
///     { "label": "1%", "discharge": 910.0, "design": true },
///     { "label": "10%", "discharge": 540.0 }
///   ]
/// }
/// ```
///
/// Every field except `probabilities` is optional. `level_step_cm` may be a
/// number or text. The design probability is the one flagged `design: true`
/// or whose label ends with `*` (the mark is stripped); without a mark it is
/// the first.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Not valid JSON for the schema above |
/// | [`IoError::MultipleDesignLevels`] | More than one probability is marked |
/// | [`IoError::Probabilities`] | The probability list is empty |
pub struct MetadataReader {
    path: PathBuf,
}

impl MetadataReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    /// Read and validate the JSON file, returning [`ProjectMetadata`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<ProjectMetadata, IoError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let raw: RawMetadata = serde_json::from_str(&content).map_err(|e| IoError::JsonParse {
            path: self.path.clone(),
            source: e,
        })?;

        let level_step = raw.level_step_cm.map(|step| match step {
            RawStep::Number(cm) => LevelStep::from_centimeters(cm),
            RawStep::Text(text) => LevelStep::parse_centimeters(&text),
        });

        let mut marked = Vec::new();
        let levels: Vec<ProbabilityLevel> = raw
            .probabilities
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let label = match p.label.trim().strip_suffix(DESIGN_MARK) {
                    Some(stripped) => {
                        marked.push(i);
                        stripped.trim_end().to_string()
                    }
                    None => {
                        if p.design {
                            marked.push(i);
                        }
                        p.label.trim().to_string()
                    }
                };
                ProbabilityLevel::new(label, p.discharge)
            })
            .collect();

        if marked.len() > 1 {
            return Err(IoError::MultipleDesignLevels {
                path: self.path.clone(),
                labels: marked.iter().map(|&i| levels[i].label.clone()).collect(),
            });
        }
        let design_index = marked.first().copied();
        let probabilities = ProbabilitySet::new(levels, design_index).map_err(|source| {
            IoError::Probabilities { path: self.path.clone(), source }
        })?;
        debug!(design_index = probabilities.design_index(), "design level selected");

        let survey = SurveyMetadata {
            title: raw.title,
            date: raw.date,
            waterline: raw.waterline,
            coords: raw.coords,
            erosion_limit: raw
                .erosion_limit
                .map(|e| ErosionLimit { elevation: e.elevation, coords: e.coords }),
            top_limit: raw
                .top_limit
                .map(|t| TopLimit { elevation: t.elevation, description: t.description }),
            level_step,
        };

        info!(
            title = %survey.title,
            n_probabilities = probabilities.levels().len(),
            "metadata loaded"
        );
        Ok(ProjectMetadata { survey, probabilities })
    }
}
