//! I/O error types for hydrorating-io.

use std::path::PathBuf;

use hydrorating_curve::{ErrorClass, RatingError};
use hydrorating_section::{SectionError, SectorParameter};

/// Errors from survey and metadata ingestion and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a required survey column is absent from the header.
    #[error("missing column \"{column}\" in {path}")]
    MissingColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// Expected column name.
        column: &'static str,
    },

    /// Returned when the survey has a header but no data rows.
    #[error("empty survey (no data rows) in {path}")]
    EmptySurvey {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a numeric cell cannot be parsed as a finite number.
    #[error("malformed value in {path}: row {row_index}, column \"{column}\", raw value \"{raw}\"")]
    MalformedCell {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Column name.
        column: &'static str,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when a sector's first row has no roughness or slope.
    #[error("{path}: sector {id} «{name}» has no {parameter}")]
    MissingParameter {
        /// Path to the CSV file.
        path: PathBuf,
        /// Sector number (1-based).
        id: usize,
        /// Sector name.
        name: String,
        /// The missing parameter.
        parameter: SectorParameter,
    },

    /// Returned when the survey does not form a valid cross-section.
    #[error("invalid cross-section in {path}")]
    Section {
        /// Path to the survey file.
        path: PathBuf,
        /// Underlying geometry error.
        source: SectionError,
    },

    /// Returned when the metadata document is not valid JSON for the schema.
    #[error("JSON parse error in {path}")]
    JsonParse {
        /// Path to the JSON file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when more than one probability is marked as the design level.
    #[error("{path}: several design levels marked: {}", .labels.join(", "))]
    MultipleDesignLevels {
        /// Path to the JSON file.
        path: PathBuf,
        /// Labels of the marked probabilities.
        labels: Vec<String>,
    },

    /// Returned when the probability list is empty or invalid.
    #[error("invalid probability list in {path}")]
    Probabilities {
        /// Path to the JSON file.
        path: PathBuf,
        /// Underlying validation error.
        source: RatingError,
    },

    /// Returned when the project name contains characters outside letters,
    /// digits, `_` and `-`.
    #[error("invalid project name \"{name}\": must contain only letters, digits, '_' or '-'")]
    InvalidProjectName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a CSV result record cannot be written.
    #[error("cannot write CSV record to {path}")]
    CsvWrite {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a result cannot be serialized to JSON.
    #[error("cannot serialize {path}")]
    Serialize {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl IoError {
    /// Return the computation error class for errors caused by bad input
    /// data, or `None` for file-system and serialization failures.
    #[must_use]
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Self::Section { source, .. } if source.is_level_error() => Some(ErrorClass::InvalidLevel),
            Self::Probabilities { source, .. } => Some(source.class()),
            Self::CsvParse { .. }
            | Self::MissingColumn { .. }
            | Self::EmptySurvey { .. }
            | Self::MalformedCell { .. }
            | Self::MissingParameter { .. }
            | Self::Section { .. }
            | Self::JsonParse { .. }
            | Self::MultipleDesignLevels { .. } => Some(ErrorClass::InputData),
            Self::InvalidProjectName { .. } => Some(ErrorClass::Configuration),
            Self::FileNotFound { .. }
            | Self::OutputDirCreate { .. }
            | Self::WriteFile { .. }
            | Self::CsvWrite { .. }
            | Self::Serialize { .. } => None,
        }
    }
}
