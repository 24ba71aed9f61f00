//! Domain types for hydrorating-io.

use hydrorating_curve::{LevelStep, ProbabilitySet};
use hydrorating_section::CrossSection;

use crate::IoError;

/// A validated project name for output file naming.
///
/// Must be non-empty and contain only letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    /// Parse and validate a project name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidProjectName`] if the name is empty or
    /// contains other characters.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(IoError::InvalidProjectName { name });
        }
        Ok(Self(name))
    }

    /// Return the project name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return `{name}_{number}`, still a valid project name.
    #[must_use]
    pub fn numbered(&self, number: usize) -> Self {
        Self(format!("{}_{number}", self.0))
    }
}

impl std::fmt::Display for ProjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stretch of the profile with one land-cover kind. Display-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationSegment {
    /// Segment number (1-based).
    pub id: usize,
    /// Land-cover kind, e.g. "луг".
    pub kind: String,
    /// Index of the first profile point.
    pub start_point: usize,
    /// Index of the last profile point.
    pub end_point: usize,
}

impl SituationSegment {
    /// Return the land-cover category of this segment's kind.
    #[must_use]
    pub fn category(&self) -> SituationKind {
        SituationKind::from_label(&self.kind)
    }
}

/// Land-cover category of a situation segment, used to shade the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SituationKind {
    /// Grass, meadow, lawn.
    Grass,
    /// Concrete or asphalt.
    Concrete,
    /// Ploughland or field.
    Field,
    /// Reed or sedge.
    Reed,
    /// Forest or young growth.
    Wood,
    /// Shrubs.
    Bush,
    /// Water surface, channel or brook.
    Water,
    /// Sand.
    Sand,
    /// Gravel, pebbles or alluvium.
    Gravel,
    /// A label with no known category.
    Other,
}

impl SituationKind {
    const KEYWORDS: [(Self, &'static [&'static str]); 9] = [
        (Self::Grass, &["трава", "луг", "газон"]),
        (Self::Concrete, &["бетон", "асфальт"]),
        (Self::Field, &["пашня", "поле"]),
        (Self::Reed, &["камыш", "кам", "кам.", "осока"]),
        (Self::Wood, &["лес", "редкий лес", "поросль"]),
        (Self::Bush, &["кустарник", "кусты"]),
        (Self::Water, &["вода", "ув", "протока", "ручей"]),
        (Self::Sand, &["песок"]),
        (Self::Gravel, &["гравий", "галька", "аллювий"]),
    ];

    /// Map a survey label to its category. Matching is on the whole trimmed,
    /// lower-cased label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(_, words)| words.contains(&label.as_str()))
            .map_or(Self::Other, |&(kind, _)| kind)
    }

    /// Return the category name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Concrete => "concrete",
            Self::Field => "field",
            Self::Reed => "reed",
            Self::Wood => "wood",
            Self::Bush => "bush",
            Self::Water => "water",
            Self::Sand => "sand",
            Self::Gravel => "gravel",
            Self::Other => "other",
        }
    }
}

/// A marked point on the profile, e.g. a bank edge. Display-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationBorder {
    /// Border number (1-based).
    pub id: usize,
    /// Border kind, lower-cased, e.g. "бровка левая".
    pub kind: String,
    /// Index of the profile point.
    pub point: usize,
}

/// A parsed survey: the cross-section plus its situation markup.
///
/// Produced by [`SurveyReader`](crate::SurveyReader).
#[derive(Debug, Clone)]
pub struct Survey {
    /// Bottom profile with sectors.
    pub section: CrossSection,
    /// Land-cover segments in profile order.
    pub situation: Vec<SituationSegment>,
    /// Marked border points in profile order.
    pub borders: Vec<SituationBorder>,
}

/// Lowest admissible bottom elevation after erosion.
#[derive(Debug, Clone, PartialEq)]
pub struct ErosionLimit {
    /// Elevation, m.
    pub elevation: f64,
    /// Optional `(x, y)` polyline of the limit.
    pub coords: Vec<(f64, f64)>,
}

/// Upper limit of the survey (e.g. a structure soffit).
#[derive(Debug, Clone, PartialEq)]
pub struct TopLimit {
    /// Elevation, m.
    pub elevation: f64,
    /// Free-text description.
    pub description: String,
}

/// Descriptive metadata of a survey site.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurveyMetadata {
    /// Site title.
    pub title: String,
    /// Survey date, as written.
    pub date: String,
    /// Observed water level on the survey date, m.
    pub waterline: Option<f64>,
    /// Site coordinates, as written.
    pub coords: Option<String>,
    /// Erosion limit.
    pub erosion_limit: Option<ErosionLimit>,
    /// Top limit.
    pub top_limit: Option<TopLimit>,
    /// Configured level step, if the document carries one.
    pub level_step: Option<LevelStep>,
}

/// Metadata plus the target discharges.
///
/// Produced by [`MetadataReader`](crate::MetadataReader).
#[derive(Debug, Clone)]
pub struct ProjectMetadata {
    /// Site metadata.
    pub survey: SurveyMetadata,
    /// Target discharges with the design level.
    pub probabilities: ProbabilitySet,
}
