//! File I/O, validation, and serialization for the hydrorating pipeline.

mod domain;
mod error;
mod metadata;
mod survey;
mod writer;

pub use domain::{
    ErosionLimit, ProjectMetadata, ProjectName, SituationBorder, SituationKind, SituationSegment,
    Survey, SurveyMetadata, TopLimit,
};
pub use error::IoError;
pub use metadata::MetadataReader;
pub use survey::SurveyReader;
pub use writer::{FittedSection, ResultWriter};
