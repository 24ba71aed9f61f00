//! Cross-section geometry for open-channel rating curves.
//!
//! Pure geometry library, zero I/O. Provides the validated bottom profile
//! and its sectors, location of the water-surface boundaries for a level,
//! and the wetted-section metrics (width, area, depths, wetted perimeter,
//! hydraulic radius) derived from them.

mod boundary;
mod cross_section;
mod error;
mod metrics;
mod polyline;
mod sector;

pub use boundary::{locate_boundary, Boundary, BoundaryPoint};
pub use cross_section::CrossSection;
pub use error::{SectionError, SectorParameter, Side};
pub use metrics::{polygon_area, WaterSection, WettedBody, DEPTH_FLOOR};
pub use polyline::Polyline;
pub use sector::{ProfileSector, SectorSpec, SectorWarning, MAX_SLOPE, ROUGHNESS_RANGE};
