//! The surveyed cross-section: bottom profile partitioned into sectors.

use crate::error::SectionError;
use crate::polyline::Polyline;
use crate::sector::{ProfileSector, SectorSpec, SectorWarning};

/// Immutable bottom profile partitioned into ordered sectors.
///
/// The first sector starts at the first profile point, the last ends at the
/// last one, and adjacent sectors share their boundary point.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    profile: Polyline,
    sectors: Vec<ProfileSector>,
}

impl CrossSection {
    /// Build a cross-section from a profile and sector definitions in
    /// profile order. Sectors are numbered from 1.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SectionError::NoSectors`] | `specs` is empty |
    /// | [`SectionError::ProfileStartUncovered`] | The first sector starts after point 0 |
    /// | [`SectionError::OverlappingSectors`] | A sector starts before its predecessor ends |
    /// | [`SectionError::SectorGap`] | A sector starts after its predecessor ends |
    /// | [`SectionError::ProfileEndUncovered`] | The last sector ends before the last point |
    /// | any from [`ProfileSector::new`] | A sector definition is invalid |
    pub fn new(profile: Polyline, specs: Vec<SectorSpec>) -> Result<Self, SectionError> {
        let Some(first) = specs.first() else {
            return Err(SectionError::NoSectors);
        };
        if first.start_point != 0 {
            return Err(SectionError::ProfileStartUncovered {
                name: first.name.clone(),
                start: first.start_point,
            });
        }

        let mut sectors: Vec<ProfileSector> = Vec::with_capacity(specs.len());
        for (i, spec) in specs.into_iter().enumerate() {
            let id = i + 1;
            if let Some(previous) = sectors.last() {
                let previous_end = previous.end_point();
                if spec.start_point < previous_end {
                    return Err(SectionError::OverlappingSectors {
                        id,
                        name: spec.name,
                        start: spec.start_point,
                        previous_end,
                    });
                }
                if spec.start_point > previous_end {
                    return Err(SectionError::SectorGap {
                        id,
                        name: spec.name,
                        start: spec.start_point,
                        previous_end,
                    });
                }
            }
            sectors.push(ProfileSector::new(id, spec, &profile)?);
        }

        let last_point = profile.len() - 1;
        if let Some(last) = sectors.last()
            && last.end_point() != last_point
        {
            return Err(SectionError::ProfileEndUncovered {
                id: last.id(),
                name: last.name().to_string(),
                end: last.end_point(),
                last: last_point,
            });
        }
        Ok(Self { profile, sectors })
    }

    /// Return the whole bottom profile.
    #[must_use]
    pub fn profile(&self) -> &Polyline {
        &self.profile
    }

    /// Return the sectors in profile order.
    #[must_use]
    pub fn sectors(&self) -> &[ProfileSector] {
        &self.sectors
    }

    /// Return the lowest elevation of the whole profile.
    #[must_use]
    pub fn min_elevation(&self) -> f64 {
        self.profile.min_elevation()
    }

    /// Return the highest elevation of the whole profile.
    #[must_use]
    pub fn max_elevation(&self) -> f64 {
        self.profile.max_elevation()
    }

    /// Return the position of the sector holding the lowest profile point.
    ///
    /// When several sectors reach the same lowest elevation the first wins.
    #[must_use]
    pub fn min_sector(&self) -> usize {
        let mut best = 0;
        for (i, sector) in self.sectors.iter().enumerate().skip(1) {
            if sector.min_elevation() < self.sectors[best].min_elevation() {
                best = i;
            }
        }
        best
    }

    /// Return the parameter warnings of every sector.
    #[must_use]
    pub fn warnings(&self) -> Vec<SectorWarning> {
        self.sectors.iter().flat_map(ProfileSector::warnings).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Polyline {
        Polyline::new(
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0],
            vec![6.0, 4.0, 5.0, 3.0, 1.0, 3.0, 6.0],
        )
        .unwrap()
    }

    fn spec(name: &str, start_point: usize, end_point: usize) -> SectorSpec {
        SectorSpec { name: name.to_string(), roughness: 0.04, slope: 1.5, start_point, end_point }
    }

    #[test]
    fn sectors_share_boundary_points() {
        let cs = CrossSection::new(profile(), vec![spec("пойма", 0, 3), spec("русло", 3, 6)]).unwrap();
        assert_eq!(cs.sectors().len(), 2);
        assert_eq!(cs.sectors()[0].id(), 1);
        assert_eq!(cs.sectors()[1].id(), 2);
        assert_eq!(cs.sectors()[0].coord().ys().last(), cs.sectors()[1].coord().ys().first());
    }

    #[test]
    fn min_sector_holds_profile_minimum() {
        let cs = CrossSection::new(profile(), vec![spec("пойма", 0, 3), spec("русло", 3, 6)]).unwrap();
        assert_eq!(cs.min_sector(), 1);
        assert_eq!(cs.min_elevation(), 1.0);
        assert_eq!(cs.max_elevation(), 6.0);
    }

    #[test]
    fn rejects_no_sectors() {
        assert!(matches!(CrossSection::new(profile(), vec![]), Err(SectionError::NoSectors)));
    }

    #[test]
    fn rejects_overlap() {
        let result = CrossSection::new(profile(), vec![spec("a", 0, 4), spec("b", 3, 6)]);
        assert!(matches!(result, Err(SectionError::OverlappingSectors { id: 2, .. })));
    }

    #[test]
    fn rejects_gap_between_sectors() {
        let result = CrossSection::new(profile(), vec![spec("a", 0, 2), spec("b", 3, 6)]);
        assert!(matches!(
            result,
            Err(SectionError::SectorGap { id: 2, start: 3, previous_end: 2, .. })
        ));
    }

    #[test]
    fn rejects_first_sector_after_profile_start() {
        let result = CrossSection::new(profile(), vec![spec("a", 1, 3), spec("b", 3, 6)]);
        assert!(matches!(result, Err(SectionError::ProfileStartUncovered { start: 1, .. })));
    }

    #[test]
    fn rejects_last_sector_before_profile_end() {
        let result = CrossSection::new(profile(), vec![spec("a", 0, 3), spec("b", 3, 5)]);
        assert!(matches!(
            result,
            Err(SectionError::ProfileEndUncovered { id: 2, end: 5, last: 6, .. })
        ));
    }

    #[test]
    fn single_sector_covers_whole_profile() {
        let cs = CrossSection::new(profile(), vec![spec("русло", 0, 6)]).unwrap();
        assert_eq!(cs.min_sector(), 0);
        assert_eq!(cs.sectors()[0].length(), 12.0);
    }

    #[test]
    fn warnings_collect_over_sectors() {
        let mut bad = spec("b", 3, 6);
        bad.slope = 1000.0;
        let cs = CrossSection::new(profile(), vec![spec("a", 0, 3), bad]).unwrap();
        assert_eq!(cs.warnings().len(), 1);
    }
}
