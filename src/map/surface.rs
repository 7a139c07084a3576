use crate::geo::{self, CountryCode};
use tracing::debug;

/// Index of a region element within its surface.
pub type RegionId = usize;

/// Marker class names. These are a stable contract with the renderer (the
/// stylesheet of the terminal edition) and must not be renamed.
pub mod class {
    pub const ACTIVE: &str = "active";
    pub const SELECTED: &str = "selected";
    pub const HIGHLIGHTED: &str = "highlighted";
    pub const FILTERED: &str = "filtered";
    pub const HIDDEN: &str = "hidden";
}

/// Element query and class toggle capability over the map artwork. The
/// highlight operations below are written against this trait so they can be
/// exercised without a drawable artwork.
pub trait RegionSurface {
    /// Ids of all region elements whose identifier ends in `_<suffix>`.
    fn regions_with_suffix(&self, suffix: &str) -> Vec<RegionId>;
    /// Ids of all region elements currently carrying `class`.
    fn regions_with_class(&self, class: &str) -> Vec<RegionId>;
    fn add_class(&mut self, id: RegionId, class: &str);
    fn remove_class(&mut self, id: RegionId, class: &str);
    fn has_class(&self, id: RegionId, class: &str) -> bool;
    /// Attach the originating country code as element metadata.
    fn set_country(&mut self, id: RegionId, code: CountryCode);
    fn country_of(&self, id: RegionId) -> Option<CountryCode>;
    /// Reapply the transform attribute on the artwork root group.
    fn set_root_transform(&mut self, attr: String);
}

/// Mark every resolvable region of the given countries as active and attach
/// the country code as metadata. Codes without a suffix in the artwork table
/// are skipped silently. Idempotent.
pub fn mark_active(surface: &mut (impl RegionSurface + ?Sized), codes: &[CountryCode]) {
    for &code in codes {
        let Some(suffix) = geo::region_suffix(code) else {
            debug!(%code, "active country has no region in this artwork, skipping");
            continue;
        };
        for id in surface.regions_with_suffix(suffix) {
            surface.add_class(id, class::ACTIVE);
            surface.set_country(id, code);
        }
    }
}

/// Mark all regions of one country as selected. Callers clear the previous
/// selection first; at most one country's regions are selected at a time.
pub fn mark_selected(surface: &mut (impl RegionSurface + ?Sized), code: CountryCode) {
    let Some(suffix) = geo::region_suffix(code) else {
        debug!(%code, "selected country has no region in this artwork, skipping");
        return;
    };
    for id in surface.regions_with_suffix(suffix) {
        surface.add_class(id, class::SELECTED);
    }
}

/// Remove the selected marker from every region that carries it.
pub fn clear_selected(surface: &mut (impl RegionSurface + ?Sized)) {
    for id in surface.regions_with_class(class::SELECTED) {
        surface.remove_class(id, class::SELECTED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// In-memory surface: ids plus class sets, no geometry.
    struct MockSurface {
        elements: Vec<(String, BTreeSet<String>, Option<CountryCode>)>,
        root_transform: String,
    }

    impl MockSurface {
        fn new(ids: &[&str]) -> Self {
            Self {
                elements: ids
                    .iter()
                    .map(|id| (id.to_string(), BTreeSet::new(), None))
                    .collect(),
                root_transform: String::new(),
            }
        }
    }

    impl RegionSurface for MockSurface {
        fn regions_with_suffix(&self, suffix: &str) -> Vec<RegionId> {
            let pattern = format!("_{suffix}");
            self.elements
                .iter()
                .enumerate()
                .filter(|(_, (id, _, _))| id.ends_with(&pattern))
                .map(|(i, _)| i)
                .collect()
        }

        fn regions_with_class(&self, class: &str) -> Vec<RegionId> {
            self.elements
                .iter()
                .enumerate()
                .filter(|(_, (_, classes, _))| classes.contains(class))
                .map(|(i, _)| i)
                .collect()
        }

        fn add_class(&mut self, id: RegionId, class: &str) {
            self.elements[id].1.insert(class.to_string());
        }

        fn remove_class(&mut self, id: RegionId, class: &str) {
            self.elements[id].1.remove(class);
        }

        fn has_class(&self, id: RegionId, class: &str) -> bool {
            self.elements[id].1.contains(class)
        }

        fn set_country(&mut self, id: RegionId, code: CountryCode) {
            self.elements[id].2 = Some(code);
        }

        fn country_of(&self, id: RegionId) -> Option<CountryCode> {
            self.elements[id].2
        }

        fn set_root_transform(&mut self, attr: String) {
            self.root_transform = attr;
        }
    }

    fn code(raw: &str) -> CountryCode {
        CountryCode::parse(raw).expect("valid test code")
    }

    #[test]
    fn mark_active_tags_every_matching_region() {
        // France owns two regions (mainland + island); both must match.
        let mut surface = MockSurface::new(&["map_fr", "map_corsica_fr", "map_de", "map_ocean"]);
        mark_active(&mut surface, &[code("FR")]);

        assert!(surface.has_class(0, class::ACTIVE));
        assert!(surface.has_class(1, class::ACTIVE));
        assert!(!surface.has_class(2, class::ACTIVE));
        assert_eq!(surface.country_of(0), Some(code("FR")));
        assert_eq!(surface.country_of(1), Some(code("FR")));
        assert_eq!(surface.country_of(3), None);
    }

    #[test]
    fn unknown_codes_are_skipped_without_effect() {
        let mut surface = MockSurface::new(&["map_fr"]);
        mark_active(&mut surface, &[code("US"), code("FR")]);
        assert!(surface.has_class(0, class::ACTIVE));
        assert_eq!(surface.regions_with_class(class::ACTIVE).len(), 1);
    }

    #[test]
    fn mark_active_is_idempotent() {
        let mut surface = MockSurface::new(&["map_fr"]);
        mark_active(&mut surface, &[code("FR")]);
        mark_active(&mut surface, &[code("FR")]);
        assert_eq!(surface.elements[0].1.len(), 1);
    }

    #[test]
    fn selection_is_mutually_exclusive() {
        let mut surface = MockSurface::new(&["map_fr", "map_corsica_fr", "map_de"]);

        clear_selected(&mut surface);
        mark_selected(&mut surface, code("FR"));
        assert!(surface.has_class(0, class::SELECTED));
        assert!(surface.has_class(1, class::SELECTED));

        clear_selected(&mut surface);
        mark_selected(&mut surface, code("DE"));
        assert!(!surface.has_class(0, class::SELECTED));
        assert!(!surface.has_class(1, class::SELECTED));
        assert!(surface.has_class(2, class::SELECTED));
    }

    #[test]
    fn clear_selected_on_clean_surface_is_a_no_op() {
        let mut surface = MockSurface::new(&["map_fr"]);
        clear_selected(&mut surface);
        assert!(surface.regions_with_class(class::SELECTED).is_empty());
    }
}
