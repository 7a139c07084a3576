use crate::geo::CountryCode;
use crate::map::spatial::{point_in_rings, RegionIndex};
use crate::map::surface::{RegionId, RegionSurface};
use geojson::{Feature, GeoJson, Value as GeoValue};
use glam::DVec2;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Axis-aligned bounding box in artwork units.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    pub fn expand(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&mut self, other: Bounds) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// One drawn region of the artwork: an identifier, its rings in artwork
/// units (y-down), the marker classes it currently carries, and the country
/// code attached when the region was marked active.
pub struct Region {
    id: String,
    rings: Vec<Vec<DVec2>>,
    bbox: Bounds,
    classes: BTreeSet<String>,
    country: Option<CountryCode>,
}

impl Region {
    fn new(id: String, rings: Vec<Vec<DVec2>>) -> Self {
        let mut bbox = Bounds::empty();
        for ring in &rings {
            for &p in ring {
                bbox.expand(p);
            }
        }
        Self {
            id,
            rings,
            bbox,
            classes: BTreeSet::new(),
            country: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rings(&self) -> &[Vec<DVec2>] {
        &self.rings
    }

    pub fn bbox(&self) -> Bounds {
        self.bbox
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn country(&self) -> Option<CountryCode> {
        self.country
    }
}

#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("failed to read artwork file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse artwork GeoJSON: {0}")]
    Parse(#[from] geojson::Error),
    #[error("artwork contains no usable region features")]
    NoRegions,
}

/// The map artwork: all region elements, a spatial index for hit testing,
/// and the transform attribute of the root drawing group.
pub struct MapArtwork {
    regions: Vec<Region>,
    index: RegionIndex,
    bounds: Bounds,
    root_transform: String,
}

impl MapArtwork {
    /// Load artwork from a GeoJSON file. Each feature needs an identifier
    /// (feature id or an `id` property); features without one, or without
    /// polygon geometry, are skipped with a debug trace.
    pub fn load(path: &Path) -> Result<Self, ArtworkError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&content)
    }

    pub fn from_geojson_str(content: &str) -> Result<Self, ArtworkError> {
        let geojson: GeoJson = content.parse()?;
        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => Vec::new(),
        };

        let regions: Vec<Region> = features
            .into_par_iter()
            .filter_map(|feature| {
                let Some(id) = feature_id(&feature) else {
                    debug!("artwork feature without identifier, skipping");
                    return None;
                };
                let rings = feature
                    .geometry
                    .as_ref()
                    .map(|g| geometry_rings(&g.value))
                    .unwrap_or_default();
                if rings.is_empty() {
                    debug!(region = %id, "artwork feature without polygon rings, skipping");
                    return None;
                }
                Some(Region::new(id, rings))
            })
            .collect();

        if regions.is_empty() {
            return Err(ArtworkError::NoRegions);
        }
        Ok(Self::from_regions(regions))
    }

    fn from_regions(regions: Vec<Region>) -> Self {
        let mut bounds = Bounds::empty();
        for region in &regions {
            bounds.union(region.bbox);
        }

        let bboxes: Vec<Bounds> = regions.iter().map(|r| r.bbox).collect();
        let cell_size = (bounds.width().max(bounds.height()) / 16.0).max(1e-6);
        let index = RegionIndex::build(&bboxes, cell_size);

        Self {
            regions,
            index,
            bounds,
            root_transform: String::new(),
        }
    }

    /// Built-in simplified Europe used when no artwork file is supplied.
    /// Coordinates are coarse lon / negated-lat pairs (y grows southward,
    /// matching the y-down convention of the original artwork).
    pub fn simple_europe() -> Self {
        let mut regions: Vec<Region> = Vec::new();
        let mut add = |id: &str, pts: &[(f64, f64)]| {
            let ring = pts.iter().map(|&(x, y)| DVec2::new(x, y)).collect();
            regions.push(Region::new(id.to_string(), vec![ring]));
        };

        add("demo_is", &[
            (-24.0, -65.8), (-18.5, -66.4), (-13.6, -65.5), (-14.5, -64.0),
            (-18.0, -63.4), (-22.7, -63.8),
        ]);
        add("demo_ie", &[
            (-10.3, -54.2), (-6.2, -54.5), (-6.0, -52.2), (-8.5, -51.5), (-10.4, -52.0),
        ]);
        add("demo_gb", &[
            (-5.0, -58.6), (-1.8, -57.5), (0.2, -53.0), (1.7, -52.5), (0.3, -50.8),
            (-5.7, -50.0), (-3.0, -53.4), (-4.8, -54.8), (-6.2, -56.7),
        ]);
        add("demo_pt", &[
            (-8.8, -42.0), (-6.2, -41.5), (-7.4, -37.2), (-8.9, -37.0),
        ]);
        add("demo_es", &[
            (-8.8, -43.6), (-1.8, -43.4), (3.2, -42.3), (0.1, -38.8), (-2.1, -36.8),
            (-5.6, -36.1), (-7.4, -37.2), (-6.2, -41.5),
        ]);
        add("demo_fr", &[
            (-4.8, -48.4), (-1.9, -49.7), (1.6, -51.0), (4.2, -50.0), (7.6, -48.9),
            (6.8, -47.0), (7.5, -43.9), (3.2, -42.3), (-1.8, -43.4), (-1.2, -46.3),
        ]);
        // Corsica: second region element of the same country.
        add("demo_corsica_fr", &[
            (8.6, -43.0), (9.5, -42.6), (9.4, -41.4), (8.8, -41.5),
        ]);
        add("demo_be", &[
            (2.6, -51.3), (5.9, -51.5), (6.2, -50.2), (4.2, -50.0),
        ]);
        add("demo_nl", &[
            (3.4, -51.5), (7.1, -53.5), (7.0, -52.2), (5.9, -51.5),
        ]);
        add("demo_de", &[
            (6.2, -50.2), (5.9, -51.5), (7.0, -52.2), (7.1, -53.5), (8.8, -54.9),
            (14.0, -54.0), (15.0, -51.0), (12.2, -50.2), (13.8, -48.7), (10.5, -47.6),
            (7.6, -47.5),
        ]);
        add("demo_dk", &[
            (8.2, -56.8), (10.9, -57.7), (12.6, -56.0), (9.8, -54.9), (8.1, -55.4),
        ]);
        add("demo_ch", &[
            (6.8, -47.0), (7.6, -47.5), (10.5, -47.6), (10.5, -46.5),
        ]);
        add("demo_at", &[
            (10.5, -47.6), (13.8, -48.7), (17.0, -48.1), (16.5, -46.9), (13.7, -46.6),
            (10.5, -46.5),
        ]);
        add("demo_it", &[
            (7.5, -43.9), (6.8, -47.0), (10.5, -46.5), (13.7, -46.6), (12.5, -44.2),
            (14.0, -42.5), (16.2, -41.9), (18.5, -40.2), (15.7, -37.9), (15.6, -40.0),
            (12.0, -41.8), (10.1, -44.0),
        ]);
        add("demo_cz", &[
            (12.2, -50.2), (15.0, -51.0), (18.8, -49.6), (16.9, -48.8), (13.8, -48.7),
        ]);
        add("demo_pl", &[
            (14.0, -54.0), (18.5, -54.8), (23.5, -54.0), (24.0, -50.5), (19.0, -49.2),
            (18.8, -49.6), (15.0, -51.0),
        ]);
        add("demo_se", &[
            (12.9, -58.4), (11.4, -59.7), (13.5, -63.0), (17.8, -65.6), (23.0, -66.0),
            (21.5, -64.0), (19.0, -61.0), (16.2, -58.7),
        ]);
        add("demo_no", &[
            (7.0, -58.0), (5.2, -59.0), (4.9, -61.8), (12.0, -65.0), (17.0, -68.3),
            (25.5, -70.8), (28.5, -70.5), (19.0, -67.8), (13.5, -63.0), (11.4, -59.7),
        ]);
        add("demo_gr", &[
            (20.2, -39.8), (22.8, -41.0), (26.1, -41.3), (26.0, -38.9), (23.5, -38.0),
            (21.5, -37.0), (22.5, -36.5), (20.9, -37.4),
        ]);

        Self::from_regions(regions)
    }

    /// Topmost region containing the artwork-space point, if any.
    pub fn hit(&self, p: DVec2) -> Option<RegionId> {
        self.index
            .candidates(p)
            .iter()
            .copied()
            .filter(|&idx| point_in_rings(self.regions[idx].rings(), p))
            .max() // later regions draw on top
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn root_transform(&self) -> &str {
        &self.root_transform
    }
}

impl RegionSurface for MapArtwork {
    fn regions_with_suffix(&self, suffix: &str) -> Vec<RegionId> {
        let pattern = format!("_{suffix}");
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, region)| region.id.ends_with(&pattern))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn regions_with_class(&self, class: &str) -> Vec<RegionId> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, region)| region.classes.contains(class))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn add_class(&mut self, id: RegionId, class: &str) {
        if let Some(region) = self.regions.get_mut(id) {
            region.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, id: RegionId, class: &str) {
        if let Some(region) = self.regions.get_mut(id) {
            region.classes.remove(class);
        }
    }

    fn has_class(&self, id: RegionId, class: &str) -> bool {
        self.regions.get(id).is_some_and(|r| r.classes.contains(class))
    }

    fn set_country(&mut self, id: RegionId, code: CountryCode) {
        if let Some(region) = self.regions.get_mut(id) {
            region.country = Some(code);
        }
    }

    fn country_of(&self, id: RegionId) -> Option<CountryCode> {
        self.regions.get(id).and_then(|r| r.country)
    }

    fn set_root_transform(&mut self, attr: String) {
        self.root_transform = attr;
    }
}

fn feature_id(feature: &Feature) -> Option<String> {
    if let Some(geojson::feature::Id::String(s)) = &feature.id {
        return Some(s.clone());
    }
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get("id"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn geometry_rings(value: &GeoValue) -> Vec<Vec<DVec2>> {
    match value {
        GeoValue::Polygon(rings) => rings.iter().map(|r| ring_points(r)).collect(),
        GeoValue::MultiPolygon(polygons) => polygons
            .iter()
            .flat_map(|rings| rings.iter().map(|r| ring_points(r)))
            .collect(),
        GeoValue::GeometryCollection(geometries) => geometries
            .iter()
            .flat_map(|g| geometry_rings(&g.value))
            .collect(),
        _ => Vec::new(),
    }
}

fn ring_points(coords: &[Vec<f64>]) -> Vec<DVec2> {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| DVec2::new(c[0], c[1]))
        .collect()
}
