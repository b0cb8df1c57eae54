//! Named region boundaries: polygons and multi-polygons.

use crate::Ring;

/// A polygon's outer ring.
///
/// Interior rings (holes) are not modeled; containment and area follow the
/// outer ring alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
}

impl Polygon {
    pub fn new(exterior: Ring) -> Self {
        Self { exterior }
    }
}

/// The boundary geometry of a region.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionGeometry {
    /// A single polygon.
    Polygon(Polygon),
    /// Multiple polygons (islands, exclaves, disjoint districts).
    MultiPolygon(Vec<Polygon>),
}

impl RegionGeometry {
    /// All constituent polygons in document order.
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            RegionGeometry::Polygon(p) => std::slice::from_ref(p),
            RegionGeometry::MultiPolygon(ps) => ps,
        }
    }

    /// The polygon with the largest unsigned area.
    ///
    /// Returns None for an empty multi-polygon.
    pub fn largest_polygon(&self) -> Option<&Polygon> {
        match self {
            RegionGeometry::Polygon(p) => Some(p),
            RegionGeometry::MultiPolygon(ps) => ps
                .iter()
                .max_by(|a, b| a.exterior.area().total_cmp(&b.exterior.area())),
        }
    }

    /// Check if a point is inside any constituent polygon.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygons()
            .iter()
            .any(|p| p.exterior.contains(lon, lat))
    }
}

/// A named region boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub geometry: RegionGeometry,
}

impl Region {
    pub fn new(name: impl Into<String>, geometry: RegionGeometry) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }
}
