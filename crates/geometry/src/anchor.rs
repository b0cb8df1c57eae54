//! The anchor locator: one representative marker point per region.

use map_common::GeoBounds;

use crate::{Polygon, RegionGeometry};

/// A marker anchor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub lat: f64,
    pub lon: f64,
}

/// Locate the anchor point for a region boundary.
///
/// Multi-polygon regions anchor by their largest polygon alone, so island
/// chains and exclaves never pull the marker off the main landmass. The
/// anchor is the polygon's area-weighted centroid; rings with fewer than
/// three distinct points average their coordinates instead, and rings whose
/// centroid is undefined (zero area) or falls outside the ring's own
/// bounding box take the box midpoint. Always produces an anchor.
pub fn locate(geometry: &RegionGeometry) -> Anchor {
    match geometry.largest_polygon() {
        Some(polygon) => anchor_polygon(polygon),
        None => Anchor { lat: 0.0, lon: 0.0 },
    }
}

fn anchor_polygon(polygon: &Polygon) -> Anchor {
    let ring = &polygon.exterior;

    if ring.distinct_len() < 3 {
        let (lon, lat) = ring.average_point();
        return Anchor { lat, lon };
    }

    let bounds = ring.bounds();
    match ring.centroid() {
        Some((lon, lat)) if bounds.contains(lon, lat) => Anchor { lat, lon },
        _ => visual_center(&bounds),
    }
}

fn visual_center(bounds: &GeoBounds) -> Anchor {
    let (lat, lon) = bounds.center();
    Anchor { lat, lon }
}
