//! Geographic bounding rectangles.

use serde::{Deserialize, Serialize};

/// Fallback bounds for raster layers that do not declare their own.
///
/// Covers Ethiopia, the default deployment region. Pipeline configuration
/// can override this per map.
pub const DEFAULT_BOUNDS: GeoBounds = GeoBounds {
    south: 3.4,
    west: 33.0,
    north: 14.9,
    east: 48.0,
};

/// A geographic rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Create bounds from edge coordinates.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Build from the `[[south, west], [north, east]]` corner shape used by
    /// raster documents and image overlay placement.
    pub fn from_corners(corners: [[f64; 2]; 2]) -> Self {
        Self {
            south: corners[0][0],
            west: corners[0][1],
            north: corners[1][0],
            east: corners[1][1],
        }
    }

    /// The corner shape: `[[south, west], [north, east]]`.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Midpoint as (lat, lon).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Check if a point is contained within these bounds.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_round_trip() {
        let bounds = GeoBounds::new(3.4, 33.0, 14.9, 48.0);
        let corners = bounds.corners();
        assert_eq!(corners, [[3.4, 33.0], [14.9, 48.0]]);
        assert_eq!(GeoBounds::from_corners(corners), bounds);
    }

    #[test]
    fn test_contains() {
        let bounds = GeoBounds::new(0.0, 0.0, 10.0, 20.0);
        assert!(bounds.contains(10.0, 5.0));
        assert!(bounds.contains(0.0, 0.0));
        assert!(bounds.contains(20.0, 10.0));
        assert!(!bounds.contains(20.1, 5.0));
        assert!(!bounds.contains(10.0, -0.1));
    }

    #[test]
    fn test_center() {
        let bounds = GeoBounds::new(0.0, 10.0, 10.0, 30.0);
        assert_eq!(bounds.center(), (5.0, 20.0));
    }

    #[test]
    fn test_width_height() {
        let bounds = GeoBounds::new(3.0, 33.0, 15.0, 48.0);
        assert_eq!(bounds.width(), 15.0);
        assert_eq!(bounds.height(), 12.0);
    }
}
