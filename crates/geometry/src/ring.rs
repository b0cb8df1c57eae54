//! Closed coordinate rings and their planar measures.

use map_common::GeoBounds;

/// A closed loop of (lon, lat) points.
///
/// The constructor closes open input by repeating the first point, so the
/// stored form always ends where it starts and the area and centroid sweeps
/// can walk consecutive pairs without an implicit closing edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<(f64, f64)>,
}

impl Ring {
    /// Build a ring, closing it when the input is open.
    pub fn new(mut points: Vec<(f64, f64)>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        Self { points }
    }

    /// The stored points, closing duplicate included.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of distinct points, counting the closing duplicate once.
    pub fn distinct_len(&self) -> usize {
        match self.points.len() {
            n @ (0 | 1) => n,
            n => n - 1,
        }
    }

    /// Signed area by the shoelace formula.
    ///
    /// Positive for counter-clockwise winding; collinear and repeated
    /// points sum to zero.
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            sum += x0 * y1 - x1 * y0;
        }
        sum / 2.0
    }

    /// Unsigned shoelace area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area-weighted centroid as (lon, lat).
    ///
    /// Returns None when the signed area vanishes, where the weighted form
    /// would divide by zero.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let area = self.signed_area();
        if area.abs() < f64::EPSILON {
            return None;
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            let cross = x0 * y1 - x1 * y0;
            cx += (x0 + x1) * cross;
            cy += (y0 + y1) * cross;
        }
        Some((cx / (6.0 * area), cy / (6.0 * area)))
    }

    /// Axis-aligned bounds of the ring.
    pub fn bounds(&self) -> GeoBounds {
        let mut west = f64::MAX;
        let mut south = f64::MAX;
        let mut east = f64::MIN;
        let mut north = f64::MIN;

        for &(lon, lat) in &self.points {
            west = west.min(lon);
            east = east.max(lon);
            south = south.min(lat);
            north = north.max(lat);
        }

        GeoBounds::new(south, west, north, east)
    }

    /// Check if a point is inside the ring using ray casting.
    ///
    /// Points exactly on an edge may land on either side.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;

        for i in 0..n {
            let (xi, yi) = self.points[i];
            let (xj, yj) = self.points[j];

            if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Unweighted mean of the distinct points as (lon, lat).
    pub fn average_point(&self) -> (f64, f64) {
        let n = self.distinct_len();
        if n == 0 {
            return (0.0, 0.0);
        }

        let mut sum_lon = 0.0;
        let mut sum_lat = 0.0;
        for &(lon, lat) in &self.points[..n] {
            sum_lon += lon;
            sum_lat += lat;
        }
        (sum_lon / n as f64, sum_lat / n as f64)
    }
}
