//! Boundary rasterization for clipping grids to a region outline.

use geometry::RegionGeometry;
use map_common::GeoBounds;

/// Per-cell inside/outside flags for a grid laid over geographic bounds.
///
/// Sample points span the bounds edge to edge: row 0 sits on the northern
/// edge, the last row on the southern edge, and columns run west to east.
/// A cell is inside when its sample point falls within any polygon of the
/// boundary.
#[derive(Debug, Clone)]
pub struct BoundaryMask {
    width: usize,
    height: usize,
    inside: Vec<bool>,
}

impl BoundaryMask {
    /// Rasterize a boundary onto a width x height grid over `bounds`.
    pub fn rasterize(
        boundary: &RegionGeometry,
        bounds: &GeoBounds,
        width: usize,
        height: usize,
    ) -> Self {
        let mut inside = Vec::with_capacity(width * height);

        for row in 0..height {
            let lat = sample_coord(bounds.north, -bounds.height(), row, height);
            for col in 0..width {
                let lon = sample_coord(bounds.west, bounds.width(), col, width);
                inside.push(boundary.contains(lon, lat));
            }
        }

        Self {
            width,
            height,
            inside,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.inside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }

    pub fn is_inside(&self, row: usize, col: usize) -> bool {
        self.inside[row * self.width + col]
    }

    /// Number of cells whose sample point falls inside the boundary.
    pub fn count_inside(&self) -> usize {
        self.inside.iter().filter(|&&flag| flag).count()
    }
}

/// Position of sample `i` of `n` along an axis starting at `start` and
/// spanning `extent`. A single sample falls on the axis midpoint.
fn sample_coord(start: f64, extent: f64, i: usize, n: usize) -> f64 {
    if n <= 1 {
        start + extent / 2.0
    } else {
        start + extent * (i as f64) / ((n - 1) as f64)
    }
}
