//! Boundary-masked raster overlay rendering.

use geometry::RegionGeometry;
use map_common::{MaskedImage, RasterGrid, RenderError, RenderResult};
use tracing::debug;

use crate::mask::BoundaryMask;
use crate::palette::{self, Color};
use crate::png;

/// Fill opacity applied when the configured value is not usable.
pub const DEFAULT_OPACITY: f32 = 0.7;

/// Render a raster grid as a PNG overlay clipped to a region boundary.
///
/// Each cell is sampled at one point; cells outside the boundary or holding
/// non-finite values come out fully transparent. The rest are normalized
/// against the min/max of the unmasked data and colorized through the named
/// palette. When every unmasked value is the same, cells take the palette
/// midpoint.
pub fn render(
    grid: &RasterGrid,
    boundary: &RegionGeometry,
    palette_id: &str,
    opacity: f32,
) -> RenderResult<MaskedImage> {
    let ramp = palette::resolve(palette_id)?;
    let opacity = normalize_opacity(opacity);

    let mask = BoundaryMask::rasterize(boundary, &grid.bounds, grid.width, grid.height);
    debug!(
        inside = mask.count_inside(),
        total = mask.len(),
        "Rasterized boundary mask"
    );

    let (min, max) = value_range(grid, &mask).ok_or(RenderError::EmptyMask)?;

    let lut = ramp.lut();
    let alpha = (opacity * 255.0).round() as u8;
    let pixels = colorize(grid, &mask, min, max, &lut, alpha);
    let png = png::encode(&pixels, grid.width, grid.height)?;

    Ok(MaskedImage {
        width: grid.width,
        height: grid.height,
        png,
        bounds: grid.bounds,
        opacity,
    })
}

/// Clamp opacity into [0, 1], substituting the default when not finite.
fn normalize_opacity(opacity: f32) -> f32 {
    if opacity.is_finite() {
        opacity.max(0.0).min(1.0)
    } else {
        DEFAULT_OPACITY
    }
}

/// Min and max over unmasked finite cells, or None when there are none.
fn value_range(grid: &RasterGrid, mask: &BoundaryMask) -> Option<(f32, f32)> {
    let mut range: Option<(f32, f32)> = None;

    for row in 0..grid.height {
        for col in 0..grid.width {
            if !mask.is_inside(row, col) {
                continue;
            }
            let value = grid.value(row, col);
            if !value.is_finite() {
                continue;
            }
            range = Some(match range {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
    }

    range
}

/// Produce RGBA pixels for the grid, transparent outside the mask.
fn colorize(
    grid: &RasterGrid,
    mask: &BoundaryMask,
    min: f32,
    max: f32,
    lut: &[Color],
    alpha: u8,
) -> Vec<u8> {
    let range = max - min;
    let mut pixels = vec![0u8; grid.width * grid.height * 4];

    for row in 0..grid.height {
        for col in 0..grid.width {
            let value = grid.value(row, col);
            if !mask.is_inside(row, col) || !value.is_finite() {
                continue; // stays transparent
            }

            let t = if range > 0.0 {
                (value - min) / range
            } else {
                0.5
            };
            let color = lut[(t.max(0.0).min(1.0) * 255.0) as usize];

            let pixel = (row * grid.width + col) * 4;
            pixels[pixel] = color.r;
            pixels[pixel + 1] = color.g;
            pixels[pixel + 2] = color.b;
            pixels[pixel + 3] = alpha;
        }
    }

    pixels
}
