//! Tests for boundary-masked overlay rendering.

use geometry::{Polygon, RegionGeometry, Ring};
use map_common::{GeoBounds, RasterGrid, RenderError};
use renderer::{render, DEFAULT_OPACITY};

/// Bounds used by every grid in this file.
fn bounds() -> GeoBounds {
    GeoBounds::new(0.0, 0.0, 10.0, 10.0)
}

/// A boundary generously larger than `bounds`, so every cell is inside.
fn covering_boundary() -> RegionGeometry {
    rectangle(-10.0, -10.0, 20.0, 20.0)
}

fn rectangle(west: f64, south: f64, east: f64, north: f64) -> RegionGeometry {
    RegionGeometry::Polygon(Polygon::new(Ring::new(vec![
        (west, south),
        (east, south),
        (east, north),
        (west, north),
    ])))
}

fn grid(values: Vec<f32>, width: usize, height: usize) -> RasterGrid {
    RasterGrid::new(width, height, values, bounds())
}

/// Scan the PNG chunk stream for a chunk type, returning its data slice.
fn find_chunk<'a>(png: &'a [u8], chunk_type: &[u8; 4]) -> Option<&'a [u8]> {
    let mut offset = 8;
    while offset + 8 <= png.len() {
        let len =
            u32::from_be_bytes([png[offset], png[offset + 1], png[offset + 2], png[offset + 3]])
                as usize;
        let data_start = offset + 8;
        if &png[offset + 4..offset + 8] == chunk_type {
            return Some(&png[data_start..data_start + len]);
        }
        offset = data_start + len + 4;
    }
    None
}

// ============================================================================
// Render pipeline
// ============================================================================

#[test]
fn test_render_produces_valid_png() {
    let grid = grid(vec![1.0, 2.0, 3.0, 4.0], 2, 2);

    let image = render(&grid, &covering_boundary(), "YlOrRd", 0.7).unwrap();

    assert_eq!(&image.png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert_eq!(&image.png[12..16], b"IHDR");
    assert!(find_chunk(&image.png, b"IEND").is_some());
}

#[test]
fn test_render_carries_grid_geometry() {
    let grid = grid(vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0], 3, 2);

    let image = render(&grid, &covering_boundary(), "Blues", 0.5).unwrap();

    assert_eq!(image.width, 3);
    assert_eq!(image.height, 2);
    assert_eq!(image.bounds, bounds());
    assert_eq!(image.opacity, 0.5);
}

#[test]
fn test_small_overlay_encodes_indexed() {
    // Four distinct values plus no masked cells: well under 256 colors.
    let grid = grid(vec![1.0, 2.0, 3.0, 4.0], 2, 2);

    let image = render(&grid, &covering_boundary(), "Greens", 0.7).unwrap();

    // Color type byte inside IHDR: 3 = indexed.
    assert_eq!(image.png[25], 3);
}

// ============================================================================
// Boundary masking
// ============================================================================

#[test]
fn test_boundary_missing_grid_entirely_is_empty_mask() {
    let grid = grid(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    let far_away = rectangle(100.0, 100.0, 105.0, 105.0);

    let err = render(&grid, &far_away, "Blues", 0.7).unwrap_err();
    assert_eq!(err, RenderError::EmptyMask);
}

#[test]
fn test_partial_coverage_renders_transparent_cells() {
    // Boundary covers only the western strip; cells sample lon 0 and 10.
    let grid = grid(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    let west_strip = rectangle(-5.0, -5.0, 5.0, 15.0);

    let image = render(&grid, &west_strip, "Blues", 1.0).unwrap();

    // Outside cells carry alpha 0, so the palette holds a transparent
    // entry and the indexed PNG needs a tRNS chunk.
    let trns = find_chunk(&image.png, b"tRNS").expect("tRNS chunk");
    assert!(trns.contains(&0));
}

#[test]
fn test_full_coverage_at_full_opacity_needs_no_trns() {
    let grid = grid(vec![7.0; 4], 2, 2);

    let image = render(&grid, &covering_boundary(), "Blues", 1.0).unwrap();

    assert!(find_chunk(&image.png, b"tRNS").is_none());
}

#[test]
fn test_all_inside_cells_nan_is_empty_mask() {
    // Finite values exist, but only in the masked-out eastern column.
    let grid = grid(vec![f32::NAN, 5.0, f32::NAN, 6.0], 2, 2);
    let west_strip = rectangle(-5.0, -5.0, 5.0, 15.0);

    let err = render(&grid, &west_strip, "Blues", 0.7).unwrap_err();
    assert_eq!(err, RenderError::EmptyMask);
}

// ============================================================================
// Normalization and opacity
// ============================================================================

#[test]
fn test_uniform_grid_still_renders() {
    let grid = grid(vec![3.5; 9], 3, 3);

    let image = render(&grid, &covering_boundary(), "Spectral", 0.7);
    assert!(image.is_ok());
}

#[test]
fn test_opacity_clamped_into_unit_range() {
    let cells = vec![1.0, 2.0, 3.0, 4.0];

    let high = render(&grid(cells.clone(), 2, 2), &covering_boundary(), "Reds", 4.0).unwrap();
    assert_eq!(high.opacity, 1.0);

    let low = render(&grid(cells, 2, 2), &covering_boundary(), "Reds", -0.5).unwrap();
    assert_eq!(low.opacity, 0.0);
}

#[test]
fn test_non_finite_opacity_takes_default() {
    let grid = grid(vec![1.0, 2.0, 3.0, 4.0], 2, 2);

    let image = render(&grid, &covering_boundary(), "Reds", f32::NAN).unwrap();
    assert_eq!(image.opacity, DEFAULT_OPACITY);
}

// ============================================================================
// Palette selection
// ============================================================================

#[test]
fn test_unknown_palette_is_rejected() {
    let grid = grid(vec![1.0, 2.0, 3.0, 4.0], 2, 2);

    let err = render(&grid, &covering_boundary(), "turbo", 0.7).unwrap_err();
    assert_eq!(err, RenderError::UnknownPalette("turbo".to_string()));
}

#[test]
fn test_palette_lookup_ignores_case() {
    let grid = grid(vec![1.0, 2.0, 3.0, 4.0], 2, 2);

    assert!(render(&grid, &covering_boundary(), "YLORRD", 0.7).is_ok());
    assert!(render(&grid, &covering_boundary(), "rdylgn", 0.7).is_ok());
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_inputs_give_identical_output() {
    let grid = grid(vec![2.0, 4.0, 8.0, 16.0, 32.0, 64.0], 3, 2);
    let boundary = rectangle(-2.0, -2.0, 12.0, 12.0);

    let first = render(&grid, &boundary, "viridis", 0.7).unwrap();
    let second = render(&grid, &boundary, "viridis", 0.7).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.png, second.png);
}
