//! Named color palettes for raster overlays.
//!
//! Ramps follow the ColorBrewer sequential/diverging schemes plus viridis,
//! the palettes hazard analysts already know from desktop GIS tools. Lookup
//! is case-insensitive.

use std::collections::HashMap;

use map_common::RenderError;
use once_cell::sync::Lazy;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A named color ramp with stops spaced evenly over [0, 1].
#[derive(Debug)]
pub struct ColorRamp {
    pub name: &'static str,
    stops: &'static [(u8, u8, u8)],
}

impl ColorRamp {
    /// Sample the ramp at a normalized position, clamped to [0, 1].
    pub fn sample(&self, t: f32) -> Color {
        let t = t.max(0.0).min(1.0);
        let segments = (self.stops.len() - 1) as f32;
        let scaled = t * segments;
        let i = (scaled.floor() as usize).min(self.stops.len() - 2);
        interpolate(self.stops[i], self.stops[i + 1], scaled - i as f32)
    }

    /// Build a 256-entry lookup table for per-cell colorization.
    pub fn lut(&self) -> Vec<Color> {
        (0..256).map(|i| self.sample(i as f32 / 255.0)).collect()
    }
}

/// Linear color interpolation between two stops
fn interpolate(from: (u8, u8, u8), to: (u8, u8, u8), t: f32) -> Color {
    let t = t.max(0.0).min(1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((from.0 as f32 * t_inv) + (to.0 as f32 * t)) as u8,
        ((from.1 as f32 * t_inv) + (to.1 as f32 * t)) as u8,
        ((from.2 as f32 * t_inv) + (to.2 as f32 * t)) as u8,
        255,
    )
}

static BLUES: ColorRamp = ColorRamp {
    name: "Blues",
    stops: &[
        (247, 251, 255),
        (222, 235, 247),
        (198, 219, 239),
        (158, 202, 225),
        (107, 174, 214),
        (66, 146, 198),
        (33, 113, 181),
        (8, 81, 156),
        (8, 48, 107),
    ],
};

static GREENS: ColorRamp = ColorRamp {
    name: "Greens",
    stops: &[
        (247, 252, 245),
        (229, 245, 224),
        (199, 233, 192),
        (161, 217, 155),
        (116, 196, 118),
        (65, 171, 93),
        (35, 139, 69),
        (0, 109, 44),
        (0, 68, 27),
    ],
};

static ORANGES: ColorRamp = ColorRamp {
    name: "Oranges",
    stops: &[
        (255, 245, 235),
        (254, 230, 206),
        (253, 208, 162),
        (253, 174, 107),
        (253, 141, 60),
        (241, 105, 19),
        (217, 72, 1),
        (166, 54, 3),
        (127, 39, 4),
    ],
};

static REDS: ColorRamp = ColorRamp {
    name: "Reds",
    stops: &[
        (255, 245, 240),
        (254, 224, 210),
        (252, 187, 161),
        (252, 146, 114),
        (251, 106, 74),
        (239, 59, 44),
        (203, 24, 29),
        (165, 15, 21),
        (103, 0, 13),
    ],
};

static YL_OR_RD: ColorRamp = ColorRamp {
    name: "YlOrRd",
    stops: &[
        (255, 255, 204),
        (255, 237, 160),
        (254, 217, 118),
        (254, 178, 76),
        (253, 141, 60),
        (252, 78, 42),
        (227, 26, 28),
        (189, 0, 38),
        (128, 0, 38),
    ],
};

static RD_YL_GN: ColorRamp = ColorRamp {
    name: "RdYlGn",
    stops: &[
        (165, 0, 38),
        (215, 48, 39),
        (244, 109, 67),
        (253, 174, 97),
        (254, 224, 139),
        (255, 255, 191),
        (217, 239, 139),
        (166, 217, 106),
        (102, 189, 99),
        (26, 152, 80),
        (0, 104, 55),
    ],
};

static SPECTRAL: ColorRamp = ColorRamp {
    name: "Spectral",
    stops: &[
        (158, 1, 66),
        (213, 62, 79),
        (244, 109, 67),
        (253, 174, 97),
        (254, 224, 139),
        (255, 255, 191),
        (230, 245, 152),
        (171, 221, 164),
        (102, 194, 165),
        (50, 136, 189),
        (94, 79, 162),
    ],
};

static VIRIDIS: ColorRamp = ColorRamp {
    name: "viridis",
    stops: &[
        (68, 1, 84),
        (71, 45, 123),
        (59, 82, 139),
        (44, 114, 142),
        (33, 145, 140),
        (39, 173, 129),
        (94, 201, 98),
        (170, 220, 50),
        (253, 231, 37),
    ],
};

static ALL: [&ColorRamp; 8] = [
    &BLUES, &GREENS, &ORANGES, &REDS, &YL_OR_RD, &RD_YL_GN, &SPECTRAL, &VIRIDIS,
];

static REGISTRY: Lazy<HashMap<String, &'static ColorRamp>> = Lazy::new(|| {
    ALL.iter()
        .map(|ramp| (ramp.name.to_ascii_lowercase(), *ramp))
        .collect()
});

/// Look up a palette by name, case-insensitively.
pub fn resolve(name: &str) -> Result<&'static ColorRamp, RenderError> {
    REGISTRY
        .get(&name.to_ascii_lowercase())
        .copied()
        .ok_or_else(|| RenderError::UnknownPalette(name.to_string()))
}

/// Names of all registered palettes, in declaration order.
pub fn names() -> Vec<&'static str> {
    ALL.iter().map(|ramp| ramp.name).collect()
}
