//! Row-major raster grids and the JSON shapes they load from.

use serde_json::Value;

use crate::{GeoBounds, RenderError};

/// A row-major grid of sample values positioned by geographic bounds.
///
/// Row 0 is the northernmost row and column 0 the westernmost column.
/// Cells that could not be read from the source document hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
    pub bounds: GeoBounds,
}

impl RasterGrid {
    /// Create a grid from already-parsed values.
    pub fn new(width: usize, height: usize, values: Vec<f32>, bounds: GeoBounds) -> Self {
        Self {
            width,
            height,
            values,
            bounds,
        }
    }

    /// Build a grid from a raster JSON document.
    ///
    /// Three shapes are accepted:
    /// - a bare nested array of rows: `[[1, 2], [3, 4]]`
    /// - an object with nested rows under `data`: `{"data": [[1, 2], [3, 4]]}`
    /// - an object with flattened values: `{"width": 2, "height": 2, "values": [1, 2, 3, 4]}`
    ///
    /// Objects may carry a `bounds` field as `[[south, west], [north, east]]`;
    /// otherwise `default_bounds` positions the grid. Null and non-numeric
    /// cells load as NaN, and short rows in nested shapes pad with NaN.
    /// Anything else is an unsupported shape.
    pub fn from_value(value: &Value, default_bounds: GeoBounds) -> Result<Self, RenderError> {
        match value {
            Value::Array(rows) => Self::from_nested(rows, default_bounds),
            Value::Object(map) => {
                let bounds = match map.get("bounds") {
                    Some(b) => parse_bounds(b)?,
                    None => default_bounds,
                };

                if let (Some(w), Some(h), Some(vals)) =
                    (map.get("width"), map.get("height"), map.get("values"))
                {
                    return Self::from_flat(w, h, vals, bounds);
                }

                match map.get("data") {
                    Some(Value::Array(rows)) => Self::from_nested(rows, bounds),
                    Some(other) => Err(RenderError::UnsupportedRasterShape(format!(
                        "'data' must be an array of rows, got {}",
                        json_kind(other)
                    ))),
                    None => Err(RenderError::UnsupportedRasterShape(
                        "object carries neither 'data' nor 'width'/'height'/'values'".to_string(),
                    )),
                }
            }
            other => Err(RenderError::UnsupportedRasterShape(format!(
                "expected an array of rows or an object, got {}",
                json_kind(other)
            ))),
        }
    }

    fn from_nested(rows: &[Value], bounds: GeoBounds) -> Result<Self, RenderError> {
        if rows.is_empty() {
            return Err(RenderError::UnsupportedRasterShape(
                "grid has no rows".to_string(),
            ));
        }

        let mut parsed: Vec<Vec<f32>> = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            match row {
                Value::Array(cells) => parsed.push(cells.iter().map(cell_value).collect()),
                other => {
                    return Err(RenderError::UnsupportedRasterShape(format!(
                        "row {} is {}, expected an array",
                        i,
                        json_kind(other)
                    )))
                }
            }
        }

        let width = parsed.iter().map(|row| row.len()).max().unwrap_or(0);
        if width == 0 {
            return Err(RenderError::UnsupportedRasterShape(
                "grid rows are empty".to_string(),
            ));
        }

        let height = parsed.len();
        let mut values = Vec::with_capacity(width * height);
        for row in parsed {
            let missing = width - row.len();
            values.extend(row);
            values.extend(std::iter::repeat(f32::NAN).take(missing));
        }

        Ok(Self {
            width,
            height,
            values,
            bounds,
        })
    }

    fn from_flat(
        width: &Value,
        height: &Value,
        values: &Value,
        bounds: GeoBounds,
    ) -> Result<Self, RenderError> {
        let width = dimension(width, "width")?;
        let height = dimension(height, "height")?;

        let cells = match values {
            Value::Array(cells) => cells,
            other => {
                return Err(RenderError::UnsupportedRasterShape(format!(
                    "'values' must be an array, got {}",
                    json_kind(other)
                )))
            }
        };

        if cells.len() != width * height {
            return Err(RenderError::UnsupportedRasterShape(format!(
                "{} values for a {}x{} grid",
                cells.len(),
                width,
                height
            )));
        }

        Ok(Self {
            width,
            height,
            values: cells.iter().map(cell_value).collect(),
            bounds,
        })
    }

    /// Value at (row, col). Row 0 is the northernmost row.
    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.width + col]
    }
}

fn cell_value(cell: &Value) -> f32 {
    cell.as_f64().map(|v| v as f32).unwrap_or(f32::NAN)
}

fn dimension(value: &Value, field: &str) -> Result<usize, RenderError> {
    match value.as_u64() {
        Some(v) if v > 0 => Ok(v as usize),
        _ => Err(RenderError::UnsupportedRasterShape(format!(
            "'{}' must be a positive integer",
            field
        ))),
    }
}

fn parse_bounds(value: &Value) -> Result<GeoBounds, RenderError> {
    let corners: [[f64; 2]; 2] = serde_json::from_value(value.clone()).map_err(|_| {
        RenderError::UnsupportedRasterShape(
            "'bounds' must be [[south, west], [north, east]]".to_string(),
        )
    })?;
    Ok(GeoBounds::from_corners(corners))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
