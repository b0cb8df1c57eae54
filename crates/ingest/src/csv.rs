//! CSV to GeoJSON conversion for point observations.
//!
//! Field stations usually hand over CSV; the map wants GeoJSON points. The
//! reader understands quoted fields and doubled quotes but not embedded
//! newlines, which observation exports do not use.

use std::fs;
use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::{IngestError, IngestResult};

/// Convert a CSV file of point observations into a GeoJSON FeatureCollection.
///
/// Every row becomes a Point feature at (`lon_column`, `lat_column`), with
/// all columns copied into properties, numeric where they parse as numbers.
/// Returns the number of features written.
pub fn convert_csv(
    input: &Path,
    output: &Path,
    lon_column: &str,
    lat_column: &str,
) -> IngestResult<usize> {
    let text = fs::read_to_string(input)?;
    let mut lines = text.lines().enumerate();

    let (_, header_line) = lines.next().ok_or_else(|| IngestError::Csv {
        line: 1,
        message: "file is empty".to_string(),
    })?;
    let header = split_record(header_line).map_err(|message| IngestError::Csv {
        line: 1,
        message,
    })?;

    let lon_index = column_index(&header, lon_column)?;
    let lat_index = column_index(&header, lat_column)?;

    let mut features = Vec::new();
    for (i, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = i + 1;

        let fields = split_record(line).map_err(|message| IngestError::Csv {
            line: line_number,
            message,
        })?;
        if fields.len() != header.len() {
            return Err(IngestError::Csv {
                line: line_number,
                message: format!(
                    "row has {} fields, header has {}",
                    fields.len(),
                    header.len()
                ),
            });
        }

        let lon = numeric_field(&fields, lon_index, lon_column, line_number)?;
        let lat = numeric_field(&fields, lat_index, lat_column, line_number)?;

        let mut properties = Map::new();
        for (name, field) in header.iter().zip(&fields) {
            properties.insert(name.clone(), field_value(field));
        }

        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [lon, lat]
            },
            "properties": Value::Object(properties)
        }));
    }

    let count = features.len();
    let collection = json!({
        "type": "FeatureCollection",
        "features": features
    });
    fs::write(output, serde_json::to_string(&collection)?)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        features = count,
        "Converted CSV to GeoJSON"
    );

    Ok(count)
}

fn column_index(header: &[String], name: &str) -> IngestResult<usize> {
    header
        .iter()
        .position(|column| column == name)
        .ok_or_else(|| IngestError::Csv {
            line: 1,
            message: format!("missing column '{}'", name),
        })
}

fn numeric_field(
    fields: &[String],
    index: usize,
    column: &str,
    line: usize,
) -> IngestResult<f64> {
    fields[index]
        .trim()
        .parse::<f64>()
        .map_err(|_| IngestError::Csv {
            line,
            message: format!("column '{}' is not numeric: '{}'", column, fields[index]),
        })
}

/// A field as JSON: numeric when it parses as a finite number, else a string.
fn field_value(field: &str) -> Value {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(field.to_string()))
}

/// Split one CSV record into fields, honoring quotes and doubled quotes.
fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
        } else {
            match c {
                ',' => fields.push(std::mem::take(&mut field)),
                '"' if field.is_empty() => in_quotes = true,
                _ => field.push(c),
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_record_plain() {
        assert_eq!(
            split_record("a,b,c").unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_split_record_quoted() {
        assert_eq!(
            split_record(r#"Addis Ababa,"9,03",38.74"#).unwrap(),
            vec!["Addis Ababa".to_string(), "9,03".to_string(), "38.74".to_string()]
        );
    }

    #[test]
    fn test_split_record_doubled_quotes() {
        assert_eq!(
            split_record(r#""say ""hi""",2"#).unwrap(),
            vec![r#"say "hi""#.to_string(), "2".to_string()]
        );
    }

    #[test]
    fn test_split_record_unterminated_quote() {
        assert!(split_record(r#""open,1"#).is_err());
    }

    #[test]
    fn test_field_value_numeric_or_string() {
        assert_eq!(field_value("42.5"), json!(42.5));
        assert_eq!(field_value("gondar"), json!("gondar"));
        // Non-finite numbers stay strings.
        assert_eq!(field_value("NaN"), json!("NaN"));
    }
}
