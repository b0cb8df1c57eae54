//! HTML document emission.
//!
//! Renders a plan into one self-contained page: Leaflet from the CDN, the
//! plan embedded as JSON, raster overlays inlined as base64 data URIs, and
//! a sidebar built from the plan's categories. There is no server side and
//! no companion file; the output opens from disk or a plain file host.
//!
//! Output is deterministic for a given plan. Object keys serialize in
//! sorted order and nothing time-dependent is embedded, so rebuilding an
//! unchanged map rewrites an identical document.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use map_common::LayerDescriptor;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{MapPlan, PlannedLayer};

const DOCUMENT_SHELL: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/assets/shell.html"
));

/// Render a plan into a complete HTML document.
pub fn render_document(plan: &MapPlan) -> String {
    // "</" never survives inside the inline script block.
    let blob = plan_json(plan).to_string().replace("</", "<\\/");

    fill_slots(
        DOCUMENT_SHELL,
        &[
            ("PLAN", &blob),
            ("SIDEBAR", &sidebar_html(plan)),
            ("TITLE", &escape_html(&plan.title)),
        ],
    )
}

/// Render a plan and write the document to disk.
pub fn write_document(plan: &MapPlan, path: &Path) -> PipelineResult<()> {
    let html = render_document(plan);
    fs::write(path, &html).map_err(PipelineError::DocumentWrite)?;
    info!(path = %path.display(), bytes = html.len(), "Wrote map document");
    Ok(())
}

/// The JSON blob the embedded client script reads.
fn plan_json(plan: &MapPlan) -> Value {
    json!({
        "title": plan.title,
        "center": [plan.center.0, plan.center.1],
        "zoom": plan.zoom,
        "layers": plan
            .layers
            .iter()
            .enumerate()
            .map(|(index, layer)| layer_json(index, layer))
            .collect::<Vec<_>>(),
    })
}

fn layer_json(index: usize, planned: &PlannedLayer) -> Value {
    let mut entry = match &planned.layer {
        LayerDescriptor::Boundary { geojson, style, .. } => json!({
            "kind": "boundary",
            "geojson": geojson,
            "style": style,
        }),
        LayerDescriptor::Markers { markers, .. } => json!({
            "kind": "markers",
            "markers": markers,
        }),
        LayerDescriptor::Heatmap {
            points,
            radius,
            blur,
            ..
        } => json!({
            "kind": "heatmap",
            // leaflet.heat takes [lat, lng, intensity] triples.
            "points": points
                .iter()
                .map(|p| json!([p.lat, p.lon, p.weight]))
                .collect::<Vec<_>>(),
            "radius": radius,
            "blur": blur,
        }),
        LayerDescriptor::Overlay { image, .. } => json!({
            "kind": "overlay",
            "href": data_uri(&image.png),
            "bounds": image.bounds.corners(),
        }),
    };

    if let Value::Object(fields) = &mut entry {
        fields.insert("id".to_string(), json!(layer_id(index)));
        fields.insert("name".to_string(), json!(planned.layer.name()));
        fields.insert("category".to_string(), json!(planned.category_id));
        fields.insert("visible".to_string(), json!(planned.visible));
    }
    entry
}

fn layer_id(index: usize) -> String {
    format!("layer-{index}")
}

/// Sidebar markup: one block per run of layers sharing a category, a
/// toggle button titled after the category, and a checkbox per layer.
/// Categories with nothing visible start collapsed.
fn sidebar_html(plan: &MapPlan) -> String {
    let mut html = String::new();
    let mut index = 0;

    while index < plan.layers.len() {
        let category_id = &plan.layers[index].category_id;
        let category_title = &plan.layers[index].category_title;
        let start = index;
        while index < plan.layers.len() && &plan.layers[index].category_id == category_id {
            index += 1;
        }

        let group = &plan.layers[start..index];
        let collapsed = if group.iter().any(|l| l.visible) {
            ""
        } else {
            " collapsed"
        };

        html.push_str(&format!("<div class=\"category{collapsed}\">\n"));
        html.push_str(&format!(
            "<button type=\"button\">{}</button>\n",
            escape_html(category_title)
        ));
        html.push_str("<div class=\"category-layers\">\n");
        for (offset, planned) in group.iter().enumerate() {
            let checked = if planned.visible { " checked" } else { "" };
            html.push_str(&format!(
                "<label><input type=\"checkbox\" data-layer=\"{}\"{}> {}</label>\n",
                layer_id(start + offset),
                checked,
                escape_html(planned.layer.name()),
            ));
        }
        html.push_str("</div>\n</div>\n");
    }

    html
}

fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", base64(png))
}

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Standard base64 with padding.
fn base64(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() + 2) / 3 * 4);

    for chunk in data.chunks(3) {
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);
        let triple = u32::from(chunk[0]) << 16 | u32::from(b1) << 8 | u32::from(b2);

        out.push(BASE64_CHARS[((triple >> 18) & 0x3f) as usize] as char);
        out.push(BASE64_CHARS[((triple >> 12) & 0x3f) as usize] as char);
        out.push(if chunk.len() > 1 {
            BASE64_CHARS[((triple >> 6) & 0x3f) as usize] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            BASE64_CHARS[(triple & 0x3f) as usize] as char
        } else {
            '='
        });
    }

    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Substitute `{{NAME}}` slots in a single left-to-right pass.
///
/// Substituted values are never rescanned, so layer data containing slot
/// markers cannot corrupt the shell. Unknown slots pass through verbatim.
fn fill_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[2..end];
                match slots.iter().find(|(name, _)| *name == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&after[..end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
