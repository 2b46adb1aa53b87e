use serde::Serialize;
use slidemark::config::{Config, parse_config};
use slidemark::codegen::requests::to_batch_requests;
use slidemark::render::render_svg;
use slidemark::{compile_deck, layout_deck};
use wasm_bindgen::prelude::*;

/// Options use the config-file keys (`theme`, `slideThemes`, `aspectRatio`,
/// `orientation`, `mode`, ...). JSON is valid JSON5, so the file parser reads
/// them as is.
fn build_config(options_json: Option<String>) -> Result<Config, String> {
    match options_json {
        Some(raw) if !raw.trim().is_empty() => parse_config(&raw).map_err(|error| error.to_string()),
        _ => Ok(Config::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|error| error.to_string())
}

fn layout_json(markdown: &str, options_json: Option<String>) -> Result<String, String> {
    let config = build_config(options_json)?;
    to_json(&layout_deck(markdown, &config))
}

fn ops_json(markdown: &str, options_json: Option<String>) -> Result<String, String> {
    let config = build_config(options_json)?;
    to_json(&compile_deck(markdown, &config))
}

fn requests_json(markdown: &str, options_json: Option<String>) -> Result<String, String> {
    let config = build_config(options_json)?;
    let ops = compile_deck(markdown, &config);
    to_json(&serde_json::json!({ "requests": to_batch_requests(&ops) }))
}

fn slide_svg(markdown: &str, index: usize, options_json: Option<String>) -> Result<String, String> {
    let config = build_config(options_json)?;
    let layouts = layout_deck(markdown, &config);
    layouts
        .get(index)
        .map(render_svg)
        .ok_or_else(|| format!("slide {index} out of range (deck has {})", layouts.len()))
}

/// Layout descriptors for every slide, as a JSON array.
#[wasm_bindgen]
pub fn layout_slides_json(markdown: &str, options_json: Option<String>) -> Result<String, JsValue> {
    layout_json(markdown, options_json).map_err(|error| JsValue::from_str(&error))
}

/// Drawing ops for the whole deck, as a JSON array.
#[wasm_bindgen]
pub fn compile_slides_json(markdown: &str, options_json: Option<String>) -> Result<String, JsValue> {
    ops_json(markdown, options_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn batch_requests_json(markdown: &str, options_json: Option<String>) -> Result<String, JsValue> {
    requests_json(markdown, options_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_slide_svg(markdown: &str, index: usize, options_json: Option<String>) -> Result<String, JsValue> {
    slide_svg(markdown, index, options_json).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = "# Title\n- **Bold** item\n---\n# Second";

    #[test]
    fn layout_json_lists_every_slide() {
        let json = layout_json(DECK, Some(r#"{"theme":"dark","mode":"fullscreen"}"#.to_string()))
            .expect("layout should serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["theme"], "Dark Modern");
        assert_eq!(value[0]["mode"], "fullscreen");
    }

    #[test]
    fn ops_and_requests_start_with_a_slide() {
        let ops = ops_json(DECK, None).expect("ops should serialize");
        assert!(ops.starts_with("[{\"op\":\"createSurface\""));
        let requests = requests_json(DECK, None).expect("requests should serialize");
        assert!(requests.contains("\"createSlide\""));
    }

    #[test]
    fn bad_options_and_indices_are_errors() {
        assert!(layout_json(DECK, Some(r#"{"aspectRatio":"5:4"}"#.to_string())).is_err());
        assert!(slide_svg(DECK, 5, None).is_err());
        assert!(slide_svg(DECK, 1, None).is_ok_and(|svg| svg.contains("Second")));
    }
}
