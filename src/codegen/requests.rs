//! Batch-update request objects for the remote slide API. Pure data; sending
//! them is left to the caller.

use serde_json::{Value, json};

use super::{ContentAlignment, DrawOp, FillTarget, ParagraphAlignment, ShapeKind, StyleRange, TextStyleSpec};
use crate::geometry::Rect;
use crate::theme::Color;

const UNIT: &str = "PT";

pub fn to_batch_requests(ops: &[DrawOp]) -> Vec<Value> {
    let mut requests = Vec::with_capacity(ops.len());
    for op in ops {
        match op {
            DrawOp::CreateSurface { slide_id, index } => requests.push(json!({
                "createSlide": {
                    "objectId": slide_id,
                    "insertionIndex": index,
                    "slideLayoutReference": { "predefinedLayout": "BLANK" },
                }
            })),
            DrawOp::SetFill {
                object_id,
                target: FillTarget::Page,
                color,
            } => requests.push(json!({
                "updatePageProperties": {
                    "objectId": object_id,
                    "pageProperties": {
                        "pageBackgroundFill": { "solidFill": { "color": rgb_color(*color) } }
                    },
                    "fields": "pageBackgroundFill.solidFill.color",
                }
            })),
            DrawOp::SetFill {
                object_id,
                target: FillTarget::Shape,
                color,
            } => requests.push(json!({
                "updateShapeProperties": {
                    "objectId": object_id,
                    "shapeProperties": {
                        "shapeBackgroundFill": { "solidFill": { "color": rgb_color(*color) } },
                        "outline": { "propertyState": "NOT_RENDERED" },
                    },
                    "fields": "shapeBackgroundFill.solidFill.color,outline",
                }
            })),
            DrawOp::CreateShape {
                object_id,
                slide_id,
                kind,
                frame,
                content_alignment,
            } => {
                requests.push(json!({
                    "createShape": {
                        "objectId": object_id,
                        "shapeType": shape_type(*kind),
                        "elementProperties": element_properties(slide_id, frame),
                    }
                }));
                if let Some(alignment) = content_alignment {
                    requests.push(json!({
                        "updateShapeProperties": {
                            "objectId": object_id,
                            "shapeProperties": { "contentAlignment": content_alignment_name(*alignment) },
                            "fields": "contentAlignment",
                        }
                    }));
                }
            }
            DrawOp::InsertText { object_id, text } => requests.push(json!({
                "insertText": { "objectId": object_id, "text": text, "insertionIndex": 0 }
            })),
            DrawOp::ApplyTextStyle {
                object_id,
                range,
                style,
            } => requests.push(json!({
                "updateTextStyle": {
                    "objectId": object_id,
                    "textRange": text_range(range),
                    "style": text_style(style),
                    "fields": style.field_names().join(","),
                }
            })),
            DrawOp::ApplyParagraphStyle {
                object_id,
                range,
                alignment,
            } => requests.push(json!({
                "updateParagraphStyle": {
                    "objectId": object_id,
                    "textRange": text_range(range),
                    "style": { "alignment": paragraph_alignment_name(*alignment) },
                    "fields": "alignment",
                }
            })),
            DrawOp::ApplyBulletStyle {
                object_id,
                range,
                preset,
            } => requests.push(json!({
                "createParagraphBullets": {
                    "objectId": object_id,
                    "textRange": text_range(&StyleRange::from(*range)),
                    "bulletPreset": preset,
                }
            })),
        }
    }
    requests
}

fn rgb_color(color: Color) -> Value {
    let [red, green, blue] = color.to_unit_rgb();
    json!({ "rgbColor": { "red": red, "green": green, "blue": blue } })
}

fn dimension(magnitude: f32) -> Value {
    json!({ "magnitude": magnitude, "unit": UNIT })
}

fn element_properties(slide_id: &str, frame: &Rect) -> Value {
    json!({
        "pageObjectId": slide_id,
        "size": { "width": dimension(frame.width), "height": dimension(frame.height) },
        "transform": {
            "scaleX": 1,
            "scaleY": 1,
            "translateX": frame.x,
            "translateY": frame.y,
            "unit": UNIT,
        },
    })
}

fn shape_type(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Rectangle => "RECTANGLE",
        ShapeKind::RoundRectangle => "ROUND_RECTANGLE",
        ShapeKind::TextBox => "TEXT_BOX",
    }
}

fn content_alignment_name(alignment: ContentAlignment) -> &'static str {
    match alignment {
        ContentAlignment::Top => "TOP",
        ContentAlignment::Middle => "MIDDLE",
    }
}

fn paragraph_alignment_name(alignment: ParagraphAlignment) -> &'static str {
    match alignment {
        ParagraphAlignment::Start => "START",
    }
}

fn text_range(range: &StyleRange) -> Value {
    match range {
        StyleRange::All => json!({ "type": "ALL" }),
        StyleRange::Fixed { start, end } => json!({
            "type": "FIXED_RANGE",
            "startIndex": start,
            "endIndex": end,
        }),
    }
}

fn text_style(style: &TextStyleSpec) -> Value {
    let mut out = serde_json::Map::new();
    if let Some(family) = &style.font_family {
        out.insert("fontFamily".into(), json!(family));
    }
    if let Some(size) = style.font_size {
        out.insert("fontSize".into(), dimension(size));
    }
    if let Some(bold) = style.bold {
        out.insert("bold".into(), json!(bold));
    }
    if let Some(color) = style.color {
        out.insert(
            "foregroundColor".into(),
            json!({ "opaqueColor": rgb_color(color) }),
        );
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::compile_slide;
    use crate::config::{CodegenConfig, LayoutConfig};
    use crate::parser::parse_slide;
    use crate::theme::ThemeRegistry;

    fn requests_for(source: &str) -> Vec<Value> {
        let registry = ThemeRegistry::builtin();
        let ops = compile_slide(
            2,
            &parse_slide(source),
            registry.default_theme(),
            &LayoutConfig::default(),
            &CodegenConfig::default(),
        );
        to_batch_requests(&ops)
    }

    #[test]
    fn first_request_creates_blank_slide() {
        let requests = requests_for("# Hello");
        assert_eq!(requests[0]["createSlide"]["objectId"], "sm_2_page");
        assert_eq!(requests[0]["createSlide"]["insertionIndex"], 2);
        assert_eq!(
            requests[0]["createSlide"]["slideLayoutReference"]["predefinedLayout"],
            "BLANK"
        );
        assert!(requests[1].get("updatePageProperties").is_some());
    }

    #[test]
    fn text_boxes_get_content_alignment() {
        let requests = requests_for("# Hello");
        let title_shape = requests
            .iter()
            .position(|req| req["createShape"]["objectId"] == "sm_2_title")
            .unwrap_or_else(|| panic!("no title shape in {requests:?}"));
        assert_eq!(requests[title_shape]["createShape"]["shapeType"], "TEXT_BOX");
        assert_eq!(
            requests[title_shape + 1]["updateShapeProperties"]["shapeProperties"]["contentAlignment"],
            "MIDDLE"
        );
    }

    #[test]
    fn bold_and_bullets_use_fixed_ranges() {
        let requests = requests_for("# T\n- **Bold** item");
        let bold = requests
            .iter()
            .find(|req| {
                req["updateTextStyle"]["textRange"]["type"] == "FIXED_RANGE"
                    && req["updateTextStyle"]["fields"] == "bold"
            })
            .unwrap_or_else(|| panic!("no bold request in {requests:?}"));
        assert_eq!(bold["updateTextStyle"]["textRange"]["startIndex"], 0);
        assert_eq!(bold["updateTextStyle"]["textRange"]["endIndex"], 4);
        let bullets = requests
            .iter()
            .find(|req| req.get("createParagraphBullets").is_some())
            .unwrap_or_else(|| panic!("no bullets in {requests:?}"));
        assert_eq!(
            bullets["createParagraphBullets"]["bulletPreset"],
            "BULLET_DISC_CIRCLE_SQUARE"
        );
        assert_eq!(bullets["createParagraphBullets"]["textRange"]["endIndex"], 9);
    }

    #[test]
    fn typography_lists_every_field_it_sets() {
        let requests = requests_for("# Hello");
        let style = requests
            .iter()
            .find(|req| req["updateTextStyle"]["objectId"] == "sm_2_title")
            .unwrap_or_else(|| panic!("no title style in {requests:?}"));
        assert_eq!(
            style["updateTextStyle"]["fields"],
            "fontFamily,fontSize,bold,foregroundColor"
        );
        assert_eq!(style["updateTextStyle"]["style"]["fontSize"]["unit"], "PT");
    }
}
