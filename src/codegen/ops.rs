use serde::Serialize;

use crate::geometry::Rect;
use crate::runs::TextRange;
use crate::theme::{Color, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Rectangle,
    RoundRectangle,
    TextBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FillTarget {
    Page,
    Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentAlignment {
    Top,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParagraphAlignment {
    Start,
}

/// Text span an op applies to. Fixed ranges are in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StyleRange {
    All,
    Fixed { start: usize, end: usize },
}

impl From<TextRange> for StyleRange {
    fn from(range: TextRange) -> Self {
        StyleRange::Fixed {
            start: range.start,
            end: range.end,
        }
    }
}

/// Partial text style; unset fields are left untouched by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl TextStyleSpec {
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Self::default()
        }
    }

    /// Full typography of a theme text style, font size in points.
    pub fn from_style(style: &TextStyle, font_size: f32) -> Self {
        Self {
            font_family: Some(style.font_family.clone()),
            font_size: Some(font_size),
            bold: Some(style.bold),
            color: Some(style.color),
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::with_capacity(4);
        if self.font_family.is_some() {
            fields.push("fontFamily");
        }
        if self.font_size.is_some() {
            fields.push("fontSize");
        }
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.color.is_some() {
            fields.push("foregroundColor");
        }
        fields
    }
}

/// One drawing command against the 720x405 point page. Every shape and text
/// box is addressed by the object id it was created with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    #[serde(rename_all = "camelCase")]
    CreateSurface { slide_id: String, index: usize },
    #[serde(rename_all = "camelCase")]
    SetFill {
        object_id: String,
        target: FillTarget,
        color: Color,
    },
    #[serde(rename_all = "camelCase")]
    CreateShape {
        object_id: String,
        slide_id: String,
        kind: ShapeKind,
        frame: Rect,
        #[serde(skip_serializing_if = "Option::is_none")]
        content_alignment: Option<ContentAlignment>,
    },
    #[serde(rename_all = "camelCase")]
    InsertText { object_id: String, text: String },
    #[serde(rename_all = "camelCase")]
    ApplyTextStyle {
        object_id: String,
        range: StyleRange,
        style: TextStyleSpec,
    },
    #[serde(rename_all = "camelCase")]
    ApplyParagraphStyle {
        object_id: String,
        range: StyleRange,
        alignment: ParagraphAlignment,
    },
    #[serde(rename_all = "camelCase")]
    ApplyBulletStyle {
        object_id: String,
        range: TextRange,
        preset: String,
    },
}

impl DrawOp {
    pub fn name(&self) -> &'static str {
        match self {
            DrawOp::CreateSurface { .. } => "createSurface",
            DrawOp::SetFill { .. } => "setFill",
            DrawOp::CreateShape { .. } => "createShape",
            DrawOp::InsertText { .. } => "insertText",
            DrawOp::ApplyTextStyle { .. } => "applyTextStyle",
            DrawOp::ApplyParagraphStyle { .. } => "applyParagraphStyle",
            DrawOp::ApplyBulletStyle { .. } => "applyBulletStyle",
        }
    }

    /// Id of the object this op creates or modifies.
    pub fn object_id(&self) -> &str {
        match self {
            DrawOp::CreateSurface { slide_id, .. } => slide_id,
            DrawOp::SetFill { object_id, .. }
            | DrawOp::CreateShape { object_id, .. }
            | DrawOp::InsertText { object_id, .. }
            | DrawOp::ApplyTextStyle { object_id, .. }
            | DrawOp::ApplyParagraphStyle { object_id, .. }
            | DrawOp::ApplyBulletStyle { object_id, .. } => object_id,
        }
    }
}
