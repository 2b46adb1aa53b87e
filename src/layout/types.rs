use serde::Serialize;

use crate::geometry::{Ratio, Rect, RenderMode};
use crate::ir::StyledRun;
use crate::theme::{Color, ThemeCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
}

/// Styled text with its wrapped lines and measured size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub runs: Vec<StyledRun>,
    pub lines: Vec<Vec<StyledRun>>,
    pub font: FontSpec,
    pub color: Color,
    /// Line advance in canvas units.
    pub line_height: f32,
    pub valign: VerticalAlign,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBox {
    /// Relative to the enclosing box.
    pub frame: Rect,
    pub text: TextNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletMark {
    pub glyph: String,
    pub color: Color,
    /// Horizontal space reserved for glyph and gap.
    pub indent: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellNode {
    /// Relative to the row.
    pub frame: Rect,
    pub text: TextNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRowNode {
    /// Relative to the table.
    pub frame: Rect,
    pub is_header_row: bool,
    pub fill: Option<Color>,
    pub cells: Vec<TableCellNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableNode {
    /// Relative to the card content box.
    pub frame: Rect,
    pub column_widths: Vec<f32>,
    pub cell_padding: f32,
    pub border: Color,
    pub rows: Vec<TableRowNode>,
}

/// One entry of the card's body stack. Frames are relative to the card
/// content box and follow block order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BodyNode {
    Heading {
        level: u8,
        frame: Rect,
        text: TextNode,
    },
    Line {
        frame: Rect,
        bullet: Option<BulletMark>,
        text: TextNode,
    },
    Table(TableNode),
}

impl BodyNode {
    pub fn frame(&self) -> &Rect {
        match self {
            BodyNode::Heading { frame, .. } | BodyNode::Line { frame, .. } => frame,
            BodyNode::Table(table) => &table.frame,
        }
    }
}

/// Top-level boxes in paint order. Frames are in canvas units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutBox {
    HeaderBar {
        frame: Rect,
        fill: Color,
        title: TextBox,
    },
    CoverTitle {
        frame: Rect,
        text: TextNode,
    },
    #[serde(rename_all = "camelCase")]
    Card {
        frame: Rect,
        fill: Option<Color>,
        radius: f32,
        /// Content box relative to the card.
        content: Rect,
        children: Vec<BodyNode>,
        overflow: bool,
    },
    FooterBar {
        frame: Rect,
        fill: Color,
        caption: TextBox,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDescriptor {
    pub width: f32,
    pub height: f32,
    pub ratio: Ratio,
    pub mode: RenderMode,
    pub theme: String,
    pub category: ThemeCategory,
    pub background: Color,
    pub children: Vec<LayoutBox>,
}

impl LayoutDescriptor {
    pub fn header(&self) -> Option<&LayoutBox> {
        self.children
            .iter()
            .find(|child| matches!(child, LayoutBox::HeaderBar { .. }))
    }

    pub fn footer(&self) -> Option<&LayoutBox> {
        self.children
            .iter()
            .find(|child| matches!(child, LayoutBox::FooterBar { .. }))
    }

    pub fn body(&self) -> &[BodyNode] {
        self.children
            .iter()
            .find_map(|child| match child {
                LayoutBox::Card { children, .. } => Some(children.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn title_text(&self) -> Option<&TextNode> {
        self.children.iter().find_map(|child| match child {
            LayoutBox::HeaderBar { title, .. } => Some(&title.text),
            LayoutBox::CoverTitle { text, .. } => Some(text),
            _ => None,
        })
    }
}
