use serde::{Deserialize, Serialize};

/// Label shown wherever a slide without a heading needs a title.
pub const UNTITLED_LABEL: &str = "No Title";

pub const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub runs: Vec<StyledRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub cells: Vec<Cell>,
    pub is_header_row: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Header {
        level: u8,
        runs: Vec<StyledRun>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        runs: Vec<StyledRun>,
        is_bullet: bool,
    },
    Table {
        rows: Vec<Row>,
    },
}

impl Block {
    pub fn is_bullet(&self) -> bool {
        matches!(self, Block::Text { is_bullet: true, .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: Option<String>,
    pub blocks: Vec<Block>,
}

impl Slide {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED_LABEL)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.blocks.is_empty()
    }
}

/// Slides in source order. The index into `slides` is the only slide identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub slides: Vec<Slide>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Concatenated text of `runs` with bold markup dropped.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}
