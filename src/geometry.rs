use crate::error::{Result, SlideError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The drawing-command backend always targets this page size, in points.
pub const REFERENCE_WIDTH: f32 = 720.0;
pub const REFERENCE_HEIGHT: f32 = 405.0;

// Proportions measured on the 720x405 reference page.
const HEADER_HEIGHT: f32 = 50.0 / REFERENCE_HEIGHT;
const FOOTER_HEIGHT: f32 = 30.0 / REFERENCE_HEIGHT;
const CARD_MARGIN_X: f32 = 20.0 / REFERENCE_WIDTH;
const CARD_MARGIN_Y: f32 = 20.0 / REFERENCE_HEIGHT;
const BODY_INSET_X: f32 = 20.0 / REFERENCE_WIDTH;
const BODY_INSET_Y: f32 = 20.0 / REFERENCE_HEIGHT;
const COVER_TITLE_INSET_X: f32 = 40.0 / REFERENCE_WIDTH;
const COVER_TITLE_TOP: f32 = 40.0 / REFERENCE_HEIGHT;
const COVER_TITLE_HEIGHT: f32 = 80.0 / REFERENCE_HEIGHT;
const CARD_RADIUS: f32 = 16.0 / REFERENCE_HEIGHT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9", alias = "16/9")]
    Wide,
    #[serde(rename = "4:3", alias = "4/3")]
    Standard,
    #[serde(rename = "1:1", alias = "1/1")]
    Square,
}

impl AspectRatio {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().replace(' ', "").as_str() {
            "16:9" | "16/9" => Ok(Self::Wide),
            "4:3" | "4/3" => Ok(Self::Standard),
            "1:1" | "1/1" => Ok(Self::Square),
            _ => Err(SlideError::InvalidAspectRatio(value.to_string())),
        }
    }

    pub fn ratio(self) -> Ratio {
        match self {
            Self::Wide => Ratio::new(16, 9),
            Self::Standard => Ratio::new(4, 3),
            Self::Square => Ratio::new(1, 1),
        }
    }
}

/// Width-to-height fraction of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ratio {
    pub numerator: u32,
    pub denominator: u32,
}

impl Ratio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Portrait variant of the same ratio: `16:9` becomes `9:16`.
    pub fn swap(self) -> Self {
        Self::new(self.denominator, self.numerator)
    }

    pub fn value(self) -> f32 {
        self.numerator as f32 / self.denominator.max(1) as f32
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Thumbnail,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub aspect_ratio: AspectRatio,
    pub orientation: Orientation,
    pub mode: RenderMode,
}

impl Canvas {
    pub fn ratio(&self) -> Ratio {
        let ratio = self.aspect_ratio.ratio();
        match self.orientation {
            Orientation::Landscape => ratio,
            Orientation::Portrait => ratio.swap(),
        }
    }

    /// Pixel size whose shorter side is `short_side`.
    pub fn size(&self, short_side: f32) -> (f32, f32) {
        let ratio = self.ratio().value();
        if ratio >= 1.0 {
            (short_side * ratio, short_side)
        } else {
            (short_side, short_side / ratio)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn inset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    /// Same rectangle expressed relative to `origin`.
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }
}

/// Every fixed region of a slide, derived from one set of proportions so that
/// both backends agree on placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideRegions {
    pub page: Rect,
    pub header: Rect,
    pub footer: Rect,
    pub card: Rect,
    pub card_radius: f32,
    pub title: Rect,
    pub cover_title: Rect,
    pub footer_text: Rect,
    pub body: Rect,
    pub cover_body: Rect,
    /// Multiply a point size from the reference page by this to get canvas units.
    pub font_scale: f32,
}

impl SlideRegions {
    pub fn for_size(width: f32, height: f32) -> Self {
        let header_h = height * HEADER_HEIGHT;
        let footer_h = height * FOOTER_HEIGHT;
        let margin_x = width * CARD_MARGIN_X;
        let margin_y = height * CARD_MARGIN_Y;

        let page = Rect::new(0.0, 0.0, width, height);
        let header = Rect::new(0.0, 0.0, width, header_h);
        let footer = Rect::new(0.0, height - footer_h, width, footer_h);
        let card = Rect::new(
            margin_x,
            header_h + margin_y,
            width - 2.0 * margin_x,
            height - header_h - footer_h - 2.0 * margin_y,
        );
        let title = Rect::new(margin_x, 0.0, width - 2.0 * margin_x, header_h);
        let footer_text = Rect::new(margin_x, footer.y, width - 2.0 * margin_x, footer_h);
        let body = card.inset(width * BODY_INSET_X, height * BODY_INSET_Y);

        let cover_inset = width * COVER_TITLE_INSET_X;
        let cover_title = Rect::new(
            cover_inset,
            height * COVER_TITLE_TOP,
            width - 2.0 * cover_inset,
            height * COVER_TITLE_HEIGHT,
        );
        let cover_body_top = cover_title.bottom() + margin_y * 0.5;
        let cover_body = Rect::new(
            body.x,
            cover_body_top,
            body.width,
            footer.y - margin_y - cover_body_top,
        );

        let short_side = width.min(height);
        Self {
            page,
            header,
            footer,
            card,
            card_radius: height.min(width) * CARD_RADIUS,
            title,
            cover_title,
            footer_text,
            body,
            cover_body,
            font_scale: short_side / REFERENCE_HEIGHT,
        }
    }

    pub fn reference() -> Self {
        Self::for_size(REFERENCE_WIDTH, REFERENCE_HEIGHT)
    }

    pub fn body_for(&self, cover: bool) -> Rect {
        if cover { self.cover_body } else { self.body }
    }

    pub fn title_for(&self, cover: bool) -> Rect {
        if cover { self.cover_title } else { self.title }
    }
}
