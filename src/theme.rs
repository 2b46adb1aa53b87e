use crate::error::{Result, SlideError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_THEME_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThemeCategory {
    Cover,
    Business,
    Lecture,
    #[serde(rename = "Pitch Deck", alias = "PitchDeck")]
    PitchDeck,
}

impl ThemeCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cover => "Cover",
            Self::Business => "Business",
            Self::Lecture => "Lecture",
            Self::PitchDeck => "Pitch Deck",
        }
    }

    pub fn is_cover(self) -> bool {
        self == Self::Cover
    }
}

/// Opaque sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn parse(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        let invalid = || SlideError::InvalidColor(value.to_string());
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |idx: usize| channel(&hex[idx..idx + 1].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0`, as the remote slide API expects.
    pub fn to_unit_rgb(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    /// Size in points on the 720x405 reference canvas.
    pub font_size: f32,
    #[serde(default)]
    pub bold: bool,
    pub color: Color,
}

impl TextStyle {
    fn new(font_family: &str, font_size: f32, bold: bool, color: Color) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
            bold,
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: Color,
    pub primary: Color,
    pub card: Color,
    pub text: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub header: TextStyle,
    pub body: TextStyle,
    pub footer: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub category: ThemeCategory,
    pub colors: ThemeColors,
    pub typography: Typography,
}

impl Theme {
    pub fn is_cover(&self) -> bool {
        self.category.is_cover()
    }

    /// Cover slides keep the footer strip but paint it in the page colour.
    pub fn footer_fill(&self) -> Color {
        if self.is_cover() {
            self.colors.background
        } else {
            self.colors.primary
        }
    }
}

struct ThemeSpec {
    id: &'static str,
    name: &'static str,
    category: ThemeCategory,
    background: u32,
    primary: u32,
    card: u32,
    text: u32,
    header: (&'static str, f32, u32),
    footer: (&'static str, f32, u32),
    body: (&'static str, f32),
}

const fn hex(value: u32) -> Color {
    Color::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

const BUILTIN_THEMES: [ThemeSpec; 11] = [
    ThemeSpec {
        id: "default",
        name: "Professional Card",
        category: ThemeCategory::Business,
        background: 0xf5f5f0,
        primary: 0x268f80,
        card: 0xffffff,
        text: 0x333333,
        header: ("Montserrat", 24.0, 0xffffff),
        footer: ("Roboto", 10.0, 0xffffff),
        body: ("Roboto", 14.0),
    },
    ThemeSpec {
        id: "dark",
        name: "Dark Modern",
        category: ThemeCategory::Business,
        background: 0x1a1a1e,
        primary: 0x3399db,
        card: 0x2e2e33,
        text: 0xe6e6e6,
        header: ("Roboto", 24.0, 0xffffff),
        footer: ("Roboto", 10.0, 0xcccccc),
        body: ("Roboto", 14.0),
    },
    ThemeSpec {
        id: "light",
        name: "Clean Light",
        category: ThemeCategory::Business,
        background: 0xffffff,
        primary: 0x4d4d4d,
        card: 0xfafafa,
        text: 0x1a1a1a,
        header: ("Open Sans", 24.0, 0xffffff),
        footer: ("Open Sans", 10.0, 0xffffff),
        body: ("Open Sans", 14.0),
    },
    ThemeSpec {
        id: "quarterly",
        name: "Quarterly Report",
        category: ThemeCategory::Business,
        background: 0xf2f2f8,
        primary: 0x1a3366,
        card: 0xffffff,
        text: 0x33334d,
        header: ("Lato", 24.0, 0xffffff),
        footer: ("Lato", 10.0, 0xcccce6),
        body: ("Lato", 14.0),
    },
    ThemeSpec {
        id: "bw_simple",
        name: "B&W Simple",
        category: ThemeCategory::Cover,
        background: 0x000000,
        primary: 0xffffff,
        card: 0x000000,
        text: 0xffffff,
        header: ("Roboto", 36.0, 0xffffff),
        footer: ("Roboto", 12.0, 0xcccccc),
        body: ("Roboto", 14.0),
    },
    ThemeSpec {
        id: "product_pitch",
        name: "Showstopping Pitch",
        category: ThemeCategory::Cover,
        background: 0x000000,
        primary: 0xffffff,
        card: 0x000000,
        text: 0xffffff,
        header: ("Oswald", 50.0, 0xffffff),
        footer: ("Oswald", 14.0, 0xcccccc),
        body: ("Oswald", 24.0),
    },
    ThemeSpec {
        id: "vibrant_yellow",
        name: "Vibrant Yellow",
        category: ThemeCategory::Cover,
        background: 0x333333,
        primary: 0xffd700,
        card: 0x333333,
        text: 0xffd700,
        header: ("Anton", 48.0, 0xffe600),
        footer: ("Roboto", 12.0, 0xffffff),
        body: ("Roboto", 18.0),
    },
    ThemeSpec {
        id: "academic",
        name: "Academic Blue",
        category: ThemeCategory::Lecture,
        background: 0xf2f7ff,
        primary: 0x1a4d99,
        card: 0xffffff,
        text: 0x1a1a33,
        header: ("Merriweather", 24.0, 0xffffff),
        footer: ("Merriweather", 10.0, 0xffffff),
        body: ("Merriweather", 14.0),
    },
    ThemeSpec {
        id: "blackboard",
        name: "Blackboard",
        category: ThemeCategory::Lecture,
        background: 0x334d40,
        primary: 0xe6cc66,
        card: 0x40594d,
        text: 0xffffff,
        header: ("Patrick Hand", 28.0, 0xffffff),
        footer: ("Patrick Hand", 12.0, 0xe6e6e6),
        body: ("Patrick Hand", 16.0),
    },
    ThemeSpec {
        id: "startup",
        name: "Startup Bold",
        category: ThemeCategory::PitchDeck,
        background: 0xffffff,
        primary: 0xff4d00,
        card: 0xfafafa,
        text: 0x1a1a1a,
        header: ("Poppins", 26.0, 0xffffff),
        footer: ("Poppins", 10.0, 0xffffff),
        body: ("Poppins", 14.0),
    },
    ThemeSpec {
        id: "investor",
        name: "Investor Clean",
        category: ThemeCategory::PitchDeck,
        background: 0xfafafe,
        primary: 0x1a1a66,
        card: 0xffffff,
        text: 0x333333,
        header: ("Lato", 24.0, 0xffffff),
        footer: ("Lato", 10.0, 0xffffff),
        body: ("Lato", 14.0),
    },
];

impl ThemeSpec {
    fn build(&self) -> Theme {
        let text = hex(self.text);
        Theme {
            name: self.name.to_string(),
            category: self.category,
            colors: ThemeColors {
                background: hex(self.background),
                primary: hex(self.primary),
                card: hex(self.card),
                text,
            },
            typography: Typography {
                header: TextStyle::new(self.header.0, self.header.1, true, hex(self.header.2)),
                body: TextStyle::new(self.body.0, self.body.1, false, text),
                footer: TextStyle::new(self.footer.0, self.footer.1, false, hex(self.footer.2)),
            },
        }
    }
}

/// Themes by id. Always holds [`DEFAULT_THEME_ID`], checked when the registry
/// is built.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
    fallback: Theme,
}

impl ThemeRegistry {
    pub fn new(themes: impl IntoIterator<Item = (String, Theme)>) -> Result<Self> {
        let themes: BTreeMap<String, Theme> = themes.into_iter().collect();
        let fallback = themes
            .get(DEFAULT_THEME_ID)
            .cloned()
            .ok_or_else(|| SlideError::MissingDefaultTheme(DEFAULT_THEME_ID.to_string()))?;
        Ok(Self { themes, fallback })
    }

    pub fn builtin() -> Self {
        let themes: BTreeMap<String, Theme> = BUILTIN_THEMES
            .iter()
            .map(|spec| (spec.id.to_string(), spec.build()))
            .collect();
        let fallback = BUILTIN_THEMES[0].build();
        Self { themes, fallback }
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.themes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    pub fn default_theme(&self) -> &Theme {
        &self.fallback
    }

    pub fn insert(&mut self, id: impl Into<String>, theme: Theme) {
        let id = id.into();
        if id == DEFAULT_THEME_ID {
            self.fallback = theme.clone();
        }
        self.themes.insert(id, theme);
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn by_category(&self) -> BTreeMap<ThemeCategory, Vec<(&str, &Theme)>> {
        let mut grouped: BTreeMap<ThemeCategory, Vec<(&str, &Theme)>> = BTreeMap::new();
        for (id, theme) in &self.themes {
            grouped
                .entry(theme.category)
                .or_default()
                .push((id.as_str(), theme));
        }
        grouped
    }

    pub fn resolve(&self, index: usize, assignment: &ThemeAssignment) -> &Theme {
        resolve_theme(index, &assignment.global, &assignment.overrides, self)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Theme selection for a deck: one global id plus per-slide overrides keyed by
/// slide index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAssignment {
    pub global: String,
    #[serde(default)]
    pub overrides: BTreeMap<usize, String>,
}

impl ThemeAssignment {
    pub fn new(global: impl Into<String>) -> Self {
        Self {
            global: global.into(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, index: usize, theme_id: impl Into<String>) -> Self {
        self.overrides.insert(index, theme_id.into());
        self
    }

    pub fn theme_id_for(&self, index: usize) -> &str {
        self.overrides
            .get(&index)
            .map(String::as_str)
            .unwrap_or(&self.global)
    }

    /// Applies `theme_id` to every selected slide, or to the whole deck when
    /// nothing is selected.
    pub fn apply(&mut self, theme_id: &str, selection: &[usize]) {
        if selection.is_empty() {
            self.global = theme_id.to_string();
            return;
        }
        for index in selection {
            self.overrides.insert(*index, theme_id.to_string());
        }
    }

    pub fn clear_override(&mut self, index: usize) -> Option<String> {
        self.overrides.remove(&index)
    }
}

impl Default for ThemeAssignment {
    fn default() -> Self {
        Self::new(DEFAULT_THEME_ID)
    }
}

/// `overrides[index]`, else `global_id`, else the registry default. Never fails.
pub fn resolve_theme<'a>(
    index: usize,
    global_id: &str,
    overrides: &BTreeMap<usize, String>,
    registry: &'a ThemeRegistry,
) -> &'a Theme {
    let id = overrides.get(&index).map(String::as_str).unwrap_or(global_id);
    match registry.get(id) {
        Some(theme) => theme,
        None => {
            tracing::debug!(index, theme_id = id, "unknown theme, using default");
            registry.default_theme()
        }
    }
}
