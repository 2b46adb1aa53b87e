use crate::error::{Result, SlideError};
use crate::geometry::{AspectRatio, Canvas, Orientation, RenderMode};
use crate::ir::MAX_HEADING_LEVEL;
use crate::theme::{Theme, ThemeAssignment, ThemeRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_FOOTER_CAPTION: &str = "Made with slidemark";
pub const DEFAULT_BULLET_PRESET: &str = "BULLET_DISC_CIRCLE_SQUARE";

const HEADING_SCALE: [f32; MAX_HEADING_LEVEL as usize] = [1.5, 1.3, 1.15, 1.05, 1.0, 0.95];

/// Slide styling shared by both backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub line_height: f32,
    /// Space after each body block, in em.
    pub paragraph_gap: f32,
    /// Header block size relative to body text, indexed by level - 1.
    pub heading_scale: [f32; MAX_HEADING_LEVEL as usize],
    pub bullet_glyph: String,
    /// Space between bullet glyph and text, in em.
    pub bullet_gap: f32,
    pub wrap_text: bool,
    pub table_font_scale: f32,
    /// Cell padding, in em of the table font.
    pub table_cell_padding: f32,
    pub footer_caption: String,
    pub thumbnail_short_side: f32,
    pub fullscreen_short_side: f32,
}

impl LayoutConfig {
    pub fn heading_scale_for(&self, level: u8) -> f32 {
        let idx = level.clamp(1, MAX_HEADING_LEVEL) as usize - 1;
        self.heading_scale[idx]
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_height: 1.5,
            paragraph_gap: 0.35,
            heading_scale: HEADING_SCALE,
            bullet_glyph: "\u{2022}".to_string(),
            bullet_gap: 0.6,
            wrap_text: true,
            table_font_scale: 0.9,
            table_cell_padding: 0.4,
            footer_caption: DEFAULT_FOOTER_CAPTION.to_string(),
            thumbnail_short_side: 270.0,
            fullscreen_short_side: 720.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenConfig {
    /// Namespace for generated object ids.
    pub id_prefix: String,
    pub bullet_preset: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            id_prefix: "sm".to_string(),
            bullet_preset: DEFAULT_BULLET_PRESET.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            font_family: "Roboto".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub registry: ThemeRegistry,
    pub assignment: ThemeAssignment,
    pub canvas: Canvas,
    pub layout: LayoutConfig,
    pub codegen: CodegenConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: ThemeRegistry::builtin(),
            assignment: ThemeAssignment::default(),
            canvas: Canvas::default(),
            layout: LayoutConfig::default(),
            codegen: CodegenConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    slide_themes: Option<BTreeMap<String, String>>,
    aspect_ratio: Option<String>,
    orientation: Option<String>,
    mode: Option<String>,
    footer_caption: Option<String>,
    line_height: Option<f32>,
    paragraph_gap: Option<f32>,
    heading_scale: Option<Vec<f32>>,
    bullet_glyph: Option<String>,
    wrap_text: Option<bool>,
    id_prefix: Option<String>,
    bullet_preset: Option<String>,
    themes: Option<BTreeMap<String, Theme>>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    font_family: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses JSON5 config text and merges it over the defaults.
pub fn parse_config(contents: &str) -> Result<Config> {
    let parsed: ConfigFile =
        json5::from_str(contents).map_err(|err| SlideError::config(err.to_string()))?;
    let mut config = Config::default();

    if let Some(themes) = parsed.themes {
        for (id, theme) in themes {
            config.registry.insert(id, theme);
        }
    }

    if let Some(theme) = parsed.theme {
        config.assignment.global = theme;
    }
    if let Some(overrides) = parsed.slide_themes {
        for (index, theme_id) in overrides {
            let index = parse_slide_index(&index)?;
            config.assignment.overrides.insert(index, theme_id);
        }
    }
    for id in std::iter::once(&config.assignment.global).chain(config.assignment.overrides.values())
    {
        if !config.registry.contains(id) {
            tracing::warn!(theme_id = %id, "theme not in registry, slides will use the default theme");
        }
    }

    if let Some(value) = parsed.aspect_ratio {
        config.canvas.aspect_ratio = AspectRatio::parse(&value)?;
    }
    if let Some(value) = parsed.orientation {
        config.canvas.orientation = parse_orientation(&value)?;
    }
    if let Some(value) = parsed.mode {
        config.canvas.mode = parse_mode(&value)?;
    }

    if let Some(v) = parsed.footer_caption {
        config.layout.footer_caption = v;
    }
    if let Some(v) = parsed.line_height {
        config.layout.line_height = v;
    }
    if let Some(v) = parsed.paragraph_gap {
        config.layout.paragraph_gap = v;
    }
    if let Some(scales) = parsed.heading_scale {
        for (slot, value) in config.layout.heading_scale.iter_mut().zip(scales) {
            *slot = value;
        }
    }
    if let Some(v) = parsed.bullet_glyph {
        config.layout.bullet_glyph = v;
    }
    if let Some(v) = parsed.wrap_text {
        config.layout.wrap_text = v;
    }
    if let Some(v) = parsed.id_prefix {
        config.codegen.id_prefix = v;
    }
    if let Some(v) = parsed.bullet_preset {
        config.codegen.bullet_preset = v;
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.font_family {
            config.render.font_family = v;
        }
    }

    Ok(config)
}

fn parse_slide_index(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| SlideError::InvalidOverride(raw.to_string()))
}

/// Parses `INDEX=THEME`, the command-line form of a per-slide override.
pub fn parse_override(raw: &str) -> Result<(usize, String)> {
    let (index, theme) = raw
        .split_once('=')
        .ok_or_else(|| SlideError::InvalidOverride(raw.to_string()))?;
    let theme = theme.trim();
    if theme.is_empty() {
        return Err(SlideError::InvalidOverride(raw.to_string()));
    }
    Ok((parse_slide_index(index)?, theme.to_string()))
}

pub fn parse_orientation(raw: &str) -> Result<Orientation> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "landscape" => Ok(Orientation::Landscape),
        "portrait" => Ok(Orientation::Portrait),
        other => Err(SlideError::config(format!("unknown orientation `{other}`"))),
    }
}

pub fn parse_mode(raw: &str) -> Result<RenderMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "thumbnail" => Ok(RenderMode::Thumbnail),
        "fullscreen" => Ok(RenderMode::Fullscreen),
        other => Err(SlideError::config(format!("unknown render mode `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.assignment.global, "default");
        assert_eq!(config.canvas, Canvas::default());
        assert_eq!(config.layout.footer_caption, DEFAULT_FOOTER_CAPTION);
    }

    #[test]
    fn default_heading_sizes_shrink_at_every_level() {
        let layout = LayoutConfig::default();
        for level in 1..MAX_HEADING_LEVEL {
            assert!(
                layout.heading_scale_for(level) > layout.heading_scale_for(level + 1),
                "level {level}"
            );
        }
        assert_eq!(layout.heading_scale_for(9), layout.heading_scale_for(6));
    }

    #[test]
    fn parses_json5_with_comments_and_overrides() {
        let config = parse_config(
            r#"{
                // deck wide
                theme: "dark",
                slideThemes: { "0": "bw_simple", "3": "academic" },
                aspectRatio: "4:3",
                orientation: "portrait",
                mode: "fullscreen",
                footerCaption: "Q3 review",
                headingScale: [2.0, 1.5],
            }"#,
        )
        .unwrap();
        assert_eq!(config.assignment.global, "dark");
        assert_eq!(config.assignment.theme_id_for(0), "bw_simple");
        assert_eq!(config.assignment.theme_id_for(3), "academic");
        assert_eq!(config.canvas.aspect_ratio, AspectRatio::Standard);
        assert_eq!(config.canvas.orientation, Orientation::Portrait);
        assert_eq!(config.canvas.mode, RenderMode::Fullscreen);
        assert_eq!(config.layout.footer_caption, "Q3 review");
        assert_eq!(config.layout.heading_scale_for(1), 2.0);
        assert_eq!(config.layout.heading_scale_for(3), 1.15);
    }

    #[test]
    fn custom_themes_join_the_registry() {
        let config = parse_config(
            r##"{
                theme: "mint",
                themes: {
                    mint: {
                        name: "Mint",
                        category: "Lecture",
                        colors: { background: "#f0fff4", primary: "#2f855a", card: "#ffffff", text: "#1a202c" },
                        typography: {
                            header: { fontFamily: "Inter", fontSize: 24, bold: true, color: "#ffffff" },
                            body: { fontFamily: "Inter", fontSize: 14, color: "#1a202c" },
                            footer: { fontFamily: "Inter", fontSize: 10, color: "#ffffff" },
                        },
                    },
                },
            }"##,
        )
        .unwrap();
        let theme = config.registry.resolve(0, &config.assignment);
        assert_eq!(theme.name, "Mint");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_config(r#"{ aspectRatio: "5:4" }"#).is_err());
        assert!(parse_config(r#"{ slideThemes: { "x": "dark" } }"#).is_err());
        assert!(parse_config(r#"{ orientation: "sideways" }"#).is_err());
        assert!(parse_config("{ not json").is_err());
    }

    #[test]
    fn parses_command_line_overrides() {
        assert_eq!(parse_override("2=dark").unwrap(), (2, "dark".to_string()));
        assert!(parse_override("dark").is_err());
        assert!(parse_override("2=").is_err());
        assert!(parse_override("-1=dark").is_err());
    }
}
